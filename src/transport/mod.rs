/// Filesystem access for report files.
pub mod fs;
