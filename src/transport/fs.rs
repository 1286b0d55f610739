use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

use crate::errors::ReportError;
use crate::types::LineText;

/// Report file extensions accepted by the loader (`.rpt` exports and their `.txt` copies).
const REPORT_EXTENSIONS: [&str; 2] = ["rpt", "txt"];

/// Read a report file into lines, trailing newlines (`\n` / `\r\n`) removed.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; exports from
/// the warehouse-control system are not guaranteed to be UTF-8.
pub fn read_report_lines(path: &Path) -> Result<Vec<LineText>, ReportError> {
    let bytes = fs::read(path).map_err(|source| ReportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(split_report_lines(&String::from_utf8_lossy(&bytes)))
}

/// Split report text into lines without their terminators.
pub fn split_report_lines(text: &str) -> Vec<LineText> {
    text.lines().map(str::to_string).collect()
}

/// True if the path has a `.rpt` or `.txt` extension (case-insensitive).
pub fn is_report_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            REPORT_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Best-effort file modified time.
pub fn file_mtime(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = fs::metadata(path).ok()?;
    let modified = metadata.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}
