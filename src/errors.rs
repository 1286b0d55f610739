use std::io;

use thiserror::Error;

use crate::types::PathString;

/// Error type for report loading, configuration, and output failures.
///
/// Classification itself never fails; malformed rows are absorbed as plain rows.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be opened or read.
    #[error("report '{path}' could not be read: {source}")]
    Read {
        /// Path as given by the caller.
        path: PathString,
        #[source]
        source: io::Error,
    },
    /// Any other I/O failure, such as writing rendered output.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A [`ClassifierConfig`](crate::ClassifierConfig) failed validation.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
