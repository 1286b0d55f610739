use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, warn};

use crate::data::RawLine;
use crate::errors::ReportError;
use crate::transport::fs::{file_mtime, is_report_file, read_report_lines, split_report_lines};
use crate::types::PathString;

/// Line tokenizer producing tagged rows.
pub mod parser;
/// Time-token scanning and parsing.
pub mod time_helpers;

pub use parser::LineParser;

/// An in-memory blind-receiver report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Where the report was loaded from, when it came from disk.
    pub path: Option<PathString>,
    /// File modification time, when known.
    pub modified_at: Option<DateTime<Utc>>,
    /// Report lines in file order.
    pub lines: Vec<RawLine>,
}

impl Report {
    /// Load a report file. Unreadable files are the only fatal condition.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        if !is_report_file(path) {
            warn!(
                "[blind_receiver:report] '{}' does not have a .rpt/.txt extension; reading anyway",
                path.display()
            );
        }
        let lines = read_report_lines(path)?;
        debug!(
            "[blind_receiver:report] loaded {} lines from '{}'",
            lines.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path.display().to_string()),
            modified_at: file_mtime(path),
            lines: number_lines(lines),
        })
    }

    /// Build a report from already-read text.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(split_report_lines(text))
    }

    /// Build a report from individual lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: None,
            modified_at: None,
            lines: number_lines(lines),
        }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True for a report with no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the line at `index`, if present.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|line| line.text.as_str())
    }
}

fn number_lines<I, S>(lines: I) -> Vec<RawLine>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(index, text)| RawLine::new(index, text))
        .collect()
}
