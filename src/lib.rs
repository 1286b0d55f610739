#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners shared by the binary targets.
pub mod apps;
/// Row classification engine: sections, event, neighbors, priorities.
pub mod classify;
/// Classifier configuration types.
pub mod config;
/// Centralized constants used across the parser, classifier, and renderer.
pub mod constants;
/// Report, row, section, and priority data types.
pub mod data;
/// Report loading and line parsing.
pub mod report;
/// Pallet recirculation analysis over inflow rows.
pub mod recirculation;
/// Plain-text rendering of classified reports.
pub mod render;
/// Tier counts and console summaries.
pub mod summary;
/// Input transports used by report loading (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use classify::{Classifier, classify, classify_with};
pub use config::ClassifierConfig;
pub use data::{
    Classification, Event, ParsedRow, PriorityRow, PriorityTier, QuantityFields, RawLine, RowKind,
    Section, SectionKind, TimestampedFields,
};
pub use errors::ReportError;
pub use report::Report;
pub use types::{CaseCount, LineIndex, LineText, LogMessage, PathString};
