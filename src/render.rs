//! Plain-text annotation of classified reports.
//!
//! Colour, PDF, and image output live outside this crate; this renderer only
//! tags each line with its tier and crossed flag so the result can be read in a
//! terminal or diffed.

use crate::config::ClassifierConfig;
use crate::constants::render::{ACCEPTANCE_KEYWORD, CROSSED_MARKER, DETAIL_INDENT, TIER_LABEL_WIDTH};
use crate::data::{Classification, ParsedRow, PriorityTier, QuantityFields, RowKind};
use crate::report::{LineParser, Report};

/// Short label printed in the marker column.
pub fn tier_label(tier: PriorityTier) -> &'static str {
    match tier {
        PriorityTier::High => "HIGH",
        PriorityTier::Medium => "MED",
        PriorityTier::Low => "LOW",
        PriorityTier::None => "",
    }
}

/// Difference column with its direction: `+N` over, `-N` short, `N` even.
pub fn signed_difference(fields: &QuantityFields) -> String {
    let sign = if fields.received > fields.ordered {
        "+"
    } else if fields.received < fields.ordered {
        "-"
    } else {
        ""
    };
    format!("{sign}{}", fields.difference)
}

/// Render every report line with a tier/crossed marker column.
pub fn render_text(
    report: &Report,
    classification: &Classification,
    config: &ClassifierConfig,
) -> String {
    let parser = LineParser::new(config);
    let mut out = String::new();
    for line in &report.lines {
        let row = parser.parse(line);
        let tier = classification.tier_of(line.index);
        let crossed = if classification.is_crossed(line.index) {
            CROSSED_MARKER
        } else {
            ' '
        };
        out.push_str(&format!(
            "{:<width$}{} {}\n",
            tier_label(tier),
            crossed,
            render_body(&row, &line.text),
            width = TIER_LABEL_WIDTH
        ));
    }
    out
}

fn render_body(row: &ParsedRow, text: &str) -> String {
    match row.kind {
        RowKind::Quantity(fields) => with_signed_difference(text, &fields),
        RowKind::Timestamped(_) => format!("{DETAIL_INDENT}{}", text.trim()),
        RowKind::Plain if text.contains(ACCEPTANCE_KEYWORD) => {
            format!("{DETAIL_INDENT}{}", text.trim())
        }
        RowKind::Plain => text.trim().to_string(),
    }
}

fn with_signed_difference(text: &str, fields: &QuantityFields) -> String {
    let trimmed = text.trim_end();
    let head = trimmed.trim_end_matches(|ch: char| ch.is_ascii_digit());
    format!("{head}{}", signed_difference(fields))
}
