use serde::Serialize;

use crate::constants::summary::{CROSSED_LABEL, HIGH_LABEL, LOW_LABEL, MEDIUM_LABEL};
use crate::data::{Classification, PriorityTier};
use crate::report::Report;
use crate::report::time_helpers::format_report_time;
use crate::types::LogMessage;

/// Per-tier row counts for one classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    /// Rows in the classification (zero when no event resolved).
    pub total_rows: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Rows flagged crossed, regardless of tier.
    pub crossed: usize,
    /// Whether a mixed event was located.
    pub event_found: bool,
}

impl ClassificationSummary {
    /// Count tiers and crossed flags in `classification`.
    pub fn from_classification(classification: &Classification) -> Self {
        let mut summary = Self {
            total_rows: classification.rows.len(),
            event_found: classification.event.is_some(),
            ..Self::default()
        };
        for row in &classification.rows {
            match row.tier {
                PriorityTier::High => summary.high += 1,
                PriorityTier::Medium => summary.medium += 1,
                PriorityTier::Low => summary.low += 1,
                PriorityTier::None => {}
            }
            if row.crossed {
                summary.crossed += 1;
            }
        }
        summary
    }

    /// Rows carrying any tier.
    pub fn highlighted(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Console lines describing the highlighted rows, most urgent first.
pub fn describe(report: &Report, classification: &Classification) -> Vec<LogMessage> {
    let Some(event) = classification.event else {
        return vec!["No short-received quantity line with a resolvable anchor; nothing to highlight.".to_string()];
    };

    let text_of = |index: usize| report.text(index).unwrap_or_default().trim().to_string();
    let mut messages = vec![format!(
        "Mixed event at {} (trigger line {}, anchor line {})",
        format_report_time(event.anchor_time),
        event.trigger_index + 1,
        event.anchor_index + 1
    )];

    let tiers = [
        (PriorityTier::High, HIGH_LABEL),
        (PriorityTier::Medium, MEDIUM_LABEL),
        (PriorityTier::Low, LOW_LABEL),
    ];
    for (tier, label) in tiers {
        for index in classification.indices_with_tier(tier) {
            messages.push(format!("{label}: {}", text_of(index)));
        }
    }
    for index in classification.crossed_indices() {
        messages.push(format!("{CROSSED_LABEL}: {}", text_of(index)));
    }
    messages
}
