use std::borrow::Cow;

use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::data::{Classification, ParsedRow, RawLine};
use crate::errors::ReportError;
use crate::report::{LineParser, Report};

/// Event locator (`Scanning -> InTimestampedRun -> AnchorResolved`).
pub mod event;
/// Temporal neighbor search around the anchor.
pub mod neighbors;
/// Tier and crossed-flag assignment.
pub mod priority;
/// Section indexer and membership lookup.
pub mod sections;

pub use event::{AnchorFailure, EventOutcome, locate_event};
pub use neighbors::{Candidate, NeighborSelection, positive_candidates, search_neighbors};
pub use priority::{assign_priorities, partial_pallet_rows};
pub use sections::SectionIndex;

/// Classify report lines with the default configuration.
pub fn classify(lines: &[RawLine]) -> Classification {
    classify_lines_with(lines, &ClassifierConfig::default())
}

/// Classify report lines with an explicit configuration.
///
/// A pure function of its input: every call builds fresh sections, event, and
/// rows. Returns an empty classification when no event resolves, and
/// [`ReportError::Configuration`] when `config` fails validation.
///
/// Result indices are the lines' own `index` values. Lines whose indices are
/// not strictly ascending are renumbered by position first.
pub fn classify_with(
    lines: &[RawLine],
    config: &ClassifierConfig,
) -> Result<Classification, ReportError> {
    config.validate()?;
    Ok(classify_lines_with(lines, config))
}

fn classify_lines_with(lines: &[RawLine], config: &ClassifierConfig) -> Classification {
    let lines = ordered_lines(lines);
    let rows = LineParser::new(config).parse_all(&lines);
    classify_rows(&rows, config)
}

/// Borrow `lines` when their indices ascend strictly, otherwise renumber by position.
fn ordered_lines(lines: &[RawLine]) -> Cow<'_, [RawLine]> {
    if lines.windows(2).all(|pair| pair[0].index < pair[1].index) {
        return Cow::Borrowed(lines);
    }
    warn!(
        "[blind_receiver:classify] line indices are not ascending; renumbering {} lines by position",
        lines.len()
    );
    Cow::Owned(
        lines
            .iter()
            .enumerate()
            .map(|(position, line)| RawLine::new(position, line.text.clone()))
            .collect(),
    )
}

/// Classify already-parsed rows.
///
/// `rows` must be in ascending `index` order, as [`LineParser::parse_all`]
/// produces them from ordered lines.
pub fn classify_rows(rows: &[ParsedRow], config: &ClassifierConfig) -> Classification {
    let sections = SectionIndex::build(rows);
    debug!(
        "[blind_receiver:classify] {} rows, {} sections",
        rows.len(),
        sections.sections().len()
    );

    let EventOutcome::Resolved(event) = locate_event(rows, &sections) else {
        return Classification::empty();
    };

    let candidates = positive_candidates(rows, &sections);
    let selection = search_neighbors(&event, &candidates);
    let partial_pallets = partial_pallet_rows(rows, &sections, config.full_pallet_multiple);

    Classification {
        event: Some(event),
        rows: assign_priorities(rows, &selection, &partial_pallets),
    }
}

/// Entry point holding a validated configuration.
///
/// Callers (CLI, UI buttons) issue one `classify_*` call per report load; no
/// state carries over between calls.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Validate `config` and wrap it.
    pub fn new(config: ClassifierConfig) -> Result<Self, ReportError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify raw lines with this classifier's configuration.
    pub fn classify_lines(&self, lines: &[RawLine]) -> Classification {
        classify_lines_with(lines, &self.config)
    }

    /// Classify every line of a loaded report.
    pub fn classify_report(&self, report: &Report) -> Classification {
        self.classify_lines(&report.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriorityTier;

    const REPORT: &str = "\
BLIND RECEIVER / COVER SHEET
123400  WidgetZ  070124  30 36 6
123401  FE3VEZZ1  02/01  8:00  36  DOCK
123402  FE3VEZZ2  02/01  9:10  35  DOCK
123403  FE3VEZZ3  02/01  9:40  42  D12
123404  FE3VEZZ4  02/01  11:30  48  DOCK
123405  FE3VEZZ5  02/01  12:15  49  DOCK
123410  WidgetA  070124  50 48 2
123411  FE3VER9U  02/01  10:00  48  DOCK
123412  FE3VETQX  02/01  10:05  48  DOCK";

    #[test]
    fn classifies_full_report() {
        let report = Report::from_text(REPORT);
        let classification = classify(&report.lines);

        let event = classification.event.unwrap();
        assert_eq!(event.trigger_index, 7);
        assert_eq!(event.anchor_index, 9);

        assert_eq!(classification.rows.len(), report.len());
        assert_eq!(classification.high_row(), Some(4));
        assert_eq!(
            classification.indices_with_tier(PriorityTier::Medium),
            vec![3, 5]
        );
        assert_eq!(classification.indices_with_tier(PriorityTier::Low), vec![6]);
        assert_eq!(classification.crossed_indices(), vec![4]);
        assert_eq!(classification.tier_of(2), PriorityTier::None);
    }

    #[test]
    fn no_trigger_returns_empty_classification() {
        let report = Report::from_text(
            "123400  WidgetZ  070124  30 36 6\n123401  FE3VEZZ1  02/01  8:00  35  D4",
        );
        let classification = classify(&report.lines);
        assert!(classification.is_empty());
        assert_eq!(classification.event, None);
    }

    #[test]
    fn classifier_rejects_invalid_config() {
        let config = ClassifierConfig::default().with_full_pallet_multiple(0);
        assert!(Classifier::new(config).is_err());
    }

    #[test]
    fn classify_with_rejects_invalid_config() {
        let report = Report::from_text(REPORT);
        let config = ClassifierConfig::default().with_prefix_digits(0);
        assert!(matches!(
            classify_with(&report.lines, &config),
            Err(ReportError::Configuration(_))
        ));
        let valid = classify_with(&report.lines, &ClassifierConfig::default()).unwrap();
        assert_eq!(valid, classify(&report.lines));
    }

    #[test]
    fn offset_line_indices_keep_their_own_numbering() {
        let lines: Vec<RawLine> = [
            "123450  WidgetB  070124  48 54 6",
            "123458  FE3VER9U  02/01  09:40  54  DOCK",
            "123456  WidgetA  070124  50 48 2",
            "123457  FE3VEU17  02/01  10:05  48  DOCK",
        ]
        .iter()
        .enumerate()
        .map(|(position, text)| RawLine::new(position + 10, *text))
        .collect();
        let classification = classify(&lines);

        let event = classification.event.unwrap();
        assert_eq!((event.trigger_index, event.anchor_index), (12, 13));
        assert_eq!(classification.high_row(), Some(11));
        assert_eq!(classification.tier_of(11), PriorityTier::High);
        assert_eq!(classification.tier_of(1), PriorityTier::None);
        let indices: Vec<usize> = classification.rows.iter().map(|row| row.row_index).collect();
        assert_eq!(indices, vec![10, 11, 12, 13]);
    }

    #[test]
    fn unordered_line_indices_are_renumbered_by_position() {
        let lines = vec![
            RawLine::new(7, "123450  WidgetB  070124  48 54 6"),
            RawLine::new(3, "123458  FE3VER9U  02/01  09:40  54  DOCK"),
            RawLine::new(3, "123456  WidgetA  070124  50 48 2"),
            RawLine::new(0, "123457  FE3VEU17  02/01  10:05  48  DOCK"),
        ];
        let classification = classify(&lines);
        let event = classification.event.unwrap();
        assert_eq!((event.trigger_index, event.anchor_index), (2, 3));
        assert_eq!(classification.high_row(), Some(1));
    }

    #[test]
    fn classifier_applies_configured_multiple() {
        let report = Report::from_text(REPORT);
        let classifier =
            Classifier::new(ClassifierConfig::default().with_full_pallet_multiple(7)).unwrap();
        let classification = classifier.classify_report(&report);
        // 35, 42 and 49 divide by 7; line 5 (48) is partial but already Medium.
        assert_eq!(classification.indices_with_tier(PriorityTier::Low), vec![2]);
    }
}
