use chrono::NaiveTime;
use tracing::debug;

use crate::classify::sections::SectionIndex;
use crate::constants::priority::{AFTER_NEIGHBORS, BEFORE_NEIGHBORS};
use crate::data::{Event, LineIndex, ParsedRow};

/// A timestamped row inside a Positive section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    pub time: NaiveTime,
    /// Line index of the row.
    pub index: LineIndex,
}

/// Rows chosen around the anchor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborSelection {
    /// Nearest preceding candidate, or the anchor itself when none precede it.
    pub high: Option<LineIndex>,
    /// Second-nearest preceding candidate then nearest following candidate.
    pub medium: Vec<LineIndex>,
    /// True when `high` is the anchor fallback.
    pub anchor_fallback: bool,
}

/// Timestamped rows with a valid time whose section is Positive, sorted by
/// time then line order.
pub fn positive_candidates(rows: &[ParsedRow], sections: &SectionIndex) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = rows
        .iter()
        .filter(|row| sections.is_positive(row.index))
        .filter_map(|row| {
            row.timestamp().map(|time| Candidate {
                time,
                index: row.index,
            })
        })
        .collect();
    candidates.sort();
    candidates
}

/// Pick the two nearest candidates strictly before the anchor time and the
/// nearest one strictly after it.
///
/// `candidates` must be sorted by `(time, index)`; among equal times the
/// higher line index counts as nearer before the anchor and the lower one as
/// nearer after it.
pub fn search_neighbors(event: &Event, candidates: &[Candidate]) -> NeighborSelection {
    debug_assert!(candidates.windows(2).all(|pair| pair[0] <= pair[1]));
    let target = event.anchor_time;

    let before_end = candidates.partition_point(|candidate| candidate.time < target);
    let after_start = candidates.partition_point(|candidate| candidate.time <= target);
    let before = &candidates[..before_end];
    let after = &candidates[after_start..];

    let nearest_before = &before[before.len().saturating_sub(BEFORE_NEIGHBORS)..];
    let nearest_after = &after[..after.len().min(AFTER_NEIGHBORS)];

    let mut selection = NeighborSelection::default();
    match nearest_before {
        [farther, nearer] => {
            selection.high = Some(nearer.index);
            selection.medium.push(farther.index);
        }
        [only] => selection.high = Some(only.index),
        _ => {
            selection.high = Some(event.anchor_index);
            selection.anchor_fallback = true;
        }
    }
    selection
        .medium
        .extend(nearest_after.iter().map(|candidate| candidate.index));

    debug!(
        "[blind_receiver:neighbors] {} before / {} after anchor; high={:?} medium={:?} fallback={}",
        before.len(),
        after.len(),
        selection.high,
        selection.medium,
        selection.anchor_fallback
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::report::{LineParser, Report};

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn event(anchor_index: LineIndex, hour: u32, minute: u32) -> Event {
        Event {
            trigger_index: anchor_index.saturating_sub(1),
            anchor_index,
            anchor_time: at(hour, minute),
        }
    }

    fn sorted(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort();
        candidates
    }

    #[test]
    fn two_before_and_one_after() {
        let candidates = sorted(vec![
            Candidate { time: at(9, 0), index: 2 },
            Candidate { time: at(9, 40), index: 3 },
            Candidate { time: at(9, 55), index: 4 },
            Candidate { time: at(10, 30), index: 5 },
            Candidate { time: at(11, 0), index: 6 },
        ]);
        let selection = search_neighbors(&event(20, 10, 0), &candidates);
        assert_eq!(selection.high, Some(4));
        assert_eq!(selection.medium, vec![3, 5]);
        assert!(!selection.anchor_fallback);
    }

    #[test]
    fn single_before_gives_high_only() {
        let candidates = sorted(vec![
            Candidate { time: at(9, 40), index: 3 },
            Candidate { time: at(11, 0), index: 6 },
        ]);
        let selection = search_neighbors(&event(20, 10, 0), &candidates);
        assert_eq!(selection.high, Some(3));
        assert_eq!(selection.medium, vec![6]);
    }

    #[test]
    fn no_before_falls_back_to_anchor() {
        let candidates = sorted(vec![
            Candidate { time: at(11, 0), index: 6 },
            Candidate { time: at(12, 0), index: 7 },
        ]);
        let selection = search_neighbors(&event(20, 10, 0), &candidates);
        assert_eq!(selection.high, Some(20));
        assert_eq!(selection.medium, vec![6]);
        assert!(selection.anchor_fallback);
    }

    #[test]
    fn equal_times_are_excluded_and_ties_use_line_order() {
        let candidates = sorted(vec![
            Candidate { time: at(9, 0), index: 2 },
            Candidate { time: at(9, 0), index: 8 },
            Candidate { time: at(10, 0), index: 9 },
            Candidate { time: at(11, 0), index: 12 },
            Candidate { time: at(11, 0), index: 10 },
        ]);
        let selection = search_neighbors(&event(20, 10, 0), &candidates);
        // Both 9:00 rows precede; the later line is nearer.
        assert_eq!(selection.high, Some(8));
        // 10:00 equals the anchor time and is skipped; the earlier 11:00 line follows first.
        assert_eq!(selection.medium, vec![2, 10]);
    }

    #[test]
    fn candidates_come_from_positive_sections_with_valid_times() {
        let report = Report::from_text(
            "\
123400  FE3VEZZ0  02/01  7:00  36  DOCK
123450  WidgetZ  070124  30 36 6
123451  FE3VEZZ1  02/01  9:10  35  DOCK
123452  FE3VEZZ2  02/01  27:99  35  DOCK
123453  FE3VEZZ3  02/01  8:00  36  DOCK
Totals 8:30
123460  WidgetE  070124  12 12 0
123461  FE3VEZZ4  02/01  7:30  12  DOCK
123470  WidgetA  070124  50 48 2
123471  FE3VER9U  02/01  10:05  48  DOCK",
        );
        let config = ClassifierConfig::default();
        let rows = LineParser::new(&config).parse_all(&report.lines);
        let sections = SectionIndex::build(&rows);

        // Line 0 precedes every section, line 7 is Even, line 9 is Negative,
        // line 3 has an invalid time, and line 5 is not a timestamped row.
        assert_eq!(
            positive_candidates(&rows, &sections),
            vec![
                Candidate { time: at(8, 0), index: 4 },
                Candidate { time: at(9, 10), index: 2 },
            ]
        );
        // The invalid-time row is still a partial pallet.
        assert_eq!(
            crate::classify::partial_pallet_rows(&rows, &sections, 6),
            vec![2, 3]
        );
    }

    #[test]
    fn empty_pool_yields_only_the_anchor() {
        let selection = search_neighbors(&event(4, 10, 0), &[]);
        assert_eq!(selection.high, Some(4));
        assert!(selection.medium.is_empty());
        assert!(selection.anchor_fallback);
    }
}
