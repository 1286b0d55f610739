use tracing::{info, warn};

use crate::classify::sections::SectionIndex;
use crate::data::{Event, LineIndex, ParsedRow, SectionKind};
use crate::report::time_helpers::format_report_time;

/// Why a trigger did not resolve to an anchor row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorFailure {
    /// The trigger is the last line of the report.
    EndOfReport,
    /// The line after the trigger is not a timestamped row.
    NotTimestamped,
    /// The anchor row's time token is not a valid clock time.
    UnparseableTime {
        /// Line index of the rejected anchor row.
        anchor_index: LineIndex,
    },
}

/// Result of scanning a report for the discrepancy event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// No quantity line has received < ordered.
    NoTrigger,
    /// A trigger exists but no anchor could be resolved.
    NoAnchor {
        /// Line index of the short-received quantity line.
        trigger_index: LineIndex,
        /// Why resolution stopped.
        reason: AnchorFailure,
    },
    /// Trigger and anchor both resolved.
    Resolved(Event),
}

impl EventOutcome {
    /// The resolved event, if any.
    pub fn event(&self) -> Option<Event> {
        match self {
            EventOutcome::Resolved(event) => Some(*event),
            _ => None,
        }
    }
}

// `cursor` and `anchor` are positions in `rows`; `trigger` is a line index.
enum LocatorState {
    Scanning,
    InTimestampedRun {
        trigger: LineIndex,
        cursor: usize,
    },
    AnchorResolved {
        trigger: LineIndex,
        anchor: usize,
    },
}

/// Find the first short-received quantity line and resolve its anchor.
///
/// The anchor is the last row of the contiguous timestamped run that starts on
/// the line right after the trigger. `rows` must be in ascending index order;
/// "right after" means the next row in that order.
pub fn locate_event(rows: &[ParsedRow], sections: &SectionIndex) -> EventOutcome {
    let mut state = LocatorState::Scanning;
    loop {
        state = match state {
            LocatorState::Scanning => {
                let Some(trigger) = sections.first_start_of(SectionKind::Negative) else {
                    info!("[blind_receiver:event] no short-received quantity line; nothing to highlight");
                    return EventOutcome::NoTrigger;
                };
                info!("[blind_receiver:event] mismatch triggered at line {trigger}");
                let first = rows.partition_point(|row| row.index <= trigger);
                match rows.get(first) {
                    None => return no_anchor(trigger, AnchorFailure::EndOfReport),
                    Some(row) if !row.is_timestamped_line() => {
                        return no_anchor(trigger, AnchorFailure::NotTimestamped);
                    }
                    Some(_) => LocatorState::InTimestampedRun {
                        trigger,
                        cursor: first,
                    },
                }
            }
            LocatorState::InTimestampedRun { trigger, cursor } => {
                let next_is_timestamped = rows
                    .get(cursor + 1)
                    .is_some_and(ParsedRow::is_timestamped_line);
                if next_is_timestamped {
                    LocatorState::InTimestampedRun {
                        trigger,
                        cursor: cursor + 1,
                    }
                } else {
                    LocatorState::AnchorResolved {
                        trigger,
                        anchor: cursor,
                    }
                }
            }
            LocatorState::AnchorResolved { trigger, anchor } => {
                let anchor_row = &rows[anchor];
                let anchor = anchor_row.index;
                let Some(anchor_time) = anchor_row.timestamp() else {
                    return no_anchor(
                        trigger,
                        AnchorFailure::UnparseableTime {
                            anchor_index: anchor,
                        },
                    );
                };
                info!(
                    "[blind_receiver:event] anchor resolved at line {anchor} ({})",
                    format_report_time(anchor_time)
                );
                return EventOutcome::Resolved(Event {
                    trigger_index: trigger,
                    anchor_index: anchor,
                    anchor_time,
                });
            }
        };
    }
}

fn no_anchor(trigger_index: LineIndex, reason: AnchorFailure) -> EventOutcome {
    warn!(
        "[blind_receiver:event] trigger at line {trigger_index} has no anchor: {:?}",
        reason
    );
    EventOutcome::NoAnchor {
        trigger_index,
        reason,
    }
}
