use chrono::NaiveTime;
use serde::Serialize;

pub use crate::types::{CaseCount, LineIndex, LineText};

/// One line of a report with its original position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RawLine {
    /// Zero-based position within the report; all ordering derives from it.
    pub index: LineIndex,
    /// Line text without the trailing newline.
    pub text: LineText,
}

impl RawLine {
    /// Line `index` holding `text`.
    pub fn new(index: LineIndex, text: impl Into<LineText>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Trailing integers of a quantity line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuantityFields {
    /// Third-to-last integer on the line.
    pub ordered: CaseCount,
    /// Second-to-last integer on the line.
    pub received: CaseCount,
    /// Last integer on the line (unsigned as exported).
    pub difference: CaseCount,
}

impl QuantityFields {
    /// Section kind opened by this quantity line.
    pub fn section_kind(&self) -> SectionKind {
        match self.received.cmp(&self.ordered) {
            std::cmp::Ordering::Less => SectionKind::Negative,
            std::cmp::Ordering::Greater => SectionKind::Positive,
            std::cmp::Ordering::Equal => SectionKind::Even,
        }
    }
}

/// Fields of a timestamped movement row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TimestampedFields {
    /// Parsed clock time; `None` when the time-shaped token is not a valid time (e.g. `25:70`).
    pub time: Option<NaiveTime>,
    /// Second-to-last word token parsed as a case count, when numeric.
    pub pallet_size: Option<CaseCount>,
    /// Row ends in a bare location code and refers to an inaccessible location.
    pub location_restricted: bool,
}

/// Tagged row shape produced by the line parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    /// Received/ordered/difference counts for a location.
    Quantity(QuantityFields),
    /// A movement event carrying a clock time.
    Timestamped(TimestampedFields),
    /// Headers, separators, and anything else.
    Plain,
}

/// Structured view of a report line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedRow {
    /// Index of the source [`RawLine`].
    pub index: LineIndex,
    pub kind: RowKind,
}

impl ParsedRow {
    /// True for [`RowKind::Quantity`] rows.
    pub fn is_quantity_line(&self) -> bool {
        matches!(self.kind, RowKind::Quantity(_))
    }

    /// True for [`RowKind::Timestamped`] rows, whether or not the time parsed.
    pub fn is_timestamped_line(&self) -> bool {
        matches!(self.kind, RowKind::Timestamped(_))
    }

    /// Quantity fields of a quantity line.
    pub fn quantities(&self) -> Option<QuantityFields> {
        match self.kind {
            RowKind::Quantity(fields) => Some(fields),
            _ => None,
        }
    }

    /// Received case count of a quantity line.
    pub fn received_qty(&self) -> Option<CaseCount> {
        self.quantities().map(|fields| fields.received)
    }

    /// Ordered case count of a quantity line.
    pub fn ordered_qty(&self) -> Option<CaseCount> {
        self.quantities().map(|fields| fields.ordered)
    }

    /// Exported difference of a quantity line.
    pub fn diff_qty(&self) -> Option<CaseCount> {
        self.quantities().map(|fields| fields.difference)
    }

    /// Parsed time of a timestamped row; `None` for other rows or invalid times.
    pub fn timestamp(&self) -> Option<NaiveTime> {
        match self.kind {
            RowKind::Timestamped(fields) => fields.time,
            _ => None,
        }
    }

    /// Numeric pallet size of a timestamped row.
    pub fn pallet_size(&self) -> Option<CaseCount> {
        match self.kind {
            RowKind::Timestamped(fields) => fields.pallet_size,
            _ => None,
        }
    }

    /// True when a timestamped row ends at an inaccessible location.
    pub fn location_restricted(&self) -> bool {
        match self.kind {
            RowKind::Timestamped(fields) => fields.location_restricted,
            _ => false,
        }
    }
}

/// Section classification derived from a quantity line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Received more than ordered.
    Positive,
    /// Received exactly what was ordered.
    Even,
    /// Received less than ordered.
    Negative,
}

/// A run of lines governed by the quantity line at `start_index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Index of the quantity line opening the section.
    pub start_index: LineIndex,
}

/// The discrepancy under evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Quantity line with received < ordered.
    pub trigger_index: LineIndex,
    /// Last row of the timestamped run following the trigger.
    pub anchor_index: LineIndex,
    /// Clock time of the anchor row.
    pub anchor_time: NaiveTime,
}

/// Highlight tier assigned to a row.
///
/// Variants are ordered by precedence so `max` picks the winning tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Not highlighted.
    #[default]
    None,
    /// Partial pallet in a Positive section.
    Low,
    /// Second-nearest preceding or nearest following neighbor.
    Medium,
    /// Nearest preceding neighbor, or the anchor fallback.
    High,
}

/// Output unit consumed by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityRow {
    /// Index of the classified line.
    pub row_index: LineIndex,
    pub tier: PriorityTier,
    /// Inaccessible location; independent of `tier`.
    pub crossed: bool,
}

/// Result of one classification run.
///
/// `rows` holds one entry per report line when an event was resolved and is
/// empty otherwise ("nothing to highlight").
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The resolved event, if any.
    pub event: Option<Event>,
    /// Per-line results in ascending `row_index` order.
    pub rows: Vec<PriorityRow>,
}

impl Classification {
    /// Classification with nothing to highlight.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Result for line `index`.
    pub fn row(&self, index: LineIndex) -> Option<&PriorityRow> {
        self.rows
            .binary_search_by_key(&index, |row| row.row_index)
            .ok()
            .map(|position| &self.rows[position])
    }

    /// Tier for `index`; `PriorityTier::None` when absent.
    pub fn tier_of(&self, index: LineIndex) -> PriorityTier {
        self.row(index).map(|row| row.tier).unwrap_or_default()
    }

    /// True when line `index` is flagged crossed.
    pub fn is_crossed(&self, index: LineIndex) -> bool {
        self.row(index).is_some_and(|row| row.crossed)
    }

    /// Indices carrying `tier`, ascending.
    pub fn indices_with_tier(&self, tier: PriorityTier) -> Vec<LineIndex> {
        self.rows
            .iter()
            .filter(|row| row.tier == tier)
            .map(|row| row.row_index)
            .collect()
    }

    /// Index of the High row, if any.
    pub fn high_row(&self) -> Option<LineIndex> {
        self.rows
            .iter()
            .find(|row| row.tier == PriorityTier::High)
            .map(|row| row.row_index)
    }

    /// Indices flagged crossed, ascending.
    pub fn crossed_indices(&self) -> Vec<LineIndex> {
        self.rows
            .iter()
            .filter(|row| row.crossed)
            .map(|row| row.row_index)
            .collect()
    }
}
