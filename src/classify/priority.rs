use tracing::debug;

use crate::classify::neighbors::NeighborSelection;
use crate::classify::sections::SectionIndex;
use crate::data::{LineIndex, ParsedRow, PriorityRow, PriorityTier};

/// Positive-section timestamped rows whose pallet size is not a multiple of
/// `full_pallet_multiple`.
///
/// Covers the whole report, not just the event's neighbors. Rows without a
/// numeric pallet size are never partial; a multiple of zero marks nothing.
pub fn partial_pallet_rows(
    rows: &[ParsedRow],
    sections: &SectionIndex,
    full_pallet_multiple: u32,
) -> Vec<LineIndex> {
    rows.iter()
        .filter(|row| row.is_timestamped_line() && sections.is_positive(row.index))
        .filter(|row| {
            row.pallet_size()
                .and_then(|size| size.checked_rem(full_pallet_multiple))
                .is_some_and(|remainder| remainder != 0)
        })
        .map(|row| row.index)
        .collect()
}

/// Combine neighbor selection, partial pallets, and location restriction into
/// one [`PriorityRow`] per parsed row.
///
/// High beats Medium beats Low; `crossed` is computed independently of tier.
/// Selected indices are matched against row indices, so `rows` must ascend.
pub fn assign_priorities(
    rows: &[ParsedRow],
    selection: &NeighborSelection,
    partial_pallets: &[LineIndex],
) -> Vec<PriorityRow> {
    let mut assigned: Vec<PriorityRow> = rows
        .iter()
        .map(|row| PriorityRow {
            row_index: row.index,
            tier: PriorityTier::None,
            crossed: row.location_restricted(),
        })
        .collect();

    let mut raise = |index: LineIndex, tier: PriorityTier| {
        if let Ok(position) = assigned.binary_search_by_key(&index, |row| row.row_index) {
            let row = &mut assigned[position];
            row.tier = row.tier.max(tier);
        }
    };
    for &index in partial_pallets {
        raise(index, PriorityTier::Low);
    }
    for &index in &selection.medium {
        raise(index, PriorityTier::Medium);
    }
    if let Some(index) = selection.high {
        raise(index, PriorityTier::High);
    }

    debug!(
        "[blind_receiver:priority] high={:?} medium={:?} low={} crossed={}",
        selection.high,
        selection.medium,
        partial_pallets.len(),
        assigned.iter().filter(|row| row.crossed).count()
    );
    assigned
}
