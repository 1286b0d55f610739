use crate::data::{LineIndex, ParsedRow, Section, SectionKind};

/// Ordered section boundaries for one report.
///
/// Built once per run and shared read-only by the event locator and the
/// neighbor search so both see the same membership for every index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    /// Single left-to-right pass over parsed rows; every quantity line opens a section.
    pub fn build(rows: &[ParsedRow]) -> Self {
        let sections = rows
            .iter()
            .filter_map(|row| {
                row.quantities().map(|fields| Section {
                    kind: fields.section_kind(),
                    start_index: row.index,
                })
            })
            .collect::<Vec<_>>();
        debug_assert!(
            sections
                .windows(2)
                .all(|pair| pair[0].start_index < pair[1].start_index)
        );
        Self { sections }
    }

    /// Sections in report order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// True when the report has no quantity lines.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section covering `index`: the one with the largest start `<= index`.
    pub fn section_at(&self, index: LineIndex) -> Option<&Section> {
        let covering = self
            .sections
            .partition_point(|section| section.start_index <= index);
        covering
            .checked_sub(1)
            .and_then(|position| self.sections.get(position))
    }

    /// Section kind covering `index`, or `None` before the first boundary.
    pub fn kind_at(&self, index: LineIndex) -> Option<SectionKind> {
        self.section_at(index).map(|section| section.kind)
    }

    /// True when `index` falls in a Positive section.
    pub fn is_positive(&self, index: LineIndex) -> bool {
        self.kind_at(index) == Some(SectionKind::Positive)
    }

    /// Start index of the first section of `kind`.
    pub fn first_start_of(&self, kind: SectionKind) -> Option<LineIndex> {
        self.sections
            .iter()
            .find(|section| section.kind == kind)
            .map(|section| section.start_index)
    }
}
