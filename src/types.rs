/// Zero-based position of a line within a report.
/// Example: `0` for the first line of the file.
pub type LineIndex = usize;
/// Raw report line text, trailing newline removed.
/// Example: `123456  WidgetA  02/01  070124  48 50 2`
pub type LineText = String;
/// File path strings used for report loading and error reporting.
/// Example: `reports/BF1.rpt`
pub type PathString = String;
/// Whole-case quantity read from a quantity line or a pallet column.
/// Examples: `48`, `50`, `2`
pub type CaseCount = u32;
/// Console/diagnostic message text.
/// Example: `[HIGH] likely mixed event occurrence: 123457 ...`
pub type LogMessage = String;
