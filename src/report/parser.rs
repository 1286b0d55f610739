use crate::config::ClassifierConfig;
use crate::constants::parser::QUANTITY_FIELDS;
use crate::data::{CaseCount, ParsedRow, QuantityFields, RawLine, RowKind, TimestampedFields};
use crate::report::time_helpers::{find_time_token, parse_time_token};

/// Tokenizes report lines into tagged [`ParsedRow`] values.
///
/// Parsing never fails: anything that is neither a quantity line nor a
/// timestamped line becomes [`RowKind::Plain`].
#[derive(Clone, Debug)]
pub struct LineParser<'a> {
    config: &'a ClassifierConfig,
}

impl<'a> LineParser<'a> {
    /// Parser using `config`'s prefix length, marker, and location prefixes.
    pub fn new(config: &'a ClassifierConfig) -> Self {
        Self { config }
    }

    /// Parse every line, preserving order and indices.
    pub fn parse_all(&self, lines: &[RawLine]) -> Vec<ParsedRow> {
        lines.iter().map(|line| self.parse(line)).collect()
    }

    /// Parse one line, keeping its index.
    pub fn parse(&self, line: &RawLine) -> ParsedRow {
        ParsedRow {
            index: line.index,
            kind: self.row_kind(&line.text),
        }
    }

    fn row_kind(&self, text: &str) -> RowKind {
        let has_prefix = has_code_prefix(text, self.config.prefix_digits);
        match find_time_token(text) {
            Some(token) => {
                if has_prefix || text.contains(self.config.restricted_marker) {
                    RowKind::Timestamped(TimestampedFields {
                        time: parse_time_token(token),
                        pallet_size: pallet_size(text),
                        location_restricted: self.ends_in_location_code(text),
                    })
                } else {
                    RowKind::Plain
                }
            }
            None if has_prefix => trailing_quantities(text)
                .map(RowKind::Quantity)
                .unwrap_or(RowKind::Plain),
            None => RowKind::Plain,
        }
    }

    /// True when the final token is a bare location code: digits, or a
    /// configured letter prefix followed by digits (`D12`, `T4`).
    fn ends_in_location_code(&self, text: &str) -> bool {
        let Some(tokens) = split_trailing_tokens(text, 1) else {
            return false;
        };
        let token = tokens[0];
        let digits = match token.chars().next() {
            Some(first) if self.config.location_prefixes.contains(&first) => {
                &token[first.len_utf8()..]
            }
            _ => token,
        };
        is_unsigned_integer(digits)
    }
}

/// True when the line (after leading whitespace) opens with `digits` ASCII digits.
pub fn has_code_prefix(text: &str, digits: usize) -> bool {
    let trimmed = text.trim_start();
    trimmed.len() >= digits && trimmed.as_bytes()[..digits].iter().all(u8::is_ascii_digit)
}

/// Read the three whitespace-separated trailing integers of a quantity line.
///
/// Each integer must be preceded by whitespace; values that overflow
/// [`CaseCount`] make the line unclassifiable.
pub fn trailing_quantities(text: &str) -> Option<QuantityFields> {
    let tokens = split_trailing_tokens(text, QUANTITY_FIELDS)?;
    let mut values = [0 as CaseCount; QUANTITY_FIELDS];
    for (slot, token) in values.iter_mut().zip(tokens) {
        if !is_unsigned_integer(token) {
            return None;
        }
        *slot = token.parse::<CaseCount>().ok()?;
    }
    let [ordered, received, difference] = values;
    Some(QuantityFields {
        ordered,
        received,
        difference,
    })
}

/// Pallet size of a movement row: the second-to-last word token, when numeric.
pub fn pallet_size(text: &str) -> Option<CaseCount> {
    let words: Vec<&str> = text
        .split(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .filter(|word| !word.is_empty())
        .collect();
    if words.len() < 2 {
        return None;
    }
    let candidate = words[words.len() - 2];
    if !is_unsigned_integer(candidate) {
        return None;
    }
    candidate.parse::<CaseCount>().ok()
}

/// Peel `count` whitespace-separated tokens off the end of `text`.
///
/// Returns the tokens in line order, or `None` when a token is not preceded by
/// whitespace.
fn split_trailing_tokens(text: &str, count: usize) -> Option<Vec<&str>> {
    let mut rest = text.trim_end();
    let mut tokens = Vec::with_capacity(count);
    for _ in 0..count {
        let split_at = rest
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map(|(pos, ch)| pos + ch.len_utf8())?;
        tokens.push(&rest[split_at..]);
        rest = rest[..split_at].trim_end();
    }
    tokens.reverse();
    Some(tokens)
}

fn is_unsigned_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn parse(text: &str) -> ParsedRow {
        let config = ClassifierConfig::default();
        LineParser::new(&config).parse(&RawLine::new(0, text))
    }

    #[test]
    fn recognizes_quantity_lines() {
        let row = parse("123456  WidgetA  02/01  070124  48 50 2");
        assert!(row.is_quantity_line());
        assert!(!row.is_timestamped_line());
        assert_eq!(row.ordered_qty(), Some(48));
        assert_eq!(row.received_qty(), Some(50));
        assert_eq!(row.diff_qty(), Some(2));
        assert_eq!(row.timestamp(), None);
    }

    #[test]
    fn quantity_line_needs_prefix_three_integers_and_no_time() {
        assert!(!parse("WidgetA 070124 48 50 2").is_quantity_line());
        assert!(!parse("123456 WidgetA 50 2").is_quantity_line());
        assert!(!parse("123456 WidgetA 48 50 2x").is_quantity_line());
        assert!(!parse("123456 WidgetA 48 50 99999999999").is_quantity_line());
        // A time token turns the row into a timestamped one.
        assert!(parse("123456 WidgetA 10:05 48 50 2").is_timestamped_line());
        // Leading whitespace before the code is allowed.
        assert!(parse("   123456 WidgetA 48 50 2   ").is_quantity_line());
    }

    #[test]
    fn recognizes_timestamped_lines_by_prefix_or_marker() {
        let row = parse("123457  FE3VER9U  02/01  10:05  48  DOCK");
        assert!(row.is_timestamped_line());
        assert_eq!(row.timestamp(), NaiveTime::from_hms_opt(10, 5, 0));
        assert_eq!(row.pallet_size(), Some(48));
        assert!(!row.location_restricted());

        let marked = parse("  !  FE3VER9U  02/01  9:40  54  DOCK");
        assert!(marked.is_timestamped_line());
        assert_eq!(marked.timestamp(), NaiveTime::from_hms_opt(9, 40, 0));

        let bare = parse("Printed at 10:05");
        assert_eq!(bare.kind, RowKind::Plain);
    }

    #[test]
    fn malformed_time_is_timestamped_without_time() {
        let row = parse("123457  FE3VER9U  02/01  27:65  48  DOCK");
        assert!(row.is_timestamped_line());
        assert_eq!(row.timestamp(), None);
    }

    #[test]
    fn detects_location_restricted_rows() {
        assert!(parse("123457  FE3VER9U  10:05  48  D12").location_restricted());
        assert!(parse("123457  FE3VER9U  10:05  48  T4").location_restricted());
        assert!(parse("123457  FE3VER9U  10:05  48  305").location_restricted());
        assert!(!parse("123457  FE3VER9U  10:05  48  X12").location_restricted());
        assert!(!parse("123457  FE3VER9U  10:05  48  D").location_restricted());
        // Quantity lines end in digits but are never location restricted.
        assert!(!parse("123456  WidgetA  48 50 2").location_restricted());
    }

    #[test]
    fn custom_location_prefixes_apply() {
        let config = ClassifierConfig::default().with_location_prefixes(['R']);
        let parser = LineParser::new(&config);
        let row = parser.parse(&RawLine::new(4, "123457  FE3VER9U  10:05  48  R7"));
        assert_eq!(row.index, 4);
        assert!(row.location_restricted());
        let row = parser.parse(&RawLine::new(5, "123457  FE3VER9U  10:05  48  D7"));
        assert!(!row.location_restricted());
    }

    #[test]
    fn pallet_size_uses_second_to_last_word() {
        assert_eq!(pallet_size("123457 FE3VER9U 10:05 49 D12"), Some(49));
        assert_eq!(pallet_size("123457 WidgetA 02/01 10:05"), Some(10));
        assert_eq!(pallet_size("123457 FE3VER9U 10:05 A1 D12"), None);
        assert_eq!(pallet_size("single"), None);
    }

    #[test]
    fn code_prefix_requires_enough_digits() {
        assert!(has_code_prefix("123456 rest", 6));
        assert!(has_code_prefix("  1234567", 6));
        assert!(!has_code_prefix("12345 rest", 6));
        assert!(!has_code_prefix("", 6));
    }

    #[test]
    fn parse_all_preserves_indices() {
        let config = ClassifierConfig::default();
        let lines = vec![
            RawLine::new(0, "header"),
            RawLine::new(1, "123456  WidgetA  48 50 2"),
            RawLine::new(2, "123457  FE3VER9U  10:05  48  DOCK"),
        ];
        let rows = LineParser::new(&config).parse_all(&lines);
        let indices: Vec<usize> = rows.iter().map(|row| row.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(rows[0].kind, RowKind::Plain);
    }
}
