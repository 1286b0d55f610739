use chrono::NaiveTime;

use crate::constants::parser::{TIME_HOUR_DIGITS, TIME_MINUTE_DIGITS};

/// Find the first `H:MM` / `HH:MM` shaped substring in `line`.
///
/// Matches anywhere in the line (e.g. `123:45` yields `23:45`); trailing digits
/// after the minutes are ignored. Returns `None` when no colon is flanked by one
/// or two digits before and two digits after.
pub fn find_time_token(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    for (colon, _) in line.match_indices(':') {
        let minutes_end = colon + 1 + TIME_MINUTE_DIGITS;
        if minutes_end > bytes.len()
            || !bytes[colon + 1..minutes_end].iter().all(u8::is_ascii_digit)
        {
            continue;
        }
        let hour_digits = bytes[..colon]
            .iter()
            .rev()
            .take(TIME_HOUR_DIGITS)
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        if hour_digits == 0 {
            continue;
        }
        return Some(&line[colon - hour_digits..minutes_end]);
    }
    None
}

/// Parse a time token found by [`find_time_token`] into a clock time.
///
/// Returns `None` for out-of-range values such as `24:00` or `9:75`.
pub fn parse_time_token(token: &str) -> Option<NaiveTime> {
    let (hours, minutes) = token.split_once(':')?;
    let hours = hours.parse::<u32>().ok()?;
    let minutes = minutes.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Render a time the way reports print it (`H:MM`).
pub fn format_report_time(time: NaiveTime) -> String {
    time.format("%-H:%M").to_string()
}
