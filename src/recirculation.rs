//! Pallet recirculation analysis.
//!
//! Movement reports also log every `Pallet Moved To` inflow. A pallet that
//! shows up more than once has circulated back through the system; this module
//! groups those moves per pallet and counts how often each circulation count
//! occurs over the report's time window.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::constants::recirculation::{
    CODE_DATE_DIGITS, INFLOW_DIRECTION, MIN_CIRCULATIONS, MOVE_EVENT_PREFIX,
};
use crate::data::{CaseCount, LineIndex, RawLine};
use crate::report::time_helpers::{find_time_token, parse_time_token};
use crate::types::LogMessage;

/// Month/day and clock time printed on a movement row (`MM/DD HH:MM`).
///
/// Reports carry no year, so ordering is month, then day, then time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MoveStamp {
    pub month: u32,
    pub day: u32,
    pub time: NaiveTime,
}

impl fmt::Display for MoveStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02} {}",
            self.month,
            self.day,
            self.time.format("%H:%M")
        )
    }
}

/// One `Pallet Moved To` row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PalletMove {
    pub line_index: LineIndex,
    /// Inflow location; inherited from the previous move when the row omits it.
    pub location: String,
    pub operator: String,
    pub pallet_id: String,
    pub product: String,
    pub description: String,
    pub code_date: String,
    pub cases: CaseCount,
    pub stamp: MoveStamp,
}

/// Every inflow of one pallet, in report order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PalletCirculation {
    pub pallet_id: String,
    pub moves: Vec<PalletMove>,
}

impl PalletCirculation {
    /// Number of times the pallet flowed in.
    pub fn circulations(&self) -> usize {
        self.moves.len()
    }
}

/// How many pallets circulated exactly `circulations` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CirculationBucket {
    pub circulations: usize,
    pub pallets: usize,
}

/// Flattened view of one recirculated move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CirculationRow<'a> {
    pub pallet_id: &'a str,
    pub product: &'a str,
    /// 1-based position of this move among the pallet's inflows.
    pub circulation_number: usize,
    pub location: &'a str,
    pub stamp: MoveStamp,
}

/// Result of one recirculation pass over a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecirculationReport {
    /// Inflow rows recognized, recirculated or not.
    pub total_moves: usize,
    /// Pallets with more than one inflow, most circulations first; ties keep
    /// the order in which pallets first appear.
    pub pallets: Vec<PalletCirculation>,
    /// Circulation counts ascending, each with the number of pallets.
    pub histogram: Vec<CirculationBucket>,
    /// Earliest inflow across all recognized rows.
    pub earliest: Option<MoveStamp>,
    /// Latest inflow across all recognized rows.
    pub latest: Option<MoveStamp>,
}

impl RecirculationReport {
    /// True when no pallet circulated more than once.
    pub fn is_empty(&self) -> bool {
        self.pallets.is_empty()
    }

    /// One row per move of every recirculated pallet, in `pallets` order.
    pub fn circulation_rows(&self) -> Vec<CirculationRow<'_>> {
        self.pallets
            .iter()
            .flat_map(|pallet| {
                pallet
                    .moves
                    .iter()
                    .enumerate()
                    .map(|(position, pallet_move)| CirculationRow {
                        pallet_id: &pallet.pallet_id,
                        product: &pallet_move.product,
                        circulation_number: position + 1,
                        location: &pallet_move.location,
                        stamp: pallet_move.stamp,
                    })
            })
            .collect()
    }
}

/// Parse a `Pallet Moved To` row.
///
/// Layout: `[location] operator Pallet Moved To pallet product description...
/// code_date cases MM/DD HH:MM`. A row printed without a location takes
/// `last_location` (empty when there is none). `Pallet Moved From` rows and
/// anything malformed yield `None`.
pub fn parse_pallet_move(line: &RawLine, last_location: Option<&str>) -> Option<PalletMove> {
    let (head, tail) = line.text.split_once(MOVE_EVENT_PREFIX)?;
    if !head.ends_with(char::is_whitespace) {
        return None;
    }
    let head_tokens: Vec<&str> = head.split_whitespace().collect();
    if !head_tokens.iter().all(|token| is_word(token)) {
        return None;
    }
    let (location, operator) = match head_tokens.as_slice() {
        [location, operator] => (*location, *operator),
        [operator] if head.starts_with(char::is_whitespace) => {
            (last_location.unwrap_or_default(), *operator)
        }
        _ => return None,
    };

    let tokens: Vec<&str> = tail.split_whitespace().collect();
    let [direction, pallet_id, product, rest @ ..] = tokens.as_slice() else {
        return None;
    };
    let [description @ .., code_date, cases, date, time] = rest else {
        return None;
    };
    if *direction != INFLOW_DIRECTION
        || !tail.starts_with(INFLOW_DIRECTION)
        || description.is_empty()
        || !is_word(pallet_id)
        || !is_word(product)
        || !is_digits(code_date, CODE_DATE_DIGITS)
    {
        return None;
    }
    let cases = cases
        .bytes()
        .all(|byte| byte.is_ascii_digit())
        .then(|| cases.parse::<CaseCount>().ok())
        .flatten()?;

    Some(PalletMove {
        line_index: line.index,
        location: location.to_string(),
        operator: operator.to_string(),
        pallet_id: pallet_id.to_string(),
        product: product.to_string(),
        description: description.join(" "),
        code_date: code_date.to_string(),
        cases,
        stamp: parse_stamp(date, time)?,
    })
}

/// Group inflow rows by pallet and keep the pallets that circulated more than once.
pub fn analyze_recirculation(lines: &[RawLine]) -> RecirculationReport {
    let mut by_pallet: IndexMap<String, Vec<PalletMove>> = IndexMap::new();
    let mut last_location: Option<String> = None;
    let mut report = RecirculationReport::default();

    for line in lines {
        let Some(pallet_move) = parse_pallet_move(line, last_location.as_deref()) else {
            continue;
        };
        let stamp = pallet_move.stamp;
        report.total_moves += 1;
        report.earliest = Some(report.earliest.map_or(stamp, |earliest| earliest.min(stamp)));
        report.latest = Some(report.latest.map_or(stamp, |latest| latest.max(stamp)));
        last_location = Some(pallet_move.location.clone());
        by_pallet
            .entry(pallet_move.pallet_id.clone())
            .or_default()
            .push(pallet_move);
    }
    debug!(
        "[blind_receiver:recirculation] {} inflow rows across {} pallets",
        report.total_moves,
        by_pallet.len()
    );

    report.pallets = by_pallet
        .into_iter()
        .filter(|(_, moves)| moves.len() >= MIN_CIRCULATIONS)
        .map(|(pallet_id, moves)| PalletCirculation { pallet_id, moves })
        .collect();
    report
        .pallets
        .sort_by(|left, right| right.circulations().cmp(&left.circulations()));

    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for pallet in &report.pallets {
        *counts.entry(pallet.circulations()).or_default() += 1;
    }
    report.histogram = counts
        .into_iter()
        .map(|(circulations, pallets)| CirculationBucket {
            circulations,
            pallets,
        })
        .collect();

    info!(
        "[blind_receiver:recirculation] {} pallets recirculated",
        report.pallets.len()
    );
    report
}

/// Console lines for a recirculation result.
pub fn describe_recirculation(report: &RecirculationReport) -> Vec<LogMessage> {
    let (Some(earliest), Some(latest)) = (report.earliest, report.latest) else {
        return vec!["No pallet inflow rows found.".to_string()];
    };
    let mut messages = vec![format!(
        "{} inflows from {earliest} to {latest}; {} pallets recirculated",
        report.total_moves,
        report.pallets.len()
    )];
    for bucket in &report.histogram {
        messages.push(format!(
            "{} circulations: {} pallets",
            bucket.circulations, bucket.pallets
        ));
    }
    for row in report.circulation_rows() {
        messages.push(format!(
            "{}  {}  #{}  {}  {}",
            row.pallet_id, row.product, row.circulation_number, row.location, row.stamp
        ));
    }
    messages
}

fn parse_stamp(date: &str, time: &str) -> Option<MoveStamp> {
    let (month, day) = date.split_once('/')?;
    if !is_digits(month, 2) || !is_digits(day, 2) {
        return None;
    }
    // HH:MM exactly; find_time_token alone would accept `H:MM`.
    if time.len() != 5 || find_time_token(time) != Some(time) {
        return None;
    }
    Some(MoveStamp {
        month: month.parse().ok()?,
        day: day.parse().ok()?,
        time: parse_time_token(time)?,
    })
}

fn is_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
}

fn is_digits(token: &str, len: usize) -> bool {
    token.len() == len && token.bytes().all(|byte| byte.is_ascii_digit())
}
