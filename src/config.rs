use crate::constants::parser::{LOCATION_PREFIXES, PREFIX_DIGITS, RESTRICTED_MARKER};
use crate::constants::priority::FULL_PALLET_MULTIPLE;
use crate::errors::ReportError;

/// Tunables for row recognition and priority assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Leading-digit code length that marks quantity and timestamped rows.
    pub prefix_digits: usize,
    /// Alternate marker that makes a time-bearing row count as timestamped.
    pub restricted_marker: char,
    /// Pallet sizes not divisible by this are treated as partial pallets.
    pub full_pallet_multiple: u32,
    /// Letter prefixes accepted on a trailing location code.
    pub location_prefixes: Vec<char>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            prefix_digits: PREFIX_DIGITS,
            restricted_marker: RESTRICTED_MARKER,
            full_pallet_multiple: FULL_PALLET_MULTIPLE,
            location_prefixes: LOCATION_PREFIXES.to_vec(),
        }
    }
}

impl ClassifierConfig {
    /// Override the leading-digit code length.
    pub fn with_prefix_digits(mut self, prefix_digits: usize) -> Self {
        self.prefix_digits = prefix_digits;
        self
    }

    /// Override the restricted-access marker.
    pub fn with_restricted_marker(mut self, marker: char) -> Self {
        self.restricted_marker = marker;
        self
    }

    /// Override the full-pallet case multiple.
    pub fn with_full_pallet_multiple(mut self, multiple: u32) -> Self {
        self.full_pallet_multiple = multiple;
        self
    }

    /// Replace the accepted location-code letter prefixes.
    pub fn with_location_prefixes(mut self, prefixes: impl IntoIterator<Item = char>) -> Self {
        self.location_prefixes = prefixes.into_iter().collect();
        self
    }

    /// Reject settings that would make recognition or tiering meaningless.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.prefix_digits == 0 {
            return Err(ReportError::Configuration(
                "prefix_digits must be greater than zero".to_string(),
            ));
        }
        if self.full_pallet_multiple == 0 {
            return Err(ReportError::Configuration(
                "full_pallet_multiple must be greater than zero".to_string(),
            ));
        }
        if self.restricted_marker.is_ascii_digit() || self.restricted_marker.is_whitespace() {
            return Err(ReportError::Configuration(format!(
                "restricted_marker '{}' must not be a digit or whitespace",
                self.restricted_marker
            )));
        }
        Ok(())
    }
}
