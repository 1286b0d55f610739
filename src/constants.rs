/// Constants describing the fixed-format report row shapes.
pub mod parser {
    /// Number of leading digits that open a quantity or timestamped row.
    pub const PREFIX_DIGITS: usize = 6;
    /// Marker that makes a time-bearing row count as timestamped without the digit prefix.
    pub const RESTRICTED_MARKER: char = '!';
    /// Letter prefixes accepted on a trailing location code (`D12`, `T4`).
    pub const LOCATION_PREFIXES: [char; 2] = ['D', 'T'];
    /// Number of trailing integers carried by a quantity line (ordered, received, difference).
    pub const QUANTITY_FIELDS: usize = 3;
    /// Max digits before the `:` of a time token (`H:MM` / `HH:MM`).
    pub const TIME_HOUR_DIGITS: usize = 2;
    /// Digits after the `:` of a time token.
    pub const TIME_MINUTE_DIGITS: usize = 2;
}

/// Constants used by priority assignment.
pub mod priority {
    /// Cases per layer; pallet sizes that are not a multiple of this are partial pallets.
    pub const FULL_PALLET_MULTIPLE: u32 = 6;
    /// Number of chronologically preceding neighbors considered (High + Medium).
    pub const BEFORE_NEIGHBORS: usize = 2;
    /// Number of chronologically following neighbors considered (Medium).
    pub const AFTER_NEIGHBORS: usize = 1;
}

/// Constants describing pallet inflow rows.
pub mod recirculation {
    /// Text preceding the move direction on a movement row.
    pub const MOVE_EVENT_PREFIX: &str = "Pallet Moved ";
    /// Direction recorded as an inflow (`Pallet Moved To`).
    pub const INFLOW_DIRECTION: &str = "To";
    /// Digits in a product code date.
    pub const CODE_DATE_DIGITS: usize = 6;
    /// Inflows needed before a pallet counts as recirculated.
    pub const MIN_CIRCULATIONS: usize = 2;
}

/// Constants used by the plain-text renderer.
pub mod render {
    /// Indentation applied to timestamped and acceptance rows.
    pub const DETAIL_INDENT: &str = "          ";
    /// Keyword identifying acceptance detail rows.
    pub const ACCEPTANCE_KEYWORD: &str = "Acceptance";
    /// Marker column width for tier labels.
    pub const TIER_LABEL_WIDTH: usize = 4;
    /// Marker written after the tier label for crossed rows.
    pub const CROSSED_MARKER: char = '~';
}

/// Constants used in console summaries and log prefixes.
pub mod summary {
    /// Label for the high-priority row.
    pub const HIGH_LABEL: &str = "[HIGH] likely mixed event occurrence";
    /// Label for medium-priority rows.
    pub const MEDIUM_LABEL: &str = "[MEDIUM] likely mixed pallet";
    /// Label for low-priority rows.
    pub const LOW_LABEL: &str = "[LOW] partial pallet in positive section";
    /// Label for crossed rows.
    pub const CROSSED_LABEL: &str = "[CROSSED] inaccessible location";
}
