//! Strategy catalogue for the prioritisation service.
//!
//! The service decides what a strategy means; the client only offers the
//! known names in its selector and passes whatever string it holds through
//! to the request unchanged.

/// Strategies the service is known to understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Smart,
    Deadline,
    Fastest,
    Impact,
}

impl Strategy {
    /// Selector order.
    pub const ALL: [Strategy; 4] = [
        Strategy::Smart,
        Strategy::Deadline,
        Strategy::Fastest,
        Strategy::Impact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Smart => "smart",
            Strategy::Deadline => "deadline",
            Strategy::Fastest => "fastest",
            Strategy::Impact => "impact",
        }
    }

    /// Short description shown next to the selector.
    pub fn description(self) -> &'static str {
        match self {
            Strategy::Smart => "balanced",
            Strategy::Deadline => "urgency heavy",
            Strategy::Fastest => "low effort heavy",
            Strategy::Impact => "importance heavy",
        }
    }

    pub fn from_name(name: &str) -> Option<Strategy> {
        Strategy::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Smart
    }
}

/// The selector step after `current`. Unknown names restart at the default.
pub fn next_strategy(current: &str) -> Strategy {
    match Strategy::from_name(current) {
        Some(s) => {
            let idx = Strategy::ALL.iter().position(|&x| x == s).unwrap_or(0);
            Strategy::ALL[(idx + 1) % Strategy::ALL.len()]
        }
        None => Strategy::default(),
    }
}
