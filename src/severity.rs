//! Score-to-severity classification.

/// Scores at or above this are high priority.
pub const HIGH_THRESHOLD: f64 = 120.0;
/// Scores at or above this (and below `HIGH_THRESHOLD`) are medium priority.
pub const MEDIUM_THRESHOLD: f64 = 80.0;

/// Severity band of a scored task. Ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Upper-case tag used in plain text output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

/// Map a score to its severity band. A missing score counts as 0.
///
/// Boundary values belong to the higher band: 120 is high, 80 is medium.
pub fn classify(score: Option<f64>) -> Severity {
    let score = score.unwrap_or(0.0);
    if score >= HIGH_THRESHOLD {
        Severity::High
    } else if score >= MEDIUM_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    }
}
