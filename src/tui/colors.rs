//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::severity::Severity;

/// Focused field border
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// LOW cards
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// HIGH cards and alert modals
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Status bar while a request is in flight
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Card colour for a severity.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => DARK_RED,
        Severity::Medium => GOLD,
        Severity::Low => DARK_GREEN,
    }
}

/// Readable text colour on top of `bg`.
pub fn text_on(bg: Color) -> Color {
    match bg {
        GOLD => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_severity_has_distinct_colour() {
        let high = severity_color(Severity::High);
        let medium = severity_color(Severity::Medium);
        let low = severity_color(Severity::Low);
        assert_ne!(high, medium);
        assert_ne!(medium, low);
        assert_ne!(high, low);
    }

    #[test]
    fn test_dark_text_on_gold() {
        assert_eq!(text_on(GOLD), Color::Rgb(20, 20, 20));
        assert_eq!(text_on(DARK_RED), Color::White);
    }
}
