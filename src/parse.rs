//! Lenient parsing helpers for raw form input.
//!
//! The form never rejects individual dependency tokens: anything that does not
//! read as an integer is dropped and the rest is kept. Numeric fields use the
//! same leading-integer rule, so "3h" reads as 3 and "2.5" as 2.

use chrono::{Datelike, Duration, NaiveDate};

/// Parse the leading integer of `s`.
///
/// Leading whitespace and a single sign are allowed; parsing stops at the
/// first non-digit. Returns `None` when no digit follows, or on `i64` overflow.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for ch in digits.chars() {
        let Some(d) = ch.to_digit(10) else { break };
        seen_digit = true;
        value = value.checked_mul(10)?.checked_add(i64::from(d))?;
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse a comma-separated dependency list into task ids.
///
/// Empty or absent input yields an empty list. Blank tokens and tokens that
/// are not integers are silently discarded, so the result may be shorter than
/// the number of comma-separated tokens.
pub fn parse_dependencies<'a>(raw: impl Into<Option<&'a str>>) -> Vec<i64> {
    let Some(raw) = raw.into() else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(parse_leading_int)
        .collect()
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday" / "this monday" / "next monday" (and three-letter forms)
/// - "weekend", "end of week" (eow), "end of month" (eom)
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "" => return None,
        "today" => return Some(today),
        "tomorrow" => return add_days(today, 1),
        "yesterday" => return add_days(today, -1),
        "end of week" | "eow" => return end_of_week(today),
        "end of month" | "eom" => return end_of_month(today),
        "this weekend" | "weekend" => {
            let until_saturday = (5 + 7 - weekday_index(today)) % 7;
            return add_days(today, until_saturday);
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        return parse_offset(rest.trim(), today);
    }

    let (next_week, day_name) = if let Some(rest) = s.strip_prefix("next ") {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix("this ") {
        (false, rest)
    } else {
        (false, s.as_str())
    };
    if let Some(target) = weekday_from_name(day_name) {
        let ahead = (target + 7 - weekday_index(today)) % 7;
        let days = if next_week { ahead + 7 } else { ahead };
        return add_days(today, days);
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Sunday of the ISO week containing `today`.
pub fn end_of_week(today: NaiveDate) -> Option<NaiveDate> {
    add_days(today, 6 - weekday_index(today))
}

/// `today` shifted by `days`, or `None` when the result is out of range.
fn add_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| today.checked_add_signed(delta))
}

fn end_of_month(today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).and_then(|first| first.pred_opt())
}

fn parse_offset(rest: &str, today: NaiveDate) -> Option<NaiveDate> {
    let unit = rest.chars().last()?;
    let amount: i64 = rest[..rest.len() - unit.len_utf8()].trim().parse().ok()?;
    match unit {
        'd' => add_days(today, amount),
        'w' => add_days(today, amount.checked_mul(7)?),
        // Months are approximated as 30 days.
        'm' => add_days(today, amount.checked_mul(30)?),
        _ => None,
    }
}

fn weekday_index(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_monday())
}

fn weekday_from_name(name: &str) -> Option<i64> {
    let index = match name {
        "monday" | "mon" => 0,
        "tuesday" | "tue" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(index)
}
