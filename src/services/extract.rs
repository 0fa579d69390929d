// src/services/extract.rs

//! Field extraction from the visible text of a listing card.
//!
//! All functions here are pure: they take the card text (fragments joined by
//! single spaces) and never touch the document tree.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

use crate::models::Compensation;

/// Location sentinel for remote listings.
pub const WORK_FROM_HOME: &str = "Work from home";

const RUPEE: char = '₹';

static PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?:,\s*[A-Z][a-zA-Z]+)*)\b").expect("valid place regex")
});

static POSTED_AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(day|week|month)s?\s+ago").expect("valid posted-ago regex")
});

static STIPEND_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)₹\s*([0-9,]+)\s*-\s*([0-9,]+)\s*/month").expect("valid stipend regex")
});

static STIPEND_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)₹\s*([0-9,]+)\s*/month").expect("valid stipend regex")
});

/// Location guessed from card text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationGuess {
    pub city: Option<String>,
    pub is_remote: bool,
}

/// Infer location and remote flag.
///
/// "work from home" anywhere in the text wins. Otherwise the last run of
/// capitalized words before the stipend marker is taken as the place.
pub fn parse_location(text: &str) -> LocationGuess {
    if text.to_lowercase().contains("work from home") {
        return LocationGuess {
            city: Some(WORK_FROM_HOME.to_string()),
            is_remote: true,
        };
    }

    let prefix = text.split(RUPEE).next().unwrap_or(text);
    let city = PLACE
        .captures_iter(prefix)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    LocationGuess {
        city,
        is_remote: false,
    }
}

/// Infer how long ago the listing was posted.
///
/// Months count as 30 days. `None` means the age is unknown.
pub fn parse_posted_ago(text: &str) -> Option<TimeDelta> {
    let text = text.to_lowercase();

    if text.contains("today") || text.contains("just now") {
        return Some(TimeDelta::zero());
    }
    if text.contains("yesterday") {
        return TimeDelta::try_days(1);
    }

    let caps = POSTED_AGO.captures(&text)?;
    let value: i64 = caps.get(1)?.as_str().parse().ok()?;
    let days_per_unit = match caps.get(2)?.as_str() {
        "day" => 1,
        "week" => 7,
        "month" => 30,
        _ => return None,
    };
    TimeDelta::try_days(value.checked_mul(days_per_unit)?)
}

/// Infer the monthly stipend, either a range or a single amount.
pub fn parse_stipend(text: &str) -> Option<Compensation> {
    if let Some(caps) = STIPEND_RANGE.captures(text) {
        let min = parse_amount(caps.get(1)?.as_str())?;
        let max = parse_amount(caps.get(2)?.as_str())?;
        return Some(Compensation::monthly_inr(min, max));
    }

    let caps = STIPEND_SINGLE.captures(text)?;
    let amount = parse_amount(caps.get(1)?.as_str())?;
    Some(Compensation::monthly_inr(amount, amount))
}

fn parse_amount(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}
