use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, GiveawayError, Result};

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(
        r"^(?:(?P<days>\d+)\s*d)?\s*(?:(?P<hours>\d+)\s*h)?\s*(?:(?P<minutes>\d+)\s*m(?:in)?)?$"
    )
    .unwrap();
}

const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

#[readonly::make]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ParsedDuration {
    pub minutes: u64,
}

impl ParsedDuration {
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.minutes * SECONDS_PER_MINUTE)
    }
}

// Parses a giveaway duration. A plain number is read as minutes, otherwise
// `d`, `h` and `m` units can be combined in that order (e.g. `1d12h`, `1h30m`).
pub fn parse_duration(text: &str) -> Result<ParsedDuration> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Err(invalid_duration(&text));
    }

    let minutes = match text.chars().all(|c| c.is_ascii_digit()) {
        true => text.parse::<u64>().map_err(|_| invalid_duration(&text))?,
        false => {
            let captures = DURATION_REGEX
                .captures(&text)
                .ok_or_else(|| invalid_duration(&text))?;

            let mut total: u64 = 0;
            for (group, multiplier) in [
                ("days", MINUTES_PER_DAY),
                ("hours", MINUTES_PER_HOUR),
                ("minutes", 1),
            ] {
                if let Some(value) = captures.name(group) {
                    let value = value
                        .as_str()
                        .parse::<u64>()
                        .map_err(|_| invalid_duration(&text))?;
                    total = value
                        .checked_mul(multiplier)
                        .and_then(|minutes| total.checked_add(minutes))
                        .ok_or_else(|| invalid_duration(&text))?;
                }
            }
            total
        }
    };

    if minutes < 1 {
        let message = "Duration must be at least 1 minute.".to_string();
        return Err(Error::from(GiveawayError::Validation(message)));
    }

    if minutes.checked_mul(SECONDS_PER_MINUTE).is_none() {
        return Err(invalid_duration(&text));
    }

    Ok(ParsedDuration { minutes })
}

fn invalid_duration(text: &str) -> Error {
    let message = format!(
        "Can't read the duration `{}`. Use minutes (`30`) or units like `1h30m`.",
        text
    );
    Error::from(GiveawayError::Validation(message))
}
