//! WhatsApp plain-text export dialect.
//!
//! Lines look like `12/1/23, 9:05 AM - Alice: hello`: month-first date with
//! a two-digit year, 12-hour clock, then `sender: text`.

use super::{ParseError, TranscriptDialect};
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{2}), (\d{1,2}):(\d{2})\s?(AM|PM)\s?-\s?")
        .expect("timestamp regex")
});

// Sender is word characters and spaces only, up to the first ": ".
static SENDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([\w\s]+?):\s(.*)$").expect("sender regex"));

/// Parser dialect for WhatsApp chat exports.
pub struct WhatsAppDialect {
    name_str: String,
}

impl WhatsAppDialect {
    /// Creates a new WhatsAppDialect instance.
    pub fn new() -> Self {
        Self {
            name_str: "whatsapp".to_string(),
        }
    }
}

impl Default for WhatsAppDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptDialect for WhatsAppDialect {
    fn name(&self) -> &str {
        &self.name_str
    }

    fn timestamps(&self, raw: &str) -> Result<Vec<NaiveDateTime>, ParseError> {
        TIMESTAMP_PATTERN
            .captures_iter(raw)
            .map(|caps| parse_whatsapp_timestamp(&caps))
            .collect()
    }

    fn bodies<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        TIMESTAMP_PATTERN
            .split(raw)
            .skip(1)
            .map(strip_line_terminator)
            .collect()
    }

    fn decompose<'a>(&self, body: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = SENDER_PATTERN.captures(body)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

fn strip_line_terminator(body: &str) -> &str {
    match body.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => body,
    }
}

fn parse_whatsapp_timestamp(caps: &Captures<'_>) -> Result<NaiveDateTime, ParseError> {
    let raw = caps.get(0).map(|m| m.as_str().trim()).unwrap_or_default();
    let invalid = || ParseError::InvalidTimestamp(raw.to_string());
    let field = |idx: usize| -> Result<u32, ParseError> {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(invalid)
    };

    let month = field(1)?;
    let day = field(2)?;
    let year = expand_two_digit_year(field(3)?);
    let hour12 = field(4)?;
    let minute = field(5)?;
    let is_pm = caps.get(6).map(|m| m.as_str() == "PM").unwrap_or(false);

    if !(1..=12).contains(&hour12) {
        return Err(invalid());
    }
    let hour = match (hour12, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(invalid)
}

// POSIX %y pivot: 69-99 are 1900s, 00-68 are 2000s.
fn expand_two_digit_year(yy: u32) -> i32 {
    let yy = yy as i32;
    if yy >= 69 {
        1900 + yy
    } else {
        2000 + yy
    }
}
