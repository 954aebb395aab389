use crate::constants::{GROUP_NOTIFICATION, MEDIA_OMITTED, OVERALL};
use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One structured message derived from a transcript line.
///
/// Calendar fields are computed from the timestamp when the record is built
/// and never change afterwards; there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    timestamp: NaiveDateTime,
    sender: String,
    text: String,
    year: i32,
    month_name: &'static str,
    month_number: u32,
    day_of_month: u32,
    day_name: &'static str,
    hour: u32,
    minute: u32,
    calendar_date: NaiveDate,
    hour_bucket: String,
}

impl MessageRecord {
    /// Build a record and derive its calendar fields.
    pub fn new(timestamp: NaiveDateTime, sender: impl Into<String>, text: impl Into<String>) -> Self {
        let hour = timestamp.hour();
        Self {
            sender: sender.into(),
            text: text.into(),
            year: timestamp.year(),
            month_name: month_name(timestamp.month()),
            month_number: timestamp.month(),
            day_of_month: timestamp.day(),
            day_name: day_name(timestamp.weekday()),
            hour,
            minute: timestamp.minute(),
            calendar_date: timestamp.date(),
            hour_bucket: hour_bucket_label(hour),
            timestamp,
        }
    }

    /// Build a system record with no identifiable sender.
    pub fn notification(timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self::new(timestamp, GROUP_NOTIFICATION, text)
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// English month name, e.g. `"December"`.
    pub fn month_name(&self) -> &'static str {
        self.month_name
    }

    pub fn month_number(&self) -> u32 {
        self.month_number
    }

    pub fn day_of_month(&self) -> u32 {
        self.day_of_month
    }

    /// English weekday name, e.g. `"Friday"`.
    pub fn day_name(&self) -> &'static str {
        self.day_name
    }

    /// Hour on the 24-hour clock.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn calendar_date(&self) -> NaiveDate {
        self.calendar_date
    }

    /// Hour window label used for heatmap columns.
    pub fn hour_bucket(&self) -> &str {
        &self.hour_bucket
    }

    /// Whether the line had no `sender: text` prefix.
    pub fn is_notification(&self) -> bool {
        self.sender == GROUP_NOTIFICATION
    }

    /// Whether the text is exactly the given media placeholder.
    pub fn is_media_placeholder(&self, placeholder: &str) -> bool {
        self.text == placeholder
    }

    /// Whether the text is the default `<Media omitted>` placeholder.
    pub fn is_media(&self) -> bool {
        self.is_media_placeholder(MEDIA_OMITTED)
    }
}

/// Label for the hour window starting at `hour`.
///
/// Midnight and the last hour of the day wrap as `"00-1"` and `"23-00"`;
/// every other hour is rendered unpadded, e.g. `"9-10"`.
pub fn hour_bucket_label(hour: u32) -> String {
    match hour {
        0 => "00-1".to_string(),
        23 => "23-00".to_string(),
        h => format!("{}-{}", h, h + 1),
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Sender filter applied before every analytic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    /// All senders, no filtering.
    #[default]
    Overall,
    /// A single sender by display name.
    User(String),
}

impl Selection {
    /// Create a selection for a single sender.
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    pub fn is_overall(&self) -> bool {
        matches!(self, Self::Overall)
    }

    /// Whether a record from `sender` belongs to this selection.
    pub fn matches(&self, sender: &str) -> bool {
        match self {
            Self::Overall => true,
            Self::User(name) => name == sender,
        }
    }

    /// Records belonging to this selection, in transcript order.
    pub fn filter<'a>(
        &'a self,
        records: &'a [MessageRecord],
    ) -> impl Iterator<Item = &'a MessageRecord> + 'a {
        records.iter().filter(move |r| self.matches(r.sender()))
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        if value == OVERALL {
            Self::Overall
        } else {
            Self::User(value.to_string())
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == OVERALL {
            Self::Overall
        } else {
            Self::User(value)
        }
    }
}

impl From<Selection> for String {
    fn from(value: Selection) -> Self {
        value.to_string()
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overall => f.write_str(OVERALL),
            Self::User(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .expect("valid test timestamp")
    }

    #[test]
    fn hour_bucket_wraps_at_midnight_and_last_hour() {
        assert_eq!(hour_bucket_label(0), "00-1");
        assert_eq!(hour_bucket_label(23), "23-00");
        assert_eq!(hour_bucket_label(14), "14-15");
        assert_eq!(hour_bucket_label(9), "9-10");
    }

    #[test]
    fn record_derives_calendar_fields_from_timestamp() {
        let record = MessageRecord::new(at(2023, 12, 1, 21, 5), "Alice", "hello");
        assert_eq!(record.year(), 2023);
        assert_eq!(record.month_name(), "December");
        assert_eq!(record.month_number(), 12);
        assert_eq!(record.day_of_month(), 1);
        assert_eq!(record.day_name(), "Friday");
        assert_eq!(record.hour(), 21);
        assert_eq!(record.minute(), 5);
        assert_eq!(record.calendar_date(), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(record.hour_bucket(), "21-22");
        assert!(!record.is_notification());
    }

    #[test]
    fn notification_records_use_reserved_sender() {
        let record = MessageRecord::notification(at(2024, 1, 7, 0, 30), "Bob joined");
        assert_eq!(record.sender(), GROUP_NOTIFICATION);
        assert!(record.is_notification());
        assert_eq!(record.day_name(), "Sunday");
        assert_eq!(record.hour_bucket(), "00-1");
    }

    #[test]
    fn media_placeholder_is_exact_match() {
        let media = MessageRecord::new(at(2023, 1, 1, 10, 0), "Alice", MEDIA_OMITTED);
        let quoted = MessageRecord::new(at(2023, 1, 1, 10, 0), "Alice", "<Media omitted> lol");
        assert!(media.is_media());
        assert!(!quoted.is_media());
    }

    #[test]
    fn selection_parses_overall_keyword() {
        assert_eq!(Selection::from("Overall"), Selection::Overall);
        assert_eq!(Selection::from("Alice"), Selection::user("Alice"));
        assert_eq!(Selection::user("Alice").to_string(), "Alice");
        assert_eq!(Selection::Overall.to_string(), OVERALL);
    }

    #[test]
    fn selection_filters_by_sender() {
        let records = vec![
            MessageRecord::new(at(2023, 1, 1, 10, 0), "Alice", "a"),
            MessageRecord::new(at(2023, 1, 1, 10, 1), "Bob", "b"),
            MessageRecord::new(at(2023, 1, 1, 10, 2), "Alice", "c"),
        ];
        let alice = Selection::user("Alice");
        let texts: Vec<&str> = alice.filter(&records).map(|r| r.text()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert_eq!(Selection::Overall.filter(&records).count(), 3);
    }
}
