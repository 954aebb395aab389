//! Reserved values and analysis defaults.

/// Sender assigned to lines that carry no `sender: text` prefix.
pub const GROUP_NOTIFICATION: &str = "group_notification";

/// Selection label meaning "all senders".
pub const OVERALL: &str = "Overall";

/// Placeholder text the export writes in place of attachments.
pub const MEDIA_OMITTED: &str = "<Media omitted>";

/// Compound score at or above which a message is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which a message is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Number of entries in the common-words table.
pub const DEFAULT_TOP_WORDS: usize = 20;

/// Number of senders in the busiest-senders head.
pub const DEFAULT_TOP_SENDERS: usize = 5;

/// Number of messages returned by extreme-sentiment queries.
pub const DEFAULT_EXTREME_MESSAGES: usize = 5;

/// Character limit for message text in extreme-sentiment results.
pub const DEFAULT_TRUNCATE_CHARS: usize = 200;

/// Suffix appended to truncated message text.
pub const TRUNCATION_MARKER: &str = "...";
