use chatscope_core::constants::{GROUP_NOTIFICATION, OVERALL};
use chatscope_core::MessageRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

mod whatsapp;

pub use whatsapp::WhatsAppDialect;

/// Errors that can occur during transcript parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO operation error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The transcript contains no recognizable timestamped line.
    #[error("Parse error: no recognizable timestamped lines in transcript")]
    NoTimestamps,
    /// Timestamp and body segmentation disagree.
    #[error("Malformed transcript: found {timestamps} timestamps but {bodies} message bodies")]
    MalformedTranscript {
        /// Number of timestamps recognized.
        timestamps: usize,
        /// Number of bodies split out.
        bodies: usize,
    },
    /// A recognized timestamp is not a real date or time.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Pattern pair describing one transcript export format.
///
/// Segmentation and sender decomposition are independent matchers so a
/// dialect can be swapped without touching record building.
pub trait TranscriptDialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &str;
    /// Timestamps of every recognized line, in source order.
    fn timestamps(&self, raw: &str) -> Result<Vec<NaiveDateTime>, ParseError>;
    /// Line bodies following each timestamp, preamble discarded.
    fn bodies<'a>(&self, raw: &'a str) -> Vec<&'a str>;
    /// Split a body into `(sender, text)`, or `None` for a notification.
    fn decompose<'a>(&self, body: &'a str) -> Option<(&'a str, &'a str)>;
}

/// Split a body into `(sender, text)` with the given dialect, falling back to
/// a group notification that keeps the whole body as its text.
pub fn decompose_body<'a>(dialect: &dyn TranscriptDialect, body: &'a str) -> (&'a str, &'a str) {
    dialect
        .decompose(body)
        .unwrap_or((GROUP_NOTIFICATION, body))
}

/// A parsed transcript: the ordered, immutable record sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    records: Vec<MessageRecord>,
    unrecognized: bool,
}

impl Transcript {
    /// Wrap an already built record sequence.
    pub fn from_records(records: Vec<MessageRecord>) -> Self {
        Self {
            records,
            unrecognized: false,
        }
    }

    fn unrecognized() -> Self {
        Self {
            records: Vec::new(),
            unrecognized: true,
        }
    }

    /// Records in transcript order.
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the transcript produced no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the input had content but no recognizable timestamped line.
    ///
    /// Distinguishes a foreign or corrupt export from a genuinely empty chat.
    pub fn is_unrecognized(&self) -> bool {
        self.unrecognized
    }

    /// Distinct human senders, sorted, without `group_notification`.
    pub fn senders(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| !r.is_notification())
            .map(|r| r.sender())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Selection menu: `Overall` followed by every sender.
    pub fn selection_options(&self) -> Vec<String> {
        let mut options = vec![OVERALL.to_string()];
        options.extend(self.senders());
        options
    }
}

/// Builds [`Transcript`]s from raw export text.
pub struct TranscriptParser {
    dialect: Box<dyn TranscriptDialect>,
}

impl TranscriptParser {
    /// Creates a parser for the WhatsApp export dialect.
    pub fn new() -> Self {
        Self::with_dialect(Box::new(WhatsAppDialect::new()))
    }

    /// Creates a parser for a custom dialect.
    pub fn with_dialect(dialect: Box<dyn TranscriptDialect>) -> Self {
        Self { dialect }
    }

    /// Returns the dialect name.
    pub fn dialect_name(&self) -> &str {
        self.dialect.name()
    }

    /// Parse a transcript.
    ///
    /// Input with content but no recognizable timestamp yields an empty
    /// transcript flagged by [`Transcript::is_unrecognized`]. Malformed
    /// segmentation and invalid timestamps are returned as errors.
    pub fn parse(&self, raw: &str) -> Result<Transcript, ParseError> {
        match self.build_records(raw) {
            Ok(records) => {
                info!(
                    "Parsed {} records with the {} dialect",
                    records.len(),
                    self.dialect.name()
                );
                Ok(Transcript::from_records(records))
            }
            Err(ParseError::NoTimestamps) if raw.trim().is_empty() => {
                debug!("Empty transcript input");
                Ok(Transcript::default())
            }
            Err(ParseError::NoTimestamps) => {
                warn!(
                    "No recognizable timestamped lines for the {} dialect; treating transcript as empty",
                    self.dialect.name()
                );
                Ok(Transcript::unrecognized())
            }
            Err(err) => Err(err),
        }
    }

    /// Read and parse a UTF-8 transcript file.
    pub fn parse_file(&self, path: &Path) -> Result<Transcript, ParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }

    /// Build records, reporting zero recognized lines as [`ParseError::NoTimestamps`].
    pub fn build_records(&self, raw: &str) -> Result<Vec<MessageRecord>, ParseError> {
        let timestamps = self.dialect.timestamps(raw)?;
        if timestamps.is_empty() {
            return Err(ParseError::NoTimestamps);
        }

        let bodies = self.dialect.bodies(raw);
        if bodies.len() != timestamps.len() {
            return Err(ParseError::MalformedTranscript {
                timestamps: timestamps.len(),
                bodies: bodies.len(),
            });
        }

        Ok(timestamps
            .into_iter()
            .zip(bodies)
            .map(|(timestamp, body)| {
                let (sender, text) = decompose_body(self.dialect.as_ref(), body);
                MessageRecord::new(timestamp, sender, text)
            })
            .collect())
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a transcript in the WhatsApp export dialect.
pub fn parse_transcript(raw: &str) -> Result<Transcript, ParseError> {
    TranscriptParser::new().parse(raw)
}
