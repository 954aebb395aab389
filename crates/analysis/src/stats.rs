use crate::error::{AnalysisError, AnalysisResult};
use crate::grouping::{count_by, rank_descending};
use crate::nlp::{
    lowercase_tokens, EmojiClassifier, RegexUrlFinder, StopWords, UnicodeEmojiClassifier,
    UrlFinder,
};
use chatscope_core::config::AnalysisConfig;
use chatscope_core::{MessageRecord, Selection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Message, word, media, and link totals for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasicStats {
    /// Number of messages.
    pub messages: u64,
    /// Whitespace-separated words across non-media messages.
    pub words: u64,
    /// Messages that are exactly the media placeholder.
    pub media_messages: u64,
    /// URLs found across all messages.
    pub links: u64,
}

/// Share of the whole transcript sent by one sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderShare {
    /// Sender name.
    pub sender: String,
    /// Percentage of all messages, rounded to two decimals.
    pub percent: f64,
}

/// Most active senders and every sender's share.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BusiestSenders {
    /// Head of the ranking with raw message counts.
    pub top: Vec<(String, u64)>,
    /// Every sender's percentage, same order.
    pub shares: Vec<SenderShare>,
}

/// Message count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Year.
    pub year: i32,
    /// Month number, 1-12.
    pub month_number: u32,
    /// English month name.
    pub month_name: String,
    /// Display label, e.g. `December-2023`.
    pub label: String,
    /// Number of messages.
    pub messages: u64,
}

/// Message count for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Number of messages.
    pub messages: u64,
}

/// Day-name by hour-bucket message counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Heatmap {
    /// Day names, sorted.
    pub rows: Vec<String>,
    /// Hour-bucket labels, sorted.
    pub columns: Vec<String>,
    /// `cells[row][column]`; missing combinations are zero.
    pub cells: Vec<Vec<u64>>,
}

impl Heatmap {
    /// Count at a row and column label, zero when either is absent.
    pub fn get(&self, day: &str, bucket: &str) -> u64 {
        let row = self.rows.iter().position(|r| r == day);
        let col = self.columns.iter().position(|c| c == bucket);
        match (row, col) {
            (Some(r), Some(c)) => self
                .cells
                .get(r)
                .and_then(|cells| cells.get(c))
                .copied()
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Whether the heatmap has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Volume statistics, timelines, activity maps, and frequency tables.
pub struct StatsEngine {
    config: AnalysisConfig,
    urls: Box<dyn UrlFinder>,
    emoji: Box<dyn EmojiClassifier>,
    stopwords: StopWords,
}

impl StatsEngine {
    /// Create an engine with the default collaborators and the built-in English stop words.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            urls: Box::new(RegexUrlFinder::new()),
            emoji: Box::new(UnicodeEmojiClassifier::new()),
            stopwords: StopWords::english(),
        }
    }

    /// Replace the URL finder.
    pub fn with_url_finder(mut self, urls: Box<dyn UrlFinder>) -> Self {
        self.urls = urls;
        self
    }

    /// Replace the emoji classifier.
    pub fn with_emoji_classifier(mut self, emoji: Box<dyn EmojiClassifier>) -> Self {
        self.emoji = emoji;
        self
    }

    /// Replace the stop-word list.
    pub fn with_stopwords(mut self, stopwords: StopWords) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Engine settings.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn is_media(&self, record: &MessageRecord) -> bool {
        record.is_media_placeholder(&self.config.media_placeholder)
    }

    /// Message, word, media, and link totals.
    pub fn fetch_stats(&self, records: &[MessageRecord], selection: &Selection) -> BasicStats {
        let mut stats = BasicStats::default();
        for record in selection.filter(records) {
            stats.messages += 1;
            if self.is_media(record) {
                stats.media_messages += 1;
            } else {
                stats.words += record.text().split_whitespace().count() as u64;
            }
            stats.links += self.urls.find_urls(record.text()).len() as u64;
        }
        debug!("fetch_stats for {}: {:?}", selection, stats);
        stats
    }

    /// Top senders by message count and every sender's percentage share.
    ///
    /// Only defined for the `Overall` selection.
    pub fn busiest_senders(
        &self,
        records: &[MessageRecord],
        selection: &Selection,
    ) -> AnalysisResult<BusiestSenders> {
        if !selection.is_overall() {
            warn!("busiest senders requested for {}; only Overall is supported", selection);
            return Err(AnalysisError::InvalidSelection {
                analysis: "busiest senders",
                selection: selection.to_string(),
            });
        }

        let ranked = rank_descending(count_by(records, |r| r.sender().to_string()));
        let total = records.len() as f64;
        let shares = ranked
            .iter()
            .map(|(sender, count)| SenderShare {
                sender: sender.clone(),
                percent: round2(*count as f64 / total * 100.0),
            })
            .collect();
        let top = ranked.into_iter().take(self.config.top_senders).collect();

        Ok(BusiestSenders { top, shares })
    }

    /// Messages per calendar month, chronological.
    pub fn monthly_timeline(&self, records: &[MessageRecord], selection: &Selection) -> Vec<MonthlyPoint> {
        let mut points: Vec<MonthlyPoint> = count_by(selection.filter(records), |r| {
            (r.year(), r.month_number(), r.month_name())
        })
        .into_iter()
        .map(|((year, month_number, month_name), messages)| MonthlyPoint {
            year,
            month_number,
            month_name: month_name.to_string(),
            label: format!("{}-{}", month_name, year),
            messages,
        })
        .collect();
        points.sort_by_key(|p| (p.year, p.month_number));
        points
    }

    /// Messages per calendar date, chronological.
    pub fn daily_timeline(&self, records: &[MessageRecord], selection: &Selection) -> Vec<DailyPoint> {
        let mut points: Vec<DailyPoint> = count_by(selection.filter(records), |r| r.calendar_date())
            .into_iter()
            .map(|(date, messages)| DailyPoint { date, messages })
            .collect();
        points.sort_by_key(|p| p.date);
        points
    }

    /// Messages per day name, busiest first.
    pub fn week_activity_map(&self, records: &[MessageRecord], selection: &Selection) -> Vec<(String, u64)> {
        rank_descending(count_by(selection.filter(records), |r| r.day_name().to_string()))
    }

    /// Messages per month name, busiest first.
    pub fn month_activity_map(&self, records: &[MessageRecord], selection: &Selection) -> Vec<(String, u64)> {
        rank_descending(count_by(selection.filter(records), |r| r.month_name().to_string()))
    }

    /// Day-name by hour-bucket pivot of message counts.
    pub fn activity_heatmap(&self, records: &[MessageRecord], selection: &Selection) -> Heatmap {
        let counts: HashMap<(String, String), u64> = count_by(selection.filter(records), |r| {
            (r.day_name().to_string(), r.hour_bucket().to_string())
        })
        .into_iter()
        .collect();

        let rows: Vec<String> = counts
            .keys()
            .map(|(day, _)| day.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: Vec<String> = counts
            .keys()
            .map(|(_, bucket)| bucket.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let cells = rows
            .iter()
            .map(|day| {
                columns
                    .iter()
                    .map(|bucket| counts.get(&(day.clone(), bucket.clone())).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Heatmap { rows, columns, cells }
    }

    /// Most frequent words outside media messages, stop words removed.
    pub fn most_common_words(&self, records: &[MessageRecord], selection: &Selection) -> Vec<(String, u64)> {
        let mut ranked = self.word_frequencies(selection.filter(records).filter(|r| !self.is_media(r)));
        ranked.truncate(self.config.top_words);
        ranked
    }

    /// Full word-frequency table over every selected message, stop words removed.
    ///
    /// This is the input a word-cloud renderer consumes.
    pub fn word_cloud_frequencies(&self, records: &[MessageRecord], selection: &Selection) -> Vec<(String, u64)> {
        self.word_frequencies(selection.filter(records))
    }

    fn word_frequencies<'a>(&self, records: impl Iterator<Item = &'a MessageRecord>) -> Vec<(String, u64)> {
        let words = records
            .flat_map(|r| lowercase_tokens(r.text()))
            .filter(|w| !self.stopwords.is_stopword(w));
        rank_descending(count_by(words, |w| w.clone()))
    }

    /// Every emoji character with its count, most used first.
    pub fn emoji_frequency(&self, records: &[MessageRecord], selection: &Selection) -> Vec<(String, u64)> {
        let emoji = selection
            .filter(records)
            .flat_map(|r| r.text().chars())
            .filter(|c| self.emoji.is_emoji(*c));
        rank_descending(count_by(emoji, |c| c.to_string()))
    }
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
