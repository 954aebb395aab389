use crate::grouping::{group_by, mean_by};
use chatscope_core::config::AnalysisConfig;
use chatscope_core::constants::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, TRUNCATION_MARKER};
use chatscope_core::{MessageRecord, Selection};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Per-message polarity scores produced by a [`SentimentScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Proportion of positive signal, in `[0, 1]`.
    pub positive: f64,
    /// Proportion of negative signal, in `[0, 1]`.
    pub negative: f64,
    /// Proportion of neutral signal, in `[0, 1]`.
    pub neutral: f64,
    /// Normalized overall polarity, in `[-1, 1]`.
    pub compound: f64,
}

impl SentimentScore {
    /// Create a score from its four components.
    pub fn new(positive: f64, negative: f64, neutral: f64, compound: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
            compound,
        }
    }

    /// Polarity class of this score.
    pub fn class(&self) -> SentimentClass {
        SentimentClass::classify(self.compound)
    }
}

/// Scores the sentiment of a single message.
pub trait SentimentScorer: Send + Sync {
    /// Polarity scores for `text`.
    fn polarity_scores(&self, text: &str) -> SentimentScore;
}

/// Three-way polarity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    /// Compound at or above `0.05`.
    Positive,
    /// Compound at or below `-0.05`.
    Negative,
    /// Compound strictly inside the dead band.
    Neutral,
}

impl SentimentClass {
    /// Classify a compound score. The `±0.05` dead band is fixed.
    pub fn classify(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => f.write_str("positive"),
            Self::Negative => f.write_str("negative"),
            Self::Neutral => f.write_str("neutral"),
        }
    }
}

/// Direction for extreme-message extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Highest compound scores first.
    Positive,
    /// Lowest compound scores first.
    Negative,
}

/// An eligible message together with its score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMessage<'a> {
    /// The scored record.
    pub record: &'a MessageRecord,
    /// Its polarity scores.
    pub score: SentimentScore,
}

impl ScoredMessage<'_> {
    /// Message text.
    pub fn text(&self) -> &str {
        self.record.text()
    }

    /// Sender name.
    pub fn sender(&self) -> &str {
        self.record.sender()
    }

    /// Message timestamp.
    pub fn timestamp(&self) -> chrono::NaiveDateTime {
        self.record.timestamp()
    }
}

/// Class distribution and mean scores over the eligible subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Percentage of positive messages.
    pub positive: f64,
    /// Percentage of negative messages.
    pub negative: f64,
    /// Percentage of neutral messages.
    pub neutral: f64,
    /// Mean positive proportion.
    pub avg_positive: f64,
    /// Mean negative proportion.
    pub avg_negative: f64,
    /// Mean neutral proportion.
    pub avg_neutral: f64,
    /// Mean compound score.
    pub avg_sentiment: f64,
}

impl SentimentSummary {
    /// Summary for an empty eligible subset: everything neutral, zero means.
    pub fn neutral_default() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 100.0,
            avg_positive: 0.0,
            avg_negative: 0.0,
            avg_neutral: 0.0,
            avg_sentiment: 0.0,
        }
    }
}

/// Mean compound score for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Mean compound score of that date's eligible messages.
    pub sentiment_score: f64,
}

/// A message with an extreme compound score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeMessage {
    /// Message text, truncated with a `...` marker when too long.
    pub text: String,
    /// Compound score.
    pub compound: f64,
}

/// Sentiment aggregates for one sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSentiment {
    /// Sender name.
    pub sender: String,
    /// Mean compound score.
    pub avg_sentiment: f64,
    /// Eligible messages from this sender.
    pub message_count: u64,
    /// Messages classified positive.
    pub positive_messages: u64,
    /// Messages classified negative.
    pub negative_messages: u64,
    /// Messages classified neutral.
    pub neutral_messages: u64,
}

/// Scores eligible messages and derives sentiment analytics.
pub struct SentimentEngine {
    scorer: Box<dyn SentimentScorer>,
    media_placeholder: String,
    truncate_chars: usize,
}

impl SentimentEngine {
    /// Create an engine with default settings.
    pub fn new(scorer: Box<dyn SentimentScorer>) -> Self {
        Self::with_config(scorer, &AnalysisConfig::default())
    }

    /// Create an engine using the media placeholder and truncation limit from `config`.
    pub fn with_config(scorer: Box<dyn SentimentScorer>, config: &AnalysisConfig) -> Self {
        Self {
            scorer,
            media_placeholder: config.media_placeholder.clone(),
            truncate_chars: config.truncate_chars,
        }
    }

    /// Whether a record takes part in sentiment analysis.
    ///
    /// Media placeholders, notifications, and whitespace-only text are excluded.
    pub fn is_eligible(&self, record: &MessageRecord) -> bool {
        !record.is_media_placeholder(&self.media_placeholder)
            && !record.is_notification()
            && !record.text().trim().is_empty()
    }

    /// Score every eligible record of the selection, once each, in transcript order.
    pub fn scored_messages<'a>(
        &self,
        records: &'a [MessageRecord],
        selection: &Selection,
    ) -> Vec<ScoredMessage<'a>> {
        let scored: Vec<ScoredMessage<'a>> = records
            .iter()
            .filter(|r| selection.matches(r.sender()) && self.is_eligible(r))
            .map(|record| ScoredMessage {
                record,
                score: self.scorer.polarity_scores(record.text()),
            })
            .collect();
        debug!("scored {} eligible messages for {}", scored.len(), selection);
        scored
    }

    /// Class distribution and mean scores for the selection.
    pub fn sentiment_summary(&self, records: &[MessageRecord], selection: &Selection) -> SentimentSummary {
        summarize(&self.scored_messages(records, selection))
    }

    /// Mean compound score per calendar date for the selection.
    pub fn sentiment_timeline(&self, records: &[MessageRecord], selection: &Selection) -> Vec<SentimentPoint> {
        timeline(&self.scored_messages(records, selection))
    }

    /// The `n` most positive or most negative messages of the selection.
    pub fn extreme_messages(
        &self,
        records: &[MessageRecord],
        selection: &Selection,
        polarity: Polarity,
        n: usize,
    ) -> Vec<ExtremeMessage> {
        extremes(&self.scored_messages(records, selection), polarity, n, self.truncate_chars)
    }

    /// Per-sender aggregates over every sender, best mean first.
    pub fn sentiment_by_user(&self, records: &[MessageRecord]) -> Vec<UserSentiment> {
        by_user(&self.scored_messages(records, &Selection::Overall))
    }

    /// Character limit applied to extreme-message text.
    pub fn truncate_chars(&self) -> usize {
        self.truncate_chars
    }
}

/// Class distribution and mean scores of already scored messages.
pub fn summarize(scored: &[ScoredMessage<'_>]) -> SentimentSummary {
    if scored.is_empty() {
        return SentimentSummary::neutral_default();
    }

    let n = scored.len() as f64;
    let mut positive = 0u64;
    let mut negative = 0u64;
    let mut neutral = 0u64;
    let mut totals = SentimentScore::default();

    for item in scored {
        match item.score.class() {
            SentimentClass::Positive => positive += 1,
            SentimentClass::Negative => negative += 1,
            SentimentClass::Neutral => neutral += 1,
        }
        totals.positive += item.score.positive;
        totals.negative += item.score.negative;
        totals.neutral += item.score.neutral;
        totals.compound += item.score.compound;
    }

    SentimentSummary {
        positive: positive as f64 / n * 100.0,
        negative: negative as f64 / n * 100.0,
        neutral: neutral as f64 / n * 100.0,
        avg_positive: totals.positive / n,
        avg_negative: totals.negative / n,
        avg_neutral: totals.neutral / n,
        avg_sentiment: totals.compound / n,
    }
}

/// Mean compound score per calendar date, chronological.
pub fn timeline(scored: &[ScoredMessage<'_>]) -> Vec<SentimentPoint> {
    let mut points: Vec<SentimentPoint> = mean_by(
        scored,
        |item| item.record.calendar_date(),
        |item| item.score.compound,
    )
    .into_iter()
    .map(|(date, sentiment_score)| SentimentPoint {
        date,
        sentiment_score,
    })
    .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// The `n` highest (positive) or lowest (negative) compound scores.
///
/// Ties keep transcript order.
pub fn extremes(
    scored: &[ScoredMessage<'_>],
    polarity: Polarity,
    n: usize,
    truncate_chars: usize,
) -> Vec<ExtremeMessage> {
    let mut ranked: Vec<&ScoredMessage<'_>> = scored.iter().collect();
    match polarity {
        Polarity::Positive => ranked.sort_by(|a, b| b.score.compound.total_cmp(&a.score.compound)),
        Polarity::Negative => ranked.sort_by(|a, b| a.score.compound.total_cmp(&b.score.compound)),
    }

    ranked
        .into_iter()
        .take(n)
        .map(|item| ExtremeMessage {
            text: truncate_text(item.record.text(), truncate_chars),
            compound: item.score.compound,
        })
        .collect()
}

/// Per-sender aggregates, sorted by mean compound descending.
pub fn by_user(scored: &[ScoredMessage<'_>]) -> Vec<UserSentiment> {
    let mut users: Vec<UserSentiment> = group_by(scored, |item| item.record.sender().to_string())
        .into_iter()
        .map(|(sender, items)| {
            let scores: Vec<f64> = items.iter().map(|item| item.score.compound).collect();
            let count = |class: SentimentClass| {
                scores
                    .iter()
                    .filter(|&&s| SentimentClass::classify(s) == class)
                    .count() as u64
            };
            UserSentiment {
                avg_sentiment: scores.iter().sum::<f64>() / scores.len() as f64,
                message_count: scores.len() as u64,
                positive_messages: count(SentimentClass::Positive),
                negative_messages: count(SentimentClass::Negative),
                neutral_messages: count(SentimentClass::Neutral),
                sender,
            }
        })
        .collect();
    users.sort_by(|a, b| b.avg_sentiment.total_cmp(&a.avg_sentiment));
    users
}

/// Cut `text` to `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &text[..idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscope_core::constants::{GROUP_NOTIFICATION, MEDIA_OMITTED};
    use std::collections::HashMap;

    /// Scorer returning a fixed compound per text, zero otherwise.
    struct TableScorer(HashMap<&'static str, f64>);

    impl TableScorer {
        fn new(entries: &[(&'static str, f64)]) -> Self {
            Self(entries.iter().copied().collect())
        }
    }

    impl SentimentScorer for TableScorer {
        fn polarity_scores(&self, text: &str) -> SentimentScore {
            let compound = self.0.get(text).copied().unwrap_or(0.0);
            let positive = compound.max(0.0);
            let negative = (-compound).max(0.0);
            SentimentScore::new(positive, negative, 1.0 - positive - negative, compound)
        }
    }

    fn record(day: u32, sender: &str, text: &str) -> MessageRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid timestamp");
        MessageRecord::new(ts, sender, text)
    }

    fn fixture() -> Vec<MessageRecord> {
        vec![
            record(1, "Alice", "great"),
            record(1, "Bob", "awful"),
            record(2, "Alice", "fine"),
            record(2, "Bob", MEDIA_OMITTED),
            record(2, GROUP_NOTIFICATION, "great"),
            record(3, "Bob", "   "),
            record(3, "Bob", "lovely"),
        ]
    }

    fn engine() -> SentimentEngine {
        SentimentEngine::new(Box::new(TableScorer::new(&[
            ("great", 0.8),
            ("awful", -0.6),
            ("fine", 0.0),
            ("lovely", 0.8),
        ])))
    }

    #[test]
    fn classification_boundaries_are_inclusive() {
        assert_eq!(SentimentClass::classify(0.05), SentimentClass::Positive);
        assert_eq!(SentimentClass::classify(-0.05), SentimentClass::Negative);
        assert_eq!(SentimentClass::classify(0.0499), SentimentClass::Neutral);
        assert_eq!(SentimentClass::classify(-0.0499), SentimentClass::Neutral);
        assert_eq!(SentimentClass::classify(0.0), SentimentClass::Neutral);
    }

    #[test]
    fn eligible_subset_excludes_media_notifications_and_blank_text() {
        let records = fixture();
        let scored = engine().scored_messages(&records, &Selection::Overall);
        let texts: Vec<&str> = scored.iter().map(|s| s.record.text()).collect();
        assert_eq!(texts, vec!["great", "awful", "fine", "lovely"]);
    }

    #[test]
    fn summary_percentages_sum_to_one_hundred() {
        let records = fixture();
        let summary = engine().sentiment_summary(&records, &Selection::Overall);
        assert_eq!(summary.positive, 50.0);
        assert_eq!(summary.negative, 25.0);
        assert_eq!(summary.neutral, 25.0);
        assert!((summary.positive + summary.negative + summary.neutral - 100.0).abs() < 1e-9);
        assert!((summary.avg_sentiment - 0.25).abs() < 1e-9);
    }

    #[test]
    fn empty_eligible_subset_is_neutral_default() {
        let records = fixture();
        let summary = engine().sentiment_summary(&records, &Selection::user("Nobody"));
        assert_eq!(summary, SentimentSummary::neutral_default());
        assert_eq!(
            (summary.positive, summary.negative, summary.neutral),
            (0.0, 0.0, 100.0)
        );
        assert!(engine().sentiment_timeline(&records, &Selection::user("Nobody")).is_empty());
    }

    #[test]
    fn timeline_averages_per_date_in_order() {
        let records = fixture();
        let points = engine().sentiment_timeline(&records, &Selection::Overall);
        let dates: Vec<u32> = points.iter().map(|p| chrono::Datelike::day(&p.date)).collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert!((points[0].sentiment_score - 0.1).abs() < 1e-9);
        assert_eq!(points[1].sentiment_score, 0.0);
        assert_eq!(points[2].sentiment_score, 0.8);
    }

    #[test]
    fn extremes_break_ties_by_transcript_order() {
        let records = fixture();
        let top = engine().extreme_messages(&records, &Selection::Overall, Polarity::Positive, 2);
        assert_eq!(top[0].text, "great");
        assert_eq!(top[1].text, "lovely");

        let bottom = engine().extreme_messages(&records, &Selection::Overall, Polarity::Negative, 1);
        assert_eq!(bottom, vec![ExtremeMessage { text: "awful".to_string(), compound: -0.6 }]);
    }

    #[test]
    fn extremes_truncate_long_text() {
        let long = "x".repeat(250);
        let text = truncate_text(&long, 200);
        assert_eq!(text.chars().count(), 203);
        assert!(text.ends_with("..."));
        assert_eq!(truncate_text("short", 200), "short");
        assert_eq!(truncate_text(&"é".repeat(200), 200), "é".repeat(200));
    }

    #[test]
    fn by_user_ranks_senders_by_mean_compound() {
        let records = fixture();
        let users = engine().sentiment_by_user(&records);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].sender, "Alice");
        assert!((users[0].avg_sentiment - 0.4).abs() < 1e-9);
        assert_eq!(users[0].message_count, 2);
        assert_eq!(users[0].positive_messages, 1);
        assert_eq!(users[0].neutral_messages, 1);
        assert_eq!(users[1].sender, "Bob");
        assert_eq!(users[1].negative_messages, 1);
        assert_eq!(users[1].positive_messages, 1);
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let records = fixture();
        let engine = engine();
        let (a, b) = std::thread::scope(|s| {
            let a = s.spawn(|| engine.sentiment_summary(&records, &Selection::Overall));
            let b = s.spawn(|| engine.sentiment_timeline(&records, &Selection::user("Alice")));
            (a.join().expect("summary thread"), b.join().expect("timeline thread"))
        });
        assert_eq!(a.positive, 50.0);
        assert_eq!(b.len(), 2);
    }
}
