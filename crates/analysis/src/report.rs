use crate::error::AnalysisResult;
use crate::lexicon::LexiconScorer;
use crate::nlp::{EmojiClassifier, StopWords, UrlFinder};
use crate::sentiment::{
    by_user, extremes, summarize, timeline, ExtremeMessage, Polarity, SentimentEngine,
    SentimentPoint, SentimentScorer, SentimentSummary, UserSentiment,
};
use crate::stats::{BasicStats, BusiestSenders, DailyPoint, Heatmap, MonthlyPoint, StatsEngine};
use chatscope_core::config::AnalysisConfig;
use chatscope_core::{ChatscopeConfig, MessageRecord, Selection};
use serde::Serialize;
use tracing::{debug, info};

/// Every analytic for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Selection the report was computed for.
    pub selection: Selection,
    /// Message, word, media, and link totals.
    pub stats: BasicStats,
    /// Busiest senders; only present for `Overall`.
    pub busiest: Option<BusiestSenders>,
    /// Messages per month.
    pub monthly_timeline: Vec<MonthlyPoint>,
    /// Messages per date.
    pub daily_timeline: Vec<DailyPoint>,
    /// Messages per day name.
    pub week_activity: Vec<(String, u64)>,
    /// Messages per month name.
    pub month_activity: Vec<(String, u64)>,
    /// Day by hour-bucket counts.
    pub heatmap: Heatmap,
    /// Most common words.
    pub common_words: Vec<(String, u64)>,
    /// Emoji usage.
    pub emoji: Vec<(String, u64)>,
    /// Sentiment distribution and means.
    pub sentiment: SentimentSummary,
    /// Mean compound per date.
    pub sentiment_timeline: Vec<SentimentPoint>,
    /// Most positive messages.
    pub most_positive: Vec<ExtremeMessage>,
    /// Most negative messages.
    pub most_negative: Vec<ExtremeMessage>,
    /// Per-sender sentiment; only present for `Overall`.
    pub sentiment_by_user: Option<Vec<UserSentiment>>,
}

/// Long-lived analysis facade owning every collaborator.
///
/// Built once and borrowed by each call; all methods take `&self`.
pub struct Analyzer {
    stats: StatsEngine,
    sentiment: SentimentEngine,
    extreme_messages: usize,
}

impl Analyzer {
    /// Analyzer with default settings and the built-in collaborators.
    pub fn new() -> Self {
        Self::with_analysis_config(AnalysisConfig::default())
    }

    /// Analyzer with the given engine settings and the built-in collaborators.
    pub fn with_analysis_config(config: AnalysisConfig) -> Self {
        let sentiment = SentimentEngine::with_config(Box::new(LexiconScorer::new()), &config);
        Self {
            extreme_messages: config.extreme_messages,
            stats: StatsEngine::new(config),
            sentiment,
        }
    }

    /// Build an analyzer from configuration, loading the stop-word list and
    /// sentiment lexicon it names.
    pub fn from_config(config: &ChatscopeConfig) -> AnalysisResult<Self> {
        let mut stopwords = match &config.stopwords.path {
            Some(path) => StopWords::load(path)?,
            None => StopWords::english(),
        };
        if config.stopwords.case_insensitive {
            stopwords = stopwords.case_insensitive();
        }

        let mut scorer = LexiconScorer::new();
        if let Some(path) = &config.sentiment.lexicon_path {
            scorer = scorer.with_lexicon_file(path)?;
        }

        info!(
            "analyzer ready: {} stop words, {} lexicon entries",
            stopwords.len(),
            scorer.len()
        );
        Ok(Self::with_analysis_config(config.analysis.clone())
            .with_stopwords(stopwords)
            .with_scorer(Box::new(scorer)))
    }

    /// Replace the sentiment scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn SentimentScorer>) -> Self {
        self.sentiment = SentimentEngine::with_config(scorer, self.stats.config());
        self
    }

    /// Replace the URL finder.
    pub fn with_url_finder(mut self, urls: Box<dyn UrlFinder>) -> Self {
        self.stats = self.stats.with_url_finder(urls);
        self
    }

    /// Replace the emoji classifier.
    pub fn with_emoji_classifier(mut self, emoji: Box<dyn EmojiClassifier>) -> Self {
        self.stats = self.stats.with_emoji_classifier(emoji);
        self
    }

    /// Replace the stop-word list.
    pub fn with_stopwords(mut self, stopwords: StopWords) -> Self {
        self.stats = self.stats.with_stopwords(stopwords);
        self
    }

    /// Aggregation engine.
    pub fn stats(&self) -> &StatsEngine {
        &self.stats
    }

    /// Sentiment engine.
    pub fn sentiment(&self) -> &SentimentEngine {
        &self.sentiment
    }

    /// Number of messages returned by extreme-sentiment queries.
    pub fn extreme_messages(&self) -> usize {
        self.extreme_messages
    }

    /// Compute every analytic for `selection`, scoring each message once.
    pub fn report(&self, records: &[MessageRecord], selection: &Selection) -> Report {
        let stats = &self.stats;
        let busiest = if selection.is_overall() {
            stats.busiest_senders(records, selection).ok()
        } else {
            None
        };

        let scored = self.sentiment.scored_messages(records, selection);
        let truncate = self.sentiment.truncate_chars();
        let report = Report {
            selection: selection.clone(),
            stats: stats.fetch_stats(records, selection),
            busiest,
            monthly_timeline: stats.monthly_timeline(records, selection),
            daily_timeline: stats.daily_timeline(records, selection),
            week_activity: stats.week_activity_map(records, selection),
            month_activity: stats.month_activity_map(records, selection),
            heatmap: stats.activity_heatmap(records, selection),
            common_words: stats.most_common_words(records, selection),
            emoji: stats.emoji_frequency(records, selection),
            sentiment: summarize(&scored),
            sentiment_timeline: timeline(&scored),
            most_positive: extremes(&scored, Polarity::Positive, self.extreme_messages, truncate),
            most_negative: extremes(&scored, Polarity::Negative, self.extreme_messages, truncate),
            sentiment_by_user: selection.is_overall().then(|| by_user(&scored)),
        };
        debug!("report for {} covers {} messages", selection, report.stats.messages);
        report
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_transcript;
    use crate::sentiment::SentimentScore;
    use chatscope_core::config::{SentimentConfig, StopwordConfig};

    const CHAT: &str = "\
1/5/24, 9:00 AM - Alice: I love this, it is great!
1/5/24, 9:05 AM - Bob: This is terrible and I hate it
1/6/24, 8:15 PM - Alice: <Media omitted>
1/6/24, 8:16 PM - Alice added Carol
1/7/24, 11:30 PM - Carol: see www.example.com 🎉
";

    struct ConstantScorer(f64);

    impl SentimentScorer for ConstantScorer {
        fn polarity_scores(&self, _text: &str) -> SentimentScore {
            SentimentScore::new(0.0, 0.0, 1.0, self.0)
        }
    }

    #[test]
    fn overall_report_includes_sender_sections() {
        let transcript = parse_transcript(CHAT).expect("parse chat");
        let report = Analyzer::new().report(transcript.records(), &Selection::Overall);

        assert_eq!(report.stats.messages, 5);
        assert_eq!(report.stats.media_messages, 1);
        assert_eq!(report.stats.links, 1);
        assert!(report.busiest.is_some());
        assert_eq!(report.emoji, vec![("🎉".to_string(), 1)]);
        assert_eq!(report.most_positive[0].text, "I love this, it is great!");
        assert_eq!(report.most_negative[0].text, "This is terrible and I hate it");

        let by_user = report.sentiment_by_user.expect("overall has per-user sentiment");
        assert_eq!(by_user.first().map(|u| u.sender.as_str()), Some("Alice"));
        assert_eq!(by_user.last().map(|u| u.sender.as_str()), Some("Bob"));
    }

    #[test]
    fn user_report_omits_sender_sections() {
        let transcript = parse_transcript(CHAT).expect("parse chat");
        let report = Analyzer::new().report(transcript.records(), &Selection::user("Alice"));
        assert_eq!(report.stats.messages, 2);
        assert!(report.busiest.is_none());
        assert!(report.sentiment_by_user.is_none());
        assert_eq!(report.sentiment.positive, 100.0);
    }

    #[test]
    fn injected_scorer_drives_sentiment() {
        let transcript = parse_transcript(CHAT).expect("parse chat");
        let analyzer = Analyzer::new().with_scorer(Box::new(ConstantScorer(-0.5)));
        let summary = analyzer
            .sentiment()
            .sentiment_summary(transcript.records(), &Selection::Overall);
        assert_eq!(summary.negative, 100.0);
        assert_eq!(summary.avg_sentiment, -0.5);
    }

    #[test]
    fn from_config_loads_stop_words_and_lexicon() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stop_path = dir.path().join("stop.txt");
        let lexicon_path = dir.path().join("lexicon.txt");
        std::fs::write(&stop_path, "See\n").expect("write stop words");
        std::fs::write(&lexicon_path, "terrible\t3.0\nhate\t3.0\n").expect("write lexicon");

        let config = ChatscopeConfig {
            stopwords: StopwordConfig {
                path: Some(stop_path),
                case_insensitive: true,
            },
            sentiment: SentimentConfig {
                lexicon_path: Some(lexicon_path),
            },
            ..ChatscopeConfig::default()
        };
        let analyzer = Analyzer::from_config(&config).expect("analyzer from config");
        let transcript = parse_transcript(CHAT).expect("parse chat");

        let words = analyzer
            .stats()
            .most_common_words(transcript.records(), &Selection::user("Carol"));
        assert!(words.iter().all(|(w, _)| w != "see"));

        let bob = analyzer
            .sentiment()
            .sentiment_summary(transcript.records(), &Selection::user("Bob"));
        assert_eq!(bob.positive, 100.0);
    }

    #[test]
    fn from_config_reports_missing_resources() {
        let config = ChatscopeConfig {
            stopwords: StopwordConfig {
                path: Some("/nonexistent/chatscope/stop.txt".into()),
                case_insensitive: false,
            },
            ..ChatscopeConfig::default()
        };
        assert!(Analyzer::from_config(&config).is_err());
    }

    #[test]
    fn analyzer_serves_concurrent_readers() {
        let transcript = parse_transcript(CHAT).expect("parse chat");
        let analyzer = Analyzer::new();
        let records = transcript.records();

        let reports: Vec<Report> = std::thread::scope(|s| {
            let handles: Vec<_> = transcript
                .selection_options()
                .into_iter()
                .map(|option| {
                    let analyzer = &analyzer;
                    s.spawn(move || analyzer.report(records, &Selection::from(option)))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("report thread"))
                .collect()
        });

        let total: u64 = reports[1..].iter().map(|r| r.stats.messages).sum();
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].stats.messages, 5);
        // Per-sender counts leave out the notification record.
        assert_eq!(total, 4);
    }
}
