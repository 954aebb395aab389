//! CLI application entry point and configuration.
//!
//! This module provides the main CLI application logic, including argument parsing,
//! configuration loading, and command dispatch.

use crate::commands::{
    ActivityArgs, ActivityMap, Cli, Commands, Granularity, OutputFormat, SentimentArgs,
    SentimentView, TimelineArgs,
};
use crate::error::{CliError, Result};
use chatscope_analysis::sentiment::{ExtremeMessage, Polarity, SentimentSummary, UserSentiment};
use chatscope_analysis::stats::{BasicStats, BusiestSenders, Heatmap};
use chatscope_analysis::{AnalysisError, Analyzer, Report, Transcript, TranscriptParser};
use chatscope_core::config::LogLevel;
use chatscope_core::{ChatscopeConfig, Selection};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info, Level};

#[derive(Serialize)]
struct Extremes {
    positive: Vec<ExtremeMessage>,
    negative: Vec<ExtremeMessage>,
}

/// Configuration for the CLI application.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Path to the configuration file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    /// Logging verbosity level.
    pub verbosity: u8,
    /// Settings shared with the analysis engine.
    pub settings: ChatscopeConfig,
}

/// Main CLI application.
#[derive(Debug)]
pub struct App {
    /// Application configuration.
    pub config: AppConfig,
    /// Parsed CLI arguments.
    pub cli: Cli,
}

impl App {
    /// Create a new application instance from command line arguments.
    pub fn new() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    /// Create an application instance from already parsed arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::load_config(&cli)?;
        Ok(Self { config, cli })
    }

    /// Load configuration from file, then apply command-line overrides.
    fn load_config(cli: &Cli) -> Result<AppConfig> {
        let mut config = AppConfig {
            verbosity: cli.verbose,
            ..AppConfig::default()
        };

        if let Some(config_path) = &cli.config {
            if !config_path.exists() {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                )));
            }
            config.settings = ChatscopeConfig::load(config_path)?;
            config.config_path = Some(config_path.clone());
        } else if let Some(default_path) = ChatscopeConfig::default_path() {
            if default_path.exists() {
                config.settings = ChatscopeConfig::load(&default_path)?;
                config.config_path = Some(default_path);
            }
        }

        if let Some(stopwords) = &cli.stopwords {
            config.settings.stopwords.path = Some(stopwords.clone());
        }

        Ok(config)
    }

    /// Run the application and print the command output.
    pub fn run(self) -> Result<()> {
        self.setup_logging();
        let output = self.execute()?;
        println!("{}", output);
        Ok(())
    }

    /// Set up logging based on verbosity level.
    fn setup_logging(&self) {
        let level = match self.config.settings.logging.level {
            Some(LogLevel::Error) => Level::ERROR,
            Some(LogLevel::Warn) => Level::WARN,
            Some(LogLevel::Info) => Level::INFO,
            Some(LogLevel::Debug) => Level::DEBUG,
            Some(LogLevel::Trace) => Level::TRACE,
            None => match self.config.verbosity {
                0 => Level::WARN,
                1 => Level::INFO,
                2 => Level::DEBUG,
                _ => Level::TRACE,
            },
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .ok(); // Ignore errors if a subscriber is already installed
    }

    /// Execute the selected command and return its rendered output.
    pub fn execute(&self) -> Result<String> {
        let input = &self.cli.command.transcript().input;
        let parser = TranscriptParser::new();
        let transcript = parser.parse_file(input)?;
        info!(
            "loaded {} records from {} ({} export)",
            transcript.len(),
            input.display(),
            parser.dialect_name()
        );
        if let Some(path) = &self.config.config_path {
            debug!("using configuration from {}", path.display());
        }

        let analyzer = Analyzer::from_config(&self.config.settings)?;
        let selection = Selection::from(self.cli.user.as_str());

        match &self.cli.command {
            Commands::Users(_) => self.handle_users(&transcript),
            Commands::Stats(_) => self.handle_stats(&analyzer, &transcript, &selection),
            Commands::Busiest(_) => self.handle_busiest(&analyzer, &transcript, &selection),
            Commands::Timeline(args) => {
                self.handle_timeline(args, &analyzer, &transcript, &selection)
            }
            Commands::Activity(args) => {
                self.handle_activity(args, &analyzer, &transcript, &selection)
            }
            Commands::Words(_) => {
                let words = analyzer
                    .stats()
                    .most_common_words(transcript.records(), &selection);
                self.render(words.as_slice(), render_counts)
            }
            Commands::Wordcloud(_) => {
                let words = analyzer
                    .stats()
                    .word_cloud_frequencies(transcript.records(), &selection);
                self.render(words.as_slice(), render_counts)
            }
            Commands::Emoji(_) => {
                let emoji = analyzer
                    .stats()
                    .emoji_frequency(transcript.records(), &selection);
                self.render(emoji.as_slice(), render_counts)
            }
            Commands::Sentiment(args) => {
                self.handle_sentiment(args, &analyzer, &transcript, &selection)
            }
            Commands::Report(_) => {
                let report = analyzer.report(transcript.records(), &selection);
                self.render(&report, render_report)
            }
        }
    }

    fn handle_users(&self, transcript: &Transcript) -> Result<String> {
        let options = transcript.selection_options();
        self.render(&options, |options| options.join("\n"))
    }

    fn handle_stats(
        &self,
        analyzer: &Analyzer,
        transcript: &Transcript,
        selection: &Selection,
    ) -> Result<String> {
        let stats = analyzer.stats().fetch_stats(transcript.records(), selection);
        self.render(&stats, render_stats)
    }

    fn handle_busiest(
        &self,
        analyzer: &Analyzer,
        transcript: &Transcript,
        selection: &Selection,
    ) -> Result<String> {
        match analyzer.stats().busiest_senders(transcript.records(), selection) {
            Ok(busiest) => self.render(&busiest, render_busiest),
            Err(err @ AnalysisError::InvalidSelection { .. }) => self.render_warning(&err),
            Err(err) => Err(err.into()),
        }
    }

    fn handle_timeline(
        &self,
        args: &TimelineArgs,
        analyzer: &Analyzer,
        transcript: &Transcript,
        selection: &Selection,
    ) -> Result<String> {
        let records = transcript.records();
        match args.granularity {
            Granularity::Monthly => {
                let points = analyzer.stats().monthly_timeline(records, selection);
                self.render(&points, |points| {
                    render_rows(points.iter().map(|p| (p.label.clone(), p.messages.to_string())))
                })
            }
            Granularity::Daily => {
                let points = analyzer.stats().daily_timeline(records, selection);
                self.render(&points, |points| {
                    render_rows(points.iter().map(|p| (p.date.to_string(), p.messages.to_string())))
                })
            }
        }
    }

    fn handle_activity(
        &self,
        args: &ActivityArgs,
        analyzer: &Analyzer,
        transcript: &Transcript,
        selection: &Selection,
    ) -> Result<String> {
        let records = transcript.records();
        match args.map {
            ActivityMap::Week => {
                let map = analyzer.stats().week_activity_map(records, selection);
                self.render(map.as_slice(), render_counts)
            }
            ActivityMap::Month => {
                let map = analyzer.stats().month_activity_map(records, selection);
                self.render(map.as_slice(), render_counts)
            }
            ActivityMap::Heatmap => {
                let heatmap = analyzer.stats().activity_heatmap(records, selection);
                self.render(&heatmap, render_heatmap)
            }
        }
    }

    fn handle_sentiment(
        &self,
        args: &SentimentArgs,
        analyzer: &Analyzer,
        transcript: &Transcript,
        selection: &Selection,
    ) -> Result<String> {
        let records = transcript.records();
        let engine = analyzer.sentiment();
        match args.view {
            SentimentView::Summary => {
                let summary = engine.sentiment_summary(records, selection);
                self.render(&summary, render_sentiment_summary)
            }
            SentimentView::Timeline => {
                let points = engine.sentiment_timeline(records, selection);
                self.render(&points, |points| {
                    render_rows(
                        points
                            .iter()
                            .map(|p| (p.date.to_string(), format!("{:.4}", p.sentiment_score))),
                    )
                })
            }
            SentimentView::Extremes => {
                let n = args.top.unwrap_or_else(|| analyzer.extreme_messages());
                let extremes = Extremes {
                    positive: engine.extreme_messages(records, selection, Polarity::Positive, n),
                    negative: engine.extreme_messages(records, selection, Polarity::Negative, n),
                };
                self.render(&extremes, |e| render_extremes(&e.positive, &e.negative))
            }
            SentimentView::ByUser => {
                if !selection.is_overall() {
                    return self.render_warning(&AnalysisError::InvalidSelection {
                        analysis: "sentiment by user",
                        selection: selection.to_string(),
                    });
                }
                let users = engine.sentiment_by_user(records);
                self.render(users.as_slice(), render_user_sentiment)
            }
        }
    }

    /// Report a selection the analytic does not support without failing the command.
    fn render_warning(&self, err: &AnalysisError) -> Result<String> {
        let warning = err.to_string();
        self.render(&json!({ "warning": warning }), |_| {
            format!("warning: {}", warning)
        })
    }

    /// Render `value` as JSON or with the given text renderer.
    fn render<T, F>(&self, value: &T, text: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        match self.cli.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Text => Ok(text(value)),
        }
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let app = App::new()?;
    app.run()
}

fn render_rows(rows: impl Iterator<Item = (String, String)>) -> String {
    let rows: Vec<(String, String)> = rows.collect();
    if rows.is_empty() {
        return "(no data)".to_string();
    }
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| format!("{:<width$}  {}", k, v, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_counts(counts: &[(String, u64)]) -> String {
    render_rows(counts.iter().map(|(k, v)| (k.clone(), v.to_string())))
}

fn render_stats(stats: &BasicStats) -> String {
    render_rows(
        [
            ("Messages", stats.messages),
            ("Words", stats.words),
            ("Media shared", stats.media_messages),
            ("Links shared", stats.links),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string())),
    )
}

fn render_busiest(busiest: &BusiestSenders) -> String {
    let mut out = String::from("Top senders:\n");
    out.push_str(&render_counts(&busiest.top));
    out.push_str("\n\nShare of messages:\n");
    out.push_str(&render_rows(
        busiest
            .shares
            .iter()
            .map(|s| (s.sender.clone(), format!("{:.2}%", s.percent))),
    ));
    out
}

fn render_heatmap(heatmap: &Heatmap) -> String {
    if heatmap.is_empty() {
        return "(no data)".to_string();
    }
    let row_width = heatmap.rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let col_width = heatmap.columns.iter().map(|c| c.len()).max().unwrap_or(0).max(3);

    let mut out = format!("{:<width$}", "", width = row_width);
    for column in &heatmap.columns {
        out.push_str(&format!("  {:>width$}", column, width = col_width));
    }
    for (row, cells) in heatmap.rows.iter().zip(&heatmap.cells) {
        out.push_str(&format!("\n{:<width$}", row, width = row_width));
        for cell in cells {
            out.push_str(&format!("  {:>width$}", cell, width = col_width));
        }
    }
    out
}

fn render_sentiment_summary(summary: &SentimentSummary) -> String {
    render_rows(
        [
            ("Positive", format!("{:.2}%", summary.positive)),
            ("Negative", format!("{:.2}%", summary.negative)),
            ("Neutral", format!("{:.2}%", summary.neutral)),
            ("Avg positive", format!("{:.3}", summary.avg_positive)),
            ("Avg negative", format!("{:.3}", summary.avg_negative)),
            ("Avg neutral", format!("{:.3}", summary.avg_neutral)),
            ("Avg compound", format!("{:.4}", summary.avg_sentiment)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v)),
    )
}

fn render_extremes(positive: &[ExtremeMessage], negative: &[ExtremeMessage]) -> String {
    let list = |messages: &[ExtremeMessage]| {
        if messages.is_empty() {
            return "  (none)".to_string();
        }
        messages
            .iter()
            .map(|m| format!("  [{:+.4}] {}", m.compound, m.text))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Most positive:\n{}\n\nMost negative:\n{}",
        list(positive),
        list(negative)
    )
}

fn render_user_sentiment(users: &[UserSentiment]) -> String {
    render_rows(users.iter().map(|u| {
        (
            u.sender.clone(),
            format!(
                "{:+.4}  {} messages ({} positive, {} negative, {} neutral)",
                u.avg_sentiment,
                u.message_count,
                u.positive_messages,
                u.negative_messages,
                u.neutral_messages
            ),
        )
    }))
}

fn render_report(report: &Report) -> String {
    let mut sections = vec![
        format!("== Selection: {}", report.selection),
        format!("== Statistics\n{}", render_stats(&report.stats)),
    ];
    if let Some(busiest) = &report.busiest {
        sections.push(format!("== Busiest senders\n{}", render_busiest(busiest)));
    }
    sections.push(format!(
        "== Monthly timeline\n{}",
        render_rows(
            report
                .monthly_timeline
                .iter()
                .map(|p| (p.label.clone(), p.messages.to_string()))
        )
    ));
    sections.push(format!(
        "== Daily timeline\n{}",
        render_rows(
            report
                .daily_timeline
                .iter()
                .map(|p| (p.date.to_string(), p.messages.to_string()))
        )
    ));
    sections.push(format!("== Most busy days\n{}", render_counts(&report.week_activity)));
    sections.push(format!("== Most busy months\n{}", render_counts(&report.month_activity)));
    sections.push(format!("== Weekly activity heatmap\n{}", render_heatmap(&report.heatmap)));
    sections.push(format!("== Most common words\n{}", render_counts(&report.common_words)));
    sections.push(format!("== Emoji\n{}", render_counts(&report.emoji)));
    sections.push(format!(
        "== Sentiment\n{}",
        render_sentiment_summary(&report.sentiment)
    ));
    sections.push(format!(
        "== Extreme messages\n{}",
        render_extremes(&report.most_positive, &report.most_negative)
    ));
    if let Some(users) = &report.sentiment_by_user {
        sections.push(format!("== Sentiment by user\n{}", render_user_sentiment(users)));
    }
    sections.join("\n\n")
}
