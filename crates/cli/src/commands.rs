//! CLI command definitions for chatscope.
//!
//! Every subcommand reads one exported transcript and prints a single
//! analytic, either as aligned text or as JSON.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Logging verbosity
    #[arg(short, long, global = true, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHATSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Sender to analyze, or "Overall" for the whole chat
    #[arg(short, long, global = true, default_value = "Overall")]
    pub user: String,

    /// Output format
    #[arg(short, long, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Newline-delimited stop-word list, overriding the configured one
    #[arg(long, global = true)]
    pub stopwords: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the senders, with "Overall" first
    Users(TranscriptArgs),

    /// Message, word, media, and link totals
    Stats(TranscriptArgs),

    /// Most active senders and their share of the chat
    Busiest(TranscriptArgs),

    /// Messages over time
    Timeline(TimelineArgs),

    /// Activity by weekday, month, or weekday and hour
    Activity(ActivityArgs),

    /// Most common words
    Words(TranscriptArgs),

    /// Full word-frequency table for a word cloud
    Wordcloud(TranscriptArgs),

    /// Emoji usage
    Emoji(TranscriptArgs),

    /// Sentiment analysis
    Sentiment(SentimentArgs),

    /// Every analytic in one report
    Report(TranscriptArgs),
}

impl Commands {
    /// Transcript arguments shared by every subcommand.
    pub fn transcript(&self) -> &TranscriptArgs {
        match self {
            Commands::Users(args)
            | Commands::Stats(args)
            | Commands::Busiest(args)
            | Commands::Words(args)
            | Commands::Wordcloud(args)
            | Commands::Emoji(args)
            | Commands::Report(args) => args,
            Commands::Timeline(args) => &args.transcript,
            Commands::Activity(args) => &args.transcript,
            Commands::Sentiment(args) => &args.transcript,
        }
    }
}

/// Transcript input.
#[derive(Args, Debug)]
pub struct TranscriptArgs {
    /// Exported chat transcript (UTF-8 text)
    pub input: PathBuf,
}

/// Timeline arguments.
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Transcript input
    #[command(flatten)]
    pub transcript: TranscriptArgs,

    /// Bucket size
    #[arg(short, long, value_enum, default_value_t = Granularity::Monthly)]
    pub granularity: Granularity,
}

/// Activity map arguments.
#[derive(Args, Debug)]
pub struct ActivityArgs {
    /// Transcript input
    #[command(flatten)]
    pub transcript: TranscriptArgs,

    /// Which activity map to print
    #[arg(short, long, value_enum, default_value_t = ActivityMap::Week)]
    pub map: ActivityMap,
}

/// Sentiment arguments.
#[derive(Args, Debug)]
pub struct SentimentArgs {
    /// Transcript input
    #[command(flatten)]
    pub transcript: TranscriptArgs,

    /// Which sentiment view to print
    #[arg(long, value_enum, default_value_t = SentimentView::Summary)]
    pub view: SentimentView,

    /// Number of extreme messages per direction; defaults to the configured value
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
}

/// Timeline granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Granularity {
    /// One point per calendar month
    Monthly,
    /// One point per calendar date
    Daily,
}

/// Activity map kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActivityMap {
    /// Messages per weekday
    Week,
    /// Messages per month name
    Month,
    /// Weekday by hour-bucket pivot
    Heatmap,
}

/// Sentiment view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SentimentView {
    /// Class distribution and mean scores
    Summary,
    /// Mean compound score per date
    Timeline,
    /// Most positive and most negative messages
    Extremes,
    /// Per-sender averages (Overall only)
    ByUser,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
