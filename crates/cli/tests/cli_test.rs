use std::path::{Path, PathBuf};

use chatscope_analysis::AnalysisError;
use chatscope_cli::app::App;
use chatscope_cli::commands::{Cli, Commands, OutputFormat, SentimentView};
use chatscope_cli::error::CliError;
use chatscope_core::ChatscopeConfig;
use clap::Parser;
use serde_json::json;
use tempfile::TempDir;

const SAMPLE: &str =
    "12/1/23, 9:05 AM - Alice: hello world\n12/1/23, 9:06 AM - Bob: <Media omitted>\n";

struct Workspace {
    dir: TempDir,
    transcript: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new(transcript: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let transcript_path = dir.path().join("chat.txt");
        std::fs::write(&transcript_path, transcript).expect("write transcript");
        let config = dir.path().join("config.toml");
        ChatscopeConfig::default()
            .save(&config)
            .expect("write default config");
        Self {
            dir,
            transcript: transcript_path,
            config,
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Result<String, CliError> {
        run_with_config(&self.config, args)
    }
}

fn run_with_config(config: &Path, args: &[&str]) -> Result<String, CliError> {
    let mut argv = vec!["chatscope", "--config", config.to_str().expect("utf-8 path")];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("valid arguments");
    App::from_cli(cli)?.execute()
}

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "chatscope",
        "sentiment",
        "chat.txt",
        "--view",
        "by-user",
        "--user",
        "Alice",
        "--format",
        "json",
        "-vv",
    ])
    .expect("parse arguments");

    assert_eq!(cli.user, "Alice");
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Sentiment(args) => {
            assert_eq!(args.view, SentimentView::ByUser);
            assert_eq!(args.transcript.input, PathBuf::from("chat.txt"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn unknown_format_is_rejected() {
    let result = Cli::try_parse_from(["chatscope", "stats", "chat.txt", "--format", "yaml"]);
    assert!(result.is_err());
}

#[test]
fn users_lists_overall_first() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws.run(&["users", transcript]).expect("users command");
    assert_eq!(output, "Overall\nAlice\nBob");
}

#[test]
fn stats_json_matches_sample_totals() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["stats", transcript, "--format", "json"])
        .expect("stats command");
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    assert_eq!(
        value,
        json!({"messages": 2, "words": 2, "media_messages": 1, "links": 0})
    );
}

#[test]
fn stats_text_for_single_user() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["stats", transcript, "--user", "Bob"])
        .expect("stats command");
    assert!(output.contains("Messages"), "output: {}", output);
    assert!(output.contains("Media shared  1"), "output: {}", output);
    assert!(output.contains("Words         0"), "output: {}", output);
}

#[test]
fn busiest_under_user_selection_is_a_warning() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["busiest", transcript, "--user", "Alice"])
        .expect("busiest command succeeds with a warning");
    assert!(output.starts_with("warning:"), "output: {}", output);

    let overall = ws.run(&["busiest", transcript]).expect("busiest command");
    assert!(overall.contains("50.00%"), "output: {}", overall);
}

#[test]
fn heatmap_text_has_day_rows_and_bucket_columns() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["activity", transcript, "--map", "heatmap"])
        .expect("activity command");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("9-10"));
    assert!(lines[1].starts_with("Friday"));
    assert!(lines[1].trim_end().ends_with('2'));
}

#[test]
fn daily_timeline_json() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["timeline", transcript, "--granularity", "daily", "--format", "json"])
        .expect("timeline command");
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    assert_eq!(value, json!([{"date": "2023-12-01", "messages": 2}]));
}

#[test]
fn stopwords_flag_overrides_configured_list() {
    let ws = Workspace::new(SAMPLE);
    let stop_path = ws.path("stop.txt");
    std::fs::write(&stop_path, "hello\n").expect("write stop words");
    let transcript = ws.transcript.to_str().expect("utf-8 path");

    let output = ws
        .run(&[
            "words",
            transcript,
            "--stopwords",
            stop_path.to_str().expect("utf-8 path"),
        ])
        .expect("words command");
    assert_eq!(output, "world  1");
}

#[test]
fn sentiment_summary_for_empty_selection_is_neutral() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["sentiment", transcript, "--user", "Bob", "--format", "json"])
        .expect("sentiment command");
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    assert_eq!(value["neutral"], json!(100.0));
    assert_eq!(value["avg_sentiment"], json!(0.0));
}

#[test]
fn report_json_has_every_section() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let output = ws
        .run(&["report", transcript, "--format", "json"])
        .expect("report command");
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    for key in [
        "stats",
        "busiest",
        "monthly_timeline",
        "heatmap",
        "common_words",
        "sentiment",
        "sentiment_by_user",
    ] {
        assert!(value.get(key).is_some(), "missing section {}", key);
    }
    assert_eq!(value["selection"], json!("Overall"));
}

#[test]
fn missing_config_file_is_an_error() {
    let ws = Workspace::new(SAMPLE);
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let err = run_with_config(&ws.path("missing.toml"), &["stats", transcript]).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn missing_transcript_is_a_parse_error() {
    let ws = Workspace::new(SAMPLE);
    let missing = ws.path("nope.txt");
    let err = ws
        .run(&["stats", missing.to_str().expect("utf-8 path")])
        .unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
}

#[test]
fn invalid_config_values_are_rejected() {
    let ws = Workspace::new(SAMPLE);
    let config = ws.path("bad.toml");
    std::fs::write(&config, "[analysis]\ntruncate_chars = 0\n").expect("write config");
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let err = run_with_config(&config, &["stats", transcript]).unwrap_err();
    assert!(matches!(err, CliError::Core(_)));
}

#[test]
fn unreadable_stopwords_file_is_an_analysis_error() {
    let ws = Workspace::new(SAMPLE);
    let missing = ws.path("no-stop-words.txt");
    let transcript = ws.transcript.to_str().expect("utf-8 path");
    let err = ws
        .run(&[
            "words",
            transcript,
            "--stopwords",
            missing.to_str().expect("utf-8 path"),
        ])
        .unwrap_err();
    assert!(
        matches!(err, CliError::Analysis(AnalysisError::Resource(_))),
        "unexpected error: {}",
        err
    );
}
