use crate::constants::{
    DEFAULT_EXTREME_MESSAGES, DEFAULT_TOP_SENDERS, DEFAULT_TOP_WORDS, DEFAULT_TRUNCATE_CHARS,
    MEDIA_OMITTED,
};
use crate::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration for chatscope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatscopeConfig {
    /// Analysis engine settings.
    pub analysis: AnalysisConfig,

    /// Stop-word resource settings.
    pub stopwords: StopwordConfig,

    /// Sentiment scorer settings.
    pub sentiment: SentimentConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Analysis engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Text the export writes in place of attachments.
    pub media_placeholder: String,

    /// Number of entries in the common-words table.
    pub top_words: usize,

    /// Number of senders in the busiest-senders head.
    pub top_senders: usize,

    /// Number of messages returned by extreme-sentiment queries.
    pub extreme_messages: usize,

    /// Character limit applied to extreme-sentiment message text.
    pub truncate_chars: usize,
}

/// Stop-word resource settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwordConfig {
    /// Newline-delimited stop-word list; the built-in English list is used when unset.
    pub path: Option<PathBuf>,

    /// Lower-case list entries on load so mixed-case entries also match.
    pub case_insensitive: bool,
}

/// Sentiment scorer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Tab-separated valence lexicon merged over the built-in one.
    pub lexicon_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level; overrides the `-v` count when set.
    pub level: Option<LogLevel>,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only.
    Error,

    /// Warning messages and above.
    Warn,

    /// Info messages and above.
    Info,

    /// Debug messages and above.
    Debug,

    /// Trace messages and above.
    Trace,
}

impl ChatscopeConfig {
    /// Default configuration file location, e.g. `~/.config/chatscope/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatscope").join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::FileSystem(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Parse(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| Error::FileSystem(format!("Failed to write config file: {}", e)))
    }

    /// Reject settings no analytic can work with.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.media_placeholder.trim().is_empty() {
            return Err(Error::validation("analysis.media_placeholder must not be empty"));
        }
        if self.analysis.truncate_chars == 0 {
            return Err(Error::validation("analysis.truncate_chars must be positive"));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            media_placeholder: MEDIA_OMITTED.to_string(),
            top_words: DEFAULT_TOP_WORDS,
            top_senders: DEFAULT_TOP_SENDERS,
            extreme_messages: DEFAULT_EXTREME_MESSAGES,
            truncate_chars: DEFAULT_TRUNCATE_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = ChatscopeConfig::default();
        assert_eq!(config.analysis.media_placeholder, "<Media omitted>");
        assert_eq!(config.analysis.top_words, 20);
        assert_eq!(config.analysis.top_senders, 5);
        assert_eq!(config.analysis.truncate_chars, 200);
        assert!(!config.stopwords.case_insensitive);
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[analysis]\ntop_words = 10\n\n[stopwords]\ncase_insensitive = true\n\n[logging]\nlevel = \"debug\"\n",
        )
        .expect("write config");

        let config = ChatscopeConfig::load(&path).expect("load config");
        assert_eq!(config.analysis.top_words, 10);
        assert_eq!(config.analysis.top_senders, 5);
        assert!(config.stopwords.case_insensitive);
        assert_eq!(config.logging.level, Some(LogLevel::Debug));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut config = ChatscopeConfig::default();
        config.analysis.extreme_messages = 3;
        config.stopwords.path = Some(PathBuf::from("stop_words.txt"));
        config.save(&path).expect("save config");

        assert_eq!(ChatscopeConfig::load(&path).expect("load config"), config);
    }

    #[test]
    fn empty_media_placeholder_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\nmedia_placeholder = \"  \"\n").expect("write config");

        let err = ChatscopeConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "unexpected error: {}", err);
    }

    #[test]
    fn unreadable_file_is_a_file_system_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ChatscopeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::FileSystem(_)), "unexpected error: {}", err);
        assert!(err.to_string().starts_with("File system error: Failed to read config file"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis\n").expect("write config");

        assert!(matches!(ChatscopeConfig::load(&path), Err(Error::Parse(_))));
    }
}
