use crate::error::{AnalysisError, AnalysisResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Finds URL-shaped substrings in message text.
pub trait UrlFinder: Send + Sync {
    /// Every URL in `text`, in order of appearance.
    fn find_urls<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Decides whether a single character is an emoji.
pub trait EmojiClassifier: Send + Sync {
    /// Whether `c` is an emoji.
    fn is_emoji(&self, c: char) -> bool;
}

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:(?:https?|ftp)://[^\s<>"]+|www\.[^\s<>"]+|(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+(?:com|org|net|edu|gov|mil|int|info|biz|io|co|ai|app|dev|me|ly|tv|gg|xyz|in|uk|us|ca|de|fr|es|it|nl|br|au|jp|ru|ch|se)\b(?:/[^\s<>"]*)?)"#,
    )
    .expect("url regex")
});

static EMOJI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Extended_Pictographic}\p{Emoji_Presentation}]$").expect("emoji regex")
});

const TRAILING_URL_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// Regex-based URL finder.
///
/// Counts scheme URLs (`https://…`), `www.` hosts, and bare `domain.tld`
/// forms with a common top-level domain. Hosts directly after `@` belong to
/// e-mail addresses and are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexUrlFinder;

impl RegexUrlFinder {
    /// Create a new RegexUrlFinder.
    pub fn new() -> Self {
        Self
    }
}

impl UrlFinder for RegexUrlFinder {
    fn find_urls<'a>(&self, text: &'a str) -> Vec<&'a str> {
        URL_PATTERN
            .find_iter(text)
            .filter(|m| !text[..m.start()].ends_with('@'))
            .map(|m| m.as_str().trim_end_matches(TRAILING_URL_PUNCTUATION))
            .filter(|url| !url.is_empty())
            .collect()
    }
}

/// Emoji classifier backed by the Unicode emoji properties.
///
/// ASCII characters are never emoji here, even though digits, `#` and `*`
/// carry the Unicode `Emoji` property for keycap sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeEmojiClassifier;

impl UnicodeEmojiClassifier {
    /// Create a new UnicodeEmojiClassifier.
    pub fn new() -> Self {
        Self
    }
}

impl EmojiClassifier for UnicodeEmojiClassifier {
    fn is_emoji(&self, c: char) -> bool {
        if c.is_ascii() {
            return false;
        }
        let mut buf = [0u8; 4];
        EMOJI_PATTERN.is_match(c.encode_utf8(&mut buf))
    }
}

/// Stop-word list used to filter word-frequency tables.
///
/// Entries are matched verbatim against lower-cased tokens, so a mixed-case
/// entry never excludes anything unless the list was built case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// An empty list that excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in English list.
    pub fn english() -> Self {
        Self::from_words(DEFAULT_ENGLISH.iter().copied())
    }

    /// Build from individual words, kept verbatim.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words
                .into_iter()
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Parse a newline-delimited list, one word per line, kept verbatim.
    pub fn from_list(content: &str) -> Self {
        Self::from_words(content.lines())
    }

    /// Load a newline-delimited list from disk.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::Resource(format!(
                "failed to read stop words from {}: {}",
                path.display(),
                e
            ))
        })?;
        let list = Self::from_list(&content);
        debug!("loaded {} stop words from {}", list.len(), path.display());
        Ok(list)
    }

    /// Lower-case every entry so mixed-case entries match lower-cased tokens.
    pub fn case_insensitive(self) -> Self {
        Self {
            words: self.words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Check if a word is a stopword.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lower-case `text` and split it on whitespace.
pub fn lowercase_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

const DEFAULT_ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];
