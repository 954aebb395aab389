//! Rule-based sentiment scoring over a word valence lexicon.
//!
//! Each token found in the lexicon contributes its valence, adjusted by
//! preceding intensifiers, negation within three tokens, capitalization
//! emphasis, and a contrastive `but`. The summed valence is normalized into a
//! compound score with `x / sqrt(x² + 15)`.

use crate::error::{AnalysisError, AnalysisResult};
use crate::sentiment::{SentimentScore, SentimentScorer};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BOOSTER_INCREMENT: f64 = 0.293;
const BOOSTER_DECREMENT: f64 = -0.293;
const CAPS_EMPHASIS: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZATION_ALPHA: f64 = 15.0;
const EXCLAMATION_WEIGHT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_WEIGHT: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;

/// Lexicon-driven [`SentimentScorer`].
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl LexiconScorer {
    /// Scorer over the built-in English lexicon.
    pub fn new() -> Self {
        Self {
            valences: BUILTIN_LEXICON
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
        }
    }

    /// Scorer with no lexicon entries; every text scores neutral.
    pub fn empty() -> Self {
        Self {
            valences: HashMap::new(),
        }
    }

    /// Merge a tab-separated lexicon file over the current entries.
    ///
    /// Each non-empty line is `word<TAB>valence[<TAB>...]`; extra columns are ignored.
    pub fn with_lexicon_file(mut self, path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::Lexicon(format!("failed to read {}: {}", path.display(), e))
        })?;
        let entries = parse_lexicon(&content)?;
        debug!("merging {} lexicon entries from {}", entries.len(), path.display());
        self.merge(entries);
        Ok(self)
    }

    /// Insert or overwrite entries; words are stored lower-cased.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = (String, f64)>) {
        for (word, valence) in entries {
            self.valences.insert(word.to_lowercase(), valence);
        }
    }

    /// Valence of a word, if it is in the lexicon.
    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(&word.to_lowercase()).copied()
    }

    /// Number of lexicon entries.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// Whether the lexicon has no entries.
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    fn token_valence(&self, tokens: &[&str], i: usize, caps_differ: bool) -> f64 {
        let token = tokens[i];
        let lower = token.to_lowercase();
        if booster(&lower).is_some() {
            return 0.0;
        }
        let Some(mut valence) = self.valences.get(&lower).copied() else {
            return 0.0;
        };

        if caps_differ && is_all_caps(token) {
            valence += CAPS_EMPHASIS.copysign(valence);
        }

        for distance in 1..=3 {
            if i < distance {
                break;
            }
            let previous = tokens[i - distance];
            if self.valences.contains_key(&previous.to_lowercase()) {
                continue;
            }
            let damping = match distance {
                1 => 1.0,
                2 => 0.95,
                _ => 0.9,
            };
            valence += booster_scalar(previous, valence, caps_differ) * damping;
        }

        let window = &tokens[i.saturating_sub(3)..i];
        if window.iter().any(|t| is_negation(t)) {
            valence *= NEGATION_SCALAR;
        }

        valence
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> SentimentScore {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore::default();
        }

        let caps_differ = caps_differ(&tokens);
        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, i, caps_differ))
            .collect();

        if let Some(pivot) = tokens.iter().position(|t| t.eq_ignore_ascii_case("but")) {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < pivot {
                    *v *= 0.5;
                } else if i > pivot {
                    *v *= 1.5;
                }
            }
        }

        let emphasis = punctuation_emphasis(text);
        let mut sum: f64 = valences.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        let compound = round_to(normalize(sum), 4);

        let mut positive = 0.0f64;
        let mut negative = 0.0f64;
        let mut neutral = 0.0f64;
        for v in &valences {
            if *v > 0.0 {
                positive += v + 1.0;
            } else if *v < 0.0 {
                negative += v - 1.0;
            } else {
                neutral += 1.0;
            }
        }
        if positive > negative.abs() {
            positive += emphasis;
        } else if positive < negative.abs() {
            negative -= emphasis;
        }

        let total = positive + negative.abs() + neutral;
        if total == 0.0 {
            return SentimentScore::new(0.0, 0.0, 0.0, compound);
        }
        SentimentScore::new(
            round_to((positive / total).abs(), 3),
            round_to((negative / total).abs(), 3),
            round_to((neutral / total).abs(), 3),
            compound,
        )
    }
}

/// Parse a tab-separated valence lexicon.
pub fn parse_lexicon(content: &str) -> AnalysisResult<Vec<(String, f64)>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let mut fields = line.split('\t');
            let word = fields.next().map(str::trim).filter(|w| !w.is_empty());
            let valence = fields.next().and_then(|v| v.trim().parse::<f64>().ok());
            match (word, valence) {
                (Some(word), Some(valence)) => Ok((word.to_string(), valence)),
                _ => Err(AnalysisError::Lexicon(format!(
                    "line {}: expected `word<TAB>valence`, got {:?}",
                    idx + 1,
                    line
                ))),
            }
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

// Emphasis only counts when some, but not all, tokens are shouted.
fn caps_differ(tokens: &[&str]) -> bool {
    let shouted = tokens.iter().filter(|t| is_all_caps(t)).count();
    shouted > 0 && shouted < tokens.len()
}

fn booster(lower: &str) -> Option<f64> {
    if BOOSTERS_UP.contains(&lower) {
        Some(BOOSTER_INCREMENT)
    } else if BOOSTERS_DOWN.contains(&lower) {
        Some(BOOSTER_DECREMENT)
    } else {
        None
    }
}

fn booster_scalar(token: &str, valence: f64, caps_differ: bool) -> f64 {
    let Some(mut scalar) = booster(&token.to_lowercase()) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if caps_differ && is_all_caps(token) {
        scalar += CAPS_EMPHASIS.copysign(valence);
    }
    scalar
}

fn is_negation(token: &str) -> bool {
    let lower = token.to_lowercase();
    NEGATIONS.contains(&lower.as_str()) || lower.contains("n't")
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_boost = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_WEIGHT,
        _ => QUESTION_CAP,
    };
    exclamations as f64 * EXCLAMATION_WEIGHT + question_boost
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "nowhere", "neither", "nor", "cannot",
    "without", "aint", "cant", "dont", "doesnt", "didnt", "isnt", "wasnt", "wont", "wouldnt",
    "shouldnt", "couldnt", "havent", "hasnt", "hadnt", "arent", "werent",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "completely", "deeply", "especially", "extremely", "entirely",
    "fully", "greatly", "highly", "hugely", "incredibly", "intensely", "majorly", "more", "most",
    "particularly", "purely", "quite", "really", "remarkably", "so", "substantially", "thoroughly",
    "totally", "tremendously", "truly", "uber", "unbelievably", "utterly", "very", "super",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "less", "little", "marginally", "occasionally", "partly",
    "scarcely", "slightly", "somewhat", "sort", "kinda", "kindof", "sorta",
];

const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("calm", 1.3),
    ("celebrate", 2.7),
    ("cheerful", 2.5),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("cool", 1.3),
    ("cute", 2.0),
    ("delight", 2.9),
    ("delighted", 2.8),
    ("easy", 1.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fantastic", 2.6),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("free", 2.3),
    ("fun", 2.3),
    ("funny", 1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("haha", 2.0),
    ("hahaha", 2.6),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("hope", 1.9),
    ("hug", 2.1),
    ("hugs", 2.2),
    ("interesting", 1.7),
    ("joy", 2.8),
    ("kind", 2.4),
    ("laugh", 2.6),
    ("like", 2.0),
    ("lol", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("lucky", 1.8),
    ("nice", 1.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("please", 1.3),
    ("pretty", 2.2),
    ("proud", 2.1),
    ("safe", 1.9),
    ("smile", 1.5),
    ("success", 2.7),
    ("sure", 1.3),
    ("sweet", 2.0),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("welcome", 2.0),
    ("well", 1.1),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("wow", 2.8),
    ("yay", 2.4),
    ("yes", 1.7),
    // negative
    ("afraid", -2.2),
    ("alone", -1.0),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("anxious", -1.0),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broken", -2.1),
    ("cry", -2.1),
    ("crying", -2.1),
    ("damn", -1.7),
    ("dead", -3.3),
    ("depressed", -2.3),
    ("difficult", -1.5),
    ("disappointed", -1.9),
    ("dislike", -1.6),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fear", -2.2),
    ("fight", -1.6),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("ill", -1.8),
    ("lonely", -1.5),
    ("lost", -1.3),
    ("mad", -2.2),
    ("miss", -0.6),
    ("missed", -1.2),
    ("no", -1.2),
    ("pain", -2.3),
    ("poor", -2.1),
    ("problem", -1.7),
    ("sad", -2.1),
    ("scared", -1.9),
    ("sick", -2.3),
    ("sorry", -0.3),
    ("stupid", -2.4),
    ("stress", -1.8),
    ("terrible", -2.5),
    ("tired", -1.9),
    ("ugly", -2.3),
    ("unfortunately", -1.4),
    ("upset", -1.6),
    ("worried", -1.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];
