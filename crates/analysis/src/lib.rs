//! Transcript parsing and chat analytics for chatscope.
//!
//! The parser turns an exported chat transcript into an ordered sequence of
//! [`chatscope_core::MessageRecord`]s. The engines in this crate compute
//! volume statistics, timelines, activity maps, word and emoji frequencies,
//! and sentiment summaries over that sequence. All of them borrow the records
//! read-only, so one [`Analyzer`] may serve any number of threads.

#![deny(missing_docs, unsafe_code)]

/// Transcript segmentation, message decomposition, and record building.
pub mod parsers;

/// Partition-and-reduce helpers shared by every grouped analytic.
pub mod grouping;

/// Stop words, URL detection, and emoji classification.
pub mod nlp;

/// Volume statistics, timelines, activity maps, and frequency tables.
pub mod stats;

/// Sentiment scoring contract, classification, and summaries.
pub mod sentiment;

/// Built-in lexicon-based sentiment scorer.
pub mod lexicon;

/// Combined analyzer and the complete analysis report.
pub mod report;

/// Error types for analysis operations.
pub mod error;

pub use error::{AnalysisError, AnalysisResult};
pub use parsers::{parse_transcript, ParseError, Transcript, TranscriptParser};
pub use report::{Analyzer, Report};
