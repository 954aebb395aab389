//! Command-line interface for chatscope.
//!
//! This crate parses an exported chat transcript and prints the statistics,
//! activity maps, frequency tables, and sentiment views computed by
//! `chatscope-analysis`, as text or JSON.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
