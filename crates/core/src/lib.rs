//! Core types, errors, and configuration for chatscope.
//!
//! This crate provides the structured message record produced by the
//! transcript parser, the sender selection used by every analytic, and the
//! file-backed configuration shared by the analysis engine and the CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use config::ChatscopeConfig;
pub use error::{Error, Result};
pub use types::*;
