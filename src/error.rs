//! Error types for corpus loading, text generation and configuration

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to load the regulation corpus.
///
/// A missing or unreadable file is not an error: the loader degrades to an
/// empty corpus. Only content that cannot be parsed ends up here.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("malformed regulation corpus{}: {source}", path_suffix(.path))]
    Malformed {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" at {}", p.display()),
        None => String::new(),
    }
}

/// Any condition that prevents a usable generated answer.
///
/// All variants lead to the same recovery (fallback answer); they only
/// differ in what gets logged.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("generator unreachable: {0}")]
    Unreachable(String),

    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("generator returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed generator response: {0}")]
    Malformed(String),

    #[error("generator returned empty text")]
    Empty,
}

impl GeneratorError {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
            Self::Empty => "empty",
        }
    }
}

/// Invalid environment configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
