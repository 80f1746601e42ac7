//! Error types for loading and rendering profile panels.
//!
//! Rendering itself is lenient: malformed CSV rows degrade to empty fields
//! rather than failing. The errors here cover the edges around it, namely
//! fetching resources and reading a Scholar profile page.

use crate::ResourceKind;
use thiserror::Error;

/// Field name constants for consistent error reporting.
pub mod fields {
    pub const METRICS: &str = "metrics";
}

/// Top-level error type for panel operations.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to fetch a resource from a [`Source`](crate::loader::Source).
#[derive(Error, Debug)]
pub enum FetchError {
    /// The resource does not exist. Optional panels treat this as "feature absent".
    #[error("{path} not found")]
    NotFound { path: String },

    #[error("Failed to load {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "http")]
    #[error("Request for {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Whether the error means the resource is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// Parse error with location and resource context.
#[derive(Error, Debug)]
#[error("Error in {kind}{}: {error}",
    match line {
        Some(l) => format!(" at line {}", l),
        None => String::new(),
    }
)]
pub struct ParseError {
    /// Line number where the error occurred (1-based, None if not available)
    pub line: Option<usize>,
    /// The resource being parsed
    pub kind: ResourceKind,
    /// The specific error that occurred
    pub error: ValueError,
}

impl ParseError {
    /// Create a new ParseError.
    pub fn new(line: Option<usize>, kind: ResourceKind, error: ValueError) -> Self {
        Self { line, kind, error }
    }

    /// Create a ParseError without position information.
    pub fn without_position(kind: ResourceKind, error: ValueError) -> Self {
        Self::new(None, kind, error)
    }
}

/// Specific value-level errors that can occur during parsing.
#[derive(Error, Debug)]
pub enum ValueError {
    #[error("Bad syntax: {0}")]
    Syntax(String),

    #[error("Missing value for {key}")]
    MissingValue {
        field: &'static str,
        key: &'static str,
    },

    #[error("Blocked by Google Scholar (CAPTCHA / robot check)")]
    Blocked,
}
