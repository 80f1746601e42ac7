//! Splitter configuration.

use serde::{Deserialize, Serialize};

/// How a line is cut into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Split on every comma.
    #[default]
    Plain,
    /// Split only on commas outside balanced double quotes, then strip one
    /// enclosing quote from each end of every field.
    QuoteAware,
}

/// Configuration for reading the site's CSV files.
///
/// # Examples
///
/// ```
/// use scholar_panels::csv::{CsvConfig, SplitMode};
///
/// let mut config = CsvConfig::new();
/// config.set_mode(SplitMode::QuoteAware).set_trim(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    /// Field splitting strategy
    pub(crate) mode: SplitMode,
    /// Whether the first non-blank line holds column names
    pub(crate) has_header: bool,
    /// Whether to trim whitespace around fields
    pub(crate) trim: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Plain splitting with a header row and untrimmed fields.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: SplitMode::Plain,
            has_header: true,
            trim: false,
        }
    }

    /// Quote-aware splitting with a header row, as used for publication lists.
    #[must_use]
    pub fn quote_aware() -> Self {
        Self {
            mode: SplitMode::QuoteAware,
            ..Self::new()
        }
    }

    pub fn set_mode(&mut self, mode: SplitMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn set_has_header(&mut self, has_header: bool) -> &mut Self {
        self.has_header = has_header;
        self
    }

    pub fn set_trim(&mut self, trim: bool) -> &mut Self {
        self.trim = trim;
        self
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }
}
