//! Site configuration.
//!
//! Defaults reproduce the live site: resource names, the 140 px graph, the
//! eight-year history window and the layout breakpoints. Every field can be
//! overridden from a TOML file; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PROFILE_URL: &str =
    "https://scholar.google.com.pk/citations?user=6ZB86uYAAAAJ&hl=en";

/// Configuration for loading and rendering the profile panels.
///
/// # Examples
///
/// ```
/// use scholar_panels::SiteConfig;
///
/// let mut config = SiteConfig::new();
/// config.set_graph_height(200.0).set_history_window(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path of the publication list, relative to the data source
    pub(crate) publications_path: String,
    /// Path of the citation metrics table
    pub(crate) stats_path: String,
    /// Path of the per-year citation counts
    pub(crate) history_path: String,
    /// Path of the ranking summary
    pub(crate) ranking_path: String,
    /// Profile the metric names link to
    pub(crate) profile_url: String,
    /// Pixel height of the tallest history bar
    pub(crate) graph_height: f64,
    /// Number of most recent years shown in the history graph
    pub(crate) history_window: usize,
    /// Viewport width below which nav links close the menu
    pub(crate) nav_breakpoint: u32,
    /// Viewport width at or below which the short name is shown
    pub(crate) name_breakpoint: u32,
    /// Full and short forms of the owner's name, if substitution is wanted
    pub(crate) name_full: Option<String>,
    pub(crate) name_short: Option<String>,
    /// Quiet period before a resize is acted on
    pub(crate) resize_debounce_ms: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            publications_path: "publications.csv".to_string(),
            stats_path: "publications_stats.csv".to_string(),
            history_path: "citation_history.csv".to_string(),
            ranking_path: "ranking_summary.csv".to_string(),
            profile_url: DEFAULT_PROFILE_URL.to_string(),
            graph_height: 140.0,
            history_window: 8,
            nav_breakpoint: 960,
            name_breakpoint: 640,
            name_full: None,
            name_short: None,
            resize_debounce_ms: 150,
        }
    }

    pub fn set_publications_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.publications_path = path.into();
        self
    }

    pub fn set_stats_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.stats_path = path.into();
        self
    }

    pub fn set_history_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.history_path = path.into();
        self
    }

    pub fn set_ranking_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.ranking_path = path.into();
        self
    }

    pub fn set_profile_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.profile_url = url.into();
        self
    }

    pub fn set_graph_height(&mut self, height: f64) -> &mut Self {
        self.graph_height = height;
        self
    }

    pub fn set_history_window(&mut self, window: usize) -> &mut Self {
        self.history_window = window;
        self
    }

    pub fn set_nav_breakpoint(&mut self, width: u32) -> &mut Self {
        self.nav_breakpoint = width;
        self
    }

    pub fn set_name_variant(
        &mut self,
        full: impl Into<String>,
        short: impl Into<String>,
        breakpoint: u32,
    ) -> &mut Self {
        self.name_full = Some(full.into());
        self.name_short = Some(short.into());
        self.name_breakpoint = breakpoint;
        self
    }

    pub fn set_resize_debounce(&mut self, delay: Duration) -> &mut Self {
        self.resize_debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn publications_path(&self) -> &str {
        &self.publications_path
    }

    pub fn stats_path(&self) -> &str {
        &self.stats_path
    }

    pub fn history_path(&self) -> &str {
        &self.history_path
    }

    pub fn ranking_path(&self) -> &str {
        &self.ranking_path
    }

    pub fn profile_url(&self) -> &str {
        &self.profile_url
    }

    pub fn graph_height(&self) -> f64 {
        self.graph_height
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn nav_breakpoint(&self) -> u32 {
        self.nav_breakpoint
    }

    pub fn name_breakpoint(&self) -> u32 {
        self.name_breakpoint
    }

    /// The (full, short) name pair, when both are configured.
    pub fn name_variant(&self) -> Option<(&str, &str)> {
        match (&self.name_full, &self.name_short) {
            (Some(full), Some(short)) => Some((full.as_str(), short.as_str())),
            _ => None,
        }
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (key, path) in [
            ("publications_path", &self.publications_path),
            ("stats_path", &self.stats_path),
            ("history_path", &self.history_path),
            ("ranking_path", &self.ranking_path),
        ] {
            if path.trim().is_empty() {
                return Err(format!("'{}' cannot be empty", key));
            }
        }

        if !self.graph_height.is_finite() || self.graph_height < 0.0 {
            return Err(format!(
                "graph_height must be a non-negative number, got {}",
                self.graph_height
            ));
        }

        if self.history_window == 0 {
            return Err("history_window must be at least 1".to_string());
        }

        match (&self.name_full, &self.name_short) {
            (Some(full), Some(_)) if full.is_empty() => {
                Err("name_full cannot be empty".to_string())
            }
            (Some(_), None) | (None, Some(_)) => {
                Err("name_full and name_short must be set together".to_string())
            }
            _ => Ok(()),
        }
    }
}
