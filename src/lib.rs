//! Publication, citation and ranking panels for an academic profile site.
//!
//! `scholar_panels` turns the site's small CSV data files into the HTML
//! panels of the profile page, and keeps those files fresh from a public
//! Google Scholar profile.
//!
//! # Features
//!
//! - `http` - Load data files over HTTP (enabled by default)
//! - `scholar` - Scrape a Scholar profile into the CSV files (enabled by default)
//! - `cli` - The `scholar-panels` binary (enabled by default)
//!
//! # Panels
//!
//! | Resource                 | Panel                                  | Mount point(s)                               |
//! |--------------------------|----------------------------------------|----------------------------------------------|
//! | `publications.csv`       | [`PublicationsPanel`]                  | `#publications`                              |
//! | `publications_stats.csv` | [`StatsPanel`]                         | `#stats-table thead tr`, `#stats-table-body` |
//! | `citation_history.csv`   | [`HistoryPanel`]                       | `#citation-graph`                            |
//! | `ranking_summary.csv`    | [`RankingPanel`]                       | `#rank-summary`                              |
//!
//! Each panel parses its text into plain rows and renders them as an
//! [`html::Node`] list that fully replaces a mount point of a
//! [`page::Page`]. Parsing never fails: malformed rows degrade to empty or
//! zero values.
//!
//! # Basic Usage
//!
//! ```rust
//! use scholar_panels::{HistoryPanel, Panel};
//! use scholar_panels::page::{MountPoint, Page};
//!
//! let panel = HistoryPanel::new();
//! let points = panel.parse("Year,Citations\n2022,10\n2023,20");
//!
//! let mut page = Page::skeleton();
//! assert!(panel.render(&points, &mut page));
//! assert!(page.contents(MountPoint::CitationGraph).unwrap().contains("height: 140px"));
//! ```
//!
//! # Loading a Page
//!
//! ```rust
//! use scholar_panels::SiteConfig;
//! use scholar_panels::loader::{load_page, MemorySource};
//! use scholar_panels::page::Page;
//! use scholar_panels::ResourceKind;
//!
//! let source = MemorySource::new()
//!     .with("publications.csv", "Title,Authors,Venue,Year,Citations\nA,B,C,2020,1");
//!
//! let mut page = Page::skeleton();
//! let report = load_page(&source, &mut page, &SiteConfig::new());
//!
//! assert_eq!(report.rendered, vec![ResourceKind::Publications]);
//! // The history graph is optional; the other two panels report a failure.
//! assert_eq!(report.skipped, vec![ResourceKind::CitationHistory]);
//! assert_eq!(report.failures.len(), 2);
//! ```
//!
//! # Error Handling
//!
//! Rendering is infallible. Fetching and profile scraping use
//! [`PanelError`] and its parts:
//!
//! ```rust
//! use scholar_panels::{FetchError, PanelError};
//!
//! let err: PanelError = FetchError::NotFound { path: "citation_history.csv".into() }.into();
//! assert_eq!(err.to_string(), "citation_history.csv not found");
//! ```

pub mod chrome;
pub mod config;
pub mod csv;
pub mod error;
pub mod history;
pub mod html;
pub mod loader;
pub mod page;
pub mod publications;
pub mod ranking;
#[cfg(feature = "scholar")]
pub mod scholar;
pub mod stats;

// Reexports
pub use config::SiteConfig;
pub use error::{FetchError, PanelError, ParseError, ValueError};
pub use history::HistoryPanel;
pub use publications::PublicationsPanel;
pub use ranking::RankingPanel;
pub use stats::StatsPanel;

mod utils;

use page::Document;
use serde::{Deserialize, Serialize};

/// The data resources behind the panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Publications,
    Stats,
    CitationHistory,
    RankingSummary,
    ScholarProfile,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Publications => "publications.csv",
            ResourceKind::Stats => "publications_stats.csv",
            ResourceKind::CitationHistory => "citation_history.csv",
            ResourceKind::RankingSummary => "ranking_summary.csv",
            ResourceKind::ScholarProfile => "Scholar profile",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page panel fed by one CSV resource.
pub trait Panel {
    /// Rows parsed from the resource.
    type Model;

    /// Resource this panel reads.
    fn kind(&self) -> ResourceKind;

    /// Whether a missing resource just means the panel is not shown.
    fn is_optional(&self) -> bool {
        false
    }

    /// Parse resource text. Malformed input degrades rather than failing.
    fn parse(&self, input: &str) -> Self::Model;

    /// Render into the document, replacing the panel's mount points.
    ///
    /// Returns `false` when nothing was rendered, for example because the
    /// mount point is missing.
    fn render(&self, model: &Self::Model, document: &mut dyn Document) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(format!("{}", ResourceKind::Publications), "publications.csv");
        assert_eq!(format!("{}", ResourceKind::Stats), "publications_stats.csv");
        assert_eq!(
            format!("{}", ResourceKind::CitationHistory),
            "citation_history.csv"
        );
        assert_eq!(
            format!("{}", ResourceKind::RankingSummary),
            "ranking_summary.csv"
        );
    }

    #[test]
    fn test_only_history_is_optional() {
        assert!(HistoryPanel::new().is_optional());
        assert!(!PublicationsPanel::new().is_optional());
        assert!(!RankingPanel::new().is_optional());
        assert!(!StatsPanel::new("").is_optional());
    }

    #[test]
    fn test_panel_kinds() {
        assert_eq!(HistoryPanel::new().kind(), ResourceKind::CitationHistory);
        assert_eq!(PublicationsPanel::new().kind(), ResourceKind::Publications);
        assert_eq!(RankingPanel::new().kind(), ResourceKind::RankingSummary);
        assert_eq!(StatsPanel::new("").kind(), ResourceKind::Stats);
    }
}
