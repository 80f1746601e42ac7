//! The page shell: an HTML template with named mount points.
//!
//! A mount point is the region between `<!-- mount:NAME -->` and
//! `<!-- /mount:NAME -->`. Mounting replaces everything in that region, so
//! rendering the same panel twice leaves only the latest output.

use crate::html::{Node, render_nodes};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The containers panels render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MountPoint {
    /// `#publications`
    Publications,
    /// `#stats-table thead tr`
    StatsHead,
    /// `#stats-table-body`
    StatsBody,
    /// `#citation-graph`
    CitationGraph,
    /// `#rank-summary`
    RankSummary,
}

impl MountPoint {
    pub const ALL: [MountPoint; 5] = [
        MountPoint::Publications,
        MountPoint::StatsHead,
        MountPoint::StatsBody,
        MountPoint::CitationGraph,
        MountPoint::RankSummary,
    ];

    /// Name used in the template markers.
    pub fn name(&self) -> &'static str {
        match self {
            MountPoint::Publications => "publications",
            MountPoint::StatsHead => "stats-head",
            MountPoint::StatsBody => "stats-body",
            MountPoint::CitationGraph => "citation-graph",
            MountPoint::RankSummary => "rank-summary",
        }
    }

    /// The page selector this mount point stands for.
    pub fn selector(&self) -> &'static str {
        match self {
            MountPoint::Publications => "#publications",
            MountPoint::StatsHead => "#stats-table thead tr",
            MountPoint::StatsBody => "#stats-table-body",
            MountPoint::CitationGraph => "#citation-graph",
            MountPoint::RankSummary => "#rank-summary",
        }
    }

    fn open_marker(&self) -> String {
        format!("<!-- mount:{} -->", self.name())
    }

    fn close_marker(&self) -> String {
        format!("<!-- /mount:{} -->", self.name())
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// Anything panels can render into.
pub trait Document {
    /// Replace the contents of `mount` with `nodes`.
    ///
    /// Returns `false`, leaving the document untouched, when the mount point
    /// does not exist.
    fn mount(&mut self, mount: MountPoint, nodes: &[Node]) -> bool;

    fn has_mount(&self, mount: MountPoint) -> bool;
}

/// An HTML template with marker comments around each mount point.
///
/// # Examples
///
/// ```
/// use scholar_panels::html::{Element, Node};
/// use scholar_panels::page::{Document, MountPoint, Page};
///
/// let mut page = Page::new(
///     r#"<div id="rank-summary"><!-- mount:rank-summary -->Loading…<!-- /mount:rank-summary --></div>"#,
/// );
/// let nodes = vec![Node::from(Element::new("p").with_text("No data"))];
/// assert!(page.mount(MountPoint::RankSummary, &nodes));
/// assert!(page.html().contains("<p>No data</p>"));
/// assert!(!page.html().contains("Loading"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    html: String,
}

impl Page {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            html: template.into(),
        }
    }

    /// A bare page exposing every mount point, one per line.
    pub fn skeleton() -> Self {
        let html = MountPoint::ALL
            .iter()
            .map(|m| format!("{}{}\n", m.open_marker(), m.close_marker()))
            .collect::<String>();
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    /// Current contents of a mount point.
    pub fn contents(&self, mount: MountPoint) -> Option<&str> {
        self.region(mount).map(|(start, end)| &self.html[start..end])
    }

    /// Byte range between the open and close markers.
    fn region(&self, mount: MountPoint) -> Option<(usize, usize)> {
        let open = mount.open_marker();
        let close = mount.close_marker();
        let start = self.html.find(&open)? + open.len();
        let end = start + self.html[start..].find(&close)?;
        Some((start, end))
    }
}

impl Document for Page {
    fn mount(&mut self, mount: MountPoint, nodes: &[Node]) -> bool {
        let Some((start, end)) = self.region(mount) else {
            debug!(mount = %mount, "mount point missing, skipping render");
            return false;
        };
        self.html.replace_range(start..end, &render_nodes(nodes));
        true
    }

    fn has_mount(&self, mount: MountPoint) -> bool {
        self.region(mount).is_some()
    }
}
