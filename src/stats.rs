//! Citation metrics table.
//!
//! `publications_stats.csv` mirrors the metrics box of a Scholar profile:
//!
//! ```text
//! ,All,Since 2020
//! Citations,1041,677
//! h-index,15,12
//! i10-index,20,16
//! ```
//!
//! The header row fills `#stats-table thead tr`, the data rows fill
//! `#stats-table-body`, and each metric name links to the profile.

use crate::csv::{SplitMode, split_line, text_lines};
use crate::html::{Element, Node};
use crate::page::{Document, MountPoint};
use crate::{Panel, ResourceKind, SiteConfig};
use serde::{Deserialize, Serialize};

/// One metric with its values, e.g. `["Citations", "1041", "677"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: String,
    pub values: Vec<String>,
}

/// Parsed metrics table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsTable {
    pub headers: Vec<String>,
    pub rows: Vec<MetricRow>,
}

impl MetricsTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Values for `metric`, matched without regard to case.
    pub fn get(&self, metric: &str) -> Option<&MetricRow> {
        self.rows
            .iter()
            .find(|row| row.metric.eq_ignore_ascii_case(metric))
    }
}

/// Renders the metrics header and body.
#[derive(Debug, Clone)]
pub struct StatsPanel {
    profile_url: String,
}

impl StatsPanel {
    pub fn new(profile_url: impl Into<String>) -> Self {
        Self {
            profile_url: profile_url.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.profile_url())
    }

    pub fn header_cells(&self, table: &MetricsTable) -> Vec<Node> {
        table
            .headers
            .iter()
            .map(|text| {
                Element::new("th")
                    .with_class("gsc_rsb_sth")
                    .with_text(text.as_str())
                    .into()
            })
            .collect()
    }

    pub fn body_rows(&self, table: &MetricsTable) -> Vec<Node> {
        table
            .rows
            .iter()
            .map(|row| {
                let link = Element::new("a")
                    .with_attr("href", self.profile_url.as_str())
                    .with_attr("target", "_blank")
                    .with_text(row.metric.as_str());
                let tr = Element::new("tr").with_child(Element::new("td").with_child(link));
                row.values
                    .iter()
                    .fold(tr, |tr, value| {
                        tr.with_child(Element::new("td").with_text(value.as_str()))
                    })
                    .into()
            })
            .collect()
    }
}

impl Panel for StatsPanel {
    type Model = MetricsTable;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Stats
    }

    /// Fewer than two non-blank lines yields an empty table.
    fn parse(&self, input: &str) -> MetricsTable {
        let mut lines = text_lines(input).map(|(_, line)| line);
        let (Some(header), Some(first)) = (lines.next(), lines.next()) else {
            return MetricsTable::default();
        };

        let rows = std::iter::once(first)
            .chain(lines)
            .map(|line| {
                let mut parts = split_line(line, SplitMode::Plain).into_iter();
                MetricRow {
                    metric: parts.next().unwrap_or_default(),
                    values: parts.collect(),
                }
            })
            .collect();

        MetricsTable {
            headers: split_line(header, SplitMode::Plain),
            rows,
        }
    }

    /// Returns whether the body was rendered; the header is best-effort.
    fn render(&self, model: &MetricsTable, document: &mut dyn Document) -> bool {
        if model.is_empty() {
            return false;
        }
        document.mount(MountPoint::StatsHead, &self.header_cells(model));
        document.mount(MountPoint::StatsBody, &self.body_rows(model))
    }
}
