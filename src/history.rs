//! Citation history bar graph.
//!
//! Rows of `citation_history.csv` become one bar per year: duplicates keep
//! their highest count, years are ascending and only the most recent
//! `window` years are drawn. Bars scale against the tallest one in the window.
//!
//! # Example
//!
//! ```
//! use scholar_panels::history::{HistoryPoint, parse_history};
//!
//! let points = parse_history("Year,Citations\n2019,5\n2020,3\n2019,9\n2021,0", 8);
//! assert_eq!(
//!     points,
//!     vec![
//!         HistoryPoint::new(2019, 9),
//!         HistoryPoint::new(2020, 3),
//!         HistoryPoint::new(2021, 0),
//!     ]
//! );
//! ```

use crate::csv::{SplitMode, split_line, text_lines};
use crate::html::{Element, Node};
use crate::page::{Document, MountPoint};
use crate::utils::{format_number, parse_int_prefix};
use crate::{Panel, ResourceKind, SiteConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Citations received in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub year: i32,
    pub citations: u64,
}

impl HistoryPoint {
    pub fn new(year: i32, citations: u64) -> Self {
        Self { year, citations }
    }
}

/// A point with its computed bar height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphBar {
    pub year: i32,
    pub citations: u64,
    pub height: f64,
}

/// Where the tallest bar's height comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphHeight {
    /// A fixed pixel height.
    Fixed(f64),
    /// Measured from the container, minus room for the labels.
    Measured { container: f64, reserved: f64 },
}

impl GraphHeight {
    /// Usable pixel height, never negative.
    pub fn resolve(&self) -> f64 {
        let height = match *self {
            GraphHeight::Fixed(height) => height,
            GraphHeight::Measured {
                container,
                reserved,
            } => container - reserved,
        };
        if height.is_finite() { height.max(0.0) } else { 0.0 }
    }
}

/// Parses, deduplicates, sorts and windows the history.
///
/// The first non-blank line is treated as a header and dropped. Rows whose
/// year has no integer prefix are dropped; counts that do not parse, or are
/// negative, become 0.
pub fn parse_history(input: &str, window: usize) -> Vec<HistoryPoint> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();

    for (line_number, line) in text_lines(input).skip(1) {
        let fields = split_line(line, SplitMode::Plain);
        let year_text = fields.first().map(String::as_str).unwrap_or("");
        let Some(year) = parse_int_prefix(year_text).and_then(|y| i32::try_from(y).ok()) else {
            debug!(line = line_number, year = year_text, "dropping history row without a year");
            continue;
        };
        let citations = fields
            .get(1)
            .and_then(|c| parse_int_prefix(c))
            .and_then(|c| u64::try_from(c).ok())
            .unwrap_or(0);

        by_year
            .entry(year)
            .and_modify(|existing| *existing = (*existing).max(citations))
            .or_insert(citations);
    }

    let skip = by_year.len().saturating_sub(window);
    by_year
        .into_iter()
        .skip(skip)
        .map(|(year, citations)| HistoryPoint { year, citations })
        .collect()
}

/// Scales each point against the largest count. All-zero input gives
/// zero-height bars.
pub fn scale_bars(points: &[HistoryPoint], max_height: f64) -> Vec<GraphBar> {
    let max = points.iter().map(|p| p.citations).max().unwrap_or(0);
    points
        .iter()
        .map(|p| {
            let height = if max > 0 {
                p.citations as f64 / max as f64 * max_height
            } else {
                0.0
            };
            GraphBar {
                year: p.year,
                citations: p.citations,
                height,
            }
        })
        .collect()
}

/// Renders the history graph into `#citation-graph`.
#[derive(Debug, Clone)]
pub struct HistoryPanel {
    window: usize,
    height: GraphHeight,
}

impl Default for HistoryPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryPanel {
    /// Eight years, 140 px bars.
    #[must_use]
    pub fn new() -> Self {
        Self {
            window: 8,
            height: GraphHeight::Fixed(140.0),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            window: config.history_window(),
            height: GraphHeight::Fixed(config.graph_height()),
        }
    }

    pub fn set_window(&mut self, window: usize) -> &mut Self {
        self.window = window;
        self
    }

    pub fn set_height(&mut self, height: GraphHeight) -> &mut Self {
        self.height = height;
        self
    }

    pub fn height(&self) -> GraphHeight {
        self.height
    }

    /// Switches to a measured height after the container changed size.
    pub fn resize(&mut self, container: f64, reserved: f64) {
        self.height = GraphHeight::Measured {
            container,
            reserved,
        };
    }

    pub fn bars(&self, points: &[HistoryPoint]) -> Vec<GraphBar> {
        scale_bars(points, self.height.resolve())
    }

    pub fn build_graph(&self, points: &[HistoryPoint]) -> Vec<Node> {
        self.bars(points)
            .into_iter()
            .map(|bar| {
                Element::new("div")
                    .with_class("graph-bar-item")
                    .with_child(
                        Element::new("span")
                            .with_class("bar-label")
                            .with_text(bar.citations.to_string()),
                    )
                    .with_child(
                        Element::new("div")
                            .with_class("graph-bar")
                            .with_attr("style", format!("height: {}px", format_number(bar.height))),
                    )
                    .with_child(
                        Element::new("div")
                            .with_class("year-label")
                            .with_text(bar.year.to_string()),
                    )
                    .into()
            })
            .collect()
    }
}

impl Panel for HistoryPanel {
    type Model = Vec<HistoryPoint>;

    fn kind(&self) -> ResourceKind {
        ResourceKind::CitationHistory
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn parse(&self, input: &str) -> Vec<HistoryPoint> {
        parse_history(input, self.window)
    }

    /// An empty history leaves the container as it was.
    fn render(&self, model: &Vec<HistoryPoint>, document: &mut dyn Document) -> bool {
        if model.is_empty() {
            return false;
        }
        document.mount(MountPoint::CitationGraph, &self.build_graph(model))
    }
}
