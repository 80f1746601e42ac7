//! Venue ranking summary.
//!
//! `ranking_summary.csv` holds `type,rank,count` rows. Conference counts are
//! shown against the CORE labels A*, A, B and C, journal counts against the
//! quartiles Q1 to Q4. Each bucket is scaled against its own largest count.

use crate::csv::{CsvConfig, csv_parse};
use crate::html::{Element, Node};
use crate::page::{Document, MountPoint};
use crate::utils::{format_number, paper_count, parse_int_prefix, percent_of};
use crate::{Panel, ResourceKind};
use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

pub const CONFERENCE_RANKS: [&str; 4] = ["A*", "A", "B", "C"];
pub const JOURNAL_RANKS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Styling class for labels outside both orderings.
pub const LOWEST_RANK_CLASS: &str = "rank-tier-4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueType {
    Conference,
    Journal,
}

impl VenueType {
    pub fn parse(text: &str) -> Option<VenueType> {
        match text.trim().to_ascii_lowercase().as_str() {
            "conference" => Some(VenueType::Conference),
            "journal" => Some(VenueType::Journal),
            _ => None,
        }
    }

    /// Rank labels of this bucket, best first.
    pub fn ranks(&self) -> &'static [&'static str; 4] {
        match self {
            VenueType::Conference => &CONFERENCE_RANKS,
            VenueType::Journal => &JOURNAL_RANKS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VenueType::Conference => "conference",
            VenueType::Journal => "journal",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            VenueType::Conference => "Conferences",
            VenueType::Journal => "Journals",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling class for a rank label: tiers 1 to 4 follow the position in
/// either ordering.
pub fn rank_class(label: &str) -> &'static str {
    let label = label.trim();
    let tier = [CONFERENCE_RANKS, JOURNAL_RANKS]
        .iter()
        .find_map(|ranks| ranks.iter().position(|r| r.eq_ignore_ascii_case(label)));
    match tier {
        Some(0) => "rank-tier-1",
        Some(1) => "rank-tier-2",
        Some(2) => "rank-tier-3",
        _ => LOWEST_RANK_CLASS,
    }
}

/// Count for one rank label, with its bar width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankCount {
    pub label: CompactString,
    pub count: u32,
    /// Width relative to the bucket maximum, 0 to 100.
    pub percent: f64,
}

/// One fixed-order set of ranks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankBucket {
    pub venue: VenueType,
    pub ranks: Vec<RankCount>,
    pub max: u32,
}

impl RankBucket {
    fn build(venue: VenueType, counts: &HashMap<(VenueType, CompactString), u32>) -> Self {
        let raw: Vec<(CompactString, u32)> = venue
            .ranks()
            .iter()
            .map(|label| {
                let label = CompactString::from(*label);
                let count = counts.get(&(venue, label.clone())).copied().unwrap_or(0);
                (label, count)
            })
            .collect();
        let max = raw.iter().map(|(_, count)| *count).max().unwrap_or(0);
        let ranks = raw
            .into_iter()
            .map(|(label, count)| RankCount {
                label,
                count,
                percent: percent_of(count, max),
            })
            .collect();
        Self { venue, ranks, max }
    }

    pub fn get(&self, label: &str) -> Option<&RankCount> {
        self.ranks.iter().find(|r| r.label.eq_ignore_ascii_case(label))
    }

    pub fn total(&self) -> u32 {
        self.ranks
            .iter()
            .fold(0, |acc, r| acc.saturating_add(r.count))
    }
}

/// Both buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSummary {
    pub conference: RankBucket,
    pub journal: RankBucket,
}

impl RankingSummary {
    pub fn buckets(&self) -> [&RankBucket; 2] {
        [&self.conference, &self.journal]
    }
}

/// Parses `type,rank,count` text into both buckets.
///
/// Rows with an unknown type are skipped. Repeated (type, rank) rows add up.
/// Counts that do not parse or are negative count as 0.
pub fn parse_ranking(input: &str) -> RankingSummary {
    let mut config = CsvConfig::new();
    config.set_trim(true);
    let table = csv_parse(input, &config);

    let type_col = table.column_index("type").unwrap_or(0);
    let rank_col = table.column_index("rank").unwrap_or(1);
    let count_col = table.column_index("count").unwrap_or(2);

    let counts: HashMap<(VenueType, CompactString), u32> = table
        .records()
        .iter()
        .filter_map(|record| {
            let Some(venue) = VenueType::parse(record.field(type_col)) else {
                debug!(
                    line = record.line_number(),
                    venue = record.field(type_col),
                    "skipping ranking row with unknown type"
                );
                return None;
            };
            let label = normalize_label(record.field(rank_col));
            let count = parse_int_prefix(record.field(count_col))
                .and_then(|c| u32::try_from(c).ok())
                .unwrap_or(0);
            Some(((venue, label), count))
        })
        .into_grouping_map()
        .fold(0, |acc: u32, _, count| acc.saturating_add(count));

    RankingSummary {
        conference: RankBucket::build(VenueType::Conference, &counts),
        journal: RankBucket::build(VenueType::Journal, &counts),
    }
}

/// Canonical spelling of a rank label ("q1" -> "Q1", "a*" -> "A*").
fn normalize_label(label: &str) -> CompactString {
    CompactString::from(label.trim().to_ascii_uppercase())
}

/// Renders both buckets into `#rank-summary`.
#[derive(Debug, Clone, Default)]
pub struct RankingPanel;

impl RankingPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn build_summary(&self, summary: &RankingSummary) -> Vec<Node> {
        summary
            .buckets()
            .into_iter()
            .map(|bucket| {
                let title = Element::new("h4")
                    .with_class("rank-group-title")
                    .with_text(bucket.venue.title());
                bucket
                    .ranks
                    .iter()
                    .fold(
                        Element::new("div")
                            .with_class("rank-group")
                            .with_class(&format!("rank-group-{}", bucket.venue))
                            .with_child(title),
                        |group, rank| group.with_child(rank_row(rank)),
                    )
                    .into()
            })
            .collect()
    }
}

fn rank_row(rank: &RankCount) -> Element {
    let class = rank_class(&rank.label);
    Element::new("div")
        .with_class("rank-row")
        .with_child(
            Element::new("span")
                .with_class("rank-label")
                .with_class(class)
                .with_text(rank.label.as_str()),
        )
        .with_child(
            Element::new("div").with_class("rank-bar-track").with_child(
                Element::new("div")
                    .with_class("rank-bar")
                    .with_class(class)
                    .with_attr("style", format!("width: {}%", format_number(rank.percent))),
            ),
        )
        .with_child(
            Element::new("span")
                .with_class("rank-count")
                .with_text(paper_count(rank.count)),
        )
}

impl Panel for RankingPanel {
    type Model = RankingSummary;

    fn kind(&self) -> ResourceKind {
        ResourceKind::RankingSummary
    }

    fn parse(&self, input: &str) -> RankingSummary {
        parse_ranking(input)
    }

    fn render(&self, model: &RankingSummary, document: &mut dyn Document) -> bool {
        document.mount(MountPoint::RankSummary, &self.build_summary(model))
    }
}
