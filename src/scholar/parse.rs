//! Reading a Scholar profile page.

use crate::ResourceKind;
use crate::error::{ParseError, ValueError, fields};
use crate::publications::Publication;
use crate::utils::parse_digits;
use regex::RegexSet;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Phrases Scholar shows instead of a profile when it suspects a robot.
pub const BLOCK_PATTERNS: [&str; 6] = [
    r"Please show you're not a robot",
    r"Our systems have detected unusual traffic",
    r"unusual traffic from your computer network",
    r"detected unusual traffic",
    r"enable JavaScript",
    r"Sorry, we can't verify that you're not a robot",
];

static BLOCK_SET: LazyLock<Option<RegexSet>> = LazyLock::new(|| {
    RegexSet::new(
        BLOCK_PATTERNS
            .iter()
            .map(|pattern| format!("(?i){}", regex::escape(pattern))),
    )
    .ok()
});

/// Whether the page is a CAPTCHA or robot check rather than a profile.
pub fn is_blocked(html: &str) -> bool {
    match BLOCK_SET.as_ref() {
        Some(set) => set.is_match(html),
        None => {
            let lower = html.to_lowercase();
            BLOCK_PATTERNS
                .iter()
                .any(|pattern| lower.contains(&pattern.to_lowercase()))
        }
    }
}

/// The profile's metrics box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScholarMetrics {
    pub headers: [String; 3],
    pub rows: Vec<[String; 3]>,
}

/// Everything the profile page itself provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfilePage {
    pub metrics: ScholarMetrics,
    /// (year, citations) as displayed, oldest first
    pub history: Vec<(String, String)>,
    /// The publication rows shown on the first page
    pub publications: Vec<Publication>,
}

impl ProfilePage {
    /// Parses a profile page. Only the metrics table is required.
    pub fn parse(html: &str) -> Result<Self, ParseError> {
        let document = Html::parse_document(html);
        Ok(Self {
            metrics: parse_metrics(&document)?,
            history: parse_citation_history(&document)?,
            publications: parse_publications(&document)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| {
        ParseError::without_position(
            ResourceKind::ScholarProfile,
            ValueError::Syntax(format!("invalid selector {}: {:?}", css, e)),
        )
    })
}

/// Text of an element with each piece trimmed, as displayed.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn texts<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    elements.map(text_of).collect()
}

fn missing(key: &'static str) -> ParseError {
    ParseError::without_position(
        ResourceKind::ScholarProfile,
        ValueError::MissingValue {
            field: fields::METRICS,
            key,
        },
    )
}

/// Reads `table#gsc_rsb_st`: three header cells and every row with exactly
/// three data cells.
pub fn parse_metrics(document: &Html) -> Result<ScholarMetrics, ParseError> {
    let table = document
        .select(&selector("table#gsc_rsb_st")?)
        .next()
        .ok_or_else(|| missing("#gsc_rsb_st"))?;

    let th = texts(table.select(&selector("th")?));
    let header = |index: usize, default: &str| match th.get(index) {
        Some(text) if th.len() >= 3 && !text.is_empty() => text.clone(),
        _ => default.to_string(),
    };
    let headers = [
        header(0, "Metric"),
        header(1, "All"),
        header(2, "Since"),
    ];

    let td = selector("td")?;
    let rows: Vec<[String; 3]> = table
        .select(&selector("tr")?)
        .filter_map(|tr| <[String; 3]>::try_from(texts(tr.select(&td))).ok())
        .collect();

    if rows.is_empty() {
        return Err(missing("metrics rows"));
    }
    Ok(ScholarMetrics { headers, rows })
}

/// Reads the citations-per-year chart.
///
/// Year labels (`.gsc_g_t`) are paired with counts (`.gsc_g_al`) in order.
/// When the page-wide lists are empty or uneven, the chart container is
/// searched instead. Empty years are dropped, empty counts become "0", and
/// rows are ordered by the digits of the year.
pub fn parse_citation_history(document: &Html) -> Result<Vec<(String, String)>, ParseError> {
    let mut years = texts(document.select(&selector("span.gsc_g_t")?));
    let mut cites = texts(document.select(&selector("span.gsc_g_al")?));

    if years.is_empty() || cites.is_empty() || years.len() != cites.len() {
        debug!("citation chart spans uneven, reading chart container");
        let year_sel = selector(".gsc_g_t")?;
        let cite_sel = selector(".gsc_g_al")?;
        match document.select(&selector("div.gsc_md_hist_b")?).next() {
            Some(container) => {
                years = texts(container.select(&year_sel));
                cites = texts(container.select(&cite_sel));
            }
            None => {
                years = texts(document.select(&year_sel));
                cites = texts(document.select(&cite_sel));
            }
        }
    }

    let mut pairs: Vec<(String, String)> = years
        .into_iter()
        .zip(cites)
        .filter(|(year, _)| !year.is_empty())
        .map(|(year, count)| {
            let count = if count.is_empty() { "0".to_string() } else { count };
            (year, count)
        })
        .collect();
    pairs.sort_by_key(|(year, _)| parse_digits(year));
    Ok(pairs)
}

/// Parses the publication rows of a profile or listing page.
pub fn parse_publication_page(html: &str) -> Result<Vec<Publication>, ParseError> {
    parse_publications(&Html::parse_document(html))
}

/// Reads the publication rows (`#gsc_a_b .gsc_a_tr`) of a profile page.
pub fn parse_publications(document: &Html) -> Result<Vec<Publication>, ParseError> {
    let row_sel = selector("#gsc_a_b .gsc_a_tr")?;
    let title_sel = selector(".gsc_a_t a")?;
    let gray_sel = selector(".gsc_a_t .gs_gray")?;
    let cites_link_sel = selector(".gsc_a_c a")?;
    let cites_sel = selector(".gsc_a_c")?;
    let year_span_sel = selector(".gsc_a_y span")?;
    let year_sel = selector(".gsc_a_y")?;

    let first_text = |row: ElementRef<'_>, preferred: &Selector, fallback: Option<&Selector>| {
        row.select(preferred)
            .next()
            .or_else(|| fallback.and_then(|sel| row.select(sel).next()))
            .map(text_of)
            .unwrap_or_default()
    };

    Ok(document
        .select(&row_sel)
        .map(|row| {
            let mut gray = row.select(&gray_sel).map(text_of);
            Publication {
                title: first_text(row, &title_sel, None),
                authors: gray.next().unwrap_or_default(),
                venue: gray.next().unwrap_or_default(),
                year: first_text(row, &year_span_sel, Some(&year_sel)),
                citations: first_text(row, &cites_link_sel, Some(&cites_sel)),
            }
        })
        .collect())
}
