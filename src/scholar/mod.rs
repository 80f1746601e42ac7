//! Refreshing the data files from a public Google Scholar profile.
//!
//! Scholar has no public API for author metrics, so the profile page is
//! fetched and read the way a visitor sees it: the metrics box, the
//! citations-per-year chart and the publication list. The results are
//! written as `publications_stats.csv`, `citation_history.csv` and
//! `publications.csv`.
//!
//! Scholar sometimes answers automated requests with a robot check. By
//! default an update that cannot complete leaves the existing files in place
//! and still succeeds; [`UpdateOptions::strict`] turns that into an error.
//!
//! ```no_run
//! use scholar_panels::scholar::{ScholarClient, UpdateOptions, update};
//!
//! let client = ScholarClient::http()?;
//! let options = UpdateOptions::new("https://scholar.google.com/citations?user=XXXX&hl=en");
//! let outcome = update(&client, &options)?;
//! println!("{:?}", outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod parse;
mod write;

pub use client::{
    ListingUrls, Pagination, RetryPolicy, ScholarClient, ScholarHttp, USER_AGENTS,
    extract_user_id,
};
pub use parse::{
    BLOCK_PATTERNS, ProfilePage, ScholarMetrics, is_blocked, parse_citation_history,
    parse_metrics, parse_publication_page, parse_publications,
};
pub use write::{to_csv, write_profile};

use crate::config::DEFAULT_PROFILE_URL;
use crate::error::PanelError;
use crate::loader::Source;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Settings for one profile update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOptions {
    pub profile_url: String,
    pub out_dir: PathBuf,
    /// A saved copy of the profile page
    pub html_file: Option<PathBuf>,
    /// Read `html_file` instead of fetching the profile
    pub prefer_html: bool,
    /// Fail instead of keeping the old files when the update cannot finish
    pub strict: bool,
    pub pagination: Pagination,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_URL)
    }
}

impl UpdateOptions {
    pub fn new(profile_url: impl Into<String>) -> Self {
        Self {
            profile_url: profile_url.into(),
            out_dir: PathBuf::from("data"),
            html_file: None,
            prefer_html: false,
            strict: false,
            pagination: Pagination::default(),
        }
    }
}

/// Result of a non-failing update.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The three files were rewritten.
    Written(Vec<PathBuf>),
    /// The update failed and the existing files were kept.
    Unchanged(PanelError),
}

impl UpdateOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, UpdateOutcome::Written(_))
    }
}

/// Fetches the profile and rewrites the CSV files.
///
/// # Errors
///
/// Only in strict mode: any fetch, parse or write failure. Otherwise
/// failures are logged and reported as [`UpdateOutcome::Unchanged`].
pub fn update<S: Source>(
    client: &ScholarClient<S>,
    options: &UpdateOptions,
) -> Result<UpdateOutcome, PanelError> {
    match refresh(client, options) {
        Ok(paths) => {
            for path in &paths {
                info!(path = %path.display(), "wrote");
            }
            Ok(UpdateOutcome::Written(paths))
        }
        Err(e) => {
            error!(error = %e, "profile update failed");
            if options.strict {
                return Err(e);
            }
            warn!("non-strict mode: leaving existing CSVs unchanged");
            Ok(UpdateOutcome::Unchanged(e))
        }
    }
}

fn refresh<S: Source>(
    client: &ScholarClient<S>,
    options: &UpdateOptions,
) -> Result<Vec<PathBuf>, PanelError> {
    let html = match (&options.html_file, options.prefer_html) {
        (Some(path), true) => {
            info!(path = %path.display(), "loading local snapshot");
            read_snapshot(path)?
        }
        _ => {
            info!(url = %options.profile_url, "fetching profile");
            client.fetch_profile(&options.profile_url)?
        }
    };

    let profile = ProfilePage::parse(&html)?;

    let mut publications =
        client.fetch_all_publications(&options.profile_url, &options.pagination);
    if publications.is_empty() {
        warn!("could not page through publications, using the profile page rows");
        publications = profile.publications;
    }

    write_profile(
        &options.out_dir,
        &profile.metrics,
        &profile.history,
        &publications,
    )
}

/// Reads a saved page, replacing invalid UTF-8.
fn read_snapshot(path: &Path) -> Result<String, PanelError> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
