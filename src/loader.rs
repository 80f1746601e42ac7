//! Fetching data files and populating a page.
//!
//! Every resource is fetched independently; a failed or missing one only
//! affects its own panel. Fetches run in parallel, rendering then happens one
//! panel at a time so the document has a single writer.

use crate::error::{FetchError, PanelError};
use crate::page::Document;
use crate::{
    HistoryPanel, Panel, PublicationsPanel, RankingPanel, ResourceKind, SiteConfig, StatsPanel,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Where panel data comes from.
pub trait Source: Sync {
    /// Fetch the text of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when the resource does not exist, and
    /// another variant for any other failure.
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// Reads resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Source for DirSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path.trim_start_matches('/'));
        std::fs::read_to_string(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    path: path.to_string(),
                }
            } else {
                FetchError::Io {
                    path: path.to_string(),
                    source: e,
                }
            }
        })
    }
}

/// In-memory resources, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, path: &str, contents: &str) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: &str, contents: &str) {
        self.files.insert(path.to_string(), contents.to_string());
    }
}

impl Source for MemorySource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Fetches resources relative to a base URL.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(base, reqwest::blocking::Client::new())
    }

    pub fn with_client(base: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self {
            base: base.into(),
            client,
        }
    }

    /// Absolute URLs are used as they are, anything else is joined to the base.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}

#[cfg(feature = "http")]
impl Source for HttpSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        let http_err = |source| FetchError::Http {
            path: path.to_string(),
            source,
        };

        let response = self.client.get(&url).send().map_err(http_err)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_err)
    }
}

/// Picks an HTTP source for `http(s)://` locations and a directory otherwise.
pub fn open_source(location: &str) -> Box<dyn Source> {
    #[cfg(feature = "http")]
    if location.starts_with("http://") || location.starts_with("https://") {
        return Box::new(HttpSource::new(location));
    }
    Box::new(DirSource::new(location))
}

/// What happened to each panel during [`load_page`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Panels that rendered into the document
    pub rendered: Vec<ResourceKind>,
    /// Panels with nothing to show: an optional resource was absent, the
    /// data was empty or the mount point is missing
    pub skipped: Vec<ResourceKind>,
    /// Panels whose resource could not be loaded
    pub failures: Vec<(ResourceKind, PanelError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetches every panel's resource and renders what arrived.
///
/// Never fails as a whole: each problem is logged and recorded in the
/// report, and the remaining panels still render.
pub fn load_page(
    source: &dyn Source,
    document: &mut dyn Document,
    config: &SiteConfig,
) -> LoadReport {
    let paths = [
        config.publications_path(),
        config.stats_path(),
        config.history_path(),
        config.ranking_path(),
    ];

    let ((publications, stats), (history, ranking)) = rayon::join(
        || {
            rayon::join(
                || source.fetch(paths[0]),
                || source.fetch(paths[1]),
            )
        },
        || {
            rayon::join(
                || source.fetch(paths[2]),
                || source.fetch(paths[3]),
            )
        },
    );

    let mut report = LoadReport::default();
    apply(&PublicationsPanel::new(), publications, document, &mut report);
    apply(&StatsPanel::from_config(config), stats, document, &mut report);
    apply(&HistoryPanel::from_config(config), history, document, &mut report);
    apply(&RankingPanel::new(), ranking, document, &mut report);
    report
}

/// Parses and renders one fetched resource, recording the outcome.
pub fn apply<P: Panel>(
    panel: &P,
    fetched: Result<String, FetchError>,
    document: &mut dyn Document,
    report: &mut LoadReport,
) {
    let kind = panel.kind();
    match fetched {
        Ok(text) => {
            let model = panel.parse(&text);
            if panel.render(&model, document) {
                debug!(resource = %kind, "panel rendered");
                report.rendered.push(kind);
            } else {
                debug!(resource = %kind, "panel had nothing to render");
                report.skipped.push(kind);
            }
        }
        Err(e) if e.is_not_found() && panel.is_optional() => {
            info!(resource = %kind, "{} not found, skipping panel", kind);
            report.skipped.push(kind);
        }
        Err(e) => {
            error!(resource = %kind, error = %e, "failed to load panel data");
            report.failures.push((kind, e.into()));
        }
    }
}
