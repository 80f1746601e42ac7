//! Fetching profile and listing pages.

use super::parse::{is_blocked, parse_publication_page};
use crate::ResourceKind;
use crate::error::{FetchError, PanelError, ParseError, ValueError};
use crate::loader::Source;
use crate::publications::Publication;
use rand::seq::SliceRandom;
use reqwest::Url;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER, USER_AGENT};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Browser identities rotated across requests.
pub const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

const TIMEOUT: Duration = Duration::from_secs(30);

/// Plain HTTP transport that looks like a browser.
#[derive(Debug, Clone)]
pub struct ScholarHttp {
    client: reqwest::blocking::Client,
}

impl ScholarHttp {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Source for ScholarHttp {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        let http_err = |source| FetchError::Http {
            path: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, agent)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(REFERER, "https://www.google.com/")
            .header(CONNECTION, "keep-alive")
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .map_err(http_err)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                path: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                path: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_err)
    }
}

/// How often and how patiently to retry a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total tries, including the first
    pub attempts: u32,
    /// Wait after the first failure; doubles after each further one
    pub backoff: Duration,
    /// Upper bound of the random extra wait
    pub jitter: Duration,
}

impl RetryPolicy {
    /// Three tries starting at five seconds, for the profile page.
    pub fn profile() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(5),
            jitter: Duration::from_millis(700),
        }
    }

    /// Two tries starting at three seconds, for each listing page.
    pub fn listing() -> Self {
        Self {
            attempts: 2,
            backoff: Duration::from_secs(3),
            jitter: Duration::from_millis(700),
        }
    }

    /// Retries without waiting.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            backoff: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Base wait before retry number `attempt` (1-based), without jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay(attempt) + self.jitter.mul_f64(rand::random::<f64>())
    }
}

/// Publication list paging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub pagesize: usize,
    pub max_pages: usize,
    /// Pause between pages, before jitter
    pub sleep: Duration,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            pagesize: 100,
            max_pages: 20,
            sleep: Duration::from_millis(1500),
        }
    }
}

/// The `user` parameter of a profile URL.
pub fn extract_user_id(profile_url: &str) -> Option<String> {
    let url = Url::parse(profile_url).ok()?;
    query_param(&url, "user").filter(|user| !user.is_empty())
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Builds the paged listing URLs for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUrls {
    base: String,
    user: String,
    hl: String,
}

impl ListingUrls {
    pub fn from_profile(profile_url: &str) -> Option<Self> {
        let url = Url::parse(profile_url).ok()?;
        let user = query_param(&url, "user").filter(|user| !user.is_empty())?;
        let host = url.host_str()?;
        let base = match url.port() {
            Some(port) => format!("{}://{}:{}/citations", url.scheme(), host, port),
            None => format!("{}://{}/citations", url.scheme(), host),
        };
        Some(Self {
            base,
            user,
            hl: query_param(&url, "hl").unwrap_or_else(|| "en".to_string()),
        })
    }

    /// The plain listing URL, then the `list_works` variant.
    pub fn page(&self, cstart: usize, pagesize: usize) -> [String; 2] {
        let url = format!(
            "{}?user={}&hl={}&cstart={}&pagesize={}",
            self.base, self.user, self.hl, cstart, pagesize
        );
        let works = format!("{}&view_op=list_works", url);
        [url, works]
    }
}

/// Scholar client over any [`Source`] transport.
#[derive(Debug, Clone)]
pub struct ScholarClient<S> {
    source: S,
    profile_retry: RetryPolicy,
    listing_retry: RetryPolicy,
}

impl ScholarClient<ScholarHttp> {
    pub fn http() -> reqwest::Result<Self> {
        Ok(Self::new(ScholarHttp::new()?))
    }
}

impl<S: Source> ScholarClient<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            profile_retry: RetryPolicy::profile(),
            listing_retry: RetryPolicy::listing(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, profile: RetryPolicy, listing: RetryPolicy) -> Self {
        self.profile_retry = profile;
        self.listing_retry = listing;
        self
    }

    /// Fetches the profile page itself.
    pub fn fetch_profile(&self, url: &str) -> Result<String, PanelError> {
        self.fetch_html(url, self.profile_retry)
    }

    /// Fetches `url`, retrying failed and blocked responses per `policy`.
    pub fn fetch_html(&self, url: &str, policy: RetryPolicy) -> Result<String, PanelError> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.try_fetch(url) {
                Ok(html) => return Ok(html),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    let wait = policy.delay(attempt);
                    warn!(
                        attempt,
                        attempts,
                        error = %e,
                        "fetch failed, sleeping {:.1}s",
                        wait.as_secs_f64()
                    );
                    thread::sleep(wait);
                    attempt += 1;
                }
            }
        }
    }

    fn try_fetch(&self, url: &str) -> Result<String, PanelError> {
        let html = self.source.fetch(url)?;
        if is_blocked(&html) {
            return Err(
                ParseError::without_position(ResourceKind::ScholarProfile, ValueError::Blocked)
                    .into(),
            );
        }
        Ok(html)
    }

    /// Pages through the profile's publication list.
    ///
    /// Rows are deduplicated by title and untitled rows dropped. Paging stops
    /// at the first page that yields nothing or fewer rows than `pagesize`.
    /// Failures end the walk early and keep what was collected.
    pub fn fetch_all_publications(&self, profile_url: &str, pagination: &Pagination) -> Vec<Publication> {
        let Some(listing) = ListingUrls::from_profile(profile_url) else {
            debug!(profile_url, "profile URL has no user id, not paging");
            return Vec::new();
        };

        let mut rows = Vec::new();
        let mut seen = HashSet::new();

        for page in 0..pagination.max_pages {
            let cstart = page * pagination.pagesize;
            let mut page_rows = Vec::new();
            let mut last_error = None;

            for url in listing.page(cstart, pagination.pagesize) {
                let parsed = self
                    .fetch_html(&url, self.listing_retry)
                    .and_then(|html| parse_publication_page(&html).map_err(PanelError::from));
                match parsed {
                    Ok(found) if !found.is_empty() => {
                        page_rows = found;
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => last_error = Some(e),
                }
            }

            if page_rows.is_empty() {
                if let Some(e) = last_error {
                    warn!(page = page + 1, error = %e, "publications page failed");
                }
                break;
            }

            let page_len = page_rows.len();
            let before = rows.len();
            rows.extend(
                page_rows
                    .into_iter()
                    .filter(|row| !row.title.is_empty() && seen.insert(row.title.clone())),
            );
            info!(page = page + 1, new = rows.len() - before, "publications page fetched");

            if page_len < pagination.pagesize {
                break;
            }
            thread::sleep(pagination.sleep + self.listing_retry.jitter.mul_f64(rand::random::<f64>()));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse::fixtures::{BLOCKED, PROFILE, listing};
    use super::*;
    use crate::loader::MemorySource;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::sync::Mutex;

    const PROFILE_URL: &str = "https://scholar.example.org/citations?hl=de&user=abc123";

    fn listing_url(cstart: usize, pagesize: usize) -> String {
        format!(
            "https://scholar.example.org/citations?user=abc123&hl=de&cstart={}&pagesize={}",
            cstart, pagesize
        )
    }

    fn quick<S: Source>(source: S) -> ScholarClient<S> {
        ScholarClient::new(source).with_retry(RetryPolicy::immediate(3), RetryPolicy::immediate(2))
    }

    fn no_sleep(pagesize: usize) -> Pagination {
        Pagination {
            pagesize,
            max_pages: 20,
            sleep: Duration::ZERO,
        }
    }

    /// Fails a fixed number of times, then serves `html`.
    struct Flaky {
        failures: Mutex<u32>,
        calls: Mutex<u32>,
        html: &'static str,
    }

    impl Flaky {
        fn new(failures: u32, html: &'static str) -> Self {
            Self {
                failures: Mutex::new(failures),
                calls: Mutex::new(0),
                html,
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl Source for Flaky {
        fn fetch(&self, path: &str) -> Result<String, FetchError> {
            *self.calls.lock().unwrap() += 1;
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(FetchError::Status {
                    path: path.to_string(),
                    status: 503,
                });
            }
            Ok(self.html.to_string())
        }
    }

    #[test]
    fn test_retry_until_success() {
        let client = quick(Flaky::new(2, PROFILE));
        assert!(client.fetch_profile(PROFILE_URL).is_ok());
        assert_eq!(client.source.calls(), 3);
    }

    #[test]
    fn test_retry_gives_up() {
        let client = quick(Flaky::new(5, PROFILE));
        let err = client.fetch_profile(PROFILE_URL).unwrap_err();
        assert!(matches!(err, PanelError::Fetch(FetchError::Status { status: 503, .. })));
        assert_eq!(client.source.calls(), 3);
    }

    #[test]
    fn test_blocked_page_is_an_error() {
        let client = quick(Flaky::new(0, BLOCKED));
        let err = client.fetch_profile(PROFILE_URL).unwrap_err();
        assert!(matches!(
            err,
            PanelError::Parse(ParseError {
                error: ValueError::Blocked,
                ..
            })
        ));
        assert_eq!(client.source.calls(), 3);
    }

    #[rstest]
    #[case(1, Duration::from_secs(5))]
    #[case(2, Duration::from_secs(10))]
    #[case(3, Duration::from_secs(20))]
    fn test_backoff_doubles(#[case] attempt: u32, #[case] expected: Duration) {
        assert_eq!(RetryPolicy::profile().base_delay(attempt), expected);
    }

    #[test]
    fn test_jitter_is_bounded() {
        let policy = RetryPolicy::profile();
        let delay = policy.delay(1);
        assert!(delay >= Duration::from_secs(5));
        assert!(delay <= Duration::from_millis(5700));
    }

    #[test]
    fn test_listing_urls() {
        let urls = ListingUrls::from_profile(PROFILE_URL).unwrap();
        assert_eq!(
            urls.page(100, 100),
            [
                listing_url(100, 100),
                format!("{}&view_op=list_works", listing_url(100, 100)),
            ]
        );
        assert_eq!(extract_user_id(PROFILE_URL), Some("abc123".to_string()));
        assert_eq!(extract_user_id("https://scholar.example.org/citations?hl=en"), None);
        assert!(ListingUrls::from_profile("not a url").is_none());
    }

    #[test]
    fn test_default_language() {
        let urls = ListingUrls::from_profile("http://localhost:8080/citations?user=u").unwrap();
        assert_eq!(
            urls.page(0, 10)[0],
            "http://localhost:8080/citations?user=u&hl=en&cstart=0&pagesize=10"
        );
    }

    #[test]
    fn test_pagination_dedupes_and_stops_on_short_page() {
        // The second page repeats a title and is short, so it is the last.
        let source = MemorySource::new()
            .with(&listing_url(0, 3), &listing("Paper", 3))
            .with(&listing_url(3, 3), &listing("Later", 2).replace("Later 0", "Paper 2"))
            .with(&listing_url(6, 3), &listing("Never", 3));

        let rows = quick(source).fetch_all_publications(PROFILE_URL, &no_sleep(3));
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Paper 0", "Paper 1", "Paper 2", "Later 1"]);
    }

    #[test]
    fn test_pagination_falls_back_to_list_works_url() {
        let source = MemorySource::new().with(
            &format!("{}&view_op=list_works", listing_url(0, 5)),
            &listing("Work", 2),
        );
        let rows = quick(source).fetch_all_publications(PROFILE_URL, &no_sleep(5));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_pagination_respects_max_pages() {
        let source = MemorySource::new()
            .with(&listing_url(0, 2), &listing("A", 2))
            .with(&listing_url(2, 2), &listing("B", 2))
            .with(&listing_url(4, 2), &listing("C", 2));
        let pagination = Pagination {
            max_pages: 2,
            ..no_sleep(2)
        };
        let rows = quick(source).fetch_all_publications(PROFILE_URL, &pagination);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_pagination_without_user_id() {
        let rows = quick(MemorySource::new())
            .fetch_all_publications("https://scholar.example.org/citations", &no_sleep(100));
        assert!(rows.is_empty());
    }
}
