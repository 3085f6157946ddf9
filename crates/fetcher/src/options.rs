// ABOUTME: Configuration options for the content fetcher including Options and FetcherBuilder.
// ABOUTME: Defaults carry a fixed desktop-browser header set and a 30 second request timeout.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::FetchError;
use crate::fetcher::ContentFetcher;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent unless overridden; mimics desktop Chrome.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Browser-like headers sent alongside the User-Agent on every GET.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Accept-Encoding", "gzip, deflate"),
    ("Connection", "keep-alive"),
];

/// Configuration held by a [`ContentFetcher`] for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::blocking::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BROWSER_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            http_client: None,
        }
    }
}

/// Builder for constructing ContentFetcher instances with custom configuration.
#[derive(Debug, Clone)]
pub struct FetcherBuilder {
    opts: Options,
}

impl FetcherBuilder {
    /// Create a new FetcherBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Add a header to all requests, replacing any default with the same name.
    ///
    /// `User-Agent` (any case) is routed to [`user_agent`](Self::user_agent).
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if key.eq_ignore_ascii_case("user-agent") {
            return self.user_agent(value);
        }
        self.opts
            .headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        self.opts.headers.insert(key, value.into());
        self
    }

    /// Use a preconfigured blocking HTTP client.
    pub fn http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the ContentFetcher with the configured options.
    pub fn build(self) -> Result<ContentFetcher, FetchError> {
        ContentFetcher::new(self.opts)
    }
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
