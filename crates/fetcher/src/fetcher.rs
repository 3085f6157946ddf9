// ABOUTME: The ContentFetcher struct that resolves a location string to its raw text content.
// ABOUTME: Dispatches on the file:// prefix to a local read or a blocking HTTP GET; failures become None plus a log line.

use std::time::Duration;

use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::location::{absolutize, Location};
use crate::options::{FetcherBuilder, Options};
use crate::resource;

/// Fetches raw HTML from local files or HTTP(S) URLs.
///
/// Holds immutable configuration and a pooled blocking HTTP client, so a
/// single instance can serve any number of calls, from any thread.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    timeout: Duration,
    headers: HeaderMap,
    http_client: reqwest::blocking::Client,
}

impl ContentFetcher {
    /// Create a new FetcherBuilder for configuring the fetcher.
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::new()
    }

    /// Create a new ContentFetcher with the given options.
    ///
    /// Fails with a Setup error if a header name or value is invalid or the
    /// HTTP client cannot be built.
    pub fn new(opts: Options) -> Result<Self, FetchError> {
        let headers = resource::request_headers(&opts)?;
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::blocking::Client::builder()
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    FetchError::setup(Some(anyhow::anyhow!(
                        "failed to build HTTP client: {}",
                        e
                    )))
                })?,
        };

        Ok(Self {
            timeout: opts.timeout,
            headers,
            http_client,
        })
    }

    /// Fetch the content behind `location`, or `None` on any failure.
    ///
    /// `file://<path>` reads a local file (relative paths resolve against the
    /// current working directory); anything else is fetched over HTTP(S).
    /// Each failure is reported once at `warn` level with its cause.
    pub fn fetch(&self, location: &str) -> Option<String> {
        match self.try_fetch(location) {
            Ok(content) => Some(content),
            Err(err) => {
                warn!("{}", err);
                None
            }
        }
    }

    /// Like [`fetch`](Self::fetch), but returns the failure instead of logging it.
    pub fn try_fetch(&self, location: &str) -> Result<String, FetchError> {
        match Location::parse(location) {
            Location::Local(path) => {
                let path = absolutize(&path).map_err(|e| {
                    FetchError::local_read(
                        path.display().to_string(),
                        Some(anyhow::anyhow!("cannot resolve relative path: {}", e)),
                    )
                })?;
                resource::read_local(&path)
            }
            Location::Network(url) => {
                let response =
                    resource::get(&self.http_client, &url, &self.headers, self.timeout)?;
                debug!("GET {} -> {}", url, response.status);
                Ok(response.text())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn fetcher() -> ContentFetcher {
        ContentFetcher::builder().build().expect("fetcher should build")
    }

    #[test]
    fn test_fetch_local_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.html");
        fs::write(&path, "<h1>Hi</h1>").unwrap();

        let content = fetcher().fetch(&format!("file://{}", path.display()));
        assert_eq!(content.as_deref(), Some("<h1>Hi</h1>"));
    }

    #[test]
    fn test_fetch_local_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.html");

        assert_eq!(fetcher().fetch(&format!("file://{}", path.display())), None);
    }

    #[test]
    fn test_try_fetch_local_missing_reports_resolved_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.html");

        let err = fetcher()
            .try_fetch(&format!("file://{}", path.display()))
            .expect_err("should fail");
        assert!(err.is_local_not_found());
        assert_eq!(err.location, path.display().to_string());
    }

    #[test]
    fn test_fetch_http_ok() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<!doctype html><h1>Example Domain</h1>");
        });

        let content = fetcher().fetch(&server.url("/"));
        mock.assert();
        assert!(content.unwrap().contains("Example Domain"));
    }

    #[test]
    fn test_fetch_http_404_is_none() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/this-does-not-exist");
            then.status(404).body("Example Domain 404 page");
        });

        let content = fetcher().fetch(&server.url("/this-does-not-exist"));
        mock.assert();
        assert_eq!(content, None);
    }

    #[test]
    fn test_fetch_makes_single_attempt() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/flaky");
            then.status(500);
        });

        assert_eq!(fetcher().fetch(&server.url("/flaky")), None);
        assert_eq!(mock.calls(), 1, "failed fetch should not be retried");
    }

    #[test]
    fn test_builder_overrides_reach_the_wire() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/custom")
                .header("user-agent", "ensi-test/1.0")
                .header("accept-language", "pt-BR");
            then.status(200).body("ok");
        });

        let fetcher = ContentFetcher::builder()
            .user_agent("ensi-test/1.0")
            .header("Accept-Language", "pt-BR")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(fetcher.fetch(&server.url("/custom")).as_deref(), Some("ok"));
        mock.assert();
    }

    /// Serve one canned 200 response and return the raw request head it received.
    fn capture_request_head(fetcher: ContentFetcher) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok")
                .unwrap();
            String::from_utf8(head).unwrap()
        });

        assert_eq!(fetcher.fetch(&url).as_deref(), Some("ok"));
        server.join().unwrap()
    }

    fn user_agent_lines(head: &str) -> Vec<&str> {
        head.lines()
            .filter(|line| line.to_ascii_lowercase().starts_with("user-agent:"))
            .collect()
    }

    #[test]
    fn test_user_agent_header_override_sends_single_line() {
        let fetcher = ContentFetcher::builder()
            .header("User-Agent", "custom-ua")
            .build()
            .unwrap();

        let head = capture_request_head(fetcher);
        let lines = user_agent_lines(&head);
        assert_eq!(lines.len(), 1, "request head:\n{}", head);
        assert!(lines[0].ends_with(": custom-ua"));
    }

    #[test]
    fn test_default_request_sends_single_browser_user_agent() {
        let head = capture_request_head(fetcher());
        let lines = user_agent_lines(&head);
        assert_eq!(lines.len(), 1, "request head:\n{}", head);
        assert!(lines[0].ends_with(crate::options::DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_invalid_header_name_fails_build() {
        let err = ContentFetcher::builder()
            .header("Bad Name", "v")
            .build()
            .expect_err("header name with a space should be rejected");
        assert!(err.is_setup());
    }

    #[test]
    fn test_injected_client_gets_default_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/injected")
                .header("user-agent", crate::options::DEFAULT_USER_AGENT);
            then.status(200).body("ok");
        });

        let client = reqwest::blocking::Client::builder().build().unwrap();
        let fetcher = ContentFetcher::builder().http_client(client).build().unwrap();
        assert!(fetcher.fetch(&server.url("/injected")).is_some());
        mock.assert();
    }

    #[test]
    fn test_fetcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ContentFetcher>();
    }
}
