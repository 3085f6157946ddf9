// ABOUTME: Resource I/O for the content fetcher: local file reads and blocking HTTP GETs.
// ABOUTME: Maps every failure onto FetchError and decodes response bodies using charset hints or detection.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use crate::error::FetchError;
use crate::options::Options;

/// A successful (non-4xx/5xx) HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decode the body to text, using the charset from the content-type header when present.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Read a local file as UTF-8 text. `path` is expected to be absolute already.
pub fn read_local(path: &Path) -> Result<String, FetchError> {
    debug!("reading local file {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        let location = path.display().to_string();
        if e.kind() == io::ErrorKind::NotFound {
            FetchError::local_not_found(location)
        } else {
            FetchError::local_read(location, Some(anyhow::Error::new(e)))
        }
    })
}

/// Assemble the header set sent with every GET.
///
/// The User-Agent goes in first, so a `User-Agent` entry in `opts.headers`
/// replaces it instead of adding a second line. Invalid names or values are
/// a Setup error.
pub fn request_headers(opts: &Options) -> Result<HeaderMap, FetchError> {
    let invalid = |name: &str, e: &dyn std::fmt::Display| {
        FetchError::setup(Some(anyhow::anyhow!("invalid header {:?}: {}", name, e)))
    };

    let mut headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&opts.user_agent).map_err(|e| invalid("User-Agent", &e))?;
    headers.insert(USER_AGENT, ua);
    for (key, value) in &opts.headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| invalid(key, &e))?;
        let value = HeaderValue::from_str(value).map_err(|e| invalid(key, &e))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Issue a single GET for `url` with the given headers and timeout.
///
/// Statuses in the 4xx and 5xx ranges are reported as transport failures and
/// their bodies are never read.
pub fn get(
    client: &reqwest::blocking::Client,
    url: &str,
    headers: &HeaderMap,
    timeout: Duration,
) -> Result<HttpResponse, FetchError> {
    debug!("GET {}", url);

    let request = client.get(url).timeout(timeout).headers(headers.clone());

    let response = request.send().map_err(|e| {
        let reason = if e.is_timeout() {
            "request timed out"
        } else if e.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        FetchError::transport(url, Some(anyhow::anyhow!("{}: {}", reason, e)))
    })?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::transport(
            url,
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().map_err(|e| {
        FetchError::transport(
            url,
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    Ok(HttpResponse {
        status: status.as_u16(),
        content_type,
        body: body.to_vec(),
    })
}

/// Decode with the declared charset if encoding_rs knows the label, else sniff with chardetng.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or_else(|| {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(body, true);
            detector.guess(None, true)
        });
    encoding.decode(body).0.into_owned()
}

/// `charset` parameter of a Content-Type value that `get` has already lowercased.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim() == "charset")
        .map(|(_, value)| value.trim().trim_matches(|c| c == '"' || c == '\''))
}
