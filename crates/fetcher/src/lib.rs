// ABOUTME: Main library entry point for the ensi content fetcher.
// ABOUTME: Re-exports the public API: ContentFetcher, FetcherBuilder, Options, Location, FetchError, ErrorCode.

//! ensi-fetcher - fetches raw HTML from a local file or an HTTP(S) URL.
//!
//! A location starting with `file://` is read from disk; anything else is
//! requested with a single blocking GET using browser-like headers. Failures
//! collapse to `None` and are reported through `tracing`.
//!
//! # Example
//!
//! ```no_run
//! use ensi_fetcher::{ContentFetcher, FetchError};
//!
//! fn main() -> Result<(), FetchError> {
//!     let fetcher = ContentFetcher::builder().build()?;
//!     if let Some(html) = fetcher.fetch("https://example.com") {
//!         println!("{}", html);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fetcher;
pub mod location;
pub mod options;
pub mod resource;

pub use crate::error::{ErrorCode, FetchError};
pub use crate::fetcher::ContentFetcher;
pub use crate::location::{absolutize, Location, FILE_PREFIX};
pub use crate::options::{
    FetcherBuilder, Options, BROWSER_HEADERS, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use crate::resource::HttpResponse;
