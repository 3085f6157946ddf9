// ABOUTME: Error types for the content fetcher including ErrorCode enum and FetchError struct.
// ABOUTME: Distinguishes missing files, unreadable files, transport failures and client setup failures.

use std::fmt;

/// Error codes representing the categories of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    LocalNotFound,
    LocalRead,
    Transport,
    Setup,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::LocalNotFound => "local file not found",
            ErrorCode::LocalRead => "local file unreadable",
            ErrorCode::Transport => "transport failure",
            ErrorCode::Setup => "client setup failed",
        };
        write!(f, "{}", s)
    }
}

/// The error type returned by [`ContentFetcher::try_fetch`](crate::ContentFetcher::try_fetch).
///
/// `location` holds the resolved path for local failures and the URL for
/// transport failures.
#[derive(Debug, thiserror::Error)]
pub struct FetchError {
    pub code: ErrorCode,
    pub location: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch {}: {}", self.location, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl FetchError {
    fn with_code(
        code: ErrorCode,
        location: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            location: location.into(),
            source,
        }
    }

    /// Create a LocalNotFound error.
    pub fn local_not_found(location: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::LocalNotFound, location, None)
    }

    /// Create a LocalRead error.
    pub fn local_read(location: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::LocalRead, location, source)
    }

    /// Create a Transport error.
    pub fn transport(location: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::Transport, location, source)
    }

    /// Create a Setup error.
    pub fn setup(source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::Setup, "", source)
    }

    /// Returns true if the referenced local file does not exist.
    pub fn is_local_not_found(&self) -> bool {
        self.code == ErrorCode::LocalNotFound
    }

    /// Returns true if the local file exists but could not be read or decoded.
    pub fn is_local_read(&self) -> bool {
        self.code == ErrorCode::LocalRead
    }

    /// Returns true if this is a Transport error.
    pub fn is_transport(&self) -> bool {
        self.code == ErrorCode::Transport
    }

    /// Returns true if this is a Setup error.
    pub fn is_setup(&self) -> bool {
        self.code == ErrorCode::Setup
    }

    /// Returns true for failures on the local-file branch.
    pub fn is_local(&self) -> bool {
        matches!(self.code, ErrorCode::LocalNotFound | ErrorCode::LocalRead)
    }
}
