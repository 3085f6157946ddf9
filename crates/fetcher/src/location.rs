// ABOUTME: Location type that splits a location string into a local-file or network reference.
// ABOUTME: Also resolves relative local paths against the current working directory.

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Prefix marking a local-file reference.
pub const FILE_PREFIX: &str = "file://";

/// Where a piece of content lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Path taken verbatim from after the `file://` prefix, not yet resolved.
    Local(PathBuf),
    /// Anything else, treated as an HTTP(S) URL.
    Network(String),
}

impl Location {
    /// Split a location string on the `file://` prefix.
    ///
    /// No validation happens here: a malformed URL surfaces later as a
    /// transport failure.
    pub fn parse(location: &str) -> Self {
        match location.strip_prefix(FILE_PREFIX) {
            Some(path) => Location::Local(PathBuf::from(path)),
            None => Location::Network(location.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Location::Local(_))
    }
}

/// Make `path` absolute using the process's current working directory.
///
/// Absolute paths are returned untouched. Relative ones are joined onto the
/// CWD and normalized lexically (`.` dropped, `..` pops a component); symlinks
/// are not consulted. This does not confine the result to the CWD.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let joined = env::current_dir()?.join(path);
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, so `/..` stays `/`
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
