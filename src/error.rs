//! Error types for strata
//!
//! A build only fails in two places:
//! - Walking a source (root missing, directory unreadable)
//! - Reading a discovered stylesheet (I/O failure, content not UTF-8)
//!
//! Both abort the whole build. An empty source is not an error.

use std::fmt;
use std::io;

/// Result type alias for strata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for strata
#[derive(Debug)]
pub enum Error {
    /// Recursive enumeration of a source failed
    Walk { root: String, source: io::Error },
    /// A discovered file could not be read
    Read { path: String, source: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Walk { root, source } => {
                if root.is_empty() {
                    write!(f, "walk filesystem: {}", source)
                } else {
                    write!(f, "walk filesystem {}: {}", root, source)
                }
            }
            Error::Read { path, source } => write!(f, "read {}: {}", path, source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Walk { source, .. } | Error::Read { source, .. } => Some(source),
        }
    }
}

impl Error {
    pub(crate) fn walk(root: &str, source: io::Error) -> Self {
        Error::Walk {
            root: root.to_string(),
            source,
        }
    }

    pub(crate) fn read(path: &str, source: io::Error) -> Self {
        Error::Read {
            path: path.to_string(),
            source,
        }
    }

    /// Build phase the error happened in: "walk" or "read"
    pub fn phase(&self) -> &'static str {
        match self {
            Error::Walk { .. } => "walk",
            Error::Read { .. } => "read",
        }
    }

    /// Source root (walk) or file path (read) that failed
    pub fn path(&self) -> &str {
        match self {
            Error::Walk { root, .. } => root,
            Error::Read { path, .. } => path,
        }
    }
}
