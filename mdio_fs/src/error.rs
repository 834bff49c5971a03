//! Document I/O errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`DocumentError`], for callers that only
/// need to branch on the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Path,
    Io,
    UnsupportedEncoding,
    MalformedFrontMatter,
}

/// Errors that can occur while loading or saving a Markdown document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Empty path, or a link whose target cannot be resolved.
    #[error("Path error: {0}")]
    Path(String),

    /// Read or write failure at the filesystem boundary.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The encoding oracle returned a name the codec cannot handle.
    #[error("\"{0}\" encoding is not supported")]
    UnsupportedEncoding(String),

    /// Front-matter delimiters were found but the block is not a YAML mapping.
    #[error("Malformed front matter: {0}")]
    MalformedFrontMatter(String),
}

impl DocumentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocumentError::Path(_) => ErrorKind::Path,
            DocumentError::Io { .. } => ErrorKind::Io,
            DocumentError::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
            DocumentError::MalformedFrontMatter(_) => ErrorKind::MalformedFrontMatter,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DocumentError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
