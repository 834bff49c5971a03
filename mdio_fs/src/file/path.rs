//! Path normalization and symlink resolution.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::error;

/// File extensions treated as Markdown.
pub const MARKDOWN_EXTENSIONS: [&str; 11] = [
    "markdown", "mdown", "mkdn", "md", "mkd", "mdwn", "mdtxt", "mdtext", "mdx", "text", "txt",
];

/// Turns a user-supplied path into the absolute path to operate on.
pub trait PathResolver: Send + Sync {
    /// Returns `None` when the path cannot be resolved, e.g. a symlink whose
    /// target does not exist.
    fn resolve(&self, path: &Path) -> Option<PathBuf>;
}

/// Resolves against the real filesystem. A symlink is replaced by its
/// target; any other path is made absolute without touching the disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPathResolver;

impl PathResolver for FsPathResolver {
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if path.as_os_str().is_empty() {
            return None;
        }

        let is_link = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
        if !is_link {
            return std::path::absolute(path).ok();
        }

        let link = fs::read_link(path).ok()?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let target = std::path::absolute(base.join(link)).ok()?;
        if target.is_file() || target.is_dir() {
            Some(target)
        } else {
            error!(
                "Cannot resolve link target \"{}\" ({}).",
                path.display(),
                target.display()
            );
            None
        }
    }
}

/// Whether the path has one of the [`MARKDOWN_EXTENSIONS`] (case-insensitive).
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// A directory or Markdown file with its link target resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    pub is_dir: bool,
    pub path: PathBuf,
}

/// Normalize a directory or Markdown file path. Anything else, and links
/// that cannot be resolved, yield `None`.
pub fn normalize_markdown_path(path: &Path, resolver: &dyn PathResolver) -> Option<NormalizedPath> {
    let is_dir = path.is_dir();
    if !is_dir && !is_markdown_file(path) {
        return None;
    }

    match resolver.resolve(path) {
        Some(resolved) => Some(NormalizedPath {
            is_dir,
            path: resolved,
        }),
        None => {
            error!("Cannot resolve \"{}\".", path.display());
            None
        }
    }
}
