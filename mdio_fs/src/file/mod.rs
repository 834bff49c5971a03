//! File operations for loading and saving Markdown with byte-level fidelity.
//!
//! This module provides:
//! - EOL detection and normalization
//! - Trailing-newline classification
//! - Front-matter timestamp refresh on save
//! - Symlink-aware path resolution
//! - Atomic saving with transcoding and permission preservation

pub mod document;
pub mod eol;
pub mod front_matter;
pub mod load;
pub mod path;
pub mod save;
pub mod writer;

pub use document::{LoadOptions, MarkdownDocument, SaveOptions, TrailingNewline, TrailingNewlineHint};
pub use eol::{LineEnding, LineEndingScan};
pub use front_matter::{
    Clock, FixedClock, FrontMatterCodec, FrontMatterSplit, SystemClock, YamlCodec,
    rewrite_front_matter, split_front_matter,
};
pub use load::{LoaderConfig, MarkdownLoader};
pub use path::{FsPathResolver, NormalizedPath, PathResolver, is_markdown_file, normalize_markdown_path};
pub use save::{MarkdownSaver, SavedFile, SaverConfig};
pub use writer::{FsWriter, RawFileWriter};
