//! # mdio_fs - Markdown document I/O
//!
//! Loads Markdown files into memory and writes them back without changing
//! bytes the user did not edit: the encoding, byte-order mark, line-ending
//! style and trailing newlines of the original file are recorded at load
//! time and restored on save.
//!
//! Modules:
//! - `bom` for BOM detection (UTF-8/16/32)
//! - `encoding` for encoding names, heuristics and transcoding
//! - `file` for the loader, saver and their collaborators
//!
//! ```no_run
//! use mdio_fs::{MarkdownLoader, MarkdownSaver};
//!
//! # fn main() -> mdio_fs::Result<()> {
//! let loader = MarkdownLoader::default();
//! let mut doc = loader.load("notes/today.md")?;
//! doc.markdown.push_str("\nOne more line.\n");
//! MarkdownSaver::default().save_document(&doc)?;
//! # Ok(())
//! # }
//! ```

mod bom;
pub mod encoding;
mod error;
pub mod file;

pub use bom::{BomDetectionResult, bom_bytes, detect_bom};
pub use encoding::{
    DetectionConfidence, DetectionConfig, Encoding, EncodingDetectionResult, EncodingInfo,
    EncodingOracle, HeuristicOracle, detect_encoding_heuristic,
};
pub use error::{DocumentError, ErrorKind, Result};
pub use file::{
    Clock, FixedClock, FrontMatterCodec, FsPathResolver, FsWriter, LineEnding, LineEndingScan,
    LoadOptions, LoaderConfig, MarkdownDocument, MarkdownLoader, MarkdownSaver, NormalizedPath,
    PathResolver, RawFileWriter, SaveOptions, SavedFile, SaverConfig, SystemClock,
    TrailingNewline, TrailingNewlineHint, YamlCodec, is_markdown_file, normalize_markdown_path,
};
