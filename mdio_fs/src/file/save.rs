//! Markdown saving: front-matter refresh, line-ending restore and transcoding.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use super::document::{MarkdownDocument, SaveOptions};
use super::eol;
use super::front_matter::{self, Clock, FrontMatterCodec, SystemClock, YamlCodec};
use super::path::{FsPathResolver, PathResolver};
use super::writer::{FsWriter, RawFileWriter};
use crate::encoding::Encoding;
use crate::error::{DocumentError, Result};

/// Configuration for saving operations
#[derive(Debug, Clone)]
pub struct SaverConfig {
    /// Appended to paths that have no extension
    pub default_extension: String,
    /// Whether to use atomic writes with temp files
    pub atomic_writes: bool,
    /// Whether to preserve file permissions (Unix only)
    pub preserve_permissions: bool,
}

impl Default for SaverConfig {
    fn default() -> Self {
        SaverConfig {
            default_extension: ".md".to_string(),
            atomic_writes: true,
            preserve_permissions: true,
        }
    }
}

/// Result of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Final path where file was saved
    pub path: PathBuf,
    /// Number of bytes written
    pub bytes_written: usize,
}

/// Writes Markdown text back to disk in its original on-disk shape.
///
/// The text passes through:
/// 1. Front-matter timestamp refresh (only if the text has front matter)
/// 2. The trailing-newline policy
/// 3. Line-ending conversion, when the options ask for it
/// 4. Transcoding to the original encoding, with BOM if it had one
#[derive(Clone)]
pub struct MarkdownSaver {
    config: SaverConfig,
    resolver: Arc<dyn PathResolver>,
    writer: Arc<dyn RawFileWriter>,
    codec: Arc<dyn FrontMatterCodec>,
    clock: Arc<dyn Clock>,
}

impl MarkdownSaver {
    pub fn new(config: SaverConfig) -> Self {
        let writer = FsWriter {
            atomic_writes: config.atomic_writes,
            preserve_permissions: config.preserve_permissions,
            ..FsWriter::default()
        };
        Self {
            config,
            resolver: Arc::new(FsPathResolver),
            writer: Arc::new(writer),
            codec: Arc::new(YamlCodec),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_writer(mut self, writer: impl RawFileWriter + 'static) -> Self {
        self.writer = Arc::new(writer);
        self
    }

    pub fn with_codec(mut self, codec: impl FrontMatterCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &SaverConfig {
        &self.config
    }

    /// Save `text` to `path`.
    pub fn save(&self, path: impl AsRef<Path>, text: &str, options: &SaveOptions) -> Result<SavedFile> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DocumentError::Path("Cannot save file without path.".to_string()));
        }

        let target = self.target_path(path)?;
        let bytes = self.encode(text, options)?;

        self.writer
            .write(&target, &bytes)
            .map_err(|e| DocumentError::io(&target, e))?;

        info!(path = %target.display(), bytes = bytes.len(), "saved markdown file");
        Ok(SavedFile {
            path: target,
            bytes_written: bytes.len(),
        })
    }

    /// Save a document back to the path it was loaded from.
    pub fn save_document(&self, document: &MarkdownDocument) -> Result<SavedFile> {
        self.save(document.pathname(), &document.markdown, &document.save_options())
    }

    /// [`MarkdownSaver::save`] on tokio's blocking pool.
    pub async fn save_async(
        &self,
        path: impl Into<PathBuf>,
        text: String,
        options: SaveOptions,
    ) -> Result<SavedFile> {
        let saver = self.clone();
        let path = path.into();
        let task_path = path.clone();

        tokio::task::spawn_blocking(move || saver.save(&task_path, &text, &options))
            .await
            .map_err(|e| DocumentError::io(path, io::Error::other(e)))?
    }

    /// Produce the bytes [`MarkdownSaver::save`] would write, without
    /// touching the disk.
    pub fn encode(&self, text: &str, options: &SaveOptions) -> Result<Vec<u8>> {
        let encoding = Encoding::from_name(&options.encoding.encoding)
            .ok_or_else(|| DocumentError::UnsupportedEncoding(options.encoding.encoding.clone()))?;

        let rewritten = front_matter::rewrite_front_matter(text, self.codec.as_ref(), self.clock.now())?;
        let trimmed = options.trailing_newline.apply(&rewritten);
        let converted = if options.adjust_line_ending_on_save {
            eol::convert(&trimmed, options.line_ending)
        } else {
            Cow::Borrowed(&*trimmed)
        };

        let (bytes, unmappable) = encoding.encode(&converted, options.encoding.has_bom);
        if unmappable > 0 {
            warn!(
                encoding = %encoding,
                count = unmappable,
                "characters not representable in target encoding were replaced with '?'"
            );
        }
        Ok(bytes)
    }

    /// Resolve the destination and append the default extension when the
    /// path has none.
    fn target_path(&self, path: &Path) -> Result<PathBuf> {
        let resolved = self.resolver.resolve(path).ok_or_else(|| {
            error!("Cannot resolve \"{}\".", path.display());
            DocumentError::Path(format!("Cannot resolve \"{}\".", path.display()))
        })?;

        if resolved.extension().is_some() {
            return Ok(resolved);
        }
        let mut name = resolved.into_os_string();
        name.push(&self.config.default_extension);
        Ok(PathBuf::from(name))
    }
}

impl Default for MarkdownSaver {
    fn default() -> Self {
        Self::new(SaverConfig::default())
    }
}
