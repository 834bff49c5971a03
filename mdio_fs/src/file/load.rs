//! Markdown loading with encoding detection and line-ending normalization.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error};

use super::document::{LoadOptions, MarkdownDocument};
use super::eol::{self, LineEnding};
use super::path::{FsPathResolver, PathResolver};
use crate::encoding::{DetectionConfig, Encoding, EncodingInfo, EncodingOracle, HeuristicOracle};
use crate::error::{DocumentError, Result};

/// Configuration for the loader
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Defaults used by [`MarkdownLoader::load`]
    pub options: LoadOptions,
    /// Encoding detection configuration
    pub detection: DetectionConfig,
    /// Encoding reported when the file has no BOM and detection is off or inconclusive
    pub default_encoding: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            options: LoadOptions::default(),
            detection: DetectionConfig::default(),
            default_encoding: Encoding::Utf8.name().to_string(),
        }
    }
}

/// Reads Markdown files into [`MarkdownDocument`]s.
///
/// This function:
/// 1. Resolves the path (following symlinks)
/// 2. Guesses the encoding and decodes the bytes
/// 3. Detects the line-ending style and normalizes the text to LF
/// 4. Classifies the trailing newlines
#[derive(Clone)]
pub struct MarkdownLoader {
    config: LoaderConfig,
    resolver: Arc<dyn PathResolver>,
    oracle: Arc<dyn EncodingOracle>,
}

impl MarkdownLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let oracle = HeuristicOracle::new(config.detection, config.default_encoding.clone());
        Self {
            config,
            resolver: Arc::new(FsPathResolver),
            oracle: Arc::new(oracle),
        }
    }

    pub fn with_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_oracle(mut self, oracle: impl EncodingOracle + 'static) -> Self {
        self.oracle = Arc::new(oracle);
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a file with the configured default options.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<MarkdownDocument> {
        self.load_with_options(path, &self.config.options)
    }

    /// Load a file with per-call options.
    pub fn load_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<MarkdownDocument> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DocumentError::Path("Cannot load file without path.".to_string()));
        }

        let pathname = self.resolver.resolve(path).ok_or_else(|| {
            error!("Cannot resolve \"{}\".", path.display());
            DocumentError::Path(format!("Cannot resolve \"{}\".", path.display()))
        })?;

        let buffer = fs::read(&pathname).map_err(|e| DocumentError::io(&pathname, e))?;
        self.load_from_bytes(pathname, &buffer, options)
    }

    /// Run the decode and classification steps on bytes already in memory.
    ///
    /// `pathname` is recorded as the document's provenance and is not read.
    pub fn load_from_bytes(
        &self,
        pathname: PathBuf,
        bytes: &[u8],
        options: &LoadOptions,
    ) -> Result<MarkdownDocument> {
        let encoding = self.oracle.guess(bytes, options.auto_guess_encoding);
        let codec = Encoding::from_name(&encoding.encoding)
            .ok_or_else(|| DocumentError::UnsupportedEncoding(encoding.encoding.clone()))?;
        let text = codec.decode(bytes);

        Ok(build_document(pathname, encoding, text, options))
    }

    /// [`MarkdownLoader::load_with_options`] on tokio's blocking pool.
    pub async fn load_async(
        &self,
        path: impl Into<PathBuf>,
        options: LoadOptions,
    ) -> Result<MarkdownDocument> {
        let loader = self.clone();
        let path = path.into();
        let task_path = path.clone();

        tokio::task::spawn_blocking(move || loader.load_with_options(&task_path, &options))
            .await
            .map_err(|e| DocumentError::io(path, io::Error::other(e)))?
    }
}

impl Default for MarkdownLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

fn build_document(
    pathname: PathBuf,
    encoding: EncodingInfo,
    text: String,
    options: &LoadOptions,
) -> MarkdownDocument {
    let scan = eol::detect(&text);
    let line_ending = eol::resolve_style(scan, options.preferred_eol);
    let is_mixed_line_endings = scan.is_mixed();
    let adjust_line_ending_on_save =
        is_mixed_line_endings || scan.is_unknown() || line_ending != LineEnding::Lf;

    let markdown = if adjust_line_ending_on_save {
        eol::convert(&text, LineEnding::Lf).into_owned()
    } else {
        text
    };
    let trailing_newline = options.trim_trailing_newline.resolve(&markdown);

    let filename = pathname
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(
        path = %pathname.display(),
        encoding = %encoding.encoding,
        bom = encoding.has_bom,
        %line_ending,
        mixed = is_mixed_line_endings,
        adjust = adjust_line_ending_on_save,
        trailing = ?trailing_newline,
        "loaded markdown file"
    );

    MarkdownDocument {
        markdown,
        filename,
        pathname,
        encoding,
        line_ending,
        adjust_line_ending_on_save,
        trailing_newline,
        is_mixed_line_endings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::file::document::{TrailingNewline, TrailingNewlineHint};
    use tempfile::TempDir;

    struct FixedOracle(&'static str);

    impl EncodingOracle for FixedOracle {
        fn guess(&self, _bytes: &[u8], _auto_detect: bool) -> EncodingInfo {
            EncodingInfo::new(self.0, false)
        }
    }

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_load_utf8_lf() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "note.md", b"# Hello\n\nSecond line\n");

        let doc = MarkdownLoader::default().load(&path).unwrap();
        assert_eq!(doc.markdown, "# Hello\n\nSecond line\n");
        assert_eq!(doc.filename(), "note.md");
        assert_eq!(doc.pathname(), path.as_path());
        assert_eq!(doc.encoding(), &EncodingInfo::new("utf8", false));
        assert_eq!(doc.line_ending(), LineEnding::Lf);
        assert!(!doc.adjust_line_ending_on_save());
        assert!(!doc.is_mixed_line_endings());
        assert_eq!(doc.trailing_newline(), TrailingNewline::EnsureSingle);
    }

    #[test]
    fn test_load_crlf_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "win.md", b"Line1\r\nLine2\r\nLine3");

        let doc = MarkdownLoader::default().load(&path).unwrap();
        assert_eq!(doc.markdown, "Line1\nLine2\nLine3");
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
        assert!(doc.adjust_line_ending_on_save());
        assert_eq!(doc.trailing_newline(), TrailingNewline::TrimAll);
    }

    #[test]
    fn test_load_mixed_uses_preferred() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "mixed.md", b"a\r\nb\nc\n\n");
        let options = LoadOptions {
            preferred_eol: LineEnding::Crlf,
            ..LoadOptions::default()
        };

        let doc = MarkdownLoader::default().load_with_options(&path, &options).unwrap();
        assert_eq!(doc.markdown, "a\nb\nc\n\n");
        assert!(doc.is_mixed_line_endings());
        assert!(doc.adjust_line_ending_on_save());
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
        assert_eq!(doc.trailing_newline(), TrailingNewline::Disabled);
    }

    #[test]
    fn test_load_cr_run_before_lf_is_one_terminator() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "cr.md", b"a\r\r\nb\r\n");

        let doc = MarkdownLoader::default().load(&path).unwrap();
        assert_eq!(doc.markdown, "a\nb\n");
        assert!(!doc.markdown.contains("\r\n"));
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.md", b"");
        let options = LoadOptions {
            preferred_eol: LineEnding::Crlf,
            ..LoadOptions::default()
        };

        let doc = MarkdownLoader::default().load_with_options(&path, &options).unwrap();
        assert_eq!(doc.markdown, "");
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
        assert!(doc.adjust_line_ending_on_save());
        assert!(!doc.is_mixed_line_endings());
        assert_eq!(doc.trailing_newline(), TrailingNewline::TrimAll);
    }

    #[test]
    fn test_load_utf8_with_bom() {
        let dir = TempDir::new().unwrap();
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(b"Hello with BOM!");
        let path = write_file(&dir, "bom.md", &content);

        let doc = MarkdownLoader::default().load(&path).unwrap();
        assert_eq!(doc.markdown, "Hello with BOM!");
        assert_eq!(doc.encoding(), &EncodingInfo::new("utf8", true));
    }

    #[test]
    fn test_load_utf16le_with_bom() {
        let dir = TempDir::new().unwrap();
        let (bytes, _) = Encoding::Utf16Le.encode("# T\r\nbody\r\n", true);
        let path = write_file(&dir, "wide.md", &bytes);

        let doc = MarkdownLoader::default().load(&path).unwrap();
        assert_eq!(doc.markdown, "# T\nbody\n");
        assert_eq!(doc.encoding(), &EncodingInfo::new("utf16le", true));
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
    }

    #[test]
    fn test_explicit_trailing_hint_passes_through() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.md", b"text\n\n");
        let options = LoadOptions {
            trim_trailing_newline: TrailingNewlineHint::Fixed(TrailingNewline::TrimAll),
            ..LoadOptions::default()
        };

        let doc = MarkdownLoader::default().load_with_options(&path, &options).unwrap();
        assert_eq!(doc.trailing_newline(), TrailingNewline::TrimAll);
    }

    #[test]
    fn test_unsupported_encoding() {
        let loader = MarkdownLoader::default().with_oracle(FixedOracle("klingon-8"));
        let err = loader
            .load_from_bytes(PathBuf::from("/x.md"), b"text", &LoadOptions::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedEncoding);
        assert!(err.to_string().contains("klingon-8"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = MarkdownLoader::default()
            .load(dir.path().join("missing.md"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_empty_path_is_path_error() {
        let err = MarkdownLoader::default().load("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_path_error() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("link.md");
        std::os::unix::fs::symlink(dir.path().join("gone.md"), &link).unwrap();

        let err = MarkdownLoader::default().load(&link).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[tokio::test]
    async fn test_load_async() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "async.md", b"async\r\n");

        let doc = MarkdownLoader::default()
            .load_async(&path, LoadOptions::default())
            .await
            .unwrap();
        assert_eq!(doc.markdown, "async\n");
        assert_eq!(doc.line_ending(), LineEnding::Crlf);
    }
}
