//! In-memory Markdown document and the options that travel with it.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::eol::LineEnding;
use crate::encoding::EncodingInfo;

/// How trailing newlines are treated when the document is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingNewline {
    /// Two or more trailing newlines were found; leave them alone.
    Disabled,
    /// Exactly one trailing newline was found; keep exactly one.
    EnsureSingle,
    /// No trailing newline was found; strip any that appear.
    TrimAll,
    /// Not classified yet. A loaded document never carries this value.
    UseDefault,
}

impl TrailingNewline {
    /// Classify the trailing newlines of LF-normalized text.
    pub fn classify(text: &str) -> TrailingNewline {
        if text.ends_with("\n\n") {
            TrailingNewline::Disabled
        } else if text.ends_with('\n') {
            TrailingNewline::EnsureSingle
        } else {
            TrailingNewline::TrimAll
        }
    }

    /// Apply the policy to LF-normalized text.
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            TrailingNewline::Disabled | TrailingNewline::UseDefault => Cow::Borrowed(text),
            TrailingNewline::TrimAll => Cow::Borrowed(text.trim_end_matches('\n')),
            TrailingNewline::EnsureSingle => {
                let body = text.trim_end_matches('\n');
                if body.len() + 1 == text.len() {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(format!("{body}\n"))
                }
            }
        }
    }
}

/// What the loader should do about trailing newlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingNewlineHint {
    /// Classify from the file content.
    #[default]
    AutoDetect,
    /// Use this policy regardless of content.
    Fixed(TrailingNewline),
}

impl TrailingNewlineHint {
    /// Resolve against LF-normalized text. `Fixed(UseDefault)` is classified
    /// like `AutoDetect`, so the result is never `UseDefault`.
    pub fn resolve(self, text: &str) -> TrailingNewline {
        match self {
            TrailingNewlineHint::Fixed(policy) if policy != TrailingNewline::UseDefault => policy,
            _ => TrailingNewline::classify(text),
        }
    }
}

/// Per-call load settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Style assumed when the file has mixed or no line endings.
    pub preferred_eol: LineEnding,
    /// Run encoding heuristics when the file has no BOM.
    pub auto_guess_encoding: bool,
    pub trim_trailing_newline: TrailingNewlineHint,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            preferred_eol: LineEnding::Lf,
            auto_guess_encoding: true,
            trim_trailing_newline: TrailingNewlineHint::AutoDetect,
        }
    }
}

/// Options consumed by a save. Read-only for the duration of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Convert the in-memory LF text to `line_ending` on the way out.
    pub adjust_line_ending_on_save: bool,
    pub line_ending: LineEnding,
    pub encoding: EncodingInfo,
    pub trailing_newline: TrailingNewline,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            adjust_line_ending_on_save: false,
            line_ending: LineEnding::Lf,
            encoding: EncodingInfo::default(),
            trailing_newline: TrailingNewline::Disabled,
        }
    }
}

/// A loaded Markdown document.
///
/// `markdown` is owned by the editor and may change freely; it always uses
/// `\n` line endings. Everything else records how the file looked on disk
/// and is fixed at load time.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    pub markdown: String,
    pub(crate) filename: String,
    pub(crate) pathname: PathBuf,
    pub(crate) encoding: EncodingInfo,
    pub(crate) line_ending: LineEnding,
    pub(crate) adjust_line_ending_on_save: bool,
    pub(crate) trailing_newline: TrailingNewline,
    pub(crate) is_mixed_line_endings: bool,
}

impl MarkdownDocument {
    /// Resolved absolute path the document was loaded from.
    pub fn pathname(&self) -> &Path {
        &self.pathname
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn encoding(&self) -> &EncodingInfo {
        &self.encoding
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn adjust_line_ending_on_save(&self) -> bool {
        self.adjust_line_ending_on_save
    }

    pub fn trailing_newline(&self) -> TrailingNewline {
        self.trailing_newline
    }

    pub fn is_mixed_line_endings(&self) -> bool {
        self.is_mixed_line_endings
    }

    /// Options that write the document back the way it was read.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            adjust_line_ending_on_save: self.adjust_line_ending_on_save,
            line_ending: self.line_ending,
            encoding: self.encoding.clone(),
            trailing_newline: self.trailing_newline,
        }
    }
}
