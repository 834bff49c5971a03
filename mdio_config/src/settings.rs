use mdio_fs::{LineEnding, TrailingNewline, TrailingNewlineHint};
use serde::{Deserialize, Serialize};

/// `[load]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    /// Style assumed for files with mixed or no line endings
    pub preferred_eol: LineEnding,
    /// Guess the encoding of files without a BOM
    pub auto_guess_encoding: bool,
    pub trim_trailing_newline: TrimSetting,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            preferred_eol: LineEnding::Lf,
            auto_guess_encoding: true,
            trim_trailing_newline: TrimSetting::Auto,
        }
    }
}

/// Config spelling of the loader's trailing-newline hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimSetting {
    #[default]
    Auto,
    Disabled,
    EnsureSingle,
    TrimAll,
    UseDefault,
}

impl TrimSetting {
    pub fn to_hint(self) -> TrailingNewlineHint {
        match self {
            TrimSetting::Auto => TrailingNewlineHint::AutoDetect,
            TrimSetting::Disabled => TrailingNewlineHint::Fixed(TrailingNewline::Disabled),
            TrimSetting::EnsureSingle => TrailingNewlineHint::Fixed(TrailingNewline::EnsureSingle),
            TrimSetting::TrimAll => TrailingNewlineHint::Fixed(TrailingNewline::TrimAll),
            TrimSetting::UseDefault => TrailingNewlineHint::Fixed(TrailingNewline::UseDefault),
        }
    }
}

/// `[encoding]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingSettings {
    /// Reported for files without a BOM when guessing is off or inconclusive
    pub default_encoding: String,
    /// Bytes inspected by the heuristics
    pub sample_size: usize,
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            default_encoding: "utf8".to_string(),
            sample_size: 1024,
        }
    }
}

/// `[save]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSettings {
    pub default_extension: String,
    pub atomic_writes: bool,
    pub preserve_permissions: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            default_extension: ".md".to_string(),
            atomic_writes: true,
            preserve_permissions: true,
        }
    }
}
