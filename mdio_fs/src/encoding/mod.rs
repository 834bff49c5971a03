//! Character encodings: name lookup, detection heuristics and the
//! decode/encode backend.

use std::fmt;

pub mod latin;
mod oracle;
pub mod utf16;
pub mod utf8;

pub use latin::detect_latin_encoding;
pub use oracle::{EncodingInfo, EncodingOracle, HeuristicOracle};
pub use utf8::is_valid_utf8;
pub use utf16::detect_utf16_pattern;

use crate::bom::bom_bytes;

/// A text encoding the codec can decode and encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    Latin1,
    Windows1252,
    Latin9,
}

impl Encoding {
    /// Look up an encoding by name.
    ///
    /// Matching ignores ASCII case, `-` and `_`, so `UTF-8`, `utf_8` and
    /// `utf8` are the same encoding. Returns `None` for unsupported names.
    pub fn from_name(name: &str) -> Option<Encoding> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let encoding = match key.as_str() {
            "utf8" => Encoding::Utf8,
            "utf16le" | "ucs2" => Encoding::Utf16Le,
            "utf16be" => Encoding::Utf16Be,
            "utf32le" => Encoding::Utf32Le,
            "utf32be" => Encoding::Utf32Be,
            "latin1" | "iso88591" | "l1" => Encoding::Latin1,
            "windows1252" | "cp1252" | "win1252" => Encoding::Windows1252,
            "latin9" | "iso885915" | "l9" => Encoding::Latin9,
            _ => return None,
        };
        Some(encoding)
    }

    /// Canonical name, accepted by [`Encoding::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Utf16Le => "utf16le",
            Encoding::Utf16Be => "utf16be",
            Encoding::Utf32Le => "utf32le",
            Encoding::Utf32Be => "utf32be",
            Encoding::Latin1 => "latin1",
            Encoding::Windows1252 => "windows1252",
            Encoding::Latin9 => "latin9",
        }
    }

    /// Decode `bytes`, dropping a leading byte-order mark for this encoding.
    ///
    /// Decoding never fails: malformed input is replaced with U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(bom_bytes(self)).unwrap_or(bytes);
        match self {
            Encoding::Utf8 => utf8::decode_utf8(bytes),
            Encoding::Utf16Le => utf16::decode_utf16(bytes, false),
            Encoding::Utf16Be => utf16::decode_utf16(bytes, true),
            Encoding::Utf32Le => utf16::decode_utf32(bytes, false),
            Encoding::Utf32Be => utf16::decode_utf32(bytes, true),
            Encoding::Latin1 | Encoding::Windows1252 | Encoding::Latin9 => {
                latin::decode_latin(bytes, self)
            }
        }
    }

    /// Encode `text`, optionally prefixed with this encoding's byte-order mark.
    ///
    /// Characters the charset cannot represent are written as `?`; their
    /// count is returned alongside the bytes.
    pub fn encode(self, text: &str, with_bom: bool) -> (Vec<u8>, usize) {
        let (body, unmappable) = match self {
            Encoding::Utf8 => (text.as_bytes().to_vec(), 0),
            Encoding::Utf16Le => (utf16::encode_utf16(text, false), 0),
            Encoding::Utf16Be => (utf16::encode_utf16(text, true), 0),
            Encoding::Utf32Le => (utf16::encode_utf32(text, false), 0),
            Encoding::Utf32Be => (utf16::encode_utf32(text, true), 0),
            Encoding::Latin1 | Encoding::Windows1252 | Encoding::Latin9 => {
                latin::encode_latin(text, self)
            }
        };

        if !with_bom {
            return (body, unmappable);
        }
        let bom = bom_bytes(self);
        let mut bytes = Vec::with_capacity(bom.len() + body.len());
        bytes.extend_from_slice(bom);
        bytes.extend_from_slice(&body);
        (bytes, unmappable)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Confidence level for encoding detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DetectionConfidence {
    High = 3,
    Medium = 2,
    Low = 1,
    Unknown = 0,
}

/// Encoding detection result with confidence information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDetectionResult {
    pub encoding: Encoding,
    pub confidence: DetectionConfidence,
}

/// Configuration for encoding detection heuristics
#[derive(Debug, Clone, Copy)]
pub struct DetectionConfig {
    pub max_null_ratio: f64,
    pub max_control_ratio: f64,
    pub sample_size: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            max_null_ratio: 0.1,
            max_control_ratio: 0.3,
            sample_size: 1024,
        }
    }
}

/// Heuristic detection on a prefix of `bytes` when no BOM is present.
///
/// Returns `None` when the sample looks binary (too many NUL or control
/// bytes), in which case the caller falls back to its default encoding.
pub fn detect_encoding_heuristic(
    bytes: &[u8],
    config: DetectionConfig,
) -> Option<EncodingDetectionResult> {
    let sample = &bytes[..bytes.len().min(config.sample_size)];
    if sample.is_empty() {
        return Some(EncodingDetectionResult {
            encoding: Encoding::Utf8,
            confidence: DetectionConfidence::Unknown,
        });
    }

    // UTF-16 text is full of NULs, so check it before the binary guard
    if sample.len() >= 32 {
        if let Some(enc) = detect_utf16_pattern(sample) {
            return Some(EncodingDetectionResult {
                encoding: enc,
                confidence: DetectionConfidence::Medium,
            });
        }
    }

    let mut null_count = 0usize;
    let mut control_count = 0usize;
    for &b in sample {
        if b == 0 {
            null_count += 1;
        } else if b < 32 && b != 9 && b != 10 && b != 13 {
            control_count += 1;
        }
    }
    let null_ratio = null_count as f64 / sample.len() as f64;
    let control_ratio = control_count as f64 / sample.len() as f64;
    if null_ratio > config.max_null_ratio || control_ratio > config.max_control_ratio {
        return None;
    }

    if is_valid_utf8(sample) {
        return Some(EncodingDetectionResult {
            encoding: Encoding::Utf8,
            confidence: DetectionConfidence::High,
        });
    }
    if let Some(lat) = detect_latin_encoding(sample) {
        return Some(lat);
    }
    // not UTF-8, and too few high bytes to tell charsets apart; Latin-1
    // maps every byte, so the file survives a round trip
    Some(EncodingDetectionResult {
        encoding: Encoding::Latin1,
        confidence: DetectionConfidence::Unknown,
    })
}
