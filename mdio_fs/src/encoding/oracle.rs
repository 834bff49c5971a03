//! Encoding guessing for raw file buffers.

use tracing::debug;

use super::{DetectionConfig, Encoding, detect_encoding_heuristic, detect_latin_encoding};
use crate::bom::detect_bom;

/// Encoding of a loaded file, carried from load to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingInfo {
    /// Encoding name as reported by the oracle.
    pub encoding: String,
    /// Whether the file started with a byte-order mark.
    pub has_bom: bool,
}

impl EncodingInfo {
    pub fn new(encoding: impl Into<String>, has_bom: bool) -> Self {
        Self {
            encoding: encoding.into(),
            has_bom,
        }
    }
}

impl Default for EncodingInfo {
    fn default() -> Self {
        Self::new(Encoding::Utf8.name(), false)
    }
}

/// Guesses the encoding of a raw byte buffer.
///
/// Implementations must always produce an answer; whether the returned name
/// is usable is decided by the loader.
pub trait EncodingOracle: Send + Sync {
    fn guess(&self, bytes: &[u8], auto_detect: bool) -> EncodingInfo;
}

/// BOM sniffing followed by byte-pattern heuristics.
///
/// A BOM is always honoured. Without one, the heuristics run only when
/// `auto_detect` is set; otherwise, and for input that looks binary, the
/// configured default encoding is reported.
#[derive(Debug, Clone)]
pub struct HeuristicOracle {
    pub config: DetectionConfig,
    pub default_encoding: String,
}

impl HeuristicOracle {
    pub fn new(config: DetectionConfig, default_encoding: impl Into<String>) -> Self {
        Self {
            config,
            default_encoding: default_encoding.into(),
        }
    }
}

impl Default for HeuristicOracle {
    fn default() -> Self {
        Self::new(DetectionConfig::default(), Encoding::Utf8.name())
    }
}

impl EncodingOracle for HeuristicOracle {
    fn guess(&self, bytes: &[u8], auto_detect: bool) -> EncodingInfo {
        if let Some(bom) = detect_bom(bytes) {
            return EncodingInfo::new(bom.encoding.name(), true);
        }

        if auto_detect {
            match detect_encoding_heuristic(bytes, self.config) {
                Some(result) => {
                    let encoding = confirm_whole_buffer(bytes, result.encoding);
                    debug!(%encoding, confidence = ?result.confidence, "guessed encoding");
                    return EncodingInfo::new(encoding.name(), false);
                }
                None => debug!("sample looks binary, using default encoding"),
            }
        }

        EncodingInfo::new(self.default_encoding.clone(), false)
    }
}

/// The heuristics only see a prefix. A UTF-8 guess is dropped when invalid
/// bytes show up further on.
fn confirm_whole_buffer(bytes: &[u8], guess: Encoding) -> Encoding {
    if guess != Encoding::Utf8 || std::str::from_utf8(bytes).is_ok() {
        return guess;
    }
    detect_latin_encoding(bytes).map_or(Encoding::Latin1, |r| r.encoding)
}
