use super::{DetectionConfidence, Encoding, EncodingDetectionResult};

/// Windows-1252 code points for 0x80..=0x9F. Unassigned slots keep the C1 control.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Positions where ISO-8859-15 differs from ISO-8859-1.
const LATIN9_OVERRIDES: [(u8, char); 8] = [
    (0xA4, '\u{20AC}'),
    (0xA6, '\u{0160}'),
    (0xA8, '\u{0161}'),
    (0xB4, '\u{017D}'),
    (0xB8, '\u{017E}'),
    (0xBC, '\u{0152}'),
    (0xBD, '\u{0153}'),
    (0xBE, '\u{0178}'),
];

/// Detect Latin encodings with conservative confidence scoring.
pub fn detect_latin_encoding(bytes: &[u8]) -> Option<EncodingDetectionResult> {
    if bytes.len() < 10 {
        return None;
    }

    let mut extended = 0usize;
    let mut win1252_specific = 0usize; // 0x80..=0x9F range
    let mut latin9_specific = 0usize; // subset markers

    for &b in bytes {
        if b >= 0x80 {
            extended += 1;
        }
        if (0x80..=0x9F).contains(&b) {
            win1252_specific += 1;
        }
        if LATIN9_OVERRIDES.iter().any(|(pos, _)| *pos == b) {
            latin9_specific += 1;
        }
    }

    let extended_ratio = extended as f64 / bytes.len() as f64;
    if extended_ratio < 0.08 {
        return None;
    }

    if win1252_specific > 2 {
        return Some(EncodingDetectionResult {
            encoding: Encoding::Windows1252,
            confidence: DetectionConfidence::Medium,
        });
    }
    if latin9_specific > extended / 10 {
        return Some(EncodingDetectionResult {
            encoding: Encoding::Latin9,
            confidence: DetectionConfidence::Low,
        });
    }
    Some(EncodingDetectionResult {
        encoding: Encoding::Latin1,
        confidence: DetectionConfidence::Low,
    })
}

/// Decode a single-byte Latin charset. Every byte maps to a character.
pub(crate) fn decode_latin(bytes: &[u8], encoding: Encoding) -> String {
    bytes.iter().map(|&b| byte_to_char(b, encoding)).collect()
}

/// Encode to a single-byte Latin charset, returning the bytes and the number
/// of characters that had no mapping and were replaced with `?`.
pub(crate) fn encode_latin(text: &str, encoding: Encoding) -> (Vec<u8>, usize) {
    let mut unmappable = 0usize;
    let bytes = text
        .chars()
        .map(|ch| {
            char_to_byte(ch, encoding).unwrap_or_else(|| {
                unmappable += 1;
                b'?'
            })
        })
        .collect();
    (bytes, unmappable)
}

fn byte_to_char(byte: u8, encoding: Encoding) -> char {
    match encoding {
        Encoding::Windows1252 if (0x80..=0x9F).contains(&byte) => {
            WINDOWS_1252_HIGH[usize::from(byte - 0x80)]
        }
        Encoding::Latin9 => LATIN9_OVERRIDES
            .iter()
            .find(|(pos, _)| *pos == byte)
            .map_or(char::from(byte), |(_, ch)| *ch),
        _ => char::from(byte),
    }
}

fn char_to_byte(ch: char, encoding: Encoding) -> Option<u8> {
    let direct = u8::try_from(u32::from(ch)).ok();
    match encoding {
        Encoding::Windows1252 => {
            if let Some(i) = WINDOWS_1252_HIGH.iter().position(|&c| c == ch) {
                return u8::try_from(0x80 + i).ok();
            }
            direct.filter(|b| !(0x80..=0x9F).contains(b))
        }
        Encoding::Latin9 => {
            if let Some((pos, _)) = LATIN9_OVERRIDES.iter().find(|(_, c)| *c == ch) {
                return Some(*pos);
            }
            direct.filter(|b| !LATIN9_OVERRIDES.iter().any(|(pos, _)| pos == b))
        }
        _ => direct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1() {
        let latin1_bytes = &[0x48, 0x65, 0x6C, 0x6C, 0x6F, 0xA9, 0xAE]; // "Hello©®"
        assert_eq!(decode_latin(latin1_bytes, Encoding::Latin1), "Hello\u{A9}\u{AE}");
    }

    #[test]
    fn test_windows1252_smart_quotes() {
        let decoded = decode_latin(&[0x93, b'q', 0x94, 0x80], Encoding::Windows1252);
        assert_eq!(decoded, "\u{201C}q\u{201D}\u{20AC}");

        let (encoded, unmappable) = encode_latin(&decoded, Encoding::Windows1252);
        assert_eq!(encoded, vec![0x93, b'q', 0x94, 0x80]);
        assert_eq!(unmappable, 0);
    }

    #[test]
    fn test_latin9_euro() {
        assert_eq!(decode_latin(&[0xA4], Encoding::Latin9), "\u{20AC}");
        assert_eq!(decode_latin(&[0xA4], Encoding::Latin1), "\u{A4}");

        // The currency sign has no Latin-9 slot
        let (encoded, unmappable) = encode_latin("\u{A4}\u{20AC}", Encoding::Latin9);
        assert_eq!(encoded, vec![b'?', 0xA4]);
        assert_eq!(unmappable, 1);
    }

    #[test]
    fn test_encode_latin1_replaces_unmappable() {
        let (encoded, unmappable) = encode_latin("a\u{20AC}b", Encoding::Latin1);
        assert_eq!(encoded, b"a?b");
        assert_eq!(unmappable, 1);
    }

    #[test]
    fn test_detect_windows1252() {
        let sample = b"\x93quoted\x94 and \x96 dash \x85";
        let result = detect_latin_encoding(sample).map(|r| r.encoding);
        assert_eq!(result, Some(Encoding::Windows1252));
    }

    #[test]
    fn test_detect_mostly_ascii_is_not_latin() {
        assert!(detect_latin_encoding(b"plain ascii text with one \xE9").is_none());
    }
}
