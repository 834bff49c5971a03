//! UTF-16 and UTF-32 detection and transcoding.

use super::Encoding;

/// Detect UTF-16 patterns based on characteristic null/data positions.
pub fn detect_utf16_pattern(bytes: &[u8]) -> Option<Encoding> {
    if bytes.len() < 32 {
        return None;
    }

    let mut even_null = 0usize;
    let mut odd_null = 0usize;
    let mut even_ascii = 0usize;
    let mut odd_ascii = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        let (null, ascii) = if i % 2 == 0 {
            (&mut even_null, &mut even_ascii)
        } else {
            (&mut odd_null, &mut odd_ascii)
        };
        if b == 0 {
            *null += 1;
        } else if (32..=126).contains(&b) {
            *ascii += 1;
        }
    }

    let half = bytes.len() / 2;
    let even_null_ratio = even_null as f64 / half as f64;
    let odd_null_ratio = odd_null as f64 / half as f64;
    let even_ascii_ratio = even_ascii as f64 / half as f64;
    let odd_ascii_ratio = odd_ascii as f64 / half as f64;

    // ASCII text in UTF-16LE puts the zero byte second
    if odd_null_ratio > 0.85 && even_ascii_ratio > 0.4 {
        return Some(Encoding::Utf16Le);
    }
    if even_null_ratio > 0.85 && odd_ascii_ratio > 0.4 {
        return Some(Encoding::Utf16Be);
    }
    None
}

/// Decode UTF-16 bytes. Unpaired surrogates and a dangling odd byte become U+FFFD.
pub(crate) fn decode_utf16(bytes: &[u8], big_endian: bool) -> String {
    let units = bytes.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });

    let mut result: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if bytes.len() % 2 != 0 {
        result.push(char::REPLACEMENT_CHARACTER);
    }
    result
}

pub(crate) fn encode_utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        if big_endian {
            result.extend_from_slice(&unit.to_be_bytes());
        } else {
            result.extend_from_slice(&unit.to_le_bytes());
        }
    }
    result
}

/// Decode UTF-32 bytes. Invalid scalar values and a partial trailing unit become U+FFFD.
pub(crate) fn decode_utf32(bytes: &[u8], big_endian: bool) -> String {
    let chunks = bytes.chunks_exact(4);
    let dangling = !chunks.remainder().is_empty();

    let mut result: String = chunks
        .map(|chunk| {
            let quad = [chunk[0], chunk[1], chunk[2], chunk[3]];
            let code = if big_endian {
                u32::from_be_bytes(quad)
            } else {
                u32::from_le_bytes(quad)
            };
            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect();
    if dangling {
        result.push(char::REPLACEMENT_CHARACTER);
    }
    result
}

pub(crate) fn encode_utf32(text: &str, big_endian: bool) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len() * 4);
    for ch in text.chars() {
        let code = u32::from(ch);
        if big_endian {
            result.extend_from_slice(&code.to_be_bytes());
        } else {
            result.extend_from_slice(&code.to_le_bytes());
        }
    }
    result
}
