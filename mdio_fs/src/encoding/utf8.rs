/// Check if a byte sample is UTF-8.
///
/// A multi-byte sequence cut off at the end of the sample is accepted, since
/// detection only ever looks at a prefix of the file.
pub fn is_valid_utf8(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// Decode UTF-8, replacing invalid sequences with U+FFFD.
pub(crate) fn decode_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_sequence_is_accepted() {
        let text = "caf\u{e9}".as_bytes();
        assert!(is_valid_utf8(text));
        assert!(is_valid_utf8(&text[..text.len() - 1]));
    }

    #[test]
    fn test_invalid_sequence_is_rejected() {
        assert!(!is_valid_utf8(&[b'a', 0xFF, b'b']));
        assert!(!is_valid_utf8(&[0xC3, b'(']));
    }

    #[test]
    fn test_decode_is_lossy() {
        assert_eq!(decode_utf8(&[b'a', 0xFF]), "a\u{FFFD}");
    }
}
