use crate::encoding::Encoding;

/// Result of BOM detection containing the detected encoding and BOM length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomDetectionResult {
    pub encoding: Encoding,
    pub bom_length: usize,
}

/// Detect Byte Order Mark (BOM) in the given byte slice.
///
/// UTF-32LE is checked before UTF-16LE because its mark starts with the
/// UTF-16LE mark.
pub fn detect_bom(bytes: &[u8]) -> Option<BomDetectionResult> {
    const CANDIDATES: [Encoding; 5] = [
        Encoding::Utf32Le,
        Encoding::Utf32Be,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Utf8,
    ];

    CANDIDATES.into_iter().find_map(|encoding| {
        let bom = bom_bytes(encoding);
        bytes.starts_with(bom).then_some(BomDetectionResult {
            encoding,
            bom_length: bom.len(),
        })
    })
}

/// Byte-order mark written in front of text in `encoding`; empty for
/// single-byte charsets.
pub fn bom_bytes(encoding: Encoding) -> &'static [u8] {
    match encoding {
        Encoding::Utf8 => &[0xEF, 0xBB, 0xBF],
        Encoding::Utf16Le => &[0xFF, 0xFE],
        Encoding::Utf16Be => &[0xFE, 0xFF],
        Encoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
        Encoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        Encoding::Latin1 | Encoding::Windows1252 | Encoding::Latin9 => &[],
    }
}
