//! End-of-line detection and conversion.
//!
//! Documents are held in memory with `\n` line endings only. The on-disk
//! style is detected at load time and re-applied on save.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Line-ending style of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Line Feed (Unix/Linux/macOS) - \n
    #[default]
    Lf,
    /// Carriage Return + Line Feed (Windows) - \r\n
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => f.write_str("lf"),
            LineEnding::Crlf => f.write_str("crlf"),
        }
    }
}

/// Which line terminators occur in a text. Both set means mixed endings;
/// neither set means the text has no line terminator at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineEndingScan {
    pub has_lf: bool,
    pub has_crlf: bool,
}

impl LineEndingScan {
    pub fn is_mixed(self) -> bool {
        self.has_lf && self.has_crlf
    }

    pub fn is_unknown(self) -> bool {
        !self.has_lf && !self.has_crlf
    }
}

/// Scan for `\r\n` and for `\n` not preceded by `\r`.
pub fn detect(text: &str) -> LineEndingScan {
    let bytes = text.as_bytes();
    let mut scan = LineEndingScan::default();

    for (i, _) in text.match_indices('\n') {
        if i > 0 && bytes[i - 1] == b'\r' {
            scan.has_crlf = true;
        } else {
            scan.has_lf = true;
        }
        if scan.is_mixed() {
            break;
        }
    }
    scan
}

/// Pick the style of a scanned text, falling back to `preferred` when the
/// text is mixed or has no line terminators.
pub fn resolve_style(scan: LineEndingScan, preferred: LineEnding) -> LineEnding {
    match (scan.has_lf, scan.has_crlf) {
        (true, false) => LineEnding::Lf,
        (false, true) => LineEnding::Crlf,
        _ => preferred,
    }
}

/// Replace every `\r\n` and bare `\n` with `target` in one pass.
///
/// A lone `\r` is not a line terminator and is kept as content. When
/// converting to LF, a run of `\r` directly before `\n` is dropped with it,
/// so the result never contains `\r\n`. Text that already uses `target`
/// exclusively is returned borrowed.
pub fn convert(text: &str, target: LineEnding) -> Cow<'_, str> {
    let scan = detect(text);
    let already = match target {
        LineEnding::Lf => !scan.has_crlf,
        LineEnding::Crlf => !scan.has_lf,
    };
    if already {
        return Cow::Borrowed(text);
    }

    let eol = target.as_str();
    let mut result = String::with_capacity(text.len() + text.len() / 16);
    let mut start = 0;

    for (i, _) in text.match_indices('\n') {
        let line = &text[start..i];
        let line = match target {
            LineEnding::Lf => line.trim_end_matches('\r'),
            LineEnding::Crlf => line.strip_suffix('\r').unwrap_or(line),
        };
        result.push_str(line);
        result.push_str(eol);
        start = i + 1;
    }
    result.push_str(&text[start..]);

    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_lf() {
        let scan = detect("line1\nline2\nline3");
        assert_eq!(scan, LineEndingScan { has_lf: true, has_crlf: false });
    }

    #[test]
    fn test_detect_crlf() {
        let scan = detect("line1\r\nline2\r\nline3");
        assert_eq!(scan, LineEndingScan { has_lf: false, has_crlf: true });
    }

    #[test]
    fn test_detect_mixed() {
        let scan = detect("line1\nline2\r\nline3");
        assert!(scan.is_mixed());
    }

    #[test]
    fn test_detect_none() {
        assert!(detect("").is_unknown());
        assert!(detect("a single line").is_unknown());
        // a lone CR is content, not a terminator
        assert!(detect("old\rmac").is_unknown());
    }

    #[test]
    fn test_detect_leading_lf() {
        assert!(detect("\nbody").has_lf);
        assert!(detect("\n").has_lf);
    }

    #[test]
    fn test_resolve_style() {
        let lf = LineEndingScan { has_lf: true, has_crlf: false };
        let crlf = LineEndingScan { has_lf: false, has_crlf: true };
        let mixed = LineEndingScan { has_lf: true, has_crlf: true };
        let none = LineEndingScan::default();

        assert_eq!(resolve_style(lf, LineEnding::Crlf), LineEnding::Lf);
        assert_eq!(resolve_style(crlf, LineEnding::Lf), LineEnding::Crlf);
        assert_eq!(resolve_style(mixed, LineEnding::Crlf), LineEnding::Crlf);
        assert_eq!(resolve_style(none, LineEnding::Lf), LineEnding::Lf);
    }

    #[test]
    fn test_convert_crlf_to_lf() {
        assert_eq!(convert("line1\r\nline2\r\nline3", LineEnding::Lf), "line1\nline2\nline3");
    }

    #[test]
    fn test_convert_lf_to_crlf() {
        assert_eq!(convert("line1\nline2\n", LineEnding::Crlf), "line1\r\nline2\r\n");
    }

    #[test]
    fn test_convert_mixed() {
        let text = "a\r\nb\nc\r\n\nd";
        assert_eq!(convert(text, LineEnding::Lf), "a\nb\nc\n\nd");
        assert_eq!(convert(text, LineEnding::Crlf), "a\r\nb\r\nc\r\n\r\nd");
    }

    #[test]
    fn test_convert_keeps_lone_cr() {
        assert_eq!(convert("a\rb\nc", LineEnding::Crlf), "a\rb\r\nc");
        assert_eq!(convert("a\r\r\nb", LineEnding::Crlf), "a\r\r\nb");
    }

    #[test]
    fn test_convert_to_lf_drops_cr_runs() {
        assert_eq!(convert("a\r\r\nb", LineEnding::Lf), "a\nb");
        assert_eq!(convert("a\rb\r\r\r\n", LineEnding::Lf), "a\rb\n");
        assert!(!convert("\r\r\n\r\n", LineEnding::Lf).contains("\r\n"));
    }

    #[test]
    fn test_convert_borrows_when_unchanged() {
        assert!(matches!(convert("a\nb", LineEnding::Lf), Cow::Borrowed(_)));
        assert!(matches!(convert("a\r\nb", LineEnding::Crlf), Cow::Borrowed(_)));
        assert!(matches!(convert("", LineEnding::Crlf), Cow::Borrowed(_)));
    }

    #[test]
    fn test_convert_is_idempotent() {
        for text in ["", "x", "a\nb", "a\r\nb\n", "\n\r\n\n", "a\rb\r\n", "a\r\r\nb", "\r\r\r\n\n"] {
            for style in [LineEnding::Lf, LineEnding::Crlf] {
                let once = convert(text, style).into_owned();
                assert_eq!(convert(&once, style), once.as_str());
            }
        }
    }

    #[test]
    fn test_convert_preserves_line_count() {
        for text in ["a\r\nb\nc", "\n\n", "x\r\n", "no newline"] {
            let lf = convert(text, LineEnding::Lf).into_owned();
            let back = convert(&convert(text, LineEnding::Crlf), LineEnding::Lf).into_owned();
            assert_eq!(back, lf);
            assert_eq!(lf.split('\n').count(), text.split('\n').count());
        }
    }
}
