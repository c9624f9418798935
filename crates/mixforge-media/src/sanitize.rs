//! Text sanitization for drawtext overlays.
//!
//! FFmpeg's drawtext parser treats backslashes, quotes and colons as
//! syntax. All overlay text goes through one escaping function so graph
//! construction never has to reason about quoting.

/// Escape text for use inside a quoted drawtext `text='...'` value.
///
/// Backslashes are escaped first so the later replacements do not double
/// up. Idempotent for text containing none of the special characters.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape_text("Sunset Drive"), "Sunset Drive");
    }

    #[test]
    fn test_quotes_and_colons() {
        assert_eq!(escape_text("Track: 'Live'"), "Track\\: \\'Live\\'");
    }

    #[test]
    fn test_backslash_first() {
        assert_eq!(escape_text("a\\b"), "a\\\\b");
        assert_eq!(escape_text("a\\:b"), "a\\\\\\:b");
    }

    #[test]
    fn test_empty() {
        assert_eq!(escape_text(""), "");
    }
}
