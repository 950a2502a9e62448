//! Character and word predicates shared by the scanners.
//!
//! "Word" follows the ASCII `\w` class: letters, digits and underscore.

/// Check if a byte is a word character (`[A-Za-z0-9_]`)
#[inline]
pub const fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Check if a byte is a decimal digit
#[inline]
pub const fn is_digit_byte(c: u8) -> bool {
    c.is_ascii_digit()
}

/// Check if a byte is HTML whitespace
#[inline]
pub const fn is_whitespace_byte(c: u8) -> bool {
    matches!(c, b' ' | b'\n' | b'\t' | b'\r' | 0x0C)
}

/// Check if a non-empty string consists only of word characters
#[inline]
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_word_byte)
}

/// Check if a non-empty string consists only of decimal digits
#[inline]
pub fn is_integer_literal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_digit_byte)
}

/// Length of the run of word characters at the start of `bytes`
#[inline]
pub fn word_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&c| is_word_byte(c)).count()
}

/// Check if a string is a single-quoted literal (`'...'`)
#[inline]
pub fn is_single_quoted(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_word() {
        assert!(is_word("message"));
        assert!(is_word("item_2"));
        assert!(is_word("42"));
        assert!(!is_word(""));
        assert!(!is_word("a.b"));
        assert!(!is_word("café"));
    }

    #[test]
    fn test_is_integer_literal() {
        assert!(is_integer_literal("0"));
        assert!(is_integer_literal("1234"));
        assert!(!is_integer_literal("12a"));
        assert!(!is_integer_literal("-1"));
        assert!(!is_integer_literal(""));
    }

    #[test]
    fn test_word_len() {
        assert_eq!(word_len(b"count > 0"), 5);
        assert_eq!(word_len(b"(x)"), 0);
        assert_eq!(word_len(b"abc"), 3);
    }

    #[test]
    fn test_is_single_quoted() {
        assert!(is_single_quoted("'Ada'"));
        assert!(is_single_quoted("''"));
        assert!(!is_single_quoted("'"));
        assert!(!is_single_quoted("\"Ada\""));
    }
}
