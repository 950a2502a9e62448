//! HTML tag tables used when parsing and serializing markup.

use phf::{phf_set, Set};

/// Elements that never have children or a closing tag
static VOID_TAGS: Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
};

/// Check if a tag is a void element (case-insensitive)
pub fn is_void_tag(tag: &str) -> bool {
    if tag.bytes().any(|c| c.is_ascii_uppercase()) {
        VOID_TAGS.contains(tag.to_ascii_lowercase().as_str())
    } else {
        VOID_TAGS.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_tags() {
        assert!(is_void_tag("br"));
        assert!(is_void_tag("INPUT"));
        assert!(!is_void_tag("div"));
        assert!(!is_void_tag("span"));
    }
}
