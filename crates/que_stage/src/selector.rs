//! Compound selectors: an optional tag name followed by `#id` and `.class`
//! parts, e.g. `#app`, `div.card`, `button#go.primary`.

use que_carton::{is_word_byte, CompactString, SmallVec};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub tag: Option<CompactString>,
    pub id: Option<CompactString>,
    pub classes: SmallVec<[CompactString; 2]>,
}

#[inline]
fn is_name_byte(c: u8) -> bool {
    is_word_byte(c) || c == b'-'
}

impl Selector {
    /// Parse a compound selector. Combinators, attribute selectors and
    /// pseudo-classes are not supported and yield `None`.
    pub fn parse(source: &str) -> Option<Self> {
        let bytes = source.trim().as_bytes();
        if bytes.is_empty() {
            return None;
        }

        let mut selector = Self::default();
        let mut i = 0;
        while i < bytes.len() {
            let marker = bytes[i];
            let start = if marker == b'#' || marker == b'.' { i + 1 } else { i };
            let mut end = start;
            while end < bytes.len() && is_name_byte(bytes[end]) {
                end += 1;
            }
            if end == start {
                return None;
            }
            // Only ASCII name bytes were consumed
            let name = CompactString::from(std::str::from_utf8(&bytes[start..end]).ok()?);
            match marker {
                b'#' => selector.id = Some(name),
                b'.' => selector.classes.push(name),
                _ if i == 0 => selector.tag = Some(name.to_ascii_lowercase().into()),
                _ => return None,
            }
            i = end;
        }
        Some(selector)
    }

    /// Whether an element with these properties matches
    pub fn matches(&self, tag: &str, id: Option<&str>, class: Option<&str>) -> bool {
        if let Some(expected) = &self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }
        if let Some(expected) = &self.id {
            if id != Some(expected.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|expected| {
            class.is_some_and(|class| class.split_ascii_whitespace().any(|c| c == expected))
        })
    }
}
