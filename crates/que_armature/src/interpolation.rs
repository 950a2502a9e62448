//! Placeholder splitting for text interpolation.
//!
//! A placeholder is the open delimiter, a bare word, and the close delimiter
//! with nothing else in between (`{{name}}`). Anything that looks like a
//! placeholder but does not hold a bare word stays literal text.

/// A piece of interpolated text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart<'s> {
    Text(&'s str),
    Field(&'s str),
}

/// Split `text` into literal and placeholder parts
pub fn split_template<'s>(text: &'s str, open: &str, close: &str) -> Vec<TemplatePart<'s>> {
    let mut parts = Vec::new();
    if open.is_empty() || close.is_empty() {
        if !text.is_empty() {
            parts.push(TemplatePart::Text(text));
        }
        return parts;
    }

    let step = open.chars().next().map_or(1, char::len_utf8);
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(found) = text[pos..].find(open) {
        let open_at = pos + found;
        let inner_start = open_at + open.len();
        let Some(close_len) = text[inner_start..].find(close) else {
            break;
        };
        let inner_end = inner_start + close_len;
        let inner = &text[inner_start..inner_end];

        if que_carton::is_word(inner) {
            if open_at > text_start {
                parts.push(TemplatePart::Text(&text[text_start..open_at]));
            }
            parts.push(TemplatePart::Field(inner));
            text_start = inner_end + close.len();
            pos = text_start;
        } else {
            pos = open_at + step;
        }
    }

    if text_start < text.len() {
        parts.push(TemplatePart::Text(&text[text_start..]));
    }
    parts
}

/// Check whether `text` holds at least one placeholder
pub fn has_placeholder(text: &str, open: &str, close: &str) -> bool {
    split_template(text, open, close)
        .iter()
        .any(|part| matches!(part, TemplatePart::Field(_)))
}
