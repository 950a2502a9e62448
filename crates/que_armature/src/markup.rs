//! Markup scanner for the in-memory host document.
//!
//! [`MarkupScanner`] walks the input once and yields [`Markup`] items that
//! borrow from it: text runs, start tags with their attributes already
//! split, end tags and comments. Placeholders in text are not special here;
//! the runtime finds them once the tree is built. Doctypes and processing
//! instructions are skipped. Entities are left encoded.

use que_carton::is_whitespace_byte;

/// One attribute of a start tag, as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttribute<'s> {
    pub name: &'s str,
    /// `None` for a bare attribute such as `disabled`
    pub value: Option<&'s str>,
}

/// A start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'s> {
    pub name: &'s str,
    pub attributes: Vec<RawAttribute<'s>>,
    /// Written as `<name/>`, or cut off by the end of input
    pub self_closing: bool,
}

/// A scanned piece of markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup<'s> {
    Text(&'s str),
    Start(StartTag<'s>),
    End(&'s str),
    Comment(&'s str),
}

/// Pull scanner over a markup string
pub struct MarkupScanner<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> MarkupScanner<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source, pos: 0 }
    }

    #[inline]
    fn byte(&self, at: usize) -> Option<u8> {
        self.source.as_bytes().get(at).copied()
    }

    /// Whether the `<` at `at` opens a tag, comment or declaration
    fn opens_markup(&self, at: usize) -> bool {
        self.byte(at) == Some(b'<')
            && matches!(self.byte(at + 1), Some(b'!' | b'?' | b'/' | b'a'..=b'z' | b'A'..=b'Z'))
    }

    fn skip_whitespace(&self, mut at: usize) -> usize {
        while self.byte(at).is_some_and(is_whitespace_byte) {
            at += 1;
        }
        at
    }

    /// Advance from `at` while `keep` holds
    fn take_while(&self, mut at: usize, keep: impl Fn(u8) -> bool) -> usize {
        while self.byte(at).is_some_and(&keep) {
            at += 1;
        }
        at
    }

    fn find_from(&self, at: usize, needle: &str) -> Option<usize> {
        self.source.get(at..)?.find(needle).map(|found| at + found)
    }

    fn text(&mut self) -> &'s str {
        let start = self.pos;
        // The first byte may be a `<` that opens nothing
        let mut end = start + 1;
        while end < self.source.len() && !self.opens_markup(end) {
            end += 1;
        }
        self.pos = end;
        &self.source[start..end]
    }

    fn comment(&mut self) -> &'s str {
        let body = self.pos + "<!--".len();
        match self.find_from(body, "-->") {
            Some(end) => {
                self.pos = end + "-->".len();
                &self.source[body..end]
            }
            None => {
                tracing::debug!(offset = self.pos, "unterminated comment");
                self.pos = self.source.len();
                self.source.get(body..).unwrap_or_default()
            }
        }
    }

    fn skip_declaration(&mut self) {
        self.pos = self
            .find_from(self.pos, ">")
            .map_or(self.source.len(), |end| end + 1);
    }

    fn end_tag(&mut self) -> Option<&'s str> {
        let Some(close) = self.find_from(self.pos, ">") else {
            tracing::debug!(offset = self.pos, "end of input inside an end tag");
            self.pos = self.source.len();
            return None;
        };
        let start = self.skip_whitespace(self.pos + 2);
        let end = Self::take_while(self, start, |c| c != b'>' && !is_whitespace_byte(c));
        self.pos = close + 1;
        if start >= end {
            tracing::debug!(offset = close, "end tag without a name");
            return None;
        }
        Some(&self.source[start..end])
    }

    fn start_tag(&mut self) -> StartTag<'s> {
        let name_start = self.pos + 1;
        let name_end = Self::take_while(self, name_start, is_name_byte);
        let mut tag = StartTag {
            name: &self.source[name_start..name_end],
            attributes: Vec::new(),
            self_closing: false,
        };

        let mut at = name_end;
        loop {
            at = self.skip_whitespace(at);
            match self.byte(at) {
                None => {
                    tracing::debug!(tag = tag.name, "end of input inside a start tag");
                    tag.self_closing = true;
                    break;
                }
                Some(b'>') => {
                    at += 1;
                    break;
                }
                Some(b'/') if self.byte(at + 1) == Some(b'>') => {
                    tag.self_closing = true;
                    at += 2;
                    break;
                }
                Some(b'/') => at += 1,
                Some(_) => {
                    let (attribute, next) = self.attribute(at);
                    tag.attributes.push(attribute);
                    at = next;
                }
            }
        }
        self.pos = at;
        tag
    }

    /// Read one attribute starting at a non-space byte
    fn attribute(&self, start: usize) -> (RawAttribute<'s>, usize) {
        // A name holds at least one byte, so `=x` reads as a name
        let name_end = self.take_while(start + 1, |c| is_name_byte(c) && c != b'=');
        let name = &self.source[start..name_end];

        let after_name = self.skip_whitespace(name_end);
        if self.byte(after_name) != Some(b'=') {
            return (RawAttribute { name, value: None }, name_end);
        }

        let value_start = self.skip_whitespace(after_name + 1);
        let (value, next) = match self.byte(value_start) {
            Some(quote @ (b'"' | b'\'')) => {
                let body = value_start + 1;
                match self.source[body..].find(char::from(quote)) {
                    Some(len) => (&self.source[body..body + len], body + len + 1),
                    None => (&self.source[body..], self.source.len()),
                }
            }
            _ => {
                let end = self.unquoted_value_end(value_start);
                (&self.source[value_start..end], end)
            }
        };
        (RawAttribute { name, value: Some(value) }, next)
    }

    /// Unquoted values end at whitespace, `>` or a closing `/>`
    fn unquoted_value_end(&self, mut at: usize) -> usize {
        while let Some(c) = self.byte(at) {
            let closes = c == b'/' && self.byte(at + 1) == Some(b'>');
            if c == b'>' || closes || is_whitespace_byte(c) {
                break;
            }
            at += 1;
        }
        at
    }
}

/// Bytes allowed in tag and attribute names
#[inline]
fn is_name_byte(c: u8) -> bool {
    c != b'/' && c != b'>' && !is_whitespace_byte(c)
}

impl<'s> Iterator for MarkupScanner<'s> {
    type Item = Markup<'s>;

    fn next(&mut self) -> Option<Markup<'s>> {
        while self.pos < self.source.len() {
            if !self.opens_markup(self.pos) {
                return Some(Markup::Text(self.text()));
            }
            match self.byte(self.pos + 1) {
                Some(b'!') if self.source[self.pos..].starts_with("<!--") => {
                    return Some(Markup::Comment(self.comment()));
                }
                Some(b'!' | b'?') => self.skip_declaration(),
                Some(b'/') => {
                    if let Some(name) = self.end_tag() {
                        return Some(Markup::End(name));
                    }
                }
                _ => return Some(Markup::Start(self.start_tag())),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Markup<'_>> {
        MarkupScanner::new(source).collect()
    }

    fn start<'s>(name: &'s str, attributes: &[(&'s str, Option<&'s str>)]) -> Markup<'s> {
        Markup::Start(StartTag {
            name,
            attributes: attributes
                .iter()
                .map(|&(name, value)| RawAttribute { name, value })
                .collect(),
            self_closing: false,
        })
    }

    fn self_closing<'s>(name: &'s str, attributes: &[(&'s str, Option<&'s str>)]) -> Markup<'s> {
        match start(name, attributes) {
            Markup::Start(tag) => Markup::Start(StartTag {
                self_closing: true,
                ..tag
            }),
            other => other,
        }
    }

    #[test]
    fn test_element_with_text() {
        assert_eq!(
            scan("<p>Hello {{name}}!</p>"),
            vec![
                start("p", &[]),
                Markup::Text("Hello {{name}}!"),
                Markup::End("p"),
            ]
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            scan(r#"<div id="app" show-if='count > 0' hidden class=a data-x = "y"></div>"#),
            vec![
                start(
                    "div",
                    &[
                        ("id", Some("app")),
                        ("show-if", Some("count > 0")),
                        ("hidden", None),
                        ("class", Some("a")),
                        ("data-x", Some("y")),
                    ]
                ),
                Markup::End("div"),
            ]
        );
    }

    #[test]
    fn test_empty_attribute_value() {
        assert_eq!(
            scan(r#"<input value="">"#),
            vec![start("input", &[("value", Some(""))])]
        );
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(
            scan("<br/><img src=x/><a href=/docs/>"),
            vec![
                self_closing("br", &[]),
                self_closing("img", &[("src", Some("x"))]),
                self_closing("a", &[("href", Some("/docs"))]),
            ]
        );
    }

    #[test]
    fn test_unquoted_value_keeps_inner_slashes() {
        assert_eq!(
            scan("<a href=/a/b>x</a>"),
            vec![
                start("a", &[("href", Some("/a/b"))]),
                Markup::Text("x"),
                Markup::End("a"),
            ]
        );
    }

    #[test]
    fn test_comment_and_doctype() {
        assert_eq!(
            scan("<!DOCTYPE html><?xml?><!-- note --><b>x</b>"),
            vec![
                Markup::Comment(" note "),
                start("b", &[]),
                Markup::Text("x"),
                Markup::End("b"),
            ]
        );
    }

    #[test]
    fn test_less_than_in_text() {
        assert_eq!(
            scan("<p>a < b <</p>"),
            vec![start("p", &[]), Markup::Text("a < b <"), Markup::End("p")]
        );
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(scan("tail"), vec![Markup::Text("tail")]);
        assert_eq!(scan("x<!-- open"), vec![Markup::Text("x"), Markup::Comment(" open")]);
        assert_eq!(scan("<p id=a"), vec![self_closing("p", &[("id", Some("a"))])]);
        assert_eq!(scan("</ p ></>"), vec![Markup::End("p")]);
        assert_eq!(scan("</p"), vec![]);
    }
}
