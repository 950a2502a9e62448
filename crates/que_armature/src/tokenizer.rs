//! Expression tokenizer for directive values.
//!
//! At every position the scanner tries, in order: a function call
//! (`name(arguments)`, arguments matched up to the first `)`), `&&`, `||`,
//! `!`, a comparison operator, a single-quoted string, and a bare word. The
//! first branch that matches wins. Whitespace separates tokens. Bytes no
//! branch accepts are skipped and remembered in [`Tokenizer::skipped`].
//!
//! A `!` glued to the front of a word marks that token as negated instead of
//! producing an operator token, and `!` directly followed by `=` belongs to
//! the `!=`/`!==` comparison.

use que_carton::{is_integer_literal, is_whitespace_byte, is_word_byte, word_len};
use que_relief::{ComparisonOp, LogicalOp, Span, Token, TokenKind};

/// Character codes for fast comparison
pub mod char_codes {
    pub const BANG: u8 = b'!';
    pub const AMP: u8 = b'&';
    pub const PIPE: u8 = b'|';
    pub const EQ: u8 = b'=';
    pub const SINGLE_QUOTE: u8 = b'\'';
    pub const LEFT_PAREN: u8 = b'(';
    pub const RIGHT_PAREN: u8 = b')';
}

use char_codes::*;

/// Expression tokenizer
pub struct Tokenizer<'s> {
    /// Input source
    source: &'s str,
    /// Input bytes
    input: &'s [u8],
    /// Current index
    index: usize,
    /// Fragments that matched no branch
    skipped: Vec<Span>,
}

impl<'s> Tokenizer<'s> {
    /// Create a new tokenizer
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            index: 0,
            skipped: Vec::new(),
        }
    }

    /// Fragments dropped so far, contiguous bytes merged into one span
    pub fn skipped(&self) -> &[Span] {
        &self.skipped
    }

    fn skip_whitespace(&mut self) {
        while self.index < self.input.len() && is_whitespace_byte(self.input[self.index]) {
            self.index += 1;
        }
    }

    fn skip_unmatched(&mut self) {
        let width = self.source[self.index..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        let start = self.index as u32;
        self.index += width;
        let end = self.index as u32;

        match self.skipped.last_mut() {
            Some(last) if last.end == start => last.end = end,
            _ => self.skipped.push(Span::new(start, end)),
        }
        tracing::debug!(
            fragment = &self.source[start as usize..end as usize],
            offset = start,
            "skipping unrecognized expression fragment"
        );
    }

    fn span(start: usize, end: usize) -> Span {
        Span::new(start as u32, end as u32)
    }

    fn token(&self, kind: TokenKind<'s>, start: usize, end: usize) -> Token<'s> {
        Token::new(kind, &self.source[start..end], Self::span(start, end))
    }

    /// Try every branch at `start`
    fn scan_at(&self, start: usize) -> Option<Token<'s>> {
        let rest = &self.input[start..];
        match rest[0] {
            BANG if rest.len() > 1 && is_word_byte(rest[1]) => {
                let token = self.scan_word(start + 1);
                Some(
                    Token {
                        span: Self::span(start, token.span.end as usize),
                        ..token
                    }
                    .negated(),
                )
            }
            c if is_word_byte(c) => Some(self.scan_word(start)),
            AMP if rest.starts_with(b"&&") => {
                Some(self.token(TokenKind::Logical(LogicalOp::And), start, start + 2))
            }
            PIPE if rest.starts_with(b"||") => {
                Some(self.token(TokenKind::Logical(LogicalOp::Or), start, start + 2))
            }
            BANG if rest.get(1) != Some(&EQ) => {
                Some(self.token(TokenKind::Logical(LogicalOp::Not), start, start + 1))
            }
            SINGLE_QUOTE => self.scan_string(start),
            _ => self.scan_comparison(start),
        }
    }

    /// Function call or bare word; the caller guarantees a word byte at `start`
    fn scan_word(&self, start: usize) -> Token<'s> {
        let name_end = start + word_len(&self.input[start..]);
        let name = &self.source[start..name_end];

        if self.input.get(name_end) == Some(&LEFT_PAREN) {
            let args_start = name_end + 1;
            if let Some(close) = self.input[args_start..]
                .iter()
                .position(|&c| c == RIGHT_PAREN)
            {
                let args_end = args_start + close;
                let kind = TokenKind::Function {
                    name,
                    arguments: &self.source[args_start..args_end],
                };
                return self.token(kind, start, args_end + 1);
            }
        }

        let kind = if is_integer_literal(name) {
            TokenKind::Number
        } else {
            TokenKind::Variable
        };
        self.token(kind, start, name_end)
    }

    fn scan_string(&self, start: usize) -> Option<Token<'s>> {
        let close = self.input[start + 1..]
            .iter()
            .position(|&c| c == SINGLE_QUOTE)?;
        Some(self.token(TokenKind::String, start, start + close + 2))
    }

    fn scan_comparison(&self, start: usize) -> Option<Token<'s>> {
        let rest = &self.input[start..];
        ComparisonOp::LONGEST_FIRST
            .iter()
            .find(|op| rest.starts_with(op.as_str().as_bytes()))
            .map(|&op| {
                let end = start + op.as_str().len();
                self.token(TokenKind::Comparison(op), start, end)
            })
    }
}

impl<'s> Iterator for Tokenizer<'s> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_whitespace();
            if self.index >= self.input.len() {
                return None;
            }
            if let Some(token) = self.scan_at(self.index) {
                self.index = token.span.end as usize;
                return Some(token);
            }
            self.skip_unmatched();
        }
    }
}

/// Tokenize an expression
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Tokenizer::new(source).collect()
}
