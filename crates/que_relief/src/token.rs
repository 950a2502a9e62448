//! Lexical tokens for directive and interpolation expressions.
//!
//! Tokens borrow from the source string and are consumed by the AST builder
//! right after tokenizing; they are never stored.

use serde::Serialize;

/// Byte span `[start, end)` in the expression source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the source this span was taken from
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start as usize..self.end as usize]
    }
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOp {
    /// `==`
    LooseEq,
    /// `===`
    StrictEq,
    /// `!=`
    LooseNe,
    /// `!==`
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    /// Operators ordered for longest-match scanning
    pub const LONGEST_FIRST: [ComparisonOp; 8] = [
        Self::StrictEq,
        Self::StrictNe,
        Self::LooseEq,
        Self::LooseNe,
        Self::Le,
        Self::Ge,
        Self::Lt,
        Self::Gt,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LooseEq => "==",
            Self::StrictEq => "===",
            Self::LooseNe => "!=",
            Self::StrictNe => "!==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Token kind with kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind<'s> {
    /// `name(arguments)`; `arguments` is the raw text between the parentheses
    Function { name: &'s str, arguments: &'s str },
    Logical(LogicalOp),
    Comparison(ComparisonOp),
    /// Single-quoted literal, quotes kept in `raw`
    String,
    /// Integer literal
    Number,
    /// Bare word used as a field reference
    Variable,
}

/// A lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'s> {
    pub kind: TokenKind<'s>,
    /// Matched text, without a leading negation marker
    pub raw: &'s str,
    /// Span of the match, including a leading negation marker
    pub span: Span,
    /// Whether a `!` was attached directly in front of this token
    pub negated: bool,
}

impl<'s> Token<'s> {
    pub const fn new(kind: TokenKind<'s>, raw: &'s str, span: Span) -> Self {
        Self {
            kind,
            raw,
            span,
            negated: false,
        }
    }

    pub const fn negated(mut self) -> Self {
        self.negated = true;
        self
    }
}
