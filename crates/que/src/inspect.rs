//! Expression inspection: tokens, AST nodes, serialized source and reads.

use std::fmt;

use que_armature::{build, Tokenizer};
use que_atelier::compile;
use que_relief::{AstNode, Span, Token, TokenKind};
use serde::Serialize;

/// Every stage of the expression pipeline for one source string
#[derive(Debug, Serialize)]
pub struct Inspection<'s> {
    pub expression: &'s str,
    pub tokens: Vec<Token<'s>>,
    /// Fragments the tokenizer dropped
    pub skipped: Vec<Span>,
    pub nodes: Vec<AstNode>,
    /// Serialized form of the nodes
    pub source: String,
    /// Whether the nodes form a complete expression
    pub valid: bool,
    /// Fields read, sorted; `None` when a method call may read anything
    pub reads: Option<Vec<String>>,
}

pub fn inspect(expression: &str) -> Inspection<'_> {
    let mut tokenizer = Tokenizer::new(expression);
    let tokens: Vec<Token<'_>> = tokenizer.by_ref().collect();
    let skipped = tokenizer.skipped().to_vec();
    let compiled = compile(build(&tokens));

    Inspection {
        expression,
        tokens,
        skipped,
        nodes: compiled.nodes().to_vec(),
        source: compiled.to_source().to_string(),
        valid: compiled.is_valid(),
        reads: compiled
            .dependencies()
            .sorted_fields()
            .map(|fields| fields.into_iter().map(str::to_string).collect()),
    }
}

const fn kind_label(kind: &TokenKind<'_>) -> &'static str {
    match kind {
        TokenKind::Function { .. } => "function",
        TokenKind::Logical(_) => "logical",
        TokenKind::Comparison(_) => "comparison",
        TokenKind::String => "string",
        TokenKind::Number => "number",
        TokenKind::Variable => "variable",
    }
}

impl fmt::Display for Inspection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tokens:")?;
        for token in &self.tokens {
            let span = format!("{}..{}", token.span.start, token.span.end);
            write!(f, "  {span:<8} {:<10} {}", kind_label(&token.kind), token.raw)?;
            if token.negated {
                f.write_str(" (negated)")?;
            }
            writeln!(f)?;
        }
        for span in &self.skipped {
            writeln!(
                f,
                "skipped: {}..{} `{}`",
                span.start,
                span.end,
                span.slice(self.expression)
            )?;
        }

        let nodes: Vec<String> = self.nodes.iter().map(ToString::to_string).collect();
        writeln!(f, "nodes: {}", nodes.join(" | "))?;
        writeln!(f, "source: {}", self.source.trim_start())?;
        writeln!(f, "valid: {}", self.valid)?;
        match &self.reads {
            Some(fields) if fields.is_empty() => writeln!(f, "reads: (none)"),
            Some(fields) => writeln!(f, "reads: {}", fields.join(", ")),
            None => writeln!(f, "reads: (any)"),
        }
    }
}
