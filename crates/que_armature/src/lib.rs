//! Armature - the structural parsing layer of Que.
//!
//! - [`tokenizer`]: splits directive expressions into tokens
//! - [`builder`]: classifies tokens into AST nodes and parses call expressions
//! - [`interpolation`]: splits text content around `{{field}}` placeholders
//! - [`markup`]: pull scanner for the in-memory host document

pub mod builder;
pub mod interpolation;
pub mod markup;
pub mod tokenizer;

pub use builder::{build, classify, parse_arguments, parse_call};
pub use interpolation::{has_placeholder, split_template, TemplatePart};
pub use tokenizer::{tokenize, Tokenizer};

use que_relief::AstNode;

/// Tokenize and classify an expression in one step
pub fn parse_expression(source: &str) -> Vec<AstNode> {
    build(&tokenize(source))
}
