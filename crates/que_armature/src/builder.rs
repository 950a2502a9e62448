//! AST builder.
//!
//! Turns tokens into [`AstNode`]s. Function arguments are coerced here:
//! integers become numbers, single-quoted text becomes a string, an empty
//! argument becomes the empty string, and anything else is a field
//! reference that is read when the expression runs.

use que_carton::{is_integer_literal, is_single_quoted, word_len, CompactString};
use que_relief::{Argument, Arguments, AstNode, FieldRef, FunctionNode, LogicalOp, Token, TokenKind};

use crate::tokenizer::Tokenizer;

/// Classify a single token
pub fn classify(token: &Token<'_>) -> AstNode {
    match token.kind {
        TokenKind::Function { name, arguments } => AstNode::Function(FunctionNode {
            name: FieldRef::new(name),
            args: parse_arguments(arguments),
            negated: token.negated,
        }),
        TokenKind::Logical(op) => AstNode::Logical(op),
        TokenKind::Comparison(op) => AstNode::Comparison(op),
        TokenKind::String => AstNode::String(unquote(token.raw)),
        TokenKind::Number => AstNode::Number(parse_integer(token.raw)),
        TokenKind::Variable => AstNode::Variable {
            field: FieldRef::new(token.raw),
            negated: token.negated,
        },
    }
}

/// Classify a token sequence, keeping source order.
///
/// A negated integer literal (`!0`) has no node of its own to carry the flag,
/// so it is emitted as a `!` operator followed by the number.
pub fn build(tokens: &[Token<'_>]) -> Vec<AstNode> {
    let mut nodes = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.negated && token.kind == TokenKind::Number {
            nodes.push(AstNode::Logical(LogicalOp::Not));
        }
        nodes.push(classify(token));
    }
    nodes
}

/// Split raw argument text on `,` and coerce each argument
pub fn parse_arguments(text: &str) -> Arguments {
    if text.trim().is_empty() {
        return Arguments::new();
    }
    text.split(',').map(classify_argument).collect()
}

fn classify_argument(raw: &str) -> Argument {
    let arg = raw.trim();
    if arg.is_empty() {
        Argument::String(CompactString::default())
    } else if is_integer_literal(arg) {
        Argument::Number(parse_integer(arg))
    } else if is_single_quoted(arg) {
        Argument::String(unquote(arg))
    } else {
        Argument::Field(FieldRef::new(arg))
    }
}

/// Parse a click-style call expression.
///
/// Accepts `name(args)` or a bare `name` (a call without arguments), with
/// optional surrounding whitespace. Returns `None` for anything else.
pub fn parse_call(source: &str) -> Option<FunctionNode> {
    let source = source.trim();
    let name_len = word_len(source.as_bytes());
    if name_len == 0 {
        return None;
    }
    if name_len == source.len() {
        return Some(FunctionNode {
            name: FieldRef::new(source),
            args: Arguments::new(),
            negated: false,
        });
    }

    let mut tokenizer = Tokenizer::new(source);
    let token = tokenizer.next()?;
    let complete = token.span.end as usize == source.len() && !token.negated;
    match classify(&token) {
        AstNode::Function(node) if complete => Some(node),
        _ => None,
    }
}

fn unquote(raw: &str) -> CompactString {
    if is_single_quoted(raw) {
        CompactString::from(&raw[1..raw.len() - 1])
    } else {
        CompactString::from(raw)
    }
}

fn parse_integer(raw: &str) -> f64 {
    raw.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use que_relief::ComparisonOp;

    #[test]
    fn test_argument_coercion() {
        let nodes = build(&tokenize("greet('Ada', 3)"));
        let AstNode::Function(node) = &nodes[0] else {
            panic!("expected a function node, got {:?}", nodes[0]);
        };
        assert_eq!(node.name.to_string(), "context.greet");
        assert_eq!(
            node.args.as_slice(),
            &[Argument::String("Ada".into()), Argument::Number(3.0)]
        );
    }

    #[test]
    fn test_field_and_empty_arguments() {
        let args = parse_arguments("item, ,''");
        assert_eq!(
            args.as_slice(),
            &[
                Argument::Field(FieldRef::new("item")),
                Argument::String("".into()),
                Argument::String("".into()),
            ]
        );
        assert!(parse_arguments("").is_empty());
        assert!(parse_arguments("  ").is_empty());
    }

    #[test]
    fn test_classify_operands() {
        let nodes = build(&tokenize("!visible && count > 0 || name == 'Max'"));
        assert_eq!(
            nodes,
            vec![
                AstNode::Variable {
                    field: FieldRef::new("visible"),
                    negated: true,
                },
                AstNode::Logical(LogicalOp::And),
                AstNode::Variable {
                    field: FieldRef::new("count"),
                    negated: false,
                },
                AstNode::Comparison(ComparisonOp::Gt),
                AstNode::Number(0.0),
                AstNode::Logical(LogicalOp::Or),
                AstNode::Variable {
                    field: FieldRef::new("name"),
                    negated: false,
                },
                AstNode::Comparison(ComparisonOp::LooseEq),
                AstNode::String("Max".into()),
            ]
        );
    }

    #[test]
    fn test_keywords_are_fields() {
        let nodes = build(&tokenize("true"));
        assert_eq!(
            nodes,
            vec![AstNode::Variable {
                field: FieldRef::new("true"),
                negated: false,
            }]
        );
    }

    #[test]
    fn test_negated_number() {
        let nodes = build(&tokenize("!0"));
        assert_eq!(
            nodes,
            vec![AstNode::Logical(LogicalOp::Not), AstNode::Number(0.0)]
        );
    }

    #[test]
    fn test_parse_call() {
        let node = parse_call(" updateMessage('hi', count) ").unwrap();
        assert_eq!(node.name.name(), "updateMessage");
        assert_eq!(node.args.len(), 2);

        let bare = parse_call("toggle").unwrap();
        assert_eq!(bare.name.name(), "toggle");
        assert!(bare.args.is_empty());
    }

    #[test]
    fn test_parse_call_rejects_non_calls() {
        assert!(parse_call("").is_none());
        assert!(parse_call("a && b()").is_none());
        assert!(parse_call("save() extra").is_none());
        assert!(parse_call("!save()").is_none());
        assert!(parse_call("'text'").is_none());
    }
}
