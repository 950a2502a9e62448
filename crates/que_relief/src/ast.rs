//! Classified expression nodes.
//!
//! The AST is a flat list in source order. Identifiers are not resolved at
//! build time: a [`FieldRef`] names a field of the component context and is
//! read fresh every time the compiled expression runs.

use std::fmt;

use que_carton::{CompactString, SmallVec};
use serde::Serialize;

use crate::token::{ComparisonOp, LogicalOp};
use crate::value::format_number;

/// Reference to a field (or method) on the component context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldRef(CompactString);

impl FieldRef {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self(name.into())
    }

    /// Bare field name, without the `context.` prefix
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context.{}", self.0)
    }
}

/// Function-call argument after literal coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Argument {
    Number(f64),
    /// Unquoted string; an empty argument is the empty string
    String(CompactString),
    Field(FieldRef),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Field(field) => field.fmt(f),
        }
    }
}

/// Arguments of a call; most calls take only a few
pub type Arguments = SmallVec<[Argument; 4]>;

/// `name(args)` node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionNode {
    pub name: FieldRef,
    pub args: Arguments,
    pub negated: bool,
}

impl fmt::Display for FunctionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            arg.fmt(f)?;
        }
        f.write_str(")")
    }
}

/// A classified token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AstNode {
    Function(FunctionNode),
    Logical(LogicalOp),
    Comparison(ComparisonOp),
    /// Decoded string literal (quotes stripped)
    String(CompactString),
    Number(f64),
    Variable { field: FieldRef, negated: bool },
}

impl AstNode {
    /// Whether this node is an operand rather than an operator
    pub const fn is_operand(&self) -> bool {
        !matches!(self, Self::Logical(_) | Self::Comparison(_))
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(func) => func.fmt(f),
            Self::Logical(op) => f.write_str(op.as_str()),
            Self::Comparison(op) => f.write_str(op.as_str()),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Variable { field, negated } => {
                if *negated {
                    f.write_str("!")?;
                }
                field.fmt(f)
            }
        }
    }
}
