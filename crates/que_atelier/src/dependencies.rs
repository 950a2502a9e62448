//! Static read sets for compiled expressions.
//!
//! A method call may read any field, so an expression containing one
//! depends on everything.

use que_carton::{CompactString, FxHashSet};
use que_relief::{Argument, AstNode};

/// Fields an expression or template may read
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dependencies {
    /// Re-evaluate on every change
    Any,
    /// Only these fields are read
    Fields(FxHashSet<CompactString>),
    /// Reads nothing (literals only)
    #[default]
    Empty,
}

impl Dependencies {
    /// Collect the reads of an AST node list
    pub fn of_nodes(nodes: &[AstNode]) -> Self {
        let mut deps = Self::Empty;
        for node in nodes {
            match node {
                AstNode::Function(func) => {
                    deps = Self::Any;
                    for arg in &func.args {
                        if let Argument::Field(field) = arg {
                            deps.insert(field.name());
                        }
                    }
                }
                AstNode::Variable { field, .. } => deps.insert(field.name()),
                _ => {}
            }
        }
        deps
    }

    /// Record a read of `field`
    pub fn insert(&mut self, field: &str) {
        match self {
            Self::Any => {}
            Self::Fields(fields) => {
                fields.insert(CompactString::from(field));
            }
            Self::Empty => {
                let mut fields = FxHashSet::default();
                fields.insert(CompactString::from(field));
                *self = Self::Fields(fields);
            }
        }
    }

    /// Whether a change to `field` can affect the result
    pub fn includes(&self, field: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Fields(fields) => fields.contains(field),
            Self::Empty => false,
        }
    }

    /// Fields read, sorted; `None` when the set is unbounded
    pub fn sorted_fields(&self) -> Option<Vec<&str>> {
        match self {
            Self::Any => None,
            Self::Fields(fields) => {
                let mut names: Vec<&str> = fields.iter().map(CompactString::as_str).collect();
                names.sort_unstable();
                Some(names)
            }
            Self::Empty => Some(Vec::new()),
        }
    }
}
