//! Evaluation errors.
//!
//! Parse-level irregularities never produce errors: the tokenizer skips what
//! it cannot match. Everything here surfaces when a compiled expression, a
//! template or a dispatched call actually runs.

use que_carton::CompactString;
use thiserror::Error;

use crate::value::Value;

/// Errors raised while evaluating an expression or invoking a method
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The node sequence does not form a valid expression
    #[error("invalid expression `{expression}`: {message}")]
    Syntax {
        expression: CompactString,
        message: CompactString,
    },

    /// A call names a method the component does not define
    #[error("method `{0}` is not defined")]
    MethodNotFound(CompactString),

    /// A user method reported a failure
    #[error("method `{name}` failed: {message}")]
    Method {
        name: CompactString,
        message: CompactString,
    },
}

impl EvalError {
    pub fn syntax(expression: impl Into<CompactString>, message: impl Into<CompactString>) -> Self {
        Self::Syntax {
            expression: expression.into(),
            message: message.into(),
        }
    }

    pub fn method_not_found(name: impl Into<CompactString>) -> Self {
        Self::MethodNotFound(name.into())
    }

    /// Failure raised from inside a user method
    pub fn method(name: impl Into<CompactString>, message: impl Into<CompactString>) -> Self {
        Self::Method {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result of evaluating an expression
pub type EvalResult<T = Value> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EvalError::method_not_found("greet").to_string(),
            "method `greet` is not defined"
        );
        assert_eq!(
            EvalError::syntax("a b", "expected an operator").to_string(),
            "invalid expression `a b`: expected an operator"
        );
        assert_eq!(
            EvalError::method("save", "disk full").to_string(),
            "method `save` failed: disk full"
        );
    }
}
