//! Click-handler call expressions.

use que_relief::{Argument, EvalError, EvalResult, FunctionNode};

use crate::scope::{resolve_arguments, Scope};

/// A parsed `name(args)` handler
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    node: FunctionNode,
}

impl CallExpression {
    /// Parse a handler. A bare name is a call without arguments.
    pub fn parse(source: &str) -> EvalResult<Self> {
        que_armature::parse_call(source)
            .map(|node| Self { node })
            .ok_or_else(|| EvalError::syntax(source.trim(), "expected a method call"))
    }

    /// Method name
    pub fn name(&self) -> &str {
        self.node.name.name()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.node.args
    }

    /// Resolve the arguments against live state and call the method
    pub fn invoke<S: Scope + ?Sized>(&self, scope: &S) -> EvalResult {
        let args = resolve_arguments(&self.node.args, scope);
        tracing::debug!(method = self.name(), args = args.len(), "dispatching call");
        scope.call(self.name(), &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_scope::TestScope;
    use que_relief::Value;

    #[test]
    fn test_invoke_with_coerced_arguments() {
        let scope = TestScope::with(&[("who", "Ada".into())]);
        let call = CallExpression::parse("echo('Ada', 3, who)").unwrap();
        assert_eq!(call.name(), "echo");
        assert_eq!(call.invoke(&scope), Ok(Value::from("Ada")));
        assert_eq!(
            scope.calls.borrow()[0].1,
            vec![Value::from("Ada"), Value::from(3), Value::from("Ada")]
        );
    }

    #[test]
    fn test_bare_name() {
        let scope = TestScope::with(&[("count", Value::from(1))]);
        let call = CallExpression::parse("bump").unwrap();
        assert!(call.arguments().is_empty());
        assert_eq!(call.invoke(&scope), Ok(Value::from(2)));
    }

    #[test]
    fn test_unknown_method() {
        let call = CallExpression::parse("missing()").unwrap();
        assert_eq!(
            call.invoke(&TestScope::default()),
            Err(EvalError::method_not_found("missing"))
        );
    }

    #[test]
    fn test_not_a_call() {
        assert!(matches!(
            CallExpression::parse("a && b"),
            Err(EvalError::Syntax { .. })
        ));
    }
}
