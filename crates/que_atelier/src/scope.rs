//! The component context seen by compiled expressions.

use que_relief::{Argument, EvalResult, Value};

/// Live component state: fields and callable methods
pub trait Scope {
    /// Current value of a field; missing fields are `undefined`
    fn field(&self, name: &str) -> Value;

    /// Invoke a method with already-resolved arguments
    fn call(&self, name: &str, args: &[Value]) -> EvalResult;
}

/// Resolve a call argument; field arguments are read now, not at parse time
pub fn resolve_argument<S: Scope + ?Sized>(arg: &Argument, scope: &S) -> Value {
    match arg {
        Argument::Number(n) => Value::Number(*n),
        Argument::String(s) => Value::String(s.clone()),
        Argument::Field(field) => scope.field(field.name()),
    }
}

/// Resolve every argument of a call, in order
pub fn resolve_arguments<S: Scope + ?Sized>(args: &[Argument], scope: &S) -> Vec<Value> {
    args.iter().map(|arg| resolve_argument(arg, scope)).collect()
}
