//! In-memory scope for unit tests.

use std::cell::{Cell, RefCell};

use que_carton::FxHashMap;
use que_relief::{EvalError, EvalResult, Value};

use crate::Scope;

/// Fields in a map; methods `echo`, `greet`, `is_even` and `bump`
#[derive(Default)]
pub(crate) struct TestScope {
    pub fields: RefCell<FxHashMap<String, Value>>,
    pub calls: RefCell<Vec<(String, Vec<Value>)>>,
    pub reads: Cell<usize>,
}

impl TestScope {
    pub fn with(fields: &[(&str, Value)]) -> Self {
        let scope = Self::default();
        for (name, value) in fields {
            scope.set(name, value.clone());
        }
        scope
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(name.to_string(), value.into());
    }
}

impl Scope for TestScope {
    fn field(&self, name: &str) -> Value {
        self.reads.set(self.reads.get() + 1);
        self.fields.borrow().get(name).cloned().unwrap_or_default()
    }

    fn call(&self, name: &str, args: &[Value]) -> EvalResult {
        self.calls
            .borrow_mut()
            .push((name.to_string(), args.to_vec()));
        match name {
            "echo" => Ok(args.first().cloned().unwrap_or_default()),
            "greet" => Ok(Value::from(format!(
                "Hello {}",
                args.first().cloned().unwrap_or_default()
            ))),
            "is_even" => Ok(Value::Bool(
                args.first().map(Value::to_number).unwrap_or(f64::NAN) % 2.0 == 0.0,
            )),
            "bump" => {
                let next = self.field("count").to_number() + 1.0;
                self.set("count", next);
                Ok(Value::Number(next))
            }
            _ => Err(EvalError::method_not_found(name)),
        }
    }
}
