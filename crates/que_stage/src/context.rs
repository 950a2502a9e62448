//! Component context: the store plus the component's methods.

use std::fmt;
use std::rc::Rc;

use que_atelier::Scope;
use que_carton::{CompactString, FxHashMap};
use que_relief::{EvalError, EvalResult, Value};

use crate::store::Store;

/// A component method. It receives the context so it can read and write
/// fields through the store.
pub type Method = Rc<dyn Fn(&Context, &[Value]) -> EvalResult>;

/// Named methods available to expressions and click handlers
#[derive(Clone, Default)]
pub struct Methods {
    methods: FxHashMap<CompactString, Method>,
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Methods::insert`]
    pub fn with(
        mut self,
        name: impl Into<CompactString>,
        method: impl Fn(&Context, &[Value]) -> EvalResult + 'static,
    ) -> Self {
        self.insert(name, method);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<CompactString>,
        method: impl Fn(&Context, &[Value]) -> EvalResult + 'static,
    ) {
        self.methods.insert(name.into(), Rc::new(method));
    }

    /// Add every method of `other`, replacing same-named ones
    pub fn extend(&mut self, other: Methods) {
        self.methods.extend(other.methods);
    }

    pub fn get(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(CompactString::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// What compiled expressions resolve `context.<name>` against
#[derive(Debug, Clone)]
pub struct Context {
    store: Store,
    methods: Methods,
}

impl Context {
    pub fn new(store: Store, methods: Methods) -> Self {
        Self { store, methods }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn methods(&self) -> &Methods {
        &self.methods
    }
}

impl Scope for Context {
    fn field(&self, name: &str) -> Value {
        self.store.get(name)
    }

    fn call(&self, name: &str, args: &[Value]) -> EvalResult {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| EvalError::method_not_found(name))?;
        method(self, args)
    }
}
