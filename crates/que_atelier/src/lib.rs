//! Atelier - turns parsed directives into something that can run.
//!
//! Expressions compile into [`Compiled`], evaluated by walking the AST
//! against a [`Scope`] (the component context) every time they run, so each
//! invocation sees live field values. Text interpolation compiles into a
//! [`Template`], and click handlers into a [`CallExpression`].

pub mod call;
pub mod compile;
pub mod dependencies;
pub mod scope;
pub mod template;

pub use call::CallExpression;
pub use compile::{compile, compile_expression, Compiled};
pub use dependencies::Dependencies;
pub use scope::Scope;
pub use template::{compile_template, Template};

#[cfg(test)]
pub(crate) mod test_scope;
