//! Relief - the data surface shared by the Que parser, compiler and runtime.
//!
//! - [`token`]: lexical tokens produced by the expression tokenizer
//! - [`ast`]: classified nodes produced by the AST builder
//! - [`value`]: runtime values held by the store and produced by evaluation
//! - [`errors`]: evaluation errors
//! - [`options`]: directive names and interpolation delimiters

pub mod ast;
pub mod errors;
pub mod options;
pub mod token;
pub mod value;

pub use ast::*;
pub use errors::{EvalError, EvalResult};
pub use options::DirectiveOptions;
pub use token::*;
pub use value::Value;
