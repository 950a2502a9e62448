//! # Que
//!
//! Reactive templating micro-framework written in Rust.
//!
//! A plain field map is bound to a document subtree: text placeholders
//! re-render and conditional elements attach or detach whenever a bound
//! field changes, and declared methods run from click bindings or inline
//! expressions.
//!
//! ## Crates
//!
//! - [`carton`] - Shared utilities and byte classification
//! - [`relief`] - Tokens, AST nodes, values and errors
//! - [`armature`] - Expression tokenizer, AST builder and markup tokenizer
//! - [`atelier`] - Expression compiler and tree-walking evaluator
//! - [`stage`] - Reactive store, host tree and directive runtime

/// Shared utilities and byte classification.
pub use que_carton as carton;

/// Tokens, AST nodes, values and errors.
pub use que_relief as relief;

/// Expression tokenizer, AST builder and markup tokenizer.
pub use que_armature as armature;

/// Expression compiler and tree-walking evaluator.
pub use que_atelier as atelier;

/// Reactive store, host tree and directive runtime.
pub use que_stage as stage;

pub mod builtins;
pub mod config;
pub mod error;
pub mod inspect;
pub mod render;

pub use builtins::builtin_methods;
pub use config::{load_config, load_config_file, QueConfig, QUE_CONFIG_SCHEMA};
pub use error::RenderError;
pub use inspect::{inspect, Inspection};
pub use render::{render, Step};
