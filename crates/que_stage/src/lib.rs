//! Stage - where compiled directives meet live state and the host tree.
//!
//! - [`store`]: the reactive store and its observer registry
//! - [`host`]: the host tree contract the runtime drives
//! - [`document`]: an in-memory host tree parsed from markup
//! - [`context`]: the component context (store plus methods)
//! - [`directive`]: text interpolation and conditional presence
//! - [`component`]: mounting, event dispatch and teardown

pub mod component;
pub mod context;
pub mod directive;
pub mod document;
pub mod host;
pub mod selector;
pub mod store;

pub use component::{mount, Component, ComponentNode, MountOptions};
pub use context::{Context, Method, Methods};
pub use directive::{ConditionalBinding, Directive, Presence, TextBinding};
pub use document::{Document, Mutation};
pub use host::{Attribute, HostTree, NodeId, NodeKind};
pub use selector::Selector;
pub use store::{ChangeEvent, Store, SubscriptionId};
