//! Carton - The shared toolbox for Que.
//!
//! This crate holds the small utilities and collection types every other Que
//! crate reaches for: fast hash maps, inline strings, the word-character
//! predicates shared by the expression and interpolation scanners, and the
//! HTML tag tables used by the in-memory document.
//!
//! # Example
//!
//! ```
//! use que_carton::{is_integer_literal, is_word, FxHashMap};
//!
//! assert!(is_word("count"));
//! assert!(is_integer_literal("42"));
//!
//! let mut fields: FxHashMap<&str, i32> = FxHashMap::default();
//! fields.insert("count", 1);
//! assert_eq!(fields["count"], 1);
//! ```

pub mod dom_tag_config;
pub mod general;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_set, Set as PhfSet};

// Re-export shared utilities
pub use dom_tag_config::*;
pub use general::*;
