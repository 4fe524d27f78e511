//! # Class model
//!
//! The in-memory model of one compilation unit and the queries over it:
//!
//! - [`codec`]: class/method identifiers to flat Pawn identifiers
//! - [`ClassRegistry`]: classes, own fields and own methods, in declaration order
//! - [`InheritanceResolver`]: parent linking, cycle detection, flattened
//!   field layouts and method sets
//!
//! The registry is built during a single traversal and never mutated once
//! the resolver has been created over it.

pub mod codec;
mod error;
mod model;
mod registry;
mod resolve;

pub use error::{CompileError, CompileResult};
pub use model::{BodyToken, BuiltinTag, ClassId, Function, Tag, TagClass, Variable};
pub use registry::ClassRegistry;
pub use resolve::InheritanceResolver;

#[cfg(test)]
mod tests;
