//! Tree visitor that builds the class registry.
//!
//! Compilation of a unit moves through two phases, each a distinct type so
//! there is no way back:
//!
//! ```text
//! Extractor      (construction: walk active, registry growing)
//!     ↓ finish()
//! Unit           (walk complete, registry frozen)
//!     ↓ resolve()
//! Resolution<'_> (parents linked, cycles rejected, resolver queryable)
//! ```

mod lower;
mod visitor;

use smol_str::SmolStr;

use crate::hir::{ClassRegistry, CompileResult, InheritanceResolver};
use crate::parser::{SourceFile, walk};

/// One top-level piece of output, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    /// Base-dialect text copied verbatim
    Passthrough(String),
    /// A class, emitted as its enumeration and flat functions
    Class(SmolStr),
}

/// Construction phase: receives traversal callbacks and populates the registry.
#[derive(Debug, Default)]
pub struct Extractor {
    registry: ClassRegistry,
    items: Vec<OutputItem>,
    current_class: Option<SmolStr>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `file` once and freeze the result.
    pub fn extract(file: &SourceFile) -> CompileResult<Unit> {
        let mut extractor = Self::new();
        walk(file, &mut extractor)?;
        Ok(extractor.finish())
    }

    /// End construction.
    pub fn finish(self) -> Unit {
        tracing::debug!(
            classes = self.registry.len(),
            items = self.items.len(),
            "construction complete"
        );
        Unit {
            registry: self.registry,
            items: self.items,
        }
    }
}

/// A fully traversed compilation unit with a frozen registry.
#[derive(Debug)]
pub struct Unit {
    registry: ClassRegistry,
    items: Vec<OutputItem>,
}

impl Unit {
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    /// Start the resolution phase.
    pub fn resolve(&self) -> CompileResult<Resolution<'_>> {
        let resolver = InheritanceResolver::resolve(&self.registry)?;
        Ok(Resolution {
            resolver,
            items: &self.items,
        })
    }
}

/// Resolution and emission phase: read-only queries over a frozen unit.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    resolver: InheritanceResolver<'a>,
    items: &'a [OutputItem],
}

impl<'a> Resolution<'a> {
    pub fn resolver(&self) -> &InheritanceResolver<'a> {
        &self.resolver
    }

    pub fn items(&self) -> &'a [OutputItem] {
        self.items
    }
}
