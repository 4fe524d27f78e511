//! Inheritance resolution: parent linking, cycle detection and flattening.
//!
//! Resolution runs once, after the registry is fully populated, so a class
//! may name a parent declared later in the file. Besides the parent graph,
//! the containment graph (class-typed fields) must be acyclic, otherwise a
//! class layout has no finite size.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::error::{CompileError, CompileResult};
use super::model::{BuiltinTag, ClassId, Function, Tag, TagClass, Variable};
use super::registry::ClassRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Read-only view over a registry whose parent graph is known to be
/// resolved and acyclic.
#[derive(Debug, Clone)]
pub struct InheritanceResolver<'a> {
    registry: &'a ClassRegistry,
    classes: Vec<&'a TagClass>,
    /// Resolved parent of each class, indexed by [`ClassId`]
    parents: Vec<Option<ClassId>>,
}

impl<'a> InheritanceResolver<'a> {
    /// Link every declared parent to its class, then reject cycles.
    pub fn resolve(registry: &'a ClassRegistry) -> CompileResult<Self> {
        let mut parents = Vec::with_capacity(registry.len());
        for (_, class) in registry.iter() {
            let parent = match class.parent() {
                None => None,
                Some(name) => Some(registry.id_of(name).ok_or_else(|| {
                    CompileError::UnresolvedParent {
                        class: class.name.clone(),
                        parent: name.clone(),
                        range: class.range,
                    }
                })?),
            };
            parents.push(parent);
        }

        let resolver = Self {
            registry,
            classes: registry.iter().map(|(_, class)| class).collect(),
            parents,
        };
        resolver.check_cycles()?;
        resolver.check_layouts()?;
        tracing::debug!(classes = registry.len(), "resolved inheritance");
        Ok(resolver)
    }

    /// Visited/in-progress coloring walk over the parent graph.
    fn check_cycles(&self) -> CompileResult<()> {
        let mut marks = vec![Mark::Unvisited; self.parents.len()];

        for start in 0..self.parents.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            let mut path = Vec::new();
            let mut current = Some(ClassId::new(start));
            while let Some(id) = current {
                match marks[id.index()] {
                    Mark::Done => break,
                    Mark::InProgress => {
                        let from = path.iter().position(|&p| p == id).unwrap_or(0);
                        let mut cycle: Vec<SmolStr> =
                            path[from..].iter().map(|&p| self.class(p).name.clone()).collect();
                        cycle.push(self.class(id).name.clone());
                        return Err(CompileError::CyclicInheritance {
                            cycle,
                            range: self.class(id).range,
                        });
                    }
                    Mark::Unvisited => {
                        marks[id.index()] = Mark::InProgress;
                        path.push(id);
                        current = self.parents[id.index()];
                    }
                }
            }

            for id in path {
                marks[id.index()] = Mark::Done;
            }
        }
        Ok(())
    }

    /// Coloring depth-first walk over class-typed effective fields.
    fn check_layouts(&self) -> CompileResult<()> {
        let mut marks = vec![Mark::Unvisited; self.classes.len()];
        let mut path = Vec::new();
        for start in 0..self.classes.len() {
            if marks[start] == Mark::Unvisited {
                self.visit_layout(ClassId::new(start), &mut marks, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit_layout(
        &self,
        id: ClassId,
        marks: &mut [Mark],
        path: &mut Vec<ClassId>,
    ) -> CompileResult<()> {
        marks[id.index()] = Mark::InProgress;
        path.push(id);

        for field in self.effective_fields(&self.class(id).name)? {
            // Unknown types are reported during emission.
            let Some(Tag::Class(target)) = self.resolve_tag(&field.ty) else {
                continue;
            };
            match marks[target.index()] {
                Mark::Done => {}
                Mark::InProgress => {
                    let from = path.iter().position(|&p| p == target).unwrap_or(0);
                    let mut cycle: Vec<SmolStr> =
                        path[from..].iter().map(|&p| self.class(p).name.clone()).collect();
                    cycle.push(self.class(target).name.clone());
                    return Err(CompileError::RecursiveLayout {
                        cycle,
                        range: field.range,
                    });
                }
                Mark::Unvisited => self.visit_layout(target, marks, path)?,
            }
        }

        path.pop();
        marks[id.index()] = Mark::Done;
        Ok(())
    }

    pub fn registry(&self) -> &'a ClassRegistry {
        self.registry
    }

    /// Class by id. Ids only come from the registry this resolver wraps.
    pub fn class(&self, id: ClassId) -> &'a TagClass {
        self.classes[id.index()]
    }

    pub fn id_of(&self, class: &str) -> CompileResult<ClassId> {
        self.registry
            .id_of(class)
            .ok_or_else(|| CompileError::UnknownClass(class.into()))
    }

    pub fn parent_of(&self, id: ClassId) -> Option<ClassId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// The class itself and all its ancestors, most distant ancestor first.
    pub fn lineage(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = vec![id];
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent_of(parent);
        }
        chain.reverse();
        tracing::trace!(class = %self.class(id).name, depth = chain.len(), "computed lineage");
        chain
    }

    /// Own and inherited fields, root to leaf. A field redeclared lower in
    /// the chain keeps the position of its first declaration and takes the
    /// derived declaration.
    pub fn effective_fields(&self, class: &str) -> CompileResult<Vec<&'a Variable>> {
        let id = self.id_of(class)?;
        let mut fields: IndexMap<&'a str, &'a Variable> = IndexMap::new();
        for ancestor in self.lineage(id) {
            for (name, variable) in &self.class(ancestor).variables {
                fields.insert(name.as_str(), variable);
            }
        }
        Ok(fields.into_values().collect())
    }

    /// Own and inherited methods, root to leaf; overrides replace in place.
    pub fn effective_methods(&self, class: &str) -> CompileResult<IndexMap<&'a str, &'a Function>> {
        let id = self.id_of(class)?;
        let mut methods: IndexMap<&'a str, &'a Function> = IndexMap::new();
        for ancestor in self.lineage(id) {
            for (name, function) in &self.class(ancestor).functions {
                methods.insert(name.as_str(), function);
            }
        }
        Ok(methods)
    }

    /// Most derived declaration of field `name` visible from `id`.
    pub fn field(&self, id: ClassId, name: &str) -> Option<&'a Variable> {
        self.lineage(id)
            .into_iter()
            .rev()
            .find_map(|ancestor| self.class(ancestor).variables.get(name))
    }

    /// Most derived declaration of method `name` visible from `id`.
    pub fn method(&self, id: ClassId, name: &str) -> Option<&'a Function> {
        self.lineage(id)
            .into_iter()
            .rev()
            .find_map(|ancestor| self.class(ancestor).functions.get(name))
    }

    /// Resolve a declared type name to a tag.
    pub fn resolve_tag(&self, type_name: &str) -> Option<Tag> {
        BuiltinTag::from_type_name(type_name)
            .map(Tag::Builtin)
            .or_else(|| self.registry.id_of(type_name).map(Tag::Class))
    }
}
