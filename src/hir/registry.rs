//! Class registry: the authoritative, declaration-ordered table of classes.

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;
use text_size::TextRange;

use super::error::{CompileError, CompileResult};
use super::model::{BuiltinTag, ClassId, Function, TagClass, Variable};

/// All classes of one compilation unit, in declaration order.
///
/// Populated during construction; the resolver only ever reads it.
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    classes: IndexMap<SmolStr, TagClass>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. The first registration of a name wins; a second
    /// one fails and leaves the registry untouched. Built-in type names are
    /// never available as class names.
    pub fn register_class(
        &mut self,
        name: impl Into<SmolStr>,
        parents: Vec<SmolStr>,
        range: Option<TextRange>,
    ) -> CompileResult<ClassId> {
        let name = name.into();
        if BuiltinTag::from_type_name(&name).is_some() {
            return Err(CompileError::BuiltinClassName { name, range });
        }
        if parents.len() > 1 {
            return Err(CompileError::MultipleInheritance {
                class: name,
                parents,
                range,
            });
        }

        let id = ClassId::new(self.classes.len());
        match self.classes.entry(name) {
            Entry::Occupied(entry) => Err(CompileError::DuplicateClass {
                name: entry.key().clone(),
                range,
            }),
            Entry::Vacant(entry) => {
                tracing::debug!(class = %entry.key(), ?parents, "registered class");
                let mut class = TagClass::new(entry.key().clone(), parents);
                class.range = range;
                entry.insert(class);
                Ok(id)
            }
        }
    }

    /// Add an own field. Inherited fields never conflict: redeclaring one
    /// shadows it.
    pub fn add_variable(&mut self, class: &str, variable: Variable) -> CompileResult<()> {
        let owner = self.lookup_mut(class)?;
        if owner.variables.contains_key(&variable.name) {
            return Err(CompileError::DuplicateField {
                class: owner.name.clone(),
                field: variable.name,
                range: variable.range,
            });
        }
        tracing::trace!(class = %owner.name, field = %variable.name, "added field");
        owner.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    /// Add an own method. Overriding an inherited method is allowed.
    pub fn add_function(&mut self, class: &str, mut function: Function) -> CompileResult<()> {
        let owner = self.lookup_mut(class)?;
        if owner.functions.contains_key(&function.name) {
            return Err(CompileError::DuplicateMethod {
                class: owner.name.clone(),
                method: function.name,
                range: function.range,
            });
        }
        tracing::trace!(class = %owner.name, method = %function.name, "added method");
        function.owner = owner.name.clone();
        owner.functions.insert(function.name.clone(), function);
        Ok(())
    }

    pub fn lookup(&self, class: &str) -> CompileResult<&TagClass> {
        self.classes
            .get(class)
            .ok_or_else(|| CompileError::UnknownClass(class.into()))
    }

    fn lookup_mut(&mut self, class: &str) -> CompileResult<&mut TagClass> {
        self.classes
            .get_mut(class)
            .ok_or_else(|| CompileError::UnknownClass(class.into()))
    }

    pub fn id_of(&self, class: &str) -> Option<ClassId> {
        self.classes.get_index_of(class).map(ClassId::new)
    }

    pub fn get(&self, id: ClassId) -> Option<&TagClass> {
        self.classes.get_index(id.index()).map(|(_, class)| class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Classes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &TagClass)> + '_ {
        self.classes
            .values()
            .enumerate()
            .map(|(index, class)| (ClassId::new(index), class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
