//! Single-pass tree walker.
//!
//! [`walk`] traverses a [`SourceFile`] once in source order and reports each
//! construct to a [`Visitor`]. Every callback can fail; the first error stops
//! the walk.

use super::ast::{ClassDef, FieldDecl, Item, Member, MethodDecl, Passthrough, SourceFile};

/// Callbacks invoked by [`walk`]. All default to doing nothing.
pub trait Visitor {
    type Error;

    fn visit_passthrough(&mut self, _item: &Passthrough) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_class(&mut self, _class: &ClassDef) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_field(&mut self, _field: &FieldDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_method(&mut self, _method: &MethodDecl) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit_class(&mut self, _class: &ClassDef) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once after the last item.
    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk every item of `file`, class members nested between enter/exit.
pub fn walk<V: Visitor>(file: &SourceFile, visitor: &mut V) -> Result<(), V::Error> {
    for item in file.items() {
        match item {
            Item::Passthrough(text) => visitor.visit_passthrough(&text)?,
            Item::Class(class) => {
                visitor.enter_class(&class)?;
                for member in class.members() {
                    match member {
                        Member::Field(field) => visitor.visit_field(&field)?,
                        Member::Method(method) => visitor.visit_method(&method)?,
                    }
                }
                visitor.exit_class(&class)?;
            }
        }
    }
    visitor.finish()
}
