use smol_str::SmolStr;

use crate::hir::{CompileError, CompileResult};
use crate::parser::{AstNode, ClassDef, FieldDecl, MethodDecl, Passthrough, SyntaxError, Visitor};

use super::lower::{lower_field, lower_method};
use super::{Extractor, OutputItem};

impl Extractor {
    fn current_class(&self, node: &impl AstNode) -> CompileResult<SmolStr> {
        self.current_class.clone().ok_or_else(|| CompileError::Syntax {
            errors: vec![SyntaxError::new(
                "member declared outside a class",
                node.text_range(),
            )],
        })
    }
}

impl Visitor for Extractor {
    type Error = CompileError;

    fn visit_passthrough(&mut self, item: &Passthrough) -> CompileResult<()> {
        self.items.push(OutputItem::Passthrough(item.text()));
        Ok(())
    }

    fn enter_class(&mut self, class: &ClassDef) -> CompileResult<()> {
        let range = class.text_range();
        let name = class
            .name()
            .map(|n| n.text())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CompileError::Syntax {
                errors: vec![SyntaxError::new("missing class name", range)],
            })?;
        let parents = class.parents().iter().map(|p| p.text()).collect();

        self.registry
            .register_class(name.clone(), parents, Some(range))?;
        self.items.push(OutputItem::Class(name.clone()));
        self.current_class = Some(name);
        Ok(())
    }

    fn visit_field(&mut self, field: &FieldDecl) -> CompileResult<()> {
        let class = self.current_class(field)?;
        let variable = lower_field(field)?;
        self.registry.add_variable(&class, variable)
    }

    fn visit_method(&mut self, method: &MethodDecl) -> CompileResult<()> {
        let class = self.current_class(method)?;
        let function = lower_method(method)?;
        self.registry.add_function(&class, function)
    }

    fn exit_class(&mut self, class: &ClassDef) -> CompileResult<()> {
        if let Some(name) = self.current_class.take() {
            tracing::trace!(class = %name, range = ?class.text_range(), "left class");
        }
        Ok(())
    }

    fn finish(&mut self) -> CompileResult<()> {
        tracing::trace!(classes = self.registry.len(), "traversal finished");
        Ok(())
    }
}
