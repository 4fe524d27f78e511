//! AST declarations to model values.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::hir::{BodyToken, CompileError, CompileResult, Function, Variable, codec};
use crate::parser::{
    ArraySize, AstNode, DefaultValue, FieldDecl, MethodDecl, Name, Param, SyntaxError, TypeRef,
};

/// A piece the parser should have rejected; reported as a syntax error.
fn missing(what: &str, range: TextRange) -> CompileError {
    CompileError::Syntax {
        errors: vec![SyntaxError::new(format!("missing {what}"), range)],
    }
}

fn name_of(name: Option<Name>, what: &str, range: TextRange) -> CompileResult<SmolStr> {
    name.map(|n| n.text())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing(what, range))
}

fn type_of(ty: Option<TypeRef>, range: TextRange) -> CompileResult<SmolStr> {
    ty.map(|t| t.text())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing("type", range))
}

fn variable(
    what: &'static str,
    name: Option<Name>,
    ty: Option<TypeRef>,
    array: Option<ArraySize>,
    default: Option<DefaultValue>,
    range: TextRange,
) -> CompileResult<Variable> {
    let name = name_of(name, "name", range)?;
    if codec::is_reserved_word(&name) {
        return Err(CompileError::ReservedName {
            name,
            what,
            range: Some(range),
        });
    }
    let mut variable = Variable::new(name, type_of(ty, range)?).with_range(range);
    variable.array = array.map(|a| a.text());
    variable.default = default.map(|d| d.text());
    Ok(variable)
}

pub(super) fn lower_field(field: &FieldDecl) -> CompileResult<Variable> {
    variable(
        "field",
        field.name(),
        field.ty(),
        field.array_size(),
        field.default_value(),
        field.text_range(),
    )
}

pub(super) fn lower_param(param: &Param) -> CompileResult<Variable> {
    variable(
        "parameter",
        param.name(),
        param.ty(),
        param.array_size(),
        param.default_value(),
        param.text_range(),
    )
}

pub(super) fn lower_method(method: &MethodDecl) -> CompileResult<Function> {
    let range = method.text_range();
    let mut function = Function::new(name_of(method.name(), "method name", range)?).with_range(range);

    for param in method.params() {
        function.params.push(lower_param(&param)?);
    }
    function.ret = method.return_type().map(|t| t.text());
    function.body = method.body().map(|body| {
        body.tokens()
            .into_iter()
            .map(|token| BodyToken {
                kind: token.kind(),
                text: SmolStr::new(token.text()),
                range: token.text_range(),
            })
            .collect()
    });

    Ok(function)
}
