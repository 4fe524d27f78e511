#![allow(clippy::unwrap_used)]


use crate::emit::{EmitOptions, emit};
use crate::extract::Extractor;
use crate::hir::CompileResult;
use crate::parser::parse;

fn emit_with(source: &str, options: &EmitOptions) -> CompileResult<String> {
    let parse = parse(source);
    assert!(parse.ok(), "unexpected syntax errors: {:?}", parse.errors);
    let unit = Extractor::extract(&parse.source_file())?;
    let resolution = unit.resolve()?;
    emit(&resolution, options)
}

fn emit_default(source: &str) -> CompileResult<String> {
    emit_with(source, &EmitOptions::default())
}
