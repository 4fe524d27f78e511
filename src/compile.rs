//! Compilation entry points.

use std::path::Path;

use crate::emit::{EmitOptions, emit};
use crate::extract::Extractor;
use crate::hir::{CompileError, CompileResult};
use crate::parser::parse;

/// Compile one unit of class-extended source into Pawn.
///
/// A fresh registry is built for every call; nothing is shared between units.
pub fn compile(source: &str, options: &EmitOptions) -> CompileResult<String> {
    let parse = parse(source);
    if !parse.ok() {
        return Err(CompileError::Syntax {
            errors: parse.errors,
        });
    }

    let unit = Extractor::extract(&parse.source_file())?;
    let resolution = unit.resolve()?;
    emit(&resolution, options)
}

/// Read the source file at `path`.
pub fn read_source(path: impl AsRef<Path>) -> CompileResult<String> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading source");
    std::fs::read_to_string(path).map_err(|source| CompileError::io(path, source))
}

/// Read and compile the file at `path`.
pub fn compile_file(path: impl AsRef<Path>, options: &EmitOptions) -> CompileResult<String> {
    compile(&read_source(path)?, options)
}
