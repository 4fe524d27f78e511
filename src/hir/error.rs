//! Error types for compilation.

use std::path::PathBuf;

use smol_str::SmolStr;
use text_size::TextRange;
use thiserror::Error;

use crate::parser::SyntaxError;

/// Result alias used across the compiler.
pub type CompileResult<T> = Result<T, CompileError>;

/// Every way a compilation unit can fail. None of these are recoverable:
/// the first one aborts the whole unit and nothing is emitted.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The source did not parse.
    #[error("syntax error: {}", .errors.first().map(|e| e.message.as_str()).unwrap_or("invalid input"))]
    Syntax { errors: Vec<SyntaxError> },

    /// Two classes declared with the same identifier.
    #[error("class '{name}' is already declared")]
    DuplicateClass { name: SmolStr, range: Option<TextRange> },

    /// A class named after a built-in type.
    #[error("class '{name}' redeclares the built-in type '{name}'")]
    BuiltinClassName { name: SmolStr, range: Option<TextRange> },

    /// Two fields with the same identifier declared directly on one class.
    #[error("field '{field}' is already declared in class '{class}'")]
    DuplicateField {
        class: SmolStr,
        field: SmolStr,
        range: Option<TextRange>,
    },

    /// Two methods with the same identifier declared directly on one class.
    #[error("method '{method}' is already declared in class '{class}'")]
    DuplicateMethod {
        class: SmolStr,
        method: SmolStr,
        range: Option<TextRange>,
    },

    /// A class declares more than one parent.
    #[error("class '{class}' declares multiple parents ({}); only single inheritance is supported", .parents.join(", "))]
    MultipleInheritance {
        class: SmolStr,
        parents: Vec<SmolStr>,
        range: Option<TextRange>,
    },

    /// Lookup of a class that was never registered.
    #[error("unknown class '{0}'")]
    UnknownClass(SmolStr),

    /// A declared parent does not name any registered class.
    #[error("class '{class}' extends unknown class '{parent}'")]
    UnresolvedParent {
        class: SmolStr,
        parent: SmolStr,
        range: Option<TextRange>,
    },

    /// The parent graph contains a cycle. The first name is repeated at the end.
    #[error("cyclic inheritance: {}", .cycle.join(" -> "))]
    CyclicInheritance {
        cycle: Vec<SmolStr>,
        range: Option<TextRange>,
    },

    /// Class-typed fields through which a class contains itself. The first
    /// name is repeated at the end.
    #[error("class layout contains itself: {}", .cycle.join(" -> "))]
    RecursiveLayout {
        cycle: Vec<SmolStr>,
        range: Option<TextRange>,
    },

    /// A declared type names neither a built-in tag nor a class.
    #[error("unknown type '{tag}' in {context}")]
    UnknownTag {
        tag: SmolStr,
        context: String,
        range: Option<TextRange>,
    },

    /// A class-typed field that also declares an array dimension.
    #[error("field '{field}' of class '{class}' cannot be an array of class type")]
    ClassArrayField {
        class: SmolStr,
        field: SmolStr,
        range: Option<TextRange>,
    },

    /// A field or parameter named with a Pawn reserved word.
    #[error("'{name}' is a reserved word and cannot name a {what}")]
    ReservedName {
        name: SmolStr,
        what: &'static str,
        range: Option<TextRange>,
    },

    /// A reference in a method body that cannot be statically resolved.
    #[error("cannot resolve '{reference}' in {class}.{method}: {reason}")]
    UnresolvedReference {
        class: SmolStr,
        method: SmolStr,
        reference: SmolStr,
        reason: String,
        range: Option<TextRange>,
    },

    /// Reading the source file failed.
    #[error("failed to read '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Source range of the offending construct, when known.
    pub fn range(&self) -> Option<TextRange> {
        match self {
            CompileError::Syntax { errors } => errors.first().map(|e| e.range),
            CompileError::DuplicateClass { range, .. }
            | CompileError::BuiltinClassName { range, .. }
            | CompileError::DuplicateField { range, .. }
            | CompileError::DuplicateMethod { range, .. }
            | CompileError::MultipleInheritance { range, .. }
            | CompileError::UnresolvedParent { range, .. }
            | CompileError::CyclicInheritance { range, .. }
            | CompileError::RecursiveLayout { range, .. }
            | CompileError::UnknownTag { range, .. }
            | CompileError::ClassArrayField { range, .. }
            | CompileError::ReservedName { range, .. }
            | CompileError::UnresolvedReference { range, .. } => *range,
            CompileError::UnknownClass(_) | CompileError::Io { .. } => None,
        }
    }

    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
