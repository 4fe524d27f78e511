//! # spot-pawn
//!
//! Compiler from SPOT, a class-extended Pawn dialect, to plain Pawn.
//!
//! Classes become tags backed by enumerations, fields become enumeration
//! members, and methods become flat functions named after their class.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! compile   → Entry points (source → Pawn, file → Pawn)
//!   ↓
//! emit      → Pawn emitter, method-body rewriter, emit options
//!   ↓
//! extract   → Tree visitor filling the registry (construction → resolution)
//!   ↓
//! hir       → Class model, identifier codec, registry, inheritance resolver
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, typed AST, tree walker
//!   ↓
//! base      → Primitives (TextRange, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → hir → extract → emit → compile)
// ============================================================================

/// Foundation types: TextRange, LineIndex
pub mod base;

/// Parser: Logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// Class model and inheritance resolution
pub mod hir;

/// Single-pass extraction of classes from the syntax tree
pub mod extract;

/// Pawn output
pub mod emit;

mod compile;

pub use compile::{compile, compile_file, read_source};

// Re-export foundation types
pub use base::{LineCol, LineIndex, TextRange, TextSize};

pub use emit::EmitOptions;
pub use hir::{CompileError, CompileResult};
