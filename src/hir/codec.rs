//! Identifier codec: class and method names to flat Pawn identifiers.
//!
//! Source identifiers match `[A-Za-z_][A-Za-z0-9_]*`. Pawn identifiers may
//! also contain `@`, which is used as the method separator: it can never occur
//! in either half, so every function identifier splits back into exactly one
//! (tag, method) pair.

/// Prefix of every class enumeration.
pub const TAG_PREFIX: &str = "Class_";

/// Separator between the owning tag and the method name.
pub const METHOD_SEPARATOR: char = '@';

/// Enumeration identifier backing the class `class_id`.
pub fn tag_identifier_for(class_id: &str) -> String {
    format!("{TAG_PREFIX}{class_id}")
}

/// Flat function identifier for `method_id` declared on the tag `owner_tag_id`.
pub fn function_identifier_for(method_id: &str, owner_tag_id: &str) -> String {
    format!("{owner_tag_id}{METHOD_SEPARATOR}{method_id}")
}

/// Pawn keywords and predefined constants. Fields and parameters become Pawn
/// symbols verbatim, so none of these can name one.
const RESERVED_WORDS: &[&str] = &[
    "assert", "break", "case", "char", "const", "continue", "default", "defined", "do", "else",
    "enum", "exit", "false", "for", "forward", "goto", "if", "native", "new", "operator",
    "public", "return", "sizeof", "sleep", "state", "static", "stock", "switch", "tagof", "true",
    "while",
];

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}
