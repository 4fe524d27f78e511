/// Text of the optional first line of generated output.
pub const BANNER: &str = "// Generated by spotc";

/// Formatting options for generated Pawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Prefix generated functions with `stock`
    pub stock: bool,
    /// Indentation of enumeration members and initializer statements
    pub indent: String,
    /// Emit [`BANNER`] before everything else
    pub banner: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            stock: true,
            indent: "\t".to_string(),
            banner: false,
        }
    }
}

impl EmitOptions {
    /// Indent with `width` spaces instead of a tab.
    pub fn with_indent_spaces(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }
}
