//! Recursive descent parser for the class-extended Pawn dialect
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST: everything outside
//! a class declaration is kept as a `PASSTHROUGH` node.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Get the typed root
    pub fn source_file(&self) -> super::SourceFile {
        super::SourceFile(self.syntax())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Parse source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_source_file();
    let parse = parser.finish();
    tracing::trace!(errors = parse.errors.len(), "parsed source file");
    parse
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    end: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], end: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.current().is_some_and(|t| kinds.contains(&t.kind))
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        // Look ahead, skipping trivia
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(Token::range)
            .unwrap_or_else(|| TextRange::empty(self.end));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = (ClassDef | Passthrough)*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        while !self.at_eof() {
            if self.at(SyntaxKind::CLASS_KW) {
                self.parse_class();
            } else {
                self.parse_passthrough();
            }
        }

        self.finish_node();
    }

    /// Passthrough = any token up to the next `class`
    fn parse_passthrough(&mut self) {
        self.start_node(SyntaxKind::PASSTHROUGH);
        while !self.at_eof() && !self.at(SyntaxKind::CLASS_KW) {
            self.bump();
        }
        self.finish_node();
    }

    /// ClassDef = 'class' Name ParentList? '{' Member* '}' ';'?
    fn parse_class(&mut self) {
        self.start_node(SyntaxKind::CLASS_DEF);

        self.expect(SyntaxKind::CLASS_KW);
        self.skip_trivia();
        self.parse_name();
        self.skip_trivia();

        if self.at(SyntaxKind::COLON) {
            self.parse_parent_list();
            self.skip_trivia();
        }

        if !self.at(SyntaxKind::L_BRACE) {
            self.error("expected '{' to open class body");
            self.finish_node();
            return;
        }
        self.bump();

        loop {
            self.skip_trivia();
            if self.at_eof() || self.at(SyntaxKind::R_BRACE) {
                break;
            }
            self.parse_member();
        }
        self.expect(SyntaxKind::R_BRACE);

        if self.nth(0) == SyntaxKind::SEMICOLON {
            self.skip_trivia();
            self.bump();
        }

        self.finish_node();
    }

    /// ParentList = ':' Name (',' Name)*
    fn parse_parent_list(&mut self) {
        self.start_node(SyntaxKind::PARENT_LIST);
        self.bump(); // ':'
        loop {
            self.skip_trivia();
            self.parse_name();
            if self.nth(0) != SyntaxKind::COMMA {
                break;
            }
            self.skip_trivia();
            self.bump();
        }
        self.finish_node();
    }

    fn parse_name(&mut self) {
        if self.at(SyntaxKind::IDENT) {
            self.start_node(SyntaxKind::NAME);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected identifier");
        }
    }

    fn parse_type(&mut self) {
        self.start_node(SyntaxKind::TYPE_REF);
        self.expect(SyntaxKind::IDENT);
        self.finish_node();
    }

    /// Member = FieldDecl | MethodDecl
    fn parse_member(&mut self) {
        match self.current_kind() {
            SyntaxKind::FUNCTION_KW => self.parse_method(),
            SyntaxKind::IDENT => self.parse_field(),
            _ => {
                self.error_recover(
                    format!("expected field or method declaration, found {:?}", self.current_kind()),
                    &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
                );
                self.eat(SyntaxKind::SEMICOLON);
            }
        }
    }

    /// FieldDecl = TypeRef Name ArraySize? DefaultValue? ';'
    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::FIELD_DECL);

        self.parse_type();
        self.skip_trivia();
        if !self.at(SyntaxKind::IDENT) {
            self.error_recover(
                "expected field name",
                &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
            );
            self.eat(SyntaxKind::SEMICOLON);
            self.finish_node();
            return;
        }
        self.parse_name();
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_array_size();
            self.skip_trivia();
        }
        if self.at(SyntaxKind::EQ) {
            self.parse_default_value(&[SyntaxKind::SEMICOLON]);
        }
        self.expect(SyntaxKind::SEMICOLON);

        self.finish_node();
    }

    /// MethodDecl = 'function' TypeRef? Name ParamList (Body | ';')
    fn parse_method(&mut self) {
        self.start_node(SyntaxKind::METHOD_DECL);

        self.bump(); // 'function'
        self.skip_trivia();
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::IDENT {
            self.parse_type();
            self.skip_trivia();
        }
        if !self.at(SyntaxKind::IDENT) {
            self.error_recover(
                "expected method name",
                &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE],
            );
            self.eat(SyntaxKind::SEMICOLON);
            self.finish_node();
            return;
        }
        self.parse_name();
        self.skip_trivia();
        self.parse_param_list();
        self.skip_trivia();

        if self.at(SyntaxKind::L_BRACE) {
            self.parse_body();
        } else {
            self.expect(SyntaxKind::SEMICOLON);
        }

        self.finish_node();
    }

    /// ParamList = '(' (Param (',' Param)*)? ')'
    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);

        if !self.expect(SyntaxKind::L_PAREN) {
            self.finish_node();
            return;
        }
        self.skip_trivia();
        if !self.at(SyntaxKind::R_PAREN) {
            loop {
                self.parse_param();
                self.skip_trivia();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
                self.skip_trivia();
            }
        }
        self.expect(SyntaxKind::R_PAREN);

        self.finish_node();
    }

    /// Param = TypeRef Name ArraySize? DefaultValue?
    fn parse_param(&mut self) {
        if !(self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::IDENT) {
            self.error_recover(
                "expected parameter declaration",
                &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::L_BRACE],
            );
            return;
        }

        self.start_node(SyntaxKind::PARAM);
        self.parse_type();
        self.skip_trivia();
        self.parse_name();
        self.skip_trivia();
        if self.at(SyntaxKind::L_BRACKET) {
            self.parse_array_size();
            self.skip_trivia();
        }
        if self.at(SyntaxKind::EQ) {
            self.parse_default_value(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
        }
        self.finish_node();
    }

    /// ArraySize = '[' tokens? ']'
    fn parse_array_size(&mut self) {
        self.start_node(SyntaxKind::ARRAY_SIZE);
        self.bump(); // '['
        while !self.at_eof()
            && !self.at_any(&[
                SyntaxKind::R_BRACKET,
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_BRACE,
            ])
        {
            self.bump();
        }
        self.expect(SyntaxKind::R_BRACKET);
        self.finish_node();
    }

    /// DefaultValue = '=' tokens, stopping at an unnested terminator
    fn parse_default_value(&mut self, terminators: &[SyntaxKind]) {
        self.start_node(SyntaxKind::DEFAULT_VALUE);
        self.bump(); // '='
        let mut depth = 0usize;
        while let Some(token) = self.current() {
            match token.kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE
                    if depth > 0 =>
                {
                    depth -= 1
                }
                kind if depth == 0
                    && (terminators.contains(&kind) || kind == SyntaxKind::R_BRACE) =>
                {
                    break;
                }
                _ => {}
            }
            self.bump();
        }
        self.finish_node();
    }

    /// Body = '{' balanced tokens '}'
    fn parse_body(&mut self) {
        self.start_node(SyntaxKind::BODY);
        self.bump(); // '{'
        let mut depth = 1usize;
        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => depth -= 1,
                _ => {}
            }
            self.bump();
            if depth == 0 {
                break;
            }
        }
        if depth > 0 {
            self.error("unterminated method body");
        }
        self.finish_node();
    }
}
