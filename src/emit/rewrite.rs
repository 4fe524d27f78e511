//! Method-body rewriting.
//!
//! Bodies stay opaque token sequences. Only three constructs are touched:
//!
//! - member chains on a statically typed receiver (`this.pos.x`, `v.move(1)`,
//!   `super.speak()`), rewritten into enum indexing and flat calls
//! - local declarations at statement start (`Vec v;`, `float f = 1.0;`),
//!   rewritten into `new`
//! - any other `.`, which cannot be typed and is rejected
//!
//! Everything else, trivia included, is copied through.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::hir::{
    BodyToken, ClassId, CompileError, CompileResult, InheritanceResolver, Tag,
    Variable, codec,
};
use crate::parser::SyntaxKind;

/// Static class of a visible name; `None` when the name is not class-typed.
type Binding = Option<ClassId>;

/// A local declaration statement still being copied.
#[derive(Debug, Clone, Copy)]
struct Declaration {
    tag: Tag,
    /// Bracket nesting inside the statement
    depth: usize,
    /// The next identifier is another declarator (after `,`)
    expect_name: bool,
}

pub(crate) struct BodyRewriter<'r, 'a> {
    resolver: &'r InheritanceResolver<'a>,
    /// Class the function is emitted under: the static type of `this`
    class: ClassId,
    /// Class the method is declared on: `super` is its parent
    owner: ClassId,
    method: &'r str,
    tokens: &'r [BodyToken],
    pos: usize,
    scopes: Vec<FxHashMap<SmolStr, Binding>>,
    declaration: Option<Declaration>,
    statement_start: bool,
    previous: Option<&'r BodyToken>,
    out: String,
}

impl<'r, 'a> BodyRewriter<'r, 'a> {
    pub(crate) fn new(
        resolver: &'r InheritanceResolver<'a>,
        class: ClassId,
        owner: ClassId,
        method: &'r str,
        tokens: &'r [BodyToken],
    ) -> Self {
        Self {
            resolver,
            class,
            owner,
            method,
            tokens,
            pos: 0,
            scopes: Vec::new(),
            declaration: None,
            statement_start: true,
            previous: None,
            out: String::new(),
        }
    }

    /// Rewrite the whole body with `params` in scope.
    pub(crate) fn rewrite(mut self, params: &[Variable]) -> CompileResult<String> {
        let params = params
            .iter()
            .map(|param| {
                let binding = match self.resolver.resolve_tag(&param.ty) {
                    Some(Tag::Class(id)) if param.array.is_none() => Some(id),
                    _ => None,
                };
                (param.name.clone(), binding)
            })
            .collect();
        self.scopes.push(params);

        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.pos) {
            if token.kind.is_trivia() {
                self.out.push_str(&token.text);
                self.pos += 1;
                continue;
            }
            self.step(token)?;
        }

        tracing::trace!(
            class = %self.resolver.class(self.class).name,
            method = self.method,
            "rewrote body"
        );
        Ok(self.out)
    }

    fn step(&mut self, token: &'r BodyToken) -> CompileResult<()> {
        let statement_start = std::mem::replace(&mut self.statement_start, false);

        match token.kind {
            SyntaxKind::L_BRACE => {
                self.open_group();
                self.scopes.push(FxHashMap::default());
                self.copy(token);
                self.statement_start = true;
            }
            SyntaxKind::R_BRACE => {
                self.close_group();
                if self.scopes.len() > 1 {
                    self.scopes.pop();
                }
                self.copy(token);
                self.statement_start = true;
            }
            SyntaxKind::SEMICOLON => {
                if self.declaration.is_some_and(|d| d.depth == 0) {
                    self.declaration = None;
                }
                self.copy(token);
                self.statement_start = true;
            }
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET => {
                self.open_group();
                self.copy(token);
                if token.kind == SyntaxKind::L_PAREN
                    && self.previous.is_some_and(|p| p.text == "for")
                {
                    self.statement_start = true;
                }
            }
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => {
                self.close_group();
                self.copy(token);
            }
            SyntaxKind::COMMA => {
                if let Some(declaration) = self.declaration.as_mut()
                    && declaration.depth == 0
                {
                    declaration.expect_name = true;
                }
                self.copy(token);
            }
            SyntaxKind::THIS_KW | SyntaxKind::SUPER_KW => self.member_chain(token)?,
            SyntaxKind::IDENT => self.identifier(token, statement_start)?,
            SyntaxKind::DOT => {
                return Err(self.unresolved(
                    token,
                    ".",
                    "member access on an expression without a class type",
                ));
            }
            _ => self.copy(token),
        }
        Ok(())
    }

    fn identifier(&mut self, token: &'r BodyToken, statement_start: bool) -> CompileResult<()> {
        if let Some(declaration) = self.declaration.as_mut()
            && declaration.expect_name
        {
            declaration.expect_name = false;
            let tag = declaration.tag;
            self.declarator(token, tag);
            return Ok(());
        }

        if statement_start && let Some(tag) = self.declared_type(token) {
            let tokens = self.tokens;
            self.pos = self.next_significant(self.pos + 1).unwrap_or(tokens.len());
            let Some(name) = tokens.get(self.pos) else {
                return Ok(());
            };
            self.out.push_str("new ");
            self.declaration = Some(Declaration {
                tag,
                depth: 0,
                expect_name: false,
            });
            self.declarator(name, tag);
            return Ok(());
        }

        if token.text == "new" {
            self.shadow_new_local();
        } else if self.kind_from(self.pos + 1) == Some(SyntaxKind::DOT) {
            return self.member_chain(token);
        }

        self.copy(token);
        if matches!(token.text.as_str(), "else" | "do") {
            self.statement_start = true;
        }
        Ok(())
    }

    /// Tag of a `Type name` local declaration starting at `token`.
    fn declared_type(&self, token: &BodyToken) -> Option<Tag> {
        let next = self.next_significant(self.pos + 1)?;
        if self.tokens[next].kind != SyntaxKind::IDENT {
            return None;
        }
        self.resolver.resolve_tag(&token.text)
    }

    /// Emit one declarator and bind it in the innermost scope.
    fn declarator(&mut self, name: &'r BodyToken, tag: Tag) {
        self.pos += 1;
        let binding = match tag {
            Tag::Builtin(builtin) => {
                if let Some(pawn_tag) = builtin.pawn_tag() {
                    self.out.push_str(pawn_tag);
                    self.out.push(':');
                }
                self.out.push_str(&name.text);
                None
            }
            Tag::Class(id) => {
                self.out.push_str(&name.text);
                let array = self.copy_array_dimension();
                self.out.push('[');
                self.out.push_str(&self.resolver.class(id).tag_identifier());
                self.out.push(']');
                (!array).then_some(id)
            }
        };
        self.bind(name.text.clone(), binding);
        self.previous = Some(name);
    }

    /// Copy a `[size]` group directly following a declarator name.
    fn copy_array_dimension(&mut self) -> bool {
        let Some(open) = self.next_significant(self.pos) else {
            return false;
        };
        if self.tokens[open].kind != SyntaxKind::L_BRACKET {
            return false;
        }
        let mut index = open;
        while let Some(token) = self.tokens.get(index) {
            if !token.kind.is_trivia() {
                self.out.push_str(&token.text);
            }
            index += 1;
            if token.kind == SyntaxKind::R_BRACKET {
                break;
            }
        }
        self.pos = index;
        true
    }

    /// `new name` declares a base-dialect local that hides outer bindings.
    fn shadow_new_local(&mut self) {
        let Some(mut name) = self.next_significant(self.pos + 1) else {
            return;
        };
        // new Float:name
        if let Some(colon) = self.next_significant(name + 1)
            && self.tokens[colon].kind == SyntaxKind::COLON
        {
            match self.next_significant(colon + 1) {
                Some(after) => name = after,
                None => return,
            }
        }
        let token = &self.tokens[name];
        if token.kind == SyntaxKind::IDENT {
            self.bind(token.text.clone(), None);
        }
    }

    /// Rewrite a receiver followed by `.member` accesses, ending at the first
    /// call or at the first field that is not class-typed.
    fn member_chain(&mut self, receiver: &'r BodyToken) -> CompileResult<()> {
        let (mut expression, mut class) = match receiver.kind {
            SyntaxKind::THIS_KW => ("this".to_string(), self.class),
            SyntaxKind::SUPER_KW => {
                let parent = self.resolver.parent_of(self.owner).ok_or_else(|| {
                    let owner = &self.resolver.class(self.owner).name;
                    self.unresolved(receiver, "super", format!("class '{owner}' has no parent"))
                })?;
                ("this".to_string(), parent)
            }
            _ => match self.lookup(&receiver.text) {
                Some(id) => (receiver.text.to_string(), id),
                None => {
                    return Err(self.unresolved(
                        receiver,
                        &receiver.text,
                        "receiver has no class type",
                    ));
                }
            },
        };
        let tokens = self.tokens;
        let mut reference = receiver.text.to_string();
        self.pos += 1;
        self.previous = Some(receiver);

        while let Some(dot) = self.next_significant(self.pos) {
            if tokens[dot].kind != SyntaxKind::DOT {
                break;
            }
            let index = match self.next_significant(dot + 1) {
                Some(index) if tokens[index].kind == SyntaxKind::IDENT => index,
                _ => {
                    return Err(self.unresolved(
                        &tokens[dot],
                        &reference,
                        "expected member name after '.'",
                    ));
                }
            };
            let member = &tokens[index];
            reference.push('.');
            reference.push_str(&member.text);
            self.pos = index + 1;
            self.previous = Some(member);

            if self.kind_from(self.pos) == Some(SyntaxKind::L_PAREN) {
                return self.call(member, &reference, &expression, class);
            }

            let class_info = self.resolver.class(class);
            let field = self.resolver.field(class, &member.text).ok_or_else(|| {
                self.unresolved(
                    member,
                    &reference,
                    format!("class '{}' has no field '{}'", class_info.name, member.text),
                )
            })?;
            expression.push('[');
            expression.push_str(&member.text);
            expression.push(']');

            match self.resolver.resolve_tag(&field.ty) {
                Some(Tag::Class(id)) if field.array.is_none() => class = id,
                _ => break,
            }
        }

        if receiver.kind == SyntaxKind::SUPER_KW && reference == "super" {
            return Err(self.unresolved(receiver, "super", "'super' must be followed by a member"));
        }
        self.out.push_str(&expression);
        Ok(())
    }

    /// `recv.member(args)` → `Class_X@member(recv, args)`.
    fn call(
        &mut self,
        member: &'r BodyToken,
        reference: &str,
        receiver: &str,
        class: ClassId,
    ) -> CompileResult<()> {
        let class_info = self.resolver.class(class);
        if self.resolver.method(class, &member.text).is_none() {
            return Err(self.unresolved(
                member,
                reference,
                format!("class '{}' has no method '{}'", class_info.name, member.text),
            ));
        }

        let tokens = self.tokens;
        let function = codec::function_identifier_for(&member.text, &class_info.tag_identifier());
        let Some(paren) = self.next_significant(self.pos) else {
            return Ok(());
        };
        self.open_group();
        self.out.push_str(&function);
        self.out.push('(');
        self.out.push_str(receiver);

        match self.next_significant(paren + 1) {
            Some(argument) if tokens[argument].kind != SyntaxKind::R_PAREN => {
                self.out.push_str(", ");
                self.pos = argument;
            }
            _ => self.pos = paren + 1,
        }
        self.previous = Some(&tokens[paren]);
        tracing::trace!(call = %function, receiver, "rewrote method call");
        Ok(())
    }

    fn copy(&mut self, token: &'r BodyToken) {
        self.out.push_str(&token.text);
        self.pos += 1;
        self.previous = Some(token);
    }

    fn open_group(&mut self) {
        if let Some(declaration) = self.declaration.as_mut() {
            declaration.depth += 1;
        }
    }

    fn close_group(&mut self) {
        self.declaration = match self.declaration {
            Some(declaration) if declaration.depth > 0 => Some(Declaration {
                depth: declaration.depth - 1,
                ..declaration
            }),
            _ => None,
        };
    }

    fn bind(&mut self, name: SmolStr, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, binding);
        }
    }

    /// Innermost binding of `name`, if it is class-typed.
    fn lookup(&self, name: &str) -> Option<ClassId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .copied()
            .flatten()
    }

    fn next_significant(&self, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| !self.tokens[i].kind.is_trivia())
    }

    /// Kind of the first significant token at or after `from`.
    fn kind_from(&self, from: usize) -> Option<SyntaxKind> {
        self.next_significant(from).map(|i| self.tokens[i].kind)
    }

    fn unresolved(
        &self,
        token: &BodyToken,
        reference: &str,
        reason: impl Into<String>,
    ) -> CompileError {
        CompileError::UnresolvedReference {
            class: self.resolver.class(self.class).name.clone(),
            method: SmolStr::new(self.method),
            reference: SmolStr::new(reference),
            reason: reason.into(),
            range: Some(token.range),
        }
    }
}
