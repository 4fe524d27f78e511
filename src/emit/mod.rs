//! # Pawn emitter
//!
//! Turns a resolved unit back into base-dialect text. Passthrough regions are
//! copied verbatim; each class is replaced, at its position, by
//!
//! ```text
//! enum Class_X            one member per effective field
//! Class_X@@init(this)     only when some effective field has a default
//! Class_X@method(this)    one per effective method, root to leaf
//! ```
//!
//! Emission either produces the whole output or fails; nothing partial is
//! returned.

mod options;
mod rewrite;

pub use options::{BANNER, EmitOptions};

use text_size::TextRange;

use crate::extract::{OutputItem, Resolution};
use crate::hir::{
    BuiltinTag, ClassId, CompileError, CompileResult, Function, InheritanceResolver, Tag, Variable,
    codec,
};
use rewrite::BodyRewriter;

/// Method name of the generated field initializer. Source identifiers never
/// contain `@`, so it cannot clash with a declared method.
pub const INITIALIZER: &str = "@init";

/// Emit the whole unit.
pub fn emit(resolution: &Resolution<'_>, options: &EmitOptions) -> CompileResult<String> {
    let mut emitter = Emitter {
        resolver: resolution.resolver(),
        options,
        out: String::new(),
    };

    if options.banner {
        emitter.out.push_str(BANNER);
        emitter.out.push('\n');
    }
    for item in resolution.items() {
        match item {
            OutputItem::Passthrough(text) => emitter.out.push_str(text),
            OutputItem::Class(name) => emitter.class(name)?,
        }
    }

    tracing::debug!(bytes = emitter.out.len(), "emission complete");
    Ok(emitter.out)
}

struct Emitter<'r, 'a> {
    resolver: &'r InheritanceResolver<'a>,
    options: &'r EmitOptions,
    out: String,
}

impl<'r, 'a> Emitter<'r, 'a> {
    fn class(&mut self, name: &str) -> CompileResult<()> {
        let id = self.resolver.id_of(name)?;
        let tag = self.resolver.class(id).tag_identifier();
        let fields = self.resolver.effective_fields(name)?;
        let methods = self.resolver.effective_methods(name)?;
        tracing::debug!(
            class = name,
            fields = fields.len(),
            methods = methods.len(),
            "emitting class"
        );

        let members = fields
            .iter()
            .map(|field| self.enum_member(name, field))
            .collect::<CompileResult<Vec<_>>>()?;
        self.out.push_str(&format!("enum {tag}\n{{\n"));
        for (index, member) in members.iter().enumerate() {
            self.out.push_str(&self.options.indent);
            self.out.push_str(member);
            if index + 1 < members.len() {
                self.out.push(',');
            }
            self.out.push('\n');
        }
        self.out.push('}');

        if fields.iter().any(|field| field.default.is_some()) {
            self.initializer(&tag, &fields);
        }
        for function in methods.values() {
            self.function(id, function)?;
        }
        Ok(())
    }

    fn enum_member(&self, class: &str, field: &Variable) -> CompileResult<String> {
        let context = || format!("field '{}' of class '{class}'", field.name);
        match self.tag_of(&field.ty, field.range, context)? {
            Tag::Builtin(builtin) => {
                let mut member = format!("{}{}", tag_prefix(builtin), field.name);
                if let Some(size) = &field.array {
                    member.push_str(&format!("[{size}]"));
                }
                Ok(member)
            }
            Tag::Class(_) if field.array.is_some() => Err(CompileError::ClassArrayField {
                class: class.into(),
                field: field.name.clone(),
                range: field.range,
            }),
            Tag::Class(id) => Ok(format!(
                "{}[{}]",
                field.name,
                self.resolver.class(id).tag_identifier()
            )),
        }
    }

    /// `Class_X@@init(this[Class_X])` assigning every field default.
    fn initializer(&mut self, tag: &str, fields: &[&Variable]) {
        let name = codec::function_identifier_for(INITIALIZER, tag);
        self.signature("", &name, &[format!("this[{tag}]")]);
        self.out.push_str("{\n");
        for field in fields {
            if let Some(value) = &field.default {
                self.out.push_str(&format!(
                    "{}this[{}] = {value};\n",
                    self.options.indent, field.name
                ));
            }
        }
        self.out.push('}');
    }

    fn function(&mut self, class: ClassId, function: &Function) -> CompileResult<()> {
        let class_name = &self.resolver.class(class).name;
        let tag = self.resolver.class(class).tag_identifier();
        let context = || format!("method '{class_name}.{}'", function.name);

        let ret = match &function.ret {
            None => String::new(),
            Some(ty) => match self.tag_of(ty, function.range, context)? {
                Tag::Builtin(builtin) => tag_prefix(builtin),
                Tag::Class(id) => format!("{}:", self.resolver.class(id).tag_identifier()),
            },
        };

        let mut params = vec![format!("this[{tag}]")];
        for param in &function.params {
            params.push(self.param(param, &context)?);
        }

        let name = codec::function_identifier_for(&function.name, &tag);
        self.signature(&ret, &name, &params);

        match &function.body {
            None => self.out.push_str("{\n}"),
            Some(tokens) => {
                let owner = self.resolver.id_of(&function.owner)?;
                let body = BodyRewriter::new(self.resolver, class, owner, &function.name, tokens)
                    .rewrite(&function.params)?;
                self.out.push_str(&dedent(&body));
            }
        }
        tracing::trace!(function = %name, owner = %function.owner, "emitted function");
        Ok(())
    }

    fn param(&self, param: &Variable, context: &impl Fn() -> String) -> CompileResult<String> {
        let tag = self.tag_of(&param.ty, param.range, || {
            format!("parameter '{}' of {}", param.name, context())
        })?;

        let mut text = match tag {
            Tag::Builtin(builtin) => format!("{}{}", tag_prefix(builtin), param.name),
            Tag::Class(_) => param.name.to_string(),
        };
        if let Some(size) = &param.array {
            text.push_str(&format!("[{size}]"));
        }
        if let Tag::Class(id) = tag {
            text.push_str(&format!("[{}]", self.resolver.class(id).tag_identifier()));
        }
        if let Some(value) = &param.default {
            text.push_str(&format!(" = {value}"));
        }
        Ok(text)
    }

    fn signature(&mut self, ret: &str, name: &str, params: &[String]) {
        self.out.push_str("\n\n");
        if self.options.stock {
            self.out.push_str("stock ");
        }
        self.out.push_str(&format!("{ret}{name}({})\n", params.join(", ")));
    }

    fn tag_of(
        &self,
        ty: &str,
        range: Option<TextRange>,
        context: impl FnOnce() -> String,
    ) -> CompileResult<Tag> {
        self.resolver
            .resolve_tag(ty)
            .ok_or_else(|| CompileError::UnknownTag {
                tag: ty.into(),
                context: context(),
                range,
            })
    }
}

/// `Float:` style prefix, empty for untagged cells.
fn tag_prefix(builtin: BuiltinTag) -> String {
    builtin
        .pawn_tag()
        .map(|tag| format!("{tag}:"))
        .unwrap_or_default()
}

/// Strip the closing brace's indentation from every body line, so a body
/// nested in a class lands at column zero.
fn dedent(body: &str) -> String {
    let Some(last_line) = body.rfind('\n').map(|index| &body[index + 1..]) else {
        return body.to_string();
    };
    let indent = last_line.trim_end_matches('}');
    if indent.is_empty() || !indent.chars().all(char::is_whitespace) {
        return body.to_string();
    }

    body.split('\n')
        .enumerate()
        .map(|(index, line)| match index {
            0 => line,
            _ => line.strip_prefix(indent).unwrap_or(line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests;
