//! Class model: tags, classes, fields and methods.

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::parser::SyntaxKind;

use super::codec;

/// Index of a class in the registry, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub u32);

impl ClassId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pawn's built-in tags reachable from the extended dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTag {
    /// `int` and `char`: untagged cells
    Int,
    /// `float`: `Float:`
    Float,
    /// `bool`: `bool:`
    Bool,
}

impl BuiltinTag {
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "int" | "char" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// The tag as written in front of a Pawn symbol, `None` when untagged.
    pub fn pawn_tag(self) -> Option<&'static str> {
        match self {
            Self::Int => None,
            Self::Float => Some("Float"),
            Self::Bool => Some("bool"),
        }
    }
}

/// The static type of a field, parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Builtin(BuiltinTag),
    Class(ClassId),
}

/// A field or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: SmolStr,
    /// Declared type name, resolved to a [`Tag`] after registration completes
    pub ty: SmolStr,
    /// Array dimension: `Some("")` for `name[]`, `Some("32")` for `name[32]`
    pub array: Option<String>,
    /// Opaque default value expression
    pub default: Option<String>,
    pub range: Option<TextRange>,
}

impl Variable {
    pub fn new(name: impl Into<SmolStr>, ty: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            array: None,
            default: None,
            range: None,
        }
    }

    pub fn with_array(mut self, size: impl Into<String>) -> Self {
        self.array = Some(size.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// One token of an opaque method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyToken {
    pub kind: SyntaxKind,
    pub text: SmolStr,
    pub range: TextRange,
}

/// A method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: SmolStr,
    pub params: Vec<Variable>,
    /// Declared return type name; `None` for no return value
    pub ret: Option<SmolStr>,
    /// Body tokens including the outer braces; `None` for `function f();`
    pub body: Option<Vec<BodyToken>>,
    /// Class the method is declared on, set on registration
    pub owner: SmolStr,
    pub range: Option<TextRange>,
}

impl Function {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
            body: None,
            owner: SmolStr::default(),
            range: None,
        }
    }

    pub fn with_param(mut self, param: Variable) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_return(mut self, ty: impl Into<SmolStr>) -> Self {
        self.ret = Some(ty.into());
        self
    }

    pub fn with_body(mut self, body: Vec<BodyToken>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// One class declaration: a tag plus its own (not inherited) members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClass {
    pub name: SmolStr,
    /// Declared parent names; resolved by the inheritance resolver
    pub parents: Vec<SmolStr>,
    pub variables: IndexMap<SmolStr, Variable>,
    pub functions: IndexMap<SmolStr, Function>,
    pub range: Option<TextRange>,
}

impl TagClass {
    pub fn new(name: impl Into<SmolStr>, parents: Vec<SmolStr>) -> Self {
        Self {
            name: name.into(),
            parents,
            variables: IndexMap::new(),
            functions: IndexMap::new(),
            range: None,
        }
    }

    /// Base-dialect enumeration name of this class
    pub fn tag_identifier(&self) -> String {
        codec::tag_identifier_for(&self.name)
    }

    pub fn parent(&self) -> Option<&SmolStr> {
        self.parents.first()
    }
}
