//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.

use smol_str::SmolStr;
use text_size::TextRange;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Text of a node without the given delimiter tokens, trimmed.
fn inner_text(node: &SyntaxNode, skip: &[SyntaxKind]) -> String {
    let text: String = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !skip.contains(&t.kind()))
        .map(|t| t.text().to_string())
        .collect();
    text.trim().to_string()
}

// ============================================================================
// Source file
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Top-level items in source order
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.0.children().filter_map(Item::cast)
    }

    children_method!(classes, ClassDef);
}

/// A top-level item: either a class or verbatim base-dialect text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Class(ClassDef),
    Passthrough(Passthrough),
}

impl Item {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::CLASS_DEF => Some(Item::Class(ClassDef(node))),
            SyntaxKind::PASSTHROUGH => Some(Item::Passthrough(Passthrough(node))),
            _ => None,
        }
    }
}

ast_node!(Passthrough, PASSTHROUGH);

impl Passthrough {
    /// The exact source text of this region
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

// ============================================================================
// Classes
// ============================================================================

ast_node!(ClassDef, CLASS_DEF);

impl ClassDef {
    first_child_method!(name, Name);
    first_child_method!(parent_list, ParentList);

    /// Declared parent names (empty for a root class)
    pub fn parents(&self) -> Vec<Name> {
        self.parent_list()
            .map(|list| list.names().collect())
            .unwrap_or_default()
    }

    /// Field and method declarations in source order
    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        self.0.children().filter_map(Member::cast)
    }
}

ast_node!(ParentList, PARENT_LIST);

impl ParentList {
    children_method!(names, Name);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FIELD_DECL => Some(Member::Field(FieldDecl(node))),
            SyntaxKind::METHOD_DECL => Some(Member::Method(MethodDecl(node))),
            _ => None,
        }
    }
}

ast_node!(Name, NAME);

impl Name {
    pub fn text(&self) -> SmolStr {
        self.ident()
            .map(|t| SmolStr::new(t.text()))
            .unwrap_or_default()
    }

    pub fn ident(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT)
    }
}

ast_node!(TypeRef, TYPE_REF);

impl TypeRef {
    pub fn text(&self) -> SmolStr {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| SmolStr::new(t.text()))
            .unwrap_or_default()
    }
}

ast_node!(ArraySize, ARRAY_SIZE);

impl ArraySize {
    /// Size expression between the brackets (empty for `[]`)
    pub fn text(&self) -> String {
        inner_text(&self.0, &[SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET])
    }
}

ast_node!(DefaultValue, DEFAULT_VALUE);

impl DefaultValue {
    /// Opaque expression text after `=`
    pub fn text(&self) -> String {
        let text = self.0.text().to_string();
        text.strip_prefix('=').unwrap_or(&text).trim().to_string()
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    first_child_method!(ty, TypeRef);
    first_child_method!(name, Name);
    first_child_method!(array_size, ArraySize);
    first_child_method!(default_value, DefaultValue);
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    first_child_method!(return_type, TypeRef);
    first_child_method!(name, Name);
    first_child_method!(param_list, ParamList);
    first_child_method!(body, Body);

    pub fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|list| list.params().collect())
            .unwrap_or_default()
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    children_method!(params, Param);
}

ast_node!(Param, PARAM);

impl Param {
    first_child_method!(ty, TypeRef);
    first_child_method!(name, Name);
    first_child_method!(array_size, ArraySize);
    first_child_method!(default_value, DefaultValue);
}

ast_node!(Body, BODY);

impl Body {
    /// Every token of the body, braces and trivia included
    pub fn tokens(&self) -> Vec<SyntaxToken> {
        self.0
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .collect()
    }
}
