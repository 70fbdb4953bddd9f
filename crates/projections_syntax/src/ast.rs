//! Syntax tree of a GraphQL schema document.
//!
//! Object and enum types keep what is needed to print them again. The other
//! definition kinds are checked for syntax and only kept as a summary.

use projections_core::{Span, Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name {
    pub value: Text,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct Document<'a> {
    pub definitions: Vec<Definition<'a>>,
}

impl<'a> Document<'a> {
    pub fn objects(&self) -> impl Iterator<Item = &ObjectType<'a>> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Object(object) => Some(object),
            _ => None,
        })
    }
}

#[derive(Debug)]
pub enum Definition<'a> {
    Object(ObjectType<'a>),
    Enum(EnumType),
    Other(OtherDefinition),
}

/// `type Name implements ... @directives { fields }`.
///
/// Interfaces are validated but not kept.
#[derive(Debug)]
pub struct ObjectType<'a> {
    pub name: Name,
    pub directives: Vec<Directive<'a>>,
    pub fields: Vec<Field<'a>>,
}

/// A field of an object type. Argument definitions are validated but not kept.
#[derive(Debug)]
pub struct Field<'a> {
    pub name: Name,
    pub ty: TypeRef,
    pub directives: Vec<Directive<'a>>,
}

#[derive(Debug)]
pub struct EnumType {
    pub name: Name,
    pub values: Vec<Name>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    Schema,
    Directive,
    Interface,
    Union,
    Input,
    Scalar,
}

impl OtherKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Directive => "directive",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Input => "input",
            Self::Scalar => "scalar",
        }
    }
}

/// A definition that passes through compilation untouched.
#[derive(Debug, Clone, Copy)]
pub struct OtherDefinition {
    pub kind: OtherKind,
    /// `None` for `schema { ... }`.
    pub name: Option<Name>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(Name),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

#[derive(Debug, Clone)]
pub struct Directive<'a> {
    pub name: Name,
    pub arguments: Vec<Argument<'a>>,
}

#[derive(Debug, Clone)]
pub struct Argument<'a> {
    pub name: Name,
    pub value: Value<'a>,
}

/// A constant or variable value. Numbers keep their source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Variable(Name),
    Int(&'a str),
    Float(&'a str),
    String(String),
    Boolean(bool),
    Null,
    Enum(Name),
    List(Vec<Value<'a>>),
    Object(Vec<(Name, Value<'a>)>),
}

impl Value<'_> {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Variable(_) => "variable",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}
