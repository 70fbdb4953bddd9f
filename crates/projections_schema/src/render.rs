//! Rendering of directives, values and type references back into SDL.

use crate::error::{SchemaError, SchemaResult};
use crate::naming::NameValidator;
use projections_core::Interner;
use projections_syntax::{Directive, TypeRef, Value};

/// Scalars that are inlined by value and never tracked as nested types.
pub const BUILTIN_SCALARS: &[&str] = &[
    "String",
    "Float",
    "ID",
    "Boolean",
    "Int",
    "DateTime",
    "EventEnvelope",
];

/// Returns true if the name is one of [`BUILTIN_SCALARS`].
#[must_use]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// A rendered type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedType {
    /// SDL text, e.g. `[Order!]!`.
    pub text: String,
    /// Qualified name of the innermost non-builtin type, if any.
    pub nested_type: Option<String>,
}

/// Renders syntax nodes of one document into SDL text.
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    interner: &'a Interner,
    namespace: &'a str,
    validator: &'a NameValidator,
}

impl<'a> Renderer<'a> {
    pub fn new(interner: &'a Interner, namespace: &'a str, validator: &'a NameValidator) -> Self {
        Self {
            interner,
            namespace,
            validator,
        }
    }

    /// Renders a constant value.
    pub fn render_value(&self, value: &Value<'_>) -> SchemaResult<String> {
        match value {
            Value::String(s) => Ok(quote(s)),
            Value::Int(text) | Value::Float(text) => Ok((*text).to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Enum(name) => Ok(self.interner.get(name.value)),
            Value::List(values) => {
                let items = values
                    .iter()
                    .map(|v| self.render_value(v))
                    .collect::<SchemaResult<Vec<_>>>()?;
                Ok(format!("[{}]", items.join(", ")))
            }
            Value::Object(fields) => {
                let items = fields
                    .iter()
                    .map(|(name, v)| -> SchemaResult<String> {
                        Ok(format!("{}: {}", self.interner.get(name.value), self.render_value(v)?))
                    })
                    .collect::<SchemaResult<Vec<_>>>()?;
                Ok(format!("{{{}}}", items.join(", ")))
            }
            Value::Variable(name) => Err(SchemaError::UnsupportedValueKind {
                kind: value.kind(),
                value: format!("${}", self.interner.get(name.value)),
            }),
        }
    }

    /// Renders a directive as ` @name` or ` @name(arg: value, ...)`.
    pub fn render_directive(&self, directive: &Directive<'_>) -> SchemaResult<String> {
        let name = self.interner.get(directive.name.value);
        if directive.arguments.is_empty() {
            return Ok(format!(" @{name}"));
        }

        let args = directive
            .arguments
            .iter()
            .map(|arg| -> SchemaResult<String> {
                Ok(format!(
                    "{}: {}",
                    self.interner.get(arg.name.value),
                    self.render_value(&arg.value)?
                ))
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(format!(" @{name}({})", args.join(", ")))
    }

    /// Renders all directives in declaration order.
    pub fn render_directives(&self, directives: &[Directive<'_>]) -> SchemaResult<String> {
        directives
            .iter()
            .map(|d| self.render_directive(d))
            .collect()
    }

    /// Renders a type reference, namespacing and reporting custom types.
    pub fn render_type(&self, ty: &TypeRef) -> SchemaResult<RenderedType> {
        match ty {
            TypeRef::Named(named) => {
                let name = self.interner.get(named.value);
                if is_builtin_scalar(&name) {
                    return Ok(RenderedType {
                        text: name,
                        nested_type: None,
                    });
                }
                let qualified = self.qualify(&name)?;
                Ok(RenderedType {
                    text: qualified.clone(),
                    nested_type: Some(qualified),
                })
            }
            TypeRef::List(inner) => {
                let inner = self.render_type(inner)?;
                Ok(RenderedType {
                    text: format!("[{}]", inner.text),
                    nested_type: inner.nested_type,
                })
            }
            TypeRef::NonNull(inner) => {
                let inner = self.render_type(inner)?;
                Ok(RenderedType {
                    text: format!("{}!", inner.text),
                    nested_type: inner.nested_type,
                })
            }
        }
    }

    /// Prefixes a local name with the namespace and validates the result.
    pub fn qualify(&self, local_name: &str) -> SchemaResult<String> {
        let qualified = format!("{}{local_name}", self.namespace);
        self.validator.validate(&qualified)?;
        Ok(qualified)
    }
}

/// Quotes and escapes a string value.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
