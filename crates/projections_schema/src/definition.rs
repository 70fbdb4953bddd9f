//! Extraction of projection type definitions from parsed documents.

use crate::error::{SchemaError, SchemaResult};
use crate::naming::NameValidator;
use crate::render::Renderer;
use indexmap::{IndexMap, IndexSet};
use projections_core::Interner;
use projections_syntax::{self as syntax, Document};
use tracing::{debug, trace};

/// Directive that marks an object type as a projection.
pub const DEFAULT_MARKER_DIRECTIVE: &str = "upsertOn";

/// A schema-level object or enum type, rendered and classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub qualified_name: String,
    pub is_projection: bool,
    pub sdl_body: String,
    /// Distinct non-builtin types referenced by the fields, first-seen order.
    pub nested_type_names: IndexSet<String>,
}

/// Definitions keyed by qualified name, in declaration order.
pub type DefinitionSet = IndexMap<String, TypeDefinition>;

/// Options controlling extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub namespace: String,
    pub marker_directive: String,
    pub validator: NameValidator,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            marker_directive: DEFAULT_MARKER_DIRECTIVE.to_string(),
            validator: NameValidator::default(),
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_marker_directive(mut self, marker: impl Into<String>) -> Self {
        self.marker_directive = marker.into();
        self
    }
}

/// Builds a [`DefinitionSet`] from one or more documents sharing an interner.
///
/// Duplicate detection spans every document added to the same extractor.
pub struct Extractor<'a> {
    interner: &'a Interner,
    options: &'a ExtractOptions,
    definitions: DefinitionSet,
}

impl<'a> Extractor<'a> {
    /// Creates an extractor, rejecting a reserved namespace up front.
    pub fn new(interner: &'a Interner, options: &'a ExtractOptions) -> SchemaResult<Self> {
        if !options.namespace.is_empty() {
            options.validator.validate(&options.namespace)?;
        }
        Ok(Self {
            interner,
            options,
            definitions: DefinitionSet::new(),
        })
    }

    /// Extracts every object and enum type of the document.
    pub fn add_document(&mut self, document: &Document<'_>) -> SchemaResult<()> {
        let options = self.options;
        let renderer = Renderer::new(self.interner, &options.namespace, &options.validator);

        for definition in &document.definitions {
            let definition = match definition {
                syntax::Definition::Object(object) => self.extract_object(&renderer, object)?,
                syntax::Definition::Enum(en) => self.extract_enum(&renderer, en)?,
                syntax::Definition::Other(other) => {
                    trace!(
                        kind = other.kind.keyword(),
                        name = ?other.name.map(|name| self.interner.get(name.value)),
                        "skipping definition"
                    );
                    continue;
                }
            };

            debug!(
                name = %definition.qualified_name,
                projection = definition.is_projection,
                nested = definition.nested_type_names.len(),
                "extracted type definition"
            );
            self.definitions
                .insert(definition.qualified_name.clone(), definition);
        }

        Ok(())
    }

    /// Returns the finished definition set.
    #[must_use]
    pub fn finish(self) -> DefinitionSet {
        self.definitions
    }

    fn qualify_unique(&self, renderer: &Renderer<'_>, name: &syntax::Name) -> SchemaResult<String> {
        let qualified = renderer.qualify(&self.interner.get(name.value))?;
        if self.definitions.contains_key(&qualified) {
            return Err(SchemaError::DuplicateDefinition { name: qualified });
        }
        Ok(qualified)
    }

    fn extract_object(
        &self,
        renderer: &Renderer<'_>,
        obj: &syntax::ObjectType<'_>,
    ) -> SchemaResult<TypeDefinition> {
        let qualified_name = self.qualify_unique(renderer, &obj.name)?;
        let is_projection = obj
            .directives
            .iter()
            .any(|d| self.interner.is(d.name.value, &self.options.marker_directive));

        let directives = renderer.render_directives(&obj.directives)?;
        let mut nested_type_names = IndexSet::new();
        let mut lines = Vec::with_capacity(obj.fields.len());

        for field in &obj.fields {
            let ty = renderer.render_type(&field.ty)?;
            if let Some(nested) = ty.nested_type {
                nested_type_names.insert(nested);
            }
            lines.push(format!(
                "{}: {}{}",
                self.interner.get(field.name.value),
                ty.text,
                renderer.render_directives(&field.directives)?
            ));
        }

        let sdl_body = format!(
            "type {qualified_name}{directives}{}",
            block(&lines)
        );

        Ok(TypeDefinition {
            qualified_name,
            is_projection,
            sdl_body,
            nested_type_names,
        })
    }

    fn extract_enum(
        &self,
        renderer: &Renderer<'_>,
        en: &syntax::EnumType,
    ) -> SchemaResult<TypeDefinition> {
        let qualified_name = self.qualify_unique(renderer, &en.name)?;
        let values: Vec<String> = en
            .values
            .iter()
            .map(|value| self.interner.get(value.value))
            .collect();

        Ok(TypeDefinition {
            sdl_body: format!("enum {qualified_name}{}", block(&values)),
            qualified_name,
            is_projection: false,
            nested_type_names: IndexSet::new(),
        })
    }
}

/// Renders ` {\n\tline\n}`, or nothing for a type without members.
fn block(lines: &[String]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    format!(" {{\n\t{}\n}}", lines.join("\n\t"))
}

/// Extracts definitions from documents parsed against the same interner.
pub fn extract<'d, 'a: 'd>(
    documents: impl IntoIterator<Item = &'d Document<'a>>,
    interner: &Interner,
    options: &ExtractOptions,
) -> SchemaResult<DefinitionSet> {
    let mut extractor = Extractor::new(interner, options)?;
    for document in documents {
        extractor.add_document(document)?;
    }
    Ok(extractor.finish())
}
