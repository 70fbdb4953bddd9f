//! Projection schema compilation.
//!
//! Turns GraphQL SDL documents into a [`DefinitionSet`]: every object and enum
//! type re-rendered as SDL, classified as projection or supporting type, with
//! the nested types it references.
//!
//! - `naming`: reserved namespace guard
//! - `render`: value, directive and type reference rendering
//! - `definition`: type definition extraction
//! - `nested`: nested type resolution
//! - `loader`: schema directory loading

pub mod definition;
pub mod error;
pub mod loader;
pub mod naming;
pub mod nested;
pub mod render;

pub use definition::{
    extract, DefinitionSet, ExtractOptions, Extractor, TypeDefinition, DEFAULT_MARKER_DIRECTIVE,
};
pub use error::{SchemaError, SchemaResult};
pub use loader::{compile, compile_dir, load_schema_dir, SchemaFile};
pub use naming::{NameValidator, RESERVED_PREFIX};
pub use nested::{resolve_nested, NestedResolution};
pub use render::{is_builtin_scalar, RenderedType, Renderer, BUILTIN_SCALARS};
