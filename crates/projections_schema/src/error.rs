//! Errors raised while compiling schema files into definitions.

use projections_core::DiagnosticBag;
use std::path::PathBuf;
use thiserror::Error;

/// Schema compilation error.
///
/// Every variant is detected from the local schema files alone, before any
/// remote call is made.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("type name `{name}` uses the reserved prefix `{prefix}`")]
    ReservedNamespace { name: String, prefix: String },

    #[error(
        "duplicate schema for projection `{name}` detected, try renaming one of them as they have to be unique"
    )]
    DuplicateDefinition { name: String },

    #[error("unsupported {kind} value `{value}` in directive argument")]
    UnsupportedValueKind { kind: &'static str, value: String },

    #[error("failed to parse {}: {} error(s)", path.display(), diagnostics.len())]
    Parse {
        path: PathBuf,
        source_text: String,
        diagnostics: DiagnosticBag,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;
