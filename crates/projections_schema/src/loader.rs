//! Loading and compiling a directory of schema files.

use crate::definition::{DefinitionSet, ExtractOptions, Extractor};
use crate::error::{SchemaError, SchemaResult};
use projections_core::Interner;
use projections_syntax::parse;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions picked up by [`load_schema_dir`].
pub const SCHEMA_EXTENSIONS: &[&str] = &["graphql", "gql"];

/// A schema file read from disk.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    pub path: PathBuf,
    pub source: String,
}

/// Reads every schema file directly inside `dir`, sorted by path.
pub fn load_schema_dir(dir: &Path) -> SchemaResult<Vec<SchemaFile>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SchemaError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SchemaError::io(dir, e))?.path();
        let is_schema = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext));
        if is_schema && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| -> SchemaResult<SchemaFile> {
            let source = std::fs::read_to_string(&path).map_err(|e| SchemaError::io(&path, e))?;
            debug!(path = %path.display(), bytes = source.len(), "loaded schema file");
            Ok(SchemaFile { path, source })
        })
        .collect()
}

/// Parses and extracts all files into a single definition set.
///
/// Fails on the first file with syntax errors.
pub fn compile(files: &[SchemaFile], options: &ExtractOptions) -> SchemaResult<DefinitionSet> {
    let interner = Interner::new();
    let mut extractor = Extractor::new(&interner, options)?;

    for file in files {
        let result = parse(&file.source, &interner);
        if !result.diagnostics.is_empty() {
            return Err(SchemaError::Parse {
                path: file.path.clone(),
                source_text: file.source.clone(),
                diagnostics: result.diagnostics,
            });
        }
        extractor.add_document(&result.document)?;
    }

    Ok(extractor.finish())
}

/// Loads and compiles a schema directory.
pub fn compile_dir(dir: &Path, options: &ExtractOptions) -> SchemaResult<DefinitionSet> {
    compile(&load_schema_dir(dir)?, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_sorted_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.graphql"), "type B { id: ID }").unwrap();
        fs::write(dir.path().join("a.gql"), "type A { id: ID }").unwrap();
        fs::write(dir.path().join("notes.md"), "# not a schema").unwrap();
        fs::create_dir(dir.path().join("nested.graphql")).unwrap();

        let files = load_schema_dir(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|f| f.path.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["a.gql", "b.graphql"]);
    }

    #[test]
    fn test_compile_dir_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("order.graphql"),
            "type Order @upsertOn { items: [LineItem] }",
        )
        .unwrap();
        fs::write(dir.path().join("types.graphql"), "type LineItem { sku: String }").unwrap();

        let defs = compile_dir(dir.path(), &ExtractOptions::default()).unwrap();
        let names: Vec<_> = defs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Order", "LineItem"]);
    }

    #[test]
    fn test_compile_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.graphql"), "type Broken { id ID }").unwrap();

        let err = compile_dir(dir.path(), &ExtractOptions::default()).unwrap_err();
        match err {
            SchemaError::Parse {
                path, diagnostics, ..
            } => {
                assert!(path.ends_with("broken.graphql"));
                assert!(!diagnostics.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_schema_dir(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
