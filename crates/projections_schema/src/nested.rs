//! Transitive resolution of the nested types a projection depends on.

use crate::definition::DefinitionSet;
use indexmap::IndexSet;
use tracing::{debug, warn};

/// Outcome of [`resolve_nested`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedResolution {
    /// Newline-joined bodies of the newly collected types, empty if none.
    pub sdl: String,
    /// Every name collected so far, including the ones passed in.
    pub collected: IndexSet<String>,
    /// Names collected by this call, in emission order.
    pub newly_collected: IndexSet<String>,
}

/// Collects the SDL of `root` and everything it transitively references.
///
/// The walk is a depth-first pre-order over `nested_type_names`. A name is not
/// descended into when it is already in `collected` or when its definition is a
/// projection, which bounds the walk on cyclic graphs and emits every body at
/// most once. Names without a local definition emit nothing.
pub fn resolve_nested(
    definitions: &DefinitionSet,
    root: &str,
    mut collected: IndexSet<String>,
) -> NestedResolution {
    let mut bodies = Vec::new();
    let mut newly_collected = IndexSet::new();
    let mut stack = vec![root];

    while let Some(name) = stack.pop() {
        if collected.contains(name) {
            continue;
        }
        let Some(definition) = definitions.get(name) else {
            warn!(name, "nested type has no local definition, skipping");
            continue;
        };
        if definition.is_projection {
            debug!(name, "nested type is a projection, reconciled on its own");
            continue;
        }

        collected.insert(name.to_string());
        newly_collected.insert(name.to_string());
        bodies.push(definition.sdl_body.as_str());

        // Reversed so the first declared dependency is visited first.
        stack.extend(
            definition
                .nested_type_names
                .iter()
                .rev()
                .map(String::as_str),
        );
    }

    NestedResolution {
        sdl: bodies.join("\n"),
        collected,
        newly_collected,
    }
}
