//! Diffing local definitions against the registered projection names.

use indexmap::IndexSet;
use projections_schema::{
    resolve_nested, DefinitionSet, ExtractOptions, NameValidator, TypeDefinition,
};
use tracing::{debug, info};

/// Scope of a reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Only existing names starting with this prefix are considered.
    pub namespace: String,
    /// Existing names under the reserved prefix are never touched.
    pub validator: NameValidator,
}

impl From<&ExtractOptions> for PlanOptions {
    fn from(options: &ExtractOptions) -> Self {
        Self {
            namespace: options.namespace.clone(),
            validator: options.validator.clone(),
        }
    }
}

impl PlanOptions {
    /// Returns true if this run is authoritative over an existing name.
    #[must_use]
    pub fn owns(&self, name: &str) -> bool {
        name.starts_with(&self.namespace) && !self.validator.is_reserved(name)
    }
}

/// The create/update/remove partitions of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub to_create: IndexSet<String>,
    pub to_update: IndexSet<String>,
    pub to_remove: IndexSet<String>,
    /// Bodies of `to_create` and their nested types, newline-joined.
    pub create_payload: String,
    /// Bodies of `to_update` and their nested types, newline-joined.
    pub update_payload: String,
}

impl ReconciliationPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }

    /// Returns true if the run neither registers nor drops any projection.
    ///
    /// Registered projections are always refreshed, so a converged plan still
    /// carries an update partition.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.to_create.is_empty() && self.to_remove.is_empty()
    }
}

/// Accumulates one payload and the nested types already emitted into it.
#[derive(Default)]
struct PayloadBuilder {
    parts: Vec<String>,
    collected: IndexSet<String>,
}

impl PayloadBuilder {
    fn push(&mut self, definitions: &DefinitionSet, definition: &TypeDefinition) {
        self.parts.push(definition.sdl_body.clone());

        for nested in &definition.nested_type_names {
            let resolution =
                resolve_nested(definitions, nested, std::mem::take(&mut self.collected));
            self.collected = resolution.collected;
            if !resolution.sdl.is_empty() {
                debug!(
                    projection = %definition.qualified_name,
                    nested = ?resolution.newly_collected,
                    "appending nested types"
                );
                self.parts.push(resolution.sdl);
            }
        }
    }

    fn finish(self) -> String {
        self.parts.join("\n")
    }
}

/// Partitions projection names into create, update and remove batches.
///
/// Existing names outside `options` are left alone. An owned existing name is
/// removed when it has no local definition or is no longer a projection, and
/// updated otherwise. Local projections that are not registered yet are created.
pub fn plan(
    definitions: &DefinitionSet,
    existing: &[String],
    options: &PlanOptions,
) -> ReconciliationPlan {
    let owned: IndexSet<&str> = existing
        .iter()
        .map(String::as_str)
        .filter(|name| options.owns(name))
        .collect();

    let mut plan = ReconciliationPlan::default();
    let mut update = PayloadBuilder::default();
    let mut create = PayloadBuilder::default();

    for name in &owned {
        match definitions.get(*name) {
            Some(definition) if definition.is_projection => {
                plan.to_update.insert((*name).to_string());
                update.push(definitions, definition);
            }
            _ => {
                plan.to_remove.insert((*name).to_string());
            }
        }
    }

    for definition in definitions.values() {
        if definition.is_projection && !owned.contains(definition.qualified_name.as_str()) {
            plan.to_create.insert(definition.qualified_name.clone());
            create.push(definitions, definition);
        }
    }

    plan.create_payload = create.finish();
    plan.update_payload = update.finish();

    info!(
        create = plan.to_create.len(),
        update = plan.to_update.len(),
        remove = plan.to_remove.len(),
        "reconciliation planned"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use projections_core::Interner;
    use projections_schema::extract;
    use projections_syntax::parse;

    const SCHEMA: &str = r#"
        type Order @upsertOn { id: ID! status: Status }
        type Invoice @upsertOn { id: ID! lines: [LineItem!]! }
        type LineItem { sku: String! tax: Tax }
        type Tax { rate: Float }
        enum Status { OPEN CLOSED }
        type Unused { id: ID }
    "#;

    fn definitions(source: &str, options: &ExtractOptions) -> DefinitionSet {
        let interner = Interner::new();
        let result = parse(source, &interner);
        assert!(result.is_ok(), "{:?}", result.diagnostics);
        extract([&result.document], &interner, options).unwrap()
    }

    fn names(set: &IndexSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    fn existing(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_plan_partitions() {
        let defs = definitions(SCHEMA, &ExtractOptions::default());
        let plan = plan(&defs, &existing(&["Order", "OldReport"]), &PlanOptions::default());

        assert_eq!(names(&plan.to_update), vec!["Order"]);
        assert_eq!(names(&plan.to_create), vec!["Invoice"]);
        assert_eq!(names(&plan.to_remove), vec!["OldReport"]);

        assert_eq!(
            plan.update_payload,
            [&defs["Order"].sdl_body, &defs["Status"].sdl_body].map(String::as_str).join("\n")
        );
        assert_eq!(
            plan.create_payload,
            [
                &defs["Invoice"].sdl_body,
                &defs["LineItem"].sdl_body,
                &defs["Tax"].sdl_body,
            ]
            .map(String::as_str)
            .join("\n")
        );
        assert!(!plan.create_payload.contains("Unused"));
    }

    #[test]
    fn test_existing_non_projection_is_removed() {
        let defs = definitions(SCHEMA, &ExtractOptions::default());
        let plan = plan(&defs, &existing(&["LineItem"]), &PlanOptions::default());
        assert_eq!(names(&plan.to_remove), vec!["LineItem"]);
        assert_eq!(names(&plan.to_create), vec!["Order", "Invoice"]);
    }

    #[test]
    fn test_replanning_converges() {
        let defs = definitions(SCHEMA, &ExtractOptions::default());
        let options = PlanOptions::default();
        let first = plan(&defs, &existing(&["Order", "OldReport"]), &options);
        assert!(!first.is_converged());

        // The server state after the first plan was applied.
        let registered: Vec<String> = first
            .to_update
            .iter()
            .chain(&first.to_create)
            .cloned()
            .collect();

        let second = plan(&defs, &registered, &options);
        assert!(second.is_converged());
        assert!(second.to_create.is_empty());
        assert!(second.to_remove.is_empty());
        assert_eq!(names(&second.to_update), vec!["Order", "Invoice"]);

        let third = plan(&defs, &registered, &options);
        assert_eq!(second, third);
    }

    #[test]
    fn test_namespace_and_reserved_names_are_ignored() {
        let extract_options = ExtractOptions::default().with_namespace("Shop");
        let defs = definitions(SCHEMA, &extract_options);
        let options = PlanOptions::from(&extract_options);

        let plan = plan(
            &defs,
            &existing(&["ShopOrder", "ShopGone", "BillingInvoice", "FraymCrudType"]),
            &options,
        );
        assert_eq!(names(&plan.to_update), vec!["ShopOrder"]);
        assert_eq!(names(&plan.to_remove), vec!["ShopGone"]);
        assert_eq!(names(&plan.to_create), vec!["ShopInvoice"]);
    }

    #[test]
    fn test_shared_nested_types_emitted_once_per_payload() {
        let defs = definitions(
            r#"
            type A @upsertOn { x: Shared }
            type B @upsertOn { x: Shared, y: [Shared] }
            type Shared { a: A }
            "#,
            &ExtractOptions::default(),
        );
        let plan = plan(&defs, &[], &PlanOptions::default());
        assert_eq!(plan.create_payload.matches("type Shared").count(), 1);
        assert_eq!(plan.create_payload.matches("type A").count(), 1);
    }

    #[test]
    fn test_self_referencing_projection() {
        let defs = definitions(
            "type Node @upsertOn { parent: Node children: [Node!] }",
            &ExtractOptions::default(),
        );
        let plan = plan(&defs, &[], &PlanOptions::default());
        assert_eq!(
            plan.create_payload,
            "type Node @upsertOn {\n\tparent: Node\n\tchildren: [Node!]\n}"
        );
    }

    #[test]
    fn test_empty_plan() {
        let defs = definitions("type Plain { id: ID }", &ExtractOptions::default());
        let plan = plan(&defs, &[], &PlanOptions::default());
        assert!(plan.is_empty());
        assert!(plan.create_payload.is_empty());
    }
}
