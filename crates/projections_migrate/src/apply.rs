//! Executing a reconciliation plan against a management service.

use crate::error::{BoxError, MigrateError, MigrateResult, Partition};
use crate::management::ProjectionManagement;
use crate::plan::{plan, PlanOptions, ReconciliationPlan};
use projections_schema::DefinitionSet;
use tracing::info;

/// Names written by a successful [`apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl ApplyReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Fetches the registered names and plans against them.
pub async fn fetch_plan<M>(
    definitions: &DefinitionSet,
    management: &M,
    options: &PlanOptions,
) -> MigrateResult<ReconciliationPlan>
where
    M: ProjectionManagement + ?Sized,
{
    let existing = management
        .get_all()
        .await
        .map_err(MigrateError::FetchExisting)?;
    info!(count = existing.len(), "fetched existing projections");
    Ok(plan(definitions, &existing, options))
}

/// Applies a plan: create, then update, then remove.
///
/// Empty partitions are skipped. The first failing partition aborts the run and
/// is reported with the partitions completed before it. Nothing is retried.
pub async fn apply<M>(plan: &ReconciliationPlan, management: &M) -> MigrateResult<ApplyReport>
where
    M: ProjectionManagement + ?Sized,
{
    let mut report = ApplyReport::default();
    let mut completed = Vec::new();

    if !plan.to_create.is_empty() {
        report.created = plan.to_create.iter().cloned().collect();
        info!(count = report.created.len(), names = ?report.created, "creating projections");
        management
            .create(&plan.create_payload)
            .await
            .map_err(failed(Partition::Create, &completed))?;
        completed.push(Partition::Create);
    }

    if !plan.to_update.is_empty() {
        report.updated = plan.to_update.iter().cloned().collect();
        info!(count = report.updated.len(), names = ?report.updated, "updating projections");
        management
            .update(&plan.update_payload)
            .await
            .map_err(failed(Partition::Update, &completed))?;
        completed.push(Partition::Update);
    }

    if !plan.to_remove.is_empty() {
        report.removed = plan.to_remove.iter().cloned().collect();
        info!(count = report.removed.len(), names = ?report.removed, "removing projections");
        management
            .remove(&report.removed)
            .await
            .map_err(failed(Partition::Remove, &completed))?;
    }

    Ok(report)
}

fn failed(partition: Partition, completed: &[Partition]) -> impl FnOnce(BoxError) -> MigrateError {
    let completed = completed.to_vec();
    move |source| MigrateError::RemoteOperation {
        partition,
        completed,
        source,
    }
}

/// Fetches, plans and applies in one run.
pub async fn migrate<M>(
    definitions: &DefinitionSet,
    management: &M,
    options: &PlanOptions,
) -> MigrateResult<(ReconciliationPlan, ApplyReport)>
where
    M: ProjectionManagement + ?Sized,
{
    let plan = fetch_plan(definitions, management, options).await?;
    let report = apply(&plan, management).await?;
    Ok((plan, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use indexmap::IndexSet;
    use projections_schema::TypeDefinition;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        GetAll,
        Create(String),
        Update(String),
        Remove(Vec<String>),
    }

    #[derive(Default)]
    struct Recording {
        existing: Vec<String>,
        fail_on: Option<Partition>,
        calls: Mutex<Vec<Call>>,
    }

    impl Recording {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn outcome(&self, partition: Partition) -> Result<(), BoxError> {
            if self.fail_on == Some(partition) {
                return Err(format!("{partition} rejected").into());
            }
            Ok(())
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProjectionManagement for Recording {
        async fn get_all(&self) -> Result<Vec<String>, BoxError> {
            self.record(Call::GetAll);
            Ok(self.existing.clone())
        }

        async fn create(&self, schema: &str) -> Result<(), BoxError> {
            self.record(Call::Create(schema.to_string()));
            self.outcome(Partition::Create)
        }

        async fn update(&self, schema: &str) -> Result<(), BoxError> {
            self.record(Call::Update(schema.to_string()));
            self.outcome(Partition::Update)
        }

        async fn remove(&self, names: &[String]) -> Result<(), BoxError> {
            self.record(Call::Remove(names.to_vec()));
            self.outcome(Partition::Remove)
        }
    }

    fn projection(name: &str) -> (String, TypeDefinition) {
        (
            name.to_string(),
            TypeDefinition {
                qualified_name: name.to_string(),
                is_projection: true,
                sdl_body: format!("type {name} @upsertOn"),
                nested_type_names: IndexSet::new(),
            },
        )
    }

    fn shop() -> DefinitionSet {
        [projection("Order"), projection("Invoice")].into_iter().collect()
    }

    fn recording(existing: &[&str], fail_on: Option<Partition>) -> Recording {
        Recording {
            existing: existing.iter().map(|n| (*n).to_string()).collect(),
            fail_on,
            ..Recording::default()
        }
    }

    #[tokio::test]
    async fn test_apply_order() {
        let management = recording(&["Order", "OldReport"], None);
        let (plan, report) = migrate(&shop(), &management, &PlanOptions::default())
            .await
            .unwrap();

        assert_eq!(
            management.calls(),
            vec![
                Call::GetAll,
                Call::Create("type Invoice @upsertOn".to_string()),
                Call::Update("type Order @upsertOn".to_string()),
                Call::Remove(vec!["OldReport".to_string()]),
            ]
        );
        assert_eq!(report.created, vec!["Invoice"]);
        assert_eq!(report.updated, vec!["Order"]);
        assert_eq!(report.removed, vec!["OldReport"]);
        assert!(!plan.is_empty());
    }

    #[tokio::test]
    async fn test_apply_skips_empty_partitions() {
        let management = recording(&[], None);
        let definitions: DefinitionSet = [projection("Order")].into_iter().collect();
        migrate(&definitions, &management, &PlanOptions::default())
            .await
            .unwrap();
        assert_eq!(
            management.calls(),
            vec![Call::GetAll, Call::Create("type Order @upsertOn".to_string())]
        );

        let idle = recording(&[], None);
        let report = apply(&ReconciliationPlan::default(), &idle).await.unwrap();
        assert!(report.is_empty());
        assert!(idle.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_partition_stops_run() {
        let management = recording(&["Order", "OldReport"], Some(Partition::Update));
        let err = migrate(&shop(), &management, &PlanOptions::default())
            .await
            .unwrap_err();

        match err {
            MigrateError::RemoteOperation {
                partition,
                completed,
                source,
            } => {
                assert_eq!(partition, Partition::Update);
                assert_eq!(completed, vec![Partition::Create]);
                assert_eq!(source.to_string(), "update rejected");
            }
            other => panic!("expected remote operation error, got {other:?}"),
        }

        // Remove was never attempted, and nothing was retried.
        let calls = management.calls();
        assert_eq!(calls.len(), 3);
        assert!(!calls.iter().any(|c| matches!(c, Call::Remove(_))));
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        struct Unreachable;

        #[async_trait]
        impl ProjectionManagement for Unreachable {
            async fn get_all(&self) -> Result<Vec<String>, BoxError> {
                Err("connection refused".into())
            }
            async fn create(&self, _: &str) -> Result<(), BoxError> {
                unreachable!()
            }
            async fn update(&self, _: &str) -> Result<(), BoxError> {
                unreachable!()
            }
            async fn remove(&self, _: &[String]) -> Result<(), BoxError> {
                unreachable!()
            }
        }

        let err = migrate(&shop(), &Unreachable, &PlanOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MigrateError::FetchExisting(_)));
    }

    #[tokio::test]
    async fn test_rerun_after_success_converges() {
        let management = recording(&["Order", "OldReport"], None);
        let (first, _) = migrate(&shop(), &management, &PlanOptions::default())
            .await
            .unwrap();

        let after = recording(&["Invoice", "Order"], None);
        let second = fetch_plan(&shop(), &after, &PlanOptions::default())
            .await
            .unwrap();
        assert!(!first.is_converged());
        assert!(second.is_converged());
    }

    #[tokio::test]
    async fn test_dyn_management() {
        let management: Box<dyn ProjectionManagement> = Box::new(recording(&["Order"], None));
        let plan = fetch_plan(&shop(), management.as_ref(), &PlanOptions::default())
            .await
            .unwrap();
        assert_eq!(plan.to_create.len(), 1);
    }
}
