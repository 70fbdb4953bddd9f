//! Reconciliation of local projections against a management service.
//!
//! [`plan`] diffs a [`DefinitionSet`](projections_schema::DefinitionSet)
//! against the names the service already knows, [`apply`] pushes the resulting
//! create, update and remove batches through a [`ProjectionManagement`].

pub mod apply;
pub mod error;
pub mod management;
pub mod plan;

pub use apply::{apply, fetch_plan, migrate, ApplyReport};
pub use error::{BoxError, MigrateError, MigrateResult, Partition};
pub use management::ProjectionManagement;
pub use plan::{plan, PlanOptions, ReconciliationPlan};
