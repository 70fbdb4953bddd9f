//! The remote side of a reconciliation run.

use crate::error::BoxError;
use async_trait::async_trait;

/// Operations of a projection management service.
#[async_trait]
pub trait ProjectionManagement: Send + Sync {
    /// Every registered projection name, including other namespaces.
    async fn get_all(&self) -> Result<Vec<String>, BoxError>;

    /// Registers the projections of an SDL document.
    async fn create(&self, schema: &str) -> Result<(), BoxError>;

    /// Replaces the projections of an SDL document.
    async fn update(&self, schema: &str) -> Result<(), BoxError>;

    async fn remove(&self, names: &[String]) -> Result<(), BoxError>;
}
