//! Reconciliation errors.

use projections_schema::SchemaError;
use std::fmt;
use thiserror::Error;

/// Error returned by a management collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One of the three write batches of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Create,
    Update,
    Remove,
}

impl Partition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to fetch existing projections")]
    FetchExisting(#[source] BoxError),

    /// A write batch failed. Earlier partitions in `completed` were applied,
    /// later ones were not attempted.
    #[error("failed to {partition} projections")]
    RemoteOperation {
        partition: Partition,
        completed: Vec<Partition>,
        #[source]
        source: BoxError,
    },
}

pub type MigrateResult<T> = Result<T, MigrateError>;
