//! HTTP client for the projection management API.
//!
//! [`HttpManagementClient`] talks to `{server}/management/projections` and
//! implements [`ProjectionManagement`](projections_migrate::ProjectionManagement)
//! so it can drive a reconciliation run.

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpManagementClient;
pub use config::{ManagementConfig, DEFAULT_SERVER_ADDRESS, PROJECTIONS_PATH};
pub use error::{ManagementError, ManagementResult};
