//! Orchestration layer between the CLI and the control-plane API
//!
//! The actor turns user intents ("delete organization X") into sequences of
//! transport calls, resolving names to GUIDs, driving asynchronous jobs to
//! completion and collecting every warning along the way.
//!
//! # Module Structure
//!
//! - [`error`] - [`ActorError`] taxonomy
//! - [`resolver`] - Name to unique resource resolution for any [`ResourceKind`]
//! - [`job`] - Job polling against a deadline
//! - [`delete`] - Resolve, delete, then poll the deletion job
//! - [`organization`] / [`space`] - Per-resource-type operations
//!
//! Steps of one operation run strictly in sequence and the first error
//! short-circuits the rest. Warnings collected up to that point are still
//! returned in [`Outcome::warnings`].
//!
//! [`ResourceKind`]: crate::api::ResourceKind

pub mod delete;
pub mod error;
pub mod job;
pub mod organization;
pub mod resolver;
pub mod space;

pub use error::ActorError;

use crate::api::CloudControllerClient;
use crate::config::ConfigProvider;
use crate::warnings::Warnings;
use std::sync::Arc;

/// Result of an orchestrated operation and every warning it produced
#[derive(Debug)]
pub struct Outcome<T> {
    pub result: Result<T, ActorError>,
    pub warnings: Warnings,
}

impl<T> Outcome<T> {
    pub fn new(result: Result<T, ActorError>, warnings: Warnings) -> Self {
        Self { result, warnings }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Move this operation's warnings into `warnings` and hand back the result
    pub fn merge_into(self, warnings: &mut Warnings) -> Result<T, ActorError> {
        warnings.append(self.warnings);
        self.result
    }
}

/// Entry point for CLI commands
#[derive(Clone)]
pub struct Actor {
    client: Arc<dyn CloudControllerClient>,
    config: Arc<dyn ConfigProvider + Send + Sync>,
}

impl Actor {
    pub fn new(
        client: Arc<dyn CloudControllerClient>,
        config: Arc<dyn ConfigProvider + Send + Sync>,
    ) -> Self {
        Self { client, config }
    }
}
