use crate::api::ResourceKind;
use std::time::Duration;
use thiserror::Error;

/// Failure of an orchestrated operation
///
/// `NotFound` and `AmbiguousMatch` are derived from a listing; everything
/// else originates with the transport or the job and is passed through.
#[derive(Error, Debug)]
pub enum ActorError {
    #[error("{kind} '{name}' not found.")]
    NotFound { kind: ResourceKind, name: String },

    #[error("{kind} name '{name}' matches multiple GUIDs: {}", .guids.join(", "))]
    AmbiguousMatch {
        kind: ResourceKind,
        name: String,
        guids: Vec<String>,
    },

    /// The job reached the failed state; the message is the server's description
    #[error("{message}")]
    JobFailed { job_guid: String, message: String },

    #[error("Timed out after {elapsed:?} waiting for job {job_guid}")]
    PollingTimeout { job_guid: String, elapsed: Duration },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
