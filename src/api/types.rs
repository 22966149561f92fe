//! Control-plane wire types
//!
//! Listings and jobs arrive wrapped in a `metadata`/`entity` envelope; the
//! types here flatten that envelope into what the actor works with.

use crate::warnings::Warnings;
use serde::Deserialize;
use std::fmt;

/// Resource collections the actor knows how to resolve and delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Organization,
    Space,
}

impl ResourceKind {
    /// Collection segment in the API path, e.g. `/v2/organizations`
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "organizations",
            ResourceKind::Space => "spaces",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Organization => "Organization",
            ResourceKind::Space => "Space",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Snapshot of a remote resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "ResourceEnvelope")]
pub struct Resource {
    pub guid: String,
    pub name: String,
}

impl Resource {
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
struct ResourceEnvelope {
    metadata: Metadata,
    #[serde(default)]
    entity: ResourceEntity,
}

#[derive(Deserialize)]
struct Metadata {
    guid: String,
}

#[derive(Deserialize, Default)]
struct ResourceEntity {
    #[serde(default)]
    name: String,
}

impl From<ResourceEnvelope> for Resource {
    fn from(envelope: ResourceEnvelope) -> Self {
        Self {
            guid: envelope.metadata.guid,
            name: envelope.entity.name,
        }
    }
}

/// Server-side job state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Running,
    Finished,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Finished => "finished",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Handle on an asynchronous server-side task
///
/// An empty `guid` means the call completed synchronously and there is
/// nothing to poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "JobEnvelope")]
pub struct Job {
    pub guid: String,
    pub status: JobStatus,
    /// Failure description supplied by the server for failed jobs
    pub error: Option<String>,
}

impl Job {
    pub fn new(guid: impl Into<String>, status: JobStatus) -> Self {
        Self {
            guid: guid.into(),
            status,
            error: None,
        }
    }

    pub fn failed(guid: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            status: JobStatus::Failed,
            error: Some(description.into()),
        }
    }

    pub fn has_handle(&self) -> bool {
        !self.guid.is_empty()
    }
}

#[derive(Deserialize)]
struct JobEnvelope {
    metadata: Metadata,
    entity: JobEntity,
}

#[derive(Deserialize)]
struct JobEntity {
    status: JobStatus,
    #[serde(default)]
    error_details: Option<JobErrorDetails>,
}

#[derive(Deserialize)]
struct JobErrorDetails {
    #[serde(default)]
    description: String,
}

impl From<JobEnvelope> for Job {
    fn from(envelope: JobEnvelope) -> Self {
        Self {
            guid: envelope.metadata.guid,
            status: envelope.entity.status,
            error: envelope.entity.error_details.map(|d| d.description),
        }
    }
}

/// Result of one transport call plus the warnings it carried
///
/// Warnings are populated whether or not `result` is an error.
#[derive(Debug)]
pub struct Reply<T> {
    pub result: anyhow::Result<T>,
    pub warnings: Warnings,
}

impl<T> Reply<T> {
    pub fn ok(value: T, warnings: Warnings) -> Self {
        Self {
            result: Ok(value),
            warnings,
        }
    }

    pub fn err(error: anyhow::Error, warnings: Warnings) -> Self {
        Self {
            result: Err(error),
            warnings,
        }
    }

    /// Move this call's warnings into `warnings` and hand back the result
    pub fn merge_into(self, warnings: &mut Warnings) -> anyhow::Result<T> {
        warnings.append(self.warnings);
        self.result
    }
}
