//! Job polling
//!
//! Asynchronous operations hand back a job that is polled until it finishes,
//! fails, or the deadline passes. The deadline is checked before every poll,
//! so an elapsed (or zero) budget never issues another request.

use super::{Actor, ActorError, Outcome};
use crate::api::{Job, JobStatus};
use crate::warnings::Warnings;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Lower bound on the pause between polls
pub const MIN_POLLING_INTERVAL: Duration = Duration::from_millis(100);

impl Actor {
    /// Poll `job` until it reaches a terminal state or `deadline` elapses
    pub async fn poll_job(&self, job: &Job, deadline: Duration) -> Outcome<()> {
        let mut warnings = Warnings::new();
        let result = self.poll_until_terminal(job, deadline, &mut warnings).await;
        Outcome::new(result, warnings)
    }

    async fn poll_until_terminal(
        &self,
        job: &Job,
        deadline: Duration,
        warnings: &mut Warnings,
    ) -> Result<(), ActorError> {
        let interval = self.config.polling_interval().max(MIN_POLLING_INTERVAL);
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            let elapsed = started.elapsed();
            if elapsed >= deadline {
                tracing::warn!(
                    "Job {} not finished after {:?} ({} polls)",
                    job.guid,
                    elapsed,
                    attempt
                );
                return Err(ActorError::PollingTimeout {
                    job_guid: job.guid.clone(),
                    elapsed,
                });
            }

            attempt += 1;
            let current = self.client.get_job(&job.guid).await.merge_into(warnings)?;
            tracing::debug!("Job {} poll {}: {}", job.guid, attempt, current.status);

            match current.status {
                JobStatus::Finished => return Ok(()),
                JobStatus::Failed => {
                    let message = current
                        .error
                        .unwrap_or_else(|| format!("Job {} failed", job.guid));
                    tracing::warn!("Job {} failed: {}", job.guid, message);
                    return Err(ActorError::JobFailed {
                        job_guid: job.guid.clone(),
                        message,
                    });
                },
                JobStatus::Queued | JobStatus::Running => {},
            }

            let remaining = deadline.saturating_sub(started.elapsed());
            sleep(interval.min(remaining)).await;
        }
    }
}
