//! Resolve-by-name, delete, then wait for the deletion job

use super::{Actor, ActorError, Outcome};
use crate::api::ResourceKind;
use crate::warnings::Warnings;
use std::time::Duration;

impl Actor {
    /// Delete the resource of `kind` called `name` and wait for the job to finish
    ///
    /// Warnings are ordered: resolution, delete call, then each poll.
    pub async fn delete_resource_by_name(&self, kind: ResourceKind, name: &str) -> Outcome<()> {
        let deadline = self.config.polling_deadline();
        let mut warnings = Warnings::new();
        let result = self.delete_steps(kind, name, deadline, &mut warnings).await;

        match &result {
            Ok(()) => tracing::info!("Deleted {} '{}'", kind, name),
            Err(e) => tracing::debug!("Delete of {} '{}' failed: {}", kind, name, e),
        }
        Outcome::new(result, warnings)
    }

    async fn delete_steps(
        &self,
        kind: ResourceKind,
        name: &str,
        deadline: Duration,
        warnings: &mut Warnings,
    ) -> Result<(), ActorError> {
        let resource = self.get_resource_by_name(kind, name).await.merge_into(warnings)?;

        let job = self
            .client
            .delete_resource(kind, &resource.guid)
            .await
            .merge_into(warnings)?;

        if !job.has_handle() {
            tracing::debug!("{} '{}' deleted synchronously", kind, name);
            return Ok(());
        }

        self.poll_job(&job, deadline).await.merge_into(warnings)
    }
}
