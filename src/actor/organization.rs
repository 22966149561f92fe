//! Organization actions

use super::{Actor, Outcome};
use crate::api::{Resource, ResourceKind};

impl Actor {
    /// Return the organization with the given name
    pub async fn get_organization_by_name(&self, name: &str) -> Outcome<Resource> {
        self.get_resource_by_name(ResourceKind::Organization, name).await
    }

    /// Delete the organization with the given name, recursively
    pub async fn delete_organization(&self, name: &str) -> Outcome<()> {
        self.delete_resource_by_name(ResourceKind::Organization, name).await
    }
}
