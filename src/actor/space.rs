//! Space actions

use super::{Actor, Outcome};
use crate::api::{Resource, ResourceKind};

impl Actor {
    /// Return the space with the given name
    ///
    /// Space names are only unique within an organization, so a name shared
    /// across organizations resolves to an ambiguous match.
    pub async fn get_space_by_name(&self, name: &str) -> Outcome<Resource> {
        self.get_resource_by_name(ResourceKind::Space, name).await
    }

    pub async fn delete_space(&self, name: &str) -> Outcome<()> {
        self.delete_resource_by_name(ResourceKind::Space, name).await
    }
}
