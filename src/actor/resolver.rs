//! Name resolution
//!
//! Names are expected to be unique per resource type but the API does not
//! enforce it, so a listing is reduced to exactly one resource or an error.

use super::{Actor, ActorError, Outcome};
use crate::api::{Query, Resource, ResourceKind};

impl Actor {
    /// Look up the single resource of `kind` called `name`
    ///
    /// Issues exactly one listing call with a single name-equality filter.
    pub async fn get_resource_by_name(&self, kind: ResourceKind, name: &str) -> Outcome<Resource> {
        tracing::debug!("Resolving {} '{}'", kind, name);

        let reply = self
            .client
            .list_resources(kind, &[Query::name_equals(name)])
            .await;

        let result = reply
            .result
            .map_err(ActorError::from)
            .and_then(|resources| select_unique(kind, name, resources));

        Outcome::new(result, reply.warnings)
    }
}

/// Reduce a listing to its only element
///
/// GUIDs of an ambiguous match are reported in listing order.
pub fn select_unique(
    kind: ResourceKind,
    name: &str,
    mut resources: Vec<Resource>,
) -> Result<Resource, ActorError> {
    match resources.len() {
        0 => Err(ActorError::NotFound {
            kind,
            name: name.to_string(),
        }),
        1 => Ok(resources.remove(0)),
        _ => Err(ActorError::AmbiguousMatch {
            kind,
            name: name.to_string(),
            guids: resources.into_iter().map(|r| r.guid).collect(),
        }),
    }
}
