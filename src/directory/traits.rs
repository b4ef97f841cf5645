use std::sync::Arc;

use super::error::DirectoryResult;
use crate::models::OrgId;

/// Lookup port onto the set of organizations that exist.
///
/// Implementations are usually backed by a database. Calls are synchronous
/// and the mapper never retries them; any retry or timeout policy belongs to
/// the implementation.
pub trait OrgDirectory: Send + Sync {
    /// Resolve an organization display name to its ID.
    fn get_by_name(&self, name: &str) -> DirectoryResult<OrgId>;

    /// IDs of every organization that currently exists.
    fn list_all(&self) -> DirectoryResult<Vec<OrgId>>;
}

impl<T: OrgDirectory + ?Sized> OrgDirectory for Arc<T> {
    fn get_by_name(&self, name: &str) -> DirectoryResult<OrgId> {
        (**self).get_by_name(name)
    }

    fn list_all(&self) -> DirectoryResult<Vec<OrgId>> {
        (**self).list_all()
    }
}
