use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{
    error::{DirectoryError, DirectoryResult},
    traits::OrgDirectory,
};
use crate::{config::OrganizationConfig, models::OrgId};

/// Organization directory held in memory.
///
/// Organizations can be added and removed at runtime. Mapping configurations
/// parsed earlier keep the IDs they resolved at parse time.
#[derive(Debug, Default)]
pub struct InMemoryOrgDirectory {
    orgs: RwLock<BTreeMap<OrgId, String>>,
}

impl InMemoryOrgDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_orgs<I, S>(orgs: I) -> Self
    where
        I: IntoIterator<Item = (OrgId, S)>,
        S: Into<String>,
    {
        let orgs = orgs
            .into_iter()
            .map(|(id, name)| (id, name.into()))
            .collect();
        Self {
            orgs: RwLock::new(orgs),
        }
    }

    /// Build the directory from the `[[organizations]]` config section.
    pub fn from_config(orgs: &[OrganizationConfig]) -> Self {
        Self::from_orgs(orgs.iter().map(|org| (org.id, org.name.clone())))
    }

    /// Add or rename an organization.
    pub fn insert(&self, id: OrgId, name: impl Into<String>) {
        self.orgs.write().insert(id, name.into());
    }

    /// Remove an organization, returning its name if it existed.
    pub fn remove(&self, id: OrgId) -> Option<String> {
        self.orgs.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.orgs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orgs.read().is_empty()
    }
}

impl OrgDirectory for InMemoryOrgDirectory {
    fn get_by_name(&self, name: &str) -> DirectoryResult<OrgId> {
        self.orgs
            .read()
            .iter()
            .find(|(_, org_name)| org_name.as_str() == name)
            .map(|(id, _)| *id)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))
    }

    fn list_all(&self) -> DirectoryResult<Vec<OrgId>> {
        Ok(self.orgs.read().keys().copied().collect())
    }
}
