//! Organization directory doubles for mapping tests.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    directory::{DirectoryError, DirectoryResult, InMemoryOrgDirectory, OrgDirectory},
    mapping::OrgRoleMapper,
    models::{DefaultAssignment, OrgId},
};

/// Directory that counts calls and can be told to fail listing.
pub struct FakeOrgDirectory {
    inner: InMemoryOrgDirectory,
    fail_list: bool,
    pub name_lookups: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeOrgDirectory {
    pub fn with_orgs(orgs: &[(OrgId, &str)]) -> Self {
        Self {
            inner: InMemoryOrgDirectory::from_orgs(orgs.iter().map(|(id, name)| (*id, *name))),
            fail_list: false,
            name_lookups: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, id: OrgId, name: &str) {
        self.inner.insert(id, name);
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }
}

impl OrgDirectory for FakeOrgDirectory {
    fn get_by_name(&self, name: &str) -> DirectoryResult<OrgId> {
        self.name_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_name(name)
    }

    fn list_all(&self) -> DirectoryResult<Vec<OrgId>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(DirectoryError::Unavailable("connection refused".to_string()));
        }
        self.inner.list_all()
    }
}

/// Directory with orgs 1 to 5, where 4 and 5 have the names used in tests.
pub fn standard_directory() -> Arc<FakeOrgDirectory> {
    Arc::new(FakeOrgDirectory::with_orgs(&[
        (1, "Main Org."),
        (2, "Org2"),
        (3, "Org3"),
        (4, "Org4"),
        (5, "Org5"),
    ]))
}

pub fn mapper_with(directory: Arc<FakeOrgDirectory>) -> OrgRoleMapper {
    OrgRoleMapper::new(directory, DefaultAssignment::default())
}

pub fn entries(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
