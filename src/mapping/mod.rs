//! Organization role mapping.
//!
//! Connectors hand the mapper the groups (or organizations) a user belongs to
//! in the identity provider, plus an optional role taken directly from a
//! claim. The mapper turns them into roles in internal organizations.
//!
//! Mappings are configured per connector as a list of entries:
//!
//! ```text
//! ExternalKey:Org[:Role]
//! ```
//!
//! - `ExternalKey` is a group name as reported by the identity provider, or
//!   `*` to match every user.
//! - `Org` is a numeric organization ID, an organization name, or `*` for
//!   every organization that exists.
//! - `Role` is `None`, `Viewer`, `Editor` or `Admin` and defaults to `Viewer`.
//!
//! A backslash escapes a colon that belongs to a name (`Org\:East`).
//!
//! With strict role mapping enabled, any invalid entry rejects the whole
//! mapping and users with no evaluable role are denied instead of receiving
//! the default assignment.

mod error;
mod parse;
mod resolve;
#[cfg(test)]
pub(crate) mod test_utils;

use std::sync::Arc;

pub use error::MappingEntryError;
pub use parse::split_org_mapping;

use crate::{directory::OrgDirectory, models::DefaultAssignment};

/// Parses org mapping settings and evaluates them for users.
#[derive(Clone)]
pub struct OrgRoleMapper {
    directory: Arc<dyn OrgDirectory>,
    defaults: DefaultAssignment,
}

impl OrgRoleMapper {
    pub fn new(directory: Arc<dyn OrgDirectory>, defaults: DefaultAssignment) -> Self {
        Self {
            directory,
            defaults,
        }
    }

    pub fn defaults(&self) -> DefaultAssignment {
        self.defaults
    }
}

impl std::fmt::Debug for OrgRoleMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrgRoleMapper")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
