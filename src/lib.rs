//! Maps identity-provider memberships to organization roles.
//!
//! Connectors parse their org mapping settings once with
//! [`OrgRoleMapper::parse_org_mapping_settings`] and evaluate the resulting
//! [`MappingConfiguration`] for every login with
//! [`OrgRoleMapper::map_org_roles`].

pub mod config;
pub mod directory;
pub mod mapping;
pub mod models;
#[cfg(feature = "cli")]
pub mod observability;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, OrgMapConfig};
pub use directory::{DirectoryError, DirectoryResult, InMemoryOrgDirectory, OrgDirectory};
pub use mapping::{MappingEntryError, OrgRoleMapper};
pub use models::{
    DefaultAssignment, MappingConfiguration, OrgId, OrgIdentifier, OrgRole, OrgRoleDecision,
    OrgRoleMapping, OrgTarget, top_role,
};
