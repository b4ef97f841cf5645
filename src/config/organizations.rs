use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ConfigError;
use crate::models::{DEFAULT_ORG_ID, DefaultAssignment, OrgId, OrgRole};

/// Default organization assignment for users no mapping applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct AutoAssignConfig {
    /// Assign users to `org_id`. When disabled, org 1 is used.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Organization to assign users to.
    #[serde(default = "default_org_id")]
    pub org_id: OrgId,

    /// Role users get in the default organization.
    #[serde(default = "default_role")]
    pub role: OrgRole,
}

impl Default for AutoAssignConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            org_id: DEFAULT_ORG_ID,
            role: OrgRole::Viewer,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_org_id() -> OrgId {
    DEFAULT_ORG_ID
}

fn default_role() -> OrgRole {
    OrgRole::Viewer
}

impl AutoAssignConfig {
    /// The fallback assignment used by the mapper.
    ///
    /// A disabled auto-assignment or a non-positive `org_id` falls back to
    /// org 1.
    pub fn default_assignment(&self) -> DefaultAssignment {
        let org_id = if self.enabled && self.org_id > 0 {
            self.org_id
        } else {
            DEFAULT_ORG_ID
        };
        DefaultAssignment {
            org_id,
            role: self.role,
        }
    }
}

/// An organization served by the in-memory directory.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct OrganizationConfig {
    /// Organization ID
    #[validate(range(min = 1))]
    pub id: OrgId,
    /// Display name, as referenced by org mapping entries
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Validate the `[[organizations]]` section: each entry on its own, then
/// uniqueness of IDs and names.
pub(super) fn validate_organizations(orgs: &[OrganizationConfig]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for org in orgs {
        org.validate().map_err(|e| {
            ConfigError::Validation(format!("organization '{}' (id {}): {}", org.name, org.id, e))
        })?;
        if !ids.insert(org.id) {
            return Err(ConfigError::Validation(format!(
                "Duplicate organization id {}",
                org.id
            )));
        }
        if !names.insert(org.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate organization name '{}'",
                org.name
            )));
        }
    }

    Ok(())
}
