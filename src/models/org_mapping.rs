use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::OrgRole;

/// Internal organization identifier.
pub type OrgId = i64;

/// Organization used by the default assignment when nothing else is configured.
pub const DEFAULT_ORG_ID: OrgId = 1;

/// Wildcard accepted both as an external key and as an org identifier.
pub const WILDCARD: &str = "*";

/// Organization identifier as written in a mapping entry, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgIdentifier {
    /// Numeric organization ID
    Id(OrgId),
    /// `*`: every organization that exists
    Wildcard,
    /// Display name, resolved through the organization directory
    Name(String),
}

impl OrgIdentifier {
    pub fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            return OrgIdentifier::Wildcard;
        }
        match raw.parse::<OrgId>() {
            Ok(id) => OrgIdentifier::Id(id),
            Err(_) => OrgIdentifier::Name(raw.to_string()),
        }
    }
}

/// Resolved destination of a mapping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "org_id")]
pub enum OrgTarget {
    Exact(OrgId),
    Wildcard,
}

/// One parsed mapping rule: members of `external_key` get `role` in `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRoleMapping {
    /// External group or organization name as reported by the identity provider.
    /// `*` matches every user.
    pub external_key: String,
    pub target: OrgTarget,
    pub role: OrgRole,
}

impl OrgRoleMapping {
    /// Whether this rule applies to a user with the given external memberships.
    pub fn matches(&self, external_orgs: &HashSet<&str>) -> bool {
        self.external_key == WILDCARD || external_orgs.contains(self.external_key.as_str())
    }
}

/// Parsed, validated org mapping for one connector.
///
/// Built from settings on every load and immutable afterwards. Organization
/// names are resolved at parse time, so a configuration reflects the
/// directory as it was then; rebuild it when organizations change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingConfiguration {
    rules: Vec<OrgRoleMapping>,
    strict: bool,
}

impl MappingConfiguration {
    pub(crate) fn new(rules: Vec<OrgRoleMapping>, strict: bool) -> Self {
        Self { rules, strict }
    }

    /// Empty configuration used when strict parsing rejects the settings.
    pub(crate) fn rejected(strict: bool) -> Self {
        Self::new(Vec::new(), strict)
    }

    pub fn rules(&self) -> &[OrgRoleMapping] {
        &self.rules
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Fallback assignment applied when no mapping produces a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAssignment {
    pub org_id: OrgId,
    pub role: OrgRole,
}

impl Default for DefaultAssignment {
    fn default() -> Self {
        Self {
            org_id: DEFAULT_ORG_ID,
            role: OrgRole::Viewer,
        }
    }
}

/// Outcome of mapping a user's external memberships to organization roles.
///
/// `Deny` means no access must be granted. It is not the same as an
/// assignment that happens to be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "roles")]
pub enum OrgRoleDecision {
    Assign(BTreeMap<OrgId, OrgRole>),
    Deny,
}

impl OrgRoleDecision {
    pub fn is_deny(&self) -> bool {
        matches!(self, OrgRoleDecision::Deny)
    }

    /// Assigned roles, or `None` when access is denied.
    pub fn roles(&self) -> Option<&BTreeMap<OrgId, OrgRole>> {
        match self {
            OrgRoleDecision::Assign(roles) => Some(roles),
            OrgRoleDecision::Deny => None,
        }
    }

    pub fn into_roles(self) -> Option<BTreeMap<OrgId, OrgRole>> {
        match self {
            OrgRoleDecision::Assign(roles) => Some(roles),
            OrgRoleDecision::Deny => None,
        }
    }
}
