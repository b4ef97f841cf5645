use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role a user holds within an organization.
///
/// Variants are declared in privilege order, so the derived `Ord` is the
/// privilege ordering: `None < Viewer < Editor < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub enum OrgRole {
    None,
    Viewer,
    Editor,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid role '{0}': expected one of None, Viewer, Editor, Admin")]
pub struct InvalidRole(pub String);

impl OrgRole {
    pub const ALL: [OrgRole; 4] = [
        OrgRole::None,
        OrgRole::Viewer,
        OrgRole::Editor,
        OrgRole::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::None => "None",
            OrgRole::Viewer => "Viewer",
            OrgRole::Editor => "Editor",
            OrgRole::Admin => "Admin",
        }
    }

    /// Whether this role grants at least the privileges of `other`.
    pub fn includes(&self, other: OrgRole) -> bool {
        *self >= other
    }

    /// The more privileged of two roles.
    pub fn top(self, other: OrgRole) -> OrgRole {
        self.max(other)
    }

    /// Convert a raw role claim into a role.
    ///
    /// Connectors extract the role claim as a string; an empty or unknown
    /// value means "no directly-mapped role".
    pub fn parse_claim(raw: &str) -> Option<OrgRole> {
        raw.parse().ok()
    }
}

impl FromStr for OrgRole {
    type Err = InvalidRole;

    /// Role names are matched case-sensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrgRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| InvalidRole(s.to_string()))
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold `other` into an accumulator that may not have been set yet.
///
/// An unset accumulator takes `other` unconditionally; otherwise the more
/// privileged role wins. Folding any sequence of roles in any order yields
/// their maximum.
pub fn top_role(current: Option<OrgRole>, other: OrgRole) -> OrgRole {
    match current {
        Some(current) => current.top(other),
        None => other,
    }
}
