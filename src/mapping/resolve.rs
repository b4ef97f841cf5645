use std::collections::{BTreeMap, HashSet};

use super::OrgRoleMapper;
use crate::models::{
    MappingConfiguration, OrgId, OrgRole, OrgRoleDecision, OrgTarget, top_role,
};

impl OrgRoleMapper {
    /// Map a user's external memberships to organization roles.
    ///
    /// Every matching rule contributes its role and the most privileged role
    /// per organization wins. Rules targeting `*` apply to every organization
    /// that currently exists and can only raise an organization's role. A
    /// `directly_mapped_role` raises every mapped organization to at least
    /// that role but never adds organizations by itself.
    ///
    /// When nothing matches, the default assignment applies. Access is denied
    /// when strict mapping has no role to assign, or when listing
    /// organizations for a `*` target fails.
    pub fn map_org_roles<S: AsRef<str>>(
        &self,
        mapping: &MappingConfiguration,
        external_orgs: &[S],
        directly_mapped_role: Option<OrgRole>,
    ) -> OrgRoleDecision {
        if mapping.is_empty() {
            return self.default_org_roles(mapping.is_strict(), directly_mapped_role);
        }

        let external_orgs: HashSet<&str> = external_orgs.iter().map(AsRef::as_ref).collect();
        let mut org_roles: BTreeMap<OrgId, OrgRole> = BTreeMap::new();
        let mut global_role: Option<OrgRole> = None;

        for rule in mapping.rules().iter().filter(|r| r.matches(&external_orgs)) {
            match rule.target {
                OrgTarget::Exact(org_id) => fold_role(&mut org_roles, org_id, rule.role),
                OrgTarget::Wildcard => global_role = Some(top_role(global_role, rule.role)),
            }
        }

        if let Some(global_role) = global_role {
            match self.directory.list_all() {
                Ok(all_orgs) => {
                    for org_id in all_orgs {
                        fold_role(&mut org_roles, org_id, global_role);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to list organizations for wildcard org mapping, denying access"
                    );
                    return OrgRoleDecision::Deny;
                }
            }
        }

        if org_roles.is_empty() {
            return self.default_org_roles(mapping.is_strict(), directly_mapped_role);
        }

        if let Some(direct) = directly_mapped_role {
            for role in org_roles.values_mut() {
                *role = top_role(Some(*role), direct);
            }
        }

        tracing::debug!(orgs = org_roles.len(), "Mapped external memberships to org roles");
        OrgRoleDecision::Assign(org_roles)
    }

    fn default_org_roles(
        &self,
        strict: bool,
        directly_mapped_role: Option<OrgRole>,
    ) -> OrgRoleDecision {
        let role = match directly_mapped_role {
            Some(role) => role,
            None if strict => {
                tracing::debug!("No org mapping matched and no role claim with strict role mapping, denying access");
                return OrgRoleDecision::Deny;
            }
            None => self.defaults.role,
        };

        OrgRoleDecision::Assign(BTreeMap::from([(self.defaults.org_id, role)]))
    }
}

fn fold_role(org_roles: &mut BTreeMap<OrgId, OrgRole>, org_id: OrgId, role: OrgRole) {
    let current = org_roles.get(&org_id).copied();
    org_roles.insert(org_id, top_role(current, role));
}
