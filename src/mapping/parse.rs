use std::collections::{HashMap, hash_map::Entry};

use super::{OrgRoleMapper, error::MappingEntryError};
use crate::models::{MappingConfiguration, OrgIdentifier, OrgRole, OrgRoleMapping, OrgTarget};

/// Split a mapping entry on unescaped colons.
///
/// `\:` produces a literal colon inside a field. Any other backslash is kept
/// as is.
pub fn split_org_mapping(entry: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(3);
    let mut current = String::new();
    let mut chars = entry.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&':') => {
                current.push(':');
                chars.next();
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

impl OrgRoleMapper {
    /// Parse org mapping settings into a mapping configuration.
    ///
    /// Entries are applied in order and a later entry for the same external
    /// key and organization replaces an earlier one. Invalid entries are
    /// skipped with a warning, unless `strict` is set: then the first invalid
    /// entry rejects the whole mapping and an empty configuration is returned.
    pub fn parse_org_mapping_settings<I, S>(&self, entries: I, strict: bool) -> MappingConfiguration
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: Vec<OrgRoleMapping> = Vec::new();
        let mut positions: HashMap<(String, OrgTarget), usize> = HashMap::new();

        for entry in entries {
            let entry = entry.as_ref();
            let rule = match self.parse_entry(entry, strict) {
                Ok(rule) => rule,
                Err(error) if strict => {
                    tracing::warn!(
                        mapping = %entry,
                        error = %error,
                        "Rejecting all org mappings: strict role mapping is enabled and an entry is invalid"
                    );
                    return MappingConfiguration::rejected(strict);
                }
                Err(error) => {
                    tracing::warn!(mapping = %entry, error = %error, "Skipping invalid org mapping");
                    continue;
                }
            };

            match positions.entry((rule.external_key.clone(), rule.target)) {
                Entry::Occupied(slot) => rules[*slot.get()] = rule,
                Entry::Vacant(slot) => {
                    slot.insert(rules.len());
                    rules.push(rule);
                }
            }
        }

        MappingConfiguration::new(rules, strict)
    }

    /// Report every problem in org mapping settings.
    ///
    /// Uses the same rules as [`parse_org_mapping_settings`](Self::parse_org_mapping_settings)
    /// but keeps going after the first problem. In lenient mode, invalid role
    /// names are reported too since they silently fall back to `Viewer`.
    pub fn check_org_mapping_settings<I, S>(&self, entries: I, strict: bool) -> Vec<MappingEntryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .filter_map(|entry| match self.parse_entry(entry.as_ref(), true) {
                Ok(_) => None,
                Err(MappingEntryError::MissingRole { .. }) if !strict => None,
                Err(MappingEntryError::InvalidRole { role, .. }) if !strict && role.is_empty() => {
                    None
                }
                Err(error) => Some(error),
            })
            .collect()
    }

    fn parse_entry(&self, entry: &str, strict: bool) -> Result<OrgRoleMapping, MappingEntryError> {
        let mut fields = split_org_mapping(entry);
        if !(2..=3).contains(&fields.len()) {
            return Err(MappingEntryError::InvalidFormat {
                entry: entry.to_string(),
            });
        }

        let target = self.resolve_target(entry, &fields[1])?;

        let role = match fields.get(2) {
            Some(raw) => match raw.parse::<OrgRole>() {
                Ok(role) => role,
                Err(_) if strict => {
                    return Err(MappingEntryError::InvalidRole {
                        entry: entry.to_string(),
                        role: raw.clone(),
                    });
                }
                Err(_) => {
                    if !raw.is_empty() {
                        tracing::warn!(mapping = %entry, role = %raw, "Unknown role in org mapping, using Viewer");
                    }
                    OrgRole::Viewer
                }
            },
            None if strict => {
                return Err(MappingEntryError::MissingRole {
                    entry: entry.to_string(),
                });
            }
            None => OrgRole::Viewer,
        };

        let external_key = fields.swap_remove(0);

        Ok(OrgRoleMapping {
            external_key,
            target,
            role,
        })
    }

    fn resolve_target(&self, entry: &str, raw: &str) -> Result<OrgTarget, MappingEntryError> {
        match OrgIdentifier::parse(raw) {
            OrgIdentifier::Wildcard => Ok(OrgTarget::Wildcard),
            OrgIdentifier::Id(id) => Ok(OrgTarget::Exact(id)),
            OrgIdentifier::Name(name) => self
                .directory
                .get_by_name(&name)
                .map(OrgTarget::Exact)
                .map_err(|e| MappingEntryError::UnknownOrganization {
                    entry: entry.to_string(),
                    org: name,
                    reason: e.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use rstest::rstest;

    use super::*;
    use crate::mapping::test_utils::{entries, mapper_with, standard_directory};

    fn rule(key: &str, target: OrgTarget, role: OrgRole) -> OrgRoleMapping {
        OrgRoleMapping {
            external_key: key.to_string(),
            target,
            role,
        }
    }

    #[rstest]
    #[case("a:b", &["a", "b"])]
    #[case("a:b:Editor", &["a", "b", "Editor"])]
    #[case("a", &["a"])]
    #[case("a:b:c:d", &["a", "b", "c", "d"])]
    #[case(r"Team\:A:Org\:East:Admin", &["Team:A", "Org:East", "Admin"])]
    #[case(r"dom\ain:1", &[r"dom\ain", "1"])]
    #[case("a::Viewer", &["a", "", "Viewer"])]
    #[case("", &[""])]
    fn test_split_org_mapping(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(split_org_mapping(input), expected);
    }

    #[test]
    fn test_parse_ids_wildcards_and_names() {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(
            ["group1:Org4:Editor", "*:5:Viewer", "admins:*:Admin", "ops:2"],
            false,
        );

        assert_eq!(
            cfg.rules(),
            &[
                rule("group1", OrgTarget::Exact(4), OrgRole::Editor),
                rule("*", OrgTarget::Exact(5), OrgRole::Viewer),
                rule("admins", OrgTarget::Wildcard, OrgRole::Admin),
                rule("ops", OrgTarget::Exact(2), OrgRole::Viewer),
            ]
        );
        assert!(!cfg.is_strict());
    }

    #[test]
    fn test_parse_last_entry_wins_for_same_key() {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(["A:1:Editor", "B:2:Admin", "A:1:Viewer"], false);

        assert_eq!(
            cfg.rules(),
            &[
                rule("A", OrgTarget::Exact(1), OrgRole::Viewer),
                rule("B", OrgTarget::Exact(2), OrgRole::Admin),
            ]
        );
    }

    #[test]
    fn test_parse_name_and_id_resolving_to_same_org_share_a_key() {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(["A:Org4:Admin", "A:4:Editor"], false);

        assert_eq!(cfg.rules(), &[rule("A", OrgTarget::Exact(4), OrgRole::Editor)]);
    }

    #[test]
    fn test_parse_same_group_different_orgs_are_kept() {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(["A:1:Editor", "A:2:Admin", "A:*:Viewer"], false);
        assert_eq!(cfg.rules().len(), 3);
    }

    #[test]
    fn test_lenient_skips_invalid_entries() {
        let directory = standard_directory();
        let mapper = mapper_with(directory.clone());
        let cfg = mapper.parse_org_mapping_settings(
            entries(&["broken", "a:b:c:d", "dev:UnknownOrg:Editor", "ok:3:Admin"]),
            false,
        );

        assert_eq!(cfg.rules(), &[rule("ok", OrgTarget::Exact(3), OrgRole::Admin)]);
        assert_eq!(directory.name_lookups.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[case("dev:1:Superuser")]
    #[case("dev:1:editor")]
    #[case("dev:1:")]
    fn test_lenient_invalid_role_defaults_to_viewer(#[case] entry: &str) {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings([entry], false);
        assert_eq!(cfg.rules(), &[rule("dev", OrgTarget::Exact(1), OrgRole::Viewer)]);
    }

    #[test]
    fn test_strict_accepts_fully_valid_settings() {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(["group1:Org4:Editor", "*:5:Viewer"], true);

        assert!(cfg.is_strict());
        assert_eq!(
            cfg.rules(),
            &[
                rule("group1", OrgTarget::Exact(4), OrgRole::Editor),
                rule("*", OrgTarget::Exact(5), OrgRole::Viewer),
            ]
        );
    }

    #[rstest]
    #[case::invalid_format(&["good:1:Admin", "bad", "also-good:2:Editor"])]
    #[case::too_many_fields(&["good:1:Admin", "a:1:Editor:extra"])]
    #[case::unknown_org(&["good:1:Admin", "dev:NoSuchOrg:Editor", "also-good:2:Editor"])]
    #[case::missing_role(&["good:1:Admin", "dev:2", "also-good:3:Editor"])]
    #[case::invalid_role(&["good:1:Admin", "dev:2:Owner"])]
    #[case::empty_role(&["dev:2:", "good:1:Admin"])]
    fn test_strict_rejects_whole_configuration(#[case] raw: &[&str]) {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(entries(raw), true);

        assert!(cfg.is_empty(), "expected no rules, got {:?}", cfg.rules());
        assert!(cfg.is_strict());
    }

    #[test]
    fn test_strict_stops_at_first_invalid_entry() {
        let directory = standard_directory();
        let mapper = mapper_with(directory.clone());
        let cfg = mapper.parse_org_mapping_settings(["bad", "dev:Org4:Editor"], true);

        assert!(cfg.is_empty());
        assert_eq!(directory.name_lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_escaped_names_are_resolved() {
        let directory = standard_directory();
        let mapper = mapper_with(directory.clone());
        directory.insert(8, "Org:East");

        let cfg = mapper.parse_org_mapping_settings([r"Team\:A:Org\:East:Admin"], true);
        assert_eq!(cfg.rules(), &[rule("Team:A", OrgTarget::Exact(8), OrgRole::Admin)]);
    }

    #[test]
    fn test_empty_settings() {
        let mapper = mapper_with(standard_directory());
        let cfg = mapper.parse_org_mapping_settings(Vec::<String>::new(), true);
        assert!(cfg.is_empty());
        assert!(cfg.is_strict());
    }

    #[test]
    fn test_check_reports_every_problem() {
        let mapper = mapper_with(standard_directory());
        let raw = ["bad", "dev:NoSuchOrg:Editor", "ok:1", "x:2:Owner", "y:3:Admin"];

        let lenient = mapper.check_org_mapping_settings(raw, false);
        assert_eq!(
            lenient,
            vec![
                MappingEntryError::InvalidFormat {
                    entry: "bad".to_string()
                },
                MappingEntryError::UnknownOrganization {
                    entry: "dev:NoSuchOrg:Editor".to_string(),
                    org: "NoSuchOrg".to_string(),
                    reason: "Organization not found: NoSuchOrg".to_string(),
                },
                MappingEntryError::InvalidRole {
                    entry: "x:2:Owner".to_string(),
                    role: "Owner".to_string(),
                },
            ]
        );

        let strict = mapper.check_org_mapping_settings(raw, true);
        assert_eq!(strict.len(), 4);
        assert_eq!(
            strict[2],
            MappingEntryError::MissingRole {
                entry: "ok:1".to_string()
            }
        );
        assert_eq!(strict[3].entry(), "x:2:Owner");
    }

    #[test]
    fn test_check_clean_settings() {
        let mapper = mapper_with(standard_directory());
        let issues = mapper.check_org_mapping_settings(["group1:Org4:Editor", "*:*:Viewer"], true);
        assert!(issues.is_empty());
    }
}
