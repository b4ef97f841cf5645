use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Org mapping settings for one identity-provider connector.
///
/// ```toml
/// [connectors.generic_oauth]
/// org_mapping = ["engineering:Engineering:Editor", "*:1:Viewer"]
/// strict = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct ConnectorMappingConfig {
    /// Mapping entries in `ExternalKey:Org[:Role]` form.
    #[serde(default)]
    pub org_mapping: MappingList,

    /// Strict role mapping: any invalid entry rejects the whole mapping, and
    /// users without an evaluable role are denied instead of receiving the
    /// default assignment.
    #[serde(default)]
    pub strict: bool,
}

impl ConnectorMappingConfig {
    pub fn entries(&self) -> Result<Vec<String>, ConfigError> {
        self.org_mapping.entries()
    }
}

/// Mapping entries as a TOML array, or as a single settings string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum MappingList {
    Entries(Vec<String>),
    Setting(String),
}

impl Default for MappingList {
    fn default() -> Self {
        MappingList::Entries(Vec::new())
    }
}

impl MappingList {
    pub fn entries(&self) -> Result<Vec<String>, ConfigError> {
        match self {
            MappingList::Entries(entries) => Ok(entries.clone()),
            MappingList::Setting(raw) => split_setting_list(raw),
        }
    }
}

/// Split a list-valued settings string.
///
/// A value starting with `[` is read as a JSON array of strings. Anything
/// else is split on commas and whitespace; empty items are dropped.
pub fn split_setting_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
            ConfigError::Validation(format!("Invalid JSON list in setting '{trimmed}': {e}"))
        })?;
        return Ok(items.into_iter().filter(|item| !item.is_empty()).collect());
    }

    Ok(trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}
