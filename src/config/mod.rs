//! Configuration module for the org role mapper.
//!
//! Configuration is read from a TOML file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```toml
//! [auto_assign]
//! org_id = 2
//! role = "Viewer"
//!
//! [[organizations]]
//! id = 2
//! name = "Engineering"
//!
//! [connectors.generic_oauth]
//! org_mapping = ["${ENG_GROUP}:Engineering:Editor"]
//! strict = true
//! ```

mod connectors;
mod observability;
mod organizations;

use std::{
    collections::BTreeMap,
    path::Path,
    sync::LazyLock,
};

pub use connectors::*;
pub use observability::*;
pub use organizations::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ENV_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// Root configuration.
///
/// All sections are optional. An empty file yields the default assignment
/// (org 1, Viewer) and no connectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct OrgMapConfig {
    /// Default assignment for users no mapping applies to.
    #[serde(default)]
    pub auto_assign: AutoAssignConfig,

    /// Organizations known to the built-in directory.
    #[serde(default)]
    pub organizations: Vec<OrganizationConfig>,

    /// Org mapping settings per identity-provider connector.
    #[serde(default)]
    pub connectors: BTreeMap<String, ConnectorMappingConfig>,

    /// Observability configuration (logging).
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl OrgMapConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let config: OrgMapConfig = toml::from_str(&expanded).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a connector's mapping settings.
    pub fn connector(&self, name: &str) -> Result<&ConnectorMappingConfig, ConfigError> {
        self.connectors.get(name).ok_or_else(|| {
            let known = self.connectors.keys().cloned().collect::<Vec<_>>().join(", ");
            ConfigError::UnknownConnector(name.to_string(), known)
        })
    }

    /// Validate the configuration for consistency and completeness.
    fn validate(&self) -> Result<(), ConfigError> {
        organizations::validate_organizations(&self.organizations)?;

        for (name, connector) in &self.connectors {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Connector names cannot be empty".into(),
                ));
            }
            connector.entries().map_err(|e| {
                ConfigError::Validation(format!("connectors.{name}.org_mapping: {e}"))
            })?;
        }

        let auto_assign = &self.auto_assign;
        if auto_assign.enabled && auto_assign.org_id <= 0 {
            tracing::warn!(
                org_id = auto_assign.org_id,
                "auto_assign.org_id is not a valid organization ID, org 1 will be used"
            );
        } else if auto_assign.enabled
            && !self.organizations.is_empty()
            && !self.organizations.iter().any(|o| o.id == auto_assign.org_id)
        {
            tracing::warn!(
                org_id = auto_assign.org_id,
                "auto_assign.org_id is not listed in [[organizations]]"
            );
        }

        Ok(())
    }

    /// Generate the JSON schema for the configuration file.
    #[cfg(feature = "json-schema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(OrgMapConfig)
    }

    /// Generate the JSON schema as a pretty-printed JSON string.
    #[cfg(feature = "json-schema")]
    pub fn json_schema_string() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::json_schema())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Unknown connector '{0}' (configured: [{1}])")]
    UnknownConnector(String, String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand environment variables in the format `${VAR_NAME}`.
/// Variables after a `#` on the same line are left untouched.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());

    for line in input.lines() {
        let comment_pos = line.find('#');
        let mut last_end = 0;

        for cap in ENV_VAR_REGEX.captures_iter(line) {
            let Some(whole) = cap.get(0) else {
                continue;
            };

            if let Some(pos) = comment_pos
                && whole.start() >= pos
            {
                continue;
            }

            result.push_str(&line[last_end..whole.start()]);

            let var_name = &cap[1];
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            result.push_str(&value);

            last_end = whole.end();
        }

        result.push_str(&line[last_end..]);
        result.push('\n');
    }

    // Remove trailing newline if input didn't have one
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    Ok(result)
}
