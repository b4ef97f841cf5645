use thiserror::Error;

/// Problem with a single org mapping entry.
///
/// Entry problems never fail parsing. Lenient parsing skips the entry;
/// strict parsing rejects the whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingEntryError {
    #[error("Invalid org mapping '{entry}': expected ExternalKey:Org or ExternalKey:Org:Role")]
    InvalidFormat { entry: String },

    #[error("Could not resolve organization '{org}' in org mapping '{entry}': {reason}")]
    UnknownOrganization {
        entry: String,
        org: String,
        reason: String,
    },

    #[error("Org mapping '{entry}' has no role, which strict role mapping requires")]
    MissingRole { entry: String },

    #[error("Org mapping '{entry}' has invalid role '{role}'")]
    InvalidRole { entry: String, role: String },
}

impl MappingEntryError {
    /// The raw mapping entry this error refers to.
    pub fn entry(&self) -> &str {
        match self {
            MappingEntryError::InvalidFormat { entry }
            | MappingEntryError::UnknownOrganization { entry, .. }
            | MappingEntryError::MissingRole { entry }
            | MappingEntryError::InvalidRole { entry, .. } => entry,
        }
    }
}
