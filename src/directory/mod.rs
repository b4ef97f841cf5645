//! Organization directory port and adapters.
//!
//! The mapping engine resolves organization names and expands wildcard
//! targets through [`OrgDirectory`]. [`InMemoryOrgDirectory`] serves the
//! organizations declared in the configuration file.

mod error;
mod memory;
mod traits;

pub use error::{DirectoryError, DirectoryResult};
pub use memory::InMemoryOrgDirectory;
pub use traits::OrgDirectory;
