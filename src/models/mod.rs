mod org_mapping;
mod role;

pub use org_mapping::*;
pub use role::*;
