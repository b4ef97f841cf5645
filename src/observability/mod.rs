//! Observability module providing structured logging.
//!
//! Log output goes to stderr in pretty, compact or JSON format, so that
//! command output on stdout stays machine-readable.

mod tracing_init;

pub use tracing_init::*;
