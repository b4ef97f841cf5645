//! Consolidated test modules.
//!
//! End-to-end tests that drive the mapper from a TOML configuration.
