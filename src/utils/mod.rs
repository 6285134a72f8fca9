//! Configuration utilities.

/// TOML configuration (`gpu-portal.toml`) with hot reloading.
pub mod toml_config;
