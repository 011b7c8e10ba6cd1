//! Deployment Configuration Module
//!
//! Provides deployment configuration loaded from TOML files, replacing
//! hardcoded tuning thresholds with operator-editable values.
//!
//! ## Loading Order
//!
//! 1. `SENTINEL_CONFIG` environment variable (path to TOML file)
//! 2. `sentinel_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(SentinelConfig::load());
//!
//! // Anywhere in the codebase:
//! let top_k = config::get().diagnosis.top_k;
//! ```

mod sentinel_config;
pub mod defaults;

pub use sentinel_config::*;

use std::sync::OnceLock;

/// Global deployment configuration, initialized once at startup.
static SENTINEL_CONFIG: OnceLock<SentinelConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: SentinelConfig) {
    if SENTINEL_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
pub fn get() -> &'static SentinelConfig {
    SENTINEL_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    SENTINEL_CONFIG.get().is_some()
}
