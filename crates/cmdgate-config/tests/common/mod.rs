// crates/cmdgate-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for cmdgate-config.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use cmdgate_config::CmdgateConfig;
use cmdgate_config::ConfigError;

/// Parses a TOML string into a `CmdgateConfig` without validating it.
pub fn config_from_toml(toml_str: &str) -> Result<CmdgateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<CmdgateConfig, toml::de::Error> {
    config_from_toml("")
}

/// Checks that `result` failed with an error mentioning `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
