// crates/cmdgate-config/src/config.rs
// ============================================================================
// Module: cmdgate Configuration
// Description: Configuration loading and validation for a command service.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: cmdgate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; a validated config converts
//! into core [`ServiceOptions`], [`PermissionMessages`] and an audit sink.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use cmdgate_core::CommandAuditSink;
use cmdgate_core::CommandService;
use cmdgate_core::FileAuditSink;
use cmdgate_core::NoopAuditSink;
use cmdgate_core::PermissionMessages;
use cmdgate_core::ServiceOptions;
use cmdgate_core::StderrAuditSink;
use cmdgate_core::TypeReaderRegistry;
use cmdgate_core::runtime::MAX_AUTOCOMPLETE_CHOICES;
use cmdgate_core::runtime::preconditions::MISSING_PLACEHOLDER;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cmdgate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CMDGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a permission failure message format.
const MAX_MESSAGE_FORMAT_LENGTH: usize = 2000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Canonical `cmdgate.toml` model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdgateConfig {
    /// Command service options.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Permission failure message formats.
    #[serde(default)]
    pub messages: MessagesConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl CmdgateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from `path`, then [`CONFIG_ENV_VAR`], then
    /// `cmdgate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.messages.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Builds an empty command service configured from this file.
    ///
    /// Message formats are applied before any command is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit log cannot be opened.
    pub fn build_service(&self, registry: TypeReaderRegistry) -> Result<CommandService, ConfigError> {
        Ok(CommandService::new(registry)
            .with_options(self.service.options())
            .with_messages(self.messages.permission_messages())
            .with_audit_sink(self.audit.build_sink()?))
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// `[service]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// DM availability for commands that do not declare it.
    #[serde(default = "default_dm_permission")]
    pub default_dm_permission: bool,
    /// Maximum suggestions returned per autocomplete request.
    #[serde(default = "default_autocomplete_limit")]
    pub autocomplete_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_dm_permission: default_dm_permission(),
            autocomplete_limit: default_autocomplete_limit(),
        }
    }
}

impl ServiceConfig {
    /// Validates service options.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1 ..= MAX_AUTOCOMPLETE_CHOICES).contains(&self.autocomplete_limit) {
            return Err(ConfigError::Invalid(format!(
                "service.autocomplete_limit must be between 1 and {MAX_AUTOCOMPLETE_CHOICES}"
            )));
        }
        Ok(())
    }

    /// Converts into core service options.
    #[must_use]
    pub const fn options(&self) -> ServiceOptions {
        ServiceOptions {
            default_dm_permission: self.default_dm_permission,
            autocomplete_limit: self.autocomplete_limit,
        }
    }
}

/// Default DM availability.
const fn default_dm_permission() -> bool {
    true
}

/// Default autocomplete suggestion limit.
const fn default_autocomplete_limit() -> usize {
    MAX_AUTOCOMPLETE_CHOICES
}

// ============================================================================
// SECTION: Messages
// ============================================================================

/// `[messages]` section.
///
/// # Invariants
/// - Every format contains the `{missing}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Bot lacks guild permissions.
    pub bot_guild: String,
    /// Bot lacks channel permissions.
    pub bot_channel: String,
    /// Caller lacks guild permissions.
    pub user_guild: String,
    /// Caller lacks channel permissions.
    pub user_channel: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        let PermissionMessages {
            bot_guild,
            bot_channel,
            user_guild,
            user_channel,
        } = PermissionMessages::default();
        Self {
            bot_guild,
            bot_channel,
            user_guild,
            user_channel,
        }
    }
}

impl MessagesConfig {
    /// Validates every message format.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_message_format("messages.bot_guild", &self.bot_guild)?;
        validate_message_format("messages.bot_channel", &self.bot_channel)?;
        validate_message_format("messages.user_guild", &self.user_guild)?;
        validate_message_format("messages.user_channel", &self.user_channel)?;
        Ok(())
    }

    /// Converts into core message formats.
    #[must_use]
    pub fn permission_messages(&self) -> PermissionMessages {
        PermissionMessages {
            bot_guild: self.bot_guild.clone(),
            bot_channel: self.bot_channel.clone(),
            user_guild: self.user_guild.clone(),
            user_channel: self.user_channel.clone(),
        }
    }
}

/// Validates one permission failure message format.
fn validate_message_format(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_MESSAGE_FORMAT_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if !value.contains(MISSING_PLACEHOLDER) {
        return Err(ConfigError::Invalid(format!("{field} must contain {MISSING_PLACEHOLDER}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    None,
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// `[audit]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path (JSON lines); required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path must be set when sink = \"file\"".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path requires sink = \"file\"".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file sink cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn CommandAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path must be set when sink = \"file\"".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn explicit_path_wins_resolution() {
        let resolved = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(resolved, PathBuf::from("custom.toml"));
    }

    #[test]
    fn validate_path_string_rejects_empty_and_long_components() {
        assert!(validate_path_string("audit.path", "   ").is_err());
        assert!(validate_path_string("audit.path", &"a".repeat(MAX_PATH_COMPONENT_LENGTH + 1)).is_err());
        assert!(validate_path_string("audit.path", "logs/cmdgate.jsonl").is_ok());
    }

    #[test]
    fn validate_path_string_error_includes_field_name() {
        let error = validate_path_string("audit.path", "").unwrap_err();
        assert!(error.to_string().contains("audit.path"));
    }

    #[test]
    fn message_format_requires_placeholder() {
        assert!(validate_message_format("messages.bot_guild", "Missing: {missing}").is_ok());
        let error = validate_message_format("messages.bot_guild", "Missing stuff").unwrap_err();
        assert!(error.to_string().contains("must contain {missing}"));
        assert!(validate_message_format("messages.bot_guild", &"{missing}".repeat(300)).is_err());
    }

    #[test]
    fn defaults_match_core_defaults() {
        let config = CmdgateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.service.options(), ServiceOptions::default());
        assert_eq!(config.messages.permission_messages(), PermissionMessages::default());
        assert_eq!(config.audit.sink, AuditSinkKind::Stderr);
    }
}
