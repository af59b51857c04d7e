//! Config load validation tests for cmdgate-config.
// crates/cmdgate-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// ============================================================================

use std::io::Write;
use std::path::Path;

use cmdgate_config::AuditSinkKind;
use cmdgate_config::CmdgateConfig;
use cmdgate_config::ConfigError;
use tempfile::NamedTempFile;

mod common;

type TestResult = Result<(), String>;

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    common::assert_invalid(CmdgateConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    common::assert_invalid(
        CmdgateConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    common::assert_invalid(CmdgateConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    common::assert_invalid(CmdgateConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match CmdgateConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(error) => Err(format!("expected io error, got {error}")),
        Ok(_) => Err("expected io error, got a config".to_string()),
    }
}

#[test]
fn load_reports_malformed_toml_as_parse_error() -> TestResult {
    let file = write_config(b"[service\nautocomplete_limit = 3")?;
    match CmdgateConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(error) => Err(format!("expected parse error, got {error}")),
        Ok(_) => Err("expected parse error, got a config".to_string()),
    }
}

#[test]
fn load_validates_after_parsing() -> TestResult {
    let file = write_config(b"[service]\nautocomplete_limit = 0\n")?;
    common::assert_invalid(CmdgateConfig::load(Some(file.path())), "service.autocomplete_limit")
}

#[test]
fn load_accepts_complete_config() -> TestResult {
    let file = write_config(
        br#"
[service]
default_dm_permission = false
autocomplete_limit = 10

[messages]
user_channel = "You need {missing} here"

[audit]
sink = "none"
"#,
    )?;
    let config = CmdgateConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.service.default_dm_permission || config.service.autocomplete_limit != 10 {
        return Err("service section not loaded".to_string());
    }
    if config.messages.user_channel != "You need {missing} here" {
        return Err("messages.user_channel not loaded".to_string());
    }
    if config.messages.bot_guild != "Required bot permissions: {missing}" {
        return Err("unset message formats should keep their defaults".to_string());
    }
    if config.audit.sink != AuditSinkKind::None {
        return Err("audit.sink not loaded".to_string());
    }
    Ok(())
}
