//! Section validation tests for cmdgate-config.
// crates/cmdgate-config/tests/section_validation.rs
// ============================================================================
// Module: Config Section Validation Tests
// Description: Validate service, messages and audit section invariants.
// Purpose: Ensure invalid sections fail closed and valid ones convert cleanly.
// ============================================================================

use std::sync::Arc;

use cmdgate_config::AuditSinkKind;
use cmdgate_config::CmdgateConfig;
use cmdgate_core::CommandDeclaration;
use cmdgate_core::InvocationContext;
use cmdgate_core::Permissions;
use cmdgate_core::TypeReaderRegistry;

mod common;

type TestResult = Result<(), String>;

// ============================================================================
// SECTION: Service
// ============================================================================

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn autocomplete_limit_bounds_are_inclusive() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    for limit in [1, 25] {
        config.service.autocomplete_limit = limit;
        config.validate().map_err(|err| format!("limit {limit} should be valid: {err}"))?;
    }
    for limit in [0, 26] {
        config.service.autocomplete_limit = limit;
        common::assert_invalid(config.validate(), "service.autocomplete_limit must be between 1 and 25")?;
    }
    Ok(())
}

#[test]
fn service_section_converts_into_options() -> TestResult {
    let config = CmdgateConfig::from_toml_str("[service]\ndefault_dm_permission = false\nautocomplete_limit = 7\n")
        .map_err(|err| err.to_string())?;
    let options = config.service.options();
    if options.default_dm_permission || options.autocomplete_limit != 7 {
        return Err("service options not carried over".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Messages
// ============================================================================

#[test]
fn message_formats_require_placeholder() -> TestResult {
    common::assert_invalid(
        CmdgateConfig::from_toml_str("[messages]\nbot_channel = \"Bot is missing permissions\"\n"),
        "messages.bot_channel must contain {missing}",
    )
}

#[test]
fn message_formats_must_be_non_empty() -> TestResult {
    common::assert_invalid(
        CmdgateConfig::from_toml_str("[messages]\nuser_guild = \"  \"\n"),
        "messages.user_guild must be non-empty",
    )
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn audit_sink_defaults_to_stderr() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    if config.audit.sink != AuditSinkKind::Stderr {
        return Err("audit.sink should default to stderr".to_string());
    }
    Ok(())
}

#[test]
fn file_sink_requires_path() -> TestResult {
    common::assert_invalid(
        CmdgateConfig::from_toml_str("[audit]\nsink = \"file\"\n"),
        "audit.path must be set",
    )
}

#[test]
fn path_requires_file_sink() -> TestResult {
    common::assert_invalid(
        CmdgateConfig::from_toml_str("[audit]\nsink = \"stderr\"\npath = \"audit.jsonl\"\n"),
        "audit.path requires sink",
    )
}

#[test]
fn unknown_sink_is_a_parse_error() -> TestResult {
    common::assert_invalid(CmdgateConfig::from_toml_str("[audit]\nsink = \"syslog\"\n"), "config parse error")
}

// ============================================================================
// SECTION: Service Construction
// ============================================================================

#[test]
fn built_service_uses_configured_sink_and_messages() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("audit.jsonl");
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkKind::File;
    config.audit.path = Some(path.to_string_lossy().into_owned());
    config.messages.user_guild = "Ask an admin for {missing}".to_string();
    config.validate().map_err(|err| err.to_string())?;

    let mut service =
        config.build_service(TypeReaderRegistry::with_builtin_readers()).map_err(|err| err.to_string())?;
    service
        .register(
            CommandDeclaration::slash("ban", "Bans a member")
                .require_user_permissions(Permissions::BAN_MEMBERS, Permissions::empty())
                .static_handler(|_context: Arc<InvocationContext>, (): ()| async {}),
        )
        .map_err(|err| err.to_string())?;

    let log = std::fs::read_to_string(&path).map_err(|err| err.to_string())?;
    let lines: Vec<&str> = log.lines().collect();
    if lines.len() != 1 || !lines[0].contains("\"event\":\"command_registered\"") {
        return Err(format!("unexpected audit log: {log}"));
    }
    if service.options().autocomplete_limit != 25 {
        return Err("service options should keep defaults".to_string());
    }
    Ok(())
}

#[test]
fn unopenable_audit_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.sink = AuditSinkKind::File;
    config.audit.path = Some(dir.path().join("missing").join("audit.jsonl").to_string_lossy().into_owned());
    common::assert_invalid(config.build_service(TypeReaderRegistry::with_builtin_readers()), "config io error")
}
