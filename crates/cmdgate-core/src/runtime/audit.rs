// crates/cmdgate-core/src/runtime/audit.rs
// ============================================================================
// Module: cmdgate Audit Logging
// Description: Structured audit events for registration and request handling.
// Purpose: Emit JSON-lines records without a hard logging dependency.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events describe what the command service did: which commands were
//! registered, and how each command or autocomplete request ended. Sinks
//! serialize events as JSON lines so deployments can route them into their
//! own logging pipeline. Argument values are never recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ChannelId;
use crate::core::CommandName;
use crate::core::GuildId;
use crate::core::InvocationError;
use crate::core::ParameterName;
use crate::core::PermissionEntity;
use crate::core::PermissionScope;
use crate::core::Permissions;
use crate::core::UserId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Final outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The handler or callback completed.
    Completed,
    /// The request failed.
    Failed,
    /// The request was cancelled.
    Cancelled,
}

/// Permission denial details recorded with a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DenialRecord {
    /// Missing permission bits.
    pub missing: Permissions,
    /// Entity lacking the bits.
    pub entity: PermissionEntity,
    /// Scope of the failed check.
    pub scope: PermissionScope,
}

/// Command registration audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRegisteredEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Registered command.
    pub command: CommandName,
    /// Command kind label.
    pub kind: &'static str,
    /// Number of declared parameters.
    pub parameters: usize,
    /// Declaring module type name, for instance handlers.
    pub module: Option<&'static str>,
    /// Precondition labels in evaluation order.
    pub preconditions: Vec<&'static str>,
}

/// Command invocation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct CommandInvocationEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Requested command.
    pub command: CommandName,
    /// Calling user.
    pub user_id: UserId,
    /// Guild the request came from.
    pub guild_id: Option<GuildId>,
    /// Channel the request came from.
    pub channel_id: Option<ChannelId>,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Permission denial details.
    pub denial: Option<DenialRecord>,
    /// Time spent serving the request.
    pub duration_ms: u128,
}

/// Autocomplete audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteInvocationEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Requested command.
    pub command: CommandName,
    /// Parameter being completed.
    pub parameter: ParameterName,
    /// Calling user.
    pub user_id: UserId,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Number of suggestions returned.
    pub suggestions: usize,
}

/// Inputs required to construct a registration event.
pub struct CommandRegisteredEventParams {
    /// Registered command.
    pub command: CommandName,
    /// Command kind label.
    pub kind: &'static str,
    /// Number of declared parameters.
    pub parameters: usize,
    /// Declaring module type name.
    pub module: Option<&'static str>,
    /// Precondition labels in evaluation order.
    pub preconditions: Vec<&'static str>,
}

/// Inputs required to construct an invocation event.
pub struct CommandInvocationEventParams<'a> {
    /// Requested command.
    pub command: CommandName,
    /// Calling user.
    pub user_id: UserId,
    /// Guild the request came from.
    pub guild_id: Option<GuildId>,
    /// Channel the request came from.
    pub channel_id: Option<ChannelId>,
    /// Request result.
    pub result: Result<(), &'a InvocationError>,
    /// Time spent serving the request.
    pub duration_ms: u128,
}

/// Inputs required to construct an autocomplete event.
pub struct AutocompleteInvocationEventParams<'a> {
    /// Requested command.
    pub command: CommandName,
    /// Parameter being completed.
    pub parameter: ParameterName,
    /// Calling user.
    pub user_id: UserId,
    /// Number of suggestions, or the failure.
    pub result: Result<usize, &'a InvocationError>,
}

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Maps a request result to its outcome and error label.
const fn classify(error: Option<&InvocationError>) -> (RequestOutcome, Option<&'static str>) {
    match error {
        None => (RequestOutcome::Completed, None),
        Some(InvocationError::Cancelled) => (RequestOutcome::Cancelled, Some("cancelled")),
        Some(error) => (RequestOutcome::Failed, Some(error.kind_label())),
    }
}

impl CommandRegisteredEvent {
    /// Creates a registration event with a consistent timestamp.
    #[must_use]
    pub fn new(params: CommandRegisteredEventParams) -> Self {
        Self {
            event: "command_registered",
            timestamp_ms: now_ms(),
            command: params.command,
            kind: params.kind,
            parameters: params.parameters,
            module: params.module,
            preconditions: params.preconditions,
        }
    }
}

impl CommandInvocationEvent {
    /// Creates an invocation event with a consistent timestamp.
    #[must_use]
    pub fn new(params: CommandInvocationEventParams<'_>) -> Self {
        let error = params.result.err();
        let (outcome, error_kind) = classify(error);
        let denial = match error {
            Some(InvocationError::PermissionDenied(denied)) => Some(DenialRecord {
                missing: denied.missing,
                entity: denied.entity,
                scope: denied.scope,
            }),
            _ => None,
        };
        Self {
            event: "command_invocation",
            timestamp_ms: now_ms(),
            command: params.command,
            user_id: params.user_id,
            guild_id: params.guild_id,
            channel_id: params.channel_id,
            outcome,
            error_kind,
            denial,
            duration_ms: params.duration_ms,
        }
    }
}

impl AutocompleteInvocationEvent {
    /// Creates an autocomplete event with a consistent timestamp.
    #[must_use]
    pub fn new(params: AutocompleteInvocationEventParams<'_>) -> Self {
        let (outcome, error_kind) = classify(params.result.err());
        Self {
            event: "autocomplete_invocation",
            timestamp_ms: now_ms(),
            command: params.command,
            parameter: params.parameter,
            user_id: params.user_id,
            outcome,
            error_kind,
            suggestions: params.result.unwrap_or_default(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for command service events.
pub trait CommandAuditSink: Send + Sync {
    /// Record a command invocation event.
    fn record(&self, event: &CommandInvocationEvent);

    /// Record a command registration event.
    fn record_registration(&self, _event: &CommandRegisteredEvent) {}

    /// Record an autocomplete event.
    fn record_autocomplete(&self, _event: &AutocompleteInvocationEvent) {}
}

/// Serializes an event as one JSON line.
fn write_json_line<T: Serialize>(writer: &mut impl Write, event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
        let _ = writer.flush();
    }
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl CommandAuditSink for StderrAuditSink {
    fn record(&self, event: &CommandInvocationEvent) {
        write_json_line(&mut io::stderr(), event);
    }

    fn record_registration(&self, event: &CommandRegisteredEvent) {
        write_json_line(&mut io::stderr(), event);
    }

    fn record_autocomplete(&self, event: &AutocompleteInvocationEvent) {
        write_json_line(&mut io::stderr(), event);
    }
}

/// Audit sink that logs JSON lines to a file.
#[derive(Debug)]
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Writes one event while holding the file lock.
    fn write<T: Serialize>(&self, event: &T) {
        if let Ok(mut file) = self.file.lock() {
            write_json_line(&mut *file, event);
        }
    }
}

impl CommandAuditSink for FileAuditSink {
    fn record(&self, event: &CommandInvocationEvent) {
        self.write(event);
    }

    fn record_registration(&self, event: &CommandRegisteredEvent) {
        self.write(event);
    }

    fn record_autocomplete(&self, event: &AutocompleteInvocationEvent) {
        self.write(event);
    }
}

/// No-op audit sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl CommandAuditSink for NoopAuditSink {
    fn record(&self, _event: &CommandInvocationEvent) {}

    fn record_registration(&self, _event: &CommandRegisteredEvent) {}

    fn record_autocomplete(&self, _event: &AutocompleteInvocationEvent) {}
}
