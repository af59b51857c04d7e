// crates/cmdgate-core/src/core/errors.rs
// ============================================================================
// Module: cmdgate Errors
// Description: Registration-time and request-time error taxonomy.
// Purpose: Report failures with enough structure for precise user messages.
// Dependencies: crate::core::{identifiers, permissions}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`DefinitionError`] is raised only while registering commands and is fatal
//! to that one declaration. [`InvocationError`] is raised only while serving a
//! request and is terminal for that request; nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::CommandName;
use crate::core::identifiers::ParameterName;
use crate::core::permissions::Permissions;

// ============================================================================
// SECTION: Registration Errors
// ============================================================================

/// Errors raised while building a command descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The declaration violates a definition rule.
    #[error("invalid definition for command '{command}': {reason}")]
    InvalidCommandDefinition {
        /// Offending command.
        command: CommandName,
        /// Violated rule.
        reason: String,
    },
    /// No type reader resolves for a parameter's type tag.
    #[error("command '{command}' parameter '{parameter}' has unsupported type '{type_tag}'")]
    UnsupportedParameterType {
        /// Offending command.
        command: CommandName,
        /// Offending parameter.
        parameter: ParameterName,
        /// Display form of the unresolved type tag.
        type_tag: String,
    },
}

impl DefinitionError {
    /// Builds an invalid-definition error.
    #[must_use]
    pub fn invalid(command: &CommandName, reason: impl Into<String>) -> Self {
        Self::InvalidCommandDefinition {
            command: command.clone(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Permission Failures
// ============================================================================

/// Entity whose permissions were insufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionEntity {
    /// The calling user.
    User,
    /// The bot handling the request.
    Bot,
}

impl fmt::Display for PermissionEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Bot => f.write_str("bot"),
        }
    }
}

/// Scope a permission check was evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// Guild-wide permissions.
    Guild,
    /// Channel permissions after overwrites.
    Channel,
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guild => f.write_str("guild"),
            Self::Channel => f.write_str("channel"),
        }
    }
}

/// Authorization failure naming exactly the missing bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PermissionDenied {
    /// Required bits absent from the effective set.
    pub missing: Permissions,
    /// Entity that lacked the bits.
    pub entity: PermissionEntity,
    /// Scope of the failed check.
    pub scope: PermissionScope,
    /// Rendered user-facing message.
    pub message: String,
}

// ============================================================================
// SECTION: Reader and Handler Failures
// ============================================================================

/// Failure reported by a type reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The raw value could not be converted.
    #[error("{0}")]
    Invalid(String),
    /// The raw value referenced an entity that could not be resolved.
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Argument conversion or validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for '{parameter}' (expected {expected}): {reason}")]
pub struct ArgumentParseFailure {
    /// Parameter the value was supplied for.
    pub parameter: ParameterName,
    /// Expected kind label.
    pub expected: String,
    /// Failure reason.
    pub reason: String,
}

/// Failure reported by a handler or a module constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Failure description.
    pub message: String,
}

impl HandlerError {
    /// Creates a handler error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionFailure {
    /// Required permission bits are missing.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
    /// A referenced entity (for example the current channel) is unavailable.
    #[error("entity not found: {0}")]
    EntityNotFound(String),
    /// A custom check rejected the request.
    #[error("{0}")]
    Rejected(String),
}

// ============================================================================
// SECTION: Request Errors
// ============================================================================

/// Errors raised while serving a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    /// No command is registered under the requested name.
    #[error("command not found: {0}")]
    CommandNotFound(CommandName),
    /// A raw argument failed conversion or validation.
    #[error(transparent)]
    ArgumentParse(#[from] ArgumentParseFailure),
    /// A permission precondition failed.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
    /// A referenced entity could not be resolved.
    #[error("entity not found: {0}")]
    EntityNotFound(String),
    /// A custom precondition failed.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),
    /// Suggestions were requested for a parameter without a callback.
    #[error("no autocomplete handler for '{parameter}' on command '{command}'")]
    AutocompleteHandlerNotFound {
        /// Command the request targeted.
        command: CommandName,
        /// Parameter without a callback.
        parameter: ParameterName,
    },
    /// The request was cancelled before completing.
    #[error("request cancelled")]
    Cancelled,
    /// The handler reported a failure.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
}

impl InvocationError {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::CommandNotFound(_) => "command_not_found",
            Self::ArgumentParse(_) => "argument_parse",
            Self::PermissionDenied(_) => "permission_denied",
            Self::EntityNotFound(_) => "entity_not_found",
            Self::PreconditionFailed(_) => "precondition_failed",
            Self::AutocompleteHandlerNotFound {
                ..
            } => "autocomplete_handler_not_found",
            Self::Cancelled => "cancelled",
            Self::Handler(_) => "handler",
        }
    }
}

impl From<PreconditionFailure> for InvocationError {
    fn from(failure: PreconditionFailure) -> Self {
        match failure {
            PreconditionFailure::PermissionDenied(denied) => Self::PermissionDenied(denied),
            PreconditionFailure::EntityNotFound(entity) => Self::EntityNotFound(entity),
            PreconditionFailure::Rejected(reason) => Self::PreconditionFailed(reason),
        }
    }
}
