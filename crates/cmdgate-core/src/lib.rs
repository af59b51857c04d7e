// crates/cmdgate-core/src/lib.rs
// ============================================================================
// Module: cmdgate Core Library
// Description: Command registration and invocation framework for chat bots.
// Purpose: Declare typed commands once and serve platform requests safely.
// Dependencies: async-trait, bigdecimal, bitflags, serde, smallvec, thiserror, tokio, url
// ============================================================================

//! ## Overview
//! cmdgate turns typed handler declarations into validated command descriptors
//! and serves invocation and autocomplete requests against them. Each request
//! is bound, authorized and dispatched in a fixed order: argument binding,
//! built-in permission checks, module checks, command checks, handler.
//! Invariants:
//! - Descriptors are immutable after registration and shared via `Arc`.
//! - A handler runs only after every argument is bound and every check passes.
//! - Permission resolution is pure and deterministic for a given snapshot.
//!
//! Security posture: argument values and caller snapshots are untrusted input;
//! every value is validated before any precondition or handler observes it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AutocompleteInput;
pub use interfaces::AutocompleteProvider;
pub use interfaces::CommandModule;
pub use interfaces::ModuleMetadata;
pub use interfaces::Precondition;
pub use interfaces::ReadRequest;
pub use interfaces::Suggestions;
pub use interfaces::TypeReader;
pub use runtime::AutocompleteRequest;
pub use runtime::CommandAuditSink;
pub use runtime::CommandDeclaration;
pub use runtime::CommandDescriptor;
pub use runtime::CommandService;
pub use runtime::FileAuditSink;
pub use runtime::InvocationRequest;
pub use runtime::NoopAuditSink;
pub use runtime::ParameterDeclaration;
pub use runtime::PermissionMessages;
pub use runtime::RequireAppChannelPermissions;
pub use runtime::RequireBotPermissions;
pub use runtime::RequireGuildContext;
pub use runtime::RequireUserPermissions;
pub use runtime::ServiceOptions;
pub use runtime::StderrAuditSink;
pub use runtime::TypeReaderRegistry;
pub use runtime::autocomplete_fn;
