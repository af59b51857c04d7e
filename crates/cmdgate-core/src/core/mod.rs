// crates/cmdgate-core/src/core/mod.rs
// ============================================================================
// Module: cmdgate Core Types
// Description: Identifiers, permissions, values, schema and error types.
// Purpose: Provide the stable data model shared by readers, descriptors and the service.
// Dependencies: bigdecimal, bitflags, serde, thiserror, tokio, url
// ============================================================================

//! ## Overview
//! Core types are plain data: snowflake identifiers, the permission bit set,
//! guild and channel snapshots, raw and bound argument values, platform schema
//! objects and the error taxonomy. Nothing here performs I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod context;
pub mod errors;
pub mod identifiers;
pub mod permissions;
pub mod schema;
pub mod scope;
pub mod type_tag;
pub mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::CancellationHandle;
pub use context::CancellationSignal;
pub use context::InvocationContext;
pub use context::ServiceProvider;
pub use errors::ArgumentParseFailure;
pub use errors::DefinitionError;
pub use errors::HandlerError;
pub use errors::InvocationError;
pub use errors::PermissionDenied;
pub use errors::PermissionEntity;
pub use errors::PermissionScope;
pub use errors::PreconditionFailure;
pub use errors::ReadError;
pub use identifiers::AttachmentId;
pub use identifiers::ChannelId;
pub use identifiers::CommandName;
pub use identifiers::GuildId;
pub use identifiers::ParameterName;
pub use identifiers::RoleId;
pub use identifiers::UserId;
pub use permissions::OverwriteTarget;
pub use permissions::PermissionOverwrite;
pub use permissions::Permissions;
pub use permissions::RequiredPermissions;
pub use schema::Choice;
pub use schema::ChoiceValue;
pub use schema::CommandKind;
pub use schema::CommandSchema;
pub use schema::OptionKind;
pub use schema::OptionSchema;
pub use scope::ChannelKind;
pub use scope::ChannelScope;
pub use scope::GuildMember;
pub use scope::GuildScope;
pub use scope::ResolvedAttachment;
pub use scope::ResolvedEntities;
pub use scope::ResolvedUser;
pub use type_tag::TypeTag;
pub use values::ArgumentValue;
pub use values::ChannelRef;
pub use values::EnumMember;
pub use values::EnumSpec;
pub use values::Mentionable;
pub use values::RawArgument;
