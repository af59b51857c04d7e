// crates/cmdgate-core/src/runtime/mod.rs
// ============================================================================
// Module: cmdgate Runtime
// Description: Registration, binding, authorization and dispatch machinery.
// Purpose: Turn command declarations into descriptors and serve requests.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Registration runs the reader registry, the parameter and command descriptor
//! builders, the invocation compiler and the autocomplete router once per
//! declaration. Request handling runs argument binding, the precondition
//! pipeline and the compiled handler, all driven by [`CommandService`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod autocomplete;
pub mod binding;
pub mod declaration;
pub mod descriptor;
pub mod invoker;
pub mod permission;
pub mod preconditions;
pub mod readers;
pub mod registry;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AutocompleteInvocationEvent;
pub use audit::CommandAuditSink;
pub use audit::CommandInvocationEvent;
pub use audit::CommandRegisteredEvent;
pub use audit::DenialRecord;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestOutcome;
pub use audit::StderrAuditSink;
pub use autocomplete::AutocompleteRouter;
pub use autocomplete::FnAutocomplete;
pub use autocomplete::autocomplete_fn;
pub use binding::bind_arguments;
pub use declaration::BoundArguments;
pub use declaration::CommandDeclaration;
pub use declaration::FromArgument;
pub use declaration::FromArguments;
pub use declaration::HandlerOutput;
pub use declaration::ParameterDeclaration;
pub use declaration::ReturnContract;
pub use descriptor::CommandDescriptor;
pub use descriptor::DescriptorBuilder;
pub use descriptor::ParameterDescriptor;
pub use descriptor::is_valid_chat_name;
pub use invoker::CompiledInvoker;
pub use invoker::InvokeFuture;
pub use permission::PermissionGrant;
pub use permission::resolve_channel_permissions;
pub use permission::resolve_guild_permissions;
pub use preconditions::PermissionMessages;
pub use preconditions::PreconditionPipeline;
pub use preconditions::RequireAppChannelPermissions;
pub use preconditions::RequireBotPermissions;
pub use preconditions::RequireGuildContext;
pub use preconditions::RequireUserPermissions;
pub use registry::TypeReaderRegistry;
pub use service::AutocompleteRequest;
pub use service::CommandService;
pub use service::InvocationRequest;
pub use service::MAX_AUTOCOMPLETE_CHOICES;
pub use service::ServiceOptions;
