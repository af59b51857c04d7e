// crates/cmdgate-core/src/interfaces/mod.rs
// ============================================================================
// Module: cmdgate Interfaces
// Description: Extension seams for readers, preconditions, modules and suggestions.
// Purpose: Define the contract surfaces the runtime consumes.
// Dependencies: crate::core, async-trait
// ============================================================================

//! ## Overview
//! Interfaces define how hosts plug behavior into the command runtime without
//! touching its internals: type readers convert raw arguments, preconditions
//! gate execution, command modules carry per-request handler state, and
//! autocomplete providers produce suggestions. Implementations must be
//! stateless with respect to a single request, or internally synchronized.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::ArgumentValue;
use crate::core::ChannelKind;
use crate::core::Choice;
use crate::core::HandlerError;
use crate::core::InvocationContext;
use crate::core::OptionKind;
use crate::core::ParameterName;
use crate::core::PreconditionFailure;
use crate::core::RawArgument;
use crate::core::ReadError;
use crate::core::RequiredPermissions;
use crate::core::ServiceProvider;
use crate::core::TypeTag;

// ============================================================================
// SECTION: Type Readers
// ============================================================================

/// Inputs available to a type reader for one raw value.
#[derive(Debug, Clone, Copy)]
pub struct ReadRequest<'a> {
    /// Declared type of the parameter.
    pub tag: TypeTag,
    /// Parameter the value was supplied for.
    pub parameter: &'a ParameterName,
    /// Caller context, including resolved entities.
    pub context: &'a InvocationContext,
    /// Host services.
    pub services: &'a ServiceProvider,
}

/// Converts raw argument values into typed values for one type tag.
///
/// Readers are registered once and shared by every command, so they must not
/// hold per-request state. Bound metadata reported here is the default for
/// every parameter of the tag; parameter declarations may override it.
#[async_trait]
pub trait TypeReader: Send + Sync {
    /// Returns the platform option kind parameters of this type are exposed as.
    fn option_kind(&self) -> OptionKind;

    /// Converts a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] when the value is malformed or references an
    /// entity that cannot be resolved.
    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError>;

    /// Inclusive numeric lower bound.
    fn min_value(&self) -> Option<f64> {
        None
    }

    /// Inclusive numeric upper bound.
    fn max_value(&self) -> Option<f64> {
        None
    }

    /// Inclusive text length lower bound.
    fn min_length(&self) -> Option<u16> {
        None
    }

    /// Inclusive text length upper bound.
    fn max_length(&self) -> Option<u16> {
        None
    }

    /// Fixed choices offered for the tag.
    fn choices(&self, _tag: TypeTag) -> Vec<Choice> {
        Vec::new()
    }

    /// Channel kinds accepted for the tag; empty means any.
    fn channel_kinds(&self, tag: TypeTag) -> &'static [ChannelKind] {
        tag.channel_kinds()
    }
}

// ============================================================================
// SECTION: Preconditions
// ============================================================================

/// Authorization check evaluated before a handler runs.
#[async_trait]
pub trait Precondition: Send + Sync {
    /// Short label used in audit events.
    fn name(&self) -> &'static str;

    /// Evaluates the check for one request.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionFailure`] when the request must not proceed.
    async fn evaluate(
        &self,
        context: &InvocationContext,
        services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure>;
}

// ============================================================================
// SECTION: Command Modules
// ============================================================================

/// Metadata shared by every command declared on a module.
#[derive(Clone, Default)]
pub struct ModuleMetadata {
    /// Permission requirements merged into every command of the module.
    pub required_permissions: RequiredPermissions,
    /// Preconditions evaluated ahead of each command's own preconditions.
    pub preconditions: Vec<Arc<dyn Precondition>>,
}

impl ModuleMetadata {
    /// Creates empty module metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the permission requirements.
    #[must_use]
    pub const fn with_permissions(mut self, permissions: RequiredPermissions) -> Self {
        self.required_permissions = permissions;
        self
    }

    /// Appends a precondition.
    #[must_use]
    pub fn with_precondition(mut self, precondition: impl Precondition + 'static) -> Self {
        self.preconditions.push(Arc::new(precondition));
        self
    }
}

impl fmt::Debug for ModuleMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> =
            self.preconditions.iter().map(|precondition| precondition.name()).collect();
        f.debug_struct("ModuleMetadata")
            .field("required_permissions", &self.required_permissions)
            .field("preconditions", &names)
            .finish()
    }
}

/// Handler state created fresh for every request.
///
/// The runtime constructs one instance per request through [`Self::create`],
/// attaches the caller context, then calls the declared handler with it.
pub trait CommandModule: Sized + Send + 'static {
    /// Constructs an instance from host services.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when a required service is unavailable.
    fn create(services: &ServiceProvider) -> Result<Self, HandlerError>;

    /// Attaches the caller context before the handler runs.
    fn attach_context(&mut self, context: Arc<InvocationContext>);

    /// Returns metadata applied to every command declared on the module.
    #[must_use]
    fn metadata() -> ModuleMetadata {
        ModuleMetadata::default()
    }
}

// ============================================================================
// SECTION: Autocomplete
// ============================================================================

/// Lazy, finite stream of suggestions.
pub type Suggestions = Box<dyn Iterator<Item = Choice> + Send>;

/// Inputs available to an autocomplete provider.
#[derive(Debug, Clone, Copy)]
pub struct AutocompleteInput<'a> {
    /// Parameter being completed.
    pub parameter: &'a ParameterName,
    /// Partial value typed so far.
    pub current: &'a RawArgument,
    /// Other arguments already supplied.
    pub arguments: &'a BTreeMap<ParameterName, RawArgument>,
    /// Caller context.
    pub context: &'a InvocationContext,
    /// Host services.
    pub services: &'a ServiceProvider,
}

/// Produces suggestions for one parameter.
#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
    /// Returns suggestions for the partial value.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when suggestions cannot be produced.
    async fn suggest(&self, input: AutocompleteInput<'_>) -> Result<Suggestions, HandlerError>;
}
