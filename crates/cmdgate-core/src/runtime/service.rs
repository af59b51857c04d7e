// crates/cmdgate-core/src/runtime/service.rs
// ============================================================================
// Module: cmdgate Command Service
// Description: Command registration and request handling entry point.
// Purpose: Own descriptors and drive binding, checks and handler invocation.
// Dependencies: crate::{core, interfaces, runtime}, tokio
// ============================================================================

//! ## Overview
//! [`CommandService`] owns the type reader registry and every registered
//! command descriptor. Registration takes `&mut self` and happens once at
//! startup; request handling takes `&self` so a finished service can be shared
//! behind `Arc` without locks.
//!
//! Request flow: lookup, argument binding, precondition pipeline, compiled
//! handler. The whole flow races the request's cancellation signal; a
//! cancelled request drops its in-flight futures and never reaches the
//! handler once cancellation is observed.
//!
//! Security posture: caller-supplied arguments are untrusted; every value is
//! converted and bounds-checked before any precondition or handler runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::core::CancellationSignal;
use crate::core::Choice;
use crate::core::CommandName;
use crate::core::CommandSchema;
use crate::core::DefinitionError;
use crate::core::InvocationContext;
use crate::core::InvocationError;
use crate::core::ParameterName;
use crate::core::RawArgument;
use crate::core::ServiceProvider;
use crate::interfaces::AutocompleteInput;
use crate::runtime::audit::AutocompleteInvocationEvent;
use crate::runtime::audit::AutocompleteInvocationEventParams;
use crate::runtime::audit::CommandAuditSink;
use crate::runtime::audit::CommandInvocationEvent;
use crate::runtime::audit::CommandInvocationEventParams;
use crate::runtime::audit::CommandRegisteredEvent;
use crate::runtime::audit::CommandRegisteredEventParams;
use crate::runtime::audit::NoopAuditSink;
use crate::runtime::binding::bind_arguments;
use crate::runtime::declaration::CommandDeclaration;
use crate::runtime::descriptor::CommandDescriptor;
use crate::runtime::descriptor::DescriptorBuilder;
use crate::runtime::preconditions::PermissionMessages;
use crate::runtime::registry::TypeReaderRegistry;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Platform cap on suggestions per autocomplete response.
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

/// Service-wide behavior options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// DM availability for commands that do not declare it.
    pub default_dm_permission: bool,
    /// Maximum suggestions returned per autocomplete request.
    pub autocomplete_limit: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            default_dm_permission: true,
            autocomplete_limit: MAX_AUTOCOMPLETE_CHOICES,
        }
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Inbound command request.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    /// Caller context; names the requested command.
    pub context: InvocationContext,
    /// Raw arguments keyed by parameter name.
    pub arguments: BTreeMap<ParameterName, RawArgument>,
    /// Cancellation signal for the request.
    pub cancellation: CancellationSignal,
}

impl InvocationRequest {
    /// Creates a request without arguments that is never cancelled.
    #[must_use]
    pub fn new(context: InvocationContext) -> Self {
        Self {
            context,
            arguments: BTreeMap::new(),
            cancellation: CancellationSignal::never(),
        }
    }

    /// Adds a raw argument.
    #[must_use]
    pub fn argument(
        mut self,
        name: impl Into<ParameterName>,
        value: impl Into<RawArgument>,
    ) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Attaches a cancellation signal.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Inbound autocomplete request.
#[derive(Debug, Clone)]
pub struct AutocompleteRequest {
    /// Caller context; names the requested command.
    pub context: InvocationContext,
    /// Parameter being completed.
    pub focused: ParameterName,
    /// Partial value typed so far.
    pub current: RawArgument,
    /// Other arguments already supplied.
    pub arguments: BTreeMap<ParameterName, RawArgument>,
    /// Cancellation signal for the request.
    pub cancellation: CancellationSignal,
}

impl AutocompleteRequest {
    /// Creates a request for the focused parameter.
    #[must_use]
    pub fn new(
        context: InvocationContext,
        focused: impl Into<ParameterName>,
        current: impl Into<RawArgument>,
    ) -> Self {
        Self {
            context,
            focused: focused.into(),
            current: current.into(),
            arguments: BTreeMap::new(),
            cancellation: CancellationSignal::never(),
        }
    }

    /// Adds another supplied argument.
    #[must_use]
    pub fn argument(
        mut self,
        name: impl Into<ParameterName>,
        value: impl Into<RawArgument>,
    ) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Attaches a cancellation signal.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationSignal) -> Self {
        self.cancellation = cancellation;
        self
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Command registry and request dispatcher.
///
/// # Invariants
/// - Command names are unique.
/// - Descriptors are immutable once registered.
pub struct CommandService {
    /// Readers used when building descriptors.
    registry: TypeReaderRegistry,
    /// Message formats for built-in permission checks.
    messages: PermissionMessages,
    /// Service-wide options.
    options: ServiceOptions,
    /// Registered commands keyed by name.
    commands: BTreeMap<CommandName, Arc<CommandDescriptor>>,
    /// Audit sink for registration and request events.
    audit: Arc<dyn CommandAuditSink>,
}

impl CommandService {
    /// Creates a service with default options and no audit output.
    #[must_use]
    pub fn new(registry: TypeReaderRegistry) -> Self {
        Self {
            registry,
            messages: PermissionMessages::default(),
            options: ServiceOptions::default(),
            commands: BTreeMap::new(),
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the service options.
    #[must_use]
    pub const fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the permission message formats used by later registrations.
    #[must_use]
    pub fn with_messages(mut self, messages: PermissionMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn CommandAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the service options.
    #[must_use]
    pub const fn options(&self) -> ServiceOptions {
        self.options
    }

    /// Returns the reader registry.
    #[must_use]
    pub const fn registry(&self) -> &TypeReaderRegistry {
        &self.registry
    }

    /// Returns the reader registry for custom reader registration.
    pub const fn registry_mut(&mut self) -> &mut TypeReaderRegistry {
        &mut self.registry
    }

    /// Validates and registers a command.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] when the declaration is invalid or a
    /// command with the same name is already registered.
    pub fn register(
        &mut self,
        declaration: CommandDeclaration,
    ) -> Result<Arc<CommandDescriptor>, DefinitionError> {
        if self.commands.contains_key(declaration.name()) {
            return Err(DefinitionError::invalid(
                declaration.name(),
                "a command with this name is already registered",
            ));
        }
        let builder = DescriptorBuilder::new(
            &self.registry,
            &self.messages,
            self.options.default_dm_permission,
        );
        let descriptor = Arc::new(builder.build(declaration)?);
        self.audit.record_registration(&CommandRegisteredEvent::new(
            CommandRegisteredEventParams {
                command: descriptor.name().clone(),
                kind: descriptor.kind().label(),
                parameters: descriptor.parameters().len(),
                module: descriptor.module(),
                preconditions: descriptor.preconditions().names(),
            },
        ));
        self.commands.insert(descriptor.name().clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Looks a registered command up by name.
    #[must_use]
    pub fn command(&self, name: &CommandName) -> Option<Arc<CommandDescriptor>> {
        self.commands.get(name).cloned()
    }

    /// Returns the registered command names, highest priority first and then
    /// by name.
    #[must_use]
    pub fn command_names(&self) -> Vec<&CommandName> {
        self.ordered_commands().into_iter().map(|descriptor| descriptor.name()).collect()
    }

    /// Returns the platform schema of every registered command, in the same
    /// order as [`CommandService::command_names`].
    #[must_use]
    pub fn schemas(&self) -> Vec<CommandSchema> {
        self.ordered_commands().into_iter().map(|descriptor| descriptor.schema()).collect()
    }

    /// Returns descriptors by descending priority; ties keep name order.
    fn ordered_commands(&self) -> Vec<&CommandDescriptor> {
        let mut descriptors: Vec<&CommandDescriptor> =
            self.commands.values().map(Arc::as_ref).collect();
        descriptors.sort_by_key(|descriptor| Reverse(descriptor.priority()));
        descriptors
    }

    /// Serves one command request.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when the command is unknown, binding or a
    /// precondition fails, the handler fails, or the request is cancelled.
    pub async fn execute(
        &self,
        request: InvocationRequest,
        services: Arc<ServiceProvider>,
    ) -> Result<(), InvocationError> {
        let started = Instant::now();
        let InvocationRequest {
            context,
            arguments,
            cancellation,
        } = request;
        let context = Arc::new(context);
        let result = if cancellation.is_cancelled() {
            Err(InvocationError::Cancelled)
        } else {
            tokio::select! {
                biased;
                () = cancellation.cancelled() => Err(InvocationError::Cancelled),
                result = self.run(&context, &arguments, &services) => result,
            }
        };
        self.audit.record(&CommandInvocationEvent::new(CommandInvocationEventParams {
            command: context.command.clone(),
            user_id: context.user_id,
            guild_id: context.guild_id(),
            channel_id: context.channel_id(),
            result: result.as_ref().copied(),
            duration_ms: started.elapsed().as_millis(),
        }));
        result
    }

    /// Binds, checks and invokes a command.
    async fn run(
        &self,
        context: &Arc<InvocationContext>,
        arguments: &BTreeMap<ParameterName, RawArgument>,
        services: &Arc<ServiceProvider>,
    ) -> Result<(), InvocationError> {
        let descriptor = self
            .commands
            .get(&context.command)
            .ok_or_else(|| InvocationError::CommandNotFound(context.command.clone()))?;
        let bound = bind_arguments(descriptor, arguments, context, services).await?;
        descriptor.preconditions().evaluate(context, services).await?;
        descriptor.invoker()(bound, Arc::clone(context), Arc::clone(services)).await?;
        Ok(())
    }

    /// Serves one autocomplete request.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::CommandNotFound`] for unknown commands,
    /// [`InvocationError::AutocompleteHandlerNotFound`] when the parameter has
    /// no callback, [`InvocationError::Handler`] when the callback fails, or
    /// [`InvocationError::Cancelled`].
    pub async fn autocomplete(
        &self,
        request: AutocompleteRequest,
        services: Arc<ServiceProvider>,
    ) -> Result<Vec<Choice>, InvocationError> {
        let AutocompleteRequest {
            context,
            focused,
            current,
            arguments,
            cancellation,
        } = request;
        let result = if cancellation.is_cancelled() {
            Err(InvocationError::Cancelled)
        } else {
            let input = AutocompleteInput {
                parameter: &focused,
                current: &current,
                arguments: &arguments,
                context: &context,
                services: &services,
            };
            tokio::select! {
                biased;
                () = cancellation.cancelled() => Err(InvocationError::Cancelled),
                result = self.suggest(input) => result,
            }
        };
        self.audit.record_autocomplete(&AutocompleteInvocationEvent::new(
            AutocompleteInvocationEventParams {
                command: context.command.clone(),
                parameter: focused.clone(),
                user_id: context.user_id,
                result: result.as_ref().map(Vec::len),
            },
        ));
        result
    }

    /// Routes an autocomplete request to the command's router.
    async fn suggest(&self, input: AutocompleteInput<'_>) -> Result<Vec<Choice>, InvocationError> {
        let command = &input.context.command;
        let descriptor = self
            .commands
            .get(command)
            .ok_or_else(|| InvocationError::CommandNotFound(command.clone()))?;
        descriptor.autocomplete().complete(command, input, self.options.autocomplete_limit).await
    }
}

impl fmt::Debug for CommandService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandService")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("commands", &self.command_names())
            .finish_non_exhaustive()
    }
}
