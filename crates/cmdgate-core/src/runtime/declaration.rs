// crates/cmdgate-core/src/runtime/declaration.rs
// ============================================================================
// Module: cmdgate Command Declarations
// Description: Builders describing commands, parameters and their handlers.
// Purpose: Capture handler metadata explicitly for descriptor construction.
// Dependencies: crate::{core, interfaces, runtime::invoker}, bigdecimal, smallvec, url
// ============================================================================

//! ## Overview
//! A [`CommandDeclaration`] is the explicit form of a handler's metadata: name,
//! kind, parameters, permission requirements, preconditions and the handler
//! itself. Declarations are unvalidated; the descriptor builder checks them
//! against the reader registry when the command is registered.
//!
//! Handler arguments are typed. Each handler receives a tuple implementing
//! [`FromArguments`]; every element implements [`FromArgument`] and states
//! which declared type tags it can be bound from, so a mismatch between the
//! declared parameters and the handler signature is caught at registration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use smallvec::SmallVec;
use url::Url;

use crate::core::ArgumentValue;
use crate::core::AttachmentId;
use crate::core::ChannelKind;
use crate::core::ChannelRef;
use crate::core::Choice;
use crate::core::CommandKind;
use crate::core::CommandName;
use crate::core::EnumMember;
use crate::core::GuildId;
use crate::core::HandlerError;
use crate::core::InvocationContext;
use crate::core::Mentionable;
use crate::core::ParameterName;
use crate::core::Permissions;
use crate::core::RequiredPermissions;
use crate::core::RoleId;
use crate::core::TypeTag;
use crate::core::UserId;
use crate::interfaces::AutocompleteProvider;
use crate::interfaces::CommandModule;
use crate::interfaces::ModuleMetadata;
use crate::interfaces::Precondition;
use crate::runtime::invoker::CompiledInvoker;
use crate::runtime::invoker::compile_module_handler;
use crate::runtime::invoker::compile_static_handler;

// ============================================================================
// SECTION: Bound Arguments
// ============================================================================

/// Positionally bound argument values for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    /// Values in declared parameter order.
    values: SmallVec<[ArgumentValue; 8]>,
}

impl BoundArguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next positional value.
    pub fn push(&mut self, value: ArgumentValue) {
        self.values.push(value);
    }

    /// Returns the value at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArgumentValue> {
        self.values.get(index)
    }

    /// Returns the number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the bound values in order.
    #[must_use]
    pub fn as_slice(&self) -> &[ArgumentValue] {
        &self.values
    }
}

impl IntoIterator for BoundArguments {
    type IntoIter = smallvec::IntoIter<[ArgumentValue; 8]>;
    type Item = ArgumentValue;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl FromIterator<ArgumentValue> for BoundArguments {
    fn from_iter<I: IntoIterator<Item = ArgumentValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// SECTION: Typed Arguments
// ============================================================================

/// Rust type a bound argument value converts into.
pub trait FromArgument: Sized + Send + 'static {
    /// Returns true when values of the declared tag convert into `Self`.
    fn accepts(tag: TypeTag) -> bool;

    /// Converts a bound value; `None` when the value has another shape.
    fn from_argument(value: ArgumentValue) -> Option<Self>;
}

impl FromArgument for ArgumentValue {
    fn accepts(_tag: TypeTag) -> bool {
        true
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        Some(value)
    }
}

impl FromArgument for String {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::String)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Implements [`FromArgument`] for a signed integral type.
macro_rules! signed_argument {
    ($ty:ty, $tag:ident) => {
        impl FromArgument for $ty {
            fn accepts(tag: TypeTag) -> bool {
                matches!(tag, TypeTag::$tag)
            }

            fn from_argument(value: ArgumentValue) -> Option<Self> {
                match value {
                    ArgumentValue::Integer(value) => <$ty>::try_from(value).ok(),
                    _ => None,
                }
            }
        }
    };
}

/// Implements [`FromArgument`] for an unsigned integral type.
macro_rules! unsigned_argument {
    ($ty:ty, $tag:ident) => {
        impl FromArgument for $ty {
            fn accepts(tag: TypeTag) -> bool {
                matches!(tag, TypeTag::$tag)
            }

            fn from_argument(value: ArgumentValue) -> Option<Self> {
                match value {
                    ArgumentValue::Unsigned(value) => <$ty>::try_from(value).ok(),
                    _ => None,
                }
            }
        }
    };
}

signed_argument!(i8, I8);
signed_argument!(i16, I16);
signed_argument!(i32, I32);
unsigned_argument!(u8, U8);
unsigned_argument!(u16, U16);
unsigned_argument!(u32, U32);

impl FromArgument for i64 {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::I64)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Integer(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for u64 {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::U64)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Unsigned(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for f32 {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::F32)
    }

    #[allow(clippy::cast_possible_truncation, reason = "The f32 reader rejects out-of-range values.")]
    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Number(value) => Some(value as Self),
            _ => None,
        }
    }
}

impl FromArgument for f64 {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::F32 | TypeTag::F64)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Number(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for BigDecimal {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Decimal)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Decimal(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for bool {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Bool)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Boolean(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for Url {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Url)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Url(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for UserId {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::User | TypeTag::GuildUser)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::User(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for RoleId {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Role)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Role(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for ChannelRef {
    fn accepts(tag: TypeTag) -> bool {
        tag.is_channel()
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Channel(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for Mentionable {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Mentionable)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Mentionable(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for AttachmentId {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Attachment)
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Attachment(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for EnumMember {
    fn accepts(tag: TypeTag) -> bool {
        matches!(tag, TypeTag::Enum(_))
    }

    fn from_argument(value: ArgumentValue) -> Option<Self> {
        match value {
            ArgumentValue::Enum(value) => Some(value),
            _ => None,
        }
    }
}

/// Converts the next bound value into `T`.
fn next_argument<T: FromArgument>(
    values: &mut impl Iterator<Item = ArgumentValue>,
    position: usize,
) -> Result<T, HandlerError> {
    values
        .next()
        .and_then(T::from_argument)
        .ok_or_else(|| HandlerError::new(format!("argument {position} could not be converted")))
}

/// Tuple of handler arguments.
pub trait FromArguments: Sized + Send + 'static {
    /// Checks the declared parameter tags against the tuple's element types.
    ///
    /// # Errors
    ///
    /// Returns a description of the first mismatch.
    fn check(tags: &[TypeTag]) -> Result<(), String>;

    /// Converts positionally bound values into the tuple.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when a value does not convert.
    fn from_arguments(arguments: BoundArguments) -> Result<Self, HandlerError>;
}

impl FromArguments for () {
    fn check(tags: &[TypeTag]) -> Result<(), String> {
        if tags.is_empty() {
            Ok(())
        } else {
            Err(format!("handler takes no arguments but {} parameters are declared", tags.len()))
        }
    }

    fn from_arguments(_arguments: BoundArguments) -> Result<Self, HandlerError> {
        Ok(())
    }
}

/// Implements [`FromArguments`] for a tuple of [`FromArgument`] elements.
macro_rules! tuple_arguments {
    ($count:expr; $($position:tt => $element:ident),+) => {
        impl<$($element: FromArgument),+> FromArguments for ($($element,)+) {
            fn check(tags: &[TypeTag]) -> Result<(), String> {
                if tags.len() != $count {
                    return Err(format!(
                        "handler takes {} arguments but {} parameters are declared",
                        $count,
                        tags.len()
                    ));
                }
                $(
                    let tag = tags.get($position).copied();
                    if !tag.is_some_and($element::accepts) {
                        return Err(format!(
                            "handler argument {} cannot be bound from parameter type {}",
                            $position,
                            tag.map_or_else(String::new, |tag| tag.to_string())
                        ));
                    }
                )+
                Ok(())
            }

            fn from_arguments(arguments: BoundArguments) -> Result<Self, HandlerError> {
                let mut values = arguments.into_iter();
                Ok(($(next_argument::<$element>(&mut values, $position)?,)+))
            }
        }
    };
}

tuple_arguments!(1; 0 => A);
tuple_arguments!(2; 0 => A, 1 => B);
tuple_arguments!(3; 0 => A, 1 => B, 2 => C);
tuple_arguments!(4; 0 => A, 1 => B, 2 => C, 3 => D);
tuple_arguments!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
tuple_arguments!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
tuple_arguments!(7; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);
tuple_arguments!(8; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G, 7 => H);

// ============================================================================
// SECTION: Return Contract
// ============================================================================

/// Shape of a handler's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnContract {
    /// Asynchronous completion with no value.
    Completion,
    /// Asynchronous completion carrying a value.
    Value,
}

/// Result type a handler future resolves to.
pub trait HandlerOutput: Send + 'static {
    /// Contract the output type follows.
    const CONTRACT: ReturnContract;

    /// Converts the output into a completion.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when the handler failed or produced a value.
    fn into_completion(self) -> Result<(), HandlerError>;
}

impl HandlerOutput for () {
    const CONTRACT: ReturnContract = ReturnContract::Completion;

    fn into_completion(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl HandlerOutput for Result<(), HandlerError> {
    const CONTRACT: ReturnContract = ReturnContract::Completion;

    fn into_completion(self) -> Self {
        self
    }
}

impl HandlerOutput for String {
    const CONTRACT: ReturnContract = ReturnContract::Value;

    fn into_completion(self) -> Result<(), HandlerError> {
        Err(HandlerError::new("handler produced a value instead of completing"))
    }
}

impl HandlerOutput for Result<String, HandlerError> {
    const CONTRACT: ReturnContract = ReturnContract::Value;

    fn into_completion(self) -> Result<(), HandlerError> {
        self.and_then(String::into_completion)
    }
}

// ============================================================================
// SECTION: Handler Binding
// ============================================================================

/// Compiled handler plus the metadata needed to validate it.
#[derive(Clone)]
pub struct HandlerBinding {
    /// Reusable invocation callable.
    pub(crate) invoker: CompiledInvoker,
    /// Argument tuple check.
    pub(crate) check_arguments: fn(&[TypeTag]) -> Result<(), String>,
    /// Return contract of the handler.
    pub(crate) contract: ReturnContract,
    /// Declaring module type name, for instance handlers.
    pub(crate) module: Option<&'static str>,
    /// Metadata of the declaring module.
    pub(crate) module_metadata: ModuleMetadata,
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("contract", &self.contract)
            .field("module", &self.module)
            .field("module_metadata", &self.module_metadata)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Parameter Declarations
// ============================================================================

/// Declared handler parameter.
#[derive(Clone)]
pub struct ParameterDeclaration {
    /// Parameter name.
    pub(crate) name: ParameterName,
    /// Parameter description.
    pub(crate) description: String,
    /// Declared type.
    pub(crate) tag: TypeTag,
    /// Default value; parameters with one are optional.
    pub(crate) default: Option<ArgumentValue>,
    /// Inclusive numeric lower bound override.
    pub(crate) min_value: Option<f64>,
    /// Inclusive numeric upper bound override.
    pub(crate) max_value: Option<f64>,
    /// Inclusive length lower bound override.
    pub(crate) min_length: Option<u16>,
    /// Inclusive length upper bound override.
    pub(crate) max_length: Option<u16>,
    /// Fixed choices override.
    pub(crate) choices: Option<Vec<Choice>>,
    /// Channel kind filter override.
    pub(crate) channel_kinds: Option<Vec<ChannelKind>>,
    /// Suggestion callback.
    pub(crate) autocomplete: Option<Arc<dyn AutocompleteProvider>>,
}

impl ParameterDeclaration {
    /// Declares a required parameter.
    #[must_use]
    pub fn new(name: impl Into<ParameterName>, description: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tag,
            default: None,
            min_value: None,
            max_value: None,
            min_length: None,
            max_length: None,
            choices: None,
            channel_kinds: None,
            autocomplete: None,
        }
    }

    /// Makes the parameter optional with a default value.
    #[must_use]
    pub fn default_value(mut self, value: ArgumentValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Overrides the inclusive numeric lower bound.
    #[must_use]
    pub const fn min_value(mut self, value: f64) -> Self {
        self.min_value = Some(value);
        self
    }

    /// Overrides the inclusive numeric upper bound.
    #[must_use]
    pub const fn max_value(mut self, value: f64) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Overrides the inclusive length lower bound.
    #[must_use]
    pub const fn min_length(mut self, length: u16) -> Self {
        self.min_length = Some(length);
        self
    }

    /// Overrides the inclusive length upper bound.
    #[must_use]
    pub const fn max_length(mut self, length: u16) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Overrides the fixed choices.
    #[must_use]
    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Overrides the accepted channel kinds.
    #[must_use]
    pub fn channel_kinds(mut self, kinds: Vec<ChannelKind>) -> Self {
        self.channel_kinds = Some(kinds);
        self
    }

    /// Attaches a suggestion callback.
    #[must_use]
    pub fn autocomplete(mut self, provider: impl AutocompleteProvider + 'static) -> Self {
        self.autocomplete = Some(Arc::new(provider));
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &ParameterName {
        &self.name
    }
}

impl fmt::Debug for ParameterDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDeclaration")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("default", &self.default)
            .field("autocomplete", &self.autocomplete.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Command Declarations
// ============================================================================

/// Declared command awaiting validation.
#[derive(Clone)]
pub struct CommandDeclaration {
    /// Command name.
    pub(crate) name: CommandName,
    /// Command kind.
    pub(crate) kind: CommandKind,
    /// Description (chat-input commands).
    pub(crate) description: Option<String>,
    /// Declared parameters in order.
    pub(crate) parameters: Vec<ParameterDeclaration>,
    /// Command-level permission requirements.
    pub(crate) required_permissions: RequiredPermissions,
    /// Command-level preconditions in declaration order.
    pub(crate) preconditions: Vec<Arc<dyn Precondition>>,
    /// Permissions a member needs for the command to be visible by default.
    pub(crate) default_member_permissions: Option<Permissions>,
    /// DM availability; the service default applies when unset.
    pub(crate) dm_permission: Option<bool>,
    /// Age restriction flag.
    pub(crate) nsfw: bool,
    /// Guild the command is registered in.
    pub(crate) guild_id: Option<GuildId>,
    /// Ordering hint among commands.
    pub(crate) priority: i32,
    /// Bound handler.
    pub(crate) handler: Option<HandlerBinding>,
}

impl CommandDeclaration {
    /// Declares a command of the given kind.
    #[must_use]
    pub fn new(kind: CommandKind, name: impl Into<CommandName>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            parameters: Vec::new(),
            required_permissions: RequiredPermissions::default(),
            preconditions: Vec::new(),
            default_member_permissions: None,
            dm_permission: None,
            nsfw: false,
            guild_id: None,
            priority: 0,
            handler: None,
        }
    }

    /// Declares a chat-input (slash) command.
    #[must_use]
    pub fn slash(name: impl Into<CommandName>, description: impl Into<String>) -> Self {
        let mut declaration = Self::new(CommandKind::ChatInput, name);
        declaration.description = Some(description.into());
        declaration
    }

    /// Declares a user context-menu command.
    #[must_use]
    pub fn user(name: impl Into<CommandName>) -> Self {
        Self::new(CommandKind::User, name)
    }

    /// Declares a message context-menu command.
    #[must_use]
    pub fn message(name: impl Into<CommandName>) -> Self {
        Self::new(CommandKind::Message, name)
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDeclaration) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds guild and channel permissions the bot must hold.
    #[must_use]
    pub const fn require_bot_permissions(mut self, guild: Permissions, channel: Permissions) -> Self {
        self.required_permissions.bot_guild = self.required_permissions.bot_guild.union(guild);
        self.required_permissions.bot_channel = self.required_permissions.bot_channel.union(channel);
        self
    }

    /// Adds guild and channel permissions the caller must hold.
    #[must_use]
    pub const fn require_user_permissions(mut self, guild: Permissions, channel: Permissions) -> Self {
        self.required_permissions.user_guild = self.required_permissions.user_guild.union(guild);
        self.required_permissions.user_channel =
            self.required_permissions.user_channel.union(channel);
        self
    }

    /// Appends a precondition.
    #[must_use]
    pub fn precondition(mut self, precondition: impl Precondition + 'static) -> Self {
        self.preconditions.push(Arc::new(precondition));
        self
    }

    /// Sets the default member permissions.
    #[must_use]
    pub const fn default_member_permissions(mut self, permissions: Permissions) -> Self {
        self.default_member_permissions = Some(permissions);
        self
    }

    /// Sets DM availability.
    #[must_use]
    pub const fn dm_permission(mut self, allowed: bool) -> Self {
        self.dm_permission = Some(allowed);
        self
    }

    /// Marks the command age-restricted.
    #[must_use]
    pub const fn nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    /// Registers the command in one guild only.
    #[must_use]
    pub const fn guild(mut self, guild_id: GuildId) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    /// Sets the ordering hint; higher values sort first.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Binds an instance handler on a command module.
    ///
    /// A fresh module instance is created per request, the caller context is
    /// attached, then `handler` runs with the bound arguments.
    #[must_use]
    pub fn module_handler<M, Args, F, Fut, R>(mut self, handler: F) -> Self
    where
        M: CommandModule,
        Args: FromArguments,
        F: Fn(M, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: HandlerOutput,
    {
        self.handler = Some(HandlerBinding {
            invoker: compile_module_handler::<M, Args, F, Fut, R>(handler),
            check_arguments: Args::check,
            contract: R::CONTRACT,
            module: Some(std::any::type_name::<M>()),
            module_metadata: M::metadata(),
        });
        self
    }

    /// Binds a stateless handler.
    ///
    /// The handler receives the caller context and the bound arguments.
    #[must_use]
    pub fn static_handler<Args, F, Fut, R>(mut self, handler: F) -> Self
    where
        Args: FromArguments,
        F: Fn(Arc<InvocationContext>, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: HandlerOutput,
    {
        self.handler = Some(HandlerBinding {
            invoker: compile_static_handler::<Args, F, Fut, R>(handler),
            check_arguments: Args::check,
            contract: R::CONTRACT,
            module: None,
            module_metadata: ModuleMetadata::default(),
        });
        self
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }
}

impl fmt::Debug for CommandDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDeclaration")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("required_permissions", &self.required_permissions)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}
