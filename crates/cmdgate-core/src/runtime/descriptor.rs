// crates/cmdgate-core/src/runtime/descriptor.rs
// ============================================================================
// Module: cmdgate Command Descriptors
// Description: Validated, immutable command and parameter descriptors.
// Purpose: Turn declarations into descriptors the runtime can execute safely.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`DescriptorBuilder`] validates a [`CommandDeclaration`] against the reader
//! registry and produces a [`CommandDescriptor`]. Every definition rule is
//! checked here, so a registered descriptor never fails for structural
//! reasons at request time.
//!
//! Permission requirements declared on the command are unioned with those of
//! the declaring module. Non-empty merged sets become built-in checks at the
//! head of the precondition pipeline (bot before user), followed by module
//! preconditions, then command preconditions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::core::ArgumentValue;
use crate::core::AttachmentId;
use crate::core::ChannelKind;
use crate::core::ChannelRef;
use crate::core::Choice;
use crate::core::CommandKind;
use crate::core::CommandName;
use crate::core::CommandSchema;
use crate::core::DefinitionError;
use crate::core::EnumMember;
use crate::core::GuildId;
use crate::core::Mentionable;
use crate::core::OptionKind;
use crate::core::OptionSchema;
use crate::core::ParameterName;
use crate::core::Permissions;
use crate::core::RequiredPermissions;
use crate::core::RoleId;
use crate::core::TypeTag;
use crate::core::UserId;
use crate::interfaces::Precondition;
use crate::interfaces::TypeReader;
use crate::runtime::autocomplete::AutocompleteRouter;
use crate::runtime::binding::check_bounds;
use crate::runtime::declaration::CommandDeclaration;
use crate::runtime::declaration::FromArgument;
use crate::runtime::declaration::ParameterDeclaration;
use crate::runtime::declaration::ReturnContract;
use crate::runtime::invoker::CompiledInvoker;
use crate::runtime::preconditions::PermissionMessages;
use crate::runtime::preconditions::PreconditionPipeline;
use crate::runtime::preconditions::RequireBotPermissions;
use crate::runtime::preconditions::RequireUserPermissions;
use crate::runtime::readers::PLATFORM_MAX_LENGTH;
use crate::runtime::registry::TypeReaderRegistry;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum command and parameter name length, in characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum command and parameter description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Maximum number of parameters per command.
pub const MAX_PARAMETERS: usize = 25;

/// Maximum number of fixed choices per parameter.
pub const MAX_CHOICES: usize = 25;

// ============================================================================
// SECTION: Parameter Descriptors
// ============================================================================

/// Immutable, validated parameter metadata.
#[derive(Clone)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: ParameterName,
    /// Parameter description.
    pub description: String,
    /// Declared type.
    pub tag: TypeTag,
    /// Platform option kind.
    pub option_kind: OptionKind,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Value bound when the argument is absent.
    pub default: Option<ArgumentValue>,
    /// Inclusive numeric lower bound.
    pub min_value: Option<f64>,
    /// Inclusive numeric upper bound.
    pub max_value: Option<f64>,
    /// Inclusive length lower bound.
    pub min_length: Option<u16>,
    /// Inclusive length upper bound.
    pub max_length: Option<u16>,
    /// Fixed choices.
    pub choices: Vec<Choice>,
    /// Accepted channel kinds; empty means any.
    pub channel_kinds: Vec<ChannelKind>,
    /// Whether suggestions come from an autocomplete callback.
    pub autocomplete: bool,
    /// Reader converting raw values.
    reader: Arc<dyn TypeReader>,
}

impl ParameterDescriptor {
    /// Returns the reader bound at registration.
    #[must_use]
    pub fn reader(&self) -> &dyn TypeReader {
        self.reader.as_ref()
    }

    /// Renders the platform option schema.
    #[must_use]
    pub fn schema(&self) -> OptionSchema {
        OptionSchema {
            kind: self.option_kind,
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required,
            min_value: self.min_value,
            max_value: self.max_value,
            min_length: self.min_length,
            max_length: self.max_length,
            choices: self.choices.clone(),
            channel_types: self.channel_kinds.clone(),
            autocomplete: self.autocomplete,
        }
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("option_kind", &self.option_kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("channel_kinds", &self.channel_kinds)
            .field("autocomplete", &self.autocomplete)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Command Descriptors
// ============================================================================

/// Immutable, validated command shared by concurrent requests.
///
/// # Invariants
/// - Parameters with defaults follow every parameter without one.
/// - The handler's argument tuple matches the parameters.
/// - Permission sets include every bit declared by the module.
pub struct CommandDescriptor {
    /// Command name.
    name: CommandName,
    /// Command kind.
    kind: CommandKind,
    /// Description (chat-input commands only).
    description: Option<String>,
    /// Ordered parameters.
    parameters: Vec<ParameterDescriptor>,
    /// Declaring module type name for instance handlers.
    module: Option<&'static str>,
    /// Merged permission requirements.
    required_permissions: RequiredPermissions,
    /// Ordered authorization checks.
    preconditions: PreconditionPipeline,
    /// Permissions a member needs to see the command by default.
    default_member_permissions: Option<Permissions>,
    /// DM availability.
    dm_permission: bool,
    /// Age restriction flag.
    nsfw: bool,
    /// Guild the command is registered in.
    guild_id: Option<GuildId>,
    /// Ordering hint.
    priority: i32,
    /// Compiled handler.
    invoker: CompiledInvoker,
    /// Suggestion callbacks keyed by parameter.
    autocomplete: AutocompleteRouter,
}

impl CommandDescriptor {
    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &CommandName {
        &self.name
    }

    /// Returns the command kind.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the parameters in declared order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &ParameterName) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|parameter| &parameter.name == name)
    }

    /// Returns the declaring module type name, for instance handlers.
    #[must_use]
    pub const fn module(&self) -> Option<&'static str> {
        self.module
    }

    /// Returns the merged permission requirements.
    #[must_use]
    pub const fn required_permissions(&self) -> RequiredPermissions {
        self.required_permissions
    }

    /// Returns the precondition pipeline.
    #[must_use]
    pub const fn preconditions(&self) -> &PreconditionPipeline {
        &self.preconditions
    }

    /// Returns DM availability.
    #[must_use]
    pub const fn dm_permission(&self) -> bool {
        self.dm_permission
    }

    /// Returns the ordering hint.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the compiled handler.
    #[must_use]
    pub const fn invoker(&self) -> &CompiledInvoker {
        &self.invoker
    }

    /// Returns the autocomplete router.
    #[must_use]
    pub const fn autocomplete(&self) -> &AutocompleteRouter {
        &self.autocomplete
    }

    /// Renders the platform command schema.
    #[must_use]
    pub fn schema(&self) -> CommandSchema {
        CommandSchema {
            kind: self.kind,
            name: self.name.clone(),
            description: self.description.clone(),
            options: self.parameters.iter().map(ParameterDescriptor::schema).collect(),
            default_member_permissions: self.default_member_permissions,
            dm_permission: self.dm_permission,
            nsfw: self.nsfw,
            guild_id: self.guild_id,
        }
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("module", &self.module)
            .field("required_permissions", &self.required_permissions)
            .field("preconditions", &self.preconditions)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Validates declarations into descriptors.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    /// Registry used to resolve parameter readers.
    registry: &'a TypeReaderRegistry,
    /// Message formats for built-in permission checks.
    messages: &'a PermissionMessages,
    /// DM availability for commands that do not declare it.
    default_dm_permission: bool,
}

impl<'a> DescriptorBuilder<'a> {
    /// Creates a builder.
    #[must_use]
    pub const fn new(
        registry: &'a TypeReaderRegistry,
        messages: &'a PermissionMessages,
        default_dm_permission: bool,
    ) -> Self {
        Self {
            registry,
            messages,
            default_dm_permission,
        }
    }

    /// Validates a declaration and builds its descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] when the declaration violates a definition
    /// rule or a parameter type has no reader.
    pub fn build(&self, declaration: CommandDeclaration) -> Result<CommandDescriptor, DefinitionError> {
        let CommandDeclaration {
            name,
            kind,
            description,
            parameters,
            required_permissions,
            preconditions,
            default_member_permissions,
            dm_permission,
            nsfw,
            guild_id,
            priority,
            handler,
        } = declaration;

        validate_command_name(&name, kind)?;
        let description = validate_command_description(&name, kind, description)?;
        let handler = handler
            .ok_or_else(|| DefinitionError::invalid(&name, "no handler is bound"))?;
        if handler.contract != ReturnContract::Completion {
            return Err(DefinitionError::invalid(
                &name,
                "handler must complete asynchronously without producing a value",
            ));
        }
        if kind.is_parameterless() && !parameters.is_empty() {
            return Err(DefinitionError::invalid(
                &name,
                "user and message commands cannot declare parameters",
            ));
        }
        if parameters.len() > MAX_PARAMETERS {
            return Err(DefinitionError::invalid(
                &name,
                format!("at most {MAX_PARAMETERS} parameters are allowed"),
            ));
        }

        let mut router = AutocompleteRouter::new();
        let mut seen = BTreeSet::new();
        let mut optional_seen = false;
        let mut descriptors = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if !seen.insert(parameter.name.clone()) {
                return Err(DefinitionError::invalid(
                    &name,
                    format!("parameter '{}' is declared twice", parameter.name),
                ));
            }
            let descriptor = self.build_parameter(&name, parameter, &mut router)?;
            if descriptor.required && optional_seen {
                return Err(DefinitionError::invalid(
                    &name,
                    format!(
                        "required parameter '{}' follows a parameter with a default value",
                        descriptor.name
                    ),
                ));
            }
            optional_seen |= !descriptor.required;
            descriptors.push(descriptor);
        }

        let tags: Vec<TypeTag> = descriptors.iter().map(|parameter| parameter.tag).collect();
        (handler.check_arguments)(&tags).map_err(|reason| DefinitionError::invalid(&name, reason))?;

        let module_metadata = handler.module_metadata;
        let required_permissions =
            required_permissions.union(module_metadata.required_permissions);
        let mut checks: Vec<Arc<dyn Precondition>> = Vec::new();
        if required_permissions.requires_bot() {
            checks.push(Arc::new(RequireBotPermissions::with_formats(
                required_permissions.bot_guild,
                required_permissions.bot_channel,
                self.messages.bot_guild.clone(),
                self.messages.bot_channel.clone(),
            )));
        }
        if required_permissions.requires_user() {
            checks.push(Arc::new(RequireUserPermissions::with_formats(
                required_permissions.user_guild,
                required_permissions.user_channel,
                self.messages.user_guild.clone(),
                self.messages.user_channel.clone(),
            )));
        }
        checks.extend(module_metadata.preconditions);
        checks.extend(preconditions);

        Ok(CommandDescriptor {
            name,
            kind,
            description,
            parameters: descriptors,
            module: handler.module,
            required_permissions,
            preconditions: PreconditionPipeline::new(checks),
            default_member_permissions,
            dm_permission: dm_permission.unwrap_or(self.default_dm_permission),
            nsfw,
            guild_id,
            priority,
            invoker: handler.invoker,
            autocomplete: router,
        })
    }

    /// Validates one parameter and resolves its reader.
    fn build_parameter(
        &self,
        command: &CommandName,
        declaration: ParameterDeclaration,
        router: &mut AutocompleteRouter,
    ) -> Result<ParameterDescriptor, DefinitionError> {
        let ParameterDeclaration {
            name,
            description,
            tag,
            default,
            min_value,
            max_value,
            min_length,
            max_length,
            choices,
            channel_kinds,
            autocomplete,
        } = declaration;

        if !is_valid_chat_name(name.as_str()) {
            return Err(DefinitionError::invalid(
                command,
                format!(
                    "parameter name '{name}' must be 1-{MAX_NAME_LENGTH} lowercase letters, digits, \
                     '-' or '_'"
                ),
            ));
        }
        let description_length = description.chars().count();
        if description_length == 0 || description_length > MAX_DESCRIPTION_LENGTH {
            return Err(DefinitionError::invalid(
                command,
                format!(
                    "parameter '{name}' description must be 1-{MAX_DESCRIPTION_LENGTH} characters"
                ),
            ));
        }
        let reader = self.registry.resolve(tag).ok_or_else(|| {
            DefinitionError::UnsupportedParameterType {
                command: command.clone(),
                parameter: name.clone(),
                type_tag: tag.to_string(),
            }
        })?;
        let option_kind = reader.option_kind();

        if (min_value.is_some() || max_value.is_some()) && !option_kind.is_numeric() {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' is not numeric and cannot declare value bounds"),
            ));
        }
        if (min_length.is_some() || max_length.is_some()) && option_kind != OptionKind::String {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' is not text and cannot declare length bounds"),
            ));
        }
        if channel_kinds.is_some() && !tag.is_channel() {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' is not a channel and cannot filter channel kinds"),
            ));
        }

        let min_value = min_value.or_else(|| reader.min_value());
        let max_value = max_value.or_else(|| reader.max_value());
        if let (Some(min), Some(max)) = (min_value, max_value)
            && min > max
        {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' minimum value {min} exceeds maximum {max}"),
            ));
        }
        let min_length = min_length.or_else(|| reader.min_length());
        let max_length = max_length.or_else(|| reader.max_length());
        if let (Some(min), Some(max)) = (min_length, max_length)
            && min > max
        {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' minimum length {min} exceeds maximum {max}"),
            ));
        }
        if max_length.is_some_and(|max| max == 0 || max > PLATFORM_MAX_LENGTH) {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' maximum length must be 1-{PLATFORM_MAX_LENGTH}"),
            ));
        }

        let choices = choices.unwrap_or_else(|| reader.choices(tag));
        if choices.len() > MAX_CHOICES {
            return Err(DefinitionError::invalid(
                command,
                format!("parameter '{name}' declares more than {MAX_CHOICES} choices"),
            ));
        }
        let channel_kinds = channel_kinds.unwrap_or_else(|| reader.channel_kinds(tag).to_vec());

        let has_autocomplete = autocomplete.is_some();
        if let Some(provider) = autocomplete {
            if !option_kind.supports_autocomplete() {
                return Err(DefinitionError::invalid(
                    command,
                    format!("parameter '{name}' kind does not support autocomplete"),
                ));
            }
            if !choices.is_empty() {
                return Err(DefinitionError::invalid(
                    command,
                    format!("parameter '{name}' cannot combine autocomplete with fixed choices"),
                ));
            }
            router.register(name.clone(), provider);
        }

        if let Some(value) = &default
            && !default_matches(tag, value, &channel_kinds)
        {
            return Err(DefinitionError::invalid(
                command,
                format!(
                    "parameter '{name}' default value of kind {} cannot be read as {tag}",
                    value.kind_label()
                ),
            ));
        }

        let descriptor = ParameterDescriptor {
            name,
            description,
            tag,
            option_kind,
            required: default.is_none(),
            default,
            min_value,
            max_value,
            min_length,
            max_length,
            choices,
            channel_kinds,
            autocomplete: has_autocomplete,
            reader,
        };
        if let Some(value) = &descriptor.default {
            check_bounds(&descriptor, value).map_err(|failure| {
                DefinitionError::invalid(
                    command,
                    format!(
                        "parameter '{}' default value is out of bounds: {}",
                        descriptor.name, failure.reason
                    ),
                )
            })?;
        }
        Ok(descriptor)
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Returns true for 1-32 lowercase letters, digits, `-` or `_`.
#[must_use]
pub fn is_valid_chat_name(name: &str) -> bool {
    let length = name.chars().count();
    (1 ..= MAX_NAME_LENGTH).contains(&length)
        && name
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
}

/// Validates a command name for its kind.
fn validate_command_name(name: &CommandName, kind: CommandKind) -> Result<(), DefinitionError> {
    let valid = match kind {
        CommandKind::ChatInput => is_valid_chat_name(name.as_str()),
        CommandKind::User | CommandKind::Message => {
            let length = name.as_str().trim().chars().count();
            (1 ..= MAX_NAME_LENGTH).contains(&length)
        }
    };
    if valid {
        Ok(())
    } else {
        Err(DefinitionError::invalid(
            name,
            format!("command name must be 1-{MAX_NAME_LENGTH} characters and valid for its kind"),
        ))
    }
}

/// Validates the description rules for a command kind.
fn validate_command_description(
    name: &CommandName,
    kind: CommandKind,
    description: Option<String>,
) -> Result<Option<String>, DefinitionError> {
    match (kind, description) {
        (CommandKind::ChatInput, Some(description)) => {
            let length = description.chars().count();
            if length == 0 || length > MAX_DESCRIPTION_LENGTH {
                return Err(DefinitionError::invalid(
                    name,
                    format!("description must be 1-{MAX_DESCRIPTION_LENGTH} characters"),
                ));
            }
            Ok(Some(description))
        }
        (CommandKind::ChatInput, None) => {
            Err(DefinitionError::invalid(name, "chat-input commands require a description"))
        }
        (CommandKind::User | CommandKind::Message, Some(_)) => {
            Err(DefinitionError::invalid(name, "context-menu commands cannot have a description"))
        }
        (CommandKind::User | CommandKind::Message, None) => Ok(None),
    }
}

/// Returns true when a default value could have been read for the tag.
fn default_matches(tag: TypeTag, value: &ArgumentValue, channel_kinds: &[ChannelKind]) -> bool {
    let value = value.clone();
    match tag {
        TypeTag::String => String::accepts_value(value),
        TypeTag::I8 => i8::accepts_value(value),
        TypeTag::U8 => u8::accepts_value(value),
        TypeTag::I16 => i16::accepts_value(value),
        TypeTag::U16 => u16::accepts_value(value),
        TypeTag::I32 => i32::accepts_value(value),
        TypeTag::U32 => u32::accepts_value(value),
        TypeTag::I64 => i64::accepts_value(value),
        TypeTag::U64 => u64::accepts_value(value),
        TypeTag::F32 => f32::accepts_value(value),
        TypeTag::F64 => f64::accepts_value(value),
        TypeTag::Decimal => matches!(value, ArgumentValue::Decimal(_)),
        TypeTag::Bool => bool::accepts_value(value),
        TypeTag::Url => matches!(value, ArgumentValue::Url(_)),
        TypeTag::User | TypeTag::GuildUser => UserId::accepts_value(value),
        TypeTag::Role => RoleId::accepts_value(value),
        TypeTag::Channel
        | TypeTag::TextChannel
        | TypeTag::VoiceChannel
        | TypeTag::CategoryChannel
        | TypeTag::Thread
        | TypeTag::ForumChannel => ChannelRef::from_argument(value).is_some_and(|channel| {
            channel_kinds.is_empty() || channel_kinds.contains(&channel.kind)
        }),
        TypeTag::Mentionable => Mentionable::accepts_value(value),
        TypeTag::Attachment => AttachmentId::accepts_value(value),
        TypeTag::Enum(spec) => EnumMember::from_argument(value)
            .is_some_and(|member| spec.members.contains(&member)),
        TypeTag::Custom(_) => true,
    }
}

/// Value-shape check shared by every [`FromArgument`] type.
trait AcceptsValue: FromArgument {
    /// Returns true when the value converts into `Self`.
    fn accepts_value(value: ArgumentValue) -> bool {
        Self::from_argument(value).is_some()
    }
}

impl<T: FromArgument> AcceptsValue for T {}
