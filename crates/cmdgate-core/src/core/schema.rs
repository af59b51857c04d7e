// crates/cmdgate-core/src/core/schema.rs
// ============================================================================
// Module: cmdgate Platform Schema
// Description: Platform-facing command and option schema objects.
// Purpose: Render registered descriptors for out-of-band command registration.
// Dependencies: crate::core::{identifiers, permissions, scope}, serde
// ============================================================================

//! ## Overview
//! Schema objects serialize to the platform's command registration shape:
//! numeric `type` tags, permission bit strings and numeric channel types. The
//! host uploads them; the core never talks to the platform itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeSeq;

use crate::core::identifiers::CommandName;
use crate::core::identifiers::GuildId;
use crate::core::identifiers::ParameterName;
use crate::core::permissions::Permissions;
use crate::core::scope::ChannelKind;

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Platform option kind a parameter is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Text option.
    String,
    /// Integral option.
    Integer,
    /// Boolean option.
    Boolean,
    /// User option.
    User,
    /// Channel option.
    Channel,
    /// Role option.
    Role,
    /// User-or-role option.
    Mentionable,
    /// Floating-point option.
    Number,
    /// Attachment option.
    Attachment,
}

impl OptionKind {
    /// Returns the platform's numeric option type.
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::String => 3,
            Self::Integer => 4,
            Self::Boolean => 5,
            Self::User => 6,
            Self::Channel => 7,
            Self::Role => 8,
            Self::Mentionable => 9,
            Self::Number => 10,
            Self::Attachment => 11,
        }
    }

    /// Returns true when the platform supports autocomplete for the kind.
    #[must_use]
    pub const fn supports_autocomplete(self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Number)
    }

    /// Returns true when numeric bounds apply to the kind.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }
}

/// Command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Slash command with options.
    ChatInput,
    /// User context-menu command (parameterless).
    User,
    /// Message context-menu command (parameterless).
    Message,
}

impl CommandKind {
    /// Returns the platform's numeric command type.
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::ChatInput => 1,
            Self::User => 2,
            Self::Message => 3,
        }
    }

    /// Returns true when the kind forbids declared parameters.
    #[must_use]
    pub const fn is_parameterless(self) -> bool {
        matches!(self, Self::User | Self::Message)
    }

    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChatInput => "chat_input",
            Self::User => "user",
            Self::Message => "message",
        }
    }
}

// ============================================================================
// SECTION: Choices
// ============================================================================

/// Value of a fixed or suggested choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    /// Text choice.
    Text(String),
    /// Integral choice.
    Integer(i64),
    /// Floating-point choice.
    Number(f64),
}

/// Named choice offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    /// Display name.
    pub name: String,
    /// Submitted value.
    pub value: ChoiceValue,
}

impl Choice {
    /// Creates a text choice.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Text(value.into()),
        }
    }

    /// Creates an integral choice.
    #[must_use]
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Integer(value),
        }
    }

    /// Creates a floating-point choice.
    #[must_use]
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ChoiceValue::Number(value),
        }
    }
}

// ============================================================================
// SECTION: Schema Objects
// ============================================================================

/// Platform-facing option schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSchema {
    /// Option kind.
    #[serde(rename = "type", serialize_with = "serialize_option_kind")]
    pub kind: OptionKind,
    /// Option name.
    pub name: ParameterName,
    /// Option description.
    pub description: String,
    /// Whether the option must be supplied.
    pub required: bool,
    /// Minimum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Maximum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Minimum text length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    /// Maximum text length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    /// Fixed choices.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Accepted channel kinds.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_channel_kinds")]
    pub channel_types: Vec<ChannelKind>,
    /// Whether suggestions are served by an autocomplete callback.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub autocomplete: bool,
}

/// Platform-facing command schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSchema {
    /// Command kind.
    #[serde(rename = "type", serialize_with = "serialize_command_kind")]
    pub kind: CommandKind,
    /// Command name.
    pub name: CommandName,
    /// Description (chat-input commands only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered options.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
    /// Permissions a member needs for the command to be visible by default.
    #[serde(serialize_with = "serialize_permission_bits")]
    pub default_member_permissions: Option<Permissions>,
    /// Whether the command is available in direct messages.
    pub dm_permission: bool,
    /// Whether the command is age-restricted.
    pub nsfw: bool,
    /// Guild the command is registered in; global when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<GuildId>,
}

// ============================================================================
// SECTION: Serialization Helpers
// ============================================================================

/// Serializes an option kind as its numeric wire value.
fn serialize_option_kind<S: Serializer>(kind: &OptionKind, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(kind.wire_value())
}

/// Serializes a command kind as its numeric wire value.
fn serialize_command_kind<S: Serializer>(
    kind: &CommandKind,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(kind.wire_value())
}

/// Serializes channel kinds as numeric wire values.
fn serialize_channel_kinds<S: Serializer>(
    kinds: &[ChannelKind],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(kinds.len()))?;
    for kind in kinds {
        seq.serialize_element(&kind.wire_value())?;
    }
    seq.end()
}

/// Serializes permissions as a decimal bit string, or null.
fn serialize_permission_bits<S: Serializer>(
    permissions: &Option<Permissions>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match permissions {
        Some(permissions) => serializer.serialize_str(&permissions.bits().to_string()),
        None => serializer.serialize_none(),
    }
}
