// crates/cmdgate-core/src/core/values.rs
// ============================================================================
// Module: cmdgate Argument Values
// Description: Raw inbound argument values and bound typed values.
// Purpose: Define the closed set of values flowing from readers to handlers.
// Dependencies: bigdecimal, serde, url
// ============================================================================

//! ## Overview
//! [`RawArgument`] is what the transport delivers: text or an already typed
//! primitive. [`ArgumentValue`] is what a type reader produces and what handlers
//! receive positionally. Enumerations are described by static [`EnumSpec`]
//! tables so the default enum reader can map names and integral values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::core::identifiers::AttachmentId;
use crate::core::identifiers::ChannelId;
use crate::core::identifiers::RoleId;
use crate::core::identifiers::UserId;
use crate::core::scope::ChannelKind;

// ============================================================================
// SECTION: Raw Arguments
// ============================================================================

/// Raw argument value delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawArgument {
    /// Boolean primitive.
    Boolean(bool),
    /// Integral primitive.
    Integer(i64),
    /// Floating-point primitive.
    Number(f64),
    /// Textual value (also used for snowflakes).
    Text(String),
}

impl RawArgument {
    /// Returns a short label for the raw shape, used in error messages.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for RawArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => value.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::Number(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

impl From<&str> for RawArgument {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawArgument {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawArgument {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for RawArgument {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for RawArgument {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Member of a static enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumMember {
    /// Member name, matched case-insensitively.
    pub name: &'static str,
    /// Integral value of the member.
    pub value: i64,
}

/// Static enumeration description.
///
/// # Invariants
/// - `name` identifies the enumeration; two specs with the same name are the
///   same type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumSpec {
    /// Enumeration name.
    pub name: &'static str,
    /// Members in declaration order.
    pub members: &'static [EnumMember],
}

impl EnumSpec {
    /// Finds a member by case-insensitive name.
    #[must_use]
    pub fn member_by_name(&self, name: &str) -> Option<EnumMember> {
        self.members.iter().copied().find(|member| member.name.eq_ignore_ascii_case(name))
    }

    /// Finds a member by integral value.
    #[must_use]
    pub fn member_by_value(&self, value: i64) -> Option<EnumMember> {
        self.members.iter().copied().find(|member| member.value == value)
    }
}

// ============================================================================
// SECTION: Bound Values
// ============================================================================

/// Channel referenced by an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelRef {
    /// Channel identifier.
    pub channel_id: ChannelId,
    /// Concrete channel kind.
    pub kind: ChannelKind,
}

/// Entity referenced by a mentionable argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mentionable {
    /// A user mention.
    User(UserId),
    /// A role mention.
    Role(RoleId),
}

/// Typed argument value bound to a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Text value.
    Text(String),
    /// Signed integral value.
    Integer(i64),
    /// Unsigned integral value.
    Unsigned(u64),
    /// Floating-point value.
    Number(f64),
    /// Arbitrary-precision decimal value.
    Decimal(BigDecimal),
    /// Boolean value.
    Boolean(bool),
    /// Absolute URL.
    Url(Url),
    /// User reference.
    User(UserId),
    /// Role reference.
    Role(RoleId),
    /// Channel reference.
    Channel(ChannelRef),
    /// User or role reference.
    Mentionable(Mentionable),
    /// Attachment reference.
    Attachment(AttachmentId),
    /// Member of an enumeration.
    Enum(EnumMember),
}

impl ArgumentValue {
    /// Returns a short label for the value kind, used in error messages.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Unsigned(_) => "unsigned integer",
            Self::Number(_) => "number",
            Self::Decimal(_) => "decimal",
            Self::Boolean(_) => "boolean",
            Self::Url(_) => "url",
            Self::User(_) => "user",
            Self::Role(_) => "role",
            Self::Channel(_) => "channel",
            Self::Mentionable(_) => "mentionable",
            Self::Attachment(_) => "attachment",
            Self::Enum(_) => "enum",
        }
    }

    /// Returns integral values widened without loss.
    #[must_use]
    pub fn integral(&self) -> Option<i128> {
        match self {
            Self::Integer(value) => Some(i128::from(*value)),
            Self::Unsigned(value) => Some(i128::from(*value)),
            _ => None,
        }
    }

    /// Returns fractional values as a float for numeric bound checks.
    ///
    /// Integral values are excluded; see [`ArgumentValue::integral`].
    #[must_use]
    pub fn fractional(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Decimal(value) => value.to_string().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Returns the character count for length bound checks.
    #[must_use]
    pub fn text_length(&self) -> Option<usize> {
        match self {
            Self::Text(value) => Some(value.chars().count()),
            _ => None,
        }
    }
}
