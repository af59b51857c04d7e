// crates/cmdgate-core/src/runtime/readers.rs
// ============================================================================
// Module: cmdgate Built-in Type Readers
// Description: Readers for text, numeric, boolean, URL, entity and enum types.
// Purpose: Convert raw platform argument values into typed argument values.
// Dependencies: crate::{core, interfaces}, async-trait, bigdecimal, url
// ============================================================================

//! ## Overview
//! Built-in readers accept both already typed primitives and their text forms.
//! Numeric text is parsed with a fixed, locale-independent grammar: an
//! optional leading sign, ASCII digits and (for fractional kinds) one decimal
//! point. Numeric bounds default to the type's range clamped to the platform's
//! safe-integer window of plus or minus 2^53.
//!
//! Entity readers look identifiers up in the request's resolved entities and
//! fail with [`ReadError::EntityNotFound`] when the platform did not resolve
//! them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use url::Url;

use crate::core::ArgumentValue;
use crate::core::AttachmentId;
use crate::core::ChannelId;
use crate::core::ChannelRef;
use crate::core::Choice;
use crate::core::Mentionable;
use crate::core::OptionKind;
use crate::core::RawArgument;
use crate::core::ReadError;
use crate::core::RoleId;
use crate::core::TypeTag;
use crate::core::UserId;
use crate::interfaces::ReadRequest;
use crate::interfaces::TypeReader;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest numeric option value the platform accepts (2^53).
pub const PLATFORM_MAX_VALUE: f64 = 9_007_199_254_740_992.0;

/// Smallest numeric option value the platform accepts (-2^53).
pub const PLATFORM_MIN_VALUE: f64 = -9_007_199_254_740_992.0;

/// Largest text length the platform accepts for string options.
pub const PLATFORM_MAX_LENGTH: u16 = 6000;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the standard shape-mismatch error.
fn unexpected_shape(expected: &str, raw: &RawArgument) -> ReadError {
    ReadError::Invalid(format!("expected {expected}, got {}", raw.shape()))
}

/// Returns true for `[+-]?digits` text.
fn is_integral_text(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Returns true for `[+-]?digits[.digits]` text, allowing either side empty.
fn is_fractional_text(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let mut seen_point = false;
    let mut seen_digit = false;
    for byte in body.bytes() {
        match byte {
            b'0' ..= b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Parses a snowflake from text or a non-negative integer.
fn snowflake(raw: &RawArgument) -> Result<u64, ReadError> {
    match raw {
        RawArgument::Text(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| ReadError::Invalid(format!("'{text}' is not a valid snowflake"))),
        RawArgument::Integer(value) => u64::try_from(*value)
            .map_err(|_| ReadError::Invalid(format!("{value} is not a valid snowflake"))),
        other => Err(unexpected_shape("snowflake", other)),
    }
}

// ============================================================================
// SECTION: Text
// ============================================================================

/// Reads UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReader;

#[async_trait]
impl TypeReader for TextReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::String
    }

    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        match raw {
            RawArgument::Text(text) => Ok(ArgumentValue::Text(text.clone())),
            other => Err(unexpected_shape("text", other)),
        }
    }
}

// ============================================================================
// SECTION: Integers
// ============================================================================

/// Reads one integral type, rejecting values outside its range.
#[derive(Debug, Clone, Copy)]
pub struct IntegerReader {
    /// Type label used in range errors.
    label: &'static str,
    /// Smallest representable value.
    min: i128,
    /// Largest representable value.
    max: i128,
    /// Whether values bind as unsigned.
    unsigned: bool,
    /// Declared lower bound.
    min_bound: f64,
    /// Declared upper bound.
    max_bound: f64,
}

impl IntegerReader {
    /// Reader for `i8`.
    pub const I8: Self = Self::signed("i8", i8::MIN as i128, i8::MAX as i128, -128.0, 127.0);
    /// Reader for `u8`.
    pub const U8: Self = Self::unsigned("u8", u8::MAX as i128, 255.0);
    /// Reader for `i16`.
    pub const I16: Self = Self::signed("i16", i16::MIN as i128, i16::MAX as i128, -32_768.0, 32_767.0);
    /// Reader for `u16`.
    pub const U16: Self = Self::unsigned("u16", u16::MAX as i128, 65_535.0);
    /// Reader for `i32`.
    pub const I32: Self = Self::signed(
        "i32",
        i32::MIN as i128,
        i32::MAX as i128,
        -2_147_483_648.0,
        2_147_483_647.0,
    );
    /// Reader for `u32`.
    pub const U32: Self = Self::unsigned("u32", u32::MAX as i128, 4_294_967_295.0);
    /// Reader for `i64`.
    pub const I64: Self = Self::signed(
        "i64",
        i64::MIN as i128,
        i64::MAX as i128,
        PLATFORM_MIN_VALUE,
        PLATFORM_MAX_VALUE,
    );
    /// Reader for `u64`.
    pub const U64: Self = Self::unsigned("u64", u64::MAX as i128, PLATFORM_MAX_VALUE);

    /// Builds a signed reader.
    const fn signed(label: &'static str, min: i128, max: i128, min_bound: f64, max_bound: f64) -> Self {
        Self {
            label,
            min,
            max,
            unsigned: false,
            min_bound,
            max_bound,
        }
    }

    /// Builds an unsigned reader.
    const fn unsigned(label: &'static str, max: i128, max_bound: f64) -> Self {
        Self {
            label,
            min: 0,
            max,
            unsigned: true,
            min_bound: 0.0,
            max_bound,
        }
    }

    /// Parses a raw value into a wide integer.
    fn parse(&self, raw: &RawArgument) -> Result<i128, ReadError> {
        match raw {
            RawArgument::Integer(value) => Ok(i128::from(*value)),
            RawArgument::Text(text) if is_integral_text(text) => text
                .parse::<i128>()
                .map_err(|_| ReadError::Invalid(format!("'{text}' is out of range for {}", self.label))),
            RawArgument::Text(text) => {
                Err(ReadError::Invalid(format!("'{text}' is not a valid {}", self.label)))
            }
            other => Err(unexpected_shape("integer", other)),
        }
    }
}

#[async_trait]
impl TypeReader for IntegerReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Integer
    }

    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let value = self.parse(raw)?;
        if value < self.min || value > self.max {
            return Err(ReadError::Invalid(format!("{value} is out of range for {}", self.label)));
        }
        let bound = if self.unsigned {
            u64::try_from(value).ok().map(ArgumentValue::Unsigned)
        } else {
            i64::try_from(value).ok().map(ArgumentValue::Integer)
        };
        bound.ok_or_else(|| ReadError::Invalid(format!("{value} is out of range for {}", self.label)))
    }

    fn min_value(&self) -> Option<f64> {
        Some(self.min_bound)
    }

    fn max_value(&self) -> Option<f64> {
        Some(self.max_bound)
    }
}

// ============================================================================
// SECTION: Floats and Decimals
// ============================================================================

/// Reads a floating-point value.
#[derive(Debug, Clone, Copy)]
pub struct FloatReader {
    /// Whether the value must fit single precision.
    single: bool,
}

impl FloatReader {
    /// Reader for `f32`.
    pub const F32: Self = Self {
        single: true,
    };
    /// Reader for `f64`.
    pub const F64: Self = Self {
        single: false,
    };

    /// Returns the type label.
    const fn label(self) -> &'static str {
        if self.single { "f32" } else { "f64" }
    }
}

#[async_trait]
impl TypeReader for FloatReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Number
    }

    #[allow(clippy::cast_precision_loss, reason = "Platform numbers are doubles.")]
    #[allow(clippy::cast_possible_truncation, reason = "Single precision is range-checked below.")]
    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let value = match raw {
            RawArgument::Number(value) => *value,
            RawArgument::Integer(value) => *value as f64,
            RawArgument::Text(text) if is_fractional_text(text) => text
                .parse::<f64>()
                .map_err(|_| ReadError::Invalid(format!("'{text}' is not a valid {}", self.label())))?,
            RawArgument::Text(text) => {
                return Err(ReadError::Invalid(format!(
                    "'{text}' is not a valid {}",
                    self.label()
                )));
            }
            other => return Err(unexpected_shape("number", other)),
        };
        if !value.is_finite() || (self.single && !(value as f32).is_finite()) {
            return Err(ReadError::Invalid(format!("{value} is out of range for {}", self.label())));
        }
        Ok(ArgumentValue::Number(value))
    }

    fn min_value(&self) -> Option<f64> {
        Some(PLATFORM_MIN_VALUE)
    }

    fn max_value(&self) -> Option<f64> {
        Some(PLATFORM_MAX_VALUE)
    }
}

/// Reads an arbitrary-precision decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalReader;

#[async_trait]
impl TypeReader for DecimalReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Number
    }

    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let text = match raw {
            RawArgument::Text(text) => text.clone(),
            RawArgument::Integer(value) => value.to_string(),
            RawArgument::Number(value) if value.is_finite() => value.to_string(),
            other => return Err(unexpected_shape("decimal", other)),
        };
        if !is_fractional_text(&text) {
            return Err(ReadError::Invalid(format!("'{text}' is not a valid decimal")));
        }
        BigDecimal::from_str(&text)
            .map(ArgumentValue::Decimal)
            .map_err(|err| ReadError::Invalid(format!("'{text}' is not a valid decimal: {err}")))
    }

    fn min_value(&self) -> Option<f64> {
        Some(PLATFORM_MIN_VALUE)
    }

    fn max_value(&self) -> Option<f64> {
        Some(PLATFORM_MAX_VALUE)
    }
}

// ============================================================================
// SECTION: Boolean and URL
// ============================================================================

/// Reads a boolean from `true/false/yes/no/1/0`, case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanReader;

#[async_trait]
impl TypeReader for BooleanReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Boolean
    }

    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        match raw {
            RawArgument::Boolean(value) => Ok(ArgumentValue::Boolean(*value)),
            RawArgument::Integer(0) => Ok(ArgumentValue::Boolean(false)),
            RawArgument::Integer(1) => Ok(ArgumentValue::Boolean(true)),
            RawArgument::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(ArgumentValue::Boolean(true)),
                "false" | "no" | "0" => Ok(ArgumentValue::Boolean(false)),
                _ => Err(ReadError::Invalid(format!("'{text}' is not a valid boolean"))),
            },
            other => Err(unexpected_shape("boolean", other)),
        }
    }
}

/// Reads an absolute URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlReader;

#[async_trait]
impl TypeReader for UrlReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::String
    }

    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        match raw {
            RawArgument::Text(text) => Url::parse(text.trim())
                .map(ArgumentValue::Url)
                .map_err(|err| ReadError::Invalid(format!("'{text}' is not an absolute url: {err}"))),
            other => Err(unexpected_shape("url", other)),
        }
    }
}

// ============================================================================
// SECTION: Entities
// ============================================================================

/// Reads a user resolved by the platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserReader;

#[async_trait]
impl TypeReader for UserReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::User
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let user_id = UserId::new(snowflake(raw)?);
        if !request.context.resolved.users.contains_key(&user_id) {
            return Err(ReadError::EntityNotFound(format!("user {user_id}")));
        }
        Ok(ArgumentValue::User(user_id))
    }
}

/// Reads a user who is a member of the request's guild.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuildUserReader;

#[async_trait]
impl TypeReader for GuildUserReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::User
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let user_id = UserId::new(snowflake(raw)?);
        let is_member = request
            .context
            .guild
            .as_deref()
            .is_some_and(|guild| guild.member(user_id).is_some());
        if !is_member {
            return Err(ReadError::EntityNotFound(format!("guild user {user_id}")));
        }
        Ok(ArgumentValue::User(user_id))
    }
}

/// Reads a guild role.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleReader;

#[async_trait]
impl TypeReader for RoleReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Role
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let role_id = RoleId::new(snowflake(raw)?);
        let known = request.context.resolved.roles.contains_key(&role_id)
            || request
                .context
                .guild
                .as_deref()
                .is_some_and(|guild| guild.role_permissions(role_id).is_some());
        if !known {
            return Err(ReadError::EntityNotFound(format!("role {role_id}")));
        }
        Ok(ArgumentValue::Role(role_id))
    }
}

/// Reads a channel; the accepted kinds follow the declared tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelReader;

#[async_trait]
impl TypeReader for ChannelReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Channel
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let channel_id = ChannelId::new(snowflake(raw)?);
        let kind = request
            .context
            .resolved
            .channels
            .get(&channel_id)
            .copied()
            .ok_or_else(|| ReadError::EntityNotFound(format!("channel {channel_id}")))?;
        Ok(ArgumentValue::Channel(ChannelRef {
            channel_id,
            kind,
        }))
    }
}

/// Reads a user or role; users win when an id resolves as both.
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionableReader;

#[async_trait]
impl TypeReader for MentionableReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Mentionable
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let raw_id = snowflake(raw)?;
        let resolved = &request.context.resolved;
        if resolved.users.contains_key(&UserId::new(raw_id)) {
            return Ok(ArgumentValue::Mentionable(Mentionable::User(UserId::new(raw_id))));
        }
        if resolved.roles.contains_key(&RoleId::new(raw_id)) {
            return Ok(ArgumentValue::Mentionable(Mentionable::Role(RoleId::new(raw_id))));
        }
        Err(ReadError::EntityNotFound(format!("mentionable {raw_id}")))
    }
}

/// Reads an uploaded attachment.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentReader;

#[async_trait]
impl TypeReader for AttachmentReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Attachment
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let attachment_id = AttachmentId::new(snowflake(raw)?);
        if !request.context.resolved.attachments.contains_key(&attachment_id) {
            return Err(ReadError::EntityNotFound(format!("attachment {attachment_id}")));
        }
        Ok(ArgumentValue::Attachment(attachment_id))
    }
}

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Default reader for enumeration tags.
///
/// Members are exposed as integer choices; member names are also accepted,
/// case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumReader;

#[async_trait]
impl TypeReader for EnumReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::Integer
    }

    async fn read(
        &self,
        raw: &RawArgument,
        request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        let Some(spec) = request.tag.enum_spec() else {
            return Err(ReadError::Invalid(format!("{} is not an enumeration", request.tag)));
        };
        let member = match raw {
            RawArgument::Integer(value) => spec.member_by_value(*value),
            RawArgument::Text(text) => text
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|value| spec.member_by_value(value))
                .or_else(|| spec.member_by_name(text.trim())),
            other => return Err(unexpected_shape("enumeration member", other)),
        };
        member.map(ArgumentValue::Enum).ok_or_else(|| {
            ReadError::Invalid(format!("'{raw}' is not a member of {}", spec.name))
        })
    }

    fn choices(&self, tag: TypeTag) -> Vec<Choice> {
        tag.enum_spec().map_or_else(Vec::new, |spec| {
            spec.members.iter().map(|member| Choice::integer(member.name, member.value)).collect()
        })
    }
}
