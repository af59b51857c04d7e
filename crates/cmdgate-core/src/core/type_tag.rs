// crates/cmdgate-core/src/core/type_tag.rs
// ============================================================================
// Module: cmdgate Type Tags
// Description: Declared parameter types used to key the reader registry.
// Purpose: Name the closed set of parameter kinds a handler may declare.
// Dependencies: crate::core::{scope, values}
// ============================================================================

//! ## Overview
//! A [`TypeTag`] is the declared type of a parameter. The reader registry is
//! keyed by it; enumerations carry their static member table so an
//! unregistered enumeration can fall back to the default enum reader.
//! `Custom` tags let hosts register readers for their own types.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::scope::ChannelKind;
use crate::core::values::EnumSpec;

// ============================================================================
// SECTION: Channel Filters
// ============================================================================

/// Channel kinds accepted by text-capable channel parameters.
pub const TEXT_CHANNEL_KINDS: &[ChannelKind] = &[
    ChannelKind::TextGuild,
    ChannelKind::DirectMessage,
    ChannelKind::GroupDirectMessage,
    ChannelKind::NewsGuild,
    ChannelKind::NewsThread,
    ChannelKind::PublicThread,
    ChannelKind::PrivateThread,
];

/// Channel kinds accepted by voice channel parameters.
pub const VOICE_CHANNEL_KINDS: &[ChannelKind] = &[ChannelKind::VoiceGuild, ChannelKind::StageGuild];

/// Channel kinds accepted by category parameters.
pub const CATEGORY_CHANNEL_KINDS: &[ChannelKind] = &[ChannelKind::Category];

/// Channel kinds accepted by thread parameters.
pub const THREAD_CHANNEL_KINDS: &[ChannelKind] =
    &[ChannelKind::NewsThread, ChannelKind::PublicThread, ChannelKind::PrivateThread];

/// Channel kinds accepted by forum parameters.
pub const FORUM_CHANNEL_KINDS: &[ChannelKind] = &[ChannelKind::ForumGuild];

// ============================================================================
// SECTION: Type Tags
// ============================================================================

/// Declared parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// UTF-8 text.
    String,
    /// Signed 8-bit integer.
    I8,
    /// Unsigned 8-bit integer.
    U8,
    /// Signed 16-bit integer.
    I16,
    /// Unsigned 16-bit integer.
    U16,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 64-bit integer.
    U64,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Boolean.
    Bool,
    /// Absolute URL.
    Url,
    /// Any user.
    User,
    /// User who is a member of the current guild.
    GuildUser,
    /// Guild role.
    Role,
    /// Channel of any kind.
    Channel,
    /// Text-capable channel.
    TextChannel,
    /// Voice or stage channel.
    VoiceChannel,
    /// Channel category.
    CategoryChannel,
    /// Thread.
    Thread,
    /// Forum channel.
    ForumChannel,
    /// User or role.
    Mentionable,
    /// Uploaded attachment.
    Attachment,
    /// Static enumeration.
    Enum(&'static EnumSpec),
    /// Host-defined type resolved only through an explicit registration.
    Custom(&'static str),
}

impl TypeTag {
    /// Returns the channel kinds a channel tag restricts to; empty means any.
    #[must_use]
    pub const fn channel_kinds(self) -> &'static [ChannelKind] {
        match self {
            Self::TextChannel => TEXT_CHANNEL_KINDS,
            Self::VoiceChannel => VOICE_CHANNEL_KINDS,
            Self::CategoryChannel => CATEGORY_CHANNEL_KINDS,
            Self::Thread => THREAD_CHANNEL_KINDS,
            Self::ForumChannel => FORUM_CHANNEL_KINDS,
            _ => &[],
        }
    }

    /// Returns true for any channel tag.
    #[must_use]
    pub const fn is_channel(self) -> bool {
        matches!(
            self,
            Self::Channel
                | Self::TextChannel
                | Self::VoiceChannel
                | Self::CategoryChannel
                | Self::Thread
                | Self::ForumChannel
        )
    }

    /// Returns true for any integral tag.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::U8 | Self::I16 | Self::U16 | Self::I32 | Self::U32 | Self::I64 | Self::U64
        )
    }

    /// Returns the enumeration table for enum tags.
    #[must_use]
    pub const fn enum_spec(self) -> Option<&'static EnumSpec> {
        match self {
            Self::Enum(spec) => Some(spec),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Url => "url",
            Self::User => "user",
            Self::GuildUser => "guild user",
            Self::Role => "role",
            Self::Channel => "channel",
            Self::TextChannel => "text channel",
            Self::VoiceChannel => "voice channel",
            Self::CategoryChannel => "category channel",
            Self::Thread => "thread",
            Self::ForumChannel => "forum channel",
            Self::Mentionable => "mentionable",
            Self::Attachment => "attachment",
            Self::Enum(spec) => return write!(f, "enum {}", spec.name),
            Self::Custom(name) => name,
        };
        f.write_str(label)
    }
}
