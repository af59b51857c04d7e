// crates/cmdgate-core/src/core/permissions.rs
// ============================================================================
// Module: cmdgate Permissions
// Description: Platform permission flags and channel overwrites.
// Purpose: Provide the fixed-width bit set used by every authorization check.
// Dependencies: bitflags, serde
// ============================================================================

//! ## Overview
//! [`Permissions`] is a 64-bit flag set mirroring the platform's permission
//! bits. [`PermissionOverwrite`] is a channel-scoped allow/deny delta for a role
//! or a single member.
//!
//! `ADMINISTRATOR` supersedes every specific permission check; the resolver
//! in [`crate::runtime::permission`] short-circuits on it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use bitflags::bitflags;
use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::RoleId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Permission Flags
// ============================================================================

bitflags! {
    /// Platform permission bit set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Permissions: u64 {
        /// Create channel invites.
        const CREATE_INSTANT_INVITE = 1 << 0;
        /// Kick members.
        const KICK_MEMBERS = 1 << 1;
        /// Ban members.
        const BAN_MEMBERS = 1 << 2;
        /// Every permission, bypassing channel overwrites.
        const ADMINISTRATOR = 1 << 3;
        /// Manage channels.
        const MANAGE_CHANNELS = 1 << 4;
        /// Manage the guild.
        const MANAGE_GUILD = 1 << 5;
        /// Add reactions.
        const ADD_REACTIONS = 1 << 6;
        /// View the audit log.
        const VIEW_AUDIT_LOG = 1 << 7;
        /// Priority speaker in voice channels.
        const PRIORITY_SPEAKER = 1 << 8;
        /// Stream video.
        const STREAM = 1 << 9;
        /// View channels.
        const VIEW_CHANNEL = 1 << 10;
        /// Send messages.
        const SEND_MESSAGES = 1 << 11;
        /// Send text-to-speech messages.
        const SEND_TTS_MESSAGES = 1 << 12;
        /// Manage messages of other members.
        const MANAGE_MESSAGES = 1 << 13;
        /// Embed links.
        const EMBED_LINKS = 1 << 14;
        /// Attach files.
        const ATTACH_FILES = 1 << 15;
        /// Read message history.
        const READ_MESSAGE_HISTORY = 1 << 16;
        /// Mention everyone.
        const MENTION_EVERYONE = 1 << 17;
        /// Use external emojis.
        const USE_EXTERNAL_EMOJIS = 1 << 18;
        /// View guild insights.
        const VIEW_GUILD_INSIGHTS = 1 << 19;
        /// Connect to voice channels.
        const CONNECT = 1 << 20;
        /// Speak in voice channels.
        const SPEAK = 1 << 21;
        /// Mute members in voice channels.
        const MUTE_MEMBERS = 1 << 22;
        /// Deafen members in voice channels.
        const DEAFEN_MEMBERS = 1 << 23;
        /// Move members between voice channels.
        const MOVE_MEMBERS = 1 << 24;
        /// Use voice activity detection.
        const USE_VAD = 1 << 25;
        /// Change own nickname.
        const CHANGE_NICKNAME = 1 << 26;
        /// Manage nicknames of other members.
        const MANAGE_NICKNAMES = 1 << 27;
        /// Manage roles.
        const MANAGE_ROLES = 1 << 28;
        /// Manage webhooks.
        const MANAGE_WEBHOOKS = 1 << 29;
        /// Manage emojis, stickers and sounds.
        const MANAGE_GUILD_EXPRESSIONS = 1 << 30;
        /// Use application commands.
        const USE_APPLICATION_COMMANDS = 1 << 31;
        /// Request to speak in stage channels.
        const REQUEST_TO_SPEAK = 1 << 32;
        /// Manage scheduled events.
        const MANAGE_EVENTS = 1 << 33;
        /// Manage threads.
        const MANAGE_THREADS = 1 << 34;
        /// Create public threads.
        const CREATE_PUBLIC_THREADS = 1 << 35;
        /// Create private threads.
        const CREATE_PRIVATE_THREADS = 1 << 36;
        /// Use external stickers.
        const USE_EXTERNAL_STICKERS = 1 << 37;
        /// Send messages in threads.
        const SEND_MESSAGES_IN_THREADS = 1 << 38;
        /// Launch embedded activities.
        const USE_EMBEDDED_ACTIVITIES = 1 << 39;
        /// Time out members.
        const MODERATE_MEMBERS = 1 << 40;
    }
}

impl Permissions {
    /// Returns the bits of `self` that are absent from `granted`.
    #[must_use]
    pub const fn missing_from(self, granted: Self) -> Self {
        self.difference(granted)
    }

    /// Returns true when the administrator bit is set.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Channel Overwrites
// ============================================================================

/// Entity an overwrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum OverwriteTarget {
    /// Applies to every holder of the role.
    Role(RoleId),
    /// Applies to one member.
    Member(UserId),
}

/// Channel-scoped allow/deny delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Entity the overwrite applies to.
    pub target: OverwriteTarget,
    /// Bits granted in the channel.
    #[serde(default)]
    pub allowed: Permissions,
    /// Bits revoked in the channel.
    #[serde(default)]
    pub denied: Permissions,
}

impl PermissionOverwrite {
    /// Creates a role overwrite.
    #[must_use]
    pub const fn role(role_id: RoleId, allowed: Permissions, denied: Permissions) -> Self {
        Self {
            target: OverwriteTarget::Role(role_id),
            allowed,
            denied,
        }
    }

    /// Creates a member-specific overwrite.
    #[must_use]
    pub const fn member(user_id: UserId, allowed: Permissions, denied: Permissions) -> Self {
        Self {
            target: OverwriteTarget::Member(user_id),
            allowed,
            denied,
        }
    }
}

// ============================================================================
// SECTION: Required Permission Sets
// ============================================================================

/// Permission requirements declared on a command or module.
///
/// # Invariants
/// - Merging only ever adds bits; nothing declared outward is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPermissions {
    /// Bits the bot needs guild-wide.
    #[serde(default)]
    pub bot_guild: Permissions,
    /// Bits the bot needs in the channel.
    #[serde(default)]
    pub bot_channel: Permissions,
    /// Bits the caller needs guild-wide.
    #[serde(default)]
    pub user_guild: Permissions,
    /// Bits the caller needs in the channel.
    #[serde(default)]
    pub user_channel: Permissions,
}

impl RequiredPermissions {
    /// Returns the bitwise union of both requirement sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bot_guild: self.bot_guild.union(other.bot_guild),
            bot_channel: self.bot_channel.union(other.bot_channel),
            user_guild: self.user_guild.union(other.user_guild),
            user_channel: self.user_channel.union(other.user_channel),
        }
    }

    /// Returns true when the bot has any requirement.
    #[must_use]
    pub const fn requires_bot(&self) -> bool {
        !self.bot_guild.is_empty() || !self.bot_channel.is_empty()
    }

    /// Returns true when the caller has any requirement.
    #[must_use]
    pub const fn requires_user(&self) -> bool {
        !self.user_guild.is_empty() || !self.user_channel.is_empty()
    }
}
