// crates/cmdgate-core/src/core/scope.rs
// ============================================================================
// Module: cmdgate Scope Snapshots
// Description: Guild, channel and resolved-entity snapshots for a request.
// Purpose: Carry the permission-relevant state the transport hands the core.
// Dependencies: crate::core::{identifiers, permissions}, serde
// ============================================================================

//! ## Overview
//! The transport resolves guild state before invoking the core. These
//! snapshots are read-only inputs: the permission resolver and type readers
//! consult them but never mutate them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AttachmentId;
use crate::core::identifiers::ChannelId;
use crate::core::identifiers::GuildId;
use crate::core::identifiers::RoleId;
use crate::core::identifiers::UserId;
use crate::core::permissions::OverwriteTarget;
use crate::core::permissions::PermissionOverwrite;
use crate::core::permissions::Permissions;

// ============================================================================
// SECTION: Channel Kinds
// ============================================================================

/// Concrete channel kinds accepted by channel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Guild text channel.
    TextGuild,
    /// Direct message channel.
    DirectMessage,
    /// Guild voice channel.
    VoiceGuild,
    /// Group direct message channel.
    GroupDirectMessage,
    /// Guild category.
    Category,
    /// Guild announcement channel.
    NewsGuild,
    /// Thread in an announcement channel.
    NewsThread,
    /// Public thread.
    PublicThread,
    /// Private thread.
    PrivateThread,
    /// Stage channel.
    StageGuild,
    /// Hub directory channel.
    Directory,
    /// Forum channel.
    ForumGuild,
}

impl ChannelKind {
    /// Returns the platform's numeric channel type.
    #[must_use]
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::TextGuild => 0,
            Self::DirectMessage => 1,
            Self::VoiceGuild => 2,
            Self::GroupDirectMessage => 3,
            Self::Category => 4,
            Self::NewsGuild => 5,
            Self::NewsThread => 10,
            Self::PublicThread => 11,
            Self::PrivateThread => 12,
            Self::StageGuild => 13,
            Self::Directory => 14,
            Self::ForumGuild => 15,
        }
    }

    /// Returns true for channels that belong to a guild.
    #[must_use]
    pub const fn is_guild_channel(self) -> bool {
        !matches!(self, Self::DirectMessage | Self::GroupDirectMessage)
    }
}

// ============================================================================
// SECTION: Guild Snapshot
// ============================================================================

/// Member of a guild with their role memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    /// Member's user identifier.
    pub user_id: UserId,
    /// Roles held by the member, excluding the implicit everyone role.
    #[serde(default)]
    pub role_ids: Vec<RoleId>,
}

/// Permission-relevant snapshot of a guild.
///
/// # Invariants
/// - `everyone` is the base set granted to every member.
/// - Role ids in `members` that are absent from `roles` contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildScope {
    /// Guild identifier.
    pub guild_id: GuildId,
    /// Owner of the guild; owners bypass every permission check.
    pub owner_id: UserId,
    /// Permissions of the everyone role.
    #[serde(default)]
    pub everyone: Permissions,
    /// Permissions granted by each role.
    #[serde(default)]
    pub roles: BTreeMap<RoleId, Permissions>,
    /// Known members keyed by user id.
    #[serde(default)]
    pub members: BTreeMap<UserId, GuildMember>,
}

impl GuildScope {
    /// Creates an empty guild snapshot.
    #[must_use]
    pub const fn new(guild_id: GuildId, owner_id: UserId, everyone: Permissions) -> Self {
        Self {
            guild_id,
            owner_id,
            everyone,
            roles: BTreeMap::new(),
            members: BTreeMap::new(),
        }
    }

    /// Adds or replaces a role.
    #[must_use]
    pub fn with_role(mut self, role_id: RoleId, permissions: Permissions) -> Self {
        self.roles.insert(role_id, permissions);
        self
    }

    /// Adds or replaces a member.
    #[must_use]
    pub fn with_member(mut self, user_id: UserId, role_ids: Vec<RoleId>) -> Self {
        self.members.insert(
            user_id,
            GuildMember {
                user_id,
                role_ids,
            },
        );
        self
    }

    /// Returns a member by user id.
    #[must_use]
    pub fn member(&self, user_id: UserId) -> Option<&GuildMember> {
        self.members.get(&user_id)
    }

    /// Returns the permissions granted by a role, if the role exists.
    #[must_use]
    pub fn role_permissions(&self, role_id: RoleId) -> Option<Permissions> {
        self.roles.get(&role_id).copied()
    }
}

// ============================================================================
// SECTION: Channel Snapshot
// ============================================================================

/// Permission-relevant snapshot of the channel a request was issued in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelScope {
    /// Channel identifier.
    pub channel_id: ChannelId,
    /// Channel kind.
    pub kind: ChannelKind,
    /// Overwrites, at most one per target.
    #[serde(default)]
    pub overwrites: Vec<PermissionOverwrite>,
}

impl ChannelScope {
    /// Creates a channel snapshot without overwrites.
    #[must_use]
    pub const fn new(channel_id: ChannelId, kind: ChannelKind) -> Self {
        Self {
            channel_id,
            kind,
            overwrites: Vec::new(),
        }
    }

    /// Adds or replaces the overwrite for the overwrite's target.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: PermissionOverwrite) -> Self {
        self.overwrites.retain(|existing| existing.target != overwrite.target);
        self.overwrites.push(overwrite);
        self
    }

    /// Returns the overwrite for a target.
    #[must_use]
    pub fn overwrite(&self, target: OverwriteTarget) -> Option<&PermissionOverwrite> {
        self.overwrites.iter().find(|overwrite| overwrite.target == target)
    }
}

// ============================================================================
// SECTION: Resolved Entities
// ============================================================================

/// User entity referenced by a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUser {
    /// User identifier.
    pub user_id: UserId,
    /// Display username.
    pub username: String,
    /// Whether the user is a bot account.
    #[serde(default)]
    pub bot: bool,
}

/// Attachment entity referenced by a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAttachment {
    /// Attachment identifier.
    pub attachment_id: AttachmentId,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub size: u64,
    /// Download URL.
    pub url: String,
}

/// Entities the platform resolved alongside the raw argument values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntities {
    /// Users keyed by id.
    #[serde(default)]
    pub users: BTreeMap<UserId, ResolvedUser>,
    /// Roles keyed by id.
    #[serde(default)]
    pub roles: BTreeMap<RoleId, Permissions>,
    /// Channels keyed by id.
    #[serde(default)]
    pub channels: BTreeMap<ChannelId, ChannelKind>,
    /// Attachments keyed by id.
    #[serde(default)]
    pub attachments: BTreeMap<AttachmentId, ResolvedAttachment>,
}
