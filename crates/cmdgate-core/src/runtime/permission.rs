// crates/cmdgate-core/src/runtime/permission.rs
// ============================================================================
// Module: cmdgate Permission Resolver
// Description: Effective permission computation from roles and overwrites.
// Purpose: Compute the permission set a member holds in a guild or channel.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The resolver is a pure function over a guild snapshot, a member and an
//! optional channel snapshot:
//!
//! 1. Start from the everyone set and union every held role's set.
//! 2. The guild owner, or any holder of `ADMINISTRATOR`, is unrestricted.
//! 3. For channel scope, union the deny and allow bits of every held role's
//!    overwrite, then the member's own overwrite last, and compute
//!    `(base & !denied) | allowed`.
//!
//! The member overwrite is merged strictly after all role overwrites. The
//! everyone role's own channel overwrite is not consulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ChannelScope;
use crate::core::GuildMember;
use crate::core::GuildScope;
use crate::core::OverwriteTarget;
use crate::core::Permissions;

// ============================================================================
// SECTION: Grants
// ============================================================================

/// Result of resolving a member's permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionGrant {
    /// Owner or administrator; every check passes.
    Unrestricted,
    /// Concrete effective permission set.
    Limited(Permissions),
}

impl PermissionGrant {
    /// Returns the required bits the grant does not cover.
    #[must_use]
    pub const fn missing(self, required: Permissions) -> Permissions {
        match self {
            Self::Unrestricted => Permissions::empty(),
            Self::Limited(granted) => required.missing_from(granted),
        }
    }

    /// Returns true when every check passes.
    #[must_use]
    pub const fn is_unrestricted(self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Unions the everyone set with every role the member holds.
///
/// Role ids absent from the guild snapshot contribute nothing.
#[must_use]
pub fn role_union(guild: &GuildScope, member: &GuildMember) -> Permissions {
    member
        .role_ids
        .iter()
        .filter_map(|role_id| guild.role_permissions(*role_id))
        .fold(guild.everyone, |acc, permissions| acc | permissions)
}

/// Applies channel overwrites to a base permission set.
///
/// Role overwrites are accumulated first; the member's own overwrite is
/// merged last so its bits take precedence.
#[must_use]
pub fn apply_overwrites(
    base: Permissions,
    member: &GuildMember,
    channel: &ChannelScope,
) -> Permissions {
    let mut denied = Permissions::empty();
    let mut allowed = Permissions::empty();
    for role_id in &member.role_ids {
        if let Some(overwrite) = channel.overwrite(OverwriteTarget::Role(*role_id)) {
            denied |= overwrite.denied;
            allowed |= overwrite.allowed;
        }
    }
    if let Some(overwrite) = channel.overwrite(OverwriteTarget::Member(member.user_id)) {
        denied |= overwrite.denied;
        allowed |= overwrite.allowed;
    }
    (base & !denied) | allowed
}

/// Resolves guild-wide permissions for a member.
#[must_use]
pub fn resolve_guild_permissions(guild: &GuildScope, member: &GuildMember) -> PermissionGrant {
    if member.user_id == guild.owner_id {
        return PermissionGrant::Unrestricted;
    }
    let base = role_union(guild, member);
    if base.is_administrator() {
        return PermissionGrant::Unrestricted;
    }
    PermissionGrant::Limited(base)
}

/// Resolves channel permissions for a member, after overwrites.
#[must_use]
pub fn resolve_channel_permissions(
    guild: &GuildScope,
    member: &GuildMember,
    channel: &ChannelScope,
) -> PermissionGrant {
    match resolve_guild_permissions(guild, member) {
        PermissionGrant::Unrestricted => PermissionGrant::Unrestricted,
        PermissionGrant::Limited(base) => {
            PermissionGrant::Limited(apply_overwrites(base, member, channel))
        }
    }
}
