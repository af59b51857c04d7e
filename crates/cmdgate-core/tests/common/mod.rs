// crates/cmdgate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared fixtures for cmdgate-core integration tests.
// Purpose: Build guild snapshots, contexts and recording audit sinks.
// Dependencies: cmdgate-core
// ============================================================================

//! ## Overview
//! Provides guild and channel fixtures plus a recording audit sink shared by
//! the registration and request handling tests.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Shared fixtures are used by a subset of test binaries."
)]

use std::sync::Arc;
use std::sync::Mutex;

use cmdgate_core::ChannelId;
use cmdgate_core::ChannelKind;
use cmdgate_core::ChannelScope;
use cmdgate_core::GuildId;
use cmdgate_core::GuildScope;
use cmdgate_core::InvocationContext;
use cmdgate_core::Permissions;
use cmdgate_core::RoleId;
use cmdgate_core::UserId;
use cmdgate_core::runtime::AutocompleteInvocationEvent;
use cmdgate_core::runtime::CommandAuditSink;
use cmdgate_core::runtime::CommandInvocationEvent;
use cmdgate_core::runtime::CommandRegisteredEvent;

// ============================================================================
// SECTION: Identities
// ============================================================================

/// Guild used by every fixture.
pub const GUILD: GuildId = GuildId::new(100);
/// Guild owner.
pub const OWNER: UserId = UserId::new(1);
/// Bot user.
pub const BOT: UserId = UserId::new(2);
/// Regular member holding the `MEMBER_ROLE`.
pub const ALICE: UserId = UserId::new(10);
/// Second regular member holding the `MEMBER_ROLE`.
pub const BOB: UserId = UserId::new(11);
/// Role granting messaging permissions.
pub const MEMBER_ROLE: RoleId = RoleId::new(200);
/// Role granting the bot its permissions.
pub const BOT_ROLE: RoleId = RoleId::new(201);
/// Text channel used by every fixture.
pub const CHANNEL: ChannelId = ChannelId::new(300);

// ============================================================================
// SECTION: Snapshots
// ============================================================================

/// Guild where members may send messages and the bot may manage messages.
pub fn guild() -> GuildScope {
    GuildScope::new(GUILD, OWNER, Permissions::VIEW_CHANNEL)
        .with_role(MEMBER_ROLE, Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS)
        .with_role(BOT_ROLE, Permissions::SEND_MESSAGES | Permissions::MANAGE_MESSAGES)
        .with_member(OWNER, Vec::new())
        .with_member(BOT, vec![BOT_ROLE])
        .with_member(ALICE, vec![MEMBER_ROLE])
        .with_member(BOB, vec![MEMBER_ROLE])
}

/// Text channel without overwrites.
pub fn channel() -> ChannelScope {
    ChannelScope::new(CHANNEL, ChannelKind::TextGuild)
}

/// Context for `user` invoking `command` in the fixture guild and channel.
pub fn guild_context(command: &str, user: UserId, channel: ChannelScope) -> InvocationContext {
    InvocationContext::direct(command, user, BOT)
        .in_guild(Arc::new(guild()))
        .in_channel(Arc::new(channel))
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    /// Registration events.
    pub registrations: Mutex<Vec<CommandRegisteredEvent>>,
    /// Invocation events.
    pub invocations: Mutex<Vec<CommandInvocationEvent>>,
    /// Autocomplete events.
    pub autocompletes: Mutex<Vec<AutocompleteInvocationEvent>>,
}

impl CommandAuditSink for RecordingAuditSink {
    fn record(&self, event: &CommandInvocationEvent) {
        self.invocations.lock().unwrap().push(event.clone());
    }

    fn record_registration(&self, event: &CommandRegisteredEvent) {
        self.registrations.lock().unwrap().push(event.clone());
    }

    fn record_autocomplete(&self, event: &AutocompleteInvocationEvent) {
        self.autocompletes.lock().unwrap().push(event.clone());
    }
}
