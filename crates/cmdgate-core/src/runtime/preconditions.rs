// crates/cmdgate-core/src/runtime/preconditions.rs
// ============================================================================
// Module: cmdgate Preconditions
// Description: Built-in authorization checks and the ordered pipeline.
// Purpose: Gate handler execution on permissions and request scope.
// Dependencies: crate::{core, interfaces, runtime::permission}, async-trait
// ============================================================================

//! ## Overview
//! A [`PreconditionPipeline`] evaluates checks strictly in order and stops at
//! the first failure. Built-in permission checks resolve effective
//! permissions through [`crate::runtime::permission`] and report exactly the
//! missing bits. Requests outside a guild pass permission checks; use
//! [`RequireGuildContext`] to reject them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::InvocationContext;
use crate::core::PermissionDenied;
use crate::core::PermissionEntity;
use crate::core::PermissionScope;
use crate::core::Permissions;
use crate::core::PreconditionFailure;
use crate::core::ServiceProvider;
use crate::core::UserId;
use crate::interfaces::Precondition;
use crate::runtime::permission::PermissionGrant;
use crate::runtime::permission::apply_overwrites;
use crate::runtime::permission::resolve_guild_permissions;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Placeholder replaced by the missing permission names.
pub const MISSING_PLACEHOLDER: &str = "{missing}";

/// Message formats for permission failures.
///
/// # Invariants
/// - Each format is rendered by replacing [`MISSING_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMessages {
    /// Bot lacks guild permissions.
    pub bot_guild: String,
    /// Bot lacks channel permissions.
    pub bot_channel: String,
    /// Caller lacks guild permissions.
    pub user_guild: String,
    /// Caller lacks channel permissions.
    pub user_channel: String,
}

impl Default for PermissionMessages {
    fn default() -> Self {
        Self {
            bot_guild: "Required bot permissions: {missing}".to_string(),
            bot_channel: "Required bot channel permissions: {missing}".to_string(),
            user_guild: "Required user permissions: {missing}".to_string(),
            user_channel: "Required user channel permissions: {missing}".to_string(),
        }
    }
}

/// Renders a message format for the missing bits.
#[must_use]
pub fn render_missing(format: &str, missing: Permissions) -> String {
    format.replace(MISSING_PLACEHOLDER, &missing.to_string())
}

// ============================================================================
// SECTION: Member Permission Checks
// ============================================================================

/// Guild and channel requirements for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberRequirement {
    /// Entity being checked.
    entity: PermissionEntity,
    /// Guild-wide bits.
    guild: Permissions,
    /// Channel bits.
    channel: Permissions,
    /// Guild failure format.
    guild_format: String,
    /// Channel failure format.
    channel_format: String,
}

impl MemberRequirement {
    /// Checks the requirement for `user_id` within the request's guild.
    fn check(&self, context: &InvocationContext, user_id: UserId) -> Result<(), PreconditionFailure> {
        let Some(guild) = context.guild.as_deref() else {
            return Ok(());
        };
        let member = guild.member(user_id).ok_or_else(|| {
            PreconditionFailure::EntityNotFound(format!(
                "{} {user_id} is not a member of guild {}",
                self.entity, guild.guild_id
            ))
        })?;
        let PermissionGrant::Limited(base) = resolve_guild_permissions(guild, member) else {
            return Ok(());
        };
        let missing = self.guild.missing_from(base);
        if !missing.is_empty() {
            return Err(self.denied(missing, PermissionScope::Guild, &self.guild_format));
        }
        if self.channel.is_empty() {
            return Ok(());
        }
        let channel = context.channel.as_deref().ok_or_else(|| {
            PreconditionFailure::EntityNotFound("current channel could not be found".to_string())
        })?;
        let effective = apply_overwrites(base, member, channel);
        let missing = self.channel.missing_from(effective);
        if !missing.is_empty() {
            return Err(self.denied(missing, PermissionScope::Channel, &self.channel_format));
        }
        Ok(())
    }

    /// Builds a denial naming the missing bits.
    fn denied(
        &self,
        missing: Permissions,
        scope: PermissionScope,
        format: &str,
    ) -> PreconditionFailure {
        PreconditionFailure::PermissionDenied(PermissionDenied {
            missing,
            entity: self.entity,
            scope,
            message: render_missing(format, missing),
        })
    }
}

/// Requires the bot to hold guild and channel permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireBotPermissions {
    /// Underlying requirement.
    requirement: MemberRequirement,
}

impl RequireBotPermissions {
    /// Creates the check with default message formats.
    #[must_use]
    pub fn new(guild: Permissions, channel: Permissions) -> Self {
        let messages = PermissionMessages::default();
        Self::with_formats(guild, channel, messages.bot_guild, messages.bot_channel)
    }

    /// Creates the check with explicit message formats.
    #[must_use]
    pub fn with_formats(
        guild: Permissions,
        channel: Permissions,
        guild_format: impl Into<String>,
        channel_format: impl Into<String>,
    ) -> Self {
        Self {
            requirement: MemberRequirement {
                entity: PermissionEntity::Bot,
                guild,
                channel,
                guild_format: guild_format.into(),
                channel_format: channel_format.into(),
            },
        }
    }
}

#[async_trait]
impl Precondition for RequireBotPermissions {
    fn name(&self) -> &'static str {
        "require_bot_permissions"
    }

    async fn evaluate(
        &self,
        context: &InvocationContext,
        _services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        self.requirement.check(context, context.bot_user_id)
    }
}

/// Requires the caller to hold guild and channel permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireUserPermissions {
    /// Underlying requirement.
    requirement: MemberRequirement,
}

impl RequireUserPermissions {
    /// Creates the check with default message formats.
    #[must_use]
    pub fn new(guild: Permissions, channel: Permissions) -> Self {
        let messages = PermissionMessages::default();
        Self::with_formats(guild, channel, messages.user_guild, messages.user_channel)
    }

    /// Creates the check with explicit message formats.
    #[must_use]
    pub fn with_formats(
        guild: Permissions,
        channel: Permissions,
        guild_format: impl Into<String>,
        channel_format: impl Into<String>,
    ) -> Self {
        Self {
            requirement: MemberRequirement {
                entity: PermissionEntity::User,
                guild,
                channel,
                guild_format: guild_format.into(),
                channel_format: channel_format.into(),
            },
        }
    }
}

#[async_trait]
impl Precondition for RequireUserPermissions {
    fn name(&self) -> &'static str {
        "require_user_permissions"
    }

    async fn evaluate(
        &self,
        context: &InvocationContext,
        _services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        self.requirement.check(context, context.user_id)
    }
}

// ============================================================================
// SECTION: Scope Checks
// ============================================================================

/// Requires the platform-reported app permissions to cover a set.
///
/// Passes when the request carries no app permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireAppChannelPermissions {
    /// Required channel bits.
    required: Permissions,
    /// Failure format.
    format: String,
}

impl RequireAppChannelPermissions {
    /// Creates the check with the default message format.
    #[must_use]
    pub fn new(required: Permissions) -> Self {
        Self::with_format(required, PermissionMessages::default().bot_channel)
    }

    /// Creates the check with an explicit message format.
    #[must_use]
    pub fn with_format(required: Permissions, format: impl Into<String>) -> Self {
        Self {
            required,
            format: format.into(),
        }
    }
}

#[async_trait]
impl Precondition for RequireAppChannelPermissions {
    fn name(&self) -> &'static str {
        "require_app_channel_permissions"
    }

    async fn evaluate(
        &self,
        context: &InvocationContext,
        _services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        let Some(granted) = context.app_permissions else {
            return Ok(());
        };
        let missing = self.required.missing_from(granted);
        if missing.is_empty() {
            return Ok(());
        }
        Err(PreconditionFailure::PermissionDenied(PermissionDenied {
            missing,
            entity: PermissionEntity::Bot,
            scope: PermissionScope::Channel,
            message: render_missing(&self.format, missing),
        }))
    }
}

/// Rejects requests issued outside a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireGuildContext {
    /// Rejection message.
    message: String,
}

impl RequireGuildContext {
    /// Creates the check with a custom rejection message.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequireGuildContext {
    fn default() -> Self {
        Self::with_message("Required context: guild")
    }
}

#[async_trait]
impl Precondition for RequireGuildContext {
    fn name(&self) -> &'static str {
        "require_guild_context"
    }

    async fn evaluate(
        &self,
        context: &InvocationContext,
        _services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        if context.guild.is_some() {
            Ok(())
        } else {
            Err(PreconditionFailure::Rejected(self.message.clone()))
        }
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Ordered list of preconditions for one command.
///
/// # Invariants
/// - Checks run strictly in stored order; the first failure aborts.
#[derive(Clone, Default)]
pub struct PreconditionPipeline {
    /// Checks in evaluation order.
    checks: Vec<Arc<dyn Precondition>>,
}

impl PreconditionPipeline {
    /// Creates a pipeline from checks in evaluation order.
    #[must_use]
    pub fn new(checks: Vec<Arc<dyn Precondition>>) -> Self {
        Self {
            checks,
        }
    }

    /// Returns the check labels in evaluation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name()).collect()
    }

    /// Returns the number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true when the pipeline has no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Evaluates every check in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`PreconditionFailure`] encountered.
    pub async fn evaluate(
        &self,
        context: &InvocationContext,
        services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        for check in &self.checks {
            check.evaluate(context, services).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for PreconditionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreconditionPipeline").field("checks", &self.names()).finish()
    }
}
