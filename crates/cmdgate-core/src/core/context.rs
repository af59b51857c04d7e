// crates/cmdgate-core/src/core/context.rs
// ============================================================================
// Module: cmdgate Invocation Context
// Description: Caller context, cancellation signal and service provider.
// Purpose: Carry per-request state from the transport into the core.
// Dependencies: crate::core::{identifiers, permissions, scope}, tokio
// ============================================================================

//! ## Overview
//! [`InvocationContext`] is the caller context injected into handler instances
//! and consulted by readers and preconditions. It is cheap to clone: guild and
//! channel snapshots are shared behind `Arc`. [`CancellationSignal`] reports
//! caller disconnects or timeouts. [`ServiceProvider`] is an opaque type-keyed
//! service map handed to module construction; the core never inspects it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::core::identifiers::ChannelId;
use crate::core::identifiers::CommandName;
use crate::core::identifiers::GuildId;
use crate::core::identifiers::UserId;
use crate::core::permissions::Permissions;
use crate::core::scope::ChannelScope;
use crate::core::scope::GuildScope;
use crate::core::scope::ResolvedEntities;

// ============================================================================
// SECTION: Invocation Context
// ============================================================================

/// Caller context for one request.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Invoked command.
    pub command: CommandName,
    /// Calling user.
    pub user_id: UserId,
    /// User the bot runs as.
    pub bot_user_id: UserId,
    /// Guild snapshot; absent in direct messages.
    pub guild: Option<Arc<GuildScope>>,
    /// Channel snapshot; absent when the channel could not be resolved.
    pub channel: Option<Arc<ChannelScope>>,
    /// App permissions in the channel as reported by the platform.
    pub app_permissions: Option<Permissions>,
    /// Entities resolved alongside the raw arguments.
    pub resolved: Arc<ResolvedEntities>,
}

impl InvocationContext {
    /// Creates a context for a direct-message request.
    #[must_use]
    pub fn direct(command: impl Into<CommandName>, user_id: UserId, bot_user_id: UserId) -> Self {
        Self {
            command: command.into(),
            user_id,
            bot_user_id,
            guild: None,
            channel: None,
            app_permissions: None,
            resolved: Arc::new(ResolvedEntities::default()),
        }
    }

    /// Attaches a guild snapshot.
    #[must_use]
    pub fn in_guild(mut self, guild: Arc<GuildScope>) -> Self {
        self.guild = Some(guild);
        self
    }

    /// Attaches a channel snapshot.
    #[must_use]
    pub fn in_channel(mut self, channel: Arc<ChannelScope>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Attaches platform-reported app permissions.
    #[must_use]
    pub const fn with_app_permissions(mut self, permissions: Permissions) -> Self {
        self.app_permissions = Some(permissions);
        self
    }

    /// Attaches resolved entities.
    #[must_use]
    pub fn with_resolved(mut self, resolved: ResolvedEntities) -> Self {
        self.resolved = Arc::new(resolved);
        self
    }

    /// Returns the guild id when the request came from a guild.
    #[must_use]
    pub fn guild_id(&self) -> Option<GuildId> {
        self.guild.as_ref().map(|guild| guild.guild_id)
    }

    /// Returns the channel id when known.
    #[must_use]
    pub fn channel_id(&self) -> Option<ChannelId> {
        self.channel.as_ref().map(|channel| channel.channel_id)
    }
}

// ============================================================================
// SECTION: Cancellation
// ============================================================================

/// Sending half used by the transport to cancel a request.
#[derive(Debug)]
pub struct CancellationHandle {
    /// Watch sender; `true` means cancelled.
    sender: watch::Sender<bool>,
}

impl CancellationHandle {
    /// Cancels the request. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Receiving half observed by the core.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    /// Watch receiver; `true` means cancelled.
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// Creates a linked handle and signal.
    #[must_use]
    pub fn pair() -> (CancellationHandle, Self) {
        let (sender, receiver) = watch::channel(false);
        (
            CancellationHandle {
                sender,
            },
            Self {
                receiver,
            },
        )
    }

    /// Creates a signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_, signal) = Self::pair();
        signal
    }

    /// Returns true once the request was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes when the request is cancelled; pends forever otherwise.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                // Handle dropped without cancelling.
                std::future::pending::<()>().await;
            }
        }
    }
}

// ============================================================================
// SECTION: Service Provider
// ============================================================================

/// Opaque type-keyed service map.
#[derive(Clone, Default)]
pub struct ServiceProvider {
    /// Services keyed by concrete type.
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any previous service of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, service: T) {
        self.services.insert(TypeId::of::<T>(), Arc::new(service));
    }

    /// Registers a service and returns the provider.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, service: T) -> Self {
        self.insert(service);
        self
    }

    /// Looks a service up by type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider").field("services", &self.services.len()).finish()
    }
}
