// crates/cmdgate-core/tests/preconditions.rs
// ============================================================================
// Module: Precondition Tests
// Description: Tests for permission, scope and custom preconditions.
// Purpose: Validate fail-closed authorization and ordered evaluation.
// Dependencies: cmdgate-core, async-trait, tokio
// ============================================================================

//! ## Overview
//! Evaluates the built-in checks against guild snapshots and verifies the
//! pipeline stops at the first failure.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use cmdgate_core::CommandDeclaration;
use cmdgate_core::CommandService;
use cmdgate_core::InvocationContext;
use cmdgate_core::InvocationError;
use cmdgate_core::InvocationRequest;
use cmdgate_core::PermissionDenied;
use cmdgate_core::PermissionEntity;
use cmdgate_core::PermissionMessages;
use cmdgate_core::PermissionScope;
use cmdgate_core::Permissions;
use cmdgate_core::Precondition;
use cmdgate_core::PreconditionFailure;
use cmdgate_core::RequireAppChannelPermissions;
use cmdgate_core::RequireBotPermissions;
use cmdgate_core::RequireGuildContext;
use cmdgate_core::RequireUserPermissions;
use cmdgate_core::RoleId;
use cmdgate_core::ServiceProvider;
use cmdgate_core::TypeReaderRegistry;
use cmdgate_core::UserId;
use cmdgate_core::runtime::PreconditionPipeline;
use cmdgate_core::runtime::preconditions::render_missing;
use common::ALICE;
use common::BOT;
use common::OWNER;
use common::channel;
use common::guild;
use common::guild_context;

// ============================================================================
// SECTION: Helpers
// ============================================================================

async fn evaluate(check: &dyn Precondition, context: &InvocationContext) -> Result<(), PreconditionFailure> {
    check.evaluate(context, &ServiceProvider::new()).await
}

fn denial(result: Result<(), PreconditionFailure>) -> PermissionDenied {
    match result {
        Err(PreconditionFailure::PermissionDenied(denied)) => denied,
        other => panic!("expected a permission denial, got {other:?}"),
    }
}

/// Check that logs its label and optionally rejects.
struct Recording {
    label: &'static str,
    reject: bool,
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Precondition for Recording {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn evaluate(
        &self,
        _context: &InvocationContext,
        _services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        self.log.lock().unwrap().push(self.label);
        if self.reject {
            Err(PreconditionFailure::Rejected(format!("{} rejected", self.label)))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// SECTION: Member Permissions
// ============================================================================

#[tokio::test]
async fn bot_guild_permissions_come_from_its_roles() {
    let context = guild_context("purge", ALICE, channel());
    let granted = RequireBotPermissions::new(Permissions::MANAGE_MESSAGES, Permissions::empty());
    assert!(evaluate(&granted, &context).await.is_ok());

    let denied = denial(
        evaluate(&RequireBotPermissions::new(Permissions::BAN_MEMBERS, Permissions::empty()), &context)
            .await,
    );
    assert_eq!(denied.missing, Permissions::BAN_MEMBERS);
    assert_eq!(denied.entity, PermissionEntity::Bot);
    assert_eq!(denied.scope, PermissionScope::Guild);
    assert_eq!(denied.message, "Required bot permissions: BAN_MEMBERS");
}

#[tokio::test]
async fn user_guild_permissions_name_only_missing_bits() {
    let context = guild_context("configure", ALICE, channel());
    let check = RequireUserPermissions::new(
        Permissions::SEND_MESSAGES | Permissions::MANAGE_GUILD | Permissions::KICK_MEMBERS,
        Permissions::empty(),
    );
    let denied = denial(evaluate(&check, &context).await);
    assert_eq!(denied.missing, Permissions::MANAGE_GUILD | Permissions::KICK_MEMBERS);
    assert_eq!(denied.entity, PermissionEntity::User);
    assert_eq!(denied.message, "Required user permissions: KICK_MEMBERS, MANAGE_GUILD");
}

#[tokio::test]
async fn owner_and_administrators_bypass_permission_checks() {
    let check = RequireUserPermissions::new(Permissions::all(), Permissions::all());
    assert!(evaluate(&check, &guild_context("configure", OWNER, channel())).await.is_ok());

    let admin_role = RoleId::new(900);
    let admin = UserId::new(50);
    let guild = guild().with_role(admin_role, Permissions::ADMINISTRATOR).with_member(admin, vec![admin_role]);
    let context = InvocationContext::direct("configure", admin, BOT)
        .in_guild(Arc::new(guild))
        .in_channel(Arc::new(channel()));
    assert!(evaluate(&check, &context).await.is_ok());
}

#[tokio::test]
async fn channel_requirement_without_channel_is_entity_not_found() {
    let context = InvocationContext::direct("post", ALICE, BOT).in_guild(Arc::new(guild()));
    let check = RequireUserPermissions::new(Permissions::empty(), Permissions::SEND_MESSAGES);
    assert!(matches!(evaluate(&check, &context).await, Err(PreconditionFailure::EntityNotFound(_))));

    let guild_only = RequireUserPermissions::new(Permissions::SEND_MESSAGES, Permissions::empty());
    assert!(evaluate(&guild_only, &context).await.is_ok());
}

#[tokio::test]
async fn non_member_caller_is_entity_not_found() {
    let context = guild_context("post", UserId::new(404), channel());
    let check = RequireUserPermissions::new(Permissions::SEND_MESSAGES, Permissions::empty());
    assert!(matches!(evaluate(&check, &context).await, Err(PreconditionFailure::EntityNotFound(_))));
}

#[tokio::test]
async fn member_checks_pass_outside_guilds() {
    let context = InvocationContext::direct("post", ALICE, BOT);
    let check = RequireUserPermissions::new(Permissions::MANAGE_GUILD, Permissions::SEND_MESSAGES);
    assert!(evaluate(&check, &context).await.is_ok());
}

// ============================================================================
// SECTION: Scope Checks
// ============================================================================

#[tokio::test]
async fn app_channel_permissions_use_platform_grant() {
    let check = RequireAppChannelPermissions::new(Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS);
    let unreported = InvocationContext::direct("post", ALICE, BOT);
    assert!(evaluate(&check, &unreported).await.is_ok());

    let reported = unreported.with_app_permissions(Permissions::SEND_MESSAGES);
    let denied = denial(evaluate(&check, &reported).await);
    assert_eq!(denied.missing, Permissions::EMBED_LINKS);
    assert_eq!(denied.entity, PermissionEntity::Bot);
    assert_eq!(denied.scope, PermissionScope::Channel);
}

#[tokio::test]
async fn guild_context_check_rejects_direct_messages() {
    let check = RequireGuildContext::with_message("Server only");
    assert!(matches!(
        evaluate(&check, &InvocationContext::direct("post", ALICE, BOT)).await,
        Err(PreconditionFailure::Rejected(message)) if message == "Server only"
    ));
    assert!(evaluate(&check, &guild_context("post", ALICE, channel())).await.is_ok());
}

// ============================================================================
// SECTION: Messages and Ordering
// ============================================================================

#[test]
fn missing_placeholder_is_replaced_with_flag_names() {
    assert_eq!(
        render_missing("Need {missing}!", Permissions::EMBED_LINKS | Permissions::SEND_MESSAGES),
        "Need SEND_MESSAGES, EMBED_LINKS!"
    );
    assert_eq!(render_missing("No placeholder", Permissions::SEND_MESSAGES), "No placeholder");
}

#[tokio::test]
async fn service_messages_apply_to_declared_permissions() {
    let messages = PermissionMessages {
        user_guild: "You need {missing}".to_string(),
        ..PermissionMessages::default()
    };
    let mut service =
        CommandService::new(TypeReaderRegistry::with_builtin_readers()).with_messages(messages);
    service
        .register(
            CommandDeclaration::slash("ban", "Bans a member")
                .require_user_permissions(Permissions::BAN_MEMBERS, Permissions::empty())
                .static_handler(|_context: Arc<InvocationContext>, (): ()| async {}),
        )
        .unwrap();
    let request = InvocationRequest::new(guild_context("ban", ALICE, channel()));
    match service.execute(request, Arc::new(ServiceProvider::new())).await {
        Err(InvocationError::PermissionDenied(denied)) => {
            assert_eq!(denied.message, "You need BAN_MEMBERS");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_stops_at_first_failure() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let check = |label: &'static str, reject: bool| -> Arc<dyn Precondition> {
        Arc::new(Recording {
            label,
            reject,
            log: Arc::clone(&log),
        })
    };
    let pipeline = PreconditionPipeline::new(vec![check("first", false), check("second", true), check("third", false)]);
    assert_eq!(pipeline.names(), vec!["first", "second", "third"]);

    let result = pipeline.evaluate(&guild_context("any", ALICE, channel()), &ServiceProvider::new()).await;
    assert!(matches!(result, Err(PreconditionFailure::Rejected(message)) if message == "second rejected"));
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}
