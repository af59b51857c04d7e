// crates/cmdgate-core/tests/descriptor_builder.rs
// ============================================================================
// Module: Descriptor Builder Tests
// Description: Tests for command and parameter definition validation.
// Purpose: Ensure invalid declarations fail registration and never register.
// Dependencies: cmdgate-core, async-trait, serde_json, tokio
// ============================================================================

//! ## Overview
//! Validates the registration rules: parameter ordering, return contract,
//! parameterless command kinds, type resolution, module merging, command
//! ordering and schema rendering.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use cmdgate_core::ArgumentValue;
use cmdgate_core::Choice;
use cmdgate_core::CommandDeclaration;
use cmdgate_core::CommandModule;
use cmdgate_core::CommandName;
use cmdgate_core::CommandService;
use cmdgate_core::DefinitionError;
use cmdgate_core::GuildId;
use cmdgate_core::HandlerError;
use cmdgate_core::InvocationContext;
use cmdgate_core::ModuleMetadata;
use cmdgate_core::OptionKind;
use cmdgate_core::ParameterDeclaration;
use cmdgate_core::Permissions;
use cmdgate_core::Precondition;
use cmdgate_core::PreconditionFailure;
use cmdgate_core::RawArgument;
use cmdgate_core::ReadError;
use cmdgate_core::ReadRequest;
use cmdgate_core::RequireGuildContext;
use cmdgate_core::RequiredPermissions;
use cmdgate_core::ServiceProvider;
use cmdgate_core::Suggestions;
use cmdgate_core::TypeReader;
use cmdgate_core::TypeReaderRegistry;
use cmdgate_core::TypeTag;
use cmdgate_core::UserId;
use cmdgate_core::autocomplete_fn;
use cmdgate_core::runtime::is_valid_chat_name;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn service() -> CommandService {
    CommandService::new(TypeReaderRegistry::with_builtin_readers())
}

async fn noop(_context: Arc<InvocationContext>, _args: ()) {}

fn assert_invalid(result: Result<impl Sized, DefinitionError>, fragment: &str) {
    match result {
        Err(DefinitionError::InvalidCommandDefinition {
            reason,
            ..
        }) => assert!(reason.contains(fragment), "unexpected reason: {reason}"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("declaration should have been rejected"),
    }
}

struct ColorReader;

#[async_trait]
impl TypeReader for ColorReader {
    fn option_kind(&self) -> OptionKind {
        OptionKind::String
    }

    async fn read(
        &self,
        raw: &RawArgument,
        _request: ReadRequest<'_>,
    ) -> Result<ArgumentValue, ReadError> {
        match raw {
            RawArgument::Text(text) if text.starts_with('#') => Ok(ArgumentValue::Text(text.clone())),
            _ => Err(ReadError::Invalid("expected a #rrggbb color".to_string())),
        }
    }
}

/// Order in which [`LoggedCheck`] instances ran.
static CHECK_LOG: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

/// Check that records its name and passes.
struct LoggedCheck(&'static str);

#[async_trait]
impl Precondition for LoggedCheck {
    fn name(&self) -> &'static str {
        self.0
    }

    async fn evaluate(
        &self,
        _context: &InvocationContext,
        _services: &ServiceProvider,
    ) -> Result<(), PreconditionFailure> {
        CHECK_LOG.lock().unwrap().push(self.0);
        Ok(())
    }
}

/// Module declaring its own permissions and a logged check.
struct ModerationModule;

impl CommandModule for ModerationModule {
    fn create(_services: &ServiceProvider) -> Result<Self, HandlerError> {
        Ok(Self)
    }

    fn attach_context(&mut self, _context: Arc<InvocationContext>) {}

    fn metadata() -> ModuleMetadata {
        ModuleMetadata::new()
            .with_permissions(RequiredPermissions {
                bot_channel: Permissions::EMBED_LINKS,
                user_guild: Permissions::KICK_MEMBERS,
                ..RequiredPermissions::default()
            })
            .with_precondition(LoggedCheck("module_check"))
    }
}

// ============================================================================
// SECTION: Ordering and Shape
// ============================================================================

#[test]
fn required_parameter_after_optional_is_rejected() {
    let mut service = service();
    let declaration = CommandDeclaration::slash("greet", "Greets someone")
        .parameter(
            ParameterDeclaration::new("times", "Repeat count", TypeTag::I32)
                .default_value(ArgumentValue::Integer(1)),
        )
        .parameter(ParameterDeclaration::new("name", "Who to greet", TypeTag::String))
        .static_handler(|_context: Arc<InvocationContext>, (_times, _name): (i32, String)| async {});
    assert_invalid(service.register(declaration), "follows a parameter with a default value");
    assert!(service.command(&CommandName::from("greet")).is_none());
}

#[test]
fn value_returning_handler_is_rejected_without_registering() {
    let mut service = service();
    let declaration = CommandDeclaration::slash("echo", "Echoes text")
        .parameter(ParameterDeclaration::new("text", "Text to echo", TypeTag::String))
        .static_handler(|_context: Arc<InvocationContext>, (text,): (String,)| async move { text });
    assert_invalid(service.register(declaration), "without producing a value");

    let fallible = CommandDeclaration::slash("echo", "Echoes text")
        .static_handler(|_context: Arc<InvocationContext>, _args: ()| async {
            Ok::<String, HandlerError>(String::new())
        });
    assert_invalid(service.register(fallible), "without producing a value");
    assert!(service.schemas().is_empty());
}

#[test]
fn context_menu_commands_take_no_parameters_or_description() {
    let mut service = service();
    let with_parameter = CommandDeclaration::user("Inspect")
        .parameter(ParameterDeclaration::new("target", "Target", TypeTag::User))
        .static_handler(|_context: Arc<InvocationContext>, (_user,): (ArgumentValue,)| async {});
    assert_invalid(service.register(with_parameter), "cannot declare parameters");

    let with_description =
        CommandDeclaration::message("Quote").description("Quotes a message").static_handler(noop);
    assert_invalid(service.register(with_description), "cannot have a description");

    let plain = CommandDeclaration::message("Quote").static_handler(noop);
    assert!(service.register(plain).is_ok());
}

#[test]
fn missing_handler_and_bad_names_are_rejected() {
    let mut service = service();
    assert_invalid(service.register(CommandDeclaration::slash("ping", "Ping")), "no handler");
    assert_invalid(
        service.register(CommandDeclaration::slash("Ping", "Ping").static_handler(noop)),
        "command name",
    );
    assert_invalid(
        service.register(
            CommandDeclaration::slash("ping", "Ping")
                .parameter(ParameterDeclaration::new("Bad Name", "Bad", TypeTag::String))
                .static_handler(|_context: Arc<InvocationContext>, (_value,): (String,)| async {}),
        ),
        "parameter name",
    );
    assert!(is_valid_chat_name("roll_d20-fast"));
    assert!(!is_valid_chat_name(""));
    assert!(!is_valid_chat_name(&"a".repeat(33)));
}

#[test]
fn duplicate_command_names_are_rejected() {
    let mut service = service();
    service.register(CommandDeclaration::slash("ping", "Ping").static_handler(noop)).unwrap();
    assert_invalid(
        service.register(CommandDeclaration::slash("ping", "Ping again").static_handler(noop)),
        "already registered",
    );
}

#[test]
fn handler_tuple_must_match_parameter_types() {
    let mut service = service();
    let declaration = CommandDeclaration::slash("roll", "Rolls dice")
        .parameter(ParameterDeclaration::new("sides", "Dice sides", TypeTag::I32))
        .static_handler(|_context: Arc<InvocationContext>, (_sides,): (String,)| async {});
    assert_invalid(service.register(declaration), "cannot be bound from parameter type i32");

    let arity = CommandDeclaration::slash("roll", "Rolls dice")
        .parameter(ParameterDeclaration::new("sides", "Dice sides", TypeTag::I32))
        .static_handler(noop);
    assert_invalid(service.register(arity), "takes no arguments");
}

// ============================================================================
// SECTION: Type Resolution
// ============================================================================

#[test]
fn unregistered_custom_type_is_unsupported() {
    let mut service = service();
    let declaration = CommandDeclaration::slash("paint", "Paints")
        .parameter(ParameterDeclaration::new("color", "Color", TypeTag::Custom("color")))
        .static_handler(|_context: Arc<InvocationContext>, (_color,): (ArgumentValue,)| async {});
    match service.register(declaration.clone()) {
        Err(DefinitionError::UnsupportedParameterType {
            parameter,
            type_tag,
            ..
        }) => {
            assert_eq!(parameter.as_str(), "color");
            assert_eq!(type_tag, "color");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    service.registry_mut().register(TypeTag::Custom("color"), ColorReader);
    let descriptor = service.register(declaration).unwrap();
    assert_eq!(descriptor.parameters()[0].option_kind, OptionKind::String);
}

#[test]
fn bounds_must_fit_the_option_kind() {
    let mut service = service();
    let text_bounds = CommandDeclaration::slash("say", "Says")
        .parameter(ParameterDeclaration::new("text", "Text", TypeTag::String).min_value(1.0))
        .static_handler(|_context: Arc<InvocationContext>, (_text,): (String,)| async {});
    assert_invalid(service.register(text_bounds), "cannot declare value bounds");

    let inverted = CommandDeclaration::slash("say", "Says")
        .parameter(ParameterDeclaration::new("count", "Count", TypeTag::I32).min_value(5.0).max_value(1.0))
        .static_handler(|_context: Arc<InvocationContext>, (_count,): (i32,)| async {});
    assert_invalid(service.register(inverted), "exceeds maximum");

    let too_long = CommandDeclaration::slash("say", "Says")
        .parameter(ParameterDeclaration::new("text", "Text", TypeTag::String).max_length(6001))
        .static_handler(|_context: Arc<InvocationContext>, (_text,): (String,)| async {});
    assert_invalid(service.register(too_long), "maximum length");
}

#[test]
fn default_value_must_match_the_declared_type() {
    let mut service = service();
    let declaration = CommandDeclaration::slash("say", "Says")
        .parameter(
            ParameterDeclaration::new("count", "Count", TypeTag::I32)
                .default_value(ArgumentValue::Text("one".to_string())),
        )
        .static_handler(|_context: Arc<InvocationContext>, (_count,): (i32,)| async {});
    assert_invalid(service.register(declaration), "cannot be read as i32");
}

#[test]
fn default_value_must_fit_the_declared_bounds() {
    let mut service = service();
    let outside = CommandDeclaration::slash("roll", "Rolls dice")
        .parameter(
            ParameterDeclaration::new("sides", "Dice sides", TypeTag::I32)
                .min_value(1.0)
                .max_value(6.0)
                .default_value(ArgumentValue::Integer(99)),
        )
        .static_handler(|_context: Arc<InvocationContext>, (_sides,): (i32,)| async {});
    assert_invalid(service.register(outside), "default value is out of bounds");
    assert!(service.command(&CommandName::from("roll")).is_none());

    let short = CommandDeclaration::slash("tag", "Tags")
        .parameter(
            ParameterDeclaration::new("label", "Label", TypeTag::String)
                .min_length(2)
                .default_value(ArgumentValue::Text("x".to_string())),
        )
        .static_handler(|_context: Arc<InvocationContext>, (_label,): (String,)| async {});
    assert_invalid(service.register(short), "default value is out of bounds");

    let inside = CommandDeclaration::slash("roll", "Rolls dice")
        .parameter(
            ParameterDeclaration::new("sides", "Dice sides", TypeTag::I32)
                .min_value(1.0)
                .max_value(6.0)
                .default_value(ArgumentValue::Integer(6)),
        )
        .static_handler(|_context: Arc<InvocationContext>, (_sides,): (i32,)| async {});
    assert!(service.register(inside).is_ok());
}

#[test]
fn autocomplete_cannot_combine_with_choices() {
    let mut service = service();
    let declaration = CommandDeclaration::slash("pick", "Picks")
        .parameter(
            ParameterDeclaration::new("fruit", "Fruit", TypeTag::String)
                .choices(vec![Choice::text("Apple", "apple")])
                .autocomplete(autocomplete_fn(|_input| -> Suggestions { Box::new(std::iter::empty()) })),
        )
        .static_handler(|_context: Arc<InvocationContext>, (_fruit,): (String,)| async {});
    assert_invalid(service.register(declaration), "cannot combine autocomplete");
}

// ============================================================================
// SECTION: Descriptor Output
// ============================================================================

#[test]
fn permission_checks_precede_custom_preconditions() {
    let mut service = service();
    let descriptor = service
        .register(
            CommandDeclaration::slash("purge", "Purges messages")
                .require_bot_permissions(Permissions::empty(), Permissions::MANAGE_MESSAGES)
                .require_user_permissions(Permissions::MANAGE_MESSAGES, Permissions::empty())
                .precondition(RequireGuildContext::default())
                .static_handler(noop),
        )
        .unwrap();
    assert_eq!(
        descriptor.preconditions().names(),
        vec!["require_bot_permissions", "require_user_permissions", "require_guild_context"]
    );
}

#[tokio::test]
async fn module_requirements_merge_with_command_requirements() {
    let mut service = service();
    let descriptor = service
        .register(
            CommandDeclaration::slash("warn", "Warns a member")
                .require_bot_permissions(Permissions::empty(), Permissions::SEND_MESSAGES)
                .require_user_permissions(Permissions::BAN_MEMBERS, Permissions::empty())
                .precondition(LoggedCheck("command_check"))
                .module_handler(|_module: ModerationModule, (): ()| async {}),
        )
        .unwrap();

    assert_eq!(
        descriptor.required_permissions(),
        RequiredPermissions {
            bot_guild: Permissions::empty(),
            bot_channel: Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS,
            user_guild: Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS,
            user_channel: Permissions::empty(),
        }
    );
    assert_eq!(
        descriptor.preconditions().names(),
        vec!["require_bot_permissions", "require_user_permissions", "module_check", "command_check"]
    );

    let context = InvocationContext::direct("warn", UserId::new(1), UserId::new(2));
    descriptor.preconditions().evaluate(&context, &ServiceProvider::new()).await.unwrap();
    assert_eq!(*CHECK_LOG.lock().unwrap(), vec!["module_check", "command_check"]);
}

#[test]
fn higher_priority_commands_are_listed_first() {
    let mut service = service();
    for (name, priority) in [("alpha", 0), ("gamma", 5), ("delta", -1), ("beta", 5)] {
        service
            .register(CommandDeclaration::slash(name, "Listed command").priority(priority).static_handler(noop))
            .unwrap();
    }
    let names: Vec<&str> = service.command_names().into_iter().map(CommandName::as_str).collect();
    assert_eq!(names, vec!["beta", "gamma", "alpha", "delta"]);
    let schema_names: Vec<String> =
        service.schemas().into_iter().map(|schema| schema.name.as_str().to_string()).collect();
    assert_eq!(schema_names, vec!["beta", "gamma", "alpha", "delta"]);
}

#[test]
fn schema_renders_platform_fields() {
    let mut service = service();
    service
        .register(
            CommandDeclaration::slash("roll", "Rolls dice")
                .parameter(
                    ParameterDeclaration::new("sides", "Dice sides", TypeTag::I32)
                        .min_value(2.0)
                        .max_value(100.0),
                )
                .parameter(
                    ParameterDeclaration::new("label", "Roll label", TypeTag::String)
                        .default_value(ArgumentValue::Text(String::new())),
                )
                .default_member_permissions(Permissions::SEND_MESSAGES)
                .dm_permission(false)
                .guild(GuildId::new(77))
                .static_handler(
                    |_context: Arc<InvocationContext>, (_sides, _label): (i32, String)| async {},
                ),
        )
        .unwrap();
    let schemas = serde_json::to_value(service.schemas()).unwrap();
    assert_eq!(
        schemas,
        json!([{
            "type": 1,
            "name": "roll",
            "description": "Rolls dice",
            "options": [
                {
                    "type": 4,
                    "name": "sides",
                    "description": "Dice sides",
                    "required": true,
                    "min_value": 2.0,
                    "max_value": 100.0
                },
                {
                    "type": 3,
                    "name": "label",
                    "description": "Roll label",
                    "required": false
                }
            ],
            "default_member_permissions": "2048",
            "dm_permission": false,
            "nsfw": false,
            "guild_id": 77
        }])
    );
}
