// crates/cmdgate-core/tests/autocomplete.rs
// ============================================================================
// Module: Autocomplete Tests
// Description: Tests for suggestion routing, truncation and failures.
// Purpose: Ensure callbacks are resolved per parameter and results are capped.
// Dependencies: cmdgate-core, async-trait, tokio
// ============================================================================

//! ## Overview
//! Serves autocomplete requests through the command service and checks the
//! routing, truncation, failure and audit behavior.

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

use async_trait::async_trait;
use cmdgate_core::AutocompleteInput;
use cmdgate_core::AutocompleteProvider;
use cmdgate_core::AutocompleteRequest;
use cmdgate_core::CancellationSignal;
use cmdgate_core::Choice;
use cmdgate_core::CommandAuditSink;
use cmdgate_core::CommandDeclaration;
use cmdgate_core::CommandService;
use cmdgate_core::HandlerError;
use cmdgate_core::InvocationContext;
use cmdgate_core::InvocationError;
use cmdgate_core::ParameterDeclaration;
use cmdgate_core::RawArgument;
use cmdgate_core::ServiceOptions;
use cmdgate_core::ServiceProvider;
use cmdgate_core::Suggestions;
use cmdgate_core::TypeReaderRegistry;
use cmdgate_core::TypeTag;
use cmdgate_core::autocomplete_fn;
use cmdgate_core::runtime::RequestOutcome;
use common::ALICE;
use common::RecordingAuditSink;
use common::channel;
use common::guild_context;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Fruit catalog supplied as a host service.
struct Fruits(Vec<&'static str>);

/// Suggests catalog fruits starting with the typed prefix.
struct FruitProvider;

#[async_trait]
impl AutocompleteProvider for FruitProvider {
    async fn suggest(&self, input: AutocompleteInput<'_>) -> Result<Suggestions, HandlerError> {
        let fruits = input.services.get::<Fruits>().ok_or_else(|| HandlerError::new("no catalog"))?;
        let prefix = match input.current {
            RawArgument::Text(text) => text.to_lowercase(),
            other => other.to_string(),
        };
        let matches: Vec<Choice> = fruits
            .0
            .iter()
            .filter(|fruit| fruit.starts_with(&prefix))
            .map(|fruit| Choice::text(*fruit, *fruit))
            .collect();
        Ok(Box::new(matches.into_iter()))
    }
}

fn service_with(options: ServiceOptions) -> CommandService {
    let mut service =
        CommandService::new(TypeReaderRegistry::with_builtin_readers()).with_options(options);
    service
        .register(
            CommandDeclaration::slash("pick", "Picks things")
                .parameter(ParameterDeclaration::new("fruit", "Fruit", TypeTag::String).autocomplete(FruitProvider))
                .parameter(
                    ParameterDeclaration::new("count", "How many", TypeTag::I64).autocomplete(autocomplete_fn(
                        |_input| -> Suggestions { Box::new((1_i64 ..).map(|n| Choice::integer(n.to_string(), n))) },
                    )),
                )
                .parameter(ParameterDeclaration::new("note", "Free text", TypeTag::String))
                .static_handler(
                    |_context: Arc<InvocationContext>, (_fruit, _count, _note): (String, i64, String)| async {},
                ),
        )
        .unwrap();
    service
}

fn services() -> Arc<ServiceProvider> {
    Arc::new(ServiceProvider::new().with(Fruits(vec!["apple", "apricot", "banana", "blueberry"])))
}

fn request(focused: &str, current: impl Into<RawArgument>) -> AutocompleteRequest {
    AutocompleteRequest::new(guild_context("pick", ALICE, channel()), focused, current)
}

// ============================================================================
// SECTION: Routing
// ============================================================================

#[tokio::test]
async fn suggestions_come_from_the_focused_parameter() {
    let service = service_with(ServiceOptions::default());
    let choices = service.autocomplete(request("fruit", "Ap"), services()).await.unwrap();
    assert_eq!(choices, vec![Choice::text("apple", "apple"), Choice::text("apricot", "apricot")]);

    let choices = service.autocomplete(request("fruit", "z"), services()).await.unwrap();
    assert!(choices.is_empty());
}

#[tokio::test]
async fn parameter_without_callback_is_reported() {
    let service = service_with(ServiceOptions::default());
    match service.autocomplete(request("note", "hello"), services()).await {
        Err(InvocationError::AutocompleteHandlerNotFound {
            command,
            parameter,
        }) => {
            assert_eq!(command.as_str(), "pick");
            assert_eq!(parameter.as_str(), "note");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_command_is_reported() {
    let service = service_with(ServiceOptions::default());
    let request = AutocompleteRequest::new(guild_context("drop", ALICE, channel()), "fruit", "a");
    assert!(matches!(
        service.autocomplete(request, services()).await,
        Err(InvocationError::CommandNotFound(_))
    ));
}

#[tokio::test]
async fn provider_failures_surface_as_handler_errors() {
    let service = service_with(ServiceOptions::default());
    let result = service.autocomplete(request("fruit", "a"), Arc::new(ServiceProvider::new())).await;
    assert!(matches!(result, Err(InvocationError::Handler(error)) if error.to_string() == "no catalog"));
}

// ============================================================================
// SECTION: Truncation
// ============================================================================

#[tokio::test]
async fn unbounded_suggestions_are_capped_at_platform_limit() {
    let service = service_with(ServiceOptions::default());
    let choices = service.autocomplete(request("count", 0_i64), services()).await.unwrap();
    assert_eq!(choices.len(), 25);
    assert_eq!(choices.first(), Some(&Choice::integer("1", 1)));
    assert_eq!(choices.last(), Some(&Choice::integer("25", 25)));
}

#[tokio::test]
async fn configured_limit_caps_suggestions() {
    let service = service_with(ServiceOptions {
        autocomplete_limit: 3,
        ..ServiceOptions::default()
    });
    let choices = service.autocomplete(request("count", 0_i64), services()).await.unwrap();
    assert_eq!(choices.len(), 3);
}

// ============================================================================
// SECTION: Cancellation and Audit
// ============================================================================

#[tokio::test]
async fn cancelled_autocomplete_returns_cancelled() {
    let service = service_with(ServiceOptions::default());
    let (handle, signal) = CancellationSignal::pair();
    handle.cancel();
    let result = service.autocomplete(request("fruit", "a").with_cancellation(signal), services()).await;
    assert!(matches!(result, Err(InvocationError::Cancelled)));
}

#[tokio::test]
async fn autocomplete_requests_are_audited() {
    let audit = Arc::new(RecordingAuditSink::default());
    let service = service_with(ServiceOptions::default())
        .with_audit_sink(Arc::clone(&audit) as Arc<dyn CommandAuditSink>);
    service.autocomplete(request("fruit", "b"), services()).await.unwrap();
    assert!(service.autocomplete(request("note", "b"), services()).await.is_err());

    let events = audit.autocompletes.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "autocomplete_invocation");
    assert_eq!(events[0].parameter.as_str(), "fruit");
    assert_eq!(events[0].outcome, RequestOutcome::Completed);
    assert_eq!(events[0].suggestions, 2);
    assert_eq!(events[1].outcome, RequestOutcome::Failed);
    assert_eq!(events[1].error_kind, Some("autocomplete_handler_not_found"));
    assert!(audit.invocations.lock().unwrap().is_empty());
}
