// crates/cmdgate-core/src/runtime/autocomplete.rs
// ============================================================================
// Module: cmdgate Autocomplete Router
// Description: Per-command table of suggestion callbacks keyed by parameter.
// Purpose: Route autocomplete requests to the callback declared for a field.
// Dependencies: crate::{core, interfaces}, async-trait
// ============================================================================

//! ## Overview
//! The router is populated while a command's parameters are validated and is
//! read-only afterwards. Callbacks return a lazy iterator; the router takes
//! at most the configured limit so a misbehaving provider cannot flood the
//! platform.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Choice;
use crate::core::CommandName;
use crate::core::HandlerError;
use crate::core::InvocationError;
use crate::core::ParameterName;
use crate::interfaces::AutocompleteInput;
use crate::interfaces::AutocompleteProvider;
use crate::interfaces::Suggestions;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Suggestion callbacks for one command.
#[derive(Clone, Default)]
pub struct AutocompleteRouter {
    /// Callbacks keyed by parameter name.
    providers: BTreeMap<ParameterName, Arc<dyn AutocompleteProvider>>,
}

impl AutocompleteRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the callback for a parameter, replacing any previous one.
    pub fn register(&mut self, parameter: ParameterName, provider: Arc<dyn AutocompleteProvider>) {
        self.providers.insert(parameter, provider);
    }

    /// Resolves the callback for a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::AutocompleteHandlerNotFound`] when the
    /// parameter has no callback.
    pub fn resolve(
        &self,
        command: &CommandName,
        parameter: &ParameterName,
    ) -> Result<Arc<dyn AutocompleteProvider>, InvocationError> {
        self.providers.get(parameter).cloned().ok_or_else(|| {
            InvocationError::AutocompleteHandlerNotFound {
                command: command.clone(),
                parameter: parameter.clone(),
            }
        })
    }

    /// Returns true when the parameter has a callback.
    #[must_use]
    pub fn contains(&self, parameter: &ParameterName) -> bool {
        self.providers.contains_key(parameter)
    }

    /// Returns the parameters with callbacks, in name order.
    #[must_use]
    pub fn parameters(&self) -> Vec<&ParameterName> {
        self.providers.keys().collect()
    }

    /// Resolves the callback and collects at most `limit` suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError::AutocompleteHandlerNotFound`] when no
    /// callback is registered, or [`InvocationError::Handler`] when the
    /// callback fails.
    pub async fn complete(
        &self,
        command: &CommandName,
        input: AutocompleteInput<'_>,
        limit: usize,
    ) -> Result<Vec<Choice>, InvocationError> {
        let provider = self.resolve(command, input.parameter)?;
        let suggestions = provider.suggest(input).await?;
        Ok(suggestions.take(limit).collect())
    }
}

impl fmt::Debug for AutocompleteRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutocompleteRouter").field("parameters", &self.parameters()).finish()
    }
}

// ============================================================================
// SECTION: Closure Providers
// ============================================================================

/// Autocomplete provider backed by a synchronous closure.
pub struct FnAutocomplete<F> {
    /// Suggestion closure.
    suggest: F,
}

impl<F> FnAutocomplete<F>
where
    F: for<'a> Fn(AutocompleteInput<'a>) -> Suggestions + Send + Sync,
{
    /// Wraps a closure.
    #[must_use]
    pub const fn new(suggest: F) -> Self {
        Self {
            suggest,
        }
    }
}

#[async_trait]
impl<F> AutocompleteProvider for FnAutocomplete<F>
where
    F: for<'a> Fn(AutocompleteInput<'a>) -> Suggestions + Send + Sync,
{
    async fn suggest(&self, input: AutocompleteInput<'_>) -> Result<Suggestions, HandlerError> {
        Ok((self.suggest)(input))
    }
}

/// Wraps a closure as an autocomplete provider.
#[must_use]
pub fn autocomplete_fn<F>(suggest: F) -> FnAutocomplete<F>
where
    F: for<'a> Fn(AutocompleteInput<'a>) -> Suggestions + Send + Sync,
{
    FnAutocomplete::new(suggest)
}
