// crates/cmdgate-core/src/runtime/binding.rs
// ============================================================================
// Module: cmdgate Argument Binding
// Description: Converts raw request arguments into positional typed values.
// Purpose: Apply readers, defaults and declared bounds before any check runs.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Binding walks the descriptor's parameters in declared order and stops at
//! the first failure. Each supplied value is converted by the parameter's
//! reader, then checked against inclusive numeric bounds, inclusive length
//! bounds and the channel kind filter. Absent values take the declared
//! default; absent required values fail. Argument names the command does not
//! declare are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ArgumentParseFailure;
use crate::core::ArgumentValue;
use crate::core::InvocationContext;
use crate::core::InvocationError;
use crate::core::ParameterName;
use crate::core::RawArgument;
use crate::core::ReadError;
use crate::core::ServiceProvider;
use crate::interfaces::ReadRequest;
use crate::runtime::declaration::BoundArguments;
use crate::runtime::descriptor::CommandDescriptor;
use crate::runtime::descriptor::ParameterDescriptor;

// ============================================================================
// SECTION: Binding
// ============================================================================

/// Binds raw arguments to a command's parameters.
///
/// # Errors
///
/// Returns [`InvocationError::ArgumentParse`] for unknown, missing, malformed
/// or out-of-bounds values, and [`InvocationError::EntityNotFound`] when a
/// referenced entity is unresolved.
pub async fn bind_arguments(
    descriptor: &CommandDescriptor,
    arguments: &BTreeMap<ParameterName, RawArgument>,
    context: &InvocationContext,
    services: &ServiceProvider,
) -> Result<BoundArguments, InvocationError> {
    if let Some(unknown) = arguments.keys().find(|name| descriptor.parameter(name).is_none()) {
        return Err(parse_failure(unknown, "declared parameter", "unknown parameter").into());
    }
    let mut bound = BoundArguments::new();
    for parameter in descriptor.parameters() {
        let value = match arguments.get(&parameter.name) {
            Some(raw) => read_argument(parameter, raw, context, services).await?,
            None => parameter.default.clone().ok_or_else(|| {
                parse_failure(&parameter.name, &parameter.tag.to_string(), "missing required argument")
            })?,
        };
        bound.push(value);
    }
    Ok(bound)
}

/// Reads and validates one supplied value.
async fn read_argument(
    parameter: &ParameterDescriptor,
    raw: &RawArgument,
    context: &InvocationContext,
    services: &ServiceProvider,
) -> Result<ArgumentValue, InvocationError> {
    let request = ReadRequest {
        tag: parameter.tag,
        parameter: &parameter.name,
        context,
        services,
    };
    let value = parameter.reader().read(raw, request).await.map_err(|err| match err {
        ReadError::Invalid(reason) => InvocationError::ArgumentParse(parse_failure(
            &parameter.name,
            &parameter.tag.to_string(),
            &reason,
        )),
        ReadError::EntityNotFound(entity) => InvocationError::EntityNotFound(entity),
    })?;
    check_bounds(parameter, &value)?;
    Ok(value)
}

/// Enforces inclusive bounds and the channel kind filter.
pub(crate) fn check_bounds(
    parameter: &ParameterDescriptor,
    value: &ArgumentValue,
) -> Result<(), ArgumentParseFailure> {
    let expected = parameter.tag.to_string();
    if let Some(reason) = numeric_violation(parameter.min_value, parameter.max_value, value) {
        return Err(parse_failure(&parameter.name, &expected, &reason));
    }
    if let Some(length) = value.text_length() {
        if let Some(min) = parameter.min_length
            && length < usize::from(min)
        {
            return Err(parse_failure(
                &parameter.name,
                &expected,
                &format!("length {length} is shorter than the minimum {min}"),
            ));
        }
        if let Some(max) = parameter.max_length
            && length > usize::from(max)
        {
            return Err(parse_failure(
                &parameter.name,
                &expected,
                &format!("length {length} is longer than the maximum {max}"),
            ));
        }
    }
    if let ArgumentValue::Channel(channel) = value
        && !parameter.channel_kinds.is_empty()
        && !parameter.channel_kinds.contains(&channel.kind)
    {
        return Err(parse_failure(
            &parameter.name,
            &expected,
            &format!("channel {} is not an accepted channel kind", channel.channel_id),
        ));
    }
    Ok(())
}

/// Describes a numeric value outside the inclusive bounds.
///
/// Integral values are compared as integers against the bounds rounded
/// inward, so values beyond 2^53 never collapse onto a bound.
fn numeric_violation(min: Option<f64>, max: Option<f64>, value: &ArgumentValue) -> Option<String> {
    if let Some(integer) = value.integral() {
        if let Some(min) = min
            && integer < saturating_integer(min.ceil())
        {
            return Some(format!("{integer} is less than the minimum {min}"));
        }
        if let Some(max) = max
            && integer > saturating_integer(max.floor())
        {
            return Some(format!("{integer} is greater than the maximum {max}"));
        }
        return None;
    }
    let number = value.fractional()?;
    if let Some(min) = min
        && number < min
    {
        return Some(format!("{number} is less than the minimum {min}"));
    }
    if let Some(max) = max
        && number > max
    {
        return Some(format!("{number} is greater than the maximum {max}"));
    }
    None
}

/// Converts an integer-valued bound, saturating at the `i128` range.
#[allow(clippy::cast_possible_truncation, reason = "Bounds are rounded first and the cast saturates.")]
const fn saturating_integer(bound: f64) -> i128 {
    bound as i128
}

/// Builds an argument failure.
fn parse_failure(parameter: &ParameterName, expected: &str, reason: &str) -> ArgumentParseFailure {
    ArgumentParseFailure {
        parameter: parameter.clone(),
        expected: expected.to_string(),
        reason: reason.to_string(),
    }
}
