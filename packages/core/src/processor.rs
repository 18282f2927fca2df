//! Batch execution.
//!
//! [`RequestProcessor::process`] runs the calls of a [`Request`] strictly in
//! order. Before a call is dispatched, every `#`-prefixed argument is
//! replaced by the value its [`ResultReference`] points at in an earlier
//! response. Problems with one call (a bad reference, a clashing argument
//! name, an unknown method, a failing handler) turn that call's response
//! into an `"error"` invocation and never stop the rest of the batch.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::error::MethodError;
use crate::pointer::{self, PointerError};
use crate::registry::MethodRegistry;
use crate::types::{Arguments, Invocation, Request, Response, ResultReference, REFERENCE_PREFIX};

/// Why a result reference could not be resolved. Always reported to the
/// client as `invalidResultReference`; the detail is only logged.
#[derive(Debug, Error)]
enum ReferenceError {
    #[error("reference is not a {{resultOf, name, path}} object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("no earlier response has call id {0:?}")]
    UnknownCall(String),

    #[error("response {call_id:?} came from {found:?}, not {expected:?}")]
    NameMismatch {
        call_id: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Pointer(#[from] PointerError),
}

/// Executes batches against a [`MethodRegistry`].
///
/// Holds no per-request state: one processor can serve any number of
/// requests, from any number of threads, at the same time.
#[derive(Debug, Default)]
pub struct RequestProcessor {
    registry: MethodRegistry,
}

impl RequestProcessor {
    pub fn new(registry: MethodRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Execute every call in `request` and assemble the response.
    ///
    /// `session_state` is copied into the response as-is. `createdIds` is
    /// passed through without inspection.
    pub fn process(&self, request: &Request, session_state: &str) -> Response {
        let mut responses: Vec<Invocation> = Vec::with_capacity(request.method_calls.len());
        for call in &request.method_calls {
            let response = self.execute(call, &responses);
            responses.push(response);
        }

        Response {
            method_responses: responses,
            created_ids: request.created_ids.clone(),
            session_state: session_state.to_owned(),
        }
    }

    fn execute(&self, call: &Invocation, earlier: &[Invocation]) -> Invocation {
        let arguments = match resolve_arguments(call, earlier) {
            Ok(arguments) => arguments,
            Err(error) => return Invocation::error(&call.call_id, &error),
        };

        let Some(handler) = self.registry.get(&call.name) else {
            tracing::debug!(call_id = %call.call_id, method = %call.name, "unknown method");
            return Invocation::error(&call.call_id, &MethodError::unknown_method());
        };

        tracing::debug!(call_id = %call.call_id, method = %call.name, "dispatching");
        let resolved = Invocation::new(call.name.clone(), arguments, call.call_id.clone());
        handler.call(resolved).unwrap_or_else(|error| {
            tracing::debug!(call_id = %call.call_id, method = %call.name, %error, "method failed");
            Invocation::error(&call.call_id, &error)
        })
    }
}

/// Build the resolved argument map for `call`, leaving `call` untouched.
fn resolve_arguments(call: &Invocation, earlier: &[Invocation]) -> Result<Arguments, MethodError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(call.arguments.len());
    let mut resolved = Arguments::new();

    for (key, value) in &call.arguments {
        let unprefixed = key.strip_prefix(REFERENCE_PREFIX).unwrap_or(key);
        if !seen.insert(unprefixed) {
            tracing::debug!(call_id = %call.call_id, argument = unprefixed, "argument given twice");
            return Err(MethodError::invalid_arguments());
        }

        let value = if key.starts_with(REFERENCE_PREFIX) {
            resolve_reference(value, earlier).map_err(|error| {
                tracing::debug!(call_id = %call.call_id, argument = %key, %error, "bad result reference");
                MethodError::invalid_result_reference()
            })?
        } else {
            value.clone()
        };
        resolved.insert(key.clone(), value);
    }

    Ok(resolved)
}

fn resolve_reference(
    value: &serde_json::Value,
    earlier: &[Invocation],
) -> Result<serde_json::Value, ReferenceError> {
    let reference = ResultReference::deserialize(value)?;

    let target = earlier
        .iter()
        .find(|response| response.call_id == reference.result_of)
        .ok_or_else(|| ReferenceError::UnknownCall(reference.result_of.clone()))?;

    if target.name != reference.name {
        return Err(ReferenceError::NameMismatch {
            call_id: reference.result_of,
            expected: reference.name,
            found: target.name.clone(),
        });
    }

    Ok(pointer::evaluate_in(&reference.path, &target.arguments)?)
}

// --- tests -------------------------------------------------------------------
