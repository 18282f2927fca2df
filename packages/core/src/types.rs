//! Core data types for the batched method-call protocol.
//!
//! This module defines the wire-format structures exchanged with clients:
//! [`Invocation`], [`ResultReference`], [`Request`], and [`Response`]. All
//! types serialise to and from JSON in the RFC 8620 shape.

use std::collections::BTreeMap;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::MethodError;

/// The arguments of an invocation, in wire order.
pub type Arguments = Map<String, Value>;

/// Method name of an invocation that reports a [`MethodError`].
pub const ERROR_METHOD: &str = "error";

/// Prefix marking an argument whose value is a [`ResultReference`].
pub const REFERENCE_PREFIX: char = '#';

/// One method call, or one method response.
///
/// Serialises as the 3-element array `[name, arguments, callId]`:
///
/// ```json
/// ["Core/echo", { "hello": true }, "c1"]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Method name, e.g. `"Core/echo"`; `"error"` on a failed response.
    pub name: String,

    /// Named arguments, kept in the order they appeared on the wire.
    pub arguments: Arguments,

    /// Client-chosen id echoed back on the matching response.
    pub call_id: String,
}

impl Invocation {
    pub fn new(name: impl Into<String>, arguments: Arguments, call_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
            call_id: call_id.into(),
        }
    }

    /// The `["error", {"type": ...}, callId]` response for a failed call.
    pub fn error(call_id: impl Into<String>, error: &MethodError) -> Self {
        let arguments = match serde_json::to_value(error) {
            Ok(Value::Object(members)) => members,
            _ => {
                let mut members = Map::new();
                members.insert("type".into(), Value::String(error.kind.to_string()));
                members
            }
        };
        Self::new(ERROR_METHOD, arguments, call_id)
    }

    /// Whether this is an `"error"` response.
    pub fn is_error(&self) -> bool {
        self.name == ERROR_METHOD
    }
}

impl Serialize for Invocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.arguments)?;
        tuple.serialize_element(&self.call_id)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Invocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_tuple(3, InvocationVisitor)
    }
}

struct InvocationVisitor;

impl<'de> Visitor<'de> for InvocationVisitor {
    type Value = Invocation;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an invocation array [name, arguments, callId]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Invocation, A::Error> {
        let name: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let arguments: Arguments = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let call_id: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(2, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(4, &self));
        }
        Ok(Invocation::new(name, arguments, call_id))
    }
}

/// A pointer into the response of an earlier call in the same request.
///
/// Appears as the value of a `#`-prefixed argument:
///
/// ```json
/// "#ids": { "resultOf": "c1", "name": "Foo/query", "path": "/ids" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultReference {
    /// Call id of the earlier invocation.
    pub result_of: String,

    /// Method name the earlier response must carry.
    pub name: String,

    /// JSON Pointer (with `*` wildcard) into that response's arguments.
    pub path: String,
}

/// A request envelope, already validated by the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Capability URNs the client intends to use.
    pub using: Vec<String>,

    /// The calls to execute, in order.
    pub method_calls: Vec<Invocation>,

    /// Creation id → server id map, passed through to the response untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_ids: Option<BTreeMap<String, String>>,
}

/// The result of processing a [`Request`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// One response per call, in call order.
    pub method_responses: Vec<Invocation>,

    /// The request's `createdIds`, absent when the request had none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_ids: Option<BTreeMap<String, String>>,

    /// Opaque session version token supplied by the caller of `process`.
    pub session_state: String,
}

// --- tests -------------------------------------------------------------------
