//! JSON Pointer evaluation (RFC 6901) with the `*` wildcard extension used by
//! result references.
//!
//! [`evaluate`] walks a [`serde_json::Value`] one reference token at a time.
//! Plain pointers behave exactly as RFC 6901 describes. When the current
//! value is an array and the token is `*`, the rest of the pointer is applied
//! to every element and the results are collected into a new array:
//!
//! ```text
//! evaluate("/list/*/id", {"list": [{"id": "a"}, {"id": "b"}]})  ==>  ["a", "b"]
//! ```
//!
//! Elements the suffix cannot be applied to are skipped rather than failing
//! the whole evaluation, and array results are spliced into the output
//! instead of nested.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Largest integer an array index may take (2^53 − 1).
pub const MAX_SAFE_INDEX: u64 = 9_007_199_254_740_991;

/// Errors returned by [`evaluate`] and [`evaluate_in`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/', got: {0:?}")]
    NotAbsolute(String),

    #[error("cannot evaluate token {token:?} against null")]
    NullValue { token: String },

    #[error("object has no member {0:?}")]
    MissingMember(String),

    #[error("'-' refers to the nonexistent element after the last array element")]
    AppendSlot,

    #[error("array index must be 0 or a positive integer without leading zeros, got: {0:?}")]
    InvalidIndex(String),

    #[error("array index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: u64, len: usize },

    #[error("cannot evaluate token {token:?} against a scalar value")]
    ScalarValue { token: String },
}

/// Evaluate `path` against `document` and return a copy of the value found.
///
/// An empty path selects the whole document.
///
/// # Errors
///
/// Returns a [`PointerError`] when the path is malformed or a token does not
/// resolve. Failures inside a `*` wildcard only drop the offending element.
pub fn evaluate(path: &str, document: &Value) -> Result<Value, PointerError> {
    if path.is_empty() {
        return Ok(document.clone());
    }
    walk(document, &split(path)?)
}

/// Like [`evaluate`], with `members` standing in for an object document.
///
/// Only the selected value is copied, so callers holding a bare argument map
/// need not wrap it in a [`Value`] first.
pub fn evaluate_in(path: &str, members: &Map<String, Value>) -> Result<Value, PointerError> {
    if path.is_empty() {
        return Ok(Value::Object(members.clone()));
    }
    let tokens = split(path)?;
    let token = decode_token(tokens[0]);
    let member = members
        .get(&token)
        .ok_or(PointerError::MissingMember(token))?;
    walk(member, &tokens[1..])
}

/// Decode one reference token: `~1` becomes `/`, then `~0` becomes `~`.
pub fn decode_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Encode a member name as a reference token, the inverse of [`decode_token`].
pub fn escape_token(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

// --- traversal ---------------------------------------------------------------

// Always yields at least one token for a non-empty path.
fn split(path: &str) -> Result<Vec<&str>, PointerError> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| PointerError::NotAbsolute(path.to_owned()))?;
    Ok(rest.split('/').collect())
}

// Tokens are kept raw and decoded per step so that a wildcard suffix is
// evaluated exactly as the unsplit path would be.
fn walk(document: &Value, tokens: &[&str]) -> Result<Value, PointerError> {
    let mut current = document;

    for (position, raw) in tokens.iter().enumerate() {
        let token = decode_token(raw);
        current = match current {
            Value::Null => return Err(PointerError::NullValue { token }),
            Value::Object(members) => members
                .get(&token)
                .ok_or(PointerError::MissingMember(token))?,
            Value::Array(items) => {
                if token == "*" {
                    return Ok(wildcard(items, &tokens[position + 1..]));
                }
                let index = parse_index(&token)?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .ok_or(PointerError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    })?
            }
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                return Err(PointerError::ScalarValue { token })
            }
        };
    }

    Ok(current.clone())
}

fn wildcard(items: &[Value], suffix: &[&str]) -> Value {
    if suffix.is_empty() {
        return Value::Array(items.to_vec());
    }

    let mut collected = Vec::new();
    for item in items.iter().filter(|item| item.is_object()) {
        match walk(item, suffix) {
            Ok(Value::Array(values)) => collected.extend(values),
            Ok(value) => collected.push(value),
            Err(_) => {}
        }
    }
    Value::Array(collected)
}

fn parse_index(token: &str) -> Result<u64, PointerError> {
    if token == "-" {
        return Err(PointerError::AppendSlot);
    }
    if !INDEX_RE.is_match(token) {
        return Err(PointerError::InvalidIndex(token.to_owned()));
    }
    match token.parse::<u64>() {
        Ok(index) if index <= MAX_SAFE_INDEX => Ok(index),
        _ => Err(PointerError::InvalidIndex(token.to_owned())),
    }
}

/// `^(0|[1-9][0-9]*)$`
static INDEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)$").expect("invalid index regex"));

// --- tests -------------------------------------------------------------------
