//! The two error families of the protocol.
//!
//! - [`RequestError`] rejects a whole request envelope. It is produced by the
//!   boundary before any call runs and always travels as an HTTP 400 problem
//!   document.
//! - [`MethodError`] belongs to exactly one call. It replaces that call's
//!   response with `["error", {"type": ...}, callId]`; sibling calls are not
//!   affected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Request-level errors
// ---------------------------------------------------------------------------

/// The fixed vocabulary of request-level errors.
///
/// Serialises as the full URN, e.g. `"urn:ietf:params:jmap:error:notJSON"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// `using` names a capability the server does not support.
    #[serde(rename = "urn:ietf:params:jmap:error:unknownCapability")]
    UnknownCapability,
    /// The body is not valid JSON.
    #[serde(rename = "urn:ietf:params:jmap:error:notJSON")]
    NotJson,
    /// The body is JSON but does not have the shape of a request.
    #[serde(rename = "urn:ietf:params:jmap:error:notRequest")]
    NotRequest,
    /// The request exceeds one of the server's advertised limits.
    #[serde(rename = "urn:ietf:params:jmap:error:limit")]
    Limit,
}

impl RequestErrorKind {
    /// The URN carried in the `type` member of the problem document.
    pub fn urn(self) -> &'static str {
        match self {
            RequestErrorKind::UnknownCapability => {
                "urn:ietf:params:jmap:error:unknownCapability"
            }
            RequestErrorKind::NotJson => "urn:ietf:params:jmap:error:notJSON",
            RequestErrorKind::NotRequest => "urn:ietf:params:jmap:error:notRequest",
            RequestErrorKind::Limit => "urn:ietf:params:jmap:error:limit",
        }
    }
}

impl std::fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.urn())
    }
}

/// A request-level error, serialised as an RFC 7807 problem document:
///
/// ```json
/// { "type": "urn:ietf:params:jmap:error:limit", "status": 400,
///   "detail": "request contains 20 method calls; the limit is 16",
///   "limit": "maxCallsInRequest" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct RequestError {
    #[serde(rename = "type")]
    pub kind: RequestErrorKind,

    /// HTTP status; always [`RequestError::STATUS`].
    pub status: u16,

    /// Human-readable explanation.
    pub detail: String,

    /// Name of the violated limit, only for [`RequestErrorKind::Limit`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl RequestError {
    /// Every request-level error is a "400 Bad Request".
    pub const STATUS: u16 = 400;

    fn new(kind: RequestErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            status: Self::STATUS,
            detail: detail.into(),
            limit: None,
        }
    }

    pub fn unknown_capability(urn: &str) -> Self {
        Self::new(
            RequestErrorKind::UnknownCapability,
            format!("the capability {urn:?} is not supported by this server"),
        )
    }

    pub fn not_json(detail: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::NotJson, detail)
    }

    pub fn not_request(detail: impl Into<String>) -> Self {
        Self::new(RequestErrorKind::NotRequest, detail)
    }

    /// A limit violation; `limit` is the limit's wire name (e.g. `"maxCallsInRequest"`).
    pub fn limit(limit: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            limit: Some(limit.into()),
            ..Self::new(RequestErrorKind::Limit, detail)
        }
    }
}

// ---------------------------------------------------------------------------
// Method-level errors
// ---------------------------------------------------------------------------

/// The fixed vocabulary of method-level errors.
///
/// Serialises as a lowerCamelCase string (e.g. `"invalidResultReference"`).
/// The first three are produced by the request processor itself; the rest are
/// available to method handlers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MethodErrorKind {
    /// No handler is registered under the method name.
    UnknownMethod,
    /// The arguments are invalid, e.g. `x` and `#x` in the same call.
    InvalidArguments,
    /// A `#` argument could not be resolved against an earlier response.
    InvalidResultReference,
    /// The server cannot process the call right now; it may be retried.
    ServerUnavailable,
    /// An unexpected error occurred while processing the call.
    ServerFail,
    /// Some, but not all, changes were applied before an unexpected error.
    ServerPartialFail,
    /// The caller is not permitted to perform this call.
    Forbidden,
    /// The referenced account does not exist.
    AccountNotFound,
    /// The account does not support this method.
    AccountNotSupportedByMethod,
    /// The account is read-only.
    AccountReadOnly,
    /// The call would exceed a per-method size limit.
    RequestTooLarge,
    /// The client's state does not match the server's current state.
    StateMismatch,
}

impl std::fmt::Display for MethodErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MethodErrorKind::UnknownMethod => "unknownMethod",
            MethodErrorKind::InvalidArguments => "invalidArguments",
            MethodErrorKind::InvalidResultReference => "invalidResultReference",
            MethodErrorKind::ServerUnavailable => "serverUnavailable",
            MethodErrorKind::ServerFail => "serverFail",
            MethodErrorKind::ServerPartialFail => "serverPartialFail",
            MethodErrorKind::Forbidden => "forbidden",
            MethodErrorKind::AccountNotFound => "accountNotFound",
            MethodErrorKind::AccountNotSupportedByMethod => "accountNotSupportedByMethod",
            MethodErrorKind::AccountReadOnly => "accountReadOnly",
            MethodErrorKind::RequestTooLarge => "requestTooLarge",
            MethodErrorKind::StateMismatch => "stateMismatch",
        };
        f.write_str(s)
    }
}

/// Parses a [`MethodErrorKind`] from its wire-format string.
impl std::str::FromStr for MethodErrorKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_owned()))
            .map_err(|_| format!("unknown method error type {s:?}"))
    }
}

/// A per-call error. Becomes the arguments of an `"error"` invocation:
/// `{"type": "unknownMethod"}`, plus `description` when one is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct MethodError {
    #[serde(rename = "type")]
    pub kind: MethodErrorKind,

    /// Optional human-readable detail for the client's developer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MethodError {
    pub fn new(kind: MethodErrorKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    pub fn with_description(kind: MethodErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: Some(description.into()),
        }
    }

    pub fn unknown_method() -> Self {
        Self::new(MethodErrorKind::UnknownMethod)
    }

    pub fn invalid_arguments() -> Self {
        Self::new(MethodErrorKind::InvalidArguments)
    }

    pub fn invalid_result_reference() -> Self {
        Self::new(MethodErrorKind::InvalidResultReference)
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_error_problem_document() {
        let e = RequestError::limit("maxCallsInRequest", "too many calls");
        assert_eq!(
            serde_json::to_value(&e).unwrap(),
            json!({
                "type": "urn:ietf:params:jmap:error:limit",
                "status": 400,
                "detail": "too many calls",
                "limit": "maxCallsInRequest"
            })
        );
    }

    #[test]
    fn request_error_omits_absent_limit() {
        let value = serde_json::to_value(RequestError::not_json("eof")).unwrap();
        assert_eq!(value["type"], "urn:ietf:params:jmap:error:notJSON");
        assert!(value.get("limit").is_none());
    }

    #[test]
    fn request_error_kind_urn_matches_serde() {
        for kind in [
            RequestErrorKind::UnknownCapability,
            RequestErrorKind::NotJson,
            RequestErrorKind::NotRequest,
            RequestErrorKind::Limit,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.urn()));
        }
    }

    #[test]
    fn request_errors_are_bad_request() {
        assert_eq!(RequestError::unknown_capability("urn:x:y").status, 400);
        assert_eq!(RequestError::not_request("no using").status, 400);
    }

    #[test]
    fn method_error_serialises_type_only() {
        assert_eq!(
            serde_json::to_value(MethodError::invalid_result_reference()).unwrap(),
            json!({"type": "invalidResultReference"})
        );
    }

    #[test]
    fn method_error_with_description() {
        let e = MethodError::with_description(MethodErrorKind::ServerFail, "disk on fire");
        assert_eq!(
            serde_json::to_value(&e).unwrap(),
            json!({"type": "serverFail", "description": "disk on fire"})
        );
    }

    #[test]
    fn method_error_kind_display_matches_serde() {
        for s in ["unknownMethod", "accountNotSupportedByMethod", "stateMismatch"] {
            let kind: MethodErrorKind = s.parse().unwrap();
            assert_eq!(kind.to_string(), s);
        }
        assert!("notAnError".parse::<MethodErrorKind>().is_err());
    }
}
