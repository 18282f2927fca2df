//! Turning a raw request body into a validated [`Request`].
//!
//! Every rejection here is a [`RequestError`]: the whole request fails and no
//! method call runs.

use jmap_core::{Id, Request, RequestError};
use serde_json::Value;

use crate::capability::CapabilitySet;
use crate::limits::Limits;

/// Parse and validate a request body.
///
/// Checks run in this order, and the first failure is returned:
///
/// 1. body size against `maxSizeRequest` → `limit`
/// 2. JSON syntax → `notJSON`
/// 3. request shape, including `createdIds` entries being valid ids → `notRequest`
/// 4. every `using` entry is a registered capability → `unknownCapability`
/// 5. call count against `maxCallsInRequest` → `limit`
pub fn parse_request(
    body: &[u8],
    capabilities: &CapabilitySet,
    limits: &Limits,
) -> Result<Request, RequestError> {
    if body.len() > limits.max_size_request {
        return Err(RequestError::limit(
            Limits::MAX_SIZE_REQUEST,
            format!(
                "request is {} octets; the limit is {}",
                body.len(),
                limits.max_size_request
            ),
        ));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RequestError::not_json(format!("request body is not valid JSON: {e}")))?;

    let request: Request = serde_json::from_value(value)
        .map_err(|e| RequestError::not_request(format!("request body is not a request: {e}")))?;

    validate_created_ids(&request)?;

    if let Some(urn) = request.using.iter().find(|urn| !capabilities.contains(urn.as_str())) {
        return Err(RequestError::unknown_capability(urn));
    }

    if request.method_calls.len() > limits.max_calls_in_request {
        return Err(RequestError::limit(
            Limits::MAX_CALLS_IN_REQUEST,
            format!(
                "request contains {} method calls; the limit is {}",
                request.method_calls.len(),
                limits.max_calls_in_request
            ),
        ));
    }

    Ok(request)
}

fn validate_created_ids(request: &Request) -> Result<(), RequestError> {
    let Some(created_ids) = &request.created_ids else {
        return Ok(());
    };
    for (creation_id, id) in created_ids {
        Id::parse(creation_id.as_str()).map_err(|e| {
            RequestError::not_request(format!("createdIds key {creation_id:?}: {e}"))
        })?;
        Id::parse(id.as_str())
            .map_err(|e| RequestError::not_request(format!("createdIds[{creation_id:?}]: {e}")))?;
    }
    Ok(())
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use jmap_core::RequestErrorKind;
    use serde_json::json;

    fn parse(body: &str) -> Result<Request, RequestError> {
        parse_request(body.as_bytes(), &CapabilitySet::core(), &Limits::default())
    }

    #[test]
    fn valid_request() {
        let req = parse(
            r#"{"using":["urn:ietf:params:jmap:core"],"methodCalls":[["Core/echo",{"a":1},"c1"]]}"#,
        )
        .unwrap();
        assert_eq!(req.method_calls.len(), 1);
        assert_eq!(req.method_calls[0].call_id, "c1");
    }

    #[test]
    fn empty_using_and_calls_are_fine() {
        let req = parse(r#"{"using":[],"methodCalls":[]}"#).unwrap();
        assert!(req.method_calls.is_empty());
    }

    #[test]
    fn not_json() {
        let err = parse("{not json").unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::NotJson);
        assert_eq!(err.status, 400);
        let err = parse("").unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::NotJson);
    }

    #[test]
    fn not_request_shapes() {
        for body in [
            r#"[]"#,
            r#""text""#,
            r#"{}"#,
            r#"{"using":["urn:ietf:params:jmap:core"]}"#,
            r#"{"methodCalls":[]}"#,
            r#"{"using":"urn:ietf:params:jmap:core","methodCalls":[]}"#,
            r#"{"using":[1],"methodCalls":[]}"#,
            r#"{"using":[],"methodCalls":[["Core/echo",{}]]}"#,
            r#"{"using":[],"methodCalls":[["Core/echo",{},"c1",4]]}"#,
            r#"{"using":[],"methodCalls":[["Core/echo",null,"c1"]]}"#,
            r#"{"using":[],"methodCalls":[],"createdIds":{"k":1}}"#,
        ] {
            let err = parse(body).unwrap_err();
            assert_eq!(err.kind, RequestErrorKind::NotRequest, "body: {body}");
        }
    }

    #[test]
    fn created_ids_must_be_ids() {
        let err = parse(r#"{"using":[],"methodCalls":[],"createdIds":{"k1":"has space"}}"#)
            .unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::NotRequest);
        let err = parse(r#"{"using":[],"methodCalls":[],"createdIds":{"":"abc"}}"#).unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::NotRequest);

        let req = parse(r#"{"using":[],"methodCalls":[],"createdIds":{"k1":"abc"}}"#).unwrap();
        assert_eq!(req.created_ids.unwrap()["k1"], "abc");
    }

    #[test]
    fn unknown_capability() {
        let err = parse(
            r#"{"using":["urn:ietf:params:jmap:core","urn:ietf:params:jmap:mail"],"methodCalls":[]}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::UnknownCapability);
        assert!(err.detail.contains("urn:ietf:params:jmap:mail"));
    }

    #[test]
    fn registered_capability_accepted() {
        let mut caps = CapabilitySet::core();
        caps.register("urn:ietf:params:jmap:mail").unwrap();
        let body = r#"{"using":["urn:ietf:params:jmap:mail"],"methodCalls":[]}"#;
        assert!(parse_request(body.as_bytes(), &caps, &Limits::default()).is_ok());
    }

    #[test]
    fn too_many_calls() {
        let limits = Limits {
            max_calls_in_request: 2,
            ..Limits::default()
        };
        let body = json!({
            "using": [],
            "methodCalls": [["Core/echo", {}, "c1"], ["Core/echo", {}, "c2"], ["Core/echo", {}, "c3"]]
        })
        .to_string();
        let err = parse_request(body.as_bytes(), &CapabilitySet::core(), &limits).unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::Limit);
        assert_eq!(err.limit.as_deref(), Some("maxCallsInRequest"));
    }

    #[test]
    fn request_too_large_checked_before_parsing() {
        let limits = Limits {
            max_size_request: 8,
            ..Limits::default()
        };
        // Not even JSON; the size check still wins.
        let err = parse_request(b"0123456789", &CapabilitySet::core(), &limits).unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::Limit);
        assert_eq!(err.limit.as_deref(), Some("maxSizeRequest"));
    }
}
