//! Boundary layer for the JMAP-style API.
//!
//! This crate stands between a transport and `jmap-core`: it decides whether
//! a raw request body is acceptable at all, and produces the
//! [`jmap_core::RequestError`] problem document when it is not. Only
//! validated [`jmap_core::Request`]s reach the request processor.
//!
//! # Request-level errors
//!
//! | `type` (after `urn:ietf:params:jmap:error:`) | Cause |
//! |------|-------|
//! | `limit` | body larger than `maxSizeRequest`, or more than `maxCallsInRequest` calls |
//! | `notJSON` | body is not JSON |
//! | `notRequest` | body is JSON but not a request |
//! | `unknownCapability` | `using` lists a capability not in the [`CapabilitySet`] |
//!
//! All of them are sent with HTTP status 400.

pub mod capability;
pub mod envelope;
pub mod limits;

pub use capability::{CapabilityError, CapabilitySet, CORE};
pub use envelope::parse_request;
pub use limits::Limits;
