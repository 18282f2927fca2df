//! Core of a JMAP-style (RFC 8620) batched method-call protocol.
//!
//! A client sends one [`Request`] holding an ordered list of method calls.
//! Later calls may consume parts of earlier calls' results through
//! `#`-prefixed arguments ([`ResultReference`]s), so a whole dependent
//! workflow costs a single round trip. This crate executes such batches. It
//! performs no I/O and keeps no state between requests.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Wire types: [`Invocation`], [`ResultReference`], [`Request`], [`Response`] |
//! | [`pointer`] | JSON Pointer evaluation with the `*` wildcard: [`evaluate`] |
//! | [`error`] | Request-level [`RequestError`] and per-call [`MethodError`] |
//! | [`id`] | Random and content-derived identifiers: [`Id`] |
//! | [`registry`] | Method dispatch: [`MethodRegistry`], [`MethodHandler`], [`Echo`] |
//! | [`processor`] | Batch execution: [`RequestProcessor`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use jmap_core::{MethodRegistry, Request, RequestProcessor};
//!
//! let request: Request = serde_json::from_str(r#"{
//!     "using": ["urn:ietf:params:jmap:core"],
//!     "methodCalls": [
//!         ["Core/echo", {"list": [{"id": "a"}, {"id": "b"}]}, "c1"],
//!         ["Core/echo", {"#ids": {"resultOf": "c1", "name": "Core/echo", "path": "/list/*/id"}}, "c2"]
//!     ]
//! }"#)?;
//!
//! let processor = RequestProcessor::new(MethodRegistry::with_reference_methods());
//! let response = processor.process(&request, "state-1");
//! // response.method_responses[1] == ["Core/echo", {"#ids": ["a", "b"]}, "c2"]
//! ```
//!
//! Validating the envelope (capabilities, limits, shape) is the job of the
//! boundary; see the `jmap-api` crate.

pub mod error;
pub mod id;
pub mod pointer;
pub mod processor;
pub mod registry;
pub mod types;

pub use error::{MethodError, MethodErrorKind, RequestError, RequestErrorKind};
pub use id::{Id, IdError};
pub use pointer::{evaluate, evaluate_in, PointerError};
pub use processor::RequestProcessor;
pub use registry::{Echo, MethodHandler, MethodName, MethodRegistry, RegistryError, ECHO};
pub use types::{Arguments, Invocation, Request, Response, ResultReference};
