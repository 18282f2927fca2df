//! Public surface for the `jmap-server` crate.
//!
//! Exposes the router builder and config types so that external crates
//! (e.g. the conformance test suite) can spin up an in-process server without
//! spawning a subprocess.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;

pub use config::{ConfigError, ServerConfig};
pub use router::build_router;
