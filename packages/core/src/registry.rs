//! Method dispatch table.
//!
//! A [`MethodRegistry`] maps [`MethodName`]s to [`MethodHandler`]s. The
//! request processor looks every call up here; names with no entry produce
//! `unknownMethod`. Domain methods (mail, contacts, …) are registered by the
//! embedding application at this same point.
//!
//! The only handler shipped with the core is [`Echo`] (`Core/echo`), which
//! returns its invocation unchanged and is used for conformance testing.

use std::borrow::Borrow;
use std::collections::HashMap;

use thiserror::Error;

use crate::error::MethodError;
use crate::types::{Invocation, ERROR_METHOD};

/// Method name of the reference echo handler.
pub const ECHO: &str = "Core/echo";

/// A handler for one method.
///
/// Receives the invocation with every result reference already resolved and
/// returns the response for the same call. Returning `Err` produces an
/// `"error"` response for this call only; a handler may also return an
/// `"error"` invocation itself, which is passed through unchanged.
pub trait MethodHandler: Send + Sync {
    fn call(&self, invocation: Invocation) -> Result<Invocation, MethodError>;
}

impl<F> MethodHandler for F
where
    F: Fn(Invocation) -> Result<Invocation, MethodError> + Send + Sync,
{
    fn call(&self, invocation: Invocation) -> Result<Invocation, MethodError> {
        self(invocation)
    }
}

/// The `Core/echo` method: responds with exactly the invocation it was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl MethodHandler for Echo {
    fn call(&self, invocation: Invocation) -> Result<Invocation, MethodError> {
        Ok(invocation)
    }
}

/// The name a handler is registered under, e.g. `Core/echo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodName(String);

impl MethodName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MethodName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MethodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned by [`MethodRegistry::register`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("method name must not be empty")]
    EmptyName,

    #[error("{:?} is reserved for error responses", ERROR_METHOD)]
    ReservedName,

    #[error("a handler for {0} is already registered")]
    Duplicate(MethodName),
}

/// Maps method names to handlers.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<MethodName, Box<dyn MethodHandler>>,
}

impl MethodRegistry {
    /// An empty registry; every method is unknown.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the reference methods (`Core/echo`).
    pub fn with_reference_methods() -> Self {
        let mut registry = Self::new();
        registry.handlers.insert(MethodName(ECHO.to_owned()), Box::new(Echo));
        registry
    }

    /// Register `handler` under `name`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is empty, is the reserved `"error"`, or already has a
    /// handler. Registrations are never silently replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl MethodHandler + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name == ERROR_METHOD {
            return Err(RegistryError::ReservedName);
        }
        let name = MethodName(name);
        if self.handlers.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.handlers.insert(name, Box::new(handler));
        Ok(())
    }

    /// The handler registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&dyn MethodHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&MethodName> {
        let mut names: Vec<&MethodName> = self.handlers.keys().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.names())
            .finish()
    }
}

// --- tests -------------------------------------------------------------------
