//! Capability identifiers a request may list in `using`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// The capability every server supports.
pub const CORE: &str = "urn:ietf:params:jmap:core";

/// Errors returned by [`CapabilitySet::register`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("capability must have the form urn:<namespace>:<capability>, got: {0:?}")]
    InvalidUrn(String),
}

/// The capabilities this server accepts in a request's `using` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    urns: BTreeSet<String>,
}

impl CapabilitySet {
    /// A set holding only [`CORE`].
    pub fn core() -> Self {
        Self {
            urns: BTreeSet::from([CORE.to_owned()]),
        }
    }

    /// Add a capability. Registering a URN twice is a no-op.
    pub fn register(&mut self, urn: impl Into<String>) -> Result<(), CapabilityError> {
        let urn = urn.into();
        if !URN_RE.is_match(&urn) {
            return Err(CapabilityError::InvalidUrn(urn));
        }
        self.urns.insert(urn);
        Ok(())
    }

    pub fn contains(&self, urn: &str) -> bool {
        self.urns.contains(urn)
    }

    /// Registered URNs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urns.iter().map(String::as_str)
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::core()
    }
}

/// `^urn:<namespace>:<capability>$`, where the namespace may itself contain colons.
static URN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^urn:[A-Za-z0-9][A-Za-z0-9-]*(:[A-Za-z0-9._~%!$&'()*+,;=@/-]+)+$")
        .expect("invalid capability regex")
});
