//! Identifiers: random and content-derived.
//!
//! An [`Id`] is an opaque string of 1–255 octets drawn from the URL-safe
//! alphabet `[A-Za-z0-9_-]`. Two kinds are issued:
//!
//! | Constructor | Form | Example |
//! |-------------|------|---------|
//! | [`Id::random`] | base58 of 128 random bits | `Vh6W3xR2LtQ9aKm7bZpNcF` |
//! | [`Id::for_content`] | `sha256-` + hex digest | `sha256-2cf24dba5fb0a30e…` |
//!
//! The base58 alphabet never contains `-`, so a random identifier can never
//! be mistaken for a content identifier.

use std::sync::LazyLock;

use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Namespace tag prefixed to every content identifier.
pub const CONTENT_ID_PREFIX: &str = "sha256-";

/// Maximum length of an identifier, in octets.
pub const MAX_ID_LEN: usize = 255;

/// Errors returned by [`Id::parse`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,

    #[error("id must be at most {max} octets, got {0}", max = MAX_ID_LEN)]
    TooLong(usize),

    #[error("id may only contain A-Z, a-z, 0-9, '-' and '_', got: {0:?}")]
    InvalidCharacter(String),
}

/// An opaque, URL-safe identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Id(String);

impl Id {
    /// Validate `s` against the identifier syntax.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdError> {
        let s = s.into();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.len() > MAX_ID_LEN {
            return Err(IdError::TooLong(s.len()));
        }
        if !ID_RE.is_match(&s) {
            return Err(IdError::InvalidCharacter(s));
        }
        Ok(Self(s))
    }

    /// A fresh identifier from OS randomness. No collision check is made; the
    /// 128 bits of entropy are the uniqueness guarantee.
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Self(bs58::encode(bytes).into_string())
    }

    /// The identifier of `bytes`. Equal inputs always give equal identifiers.
    pub fn for_content(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(format!("{CONTENT_ID_PREFIX}{}", hex::encode(digest)))
    }

    /// Whether this identifier was derived from content.
    pub fn is_content_id(&self) -> bool {
        self.0.starts_with(CONTENT_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Id {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Id {
    type Error = IdError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Id> for String {
    fn from(id: Id) -> Self {
        id.0
    }
}

/// `^[A-Za-z0-9_-]+$`
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("invalid id regex"));

// --- tests -------------------------------------------------------------------
