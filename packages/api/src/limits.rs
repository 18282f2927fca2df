//! Request limits enforced at the boundary.

use serde::{Deserialize, Serialize};

/// The subset of the core capability's limits that apply to the request
/// envelope. Serialises with the wire names (`maxSizeRequest`, …).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    /// Maximum request body size, in octets.
    pub max_size_request: usize,

    /// Maximum number of entries in `methodCalls`.
    pub max_calls_in_request: usize,
}

impl Limits {
    pub const MAX_SIZE_REQUEST: &'static str = "maxSizeRequest";
    pub const MAX_CALLS_IN_REQUEST: &'static str = "maxCallsInRequest";
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_size_request: 10_000_000,
            max_calls_in_request: 16,
        }
    }
}
