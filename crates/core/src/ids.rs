//! Gateway-generated request identifiers.
//!
//! The caller's `transactionID` is a correlation string and is not guaranteed to be unique, so
//! every inference request also carries an identifier generated here at construction time.
//!
//! Identifiers use a *canonical* representation: **32 lowercase hexadecimal characters** (no
//! hyphens), the same value as `Uuid::new_v4().simple().to_string()`. Externally supplied
//! identifiers (REST path segments, persisted snapshots) must already be canonical; see
//! [`RequestId::parse`].

use crate::{IgwError, IgwResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Unique identifier of one inference request inside the gateway.
///
/// Once constructed the identifier never changes; [`crate::InferenceRequest`] only exposes it
/// read-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestId {
    /// Generates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised, so that one request
    /// only ever has one textual identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IgwError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> IgwResult<Self> {
        if Self::is_canonical(input) {
            let uuid = Uuid::parse_str(input)
                .map_err(|e| IgwError::InvalidInput(format!("invalid request id: {e}")))?;
            return Ok(Self(uuid));
        }
        Err(IgwError::InvalidInput(format!(
            "request id must be 32 lowercase hex characters without hyphens, got: '{input}'"
        )))
    }

    /// Returns true if `input` is exactly 32 lowercase hex characters.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for RequestId {
    type Err = IgwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestId::parse(s)
    }
}

impl serde::Serialize for RequestId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RequestId::parse(&s).map_err(serde::de::Error::custom)
    }
}
