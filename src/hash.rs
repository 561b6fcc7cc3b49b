//! Holochain hashes and their canonical string form.
//!
//! A hash is serialized as the letter `u` followed by the unpadded
//! URL-safe base64 encoding of its bytes. URLs, configuration and cell
//! lookups all compare hashes in this form.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::error::HashError;

const PREFIX: char = 'u';

/// Raw hash bytes (DNA hash, agent key, ...).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HoloHash(Vec<u8>);

pub type DnaHash = HoloHash;
pub type AgentPubKey = HoloHash;

impl HoloHash {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HoloHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, URL_SAFE_NO_PAD.encode(&self.0))
    }
}

impl fmt::Debug for HoloHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HoloHash({self})")
    }
}

impl FromStr for HoloHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| HashError::MissingPrefix(s.to_string()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| HashError::InvalidBase64 {
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for HoloHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HoloHash> for String {
    fn from(hash: HoloHash) -> Self {
        hash.to_string()
    }
}
