//! Cell identifiers and lookup by serialized DNA hash.

use serde::{Deserialize, Serialize};

use crate::hash::{AgentPubKey, DnaHash};

/// A running instance of a DNA, identified by (DNA hash, agent key).
///
/// Serializes as a two-element array, the same shape the conductor uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub DnaHash, pub AgentPubKey);

impl CellId {
    pub fn new(dna_hash: DnaHash, agent_pub_key: AgentPubKey) -> Self {
        Self(dna_hash, agent_pub_key)
    }

    pub fn dna_hash(&self) -> &DnaHash {
        &self.0
    }

    pub fn agent_pub_key(&self) -> &AgentPubKey {
        &self.1
    }

    /// Whether the DNA hash serializes to exactly `serialized_dna`.
    pub fn matches_dna(&self, serialized_dna: &str) -> bool {
        self.0.to_string() == serialized_dna
    }
}

/// Find the first cell whose DNA hash serializes to `serialized_dna`.
pub fn find_cell<'a>(cells: &'a [CellId], serialized_dna: &str) -> Option<&'a CellId> {
    cells.iter().find(|cell| cell.matches_dna(serialized_dna))
}
