//! Error types for hashes, configuration, conductor calls and bootstrap.

use std::time::Duration;

use crate::view::UnavailableReason;

/// A hash string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("hash {0:?} is missing the 'u' prefix")]
    MissingPrefix(String),

    #[error("hash {value:?} is not valid base64: {reason}")]
    InvalidBase64 { value: String, reason: String },
}

/// Invalid or incomplete UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has invalid flag value {value:?} (expected true/false)")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{name} is not a number: {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("COMPOSITORY_DNA_HASH is invalid: {0}")]
    InvalidDnaHash(#[from] HashError),
}

/// Failure reported by a conductor connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConductorError {
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("conductor request failed: {0}")]
    Request(String),
}

/// Fatal failure while connecting the UI to Holochain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("admin interface at {url} is unreachable: {source}")]
    AdminUnreachable {
        url: String,
        #[source]
        source: ConductorError,
    },

    #[error("app interface at {url} is unreachable: {source}")]
    AppUnreachable {
        url: String,
        #[source]
        source: ConductorError,
    },

    #[error("could not list installed cells: {0}")]
    ListCells(#[source] ConductorError),

    #[error("compository DNA {dna_hash} is not installed")]
    CompositoryDnaMissing { dna_hash: String },
}

impl BootstrapError {
    /// Classify the failure for the "Holochain not present" screen.
    pub fn unavailable_reason(&self) -> UnavailableReason {
        match self {
            Self::Config(_) => UnavailableReason::Misconfigured(self.to_string()),
            Self::AdminUnreachable { .. } | Self::AppUnreachable { .. } | Self::ListCells(_) => {
                UnavailableReason::RuntimeUnreachable(self.to_string())
            }
            Self::CompositoryDnaMissing { dna_hash } => {
                UnavailableReason::CompositoryMissing(dna_hash.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_and_missing_are_distinct() {
        let unreachable = BootstrapError::AdminUnreachable {
            url: "ws://localhost:22222".to_string(),
            source: ConductorError::Connect {
                url: "ws://localhost:22222".to_string(),
                reason: "refused".to_string(),
            },
        };
        let missing = BootstrapError::CompositoryDnaMissing {
            dna_hash: "uhC0kabc".to_string(),
        };

        assert!(matches!(
            unreachable.unavailable_reason(),
            UnavailableReason::RuntimeUnreachable(_)
        ));
        assert_eq!(
            missing.unavailable_reason(),
            UnavailableReason::CompositoryMissing("uhC0kabc".to_string())
        );
    }

    #[test]
    fn test_list_cells_counts_as_unreachable() {
        let err = BootstrapError::ListCells(ConductorError::Request("closed".to_string()));
        assert!(matches!(
            err.unavailable_reason(),
            UnavailableReason::RuntimeUnreachable(msg) if msg.contains("closed")
        ));
    }

    #[test]
    fn test_config_error_message() {
        let err = BootstrapError::from(ConfigError::Missing("COMPOSITORY_DNA_HASH"));
        assert_eq!(
            err.to_string(),
            "invalid configuration: COMPOSITORY_DNA_HASH is not set"
        );
        assert!(matches!(
            err.unavailable_reason(),
            UnavailableReason::Misconfigured(_)
        ));
    }
}
