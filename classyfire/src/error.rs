//! Error types for the ClassyFire client

use thiserror::Error;

/// Result type for classification operations
pub type Result<T> = std::result::Result<T, ClassyFireError>;

/// Classification error
///
/// Cloneable so a failed slot can be reported once per occurrence when the
/// same identifier appears several times in a batch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassyFireError {
    /// Input did not look like an InChIKey; never reaches the network
    #[error("Invalid InChIKey: {0}")]
    InvalidInchiKey(String),

    /// Input was not a usable SMILES string; never reaches the network
    #[error("Invalid SMILES: {0}")]
    InvalidSmiles(String),

    /// Transport failure, timeout or HTTP error status
    #[error("Classification request for '{identifier}' failed: {message}")]
    RemoteService {
        identifier: String,
        status: Option<u16>,
        message: String,
    },

    /// Response matched neither a classification nor the empty shape
    #[error("Malformed response for '{identifier}': {message}")]
    MalformedResponse { identifier: String, message: String },

    /// Empty classification under the `raise` policy
    #[error("Empty classification for InChIKey: {0}")]
    EmptyInchikeyClassification(String),

    /// Empty classification under the `raise` policy
    #[error("Empty classification for SMILES: {0}")]
    EmptySmilesClassification(String),

    /// Cache write failed; the value stays cached in memory
    #[error("Cache persistence failed for '{identifier}': {message}")]
    CachePersistence { identifier: String, message: String },

    /// Tabular input could not be read
    #[error("Tabular input error: {0}")]
    Tabular(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer error outside of cache writes
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClassyFireError {
    /// Whether the error concerns a single identifier's request
    ///
    /// These are the failures the `skip` policy replaces with a placeholder.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            ClassyFireError::RemoteService { .. } | ClassyFireError::MalformedResponse { .. }
        )
    }

    /// Whether the error is one of the kind-specific empty classification errors
    pub fn is_empty_classification(&self) -> bool {
        matches!(
            self,
            ClassyFireError::EmptyInchikeyClassification(_)
                | ClassyFireError::EmptySmilesClassification(_)
        )
    }
}

impl From<classyfire_common::Error> for ClassyFireError {
    fn from(err: classyfire_common::Error) -> Self {
        match err {
            classyfire_common::Error::Config(msg) => ClassyFireError::Config(msg),
            other => ClassyFireError::Storage(other.to_string()),
        }
    }
}
