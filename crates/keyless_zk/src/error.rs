//! Error types for commitment and verification operations

use thiserror::Error;

/// Result type for ZK operations
pub type Result<T> = std::result::Result<T, ZkError>;

/// ZK protocol errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZkError {
    /// A basis is empty or holds a point outside the prime-order subgroup
    #[error("Invalid basis: {0}")]
    InvalidBasis(String),

    /// Value vector does not match the basis dimension
    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Parallel input sequences have different lengths
    #[error("Length mismatch: expected {expected} entries, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Nothing to fold or verify
    #[error("Batch is empty")]
    EmptyBatch,

    /// The pairing equation does not hold
    #[error("Invalid proof")]
    InvalidProof,

    /// Verifying keys in a batch do not share the same trapdoor
    #[error("Verifying key {index} does not share the trapdoor of verifying key 0")]
    IncompatibleVerifyingKeys { index: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ZkError {
    /// True for the expected "proof rejected" outcome, false for caller errors.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, ZkError::InvalidProof)
    }
}

impl From<ark_serialize::SerializationError> for ZkError {
    fn from(err: ark_serialize::SerializationError) -> Self {
        ZkError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for ZkError {
    fn from(err: serde_json::Error) -> Self {
        ZkError::SerializationError(err.to_string())
    }
}
