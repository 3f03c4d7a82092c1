//! Configuration for batch operations and Fiat-Shamir transcripts.

use serde::{Deserialize, Serialize};

/// Default domain separator for transcripts built from a config.
pub const DEFAULT_TRANSCRIPT_DOMAIN: &str = "keyless_zk/pedersen/v1";

/// Tuning knobs shared by the batch helpers.
///
/// None of these affect the result of an operation, only how it is computed.
/// Two parties deriving a Fiat-Shamir coefficient must agree on
/// `transcript_domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Minimum number of independent items before work is spread over rayon.
    pub parallel_threshold: usize,
    /// Domain separator absorbed first by [`crate::Transcript::from_config`].
    pub transcript_domain: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 8,
            transcript_domain: DEFAULT_TRANSCRIPT_DOMAIN.to_string(),
        }
    }
}

impl ProtocolConfig {
    /// Never parallelize. Useful when the caller already runs on a pool.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Parallelize as soon as there is more than one item.
    pub fn server_mode() -> Self {
        Self {
            parallel_threshold: 2,
            ..Self::default()
        }
    }

    /// Set the transcript domain separator.
    pub fn with_transcript_domain(mut self, domain: impl Into<String>) -> Self {
        self.transcript_domain = domain.into();
        self
    }

    pub(crate) fn should_parallelize(&self, items: usize) -> bool {
        items >= self.parallel_threshold
    }
}
