//! Single-proof verification
//!
//! A proof `π` for commitment `C` is accepted by a verifying key with
//! trapdoor `g` iff
//!
//! `e(C, −σ·g) · e(π, g) == 1`
//!
//! which holds exactly when `π = σ·C`.

use rayon::prelude::*;

use crate::commitment::{Commitment, Proof};
use crate::config::ProtocolConfig;
use crate::error::{Result, ZkError};
use crate::group::pairing_product_is_one;
use crate::setup::VerifyingKey;

impl VerifyingKey {
    /// Verify a knowledge proof against a commitment.
    ///
    /// Returns `InvalidProof` when the pairing equation fails or either point
    /// is malformed. Safe to call concurrently.
    pub fn verify(&self, commitment: &Commitment, proof: &Proof) -> Result<()> {
        if !commitment.is_valid() || !proof.is_valid() {
            return Err(ZkError::InvalidProof);
        }

        if pairing_product_is_one(
            &[commitment.0, proof.0],
            &[self.g_sigma_neg, self.trapdoor.0],
        ) {
            Ok(())
        } else {
            Err(ZkError::InvalidProof)
        }
    }
}

/// Verify independent `(commitment, proof)` pairs against one key
///
/// Each pair gets its own pairing check; see [`crate::batch_verify_multi_vk`]
/// for the folded single check. Pairs are verified on rayon once there are
/// at least `config.parallel_threshold` of them.
pub fn verify_all(
    vk: &VerifyingKey,
    pairs: &[(Commitment, Proof)],
    config: &ProtocolConfig,
) -> Vec<bool> {
    if config.should_parallelize(pairs.len()) {
        pairs
            .par_iter()
            .map(|(c, p)| vk.verify(c, p).is_ok())
            .collect()
    } else {
        pairs.iter().map(|(c, p)| vk.verify(c, p).is_ok()).collect()
    }
}
