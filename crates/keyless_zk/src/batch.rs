//! Batch verification across one or more verifying keys
//!
//! Verifying `n` triples `(vkᵢ, Cᵢ, πᵢ)` one by one costs `2n` pairings.
//! When every key shares the same trapdoor `g`, a random linear combination
//! of the `n` equations collapses them into a single multi-pairing of
//! `n + 1` terms:
//!
//! ```text
//! Π e(rⁱ·Cᵢ, −σᵢ·g) · e(Σ rⁱ·πᵢ, g) == 1
//! ```
//!
//! Each key keeps its own secret `σᵢ`; only `g` has to match. A forged
//! proof for any single triple survives the combined check with probability
//! about `1/|Fr|` over the choice of `r`, provided `r` is unknown to the
//! prover when the proofs are built.
//!
//! ## Example
//!
//! ```rust
//! use keyless_zk::{scalars_from_u64, setup, Basis, BatchVerifier, Trapdoor};
//! use rand::rngs::OsRng;
//!
//! let trapdoor = Trapdoor::random(&mut OsRng);
//! let mut verifier = BatchVerifier::new();
//!
//! for i in 0..4u64 {
//!     let basis = Basis::random(2, &mut OsRng).unwrap();
//!     let (pks, vk) = setup(&[basis], Some(&trapdoor)).unwrap();
//!     let (commitment, proof) = pks[0].commit_and_prove(&scalars_from_u64(&[i, i + 1])).unwrap();
//!     verifier.add(vk, commitment, proof);
//! }
//!
//! let result = verifier.verify_all_fiat_shamir().unwrap();
//! assert!(result.all_valid);
//! ```

use ark_ec::{AffineRepr, CurveGroup};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::aggregation::{fold_proofs, CombinationCoefficient};
use crate::commitment::{Commitment, Proof};
use crate::config::ProtocolConfig;
use crate::error::{Result, ZkError};
use crate::group::{pairing_product_is_one, G1Projective, G2Affine};
use crate::setup::VerifyingKey;
use crate::transcript::Transcript;

/// Verify `n` triples with a single combined pairing check.
///
/// Fails with `LengthMismatch` unless the three slices have the same length,
/// `EmptyBatch` when they are empty, `IncompatibleVerifyingKeys` when a key
/// does not share the trapdoor of `vks[0]`, `InvalidInput` for a zero
/// coefficient, and `InvalidProof` when the combined equation does not hold.
pub fn batch_verify_multi_vk(
    vks: &[VerifyingKey],
    commitments: &[Commitment],
    proofs: &[Proof],
    coeff: &CombinationCoefficient,
) -> Result<()> {
    if commitments.len() != vks.len() {
        return Err(ZkError::LengthMismatch {
            expected: vks.len(),
            actual: commitments.len(),
        });
    }
    if proofs.len() != vks.len() {
        return Err(ZkError::LengthMismatch {
            expected: vks.len(),
            actual: proofs.len(),
        });
    }
    let first = vks.first().ok_or(ZkError::EmptyBatch)?;
    if let Some(index) = vks.iter().position(|vk| !vk.is_compatible_with(first)) {
        return Err(ZkError::IncompatibleVerifyingKeys { index });
    }
    coeff.ensure_nonzero()?;
    if !commitments.iter().all(Commitment::is_valid) || !proofs.iter().all(Proof::is_valid) {
        return Err(ZkError::InvalidProof);
    }

    let n = vks.len();
    let mut g1: Vec<G1Projective> = commitments
        .iter()
        .zip(coeff.powers(n))
        .map(|(c, weight)| *c.point() * weight)
        .collect();
    g1.push(fold_proofs(proofs, coeff)?.point().into_group());
    let g1 = G1Projective::normalize_batch(&g1);

    let mut g2: Vec<G2Affine> = vks.iter().map(|vk| vk.g_sigma_neg).collect();
    g2.push(first.trapdoor.0);

    if pairing_product_is_one(&g1, &g2) {
        Ok(())
    } else {
        Err(ZkError::InvalidProof)
    }
}

/// One verification equation: a key, a commitment and its proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTriple {
    pub vk: VerifyingKey,
    pub commitment: Commitment,
    pub proof: Proof,
}

impl VerificationTriple {
    /// Create a new triple
    pub fn new(vk: VerifyingKey, commitment: Commitment, proof: Proof) -> Self {
        Self {
            vk,
            commitment,
            proof,
        }
    }

    /// Verify this triple on its own
    pub fn verify(&self) -> Result<()> {
        self.vk.verify(&self.commitment, &self.proof)
    }
}

/// Batch verifier for Pedersen knowledge proofs
///
/// Collects triples, checks them with one combined pairing, and on failure
/// re-checks each triple to report which ones are invalid.
#[derive(Default)]
pub struct BatchVerifier {
    triples: Vec<VerificationTriple>,
    config: ProtocolConfig,
}

impl BatchVerifier {
    /// Create a new batch verifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch verifier with a specific configuration
    pub fn with_config(config: ProtocolConfig) -> Self {
        Self {
            triples: Vec::new(),
            config,
        }
    }

    /// Add a proof to the batch
    ///
    /// # Arguments
    /// * `vk` - Verifying key of the setup the proof was produced under
    /// * `commitment` - The commitment
    /// * `proof` - Knowledge proof for the commitment
    pub fn add(&mut self, vk: VerifyingKey, commitment: Commitment, proof: Proof) {
        self.triples
            .push(VerificationTriple::new(vk, commitment, proof));
    }

    /// Add a prepared triple to the batch
    pub fn add_triple(&mut self, triple: VerificationTriple) {
        self.triples.push(triple);
    }

    /// Get the number of triples in the batch
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// The collected triples, in insertion order
    pub fn triples(&self) -> &[VerificationTriple] {
        &self.triples
    }

    /// Clear all triples from the batch
    pub fn clear(&mut self) {
        self.triples.clear();
    }

    /// Derive the combination coefficient from every key, commitment and
    /// proof in the batch.
    pub fn fiat_shamir_coefficient(&self) -> Result<CombinationCoefficient> {
        let mut transcript = Transcript::from_config(&self.config);
        transcript.append_message(b"batch_len", &(self.triples.len() as u64).to_le_bytes());
        for triple in &self.triples {
            transcript.append_verifying_key(&triple.vk)?;
            transcript.append_commitment(&triple.commitment)?;
            transcript.append_proof(&triple.proof)?;
        }
        Ok(transcript.challenge_coefficient())
    }

    /// Verify all triples with a Fiat-Shamir derived coefficient
    pub fn verify_all_fiat_shamir(&self) -> Result<BatchResult> {
        let coeff = self.fiat_shamir_coefficient()?;
        self.verify_all(&coeff)
    }

    /// Verify all triples with the given coefficient.
    ///
    /// Incompatible keys and an empty batch are errors. A rejected combined
    /// check is reported in the result, with per-triple outcomes.
    pub fn verify_all(&self, coeff: &CombinationCoefficient) -> Result<BatchResult> {
        let start = Instant::now();

        let (vks, (commitments, proofs)): (Vec<_>, (Vec<_>, Vec<_>)) = self
            .triples
            .iter()
            .map(|t| (t.vk, (t.commitment, t.proof)))
            .unzip();

        let results = match batch_verify_multi_vk(&vks, &commitments, &proofs, coeff) {
            Ok(()) => vec![true; self.triples.len()],
            Err(ZkError::InvalidProof) => {
                log::debug!(
                    "combined check rejected {} triples, verifying individually",
                    self.triples.len()
                );
                self.verify_individually()
            }
            Err(err) => return Err(err),
        };

        let all_valid = results.iter().all(|&v| v);
        let verification_time_ms = start.elapsed().as_millis() as u64;

        Ok(BatchResult {
            all_valid,
            results,
            verification_time_ms,
        })
    }

    fn verify_individually(&self) -> Vec<bool> {
        if self.config.should_parallelize(self.triples.len()) {
            self.triples
                .par_iter()
                .map(|t| t.verify().is_ok())
                .collect()
        } else {
            self.triples.iter().map(|t| t.verify().is_ok()).collect()
        }
    }
}

/// Result of batch verification
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// True if all triples are valid
    pub all_valid: bool,
    /// Per-triple validity, in insertion order
    pub results: Vec<bool>,
    /// Time taken to verify all triples (in milliseconds)
    pub verification_time_ms: u64,
}

impl BatchResult {
    /// Get the total number of triples verified
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get the number of valid triples
    pub fn valid_count(&self) -> usize {
        self.results.iter().filter(|&&v| v).count()
    }

    /// Get the number of invalid triples
    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    /// Check if a specific triple is valid
    pub fn is_valid(&self, index: usize) -> Option<bool> {
        self.results.get(index).copied()
    }

    /// Indices of the invalid triples
    pub fn invalid_indices(&self) -> Vec<usize> {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, &v)| !v)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::scalars_from_u64;
    use crate::group::Fr;
    use crate::setup::{setup_with_rng, Basis, ProvingKey, Trapdoor};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn shared_setups(
        n: usize,
        dimension: usize,
        rng: &mut StdRng,
    ) -> Vec<(ProvingKey, VerifyingKey)> {
        let trapdoor = Trapdoor::random(rng);
        (0..n)
            .map(|_| {
                let basis = Basis::random(dimension, rng).unwrap();
                let (mut pks, vk) = setup_with_rng(&[basis], Some(&trapdoor), rng).unwrap();
                (pks.remove(0), vk)
            })
            .collect()
    }

    fn triples(setups: &[(ProvingKey, VerifyingKey)]) -> Vec<VerificationTriple> {
        setups
            .iter()
            .enumerate()
            .map(|(i, (pk, vk))| {
                let i = i as u64;
                let (c, p) = pk
                    .commit_and_prove(&scalars_from_u64(&[i + 1, 2 * i + 3]))
                    .unwrap();
                VerificationTriple::new(*vk, c, p)
            })
            .collect()
    }

    fn split(
        triples: &[VerificationTriple],
    ) -> (Vec<VerifyingKey>, Vec<Commitment>, Vec<Proof>) {
        (
            triples.iter().map(|t| t.vk).collect(),
            triples.iter().map(|t| t.commitment).collect(),
            triples.iter().map(|t| t.proof).collect(),
        )
    }

    #[test]
    fn test_multi_vk_scenario() {
        let mut rng = StdRng::seed_from_u64(7);
        let trapdoor = Trapdoor::random(&mut rng);
        let basis1 = Basis::random(2, &mut rng).unwrap();
        let basis2 = Basis::random(2, &mut rng).unwrap();

        let (pk1, vk1) = setup_with_rng(&[basis1], Some(&trapdoor), &mut rng).unwrap();
        let (pk2, vk2) = setup_with_rng(&[basis2], Some(&trapdoor), &mut rng).unwrap();

        let (c1, p1) = pk1[0].commit_and_prove(&scalars_from_u64(&[11, 22])).unwrap();
        let (c2, p2) = pk2[0].commit_and_prove(&scalars_from_u64(&[33, 44])).unwrap();
        let coeff = CombinationCoefficient::from_u64(7).unwrap();

        assert!(batch_verify_multi_vk(&[vk1, vk2], &[c1, c2], &[p1, p2], &coeff).is_ok());

        let bad_p2 = p2.scale(&Fr::from(9999u64));
        assert_eq!(
            batch_verify_multi_vk(&[vk1, vk2], &[c1, c2], &[p1, bad_p2], &coeff),
            Err(ZkError::InvalidProof)
        );
    }

    #[test]
    fn test_zero_coefficient_refused() {
        let mut rng = StdRng::seed_from_u64(10);
        let setups = shared_setups(2, 2, &mut rng);
        let (c1, p1) = setups[0]
            .0
            .commit_and_prove(&scalars_from_u64(&[11, 22]))
            .unwrap();
        let vks = [setups[0].1, setups[1].1];

        // Second triple is garbage; only a zero weight would hide it
        let forged_c = c1.scale(&Fr::from(3u64));
        let forged_p = p1.scale(&Fr::from(12345u64));
        let zero = CombinationCoefficient(Fr::from(0u64));

        assert!(matches!(
            batch_verify_multi_vk(&vks, &[c1, forged_c], &[p1, forged_p], &zero),
            Err(ZkError::InvalidInput(_))
        ));

        let zero_json = format!("\"{}\"", "0".repeat(64));
        assert!(serde_json::from_str::<CombinationCoefficient>(&zero_json).is_err());
    }

    #[test]
    fn test_single_triple_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        let t = triples(&shared_setups(1, 3, &mut rng));
        let (vks, cs, ps) = split(&t);
        let coeff = CombinationCoefficient::from_u64(5).unwrap();

        assert!(batch_verify_multi_vk(&vks, &cs, &ps, &coeff).is_ok());
    }

    #[test]
    fn test_divergent_trapdoors_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let basis = Basis::random(2, &mut rng).unwrap();
        let (pk1, vk1) = setup_with_rng(&[basis.clone()], None, &mut rng).unwrap();
        let (pk2, vk2) = setup_with_rng(&[basis], None, &mut rng).unwrap();

        let values = scalars_from_u64(&[1, 2]);
        let (c1, p1) = pk1[0].commit_and_prove(&values).unwrap();
        let (c2, p2) = pk2[0].commit_and_prove(&values).unwrap();

        // Each triple is fine on its own
        assert!(vk1.verify(&c1, &p1).is_ok());
        assert!(vk2.verify(&c2, &p2).is_ok());

        let coeff = CombinationCoefficient::from_u64(7).unwrap();
        assert_eq!(
            batch_verify_multi_vk(&[vk1, vk2], &[c1, c2], &[p1, p2], &coeff),
            Err(ZkError::IncompatibleVerifyingKeys { index: 1 })
        );
    }

    #[test]
    fn test_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(3);
        let t = triples(&shared_setups(3, 2, &mut rng));
        let (vks, cs, ps) = split(&t);
        let coeff = CombinationCoefficient::from_u64(7).unwrap();

        assert_eq!(
            batch_verify_multi_vk(&vks, &cs[..2], &ps, &coeff),
            Err(ZkError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            batch_verify_multi_vk(&vks, &cs, &ps[..1], &coeff),
            Err(ZkError::LengthMismatch {
                expected: 3,
                actual: 1
            })
        );
        assert_eq!(
            batch_verify_multi_vk(&[], &[], &[], &coeff),
            Err(ZkError::EmptyBatch)
        );
    }

    #[test]
    fn test_reordered_commitments_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let t = triples(&shared_setups(3, 2, &mut rng));
        let (vks, mut cs, ps) = split(&t);
        let coeff = CombinationCoefficient::from_u64(13).unwrap();

        assert!(batch_verify_multi_vk(&vks, &cs, &ps, &coeff).is_ok());
        cs.swap(0, 2);
        assert_eq!(
            batch_verify_multi_vk(&vks, &cs, &ps, &coeff),
            Err(ZkError::InvalidProof)
        );
    }

    #[test]
    fn test_batch_equivalent_to_individual() {
        let mut rng = StdRng::seed_from_u64(5);
        let setups = shared_setups(6, 3, &mut rng);
        let coeff = CombinationCoefficient::random(&mut rng);

        for tampered in [None, Some(0usize), Some(3), Some(5)] {
            let mut t = triples(&setups);
            if let Some(i) = tampered {
                t[i].proof = t[i].proof.scale(&Fr::from(2u64));
            }
            let individually_ok = t.iter().all(|t| t.verify().is_ok());
            let (vks, cs, ps) = split(&t);
            let batch_ok = batch_verify_multi_vk(&vks, &cs, &ps, &coeff).is_ok();

            assert_eq!(individually_ok, batch_ok);
            assert_eq!(batch_ok, tampered.is_none());
        }
    }

    #[test]
    fn test_batch_verifier_identifies_invalid() {
        let mut rng = StdRng::seed_from_u64(6);
        let setups = shared_setups(5, 2, &mut rng);
        let mut verifier = BatchVerifier::with_config(ProtocolConfig::server_mode());

        for (i, t) in triples(&setups).into_iter().enumerate() {
            if i == 3 {
                verifier.add(t.vk, t.commitment.scale(&Fr::from(3u64)), t.proof);
            } else {
                verifier.add_triple(t);
            }
        }

        let result = verifier.verify_all_fiat_shamir().unwrap();

        assert!(!result.all_valid);
        assert_eq!(result.total(), 5);
        assert_eq!(result.valid_count(), 4);
        assert_eq!(result.invalid_count(), 1);
        assert_eq!(result.invalid_indices(), vec![3]);
        assert_eq!(result.is_valid(3), Some(false));
        assert_eq!(result.is_valid(0), Some(true));
        assert_eq!(result.is_valid(5), None);
    }

    #[test]
    fn test_batch_verifier_errors() {
        let verifier = BatchVerifier::new();
        assert!(verifier.is_empty());
        assert_eq!(
            verifier.verify_all_fiat_shamir().unwrap_err(),
            ZkError::EmptyBatch
        );

        let mut rng = StdRng::seed_from_u64(8);
        let mut verifier = BatchVerifier::new();
        for t in triples(&shared_setups(2, 2, &mut rng)) {
            verifier.add_triple(t);
        }
        for t in triples(&shared_setups(1, 2, &mut rng)) {
            verifier.add_triple(t);
        }
        assert_eq!(verifier.len(), 3);
        assert_eq!(
            verifier.verify_all_fiat_shamir().unwrap_err(),
            ZkError::IncompatibleVerifyingKeys { index: 2 }
        );

        verifier.clear();
        assert!(verifier.is_empty());
    }

    #[test]
    fn test_fiat_shamir_coefficient_binds_proofs() {
        let mut rng = StdRng::seed_from_u64(9);
        let t = triples(&shared_setups(2, 2, &mut rng));

        let mut a = BatchVerifier::new();
        let mut b = BatchVerifier::new();
        for triple in &t {
            a.add_triple(*triple);
        }
        b.add_triple(t[0]);
        b.add(t[1].vk, t[1].commitment, t[1].proof.scale(&Fr::from(2u64)));

        assert_ne!(
            a.fiat_shamir_coefficient().unwrap(),
            b.fiat_shamir_coefficient().unwrap()
        );
        assert!(a.verify_all_fiat_shamir().unwrap().all_valid);
    }
}
