//! Folding commitments and proofs
//!
//! Several commitments are combined with a random linear combination
//!
//! `Fold(C, r) = C₀ + r·C₁ + r²·C₂ + …`
//!
//! and [`batch_prove`] produces the single proof matching that folded
//! commitment, so one pairing check covers every vector.
//!
//! ## Coefficient choice
//!
//! The coefficient `r` must be unpredictable to the prover when the proofs
//! are built. Derive it with [`crate::Transcript`] over everything being
//! folded, or let the verifier sample it with
//! [`CombinationCoefficient::random`]. [`CombinationCoefficient::from_u64`]
//! exists for reproducible demos and tests only.
//!
//! ## Example
//!
//! ```rust
//! use keyless_zk::{
//!     batch_prove, fold_commitments, scalars_from_u64, setup, Basis, CombinationCoefficient,
//! };
//! use rand::rngs::OsRng;
//!
//! let basis = Basis::random(3, &mut OsRng).unwrap();
//! let (pks, vk) = setup(&[basis.clone(), basis], None).unwrap();
//!
//! let values = vec![scalars_from_u64(&[10, 20, 30]), scalars_from_u64(&[100, 200, 300])];
//! let commitments = vec![pks[0].commit(&values[0]).unwrap(), pks[1].commit(&values[1]).unwrap()];
//!
//! let coeff = CombinationCoefficient::random(&mut OsRng);
//! let folded = fold_commitments(&commitments, &coeff).unwrap();
//! let proof = batch_prove(&pks, &values, &coeff).unwrap();
//!
//! assert!(vk.verify(&folded, &proof).is_ok());
//! ```

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, Zero};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, Proof};
use crate::config::ProtocolConfig;
use crate::error::{Result, ZkError};
use crate::group::{msm, random_nonzero_scalar, Fr, G1Affine, G1Projective};
use crate::setup::{ProvingKey, VerifyingKey};
use crate::transcript::Transcript;

/// Non-zero scalar weighting the terms of a fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CoefficientRepr")]
pub struct CombinationCoefficient(#[serde(with = "crate::group::serde_ark")] pub(crate) Fr);

#[derive(Deserialize)]
struct CoefficientRepr(#[serde(with = "crate::group::serde_ark")] Fr);

impl TryFrom<CoefficientRepr> for CombinationCoefficient {
    type Error = ZkError;

    fn try_from(repr: CoefficientRepr) -> Result<Self> {
        Self::new(repr.0)
    }
}

impl CombinationCoefficient {
    /// Wrap a scalar. Zero is rejected: it would drop every term but the first.
    pub fn new(value: Fr) -> Result<Self> {
        let coeff = Self(value);
        coeff.ensure_nonzero()?;
        Ok(coeff)
    }

    /// Fixed coefficient for demos and reproducible tests.
    ///
    /// A coefficient known to the prover in advance lets it forge batches
    /// whose individual proofs are invalid. Never use this against an
    /// adversarial prover.
    pub fn from_u64(value: u64) -> Result<Self> {
        Self::new(Fr::from(value))
    }

    /// Verifier-side random coefficient
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(random_nonzero_scalar(rng))
    }

    /// The scalar value
    pub fn value(&self) -> &Fr {
        &self.0
    }

    pub(crate) fn ensure_nonzero(&self) -> Result<()> {
        if self.0.is_zero() {
            return Err(ZkError::InvalidInput(
                "combination coefficient must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// `[1, r, r², …, r^(n-1)]`
    pub fn powers(&self, n: usize) -> Vec<Fr> {
        let mut out = Vec::with_capacity(n);
        let mut current = Fr::ONE;
        for _ in 0..n {
            out.push(current);
            current *= self.0;
        }
        out
    }
}

/// Horner evaluation of `p₀ + r·p₁ + r²·p₂ + …`.
fn fold_points(points: &[G1Affine], r: &Fr) -> Result<G1Projective> {
    let (last, rest) = points.split_last().ok_or(ZkError::EmptyBatch)?;
    Ok(rest
        .iter()
        .rev()
        .fold(last.into_group(), |acc, p| acc * r + p))
}

/// Fold commitments with ascending powers of `coeff`.
///
/// Order is significant and must match the order of the values passed to
/// [`batch_prove`].
pub fn fold_commitments(
    commitments: &[Commitment],
    coeff: &CombinationCoefficient,
) -> Result<Commitment> {
    coeff.ensure_nonzero()?;
    let points: Vec<G1Affine> = commitments.iter().map(|c| *c.point()).collect();
    Ok(Commitment(fold_points(&points, &coeff.0)?.into_affine()))
}

/// Fold knowledge proofs with ascending powers of `coeff`.
///
/// Folding the individual proofs of vectors committed under one setup gives
/// the same result as [`batch_prove`] over those vectors.
pub fn fold_proofs(proofs: &[Proof], coeff: &CombinationCoefficient) -> Result<Proof> {
    coeff.ensure_nonzero()?;
    let points: Vec<G1Affine> = proofs.iter().map(|p| *p.point()).collect();
    Ok(Proof(fold_points(&points, &coeff.0)?.into_affine()))
}

/// Single proof for the fold of `Commit(pks[i], values_list[i])`.
///
/// All `pks` must come from the same setup call for the result to verify
/// against its verifying key. Computed as one MSM over the concatenated
/// `σ`-scaled bases with the `i`-th vector weighted by `coeff^i`.
pub fn batch_prove(
    pks: &[ProvingKey],
    values_list: &[Vec<Fr>],
    coeff: &CombinationCoefficient,
) -> Result<Proof> {
    if pks.len() != values_list.len() {
        return Err(ZkError::LengthMismatch {
            expected: pks.len(),
            actual: values_list.len(),
        });
    }
    if pks.is_empty() {
        return Err(ZkError::EmptyBatch);
    }
    for (pk, values) in pks.iter().zip(values_list) {
        pk.check_dimension(values.len())?;
    }
    coeff.ensure_nonzero()?;
    if pks.len() == 1 {
        return pks[0].prove_knowledge(&values_list[0]);
    }

    let total: usize = values_list.iter().map(Vec::len).sum();
    let mut bases = Vec::with_capacity(total);
    let mut scaled = Vec::with_capacity(total);

    for ((pk, values), weight) in pks
        .iter()
        .zip(values_list)
        .zip(coeff.powers(pks.len()))
    {
        bases.extend_from_slice(&pk.basis_exp_sigma);
        scaled.extend(values.iter().map(|v| *v * weight));
    }

    log::trace!("batch proof over {} vectors, {} terms", pks.len(), total);
    Ok(Proof(msm(&bases, &scaled)?.into_affine()))
}

/// Folded commitment bundled with its batch proof
///
/// Convenient for storing or transmitting one aggregate in place of `count`
/// commitment/proof pairs. The folding coefficient is not part of the
/// bundle: both [`FoldedOpening::build`] and [`FoldedOpening::verify`]
/// derive it from a [`Transcript`] over the verifying key and the
/// commitments, so the prover cannot pick it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldedOpening {
    commitment: Commitment,
    proof: Proof,
    count: usize,
}

impl FoldedOpening {
    /// Fiat-Shamir coefficient binding `vk` and `commitments` in order.
    pub fn challenge(
        vk: &VerifyingKey,
        commitments: &[Commitment],
        config: &ProtocolConfig,
    ) -> Result<CombinationCoefficient> {
        let mut transcript = Transcript::from_config(config);
        transcript.append_message(b"protocol", b"folded_opening");
        transcript.append_verifying_key(vk)?;
        transcript.append_commitments(commitments)?;
        Ok(transcript.challenge_coefficient())
    }

    /// Commit to every vector, fold the commitments and batch-prove them.
    ///
    /// `pks` must come from the setup call that produced `vk`.
    pub fn build(
        pks: &[ProvingKey],
        vk: &VerifyingKey,
        values_list: &[Vec<Fr>],
        config: &ProtocolConfig,
    ) -> Result<Self> {
        let commitments = pks
            .iter()
            .zip(values_list)
            .map(|(pk, values)| pk.commit(values))
            .collect::<Result<Vec<_>>>()?;
        let coeff = Self::challenge(vk, &commitments, config)?;
        let proof = batch_prove(pks, values_list, &coeff)?;

        Ok(Self {
            commitment: fold_commitments(&commitments, &coeff)?,
            proof,
            count: commitments.len(),
        })
    }

    /// Check that `commitments` fold to the stored commitment under the
    /// re-derived coefficient and that the batch proof verifies.
    pub fn verify(
        &self,
        vk: &VerifyingKey,
        commitments: &[Commitment],
        config: &ProtocolConfig,
    ) -> Result<()> {
        if commitments.len() != self.count {
            return Err(ZkError::LengthMismatch {
                expected: self.count,
                actual: commitments.len(),
            });
        }
        let coeff = Self::challenge(vk, commitments, config)?;
        if fold_commitments(commitments, &coeff)? != self.commitment {
            return Err(ZkError::InvalidProof);
        }
        vk.verify(&self.commitment, &self.proof)
    }

    /// The folded commitment
    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// The batch proof
    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// Number of vectors folded
    pub fn count(&self) -> usize {
        self.count
    }

    /// Serialize to JSON format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON format
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
