//! Pedersen vector commitments and knowledge proofs
//!
//! A commitment to `v ∈ Fr^d` under basis `B` is
//!
//! `C = Σ v[i]·B[i]`
//!
//! and the matching knowledge proof is the same MSM over the `σ`-scaled
//! basis held by the proving key, `π = Σ v[i]·(σ·B[i]) = σ·C`.
//!
//! Properties:
//! - **Binding**: given C, you cannot find a different vector committing to C
//!   (discrete log between basis points is unknown)
//! - **Knowledge**: only someone holding the proving key and an opening can
//!   produce a π accepted by the verifying key
//!
//! Both operations are deterministic in `(pk, values)`. There is no blinding
//! term, so commitments to low-entropy vectors are not hiding.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Add;

use ark_ec::{AffineRepr, CurveGroup};

use crate::config::ProtocolConfig;
use crate::error::{Result, ZkError};
use crate::group::{from_compressed_bytes, g1_is_valid, msm, to_compressed_bytes, Fr, G1Affine};
use crate::setup::ProvingKey;

/// Binding digest of a secret vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "crate::group::serde_ark")] pub(crate) G1Affine);

/// Succinct knowledge-of-opening witness for a [`Commitment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof(#[serde(with = "crate::group::serde_ark")] pub(crate) G1Affine);

macro_rules! g1_wrapper {
    ($name:ident, $what:literal) => {
        impl $name {
            #[doc = concat!("Wrap a raw G1 point as a ", $what, ".")]
            ///
            /// Fails with `InvalidInput` if the point is not a subgroup element.
            pub fn from_point(point: G1Affine) -> Result<Self> {
                if !g1_is_valid(&point) {
                    return Err(ZkError::InvalidInput(
                        concat!($what, " point is not in the G1 subgroup").into(),
                    ));
                }
                Ok(Self(point))
            }

            /// The underlying G1 point
            pub fn point(&self) -> &G1Affine {
                &self.0
            }

            /// Multiply by a scalar
            pub fn scale(&self, k: &Fr) -> Self {
                Self((self.0 * k).into_affine())
            }

            /// Whether this is the group identity
            pub fn is_identity(&self) -> bool {
                self.0.is_zero()
            }

            /// Compressed point encoding (32 bytes)
            pub fn to_bytes(&self) -> Result<Vec<u8>> {
                to_compressed_bytes(&self.0)
            }

            /// Decode a compressed point, validating subgroup membership
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                Self::from_point(from_compressed_bytes(bytes)?)
            }

            /// Hex of the compressed encoding
            pub fn to_hex(&self) -> Result<String> {
                Ok(hex::encode(self.to_bytes()?))
            }

            pub(crate) fn is_valid(&self) -> bool {
                g1_is_valid(&self.0)
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self((self.0 + rhs.0).into_affine())
            }
        }
    };
}

g1_wrapper!(Commitment, "commitment");
g1_wrapper!(Proof, "proof");

impl ProvingKey {
    /// Commit to `values`: `C = Σ values[i]·basis[i]`.
    pub fn commit(&self, values: &[Fr]) -> Result<Commitment> {
        self.check_dimension(values.len())?;
        let point = msm(self.basis.points(), values)?;
        Ok(Commitment(point.into_affine()))
    }

    /// Prove knowledge of the opening of `commit(values)`.
    pub fn prove_knowledge(&self, values: &[Fr]) -> Result<Proof> {
        self.check_dimension(values.len())?;
        let point = msm(&self.basis_exp_sigma, values)?;
        Ok(Proof(point.into_affine()))
    }

    /// Commit and prove in one call
    pub fn commit_and_prove(&self, values: &[Fr]) -> Result<(Commitment, Proof)> {
        Ok((self.commit(values)?, self.prove_knowledge(values)?))
    }
}

/// Commit to many independent vectors under one proving key
///
/// Runs on rayon once `values_list` reaches `config.parallel_threshold`.
/// Output order matches input order.
pub fn commit_batch(
    pk: &ProvingKey,
    values_list: &[Vec<Fr>],
    config: &ProtocolConfig,
) -> Result<Vec<Commitment>> {
    if config.should_parallelize(values_list.len()) {
        values_list.par_iter().map(|v| pk.commit(v)).collect()
    } else {
        values_list.iter().map(|v| pk.commit(v)).collect()
    }
}

/// Knowledge proofs for many independent vectors under one proving key
pub fn prove_batch(
    pk: &ProvingKey,
    values_list: &[Vec<Fr>],
    config: &ProtocolConfig,
) -> Result<Vec<Proof>> {
    if config.should_parallelize(values_list.len()) {
        values_list
            .par_iter()
            .map(|v| pk.prove_knowledge(v))
            .collect()
    } else {
        values_list.iter().map(|v| pk.prove_knowledge(v)).collect()
    }
}

/// Convert small integers to field elements
pub fn scalars_from_u64(values: &[u64]) -> Vec<Fr> {
    values.iter().map(|&v| Fr::from(v)).collect()
}
