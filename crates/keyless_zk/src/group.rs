//! Group arithmetic over BN254
//!
//! Thin adapter around arkworks: the protocol modules only see the types
//! re-exported here plus a handful of helpers for subgroup checks,
//! multi-scalar multiplication, pairing checks and canonical encodings.

pub use ark_bn254::{Bn254, Fr, G1Affine, G1Projective, G2Affine, G2Projective};

use ark_ec::{pairing::Pairing, AffineRepr, VariableBaseMSM};
use ark_ff::{One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};

use crate::error::{Result, ZkError};

/// Scalar field of BN254, the field all committed values live in.
pub type ScalarField = Fr;

/// Check that a G1 point is on the curve and in the prime-order subgroup.
pub fn g1_is_valid(point: &G1Affine) -> bool {
    point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()
}

/// Check that a G2 point is on the curve and in the prime-order subgroup.
pub fn g2_is_valid(point: &G2Affine) -> bool {
    point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()
}

/// Sample a uniformly random non-zero scalar.
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Fr {
    loop {
        let s = Fr::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

/// Sample a uniformly random G1 point (`s·G` for random non-zero `s`).
pub fn random_g1<R: RngCore + CryptoRng>(rng: &mut R) -> G1Affine {
    (G1Affine::generator() * random_nonzero_scalar(rng)).into()
}

/// Multi-scalar multiplication `Σ scalars[i]·bases[i]`.
pub(crate) fn msm(bases: &[G1Affine], scalars: &[Fr]) -> Result<G1Projective> {
    if bases.len() != scalars.len() {
        return Err(ZkError::DimensionMismatch {
            expected: bases.len(),
            actual: scalars.len(),
        });
    }
    log::trace!("msm over {} points", bases.len());
    G1Projective::msm(bases, scalars).map_err(|len| ZkError::DimensionMismatch {
        expected: bases.len(),
        actual: len,
    })
}

/// True iff `Π e(g1[i], g2[i]) == 1` in GT.
pub(crate) fn pairing_product_is_one(g1: &[G1Affine], g2: &[G2Affine]) -> bool {
    debug_assert_eq!(g1.len(), g2.len());
    Bn254::multi_pairing(g1.iter().copied(), g2.iter().copied())
        .0
        .is_one()
}

/// Canonical compressed encoding of any arkworks value.
pub fn to_compressed_bytes<T: CanonicalSerialize>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

/// Decode a canonical compressed encoding, validating curve and subgroup membership.
pub fn from_compressed_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T> {
    Ok(T::deserialize_compressed(bytes)?)
}

/// Serde bridge storing arkworks values as hex of their compressed encoding.
///
/// Use with `#[serde(with = "crate::group::serde_ark")]`.
pub(crate) mod serde_ark {
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let mut bytes = Vec::with_capacity(value.compressed_size());
        value
            .serialize_compressed(&mut bytes)
            .map_err(ser::Error::custom)?;
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(encoded).map_err(de::Error::custom)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(de::Error::custom)
    }
}
