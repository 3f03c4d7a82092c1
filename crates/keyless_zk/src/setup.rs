//! Key generation for Pedersen vector commitments
//!
//! A [`Basis`] fixes the dimension of the vectors that can be committed.
//! [`setup`] binds one or more bases to a secret `σ` and produces one
//! [`ProvingKey`] per basis plus a single [`VerifyingKey`]:
//!
//! ```text
//! pk.basis_exp_sigma[j] = σ·basis[j]
//! vk.trapdoor           = g            (G2, shared or fresh)
//! vk.g_sigma_neg        = −σ·g
//! ```
//!
//! `σ` is discarded once the keys are built. Verifying keys produced by
//! separate `setup` calls can only be batched together when they were given
//! the same [`Trapdoor`].
//!
//! ## Example
//!
//! ```rust
//! use keyless_zk::{setup, Basis, Trapdoor};
//! use rand::rngs::OsRng;
//!
//! let trapdoor = Trapdoor::random(&mut OsRng);
//! let basis = Basis::random(2, &mut OsRng).unwrap();
//!
//! let (pk1, vk1) = setup(&[basis.clone()], Some(&trapdoor)).unwrap();
//! let (pk2, vk2) = setup(&[basis], Some(&trapdoor)).unwrap();
//!
//! assert_eq!(vk1.trapdoor(), vk2.trapdoor());
//! assert_eq!(pk1[0].dimension(), 2);
//! # let _ = pk2;
//! ```

use ark_ec::{AffineRepr, CurveGroup};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZkError};
use crate::group::{
    from_compressed_bytes, g1_is_valid, g2_is_valid, random_g1, random_nonzero_scalar,
    to_compressed_bytes, G1Affine, G1Projective, G2Affine,
};

/// Bases at least this long get their `σ`-powers computed on rayon.
const PARALLEL_BASIS_LEN: usize = 64;

/// Ordered sequence of G1 generators
///
/// The length is the dimension `d` of the vectors committed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BasisRepr")]
pub struct Basis {
    #[serde(with = "crate::group::serde_ark")]
    points: Vec<G1Affine>,
}

#[derive(Deserialize)]
struct BasisRepr {
    #[serde(with = "crate::group::serde_ark")]
    points: Vec<G1Affine>,
}

impl TryFrom<BasisRepr> for Basis {
    type Error = ZkError;

    fn try_from(repr: BasisRepr) -> Result<Self> {
        Self::new(repr.points)
    }
}

impl Basis {
    /// Create a basis, rejecting empty input and points outside the subgroup.
    pub fn new(points: Vec<G1Affine>) -> Result<Self> {
        let basis = Self { points };
        basis.validate()?;
        Ok(basis)
    }

    /// Sample `dimension` independent random generators.
    pub fn random<R: RngCore + CryptoRng>(dimension: usize, rng: &mut R) -> Result<Self> {
        Self::new((0..dimension).map(|_| random_g1(rng)).collect())
    }

    /// Check the basis invariants.
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(ZkError::InvalidBasis("basis has no points".into()));
        }
        if let Some(index) = self.points.iter().position(|p| !g1_is_valid(p)) {
            return Err(ZkError::InvalidBasis(format!(
                "point {} is not in the G1 subgroup",
                index
            )));
        }
        Ok(())
    }

    /// Vector dimension this basis commits to
    pub fn dimension(&self) -> usize {
        self.points.len()
    }

    /// The generators
    pub fn points(&self) -> &[G1Affine] {
        &self.points
    }

    /// Compressed encoding of all points
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_compressed_bytes(&self.points)
    }

    /// Decode and validate a basis
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(from_compressed_bytes(bytes)?)
    }
}

/// G2 element parameterizing a verifying key
///
/// Sharing one trapdoor across independent [`setup`] calls is what makes
/// their verifying keys compatible for [`crate::batch_verify_multi_vk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TrapdoorRepr")]
pub struct Trapdoor(#[serde(with = "crate::group::serde_ark")] pub(crate) G2Affine);

#[derive(Deserialize)]
struct TrapdoorRepr(#[serde(with = "crate::group::serde_ark")] G2Affine);

impl TryFrom<TrapdoorRepr> for Trapdoor {
    type Error = ZkError;

    fn try_from(repr: TrapdoorRepr) -> Result<Self> {
        Self::from_point(repr.0)
    }
}

impl Trapdoor {
    /// Sample a scalar uniformly and lift it to G2.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self((G2Affine::generator() * random_nonzero_scalar(rng)).into_affine())
    }

    /// Wrap an existing G2 point. It must be a non-identity subgroup element.
    pub fn from_point(point: G2Affine) -> Result<Self> {
        if point.is_zero() {
            return Err(ZkError::InvalidInput("trapdoor is the identity".into()));
        }
        if !g2_is_valid(&point) {
            return Err(ZkError::InvalidInput(
                "trapdoor is not in the G2 subgroup".into(),
            ));
        }
        Ok(Self(point))
    }

    /// The standard G2 generator
    pub fn generator() -> Self {
        Self(G2Affine::generator())
    }

    /// The underlying G2 point
    pub fn point(&self) -> &G2Affine {
        &self.0
    }

    /// Compressed encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_compressed_bytes(&self.0)
    }

    /// Decode and validate a trapdoor
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_point(from_compressed_bytes(bytes)?)
    }
}

/// Basis bound to a setup instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProvingKeyRepr")]
pub struct ProvingKey {
    pub(crate) basis: Basis,
    #[serde(with = "crate::group::serde_ark")]
    pub(crate) basis_exp_sigma: Vec<G1Affine>,
}

#[derive(Deserialize)]
struct ProvingKeyRepr {
    basis: Basis,
    #[serde(with = "crate::group::serde_ark")]
    basis_exp_sigma: Vec<G1Affine>,
}

impl TryFrom<ProvingKeyRepr> for ProvingKey {
    type Error = ZkError;

    fn try_from(repr: ProvingKeyRepr) -> Result<Self> {
        if repr.basis_exp_sigma.len() != repr.basis.dimension() {
            return Err(ZkError::InvalidBasis(format!(
                "proving key has {} scaled points for a basis of dimension {}",
                repr.basis_exp_sigma.len(),
                repr.basis.dimension()
            )));
        }
        Ok(Self {
            basis: repr.basis,
            basis_exp_sigma: repr.basis_exp_sigma,
        })
    }
}

impl ProvingKey {
    /// The commitment basis
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Vector dimension accepted by [`ProvingKey::commit`]
    pub fn dimension(&self) -> usize {
        self.basis.dimension()
    }

    pub(crate) fn check_dimension(&self, values: usize) -> Result<()> {
        if values != self.dimension() {
            return Err(ZkError::DimensionMismatch {
                expected: self.dimension(),
                actual: values,
            });
        }
        Ok(())
    }
}

/// Verification parameters of a setup instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VerifyingKeyRepr")]
pub struct VerifyingKey {
    pub(crate) trapdoor: Trapdoor,
    /// −σ·trapdoor
    #[serde(with = "crate::group::serde_ark")]
    pub(crate) g_sigma_neg: G2Affine,
}

#[derive(Deserialize)]
struct VerifyingKeyRepr {
    trapdoor: Trapdoor,
    #[serde(with = "crate::group::serde_ark")]
    g_sigma_neg: G2Affine,
}

impl TryFrom<VerifyingKeyRepr> for VerifyingKey {
    type Error = ZkError;

    fn try_from(repr: VerifyingKeyRepr) -> Result<Self> {
        Self::from_parts(repr.trapdoor.0, repr.g_sigma_neg)
    }
}

impl VerifyingKey {
    /// The trapdoor this key was built on
    pub fn trapdoor(&self) -> &Trapdoor {
        &self.trapdoor
    }

    /// Whether this key can be batched with `other`
    pub fn is_compatible_with(&self, other: &VerifyingKey) -> bool {
        self.trapdoor == other.trapdoor
    }

    /// Compressed encoding: trapdoor followed by `−σ·trapdoor`
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        to_compressed_bytes(&(self.trapdoor.0, self.g_sigma_neg))
    }

    /// Decode and validate a verifying key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (trapdoor, g_sigma_neg): (G2Affine, G2Affine) = from_compressed_bytes(bytes)?;
        Self::from_parts(trapdoor, g_sigma_neg)
    }

    // σ is non-zero, so −σ·g is never the identity.
    fn from_parts(trapdoor: G2Affine, g_sigma_neg: G2Affine) -> Result<Self> {
        if g_sigma_neg.is_zero() || !g2_is_valid(&g_sigma_neg) {
            return Err(ZkError::InvalidInput(
                "verifying key point is not a non-identity G2 element".into(),
            ));
        }
        Ok(Self {
            trapdoor: Trapdoor::from_point(trapdoor)?,
            g_sigma_neg,
        })
    }
}

/// Generate keys with the operating system RNG.
///
/// See [`setup_with_rng`].
pub fn setup(
    bases: &[Basis],
    shared_trapdoor: Option<&Trapdoor>,
) -> Result<(Vec<ProvingKey>, VerifyingKey)> {
    setup_with_rng(bases, shared_trapdoor, &mut OsRng)
}

/// Generate one proving key per basis and a single verifying key.
///
/// With `shared_trapdoor` the verifying key reuses it, otherwise a fresh one
/// is sampled. A new secret `σ` is sampled on every call either way.
pub fn setup_with_rng<R: RngCore + CryptoRng>(
    bases: &[Basis],
    shared_trapdoor: Option<&Trapdoor>,
    rng: &mut R,
) -> Result<(Vec<ProvingKey>, VerifyingKey)> {
    if bases.is_empty() {
        return Err(ZkError::InvalidBasis("no bases supplied".into()));
    }
    for basis in bases {
        basis.validate()?;
    }

    let trapdoor = match shared_trapdoor {
        Some(t) => Trapdoor::from_point(t.0)?,
        None => Trapdoor::random(rng),
    };

    let sigma = random_nonzero_scalar(rng);
    let g_sigma_neg = (trapdoor.0 * (-sigma)).into_affine();

    let proving_keys = bases
        .iter()
        .map(|basis| {
            let scaled: Vec<G1Projective> = if basis.dimension() >= PARALLEL_BASIS_LEN {
                basis.points.par_iter().map(|p| *p * sigma).collect()
            } else {
                basis.points.iter().map(|p| *p * sigma).collect()
            };
            ProvingKey {
                basis: basis.clone(),
                basis_exp_sigma: G1Projective::normalize_batch(&scaled),
            }
        })
        .collect();

    log::debug!(
        "pedersen setup: {} bases, shared trapdoor: {}",
        bases.len(),
        shared_trapdoor.is_some()
    );

    Ok((
        proving_keys,
        VerifyingKey {
            trapdoor,
            g_sigma_neg,
        },
    ))
}
