//! KZG polynomial commitments over BN254
//!
//! A structured reference string holds `[τ⁰·G, τ¹·G, …, τ^(n-1)·G]` in G1
//! together with `g2` and `τ·g2`. A polynomial `f` is committed as `f(τ)·G`,
//! and an opening at `x` is the commitment to the quotient
//! `q(X) = (f(X) − f(x)) / (X − x)`. The verifier accepts when
//!
//! ```text
//! e(C − y·G, g2) · e(π, x·g2 − τ·g2) == 1
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};
//! use keyless_zk::{Fr, KzgSrs};
//! use rand::rngs::OsRng;
//!
//! let srs = KzgSrs::new(8, &mut OsRng).unwrap();
//! let f = DensePolynomial::from_coefficients_vec(vec![Fr::from(5u64), Fr::from(2u64), Fr::from(3u64)]);
//!
//! let commitment = srs.commit(&f).unwrap();
//! let opening = srs.open(&f, Fr::from(11u64)).unwrap();
//!
//! assert_eq!(opening.value(), &Fr::from(390u64));
//! assert!(srs.verify(&commitment, &opening).is_ok());
//! ```

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_poly::{univariate::DensePolynomial, Polynomial};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::commitment::{Commitment, Proof};
use crate::error::{Result, ZkError};
use crate::group::{
    msm, pairing_product_is_one, random_nonzero_scalar, Fr, G1Affine, G1Projective, G2Affine,
    G2Projective,
};

/// Structured reference string for polynomials of up to `size` coefficients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KzgSrs {
    #[serde(with = "crate::group::serde_ark")]
    powers_of_g: Vec<G1Affine>,
    #[serde(with = "crate::group::serde_ark")]
    g2: G2Affine,
    #[serde(with = "crate::group::serde_ark")]
    tau_g2: G2Affine,
}

/// Evaluation claim `f(point) = value` with its witness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KzgOpening {
    #[serde(with = "crate::group::serde_ark")]
    point: Fr,
    #[serde(with = "crate::group::serde_ark")]
    value: Fr,
    proof: Proof,
}

impl KzgOpening {
    /// Evaluation point
    pub fn point(&self) -> &Fr {
        &self.point
    }

    /// Claimed evaluation
    pub fn value(&self) -> &Fr {
        &self.value
    }

    /// Commitment to the quotient polynomial
    pub fn proof(&self) -> &Proof {
        &self.proof
    }
}

impl KzgSrs {
    /// Sample a fresh secret `τ` and build an SRS from it.
    ///
    /// `τ` is dropped on return.
    pub fn new<R: RngCore + CryptoRng>(size: usize, rng: &mut R) -> Result<Self> {
        Self::from_tau(size, random_nonzero_scalar(rng))
    }

    /// Build an SRS from a known `τ`.
    ///
    /// Anyone who knows `τ` can forge openings; only use this for
    /// reproducible tests and demos.
    pub fn from_tau(size: usize, tau: Fr) -> Result<Self> {
        if size == 0 {
            return Err(ZkError::InvalidInput("SRS size must be positive".into()));
        }

        let g1 = G1Affine::generator();
        let mut powers = Vec::with_capacity(size);
        let mut current = Fr::from(1u64);
        for _ in 0..size {
            powers.push(g1 * current);
            current *= tau;
        }

        let g2 = G2Affine::generator();
        log::debug!("kzg srs generated with {} powers", size);

        Ok(Self {
            powers_of_g: G1Projective::normalize_batch(&powers),
            g2,
            tau_g2: (g2 * tau).into_affine(),
        })
    }

    /// Maximum number of coefficients a committed polynomial may have
    pub fn size(&self) -> usize {
        self.powers_of_g.len()
    }

    /// Commit to `poly`: `C = f(τ)·G`.
    pub fn commit(&self, poly: &DensePolynomial<Fr>) -> Result<Commitment> {
        Ok(Commitment(self.commit_coeffs(&poly.coeffs)?.into_affine()))
    }

    /// Open `poly` at `point`.
    pub fn open(&self, poly: &DensePolynomial<Fr>, point: Fr) -> Result<KzgOpening> {
        if poly.coeffs.len() > self.size() {
            return Err(ZkError::DimensionMismatch {
                expected: self.size(),
                actual: poly.coeffs.len(),
            });
        }

        let value = poly.evaluate(&point);
        let quotient = divide_by_linear(&poly.coeffs, point);
        let proof = Proof(self.commit_coeffs(&quotient)?.into_affine());

        Ok(KzgOpening {
            point,
            value,
            proof,
        })
    }

    /// Check an opening against a commitment.
    pub fn verify(&self, commitment: &Commitment, opening: &KzgOpening) -> Result<()> {
        if !commitment.is_valid() || !opening.proof.is_valid() {
            return Err(ZkError::InvalidProof);
        }

        let g1 = G1Affine::generator();
        let lhs = commitment.point().into_group() - g1 * opening.value;
        let shifted: G2Projective = self.g2 * opening.point - self.tau_g2.into_group();

        if pairing_product_is_one(
            &[lhs.into_affine(), *opening.proof.point()],
            &[self.g2, shifted.into_affine()],
        ) {
            Ok(())
        } else {
            Err(ZkError::InvalidProof)
        }
    }

    fn commit_coeffs(&self, coeffs: &[Fr]) -> Result<G1Projective> {
        if coeffs.len() > self.size() {
            return Err(ZkError::DimensionMismatch {
                expected: self.size(),
                actual: coeffs.len(),
            });
        }
        if coeffs.is_empty() {
            return Ok(G1Projective::zero());
        }
        msm(&self.powers_of_g[..coeffs.len()], coeffs)
    }
}

/// Synthetic division of `coeffs` (lowest degree first) by `X − point`,
/// dropping the remainder.
fn divide_by_linear(coeffs: &[Fr], point: Fr) -> Vec<Fr> {
    if coeffs.len() < 2 {
        return Vec::new();
    }

    let mut quotient = vec![Fr::zero(); coeffs.len() - 1];
    let mut carry = Fr::zero();
    for (i, c) in coeffs.iter().enumerate().skip(1).rev() {
        carry = *c + carry * point;
        quotient[i - 1] = carry;
    }
    quotient
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_poly::DenseUVPolynomial;

    fn demo_poly() -> DensePolynomial<Fr> {
        // f(X) = 5 + 2X + 3X²
        DensePolynomial::from_coefficients_vec(vec![
            Fr::from(5u64),
            Fr::from(2u64),
            Fr::from(3u64),
        ])
    }

    #[test]
    fn test_open_and_verify() {
        let mut rng = crate::test_rng();
        let srs = KzgSrs::new(8, &mut rng).unwrap();
        let f = demo_poly();

        let commitment = srs.commit(&f).unwrap();
        let opening = srs.open(&f, Fr::from(11u64)).unwrap();

        assert_eq!(opening.value(), &Fr::from(390u64));
        assert_eq!(opening.point(), &Fr::from(11u64));
        assert!(srs.verify(&commitment, &opening).is_ok());
    }

    #[test]
    fn test_commit_matches_evaluation_at_tau() {
        let tau = Fr::from(123456789u64);
        let srs = KzgSrs::from_tau(4, tau).unwrap();
        let f = demo_poly();

        let expected = (G1Affine::generator() * f.evaluate(&tau)).into_affine();
        assert_eq!(srs.commit(&f).unwrap().point(), &expected);
    }

    #[test]
    fn test_wrong_point_rejected() {
        let mut rng = crate::test_rng();
        let srs = KzgSrs::new(8, &mut rng).unwrap();
        let f = demo_poly();
        let commitment = srs.commit(&f).unwrap();

        let opening = srs.open(&f, Fr::from(11u64)).unwrap();
        let moved = KzgOpening {
            point: Fr::from(12u64),
            ..opening
        };
        assert_eq!(srs.verify(&commitment, &moved), Err(ZkError::InvalidProof));

        let wrong_value = KzgOpening {
            value: opening.value + Fr::from(1u64),
            ..opening
        };
        assert_eq!(
            srs.verify(&commitment, &wrong_value),
            Err(ZkError::InvalidProof)
        );
    }

    #[test]
    fn test_opening_of_other_polynomial_rejected() {
        let mut rng = crate::test_rng();
        let srs = KzgSrs::new(8, &mut rng).unwrap();
        let f = demo_poly();
        let g = DensePolynomial::from_coefficients_vec(vec![Fr::from(1u64), Fr::from(1u64)]);

        let commitment = srs.commit(&f).unwrap();
        let opening = srs.open(&g, Fr::from(11u64)).unwrap();
        assert!(srs.verify(&commitment, &opening).is_err());
    }

    #[test]
    fn test_quotient_division() {
        // (X² − 1) / (X − 1) = X + 1
        let coeffs = vec![-Fr::from(1u64), Fr::zero(), Fr::from(1u64)];
        let q = divide_by_linear(&coeffs, Fr::from(1u64));
        assert_eq!(q, vec![Fr::from(1u64), Fr::from(1u64)]);

        assert!(divide_by_linear(&[Fr::from(7u64)], Fr::from(3u64)).is_empty());
    }

    #[test]
    fn test_constant_and_zero_polynomials() {
        let srs = KzgSrs::from_tau(2, Fr::from(9u64)).unwrap();

        let constant = DensePolynomial::from_coefficients_vec(vec![Fr::from(4u64)]);
        let c = srs.commit(&constant).unwrap();
        let opening = srs.open(&constant, Fr::from(100u64)).unwrap();
        assert_eq!(opening.value(), &Fr::from(4u64));
        assert!(opening.proof().is_identity());
        assert!(srs.verify(&c, &opening).is_ok());

        let zero = DensePolynomial::<Fr>::zero();
        let c = srs.commit(&zero).unwrap();
        assert!(c.is_identity());
        assert!(srs.verify(&c, &srs.open(&zero, Fr::from(5u64)).unwrap()).is_ok());
    }

    #[test]
    fn test_size_limits() {
        assert!(matches!(
            KzgSrs::from_tau(0, Fr::from(2u64)),
            Err(ZkError::InvalidInput(_))
        ));

        let srs = KzgSrs::from_tau(2, Fr::from(2u64)).unwrap();
        assert_eq!(srs.size(), 2);
        assert_eq!(
            srs.commit(&demo_poly()).unwrap_err(),
            ZkError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
        assert!(srs.open(&demo_poly(), Fr::from(1u64)).is_err());
    }

    #[test]
    fn test_opening_serialization() {
        let srs = KzgSrs::from_tau(4, Fr::from(77u64)).unwrap();
        let opening = srs.open(&demo_poly(), Fr::from(11u64)).unwrap();

        let json = serde_json::to_string(&opening).unwrap();
        let restored: KzgOpening = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, opening);

        let json = serde_json::to_string(&srs).unwrap();
        let restored: KzgSrs = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, srs);
    }
}
