#![doc = include_str!("../README.md")]
//! # Keyless ZK - Pedersen Vector Commitments
//!
//! Pairing-based commitments with knowledge proofs over BN254.
//!
//! ## Features
//!
//! - **Vector Commitments**: Commit to a vector of field elements with one G1 point
//! - **Knowledge Proofs**: Constant-size proof that the committer knows an opening
//! - **Proof Folding**: Combine many commitments and proofs with powers of a coefficient
//! - **Multi-Key Batch Verification**: One multi-pairing for proofs from independent setups
//! - **Fiat-Shamir Coefficients**: Non-interactive combination coefficients from SHA-256
//! - **KZG Openings**: Polynomial commitments with single-point evaluation proofs
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Keyless ZK                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Setup  │  Commitment  │  Verifier  │ Aggregation │  Batch   │
//! └─────────────────────────────────────────────────────────────┘
//!      │           │             │             │            │
//!      ├─ Basis    ├─ Commit     ├─ Pairing    ├─ Fold      ├─ Multi-VK
//!      ├─ Trapdoor ├─ Prove      │  check      ├─ Batch     ├─ Fallback
//!      └─ σ keys   └─ Parallel   └─ Parallel   │  prove     │  identify
//!                                              └─ Bundle    └─ Transcript
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use keyless_zk::{
//!     batch_prove, batch_verify_multi_vk, fold_commitments, scalars_from_u64, setup, Basis,
//!     CombinationCoefficient, Trapdoor,
//! };
//! use rand::rngs::OsRng;
//!
//! // 1. Single commitment and proof
//! let basis = Basis::random(2, &mut OsRng).unwrap();
//! let (pks, vk) = setup(&[basis], None).unwrap();
//! let values = scalars_from_u64(&[123, 456]);
//! let commitment = pks[0].commit(&values).unwrap();
//! let proof = pks[0].prove_knowledge(&values).unwrap();
//! assert!(vk.verify(&commitment, &proof).is_ok());
//!
//! // 2. Several vectors under one setup, one folded proof
//! let bases = vec![
//!     Basis::random(2, &mut OsRng).unwrap(),
//!     Basis::random(2, &mut OsRng).unwrap(),
//! ];
//! let (pks, vk) = setup(&bases, None).unwrap();
//! let values = vec![scalars_from_u64(&[1, 2]), scalars_from_u64(&[3, 4])];
//! let commitments = vec![pks[0].commit(&values[0]).unwrap(), pks[1].commit(&values[1]).unwrap()];
//! let coeff = CombinationCoefficient::random(&mut OsRng);
//! let proof = batch_prove(&pks, &values, &coeff).unwrap();
//! let folded = fold_commitments(&commitments, &coeff).unwrap();
//! assert!(vk.verify(&folded, &proof).is_ok());
//!
//! // 3. Independent setups sharing a trapdoor, one pairing check
//! let trapdoor = Trapdoor::random(&mut OsRng);
//! let (pk1, vk1) = setup(&[Basis::random(2, &mut OsRng).unwrap()], Some(&trapdoor)).unwrap();
//! let (pk2, vk2) = setup(&[Basis::random(2, &mut OsRng).unwrap()], Some(&trapdoor)).unwrap();
//! let (c1, p1) = pk1[0].commit_and_prove(&scalars_from_u64(&[11, 22])).unwrap();
//! let (c2, p2) = pk2[0].commit_and_prove(&scalars_from_u64(&[33, 44])).unwrap();
//! let coeff = CombinationCoefficient::random(&mut OsRng);
//! assert!(batch_verify_multi_vk(&[vk1, vk2], &[c1, c2], &[p1, p2], &coeff).is_ok());
//! ```
//!
//! ## Security Considerations
//!
//! ### Cryptographic Foundation
//!
//! All operations are based on:
//! - **BN254**: Pairing-friendly curve with roughly 100-bit security
//! - **Discrete Log Problem**: Basis points must have unknown relative discrete logs
//! - **Knowledge of Exponent**: A valid proof implies the prover knows an opening
//! - **Random Oracle Model**: SHA-256 for Fiat-Shamir coefficients
//!
//! ### Security Warnings
//!
//! - **No hiding**: Commitments carry no blinding term; low-entropy vectors can be guessed
//! - **Combination coefficients**: Must be unpredictable to the prover when proofs are built
//! - **Setup secrets**: Anyone holding `σ` can forge proofs; it never leaves `setup`
//! - **Side-channel attacks**: This library is NOT constant-time for all operations
//!
//! ### Recommended Practices
//!
//! 1. Always use `OsRng` or a cryptographically secure RNG
//! 2. Derive coefficients with [`Transcript`] or sample them on the verifier side
//! 3. Keep `CombinationCoefficient::from_u64` and `KzgSrs::from_tau` to tests and demos
//! 4. Share a [`Trapdoor`] across setups only when their proofs will be batched together

pub mod aggregation;
pub mod batch;
pub mod commitment;
pub mod config;
pub mod error;
pub mod group;
pub mod kzg;
pub mod setup;
pub mod transcript;
pub mod verifier;

// Re-export main types
pub use aggregation::{
    batch_prove, fold_commitments, fold_proofs, CombinationCoefficient, FoldedOpening,
};
pub use batch::{batch_verify_multi_vk, BatchResult, BatchVerifier, VerificationTriple};
pub use commitment::{commit_batch, prove_batch, scalars_from_u64, Commitment, Proof};
pub use config::ProtocolConfig;
pub use error::{Result, ZkError};
pub use group::{Fr, G1Affine, G2Affine};
pub use kzg::{KzgOpening, KzgSrs};
pub use setup::{setup, setup_with_rng, Basis, ProvingKey, Trapdoor, VerifyingKey};
pub use transcript::Transcript;
pub use verifier::verify_all;

/// Deterministic test RNG with the same seed as `crate::test_rng()`, but
/// returned as the concrete `StdRng` so it satisfies `CryptoRng` bounds.
#[cfg(test)]
pub(crate) fn test_rng() -> rand::rngs::StdRng {
    use rand::SeedableRng;
    let seed = [
        1, 0, 0, 0, 23, 0, 0, 0, 200, 1, 0, 0, 210, 30, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0,
    ];
    rand::rngs::StdRng::from_seed(seed)
}
