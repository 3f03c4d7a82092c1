//! Fiat-Shamir transcript for deriving combination coefficients
//!
//! Prover and verifier absorb the same public data in the same order and
//! obtain the same [`CombinationCoefficient`] without interaction. Every
//! absorbed item is length-prefixed and labelled so that distinct
//! transcripts cannot collide by concatenation.

use ark_ff::{PrimeField, Zero};
use sha2::{Digest, Sha256};

use crate::aggregation::CombinationCoefficient;
use crate::commitment::{Commitment, Proof};
use crate::config::ProtocolConfig;
use crate::error::Result;
use crate::group::{to_compressed_bytes, Fr};
use crate::setup::VerifyingKey;

/// SHA-256 based transcript
#[derive(Clone)]
pub struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    /// Start a transcript under a domain separator
    pub fn new(domain: &[u8]) -> Self {
        let mut transcript = Self {
            hasher: Sha256::new(),
        };
        transcript.append_message(b"domain", domain);
        transcript
    }

    /// Start a transcript with the configured domain separator
    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self::new(config.transcript_domain.as_bytes())
    }

    /// Absorb a labelled message
    pub fn append_message(&mut self, label: &[u8], message: &[u8]) {
        self.hasher.update((label.len() as u64).to_le_bytes());
        self.hasher.update(label);
        self.hasher.update((message.len() as u64).to_le_bytes());
        self.hasher.update(message);
    }

    /// Absorb a verifying key
    pub fn append_verifying_key(&mut self, vk: &VerifyingKey) -> Result<()> {
        self.append_message(b"vk", &vk.to_bytes()?);
        Ok(())
    }

    /// Absorb a commitment
    pub fn append_commitment(&mut self, commitment: &Commitment) -> Result<()> {
        self.append_message(b"commitment", &commitment.to_bytes()?);
        Ok(())
    }

    /// Absorb a list of commitments, including its length
    pub fn append_commitments(&mut self, commitments: &[Commitment]) -> Result<()> {
        self.append_message(b"count", &(commitments.len() as u64).to_le_bytes());
        for commitment in commitments {
            self.append_commitment(commitment)?;
        }
        Ok(())
    }

    /// Absorb a proof
    pub fn append_proof(&mut self, proof: &Proof) -> Result<()> {
        self.append_message(b"proof", &proof.to_bytes()?);
        Ok(())
    }

    /// Absorb a scalar
    pub fn append_scalar(&mut self, label: &[u8], scalar: &Fr) -> Result<()> {
        self.append_message(label, &to_compressed_bytes(scalar)?);
        Ok(())
    }

    /// Squeeze a non-zero combination coefficient.
    ///
    /// The transcript keeps absorbing afterwards, so a second call yields an
    /// independent coefficient.
    pub fn challenge_coefficient(&mut self) -> CombinationCoefficient {
        let mut counter = 0u64;
        loop {
            let mut fork = self.hasher.clone();
            fork.update(b"challenge");
            fork.update(counter.to_le_bytes());
            let digest = fork.finalize();

            let value = Fr::from_le_bytes_mod_order(&digest);
            if !value.is_zero() {
                self.append_message(b"challenge", &digest);
                return CombinationCoefficient(value);
            }
            counter += 1;
        }
    }
}
