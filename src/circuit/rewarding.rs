//! Rewarding circuit: per-record quality scoring bound to published
//! ciphertexts (the zebralancer-rewarding statement).
//!
//! The prover holds an RSA keypair and `count` raw records. Publicly known
//! are the RSA-OAEP ciphertexts of those records and, per record, the
//! three-sigma evaluation pair. The circuit enforces that the keypair is
//! consistent, that each record re-encrypts to its published ciphertext,
//! and that every evaluation pair was computed from the hidden score under
//! the shared `mu`/`sigma`.
//!
//! Encryption inside a statement must be reproducible, so OAEP runs with an
//! all-zero RNG; both the prover and whoever published the ciphertexts use
//! [`encrypt_deterministic`].

use crate::circuit::bytes_to_field_elems;
use crate::constants::SIGMA_MULTIPLIER;
use crate::error::ProofError;
use crate::types::RewardedRecord;
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use rand::{CryptoRng, RngCore};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// RNG that always yields zero, making OAEP padding deterministic.
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ZeroRng {}

/// RSA-OAEP(SHA-256) with zeroed padding randomness.
pub(crate) fn encrypt_deterministic(
    public_key: &RsaPublicKey,
    raw: &[u8],
) -> Result<Vec<u8>, ProofError> {
    public_key
        .encrypt(&mut ZeroRng, Oaep::new::<Sha256>(), raw)
        .map_err(|e| ProofError::MalformedStatement(format!("record does not fit OAEP: {e}")))
}

#[derive(Clone)]
struct RecordAssignment {
    /// Witness: chunks of the re-encrypted raw record.
    enc_elems: Vec<Fr>,
    /// Public: chunks of the published ciphertext.
    ct_elems: Vec<Fr>,
    /// Witness: the record's quality score.
    quality: Fr,
    /// Public evaluation pair.
    out_minus: Fr,
    out_add: Fr,
}

#[derive(Clone)]
pub struct RewardingCircuit {
    /// Witness bit: public key derives from the private key.
    key_ok: Fr,
    mu: Fr,
    sigma: Fr,
    records: Vec<RecordAssignment>,
}

impl RewardingCircuit {
    /// Re-encrypts every record under the caller's keys and fixes the full
    /// assignment. Array lengths must already agree (checked at the
    /// boundary); a ciphertext of the wrong width for the key is a
    /// malformed statement.
    pub fn new(
        mu: u64,
        sigma: u64,
        records: &[RewardedRecord],
        ciphertexts: &[Vec<u8>],
        public_key: &RsaPublicKey,
        private_key: &RsaPrivateKey,
    ) -> Result<Self, ProofError> {
        let key_ok = if &private_key.to_public_key() == public_key {
            Fr::from(1u64)
        } else {
            Fr::from(0u64)
        };

        let (mu_f, sigma_f) = (Fr::from(mu), Fr::from(sigma));
        let spread = Fr::from(SIGMA_MULTIPLIER) * sigma_f;

        let mut assignments = Vec::with_capacity(records.len());
        for (record, ciphertext) in records.iter().zip(ciphertexts) {
            let enc = encrypt_deterministic(public_key, &record.raw)?;
            let enc_elems = bytes_to_field_elems(&enc);
            let ct_elems = bytes_to_field_elems(ciphertext);
            if enc_elems.len() != ct_elems.len() {
                return Err(ProofError::MalformedStatement(format!(
                    "ciphertext width {} does not match key width {}",
                    ciphertext.len(),
                    enc.len()
                )));
            }

            let quality = Fr::from(record.quality);
            let centered = quality - mu_f;
            assignments.push(RecordAssignment {
                enc_elems,
                ct_elems,
                quality,
                out_minus: centered - spread,
                out_add: centered + spread,
            });
        }

        Ok(Self {
            key_ok,
            mu: mu_f,
            sigma: sigma_f,
            records: assignments,
        })
    }

    pub fn public_input_len(&self) -> usize {
        self.records.iter().map(|r| r.ct_elems.len() + 2).sum()
    }
}

impl ConstraintSynthesizer<Fr> for RewardingCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let key_ok = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.key_ok))?;
        key_ok.enforce_equal(&FpVar::one())?;

        // Ciphertext binding, record by record.
        for record in &self.records {
            for (enc, ct) in record.enc_elems.iter().zip(&record.ct_elems) {
                let witness = FpVar::<Fr>::new_witness(cs.clone(), || Ok(*enc))?;
                let input = FpVar::<Fr>::new_input(cs.clone(), || Ok(*ct))?;
                witness.enforce_equal(&input)?;
            }
        }

        let mu = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.mu))?;
        let sigma = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.sigma))?;
        let spread = &sigma * &FpVar::constant(Fr::from(SIGMA_MULTIPLIER));

        for record in &self.records {
            let quality = FpVar::<Fr>::new_witness(cs.clone(), || Ok(record.quality))?;
            let out_minus = FpVar::<Fr>::new_input(cs.clone(), || Ok(record.out_minus))?;
            let out_add = FpVar::<Fr>::new_input(cs.clone(), || Ok(record.out_add))?;

            let centered = &quality - &mu;
            (&centered - &spread).enforce_equal(&out_minus)?;
            (&centered + &spread).enforce_equal(&out_add)?;
        }

        Ok(())
    }
}
