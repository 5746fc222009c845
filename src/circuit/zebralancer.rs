//! Credential-bound witness-disclosure circuit (the ZebraLancer statement).
//!
//! The prover holds a secret-key/public-key/certificate triple issued under
//! a master public key `mpk` and shows, without revealing the triple, that:
//! the certificate verifies over `pk` under `mpk`; `sk` derives `pk`; and
//! the public transport tags `t1`/`t2` are the HMAC-SHA256 bindings of `sk`
//! to the task prefix and message. The statement bytes (`mpk`,
//! `prefix || msg`) are additionally re-encoded inside the circuit and
//! pinned to the public inputs so the proof cannot be replayed against a
//! different task.

use crate::circuit::{bytes_to_field_elems, tag_to_field};
use crate::constants::{
    ED25519_KEYPAIR_BYTES, ED25519_PUBLIC_BYTES, ED25519_SIGNATURE_BYTES, TAG_BYTES,
};
use crate::error::ProofError;
use crate::types::{ZebraLancerStatement, ZebraLancerWitness};
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ed25519_dalek::{Signature, SigningKey, Verifier, VerifyingKey};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// `HMAC-SHA256(key, data)` as raw tag bytes.
pub(crate) fn hmac_bytes(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProofError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ProofError::CryptographicFailure(format!("hmac key: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Computes `HMAC-SHA256(key, sk_bytes)` as a field element.
pub(crate) fn hmac_tag_field(key: &[u8], sk_bytes: &[u8]) -> Result<Fr, ProofError> {
    Ok(tag_to_field(&hmac_bytes(key, sk_bytes)?))
}

#[derive(Clone, Debug)]
pub struct ZebraLancerCircuit {
    /// Witness-side re-encodings of the statement bytes.
    mpk_elems: Vec<Fr>,
    prefix_msg_elems: Vec<Fr>,
    /// Witness bits: certificate validity and sk -> pk consistency, each 1
    /// exactly when the native check passed.
    cert_ok: Fr,
    key_ok: Fr,
    /// Witness-side recomputed tags.
    tag_one: Fr,
    tag_two: Fr,
    /// Public inputs, in allocation order after the byte chunks.
    public_t1: Fr,
    public_t2: Fr,
}

fn fixed<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N], ProofError> {
    <[u8; N]>::try_from(bytes).map_err(|_| {
        ProofError::MalformedStatement(format!(
            "{what}: expected {N} bytes, got {}",
            bytes.len()
        ))
    })
}

impl ZebraLancerCircuit {
    /// Parses and natively evaluates the credential checks, then fixes the
    /// resulting assignment. Unparseable key, signature, or tag bytes are a
    /// malformed statement; a parseable-but-false credential only shows up
    /// later as an unsatisfied constraint.
    pub fn new(
        statement: &ZebraLancerStatement,
        witness: &ZebraLancerWitness,
    ) -> Result<Self, ProofError> {
        let mpk = VerifyingKey::from_bytes(&fixed::<ED25519_PUBLIC_BYTES>(&statement.mpk, "mpk")?)
            .map_err(|e| ProofError::MalformedStatement(format!("mpk: {e}")))?;
        let pk = VerifyingKey::from_bytes(&fixed::<ED25519_PUBLIC_BYTES>(&witness.pk, "pk")?)
            .map_err(|e| ProofError::MalformedStatement(format!("pk: {e}")))?;
        let sk =
            SigningKey::from_keypair_bytes(&fixed::<ED25519_KEYPAIR_BYTES>(&witness.sk, "sk")?)
                .map_err(|e| ProofError::MalformedStatement(format!("sk: {e}")))?;
        let cert =
            Signature::from_bytes(&fixed::<ED25519_SIGNATURE_BYTES>(&witness.cert, "cert")?);
        let _ = fixed::<TAG_BYTES>(&statement.t1, "t1")?;
        let _ = fixed::<TAG_BYTES>(&statement.t2, "t2")?;

        let cert_ok = if mpk.verify(&witness.pk, &cert).is_ok() {
            Fr::from(1u64)
        } else {
            Fr::from(0u64)
        };
        let key_ok = if sk.verifying_key() == pk {
            Fr::from(1u64)
        } else {
            Fr::from(0u64)
        };

        let prefix_msg: Vec<u8> = statement
            .prefix
            .iter()
            .chain(&statement.msg)
            .copied()
            .collect();

        Ok(Self {
            mpk_elems: bytes_to_field_elems(&statement.mpk),
            prefix_msg_elems: bytes_to_field_elems(&prefix_msg),
            cert_ok,
            key_ok,
            tag_one: hmac_tag_field(&statement.prefix, &witness.sk)?,
            tag_two: hmac_tag_field(&prefix_msg, &witness.sk)?,
            public_t1: tag_to_field(&statement.t1),
            public_t2: tag_to_field(&statement.t2),
        })
    }

    /// Number of public inputs this instance allocates; used to derive the
    /// setup seed for its shape.
    pub fn public_input_len(&self) -> usize {
        self.mpk_elems.len() + self.prefix_msg_elems.len() + 2
    }
}

impl ConstraintSynthesizer<Fr> for ZebraLancerCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Pin the statement bytes: every public chunk must equal its
        // witness-side re-encoding.
        for elem in self.mpk_elems.iter().chain(&self.prefix_msg_elems) {
            let witness = FpVar::<Fr>::new_witness(cs.clone(), || Ok(*elem))?;
            let input = FpVar::<Fr>::new_input(cs.clone(), || Ok(*elem))?;
            witness.enforce_equal(&input)?;
        }

        let cert_ok = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.cert_ok))?;
        cert_ok.enforce_equal(&FpVar::one())?;

        let key_ok = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.key_ok))?;
        key_ok.enforce_equal(&FpVar::one())?;

        let tag_one = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.tag_one))?;
        let tag_two = FpVar::<Fr>::new_witness(cs.clone(), || Ok(self.tag_two))?;
        let t1 = FpVar::<Fr>::new_input(cs.clone(), || Ok(self.public_t1))?;
        let t2 = FpVar::<Fr>::new_input(cs, || Ok(self.public_t2))?;
        tag_one.enforce_equal(&t1)?;
        tag_two.enforce_equal(&t2)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_relations::r1cs::ConstraintSystem;
    use ed25519_dalek::Signer;

    fn sample() -> (ZebraLancerStatement, ZebraLancerWitness) {
        let sk = SigningKey::from_bytes(&[7u8; 32]);
        let master = SigningKey::from_bytes(&[9u8; 32]);
        let pk = sk.verifying_key();
        let cert = master.sign(pk.as_bytes());

        let prefix = b"hello".to_vec();
        let msg = b" world.".to_vec();
        let sk_bytes = sk.to_keypair_bytes().to_vec();

        let mut mac = HmacSha256::new_from_slice(&prefix).unwrap();
        mac.update(&sk_bytes);
        let t1 = mac.finalize().into_bytes().to_vec();

        let prefix_msg: Vec<u8> = prefix.iter().chain(&msg).copied().collect();
        let mut mac = HmacSha256::new_from_slice(&prefix_msg).unwrap();
        mac.update(&sk_bytes);
        let t2 = mac.finalize().into_bytes().to_vec();

        (
            ZebraLancerStatement {
                prefix,
                msg,
                mpk: master.verifying_key().to_bytes().to_vec(),
                t1,
                t2,
            },
            ZebraLancerWitness {
                sk: sk_bytes,
                pk: pk.to_bytes().to_vec(),
                cert: cert.to_bytes().to_vec(),
            },
        )
    }

    #[test]
    fn honest_credential_satisfies() {
        let (statement, witness) = sample();
        let circuit = ZebraLancerCircuit::new(&statement, &witness).unwrap();

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn foreign_certificate_is_unsatisfied() {
        let (statement, mut witness) = sample();
        // Certificate signed by an unrelated master.
        let rogue = SigningKey::from_bytes(&[13u8; 32]);
        witness.cert = rogue.sign(&witness.pk).to_bytes().to_vec();

        let circuit = ZebraLancerCircuit::new(&statement, &witness).unwrap();
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn short_mpk_is_malformed() {
        let (mut statement, witness) = sample();
        statement.mpk.truncate(16);
        let err = ZebraLancerCircuit::new(&statement, &witness).unwrap_err();
        assert!(matches!(err, ProofError::MalformedStatement(_)));
    }
}
