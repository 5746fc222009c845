//! Groth16 prover/verifier orchestration and the engine's boundary API.
//!
//! Every statement family funnels through the same pipeline: build the
//! circuit (statement shape validated there), check the witness satisfies
//! every constraint, derive keys deterministically for the circuit
//! template, prove, and hand back owned byte containers. Verification
//! decodes the containers, rebuilds the public-input vector in circuit
//! order, and returns a plain boolean: malformed bytes and
//! cryptographically false proofs are observably identical to callers,
//! distinguished only in debug-level diagnostics.

use crate::circuit::rewarding::encrypt_deterministic;
use crate::circuit::zebralancer::hmac_bytes;
use crate::circuit::{
    BatchMaskCircuit, MaskCircuit, QualityCircuit, RewardingCircuit, ZebraLancerCircuit,
    bytes_to_field_elems, tag_to_field,
};
use crate::constants::{
    BATCH_MASK_DOMAIN, MASK_DOMAIN, QUALITY_DOMAIN, REWARDING_DOMAIN, SIGMA_MULTIPLIER, TAG_BYTES,
    ZEBRALANCER_DOMAIN,
};
use crate::error::ProofError;
use crate::types::{
    BatchProof, BatchProofPackage, DataEvaluation, Proof, ProofPackage, RewardedRecord,
    VerificationKey, ZebraLancerStatement, ZebraLancerWitness,
};
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof as Groth16Proof, ProvingKey, VerifyingKey, prepare_verifying_key};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, SynthesisError};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::OnceLock;

type Keys = (ProvingKey<Bn254>, VerifyingKey<Bn254>);

/// Seed for deterministic circuit setup, derived from the statement family
/// and its shape parameter. Acts as the fixed public reference string: the
/// same template always yields the same keypair.
fn setup_seed(family: &str, shape: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    let tag = family.as_bytes();
    let n = tag.len().min(24);
    seed[..n].copy_from_slice(&tag[..n]);
    seed[24..].copy_from_slice(&shape.to_le_bytes());
    seed
}

fn synthesis_failure(e: SynthesisError) -> ProofError {
    match e {
        SynthesisError::Unsatisfiable => ProofError::UnsatisfiedConstraint,
        other => ProofError::CryptographicFailure(format!("synthesis: {other}")),
    }
}

/// Exhaustively checks the assignment before any commitment work, so a
/// silently-invalid proof can never be produced.
fn check_satisfied<C: ConstraintSynthesizer<Fr>>(circuit: C) -> Result<(), ProofError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).map_err(synthesis_failure)?;
    if !cs.is_satisfied().map_err(synthesis_failure)? {
        return Err(ProofError::UnsatisfiedConstraint);
    }
    Ok(())
}

fn setup_keys<C: ConstraintSynthesizer<Fr>>(
    circuit: C,
    family: &str,
    shape: u64,
) -> Result<Keys, ProofError> {
    let mut rng = ChaCha20Rng::from_seed(setup_seed(family, shape));
    let pk = Groth16::<Bn254>::generate_random_parameters_with_reduction(circuit, &mut rng)
        .map_err(|e| ProofError::CryptographicFailure(format!("setup: {e}")))?;
    let vk = pk.vk.clone();
    Ok((pk, vk))
}

fn prove_and_package<C: ConstraintSynthesizer<Fr>>(
    circuit: C,
    keys: &Keys,
) -> Result<ProofPackage, ProofError> {
    let mut rng = rand::thread_rng();
    let proof = Groth16::<Bn254>::create_random_proof_with_reduction(circuit, &keys.0, &mut rng)
        .map_err(|e| ProofError::CryptographicFailure(format!("prove: {e}")))?;

    let mut proof_bytes = Vec::new();
    proof
        .serialize_compressed(&mut proof_bytes)
        .map_err(|e| ProofError::CryptographicFailure(format!("serialize proof: {e}")))?;
    let mut vk_bytes = Vec::new();
    keys.1
        .serialize_compressed(&mut vk_bytes)
        .map_err(|e| ProofError::CryptographicFailure(format!("serialize key: {e}")))?;

    Ok(ProofPackage {
        proof: Proof::from_bytes(proof_bytes),
        verify_key: VerificationKey::from_bytes(vk_bytes),
    })
}

/// Decode-then-verify. Any decoding failure or cryptographic rejection is
/// `false`; the two are distinguished only in diagnostics.
fn verify_with_inputs(
    family: &str,
    proof: &Proof,
    verify_key: &VerificationKey,
    inputs: &[Fr],
) -> bool {
    let proof = match Groth16Proof::<Bn254>::deserialize_compressed(proof.as_bytes()) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(family, error = %e, "proof bytes failed to decode");
            return false;
        }
    };
    let vk = match VerifyingKey::<Bn254>::deserialize_compressed(verify_key.as_bytes()) {
        Ok(vk) => vk,
        Err(e) => {
            tracing::debug!(family, error = %e, "verification key bytes failed to decode");
            return false;
        }
    };

    let pvk = prepare_verifying_key(&vk);
    match Groth16::<Bn254>::verify_proof(&pvk, &proof, inputs) {
        Ok(true) => true,
        Ok(false) => {
            tracing::debug!(family, "proof rejected");
            false
        }
        Err(e) => {
            // Covers input-arity mismatches from foreign keys as well.
            tracing::debug!(family, error = %e, "verification errored");
            false
        }
    }
}

// Fixed-shape families reuse one deterministic keypair for the process
// lifetime; read-only after first initialization.
static MASK_KEYS: OnceLock<Keys> = OnceLock::new();
static QUALITY_KEYS: OnceLock<Keys> = OnceLock::new();

fn mask_keys() -> Result<&'static Keys, ProofError> {
    if let Some(keys) = MASK_KEYS.get() {
        return Ok(keys);
    }
    let keys = setup_keys(MaskCircuit::blank(), MASK_DOMAIN, 1)?;
    Ok(MASK_KEYS.get_or_init(|| keys))
}

fn quality_keys() -> Result<&'static Keys, ProofError> {
    if let Some(keys) = QUALITY_KEYS.get() {
        return Ok(keys);
    }
    let keys = setup_keys(QualityCircuit::blank(), QUALITY_DOMAIN, 1)?;
    Ok(QUALITY_KEYS.get_or_init(|| keys))
}

/// Prove `value + mask == masked_value` without revealing value or mask.
pub fn generate_proof_mask(
    value: u64,
    mask: u64,
    masked_value: u64,
) -> Result<ProofPackage, ProofError> {
    let circuit = MaskCircuit::new(value, mask, masked_value);
    check_satisfied(circuit.clone())?;
    prove_and_package(circuit, mask_keys()?)
}

pub fn verify_proof_mask(masked_value: u64, proof: &Proof, verify_key: &VerificationKey) -> bool {
    verify_with_inputs(MASK_DOMAIN, proof, verify_key, &[Fr::from(masked_value)])
}

/// Fold `count` masking instances into one proof. The three slices
/// correspond index-for-index.
pub fn generate_proof_batch_mask(
    values: &[u64],
    masks: &[u64],
    masked_values: &[u64],
) -> Result<BatchProofPackage, ProofError> {
    let circuit = BatchMaskCircuit::new(values, masks, masked_values)?;
    let count = circuit.count();
    check_satisfied(circuit.clone())?;

    let keys = setup_keys(
        BatchMaskCircuit::blank(count),
        BATCH_MASK_DOMAIN,
        count as u64,
    )?;
    let package = prove_and_package(circuit, &keys)?;
    Ok(BatchProofPackage {
        proof: BatchProof::new(package.proof, count as u32),
        verify_key: package.verify_key,
    })
}

pub fn verify_proof_batch_mask(
    masked_values: &[u64],
    count: usize,
    proof: &BatchProof,
    verify_key: &VerificationKey,
) -> bool {
    if count == 0 || masked_values.len() != count || proof.count() != count {
        tracing::debug!(
            family = BATCH_MASK_DOMAIN,
            count,
            supplied = masked_values.len(),
            recorded = proof.count(),
            "batch count mismatch"
        );
        return false;
    }
    let inputs: Vec<Fr> = masked_values.iter().copied().map(Fr::from).collect();
    verify_with_inputs(BATCH_MASK_DOMAIN, proof.proof(), verify_key, &inputs)
}

/// Host-side mirror of the quality circuit's output computation.
///
/// Fails with `MalformedStatement` when the score falls outside the
/// three-sigma window (the circuit outputs would wrap and never match a
/// u64 evaluation).
pub fn evaluate_quality(mu: u64, sigma: u64, value: u64) -> Result<DataEvaluation, ProofError> {
    let window =
        || ProofError::MalformedStatement("data quality outside the three-sigma window".into());
    let spread = SIGMA_MULTIPLIER.checked_mul(sigma).ok_or_else(window)?;
    let centered = value.checked_sub(mu).ok_or_else(window)?;
    Ok(DataEvaluation {
        add: centered.checked_add(spread).ok_or_else(window)?,
        minus: centered.checked_sub(spread).ok_or_else(window)?,
    })
}

/// Prove the two observation points of the echain quality chain.
pub fn generate_proof_echain(mu: u64, sigma: u64, value: u64) -> Result<ProofPackage, ProofError> {
    let circuit = QualityCircuit::new(mu, sigma, value);
    check_satisfied(circuit.clone())?;
    prove_and_package(circuit, quality_keys()?)
}

pub fn verify_proof_echain(
    evaluation: DataEvaluation,
    proof: &Proof,
    verify_key: &VerificationKey,
) -> bool {
    let inputs = [Fr::from(evaluation.minus), Fr::from(evaluation.add)];
    verify_with_inputs(QUALITY_DOMAIN, proof, verify_key, &inputs)
}

/// The transport tags a worker publishes alongside its ciphertexts:
/// `t1 = HMAC-SHA256(prefix, sk)` and `t2 = HMAC-SHA256(prefix || msg, sk)`.
pub fn transport_tags(
    prefix: &[u8],
    msg: &[u8],
    sk: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), ProofError> {
    let prefix_msg: Vec<u8> = prefix.iter().chain(msg).copied().collect();
    Ok((hmac_bytes(prefix, sk)?, hmac_bytes(&prefix_msg, sk)?))
}

/// Prove possession of a certified credential triple matching the
/// statement's transport tags.
pub fn generate_proof_zebralancer(
    statement: &ZebraLancerStatement,
    witness: &ZebraLancerWitness,
) -> Result<ProofPackage, ProofError> {
    let circuit = ZebraLancerCircuit::new(statement, witness)?;
    let shape = circuit.public_input_len() as u64;
    check_satisfied(circuit.clone())?;

    let keys = setup_keys(circuit.clone(), ZEBRALANCER_DOMAIN, shape)?;
    prove_and_package(circuit, &keys)
}

pub fn verify_proof_zebralancer(
    statement: &ZebraLancerStatement,
    proof: &Proof,
    verify_key: &VerificationKey,
) -> bool {
    if statement.t1.len() != TAG_BYTES || statement.t2.len() != TAG_BYTES {
        tracing::debug!(family = ZEBRALANCER_DOMAIN, "transport tags have wrong width");
        return false;
    }
    let prefix_msg: Vec<u8> = statement
        .prefix
        .iter()
        .chain(&statement.msg)
        .copied()
        .collect();

    let mut inputs = bytes_to_field_elems(&statement.mpk);
    inputs.extend(bytes_to_field_elems(&prefix_msg));
    inputs.push(tag_to_field(&statement.t1));
    inputs.push(tag_to_field(&statement.t2));
    verify_with_inputs(ZEBRALANCER_DOMAIN, proof, verify_key, &inputs)
}

/// Deterministic record encryption matching the rewarding circuit.
/// Publishers must use this to produce the ciphertexts the statement binds.
pub fn encrypt_record(public_key: &RsaPublicKey, raw: &[u8]) -> Result<Vec<u8>, ProofError> {
    encrypt_deterministic(public_key, raw)
}

/// Prove that every published ciphertext encrypts a record the prover
/// holds, and that each record's evaluation pair was scored correctly.
pub fn generate_proof_zebralancer_rewarding(
    mu: u64,
    sigma: u64,
    records: &[RewardedRecord],
    ciphertexts: &[Vec<u8>],
    public_key: &RsaPublicKey,
    private_key: &RsaPrivateKey,
) -> Result<ProofPackage, ProofError> {
    if records.is_empty() {
        return Err(ProofError::ArityMismatch { expected: 1, got: 0 });
    }
    if records.len() != ciphertexts.len() {
        return Err(ProofError::ArityMismatch {
            expected: records.len(),
            got: ciphertexts.len(),
        });
    }

    let circuit = RewardingCircuit::new(mu, sigma, records, ciphertexts, public_key, private_key)?;
    let shape = circuit.public_input_len() as u64;
    check_satisfied(circuit.clone())?;

    let keys = setup_keys(circuit.clone(), REWARDING_DOMAIN, shape)?;
    prove_and_package(circuit, &keys)
}

pub fn verify_proof_zebralancer_rewarding(
    evaluations: &[DataEvaluation],
    ciphertexts: &[Vec<u8>],
    proof: &Proof,
    verify_key: &VerificationKey,
) -> bool {
    if evaluations.is_empty() || evaluations.len() != ciphertexts.len() {
        tracing::debug!(
            family = REWARDING_DOMAIN,
            evaluations = evaluations.len(),
            ciphertexts = ciphertexts.len(),
            "record count mismatch"
        );
        return false;
    }

    let mut inputs = Vec::new();
    for ciphertext in ciphertexts {
        inputs.extend(bytes_to_field_elems(ciphertext));
    }
    for evaluation in evaluations {
        inputs.push(Fr::from(evaluation.minus));
        inputs.push(Fr::from(evaluation.add));
    }
    verify_with_inputs(REWARDING_DOMAIN, proof, verify_key, &inputs)
}
