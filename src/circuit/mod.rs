//! R1CS circuits for the supported statement families.
//!
//! One circuit template per family; every template implements
//! `ConstraintSynthesizer<Fr>` and is executed by the shared Groth16
//! orchestration in [`crate::groth16`].

pub mod mask;
pub mod quality;
pub mod rewarding;
pub mod zebralancer;

pub use mask::{BatchMaskCircuit, MaskCircuit};
pub use quality::QualityCircuit;
pub use rewarding::RewardingCircuit;
pub use zebralancer::ZebraLancerCircuit;

use crate::constants::FIELD_CHUNK_BYTES;
use ark_bn254::Fr;
use ark_ff::PrimeField;

/// Chunk a byte string into field elements, 31 bytes at a time.
///
/// The circuits compare byte strings (keys, messages, ciphertexts) as
/// sequences of scalars; prover and verifier must use this same encoding or
/// honest proofs would fail to verify.
pub(crate) fn bytes_to_field_elems(bytes: &[u8]) -> Vec<Fr> {
    bytes
        .chunks(FIELD_CHUNK_BYTES)
        .map(Fr::from_le_bytes_mod_order)
        .collect()
}

/// Map a fixed-width tag (an HMAC output) to a single scalar.
pub(crate) fn tag_to_field(bytes: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}
