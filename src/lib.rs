//! zk-SNARK statement proofs for masked data exchange.
//!
//! This crate contains:
//! - R1CS circuits for the supported statement families: masking equality
//!   (single and batched), three-sigma data-quality evaluation, and the
//!   credential-bound ZebraLancer variants.
//! - Groth16 prover + verifier orchestration with deterministic per-family
//!   circuit setup.
//! - Owned, length-aware containers for proofs and verification keys with
//!   canonical byte, base64 and hex encodings.
//!
//! Proving and verifying are pure, CPU-bound operations with no shared
//! mutable state; unrelated calls are safe to run concurrently.

pub mod circuit;
pub mod constants;
pub mod error;
pub mod groth16;
pub mod types;

pub use error::ProofError;
pub use groth16::{
    encrypt_record, evaluate_quality, generate_proof_batch_mask, generate_proof_echain,
    generate_proof_mask, generate_proof_zebralancer, generate_proof_zebralancer_rewarding,
    transport_tags, verify_proof_batch_mask, verify_proof_echain, verify_proof_mask,
    verify_proof_zebralancer, verify_proof_zebralancer_rewarding,
};
pub use types::{
    BatchProof, BatchProofPackage, DataEvaluation, Proof, ProofPackage, RewardedRecord,
    VerificationKey, ZebraLancerStatement, ZebraLancerWitness,
};
