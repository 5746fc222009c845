//! Types crossing the engine boundary: proof/key containers, statement
//! parameter bundles, and witness holders.
//!
//! Proof and key material is modeled as owned byte containers with explicit
//! lengths. The encodings are binary and may contain zero bytes, so nothing
//! here ever relies on a terminator; text transport uses base64 or hex.

use crate::error::ProofError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A succinct proof for one statement instance (or one folded batch).
///
/// Immutable once produced. `release` consumes the container, so a disposed
/// proof cannot be used again by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    bytes: Vec<u8>,
}

/// The public artifact derived from a circuit template; reusable across any
/// number of proofs of the same statement family and safely shareable
/// read-only between concurrent verifier calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    bytes: Vec<u8>,
}

macro_rules! byte_container {
    ($ty:ident, $what:literal) => {
        impl $ty {
            pub fn from_bytes(bytes: Vec<u8>) -> Self {
                Self { bytes }
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.bytes
            }

            pub fn len(&self) -> usize {
                self.bytes.len()
            }

            pub fn is_empty(&self) -> bool {
                self.bytes.is_empty()
            }

            pub fn to_base64(&self) -> String {
                BASE64.encode(&self.bytes)
            }

            pub fn from_base64(encoded: &str) -> Result<Self, ProofError> {
                let bytes = BASE64.decode(encoded).map_err(|e| {
                    ProofError::InvalidEncoding(format!(concat!($what, " base64: {}"), e))
                })?;
                Ok(Self { bytes })
            }

            pub fn to_hex(&self) -> String {
                hex::encode(&self.bytes)
            }

            pub fn from_hex(encoded: &str) -> Result<Self, ProofError> {
                let bytes = hex::decode(encoded).map_err(|e| {
                    ProofError::InvalidEncoding(format!(concat!($what, " hex: {}"), e))
                })?;
                Ok(Self { bytes })
            }

            /// Explicitly dispose of the container, scrubbing its buffer.
            ///
            /// Consuming `self` makes a second release (or any use after
            /// release) unrepresentable.
            pub fn release(mut self) {
                self.bytes.zeroize();
            }
        }
    };
}

byte_container!(Proof, "proof");
byte_container!(VerificationKey, "verification key");

/// Everything a single `generate_proof_*` call hands back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPackage {
    pub proof: Proof,
    pub verify_key: VerificationKey,
}

/// A proof whose circuit folds `count` statement instances.
///
/// The count travels with the proof and is matched against the number of
/// public inputs before any cryptographic work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProof {
    proof: Proof,
    count: u32,
}

impl BatchProof {
    pub fn new(proof: Proof, count: u32) -> Self {
        Self { proof, count }
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Canonical byte form: little-endian count prefix, then proof bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.proof.len());
        out.extend_from_slice(&self.count.to_le_bytes());
        out.extend_from_slice(self.proof.as_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofError> {
        if bytes.len() < 4 {
            return Err(ProofError::InvalidEncoding(
                "batch proof shorter than its count prefix".into(),
            ));
        }
        let mut count = [0u8; 4];
        count.copy_from_slice(&bytes[..4]);
        Ok(Self {
            proof: Proof::from_bytes(bytes[4..].to_vec()),
            count: u32::from_le_bytes(count),
        })
    }

    pub fn release(self) {
        self.proof.release();
    }
}

/// A batch generator's output: the folded proof plus its verification key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProofPackage {
    pub proof: BatchProof,
    pub verify_key: VerificationKey,
}

/// Per-record quality evaluation: `minus = (value - mu) - 3*sigma` and
/// `add = (value - mu) + 3*sigma`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEvaluation {
    pub add: u64,
    pub minus: u64,
}

/// Public parameters of a ZebraLancer statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZebraLancerStatement {
    /// Task prefix bytes.
    pub prefix: Vec<u8>,
    /// Task message bytes.
    pub msg: Vec<u8>,
    /// Master ed25519 public key that certified the worker.
    pub mpk: Vec<u8>,
    /// First transport tag: HMAC-SHA256(prefix, sk).
    pub t1: Vec<u8>,
    /// Second transport tag: HMAC-SHA256(prefix || msg, sk).
    pub t2: Vec<u8>,
}

/// Secret credential triple for the ZebraLancer statement.
///
/// `sk` holds the 64-byte ed25519 keypair encoding, `pk` the 32-byte public
/// half, `cert` the master's 64-byte signature over `pk`. All three buffers
/// are scrubbed when the witness is dropped, on every exit path.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ZebraLancerWitness {
    pub sk: Vec<u8>,
    pub pk: Vec<u8>,
    pub cert: Vec<u8>,
}

impl std::fmt::Debug for ZebraLancerWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("ZebraLancerWitness")
            .field("sk", &"<redacted>")
            .field("pk", &hex::encode(&self.pk))
            .field("cert", &"<redacted>")
            .finish()
    }
}

/// One secret record in a rewarding statement: the raw payload plus the
/// quality score assigned to it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RewardedRecord {
    pub raw: Vec<u8>,
    pub quality: u64,
}
