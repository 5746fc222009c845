//! Crate-wide constants shared by the circuits and host-side orchestration.

/// Bytes consumed per field element when chunking byte strings (keys,
/// messages, ciphertexts) into BN254 scalars.
///
/// 31 bytes always fit below the ~254-bit modulus, so the chunk -> field
/// mapping is injective and prover/verifier encodings can never disagree
/// through modular reduction.
pub const FIELD_CHUNK_BYTES: usize = 31;

/// Transport tags (HMAC-SHA256 outputs) are fixed-width.
pub const TAG_BYTES: usize = 32;

/// ed25519 key and signature widths used by the ZebraLancer statement.
pub const ED25519_PUBLIC_BYTES: usize = 32;
pub const ED25519_KEYPAIR_BYTES: usize = 64;
pub const ED25519_SIGNATURE_BYTES: usize = 64;

/// Multiplier in the three-sigma quality rule: a record is scored against
/// the window `(value - mu) ± 3 * sigma`.
pub const SIGMA_MULTIPLIER: u64 = 3;

// Domain tags for deterministic circuit setup. Each statement family (and,
// for counted families, each count) derives its own ChaCha20 seed so keys
// from different families can never coincide.
pub(crate) const MASK_DOMAIN: &str = "mask";
pub(crate) const BATCH_MASK_DOMAIN: &str = "batch-mask";
pub(crate) const QUALITY_DOMAIN: &str = "echain-quality";
pub(crate) const ZEBRALANCER_DOMAIN: &str = "zebralancer";
pub(crate) const REWARDING_DOMAIN: &str = "zebralancer-rewarding";
