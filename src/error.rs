//! Error taxonomy shared by statement construction, proving and encoding.
//!
//! Verification-time failures (cryptographic falsity, bad proof bytes) never
//! surface through this type at the public boundary; `verify_*` collapses
//! them to `false` so a failed proof does not reveal why it failed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProofError {
    /// Public inputs do not match the shape the statement family expects.
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// The witness does not satisfy the statement circuit.
    ///
    /// Deliberately carries no detail: witness values must not leak through
    /// error messages.
    #[error("witness does not satisfy the statement circuit")]
    UnsatisfiedConstraint,

    /// Proof or key bytes failed to decode.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Batch arrays disagree on length, or a batch is empty.
    #[error("arity mismatch: expected {expected} elements, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// An underlying field/group operation violated an invariant. Unexpected;
    /// not a normal proof rejection.
    #[error("cryptographic failure: {0}")]
    CryptographicFailure(String),
}
