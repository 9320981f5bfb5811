//! Error types for the ElGamal library

use thiserror::Error;

use crate::proofs::VerificationFailure;

pub type Result<T> = std::result::Result<T, ElGamalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElGamalError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Modulus must be positive")]
    InvalidModulus,

    #[error("No modular inverse exists")]
    NoInverseExists,

    #[error("Incompatible public keys: group parameters differ")]
    IncompatibleKeys,

    #[error("Ciphertexts were produced under different public keys")]
    KeyMismatch,

    #[error("Invalid real index {index} for {len} plaintexts")]
    InvalidRealIndex { index: usize, len: usize },

    #[error("Invalid parameter size: {bits} bits (must be at least {min})")]
    ParameterSize { bits: u64, min: u64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Message cannot be encoded into the subgroup: {0}")]
    MessageNotEncodable(String),

    #[error("Parameter search aborted")]
    SearchAborted,

    #[error("Verification failed: {0}")]
    VerificationFailed(#[from] VerificationFailure),
}
