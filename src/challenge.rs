//! Fiat-Shamir challenge generators
//!
//! Challenges are SHA-1 digests of the decimal form of the commitments,
//! read as big-endian integers. The digest is part of the persisted proof
//! format: changing it invalidates every proof already published.

use sha1::{Digest, Sha1};

use crate::bigint::BigNum;
use crate::types::Commitment;

/// Hash a string to an integer (SHA-1, big-endian)
pub fn hash_to_bignum(input: &str) -> BigNum {
    BigNum::from_bytes_be(&Sha1::digest(input.as_bytes()))
}

/// SHA-1 of a string as colon-separated uppercase hex
pub fn sha1_fingerprint(input: &str) -> String {
    format_fingerprint(&Sha1::digest(input.as_bytes()))
}

pub(crate) fn format_fingerprint(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Challenge over a list of commitments: `H("A0,B0,A1,B1,...")`
pub fn disjunctive_challenge(commitments: &[Commitment]) -> BigNum {
    let parts: Vec<String> = commitments
        .iter()
        .flat_map(|c| [c.a.to_string(), c.b.to_string()])
        .collect();

    hash_to_bignum(&parts.join(","))
}

/// Challenge for a single `(A, B)` commitment: `H("A,B")`
pub fn fiat_shamir_challenge(commitment: &Commitment) -> BigNum {
    disjunctive_challenge(std::slice::from_ref(commitment))
}

/// Challenge for a discrete-log commitment: `H(commitment)`
pub fn dlog_challenge(commitment: &BigNum) -> BigNum {
    hash_to_bignum(&commitment.to_string())
}
