//! Core types and data structures

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bigint::BigNum;
use crate::challenge::hash_to_bignum;
use crate::keys::PublicKey;

/// Message encoded as an integer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Plaintext {
    pub(crate) m: BigNum,
}

impl Plaintext {
    pub fn new(m: BigNum) -> Self {
        Plaintext { m }
    }

    /// Encode a string by hashing it to an integer
    pub fn from_string(s: &str) -> Self {
        Plaintext::new(hash_to_bignum(s))
    }

    pub fn from_strings<S: AsRef<str>>(list: &[S]) -> Vec<Self> {
        list.iter().map(|s| Plaintext::from_string(s.as_ref())).collect()
    }

    pub fn m(&self) -> &BigNum {
        &self.m
    }

    /// Whether this plaintext is the hash encoding of `s`
    pub fn matches_string(&self, s: &str) -> bool {
        hash_to_bignum(s) == self.m
    }
}

impl From<BigNum> for Plaintext {
    fn from(m: BigNum) -> Self {
        Plaintext::new(m)
    }
}

impl From<u64> for Plaintext {
    fn from(m: u64) -> Self {
        Plaintext::new(m.into())
    }
}

impl fmt::Display for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.m)
    }
}

/// First message `(A, B)` of a sigma protocol
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Commitment {
    #[cfg_attr(feature = "serde", serde(rename = "A"))]
    pub a: BigNum,
    #[cfg_attr(feature = "serde", serde(rename = "B"))]
    pub b: BigNum,
}

impl Commitment {
    pub fn new(a: BigNum, b: BigNum) -> Self {
        Commitment { a, b }
    }
}

/// ElGamal ciphertext `(alpha, beta) = (g^r, y^r * m)` bound to its public key
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ciphertext {
    pub(crate) alpha: BigNum,
    pub(crate) beta: BigNum,
    pub(crate) pk: PublicKey,
}

impl Ciphertext {
    /// Create a new ciphertext
    pub fn new(alpha: BigNum, beta: BigNum, pk: PublicKey) -> Self {
        Ciphertext { alpha, beta, pk }
    }

    /// Get the first component
    pub fn alpha(&self) -> &BigNum {
        &self.alpha
    }

    /// Get the second component
    pub fn beta(&self) -> &BigNum {
        &self.beta
    }

    /// Get the public key this ciphertext was produced under
    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    /// Drop the key, keeping only `(alpha, beta)`
    pub fn data(&self) -> CiphertextData {
        CiphertextData {
            alpha: self.alpha.clone(),
            beta: self.beta.clone(),
        }
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.alpha.to_bytes_be().len() + self.beta.to_bytes_be().len()
    }
}

/// Key-less `{alpha, beta}` projection of a ciphertext
///
/// Used where the ciphertext only feeds a hash or travels separately from
/// its key. Rebind with [`CiphertextData::bind`] before doing algebra.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CiphertextData {
    pub alpha: BigNum,
    pub beta: BigNum,
}

impl CiphertextData {
    pub fn new(alpha: BigNum, beta: BigNum) -> Self {
        CiphertextData { alpha, beta }
    }

    pub fn bind(self, pk: PublicKey) -> Ciphertext {
        Ciphertext::new(self.alpha, self.beta, pk)
    }
}

impl From<Ciphertext> for CiphertextData {
    fn from(ct: Ciphertext) -> Self {
        CiphertextData {
            alpha: ct.alpha,
            beta: ct.beta,
        }
    }
}
