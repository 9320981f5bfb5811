//! Key generation and management

use std::fmt;

use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bigint::BigNum;
use crate::challenge::format_fingerprint;
use crate::error::{ElGamalError, Result};
use crate::params::CryptoSystem;
use crate::utils::random_below;

/// Number of digest bytes shown in a key fingerprint
const FINGERPRINT_BYTES: usize = 20;

/// ElGamal public key
///
/// Every key of a deployment shares the same `(p, q, g)`; only `y` differs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PublicKey {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub(crate) params: CryptoSystem,
    pub(crate) y: BigNum, // g^x mod p
}

impl PublicKey {
    /// Create a new public key
    pub fn new(params: CryptoSystem, y: BigNum) -> Self {
        PublicKey { params, y }
    }

    pub fn from_components(p: BigNum, q: BigNum, g: BigNum, y: BigNum) -> Self {
        PublicKey::new(CryptoSystem::new(p, q, g), y)
    }

    /// Get the domain parameters
    pub fn params(&self) -> &CryptoSystem {
        &self.params
    }

    pub fn p(&self) -> &BigNum {
        &self.params.p
    }

    pub fn q(&self) -> &BigNum {
        &self.params.q
    }

    pub fn g(&self) -> &BigNum {
        &self.params.g
    }

    /// Get the public component (g^x mod p)
    pub fn y(&self) -> &BigNum {
        &self.y
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.params.bit_size()
    }

    /// Whether both keys live in the same group
    pub fn is_compatible(&self, other: &PublicKey) -> bool {
        self.params == other.params
    }

    /// Validate the domain parameters and check that `y` is a subgroup element in `[1, p)`
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;

        if !self.y.is_positive() || &self.y >= self.p() {
            return Err(ElGamalError::InvalidParameter(
                "Public component y must be in range [1, p)".to_string(),
            ));
        }

        if !self.y.mod_pow(self.q(), self.p())?.is_one() {
            return Err(ElGamalError::InvalidParameter(
                "Public component y must lie in the order-q subgroup".to_string(),
            ));
        }

        Ok(())
    }

    /// Combine two keys into a joint key with `y = y1 * y2 mod p`
    ///
    /// A ciphertext under the joint key is decrypted by combining the
    /// decryption factors of both secret keys.
    pub fn multiply(&self, other: &PublicKey) -> Result<PublicKey> {
        if !self.is_compatible(other) {
            return Err(ElGamalError::IncompatibleKeys);
        }

        let y = (&self.y * &other.y).modulo(self.p())?;
        Ok(PublicKey::new(self.params.clone(), y))
    }

    /// Stable identifier: the first 20 bytes of SHA-256 over the decimal
    /// strings of `p`, `q`, `g`, `y`, as colon-separated uppercase hex
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.p().to_string());
        hasher.update(self.q().to_string());
        hasher.update(self.g().to_string());
        hasher.update(self.y.to_string());
        let digest = hasher.finalize();

        format_fingerprint(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bits, {})", self.bit_size(), self.fingerprint())
    }
}

/// ElGamal secret key, bound to the public key it decrypts for
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SecretKey {
    pub(crate) x: BigNum, // Secret exponent
    #[cfg_attr(feature = "serde", serde(rename = "publicKey"))]
    pub(crate) public_key: PublicKey,
}

impl SecretKey {
    /// Create a new secret key. `x` is expected in `[0, q)`.
    pub fn new(x: BigNum, public_key: PublicKey) -> Self {
        SecretKey { x, public_key }
    }

    /// Get the secret exponent
    pub fn x(&self) -> &BigNum {
        &self.x
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Whether `y = g^x mod p` holds for the bound public key
    pub fn matches_public_key(&self) -> Result<bool> {
        let pk = &self.public_key;
        Ok(pk.g().mod_pow(&self.x, pk.p())? == pk.y)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("x", &"***")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(***)")
    }
}

/// ElGamal key pair
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyPair {
    pub pk: PublicKey,
    pub sk: SecretKey,
}

impl KeyPair {
    /// Generate a key pair with `x` uniform in `[0, q)`
    pub fn create(params: &CryptoSystem, rng: &mut impl CryptoRngCore) -> Result<Self> {
        let x = random_below(params.q(), rng)?;
        Self::create_with_private_key(params, x)
    }

    /// Deterministically derive the key pair for a known secret exponent in `[0, q)`
    pub fn create_with_private_key(params: &CryptoSystem, x: BigNum) -> Result<Self> {
        if x.is_negative() || &x >= params.q() {
            return Err(ElGamalError::InvalidParameter(
                "Secret exponent x must be in range [0, q)".to_string(),
            ));
        }
        let y = params.g().mod_pow(&x, params.p())?;
        let pk = PublicKey::new(params.clone(), y);
        let sk = SecretKey::new(x, pk.clone());

        Ok(KeyPair { pk, sk })
    }

    /// Get the bit size of the keys
    pub fn bit_size(&self) -> u64 {
        self.pk.bit_size()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({} bits)", self.bit_size())
    }
}
