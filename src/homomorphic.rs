//! Homomorphic operations on ciphertexts

use std::fmt;

use rand_core::CryptoRngCore;

use crate::bigint::BigNum;
use crate::error::{ElGamalError, Result};
use crate::keys::PublicKey;
use crate::types::{Ciphertext, Plaintext};
use crate::utils::random_below;

impl Ciphertext {
    /// The neutral element `(1, 1)`: a trivial encryption of 1 under `pk`
    pub fn identity(pk: PublicKey) -> Self {
        Ciphertext::new(BigNum::one(), BigNum::one(), pk)
    }

    /// Component-wise product, an encryption of `m1 * m2 mod p`
    ///
    /// Both ciphertexts must have been produced under the same public key.
    pub fn multiply(&self, other: &Ciphertext) -> Result<Ciphertext> {
        if self.pk != other.pk {
            return Err(ElGamalError::KeyMismatch);
        }

        let p = self.pk.p();
        let alpha = (&self.alpha * &other.alpha).modulo(p)?;
        let beta = (&self.beta * &other.beta).modulo(p)?;

        Ok(Ciphertext::new(alpha, beta, self.pk.clone()))
    }

    /// Homomorphic product of every ciphertext in the batch
    ///
    /// An empty batch yields [`Ciphertext::identity`].
    pub fn product(pk: &PublicKey, ciphertexts: &[Ciphertext]) -> Result<Ciphertext> {
        ciphertexts
            .iter()
            .try_fold(Ciphertext::identity(pk.clone()), |acc, ct| acc.multiply(ct))
    }

    /// Re-randomize by multiplying with an encryption of 1 under randomness `r`
    pub fn reenc_with_r(&self, r: &BigNum) -> Result<Ciphertext> {
        let one = self.pk.encrypt_with_r(&Plaintext::new(BigNum::one()), r)?;
        self.multiply(&one)
    }

    /// Re-randomize with fresh `r` in `[0, q)` and hand `r` back to the caller
    pub fn reenc_return_r(&self, rng: &mut impl CryptoRngCore) -> Result<(Ciphertext, BigNum)> {
        let r = random_below(self.pk.q(), rng)?;
        let ciphertext = self.reenc_with_r(&r)?;
        Ok((ciphertext, r))
    }

    /// Re-randomize (produces a different encryption of the same plaintext)
    pub fn reenc(&self, rng: &mut impl CryptoRngCore) -> Result<Ciphertext> {
        self.reenc_return_r(rng).map(|(ciphertext, _)| ciphertext)
    }

    /// Combine partial decryptions: `beta / (f1 * f2 * ... ) mod p`
    ///
    /// With a joint key `y = y1 * y2 * ...`, each holder supplies
    /// `alpha^xi` through [`crate::SecretKey::decryption_factor`].
    pub fn decrypt_with_factors(&self, factors: &[BigNum]) -> Result<Plaintext> {
        let p = self.pk.p();
        let combined = factors
            .iter()
            .try_fold(BigNum::one(), |acc, factor| (acc * factor).modulo(p))?;
        let m = (&self.beta * combined.mod_inverse(p)?).modulo(p)?;

        Ok(Plaintext::new(m))
    }

    /// Parse the compact `"alpha,beta"` form and bind it to `pk`
    pub fn from_str_with_key(s: &str, pk: PublicKey) -> Result<Ciphertext> {
        let parts: Vec<&str> = s.split(',').collect();
        let [alpha, beta] = parts.as_slice() else {
            return Err(ElGamalError::Parse(format!(
                "expected \"alpha,beta\", found {} comma-separated parts",
                parts.len()
            )));
        };

        Ok(Ciphertext::new(alpha.parse()?, beta.parse()?, pk))
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.alpha, self.beta)
    }
}
