//! Core ElGamal encryption and decryption operations

use rand_core::CryptoRngCore;

use crate::bigint::BigNum;
use crate::error::{ElGamalError, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::params::CryptoSystem;
use crate::types::{Ciphertext, Plaintext};
use crate::utils::random_below;

impl CryptoSystem {
    /// Map `m` in `[0, q)` to an element of the order-q subgroup
    ///
    /// `m + 1` is used as is when it is a quadratic residue, otherwise it is
    /// replaced by `p - (m + 1)`. Only defined for safe-prime groups.
    pub fn encode_message(&self, m: &BigNum) -> Result<BigNum> {
        self.check_encodable()?;
        if m.is_negative() || m >= &self.q {
            return Err(ElGamalError::MessageNotEncodable(format!(
                "message must be in range [0, q), got {m}"
            )));
        }

        let y = m + BigNum::one();
        if y.mod_pow(&self.q, &self.p)?.is_one() {
            Ok(y)
        } else {
            Ok(&self.p - y)
        }
    }

    /// Inverse of [`CryptoSystem::encode_message`]
    pub fn decode_message(&self, encoded: &BigNum) -> Result<BigNum> {
        self.check_encodable()?;
        if !encoded.is_positive() || encoded >= &self.p {
            return Err(ElGamalError::MessageNotEncodable(format!(
                "encoded element must be in range [1, p), got {encoded}"
            )));
        }

        let y = if encoded <= &self.q {
            encoded.clone()
        } else {
            &self.p - encoded
        };
        Ok(y - BigNum::one())
    }

    fn check_encodable(&self) -> Result<()> {
        if self.is_safe_prime_group() {
            Ok(())
        } else {
            Err(ElGamalError::MessageNotEncodable(
                "subgroup encoding requires p = 2q + 1".to_string(),
            ))
        }
    }
}

impl PublicKey {
    /// Encrypt with caller-chosen randomness: `(g^r, y^r * m)`
    pub fn encrypt_with_r(&self, plaintext: &Plaintext, r: &BigNum) -> Result<Ciphertext> {
        let p = self.p();
        let alpha = self.g().mod_pow(r, p)?;
        let beta = (self.y.mod_pow(r, p)? * plaintext.m()).modulo(p)?;

        Ok(Ciphertext::new(alpha, beta, self.clone()))
    }

    /// Encode the plaintext into the subgroup, then encrypt it
    ///
    /// Recover the message with [`SecretKey::decrypt_decoded`].
    pub fn encrypt_encoded_with_r(&self, plaintext: &Plaintext, r: &BigNum) -> Result<Ciphertext> {
        let encoded = Plaintext::new(self.params.encode_message(plaintext.m())?);
        self.encrypt_with_r(&encoded, r)
    }

    /// Encrypt with fresh `r` in `[0, q)` and hand `r` back to the caller
    pub fn encrypt_return_r(
        &self,
        plaintext: &Plaintext,
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Ciphertext, BigNum)> {
        let r = random_below(self.q(), rng)?;
        let ciphertext = self.encrypt_with_r(plaintext, &r)?;
        Ok((ciphertext, r))
    }

    /// Encrypt a plaintext
    pub fn encrypt(&self, plaintext: &Plaintext, rng: &mut impl CryptoRngCore) -> Result<Ciphertext> {
        self.encrypt_return_r(plaintext, rng).map(|(ciphertext, _)| ciphertext)
    }
}

impl SecretKey {
    /// Partial decryption `alpha^x mod p`
    ///
    /// Each holder of a share of a joint key contributes one factor; see
    /// [`Ciphertext::decrypt_with_factors`].
    pub fn decryption_factor(&self, ciphertext: &Ciphertext) -> Result<BigNum> {
        ciphertext.alpha.mod_pow(&self.x, self.public_key.p())
    }

    /// Decrypt a ciphertext: `beta / alpha^x mod p`
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Plaintext> {
        let factor = self.decryption_factor(ciphertext)?;
        self.decrypt_with_factor(ciphertext, &factor)
    }

    /// Decrypt using an already computed decryption factor
    pub fn decrypt_with_factor(&self, ciphertext: &Ciphertext, factor: &BigNum) -> Result<Plaintext> {
        let p = self.public_key.p();
        let factor_inv = factor.mod_inverse(p)?;
        let m = (&ciphertext.beta * factor_inv).modulo(p)?;

        Ok(Plaintext::new(m))
    }

    /// Decrypt a ciphertext produced by [`PublicKey::encrypt_encoded_with_r`]
    pub fn decrypt_decoded(&self, ciphertext: &Ciphertext) -> Result<Plaintext> {
        let encoded = self.decrypt(ciphertext)?;
        let m = self.public_key.params.decode_message(encoded.m())?;
        Ok(Plaintext::new(m))
    }
}
