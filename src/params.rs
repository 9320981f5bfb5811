//! Domain parameters: the order-q subgroup of Z*_p shared by every key in a deployment

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use rand_core::CryptoRngCore;
use tracing::{debug, info, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bigint::BigNum;
use crate::error::{ElGamalError, Result};
use crate::keys::KeyPair;
use crate::utils::{is_probably_prime, random_below, random_in_range, random_prime, MILLER_RABIN_ROUNDS};

/// Configuration for secure parameter generation
#[derive(Clone, Debug)]
pub struct ParameterConfig {
    /// Bit size of the subgroup order q
    pub q_bits: u64,
    /// Number of Miller-Rabin rounds for primality testing
    pub primality_rounds: usize,
    /// Smallest modulus size accepted at all
    pub min_bits: u64,
    /// Modulus sizes below this are accepted with a warning
    pub recommended_bits: u64,
}

impl Default for ParameterConfig {
    fn default() -> Self {
        ParameterConfig {
            q_bits: 256,
            primality_rounds: MILLER_RABIN_ROUNDS,
            min_bits: 512,
            recommended_bits: 2048,
        }
    }
}

/// Group description `(p, q, g)` with `q | p - 1` and `g` of order `q`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CryptoSystem {
    pub(crate) p: BigNum,
    pub(crate) q: BigNum,
    pub(crate) g: BigNum,
}

impl CryptoSystem {
    /// Load fixed parameters. Use [`CryptoSystem::validate`] for untrusted input.
    pub fn new(p: BigNum, q: BigNum, g: BigNum) -> Self {
        CryptoSystem { p, q, g }
    }

    /// Get the prime modulus
    pub fn p(&self) -> &BigNum {
        &self.p
    }

    /// Get the subgroup order
    pub fn q(&self) -> &BigNum {
        &self.q
    }

    /// Get the subgroup generator
    pub fn g(&self) -> &BigNum {
        &self.g
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bit_length()
    }

    /// Whether `p = 2q + 1`, i.e. the subgroup is exactly the quadratic residues
    pub fn is_safe_prime_group(&self) -> bool {
        self.p == &self.q * BigNum::from(2u32) + BigNum::one()
    }

    /// Generate fresh parameters with a `bit_length`-bit modulus using [`ParameterConfig::default`]
    pub fn generate_secure_parameters(
        bit_length: u64,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self> {
        let cancel = AtomicBool::new(false);
        Self::generate_with_config(&ParameterConfig::default(), bit_length, rng, &cancel)
    }

    /// Generate fresh parameters
    ///
    /// Samples a `q_bits`-bit prime q, then searches for `k` such that
    /// `p = 2qk + 1` is a `bit_length`-bit prime, then derives
    /// `g = h^((p-1)/q)` from random `h` until `g != 1`. Each q gets a
    /// bounded number of `k` tries before a fresh q is drawn. The search as a
    /// whole has no iteration cap; setting `cancel` aborts it with
    /// [`ElGamalError::SearchAborted`].
    pub fn generate_with_config(
        config: &ParameterConfig,
        bit_length: u64,
        rng: &mut impl CryptoRngCore,
        cancel: &AtomicBool,
    ) -> Result<Self> {
        if bit_length < config.min_bits {
            return Err(ElGamalError::ParameterSize {
                bits: bit_length,
                min: config.min_bits,
            });
        }
        if bit_length <= config.q_bits + 1 {
            return Err(ElGamalError::InvalidParameter(format!(
                "modulus of {bit_length} bits cannot hold a {}-bit subgroup order",
                config.q_bits
            )));
        }
        if bit_length < config.recommended_bits {
            warn!(
                bit_length,
                recommended = config.recommended_bits,
                "generating parameters below the recommended size"
            );
        }

        // p = 2qk + 1 lies in [2^(n-1), 2^n - 1] exactly when k lies in [k_min, k_max]
        let low = BigNum::power_of_two(bit_length - 1);
        let high = BigNum::power_of_two(bit_length);

        let mut attempts = 0u64;
        let (p, q, k) = 'search: loop {
            let q = random_prime(config.q_bits, config.primality_rounds, rng, cancel)?;
            let two_q = &q * BigNum::from(2u32);
            let k_min = (&low - BigNum::one() + &two_q - BigNum::one()).div_floor(&two_q)?;
            let k_max = (&high - BigNum::from(2u32)).div_floor(&two_q)?;
            let k_span = &k_max - &k_min + BigNum::one();

            // A narrow k range may hold no prime at all
            let budget = BigNum::from(4 * bit_length).min(&k_span * BigNum::from(4u32));
            let mut tried = 0u64;
            while BigNum::from(tried) < budget {
                if cancel.load(Ordering::Relaxed) {
                    return Err(ElGamalError::SearchAborted);
                }
                attempts += 1;
                tried += 1;

                let k = &k_min + random_below(&k_span, rng)?;
                let p = &two_q * &k + BigNum::one();
                trace!(attempts, "testing modulus candidate");
                if is_probably_prime(&p, config.primality_rounds, rng) {
                    break 'search (p, q, k);
                }
            }
            debug!(attempts, "no modulus found for this subgroup order, resampling q");
        };

        // (p - 1) / q = 2k
        let cofactor = &k * BigNum::from(2u32);
        let p_minus_1 = &p - BigNum::one();
        let g = loop {
            let h = random_in_range(&BigNum::from(2u32), &p_minus_1, rng)?;
            let g = h.mod_pow(&cofactor, &p)?;
            if !g.is_one() {
                break g;
            }
        };

        info!(
            bits = p.bit_length(),
            q_bits = q.bit_length(),
            attempts,
            "generated domain parameters"
        );

        Ok(CryptoSystem { p, q, g })
    }

    /// Structural checks: `q | p - 1`, `1 < g < p` and `g^q = 1 mod p`
    ///
    /// Primality of p and q is not re-tested here.
    pub fn validate(&self) -> Result<()> {
        if self.p <= BigNum::from(2u32) {
            return Err(ElGamalError::InvalidParameter(
                "Modulus p must be > 2".to_string(),
            ));
        }

        if !self.q.is_positive() || !(&self.p - BigNum::one()).modulo(&self.q)?.is_zero() {
            return Err(ElGamalError::InvalidParameter(
                "Subgroup order q must divide p - 1".to_string(),
            ));
        }

        if self.g <= BigNum::one() || self.g >= self.p {
            return Err(ElGamalError::InvalidParameter(
                "Generator g must be in range (1, p)".to_string(),
            ));
        }

        if !self.g.mod_pow(&self.q, &self.p)?.is_one() {
            return Err(ElGamalError::InvalidParameter(
                "Generator g must have order q".to_string(),
            ));
        }

        Ok(())
    }

    /// Generate a key pair with a uniformly random secret exponent
    pub fn generate_key_pair(&self, rng: &mut impl CryptoRngCore) -> Result<KeyPair> {
        KeyPair::create(self, rng)
    }

    /// Rebuild a key pair from a known secret exponent
    pub fn key_pair_with_private_key(&self, x: BigNum) -> Result<KeyPair> {
        KeyPair::create_with_private_key(self, x)
    }
}

impl fmt::Display for CryptoSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CryptoSystem({} bits, q {} bits)",
            self.bit_size(),
            self.q.bit_length()
        )
    }
}
