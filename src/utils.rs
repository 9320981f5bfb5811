//! Secure sampling and primality testing

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;
use tracing::trace;

use crate::bigint::BigNum;
use crate::error::{ElGamalError, Result};

/// Default number of Miller-Rabin rounds (false positive rate <= 4^-10)
pub const MILLER_RABIN_ROUNDS: usize = 10;

/// Small primes for trial division before Miller-Rabin
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Uniform sample from `[0, max)`
///
/// Draws just enough random bytes to cover `max.bit_length()` bits and
/// rejects out-of-range candidates. Never reduces modulo `max`.
pub fn random_below(max: &BigNum, rng: &mut impl CryptoRngCore) -> Result<BigNum> {
    if !max.is_positive() {
        return Err(ElGamalError::InvalidModulus);
    }

    let bits = max.bit_length();
    let len = bits.div_ceil(8) as usize;
    let excess = (len as u64 * 8 - bits) as u32;
    let mut buf = vec![0u8; len];

    loop {
        rng.fill_bytes(&mut buf);
        buf[0] &= 0xffu8 >> excess;
        let candidate = BigNum::from_bytes_be(&buf);
        if &candidate < max {
            return Ok(candidate);
        }
    }
}

/// Uniform sample from `[low, high)`
pub fn random_in_range(low: &BigNum, high: &BigNum, rng: &mut impl CryptoRngCore) -> Result<BigNum> {
    let span = high - low;
    Ok(low + random_below(&span, rng)?)
}

/// Miller-Rabin primality test with `rounds` random witnesses in `[2, n-2]`
pub fn is_probably_prime(n: &BigNum, rounds: usize, rng: &mut impl CryptoRngCore) -> bool {
    if !n.is_positive() {
        return false;
    }

    let n = n.magnitude();
    if n < &BigUint::from(2u32) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }

    // n - 1 = 2^r * d with d odd
    let one = BigUint::one();
    let n_minus_1 = n - &one;
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;
    let two = BigUint::from(2u32);

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);

        if x == one || x == n_minus_1 {
            continue;
        }

        for _ in 1..r {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Random prime with exactly `bits` bits
///
/// The search is unbounded; `cancel` is polled between candidates.
pub fn random_prime(
    bits: u64,
    rounds: usize,
    rng: &mut impl CryptoRngCore,
    cancel: &AtomicBool,
) -> Result<BigNum> {
    if bits < 2 {
        return Err(ElGamalError::InvalidParameter(format!(
            "cannot sample a {bits}-bit prime"
        )));
    }

    let top = BigNum::power_of_two(bits - 1);
    let mut attempts = 0u64;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(ElGamalError::SearchAborted);
        }
        attempts += 1;

        // Force the top bit so the candidate has exactly `bits` bits, and make it odd.
        let mut candidate = &top + random_below(&top, rng)?;
        if candidate.is_even() {
            candidate = candidate + BigNum::one();
        }
        if candidate.bit_length() != bits {
            continue;
        }

        if is_probably_prime(&candidate, rounds, rng) {
            trace!(bits, attempts, "found prime");
            return Ok(candidate);
        }
    }
}
