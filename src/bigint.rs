//! Arbitrary-precision integers with exact modular arithmetic
//!
//! [`BigNum`] is a signed value type. Every modular operation returns a
//! representative in `[0, m)` and rejects non-positive moduli instead of
//! panicking, so values decoded from untrusted input can flow straight into
//! the group arithmetic.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{Num, One, Signed, Zero};

use crate::error::{ElGamalError, Result};

/// Exact signed integer of unbounded magnitude
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigNum(BigInt);

impl BigNum {
    pub fn zero() -> Self {
        BigNum(BigInt::zero())
    }

    pub fn one() -> Self {
        BigNum(BigInt::one())
    }

    /// `2^exponent`
    pub fn power_of_two(exponent: u64) -> Self {
        BigNum(BigInt::one() << exponent)
    }

    /// Interpret bytes as an unsigned big-endian integer
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        BigNum(BigInt::from_bytes_be(Sign::Plus, bytes))
    }

    /// Big-endian bytes of the magnitude
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.magnitude().to_bytes_be()
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub(crate) fn magnitude(&self) -> &BigUint {
        self.0.magnitude()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_even(&self) -> bool {
        self.0.is_even()
    }

    /// Number of bits in the binary representation of the magnitude (0 for zero)
    pub fn bit_length(&self) -> u64 {
        self.0.bits()
    }

    pub fn pow(&self, exponent: u32) -> BigNum {
        BigNum(num_traits::pow(self.0.clone(), exponent as usize))
    }

    /// Floor division; fails on a zero divisor
    pub fn div_floor(&self, divisor: &BigNum) -> Result<BigNum> {
        if divisor.is_zero() {
            return Err(ElGamalError::InvalidModulus);
        }
        Ok(BigNum(self.0.div_floor(&divisor.0)))
    }

    /// Non-negative residue in `[0, m)`
    pub fn modulo(&self, modulus: &BigNum) -> Result<BigNum> {
        if !modulus.is_positive() {
            return Err(ElGamalError::InvalidModulus);
        }
        Ok(BigNum(self.0.mod_floor(&modulus.0)))
    }

    /// `self^exponent mod modulus`
    ///
    /// A negative exponent inverts the base first, so it fails with
    /// [`ElGamalError::NoInverseExists`] when the base is not a unit mod `modulus`.
    pub fn mod_pow(&self, exponent: &BigNum, modulus: &BigNum) -> Result<BigNum> {
        if !modulus.is_positive() {
            return Err(ElGamalError::InvalidModulus);
        }
        if modulus.is_one() {
            return Ok(BigNum::zero());
        }
        if exponent.is_negative() {
            return self.mod_inverse(modulus)?.mod_pow(&-exponent, modulus);
        }

        let base = self.0.mod_floor(&modulus.0);
        Ok(BigNum(base.modpow(&exponent.0, &modulus.0)))
    }

    /// Modular inverse via the extended Euclidean algorithm
    ///
    /// By convention the inverse modulo 1 is 0.
    pub fn mod_inverse(&self, modulus: &BigNum) -> Result<BigNum> {
        if !modulus.is_positive() {
            return Err(ElGamalError::InvalidModulus);
        }
        if modulus.is_one() {
            return Ok(BigNum::zero());
        }

        let m = &modulus.0;
        let (mut old_r, mut r) = (self.0.mod_floor(m), m.clone());
        let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

        while !r.is_zero() {
            let quotient = &old_r / &r;
            let next_r = &old_r - &quotient * &r;
            old_r = std::mem::replace(&mut r, next_r);
            let next_s = &old_s - &quotient * &s;
            old_s = std::mem::replace(&mut s, next_s);
        }

        if !old_r.is_one() {
            return Err(ElGamalError::NoInverseExists);
        }

        Ok(BigNum(old_s.mod_floor(m)))
    }
}

impl fmt::Display for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for BigNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.magnitude().to_str_radix(16);
        f.pad_integral(!self.is_negative(), "0x", &digits)
    }
}

impl FromStr for BigNum {
    type Err = ElGamalError;

    /// Accepts decimal or `0x`-prefixed hexadecimal, with an optional leading `-`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ElGamalError::Parse(format!("cannot convert \"{s}\" to an integer"));

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (radix, digits) = match unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            Some(hex) => (16, hex),
            None => (10, unsigned),
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(invalid());
        }

        let magnitude = BigInt::from_str_radix(digits, radix).map_err(|_| invalid())?;
        Ok(BigNum(if negative { -magnitude } else { magnitude }))
    }
}

impl From<BigInt> for BigNum {
    fn from(value: BigInt) -> Self {
        BigNum(value)
    }
}

impl From<BigUint> for BigNum {
    fn from(value: BigUint) -> Self {
        BigNum(BigInt::from(value))
    }
}

impl From<BigNum> for BigInt {
    fn from(value: BigNum) -> Self {
        value.0
    }
}

macro_rules! from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BigNum {
                fn from(value: $t) -> Self {
                    BigNum(BigInt::from(value))
                }
            }
        )*
    };
}

from_primitive!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<&BigNum> for &BigNum {
            type Output = BigNum;

            fn $method(self, rhs: &BigNum) -> BigNum {
                BigNum($imp::$method(&self.0, &rhs.0))
            }
        }

        impl $imp<BigNum> for &BigNum {
            type Output = BigNum;

            fn $method(self, rhs: BigNum) -> BigNum {
                BigNum($imp::$method(&self.0, rhs.0))
            }
        }

        impl $imp<&BigNum> for BigNum {
            type Output = BigNum;

            fn $method(self, rhs: &BigNum) -> BigNum {
                BigNum($imp::$method(self.0, &rhs.0))
            }
        }

        impl $imp<BigNum> for BigNum {
            type Output = BigNum;

            fn $method(self, rhs: BigNum) -> BigNum {
                BigNum($imp::$method(self.0, rhs.0))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl Neg for BigNum {
    type Output = BigNum;

    fn neg(self) -> BigNum {
        BigNum(-self.0)
    }
}

impl Neg for &BigNum {
    type Output = BigNum;

    fn neg(self) -> BigNum {
        BigNum(-&self.0)
    }
}

impl std::iter::Sum for BigNum {
    fn sum<I: Iterator<Item = BigNum>>(iter: I) -> Self {
        iter.fold(BigNum::zero(), |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a BigNum> for BigNum {
    fn sum<I: Iterator<Item = &'a BigNum>>(iter: I) -> Self {
        iter.fold(BigNum::zero(), |acc, x| acc + x)
    }
}

// Integers travel as decimal strings on the wire.
#[cfg(feature = "serde")]
mod serde_impl {
    use super::BigNum;
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for BigNum {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    struct BigNumVisitor;

    impl Visitor<'_> for BigNumVisitor {
        type Value = BigNum;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer encoded as a decimal or 0x-hex string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigNum, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigNum, E> {
            Ok(BigNum::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigNum, E> {
            Ok(BigNum::from(v))
        }
    }

    impl<'de> Deserialize<'de> for BigNum {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<BigNum, D::Error> {
            deserializer.deserialize_any(BigNumVisitor)
        }
    }
}
