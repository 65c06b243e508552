//! The arbitrary-precision signed integer type.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use crate::arith::{large, small, Leg, LEG_BITS, LEG_MASK};
use crate::error::{Error, ErrorCode, Result};
use crate::radix;

/// The sign of an [`Int`].
///
/// Zero is canonically [`Sign::Positive`]; there is no negative zero.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Sign {
    /// The value is zero or greater.
    Positive,
    /// The value is below zero.
    Negative,
}

impl Sign {
    #[inline]
    fn flip(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

/// An arbitrary-precision signed integer.
///
/// The magnitude is stored as a growable little-endian vector of legs, each
/// holding [`LEG_BITS`] bits; the most significant leg is always non-zero,
/// and zero is the empty vector with a positive sign. All operations take
/// their operands by shared reference and allocate their results; in-place
/// mutation never survives an error.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Int {
    pub(crate) sign: Sign,
    pub(crate) legs: Vec<Leg>,
}

impl Int {
    /// The integer zero.
    #[inline]
    pub fn zero() -> Int {
        Int {
            sign: Sign::Positive,
            legs: Vec::new(),
        }
    }

    /// The integer one.
    #[inline]
    pub fn one() -> Int {
        Int {
            sign: Sign::Positive,
            legs: alloc::vec![1],
        }
    }

    /// Assemble an integer from a sign and a raw magnitude, restoring the
    /// canonical form: no leading zero legs, and zero is positive.
    #[inline]
    pub(crate) fn from_parts(sign: Sign, mut legs: Vec<Leg>) -> Int {
        small::normalize(&mut legs);
        let sign = if legs.is_empty() { Sign::Positive } else { sign };
        Int { sign, legs }
    }

    fn from_magnitude(mut v: u128, sign: Sign) -> Int {
        let mut legs = Vec::new();
        while v != 0 {
            legs.push((v as Leg) & LEG_MASK);
            v >>= LEG_BITS;
        }
        if legs.is_empty() {
            Int::zero()
        } else {
            Int { sign, legs }
        }
    }

    /// Fold the magnitude into a u128. The value must fit.
    fn magnitude_u128(&self) -> u128 {
        debug_assert!(self.bit_length() <= 128);
        self.legs
            .iter()
            .rev()
            .fold(0u128, |acc, &leg| (acc << LEG_BITS) | leg as u128)
    }

    // PROPERTIES

    /// Returns true if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.legs.is_empty()
    }

    /// Returns true if the value is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    /// Returns true if the value is above zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.sign == Sign::Positive && !self.is_zero()
    }

    /// Returns true if the value is even. Zero is even.
    #[inline]
    pub fn is_even(&self) -> bool {
        self.legs.first().copied().unwrap_or(0) & 1 == 0
    }

    /// Returns true if the value is odd.
    #[inline]
    pub fn is_odd(&self) -> bool {
        !self.is_even()
    }

    /// The sign of the value.
    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// The number of bits in the magnitude; zero for the value zero.
    #[inline]
    pub fn bit_length(&self) -> usize {
        small::bit_length(&self.legs)
    }

    // PARSING AND RENDERING

    /// Parse a signed numeral in the given radix (2 through 64).
    ///
    /// An optional leading `-` precedes the digits. Digits beyond 9 come
    /// from the alphabet `0-9 a-z A-Z + /`; letters are case-insensitive
    /// through radix 36 and case-sensitive above it.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] when the radix is out of
    /// range or a character is invalid for the radix; invalid characters
    /// report their byte offset through [`Error::position`].
    pub fn from_str_radix(text: &str, radix: u32) -> Result<Int> {
        radix::parse(text, radix)
    }

    /// Render the value as a signed numeral in the given radix (2 through
    /// 64): a leading `-` for negative values, no leading zeros, and zero
    /// rendered as `"0"`.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] when the radix is out of
    /// range.
    pub fn to_str_radix(&self, radix: u32) -> Result<String> {
        if !(radix::MIN_RADIX..=radix::MAX_RADIX).contains(&radix) {
            return Err(Error::new(ErrorCode::InvalidArgument));
        }
        Ok(radix::render(self, radix))
    }

    // NATIVE EXTRACTION

    /// Extract the value as a `u64`.
    ///
    /// Fails with [`ErrorCode::IntegerUnderflow`] for negative values and
    /// [`ErrorCode::IntegerOverflow`] for values above `u64::MAX`.
    pub fn to_u64(&self) -> Result<u64> {
        if self.is_negative() {
            return Err(Error::new(ErrorCode::IntegerUnderflow));
        }
        if self.bit_length() > 64 {
            return Err(Error::new(ErrorCode::IntegerOverflow));
        }
        Ok(self.magnitude_u128() as u64)
    }

    /// Extract the value as a `u128`.
    ///
    /// Fails with [`ErrorCode::IntegerUnderflow`] for negative values and
    /// [`ErrorCode::IntegerOverflow`] for values above `u128::MAX`.
    pub fn to_u128(&self) -> Result<u128> {
        if self.is_negative() {
            return Err(Error::new(ErrorCode::IntegerUnderflow));
        }
        if self.bit_length() > 128 {
            return Err(Error::new(ErrorCode::IntegerOverflow));
        }
        Ok(self.magnitude_u128())
    }

    /// Extract the value as an `i64`.
    ///
    /// Fails with [`ErrorCode::IntegerOverflow`] above `i64::MAX` and
    /// [`ErrorCode::IntegerUnderflow`] below `i64::MIN`.
    pub fn to_i64(&self) -> Result<i64> {
        if !self.is_negative() {
            if self.bit_length() > 63 {
                return Err(Error::new(ErrorCode::IntegerOverflow));
            }
            Ok(self.magnitude_u128() as i64)
        } else {
            if self.bit_length() > 64 {
                return Err(Error::new(ErrorCode::IntegerUnderflow));
            }
            let mag = self.magnitude_u128();
            if mag > 1 << 63 {
                Err(Error::new(ErrorCode::IntegerUnderflow))
            } else if mag == 1 << 63 {
                Ok(i64::MIN)
            } else {
                Ok(-(mag as i64))
            }
        }
    }

    /// Extract the value as an `i128`.
    ///
    /// Fails with [`ErrorCode::IntegerOverflow`] above `i128::MAX` and
    /// [`ErrorCode::IntegerUnderflow`] below `i128::MIN`.
    pub fn to_i128(&self) -> Result<i128> {
        if !self.is_negative() {
            if self.bit_length() > 127 {
                return Err(Error::new(ErrorCode::IntegerOverflow));
            }
            Ok(self.magnitude_u128() as i128)
        } else {
            if self.bit_length() > 128 {
                return Err(Error::new(ErrorCode::IntegerUnderflow));
            }
            let mag = self.magnitude_u128();
            if mag > 1 << 127 {
                Err(Error::new(ErrorCode::IntegerUnderflow))
            } else if mag == 1 << 127 {
                Ok(i128::MIN)
            } else {
                Ok(-(mag as i128))
            }
        }
    }

    // SIGN ARITHMETIC

    /// The negation of the value.
    #[inline]
    pub fn neg(&self) -> Int {
        if self.is_zero() {
            Int::zero()
        } else {
            Int {
                sign: self.sign.flip(),
                legs: self.legs.clone(),
            }
        }
    }

    /// The absolute value.
    #[inline]
    pub fn abs(&self) -> Int {
        Int {
            sign: Sign::Positive,
            legs: self.legs.clone(),
        }
    }

    // ELEMENTARY ARITHMETIC

    /// Sign-aware magnitude addition: when the signs differ, the smaller
    /// magnitude is subtracted from the larger and the result takes the
    /// larger operand's sign.
    fn add_with_sign(&self, rhs: &Int, rhs_sign: Sign) -> Int {
        if self.sign == rhs_sign {
            Int::from_parts(self.sign, large::add(&self.legs, &rhs.legs))
        } else {
            match large::compare(&self.legs, &rhs.legs) {
                Ordering::Equal => Int::zero(),
                Ordering::Greater => {
                    Int::from_parts(self.sign, large::sub(&self.legs, &rhs.legs))
                }
                Ordering::Less => Int::from_parts(rhs_sign, large::sub(&rhs.legs, &self.legs)),
            }
        }
    }

    /// The sum of the two values.
    #[inline]
    pub fn add(&self, rhs: &Int) -> Int {
        self.add_with_sign(rhs, rhs.sign)
    }

    /// The difference of the two values.
    #[inline]
    pub fn sub(&self, rhs: &Int) -> Int {
        self.add_with_sign(rhs, rhs.sign.flip())
    }

    /// The product of the two values.
    pub fn mul(&self, rhs: &Int) -> Int {
        if self.is_zero() || rhs.is_zero() {
            return Int::zero();
        }
        let sign = if self.sign == rhs.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        Int::from_parts(sign, large::mul(&self.legs, &rhs.legs))
    }

    /// The square of the value. Equal to `self.mul(self)` for every input.
    pub fn sqr(&self) -> Int {
        Int::from_parts(Sign::Positive, large::sqr(&self.legs))
    }

    // DIVISION

    /// Floor division: the quotient and remainder such that
    /// `self == quotient * rhs + remainder` with
    /// `0 <= |remainder| < |rhs|`.
    ///
    /// The quotient is rounded toward negative infinity over the rationals,
    /// not toward zero, so the remainder takes the sign of the divisor:
    /// `(-7).div_rem(2) == (-4, 1)`.
    ///
    /// Fails with [`ErrorCode::DivisionByZero`] when `rhs` is zero.
    pub fn div_rem(&self, rhs: &Int) -> Result<(Int, Int)> {
        if rhs.is_zero() {
            return Err(Error::new(ErrorCode::DivisionByZero));
        }
        let (qm, rm) = large::div_rem(&self.legs, &rhs.legs);
        let qsign = if self.sign == rhs.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        let mut q = Int::from_parts(qsign, qm);
        let mut r = Int::from_parts(self.sign, rm);
        // Truncated quotient and remainder; floor differs by one when the
        // signs disagree and the division was inexact.
        if self.sign != rhs.sign && !r.is_zero() {
            q = q.sub(&Int::one());
            r = r.add(rhs);
        }
        Ok((q, r))
    }

    /// The floor quotient. See [`Int::div_rem`].
    #[inline]
    pub fn div(&self, rhs: &Int) -> Result<Int> {
        Ok(self.div_rem(rhs)?.0)
    }

    /// The floor remainder. See [`Int::div_rem`].
    #[inline]
    pub fn rem(&self, rhs: &Int) -> Result<Int> {
        Ok(self.div_rem(rhs)?.1)
    }

    // SHIFTS

    /// Shift the magnitude left by `bits`, preserving the sign.
    pub fn shl(&self, bits: usize) -> Int {
        let mut legs = self.legs.clone();
        small::ishl(&mut legs, bits);
        Int::from_parts(self.sign, legs)
    }

    /// Logical right shift by `bits`, defined for non-negative values only.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] for negative values; use
    /// [`Int::shr_signed`] for the sign-preserving shift.
    pub fn shr(&self, bits: usize) -> Result<Int> {
        if self.is_negative() {
            return Err(Error::new(ErrorCode::InvalidArgument));
        }
        let mut legs = self.legs.clone();
        small::ishr(&mut legs, bits);
        Ok(Int::from_parts(Sign::Positive, legs))
    }

    /// Arithmetic right shift by `bits`, valid for any sign.
    ///
    /// Rounds toward negative infinity, matching a two's-complement
    /// arithmetic shift: `(-7).shr_signed(1) == -4`.
    pub fn shr_signed(&self, bits: usize) -> Int {
        let mut legs = self.legs.clone();
        let round = self.is_negative() && small::low_bits_nonzero(&legs, bits);
        small::ishr(&mut legs, bits);
        if round {
            small::iadd(&mut legs, 1);
        }
        Int::from_parts(self.sign, legs)
    }

    /// Shift the magnitude left by `n` whole legs (`n * LEG_BITS` bits).
    pub fn shl_leg(&self, n: usize) -> Int {
        let mut legs = self.legs.clone();
        small::ishl_legs(&mut legs, n);
        Int::from_parts(self.sign, legs)
    }

    /// Shift the magnitude right by `n` whole legs (`n * LEG_BITS` bits),
    /// defined for non-negative values only.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] for negative values.
    pub fn shr_leg(&self, n: usize) -> Result<Int> {
        if self.is_negative() {
            return Err(Error::new(ErrorCode::InvalidArgument));
        }
        let mut legs = self.legs.clone();
        small::ishr_legs(&mut legs, n);
        Ok(Int::from_parts(Sign::Positive, legs))
    }
}

// CONVERSIONS

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Int {
                #[inline]
                fn from(u: $ty) -> Self {
                    Int::from_magnitude(u as u128, Sign::Positive)
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Int {
                #[inline]
                fn from(i: $ty) -> Self {
                    let sign = if i < 0 { Sign::Negative } else { Sign::Positive };
                    Int::from_magnitude(i.unsigned_abs() as u128, sign)
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128, isize);

// TRAITS

impl Default for Int {
    #[inline]
    fn default() -> Self {
        Int::zero()
    }
}

impl Ord for Int {
    fn cmp(&self, other: &Int) -> Ordering {
        // The canonical form keeps zero positive, so a sign mismatch alone
        // decides the order.
        match (self.sign, other.sign) {
            (Sign::Positive, Sign::Negative) => Ordering::Greater,
            (Sign::Negative, Sign::Positive) => Ordering::Less,
            (Sign::Positive, Sign::Positive) => large::compare(&self.legs, &other.legs),
            (Sign::Negative, Sign::Negative) => large::compare(&other.legs, &self.legs),
        }
    }
}

impl PartialOrd for Int {
    #[inline]
    fn partial_cmp(&self, other: &Int) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&radix::render(self, 10))
    }
}

impl Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Int {
    type Err = Error;

    fn from_str(s: &str) -> Result<Int> {
        Int::from_str_radix(s, 10)
    }
}

// TESTS
