//! Extended operations composed from the elementary layers: powers,
//! logarithms, roots, gcd/lcm, and factorial.

use core::cmp::Ordering;
use core::mem;

use crate::arith::{large, small, Leg, LEG_MASK};
use crate::error::{Error, ErrorCode, Result};
use crate::int::{Int, Sign};

/// Iteration bound for the Newton loops. The sequences below converge in
/// O(log bit-length) steps, so reaching the bound for a well-formed input
/// is a library defect, reported as `MaxIterationsReached`.
const MAX_ITERATIONS: usize = 500;

/// Factorials below this run the plain scalar product; from here up the
/// binary-splitting product takes over. Purely a performance tier: both
/// paths produce identical values.
const FACTORIAL_BINARY_SPLIT_CUTOFF: u64 = 8_192;

/// Ranges at most this long are multiplied out directly instead of being
/// split further.
const FACTORIAL_DIRECT_RANGE: u64 = 32;

impl Int {
    /// Raise the value to the given power by repeated squaring.
    ///
    /// `pow(0, 0) == 1` and `pow(0, n) == 0` for positive `n`. A negative
    /// exponent of a nonzero base yields zero; a negative exponent of zero
    /// fails with [`ErrorCode::MathDomainError`].
    pub fn pow(&self, exponent: i64) -> Result<Int> {
        if exponent < 0 {
            if self.is_zero() {
                return Err(Error::new(ErrorCode::MathDomainError));
            }
            return Ok(Int::zero());
        }
        let mut e = exponent as u64;
        let mut result = Int::one();
        let mut base = self.clone();
        while e != 0 {
            if e & 1 == 1 {
                result = result.mul(&base);
            }
            e >>= 1;
            if e != 0 {
                base = base.sqr();
            }
        }
        Ok(result)
    }

    /// The floor of the base-`base` logarithm of the value.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] when `base < 2` and with
    /// [`ErrorCode::MathDomainError`] when the value is not positive.
    pub fn ilog(&self, base: u64) -> Result<u64> {
        if base < 2 {
            return Err(Error::new(ErrorCode::InvalidArgument));
        }
        if !self.is_positive() {
            return Err(Error::new(ErrorCode::MathDomainError));
        }
        if base.is_power_of_two() {
            let k = base.trailing_zeros() as u64;
            return Ok((self.bit_length() as u64 - 1) / k);
        }
        let base = Int::from(base);
        let mut v = self.clone();
        let mut log = 0;
        while v.cmp(&base) != Ordering::Less {
            v = v.div(&base)?;
            log += 1;
        }
        Ok(log)
    }

    /// The floor of the square root of the value.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] for negative values.
    pub fn sqrt(&self) -> Result<Int> {
        if self.is_negative() {
            return Err(Error::new(ErrorCode::InvalidArgument));
        }
        if self.is_zero() {
            return Ok(Int::zero());
        }
        // Newton iteration seeded just above the true root: the sequence
        // decreases monotonically and the first non-decrease is the floor
        // root.
        let bits = self.bit_length();
        let mut x = Int::one().shl(bits / 2 + (bits & 1));
        for _ in 0..MAX_ITERATIONS {
            let y = self.div(&x)?.add(&x).shr(1)?;
            if y.cmp(&x) != Ordering::Less {
                return Ok(x);
            }
            x = y;
        }
        Err(Error::new(ErrorCode::MaxIterationsReached))
    }

    /// The floor of the `n`-th root of the value.
    ///
    /// Fails with [`ErrorCode::InvalidArgument`] when `n` is zero or the
    /// value is negative. `root_n(v, 1)` is the identity.
    pub fn root_n(&self, n: u32) -> Result<Int> {
        if n == 0 || self.is_negative() {
            return Err(Error::new(ErrorCode::InvalidArgument));
        }
        if n == 1 || self.is_zero() {
            return Ok(self.clone());
        }
        let bits = self.bit_length();
        if n as usize >= bits {
            // The value is below 2^n, so the root floors to one.
            return Ok(Int::one());
        }
        let n_int = Int::from(n);
        let n_minus_one = Int::from(n - 1);
        let mut x = Int::one().shl(bits / n as usize + 1);
        for _ in 0..MAX_ITERATIONS {
            // s' = ((n-1)*s + v / s^(n-1)) / n
            let p = x.pow(n as i64 - 1)?;
            let y = self.div(&p)?.add(&x.mul(&n_minus_one)).div(&n_int)?;
            if y.cmp(&x) != Ordering::Less {
                return Ok(x);
            }
            x = y;
        }
        Err(Error::new(ErrorCode::MaxIterationsReached))
    }

    /// Whether the value is a perfect square. Zero and negative values
    /// report `false`.
    pub fn is_square(&self) -> Result<bool> {
        if !self.is_positive() {
            return Ok(false);
        }
        // Squares end in 0, 1, 4 or 9 mod 16.
        if !matches!(self.legs[0] & 0xF, 0 | 1 | 4 | 9) {
            return Ok(false);
        }
        let root = self.sqrt()?;
        Ok(root.sqr() == *self)
    }

    /// The greatest common divisor of the two values, by the binary GCD
    /// over their magnitudes.
    ///
    /// `gcd(0, 0) == 0` and `gcd(a, 0) == |a|`.
    pub fn gcd(&self, rhs: &Int) -> Int {
        if self.is_zero() {
            return rhs.abs();
        }
        if rhs.is_zero() {
            return self.abs();
        }
        let mut a = self.legs.clone();
        let mut b = rhs.legs.clone();
        let az = small::trailing_zeros(&a);
        let bz = small::trailing_zeros(&b);
        let common = az.min(bz);
        small::ishr(&mut a, az);
        small::ishr(&mut b, bz);
        loop {
            // Both operands are odd here, so the difference is even.
            if large::less(&a, &b) {
                mem::swap(&mut a, &mut b);
            }
            large::isub(&mut a, &b);
            if a.is_empty() {
                break;
            }
            let z = small::trailing_zeros(&a);
            small::ishr(&mut a, z);
        }
        let mut g = b;
        small::ishl(&mut g, common);
        Int::from_parts(Sign::Positive, g)
    }

    /// The least common multiple of the two values, `|a*b| / gcd(a, b)`,
    /// with `lcm(a, 0) == 0`.
    pub fn lcm(&self, rhs: &Int) -> Int {
        if self.is_zero() || rhs.is_zero() {
            return Int::zero();
        }
        let g = self.gcd(rhs);
        // Divide the larger magnitude by the gcd before multiplying, which
        // keeps the intermediate no bigger than the result.
        let (larger, smaller) = if large::less(&self.legs, &rhs.legs) {
            (rhs, self)
        } else {
            (self, rhs)
        };
        let (q, _) = large::div_rem(&larger.legs, &g.legs);
        Int::from_parts(Sign::Positive, large::mul(&q, &smaller.legs))
    }
}

/// The factorial of `n`.
///
/// Small arguments run the plain scalar product; larger ones switch to a
/// binary-splitting range product. The tier boundary is a tuning constant,
/// never observable in the result.
pub fn factorial(n: u64) -> Int {
    if n < FACTORIAL_BINARY_SPLIT_CUTOFF {
        factorial_small(n)
    } else {
        product_range(2, n + 1)
    }
}

fn factorial_small(n: u64) -> Int {
    let mut acc = Int::one();
    for i in 2..=n {
        small::imul(&mut acc.legs, i as Leg);
    }
    acc
}

/// Product of the integers in `[lo, hi)` by recursive halving.
fn product_range(lo: u64, hi: u64) -> Int {
    if lo >= hi {
        return Int::one();
    }
    if hi - lo <= FACTORIAL_DIRECT_RANGE {
        let mut acc = Int::from(lo);
        for i in lo + 1..hi {
            if i <= LEG_MASK as u64 {
                small::imul(&mut acc.legs, i as Leg);
            } else {
                acc = acc.mul(&Int::from(i));
            }
        }
        return acc;
    }
    let mid = lo + (hi - lo) / 2;
    product_range(lo, mid).mul(&product_range(mid, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i128) -> Int {
        Int::from(v)
    }

    #[test]
    fn pow_table_test() {
        assert_eq!(
            int(0).pow(-1).unwrap_err().code(),
            ErrorCode::MathDomainError
        );
        assert_eq!(int(0).pow(0).unwrap(), int(1));
        assert_eq!(int(0).pow(2).unwrap(), int(0));
        assert_eq!(int(42).pow(-1).unwrap(), int(0));
        assert_eq!(int(42).pow(0).unwrap(), int(1));
        assert_eq!(int(42).pow(1).unwrap(), int(42));
        assert_eq!(int(42).pow(2).unwrap(), int(1764));
        assert_eq!(int(-3).pow(3).unwrap(), int(-27));
        assert_eq!(int(-3).pow(4).unwrap(), int(81));
        assert_eq!(int(2).pow(100).unwrap(), Int::one().shl(100));
    }

    #[test]
    fn ilog_table_test() {
        assert_eq!(
            int(3192).ilog(1).unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(
            int(-1234).ilog(2).unwrap_err().code(),
            ErrorCode::MathDomainError
        );
        assert_eq!(
            int(0).ilog(2).unwrap_err().code(),
            ErrorCode::MathDomainError
        );
        assert_eq!(int(1024).ilog(2).unwrap(), 10);
        assert_eq!(int(1).ilog(2).unwrap(), 0);
        assert_eq!(int(1000000).ilog(10).unwrap(), 6);
        assert_eq!(int(999999).ilog(10).unwrap(), 5);
        let p = int(3).pow(20).unwrap();
        assert_eq!(p.ilog(3).unwrap(), 20);
        assert_eq!(p.sub(&Int::one()).ilog(3).unwrap(), 19);
        assert_eq!(p.ilog(u64::MAX).unwrap(), 0);
    }

    #[test]
    fn sqrt_test() {
        assert_eq!(
            int(-1).sqrt().unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(int(0).sqrt().unwrap(), int(0));
        assert_eq!(int(1).sqrt().unwrap(), int(1));
        assert_eq!(int(42).sqrt().unwrap(), int(6));
        for n in 0..500i128 {
            let s = int(n).sqrt().unwrap();
            assert!(s.sqr() <= int(n), "sqrt({}) too big", n);
            assert!(int(n) < s.add(&Int::one()).sqr(), "sqrt({}) too small", n);
        }
        let big = Int::from(10u32).pow(50).unwrap();
        assert_eq!(big.sqr().sqrt().unwrap(), big);
        assert_eq!(big.sqr().add(&Int::one()).sqrt().unwrap(), big);
        assert_eq!(big.sqr().sub(&Int::one()).sqrt().unwrap(), big.sub(&Int::one()));
    }

    #[test]
    fn root_n_test() {
        assert_eq!(
            int(5).root_n(0).unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(
            int(-8).root_n(3).unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(int(0).root_n(5).unwrap(), int(0));
        assert_eq!(int(1).root_n(7).unwrap(), int(1));
        assert_eq!(int(12345).root_n(1).unwrap(), int(12345));
        assert_eq!(Int::one().shl(90).root_n(5).unwrap(), Int::one().shl(18));
        assert_eq!(
            Int::one().shl(90).add(&Int::one()).root_n(5).unwrap(),
            Int::one().shl(18)
        );
        for n in 2..=6u32 {
            let v = int(123456789);
            let r = v.root_n(n).unwrap();
            assert!(r.pow(n as i64).unwrap() <= v);
            assert!(v < r.add(&Int::one()).pow(n as i64).unwrap());
        }
        // Roots and squares agree.
        let v = int(1298074214633706907132624082305024);
        assert_eq!(v.root_n(2).unwrap(), v.sqrt().unwrap());
    }

    #[test]
    fn is_square_test() {
        assert!(!int(12).is_square().unwrap());
        assert!(!int(0).is_square().unwrap());
        assert!(!int(-4).is_square().unwrap());
        assert!(int(16).is_square().unwrap());
        assert!(!int(17).is_square().unwrap());
        let k = Int::from(10u32).pow(20).unwrap().add(&int(3));
        assert!(k.sqr().is_square().unwrap());
        assert!(!k.sqr().add(&Int::one()).is_square().unwrap());
    }

    #[test]
    fn gcd_test() {
        assert_eq!(int(23).gcd(&int(25)), int(1));
        assert_eq!(int(125).gcd(&int(25)), int(25));
        assert_eq!(int(125).gcd(&int(0)), int(125));
        assert_eq!(int(0).gcd(&int(0)), int(0));
        assert_eq!(int(0).gcd(&int(125)), int(125));
        assert_eq!(int(-12).gcd(&int(18)), int(6));
        assert_eq!(int(1 << 40).gcd(&int(1 << 20)), int(1 << 20));
    }

    #[test]
    fn lcm_test() {
        assert_eq!(int(23).lcm(&int(25)), int(575));
        assert_eq!(int(125).lcm(&int(25)), int(125));
        assert_eq!(int(125).lcm(&int(0)), int(0));
        assert_eq!(int(0).lcm(&int(0)), int(0));
        assert_eq!(int(-4).lcm(&int(6)), int(12));
        // gcd * lcm == |a * b| for nonzero operands.
        for (a, b) in [(12i128, 18i128), (-35, 21), (97, 89), (1 << 50, 6)] {
            let product = int(a).mul(&int(b)).abs();
            assert_eq!(int(a).gcd(&int(b)).mul(&int(a).lcm(&int(b))), product);
        }
    }

    #[test]
    fn factorial_test() {
        assert_eq!(factorial(0), int(1));
        assert_eq!(factorial(1), int(1));
        assert_eq!(factorial(5), int(120));
        assert_eq!(factorial(20), int(2432902008176640000));
    }

    #[test]
    fn factorial_tiers_agree_test() {
        // The scalar loop and the binary split must be output-identical.
        for n in [40u64, 200, 500] {
            assert_eq!(factorial_small(n), product_range(2, n + 1));
        }
    }
}
