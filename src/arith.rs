//! Building-blocks for arbitrary-precision math.
//!
//! These algorithms assume little-endian order for the leg buffers, so for a
//! `vec![0, 1, 2, 3]`, `3` is the most significant leg, and `0` is the least
//! significant leg. Every leg carries `LEG_BITS` bits of magnitude; the top
//! `LEG_NAILS` bits of the machine word are kept clear so that carries and
//! borrows stay inside the word and can be masked out instead of relying on
//! overflow flags.

use alloc::vec::Vec;
use core::{cmp, iter};

// ALIASES
// -------

//  Type for a single leg of the big integer.
//
//  A leg is analogous to a digit in base10, except it stores magnitude in a
//  fixed power-of-two radix. The radix is chosen so that a leg product plus
//  a carry always fits the wide type, and a leg sum never leaves the narrow
//  word.
//
//  Platforms with native 64-bit words and a 128-bit widening multiply use
//  u64 legs with 60 magnitude bits; everything else falls back to u32 legs
//  with 28 magnitude bits. The cfg is emitted by build.rs.

// 32-BIT LEG
/// One leg of a big integer's magnitude.
#[cfg(leg_width_32)]
pub type Leg = u32;

#[cfg(leg_width_32)]
type Wide = u64;

// 64-BIT LEG
/// One leg of a big integer's magnitude.
#[cfg(leg_width_64)]
pub type Leg = u64;

#[cfg(leg_width_64)]
type Wide = u128;

/// Number of reserved high bits in a leg's machine word.
pub const LEG_NAILS: usize = 4;

/// Number of magnitude bits carried per leg.
pub const LEG_BITS: usize = 8 * core::mem::size_of::<Leg>() - LEG_NAILS;

/// Mask selecting the magnitude bits of a leg.
pub(crate) const LEG_MASK: Leg = (((1 as Wide) << LEG_BITS) - 1) as Leg;

// SCALAR
// ------

// Scalar-to-scalar operations, for building-blocks for arbitrary-precision
// operations.

pub(crate) mod scalar {
    use super::*;

    // ADDITION

    /// Add two legs and return the masked sum and whether a carry happened.
    #[inline]
    pub fn add(x: Leg, y: Leg) -> (Leg, bool) {
        // Both operands fit LEG_BITS bits, so the word never overflows and
        // the carry is exactly the first nail bit.
        let z = x + y;
        (z & LEG_MASK, z >> LEG_BITS != 0)
    }

    /// AddAssign two legs and return whether a carry happened.
    #[inline]
    pub fn iadd(x: &mut Leg, y: Leg) -> bool {
        let t = add(*x, y);
        *x = t.0;
        t.1
    }

    // SUBTRACTION

    /// Subtract two legs and return the masked difference and whether a
    /// borrow happened.
    #[inline]
    pub fn sub(x: Leg, y: Leg) -> (Leg, bool) {
        (x.wrapping_sub(y) & LEG_MASK, y > x)
    }

    /// SubAssign two legs and return whether a borrow happened.
    #[inline]
    pub fn isub(x: &mut Leg, y: Leg) -> bool {
        let t = sub(*x, y);
        *x = t.0;
        t.1
    }

    // MULTIPLICATION

    /// Multiply two legs (with carry) and return the (low, high) legs of the
    /// product.
    #[inline]
    pub fn mul(x: Leg, y: Leg, carry: Leg) -> (Leg, Leg) {
        // Cannot overflow: (2^n - 1)^2 + (2^n - 1) < 2^2n for n = LEG_BITS,
        // and the high part is itself below 2^LEG_BITS.
        let z: Wide = x as Wide * y as Wide + carry as Wide;
        ((z as Leg) & LEG_MASK, (z >> LEG_BITS) as Leg)
    }

    /// MulAssign two legs (with carry) and return the carry-out leg.
    #[inline]
    pub fn imul(x: &mut Leg, y: Leg, carry: Leg) -> Leg {
        let t = mul(*x, y, carry);
        *x = t.0;
        t.1
    }
}

// SMALL
// -----

// Large-to-small operations, to modify a big integer from a native scalar.

pub(crate) mod small {
    use super::*;

    // ADDITION

    /// Implied AddAssign implementation for adding a leg to a big integer.
    ///
    /// Allows us to choose a start-index in x to store, to allow incrementing
    /// from a non-zero start.
    #[inline]
    pub fn iadd_impl(x: &mut Vec<Leg>, y: Leg, xstart: usize) {
        if x.len() <= xstart {
            x.push(y);
        } else {
            // Initial add
            let mut carry = scalar::iadd(&mut x[xstart], y);

            // Increment until overflow stops occurring.
            let mut size = xstart + 1;
            while carry && size < x.len() {
                carry = scalar::iadd(&mut x[size], 1);
                size += 1;
            }

            // If we overflowed the buffer entirely, need to add 1 to the end
            // of the buffer.
            if carry {
                x.push(1);
            }
        }
    }

    /// AddAssign a leg to a big integer.
    #[inline]
    pub fn iadd(x: &mut Vec<Leg>, y: Leg) {
        iadd_impl(x, y, 0);
    }

    // SUBTRACTION

    /// SubAssign a leg from a big integer.
    /// Does not do overflowing subtraction.
    #[inline]
    pub fn isub_impl(x: &mut Vec<Leg>, y: Leg, xstart: usize) {
        debug_assert!(x.len() > xstart && (x[xstart] >= y || x.len() > xstart + 1));

        // Initial subtraction
        let mut carry = scalar::isub(&mut x[xstart], y);

        // Decrement until the borrow stops occurring.
        let mut size = xstart + 1;
        while carry && size < x.len() {
            carry = scalar::isub(&mut x[size], 1);
            size += 1;
        }
        normalize(x);
    }

    // MULTIPLICATION

    /// MulAssign a leg to a big integer.
    #[inline]
    pub fn imul(x: &mut Vec<Leg>, y: Leg) {
        // Multiply iteratively over all elements, adding the carry each time.
        let mut carry: Leg = 0;
        for xi in x.iter_mut() {
            carry = scalar::imul(xi, y, carry);
        }

        // Overflow of value, add to end.
        if carry != 0 {
            x.push(carry);
        }
    }

    /// Multiply a big integer by a leg.
    #[inline]
    pub fn mul(x: &[Leg], y: Leg) -> Vec<Leg> {
        let mut z = x.to_vec();
        imul(&mut z, y);
        z
    }

    // DIVISION

    /// DivAssign a big integer by a leg, returning the remainder.
    ///
    /// Classic short division: walk the legs from most significant to least,
    /// carrying the running remainder through the wide type.
    pub fn idiv_rem(x: &mut Vec<Leg>, y: Leg) -> Leg {
        debug_assert!(y != 0);

        let mut rem: Wide = 0;
        for xi in x.iter_mut().rev() {
            let acc = (rem << LEG_BITS) | *xi as Wide;
            *xi = (acc / y as Wide) as Leg;
            rem = acc % y as Wide;
        }
        normalize(x);
        rem as Leg
    }

    // BIT LENGTH

    /// Get the number of leading zero bits in the most significant leg.
    #[inline]
    pub fn leading_zeros(x: &[Leg]) -> usize {
        match x.last() {
            Some(&leg) => leg.leading_zeros() as usize - LEG_NAILS,
            None => 0,
        }
    }

    /// Calculate the bit-length of the big integer.
    #[inline]
    pub fn bit_length(x: &[Leg]) -> usize {
        LEG_BITS * x.len() - leading_zeros(x)
    }

    /// Count the trailing zero bits of a non-zero big integer.
    #[inline]
    pub fn trailing_zeros(x: &[Leg]) -> usize {
        debug_assert!(!x.is_empty());

        let mut zeros = 0;
        for &xi in x {
            if xi == 0 {
                zeros += LEG_BITS;
            } else {
                zeros += xi.trailing_zeros() as usize;
                break;
            }
        }
        zeros
    }

    /// Check whether any of the low `n` bits of the magnitude are set.
    #[inline]
    pub fn low_bits_nonzero(x: &[Leg], n: usize) -> bool {
        let div = n / LEG_BITS;
        let rem = n % LEG_BITS;
        let whole = div.min(x.len());
        if x[..whole].iter().any(|&leg| leg != 0) {
            return true;
        }
        rem != 0 && div < x.len() && x[div] & (((1 as Leg) << rem) - 1) != 0
    }

    // SHL

    /// Shift-left bits inside a buffer.
    ///
    /// Assumes `n < LEG_BITS`, IE, internally shifting bits.
    #[inline]
    pub fn ishl_bits(x: &mut Vec<Leg>, n: usize) {
        debug_assert!(n < LEG_BITS);
        if n == 0 || x.is_empty() {
            return;
        }

        // Internally, for each item, we shift left by n, and add the
        // previous leg's shifted-out high bits.
        let rshift = LEG_BITS - n;
        let mut prev: Leg = 0;
        for xi in x.iter_mut() {
            let tmp = *xi;
            *xi = ((*xi << n) & LEG_MASK) | (prev >> rshift);
            prev = tmp;
        }

        let carry = prev >> rshift;
        if carry != 0 {
            x.push(carry);
        }
    }

    /// Shift-left `n` legs inside a buffer.
    #[inline]
    pub fn ishl_legs(x: &mut Vec<Leg>, n: usize) {
        if n != 0 && !x.is_empty() {
            x.splice(0..0, iter::repeat(0).take(n));
        }
    }

    /// Shift-left a buffer by n bits.
    #[inline]
    pub fn ishl(x: &mut Vec<Leg>, n: usize) {
        let rem = n % LEG_BITS;
        let div = n / LEG_BITS;
        ishl_bits(x, rem);
        if div != 0 {
            ishl_legs(x, div);
        }
    }

    // SHR

    /// Shift-right bits inside a buffer.
    ///
    /// Assumes `n < LEG_BITS`, IE, internally shifting bits.
    #[inline]
    pub fn ishr_bits(x: &mut Vec<Leg>, n: usize) {
        debug_assert!(n < LEG_BITS);
        if n == 0 || x.is_empty() {
            normalize(x);
            return;
        }

        let lshift = LEG_BITS - n;
        let mut prev: Leg = 0;
        for xi in x.iter_mut().rev() {
            let tmp = *xi;
            *xi = (*xi >> n) | ((prev << lshift) & LEG_MASK);
            prev = tmp;
        }
        normalize(x);
    }

    /// Shift-right `n` legs inside a buffer, dropping the low legs.
    #[inline]
    pub fn ishr_legs(x: &mut Vec<Leg>, n: usize) {
        if n >= x.len() {
            x.clear();
        } else if n != 0 {
            x.drain(..n);
        }
    }

    /// Shift-right a buffer by n bits.
    #[inline]
    pub fn ishr(x: &mut Vec<Leg>, n: usize) {
        let rem = n % LEG_BITS;
        let div = n / LEG_BITS;
        if div != 0 {
            ishr_legs(x, div);
        }
        ishr_bits(x, rem);
    }

    // NORMALIZE

    /// Normalize the container by popping any leading zeros.
    #[inline]
    pub fn normalize(x: &mut Vec<Leg>) {
        while x.last() == Some(&0) {
            x.pop();
        }
    }
}

// LARGE
// -----

// Large-to-large operations, to modify a big integer from another big
// integer.

pub(crate) mod large {
    use super::*;

    // RELATIVE OPERATORS

    /// Compare `x` to `y`, in little-endian order.
    ///
    /// Both inputs must be normalized.
    #[inline]
    pub fn compare(x: &[Leg], y: &[Leg]) -> cmp::Ordering {
        if x.len() != y.len() {
            return x.len().cmp(&y.len());
        }
        let iter = x.iter().rev().zip(y.iter().rev());
        for (&xi, &yi) in iter {
            if xi != yi {
                return xi.cmp(&yi);
            }
        }
        cmp::Ordering::Equal
    }

    /// Check if x is less than y.
    #[inline]
    pub fn less(x: &[Leg], y: &[Leg]) -> bool {
        compare(x, y) == cmp::Ordering::Less
    }

    /// Check if x is greater than or equal to y.
    #[inline]
    pub fn greater_equal(x: &[Leg], y: &[Leg]) -> bool {
        !less(x, y)
    }

    // ADDITION

    /// Implied AddAssign implementation for big integers.
    ///
    /// Allows us to choose a start-index in x to store, so we can avoid
    /// padding the buffer with zeros when not needed, optimized for vectors.
    pub fn iadd_impl(x: &mut Vec<Leg>, y: &[Leg], xstart: usize) {
        // The effective x buffer is from `xstart..x.len()`, so we need to
        // treat that as the current range. If the effective y buffer is
        // longer, need to resize to that, + the start index.
        if y.len() > x.len() - xstart {
            x.resize(y.len() + xstart, 0);
        }

        // Iteratively add elements from y to x.
        let mut carry = false;
        for (xi, yi) in x[xstart..].iter_mut().zip(y.iter()) {
            // Only one op of the two can overflow, since the sum of two legs
            // plus a carry bit still fits the masked range + 1. Add the
            // previous carry, and store the current carry for the next.
            let mut tmp = scalar::iadd(xi, *yi);
            if carry {
                tmp |= scalar::iadd(xi, 1);
            }
            carry = tmp;
        }

        // Overflow from the previous leg.
        if carry {
            small::iadd_impl(x, 1, y.len() + xstart);
        }
    }

    /// AddAssign a big integer to a big integer.
    #[inline]
    pub fn iadd(x: &mut Vec<Leg>, y: &[Leg]) {
        iadd_impl(x, y, 0);
    }

    /// Add two big integers.
    #[inline]
    pub fn add(x: &[Leg], y: &[Leg]) -> Vec<Leg> {
        let mut z = x.to_vec();
        iadd(&mut z, y);
        z
    }

    // SUBTRACTION

    /// SubAssign a big integer from a big integer.
    ///
    /// The minuend must be greater than or equal to the subtrahend.
    pub fn isub(x: &mut Vec<Leg>, y: &[Leg]) {
        debug_assert!(greater_equal(x, y));

        // Iteratively subtract elements of y from x.
        let mut carry = false;
        for (xi, yi) in x.iter_mut().zip(y.iter()) {
            let mut tmp = scalar::isub(xi, *yi);
            if carry {
                tmp |= scalar::isub(xi, 1);
            }
            carry = tmp;
        }

        if carry {
            small::isub_impl(x, 1, y.len());
        } else {
            small::normalize(x);
        }
    }

    /// Subtract two big integers.
    ///
    /// The minuend must be greater than or equal to the subtrahend.
    #[inline]
    pub fn sub(x: &[Leg], y: &[Leg]) -> Vec<Leg> {
        let mut z = x.to_vec();
        isub(&mut z, y);
        z
    }

    // MULTIPLICATION

    /// Number of legs to bottom-out to asymptotically slow algorithms.
    ///
    /// Karatsuba tends to out-perform long multiplication at ~320-640 bits,
    /// so we go halfway. We can toggle this for optimal performance.
    pub const KARATSUBA_CUTOFF: usize = 32;

    /// Grade-school multiplication algorithm.
    ///
    /// Slow, naive algorithm, using leg-sized bases and just shifting left
    /// for each iteration. Works in O(n*m) time. Each iteration, of which
    /// there are `m` iterations, requires `n` multiplications and `n`
    /// additions.
    fn long_mul(x: &[Leg], y: &[Leg]) -> Vec<Leg> {
        // Using the immutable value, multiply by all the scalars in y, using
        // the algorithm defined above. Use a single buffer to avoid frequent
        // reallocations. Handle the first case to avoid a redundant
        // addition, since we know y.len() >= 1.
        let mut z = small::mul(x, y[0]);
        z.resize(x.len() + y.len(), 0);

        // Handle the iterative cases.
        for (i, &yi) in y[1..].iter().enumerate() {
            let zi = small::mul(x, yi);
            iadd_impl(&mut z, &zi, i + 1);
        }

        small::normalize(&mut z);

        z
    }

    /// Split a buffer into halves at `m`, into (lo, hi).
    #[inline]
    fn karatsuba_split(z: &[Leg], m: usize) -> (&[Leg], &[Leg]) {
        (&z[..m], &z[m..])
    }

    /// Karatsuba multiplication algorithm with roughly equal input sizes.
    ///
    /// Assumes `y.len() >= x.len()`.
    fn karatsuba_mul(x: &[Leg], y: &[Leg]) -> Vec<Leg> {
        if y.len() <= KARATSUBA_CUTOFF {
            // Bottom-out to long multiplication for small cases.
            long_mul(x, y)
        } else if x.len() < y.len() / 2 {
            karatsuba_uneven_mul(x, y)
        } else {
            // Do our 3 multiplications.
            let m = y.len() / 2;
            let (xl, xh) = karatsuba_split(x, m);
            let (yl, yh) = karatsuba_split(y, m);
            let sumx = add(xl, xh);
            let sumy = add(yl, yh);
            let z0 = karatsuba_mul(xl, yl);
            let mut z1 = karatsuba_mul(&sumx, &sumy);
            let z2 = karatsuba_mul(xh, yh);
            // Properly scale z1, which is `z1 - z2 - z0`.
            isub(&mut z1, &z2);
            isub(&mut z1, &z0);

            // Create our result, which is equal to, in little-endian order:
            // [z0, z1 - z2 - z0, z2]
            //  z1 must be shifted m legs over.
            //  z2 must be shifted 2*m legs over.
            let len = z0.len().max(m + z1.len()).max(2 * m + z2.len());
            let mut result = Vec::with_capacity(len);
            result.extend_from_slice(&z0);
            iadd_impl(&mut result, &z1, m);
            iadd_impl(&mut result, &z2, 2 * m);

            result
        }
    }

    /// Karatsuba multiplication algorithm where y is substantially larger
    /// than x.
    ///
    /// Assumes `y.len() >= x.len()`.
    fn karatsuba_uneven_mul(x: &[Leg], mut y: &[Leg]) -> Vec<Leg> {
        let mut result = Vec::new();
        result.resize(x.len() + y.len(), 0);

        // This effectively is like grade-school multiplication between two
        // numbers, except we're using splits on `y`, and the intermediate
        // step is a Karatsuba multiplication.
        let mut start = 0;
        while !y.is_empty() {
            let m = x.len().min(y.len());
            let (yl, yh) = karatsuba_split(y, m);
            let prod = karatsuba_mul(x, yl);
            iadd_impl(&mut result, &prod, start);
            y = yh;
            start += m;
        }
        small::normalize(&mut result);

        result
    }

    /// Forwarder to the proper Karatsuba algorithm.
    #[inline]
    fn karatsuba_mul_fwd(x: &[Leg], y: &[Leg]) -> Vec<Leg> {
        if x.len() < y.len() {
            karatsuba_mul(x, y)
        } else {
            karatsuba_mul(y, x)
        }
    }

    /// MulAssign a big integer to a big integer.
    #[inline]
    pub fn imul(x: &mut Vec<Leg>, y: &[Leg]) {
        if y.len() == 1 {
            small::imul(x, y[0]);
        } else {
            *x = karatsuba_mul_fwd(x, y);
        }
    }

    /// Multiply two big integers.
    #[inline]
    pub fn mul(x: &[Leg], y: &[Leg]) -> Vec<Leg> {
        let mut z = x.to_vec();
        imul(&mut z, y);
        z
    }

    // SQUARING

    /// Square a big integer.
    ///
    /// Small operands use the symmetric schoolbook algorithm, which halves
    /// the leg products by doubling the cross terms; larger operands reuse
    /// the Karatsuba path so the two tiers stay bit-identical with `mul`.
    pub fn sqr(x: &[Leg]) -> Vec<Leg> {
        if x.is_empty() {
            return Vec::new();
        }
        if x.len() > KARATSUBA_CUTOFF {
            return mul(x, x);
        }

        let n = x.len();
        let mut z: Vec<Leg> = Vec::new();
        z.resize(2 * n, 0);
        for i in 0..n {
            // Diagonal term, then the doubled cross terms, carrying the
            // running overflow upward as we go.
            let t = z[2 * i] as Wide + x[i] as Wide * x[i] as Wide;
            z[2 * i] = (t as Leg) & LEG_MASK;
            let mut carry = t >> LEG_BITS;
            for j in i + 1..n {
                let t = z[i + j] as Wide + 2 * (x[i] as Wide) * (x[j] as Wide) + carry;
                z[i + j] = (t as Leg) & LEG_MASK;
                carry = t >> LEG_BITS;
            }
            let mut k = i + n;
            while carry != 0 {
                let t = z[k] as Wide + carry;
                z[k] = (t as Leg) & LEG_MASK;
                carry = t >> LEG_BITS;
                k += 1;
            }
        }
        small::normalize(&mut z);

        z
    }

    // DIVISION

    /// Divide two big integers, returning the (quotient, remainder)
    /// magnitudes.
    ///
    /// Knuth's Algorithm D over leg-sized digits: normalize the divisor so
    /// its top magnitude bit is set, estimate each quotient leg from the top
    /// two legs of the running window, correct the estimate with the third
    /// leg, then multiply-subtract with an add-back for the rare
    /// one-too-large case. Single-leg divisors short-circuit to short
    /// division.
    pub fn div_rem(x: &[Leg], y: &[Leg]) -> (Vec<Leg>, Vec<Leg>) {
        debug_assert!(!y.is_empty());

        if less(x, y) {
            return (Vec::new(), x.to_vec());
        }
        if y.len() == 1 {
            let mut q = x.to_vec();
            let r = small::idiv_rem(&mut q, y[0]);
            let mut rem = Vec::new();
            if r != 0 {
                rem.push(r);
            }
            return (q, rem);
        }

        // D1. Normalize so the divisor's top magnitude bit is set. The
        // dividend gains exactly one extra (possibly zero) high leg.
        let shift = y[y.len() - 1].leading_zeros() as usize - LEG_NAILS;
        let mut u = x.to_vec();
        small::ishl_bits(&mut u, shift);
        if u.len() == x.len() {
            u.push(0);
        }
        let mut v = y.to_vec();
        small::ishl_bits(&mut v, shift);

        let n = v.len();
        let m = x.len() - n;
        let vtop = v[n - 1] as Wide;
        let vnext = v[n - 2] as Wide;
        let mut q: Vec<Leg> = Vec::new();
        q.resize(m + 1, 0);

        for j in (0..=m).rev() {
            // D3. Estimate the quotient leg from the top two legs of the
            // window, then refine with the third until the estimate is at
            // most one too large.
            let num = ((u[j + n] as Wide) << LEG_BITS) | u[j + n - 1] as Wide;
            let mut qhat = num / vtop;
            let mut rhat = num - qhat * vtop;
            loop {
                if qhat > LEG_MASK as Wide
                    || qhat * vnext > ((rhat << LEG_BITS) | u[j + n - 2] as Wide)
                {
                    qhat -= 1;
                    rhat += vtop;
                    if rhat <= LEG_MASK as Wide {
                        continue;
                    }
                }
                break;
            }

            // D4. Multiply and subtract qhat * v from the window.
            let qh = qhat as Leg;
            let mut carry: Wide = 0;
            let mut borrow: Leg = 0;
            for i in 0..n {
                let p = qh as Wide * v[i] as Wide + carry;
                carry = p >> LEG_BITS;
                let take = ((p as Leg) & LEG_MASK) as Wide + borrow as Wide;
                let ui = u[j + i] as Wide;
                if ui >= take {
                    u[j + i] = (ui - take) as Leg;
                    borrow = 0;
                } else {
                    u[j + i] = ((ui + ((1 as Wide) << LEG_BITS)) - take) as Leg;
                    borrow = 1;
                }
            }
            let take = carry + borrow as Wide;
            let ut = u[j + n] as Wide;
            if ut >= take {
                u[j + n] = (ut - take) as Leg;
                q[j] = qh;
            } else {
                // D6. The estimate was one too large after all; add the
                // divisor back and let the final carry cancel the borrow.
                u[j + n] = ((ut + ((1 as Wide) << LEG_BITS)) - take) as Leg;
                q[j] = qh - 1;
                let mut c = false;
                for i in 0..n {
                    let (leg, mut cc) = scalar::add(u[j + i], v[i]);
                    let mut leg = leg;
                    if c {
                        let t = scalar::add(leg, 1);
                        leg = t.0;
                        cc |= t.1;
                    }
                    u[j + i] = leg;
                    c = cc;
                }
                u[j + n] = (u[j + n] + c as Leg) & LEG_MASK;
            }
        }

        // D8. The remainder is the low window, denormalized.
        small::normalize(&mut q);
        u.truncate(n);
        small::ishr_bits(&mut u, shift);

        (q, u)
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn legs(mut x: u128) -> Vec<Leg> {
        let mut v = Vec::new();
        while x != 0 {
            v.push((x as Leg) & LEG_MASK);
            x >>= LEG_BITS;
        }
        v
    }

    fn value(x: &[Leg]) -> u128 {
        x.iter()
            .rev()
            .fold(0u128, |acc, &leg| (acc << LEG_BITS) | leg as u128)
    }

    // Deterministic pattern generator for operands too wide for u128.
    fn pattern(len: usize, seed: Leg) -> Vec<Leg> {
        let mut state = seed | 1;
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            state = state.wrapping_mul(6364136223846793005u64 as Leg).wrapping_add(1442695040888963407u64 as Leg);
            v.push(state & LEG_MASK);
        }
        small::normalize(&mut v);
        v
    }

    #[test]
    fn scalar_test() {
        assert_eq!(scalar::add(LEG_MASK, 1), (0, true));
        assert_eq!(scalar::add(LEG_MASK - 1, 1), (LEG_MASK, false));
        assert_eq!(scalar::sub(0, 1), (LEG_MASK, true));
        assert_eq!(scalar::sub(5, 2), (3, false));
        assert_eq!(scalar::mul(LEG_MASK, LEG_MASK, LEG_MASK), (0, LEG_MASK));
        assert_eq!(scalar::mul(7, 6, 5), (47, 0));
    }

    #[test]
    fn compare_test() {
        let x = legs(1);
        let y = legs(2);
        assert_eq!(large::compare(&x, &y), cmp::Ordering::Less);
        assert_eq!(large::compare(&x, &x), cmp::Ordering::Equal);
        assert_eq!(large::compare(&y, &x), cmp::Ordering::Greater);

        // Check asymmetric lengths and reverse ordering.
        let x = legs((9u128 << (2 * LEG_BITS)) | (1 << LEG_BITS));
        let y = legs((9u128 << (2 * LEG_BITS)) | ((1 << LEG_BITS) - 1));
        assert_eq!(large::compare(&x, &y), cmp::Ordering::Greater);
        assert_eq!(large::compare(&y, &x), cmp::Ordering::Less);
    }

    #[test]
    fn iadd_small_test() {
        // Carry across one leg.
        let mut x = legs(LEG_MASK as u128);
        small::iadd(&mut x, 5);
        assert_eq!(value(&x), LEG_MASK as u128 + 5);

        // Carry across two legs.
        let mut x = legs(((LEG_MASK as u128) << LEG_BITS) | LEG_MASK as u128);
        small::iadd(&mut x, 7);
        assert_eq!(value(&x), (((LEG_MASK as u128) << LEG_BITS) | LEG_MASK as u128) + 7);

        // No overflow.
        let mut x = legs(5);
        small::iadd(&mut x, 7);
        assert_eq!(value(&x), 12);
    }

    #[test]
    fn imul_small_test() {
        let a = (1u128 << LEG_BITS) | 12345;
        let mut x = legs(a);
        small::imul(&mut x, 5);
        assert_eq!(value(&x), a * 5);

        let mut x = legs(LEG_MASK as u128);
        small::imul(&mut x, LEG_MASK);
        assert_eq!(value(&x), LEG_MASK as u128 * LEG_MASK as u128);
    }

    #[test]
    fn idiv_rem_small_test() {
        let a = (0xD2210408u128 << LEG_BITS) | 0x44208100;
        let mut x = legs(a);
        let r = small::idiv_rem(&mut x, 10007);
        assert_eq!(value(&x), a / 10007);
        assert_eq!(r as u128, a % 10007);

        // Quotient shrinks by a leg.
        let mut x = legs(1u128 << LEG_BITS);
        let r = small::idiv_rem(&mut x, 2);
        assert_eq!(value(&x), 1u128 << (LEG_BITS - 1));
        assert_eq!(r, 0);
    }

    #[test]
    fn shl_test() {
        let a = 0xD2210408u128;
        let mut big = legs(a);
        small::ishl(&mut big, 5);
        assert_eq!(value(&big), a << 5);
        small::ishl(&mut big, LEG_BITS);
        assert_eq!(big[0], 0);
        assert_eq!(value(&big), a << (5 + LEG_BITS));
    }

    #[test]
    fn shr_test() {
        let a = 0xD2210408u128 << (LEG_BITS + 7);
        let mut big = legs(a);
        small::ishr(&mut big, LEG_BITS + 7);
        assert_eq!(value(&big), 0xD2210408);

        // Shifting everything out empties the buffer.
        let mut big = legs(3);
        small::ishr(&mut big, 2);
        assert!(big.is_empty());
    }

    #[test]
    fn shift_round_trip_test() {
        let x = pattern(17, 3);
        for shift in [1usize, 13, LEG_BITS - 1, LEG_BITS, 3 * LEG_BITS + 7] {
            let mut y = x.clone();
            small::ishl(&mut y, shift);
            small::ishr(&mut y, shift);
            assert_eq!(y, x);
        }
    }

    #[test]
    fn bit_length_test() {
        assert_eq!(small::bit_length(&[]), 0);
        assert_eq!(small::bit_length(&[1]), 1);
        assert_eq!(small::bit_length(&[3]), 2);
        assert_eq!(small::bit_length(&legs(1u128 << LEG_BITS)), LEG_BITS + 1);
    }

    #[test]
    fn trailing_zeros_test() {
        assert_eq!(small::trailing_zeros(&[1]), 0);
        assert_eq!(small::trailing_zeros(&[4]), 2);
        assert_eq!(small::trailing_zeros(&legs(1u128 << (LEG_BITS + 3))), LEG_BITS + 3);
    }

    #[test]
    fn low_bits_nonzero_test() {
        let x = legs(1u128 << LEG_BITS);
        assert!(!small::low_bits_nonzero(&x, LEG_BITS));
        assert!(small::low_bits_nonzero(&x, LEG_BITS + 1));
        assert!(!small::low_bits_nonzero(&legs(8), 3));
        assert!(small::low_bits_nonzero(&legs(8), 4));
    }

    #[test]
    fn large_add_sub_test() {
        let a = 0x123456789ABCDEF0123456789u128;
        let b = 0xFEDCBA9876543210Fu128;
        let z = large::add(&legs(a), &legs(b));
        assert_eq!(value(&z), a + b);

        let z = large::sub(&legs(a), &legs(b));
        assert_eq!(value(&z), a - b);

        // Borrow chain across every leg.
        let a = 1u128 << (2 * LEG_BITS);
        let z = large::sub(&legs(a), &legs(1));
        assert_eq!(value(&z), a - 1);
    }

    #[test]
    fn mul_test() {
        let a = 0xD3B4E926AABA3040Eu128;
        let b = 0x1A821E41257ED92u128;
        let z = large::mul(&legs(a), &legs(b));
        assert_eq!(value(&z), a * b);

        // Multiplying by zero produces the canonical empty magnitude.
        let z = large::mul(&legs(a), &[]);
        assert!(z.is_empty());
    }

    #[test]
    fn karatsuba_matches_long_mul_test() {
        // Big enough to recurse, uneven enough to hit the uneven path.
        for (xl, yl) in [(40, 40), (40, 130), (130, 40), (97, 101)] {
            let x = pattern(xl, 17);
            let y = pattern(yl, 5);
            let mut expected = small::mul(&x, y[0]);
            expected.resize(x.len() + y.len(), 0);
            for (i, &yi) in y[1..].iter().enumerate() {
                let zi = small::mul(&x, yi);
                large::iadd_impl(&mut expected, &zi, i + 1);
            }
            small::normalize(&mut expected);
            assert_eq!(large::mul(&x, &y), expected);
        }
    }

    #[test]
    fn sqr_test() {
        let a = 0xD3B4E926AABA3040E1C12B5Eu128;
        let z = large::sqr(&legs(a));
        assert_eq!(value(&z), a.wrapping_mul(a));

        for len in [1usize, 7, 31, 33, 70] {
            let x = pattern(len, 9);
            assert_eq!(large::sqr(&x), large::mul(&x, &x));
        }
        assert!(large::sqr(&[]).is_empty());
    }

    #[test]
    fn div_rem_test() {
        let cases: [(u128, u128); 6] = [
            (54321, 12345),
            (0xD3B4E926AABA3040E1C12B5EA553B5, 0x1A821E41257ED9281BEE5BC7789EA7),
            (0x1000000000000000000000000, 3),
            (0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFF, 0x10000000000000001),
            (12345, 54321),
            (1, 1),
        ];
        for (a, b) in cases {
            let (q, r) = large::div_rem(&legs(a), &legs(b));
            assert_eq!(value(&q), a / b, "quotient of {:#x} / {:#x}", a, b);
            assert_eq!(value(&r), a % b, "remainder of {:#x} % {:#x}", a, b);
        }
    }

    #[test]
    fn div_rem_reconstruction_test() {
        // q*y + r == x and r < y, over operands far wider than the
        // estimation window.
        for (xl, yl, seed) in [(80, 30, 1), (45, 2, 7), (64, 63, 11), (33, 33, 13)] {
            let x = pattern(xl, seed);
            let y = pattern(yl, seed + 1);
            let (q, r) = large::div_rem(&x, &y);
            assert!(r.is_empty() || large::less(&r, &y));
            let mut back = large::mul(&q, &y);
            large::iadd(&mut back, &r);
            small::normalize(&mut back);
            assert_eq!(back, x);
        }
    }

    #[test]
    fn div_rem_window_edges_test() {
        // Divisor legs of all ones push the quotient estimate to its
        // correction path.
        let y = vec![LEG_MASK; 3];
        let mut x = vec![LEG_MASK; 7];
        let (q, r) = large::div_rem(&x, &y);
        let mut back = large::mul(&q, &y);
        large::iadd(&mut back, &r);
        assert_eq!(back, x);
        assert!(large::less(&r, &y));

        // Power-of-two divisor straddling a leg boundary.
        x = pattern(12, 29);
        let mut y = vec![0, 0, 1];
        small::ishl_bits(&mut y, LEG_BITS / 2);
        let (q, r) = large::div_rem(&x, &y);
        let mut back = large::mul(&q, &y);
        large::iadd(&mut back, &r);
        assert_eq!(back, x);
        assert!(large::less(&r, &y));
    }
}
