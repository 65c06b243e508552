//! Arbitrary-precision signed integer arithmetic.
//!
//! The [`Int`] type stores a sign and a growable little-endian vector of
//! fixed-width legs, and supports the elementary operations (addition,
//! subtraction, multiplication, squaring, comparison, shifts), floor
//! division with remainder, and a set of extended operations: powers,
//! integer logarithms, square and n-th roots, perfect-square testing,
//! gcd/lcm, and [`factorial`].
//!
//! Operations take their operands by shared reference and return freshly
//! allocated results; fallible operations return [`Result`] with a
//! structured [`ErrorCode`] instead of panicking on user input.
//!
//! ```
//! use bigmath::Int;
//!
//! # fn main() -> bigmath::Result<()> {
//! let a: Int = "123456789012345678901234567890".parse()?;
//! let b = Int::from(987654321u64);
//! let (q, r) = a.div_rem(&b)?;
//! assert_eq!(q.mul(&b).add(&r), a);
//! # Ok(())
//! # }
//! ```
//!
//! Numerals parse and render in any radix from 2 through 64:
//!
//! ```
//! use bigmath::Int;
//!
//! # fn main() -> bigmath::Result<()> {
//! let x = Int::from_str_radix("-d3b4e926aaba3040e1c12b5ea553b5", 16)?;
//! assert_eq!(Int::from_str_radix(&x.to_str_radix(36)?, 36)?, x);
//! # Ok(())
//! # }
//! ```
//!
//! Division rounds the quotient toward negative infinity, so the remainder
//! always takes the divisor's sign:
//!
//! ```
//! use bigmath::Int;
//!
//! # fn main() -> bigmath::Result<()> {
//! let (q, r) = Int::from(-7).div_rem(&Int::from(2))?;
//! assert_eq!((q, r), (Int::from(-4), Int::from(1)));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

extern crate alloc;

mod arith;
mod error;
mod int;
mod ops;
mod radix;
#[cfg(feature = "serde")]
mod serde;

pub use crate::arith::{Leg, LEG_BITS, LEG_NAILS};
pub use crate::error::{Error, ErrorCode, Result};
pub use crate::int::{Int, Sign};
pub use crate::ops::factorial;
