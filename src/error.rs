//! When an arithmetic operation or a numeral conversion goes wrong.

use alloc::boxed::Box;
use core::fmt::{self, Debug, Display};
use core::result;
#[cfg(feature = "std")]
use std::error;

/// This type represents all possible errors that can occur when operating on
/// arbitrary-precision integers.
pub struct Error {
    /// This `Box` allows us to keep the size of `Error` as small as possible.
    /// A larger `Error` type was substantially slower due to all the
    /// functions that pass around `Result<T, Error>`.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `bigmath::Error`.
pub type Result<T> = result::Result<T, Error>;

impl Error {
    /// Categorizes the cause of this error.
    pub fn code(&self) -> ErrorCode {
        self.err.code
    }

    /// Zero-based byte offset at which the error was detected, for errors
    /// raised while parsing a numeral. `None` for all other errors.
    pub fn position(&self) -> Option<usize> {
        self.err.position
    }
}

struct ErrorImpl {
    code: ErrorCode,
    position: Option<usize>,
}

/// Categorizes all possible errors reported by this crate.
///
/// The enumeration is closed: embedding layers that surface failure modes a
/// pure-Rust build cannot hit (allocation failure, pointer validation,
/// fixed-size output buffers, operations compiled out) reuse the reserved
/// codes rather than inventing their own.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorCode {
    /// Storage growth failed. Reserved: a pure-Rust build aborts on
    /// allocation failure instead of reporting it.
    OutOfMemory,

    /// Internal consistency failure. Reserved for embedding layers that
    /// validate raw handles.
    InvalidPointer,

    /// Malformed input: a radix outside 2..=64, a character invalid for the
    /// requested radix, or a negative value passed to an unsigned-only
    /// operation such as `shr`, `sqrt` or `root_n`.
    InvalidArgument,

    /// Mathematically undefined request: the logarithm of a non-positive
    /// value, or zero raised to a negative power.
    MathDomainError,

    /// The divisor was zero.
    DivisionByZero,

    /// The value does not fit the requested fixed-width integer type.
    IntegerOverflow,

    /// The value is below the smallest representable value of the requested
    /// fixed-width integer type.
    IntegerUnderflow,

    /// An iterative algorithm failed to converge within its internal bound.
    /// Observing this for a well-formed input is a library defect.
    MaxIterationsReached,

    /// An output buffer was too small. Reserved: this crate renders into
    /// growable strings.
    BufferOverflow,

    /// The operation is not available in this build configuration. Reserved.
    Unimplemented,
}

impl ErrorCode {
    /// A stable, locale-independent description of this error kind.
    ///
    /// The returned strings are part of the crate's contract and never
    /// change between releases; callers may match on them.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::OutOfMemory => "out of memory",
            ErrorCode::InvalidPointer => "invalid pointer",
            ErrorCode::InvalidArgument => "invalid argument",
            ErrorCode::MathDomainError => "math domain error",
            ErrorCode::DivisionByZero => "division by zero",
            ErrorCode::IntegerOverflow => "integer overflow",
            ErrorCode::IntegerUnderflow => "integer underflow",
            ErrorCode::MaxIterationsReached => "maximum iterations reached",
            ErrorCode::BufferOverflow => "buffer overflow",
            ErrorCode::Unimplemented => "unimplemented",
        }
    }
}

impl Error {
    #[cold]
    pub(crate) fn new(code: ErrorCode) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                position: None,
            }),
        }
    }

    #[cold]
    pub(crate) fn parse(code: ErrorCode, position: usize) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                code,
                position: Some(position),
            }),
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&*self.err, f)
    }
}

impl Display for ErrorImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.position {
            None => Display::fmt(&self.code, f),
            Some(position) => write!(f, "{} at byte {}", self.code, position),
        }
    }
}

// Remove two layers of verbosity from the debug representation. Humans often
// end up seeing this representation because it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.err.position {
            None => write!(f, "Error({:?})", self.err.code),
            Some(position) => write!(f, "Error({:?}, byte: {})", self.err.code, position),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}
