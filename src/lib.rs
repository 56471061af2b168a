//! Fixed-capacity big numbers.
//!
//! Three layers, each parametrized by a number of 64-bit limbs chosen at
//! compile time:
//!
//! * [`UInt<N>`] -- an unsigned integer stored as `N` limbs, with carry
//!   reported from every operation that can wrap,
//! * [`Int<N>`] -- its two's-complement signed counterpart,
//! * [`Big<E, M>`] -- a binary floating point value built from an `Int<E>`
//!   exponent and a `UInt<M>` mantissa, together with the elementary
//!   functions in [`functions`].
//!
//! All types are plain value types (`Copy`), there is no heap-resident
//! number representation and no operation allocates outside of short-lived
//! scratch buffers. Overflow is a value, not a panic: arithmetic primitives
//! return a carry/borrow `bool`, domain errors surface as
//! [`MathError`](error::MathError).

pub mod big;
pub mod error;
pub mod functions;
pub mod int;
pub mod uint;

mod words;

pub use big::string::{DigitsAfterPoint, FormatOpts, LnCache};
pub use big::Big;
pub use error::MathError;
pub use int::Int;
pub use uint::UInt;

/// Upper bound for the iterative series in [`functions`] and in the
/// fractional part of parsing. Convergence is normally reached long before
/// this; the cap only guards against degenerate inputs.
pub const MAX_SERIES_ITERATIONS: u32 = 5000;
