//! Value-level error taxonomy for bit-vector operations.
//!
//! These are runtime data errors: a bad value aborts the current operation
//! (and, during simulation, the current cycle) rather than being silently
//! recovered. Width-validity violations are programming errors and panic
//! instead.

use num_bigint::BigInt;

/// Errors produced by [`Bits`](crate::Bits) construction and access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A value lies outside the two's-complement range of the target width.
    #[error("value {value} does not fit in {width} bits (two's complement)")]
    Range {
        /// The offending value.
        value: BigInt,
        /// The target width in bits.
        width: u32,
    },

    /// A source vector is wider than the destination and was not explicitly
    /// truncated.
    #[error("a {src}-bit vector is too wide for {dst} bits without explicit truncation")]
    Width {
        /// Width of the source vector.
        src: u32,
        /// Width of the destination.
        dst: u32,
    },

    /// A single-bit index is out of bounds.
    #[error("bit index {index} out of bounds for width {width}")]
    Index {
        /// The requested bit index.
        index: u32,
        /// The vector width.
        width: u32,
    },

    /// A part-select range is malformed or out of bounds.
    #[error("invalid part-select [{start}:{stop}] for width {width}")]
    Slice {
        /// Inclusive start bit.
        start: u32,
        /// Exclusive stop bit.
        stop: u32,
        /// The vector width.
        width: u32,
    },

    /// Division or remainder with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A textual literal could not be parsed as a bit vector.
    #[error("cannot parse {text:?} as a bit vector literal")]
    Parse {
        /// The rejected input text.
        text: String,
    },
}
