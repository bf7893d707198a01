//! Precomputed two's-complement range bounds for every supported bit width.
//!
//! The table is built once on first access and shared read-only afterwards.
//! For a width `w`, the checked-construction range of a [`Bits`](crate::Bits)
//! value is `[lower(w), upper(w)]` = `[-2^(w-1), 2^w - 1]`.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use std::sync::OnceLock;

/// The widest supported bit vector.
pub const MAX_WIDTH: u32 = 1023;

struct WidthBounds {
    /// `2^w - 1`, the largest unsigned value of width `w`.
    upper: BigUint,
    /// The same bits as `upper`, usable as a mask in signed arithmetic.
    mask: BigInt,
    /// `-2^(w-1)`, the most negative two's-complement value of width `w`.
    lower: BigInt,
}

static TABLE: OnceLock<Vec<WidthBounds>> = OnceLock::new();

fn table() -> &'static [WidthBounds] {
    TABLE.get_or_init(|| {
        let mut t = Vec::with_capacity(MAX_WIDTH as usize + 1);
        // Index 0 is a placeholder; valid widths start at 1.
        t.push(WidthBounds {
            upper: BigUint::zero(),
            mask: BigInt::zero(),
            lower: BigInt::zero(),
        });
        let mut upper = BigUint::one();
        let mut lower = BigInt::from(-1);
        for _ in 1..=MAX_WIDTH {
            t.push(WidthBounds {
                upper: upper.clone(),
                mask: BigInt::from(upper.clone()),
                lower: lower.clone(),
            });
            upper = (&upper << 1u32) + 1u32;
            lower = lower << 1u32;
        }
        t
    })
}

/// Returns `2^width - 1`, the inclusive unsigned upper bound.
///
/// # Panics
///
/// Panics if `width` is 0 or greater than [`MAX_WIDTH`].
pub fn upper(width: u32) -> &'static BigUint {
    check_width(width);
    &table()[width as usize].upper
}

/// Returns the width mask (`2^width - 1`) as a [`BigInt`].
///
/// # Panics
///
/// Panics if `width` is 0 or greater than [`MAX_WIDTH`].
pub fn mask(width: u32) -> &'static BigInt {
    check_width(width);
    &table()[width as usize].mask
}

/// Returns `-2^(width-1)`, the inclusive two's-complement lower bound.
///
/// # Panics
///
/// Panics if `width` is 0 or greater than [`MAX_WIDTH`].
pub fn lower(width: u32) -> &'static BigInt {
    check_width(width);
    &table()[width as usize].lower
}

/// Asserts that `width` is in `1..=MAX_WIDTH`.
pub fn check_width(width: u32) {
    assert!(
        width >= 1 && width <= MAX_WIDTH,
        "bit width {width} outside supported range 1..={MAX_WIDTH}"
    );
}
