//! Fixed-width two's-complement bit vectors.
//!
//! [`Bits`] is the universal value type carried by every signal in a
//! simulated circuit. A value always fits its declared width; no sign is
//! stored. Signedness is an interpretation recovered on demand via
//! [`Bits::int`]. Arithmetic wraps at the result width, which for two
//! vector operands is the maximum of the operand widths.

use crate::bounds::{self, MAX_WIDTH};
use crate::error::ValueError;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Not, Rem, Shl, Shr, Sub};

/// A fixed-width two's-complement integer value.
///
/// Invariant: the stored unsigned value always satisfies
/// `uint <= 2^width - 1` and `1 <= width <= `[`MAX_WIDTH`].
/// Values are immutable by convention; the simulation engine replaces whole
/// net values rather than mutating them in place.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bits {
    width: u32,
    uint: BigUint,
}

impl Bits {
    /// Creates an all-zero vector of the given width.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or greater than [`MAX_WIDTH`].
    pub fn new(width: u32) -> Self {
        bounds::check_width(width);
        Self {
            width,
            uint: BigUint::zero(),
        }
    }

    /// Checked construction from an integer.
    ///
    /// Fails with [`ValueError::Range`] when `value` lies outside
    /// `[-2^(width-1), 2^width - 1]`. Negative values are two's-complement
    /// encoded.
    pub fn from_int(width: u32, value: i128) -> Result<Self, ValueError> {
        Self::from_bigint(width, &BigInt::from(value))
    }

    /// Checked construction from an arbitrary-precision integer.
    pub fn from_bigint(width: u32, value: &BigInt) -> Result<Self, ValueError> {
        bounds::check_width(width);
        let in_range = match value.sign() {
            Sign::Minus => value >= bounds::lower(width),
            _ => value.magnitude() <= bounds::upper(width),
        };
        if !in_range {
            return Err(ValueError::Range {
                value: value.clone(),
                width,
            });
        }
        let uint = (value & bounds::mask(width)).to_biguint().unwrap();
        Ok(Self { width, uint })
    }

    /// Truncating construction: always succeeds, masks to `width` bits.
    pub fn from_int_trunc(width: u32, value: i128) -> Self {
        Self::from_bigint_trunc(width, &BigInt::from(value))
    }

    /// Truncating construction from an arbitrary-precision integer.
    pub fn from_bigint_trunc(width: u32, value: &BigInt) -> Self {
        bounds::check_width(width);
        let uint = (value & bounds::mask(width)).to_biguint().unwrap();
        Self { width, uint }
    }

    /// Truncating construction from an unsigned arbitrary-precision integer.
    pub fn from_biguint_trunc(width: u32, value: &BigUint) -> Self {
        bounds::check_width(width);
        Self {
            width,
            uint: value & bounds::upper(width),
        }
    }

    /// Re-widths another vector without truncation.
    ///
    /// Zero-extends a narrower source; fails with [`ValueError::Width`] if
    /// the source is wider than `width`. Narrowing is only possible through
    /// an explicit [`slice`](Bits::slice).
    pub fn from_bits(width: u32, value: &Bits) -> Result<Self, ValueError> {
        bounds::check_width(width);
        if value.width > width {
            return Err(ValueError::Width {
                src: value.width,
                dst: width,
            });
        }
        Ok(Self {
            width,
            uint: value.uint.clone(),
        })
    }

    /// Parses a textual literal with the given target width.
    ///
    /// Accepts `0b`, `0o`, and `0x` prefixed digits, or bare decimal digits.
    /// The strings produced by [`bin`](Bits::bin), [`oct`](Bits::oct), and
    /// [`hex`](Bits::hex) round-trip through this function at the same width.
    pub fn parse(width: u32, text: &str) -> Result<Self, ValueError> {
        bounds::check_width(width);
        let t = text.trim();
        let (digits, radix) = if let Some(d) = t.strip_prefix("0b").or_else(|| t.strip_prefix("0B"))
        {
            (d, 2)
        } else if let Some(d) = t.strip_prefix("0o").or_else(|| t.strip_prefix("0O")) {
            (d, 8)
        } else if let Some(d) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
            (d, 16)
        } else {
            (t, 10)
        };
        let uint = BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(|| {
            ValueError::Parse {
                text: text.to_string(),
            }
        })?;
        if &uint > bounds::upper(width) {
            return Err(ValueError::Range {
                value: BigInt::from(uint),
                width,
            });
        }
        Ok(Self { width, uint })
    }

    /// Returns the declared width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the unsigned value.
    pub fn uint(&self) -> &BigUint {
        &self.uint
    }

    /// Returns the signed value via two's-complement decoding.
    pub fn int(&self) -> BigInt {
        if self.uint.bit(u64::from(self.width) - 1) {
            BigInt::from(self.uint.clone()) - (BigInt::one() << self.width)
        } else {
            BigInt::from(self.uint.clone())
        }
    }

    /// Returns the unsigned value as `u64` when it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.uint.to_u64()
    }

    /// Returns true if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.uint.is_zero()
    }

    /// Reads a single bit.
    ///
    /// Fails with [`ValueError::Index`] when `index >= width`.
    pub fn bit(&self, index: u32) -> Result<bool, ValueError> {
        if index >= self.width {
            return Err(ValueError::Index {
                index,
                width: self.width,
            });
        }
        Ok(self.uint.bit(u64::from(index)))
    }

    /// Writes a single bit in place.
    pub fn set_bit(&mut self, index: u32, value: bool) -> Result<(), ValueError> {
        if index >= self.width {
            return Err(ValueError::Index {
                index,
                width: self.width,
            });
        }
        self.uint.set_bit(u64::from(index), value);
        Ok(())
    }

    /// Part-select: extracts bits `[start, stop)` as a new vector of width
    /// `stop - start`.
    ///
    /// Requires `start < stop <= width`, otherwise [`ValueError::Slice`].
    pub fn slice(&self, start: u32, stop: u32) -> Result<Bits, ValueError> {
        if start >= stop || stop > self.width {
            return Err(ValueError::Slice {
                start,
                stop,
                width: self.width,
            });
        }
        let w = stop - start;
        Ok(Bits {
            width: w,
            uint: (&self.uint >> start) & bounds::upper(w),
        })
    }

    /// Assigns into bits `[start, stop)` in place.
    ///
    /// A narrower source zero-extends within the slice; a wider one fails
    /// with [`ValueError::Width`].
    pub fn set_slice(&mut self, start: u32, stop: u32, value: &Bits) -> Result<(), ValueError> {
        if start >= stop || stop > self.width {
            return Err(ValueError::Slice {
                start,
                stop,
                width: self.width,
            });
        }
        let w = stop - start;
        if value.width > w {
            return Err(ValueError::Width {
                src: value.width,
                dst: w,
            });
        }
        let region = bounds::upper(w) << start;
        let keep = bounds::upper(self.width) ^ &region;
        self.uint = (&self.uint & keep) | (&value.uint << start);
        Ok(())
    }

    /// Adds a plain integer. The result keeps this vector's width; the
    /// integer must fit that width's range, else [`ValueError::Range`].
    pub fn add_int(&self, value: i128) -> Result<Bits, ValueError> {
        Ok(self + &Bits::from_int(self.width, value)?)
    }

    /// Subtracts a plain integer (see [`add_int`](Bits::add_int)).
    pub fn sub_int(&self, value: i128) -> Result<Bits, ValueError> {
        Ok(self - &Bits::from_int(self.width, value)?)
    }

    /// Multiplies by a plain integer (see [`add_int`](Bits::add_int)).
    pub fn mul_int(&self, value: i128) -> Result<Bits, ValueError> {
        Ok(self * &Bits::from_int(self.width, value)?)
    }

    /// Bitwise AND with a plain integer (see [`add_int`](Bits::add_int)).
    pub fn and_int(&self, value: i128) -> Result<Bits, ValueError> {
        Ok(self & &Bits::from_int(self.width, value)?)
    }

    /// Bitwise OR with a plain integer (see [`add_int`](Bits::add_int)).
    pub fn or_int(&self, value: i128) -> Result<Bits, ValueError> {
        Ok(self | &Bits::from_int(self.width, value)?)
    }

    /// Bitwise XOR with a plain integer (see [`add_int`](Bits::add_int)).
    pub fn xor_int(&self, value: i128) -> Result<Bits, ValueError> {
        Ok(self ^ &Bits::from_int(self.width, value)?)
    }

    /// Division that reports a zero divisor instead of panicking.
    pub fn checked_div(&self, rhs: &Bits) -> Result<Bits, ValueError> {
        if rhs.uint.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        Ok(self / rhs)
    }

    /// Remainder that reports a zero divisor instead of panicking.
    pub fn checked_rem(&self, rhs: &Bits) -> Result<Bits, ValueError> {
        if rhs.uint.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        Ok(self % rhs)
    }

    /// Equality against a plain integer.
    ///
    /// A negative comparand always compares unequal. This is a deliberate,
    /// documented simplification of the value model, not an oversight.
    pub fn eq_int(&self, value: i128) -> bool {
        if value < 0 {
            return false;
        }
        self.uint == BigUint::from(value as u128)
    }

    /// Unsigned ordering against a plain integer.
    ///
    /// Returns `None` for a negative comparand (see [`eq_int`](Bits::eq_int)).
    pub fn cmp_int(&self, value: i128) -> Option<Ordering> {
        if value < 0 {
            return None;
        }
        Some(self.uint.cmp(&BigUint::from(value as u128)))
    }

    /// `self < value` under unsigned interpretation.
    pub fn lt_int(&self, value: i128) -> bool {
        matches!(self.cmp_int(value), Some(Ordering::Less))
    }

    /// `self <= value` under unsigned interpretation.
    pub fn le_int(&self, value: i128) -> bool {
        matches!(
            self.cmp_int(value),
            Some(Ordering::Less) | Some(Ordering::Equal)
        )
    }

    /// `self > value` under unsigned interpretation.
    pub fn gt_int(&self, value: i128) -> bool {
        matches!(self.cmp_int(value), Some(Ordering::Greater))
    }

    /// `self >= value` under unsigned interpretation.
    pub fn ge_int(&self, value: i128) -> bool {
        matches!(
            self.cmp_int(value),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        )
    }

    /// Unsigned magnitude comparison, ignoring widths.
    pub fn cmp_value(&self, other: &Bits) -> Ordering {
        self.uint.cmp(&other.uint)
    }

    /// Binary rendering: `0b` prefix, zero-padded to `width` digits.
    pub fn bin(&self) -> String {
        format!(
            "0b{}",
            zfill(&format!("{:b}", self.uint), self.width as usize)
        )
    }

    /// Octal rendering: `0o` prefix, zero-padded to `ceil(width / 3)` digits.
    pub fn oct(&self) -> String {
        format!(
            "0o{}",
            zfill(&format!("{:o}", self.uint), self.width.div_ceil(3) as usize)
        )
    }

    /// Hexadecimal rendering: `0x` prefix, zero-padded to `ceil(width / 4)`
    /// digits.
    pub fn hex(&self) -> String {
        format!(
            "0x{}",
            zfill(&format!("{:x}", self.uint), self.width.div_ceil(4) as usize)
        )
    }
}

fn zfill(digits: &str, len: usize) -> String {
    if digits.len() >= len {
        digits.to_string()
    } else {
        "0".repeat(len - digits.len()) + digits
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            zfill(&format!("{:x}", self.uint), self.width.div_ceil(4) as usize)
        )
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits{}({})", self.width, self.hex())
    }
}

impl Add for &Bits {
    type Output = Bits;

    fn add(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: (&self.uint + &rhs.uint) & bounds::upper(w),
        }
    }
}

impl Sub for &Bits {
    type Output = Bits;

    fn sub(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        let diff = BigInt::from(self.uint.clone()) - BigInt::from(rhs.uint.clone());
        Bits {
            width: w,
            uint: (diff & bounds::mask(w)).to_biguint().unwrap(),
        }
    }
}

impl Mul for &Bits {
    type Output = Bits;

    fn mul(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: (&self.uint * &rhs.uint) & bounds::upper(w),
        }
    }
}

impl Div for &Bits {
    type Output = Bits;

    /// Unsigned floor division.
    ///
    /// # Panics
    ///
    /// Panics on a zero divisor; use [`Bits::checked_div`] to get an error
    /// instead.
    fn div(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: &self.uint / &rhs.uint,
        }
    }
}

impl Rem for &Bits {
    type Output = Bits;

    /// Unsigned remainder.
    ///
    /// # Panics
    ///
    /// Panics on a zero divisor; use [`Bits::checked_rem`] to get an error
    /// instead.
    fn rem(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: &self.uint % &rhs.uint,
        }
    }
}

impl BitAnd for &Bits {
    type Output = Bits;

    fn bitand(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: &self.uint & &rhs.uint,
        }
    }
}

impl BitOr for &Bits {
    type Output = Bits;

    fn bitor(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: &self.uint | &rhs.uint,
        }
    }
}

impl BitXor for &Bits {
    type Output = Bits;

    fn bitxor(self, rhs: &Bits) -> Bits {
        let w = self.width.max(rhs.width);
        Bits {
            width: w,
            uint: &self.uint ^ &rhs.uint,
        }
    }
}

impl Not for &Bits {
    type Output = Bits;

    fn not(self) -> Bits {
        Bits {
            width: self.width,
            uint: bounds::upper(self.width) ^ &self.uint,
        }
    }
}

impl Shl<u32> for &Bits {
    type Output = Bits;

    /// Left shift; an amount at or beyond the width yields all zeros.
    fn shl(self, amount: u32) -> Bits {
        if amount >= self.width {
            return Bits::new(self.width);
        }
        Bits {
            width: self.width,
            uint: (&self.uint << amount) & bounds::upper(self.width),
        }
    }
}

impl Shr<u32> for &Bits {
    type Output = Bits;

    /// Logical (unsigned) right shift.
    fn shr(self, amount: u32) -> Bits {
        Bits {
            width: self.width,
            uint: &self.uint >> amount,
        }
    }
}
