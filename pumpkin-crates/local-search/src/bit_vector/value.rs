use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::Random;
use crate::ls_assert_eq_simple;
use crate::ls_assert_simple;

/// The largest width supported by a [`BitVector`].
pub const MAX_WIDTH: u32 = 64;

/// Returns a mask with the `num_bits` least significant bits set.
pub(crate) const fn low_mask(num_bits: u32) -> u64 {
    if num_bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << num_bits) - 1
    }
}

/// A fixed-width bit-vector value of width `1..=64`.
///
/// The bits above the width are always zero; all arithmetic wraps modulo `2^width`. Operations on
/// two bit-vectors require both to have the same width (apart from [`BitVector::concat`]); a
/// mismatch is a programming error and panics.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitVector {
    width: u32,
    bits: u64,
}

impl BitVector {
    /// Creates a bit-vector of the given width from the least significant bits of `value`.
    pub fn new(width: u32, value: u64) -> BitVector {
        ls_assert_simple!(
            (1..=MAX_WIDTH).contains(&width),
            "Bit-vector width {width} is not in the supported range [1, {MAX_WIDTH}]"
        );
        BitVector {
            width,
            bits: value & low_mask(width),
        }
    }

    pub fn zero(width: u32) -> BitVector {
        BitVector::new(width, 0)
    }

    pub fn one(width: u32) -> BitVector {
        BitVector::new(width, 1)
    }

    pub fn ones(width: u32) -> BitVector {
        BitVector::new(width, u64::MAX)
    }

    /// The smallest value in two's complement interpretation, i.e. `100...0`.
    pub fn min_signed(width: u32) -> BitVector {
        BitVector::new(width, 1 << (width - 1))
    }

    /// The largest value in two's complement interpretation, i.e. `011...1`.
    pub fn max_signed(width: u32) -> BitVector {
        BitVector::new(width, low_mask(width - 1))
    }

    pub fn from_bool(value: bool) -> BitVector {
        BitVector::new(1, value as u64)
    }

    /// A uniformly random value of the given width.
    pub fn random(width: u32, rng: &mut dyn Random) -> BitVector {
        BitVector::new(width, rng.generate_u64())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// The unsigned interpretation of the bit-vector.
    pub fn value(&self) -> u64 {
        self.bits
    }

    /// The two's complement interpretation of the bit-vector.
    pub fn signed_value(&self) -> i64 {
        let shift = 64 - self.width;
        ((self.bits << shift) as i64) >> shift
    }

    pub(crate) fn mask(&self) -> u64 {
        low_mask(self.width)
    }

    pub fn is_zero(&self) -> bool {
        self.bits == 0
    }

    pub fn is_ones(&self) -> bool {
        self.bits == self.mask()
    }

    /// Whether this is the single-bit value `1`.
    pub fn is_true(&self) -> bool {
        self.width == 1 && self.bits == 1
    }

    /// Whether this is the single-bit value `0`.
    pub fn is_false(&self) -> bool {
        self.width == 1 && self.bits == 0
    }

    pub fn bit(&self, index: u32) -> bool {
        ls_assert_simple!(index < self.width);
        (self.bits >> index) & 1 == 1
    }

    pub fn set_bit(&mut self, index: u32, value: bool) {
        ls_assert_simple!(index < self.width);
        if value {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
    }

    /// The most significant bit (the sign bit).
    pub fn msb(&self) -> bool {
        self.bit(self.width - 1)
    }

    /// The number of trailing zeros; `width` for the zero value.
    pub fn count_trailing_zeros(&self) -> u32 {
        if self.bits == 0 {
            self.width
        } else {
            self.bits.trailing_zeros()
        }
    }

    /// The number of leading zeros within the width; `width` for the zero value.
    pub fn count_leading_zeros(&self) -> u32 {
        self.bits.leading_zeros() - (64 - self.width)
    }

    /// The number of leading bits which are equal to the sign bit (including the sign bit).
    pub fn count_leading_sign_bits(&self) -> u32 {
        if self.msb() {
            self.not().count_leading_zeros()
        } else {
            self.count_leading_zeros()
        }
    }

    fn check_width(&self, other: &BitVector) {
        ls_assert_eq_simple!(
            self.width,
            other.width,
            "Operands of a bit-vector operation should have the same width"
        );
    }

    fn with_bits(&self, bits: u64) -> BitVector {
        BitVector::new(self.width, bits)
    }

    pub fn add(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.with_bits(self.bits.wrapping_add(other.bits))
    }

    pub fn sub(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.with_bits(self.bits.wrapping_sub(other.bits))
    }

    pub fn mul(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.with_bits(self.bits.wrapping_mul(other.bits))
    }

    pub fn neg(&self) -> BitVector {
        self.with_bits(self.bits.wrapping_neg())
    }

    pub fn inc(&self) -> BitVector {
        self.with_bits(self.bits.wrapping_add(1))
    }

    pub fn dec(&self) -> BitVector {
        self.with_bits(self.bits.wrapping_sub(1))
    }

    /// Unsigned division, where division by zero yields [`BitVector::ones`].
    pub fn udiv(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        if other.bits == 0 {
            BitVector::ones(self.width)
        } else {
            self.with_bits(self.bits / other.bits)
        }
    }

    /// Unsigned remainder, where the remainder of a division by zero is the dividend.
    pub fn urem(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        if other.bits == 0 {
            *self
        } else {
            self.with_bits(self.bits % other.bits)
        }
    }

    pub fn and(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.with_bits(self.bits & other.bits)
    }

    pub fn or(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.with_bits(self.bits | other.bits)
    }

    pub fn xor(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.with_bits(self.bits ^ other.bits)
    }

    pub fn not(&self) -> BitVector {
        self.with_bits(!self.bits)
    }

    /// Logical shift left by `amount` bits; shifting by at least the width yields zero.
    pub fn shl_by(&self, amount: u64) -> BitVector {
        if amount >= self.width as u64 {
            BitVector::zero(self.width)
        } else {
            self.with_bits(self.bits << amount)
        }
    }

    /// Logical shift right by `amount` bits; shifting by at least the width yields zero.
    pub fn shr_by(&self, amount: u64) -> BitVector {
        if amount >= self.width as u64 {
            BitVector::zero(self.width)
        } else {
            self.with_bits(self.bits >> amount)
        }
    }

    /// Arithmetic shift right by `amount` bits; shifting by at least the width replicates the
    /// sign bit.
    pub fn ashr_by(&self, amount: u64) -> BitVector {
        let amount = amount.min(self.width as u64 - 1);
        self.with_bits((self.signed_value() >> amount) as u64)
    }

    pub fn shl(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.shl_by(other.bits)
    }

    pub fn shr(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.shr_by(other.bits)
    }

    pub fn ashr(&self, other: &BitVector) -> BitVector {
        self.check_width(other);
        self.ashr_by(other.bits)
    }

    pub fn ult(&self, other: &BitVector) -> bool {
        self.check_width(other);
        self.bits < other.bits
    }

    pub fn slt(&self, other: &BitVector) -> bool {
        self.check_width(other);
        self.signed_value() < other.signed_value()
    }

    /// Concatenates `self` (most significant part) with `low`.
    pub fn concat(&self, low: &BitVector) -> BitVector {
        ls_assert_simple!(self.width + low.width <= MAX_WIDTH);
        BitVector::new(self.width + low.width, (self.bits << low.width) | low.bits)
    }

    /// The bits `hi` down to `lo` (both inclusive).
    pub fn extract(&self, hi: u32, lo: u32) -> BitVector {
        ls_assert_simple!(lo <= hi && hi < self.width);
        BitVector::new(hi - lo + 1, self.bits >> lo)
    }

    /// Extends the bit-vector by `num_bits` copies of its sign bit.
    pub fn sign_extend(&self, num_bits: u32) -> BitVector {
        if num_bits == 0 {
            return *self;
        }
        ls_assert_simple!(self.width + num_bits <= MAX_WIDTH);
        BitVector::new(self.width + num_bits, self.signed_value() as u64)
    }

    /// Flips the sign bit; this maps the signed order onto the unsigned order.
    pub(crate) fn flip_msb(&self) -> BitVector {
        self.with_bits(self.bits ^ (1 << (self.width - 1)))
    }

    /// The multiplicative inverse modulo `2^width`, which only exists for odd values.
    pub fn mod_inverse(&self) -> Option<BitVector> {
        if self.bits & 1 == 0 {
            return None;
        }
        // Newton iteration doubles the number of correct low bits each round, starting from 3
        // correct bits since x * x = 1 mod 8 for odd x.
        let mut inverse = self.bits;
        for _ in 0..5 {
            inverse = inverse.wrapping_mul(2_u64.wrapping_sub(self.bits.wrapping_mul(inverse)));
        }
        Some(self.with_bits(inverse))
    }
}

impl Display for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#b{:0width$b}", self.bits, width = self.width as usize)
    }
}

impl Debug for BitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
