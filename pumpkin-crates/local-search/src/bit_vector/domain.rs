use std::fmt::Display;
use std::fmt::Formatter;

use super::value::low_mask;
use super::BitVector;
use crate::basic_types::Random;
use crate::ls_assert_eq_simple;
use crate::ls_assert_simple;

/// The set of admissible values of a node, represented by per-bit fixed/free information.
///
/// The domain consists of two bit-vectors `lo` and `hi` of the same width; bit `i` is
/// - fixed to 0 if `lo[i] = hi[i] = 0`,
/// - fixed to 1 if `lo[i] = hi[i] = 1`,
/// - free if `lo[i] = 0` and `hi[i] = 1`.
///
/// A domain where `lo[i] = 1` and `hi[i] = 0` for some `i` is invalid (it is empty). Note that
/// `lo` and `hi` are respectively the smallest and largest unsigned values contained in the
/// domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitVectorDomain {
    lo: BitVector,
    hi: BitVector,
}

impl BitVectorDomain {
    /// The domain without any fixed bits.
    pub fn new(width: u32) -> BitVectorDomain {
        BitVectorDomain {
            lo: BitVector::zero(width),
            hi: BitVector::ones(width),
        }
    }

    /// The domain containing exactly `value`.
    pub fn fixed(value: BitVector) -> BitVectorDomain {
        BitVectorDomain {
            lo: value,
            hi: value,
        }
    }

    /// Creates a domain from its bounds; the result may be invalid, see
    /// [`BitVectorDomain::is_valid`].
    pub fn from_bounds(lo: BitVector, hi: BitVector) -> BitVectorDomain {
        ls_assert_eq_simple!(lo.width(), hi.width());
        BitVectorDomain { lo, hi }
    }

    /// Parses a domain from a string over `0`, `1` and `x` (free), most significant bit first.
    ///
    /// # Example
    /// ```rust
    /// # use pumpkin_local_search::bit_vector::BitVectorDomain;
    /// let domain = BitVectorDomain::parse("1x0").expect("valid domain");
    /// assert_eq!(domain.width(), 3);
    /// assert!(domain.is_fixed_bit_true(2));
    /// assert!(!domain.is_fixed_bit(1));
    /// assert!(domain.is_fixed_bit_false(0));
    /// ```
    pub fn parse(input: &str) -> Option<BitVectorDomain> {
        let width = u32::try_from(input.len()).ok()?;
        if width == 0 || width > super::MAX_WIDTH {
            return None;
        }
        let mut lo = 0_u64;
        let mut hi = 0_u64;
        for character in input.chars() {
            lo <<= 1;
            hi <<= 1;
            match character {
                '0' => {}
                '1' => {
                    lo |= 1;
                    hi |= 1;
                }
                'x' | 'X' => hi |= 1,
                _ => return None,
            }
        }
        Some(BitVectorDomain {
            lo: BitVector::new(width, lo),
            hi: BitVector::new(width, hi),
        })
    }

    pub fn width(&self) -> u32 {
        self.lo.width()
    }

    /// The smallest unsigned value in the domain.
    pub fn lo(&self) -> BitVector {
        self.lo
    }

    /// The largest unsigned value in the domain.
    pub fn hi(&self) -> BitVector {
        self.hi
    }

    pub fn is_valid(&self) -> bool {
        self.lo.value() & !self.hi.value() == 0
    }

    /// Whether every bit is fixed, i.e. the domain contains a single value.
    pub fn is_fixed(&self) -> bool {
        self.lo == self.hi
    }

    pub fn has_fixed_bits(&self) -> bool {
        self.fixed_mask() != 0
    }

    /// A mask of all the fixed bits.
    pub(crate) fn fixed_mask(&self) -> u64 {
        !(self.lo.value() ^ self.hi.value()) & self.lo.mask()
    }

    pub fn is_fixed_bit(&self, index: u32) -> bool {
        self.lo.bit(index) == self.hi.bit(index)
    }

    pub fn is_fixed_bit_true(&self, index: u32) -> bool {
        self.lo.bit(index) && self.hi.bit(index)
    }

    pub fn is_fixed_bit_false(&self, index: u32) -> bool {
        !self.lo.bit(index) && !self.hi.bit(index)
    }

    /// Fixes the bit at `index` to `value`; fixing an already fixed bit to the opposite
    /// value makes the domain invalid.
    pub fn fix_bit(&mut self, index: u32, value: bool) {
        if value {
            self.lo.set_bit(index, true);
        } else {
            self.hi.set_bit(index, false);
        }
    }

    pub fn count_free_bits(&self) -> u32 {
        (self.lo.value() ^ self.hi.value()).count_ones()
    }

    /// Whether the domain contains `value`.
    pub fn contains(&self, value: BitVector) -> bool {
        ls_assert_eq_simple!(value.width(), self.width());
        self.conflicts(value.value()) == 0
    }

    /// Whether the domain contains a value which agrees with `value` on the bits in `mask`.
    pub(crate) fn matches_on(&self, value: BitVector, mask: u64) -> bool {
        ls_assert_eq_simple!(value.width(), self.width());
        self.conflicts(value.value()) & mask == 0
    }

    /// The bits of `value` which disagree with a fixed bit of the domain.
    fn conflicts(&self, value: u64) -> u64 {
        (value & !self.hi.value()) | (self.lo.value() & !value)
    }

    /// Forces the fixed bits of the domain onto `value`.
    pub fn clip(&self, value: BitVector) -> BitVector {
        ls_assert_eq_simple!(value.width(), self.width());
        BitVector::new(
            self.width(),
            (value.value() & self.hi.value()) | self.lo.value(),
        )
    }

    /// The domain of the bits `hi` down to `lo` (both inclusive).
    pub fn extract(&self, hi: u32, lo: u32) -> BitVectorDomain {
        BitVectorDomain {
            lo: self.lo.extract(hi, lo),
            hi: self.hi.extract(hi, lo),
        }
    }

    /// The domain of the values with a flipped sign bit; a fixed sign bit is flipped while a
    /// free sign bit remains free.
    pub(crate) fn flip_msb(&self) -> BitVectorDomain {
        let msb = self.width() - 1;
        if self.is_fixed_bit(msb) {
            BitVectorDomain {
                lo: self.lo.flip_msb(),
                hi: self.hi.flip_msb(),
            }
        } else {
            *self
        }
    }

    /// The smallest value in the domain which is greater than or equal to `value`.
    pub fn next_ge(&self, value: BitVector) -> Option<BitVector> {
        ls_assert_simple!(self.is_valid());
        let v = value.value();
        let conflicts = self.conflicts(v);
        if conflicts == 0 {
            return Some(value);
        }

        // The result agrees with `value` above some position p, has a 1 at p where `value` has a
        // 0, and is minimal below p. Positions above the highest conflict cannot be used.
        let highest_conflict = 63 - conflicts.leading_zeros();
        let hi = self.hi.value();
        (highest_conflict..self.width())
            .find(|&p| (v >> p) & 1 == 0 && (hi >> p) & 1 == 1)
            .map(|p| {
                let above = v & !low_mask(p + 1);
                BitVector::new(
                    self.width(),
                    above | (1 << p) | (self.lo.value() & low_mask(p)),
                )
            })
    }

    /// The largest value in the domain which is less than or equal to `value`.
    pub fn next_le(&self, value: BitVector) -> Option<BitVector> {
        ls_assert_simple!(self.is_valid());
        let v = value.value();
        let conflicts = self.conflicts(v);
        if conflicts == 0 {
            return Some(value);
        }

        let highest_conflict = 63 - conflicts.leading_zeros();
        let lo = self.lo.value();
        (highest_conflict..self.width())
            .find(|&p| (v >> p) & 1 == 1 && (lo >> p) & 1 == 0)
            .map(|p| {
                let above = v & !low_mask(p + 1);
                BitVector::new(self.width(), above | (self.hi.value() & low_mask(p)))
            })
    }

    /// Whether the domain has a value in the unsigned range `[min, max]`.
    pub fn has_value_in_range(&self, min: BitVector, max: BitVector) -> bool {
        if max.ult(&min) {
            return false;
        }
        self.next_ge(min).is_some_and(|value| !max.ult(&value))
    }

    /// Whether the domain has a value in the signed range `[min, max]`.
    pub fn has_value_in_signed_range(&self, min: BitVector, max: BitVector) -> bool {
        self.flip_msb()
            .has_value_in_range(min.flip_msb(), max.flip_msb())
    }

    /// A random value of the domain.
    pub fn random_value(&self, rng: &mut dyn Random) -> BitVector {
        self.clip(BitVector::random(self.width(), rng))
    }

    /// A random value of the domain within the unsigned range `[min, max]`, if one exists.
    ///
    /// A uniformly random point of the range is snapped to the closest value of the domain above
    /// it (or below it if there is none above it within the range); hence the distribution is
    /// uniform only if the domain has no fixed bits.
    pub fn random_value_in_range(
        &self,
        min: BitVector,
        max: BitVector,
        rng: &mut dyn Random,
    ) -> Option<BitVector> {
        if max.ult(&min) {
            return None;
        }
        let start = BitVector::new(
            self.width(),
            rng.generate_u64_in_range(min.value(), max.value()),
        );
        self.next_ge(start)
            .filter(|value| !max.ult(value))
            .or_else(|| self.next_le(start).filter(|value| !value.ult(&min)))
    }

    /// A random value of the domain within the signed range `[min, max]`, if one exists.
    pub fn random_value_in_signed_range(
        &self,
        min: BitVector,
        max: BitVector,
        rng: &mut dyn Random,
    ) -> Option<BitVector> {
        self.flip_msb()
            .random_value_in_range(min.flip_msb(), max.flip_msb(), rng)
            .map(|value| value.flip_msb())
    }
}

impl Display for BitVectorDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for index in (0..self.width()).rev() {
            let character = match (self.lo.bit(index), self.hi.bit(index)) {
                (false, false) => '0',
                (true, true) => '1',
                (false, true) => 'x',
                (true, false) => '!',
            };
            write!(f, "{character}")?;
        }
        Ok(())
    }
}
