use super::BitVector;
use crate::ls_assert_eq_simple;

/// A closed interval `[min, max]` of bit-vector values; whether the interval is interpreted as
/// unsigned or signed is determined by where it is stored in [`InequalityBounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    pub min: BitVector,
    pub max: BitVector,
}

impl Interval {
    pub fn new(min: BitVector, max: BitVector) -> Interval {
        ls_assert_eq_simple!(min.width(), max.width());
        Interval { min, max }
    }
}

/// The bounds on the value of a node which are implied by the top-level inequalities that the
/// node is an operand of.
///
/// Values are drawn inside these bounds when possible; the bounds never restrict the domain
/// itself, which means that they can be empty in combination with the domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InequalityBounds {
    pub unsigned: Option<Interval>,
    pub signed: Option<Interval>,
}

impl InequalityBounds {
    pub fn is_empty(&self) -> bool {
        self.unsigned.is_none() && self.signed.is_none()
    }

    pub(crate) fn clear(&mut self) {
        *self = InequalityBounds::default();
    }

    /// Tightens the unsigned bounds to `[min, max]`.
    ///
    /// Returns false if the resulting bounds would be empty, in which case the unsigned bounds are
    /// left unchanged.
    pub(crate) fn tighten_unsigned(&mut self, min: BitVector, max: BitVector) -> bool {
        tighten(&mut self.unsigned, min, max, |lhs, rhs| lhs.ult(rhs))
    }

    /// Tightens the signed bounds to `[min, max]`, see [`InequalityBounds::tighten_unsigned`].
    pub(crate) fn tighten_signed(&mut self, min: BitVector, max: BitVector) -> bool {
        tighten(&mut self.signed, min, max, |lhs, rhs| lhs.slt(rhs))
    }

    /// Whether `value` lies within all of the bounds.
    pub fn contains(&self, value: BitVector) -> bool {
        self.unsigned
            .map_or(true, |interval| !value.ult(&interval.min) && !interval.max.ult(&value))
            && self
                .signed
                .map_or(true, |interval| !value.slt(&interval.min) && !interval.max.slt(&value))
    }
}

fn tighten(
    interval: &mut Option<Interval>,
    min: BitVector,
    max: BitVector,
    less_than: impl Fn(&BitVector, &BitVector) -> bool,
) -> bool {
    let (min, max) = match interval {
        Some(current) => (
            if less_than(&current.min, &min) {
                min
            } else {
                current.min
            },
            if less_than(&max, &current.max) {
                max
            } else {
                current.max
            },
        ),
        None => (min, max),
    };

    if less_than(&max, &min) {
        return false;
    }
    *interval = Some(Interval::new(min, max));
    true
}
