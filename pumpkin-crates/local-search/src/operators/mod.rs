//! The operators which can label the nodes of the graph, together with the procedures which the
//! move selector uses to propagate a target value from a node to one of its children.
//!
//! For an operator node `n = op(x_0, ..., x_k)` with target value `t` and a child position `i`,
//! the following questions are answered given the current values of the other children:
//! - Is `t` *invertible* with respect to `x_i`, i.e. is there a value `v` in the domain of `x_i`
//!   such that `op(x_0, ..., v, ..., x_k) = t`? If so, an *inverse value* is such a `v`.
//! - Is `t` *consistent* with respect to `x_i`, i.e. is there a value `v` in the domain of `x_i`
//!   such that `op(y_0, ..., v, ..., y_k) = t` for some values `y_j` of the other children? If so,
//!   a *consistent value* is such a `v`.
//!
//! Note that the procedures of [`OperatorKind::Udiv`] and [`OperatorKind::Urem`] are bounded: if
//! the search for a solution is cut off then they report that no solution exists.
mod arithmetic;
mod bitwise;
mod comparison;
mod shift;
mod structural;

use std::fmt::Display;
use std::fmt::Formatter;

use enum_map::Enum;

use crate::basic_types::ConstructionError;
use crate::basic_types::Random;
use crate::bit_vector::BitVector;
use crate::bit_vector::BitVectorDomain;
use crate::bit_vector::InequalityBounds;
use crate::bit_vector::Interval;
use crate::bit_vector::MAX_WIDTH;
use crate::ls_assert_eq_simple;

/// The operator of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enum)]
pub enum OperatorKind {
    /// Addition modulo `2^width`.
    Add,
    /// Bitwise conjunction.
    And,
    /// Arithmetic shift right.
    Ashr,
    /// Concatenation; the first child holds the most significant bits.
    Concat,
    /// The bits `hi` down to `lo` of the child, with indices `[hi, lo]`.
    Extract,
    /// Equality, producing a single bit.
    Eq,
    /// If-then-else over a single-bit condition.
    Ite,
    /// Multiplication modulo `2^width`.
    Mul,
    /// Bitwise negation.
    Not,
    /// Sign extension by `n` bits, with indices `[n]`.
    Sext,
    /// Logical shift left.
    Shl,
    /// Logical shift right.
    Shr,
    /// Signed less-than, producing a single bit.
    Slt,
    /// Unsigned division, where division by zero yields all ones.
    Udiv,
    /// Unsigned less-than, producing a single bit.
    Ult,
    /// Unsigned remainder, where the remainder of a division by zero is the dividend.
    Urem,
    /// Bitwise exclusive or.
    Xor,
}

impl OperatorKind {
    /// The number of children of a node with this operator.
    pub fn arity(&self) -> usize {
        match self {
            OperatorKind::Extract | OperatorKind::Not | OperatorKind::Sext => 1,
            OperatorKind::Ite => 3,
            _ => 2,
        }
    }

    /// The number of static indices of a node with this operator.
    pub fn num_indices(&self) -> usize {
        match self {
            OperatorKind::Extract => 2,
            OperatorKind::Sext => 1,
            _ => 0,
        }
    }

    /// Whether the operator is an ordering constraint.
    pub fn is_inequality(&self) -> bool {
        matches!(self, OperatorKind::Ult | OperatorKind::Slt)
    }

    /// Returns the width of a node with this operator over children of the provided widths, or an
    /// error describing why such a node can not be created.
    pub fn result_width(
        &self,
        child_widths: &[u32],
        indices: &[u32],
    ) -> Result<u32, ConstructionError> {
        if child_widths.len() != self.arity() {
            return Err(ConstructionError::WrongArity {
                kind: *self,
                expected: self.arity(),
                actual: child_widths.len(),
            });
        }
        if indices.len() != self.num_indices() {
            return Err(ConstructionError::WrongNumberOfIndices {
                kind: *self,
                expected: self.num_indices(),
                actual: indices.len(),
            });
        }

        let mismatch = ConstructionError::OperandWidthMismatch { kind: *self };
        match self {
            OperatorKind::Not => Ok(child_widths[0]),
            OperatorKind::Add
            | OperatorKind::And
            | OperatorKind::Ashr
            | OperatorKind::Mul
            | OperatorKind::Shl
            | OperatorKind::Shr
            | OperatorKind::Udiv
            | OperatorKind::Urem
            | OperatorKind::Xor => {
                if child_widths[0] == child_widths[1] {
                    Ok(child_widths[0])
                } else {
                    Err(mismatch)
                }
            }
            OperatorKind::Eq | OperatorKind::Slt | OperatorKind::Ult => {
                if child_widths[0] == child_widths[1] {
                    Ok(1)
                } else {
                    Err(mismatch)
                }
            }
            OperatorKind::Concat => {
                let width = child_widths[0] + child_widths[1];
                if width > MAX_WIDTH {
                    Err(ConstructionError::UnsupportedWidth(width))
                } else {
                    Ok(width)
                }
            }
            OperatorKind::Extract => {
                let (hi, lo) = (indices[0], indices[1]);
                if lo <= hi && hi < child_widths[0] {
                    Ok(hi - lo + 1)
                } else {
                    Err(ConstructionError::InvalidIndices { kind: *self })
                }
            }
            OperatorKind::Sext => {
                let width = child_widths[0].saturating_add(indices[0]);
                if width > MAX_WIDTH {
                    Err(ConstructionError::InvalidIndices { kind: *self })
                } else {
                    Ok(width)
                }
            }
            OperatorKind::Ite => {
                if child_widths[0] == 1 && child_widths[1] == child_widths[2] {
                    Ok(child_widths[1])
                } else {
                    Err(mismatch)
                }
            }
        }
    }

    /// Evaluates the operator over the provided values of the children.
    pub fn evaluate(&self, children: &[BitVector], indices: &[u32]) -> BitVector {
        ls_assert_eq_simple!(children.len(), self.arity());
        ls_assert_eq_simple!(indices.len(), self.num_indices());

        match self {
            OperatorKind::Add => children[0].add(&children[1]),
            OperatorKind::And => children[0].and(&children[1]),
            OperatorKind::Ashr => children[0].ashr(&children[1]),
            OperatorKind::Concat => children[0].concat(&children[1]),
            OperatorKind::Extract => children[0].extract(indices[0], indices[1]),
            OperatorKind::Eq => BitVector::from_bool(children[0] == children[1]),
            OperatorKind::Ite => {
                if children[0].is_true() {
                    children[1]
                } else {
                    children[2]
                }
            }
            OperatorKind::Mul => children[0].mul(&children[1]),
            OperatorKind::Not => children[0].not(),
            OperatorKind::Sext => children[0].sign_extend(indices[0]),
            OperatorKind::Shl => children[0].shl(&children[1]),
            OperatorKind::Shr => children[0].shr(&children[1]),
            OperatorKind::Slt => BitVector::from_bool(children[0].slt(&children[1])),
            OperatorKind::Udiv => children[0].udiv(&children[1]),
            OperatorKind::Ult => BitVector::from_bool(children[0].ult(&children[1])),
            OperatorKind::Urem => children[0].urem(&children[1]),
            OperatorKind::Xor => children[0].xor(&children[1]),
        }
    }

    /// Whether the target of the query is invertible with respect to the queried child.
    pub(crate) fn is_invertible(&self, query: &InversionQuery<'_>) -> bool {
        match self {
            OperatorKind::Add => arithmetic::add_is_invertible(query),
            OperatorKind::Mul => arithmetic::mul_is_invertible(query),
            OperatorKind::Udiv => arithmetic::udiv_is_invertible(query),
            OperatorKind::Urem => arithmetic::urem_is_invertible(query),
            OperatorKind::And => bitwise::and_is_invertible(query),
            OperatorKind::Not => bitwise::not_is_invertible(query),
            OperatorKind::Xor => bitwise::xor_is_invertible(query),
            OperatorKind::Shl | OperatorKind::Shr | OperatorKind::Ashr => {
                shift::is_invertible(*self, query)
            }
            OperatorKind::Eq => comparison::eq_is_invertible(query),
            OperatorKind::Ult | OperatorKind::Slt => {
                comparison::inequality_is_invertible(*self, query)
            }
            OperatorKind::Concat => structural::concat_is_invertible(query),
            OperatorKind::Extract => structural::extract_is_invertible(query),
            OperatorKind::Sext => structural::sext_is_invertible(query),
            OperatorKind::Ite => structural::ite_is_invertible(query),
        }
    }

    /// Computes an inverse value for the queried child; should only be called if
    /// [`OperatorKind::is_invertible`] holds for the query.
    pub(crate) fn inverse_value(
        &self,
        query: &InversionQuery<'_>,
        rng: &mut dyn Random,
    ) -> BitVector {
        match self {
            OperatorKind::Add => arithmetic::add_inverse_value(query),
            OperatorKind::Mul => arithmetic::mul_inverse_value(query, rng),
            OperatorKind::Udiv => arithmetic::udiv_inverse_value(query, rng),
            OperatorKind::Urem => arithmetic::urem_inverse_value(query, rng),
            OperatorKind::And => bitwise::and_inverse_value(query, rng),
            OperatorKind::Not => bitwise::not_inverse_value(query),
            OperatorKind::Xor => bitwise::xor_inverse_value(query),
            OperatorKind::Shl | OperatorKind::Shr | OperatorKind::Ashr => {
                shift::inverse_value(*self, query, rng)
            }
            OperatorKind::Eq => comparison::eq_inverse_value(query, rng),
            OperatorKind::Ult | OperatorKind::Slt => {
                comparison::inequality_inverse_value(*self, query, rng)
            }
            OperatorKind::Concat => structural::concat_value(query),
            OperatorKind::Extract => structural::extract_value(query, rng),
            OperatorKind::Sext => structural::sext_value(query),
            OperatorKind::Ite => structural::ite_inverse_value(query, rng),
        }
    }

    /// Whether the target of the query is consistent with respect to the queried child.
    pub(crate) fn is_consistent(&self, query: &InversionQuery<'_>) -> bool {
        match self {
            OperatorKind::Add | OperatorKind::Xor | OperatorKind::Eq => true,
            OperatorKind::Mul => arithmetic::mul_is_consistent(query),
            OperatorKind::Udiv => arithmetic::udiv_is_consistent(query),
            OperatorKind::Urem => arithmetic::urem_is_consistent(query),
            OperatorKind::And => bitwise::and_is_consistent(query),
            OperatorKind::Not => bitwise::not_is_invertible(query),
            OperatorKind::Shl | OperatorKind::Shr | OperatorKind::Ashr => {
                shift::is_consistent(*self, query)
            }
            OperatorKind::Ult | OperatorKind::Slt => {
                comparison::inequality_is_consistent(*self, query)
            }
            OperatorKind::Concat => structural::concat_is_consistent(query),
            OperatorKind::Extract => structural::extract_is_invertible(query),
            OperatorKind::Sext => structural::sext_is_invertible(query),
            OperatorKind::Ite => structural::ite_is_consistent(query),
        }
    }

    /// Computes a consistent value for the queried child; should only be called if
    /// [`OperatorKind::is_consistent`] holds for the query.
    pub(crate) fn consistent_value(
        &self,
        query: &InversionQuery<'_>,
        rng: &mut dyn Random,
    ) -> BitVector {
        match self {
            OperatorKind::Add | OperatorKind::Xor | OperatorKind::Eq => query.random_value(rng),
            OperatorKind::Mul => arithmetic::mul_consistent_value(query, rng),
            OperatorKind::Udiv => arithmetic::udiv_consistent_value(query, rng),
            OperatorKind::Urem => arithmetic::urem_consistent_value(query, rng),
            OperatorKind::And => bitwise::and_consistent_value(query, rng),
            OperatorKind::Not => bitwise::not_inverse_value(query),
            OperatorKind::Shl | OperatorKind::Shr | OperatorKind::Ashr => {
                shift::consistent_value(*self, query, rng)
            }
            OperatorKind::Ult | OperatorKind::Slt => {
                comparison::inequality_consistent_value(*self, query, rng)
            }
            OperatorKind::Concat => structural::concat_value(query),
            OperatorKind::Extract => structural::extract_value(query, rng),
            OperatorKind::Sext => structural::sext_value(query),
            OperatorKind::Ite => structural::ite_consistent_value(query, rng),
        }
    }
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperatorKind::Add => "add",
            OperatorKind::And => "and",
            OperatorKind::Ashr => "ashr",
            OperatorKind::Concat => "concat",
            OperatorKind::Extract => "extract",
            OperatorKind::Eq => "eq",
            OperatorKind::Ite => "ite",
            OperatorKind::Mul => "mul",
            OperatorKind::Not => "not",
            OperatorKind::Sext => "sext",
            OperatorKind::Shl => "shl",
            OperatorKind::Shr => "shr",
            OperatorKind::Slt => "slt",
            OperatorKind::Udiv => "udiv",
            OperatorKind::Ult => "ult",
            OperatorKind::Urem => "urem",
            OperatorKind::Xor => "xor",
        };
        write!(f, "{name}")
    }
}

/// The question of which value the child at `position` should take for its parent to evaluate to
/// `target`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InversionQuery<'a> {
    /// The value which the parent should take.
    pub(crate) target: BitVector,
    /// The position of the child which is revised.
    pub(crate) position: usize,
    /// The current values of all the children of the parent.
    pub(crate) children: &'a [BitVector],
    /// The indices of the parent.
    pub(crate) indices: &'a [u32],
    /// The domain of the revised child.
    pub(crate) domain: &'a BitVectorDomain,
    /// The inequality bounds of the revised child.
    pub(crate) bounds: &'a InequalityBounds,
}

impl InversionQuery<'_> {
    /// The current value of the other child of a binary operator.
    pub(crate) fn sibling(&self) -> BitVector {
        ls_assert_eq_simple!(self.children.len(), 2);
        self.children[1 - self.position]
    }

    /// The width of the revised child.
    pub(crate) fn width(&self) -> u32 {
        self.domain.width()
    }

    /// A random value of the domain, drawn within the inequality bounds if possible.
    pub(crate) fn random_value(&self, rng: &mut dyn Random) -> BitVector {
        let width = self.width();
        self.sample_in_range(BitVector::zero(width), BitVector::ones(width), rng)
            .unwrap_or_else(|| self.domain.random_value(rng))
    }

    /// A random value of the domain in the unsigned range `[min, max]`; the returned value lies
    /// within the inequality bounds if the bounds allow for a value in the range.
    pub(crate) fn sample_in_range(
        &self,
        min: BitVector,
        max: BitVector,
        rng: &mut dyn Random,
    ) -> Option<BitVector> {
        if let Some(interval) = self.bounds.unsigned {
            let lower = if min.ult(&interval.min) {
                interval.min
            } else {
                min
            };
            let upper = if interval.max.ult(&max) {
                interval.max
            } else {
                max
            };
            if let Some(value) = self.domain.random_value_in_range(lower, upper, rng) {
                return Some(value);
            }
        }
        if let Some(interval) = self.bounds.signed {
            // The unsigned range is only restricted to the signed bounds if it does not wrap
            // around in the signed order.
            if min.msb() == max.msb() {
                if let Some(value) = self
                    .domain
                    .random_value_in_signed_range(interval.min, interval.max, rng)
                    .filter(|value| !value.ult(&min) && !max.ult(value))
                {
                    return Some(value);
                }
            }
        }
        self.domain.random_value_in_range(min, max, rng)
    }

    /// A random value of the domain in the signed range `[min, max]`; the returned value lies
    /// within the signed inequality bounds if the bounds allow for a value in the range.
    pub(crate) fn sample_in_signed_range(
        &self,
        min: BitVector,
        max: BitVector,
        rng: &mut dyn Random,
    ) -> Option<BitVector> {
        if let Some(interval) = self.bounds.signed {
            let lower = if min.slt(&interval.min) {
                interval.min
            } else {
                min
            };
            let upper = if interval.max.slt(&max) {
                interval.max
            } else {
                max
            };
            if let Some(value) = self.domain.random_value_in_signed_range(lower, upper, rng) {
                return Some(value);
            }
        }
        self.domain.random_value_in_signed_range(min, max, rng)
    }

    /// Whether the domain has a value in one of the unsigned ranges.
    pub(crate) fn has_value_in_ranges(&self, ranges: &[Interval]) -> bool {
        ranges
            .iter()
            .any(|range| self.domain.has_value_in_range(range.min, range.max))
    }

    /// A random value of the domain in one of the unsigned ranges; the range is selected uniformly
    /// among the ranges which contain a value of the domain.
    pub(crate) fn sample_in_ranges(
        &self,
        ranges: &[Interval],
        rng: &mut dyn Random,
    ) -> Option<BitVector> {
        let feasible = ranges
            .iter()
            .filter(|range| self.domain.has_value_in_range(range.min, range.max))
            .collect::<Vec<_>>();
        if feasible.is_empty() {
            return None;
        }
        let range = feasible[rng.generate_usize_in_range(0..feasible.len())];
        self.sample_in_range(range.min, range.max, rng)
    }
}

/// Returns `base` with the bits starting at `lo` replaced by `slice`.
pub(crate) fn insert_slice(base: BitVector, slice: BitVector, lo: u32) -> BitVector {
    let mask = crate::bit_vector::low_mask(slice.width()) << lo;
    BitVector::new(
        base.width(),
        (base.value() & !mask) | (slice.value() << lo),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::InversionQuery;
    use super::OperatorKind;
    use crate::basic_types::ConstructionError;
    use crate::bit_vector::BitVector;
    use crate::bit_vector::BitVectorDomain;
    use crate::bit_vector::InequalityBounds;

    /// Checks the procedures of a binary operator against an exhaustive enumeration over all
    /// values of the provided width, for every target, sibling and domain from `domains`.
    pub(crate) fn check_binary_operator(kind: OperatorKind, width: u32, domains: &[&str]) {
        let mut rng = SmallRng::seed_from_u64(42);
        let bounds = InequalityBounds::default();
        let num_values = 1_u64 << width;
        let target_width = kind
            .result_width(&[width, width], &[])
            .expect("valid operator");

        for domain in domains {
            let domain = BitVectorDomain::parse(domain).expect("valid domain");
            let members = (0..num_values)
                .map(|value| BitVector::new(width, value))
                .filter(|value| domain.contains(*value))
                .collect::<Vec<_>>();

            for position in 0..2 {
                for target in 0..1_u64 << target_width {
                    let target = BitVector::new(target_width, target);
                    let evaluate = |x: BitVector, s: BitVector| {
                        let children = if position == 0 { [x, s] } else { [s, x] };
                        kind.evaluate(&children, &[])
                    };
                    let consistent = members.iter().any(|x| {
                        (0..num_values).any(|s| evaluate(*x, BitVector::new(width, s)) == target)
                    });

                    for sibling in 0..num_values {
                        let sibling = BitVector::new(width, sibling);
                        let children = [sibling, sibling];
                        let query = InversionQuery {
                            target,
                            position,
                            children: &children,
                            indices: &[],
                            domain: &domain,
                            bounds: &bounds,
                        };
                        let invertible = members.iter().any(|x| evaluate(*x, sibling) == target);

                        assert_eq!(
                            kind.is_invertible(&query),
                            invertible,
                            "{kind} invertibility of {target} at position {position} with sibling {sibling} in {domain}"
                        );
                        if invertible {
                            let value = kind.inverse_value(&query, &mut rng);
                            assert!(domain.contains(value));
                            assert_eq!(evaluate(value, sibling), target);
                        }

                        assert_eq!(
                            kind.is_consistent(&query),
                            consistent,
                            "{kind} consistency of {target} at position {position} in {domain}"
                        );
                        if consistent {
                            let value = kind.consistent_value(&query, &mut rng);
                            assert!(domain.contains(value));
                            assert!(
                                (0..num_values)
                                    .any(|s| evaluate(value, BitVector::new(width, s)) == target),
                                "{kind} consistent value {value} for {target} at position {position} in {domain}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn result_width_validates_children() {
        assert_eq!(OperatorKind::Add.result_width(&[4, 4], &[]), Ok(4));
        assert_eq!(OperatorKind::Ult.result_width(&[4, 4], &[]), Ok(1));
        assert_eq!(OperatorKind::Concat.result_width(&[4, 3], &[]), Ok(7));
        assert_eq!(OperatorKind::Extract.result_width(&[8], &[5, 2]), Ok(4));
        assert_eq!(OperatorKind::Sext.result_width(&[8], &[8]), Ok(16));
        assert_eq!(OperatorKind::Ite.result_width(&[1, 3, 3], &[]), Ok(3));

        assert_eq!(
            OperatorKind::Add.result_width(&[4], &[]),
            Err(ConstructionError::WrongArity {
                kind: OperatorKind::Add,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            OperatorKind::Xor.result_width(&[4, 5], &[]),
            Err(ConstructionError::OperandWidthMismatch {
                kind: OperatorKind::Xor
            })
        );
        assert_eq!(
            OperatorKind::Extract.result_width(&[8], &[2, 5]),
            Err(ConstructionError::InvalidIndices {
                kind: OperatorKind::Extract
            })
        );
        assert_eq!(
            OperatorKind::Concat.result_width(&[40, 40], &[]),
            Err(ConstructionError::UnsupportedWidth(80))
        );
        assert!(OperatorKind::Ite.result_width(&[2, 3, 3], &[]).is_err());
    }

    #[test]
    fn evaluation_of_comparisons_produces_single_bits() {
        let a = BitVector::new(4, 0b1000);
        let b = BitVector::new(4, 0b0001);
        assert!(OperatorKind::Ult.evaluate(&[b, a], &[]).is_true());
        assert!(OperatorKind::Slt.evaluate(&[a, b], &[]).is_true());
        assert!(OperatorKind::Eq.evaluate(&[a, b], &[]).is_false());
    }

    #[test]
    fn display_uses_lowercase_names() {
        assert_eq!(OperatorKind::Udiv.to_string(), "udiv");
        assert_eq!(OperatorKind::Sext.to_string(), "sext");
    }
}
