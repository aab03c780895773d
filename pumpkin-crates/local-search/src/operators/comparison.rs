use super::InversionQuery;
use super::OperatorKind;
use crate::basic_types::Random;
use crate::bit_vector::BitVector;
use crate::bit_vector::Interval;

pub(super) fn eq_is_invertible(query: &InversionQuery<'_>) -> bool {
    let sibling = query.sibling();
    if query.target.is_true() {
        query.domain.contains(sibling)
    } else {
        !(query.domain.is_fixed() && query.domain.lo() == sibling)
    }
}

pub(super) fn eq_inverse_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let sibling = query.sibling();
    if query.target.is_true() {
        return sibling;
    }

    let mut value = query.random_value(rng);
    if value == sibling {
        let free_bits = (0..query.width())
            .filter(|index| !query.domain.is_fixed_bit(*index))
            .collect::<Vec<_>>();
        if !free_bits.is_empty() {
            let index = free_bits[rng.generate_usize_in_range(0..free_bits.len())];
            value.set_bit(index, !value.bit(index));
        }
    }
    value
}

/// The smallest and largest value of the order used by the comparison.
fn extremes(kind: OperatorKind, width: u32) -> (BitVector, BitVector) {
    if kind == OperatorKind::Slt {
        (BitVector::min_signed(width), BitVector::max_signed(width))
    } else {
        (BitVector::zero(width), BitVector::ones(width))
    }
}

/// The values of the revised child for which the comparison with the sibling yields the target.
fn inverse_range(kind: OperatorKind, query: &InversionQuery<'_>) -> Option<Interval> {
    let (min, max) = extremes(kind, query.width());
    let sibling = query.sibling();
    match (query.position, query.target.is_true()) {
        // x < s
        (0, true) => (sibling != min).then(|| Interval::new(min, sibling.dec())),
        // x >= s
        (0, false) => Some(Interval::new(sibling, max)),
        // s < x
        (_, true) => (sibling != max).then(|| Interval::new(sibling.inc(), max)),
        // x <= s
        (_, false) => Some(Interval::new(min, sibling)),
    }
}

/// The values of the revised child for which the comparison can yield the target, or `None` if
/// every value can.
fn consistent_range(kind: OperatorKind, query: &InversionQuery<'_>) -> Option<Interval> {
    let (min, max) = extremes(kind, query.width());
    match (query.position, query.target.is_true()) {
        (_, false) => None,
        (0, true) => Some(Interval::new(min, max.dec())),
        (_, true) => Some(Interval::new(min.inc(), max)),
    }
}

fn has_value_in(kind: OperatorKind, query: &InversionQuery<'_>, range: Interval) -> bool {
    if kind == OperatorKind::Slt {
        query.domain.has_value_in_signed_range(range.min, range.max)
    } else {
        query.domain.has_value_in_range(range.min, range.max)
    }
}

fn sample_in(
    kind: OperatorKind,
    query: &InversionQuery<'_>,
    range: Interval,
    rng: &mut dyn Random,
) -> BitVector {
    let value = if kind == OperatorKind::Slt {
        query.sample_in_signed_range(range.min, range.max, rng)
    } else {
        query.sample_in_range(range.min, range.max, rng)
    };
    value.unwrap_or_else(|| query.random_value(rng))
}

pub(super) fn inequality_is_invertible(kind: OperatorKind, query: &InversionQuery<'_>) -> bool {
    inverse_range(kind, query).is_some_and(|range| has_value_in(kind, query, range))
}

pub(super) fn inequality_inverse_value(
    kind: OperatorKind,
    query: &InversionQuery<'_>,
    rng: &mut dyn Random,
) -> BitVector {
    match inverse_range(kind, query) {
        Some(range) => sample_in(kind, query, range, rng),
        None => query.random_value(rng),
    }
}

pub(super) fn inequality_is_consistent(kind: OperatorKind, query: &InversionQuery<'_>) -> bool {
    consistent_range(kind, query).map_or(true, |range| has_value_in(kind, query, range))
}

pub(super) fn inequality_consistent_value(
    kind: OperatorKind,
    query: &InversionQuery<'_>,
    rng: &mut dyn Random,
) -> BitVector {
    match consistent_range(kind, query) {
        Some(range) => sample_in(kind, query, range, rng),
        None => query.random_value(rng),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::super::tests::check_binary_operator;
    use super::super::InversionQuery;
    use super::super::OperatorKind;
    use crate::bit_vector::BitVector;
    use crate::bit_vector::BitVectorDomain;
    use crate::bit_vector::InequalityBounds;
    use crate::bit_vector::Interval;

    const DOMAINS: [&str; 6] = ["xxx", "x1x", "0x1", "1x0", "111", "000"];

    fn less_than_100_query<'a>(
        domain: &'a BitVectorDomain,
        bounds: &'a InequalityBounds,
        children: &'a [BitVector],
    ) -> InversionQuery<'a> {
        InversionQuery {
            target: BitVector::from_bool(true),
            position: 0,
            children,
            indices: &[],
            domain,
            bounds,
        }
    }

    #[test]
    fn eq_procedures_are_exact() {
        check_binary_operator(OperatorKind::Eq, 3, &DOMAINS);
    }

    #[test]
    fn ult_procedures_are_exact() {
        check_binary_operator(OperatorKind::Ult, 3, &DOMAINS);
    }

    #[test]
    fn slt_procedures_are_exact() {
        check_binary_operator(OperatorKind::Slt, 3, &DOMAINS);
    }

    #[test]
    fn inverse_values_respect_inequality_bounds() {
        let domain = BitVectorDomain::new(8);
        let bounds = InequalityBounds {
            unsigned: Some(Interval::new(BitVector::new(8, 10), BitVector::new(8, 20))),
            signed: None,
        };
        let children = [BitVector::zero(8), BitVector::new(8, 100)];
        let query = less_than_100_query(&domain, &bounds, &children);

        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let value = OperatorKind::Ult.inverse_value(&query, &mut rng);
            assert!((10..=20).contains(&value.value()));
        }
    }

    #[test]
    fn inequality_bounds_are_ignored_when_they_exclude_all_solutions() {
        let domain = BitVectorDomain::new(8);
        let bounds = InequalityBounds {
            unsigned: Some(Interval::new(BitVector::new(8, 200), BitVector::new(8, 220))),
            signed: None,
        };
        let children = [BitVector::zero(8), BitVector::new(8, 100)];
        let query = less_than_100_query(&domain, &bounds, &children);

        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let value = OperatorKind::Ult.inverse_value(&query, &mut rng);
            assert!(value.value() < 100);
        }
    }
}
