use super::InversionQuery;
use crate::basic_types::Random;
use crate::bit_vector::low_mask;
use crate::bit_vector::BitVector;
use crate::bit_vector::Interval;

/// The number of quotients considered when looking for a dividend which yields a given quotient.
const MAX_QUOTIENT_CANDIDATES: u64 = 1024;
/// The number of multiples of the divisor considered when looking for a dividend which yields a
/// given remainder.
const MAX_REMAINDER_MULTIPLES: u64 = 1024;
/// The number of trial divisions performed when looking for a divisor which yields a given
/// remainder.
const MAX_TRIAL_DIVISIONS: u64 = 4096;
/// The number of random attempts before falling back to an exhaustive (bounded) search.
const NUM_RANDOM_ATTEMPTS: usize = 16;

fn range(width: u32, min: u128, max: u128) -> Interval {
    Interval::new(BitVector::new(width, min as u64), BitVector::new(width, max as u64))
}

pub(super) fn add_is_invertible(query: &InversionQuery<'_>) -> bool {
    query.domain.contains(add_inverse_value(query))
}

pub(super) fn add_inverse_value(query: &InversionQuery<'_>) -> BitVector {
    query.target.sub(&query.sibling())
}

/// The solution of `x * s = t`; the bits of the returned value outside of the returned mask can
/// take any value.
fn mul_solution(target: BitVector, sibling: BitVector) -> Option<(BitVector, u64)> {
    let width = target.width();
    if sibling.is_zero() {
        return target.is_zero().then(|| (BitVector::zero(width), 0));
    }

    // With s = 2^k * o for odd o, we need x * o = t / 2^k modulo 2^(width - k).
    let shift = sibling.count_trailing_zeros();
    if target.count_trailing_zeros() < shift {
        return None;
    }
    let odd_inverse = sibling.shr_by(u64::from(shift)).mod_inverse()?;
    let determined = low_mask(width - shift);
    let solution = target.shr_by(u64::from(shift)).mul(&odd_inverse);
    Some((BitVector::new(width, solution.value() & determined), determined))
}

pub(super) fn mul_is_invertible(query: &InversionQuery<'_>) -> bool {
    match mul_solution(query.target, query.sibling()) {
        Some((solution, determined)) => query.domain.matches_on(solution, determined),
        None => false,
    }
}

pub(super) fn mul_inverse_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let random = query.random_value(rng);
    match mul_solution(query.target, query.sibling()) {
        Some((solution, determined)) => query.domain.clip(BitVector::new(
            query.width(),
            (random.value() & !determined) | solution.value(),
        )),
        None => random,
    }
}

/// Any value `x` with `ctz(x) <= ctz(t)` can be multiplied to `t`.
pub(super) fn mul_is_consistent(query: &InversionQuery<'_>) -> bool {
    let target = query.target;
    target.is_zero()
        || query.domain.hi().value() & low_mask(target.count_trailing_zeros() + 1) != 0
}

pub(super) fn mul_consistent_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let mut value = query.random_value(rng);
    let target = query.target;
    if target.is_zero() {
        return value;
    }

    let trailing_zeros = target.count_trailing_zeros();
    if value.count_trailing_zeros() > trailing_zeros {
        let positions = (0..=trailing_zeros)
            .filter(|position| !query.domain.is_fixed_bit(*position))
            .collect::<Vec<_>>();
        if !positions.is_empty() {
            let position = positions[rng.generate_usize_in_range(0..positions.len())];
            value.set_bit(position, true);
        }
    }
    value
}

/// The values of the revised child for which the division produces the target.
fn udiv_inverse_ranges(query: &InversionQuery<'_>) -> Vec<Interval> {
    let width = query.width();
    let max = u128::from(low_mask(width));
    let target = u128::from(query.target.value());
    let sibling = u128::from(query.sibling().value());

    if query.position == 0 {
        // x / s = t
        if sibling == 0 {
            return if target == max {
                vec![range(width, 0, max)]
            } else {
                vec![]
            };
        }
        let min = target * sibling;
        if min > max {
            return vec![];
        }
        vec![range(width, min, (min + sibling - 1).min(max))]
    } else {
        // s / x = t
        if target == max {
            let mut ranges = vec![range(width, 0, 0)];
            if sibling == max {
                ranges.push(range(width, 1, 1));
            }
            ranges
        } else if target == 0 {
            if sibling < max {
                vec![range(width, sibling + 1, max)]
            } else {
                vec![]
            }
        } else {
            let lower = sibling / (target + 1) + 1;
            let upper = sibling / target;
            if lower <= upper {
                vec![range(width, lower, upper)]
            } else {
                vec![]
            }
        }
    }
}

/// The values of the revised child for which the division can produce the target for some value
/// of the other child.
///
/// For the dividend, divisors up to [`MAX_QUOTIENT_CANDIDATES`] are enumerated; the dividends of
/// the remaining divisors below the target are covered by a single range, which also contains the
/// gaps between them.
fn udiv_consistent_ranges(query: &InversionQuery<'_>) -> Vec<Interval> {
    let width = query.width();
    let max = u128::from(low_mask(width));
    let target = u128::from(query.target.value());

    if query.position == 0 {
        // A division by zero yields all ones.
        if target == max {
            return vec![range(width, 0, max)];
        }
        // For a divisor s the dividends [t * s, (t + 1) * s - 1] yield t; these ranges overlap
        // once s >= t.
        let mut ranges = (1..target.min(u128::from(MAX_QUOTIENT_CANDIDATES) + 1))
            .take_while(|divisor| target * divisor <= max)
            .map(|divisor| range(width, target * divisor, ((target + 1) * divisor - 1).min(max)))
            .collect::<Vec<_>>();
        let first_skipped = u128::from(MAX_QUOTIENT_CANDIDATES) + 1;
        if target > first_skipped && target * first_skipped <= max {
            ranges.push(range(
                width,
                target * first_skipped,
                (target * target - 1).min(max),
            ));
        }
        let first_overlapping = target.max(1);
        if target * first_overlapping <= max {
            let largest_divisor = if target == 0 { max } else { max / target };
            ranges.push(range(
                width,
                target * first_overlapping,
                ((target + 1) * largest_divisor - 1).min(max),
            ));
        }
        ranges
    } else if target == max {
        vec![range(width, 0, 1)]
    } else if target == 0 {
        vec![range(width, 1, max)]
    } else {
        vec![range(width, 1, max / target)]
    }
}

pub(super) fn udiv_is_invertible(query: &InversionQuery<'_>) -> bool {
    query.has_value_in_ranges(&udiv_inverse_ranges(query))
}

pub(super) fn udiv_inverse_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    query
        .sample_in_ranges(&udiv_inverse_ranges(query), rng)
        .unwrap_or_else(|| query.random_value(rng))
}

pub(super) fn udiv_is_consistent(query: &InversionQuery<'_>) -> bool {
    query.has_value_in_ranges(&udiv_consistent_ranges(query))
}

pub(super) fn udiv_consistent_value(
    query: &InversionQuery<'_>,
    rng: &mut dyn Random,
) -> BitVector {
    query
        .sample_in_ranges(&udiv_consistent_ranges(query), rng)
        .unwrap_or_else(|| query.random_value(rng))
}

/// Finds a dividend `x = t + k * s` in the domain, for `t < s`; random multiples are attempted
/// first if a random generator is provided.
fn urem_dividend<'rng>(
    query: &InversionQuery<'_>,
    target: u64,
    sibling: u64,
    rng: Option<&mut (dyn Random + 'rng)>,
) -> Option<BitVector> {
    let width = query.width();
    let max_multiple = (low_mask(width) - target) / sibling;
    let candidate = |multiple: u64| BitVector::new(width, target + multiple * sibling);

    if let Some(rng) = rng {
        let random_candidate = (0..NUM_RANDOM_ATTEMPTS)
            .map(|_| candidate(rng.generate_u64_in_range(0, max_multiple)))
            .find(|value| query.domain.contains(*value));
        if random_candidate.is_some() {
            return random_candidate;
        }
    }
    (0..=max_multiple.min(MAX_REMAINDER_MULTIPLES))
        .map(candidate)
        .find(|value| query.domain.contains(*value))
}

/// The divisors `x > t` of `s - t`, for `s > t`.
fn urem_divisors(query: &InversionQuery<'_>, target: u64, sibling: u64) -> Vec<BitVector> {
    let width = query.width();
    let difference = sibling - target;
    let mut divisors = Vec::new();
    let mut divisor = 1_u64;
    while divisor <= MAX_TRIAL_DIVISIONS && divisor.saturating_mul(divisor) <= difference {
        if difference % divisor == 0 {
            for candidate in [divisor, difference / divisor] {
                let candidate = BitVector::new(width, candidate);
                if candidate.value() > target
                    && query.domain.contains(candidate)
                    && !divisors.contains(&candidate)
                {
                    divisors.push(candidate);
                }
            }
        }
        divisor += 1;
    }
    divisors
}

pub(super) fn urem_is_invertible(query: &InversionQuery<'_>) -> bool {
    let target = query.target.value();
    let sibling = query.sibling().value();
    let max = low_mask(query.width());

    if query.position == 0 {
        // x % s = t
        if sibling == 0 {
            query.domain.contains(query.target)
        } else {
            target < sibling && urem_dividend(query, target, sibling, None).is_some()
        }
    } else {
        // s % x = t
        if sibling == target {
            query.domain.contains(BitVector::zero(query.width()))
                || (target < max
                    && query.domain.has_value_in_range(
                        query.target.inc(),
                        BitVector::ones(query.width()),
                    ))
        } else {
            sibling > target && !urem_divisors(query, target, sibling).is_empty()
        }
    }
}

pub(super) fn urem_inverse_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let width = query.width();
    let target = query.target.value();
    let sibling = query.sibling().value();

    let value = if query.position == 0 {
        if sibling == 0 {
            Some(query.target)
        } else {
            urem_dividend(query, target, sibling, Some(&mut *rng))
        }
    } else if sibling == target {
        let mut ranges = vec![Interval::new(BitVector::zero(width), BitVector::zero(width))];
        if target < low_mask(width) {
            ranges.push(Interval::new(query.target.inc(), BitVector::ones(width)));
        }
        query.sample_in_ranges(&ranges, rng)
    } else {
        let divisors = urem_divisors(query, target, sibling);
        if divisors.is_empty() {
            None
        } else {
            Some(divisors[rng.generate_usize_in_range(0..divisors.len())])
        }
    };
    value.unwrap_or_else(|| query.random_value(rng))
}

/// The values of the revised child for which the remainder can be the target for some value of
/// the other child.
fn urem_consistent_ranges(query: &InversionQuery<'_>) -> Vec<Interval> {
    let width = query.width();
    let max = u128::from(low_mask(width));
    let target = u128::from(query.target.value());

    let mut ranges = Vec::new();
    if query.position == 0 {
        // Either x = t (with s = 0 or s > t), or x = t + s for some s > t.
        ranges.push(range(width, target, target));
        if 2 * target < max {
            ranges.push(range(width, 2 * target + 1, max));
        }
    } else {
        // Either x = 0 (with s = t), or x > t (with s = t).
        ranges.push(range(width, 0, 0));
        if target < max {
            ranges.push(range(width, target + 1, max));
        }
    }
    ranges
}

pub(super) fn urem_is_consistent(query: &InversionQuery<'_>) -> bool {
    query.has_value_in_ranges(&urem_consistent_ranges(query))
}

pub(super) fn urem_consistent_value(
    query: &InversionQuery<'_>,
    rng: &mut dyn Random,
) -> BitVector {
    query
        .sample_in_ranges(&urem_consistent_ranges(query), rng)
        .unwrap_or_else(|| query.random_value(rng))
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::super::tests::check_binary_operator;
    use super::super::InversionQuery;
    use super::super::OperatorKind;
    use crate::basic_types::TestRandom;
    use crate::bit_vector::BitVector;
    use crate::bit_vector::BitVectorDomain;
    use crate::bit_vector::InequalityBounds;

    const DOMAINS: [&str; 6] = ["xxx", "x1x", "0x1", "1x0", "xx0", "010"];

    #[test]
    fn add_procedures_are_exact() {
        check_binary_operator(OperatorKind::Add, 3, &DOMAINS);
    }

    #[test]
    fn mul_procedures_are_exact() {
        check_binary_operator(OperatorKind::Mul, 3, &DOMAINS);
    }

    #[test]
    fn udiv_procedures_are_exact_for_small_widths() {
        check_binary_operator(OperatorKind::Udiv, 3, &DOMAINS);
    }

    #[test]
    fn urem_procedures_are_exact_for_small_widths() {
        check_binary_operator(OperatorKind::Urem, 3, &DOMAINS);
    }

    #[test]
    fn mul_inverse_uses_modular_inverse_of_odd_part() {
        let domain = BitVectorDomain::new(8);
        let bounds = InequalityBounds::default();
        // x * 6 = 18 has solutions x = 3 + 128 * k
        let children = [BitVector::zero(8), BitVector::new(8, 6)];
        let query = InversionQuery {
            target: BitVector::new(8, 18),
            position: 0,
            children: &children,
            indices: &[],
            domain: &domain,
            bounds: &bounds,
        };
        let mut rng = TestRandom {
            integers: vec![0b1000_0000],
            ..Default::default()
        };

        assert!(OperatorKind::Mul.is_invertible(&query));
        let value = OperatorKind::Mul.inverse_value(&query, &mut rng);
        assert_eq!(value.value(), 131);
        assert_eq!(value.mul(&children[1]).value(), 18);
    }

    #[test]
    fn udiv_dividends_of_large_divisors_are_consistent() {
        // 3_000_000 / 1500 = 2000, a divisor beyond the enumerated candidates.
        let domain = BitVectorDomain::fixed(BitVector::new(32, 3_000_000));
        let bounds = InequalityBounds::default();
        let children = [BitVector::zero(32), BitVector::new(32, 7)];
        let query = InversionQuery {
            target: BitVector::new(32, 2000),
            position: 0,
            children: &children,
            indices: &[],
            domain: &domain,
            bounds: &bounds,
        };

        assert!(!OperatorKind::Udiv.is_invertible(&query));
        assert!(OperatorKind::Udiv.is_consistent(&query));
        assert_eq!(
            OperatorKind::Udiv
                .consistent_value(&query, &mut SmallRng::seed_from_u64(5))
                .value(),
            3_000_000
        );
    }

    #[test]
    fn urem_finds_large_divisors() {
        let domain = BitVectorDomain::new(32);
        let bounds = InequalityBounds::default();
        // 1_000_003 % x = 3 requires x to divide 1_000_000 and x > 3
        let children = [BitVector::new(32, 1_000_003), BitVector::zero(32)];
        let query = InversionQuery {
            target: BitVector::new(32, 3),
            position: 1,
            children: &children,
            indices: &[],
            domain: &domain,
            bounds: &bounds,
        };
        let mut rng = TestRandom {
            usizes: vec![0],
            ..Default::default()
        };

        assert!(OperatorKind::Urem.is_invertible(&query));
        let value = OperatorKind::Urem.inverse_value(&query, &mut rng);
        assert_eq!(children[0].urem(&value).value(), 3);
    }
}
