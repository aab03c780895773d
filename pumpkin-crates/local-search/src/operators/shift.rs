use super::InversionQuery;
use super::OperatorKind;
use crate::basic_types::Random;
use crate::bit_vector::low_mask;
use crate::bit_vector::BitVector;
use crate::bit_vector::Interval;

fn shift_by(kind: OperatorKind, value: BitVector, amount: u64) -> BitVector {
    match kind {
        OperatorKind::Shl => value.shl_by(amount),
        OperatorKind::Shr => value.shr_by(amount),
        _ => value.ashr_by(amount),
    }
}

/// The bits which the shifted operand `x` should have such that shifting `x` by `amount` yields
/// `target`; the bits outside of the returned mask can take any value.
fn shifted_operand(kind: OperatorKind, target: BitVector, amount: u64) -> Option<(BitVector, u64)> {
    let width = target.width();
    if kind != OperatorKind::Ashr && amount >= u64::from(width) {
        return target
            .is_zero()
            .then(|| (BitVector::zero(width), 0));
    }

    let amount = amount.min(u64::from(width - 1)) as u32;
    let shifted_in = match kind {
        OperatorKind::Shl => target.count_trailing_zeros(),
        OperatorKind::Shr => target.count_leading_zeros(),
        // The sign bit and the bits shifted in should all be equal.
        _ => target.count_leading_sign_bits().saturating_sub(1),
    };
    if shifted_in < amount {
        return None;
    }

    match kind {
        OperatorKind::Shl => Some((target.shr_by(u64::from(amount)), low_mask(width - amount))),
        _ => Some((
            target.shl_by(u64::from(amount)),
            low_mask(width) & !low_mask(amount),
        )),
    }
}

fn build_operand(
    query: &InversionQuery<'_>,
    (operand, determined): (BitVector, u64),
    rng: &mut dyn Random,
) -> BitVector {
    let random = query.random_value(rng);
    query.domain.clip(BitVector::new(
        query.width(),
        (random.value() & !determined) | operand.value(),
    ))
}

/// The shift amounts for which shifting the sibling yields the target.
fn amount_ranges(kind: OperatorKind, query: &InversionQuery<'_>) -> Vec<Interval> {
    let width = query.width();
    let sibling = query.sibling();
    let mut ranges = (0..u64::from(width))
        .filter(|amount| shift_by(kind, sibling, *amount) == query.target)
        .map(|amount| {
            let amount = BitVector::new(width, amount);
            Interval::new(amount, amount)
        })
        .collect::<Vec<_>>();
    if shift_by(kind, sibling, u64::from(width)) == query.target {
        ranges.push(Interval::new(
            BitVector::new(width, u64::from(width)),
            BitVector::ones(width),
        ));
    }
    ranges
}

pub(super) fn is_invertible(kind: OperatorKind, query: &InversionQuery<'_>) -> bool {
    if query.position == 0 {
        shifted_operand(kind, query.target, query.sibling().value())
            .is_some_and(|(operand, determined)| query.domain.matches_on(operand, determined))
    } else {
        query.has_value_in_ranges(&amount_ranges(kind, query))
    }
}

pub(super) fn inverse_value(
    kind: OperatorKind,
    query: &InversionQuery<'_>,
    rng: &mut dyn Random,
) -> BitVector {
    if query.position == 0 {
        match shifted_operand(kind, query.target, query.sibling().value()) {
            Some(solution) => build_operand(query, solution, rng),
            None => query.random_value(rng),
        }
    } else {
        query
            .sample_in_ranges(&amount_ranges(kind, query), rng)
            .unwrap_or_else(|| query.random_value(rng))
    }
}

/// The solutions for the shifted operand over all shift amounts.
fn consistent_operands(kind: OperatorKind, query: &InversionQuery<'_>) -> Vec<(BitVector, u64)> {
    (0..=u64::from(query.width()))
        .filter_map(|amount| shifted_operand(kind, query.target, amount))
        .filter(|(operand, determined)| query.domain.matches_on(*operand, *determined))
        .collect()
}

/// The largest shift amount for which some value shifted by it yields the target, or `None` if
/// every shift amount works.
fn largest_consistent_amount(kind: OperatorKind, target: BitVector) -> Option<u32> {
    match kind {
        OperatorKind::Shl => (!target.is_zero()).then(|| target.count_trailing_zeros()),
        OperatorKind::Shr => (!target.is_zero()).then(|| target.count_leading_zeros()),
        _ => {
            let sign_bits = target.count_leading_sign_bits();
            (sign_bits < target.width()).then(|| sign_bits - 1)
        }
    }
}

pub(super) fn is_consistent(kind: OperatorKind, query: &InversionQuery<'_>) -> bool {
    if query.position == 0 {
        !consistent_operands(kind, query).is_empty()
    } else {
        match largest_consistent_amount(kind, query.target) {
            Some(amount) => query.domain.has_value_in_range(
                BitVector::zero(query.width()),
                BitVector::new(query.width(), u64::from(amount)),
            ),
            None => true,
        }
    }
}

pub(super) fn consistent_value(
    kind: OperatorKind,
    query: &InversionQuery<'_>,
    rng: &mut dyn Random,
) -> BitVector {
    if query.position == 0 {
        let solutions = consistent_operands(kind, query);
        if solutions.is_empty() {
            return query.random_value(rng);
        }
        let solution = solutions[rng.generate_usize_in_range(0..solutions.len())];
        build_operand(query, solution, rng)
    } else {
        match largest_consistent_amount(kind, query.target) {
            Some(amount) => query
                .sample_in_range(
                    BitVector::zero(query.width()),
                    BitVector::new(query.width(), u64::from(amount)),
                    rng,
                )
                .unwrap_or_else(|| query.random_value(rng)),
            None => query.random_value(rng),
        }
    }
}
