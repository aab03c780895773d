use super::insert_slice;
use super::InversionQuery;
use crate::basic_types::Random;
use crate::bit_vector::BitVector;

/// The part of the target which the revised child of a concatenation produces, and the part which
/// its sibling produces.
fn concat_parts(query: &InversionQuery<'_>) -> (BitVector, BitVector) {
    let target = query.target;
    let low_width = query.children[1].width();
    let high = target.extract(target.width() - 1, low_width);
    let low = target.extract(low_width - 1, 0);
    if query.position == 0 {
        (high, low)
    } else {
        (low, high)
    }
}

pub(super) fn concat_is_invertible(query: &InversionQuery<'_>) -> bool {
    let (own, other) = concat_parts(query);
    query.domain.contains(own) && query.sibling() == other
}

pub(super) fn concat_is_consistent(query: &InversionQuery<'_>) -> bool {
    query.domain.contains(concat_parts(query).0)
}

pub(super) fn concat_value(query: &InversionQuery<'_>) -> BitVector {
    concat_parts(query).0
}

pub(super) fn extract_is_invertible(query: &InversionQuery<'_>) -> bool {
    query
        .domain
        .extract(query.indices[0], query.indices[1])
        .contains(query.target)
}

/// Inserts the target into the current value of the child, or into a random value with
/// probability 1/2.
pub(super) fn extract_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let base = if rng.generate_bool(0.5) {
        query.random_value(rng)
    } else {
        query.children[0]
    };
    query
        .domain
        .clip(insert_slice(base, query.target, query.indices[1]))
}

fn sext_operand(query: &InversionQuery<'_>) -> BitVector {
    query.target.extract(query.width() - 1, 0)
}

pub(super) fn sext_is_invertible(query: &InversionQuery<'_>) -> bool {
    let operand = sext_operand(query);
    operand.sign_extend(query.indices[0]) == query.target && query.domain.contains(operand)
}

pub(super) fn sext_value(query: &InversionQuery<'_>) -> BitVector {
    sext_operand(query)
}

/// The values of the condition which select a branch carrying the target.
fn ite_conditions(query: &InversionQuery<'_>) -> Vec<BitVector> {
    [(true, 1), (false, 2)]
        .into_iter()
        .filter(|(_, branch)| query.children[*branch] == query.target)
        .map(|(condition, _)| BitVector::from_bool(condition))
        .filter(|condition| query.domain.contains(*condition))
        .collect()
}

pub(super) fn ite_is_invertible(query: &InversionQuery<'_>) -> bool {
    if query.position == 0 {
        !ite_conditions(query).is_empty()
    } else {
        ite_selects(query) && query.domain.contains(query.target)
    }
}

/// Whether the condition currently selects the revised branch.
fn ite_selects(query: &InversionQuery<'_>) -> bool {
    query.children[0].is_true() == (query.position == 1)
}

pub(super) fn ite_inverse_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    if query.position == 0 {
        let conditions = ite_conditions(query);
        if conditions.is_empty() {
            return query.random_value(rng);
        }
        conditions[rng.generate_usize_in_range(0..conditions.len())]
    } else {
        query.target
    }
}

pub(super) fn ite_is_consistent(query: &InversionQuery<'_>) -> bool {
    query.position == 0 || query.domain.contains(query.target)
}

pub(super) fn ite_consistent_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    if query.position == 0 {
        query.random_value(rng)
    } else {
        query.target
    }
}

#[cfg(test)]
mod tests {
    use super::super::InversionQuery;
    use super::super::OperatorKind;
    use crate::basic_types::TestRandom;
    use crate::bit_vector::BitVector;
    use crate::bit_vector::BitVectorDomain;
    use crate::bit_vector::InequalityBounds;

    fn query<'a>(
        target: BitVector,
        position: usize,
        children: &'a [BitVector],
        indices: &'a [u32],
        domain: &'a BitVectorDomain,
        bounds: &'a InequalityBounds,
    ) -> InversionQuery<'a> {
        InversionQuery {
            target,
            position,
            children,
            indices,
            domain,
            bounds,
        }
    }

    #[test]
    fn concat_requires_sibling_to_produce_its_part() {
        let bounds = InequalityBounds::default();
        let domain = BitVectorDomain::new(2);
        let children = [BitVector::new(2, 0b01), BitVector::new(3, 0b110)];
        let target = BitVector::new(5, 0b10_110);

        let high = query(target, 0, &children, &[], &domain, &bounds);
        assert!(OperatorKind::Concat.is_invertible(&high));
        assert_eq!(
            OperatorKind::Concat
                .inverse_value(&high, &mut TestRandom::default())
                .value(),
            0b10
        );

        let low_domain = BitVectorDomain::new(3);
        let low = query(
            BitVector::new(5, 0b11_011),
            1,
            &children,
            &[],
            &low_domain,
            &bounds,
        );
        assert!(!OperatorKind::Concat.is_invertible(&low));
        assert!(OperatorKind::Concat.is_consistent(&low));
        assert_eq!(
            OperatorKind::Concat
                .consistent_value(&low, &mut TestRandom::default())
                .value(),
            0b011
        );
    }

    #[test]
    fn extract_keeps_the_bits_outside_of_the_range() {
        let bounds = InequalityBounds::default();
        let domain = BitVectorDomain::parse("xxxx1x").expect("valid domain");
        let children = [BitVector::new(6, 0b100_110)];
        let indices = [3, 2];
        let target = BitVector::new(2, 0b01);
        let extract = query(target, 0, &children, &indices, &domain, &bounds);

        assert!(OperatorKind::Extract.is_invertible(&extract));
        let mut rng = TestRandom {
            bools: vec![false],
            ..Default::default()
        };
        let value = OperatorKind::Extract.inverse_value(&extract, &mut rng);
        assert_eq!(value.value(), 0b100_110);
        assert_eq!(value.extract(3, 2), target);

        // The bit at index 1 is fixed to 1.
        let low_indices = [1, 0];
        let conflicting = query(
            BitVector::new(2, 0b00),
            0,
            &children,
            &low_indices,
            &domain,
            &bounds,
        );
        assert!(!OperatorKind::Extract.is_invertible(&conflicting));
        assert!(!OperatorKind::Extract.is_consistent(&conflicting));
    }

    #[test]
    fn sext_requires_replicated_sign_bits() {
        let bounds = InequalityBounds::default();
        let domain = BitVectorDomain::new(3);
        let children = [BitVector::zero(3)];
        let indices = [2];

        let extended = query(
            BitVector::new(5, 0b11_101),
            0,
            &children,
            &indices,
            &domain,
            &bounds,
        );
        assert!(OperatorKind::Sext.is_invertible(&extended));
        assert_eq!(
            OperatorKind::Sext
                .inverse_value(&extended, &mut TestRandom::default())
                .value(),
            0b101
        );

        let not_extended = query(
            BitVector::new(5, 0b01_101),
            0,
            &children,
            &indices,
            &domain,
            &bounds,
        );
        assert!(!OperatorKind::Sext.is_invertible(&not_extended));
        assert!(!OperatorKind::Sext.is_consistent(&not_extended));
    }

    #[test]
    fn ite_condition_selects_a_branch_carrying_the_target() {
        let bounds = InequalityBounds::default();
        let domain = BitVectorDomain::new(1);
        let children = [
            BitVector::from_bool(true),
            BitVector::new(4, 3),
            BitVector::new(4, 9),
        ];

        let condition = query(BitVector::new(4, 9), 0, &children, &[], &domain, &bounds);
        assert!(OperatorKind::Ite.is_invertible(&condition));
        let mut rng = TestRandom {
            usizes: vec![0],
            ..Default::default()
        };
        assert!(OperatorKind::Ite
            .inverse_value(&condition, &mut rng)
            .is_false());

        let branch_domain = BitVectorDomain::new(4);
        let else_branch = query(
            BitVector::new(4, 5),
            2,
            &children,
            &[],
            &branch_domain,
            &bounds,
        );
        assert!(!OperatorKind::Ite.is_invertible(&else_branch));
        assert!(OperatorKind::Ite.is_consistent(&else_branch));

        let then_branch = query(
            BitVector::new(4, 5),
            1,
            &children,
            &[],
            &branch_domain,
            &bounds,
        );
        assert!(OperatorKind::Ite.is_invertible(&then_branch));
    }
}
