use super::InversionQuery;
use crate::basic_types::Random;
use crate::bit_vector::BitVector;

/// `x & s = t` requires `t` to be a subset of `s`, and `x` to agree with `t` wherever `s` is set.
pub(super) fn and_is_invertible(query: &InversionQuery<'_>) -> bool {
    let target = query.target;
    let sibling = query.sibling();
    target.value() & !sibling.value() == 0 && query.domain.matches_on(target, sibling.value())
}

pub(super) fn and_inverse_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let sibling = query.sibling().value();
    let random = query.random_value(rng);
    query.domain.clip(BitVector::new(
        query.width(),
        (query.target.value() & sibling) | (random.value() & !sibling),
    ))
}

pub(super) fn and_is_consistent(query: &InversionQuery<'_>) -> bool {
    query.target.value() & !query.domain.hi().value() == 0
}

pub(super) fn and_consistent_value(query: &InversionQuery<'_>, rng: &mut dyn Random) -> BitVector {
    let random = query.random_value(rng);
    query.domain.clip(query.target.or(&random))
}

pub(super) fn not_is_invertible(query: &InversionQuery<'_>) -> bool {
    query.domain.contains(query.target.not())
}

pub(super) fn not_inverse_value(query: &InversionQuery<'_>) -> BitVector {
    query.target.not()
}

pub(super) fn xor_is_invertible(query: &InversionQuery<'_>) -> bool {
    query.domain.contains(xor_inverse_value(query))
}

pub(super) fn xor_inverse_value(query: &InversionQuery<'_>) -> BitVector {
    query.target.xor(&query.sibling())
}

#[cfg(test)]
mod tests {
    use super::super::tests::check_binary_operator;
    use super::super::InversionQuery;
    use super::super::OperatorKind;
    use crate::basic_types::TestRandom;
    use crate::bit_vector::BitVector;
    use crate::bit_vector::BitVectorDomain;
    use crate::bit_vector::InequalityBounds;

    const DOMAINS: [&str; 5] = ["xxx", "x1x", "0x1", "1x0", "101"];

    #[test]
    fn and_procedures_are_exact() {
        check_binary_operator(OperatorKind::And, 3, &DOMAINS);
    }

    #[test]
    fn xor_procedures_are_exact() {
        check_binary_operator(OperatorKind::Xor, 3, &DOMAINS);
    }

    #[test]
    fn and_inverse_keeps_target_bits_under_sibling() {
        let domain = BitVectorDomain::new(4);
        let bounds = InequalityBounds::default();
        let children = [BitVector::new(4, 0b0110), BitVector::zero(4)];
        let query = InversionQuery {
            target: BitVector::new(4, 0b0100),
            position: 1,
            children: &children,
            indices: &[],
            domain: &domain,
            bounds: &bounds,
        };
        let mut rng = TestRandom {
            integers: vec![0b1011],
            ..Default::default()
        };

        assert!(OperatorKind::And.is_invertible(&query));
        let value = OperatorKind::And.inverse_value(&query, &mut rng);
        assert_eq!(value.value(), 0b1101);
    }

    #[test]
    fn not_requires_complement_in_domain() {
        let domain = BitVectorDomain::parse("1x").expect("valid domain");
        let bounds = InequalityBounds::default();
        let children = [BitVector::zero(2)];
        let mut query = InversionQuery {
            target: BitVector::new(2, 0b00),
            position: 0,
            children: &children,
            indices: &[],
            domain: &domain,
            bounds: &bounds,
        };
        assert!(OperatorKind::Not.is_invertible(&query));
        assert_eq!(
            OperatorKind::Not
                .inverse_value(&query, &mut TestRandom::default())
                .value(),
            0b11
        );

        query.target = BitVector::new(2, 0b10);
        assert!(!OperatorKind::Not.is_invertible(&query));
        assert!(!OperatorKind::Not.is_consistent(&query));
    }
}
