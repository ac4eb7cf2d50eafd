use ff::Field;

/// Replaces every element of `values` with its multiplicative inverse,
/// paying for a single field inversion.
///
/// Panics if any element is zero.
pub fn batch_inverse<F: Field>(values: &mut [F]) {
    if values.is_empty() {
        return;
    }

    // Running products: prefix[i] = v_0 * ... * v_i
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::ONE;
    for value in values.iter() {
        acc *= value;
        prefix.push(acc);
    }

    let mut inv_acc = acc
        .invert()
        .expect("batch_inverse called with a zero element");

    // Walk backwards peeling one factor off the inverted product at a time.
    for i in (0..values.len()).rev() {
        let before = if i == 0 { F::ONE } else { prefix[i - 1] };
        let inverse = inv_acc * before;
        inv_acc *= values[i];
        values[i] = inverse;
    }
}

#[cfg(test)]
mod tests {
    use blstrs::Scalar;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn matches_individual_inversion() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut elements: Vec<Scalar> = (0..257)
            .map(|_| Scalar::random(&mut rng))
            .map(|f| if f.is_zero_vartime() { Scalar::ONE } else { f })
            .collect();

        let expected: Vec<_> = elements
            .iter()
            .map(|f| f.invert().expect("non-zero"))
            .collect();
        batch_inverse(&mut elements);

        assert_eq!(elements, expected);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut elements: Vec<Scalar> = Vec::new();
        batch_inverse(&mut elements);
        assert!(elements.is_empty());
    }

    #[test]
    #[should_panic]
    fn zero_element_panics() {
        let mut elements = vec![Scalar::ONE, Scalar::ZERO, Scalar::from(3u64)];
        batch_inverse(&mut elements);
    }

    proptest! {
        #[test]
        fn prop_inverse_times_original_is_one(seeds in proptest::collection::vec(1u64.., 1..64)) {
            let original: Vec<Scalar> = seeds.into_iter().map(Scalar::from).collect();
            let mut inverted = original.clone();
            batch_inverse(&mut inverted);

            for (a, b) in original.iter().zip(&inverted) {
                prop_assert_eq!(*a * b, Scalar::ONE);
            }
        }
    }
}
