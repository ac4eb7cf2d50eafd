use std::ops::{Deref, DerefMut};

use bls12_381::{ff::Field, Scalar};

/// A polynomial in monomial form, coefficients in ascending order of degree:
///
/// ```text
/// a_0 + a_1 * x + ... + a_(n-1) * x^(n-1)
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct PolyCoeff(pub Vec<Scalar>);

impl PolyCoeff {
    /// Evaluates the polynomial at `x` using Horner's method.
    #[must_use]
    pub fn eval(&self, x: &Scalar) -> Scalar {
        self.iter()
            .rev()
            .fold(Scalar::ZERO, |acc, coeff| acc * x + coeff)
    }

    /// Divides by the monic linear polynomial `X - root` using synthetic
    /// division, returning `(quotient, remainder)`.
    ///
    /// The remainder equals `self.eval(root)`.
    #[must_use]
    pub fn divide_by_linear(&self, root: Scalar) -> (Self, Scalar) {
        if self.is_empty() {
            return (Self::default(), Scalar::ZERO);
        }

        let mut quotient = vec![Scalar::ZERO; self.len() - 1];
        let mut carry = Scalar::ZERO;
        for (i, coeff) in self.iter().enumerate().rev() {
            let value = *coeff + carry * root;
            if i == 0 {
                return (Self(quotient), value);
            }
            quotient[i - 1] = value;
            carry = value;
        }
        unreachable!("loop returns on the constant coefficient")
    }
}

impl Deref for PolyCoeff {
    type Target = Vec<Scalar>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PolyCoeff {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Scalar>> for PolyCoeff {
    fn from(value: Vec<Scalar>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn poly(coeffs: &[u64]) -> PolyCoeff {
        PolyCoeff(coeffs.iter().copied().map(Scalar::from).collect())
    }

    fn arb_poly(max_len: usize) -> impl Strategy<Value = PolyCoeff> {
        prop::collection::vec(any::<u64>().prop_map(Scalar::from), 0..=max_len).prop_map(PolyCoeff)
    }

    #[test]
    fn eval_small_polynomial() {
        // 1 + 2x + 3x^2 at x = 2
        assert_eq!(poly(&[1, 2, 3]).eval(&Scalar::from(2u64)), Scalar::from(17u64));
        assert_eq!(PolyCoeff::default().eval(&Scalar::from(9u64)), Scalar::ZERO);
    }

    #[test]
    fn divide_by_linear_exact() {
        // x^2 - 1 = (x - 1)(x + 1)
        let p = PolyCoeff(vec![-Scalar::ONE, Scalar::ZERO, Scalar::ONE]);
        let (q, r) = p.divide_by_linear(Scalar::ONE);
        assert_eq!(q, poly(&[1, 1]));
        assert_eq!(r, Scalar::ZERO);
    }

    #[test]
    fn divide_by_linear_on_constant() {
        let (q, r) = poly(&[7]).divide_by_linear(Scalar::from(3u64));
        assert!(q.is_empty());
        assert_eq!(r, Scalar::from(7u64));
    }

    proptest! {
        #[test]
        fn prop_linear_division_reconstructs(p in arb_poly(24), root in any::<u64>(), x in any::<u64>()) {
            let root = Scalar::from(root);
            let x = Scalar::from(x);
            let (q, r) = p.divide_by_linear(root);

            prop_assert_eq!(r, p.eval(&root));
            prop_assert_eq!(q.eval(&x) * (x - root) + r, p.eval(&x));
        }
    }
}
