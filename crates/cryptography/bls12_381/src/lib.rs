use std::iter::successors;

use pairing::{MillerLoopResult, MultiMillerLoop};
use traits::*;

pub mod batch_inversion;
pub mod lincomb;

// Re-export ff and group, so other crates do not need to directly import(and independently version) them
pub use ff;
pub use group;

pub mod traits {
    pub use ff::{Field, PrimeField};
    pub use group::{prime::PrimeCurveAffine, Curve, Group};
}

/// Affine representation of a point in the BLS12-381 G1 curve group.
pub type G1Point = blstrs::G1Affine;

/// Projective representation of a point in the BLS12-381 G1 curve group.
pub type G1Projective = blstrs::G1Projective;

/// Affine representation of a point in the BLS12-381 G2 curve group.
pub type G2Point = blstrs::G2Affine;

/// Projective representation of a point in the BLS12-381 G2 curve group.
pub type G2Projective = blstrs::G2Projective;

/// Precomputed G2 point for efficient pairing computations.
///
/// This representation allows reusing expensive Miller loop setup across multiple pairings.
pub type G2Prepared = blstrs::G2Prepared;

/// Scalar field element for the BLS12-381 curve.
///
/// Used as exponents in scalar multiplication and other finite field operations.
pub type Scalar = blstrs::Scalar;

/// Checks whether the product of pairings over the given G1 × G2 pairs equals the identity.
pub fn multi_pairings(pairs: &[(&G1Point, &G2Prepared)]) -> bool {
    blstrs::Bls12::multi_miller_loop(pairs)
        .final_exponentiation()
        .is_identity()
        .into()
}

/// Converts projective G1 points to their affine representation in a single pass.
pub fn g1_batch_normalize(projective_points: &[G1Projective]) -> Vec<G1Point> {
    batch_normalize_points(projective_points)
}

/// Generic utility to batch-normalize projective points for any curve implementing `PrimeCurveAffine`.
pub fn batch_normalize_points<T: PrimeCurveAffine>(points: &[T::Curve]) -> Vec<T>
where
    T::Curve: Curve<AffineRepr = T>,
{
    let mut affine_points = vec![T::identity(); points.len()];
    T::Curve::batch_normalize(points, &mut affine_points);
    affine_points
}

/// Returns `[1, x, x^2, ..., x^(n-1)]`.
pub fn powers_of(x: Scalar, n: usize) -> Vec<Scalar> {
    successors(Some(Scalar::ONE), |power| Some(*power * x))
        .take(n)
        .collect()
}

/// Reduces bytes to be a value less than the scalar modulus.
///
/// The bytes are interpreted as a big-endian integer.
pub fn reduce_bytes_to_scalar_bias(bytes: [u8; 32]) -> Scalar {
    let mut out = blst::blst_fr::default();

    unsafe {
        // Convert byte array into a scalar
        let mut s = blst::blst_scalar::default();
        blst::blst_scalar_from_bendian(&raw mut s, bytes.as_ptr());
        // Convert scalar into a `blst_fr` reducing the value along the way
        blst::blst_fr_from_scalar(&raw mut out, std::ptr::addr_of!(s));
    }

    Scalar::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// BLS12-381 scalar field modulus (r)
    const BLS12_381_R: [u8; 32] = [
        0x73, 0xED, 0xA7, 0x53, 0x29, 0x9D, 0x7D, 0x48, 0x33, 0x39, 0xD8, 0x08, 0x09, 0xA1, 0xD8,
        0x05, 0x53, 0xBD, 0xA4, 0x02, 0xFF, 0xFE, 0x5B, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00,
        0x00, 0x01,
    ];

    #[test]
    fn reduce_bytes_to_scalar_edge_cases() {
        assert_eq!(reduce_bytes_to_scalar_bias([0u8; 32]), Scalar::ZERO);

        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(reduce_bytes_to_scalar_bias(one), Scalar::ONE);

        // r reduces to zero, r + 1 reduces to one
        assert_eq!(reduce_bytes_to_scalar_bias(BLS12_381_R), Scalar::ZERO);
        let mut r_plus_one = BLS12_381_R;
        r_plus_one[31] += 1;
        assert_eq!(reduce_bytes_to_scalar_bias(r_plus_one), Scalar::ONE);
    }

    #[test]
    fn powers_of_smoke_test() {
        let two = Scalar::from(2u64);
        let powers = powers_of(two, 5);
        let expected: Vec<_> = [1u64, 2, 4, 8, 16].into_iter().map(Scalar::from).collect();
        assert_eq!(powers, expected);

        assert!(powers_of(two, 0).is_empty());
    }

    #[test]
    fn batch_normalize_keeps_identity_in_place() {
        let input = vec![
            G1Projective::identity(),
            G1Projective::generator(),
            G1Projective::identity(),
        ];
        let result = g1_batch_normalize(&input);
        assert!(bool::from(result[0].is_identity()));
        assert_eq!(result[1], G1Point::generator());
        assert!(bool::from(result[2].is_identity()));
    }

    #[test]
    fn batch_normalize_random_points() {
        let mut rng = rand::thread_rng();
        let points: Vec<G1Projective> = (0..32).map(|_| G1Projective::random(&mut rng)).collect();

        let normalized = g1_batch_normalize(&points);

        assert_eq!(normalized.len(), points.len());
        for (norm, proj) in normalized.iter().zip(&points) {
            assert_eq!(*norm, G1Point::from(*proj));
        }
    }

    #[test]
    fn pairing_with_negation() {
        let g1 = G1Point::generator();
        let g2_prep = G2Prepared::from(G2Point::generator());
        let g1_neg = -g1;

        // e(g1, g2) * e(-g1, g2) == 1
        assert!(multi_pairings(&[(&g1, &g2_prep), (&g1_neg, &g2_prep)]));

        // e(g1, g2)^2 != 1
        assert!(!multi_pairings(&[(&g1, &g2_prep), (&g1, &g2_prep)]));
    }
}
