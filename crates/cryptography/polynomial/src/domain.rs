use bls12_381::{
    batch_inversion::batch_inverse,
    ff::{Field, PrimeField},
    group::Group,
    G1Projective, Scalar,
};

use crate::{
    fft::{fft_inplace, precompute_twiddles},
    poly_coeff::PolyCoeff,
};

/// The multiplicative subgroup of size `n` generated by a primitive
/// `n`-th root of unity `ω`.
///
/// Evaluations "over the domain" are ordered naturally: index `i` holds
/// the value at `ω^i`.
#[derive(Debug, Clone)]
pub struct Domain {
    /// `[1, ω, ω^2, ..., ω^(n-1)]`
    pub roots: Vec<Scalar>,
    /// `n` as a field element
    pub domain_size: Scalar,
    pub domain_size_inv: Scalar,
    /// `ω`
    pub generator: Scalar,
    pub generator_inv: Scalar,
    twiddles: Vec<Scalar>,
    twiddles_inv: Vec<Scalar>,
}

impl Domain {
    /// Builds the domain of the smallest power of two that is at least `size`.
    pub fn new(size: usize) -> Self {
        let size = size.max(1).next_power_of_two();

        let generator = Self::compute_generator_for_size(size);
        let generator_inv = generator.invert().expect("generator should not be zero");

        let domain_size = Scalar::from(size as u64);
        let domain_size_inv = domain_size.invert().expect("size should not be zero");

        let roots = bls12_381::powers_of(generator, size);

        Self {
            roots,
            domain_size,
            domain_size_inv,
            generator,
            generator_inv,
            twiddles: precompute_twiddles(generator, size),
            twiddles_inv: precompute_twiddles(generator_inv, size),
        }
    }

    /// Computes a primitive root of unity of order `size`.
    fn compute_generator_for_size(size: usize) -> Scalar {
        assert!(size.is_power_of_two());

        let log_size = size.trailing_zeros();
        assert!(
            log_size <= Scalar::S,
            "two adicity is {} but group size needed is 2^{log_size}",
            Scalar::S
        );

        let exponent = 1u64 << (Scalar::S - log_size);
        Scalar::ROOT_OF_UNITY.pow_vartime([exponent])
    }

    /// The size of the domain. Always a power of two.
    pub fn size(&self) -> usize {
        self.roots.len()
    }

    /// Evaluates a polynomial in monomial form at every root of the domain.
    pub fn fft_scalars(&self, mut polynomial: PolyCoeff) -> Vec<Scalar> {
        assert!(polynomial.len() <= self.size());
        polynomial.resize(self.size(), Scalar::ZERO);

        fft_inplace(&self.twiddles, &mut polynomial);

        polynomial.0
    }

    /// Interpolates evaluations over the domain into monomial form.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn ifft_scalars(&self, mut points: Vec<Scalar>) -> PolyCoeff {
        assert!(points.len() <= self.size());
        points.resize(self.size(), Scalar::ZERO);

        fft_inplace(&self.twiddles_inv, &mut points);
        for element in &mut points {
            *element *= self.domain_size_inv;
        }

        points.into()
    }

    /// Inverse FFT over group elements: recovers `points` from the
    /// transform whose output `i` is `Σ_j points[j] * ω^(i*j)`.
    ///
    /// Applied to `[τ^0 G, τ^1 G, ...]` this yields the commitments to the
    /// Lagrange basis polynomials of the domain.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn ifft_g1(&self, mut points: Vec<G1Projective>) -> Vec<G1Projective> {
        assert!(points.len() <= self.size());
        points.resize(self.size(), G1Projective::identity());

        fft_inplace(&self.twiddles_inv, &mut points);
        for element in &mut points {
            *element *= self.domain_size_inv;
        }

        points
    }

    /// Evaluates the polynomial whose evaluations over the domain are
    /// `evaluations` at an arbitrary point `z`, without interpolating.
    ///
    /// Uses the barycentric formula
    /// `p(z) = (z^n - 1) / n * Σ_i f_i * ω^i / (z - ω^i)`.
    /// When `z` is itself a root, the matching evaluation is returned.
    pub fn evaluate_barycentric(&self, evaluations: &[Scalar], z: Scalar) -> Scalar {
        assert_eq!(evaluations.len(), self.size());

        if let Some(index) = self.roots.iter().position(|root| *root == z) {
            return evaluations[index];
        }

        let mut denominators: Vec<Scalar> = self.roots.iter().map(|root| z - root).collect();
        batch_inverse(&mut denominators);

        let sum: Scalar = evaluations
            .iter()
            .zip(&self.roots)
            .zip(&denominators)
            .map(|((f, root), inv)| *f * root * inv)
            .sum();

        let z_pow_n = z.pow_vartime([self.size() as u64]);
        (z_pow_n - Scalar::ONE) * self.domain_size_inv * sum
    }
}
