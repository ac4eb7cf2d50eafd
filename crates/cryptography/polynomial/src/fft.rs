use std::ops::{Add, Mul, Neg, Sub};

use bls12_381::{ff::Field, group::Group, G1Projective, Scalar};
use maybe_rayon::prelude::*;

/// Anything that can be pushed through a radix-2 butterfly:
/// field elements for polynomial work and G1 points for basis conversion.
pub(crate) trait FFTElement:
    Sized
    + Send
    + Sync
    + Copy
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Scalar, Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
}

impl FFTElement for Scalar {
    fn zero() -> Self {
        Self::ZERO
    }
}

impl FFTElement for G1Projective {
    fn zero() -> Self {
        Self::identity()
    }
}

/// In-place iterative Cooley-Tukey transform.
///
/// `twiddles[k]` must hold `omega^k` for `k < n / 2`, where `omega` is a
/// primitive `n`-th root of unity and `n == values.len()`.
/// Input is in natural order and so is the output.
pub(crate) fn fft_inplace<T: FFTElement>(twiddles: &[Scalar], values: &mut [T]) {
    let n = values.len();
    if n <= 1 {
        return;
    }
    debug_assert!(n.is_power_of_two());
    debug_assert!(twiddles.len() >= n / 2);

    reverse_bit_order(values);

    let mut half = 1;
    while half < n {
        // Stride through the twiddle table so that every layer uses
        // the roots of unity of order `2 * half`.
        let stride = n / (2 * half);
        values
            .maybe_par_chunks_mut(2 * half)
            .for_each(|block| {
                let (lo, hi) = block.split_at_mut(half);
                for (k, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
                    butterfly(a, b, twiddles[k * stride]);
                }
            });
        half *= 2;
    }
}

#[inline]
fn butterfly<T: FFTElement>(a: &mut T, b: &mut T, twiddle: Scalar) {
    let t = if twiddle == Scalar::ONE {
        *b
    } else if *b == T::zero() {
        T::zero()
    } else {
        *b * twiddle
    };
    *b = *a - t;
    *a = *a + t;
}

/// Returns `[1, omega, omega^2, ..., omega^(n/2 - 1)]`.
pub(crate) fn precompute_twiddles(omega: Scalar, n: usize) -> Vec<Scalar> {
    bls12_381::powers_of(omega, (n / 2).max(1))
}

/// Reverses the least significant `bits` of `n`.
pub(crate) const fn reverse_bits(n: usize, bits: u32) -> usize {
    // overflowing_shr keeps `bits == 0` from being a shift by usize::BITS
    n.reverse_bits().overflowing_shr(usize::BITS - bits).0
}

/// Permutes `values` so that the element at index `i` moves to the index
/// whose binary representation is `i` reversed.
///
/// The permutation is an involution.
///
/// # Panics
///
/// Panics if the length is non-zero and not a power of two.
fn reverse_bit_order<T>(values: &mut [T]) {
    if values.is_empty() {
        return;
    }
    let n = values.len();
    assert!(n.is_power_of_two(), "n must be a power of two");

    let log_n = n.trailing_zeros();
    for k in 0..n {
        let rk = reverse_bits(k, log_n);
        if k < rk {
            values.swap(k, rk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_bits_three_bit_table() {
        let expected = [0b000, 0b100, 0b010, 0b110, 0b001, 0b101, 0b011, 0b111];
        for (i, want) in expected.into_iter().enumerate() {
            assert_eq!(reverse_bits(i, 3), want);
        }
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn reverse_bit_order_is_an_involution() {
        let original: Vec<u32> = (0..64).collect();
        let mut permuted = original.clone();
        reverse_bit_order(&mut permuted);
        assert_ne!(permuted, original);
        assert_eq!(permuted[1], 32);
        reverse_bit_order(&mut permuted);
        assert_eq!(permuted, original);

        let mut empty: [u8; 0] = [];
        reverse_bit_order(&mut empty);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn reverse_bit_order_rejects_odd_lengths() {
        let mut values = [1, 2, 3];
        reverse_bit_order(&mut values);
    }
}
