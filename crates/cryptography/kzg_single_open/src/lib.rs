//! KZG10 commitments to polynomials given by their evaluations over a
//! roots-of-unity domain, together with proofs that the committed
//! polynomial takes a given value at a single point.

mod errors;
pub use errors::VerifierError;

pub mod prover;
pub mod verifier;

pub use prover::{CommitKey, Prover};
pub use verifier::{VerificationKey, Verifier};

#[cfg(test)]
pub(crate) mod test_utils {
    use bls12_381::{traits::*, G1Point, G1Projective, G2Point, G2Projective, Scalar};

    use crate::{Prover, VerificationKey, Verifier};

    /// Builds a prover and verifier over `domain_size` elements from a
    /// publicly known secret. Only suitable for tests.
    pub(crate) fn insecure_setup(domain_size: usize) -> (Prover, Verifier) {
        let tau = Scalar::from(0x5eed_u64);
        let g1_monomial: Vec<G1Point> = bls12_381::powers_of(tau, domain_size)
            .into_iter()
            .map(|power| (G1Projective::generator() * power).to_affine())
            .collect();
        let tau_g2 = (G2Projective::generator() * tau).to_affine();

        let prover = Prover::new(domain_size, g1_monomial);
        let verifier = Verifier::new(VerificationKey::new(
            G1Point::generator(),
            G2Point::generator(),
            tau_g2,
        ));
        (prover, verifier)
    }
}
