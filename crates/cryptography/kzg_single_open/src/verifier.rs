use bls12_381::{
    lincomb::g1_lincomb, multi_pairings, traits::*, G1Point, G2Point, G2Prepared, Scalar,
};
use itertools::{chain, izip, Itertools};

use crate::VerifierError;

/// The key that is used to verify KZG single-point opening proofs.
#[derive(Debug)]
pub struct VerificationKey {
    pub gen_g1: G1Point,
    pub gen_g2: G2Point,
    pub tau_g2: G2Point,
    gen_g2_prepared: G2Prepared,
    tau_g2_prepared: G2Prepared,
}

impl VerificationKey {
    pub fn new(gen_g1: G1Point, gen_g2: G2Point, tau_g2: G2Point) -> Self {
        Self {
            gen_g1,
            gen_g2,
            tau_g2,
            gen_g2_prepared: G2Prepared::from(gen_g2),
            tau_g2_prepared: G2Prepared::from(tau_g2),
        }
    }
}

#[derive(Debug)]
pub struct Verifier {
    pub verification_key: VerificationKey,
}

impl Verifier {
    pub const fn new(verification_key: VerificationKey) -> Self {
        Self { verification_key }
    }

    /// Checks that `proof` shows the polynomial committed to by `commitment`
    /// evaluates to `y` at `z`.
    pub fn verify_kzg_proof(
        &self,
        commitment: G1Point,
        z: Scalar,
        y: Scalar,
        proof: G1Point,
    ) -> Result<(), VerifierError> {
        let vk = &self.verification_key;

        // [p(τ) - y + z*q(τ)]G₁
        let lhs_g1 = (commitment - (vk.gen_g1 * y - proof * z)).to_affine();
        // [-q(τ)]G₁
        let rhs_g1 = -proof;

        // e([p(τ) - y + z*q(τ)]G₁, G₂) * e([-q(τ)]G₁, [τ]G₂) == 1
        multi_pairings(&[(&lhs_g1, &vk.gen_g2_prepared), (&rhs_g1, &vk.tau_g2_prepared)])
            .then_some(())
            .ok_or(VerifierError::InvalidProof)
    }

    /// Checks many opening proofs with a single pairing check, folding them
    /// together with the caller-provided powers of a random challenge.
    pub fn verify_kzg_proof_batch(
        &self,
        commitments: &[G1Point],
        zs: &[Scalar],
        ys: &[Scalar],
        proofs: &[G1Point],
        r_powers: &[Scalar],
    ) -> Result<(), VerifierError> {
        let same_length = commitments.len() == zs.len()
            && commitments.len() == ys.len()
            && commitments.len() == proofs.len();
        if !same_length {
            return Err(VerifierError::BatchVerificationInputsMustHaveSameLength {
                commitments_len: commitments.len(),
                points_len: zs.len(),
                evaluations_len: ys.len(),
                proofs_len: proofs.len(),
            });
        }
        if commitments.is_empty() {
            return Ok(());
        }
        assert_eq!(r_powers.len(), commitments.len());

        let vk = &self.verification_key;

        // Σ r^i * [p_i(τ) - y_i + z_i * q_i(τ)]G₁
        let lhs_g1 = {
            let points = chain![commitments, [&vk.gen_g1], proofs]
                .copied()
                .collect_vec();
            let y_lincomb: Scalar = izip!(r_powers, ys).map(|(r_i, y_i)| r_i * y_i).sum();
            let r_z = izip!(r_powers, zs).map(|(r_i, z_i)| r_i * z_i);
            let scalars = chain![r_powers.iter().copied(), [-y_lincomb], r_z].collect_vec();
            g1_lincomb(&points, &scalars)
                .expect("points.len() == scalars.len()")
                .to_affine()
        };

        // -Σ r^i * [q_i(τ)]G₁
        let rhs_g1 = {
            let neg_r_powers = r_powers.iter().map(|r| -r).collect_vec();
            g1_lincomb(proofs, &neg_r_powers)
                .expect("proofs.len() == neg_r_powers.len()")
                .to_affine()
        };

        multi_pairings(&[(&lhs_g1, &vk.gen_g2_prepared), (&rhs_g1, &vk.tau_g2_prepared)])
            .then_some(())
            .ok_or(VerifierError::InvalidProof)
    }
}
