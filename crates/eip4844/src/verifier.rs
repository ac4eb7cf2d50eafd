use serialization::{deserialize_bytes_to_scalar, deserialize_compressed_g1};

use crate::{
    fiat_shamir::compute_r_powers_for_verify_kzg_proof_batch, BlobRef, Context, Error,
    KZGCommitment, KZGOpeningEvaluation, KZGOpeningPoint, KZGProof, VerifierError,
};

impl Context {
    /// Verify the KZG proof to the commitment.
    ///
    /// `Ok(())` means the proof is valid. Inputs that do not deserialize are
    /// reported as errors just like a failing pairing check.
    pub fn verify_kzg_proof(
        &self,
        commitment: KZGCommitment,
        z: KZGOpeningPoint,
        y: KZGOpeningEvaluation,
        proof: KZGProof,
    ) -> Result<(), Error> {
        let commitment = deserialize_compressed_g1(&commitment)?;
        let proof = deserialize_compressed_g1(&proof)?;
        let z = deserialize_bytes_to_scalar(&z)?;
        let y = deserialize_bytes_to_scalar(&y)?;

        self.verifier.verify_kzg_proof(commitment, z, y, proof)?;

        Ok(())
    }

    /// Verify many independent opening proofs at once.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(proofs = proofs.len())))]
    pub fn verify_kzg_proof_batch(
        &self,
        commitments: &[KZGCommitment],
        zs: &[KZGOpeningPoint],
        ys: &[KZGOpeningEvaluation],
        proofs: &[KZGProof],
    ) -> Result<(), Error> {
        let same_length = commitments.len() == zs.len()
            && commitments.len() == ys.len()
            && commitments.len() == proofs.len();
        if !same_length {
            return Err(VerifierError::BatchVerificationInputsMustHaveSameLength {
                commitments_len: commitments.len(),
                points_len: zs.len(),
                evaluations_len: ys.len(),
                proofs_len: proofs.len(),
            }
            .into());
        }

        let commitments_g1 = commitments
            .iter()
            .map(|commitment| deserialize_compressed_g1(commitment))
            .collect::<Result<Vec<_>, _>>()?;
        let proofs_g1 = proofs
            .iter()
            .map(|proof| deserialize_compressed_g1(proof))
            .collect::<Result<Vec<_>, _>>()?;
        let zs = zs
            .iter()
            .map(|z| deserialize_bytes_to_scalar(z))
            .collect::<Result<Vec<_>, _>>()?;
        let ys = ys
            .iter()
            .map(|y| deserialize_bytes_to_scalar(y))
            .collect::<Result<Vec<_>, _>>()?;

        let r_powers = compute_r_powers_for_verify_kzg_proof_batch(
            self.prover.domain.size(),
            commitments,
            &zs,
            &ys,
            proofs,
        );

        self.verifier
            .verify_kzg_proof_batch(&commitments_g1, &zs, &ys, &proofs_g1, &r_powers)?;

        Ok(())
    }

    /// Verify a proof produced by [`Context::compute_aggregated_kzg_proof`].
    ///
    /// The aggregated polynomial is evaluated at the challenge point directly
    /// from its evaluations, so no interpolation is needed.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(blobs = blobs.len())))]
    pub fn verify_aggregated_kzg_proof(
        &self,
        blobs: &[BlobRef],
        commitments: &[KZGCommitment],
        aggregated_proof: KZGProof,
    ) -> Result<(), Error> {
        let proof = deserialize_compressed_g1(&aggregated_proof)?;
        let aggregate = self.aggregate(blobs, commitments)?;

        let y = self
            .prover
            .domain
            .evaluate_barycentric(&aggregate.evaluations, aggregate.point);

        self.verifier
            .verify_kzg_proof(aggregate.commitment, aggregate.point, y, proof)?;

        Ok(())
    }
}
