use bls12_381::{lincomb::g1_lincomb, traits::*, G1Point, Scalar};
use maybe_rayon::prelude::*;
use serialization::{
    deserialize_blob_to_scalars, deserialize_bytes_to_scalar, deserialize_compressed_g1,
    serialize_g1_compressed, serialize_scalar, serialize_scalars_to_blob,
};

use crate::{
    fiat_shamir::{compute_aggregation_challenge, compute_evaluation_challenge},
    versioned_hash, BlobRef, Context, Error, KZGCommitment, KZGOpeningEvaluation,
    KZGOpeningPoint, KZGProof, VerifierError, VersionedHash,
};

/// Everything a blob-carrying transaction needs besides the blobs themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobBundle {
    pub commitments: Vec<KZGCommitment>,
    pub versioned_hashes: Vec<VersionedHash>,
    pub aggregated_proof: KZGProof,
}

/// A set of blobs folded into a single polynomial with a random challenge.
pub(crate) struct Aggregate {
    pub(crate) evaluations: Vec<Scalar>,
    pub(crate) commitment: G1Point,
    pub(crate) point: Scalar,
}

impl Context {
    /// Computes the KZG commitment to the polynomial represented by the blob.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn blob_to_kzg_commitment(&self, blob: BlobRef) -> Result<KZGCommitment, Error> {
        let polynomial = deserialize_blob_to_scalars(blob.as_slice())?;
        let commitment = self.prover.commit(&polynomial);
        Ok(serialize_g1_compressed(&commitment))
    }

    /// Commits to every blob. Blobs are independent, so under the
    /// `multithreaded` feature they are committed to in parallel.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(blobs = blobs.len())))]
    pub fn compute_commitments(&self, blobs: &[BlobRef]) -> Result<Vec<KZGCommitment>, Error> {
        blobs
            .maybe_par_iter()
            .map(|blob| self.blob_to_kzg_commitment(*blob))
            .collect()
    }

    /// Computes the opening proof for the blob's polynomial at `z`,
    /// returning the proof and the evaluation `y = p(z)`.
    ///
    /// # Panics
    ///
    /// The proof is checked against the blob's commitment before it is
    /// returned. A failure means the arithmetic is broken rather than the
    /// input, so this panics instead of returning an error.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn compute_kzg_proof(
        &self,
        blob: BlobRef,
        z: KZGOpeningPoint,
    ) -> Result<(KZGProof, KZGOpeningEvaluation), Error> {
        let polynomial = deserialize_blob_to_scalars(blob.as_slice())?;
        let z = deserialize_bytes_to_scalar(&z)?;

        let (proof, y) = self.prover.compute_opening_proof(&polynomial, z);
        let commitment = self.prover.commit(&polynomial);
        self.assert_self_verifies(commitment, z, y, proof);

        Ok((serialize_g1_compressed(&proof), serialize_scalar(&y)))
    }

    /// Computes one proof covering every blob, by opening a random linear
    /// combination of their polynomials at a challenge point.
    ///
    /// Note: this does not check that `commitments` belong to `blobs`; a
    /// mismatch simply yields a proof that will not verify.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(blobs = blobs.len())))]
    pub fn compute_aggregated_kzg_proof(
        &self,
        blobs: &[BlobRef],
        commitments: &[KZGCommitment],
    ) -> Result<KZGProof, Error> {
        let aggregate = self.aggregate(blobs, commitments)?;

        let (proof, y) = self
            .prover
            .compute_opening_proof(&aggregate.evaluations, aggregate.point);
        let recomputed_commitment = self.prover.commit(&aggregate.evaluations);
        self.assert_self_verifies(recomputed_commitment, aggregate.point, y, proof);

        Ok(serialize_g1_compressed(&proof))
    }

    /// Computes commitments, versioned hashes and the aggregated proof for
    /// a set of blobs.
    pub fn compute_blob_bundle(&self, blobs: &[BlobRef]) -> Result<BlobBundle, Error> {
        let commitments = self.compute_commitments(blobs)?;
        let versioned_hashes = commitments.iter().map(versioned_hash).collect();
        let aggregated_proof = self.compute_aggregated_kzg_proof(blobs, &commitments)?;

        Ok(BlobBundle {
            commitments,
            versioned_hashes,
            aggregated_proof,
        })
    }

    /// Folds blobs and commitments with powers of the aggregation challenge
    /// and derives the point at which the result is opened.
    pub(crate) fn aggregate(
        &self,
        blobs: &[BlobRef],
        commitments: &[KZGCommitment],
    ) -> Result<Aggregate, Error> {
        if blobs.len() != commitments.len() {
            return Err(VerifierError::PolynomialCommitmentCountMismatch {
                polynomials_len: blobs.len(),
                commitments_len: commitments.len(),
            }
            .into());
        }

        let polynomials = blobs
            .maybe_par_iter()
            .map(|blob| deserialize_blob_to_scalars(blob.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        let commitments_g1 = commitments
            .iter()
            .map(|commitment| deserialize_compressed_g1(commitment))
            .collect::<Result<Vec<_>, _>>()?;

        let r = compute_aggregation_challenge(blobs, commitments);
        let r_powers = bls12_381::powers_of(r, blobs.len());

        let mut evaluations = vec![Scalar::ZERO; self.prover.domain.size()];
        for (polynomial, r_i) in polynomials.iter().zip(&r_powers) {
            for (acc, value) in evaluations.iter_mut().zip(polynomial) {
                *acc += *value * r_i;
            }
        }

        let commitment = g1_lincomb(&commitments_g1, &r_powers)
            .expect("commitments_g1.len() == r_powers.len()")
            .to_affine();

        let aggregated_blob = serialize_scalars_to_blob(&evaluations);
        let point = compute_evaluation_challenge(
            aggregated_blob.as_slice(),
            &serialize_g1_compressed(&commitment),
        );

        Ok(Aggregate {
            evaluations,
            commitment,
            point,
        })
    }

    fn assert_self_verifies(&self, commitment: G1Point, z: Scalar, y: Scalar, proof: G1Point) {
        if let Err(err) = self.verifier.verify_kzg_proof(commitment, z, y, proof) {
            panic!("freshly computed opening proof failed verification: {err:?}");
        }
    }
}
