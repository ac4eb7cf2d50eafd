//! Challenges derived by hashing the public inputs of a proof.

use bls12_381::{reduce_bytes_to_scalar_bias, Scalar};
use sha2::{Digest, Sha256};

use crate::{
    constants::{BYTES_PER_BLOB, BYTES_PER_COMMITMENT, BYTES_PER_FIELD_ELEMENT},
    BlobRef, KZGCommitment, KZGProof,
};

/// Challenge `r` used to fold many blobs (and their commitments) into one.
pub(crate) fn compute_aggregation_challenge(
    blobs: &[BlobRef],
    commitments: &[KZGCommitment],
) -> Scalar {
    const DOMAIN_SEP: &str = "FSBLOBAGGREGATE_V1_";

    let n = blobs.len();
    let hash_input_size = DOMAIN_SEP.len()
        + size_of::<u64>() // number of blobs
        + n * BYTES_PER_BLOB
        + commitments.len() * BYTES_PER_COMMITMENT;

    let mut hasher = Sha256::new();
    let mut written = 0;
    let mut absorb = |bytes: &[u8]| {
        written += bytes.len();
        hasher.update(bytes);
    };

    absorb(DOMAIN_SEP.as_bytes());
    absorb(&(n as u64).to_le_bytes());
    for blob in blobs {
        absorb(blob.as_slice());
    }
    for commitment in commitments {
        absorb(commitment);
    }

    assert_eq!(written, hash_input_size);
    reduce_bytes_to_scalar_bias(hasher.finalize().into())
}

/// Challenge `x` at which the aggregated polynomial is opened.
pub(crate) fn compute_evaluation_challenge(
    aggregated_blob: &[u8],
    aggregated_commitment: &KZGCommitment,
) -> Scalar {
    const DOMAIN_SEP: &str = "FSBLOBCHALLENGE_V1_";

    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_SEP.as_bytes());
    hasher.update(aggregated_blob);
    hasher.update(aggregated_commitment);

    reduce_bytes_to_scalar_bias(hasher.finalize().into())
}

/// Powers of the challenge `r` used to combine independent opening proofs
/// into a single pairing check.
pub(crate) fn compute_r_powers_for_verify_kzg_proof_batch(
    domain_size: usize,
    commitments: &[KZGCommitment],
    zs: &[Scalar],
    ys: &[Scalar],
    proofs: &[KZGProof],
) -> Vec<Scalar> {
    const DOMAIN_SEP: &str = "RCKZGBATCH___V1_";

    let n = commitments.len();
    let hash_input_size = DOMAIN_SEP.len()
        + size_of::<u64>() // polynomial bound
        + size_of::<u64>() // batch size
        + n * (2 * BYTES_PER_COMMITMENT + 2 * BYTES_PER_FIELD_ELEMENT);

    let mut hash_input: Vec<u8> = Vec::with_capacity(hash_input_size);
    hash_input.extend(DOMAIN_SEP.as_bytes());
    hash_input.extend((domain_size as u64).to_be_bytes());
    hash_input.extend((n as u64).to_be_bytes());
    for (((commitment, z), y), proof) in commitments.iter().zip(zs).zip(ys).zip(proofs) {
        hash_input.extend(commitment);
        hash_input.extend(z.to_bytes_be());
        hash_input.extend(y.to_bytes_be());
        hash_input.extend(proof);
    }
    assert_eq!(hash_input.len(), hash_input_size);

    // Reducing a 256 bit hash introduces a bias, which is negligible for a
    // randomizer that only needs 128 bits of entropy.
    let r = reduce_bytes_to_scalar_bias(Sha256::digest(&hash_input).into());
    bls12_381::powers_of(r, n)
}
