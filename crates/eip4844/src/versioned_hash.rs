use sha2::{Digest, Sha256};

use crate::{constants::VERSIONED_HASH_VERSION_KZG, KZGCommitment, VersionedHash};

/// Computes the hash that references a blob commitment from a transaction:
/// `sha256(commitment)` with the first byte replaced by the version.
pub fn versioned_hash(commitment: &KZGCommitment) -> VersionedHash {
    let mut hash: VersionedHash = Sha256::digest(commitment).into();
    hash[0] = VERSIONED_HASH_VERSION_KZG;
    hash
}
