use crate::constants::{
    BYTES_PER_BLOB, BYTES_PER_COMMITMENT, BYTES_PER_FIELD_ELEMENT, BYTES_PER_PROOF,
    BYTES_PER_VERSIONED_HASH,
};

/// An owned blob.
///
/// Note: Blobs are 128KiB, so they live on the heap.
pub type Blob = Box<[u8; BYTES_PER_BLOB]>;

/// `BlobRef` denotes a reference to an opaque blob.
pub type BlobRef<'a> = &'a [u8; BYTES_PER_BLOB];

/// `Bytes48Ref` denotes a reference to an untrusted 48 byte value. This will
/// be either a purported `KZGProof` or a purported `KZGCommitment`.
pub type Bytes48Ref<'a> = &'a [u8; 48];

/// `KZGCommitment` denotes a 48 byte commitment to a polynomial f(x)
/// that we would like to make and verify opening proofs about.
pub type KZGCommitment = [u8; BYTES_PER_COMMITMENT];

/// `KZGProof` denotes a 48 byte proof that a committed polynomial
/// evaluates to a claimed value at a claimed point.
pub type KZGProof = [u8; BYTES_PER_PROOF];

/// `SerializedScalar` denotes a 32 byte field element.
pub type SerializedScalar = [u8; BYTES_PER_FIELD_ELEMENT];

/// Hash binding a commitment to a transaction.
pub type VersionedHash = [u8; BYTES_PER_VERSIONED_HASH];

/// Allocates an all-zero blob directly on the heap.
pub fn zeroed_blob() -> Blob {
    vec![0u8; BYTES_PER_BLOB]
        .into_boxed_slice()
        .try_into()
        .expect("vector has exactly BYTES_PER_BLOB elements")
}
