// Note: "field element" always refers to an element of the scalar field.

/// The number of bytes needed to represent a field element.
pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

/// The number of bytes of a field element that can carry payload data.
///
/// The most significant byte is kept at zero so that any payload chunk
/// maps to a canonical field element.
pub const USABLE_BYTES_PER_FIELD_ELEMENT: usize = BYTES_PER_FIELD_ELEMENT - 1;

/// The number of field elements needed to represent a blob.
///
/// See: https://github.com/ethereum/EIPs/blob/master/EIPS/eip-4844.md
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

/// The number of bytes needed to represent a blob.
pub const BYTES_PER_BLOB: usize = FIELD_ELEMENTS_PER_BLOB * BYTES_PER_FIELD_ELEMENT;

/// The number of payload bytes a single blob can carry.
pub const USABLE_BYTES_PER_BLOB: usize = FIELD_ELEMENTS_PER_BLOB * USABLE_BYTES_PER_FIELD_ELEMENT;

/// The number of bytes needed to represent a compressed G1 element.
pub const BYTES_PER_G1_POINT: usize = 48;

/// Commitments and proofs are both compressed G1 elements.
pub const BYTES_PER_COMMITMENT: usize = BYTES_PER_G1_POINT;
pub const BYTES_PER_PROOF: usize = BYTES_PER_G1_POINT;

/// The number of bytes of a versioned hash.
pub const BYTES_PER_VERSIONED_HASH: usize = 32;

/// Version byte placed in front of commitment hashes.
pub const VERSIONED_HASH_VERSION_KZG: u8 = 0x01;
