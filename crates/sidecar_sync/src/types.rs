//! Request and response containers and their SSZ encodings.

use serialization::{
    constants::{BYTES_PER_BLOB, BYTES_PER_PROOF},
    types::{Blob, KZGProof},
};

use crate::errors::DecodeError;

/// Most blobs a single sidecar may carry.
pub const MAX_BLOBS_PER_SIDECAR: usize = 16;

const BYTES_PER_ROOT: usize = 32;
const BYTES_PER_SLOT: usize = 8;
const BYTES_PER_OFFSET: usize = 4;

/// Size of the fixed part of an encoded [`Sidecar`]; also the offset of its blob list.
pub const SIDECAR_FIXED_SIZE: usize =
    BYTES_PER_ROOT + BYTES_PER_SLOT + BYTES_PER_OFFSET + BYTES_PER_PROOF;

/// Asks a peer for the sidecars of `count` consecutive slots starting at `start_slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobsSidecarsByRangeRequest {
    pub start_slot: u64,
    pub count: u64,
}

impl BlobsSidecarsByRangeRequest {
    pub const SSZ_SIZE: usize = 2 * BYTES_PER_SLOT;

    pub fn to_ssz_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SSZ_SIZE);
        bytes.extend_from_slice(&self.start_slot.to_le_bytes());
        bytes.extend_from_slice(&self.count.to_le_bytes());
        bytes
    }

    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != Self::SSZ_SIZE {
            return Err(DecodeError::InvalidLength {
                expected: Self::SSZ_SIZE,
                actual: bytes.len(),
            });
        }
        let (start_slot, count) = bytes.split_at(BYTES_PER_SLOT);
        Ok(Self {
            start_slot: read_u64(start_slot),
            count: read_u64(count),
        })
    }
}

/// The blobs of one beacon block together with their aggregated opening proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    pub beacon_block_root: [u8; BYTES_PER_ROOT],
    pub beacon_block_slot: u64,
    pub blobs: Vec<Blob>,
    pub kzg_aggregated_proof: KZGProof,
}

impl Sidecar {
    /// Length of the SSZ encoding of this sidecar.
    pub fn ssz_len(&self) -> usize {
        SIDECAR_FIXED_SIZE + self.blobs.len() * BYTES_PER_BLOB
    }

    pub fn to_ssz_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.ssz_len());
        bytes.extend_from_slice(&self.beacon_block_root);
        bytes.extend_from_slice(&self.beacon_block_slot.to_le_bytes());
        bytes.extend_from_slice(&(SIDECAR_FIXED_SIZE as u32).to_le_bytes());
        bytes.extend_from_slice(&self.kzg_aggregated_proof);
        for blob in &self.blobs {
            bytes.extend_from_slice(blob.as_slice());
        }
        bytes
    }

    pub fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < SIDECAR_FIXED_SIZE {
            return Err(DecodeError::TooShort {
                length: bytes.len(),
                min: SIDECAR_FIXED_SIZE,
            });
        }

        let (beacon_block_root, rest) = bytes.split_at(BYTES_PER_ROOT);
        let (slot, rest) = rest.split_at(BYTES_PER_SLOT);
        let (offset, rest) = rest.split_at(BYTES_PER_OFFSET);
        let (proof, blob_bytes) = rest.split_at(BYTES_PER_PROOF);

        let offset = read_u32(offset) as usize;
        if offset != SIDECAR_FIXED_SIZE {
            return Err(DecodeError::InvalidOffset { offset });
        }
        if blob_bytes.len() % BYTES_PER_BLOB != 0 {
            return Err(DecodeError::PartialBlob {
                length: blob_bytes.len(),
            });
        }
        let count = blob_bytes.len() / BYTES_PER_BLOB;
        if count > MAX_BLOBS_PER_SIDECAR {
            return Err(DecodeError::TooManyBlobs {
                count,
                max: MAX_BLOBS_PER_SIDECAR,
            });
        }

        let blobs = blob_bytes
            .chunks_exact(BYTES_PER_BLOB)
            .map(|chunk| {
                let mut blob = serialization::types::zeroed_blob();
                blob.copy_from_slice(chunk);
                blob
            })
            .collect();

        Ok(Self {
            beacon_block_root: copy_array(beacon_block_root),
            beacon_block_slot: read_u64(slot),
            blobs,
            kzg_aggregated_proof: copy_array(proof),
        })
    }
}

/// Encodes a list of sidecars as an SSZ list of variable-size items.
pub fn encode_sidecar_list(sidecars: &[Sidecar]) -> Vec<u8> {
    let header_len = sidecars.len() * BYTES_PER_OFFSET;
    let mut offsets = Vec::with_capacity(header_len);
    let mut items = Vec::new();
    for sidecar in sidecars {
        let offset = (header_len + items.len()) as u32;
        offsets.extend_from_slice(&offset.to_le_bytes());
        items.extend_from_slice(&sidecar.to_ssz_bytes());
    }
    offsets.extend_from_slice(&items);
    offsets
}

/// Decodes an SSZ list of sidecars. An empty input is an empty list.
pub fn decode_sidecar_list(bytes: &[u8]) -> Result<Vec<Sidecar>, DecodeError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    if bytes.len() < BYTES_PER_OFFSET {
        return Err(DecodeError::TooShort {
            length: bytes.len(),
            min: BYTES_PER_OFFSET,
        });
    }

    let first = read_u32(&bytes[..BYTES_PER_OFFSET]) as usize;
    if first == 0 || first % BYTES_PER_OFFSET != 0 || first > bytes.len() {
        return Err(DecodeError::InvalidOffset { offset: first });
    }

    let mut offsets: Vec<usize> = bytes[..first]
        .chunks_exact(BYTES_PER_OFFSET)
        .map(|chunk| read_u32(chunk) as usize)
        .collect();
    offsets.push(bytes.len());

    offsets
        .windows(2)
        .map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            if start > end || end > bytes.len() {
                return Err(DecodeError::InvalidOffset { offset: start });
            }
            Sidecar::from_ssz_bytes(&bytes[start..end])
        })
        .collect()
}

fn read_u64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(copy_array(bytes))
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(copy_array(bytes))
}

// Callers always pass a slice of exactly `N` bytes.
fn copy_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut array = [0u8; N];
    array.copy_from_slice(bytes);
    array
}
