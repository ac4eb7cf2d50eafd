//! Packs byte payloads into blobs and unpacks them again.
//!
//! Every field element carries 31 payload bytes in its low bytes
//! (`[0..31]`); byte 31, the most significant byte of the little-endian
//! scalar, stays zero so the element is always canonical.
//!
//! Decoding strips every trailing `0x00` byte from the result. Payloads
//! that genuinely end in zero bytes therefore do not round-trip; this
//! matches what the rest of the network expects and is kept on purpose.

use serialization::{
    constants::{
        BYTES_PER_BLOB, BYTES_PER_FIELD_ELEMENT, FIELD_ELEMENTS_PER_BLOB, USABLE_BYTES_PER_BLOB,
        USABLE_BYTES_PER_FIELD_ELEMENT,
    },
    types::{zeroed_blob, Blob},
};

/// Returns the number of blobs [`encode_payload`] produces for a payload of
/// `payload_len` bytes. Never zero.
pub const fn blobs_needed(payload_len: usize) -> usize {
    if payload_len == 0 {
        1
    } else {
        payload_len.div_ceil(USABLE_BYTES_PER_BLOB)
    }
}

/// Packs `payload` into as many blobs as needed.
///
/// An empty payload still produces one all-zero blob.
pub fn encode_payload(payload: &[u8]) -> Vec<Blob> {
    let mut blobs: Vec<Blob> = (0..blobs_needed(payload.len()))
        .map(|_| zeroed_blob())
        .collect();

    for (index, group) in payload.chunks(USABLE_BYTES_PER_FIELD_ELEMENT).enumerate() {
        let blob = &mut blobs[index / FIELD_ELEMENTS_PER_BLOB];
        let start = (index % FIELD_ELEMENTS_PER_BLOB) * BYTES_PER_FIELD_ELEMENT;
        blob[start..start + group.len()].copy_from_slice(group);
    }

    blobs
}

/// Unpacks the payload carried by a sequence of blobs, in order.
pub fn decode_blobs<'a, I>(blobs: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a [u8; BYTES_PER_BLOB]>,
{
    let mut payload = Vec::new();
    for blob in blobs {
        extend_with_usable_bytes(&mut payload, blob.as_slice());
    }
    trim_trailing_zeros(payload)
}

/// Unpacks the payload carried by the raw bytes of a single blob.
///
/// The input does not need to be a full blob; a short final element
/// contributes at most its first 31 bytes.
pub fn decode_blob_bytes(raw: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(raw.len());
    extend_with_usable_bytes(&mut payload, raw);
    trim_trailing_zeros(payload)
}

fn extend_with_usable_bytes(payload: &mut Vec<u8>, raw: &[u8]) {
    for element in raw.chunks(BYTES_PER_FIELD_ELEMENT) {
        let usable = element.len().min(USABLE_BYTES_PER_FIELD_ELEMENT);
        payload.extend_from_slice(&element[..usable]);
    }
}

/// Drops every trailing `0x00` byte.
pub fn trim_trailing_zeros(mut payload: Vec<u8>) -> Vec<u8> {
    let keep = payload
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |last| last + 1);
    payload.truncate(keep);
    payload
}
