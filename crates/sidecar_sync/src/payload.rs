use blob_codec::decode_blobs;

use crate::types::Sidecar;

/// Decodes the payload packed into the blobs of the first sidecar that has any.
pub fn first_blob_payload(sidecars: &[Sidecar]) -> Option<Vec<u8>> {
    sidecars
        .iter()
        .find(|sidecar| !sidecar.blobs.is_empty())
        .map(|sidecar| decode_blobs(sidecar.blobs.iter().map(|blob| &**blob)))
}

#[cfg(test)]
mod tests {
    use blob_codec::encode_payload;

    use super::*;

    fn sidecar(slot: u64, payload: Option<&[u8]>) -> Sidecar {
        Sidecar {
            beacon_block_root: [0; 32],
            beacon_block_slot: slot,
            blobs: payload.map(encode_payload).unwrap_or_default(),
            kzg_aggregated_proof: [0; 48],
        }
    }

    #[test]
    fn skips_sidecars_without_blobs() {
        let sidecars = [
            sidecar(1, None),
            sidecar(2, Some(&b"EKANS"[..])),
            sidecar(3, Some(&b"later"[..])),
        ];
        assert_eq!(first_blob_payload(&sidecars), Some(b"EKANS".to_vec()));
    }

    #[test]
    fn none_without_blobs() {
        assert_eq!(first_blob_payload(&[]), None);
        assert_eq!(first_blob_payload(&[sidecar(1, None)]), None);
    }
}
