pub mod constants;
mod errors;
pub mod types;

use bls12_381::{G1Point, G2Point, Scalar};
pub use errors::Error;

use crate::constants::{
    BYTES_PER_BLOB, BYTES_PER_FIELD_ELEMENT, BYTES_PER_G1_POINT, FIELD_ELEMENTS_PER_BLOB,
};

/// Interprets a blob as `FIELD_ELEMENTS_PER_BLOB` little-endian scalars.
///
/// Each 32 byte chunk must be canonical, i.e. less than the scalar modulus.
pub fn deserialize_blob_to_scalars(blob_bytes: &[u8]) -> Result<Vec<Scalar>, Error> {
    if blob_bytes.len() != BYTES_PER_BLOB {
        return Err(Error::BlobHasInvalidLength {
            length: blob_bytes.len(),
            bytes: blob_bytes.to_vec(),
        });
    }

    blob_bytes
        .chunks_exact(BYTES_PER_FIELD_ELEMENT)
        .map(|chunk| {
            let bytes32: &[u8; BYTES_PER_FIELD_ELEMENT] = chunk
                .try_into()
                .expect("chunks_exact yields BYTES_PER_FIELD_ELEMENT sized chunks");
            Option::from(Scalar::from_bytes_le(bytes32)).ok_or_else(|| {
                Error::CouldNotDeserializeScalar {
                    bytes: chunk.to_vec(),
                }
            })
        })
        .collect()
}

/// Inverse of [`deserialize_blob_to_scalars`].
pub fn serialize_scalars_to_blob(scalars: &[Scalar]) -> types::Blob {
    assert_eq!(scalars.len(), FIELD_ELEMENTS_PER_BLOB);

    let mut blob = types::zeroed_blob();
    for (chunk, scalar) in blob
        .chunks_exact_mut(BYTES_PER_FIELD_ELEMENT)
        .zip(scalars)
    {
        chunk.copy_from_slice(&scalar.to_bytes_le());
    }
    blob
}

/// Deserializes a canonical big-endian scalar, as used for opening points
/// and evaluations.
pub fn deserialize_bytes_to_scalar(scalar_bytes: &[u8]) -> Result<Scalar, Error> {
    let Ok(bytes32) = <&[u8; BYTES_PER_FIELD_ELEMENT]>::try_from(scalar_bytes) else {
        return Err(Error::ScalarHasInvalidLength {
            length: scalar_bytes.len(),
            bytes: scalar_bytes.to_vec(),
        });
    };

    Option::from(Scalar::from_bytes_be(bytes32)).ok_or_else(|| Error::CouldNotDeserializeScalar {
        bytes: scalar_bytes.to_vec(),
    })
}

pub fn serialize_scalar(scalar: &Scalar) -> types::SerializedScalar {
    scalar.to_bytes_be()
}

pub fn deserialize_compressed_g1(point_bytes: &[u8]) -> Result<G1Point, Error> {
    let Ok(point_bytes) = <&[u8; BYTES_PER_G1_POINT]>::try_from(point_bytes) else {
        return Err(Error::G1PointHasInvalidLength {
            length: point_bytes.len(),
            bytes: point_bytes.to_vec(),
        });
    };

    Option::from(G1Point::from_compressed(point_bytes)).ok_or_else(|| {
        Error::CouldNotDeserializeG1Point {
            bytes: point_bytes.to_vec(),
        }
    })
}

pub fn serialize_g1_compressed(point: &G1Point) -> [u8; BYTES_PER_G1_POINT] {
    point.to_compressed()
}

pub fn deserialize_compressed_g2(point_bytes: &[u8]) -> Result<G2Point, Error> {
    let Ok(point_bytes) = <&[u8; 96]>::try_from(point_bytes) else {
        return Err(Error::G2PointHasInvalidLength {
            length: point_bytes.len(),
            bytes: point_bytes.to_vec(),
        });
    };

    Option::from(G2Point::from_compressed(point_bytes)).ok_or_else(|| {
        Error::CouldNotDeserializeG2Point {
            bytes: point_bytes.to_vec(),
        }
    })
}
