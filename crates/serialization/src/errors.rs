/// Errors that can occur during deserialization of untrusted input from the public API
/// or the trusted setup.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The bytes are not the canonical encoding of a scalar.
    CouldNotDeserializeScalar { bytes: Vec<u8> },
    /// The bytes are not a valid compressed G1 point.
    CouldNotDeserializeG1Point { bytes: Vec<u8> },
    /// The bytes are not a valid compressed G2 point.
    CouldNotDeserializeG2Point { bytes: Vec<u8> },
    ScalarHasInvalidLength { bytes: Vec<u8>, length: usize },
    BlobHasInvalidLength { bytes: Vec<u8>, length: usize },
    G1PointHasInvalidLength { bytes: Vec<u8>, length: usize },
    G2PointHasInvalidLength { bytes: Vec<u8>, length: usize },
}
