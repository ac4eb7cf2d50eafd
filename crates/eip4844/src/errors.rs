pub use kzg_single_open::VerifierError;
pub use serialization::Error as SerializationError;
pub use trusted_setup::Error as TrustedSetupError;

/// Top-level error type for commitment, proof and verification operations.
#[derive(Debug)]
pub enum Error {
    /// Error encountered during verification of a proof.
    Verifier(VerifierError),
    /// Error encountered while (de)serializing blobs, scalars, or group elements.
    Serialization(SerializationError),
    /// The trusted setup could not be loaded.
    TrustedSetup(TrustedSetupError),
    /// The trusted setup has fewer G1 points than a blob has field elements.
    TrustedSetupTooSmall { g1_points: usize, required: usize },
}

impl Error {
    /// Returns true if the inputs were well-formed but the proof did not verify.
    pub const fn is_invalid_proof(&self) -> bool {
        matches!(self, Self::Verifier(VerifierError::InvalidProof))
    }
}

impl From<VerifierError> for Error {
    fn from(value: VerifierError) -> Self {
        Self::Verifier(value)
    }
}

impl From<SerializationError> for Error {
    fn from(value: SerializationError) -> Self {
        Self::Serialization(value)
    }
}

impl From<TrustedSetupError> for Error {
    fn from(value: TrustedSetupError) -> Self {
        Self::TrustedSetup(value)
    }
}
