mod errors;
mod fiat_shamir;
mod prover;
mod verifier;
mod versioned_hash;

/// Re-exported types
pub use errors::{Error, SerializationError, TrustedSetupError, VerifierError};
pub use prover::BlobBundle;
pub use serialization::{constants, types::*};
pub use trusted_setup::TrustedSetup;
pub use versioned_hash::versioned_hash;

/// A 32 byte big-endian scalar at which a polynomial is opened.
pub type KZGOpeningPoint = SerializedScalar;

/// A 32 byte big-endian scalar claimed as the value of a polynomial at a point.
pub type KZGOpeningEvaluation = SerializedScalar;

#[rustfmt::skip]
// Note: adding rustfmt::skip so that `cargo fmt` does not mix the
// public re-exported types with the following private imports.
use kzg_single_open::{Prover, VerificationKey, Verifier};
use serialization::constants::FIELD_ELEMENTS_PER_BLOB;

/// Holds everything derived from the trusted setup.
///
/// Building a `Context` is expensive (the Lagrange basis is computed with
/// an FFT over G1), so build it once and share it; it is `Send + Sync`.
#[derive(Debug)]
pub struct Context {
    prover: Prover,
    verifier: Verifier,
}

impl Context {
    pub fn new(trusted_setup: &TrustedSetup) -> Result<Self, Error> {
        let [g2_gen, tau_g2, ..] = trusted_setup.g2_monomial[..] else {
            return Err(Error::TrustedSetup(TrustedSetupError::NotEnoughG2Points {
                found: trusted_setup.g2_monomial.len(),
            }));
        };

        let g1_points = trusted_setup.g1_monomial.len();
        if g1_points < FIELD_ELEMENTS_PER_BLOB {
            return Err(Error::TrustedSetupTooSmall {
                g1_points,
                required: FIELD_ELEMENTS_PER_BLOB,
            });
        }

        let g1_monomial = trusted_setup.g1_monomial[..FIELD_ELEMENTS_PER_BLOB].to_vec();
        let verification_key = VerificationKey::new(
            trusted_setup.g1_monomial[0],
            g2_gen,
            tau_g2,
        );

        Ok(Self {
            prover: Prover::new(FIELD_ELEMENTS_PER_BLOB, g1_monomial),
            verifier: Verifier::new(verification_key),
        })
    }

    /// Loads the trusted setup JSON file at `path` and builds a context from it.
    pub fn from_trusted_setup_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let trusted_setup = TrustedSetup::from_json_file(path)?;
        Self::new(&trusted_setup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_short_setup() {
        let setup = TrustedSetup::insecure_from_secret(b"short", 16);
        assert!(matches!(
            Context::new(&setup),
            Err(Error::TrustedSetupTooSmall {
                g1_points: 16,
                required: FIELD_ELEMENTS_PER_BLOB
            })
        ));
    }

    #[test]
    fn context_rejects_setup_without_g2_points() {
        let setup = TrustedSetup {
            g2_monomial: Vec::new(),
            ..TrustedSetup::insecure_from_secret(b"short", 16)
        };
        assert!(matches!(
            Context::new(&setup),
            Err(Error::TrustedSetup(TrustedSetupError::NotEnoughG2Points { found: 0 }))
        ));
    }

    #[test]
    fn context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }

    #[test]
    fn error_classification() {
        assert!(Error::from(VerifierError::InvalidProof).is_invalid_proof());
        assert!(!Error::TrustedSetupTooSmall {
            g1_points: 0,
            required: 1
        }
        .is_invalid_proof());
    }
}
