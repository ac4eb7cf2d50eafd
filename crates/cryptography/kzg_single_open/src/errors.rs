/// Errors that can occur when checking opening proofs.
#[derive(Debug, PartialEq, Eq)]
pub enum VerifierError {
    /// The pairing check failed.
    InvalidProof,
    /// Inputs to batch verification did not have consistent lengths.
    BatchVerificationInputsMustHaveSameLength {
        commitments_len: usize,
        points_len: usize,
        evaluations_len: usize,
        proofs_len: usize,
    },
    /// Polynomials and their commitments were not paired up one to one.
    PolynomialCommitmentCountMismatch {
        polynomials_len: usize,
        commitments_len: usize,
    },
}
