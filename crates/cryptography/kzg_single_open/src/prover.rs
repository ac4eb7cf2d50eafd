use bls12_381::{g1_batch_normalize, lincomb::g1_lincomb, traits::*, G1Point, G1Projective, Scalar};
use polynomial::{domain::Domain, poly_coeff::PolyCoeff};

/// Commitment key holding the powers of the secret in both bases.
#[derive(Debug, Clone)]
pub struct CommitKey {
    /// `[τ^0 G₁, τ^1 G₁, ..., τ^(n-1) G₁]`
    pub g1_monomial: Vec<G1Point>,
    /// `[L_0(τ) G₁, ..., L_(n-1)(τ) G₁]` where `L_i` is the Lagrange basis
    /// polynomial that is one at `ω^i` and zero on the rest of the domain.
    pub g1_lagrange: Vec<G1Point>,
}

impl CommitKey {
    /// Derives the Lagrange form of the key from its monomial form.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer monomial points than domain elements.
    pub fn from_monomial(g1_monomial: Vec<G1Point>, domain: &Domain) -> Self {
        assert!(
            g1_monomial.len() >= domain.size(),
            "commit key has {} points but the domain has {} elements",
            g1_monomial.len(),
            domain.size()
        );

        let projective: Vec<G1Projective> = g1_monomial[..domain.size()]
            .iter()
            .map(G1Projective::from)
            .collect();
        let g1_lagrange = g1_batch_normalize(&domain.ifft_g1(projective));

        Self {
            g1_monomial,
            g1_lagrange,
        }
    }

    /// Commits to a polynomial given by its evaluations over the domain.
    pub fn commit_lagrange(&self, evaluations: &[Scalar]) -> G1Point {
        assert_eq!(evaluations.len(), self.g1_lagrange.len());
        g1_lincomb(&self.g1_lagrange, evaluations)
            .expect("evaluations.len() == g1_lagrange.len()")
            .to_affine()
    }

    /// Commits to a polynomial in monomial form.
    pub fn commit_monomial(&self, polynomial: &PolyCoeff) -> G1Point {
        assert!(polynomial.len() <= self.g1_monomial.len());
        g1_lincomb(&self.g1_monomial[..polynomial.len()], polynomial)
            .expect("polynomial fits in the commit key")
            .to_affine()
    }
}

/// Produces commitments and single-point opening proofs.
#[derive(Debug, Clone)]
pub struct Prover {
    pub domain: Domain,
    pub commit_key: CommitKey,
}

impl Prover {
    pub fn new(domain_size: usize, g1_monomial: Vec<G1Point>) -> Self {
        let domain = Domain::new(domain_size);
        let commit_key = CommitKey::from_monomial(g1_monomial, &domain);
        Self { domain, commit_key }
    }

    /// Commits to the polynomial whose evaluations over the domain are given.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn commit(&self, evaluations: &[Scalar]) -> G1Point {
        self.commit_key.commit_lagrange(evaluations)
    }

    /// Computes a proof that the polynomial with the given evaluations
    /// takes the value `y` at `z`, returning `(proof, y)`.
    ///
    /// The proof is a commitment to `q(X) = (p(X) - y) / (X - z)`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn compute_opening_proof(&self, evaluations: &[Scalar], z: Scalar) -> (G1Point, Scalar) {
        let mut polynomial = self.domain.ifft_scalars(evaluations.to_vec());
        let y = polynomial.eval(&z);

        // p(X) - y vanishes at z, so (X - z) divides it exactly.
        if let Some(constant) = polynomial.first_mut() {
            *constant -= y;
        }
        let (quotient, remainder) = polynomial.divide_by_linear(z);
        assert!(
            bool::from(remainder.is_zero()),
            "p(X) - p(z) must be divisible by X - z"
        );

        (self.commit_key.commit_monomial(&quotient), y)
    }
}
