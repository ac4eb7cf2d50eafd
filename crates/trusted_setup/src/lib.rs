//! Loading (and, for devnets, generating) the powers-of-tau reference
//! string used for KZG commitments.

use std::path::Path;

use bls12_381::{
    g1_batch_normalize, traits::*, G1Point, G1Projective, G2Point, G2Projective, Scalar,
};
use serde::{Deserialize, Serialize};
use serialization::{deserialize_compressed_g1, deserialize_compressed_g2};

/// Errors that can occur while loading a trusted setup.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Points must be `0x` prefixed hex strings.
    MissingHexPrefix { point: String },
    InvalidHex { point: String, error: hex::FromHexError },
    InvalidPoint(serialization::Error),
    /// A setup needs at least `[G₂, τG₂]` to verify opening proofs.
    NotEnoughG2Points { found: usize },
    EmptyG1Points,
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serialization::Error> for Error {
    fn from(value: serialization::Error) -> Self {
        Self::InvalidPoint(value)
    }
}

/// The on-disk format of the Ethereum trusted setup.
///
/// The file being used on mainnet is located here: https://github.com/ethereum/consensus-specs/blob/389b2ddfb954731da7ccf4c0ef89fab2d4575b99/presets/mainnet/trusted_setups/trusted_setup_4096.json
///
/// ```text
/// {
///   "g1_monomial": ["0x97f1d3a7...", ...],
///   "g1_lagrange": ["0xa0413c0d...", ...],
///   "g2_monomial": ["0x93e02b60...", ...]
/// }
/// ```
///
/// `g1_lagrange` is accepted but ignored; it is re-derived from `g1_monomial`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
struct TrustedSetupJson {
    g1_monomial: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    g1_lagrange: Vec<String>,
    g2_monomial: Vec<String>,
}

/// A parsed and subgroup-checked trusted setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedSetup {
    /// `[τ^i]G₁` for `i` in `0..n`
    pub g1_monomial: Vec<G1Point>,
    /// `[τ^i]G₂`; only the first two are used
    pub g2_monomial: Vec<G2Point>,
}

impl TrustedSetup {
    /// Parses a JSON string in the format used by the Ethereum trusted setup.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: TrustedSetupJson = serde_json::from_str(json)?;

        let g1_monomial = raw
            .g1_monomial
            .iter()
            .map(|point| {
                decode_hex_point(point)
                    .and_then(|bytes| deserialize_compressed_g1(&bytes).map_err(Error::from))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let g2_monomial = raw
            .g2_monomial
            .iter()
            .map(|point| {
                decode_hex_point(point)
                    .and_then(|bytes| deserialize_compressed_g2(&bytes).map_err(Error::from))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(g1_monomial, g2_monomial)
    }

    /// Reads and parses a trusted setup file.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn new(g1_monomial: Vec<G1Point>, g2_monomial: Vec<G2Point>) -> Result<Self, Error> {
        if g1_monomial.is_empty() {
            return Err(Error::EmptyG1Points);
        }
        if g2_monomial.len() < 2 {
            return Err(Error::NotEnoughG2Points {
                found: g2_monomial.len(),
            });
        }
        Ok(Self {
            g1_monomial,
            g2_monomial,
        })
    }

    /// Generates a setup from a publicly known secret.
    ///
    /// Anyone who knows `secret` can forge opening proofs, so this is only
    /// suitable for tests and throwaway devnets.
    pub fn insecure_from_secret(secret: &[u8], num_g1_points: usize) -> Self {
        let mut bytes = [0u8; 32];
        let len = secret.len().min(32);
        bytes[32 - len..].copy_from_slice(&secret[..len]);
        let tau = bls12_381::reduce_bytes_to_scalar_bias(bytes);

        let g1_projective: Vec<G1Projective> = bls12_381::powers_of(tau, num_g1_points.max(1))
            .into_iter()
            .map(|power| G1Projective::generator() * power)
            .collect();
        let g2_monomial = [Scalar::ONE, tau]
            .into_iter()
            .map(|power| (G2Projective::generator() * power).to_affine())
            .collect();

        Self {
            g1_monomial: g1_batch_normalize(&g1_projective),
            g2_monomial,
        }
    }

    /// Serializes the setup in the same JSON format [`TrustedSetup::from_json`] reads.
    pub fn to_json(&self) -> Result<String, Error> {
        let raw = TrustedSetupJson {
            g1_monomial: self
                .g1_monomial
                .iter()
                .map(|point| format!("0x{}", hex::encode(point.to_compressed())))
                .collect(),
            g1_lagrange: Vec::new(),
            g2_monomial: self
                .g2_monomial
                .iter()
                .map(|point| format!("0x{}", hex::encode(point.to_compressed())))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }
}

fn decode_hex_point(point: &str) -> Result<Vec<u8>, Error> {
    let Some(without_prefix) = point.strip_prefix("0x") else {
        return Err(Error::MissingHexPrefix {
            point: point.to_owned(),
        });
    };
    hex::decode(without_prefix).map_err(|error| Error::InvalidHex {
        point: point.to_owned(),
        error,
    })
}
