#![allow(dead_code)]

use std::sync::OnceLock;

use blobkit_eip4844::{
    constants::FIELD_ELEMENTS_PER_BLOB, Blob, Context, KZGOpeningPoint, TrustedSetup,
};
use bls12_381::{traits::*, Scalar};
use rand::Rng;

/// A context built from an insecure setup. Building one is slow, so all
/// tests in a binary share it.
pub fn context() -> &'static Context {
    static CONTEXT: OnceLock<Context> = OnceLock::new();
    CONTEXT.get_or_init(|| {
        let setup = TrustedSetup::insecure_from_secret(b"blobkit tests", FIELD_ELEMENTS_PER_BLOB);
        Context::new(&setup).expect("setup has enough points")
    })
}

pub fn random_blob(rng: &mut impl Rng) -> Blob {
    let scalars: Vec<Scalar> = (0..FIELD_ELEMENTS_PER_BLOB)
        .map(|_| Scalar::random(&mut *rng))
        .collect();
    serialization::serialize_scalars_to_blob(&scalars)
}

pub fn random_point(rng: &mut impl Rng) -> KZGOpeningPoint {
    Scalar::random(&mut *rng).to_bytes_be()
}
