use std::time::Instant;

use blobkit_eip4844::{constants::FIELD_ELEMENTS_PER_BLOB, Context, TrustedSetup};
use bls12_381::{traits::*, Scalar};
use tracing_forest::{util::LevelFilter, ForestLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn main() {
    let trusted_setup = TrustedSetup::insecure_from_secret(b"example", FIELD_ELEMENTS_PER_BLOB);
    let ctx = Context::new(&trusted_setup).expect("setup covers a blob");

    let blobs = blob_codec::encode_payload(b"hello from the blob codec");
    let blob = &blobs[0];
    let z = Scalar::random(rand::thread_rng()).to_bytes_be();

    println!("Warming up for 3 seconds...");

    let start = Instant::now();
    while Instant::now().duration_since(start).as_secs() < 3 {
        ctx.compute_kzg_proof(blob, z)
            .expect("failed to compute kzg proof");
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    ctx.compute_kzg_proof(blob, z)
        .expect("failed to compute kzg proof (z out of domain)");
    ctx.compute_kzg_proof(blob, (-Scalar::ONE).to_bytes_be())
        .expect("failed to compute kzg proof (z within domain)");
    ctx.compute_blob_bundle(&[&**blob])
        .expect("failed to compute blob bundle");
}
