//! Retrieval of blob sidecars from beacon peers.
//!
//! A call to [`SidecarClient::request_sidecars_by_range`] opens one stream to
//! the peer, writes a length-prefixed request and reads response frames until
//! the peer closes the stream. The stream is reset on every failure path,
//! including timeouts and cancellation.

mod client;
mod config;
mod encoding;
mod errors;
mod frame;
mod payload;
mod peer;
mod stream;
mod types;

pub use client::{SessionState, SidecarClient, SidecarSource, BLOBS_SIDECARS_BY_RANGE_TOPIC};
pub use config::{
    SyncConfig, TransportKind, DEFAULT_MAX_CHUNK_SIZE, DEFAULT_RESPONSE_TIMEOUT_MS,
    DEFAULT_TTFB_TIMEOUT_MS,
};
pub use encoding::SszSnappyEncoding;
pub use errors::{ConfigError, DecodeError, RequestError, ResolveError};
pub use frame::{
    write_error_chunk, write_success_chunk, CONTEXT_BYTES_LEN, INVALID_REQUEST_CODE,
    MAX_ERROR_MESSAGE_LEN, RESOURCE_UNAVAILABLE_CODE, SERVER_ERROR_CODE, SUCCESS_CODE,
};
pub use payload::first_blob_payload;
pub use peer::{
    remote_identity_from_error, resolve_target, HandshakeMismatchResolver, IdentityResolver,
    PeerIdentity, PeerTarget, SecureDialer, MISMATCH_IDENTITY,
};
pub use stream::{RpcStream, StreamOpener};
pub use types::{
    decode_sidecar_list, encode_sidecar_list, BlobsSidecarsByRangeRequest, Sidecar,
    MAX_BLOBS_PER_SIDECAR, SIDECAR_FIXED_SIZE,
};

// Re-exported so callers can build targets without a direct dependency.
pub use multiaddr::Multiaddr;
