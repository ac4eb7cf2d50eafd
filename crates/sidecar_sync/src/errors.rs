use std::{io, time::Duration};

use thiserror::Error;

/// Failure to decode bytes received from, or destined for, the wire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed varint length prefix")]
    InvalidLengthPrefix,
    #[error("chunk of {length} bytes exceeds the maximum of {max} bytes")]
    ChunkTooLarge { length: u64, max: usize },
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("container of {length} bytes is shorter than its fixed part of {min} bytes")]
    TooShort { length: usize, min: usize },
    #[error("invalid ssz offset {offset}")]
    InvalidOffset { offset: usize },
    #[error("{length} bytes of blob data is not a whole number of blobs")]
    PartialBlob { length: usize },
    #[error("sidecar carries {count} blobs, at most {max} are allowed")]
    TooManyBlobs { count: usize, max: usize },
    #[error("error message of {length} bytes exceeds the maximum of {max} bytes")]
    ErrorMessageTooLong { length: u64, max: usize },
    #[error("invalid snappy frame: {reason}")]
    InvalidSnappy { reason: String },
}

/// Failure of a single retrieval call.
///
/// Transport errors keep the underlying `io::Error` untouched.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to open stream: {0}")]
    Open(#[source] io::Error),
    #[error("failed to send request: {0}")]
    Write(#[source] io::Error),
    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),
    #[error("peer responded with error code {code}: {message}")]
    Protocol { code: u8, message: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] DecodeError),
    #[error("timed out after {after:?} while {phase}")]
    Timeout { phase: &'static str, after: Duration },
    #[error("request was cancelled")]
    Cancelled,
}

impl RequestError {
    /// Returns true when the peer answered with a non-zero status code.
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}

/// Failure to turn an address into a dialable [`PeerTarget`](crate::PeerTarget).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("handshake with a deliberately wrong identity unexpectedly succeeded")]
    UnexpectedHandshakeSuccess,
    #[error("handshake failed: {0}")]
    Handshake(String),
}

/// Failure to load or validate a [`SyncConfig`](crate::SyncConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),
    #[error("could not parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
    #[error("max_chunk_size {found} is smaller than the minimum of {min} bytes")]
    ChunkSizeTooSmall { found: usize, min: usize },
}
