use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{errors::ConfigError, types::SIDECAR_FIXED_SIZE};

/// Default upper bound on a single length-prefixed payload.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 10 << 20;
/// Default deadline for the first byte of a response.
pub const DEFAULT_TTFB_TIMEOUT_MS: u64 = 15_000;
/// Default deadline for every later read.
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 10_000;

/// How responses are framed on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportKind {
    /// One frame per sidecar until the responder closes the stream.
    StreamedFrames {
        /// Whether a 4-byte context precedes every successful payload.
        #[serde(default)]
        context_bytes: bool,
    },
    /// A single frame whose payload is the whole list of sidecars.
    SingleShotCall,
}

impl Default for TransportKind {
    fn default() -> Self {
        Self::StreamedFrames {
            context_bytes: false,
        }
    }
}

/// Settings for the retrieval client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Upper bound on the uncompressed length of one payload.
    pub max_chunk_size: usize,
    /// Deadline for the status byte of the first frame only.
    ///
    /// Once a frame has arrived the peer has started serving the request,
    /// so the status of every later frame is bounded by
    /// `response_timeout_ms` instead. A peer still working through the
    /// range between frames is then held to the shorter per-read deadline.
    pub ttfb_timeout_ms: u64,
    /// Deadline for each read after the first status byte, and for sending
    /// the request.
    pub response_timeout_ms: u64,
    /// Overall deadline for one retrieval call; unbounded when absent.
    pub request_timeout_ms: Option<u64>,
    pub transport: TransportKind,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            ttfb_timeout_ms: DEFAULT_TTFB_TIMEOUT_MS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            request_timeout_ms: None,
            transport: TransportKind::default(),
        }
    }
}

impl SyncConfig {
    /// Parses and validates a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttfb_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "ttfb_timeout_ms",
            });
        }
        if self.response_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "response_timeout_ms",
            });
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout {
                field: "request_timeout_ms",
            });
        }
        if self.max_chunk_size < SIDECAR_FIXED_SIZE {
            return Err(ConfigError::ChunkSizeTooSmall {
                found: self.max_chunk_size,
                min: SIDECAR_FIXED_SIZE,
            });
        }
        Ok(())
    }

    pub const fn ttfb_timeout(&self) -> Duration {
        Duration::from_millis(self.ttfb_timeout_ms)
    }

    pub const fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SyncConfig::from_json("{}").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.max_chunk_size, 10 * 1024 * 1024);
        assert_eq!(config.ttfb_timeout(), Duration::from_secs(15));
        assert_eq!(config.response_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn parses_transport_variants() {
        let config = SyncConfig::from_json(
            r#"{"transport": {"kind": "streamed_frames", "context_bytes": true}, "request_timeout_ms": 500}"#,
        )
        .unwrap();
        assert_eq!(
            config.transport,
            TransportKind::StreamedFrames {
                context_bytes: true
            }
        );
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(500)));

        let config = SyncConfig::from_json(r#"{"transport": {"kind": "single_shot_call"}}"#).unwrap();
        assert_eq!(config.transport, TransportKind::SingleShotCall);
    }

    #[test]
    fn serializes_back_to_equal_config() {
        let config = SyncConfig {
            transport: TransportKind::SingleShotCall,
            ..SyncConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SyncConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            SyncConfig::from_json(r#"{"ttfb_timeout_ms": 0}"#),
            Err(ConfigError::ZeroTimeout {
                field: "ttfb_timeout_ms"
            })
        ));
        assert!(matches!(
            SyncConfig::from_json(r#"{"request_timeout_ms": 0}"#),
            Err(ConfigError::ZeroTimeout {
                field: "request_timeout_ms"
            })
        ));
        assert!(matches!(
            SyncConfig::from_json(r#"{"max_chunk_size": 16}"#),
            Err(ConfigError::ChunkSizeTooSmall { found: 16, .. })
        ));
        assert!(matches!(
            SyncConfig::from_json(r#"{"unknown": 1}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            SyncConfig::from_json_file("/nonexistent/blobkit/sync.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
