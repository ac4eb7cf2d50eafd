//! Retrieval of blob sidecars from a single peer.

use std::{future::Future, io, pin::pin, time::Duration};

use async_trait::async_trait;
use futures::{
    future::{select, Either},
    AsyncWriteExt,
};
use tracing::{debug, info, warn};

use crate::{
    config::{SyncConfig, TransportKind},
    encoding::SszSnappyEncoding,
    errors::{ConfigError, RequestError},
    frame::{read_context_bytes, read_error_message, read_status, SUCCESS_CODE},
    peer::PeerTarget,
    stream::{StreamGuard, StreamOpener},
    types::{decode_sidecar_list, BlobsSidecarsByRangeRequest, Sidecar},
};

/// Protocol topic for sidecar range requests, without the encoding suffix.
pub const BLOBS_SIDECARS_BY_RANGE_TOPIC: &str = "/eth2/beacon_chain/req/blobs_sidecars_by_range/1";

/// Anything that can answer a sidecar range request for a peer.
#[async_trait]
pub trait SidecarSource: Send + Sync {
    async fn sidecars_by_range(
        &self,
        target: &PeerTarget,
        request: BlobsSidecarsByRangeRequest,
    ) -> Result<Vec<Sidecar>, RequestError>;
}

/// Progress of a single retrieval call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    StreamOpened,
    RequestSent,
    AwaitingFrame,
    FrameStatusRead,
    FrameBodyRead,
    Complete,
    Failed,
}

struct Session<'a> {
    target: &'a PeerTarget,
    state: SessionState,
}

impl<'a> Session<'a> {
    const fn new(target: &'a PeerTarget) -> Self {
        Self {
            target,
            state: SessionState::Idle,
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug!(peer = %self.target, from = ?self.state, to = ?next, "sidecar session transition");
        self.state = next;
    }
}

/// Requests sidecars over streams obtained from `O`.
///
/// Each call opens its own stream and owns it until the call ends, so
/// independent calls may run concurrently.
pub struct SidecarClient<O> {
    opener: O,
    config: SyncConfig,
    encoding: SszSnappyEncoding,
    protocol: String,
}

impl<O: StreamOpener> SidecarClient<O> {
    pub fn new(opener: O, config: SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let encoding = SszSnappyEncoding::new(config.max_chunk_size);
        let protocol = format!(
            "{BLOBS_SIDECARS_BY_RANGE_TOPIC}{}",
            encoding.protocol_suffix()
        );
        Ok(Self {
            opener,
            config,
            encoding,
            protocol,
        })
    }

    pub const fn opener(&self) -> &O {
        &self.opener
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Full protocol id, including the encoding suffix.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Fetches the sidecars for `request` from `target`, in the order the peer sent them.
    ///
    /// Nothing is returned on failure, even if some sidecars were already decoded.
    pub async fn request_sidecars_by_range(
        &self,
        target: &PeerTarget,
        request: BlobsSidecarsByRangeRequest,
    ) -> Result<Vec<Sidecar>, RequestError> {
        match self.config.request_timeout() {
            Some(deadline) => {
                within(deadline, "waiting for the full response", self.run(target, request)).await
            }
            None => self.run(target, request).await,
        }
    }

    /// Like [`request_sidecars_by_range`](Self::request_sidecars_by_range), but gives up
    /// with [`RequestError::Cancelled`] as soon as `cancel` completes.
    pub async fn request_sidecars_by_range_until<C: Future>(
        &self,
        target: &PeerTarget,
        request: BlobsSidecarsByRangeRequest,
        cancel: C,
    ) -> Result<Vec<Sidecar>, RequestError> {
        let call = pin!(self.request_sidecars_by_range(target, request));
        let cancel = pin!(cancel);
        match select(call, cancel).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                debug!(peer = %target, "sidecar request cancelled");
                Err(RequestError::Cancelled)
            }
        }
    }

    async fn run(
        &self,
        target: &PeerTarget,
        request: BlobsSidecarsByRangeRequest,
    ) -> Result<Vec<Sidecar>, RequestError> {
        let mut session = Session::new(target);
        let result = self.exchange(&mut session, request).await;
        match &result {
            Ok(sidecars) => {
                session.advance(SessionState::Complete);
                info!(
                    peer = %target,
                    start_slot = request.start_slot,
                    count = sidecars.len(),
                    "received blob sidecars"
                );
            }
            Err(err) => {
                session.advance(SessionState::Failed);
                debug!(peer = %target, error = %err, "sidecar request failed");
            }
        }
        result
    }

    async fn exchange(
        &self,
        session: &mut Session<'_>,
        request: BlobsSidecarsByRangeRequest,
    ) -> Result<Vec<Sidecar>, RequestError> {
        let stream = self
            .opener
            .open_stream(session.target, &self.protocol)
            .await
            .map_err(RequestError::Open)?;
        let mut stream = StreamGuard::new(stream);
        session.advance(SessionState::StreamOpened);

        let payload = self
            .encoding
            .encode(&request.to_ssz_bytes())
            .map_err(RequestError::Write)?;
        within(self.config.response_timeout(), "sending the request", async {
            stream.write_all(&payload).await.map_err(RequestError::Write)?;
            stream.close().await.map_err(RequestError::Write)
        })
        .await?;
        session.advance(SessionState::RequestSent);

        let sidecars = match self.config.transport {
            TransportKind::StreamedFrames { context_bytes } => {
                self.read_frames(&mut *stream, session, context_bytes).await?
            }
            TransportKind::SingleShotCall => self.read_single_frame(&mut *stream, session).await?,
        };

        stream.release();
        Ok(sidecars)
    }

    /// Reads one sidecar per frame until the peer closes the stream.
    async fn read_frames(
        &self,
        stream: &mut O::Stream,
        session: &mut Session<'_>,
        context_bytes: bool,
    ) -> Result<Vec<Sidecar>, RequestError> {
        let mut sidecars = Vec::new();
        loop {
            session.advance(SessionState::AwaitingFrame);
            let deadline = if sidecars.is_empty() {
                self.config.ttfb_timeout()
            } else {
                self.config.response_timeout()
            };
            let Some(code) = within(deadline, "waiting for a frame", read_status(stream)).await?
            else {
                return Ok(sidecars);
            };
            session.advance(SessionState::FrameStatusRead);
            self.check_status(stream, session.target, code).await?;

            let payload = within(self.config.response_timeout(), "reading a frame", async {
                if context_bytes {
                    read_context_bytes(stream).await?;
                }
                self.encoding.read_payload(stream).await
            })
            .await?;
            let sidecar = Sidecar::from_ssz_bytes(&payload)?;
            session.advance(SessionState::FrameBodyRead);
            debug!(
                peer = %session.target,
                slot = sidecar.beacon_block_slot,
                blobs = sidecar.blobs.len(),
                "decoded sidecar frame"
            );
            sidecars.push(sidecar);
        }
    }

    /// Reads a single frame carrying the whole list of sidecars.
    async fn read_single_frame(
        &self,
        stream: &mut O::Stream,
        session: &mut Session<'_>,
    ) -> Result<Vec<Sidecar>, RequestError> {
        session.advance(SessionState::AwaitingFrame);
        let code = within(self.config.ttfb_timeout(), "waiting for a frame", read_status(stream))
            .await?
            .ok_or_else(|| {
                RequestError::Read(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream closed before a response arrived",
                ))
            })?;
        session.advance(SessionState::FrameStatusRead);
        self.check_status(stream, session.target, code).await?;

        let payload = within(
            self.config.response_timeout(),
            "reading a frame",
            self.encoding.read_payload(stream),
        )
        .await?;
        let sidecars = decode_sidecar_list(&payload)?;
        session.advance(SessionState::FrameBodyRead);
        debug!(peer = %session.target, count = sidecars.len(), "decoded sidecar list");
        Ok(sidecars)
    }

    async fn check_status(
        &self,
        stream: &mut O::Stream,
        target: &PeerTarget,
        code: u8,
    ) -> Result<(), RequestError> {
        if code == SUCCESS_CODE {
            return Ok(());
        }
        let message = within(
            self.config.response_timeout(),
            "reading an error message",
            read_error_message(stream),
        )
        .await?;
        warn!(peer = %target, code, %message, "peer returned an error response");
        Err(RequestError::Protocol { code, message })
    }
}

#[async_trait]
impl<O: StreamOpener> SidecarSource for SidecarClient<O> {
    async fn sidecars_by_range(
        &self,
        target: &PeerTarget,
        request: BlobsSidecarsByRangeRequest,
    ) -> Result<Vec<Sidecar>, RequestError> {
        self.request_sidecars_by_range(target, request).await
    }
}

async fn within<T, F>(deadline: Duration, phase: &'static str, fut: F) -> Result<T, RequestError>
where
    F: Future<Output = Result<T, RequestError>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| RequestError::Timeout {
            phase,
            after: deadline,
        })?
}
