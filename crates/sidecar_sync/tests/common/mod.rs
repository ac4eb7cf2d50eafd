#![allow(dead_code)]

use std::{
    io,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    task::{Context, Poll},
};

use async_trait::async_trait;
use blobkit_sidecar_sync::{
    write_error_chunk, write_success_chunk, PeerIdentity, PeerTarget, RpcStream, Sidecar,
    SszSnappyEncoding, StreamOpener, DEFAULT_MAX_CHUNK_SIZE,
};
use futures::{io::Cursor, AsyncRead, AsyncWrite};
use serialization::types::zeroed_blob;

/// What a mock stream does once its scripted response has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterResponse {
    Close,
    Stall,
}

/// Shared record of what happened to the streams handed out by a [`MockOpener`].
#[derive(Debug, Clone, Default)]
pub struct StreamLog {
    pub protocols: Arc<Mutex<Vec<String>>>,
    pub written: Arc<Mutex<Vec<u8>>>,
    pub closed: Arc<AtomicBool>,
    pub resets: Arc<AtomicUsize>,
    pub releases: Arc<AtomicUsize>,
    pub consumed: Arc<AtomicUsize>,
}

impl StreamLog {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Bytes of the scripted response the client has read.
    pub fn consumed(&self) -> usize {
        self.consumed.load(Ordering::SeqCst)
    }

    pub fn written(&self) -> Vec<u8> {
        self.written.lock().unwrap().clone()
    }

    pub fn write_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

pub struct MockStream {
    response: Cursor<Vec<u8>>,
    after_response: AfterResponse,
    fail_writes: bool,
    log: StreamLog,
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = &mut *self;
        let drained = this.response.position() as usize >= this.response.get_ref().len();
        if drained && this.after_response == AfterResponse::Stall {
            return Poll::Pending;
        }
        let poll = Pin::new(&mut this.response).poll_read(cx, buf);
        this.log
            .consumed
            .store(this.response.position() as usize, Ordering::SeqCst);
        poll
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail_writes {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stream reset by peer",
            )));
        }
        self.log.written.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.log.closed.store(true, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

impl RpcStream for MockStream {
    fn reset(&mut self) {
        self.log.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&mut self) {
        self.log.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands out streams that replay a fixed response.
pub struct MockOpener {
    pub response: Vec<u8>,
    pub after_response: AfterResponse,
    pub fail_open: bool,
    pub fail_writes: bool,
    pub log: StreamLog,
}

impl MockOpener {
    pub fn replying(response: Vec<u8>) -> Self {
        Self {
            response,
            after_response: AfterResponse::Close,
            fail_open: false,
            fail_writes: false,
            log: StreamLog::default(),
        }
    }

    pub fn stalling_after(response: Vec<u8>) -> Self {
        Self {
            after_response: AfterResponse::Stall,
            ..Self::replying(response)
        }
    }
}

#[async_trait]
impl StreamOpener for MockOpener {
    type Stream = MockStream;

    async fn open_stream(&self, _target: &PeerTarget, protocol: &str) -> io::Result<MockStream> {
        if self.fail_open {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "protocols not supported",
            ));
        }
        self.log.protocols.lock().unwrap().push(protocol.to_owned());
        Ok(MockStream {
            response: Cursor::new(self.response.clone()),
            after_response: self.after_response,
            fail_writes: self.fail_writes,
            log: self.log.clone(),
        })
    }
}

pub fn target() -> PeerTarget {
    PeerTarget::new(
        "/ip4/127.0.0.1/tcp/13000".parse().unwrap(),
        PeerIdentity::new("ABCDEF"),
    )
}

pub fn encoding() -> SszSnappyEncoding {
    SszSnappyEncoding::new(DEFAULT_MAX_CHUNK_SIZE)
}

/// A sidecar for `slot` with `blob_count` blobs tagged by slot and index.
pub fn sidecar(slot: u64, blob_count: usize) -> Sidecar {
    let blobs = (0..blob_count)
        .map(|i| {
            let mut blob = zeroed_blob();
            blob[0] = slot as u8;
            blob[1] = i as u8;
            blob
        })
        .collect();
    Sidecar {
        beacon_block_root: [slot as u8; 32],
        beacon_block_slot: slot,
        blobs,
        kzg_aggregated_proof: [0xc0; 48],
    }
}

/// One success frame per sidecar.
pub async fn success_frames(sidecars: &[Sidecar], context: Option<[u8; 4]>) -> Vec<u8> {
    let mut frames = Vec::new();
    for sidecar in sidecars {
        write_success_chunk(&mut frames, &encoding(), context, &sidecar.to_ssz_bytes())
            .await
            .unwrap();
    }
    frames
}

pub async fn error_frame(code: u8, message: &str) -> Vec<u8> {
    let mut frame = Vec::new();
    write_error_chunk(&mut frame, &encoding(), code, message)
        .await
        .unwrap();
    frame
}
