//! The transport seam: how the client gets a bidirectional stream to a peer.

use std::{
    io,
    ops::{Deref, DerefMut},
};

use async_trait::async_trait;
use futures::{AsyncRead, AsyncWrite};

use crate::peer::PeerTarget;

/// A bidirectional stream negotiated for one protocol.
///
/// Exactly one of [`reset`](Self::reset) and [`release`](Self::release) is
/// called by the client before the stream is dropped.
pub trait RpcStream: AsyncRead + AsyncWrite + Unpin + Send {
    /// Aborts the stream in both directions.
    fn reset(&mut self);

    /// Hands a fully consumed stream back to the transport.
    fn release(&mut self) {}
}

/// Opens streams to peers.
#[async_trait]
pub trait StreamOpener: Send + Sync {
    type Stream: RpcStream;

    async fn open_stream(&self, target: &PeerTarget, protocol: &str) -> io::Result<Self::Stream>;
}

/// Owns a stream for the length of one call and resets it on drop unless it
/// was released first.
pub(crate) struct StreamGuard<S: RpcStream> {
    stream: S,
    released: bool,
}

impl<S: RpcStream> StreamGuard<S> {
    pub(crate) const fn new(stream: S) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    pub(crate) fn release(mut self) {
        self.released = true;
        self.stream.release();
    }
}

impl<S: RpcStream> Deref for StreamGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.stream
    }
}

impl<S: RpcStream> DerefMut for StreamGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: RpcStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        if !self.released {
            self.stream.reset();
        }
    }
}
