//! `ssz_snappy` framing of request and response payloads.
//!
//! Every payload is an unsigned LEB128 varint holding the uncompressed SSZ
//! length, followed by the SSZ bytes in the snappy framing format.

use std::io::{self, Write};

use futures::{AsyncRead, AsyncReadExt};
use unsigned_varint::{decode, encode};

use crate::errors::{DecodeError, RequestError};

/// Maximum length of a varint prefix for a `u64`.
const MAX_VARINT_LEN: usize = 10;

/// Chunk type byte and 24-bit little-endian chunk length.
const CHUNK_HEADER_LEN: usize = 4;
/// Masked CRC-32C leading every data chunk.
const CHECKSUM_LEN: usize = 4;
/// Largest amount of uncompressed data a single chunk may carry.
const MAX_BLOCK_LEN: usize = 1 << 16;

const COMPRESSED_CHUNK: u8 = 0x00;
const UNCOMPRESSED_CHUNK: u8 = 0x01;

/// SSZ payloads compressed with snappy frames behind an uncompressed length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SszSnappyEncoding {
    max_chunk_size: usize,
}

impl SszSnappyEncoding {
    pub const PROTOCOL_SUFFIX: &'static str = "/ssz_snappy";

    pub const fn new(max_chunk_size: usize) -> Self {
        Self { max_chunk_size }
    }

    pub const fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub const fn protocol_suffix(&self) -> &'static str {
        Self::PROTOCOL_SUFFIX
    }

    /// Prefixes `payload` with its length and compresses it.
    pub fn encode(&self, payload: &[u8]) -> io::Result<Vec<u8>> {
        let mut buf = encode::u64_buffer();
        let prefix = encode::u64(payload.len() as u64, &mut buf);

        let mut encoder = snap::write::FrameEncoder::new(prefix.to_vec());
        encoder.write_all(payload)?;
        encoder
            .into_inner()
            .map_err(|err| io::Error::new(err.error().kind(), err.error().to_string()))
    }

    /// Reads one payload.
    ///
    /// The uncompressed length is checked against the configured maximum
    /// before any compressed data is read.
    pub async fn read_payload<R>(&self, reader: &mut R) -> Result<Vec<u8>, RequestError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let length = read_length_prefix(reader).await?;
        if length > self.max_chunk_size as u64 {
            return Err(DecodeError::ChunkTooLarge {
                length,
                max: self.max_chunk_size,
            }
            .into());
        }
        read_compressed_body(reader, length as usize).await
    }
}

/// Reads a varint length prefix one byte at a time.
pub(crate) async fn read_length_prefix<R>(reader: &mut R) -> Result<u64, RequestError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut prefix = [0u8; MAX_VARINT_LEN];
    for i in 0..MAX_VARINT_LEN {
        reader
            .read_exact(&mut prefix[i..=i])
            .await
            .map_err(RequestError::Read)?;
        if decode::is_last(prefix[i]) {
            let (length, _) = decode::u64(&prefix[..=i])
                .map_err(|_| RequestError::from(DecodeError::InvalidLengthPrefix))?;
            return Ok(length);
        }
    }
    Err(DecodeError::InvalidLengthPrefix.into())
}

/// Reads snappy chunks until they account for `length` uncompressed bytes,
/// then decompresses them.
///
/// Nothing past the last needed chunk is consumed, so the next frame stays
/// on the stream.
pub(crate) async fn read_compressed_body<R>(
    reader: &mut R,
    length: usize,
) -> Result<Vec<u8>, RequestError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let max_chunk_len = snap::raw::max_compress_len(MAX_BLOCK_LEN) + CHECKSUM_LEN;
    let mut framed = Vec::new();
    let mut announced = 0usize;

    while announced < length {
        let start = framed.len();
        framed.resize(start + CHUNK_HEADER_LEN, 0);
        reader
            .read_exact(&mut framed[start..])
            .await
            .map_err(RequestError::Read)?;

        let header = &framed[start..];
        let kind = header[0];
        let chunk_len =
            usize::from(header[1]) | usize::from(header[2]) << 8 | usize::from(header[3]) << 16;
        if chunk_len > max_chunk_len {
            return Err(invalid_snappy(format!("chunk of {chunk_len} bytes is too long")));
        }

        let body_start = framed.len();
        framed.resize(body_start + chunk_len, 0);
        reader
            .read_exact(&mut framed[body_start..])
            .await
            .map_err(RequestError::Read)?;

        let body = &framed[body_start..];
        announced += match kind {
            COMPRESSED_CHUNK | UNCOMPRESSED_CHUNK if body.len() < CHECKSUM_LEN => {
                return Err(invalid_snappy("data chunk is missing its checksum"));
            }
            COMPRESSED_CHUNK => snap::raw::decompress_len(&body[CHECKSUM_LEN..])
                .map_err(|err| invalid_snappy(err.to_string()))?,
            UNCOMPRESSED_CHUNK => body.len() - CHECKSUM_LEN,
            // stream identifier, padding and skippable chunks
            _ => 0,
        };
    }

    let mut payload = Vec::with_capacity(length);
    let mut decoder = snap::read::FrameDecoder::new(framed.as_slice());
    io::Read::read_to_end(&mut decoder, &mut payload)
        .map_err(|err| invalid_snappy(err.to_string()))?;
    if payload.len() != length {
        return Err(DecodeError::InvalidLength {
            expected: length,
            actual: payload.len(),
        }
        .into());
    }
    Ok(payload)
}

fn invalid_snappy(reason: impl Into<String>) -> RequestError {
    DecodeError::InvalidSnappy {
        reason: reason.into(),
    }
    .into()
}

/// Whether `error` is the clean end of a stream.
pub(crate) fn is_eof(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::UnexpectedEof
}
