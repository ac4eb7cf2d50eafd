//! Response frames: a status byte followed by either an error message or a payload.

use std::io;

use futures::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    encoding::{is_eof, read_compressed_body, read_length_prefix, SszSnappyEncoding},
    errors::{DecodeError, RequestError},
};

/// Status byte of a successful frame.
pub const SUCCESS_CODE: u8 = 0;
/// Status sent by a responder that could not parse the request.
pub const INVALID_REQUEST_CODE: u8 = 1;
/// Status sent by a responder that failed while serving the request.
pub const SERVER_ERROR_CODE: u8 = 2;
/// Status sent by a responder that does not have the requested data.
pub const RESOURCE_UNAVAILABLE_CODE: u8 = 3;

/// Longest error message a peer may send.
pub const MAX_ERROR_MESSAGE_LEN: usize = 256;

/// Size of the fork digest some transports put before each successful payload.
pub const CONTEXT_BYTES_LEN: usize = 4;

/// Reads the status byte of the next frame.
///
/// Returns `None` when the stream ends before any byte of the frame arrives.
pub(crate) async fn read_status<R>(reader: &mut R) -> Result<Option<u8>, RequestError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut status = [0u8; 1];
    match reader.read_exact(&mut status).await {
        Ok(()) => Ok(Some(status[0])),
        Err(err) if is_eof(&err) => Ok(None),
        Err(err) => Err(RequestError::Read(err)),
    }
}

/// Reads the message that follows a non-zero status byte.
///
/// The message is compressed like any payload, and its uncompressed length
/// is checked before it is read. Invalid UTF-8 is replaced rather than rejected.
pub(crate) async fn read_error_message<R>(reader: &mut R) -> Result<String, RequestError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let length = read_length_prefix(reader).await?;
    if length > MAX_ERROR_MESSAGE_LEN as u64 {
        return Err(DecodeError::ErrorMessageTooLong {
            length,
            max: MAX_ERROR_MESSAGE_LEN,
        }
        .into());
    }
    let message = read_compressed_body(reader, length as usize).await?;
    Ok(String::from_utf8_lossy(&message).into_owned())
}

pub(crate) async fn read_context_bytes<R>(
    reader: &mut R,
) -> Result<[u8; CONTEXT_BYTES_LEN], RequestError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut context = [0u8; CONTEXT_BYTES_LEN];
    reader
        .read_exact(&mut context)
        .await
        .map_err(RequestError::Read)?;
    Ok(context)
}

/// Writes a successful frame carrying `payload`.
pub async fn write_success_chunk<W>(
    writer: &mut W,
    encoding: &SszSnappyEncoding,
    context: Option<[u8; CONTEXT_BYTES_LEN]>,
    payload: &[u8],
) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(&[SUCCESS_CODE]).await?;
    if let Some(context) = context {
        writer.write_all(&context).await?;
    }
    writer.write_all(&encoding.encode(payload)?).await
}

/// Writes an error frame. Messages longer than the protocol allows are truncated.
pub async fn write_error_chunk<W>(
    writer: &mut W,
    encoding: &SszSnappyEncoding,
    code: u8,
    message: &str,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if code == SUCCESS_CODE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "error frames need a non-zero status code",
        ));
    }
    let message = &message.as_bytes()[..message.len().min(MAX_ERROR_MESSAGE_LEN)];
    writer.write_all(&[code]).await?;
    writer.write_all(&encoding.encode(message)?).await
}
