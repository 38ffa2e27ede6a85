//! RESP protocol framing.
//!
//! The decoder works on a [`BytesMut`] that accumulates socket reads. It
//! only consumes complete frames; a partially received frame stays in the
//! buffer until more bytes arrive, so bulk payloads are never short-read
//! on partial TCP receives.
//!
//! Bulk strings are binary-safe: the payload is taken by declared length
//! and may contain any byte, including `\r\n`. Only protocol lines (type
//! prefixes, lengths, simple strings) are required to be UTF-8.

use std::str;

use bytes::{Buf, BytesMut};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type")]
    UnknownRespType,
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk string")]
    InvalidBulkString,
    #[error("invalid array")]
    InvalidArray,
}

/// A single RESP frame.
///
/// `Null` is the null bulk string (`$-1\r\n`) and is distinct from the
/// empty bulk string `BulkString(vec![])`. Bulk strings carry raw bytes;
/// they are not assumed to be text.
#[derive(Debug, PartialEq, Clone)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Vec<u8>),
    Null,
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Decodes every complete frame currently in `buffer`.
    ///
    /// Consumed bytes are removed from the buffer; the trailing bytes of
    /// an incomplete frame are left in place for the next call. Malformed
    /// framing fails the whole buffer with a [`RespError`] because the
    /// decoder cannot resynchronize a length-prefixed protocol.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Accumulated bytes read from the connection
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RespValue>)` - Zero or more complete frames, in arrival order
    /// * `Err(RespError)` - If the buffered bytes are not valid RESP
    pub fn parse(buffer: &mut BytesMut) -> Result<Vec<RespValue>, RespError> {
        let mut frames = Vec::new();

        loop {
            match Self::try_decode(buffer, 0)? {
                Some((frame, consumed)) => {
                    buffer.advance(consumed);
                    frames.push(frame);
                }
                None => break,
            }
        }

        Ok(frames)
    }

    /// Attempts to decode one frame starting at `cursor`.
    ///
    /// Returns `Ok(None)` when the buffer ends before the frame does.
    fn try_decode(
        buffer: &[u8],
        cursor: usize,
    ) -> Result<Option<(RespValue, usize)>, RespError> {
        if cursor >= buffer.len() {
            return Ok(None);
        }

        match buffer[cursor] {
            b'+' => {
                let Some((line, next)) = read_line(buffer, cursor + 1)? else {
                    return Ok(None);
                };

                Ok(Some((RespValue::SimpleString(line.to_string()), next)))
            }
            b':' => {
                let Some((line, next)) = read_line(buffer, cursor + 1)? else {
                    return Ok(None);
                };

                let value = line
                    .parse::<i64>()
                    .map_err(|_| RespError::FailedToParseInteger)?;

                Ok(Some((RespValue::Integer(value), next)))
            }
            b'$' => Self::try_decode_bulk_string(buffer, cursor + 1),
            b'*' => {
                let Some((line, mut next)) = read_line(buffer, cursor + 1)? else {
                    return Ok(None);
                };

                let count = line.parse::<i64>().map_err(|_| RespError::InvalidArray)?;

                if count < 0 {
                    return Err(RespError::InvalidArray);
                }

                let mut elements: Vec<RespValue> = Vec::with_capacity(count as usize);

                while elements.len() < count as usize {
                    let Some((element, element_next)) = Self::try_decode(buffer, next)? else {
                        return Ok(None);
                    };

                    elements.push(element);
                    next = element_next;
                }

                Ok(Some((RespValue::Array(elements), next)))
            }
            _ => Err(RespError::UnknownRespType),
        }
    }

    /// Decodes a bulk string payload by its declared length.
    ///
    /// The payload is binary-safe: it may contain any byte, including
    /// `\r\n`, which is why the declared length is authoritative and the
    /// payload is never line-split or UTF-8 validated.
    fn try_decode_bulk_string(
        buffer: &[u8],
        cursor: usize,
    ) -> Result<Option<(RespValue, usize)>, RespError> {
        let Some((line, next)) = read_line(buffer, cursor)? else {
            return Ok(None);
        };

        let length = line
            .parse::<i64>()
            .map_err(|_| RespError::InvalidBulkString)?;

        if length == -1 {
            return Ok(Some((RespValue::Null, next)));
        }

        if length < 0 {
            return Err(RespError::InvalidBulkString);
        }

        let length = length as usize;

        if next + length + 2 > buffer.len() {
            return Ok(None);
        }

        if &buffer[next + length..next + length + 2] != b"\r\n" {
            return Err(RespError::InvalidBulkString);
        }

        let payload = buffer[next..next + length].to_vec();

        Ok(Some((RespValue::BulkString(payload), next + length + 2)))
    }

    /// Encodes this frame into its canonical wire form.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            RespValue::SimpleString(content) => format!("+{}\r\n", content).into_bytes(),
            RespValue::Error(message) => format!("-{}\r\n", message).into_bytes(),
            RespValue::Integer(value) => format!(":{}\r\n", value).into_bytes(),
            RespValue::BulkString(content) => {
                let mut encoded = format!("${}\r\n", content.len()).into_bytes();
                encoded.extend_from_slice(content);
                encoded.extend_from_slice(b"\r\n");
                encoded
            }
            RespValue::Null => b"$-1\r\n".to_vec(),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len()).into_bytes();

                for element in elements {
                    encoded.extend(element.encode());
                }

                encoded
            }
        }
    }
}

/// Reads one `\r\n`-terminated line starting at `cursor`.
///
/// Returns `Ok(None)` when no terminator has been received yet; the new
/// cursor points past the terminator. Lines are protocol text, so they
/// must be UTF-8.
fn read_line(buffer: &[u8], cursor: usize) -> Result<Option<(&str, usize)>, RespError> {
    let Some(position) = buffer[cursor..]
        .windows(2)
        .position(|window| window == b"\r\n")
    else {
        return Ok(None);
    };

    let line = str::from_utf8(&buffer[cursor..cursor + position])
        .map_err(|_| RespError::InvalidUtf8)?;

    Ok(Some((line, cursor + position + 2)))
}
