use bincode::{
    config,
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Serialize, de::DeserializeOwned};
use std::io::{self, Read, Write};

use super::errors::{ConnectionError, NetError, ProtocolError};

/// Maximum allowed message size (1MB) to prevent DoS attacks via unbounded allocation
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Reads one length-prefixed message.
///
/// Only I/O failures are reported as [`NetError::Connection`]. Frames that
/// arrive whole but don't decode, including oversized frames, which are
/// skipped without being buffered, come back as [`NetError::Protocol`] and
/// leave the stream positioned at the next frame.
pub fn read_prefixed<T: DeserializeOwned, R: Read>(reader: &mut R) -> Result<T, NetError> {
    // Read the size as a u32
    let mut len_bytes = [0; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_MESSAGE_SIZE {
        let skipped = io::copy(&mut reader.by_ref().take(len as u64), &mut io::sink())?;
        if skipped < len as u64 {
            return Err(ConnectionError::Io(io::ErrorKind::UnexpectedEof.into()).into());
        }
        return Err(ProtocolError::MessageTooLarge {
            actual: len,
            max: MAX_MESSAGE_SIZE,
        }
        .into());
    }

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;

    let (value, _) = decode_from_slice(&buf, config::standard()).map_err(ProtocolError::from)?;
    Ok(value)
}

pub fn write_prefixed<T: Serialize, W: Write>(writer: &mut W, value: &T) -> Result<(), NetError> {
    let serialized = encode_to_vec(value, config::standard()).map_err(ProtocolError::from)?;
    if serialized.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            actual: serialized.len(),
            max: MAX_MESSAGE_SIZE,
        }
        .into());
    }

    // Write the size of the serialized data and the serialized data
    // all in one chunk so concurrent frames never interleave.
    let size = serialized.len() as u32;
    let mut buf = Vec::from(size.to_le_bytes());
    buf.extend(serialized);
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}
