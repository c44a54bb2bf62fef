//! Frame codec shared by every log file.
//!
//! ```text
//! +------------------+
//! | Payload Length   | (u32 LE)
//! +------------------+
//! | Payload          | (JSON)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 of payload)
//! +------------------+
//! ```

use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreResult;

const HEADER_LEN: usize = 4;
const TRAILER_LEN: usize = 4;

/// Largest payload a frame may declare. Anything above is a damaged header.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Encodes `value` as one complete frame.
pub fn encode<V: Serialize>(value: &V) -> StoreResult<Vec<u8>> {
    let payload = serde_json::to_vec(value)?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + TRAILER_LEN);
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&payload);
    frame.extend_from_slice(&checksum(&payload).to_le_bytes());
    Ok(frame)
}

/// Outcome of decoding the frame at one offset.
#[derive(Debug)]
pub enum Decoded<V> {
    /// A valid frame and the offset just past it.
    Frame { value: V, next: usize },
    /// The buffer ends inside this frame.
    TornTail,
    /// The frame is complete but unusable.
    Corrupt(String),
}

/// Decodes the frame starting at `offset` in `buf`.
pub fn decode<V: DeserializeOwned>(buf: &[u8], offset: usize) -> Decoded<V> {
    let rest = &buf[offset..];
    if rest.len() < HEADER_LEN {
        return Decoded::TornTail;
    }
    let mut len_bytes = [0u8; HEADER_LEN];
    len_bytes.copy_from_slice(&rest[..HEADER_LEN]);
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Decoded::Corrupt(format!(
            "declared payload length {len} exceeds limit {MAX_PAYLOAD_LEN}"
        ));
    }

    let end = HEADER_LEN + len + TRAILER_LEN;
    if rest.len() < end {
        return Decoded::TornTail;
    }

    let payload = &rest[HEADER_LEN..HEADER_LEN + len];
    let mut crc_bytes = [0u8; TRAILER_LEN];
    crc_bytes.copy_from_slice(&rest[HEADER_LEN + len..end]);
    let expected = u32::from_le_bytes(crc_bytes);
    let actual = checksum(payload);
    if actual != expected {
        return Decoded::Corrupt(format!(
            "checksum mismatch: expected {expected:#010x}, computed {actual:#010x}"
        ));
    }

    match serde_json::from_slice(payload) {
        Ok(value) => Decoded::Frame {
            value,
            next: offset + end,
        },
        Err(e) => Decoded::Corrupt(format!("undecodable payload: {e}")),
    }
}

/// Offset of the first checksum-valid frame starting after `offset`, if any.
///
/// A frame cut short by a crash is always the last thing in the file. If an intact
/// frame turns up behind a frame that seems to run past the end, that frame's
/// length is damaged and the bytes after it are committed data.
pub fn next_intact_frame(buf: &[u8], offset: usize) -> Option<usize> {
    (offset + 1..buf.len()).find(|&start| {
        let rest = &buf[start..];
        if rest.len() < HEADER_LEN + TRAILER_LEN {
            return false;
        }
        let mut len_bytes = [0u8; HEADER_LEN];
        len_bytes.copy_from_slice(&rest[..HEADER_LEN]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        if len == 0 || len > MAX_PAYLOAD_LEN || rest.len() < HEADER_LEN + len + TRAILER_LEN {
            return false;
        }
        let mut crc_bytes = [0u8; TRAILER_LEN];
        crc_bytes.copy_from_slice(&rest[HEADER_LEN + len..HEADER_LEN + len + TRAILER_LEN]);
        checksum(&rest[HEADER_LEN..HEADER_LEN + len]) == u32::from_le_bytes(crc_bytes)
    })
}
