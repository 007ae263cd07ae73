//! Binary trace of played episodes.
//!
//! Layout: 4-byte magic, 1-byte version, a postcard-encoded [`Trace`] body,
//! then a little-endian CRC32C of everything before it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::arena::Episode;

const MAGIC: &[u8; 4] = b"T23E";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 5;
const CRC_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub policy: String,
    pub seed: u64,
    pub start_unix_s: u64,
    pub elapsed_s: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub meta: Meta,
    pub episodes: Vec<Episode>,
}

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("invalid magic or version")]
    MagicOrVersion,
    #[error("file too short or malformed")]
    Malformed,
    #[error("checksum mismatch")]
    Checksum,
}

pub fn encode_trace(trace: &Trace) -> Result<Vec<u8>, TraceError> {
    let body = postcard::to_allocvec(trace)?;
    let mut buf = Vec::with_capacity(HEADER_LEN + body.len() + CRC_LEN);
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&body);
    let checksum = crc32c::crc32c(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

pub fn parse_trace_bytes(bytes: &[u8]) -> Result<Trace, TraceError> {
    if bytes.len() < HEADER_LEN + CRC_LEN {
        return Err(TraceError::Malformed);
    }
    // Validate checksum first to avoid decoding garbage
    let (content, trailer) = bytes.split_at(bytes.len() - CRC_LEN);
    let file_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if file_crc != crc32c::crc32c(content) {
        return Err(TraceError::Checksum);
    }
    if &content[..4] != MAGIC || content[4] != VERSION {
        return Err(TraceError::MagicOrVersion);
    }
    Ok(postcard::from_bytes(&content[HEADER_LEN..])?)
}

pub fn write_trace_to_path<P: AsRef<Path>>(path: P, trace: &Trace) -> Result<(), TraceError> {
    let data = encode_trace(trace)?;
    let mut f = fs::File::create(path)?;
    f.write_all(&data)?;
    Ok(())
}

pub fn read_trace_from_path<P: AsRef<Path>>(path: P) -> Result<Trace, TraceError> {
    let data = fs::read(path)?;
    parse_trace_bytes(&data)
}

pub fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::play_episode;
    use crate::policy::{RandomPolicy, TileDealer};
    use tempfile::NamedTempFile;

    fn sample() -> Trace {
        let mut dealer = TileDealer::new(8);
        let mut policy = RandomPolicy::new(8);
        let episodes = (0..3).map(|_| play_episode(&mut policy, &mut dealer)).collect();
        let meta = Meta { policy: "random".into(), seed: 8, start_unix_s: 1_700_000_000, elapsed_s: 0.5 };
        Trace { meta, episodes }
    }

    #[test]
    fn file_round_trip() {
        let trace = sample();
        let tmp = NamedTempFile::new().unwrap();
        write_trace_to_path(tmp.path(), &trace).unwrap();
        let back = read_trace_from_path(tmp.path()).unwrap();
        assert_eq!(back, trace);
        for ep in &back.episodes {
            assert_eq!(ep.replay().map(|b| b.grid()), Some(ep.final_board.grid()));
        }
    }

    #[test]
    fn checksum_mismatch() {
        let mut bytes = encode_trace(&sample()).unwrap();
        bytes[HEADER_LEN + 1] ^= 0xFF;
        assert!(matches!(parse_trace_bytes(&bytes), Err(TraceError::Checksum)));
    }

    #[test]
    fn bad_magic() {
        let mut bytes = encode_trace(&sample()).unwrap();
        bytes[0] = b'X';
        let n = bytes.len() - CRC_LEN;
        let crc = crc32c::crc32c(&bytes[..n]).to_le_bytes();
        bytes[n..].copy_from_slice(&crc);
        assert!(matches!(parse_trace_bytes(&bytes), Err(TraceError::MagicOrVersion)));
    }

    #[test]
    fn malformed_bounds() {
        assert!(matches!(parse_trace_bytes(&[1, 2, 3]), Err(TraceError::Malformed)));
    }
}
