use std::fmt;

use crate::prelude::*;
pub mod aif;
pub use aif::{AifReader, AiffInfo, CommonChunk, CompressionHeader, FormHeader, SoundDataHeader};

// Chunk Identifiers
pub const FORM_CHUNK_ID: ChunkId = ChunkId(*b"FORM");
pub const AIFF_FORMAT_ID: ChunkId = ChunkId(*b"AIFF");
pub const AIFC_FORMAT_ID: ChunkId = ChunkId(*b"AIFC");
pub const COMM_CHUNK_ID: ChunkId = ChunkId(*b"COMM");
pub const SSND_CHUNK_ID: ChunkId = ChunkId(*b"SSND");

// Compression types meaning uncompressed, big-endian PCM
pub const COMPRESSION_NONE: ChunkId = ChunkId(*b"NONE");
pub const COMPRESSION_RAW: ChunkId = ChunkId(*b"raw ");

pub const CHUNK_HEADER_SIZE: u64 = 8;

/// Four-character chunk identifier, kept as raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        let mut id = [0u8; 4];
        reader.read_exact(&mut id)?;
        Ok(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({:?})", String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkId,
    pub size: i32,
}

impl ChunkHeader {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        let id = ChunkId::read(reader)?;
        let size = reader.read_i32::<BigEndian>()?;
        Ok(Self { id, size })
    }

    /// Payload size rounded up to an even byte count.
    pub fn padded_size(&self) -> ConvertResult<u64> {
        if self.size < 0 {
            return Err(ConvertError::InvalidChunkSize {
                id: self.id,
                size: self.size,
            });
        }
        Ok(pad_to_even(self.size as u64))
    }
}

pub fn pad_to_even(size: u64) -> u64 {
    (size + 1) & !1
}

/// Consumes exactly `count` bytes from the reader.
pub fn skip_bytes<T: Read>(reader: &mut T, count: u64) -> ConvertResult<()> {
    let skipped = std::io::copy(&mut reader.by_ref().take(count), &mut std::io::sink())?;
    if skipped < count {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected to skip {} bytes, stream ended after {}", count, skipped),
        )
        .into());
    }
    Ok(())
}

/// Reads chunk headers until one with the requested id is found, skipping the
/// padded payload of every other chunk. The reader is left at the start of the
/// matching chunk's payload.
///
/// Running out of input while scanning means the chunk is absent.
pub fn scan_chunk<T: Read>(reader: &mut T, id: ChunkId) -> ConvertResult<ChunkHeader> {
    loop {
        let header = match ChunkHeader::read(reader) {
            Ok(header) => header,
            Err(e) if is_eof(&e) => return Err(ConvertError::MissingChunk(id)),
            Err(e) => return Err(e),
        };
        if header.id == id {
            tracing::debug!("Found '{}' chunk ({} bytes)", id, header.size);
            return Ok(header);
        }

        tracing::debug!("Skipping '{}' chunk ({} bytes)", header.id, header.size);
        match skip_bytes(reader, header.padded_size()?) {
            Ok(()) => {}
            Err(e) if is_eof(&e) => return Err(ConvertError::MissingChunk(id)),
            Err(e) => return Err(e),
        }
    }
}

fn is_eof(err: &ConvertError) -> bool {
    matches!(err, ConvertError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    I16,
}

impl SampleFormat {
    pub fn from_sample_size(bits: u16) -> ConvertResult<Self> {
        match bits {
            BIT_DEPTH_8 => Ok(SampleFormat::U8),
            BIT_DEPTH_16 => Ok(SampleFormat::I16),
            _ => Err(ConvertError::UnsupportedSampleSize(bits)),
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self {
            SampleFormat::U8 => BIT_DEPTH_8,
            SampleFormat::I16 => BIT_DEPTH_16,
        }
    }

    pub fn bytes_per_sample(&self) -> u64 {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
        }
    }
}

/// One retained (first-channel) sample, still at source depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    U8(u8),
    I16(i16),
}
