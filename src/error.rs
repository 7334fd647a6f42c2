use thiserror::Error;

use crate::codecs::ChunkId;

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is not a well-formed AIFF/AIFC container.
    Format,
    /// The container is valid but uses a feature this converter does not handle.
    Unsupported,
    /// Short read or stream failure.
    Io,
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid file format: not an AIFF file (found '{0}' instead of 'FORM')")]
    NotForm(ChunkId),

    #[error("Invalid file format: unknown form type '{0}'")]
    UnknownFormType(ChunkId),

    #[error("Invalid file format: '{0}' chunk not found")]
    MissingChunk(ChunkId),

    #[error("Invalid file format: chunk '{id}' declares negative size {size}")]
    InvalidChunkSize { id: ChunkId, size: i32 },

    #[error("Invalid file format: channel count must be at least 1, got {0}")]
    InvalidChannelCount(i16),

    #[error("Sample size must be 8-bit or 16-bit, got {0}")]
    UnsupportedSampleSize(u16),

    #[error("Invalid file format: must be a raw PCM, got compression '{0}'")]
    UnsupportedCompression(ChunkId),

    #[error("Non-zero offset/blockSize is not supported (offset {offset}, block size {block_size})")]
    UnsupportedBlockAlignment { offset: u32, block_size: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotForm(_)
            | Self::UnknownFormType(_)
            | Self::MissingChunk(_)
            | Self::InvalidChunkSize { .. }
            | Self::InvalidChannelCount(_) => ErrorKind::Format,
            Self::UnsupportedSampleSize(_)
            | Self::UnsupportedCompression(_)
            | Self::UnsupportedBlockAlignment { .. } => ErrorKind::Unsupported,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
