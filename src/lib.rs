pub mod codecs;
pub mod dither;
pub mod emit;
pub mod error;
pub mod extended;
pub mod prelude;

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::prelude::*;
pub use codecs::{AifReader, AiffInfo, Sample, SampleFormat};
pub use dither::{DitherMode, DitherState, Reducer};
pub use emit::ArrayStyle;

// Standard bit depths
const BIT_DEPTH_8: u16 = 8;
const BIT_DEPTH_16: u16 = 16;

// Sample normalization constants
const U8_OFFSET: f64 = 128.0;

// Files above this size are memory mapped instead of read into a buffer
const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

// Upper bound on the up-front output allocation; COMM frame counts are untrusted
const MAX_PREALLOCATED_FRAMES: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    pub dither: DitherMode,
    /// Seed for the dither noise. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Result of a successful conversion: the header summary plus one output
/// byte per sample frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub info: AiffInfo,
    pub samples: Vec<u8>,
}

impl Conversion {
    pub fn to_array(&self, name: &str, style: ArrayStyle) -> String {
        emit::format_array(name, &self.samples, style)
    }
}

/// Parses an AIFF/AIFC stream and reduces every frame's first channel to an
/// unsigned 8-bit value. Nothing is returned unless every frame was read.
pub fn convert<T: Read>(reader: T, options: &ConvertOptions) -> ConvertResult<Conversion> {
    let mut aif = AifReader::new(reader)?;
    let info = aif.info().clone();
    tracing::debug!(
        "Converting {} frames of {}-bit audio ({} channels, dither {:?})",
        info.frames,
        info.sample_size(),
        info.channels,
        options.dither
    );

    let mut reducer = Reducer::new(options.dither, options.seed);
    let mut samples = Vec::with_capacity((info.frames as usize).min(MAX_PREALLOCATED_FRAMES));
    for sample in aif.frames() {
        samples.push(reducer.reduce(sample?));
    }

    Ok(Conversion { info, samples })
}

pub fn convert_bytes(input: &[u8], options: &ConvertOptions) -> ConvertResult<Conversion> {
    convert(Cursor::new(input), options)
}

/// File based entry point.
#[derive(Debug, Clone)]
pub struct Converter {
    pub path: PathBuf,
    pub options: ConvertOptions,
}

impl Converter {
    pub fn new(input_file: impl AsRef<Path>) -> Self {
        Self {
            path: input_file.as_ref().to_path_buf(),
            options: ConvertOptions::default(),
        }
    }

    pub fn dither(mut self, mode: DitherMode) -> Self {
        self.options.dither = mode;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.options.seed = seed;
        self
    }

    pub fn array_name(&self) -> String {
        emit::array_name(&self.path)
    }

    /// Reads the whole file once and converts it. The file is closed before
    /// this returns, on success or failure.
    pub fn run(&self) -> ConvertResult<Conversion> {
        let mut file = File::open(&self.path)?;
        let file_size = file.metadata()?.len();

        // Only use mmap for large files
        if file_size > MMAP_THRESHOLD {
            tracing::debug!("Mapping {} ({} bytes)", self.path.display(), file_size);
            let mapped_file = unsafe { MmapOptions::new().map(&file)? };
            drop(file);
            convert_bytes(&mapped_file, &self.options)
        } else {
            tracing::debug!("Reading {} ({} bytes)", self.path.display(), file_size);
            let mut data = Vec::with_capacity(file_size as usize);
            file.read_to_end(&mut data)?;
            drop(file);
            convert_bytes(&data, &self.options)
        }
    }
}
