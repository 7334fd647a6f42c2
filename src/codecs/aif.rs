use crate::codecs::*;
use crate::extended::Extended;
use crate::prelude::*;

// Chunk Structures
const COMMON_FIELDS_SIZE: u64 = 18; // channels + frames + sample size + rate
const COMPRESSION_TYPE_SIZE: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormHeader {
    pub header: ChunkHeader,
    pub form_type: ChunkId,
}

impl FormHeader {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        let header = ChunkHeader::read(reader)?;
        if header.id != FORM_CHUNK_ID {
            return Err(ConvertError::NotForm(header.id));
        }

        let form_type = ChunkId::read(reader)?;
        if form_type != AIFF_FORMAT_ID && form_type != AIFC_FORMAT_ID {
            return Err(ConvertError::UnknownFormType(form_type));
        }

        Ok(Self { header, form_type })
    }

    /// AIFC files carry a compression header after the common fields.
    pub fn is_compressed(&self) -> bool {
        self.form_type.as_bytes()[3] == b'C'
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonChunk {
    pub num_channels: i16,
    pub num_sample_frames: u32,
    pub sample_size: u16,
    pub sample_rate: Extended,
}

impl CommonChunk {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        Ok(Self {
            num_channels: reader.read_i16::<BigEndian>()?,
            num_sample_frames: reader.read_u32::<BigEndian>()?,
            sample_size: reader.read_u16::<BigEndian>()?,
            sample_rate: Extended::read(reader)?,
        })
    }

    pub fn sample_format(&self) -> ConvertResult<SampleFormat> {
        if self.num_channels < 1 {
            return Err(ConvertError::InvalidChannelCount(self.num_channels));
        }
        SampleFormat::from_sample_size(self.sample_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionHeader {
    pub compression_type: ChunkId,
    pub name_size: u8,
}

impl CompressionHeader {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        Ok(Self {
            compression_type: ChunkId::read(reader)?,
            name_size: reader.read_u8()?,
        })
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if self.compression_type != COMPRESSION_NONE && self.compression_type != COMPRESSION_RAW {
            return Err(ConvertError::UnsupportedCompression(self.compression_type));
        }
        Ok(())
    }

    /// Size of the pascal-style name field, count byte included. The total
    /// must be even.
    pub fn padded_name_size(&self) -> u64 {
        (self.name_size as u64 + 2) & !1
    }

    /// Reads the rest of the name field. The count byte has already been
    /// consumed by [`CompressionHeader::read`].
    pub fn read_name<T: Read>(&self, reader: &mut T) -> ConvertResult<String> {
        let mut name = vec![0u8; self.padded_name_size() as usize - 1];
        reader.read_exact(&mut name)?;
        name.truncate(self.name_size as usize);
        Ok(String::from_utf8_lossy(&name).into_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundDataHeader {
    pub offset: u32,
    pub block_size: u32,
}

impl SoundDataHeader {
    pub fn read<T: Read>(reader: &mut T) -> ConvertResult<Self> {
        Ok(Self {
            offset: reader.read_u32::<BigEndian>()?,
            block_size: reader.read_u32::<BigEndian>()?,
        })
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if self.offset != 0 || self.block_size != 0 {
            return Err(ConvertError::UnsupportedBlockAlignment {
                offset: self.offset,
                block_size: self.block_size,
            });
        }
        Ok(())
    }
}

/// Header summary of a parsed AIFF/AIFC stream.
#[derive(Debug, Clone, PartialEq)]
pub struct AiffInfo {
    pub form_type: ChunkId,
    pub channels: u16,
    pub frames: u32,
    pub format: SampleFormat,
    pub sample_rate: f64,
    /// `NONE` for plain AIFF files.
    pub compression_type: ChunkId,
    pub compression_name: String,
}

impl AiffInfo {
    pub fn sample_size(&self) -> u16 {
        self.format.bits_per_sample()
    }
}

/// Single pass AIFF/AIFC reader.
///
/// [`AifReader::new`] walks the container up to the start of the sample data
/// (`FORM` -> `COMM` -> `SSND`) and validates everything on the way. The
/// samples are then pulled one frame at a time, keeping the first channel.
pub struct AifReader<T: Read> {
    reader: T,
    info: AiffInfo,
    frames_left: u32,
}

impl<T: Read> AifReader<T> {
    pub fn new(mut reader: T) -> ConvertResult<Self> {
        let form = FormHeader::read(&mut reader)?;
        tracing::debug!("Form type '{}' ({} bytes)", form.form_type, form.header.size);

        let comm = scan_chunk(&mut reader, COMM_CHUNK_ID)?;
        let common = CommonChunk::read(&mut reader)?;
        let format = common.sample_format()?;
        let mut consumed = COMMON_FIELDS_SIZE;

        let (compression_type, compression_name) = if form.is_compressed() {
            let compression = CompressionHeader::read(&mut reader)?;
            compression.validate()?;
            let name = compression.read_name(&mut reader)?;
            consumed += COMPRESSION_TYPE_SIZE + compression.padded_name_size();
            tracing::debug!("Compression '{}' ({})", compression.compression_type, name);
            (compression.compression_type, name)
        } else {
            (COMPRESSION_NONE, String::new())
        };

        // Oversized COMM chunks would otherwise leave the next scan mid-chunk
        let comm_size = comm.padded_size()?;
        if comm_size > consumed {
            tracing::debug!("Skipping {} trailing COMM bytes", comm_size - consumed);
            skip_bytes(&mut reader, comm_size - consumed)?;
        }

        scan_chunk(&mut reader, SSND_CHUNK_ID)?;
        SoundDataHeader::read(&mut reader)?.validate()?;

        let info = AiffInfo {
            form_type: form.form_type,
            channels: common.num_channels as u16,
            frames: common.num_sample_frames,
            format,
            sample_rate: common.sample_rate.to_f64(),
            compression_type,
            compression_name,
        };

        Ok(Self {
            reader,
            frames_left: info.frames,
            info,
        })
    }

    pub fn info(&self) -> &AiffInfo {
        &self.info
    }

    pub fn frames_left(&self) -> u32 {
        self.frames_left
    }

    /// Reads the next frame and returns its first-channel sample, or `None`
    /// once all frames declared in `COMM` have been read.
    pub fn read_sample(&mut self) -> ConvertResult<Option<Sample>> {
        if self.frames_left == 0 {
            return Ok(None);
        }

        let sample = match self.info.format {
            SampleFormat::U8 => Sample::U8(self.reader.read_u8()?),
            SampleFormat::I16 => Sample::I16(self.reader.read_i16::<BigEndian>()?),
        };

        // We only use 1 channel (mono) data per frame
        let other_channels = (self.info.channels as u64 - 1) * self.info.format.bytes_per_sample();
        skip_bytes(&mut self.reader, other_channels)?;

        self.frames_left -= 1;
        Ok(Some(sample))
    }

    pub fn frames(&mut self) -> Frames<'_, T> {
        Frames {
            reader: self,
            failed: false,
        }
    }

    pub fn into_inner(self) -> T {
        self.reader
    }
}

/// Iterator over the remaining first-channel samples. Ends after the first
/// error.
pub struct Frames<'a, T: Read> {
    reader: &'a mut AifReader<T>,
    failed: bool,
}

impl<T: Read> Iterator for Frames<'_, T> {
    type Item = ConvertResult<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.reader.read_sample() {
            Ok(Some(sample)) => Some(Ok(sample)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        (0, Some(self.reader.frames_left as usize))
    }
}
