//! In-memory AIFF/AIFC fixtures.

#![allow(dead_code)]

use aiff2pcm8_lib::extended::Extended;

pub struct Chunk {
    pub id: [u8; 4],
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn new(id: &[u8; 4], payload: &[u8]) -> Self {
        Self {
            id: *id,
            payload: payload.to_vec(),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&(self.payload.len() as i32).to_be_bytes());
        out.extend_from_slice(&self.payload);
        if self.payload.len() % 2 == 1 {
            out.push(0);
        }
    }
}

pub struct AiffBuilder {
    pub form_type: [u8; 4],
    pub channels: i16,
    pub frames: u32,
    pub sample_size: u16,
    pub sample_rate: f64,
    pub compression: Option<([u8; 4], String)>,
    pub before_comm: Vec<Chunk>,
    pub before_ssnd: Vec<Chunk>,
    pub ssnd_offset: u32,
    pub ssnd_block_size: u32,
    pub sample_data: Vec<u8>,
}

impl AiffBuilder {
    pub fn new(channels: i16, sample_size: u16) -> Self {
        Self {
            form_type: *b"AIFF",
            channels,
            frames: 0,
            sample_size,
            sample_rate: 22050.0,
            compression: None,
            before_comm: Vec::new(),
            before_ssnd: Vec::new(),
            ssnd_offset: 0,
            ssnd_block_size: 0,
            sample_data: Vec::new(),
        }
    }

    pub fn aifc(mut self, compression: &[u8; 4], name: &str) -> Self {
        self.form_type = *b"AIFC";
        self.compression = Some((*compression, name.to_string()));
        self
    }

    /// Interleaved 8-bit frames.
    pub fn frames_u8(mut self, frames: &[&[u8]]) -> Self {
        self.frames = frames.len() as u32;
        self.sample_data = frames.iter().flat_map(|f| f.iter().copied()).collect();
        self
    }

    /// Interleaved 16-bit frames.
    pub fn frames_i16(mut self, frames: &[&[i16]]) -> Self {
        self.frames = frames.len() as u32;
        self.sample_data = frames
            .iter()
            .flat_map(|f| f.iter().flat_map(|s| s.to_be_bytes()))
            .collect();
        self
    }

    pub fn mono_i16(self, samples: &[i16]) -> Self {
        let frames: Vec<&[i16]> = samples.chunks(1).collect();
        self.frames_i16(&frames)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut chunks = Vec::new();
        for chunk in &self.before_comm {
            chunk.write(&mut chunks);
        }

        let mut comm = Vec::new();
        comm.extend_from_slice(&self.channels.to_be_bytes());
        comm.extend_from_slice(&self.frames.to_be_bytes());
        comm.extend_from_slice(&self.sample_size.to_be_bytes());
        comm.extend_from_slice(&Extended::from_f64(self.sample_rate).to_bytes());
        if let Some((compression, name)) = &self.compression {
            comm.extend_from_slice(compression);
            comm.push(name.len() as u8);
            comm.extend_from_slice(name.as_bytes());
            if name.len() % 2 == 0 {
                comm.push(0);
            }
        }
        Chunk::new(b"COMM", &comm).write(&mut chunks);

        for chunk in &self.before_ssnd {
            chunk.write(&mut chunks);
        }

        let mut ssnd = Vec::new();
        ssnd.extend_from_slice(&self.ssnd_offset.to_be_bytes());
        ssnd.extend_from_slice(&self.ssnd_block_size.to_be_bytes());
        ssnd.extend_from_slice(&self.sample_data);
        Chunk::new(b"SSND", &ssnd).write(&mut chunks);

        let mut out = Vec::new();
        out.extend_from_slice(b"FORM");
        out.extend_from_slice(&(chunks.len() as i32 + 4).to_be_bytes());
        out.extend_from_slice(&self.form_type);
        out.extend_from_slice(&chunks);
        out
    }
}
