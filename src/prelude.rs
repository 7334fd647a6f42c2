pub use crate::*;
pub use crate::error::{ConvertError, ConvertResult, ErrorKind};
pub use anyhow::{Result as R, anyhow};
pub use byteorder::{BigEndian, ReadBytesExt};

pub use memmap2::MmapOptions;
pub use std::io::{Cursor, Read};
