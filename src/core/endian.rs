// Byte-order detection from the byte-swap word

use crate::core::constants::{BYTE_SWAP_MAGIC, BYTE_SWAP_OFFSET};
use crate::core::error::{Result, SioError};
use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    pub fn read_u32<R: Read>(self, source: &mut R) -> std::io::Result<u32> {
        match self {
            Endianness::Big => source.read_u32::<BigEndian>(),
            Endianness::Little => source.read_u32::<LittleEndian>(),
        }
    }

    pub fn u32_from(self, buf: &[u8]) -> u32 {
        match self {
            Endianness::Big => BigEndian::read_u32(buf),
            Endianness::Little => LittleEndian::read_u32(buf),
        }
    }

    pub fn i16_from(self, buf: &[u8]) -> i16 {
        match self {
            Endianness::Big => BigEndian::read_i16(buf),
            Endianness::Little => LittleEndian::read_i16(buf),
        }
    }

    pub fn f32_from(self, buf: &[u8]) -> f32 {
        match self {
            Endianness::Big => BigEndian::read_f32(buf),
            Endianness::Little => LittleEndian::read_f32(buf),
        }
    }
}

/// Picks the byte order under which the byte-swap word reads as 32677.
///
/// Big-endian is tried first. The source is rewound to offset 0 before
/// returning, whether or not detection succeeded.
pub fn detect_endianness<R: Read + Seek>(source: &mut R) -> Result<Endianness> {
    let detected = probe_byte_swap_word(source);
    let rewound = source.seek(SeekFrom::Start(0));
    let endian = detected?;
    rewound?;
    Ok(endian)
}

fn probe_byte_swap_word<R: Read + Seek>(source: &mut R) -> Result<Endianness> {
    let mut word = [0u8; 4];
    source.seek(SeekFrom::Start(BYTE_SWAP_OFFSET))?;
    source.read_exact(&mut word)?;

    for endian in [Endianness::Big, Endianness::Little] {
        if endian.u32_from(&word) == BYTE_SWAP_MAGIC {
            debug!("Byte order detected: {:?}", endian);
            return Ok(endian);
        }
    }

    Err(SioError::CorruptHeader(format!(
        "Problem with byte swap constant: read {} big-endian, {} little-endian (expected {})",
        Endianness::Big.u32_from(&word),
        Endianness::Little.u32_from(&word),
        BYTE_SWAP_MAGIC
    )))
}
