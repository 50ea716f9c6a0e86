// Data structures for the SIO format

use crate::core::constants::*;
use crate::core::endian::Endianness;
use crate::core::error::{Result, SioError};
use ndarray::{Array2, ArrayView1};
use serde::Serialize;
use std::io::Read;
use tracing::debug;

/// Descriptors decoded from the leading header record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileHeader {
    pub id: u32,
    pub record_count: u32,
    pub bytes_per_record: u32,
    pub channel_count: u32,
    pub bytes_per_sample: u32,
    pub is_real: bool,
    pub samples_per_channel: u32,
    pub byte_swap_magic: u32,
    pub file_label: String,
    pub comment: String,
    pub endianness: Endianness,
    pub records_per_channel: u32,
    pub samples_per_record: u32,
    #[serde(skip)]
    pub sample_format: SampleFormat,
}

impl FileHeader {
    pub const DESCRIPTION: &'static str = "\
id                  = ID Number
record_count        = # of Records in File
bytes_per_record    = # of Bytes per Record
channel_count       = # of channels in File
bytes_per_sample    = # of Bytes per Sample
is_real             = false - integer, true - real
samples_per_channel = # of Samples per Channel
file_label          = File name
comment             = Comment String
byte_swap_magic     = Endian check value, should be 32677
records_per_channel = # of Records per Channel
samples_per_record  = # of Samples per Record";

    /// Decodes the header from a source positioned at offset 0.
    pub fn decode<R: Read>(source: &mut R, endian: Endianness) -> Result<Self> {
        let id = endian.read_u32(source)?;
        let record_count = endian.read_u32(source)?;
        let bytes_per_record = endian.read_u32(source)?;
        let channel_count = endian.read_u32(source)?;
        let bytes_per_sample = endian.read_u32(source)?;
        let is_real_flag = endian.read_u32(source)?;
        let samples_per_channel = endian.read_u32(source)?;
        let byte_swap_magic = endian.read_u32(source)?;

        let mut label = [0u8; LABEL_SIZE];
        source.read_exact(&mut label)?;
        let mut comment = [0u8; COMMENT_SIZE];
        source.read_exact(&mut comment)?;

        if byte_swap_magic != BYTE_SWAP_MAGIC {
            return Err(SioError::CorruptHeader(format!(
                "Problem with byte swap constant: {}",
                byte_swap_magic
            )));
        }
        if channel_count == 0 {
            return Err(SioError::CorruptHeader("channel count is 0".to_string()));
        }

        let sample_format = SampleFormat::from_u32(bytes_per_sample)
            .ok_or(SioError::UnsupportedSampleWidth(bytes_per_sample))?;

        let samples_per_record = bytes_per_record / bytes_per_sample;
        if samples_per_record == 0 {
            return Err(SioError::CorruptHeader(format!(
                "{} bytes per record cannot hold a {}-byte sample",
                bytes_per_record, bytes_per_sample
            )));
        }

        let header = FileHeader {
            id,
            record_count,
            bytes_per_record,
            channel_count,
            bytes_per_sample,
            is_real: is_real_flag != 0,
            samples_per_channel,
            byte_swap_magic,
            file_label: fixed_text(&label),
            comment: fixed_text(&comment),
            endianness: endian,
            records_per_channel: record_count.div_ceil(channel_count),
            samples_per_record,
            sample_format,
        };

        debug!(
            "Decoded header: id={} channels={} records={} bpr={} bps={} spc={}",
            header.id,
            header.channel_count,
            header.record_count,
            header.bytes_per_record,
            header.bytes_per_sample,
            header.samples_per_channel
        );

        Ok(header)
    }

    /// Record slots taken by the header before channel data begins.
    pub fn header_records(&self) -> u64 {
        (HEADER_SIZE as u64)
            .div_ceil(self.bytes_per_record as u64)
            .max(1)
    }

    pub fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    pub fn duration_seconds(&self, sample_rate: f64) -> f64 {
        self.samples_per_channel as f64 / sample_rate
    }

    /// Header fields by name, in on-disk order followed by derived values.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("record_count", self.record_count.to_string()),
            ("bytes_per_record", self.bytes_per_record.to_string()),
            ("channel_count", self.channel_count.to_string()),
            ("bytes_per_sample", self.bytes_per_sample.to_string()),
            ("is_real", self.is_real.to_string()),
            ("samples_per_channel", self.samples_per_channel.to_string()),
            ("byte_swap_magic", self.byte_swap_magic.to_string()),
            ("file_label", self.file_label.clone()),
            ("comment", self.comment.clone()),
            ("records_per_channel", self.records_per_channel.to_string()),
            ("samples_per_record", self.samples_per_record.to_string()),
        ]
    }
}

// Fixed-width text is NUL/space padded
fn fixed_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

/// Samples returned for a read: either nothing was requested, or a
/// `(samples, channels)` matrix in the requested channel order.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    Empty,
    Data(Array2<f64>),
}

impl SampleData {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            SampleData::Empty => (0, 0),
            SampleData::Data(x) => x.dim(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SampleData::Empty)
    }

    pub fn column(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        match self {
            SampleData::Data(x) if index < x.ncols() => Some(x.column(index)),
            _ => None,
        }
    }

    pub fn into_matrix(self) -> Option<Array2<f64>> {
        match self {
            SampleData::Empty => None,
            SampleData::Data(x) => Some(x),
        }
    }
}

/// Non-fatal conditions raised while resolving a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReadNotice {
    SampleCountClamped { requested: u64, available: u64 },
}

#[derive(Debug, Clone)]
pub struct ReadOutput {
    pub data: SampleData,
    pub header: FileHeader,
    pub notices: Vec<ReadNotice>,
}
