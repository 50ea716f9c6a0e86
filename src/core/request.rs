// Caller parameters and their resolution against a decoded header

use crate::core::constants::{DEFAULT_START_SAMPLE, READ_TO_END};
use crate::core::error::{Result, SioError};
use crate::core::format::{FileHeader, ReadNotice};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Read the whole record span at once, select channels afterwards.
    #[default]
    InMemory,
    /// Read records one at a time, keeping only requested channels.
    /// Not supported by this reader.
    Incremental,
}

/// Raw read parameters as a caller (or a JSON request file) supplies them.
///
/// Channels are 0-indexed. An empty list selects every channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadArgs {
    pub file_path: Option<PathBuf>,
    pub start_sample: Option<i64>,
    pub sample_count: Option<i64>,
    pub channels: Vec<i64>,
    pub load_mode: LoadMode,
}

impl ReadArgs {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn start(mut self, start_sample: i64) -> Self {
        self.start_sample = Some(start_sample);
        self
    }

    pub fn count(mut self, sample_count: i64) -> Self {
        self.sample_count = Some(sample_count);
        self
    }

    pub fn channels<I: IntoIterator<Item = i64>>(mut self, channels: I) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    pub fn load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn request(&self) -> ReadRequest {
        ReadRequest {
            start_sample: self.start_sample.unwrap_or(DEFAULT_START_SAMPLE),
            sample_count: self.sample_count.unwrap_or(READ_TO_END),
            channels: self.channels.clone(),
            load_mode: self.load_mode,
        }
    }
}

/// The sample window and channel selection, before checking against a header.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub start_sample: i64,
    pub sample_count: i64,
    pub channels: Vec<i64>,
    pub load_mode: LoadMode,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self {
            start_sample: DEFAULT_START_SAMPLE,
            sample_count: READ_TO_END,
            channels: Vec::new(),
            load_mode: LoadMode::InMemory,
        }
    }
}

/// A request checked against the header: every field is in range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub start_sample: u64,
    pub sample_count: u64,
    pub channels: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to read; return the header alone.
    HeaderOnly,
    Window(ResolvedWindow),
}

/// Normalizes `request` against `header`, pushing any clamp notice onto `notices`.
pub fn resolve(
    request: &ReadRequest,
    header: &FileHeader,
    notices: &mut Vec<ReadNotice>,
) -> Result<Resolution> {
    if request.load_mode == LoadMode::Incremental {
        return Err(SioError::NotImplemented("incremental loading"));
    }

    let start_sample = request.start_sample.max(1) as u64;
    let max_available = (header.samples_per_channel as u64 + 1).saturating_sub(start_sample);

    let sample_count = if request.sample_count < 0 {
        max_available
    } else {
        request.sample_count as u64
    };
    if sample_count == 0 {
        return Ok(Resolution::HeaderOnly);
    }

    let sample_count = if sample_count > max_available {
        warn!(
            "More samples requested than present in data file ({} > {}), returning {}",
            sample_count, max_available, max_available
        );
        notices.push(ReadNotice::SampleCountClamped {
            requested: sample_count,
            available: max_available,
        });
        max_available
    } else {
        sample_count
    };
    if sample_count == 0 {
        return Ok(Resolution::HeaderOnly);
    }

    let channels = resolve_channels(&request.channels, header.channel_count)?;

    Ok(Resolution::Window(ResolvedWindow {
        start_sample,
        sample_count,
        channels,
    }))
}

fn resolve_channels(requested: &[i64], channel_count: u32) -> Result<Vec<u32>> {
    if requested.is_empty() {
        return Ok((0..channel_count).collect());
    }

    requested
        .iter()
        .map(|&c| {
            if c < 0 || c >= channel_count as i64 {
                Err(SioError::ChannelOutOfRange {
                    channel: c,
                    max: channel_count - 1,
                })
            } else {
                Ok(c as u32)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{SampleFormat, BYTE_SWAP_MAGIC};
    use crate::core::endian::Endianness;

    fn header(channel_count: u32, samples_per_channel: u32) -> FileHeader {
        FileHeader {
            id: 0,
            record_count: channel_count * 4,
            bytes_per_record: 128,
            channel_count,
            bytes_per_sample: 4,
            is_real: true,
            samples_per_channel,
            byte_swap_magic: BYTE_SWAP_MAGIC,
            file_label: String::new(),
            comment: String::new(),
            endianness: Endianness::Little,
            records_per_channel: 4,
            samples_per_record: 32,
            sample_format: SampleFormat::Float32,
        }
    }

    fn window(resolution: Resolution) -> ResolvedWindow {
        match resolution {
            Resolution::Window(w) => w,
            Resolution::HeaderOnly => panic!("expected a sample window"),
        }
    }

    #[test]
    fn test_defaults_read_everything() {
        let mut notices = Vec::new();
        let w = window(resolve(&ReadRequest::default(), &header(3, 128), &mut notices).unwrap());
        assert_eq!(w.start_sample, 1);
        assert_eq!(w.sample_count, 128);
        assert_eq!(w.channels, vec![0, 1, 2]);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_start_below_one_is_clamped() {
        let req = ReadRequest { start_sample: -5, ..ReadRequest::default() };
        let w = window(resolve(&req, &header(1, 100), &mut Vec::new()).unwrap());
        assert_eq!(w.start_sample, 1);
        assert_eq!(w.sample_count, 100);
    }

    #[test]
    fn test_oversized_count_clamps_with_notice() {
        let req = ReadRequest { start_sample: 91, sample_count: 50, ..ReadRequest::default() };
        let mut notices = Vec::new();
        let w = window(resolve(&req, &header(1, 100), &mut notices).unwrap());
        assert_eq!(w.sample_count, 10);
        assert_eq!(
            notices,
            vec![ReadNotice::SampleCountClamped { requested: 50, available: 10 }]
        );
    }

    #[test]
    fn test_zero_count_is_header_only() {
        let req = ReadRequest { sample_count: 0, ..ReadRequest::default() };
        assert_eq!(resolve(&req, &header(2, 10), &mut Vec::new()).unwrap(), Resolution::HeaderOnly);
    }

    #[test]
    fn test_start_past_end_never_goes_negative() {
        let req = ReadRequest { start_sample: 500, ..ReadRequest::default() };
        assert_eq!(resolve(&req, &header(2, 100), &mut Vec::new()).unwrap(), Resolution::HeaderOnly);

        let req = ReadRequest { start_sample: 500, sample_count: 10, ..ReadRequest::default() };
        let mut notices = Vec::new();
        assert_eq!(resolve(&req, &header(2, 100), &mut notices).unwrap(), Resolution::HeaderOnly);
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_channel_order_is_preserved() {
        let req = ReadRequest { channels: vec![2, 0], ..ReadRequest::default() };
        let w = window(resolve(&req, &header(3, 10), &mut Vec::new()).unwrap());
        assert_eq!(w.channels, vec![2, 0]);
    }

    #[test]
    fn test_channel_out_of_range() {
        let req = ReadRequest { channels: vec![0, 3], ..ReadRequest::default() };
        let err = resolve(&req, &header(3, 10), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SioError::ChannelOutOfRange { channel: 3, max: 2 }));
        assert!(err.to_string().contains("0 to 2"));

        let req = ReadRequest { channels: vec![-1], ..ReadRequest::default() };
        let err = resolve(&req, &header(3, 10), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SioError::ChannelOutOfRange { channel: -1, .. }));
    }

    #[test]
    fn test_incremental_mode_is_rejected() {
        let req = ReadRequest { load_mode: LoadMode::Incremental, ..ReadRequest::default() };
        let err = resolve(&req, &header(1, 10), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SioError::NotImplemented(_)));
    }

    #[test]
    fn test_args_from_json() {
        let args = ReadArgs::from_json(
            r#"{"file_path": "run.sio", "start_sample": 5, "channels": [1, 2], "load_mode": "in_memory"}"#,
        )
        .unwrap();
        assert_eq!(args.file_path.as_deref(), Some(std::path::Path::new("run.sio")));
        let req = args.request();
        assert_eq!(req.start_sample, 5);
        assert_eq!(req.sample_count, READ_TO_END);
        assert_eq!(req.channels, vec![1, 2]);
    }
}
