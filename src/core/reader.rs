// Main SIO reader implementation

use crate::core::deinterleave::{decode_samples, extract_channels};
use crate::core::endian::detect_endianness;
use crate::core::error::{Result, SioError};
use crate::core::format::*;
use crate::core::request::{resolve, ReadArgs, ReadRequest, Resolution, ResolvedWindow};
use crate::core::span::map_records;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An open SIO file with its decoded header.
///
/// Holds one file handle, released when the reader is dropped.
pub struct SioReader<R = File> {
    path: PathBuf,
    source: R,
    header: FileHeader,
}

impl SioReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        debug!("Opened {}", path.display());
        Self::from_source(path, file)
    }
}

impl<R: Read + Seek> SioReader<R> {
    /// Wraps any seekable source; `path` is used only for reporting.
    pub fn from_source(path: PathBuf, mut source: R) -> Result<Self> {
        let endian = detect_endianness(&mut source)?;
        let header = FileHeader::decode(&mut source, endian)?;
        Ok(Self {
            path,
            source,
            header,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_header(self) -> FileHeader {
        self.header
    }

    pub fn read(&mut self, request: &ReadRequest) -> Result<(SampleData, Vec<ReadNotice>)> {
        let mut notices = Vec::new();
        let data = match resolve(request, &self.header, &mut notices)? {
            Resolution::HeaderOnly => {
                debug!("No samples requested from {}", self.path.display());
                SampleData::Empty
            }
            Resolution::Window(window) => SampleData::Data(self.read_window(&window)?),
        };
        Ok((data, notices))
    }

    fn read_window(&mut self, window: &ResolvedWindow) -> Result<ndarray::Array2<f64>> {
        let h = &self.header;
        let span = map_records(
            window.start_sample,
            window.sample_count,
            h.samples_per_record,
            h.channel_count,
            h.header_records(),
        );
        debug!(
            "Record span: first={} count={} lead={}",
            span.first_record_index, span.record_count_to_read, span.lead_samples
        );

        let width = h.sample_format.width() as u64;
        let span_overflow =
            || SioError::CorruptHeader("record span exceeds addressable file size".to_string());
        let expected = span
            .sample_total(h.samples_per_record)
            .ok_or_else(span_overflow)?;
        let byte_len = expected.checked_mul(width).ok_or_else(span_overflow)?;
        let offset = span
            .byte_offset(h.bytes_per_record)
            .ok_or_else(span_overflow)?;

        // Header sizes are untrusted: check against the file before allocating
        let file_len = self.source.seek(SeekFrom::End(0))?;
        let available = file_len.saturating_sub(offset);
        if available < byte_len {
            return Err(SioError::TruncatedFile {
                expected,
                available: available / width,
            });
        }
        let byte_len = usize::try_from(byte_len).map_err(|_| span_overflow())?;

        self.source.seek(SeekFrom::Start(offset))?;
        let mut raw = vec![0u8; byte_len];
        self.source.read_exact(&mut raw)?;

        let samples = decode_samples(&raw, h.sample_format, h.endianness);

        let x = extract_channels(
            &samples,
            &span,
            h.samples_per_record,
            h.channel_count,
            &window.channels,
            window.sample_count,
        )?;

        info!(
            "Read {} samples x {} channels from {}",
            x.nrows(),
            x.ncols(),
            self.path.display()
        );
        Ok(x)
    }
}

/// Opens `args.file_path`, reads the requested window and returns it with the header.
pub fn sioread(args: &ReadArgs) -> Result<ReadOutput> {
    let path = args
        .file_path
        .as_ref()
        .ok_or(SioError::MissingArgument("file_path"))?;

    let mut reader = SioReader::open(path)?;
    let (data, notices) = reader.read(&args.request())?;

    Ok(ReadOutput {
        data,
        header: reader.into_header(),
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::BYTE_SWAP_MAGIC;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Cursor;

    // One channel, 4 records of 32 f32 samples each, sample i = i
    fn single_channel_file() -> Vec<u8> {
        let mut buf = Vec::new();
        for w in [1u32, 5, 128, 1, 4, 1, 128, BYTE_SWAP_MAGIC] {
            buf.write_u32::<LittleEndian>(w).unwrap();
        }
        buf.resize(128, 0);
        for i in 1..=128 {
            buf.write_f32::<LittleEndian>(i as f32).unwrap();
        }
        buf
    }

    #[test]
    fn test_read_from_cursor() {
        let mut reader =
            SioReader::from_source(PathBuf::from("mem"), Cursor::new(single_channel_file())).unwrap();
        assert_eq!(reader.header().samples_per_record, 32);

        let req = ReadRequest { start_sample: 40, sample_count: 3, ..ReadRequest::default() };
        let (data, notices) = reader.read(&req).unwrap();
        assert!(notices.is_empty());
        let col: Vec<f64> = data.column(0).unwrap().to_vec();
        assert_eq!(col, vec![40.0, 41.0, 42.0]);
    }

    #[test]
    fn test_reader_is_reusable() {
        let mut reader =
            SioReader::from_source(PathBuf::from("mem"), Cursor::new(single_channel_file())).unwrap();
        let (first, _) = reader.read(&ReadRequest::default()).unwrap();
        let (second, _) = reader.read(&ReadRequest::default()).unwrap();
        assert_eq!(first.shape(), (128, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_truncated_source() {
        let mut bytes = single_channel_file();
        bytes.truncate(128 + 100 * 4);
        let mut reader = SioReader::from_source(PathBuf::from("mem"), Cursor::new(bytes)).unwrap();
        let err = reader.read(&ReadRequest::default()).unwrap_err();
        assert!(matches!(
            err,
            SioError::TruncatedFile { expected: 128, available: 100 }
        ));
    }

    #[test]
    fn test_missing_path() {
        let err = sioread(&ReadArgs::default()).unwrap_err();
        assert!(matches!(err, SioError::MissingArgument("file_path")));
    }
}
