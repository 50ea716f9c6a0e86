// Record-interleaved samples -> per-channel columns

use crate::core::constants::SampleFormat;
use crate::core::endian::Endianness;
use crate::core::error::{Result, SioError};
use crate::core::span::{records_of_channel, RecordSpan};
use ndarray::Array2;

pub fn decode_samples(raw: &[u8], format: SampleFormat, endian: Endianness) -> Vec<f64> {
    let chunks = raw.chunks_exact(format.width());
    match format {
        SampleFormat::Int16 => chunks.map(|b| endian.i16_from(b) as f64).collect(),
        SampleFormat::Float32 => chunks.map(|b| endian.f32_from(b) as f64).collect(),
    }
}

/// Builds the `(sample_count, channels.len())` matrix from the samples of a span.
///
/// `samples` holds the span's records back to back. Each requested channel's
/// records are concatenated in order, then the span's lead samples are dropped
/// and the tail cut to `sample_count`.
pub fn extract_channels(
    samples: &[f64],
    span: &RecordSpan,
    samples_per_record: u32,
    channel_count: u32,
    channels: &[u32],
    sample_count: u64,
) -> Result<Array2<f64>> {
    let spr = samples_per_record as usize;
    let column_len = span.records_per_channel(channel_count) as usize * spr;
    let lead = span.lead_samples as usize;
    let wanted = sample_count as usize;

    let available = column_len.saturating_sub(lead);
    if available < wanted {
        return Err(SioError::InsufficientSamples {
            requested: wanted,
            returned: available,
        });
    }

    let mut x = Array2::<f64>::zeros((wanted, channels.len()));
    for (col, &channel) in channels.iter().enumerate() {
        let column = records_of_channel(channel, span.record_count_to_read, channel_count)
            .flat_map(|k| {
                let at = k as usize * spr;
                samples[at..at + spr].iter().copied()
            })
            .skip(lead)
            .take(wanted);

        for (row, value) in column.enumerate() {
            x[[row, col]] = value;
        }
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::span::map_records;

    // Span of `cycles` channel cycles where channel c, sample i (1-based) = c*100 + i
    fn interleaved(channel_count: u32, spr: u32, cycles: u32) -> Vec<f64> {
        let mut out = Vec::new();
        for cycle in 0..cycles {
            for c in 0..channel_count {
                for s in 0..spr {
                    out.push((c * 100 + cycle * spr + s + 1) as f64);
                }
            }
        }
        out
    }

    #[test]
    fn test_decode_int16_and_float32() {
        let raw = [0x00, 0x02, 0xff, 0xfe];
        assert_eq!(decode_samples(&raw, SampleFormat::Int16, Endianness::Big), vec![2.0, -2.0]);

        let raw = 1.5f32.to_le_bytes();
        assert_eq!(decode_samples(&raw, SampleFormat::Float32, Endianness::Little), vec![1.5]);
    }

    #[test]
    fn test_full_cycles_in_requested_order() {
        let samples = interleaved(3, 4, 2);
        let span = map_records(1, 8, 4, 3, 1);
        let x = extract_channels(&samples, &span, 4, 3, &[2, 0], 8).unwrap();
        assert_eq!(x.dim(), (8, 2));
        assert_eq!(x[[0, 0]], 201.0);
        assert_eq!(x[[7, 0]], 208.0);
        assert_eq!(x[[0, 1]], 1.0);
        assert_eq!(x[[4, 1]], 5.0);
    }

    #[test]
    fn test_trims_lead_and_tail() {
        let samples = interleaved(2, 4, 2);
        let span = map_records(3, 4, 4, 2, 1);
        let x = extract_channels(&samples, &span, 4, 2, &[1], 4).unwrap();
        let col: Vec<f64> = x.column(0).to_vec();
        assert_eq!(col, vec![103.0, 104.0, 105.0, 106.0]);
    }

    #[test]
    fn test_short_span_is_insufficient() {
        let samples = interleaved(2, 4, 1);
        let span = RecordSpan {
            first_record_index: 1,
            record_count_to_read: 2,
            lead_samples: 2,
        };
        let err = extract_channels(&samples, &span, 4, 2, &[0], 4).unwrap_err();
        assert!(matches!(
            err,
            SioError::InsufficientSamples { requested: 4, returned: 2 }
        ));
    }
}
