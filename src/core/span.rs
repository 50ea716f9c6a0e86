// Sample window -> on-disk record span

/// Records to read, in record slots from the start of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpan {
    pub first_record_index: u64,
    pub record_count_to_read: u64,
    /// Samples per channel read ahead of the requested start.
    pub lead_samples: u64,
}

impl RecordSpan {
    /// `None` if the offset does not fit in a u64.
    pub fn byte_offset(&self, bytes_per_record: u32) -> Option<u64> {
        self.first_record_index.checked_mul(bytes_per_record as u64)
    }

    pub fn sample_total(&self, samples_per_record: u32) -> Option<u64> {
        self.record_count_to_read.checked_mul(samples_per_record as u64)
    }

    pub fn records_per_channel(&self, channel_count: u32) -> u64 {
        self.record_count_to_read / channel_count as u64
    }
}

/// Channel owning the `record_index`-th data record (0-indexed, header excluded).
///
/// Data records cycle through channels: 0, 1, .., n-1, 0, 1, ..
pub fn channel_of_record(record_index: u64, channel_count: u32) -> u32 {
    (record_index % channel_count as u64) as u32
}

/// Indices, within a span of `span_records` data records, of the records
/// belonging to `channel`, in chronological order.
pub fn records_of_channel(
    channel: u32,
    span_records: u64,
    channel_count: u32,
) -> impl Iterator<Item = u64> {
    (channel as u64..span_records).step_by(channel_count as usize)
}

/// Whole channel cycles covering samples `start_sample ..= start_sample + sample_count - 1`.
///
/// `start_sample` is 1-indexed; `header_records` is the number of record
/// slots the file header occupies.
pub fn map_records(
    start_sample: u64,
    sample_count: u64,
    samples_per_record: u32,
    channel_count: u32,
    header_records: u64,
) -> RecordSpan {
    let spr = samples_per_record as u64;
    let nc = channel_count as u64;
    let first_cycle = (start_sample - 1) / spr;
    let lead_samples = (start_sample - 1) % spr;
    let cycles = (lead_samples + sample_count).div_ceil(spr);

    RecordSpan {
        first_record_index: first_cycle * nc + header_records,
        record_count_to_read: cycles * nc,
        lead_samples,
    }
}
