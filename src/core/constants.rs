// Format constants for SIO files

// Byte-swap check value stored in the 8th header word
pub const BYTE_SWAP_MAGIC: u32 = 32677;
pub const BYTE_SWAP_OFFSET: u64 = 28;

// Header: 8 x u32 words, label(24), comment(72)
pub const HEADER_WORD_COUNT: usize = 8;
pub const LABEL_SIZE: usize = 24;
pub const COMMENT_SIZE: usize = 72;
pub const HEADER_SIZE: usize = HEADER_WORD_COUNT * 4 + LABEL_SIZE + COMMENT_SIZE; // 128 bytes

// Default when a request leaves the window open
pub const DEFAULT_START_SAMPLE: i64 = 1;
pub const READ_TO_END: i64 = -1;

/// On-disk sample encoding, selected by the header's bytes-per-sample word.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Int16 = 2,
    Float32 = 4,
}

impl SampleFormat {
    pub fn from_u32(val: u32) -> Option<Self> {
        match val {
            2 => Some(SampleFormat::Int16),
            4 => Some(SampleFormat::Float32),
            _ => None,
        }
    }

    pub fn width(self) -> usize {
        self as usize
    }
}
