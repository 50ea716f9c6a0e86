// Error handling for SIO reader

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SioError>;

#[derive(Error, Debug)]
pub enum SioError {
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    #[error("Unsupported sample width: {0} bytes per sample")]
    UnsupportedSampleWidth(u32),

    #[error("Channel #{channel} out of range: channel #s must be within range 0 to {max}")]
    ChannelOutOfRange { channel: i64, max: u32 },

    #[error("Truncated file: expected {expected} samples, only {available} present")]
    TruncatedFile { expected: u64, available: u64 },

    #[error("Requested {requested} samples but only {returned} were decoded")]
    InsufficientSamples { requested: usize, returned: usize },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Request parse error: {0}")]
    Json(#[from] serde_json::Error),
}
