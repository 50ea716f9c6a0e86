// SIO Rust Reader
// Main library entry point

pub mod core;

// Re-export main types
pub use crate::core::constants::SampleFormat;
pub use crate::core::endian::Endianness;
pub use crate::core::error::{Result, SioError};
pub use crate::core::format::{FileHeader, ReadNotice, ReadOutput, SampleData};
pub use crate::core::reader::{sioread, SioReader};
pub use crate::core::request::{LoadMode, ReadArgs, ReadRequest};
pub use crate::core::span::{channel_of_record, map_records, RecordSpan};
