pub mod constants;
pub mod deinterleave;
pub mod endian;
pub mod error;
pub mod format;
pub mod reader;
pub mod request;
pub mod span;
