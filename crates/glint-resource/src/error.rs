use thiserror::Error;

/// Configuration errors from resource setters. Structural problems are
/// reported before any device command goes out; the handle's tracked state
/// is left unchanged by a failed call.
#[derive(Debug, Error, PartialEq)]
pub enum ResourceError {
    #[error("buffer write out of bounds (buffer size {len}, write end {end})")]
    UploadOutOfBounds { len: u64, end: u64 },
    #[error("texture size {width}x{height} exceeds device limit {limit}")]
    TextureTooLarge {
        width: u32,
        height: u32,
        limit: u32,
    },
    #[error("anisotropy level {level} is below the minimum of 1.0")]
    InvalidAnisotropy { level: f32 },
    #[error("renderbuffer size {width}x{height} exceeds device limit {limit}")]
    RenderbufferTooLarge {
        width: u32,
        height: u32,
        limit: u32,
    },
}
