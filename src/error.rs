//! Crate-wide error type.
//!
//! Every public operation returns one of four error kinds. Nothing is retried
//! internally and no operation returns partial output: an export either yields
//! complete encoded bytes or an error.

use crate::engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes could not be decoded (malformed or truncated data, or
    /// a failure inside the engine).
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),

    /// The decoded format is not one of JPEG, PNG, GIF or WEBP.
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// A resize was requested with both width and height unset.
    #[error("invalid resize dimensions: width and height are both unset")]
    InvalidDimensions,

    /// The engine failed while producing encoded output.
    #[error("failed to encode image: {0}")]
    EncodeFailed(String),
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Decode(msg) => Error::DecodeFailed(msg),
            EngineError::Encode(msg) => Error::EncodeFailed(msg),
            // Startup failures surface from engine construction, which the
            // encoder never performs; mapped for totality.
            EngineError::Startup(msg) => Error::EncodeFailed(msg),
        }
    }
}
