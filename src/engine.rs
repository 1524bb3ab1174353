//! Image engine trait and shared types.
//!
//! The [`ImageEngine`] trait is the seam between the policy/facade layers and
//! whatever actually pushes pixels. An engine decodes bytes into an
//! [`EngineImage`] — an owned, deep-copyable handle exposing geometry, an
//! in-place thumbnail operation, and parameterized export.
//!
//! The production implementation is
//! [`RustEngine`](crate::rust_engine::RustEngine) — pure Rust, zero external
//! dependencies, statically linked.
//!
//! A blanket `impl ImageEngine for &E` lets one engine instance be shared by
//! reference across many encoders (and across rayon workers) — engines are
//! created once per process and dropped once.

use crate::format::SourceFormat;
use crate::params::ExportParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("engine startup failed: {0}")]
    Startup(String),
}

/// How the engine fits an image to a thumbnail target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Fit inside the target box preserving aspect ratio, never enlarging.
    ShrinkOnly,
    /// Hit the literal target, ignoring the aspect ratio if necessary.
    Force,
}

/// How many pages of a multi-frame source to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    All,
    First,
}

/// Options for a decode operation.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Fail on malformed data instead of tolerating what can be read.
    /// Advisory: strict decoders always fail.
    pub fail_on_error: bool,
    pub page_limit: PageLimit,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            fail_on_error: false,
            page_limit: PageLimit::All,
        }
    }
}

/// An image-processing engine: decodes raw bytes into an owned image handle.
pub trait ImageEngine {
    type Image: EngineImage;

    /// Decode encoded bytes, reporting the container format alongside.
    fn decode(
        &self,
        data: &[u8],
        opts: &DecodeOptions,
    ) -> Result<(Self::Image, SourceFormat), EngineError>;
}

impl<E: ImageEngine> ImageEngine for &E {
    type Image = E::Image;

    fn decode(
        &self,
        data: &[u8],
        opts: &DecodeOptions,
    ) -> Result<(Self::Image, SourceFormat), EngineError> {
        (**self).decode(data, opts)
    }
}

/// A decoded image owned by an engine.
///
/// `height` arguments on [`thumbnail`](Self::thumbnail) are the page-summed
/// total: multi-frame images are resized per frame, and the engine addresses
/// their height as the sum of all frame heights.
pub trait EngineImage: Sized {
    /// Intrinsic width.
    fn width(&self) -> u32;

    /// Per-page height. For a static image this is the full height.
    fn page_height(&self) -> u32;

    /// Frame count; 1 for static images.
    fn pages(&self) -> u32;

    /// Deep copy. Non-mutating facade operations work on one of these so the
    /// caller's image is left untouched.
    fn try_clone(&self) -> Result<Self, EngineError>;

    /// Resize in place to the target, per [`FitMode`].
    fn thumbnail(&mut self, width: u32, height: u32, mode: FitMode) -> Result<(), EngineError>;

    /// Encode to bytes using a fixed parameter set. Never returns partial
    /// output.
    fn export(&self, params: &ExportParams) -> Result<Vec<u8>, EngineError>;
}
