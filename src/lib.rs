//! # imgpress
//!
//! A convenience layer for image compression and conversion. One decode,
//! then any number of exports: shrink into a bounding box, force an exact
//! size, or re-encode across formats — JPEG, PNG, GIF (animated) and WEBP —
//! with sensible per-format encoder settings baked in.
//!
//! # Architecture: Policy / Engine Split
//!
//! Every decision about *what* to do is made in pure, engine-free code; the
//! engine only executes:
//!
//! ```text
//! sizing   geometry in   →  target geometry out     (pure math)
//! params   format + q    →  encoder settings        (pure tables)
//! encoder  facade        →  engine calls            (orchestration)
//! engine   traits        →  pixels                  (the only impure layer)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Testability**: sizing and export policy are unit-tested as plain
//!   functions, and the facade is tested against a recording mock engine —
//!   no pixels needed.
//! - **Swappability**: [`engine::ImageEngine`] is a trait; the stock
//!   [`rust_engine::RustEngine`] can be replaced without touching callers.
//! - **Auditability**: the per-format encoder knobs live in one table in
//!   [`params`], not scattered through encode paths.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`encoder`] | The public facade: load bytes, then convert, compress, or resize |
//! | [`sizing`] | Bounding-box and forced-fit target calculations, animation-aware |
//! | [`params`] | Quality clamping and fixed per-format encoder settings |
//! | [`format`] | Supported-format detection and rejection of everything else |
//! | [`engine`] | The engine contract: decode, geometry, thumbnail, export |
//! | [`rust_engine`] | Stock pure-Rust engine on the `image` crate |
//! | [`batch`] | Parallel directory compression with per-file reports |
//! | [`error`] | The crate-level error type |
//! | [`output`] | CLI display formatting |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Imaging
//!
//! The stock engine uses the `image` crate (Lanczos3 resampling) end to end.
//! No system libraries, no FFI: the binary is fully self-contained and works
//! the same on any machine. Encoder settings the pure-Rust codecs do not
//! expose are mapped best-effort; the mapping table is documented in
//! [`rust_engine`].
//!
//! ## Animation as Page-Summed Height
//!
//! A multi-frame GIF is treated as one tall image of `pages` stacked frames.
//! The facade reasons in per-frame geometry and multiplies by the frame
//! count exactly once, at the engine boundary. This keeps the sizing math
//! identical for static and animated sources.
//!
//! ## Closed Format Set
//!
//! Output formats are a four-variant enum, not strings. Anything the decoder
//! recognizes outside that set fails loudly at load time with
//! [`Error::UnsupportedFormat`], so later stages never see a format they
//! cannot encode.
//!
//! # Example
//!
//! ```no_run
//! use imgpress::{Encoder, RustEngine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RustEngine::new()?;
//! let data = std::fs::read("photo.jpg")?;
//! let encoder = Encoder::load(&engine, data)?;
//! let small = encoder.compress(1600, 1600, None)?;
//! std::fs::write("photo-small.jpg", small)?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod format;
pub mod output;
pub mod params;
pub mod rust_engine;
pub mod sizing;

pub use encoder::Encoder;
pub use engine::{DecodeOptions, EngineError, FitMode, ImageEngine, PageLimit};
pub use error::Error;
pub use format::Format;
pub use params::{ExportParams, Quality};
pub use rust_engine::{EngineConfig, RustEngine};

#[cfg(test)]
pub(crate) mod test_helpers;
