//! Image container formats.
//!
//! [`Format`] is the closed set of formats this crate will encode to. The
//! engine reports a broader [`SourceFormat`] tag after decode; anything
//! outside the four supported formats is rejected before an [`Encoder`]
//! is handed to the caller.
//!
//! [`Encoder`]: crate::encoder::Encoder

use crate::error::Error;

/// A supported image format. Detected at decode time; unrecognized formats
/// are a terminal error, not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl Format {
    /// Lowercase file extension without the leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            Format::Jpeg => "jpg",
            Format::Png => "png",
            Format::Gif => "gif",
            Format::Webp => "webp",
        }
    }

    /// Validate an engine-reported tag into a supported format.
    pub fn from_source(tag: SourceFormat) -> Result<Format, Error> {
        match tag {
            SourceFormat::Jpeg => Ok(Format::Jpeg),
            SourceFormat::Png => Ok(Format::Png),
            SourceFormat::Gif => Ok(Format::Gif),
            SourceFormat::Webp => Ok(Format::Webp),
            SourceFormat::Bmp | SourceFormat::Tiff | SourceFormat::Unknown => {
                Err(Error::UnsupportedFormat)
            }
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::Gif => "gif",
            Format::Webp => "webp",
        };
        f.write_str(name)
    }
}

/// Container format tag reported by the engine after a successful decode.
///
/// Wider than [`Format`]: the engine may well be able to decode a BMP or
/// TIFF stream, but those are rejected at the [`Encoder`] boundary.
///
/// [`Encoder`]: crate::encoder::Encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Tiff,
    Unknown,
}
