//! Export policy: per-format encoder parameter sets.
//!
//! These structs describe *what* to encode with, not *how* to encode. They
//! are the interface between the [`Encoder`](crate::encoder::Encoder) facade
//! (which decides what to export) and the engine (which does the actual
//! encoding). The fixed knob values were chosen empirically for the best
//! size/quality balance and do not vary by call — only the quality slot does.
//!
//! | Format | Fixed knobs | Quality slot |
//! |---|---|---|
//! | JPEG | interlace, optimize coding, trellis quant, overshoot deringing, optimize scans, quant table 3 | variable |
//! | PNG | compression 9, filter none, no interlace, palette, bit depth 8 | palette quantization only |
//! | GIF | effort 7, bit depth 8 | variable |
//! | WEBP | reduction effort 4 | variable; 100 selects lossless mode |
//!
//! Metadata is stripped for every format.

use crate::format::Format;

/// Quality setting for lossy image encoding (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Resolve the user-settable compress quality.
    ///
    /// `None` means "use the compress default" (65, not subject to clamping).
    /// A supplied 0 clamps to 35 and anything above 99 clamps to 100, so an
    /// explicit out-of-range request still produces a usable encode.
    pub fn for_compress(value: Option<u32>) -> Self {
        match value {
            None => Self(65),
            Some(0) => Self(35),
            Some(q) if q > 99 => Self(100),
            Some(q) => Self(q),
        }
    }
}

impl Default for Quality {
    /// Default export quality for the direct `to_*` conversions.
    fn default() -> Self {
        Self(75)
    }
}

/// JPEG encoder knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegParams {
    pub quality: Quality,
    pub strip_metadata: bool,
    /// Progressive encoding. Better browser experience and usually smaller.
    pub interlace: bool,
    pub optimize_coding: bool,
    /// Trellis quantization of each 8x8 block. Smaller files, slower encode.
    pub trellis_quant: bool,
    /// Overshoot samples with extreme values to reduce ringing artifacts.
    pub overshoot_deringing: bool,
    /// Split DCT coefficient spectra into separate scans.
    pub optimize_scans: bool,
    /// Quantization table index (0-8).
    pub quant_table: u8,
}

impl Default for JpegParams {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            strip_metadata: true,
            interlace: true,
            optimize_coding: true,
            trellis_quant: true,
            overshoot_deringing: true,
            optimize_scans: true,
            quant_table: 3,
        }
    }
}

/// PNG filter strategy applied before deflate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngFilter {
    None,
    Sub,
    Up,
    Average,
    Paeth,
}

/// PNG encoder knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngParams {
    /// Only affects palette quantization; the pixel data itself is lossless.
    pub quality: Quality,
    pub strip_metadata: bool,
    /// Deflate level (0-9).
    pub compression: u8,
    pub filter: PngFilter,
    /// Interlacing grows the file; off for size-constrained output.
    pub interlace: bool,
    /// Palette mode. Large size win on most web imagery.
    pub palette: bool,
    pub bit_depth: u8,
}

impl Default for PngParams {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            strip_metadata: true,
            compression: 9,
            filter: PngFilter::None,
            interlace: false,
            palette: true,
            bit_depth: 8,
        }
    }
}

/// GIF encoder knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifParams {
    pub quality: Quality,
    pub strip_metadata: bool,
    /// CPU effort (1-10); higher is smaller and slower.
    pub effort: u8,
    pub bit_depth: u8,
}

impl Default for GifParams {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            strip_metadata: true,
            effort: 7,
            bit_depth: 8,
        }
    }
}

/// WEBP encoder knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebpParams {
    pub quality: Quality,
    pub strip_metadata: bool,
    /// When set, the lossy quality and reduction-effort knobs are ignored.
    pub lossless: bool,
    /// Lossy size/speed trade-off (0-6).
    pub reduction_effort: u8,
}

impl Default for WebpParams {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            strip_metadata: true,
            lossless: false,
            reduction_effort: 4,
        }
    }
}

impl WebpParams {
    /// The lossless branch, selected by the export policy at quality 100.
    pub fn lossless() -> Self {
        Self {
            quality: Quality::new(100),
            lossless: true,
            ..Self::default()
        }
    }
}

/// A complete parameter set for one export operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportParams {
    Jpeg(JpegParams),
    Png(PngParams),
    Gif(GifParams),
    Webp(WebpParams),
}

impl ExportParams {
    /// Build the parameter set for `format` at `quality`.
    ///
    /// All knobs other than the quality slot come from the fixed policy
    /// table. WEBP at quality 100 selects the lossless branch.
    pub fn for_format(format: Format, quality: Quality) -> Self {
        match format {
            Format::Jpeg => ExportParams::Jpeg(JpegParams {
                quality,
                ..JpegParams::default()
            }),
            Format::Png => ExportParams::Png(PngParams {
                quality,
                ..PngParams::default()
            }),
            Format::Gif => ExportParams::Gif(GifParams {
                quality,
                ..GifParams::default()
            }),
            Format::Webp => {
                if quality.value() == 100 {
                    ExportParams::Webp(WebpParams::lossless())
                } else {
                    ExportParams::Webp(WebpParams {
                        quality,
                        ..WebpParams::default()
                    })
                }
            }
        }
    }

    /// The container format these parameters encode to.
    pub fn format(&self) -> Format {
        match self {
            ExportParams::Jpeg(_) => Format::Jpeg,
            ExportParams::Png(_) => Format::Png,
            ExportParams::Gif(_) => Format::Gif,
            ExportParams::Webp(_) => Format::Webp,
        }
    }

    /// The quality slot of this parameter set.
    pub fn quality(&self) -> Quality {
        match self {
            ExportParams::Jpeg(p) => p.quality,
            ExportParams::Png(p) => p.quality,
            ExportParams::Gif(p) => p.quality,
            ExportParams::Webp(p) => p.quality,
        }
    }
}
