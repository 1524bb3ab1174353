//! Pure Rust image engine — zero external dependencies.
//!
//! Everything is statically linked into the binary: no ImageMagick, no
//! system codec packages.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::guess_format` |
//! | Decode (JPEG, PNG, WebP, BMP, TIFF) | `image` crate (pure Rust decoders) |
//! | Decode (GIF, animated) | `image::codecs::gif::GifDecoder` + `AnimationDecoder` |
//! | Resize | `image::imageops::resize` with `Lanczos3`, frames in parallel on a rayon pool |
//! | Encode → JPEG | `JpegEncoder` (quality slot) |
//! | Encode → PNG | `PngEncoder` (compression level + filter mapped) |
//! | Encode → GIF | `GifEncoder` (effort mapped to speed; frames and delays preserved) |
//! | Encode → WEBP | `WebPEncoder`, lossless, first frame only |
//!
//! The export parameter structs are the policy contract; this engine maps
//! what the pure-Rust encoders expose and treats the rest as advisory:
//! JPEG progressive/trellis knobs, PNG palette mode and the WEBP lossy
//! quality have no `image`-crate equivalent (WEBP output is always
//! lossless). Metadata stripping is inherent — these encoders write none.
//! Decoding is strict: malformed input fails regardless of
//! `DecodeOptions::fail_on_error`.

use crate::engine::{DecodeOptions, EngineError, EngineImage, FitMode, ImageEngine, PageLimit};
use crate::format::SourceFormat;
use crate::params::{ExportParams, PngFilter};
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, DynamicImage, ExtendedColorType, Frame, ImageEncoder, ImageFormat};
use rayon::prelude::*;
use std::io::Cursor;
use std::sync::Arc;

/// Process-wide engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Worker threads for the engine's internal frame parallelism.
    pub concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Pure Rust engine using the `image` crate ecosystem.
///
/// Owns a dedicated rayon pool sized by [`EngineConfig::concurrency`];
/// building the engine is the startup step and dropping it the shutdown.
/// Create one per process and share it by reference — `&RustEngine` is
/// itself an [`ImageEngine`].
pub struct RustEngine {
    pool: Arc<rayon::ThreadPool>,
}

impl RustEngine {
    /// Engine with the default configuration.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.concurrency.max(1))
            .build()
            .map_err(|e| EngineError::Startup(e.to_string()))?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

/// A decoded image: one RGBA frame per page.
///
/// Invariant: at least one frame, all frames the same size.
pub struct Raster {
    frames: Vec<Frame>,
    pool: Arc<rayon::ThreadPool>,
}

impl ImageEngine for RustEngine {
    type Image = Raster;

    fn decode(
        &self,
        data: &[u8],
        opts: &DecodeOptions,
    ) -> Result<(Raster, SourceFormat), EngineError> {
        let guessed = image::guess_format(data)
            .map_err(|_| EngineError::Decode("unrecognized image signature".to_string()))?;

        let frames = match guessed {
            ImageFormat::Gif => decode_gif(data, opts.page_limit)?,
            other => {
                let img = image::load_from_memory_with_format(data, other)
                    .map_err(|e| EngineError::Decode(e.to_string()))?;
                vec![Frame::new(img.to_rgba8())]
            }
        };

        if frames.is_empty() {
            return Err(EngineError::Decode("image contains no frames".to_string()));
        }

        Ok((
            Raster {
                frames,
                pool: Arc::clone(&self.pool),
            },
            source_tag(guessed),
        ))
    }
}

fn decode_gif(data: &[u8], limit: PageLimit) -> Result<Vec<Frame>, EngineError> {
    let decoder =
        GifDecoder::new(Cursor::new(data)).map_err(|e| EngineError::Decode(e.to_string()))?;
    let frames = decoder.into_frames();
    match limit {
        PageLimit::All => frames.collect_frames(),
        PageLimit::First => frames.take(1).collect(),
    }
    .map_err(|e| EngineError::Decode(e.to_string()))
}

fn source_tag(format: ImageFormat) -> SourceFormat {
    match format {
        ImageFormat::Jpeg => SourceFormat::Jpeg,
        ImageFormat::Png => SourceFormat::Png,
        ImageFormat::Gif => SourceFormat::Gif,
        ImageFormat::WebP => SourceFormat::Webp,
        ImageFormat::Bmp => SourceFormat::Bmp,
        ImageFormat::Tiff => SourceFormat::Tiff,
        _ => SourceFormat::Unknown,
    }
}

impl EngineImage for Raster {
    fn width(&self) -> u32 {
        self.frames[0].buffer().width()
    }

    fn page_height(&self) -> u32 {
        self.frames[0].buffer().height()
    }

    fn pages(&self) -> u32 {
        self.frames.len() as u32
    }

    fn try_clone(&self) -> Result<Self, EngineError> {
        Ok(Self {
            frames: self.frames.clone(),
            pool: Arc::clone(&self.pool),
        })
    }

    fn thumbnail(&mut self, width: u32, height: u32, mode: FitMode) -> Result<(), EngineError> {
        // `height` is page-summed; each frame is resized to its share.
        let frame_height = (height / self.pages().max(1)).max(1);
        let (src_w, src_h) = (self.width(), self.page_height());

        let (target_w, target_h) = match mode {
            FitMode::Force => (width.max(1), frame_height),
            FitMode::ShrinkOnly => {
                let scale = f64::min(
                    width as f64 / src_w as f64,
                    frame_height as f64 / src_h as f64,
                )
                .min(1.0);
                (
                    ((src_w as f64 * scale).round() as u32).max(1),
                    ((src_h as f64 * scale).round() as u32).max(1),
                )
            }
        };

        if (target_w, target_h) == (src_w, src_h) {
            return Ok(());
        }

        let pool = Arc::clone(&self.pool);
        pool.install(|| {
            self.frames.par_iter_mut().for_each(|frame| {
                let resized = imageops::resize(frame.buffer(), target_w, target_h, FilterType::Lanczos3);
                *frame = Frame::from_parts(resized, 0, 0, frame.delay());
            });
        });

        Ok(())
    }

    fn export(&self, params: &ExportParams) -> Result<Vec<u8>, EngineError> {
        let mut buf = Vec::new();

        match params {
            ExportParams::Jpeg(p) => {
                let rgb = DynamicImage::ImageRgba8(self.frames[0].buffer().clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut buf, p.quality.value() as u8)
                    .write_image(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(encode_err)?;
            }
            ExportParams::Png(p) => {
                let frame = self.frames[0].buffer();
                PngEncoder::new_with_quality(
                    &mut buf,
                    png_compression(p.compression),
                    png_filter(p.filter),
                )
                .write_image(
                    frame.as_raw(),
                    frame.width(),
                    frame.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(encode_err)?;
            }
            ExportParams::Gif(p) => {
                let mut encoder = GifEncoder::new_with_speed(&mut buf, gif_speed(p.effort));
                if self.frames.len() > 1 {
                    encoder.set_repeat(Repeat::Infinite).map_err(encode_err)?;
                }
                encoder
                    .encode_frames(self.frames.iter().cloned())
                    .map_err(encode_err)?;
            }
            // The pure-Rust webp encoder is lossless only and writes a
            // single frame; the lossy quality and reduction-effort slots are
            // advisory here. Callers reduce animated sources to one page
            // before requesting a WEBP export.
            ExportParams::Webp(_) => {
                let frame = self.frames[0].buffer();
                WebPEncoder::new_lossless(&mut buf)
                    .write_image(
                        frame.as_raw(),
                        frame.width(),
                        frame.height(),
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(encode_err)?;
            }
        }

        Ok(buf)
    }
}

fn encode_err(err: image::ImageError) -> EngineError {
    EngineError::Encode(err.to_string())
}

/// Deflate level 0-9 → the three compression presets the encoder exposes.
fn png_compression(level: u8) -> CompressionType {
    match level {
        0..=3 => CompressionType::Fast,
        4..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

fn png_filter(filter: PngFilter) -> PngFilterType {
    match filter {
        PngFilter::None => PngFilterType::NoFilter,
        PngFilter::Sub => PngFilterType::Sub,
        PngFilter::Up => PngFilterType::Up,
        PngFilter::Average => PngFilterType::Avg,
        PngFilter::Paeth => PngFilterType::Paeth,
    }
}

/// GIF effort 1-10 (higher = smaller, slower) → encoder speed 1-30
/// (lower = smaller, slower).
fn gif_speed(effort: u8) -> i32 {
    (31 - 3 * effort as i32).clamp(1, 30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Quality;
    use crate::test_helpers::{animated_gif_bytes, bmp_bytes, jpeg_bytes, png_bytes};

    fn engine() -> RustEngine {
        RustEngine::with_config(EngineConfig { concurrency: 2 }).unwrap()
    }

    fn decode(engine: &RustEngine, data: &[u8]) -> (Raster, SourceFormat) {
        engine.decode(data, &DecodeOptions::default()).unwrap()
    }

    // =========================================================================
    // Decode tests
    // =========================================================================

    #[test]
    fn decode_jpeg_reports_tag_and_dimensions() {
        let engine = engine();
        let (image, tag) = decode(&engine, &jpeg_bytes(200, 150));
        assert_eq!(tag, SourceFormat::Jpeg);
        assert_eq!(image.width(), 200);
        assert_eq!(image.page_height(), 150);
        assert_eq!(image.pages(), 1);
    }

    #[test]
    fn decode_png_reports_tag() {
        let engine = engine();
        let (_, tag) = decode(&engine, &png_bytes(64, 48));
        assert_eq!(tag, SourceFormat::Png);
    }

    #[test]
    fn decode_webp_reports_tag() {
        let engine = engine();
        let (image, tag) = decode(&engine, &crate::test_helpers::webp_bytes(64, 48));
        assert_eq!(tag, SourceFormat::Webp);
        assert_eq!(image.width(), 64);
        assert_eq!(image.page_height(), 48);
    }

    #[test]
    fn decode_bmp_reports_bmp_tag() {
        let engine = engine();
        let (image, tag) = decode(&engine, &bmp_bytes(32, 32));
        assert_eq!(tag, SourceFormat::Bmp);
        assert_eq!(image.width(), 32);
    }

    #[test]
    fn decode_animated_gif_counts_pages() {
        let engine = engine();
        let (image, tag) = decode(&engine, &animated_gif_bytes(40, 30, 3));
        assert_eq!(tag, SourceFormat::Gif);
        assert_eq!(image.pages(), 3);
        assert_eq!(image.page_height(), 30);
    }

    #[test]
    fn decode_first_page_only() {
        let engine = engine();
        let opts = DecodeOptions {
            page_limit: PageLimit::First,
            ..DecodeOptions::default()
        };
        let (image, _) = engine
            .decode(&animated_gif_bytes(40, 30, 3), &opts)
            .unwrap();
        assert_eq!(image.pages(), 1);
    }

    #[test]
    fn decode_garbage_fails() {
        let engine = engine();
        let result = engine.decode(b"definitely not an image", &DecodeOptions::default());
        assert!(matches!(result, Err(EngineError::Decode(_))));
    }

    #[test]
    fn decode_truncated_jpeg_fails() {
        let engine = engine();
        let mut data = jpeg_bytes(200, 150);
        data.truncate(data.len() / 4);
        let result = engine.decode(&data, &DecodeOptions::default());
        assert!(matches!(result, Err(EngineError::Decode(_))));
    }

    // =========================================================================
    // Thumbnail tests
    // =========================================================================

    #[test]
    fn thumbnail_force_hits_exact_target() {
        let engine = engine();
        let (mut image, _) = decode(&engine, &png_bytes(200, 100));
        image.thumbnail(50, 80, FitMode::Force).unwrap();
        assert_eq!((image.width(), image.page_height()), (50, 80));
    }

    #[test]
    fn thumbnail_shrink_only_never_enlarges() {
        let engine = engine();
        let (mut image, _) = decode(&engine, &png_bytes(100, 50));
        image.thumbnail(400, 400, FitMode::ShrinkOnly).unwrap();
        assert_eq!((image.width(), image.page_height()), (100, 50));
    }

    #[test]
    fn thumbnail_shrink_only_preserves_aspect() {
        let engine = engine();
        let (mut image, _) = decode(&engine, &png_bytes(400, 200));
        image.thumbnail(100, 100, FitMode::ShrinkOnly).unwrap();
        assert_eq!((image.width(), image.page_height()), (100, 50));
    }

    #[test]
    fn thumbnail_resizes_every_frame() {
        let engine = engine();
        let (mut image, _) = decode(&engine, &animated_gif_bytes(40, 30, 3));
        // Page-summed height: 3 frames of 10px each.
        image.thumbnail(20, 30, FitMode::Force).unwrap();
        assert_eq!(image.pages(), 3);
        assert_eq!((image.width(), image.page_height()), (20, 10));
    }

    // =========================================================================
    // Export tests
    // =========================================================================

    #[test]
    fn export_jpeg_roundtrips() {
        let engine = engine();
        let (image, _) = decode(&engine, &png_bytes(64, 48));
        let bytes = image
            .export(&ExportParams::for_format(
                crate::format::Format::Jpeg,
                Quality::default(),
            ))
            .unwrap();
        let (decoded, tag) = decode(&engine, &bytes);
        assert_eq!(tag, SourceFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.page_height()), (64, 48));
    }

    #[test]
    fn export_png_roundtrips() {
        let engine = engine();
        let (image, _) = decode(&engine, &jpeg_bytes(64, 48));
        let bytes = image
            .export(&ExportParams::for_format(
                crate::format::Format::Png,
                Quality::default(),
            ))
            .unwrap();
        let (_, tag) = decode(&engine, &bytes);
        assert_eq!(tag, SourceFormat::Png);
    }

    #[test]
    fn export_webp_lossless_preserves_dimensions() {
        let engine = engine();
        let (image, _) = decode(&engine, &png_bytes(100, 100));
        let bytes = image
            .export(&ExportParams::for_format(
                crate::format::Format::Webp,
                Quality::new(100),
            ))
            .unwrap();
        let (decoded, tag) = decode(&engine, &bytes);
        assert_eq!(tag, SourceFormat::Webp);
        assert_eq!((decoded.width(), decoded.page_height()), (100, 100));
        assert_eq!(decoded.pages(), 1);
    }

    #[test]
    fn export_gif_keeps_all_frames() {
        let engine = engine();
        let (image, _) = decode(&engine, &animated_gif_bytes(40, 30, 3));
        let bytes = image
            .export(&ExportParams::for_format(
                crate::format::Format::Gif,
                Quality::default(),
            ))
            .unwrap();
        let (decoded, tag) = decode(&engine, &bytes);
        assert_eq!(tag, SourceFormat::Gif);
        assert_eq!(decoded.pages(), 3);
    }

    #[test]
    fn clone_is_independent() {
        let engine = engine();
        let (image, _) = decode(&engine, &png_bytes(100, 100));
        let mut copy = image.try_clone().unwrap();
        copy.thumbnail(10, 10, FitMode::Force).unwrap();
        assert_eq!((image.width(), image.page_height()), (100, 100));
        assert_eq!((copy.width(), copy.page_height()), (10, 10));
    }

    // =========================================================================
    // Mapping helpers
    // =========================================================================

    #[test]
    fn gif_speed_mapping() {
        assert_eq!(gif_speed(7), 10);
        assert_eq!(gif_speed(10), 1);
        assert_eq!(gif_speed(1), 28);
        assert_eq!(gif_speed(0), 30);
    }

    #[test]
    fn png_compression_mapping() {
        assert!(matches!(png_compression(9), CompressionType::Best));
        assert!(matches!(png_compression(5), CompressionType::Default));
        assert!(matches!(png_compression(1), CompressionType::Fast));
    }
}
