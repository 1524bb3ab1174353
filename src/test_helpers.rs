//! In-memory image fixtures shared by the test suites.
//!
//! Every helper returns encoded bytes rather than writing a file, so engine
//! and facade tests can decode straight from memory. The pixel pattern is a
//! simple coordinate gradient; exact values never matter, only geometry and
//! frame count.

use image::codecs::gif::GifEncoder;
use image::{Delay, ExtendedColorType, Frame, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encoded JPEG with the given dimensions.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Encoded PNG with the given dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Encoded BMP with the given dimensions. Decodable but outside the
/// supported output formats, so facade loads must reject it.
pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = std::io::Cursor::new(Vec::new());
    image::codecs::bmp::BmpEncoder::new(&mut out)
        .encode(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out.into_inner()
}

/// Encoded multi-frame GIF: `frames` frames of `width`x`height`, each a
/// different tint so frames differ.
pub fn animated_gif_bytes(width: u32, height: u32, frames: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        for i in 0..frames {
            let tint = ((i * 60) % 256) as u8;
            let buf = RgbaImage::from_fn(width, height, |x, y| {
                Rgba([tint, (x % 256) as u8, (y % 256) as u8, 255])
            });
            let frame = Frame::from_parts(buf, 0, 0, Delay::from_numer_denom_ms(100, 1));
            encoder.encode_frame(frame).unwrap();
        }
    }
    out
}

/// Encoded lossless WEBP with the given dimensions.
pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::webp::WebPEncoder::new_lossless(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}
