//! The public `Encoder` facade.
//!
//! An [`Encoder`] wraps one decoded image, the detected [`Format`], and the
//! original source bytes (retained so a single-page re-decode is possible
//! when an animated source is exported to a single-frame format). It
//! combines the sizing policy ([`crate::sizing`]) with the export policy
//! ([`crate::params`]) and hands the results to the engine.
//!
//! Methods documented as non-mutating operate on a private deep copy of the
//! image; the encoder's own image is left untouched. No internal
//! synchronization is provided: share nothing, or serialize access to one
//! encoder externally. One engine, shared by reference, can back any number
//! of encoders.

use crate::engine::{DecodeOptions, EngineImage, FitMode, ImageEngine, PageLimit};
use crate::error::Error;
use crate::format::Format;
use crate::params::{ExportParams, Quality};
use crate::sizing::{self, ShrinkPlan, SizeRequest};

/// A decoded image plus everything needed to re-encode it.
pub struct Encoder<E: ImageEngine> {
    engine: E,
    image: E::Image,
    format: Format,
    data: Vec<u8>,
}

impl<E: ImageEngine> Encoder<E> {
    /// Decode `data`, keeping every page of a multi-frame source.
    ///
    /// Fails with [`Error::UnsupportedFormat`] if the decoded format is not
    /// JPEG, PNG, GIF or WEBP.
    pub fn load(engine: E, data: Vec<u8>) -> Result<Self, Error> {
        Self::load_with(engine, data, PageLimit::All)
    }

    /// Decode `data`, keeping only the first page.
    pub fn load_first_page(engine: E, data: Vec<u8>) -> Result<Self, Error> {
        Self::load_with(engine, data, PageLimit::First)
    }

    fn load_with(engine: E, data: Vec<u8>, page_limit: PageLimit) -> Result<Self, Error> {
        let opts = DecodeOptions {
            fail_on_error: false,
            page_limit,
        };
        let (image, tag) = engine.decode(&data, &opts)?;
        let format = Format::from_source(tag)?;
        Ok(Self {
            engine,
            image,
            format,
            data,
        })
    }

    /// Convert to PNG at the default quality. Non-mutating; an animated
    /// source contributes only its first frame.
    pub fn to_png(&self) -> Result<Vec<u8>, Error> {
        self.export_single_frame(Format::Png)
    }

    /// Convert to JPEG at the default quality. Non-mutating; an animated
    /// source contributes only its first frame.
    pub fn to_jpeg(&self) -> Result<Vec<u8>, Error> {
        self.export_single_frame(Format::Jpeg)
    }

    /// Convert to GIF at the default quality. Non-mutating; frames are kept.
    pub fn to_gif(&self) -> Result<Vec<u8>, Error> {
        self.export_current(Format::Gif)
    }

    /// Convert to WEBP at the default quality. Non-mutating; an animated
    /// source contributes only its first frame — WEBP is a single-frame
    /// target in this crate.
    pub fn to_webp(&self) -> Result<Vec<u8>, Error> {
        self.export_single_frame(Format::Webp)
    }

    /// Re-encode in the source's own format at the default quality — the
    /// best-quality re-encode this crate offers.
    ///
    /// Dispatch is total: the format was validated at decode time, so every
    /// variant has an encoder.
    pub fn lossless(&self) -> Result<Vec<u8>, Error> {
        match self.format {
            Format::Jpeg => self.to_jpeg(),
            Format::Png => self.to_png(),
            Format::Gif => self.to_gif(),
            Format::Webp => self.to_webp(),
        }
    }

    /// Compress within a bounding box, never upscaling. Non-mutating.
    ///
    /// `quality` of `None` uses the compress default (65); a supplied value
    /// is clamped per [`Quality::for_compress`]. The output stays in the
    /// source format; WEBP at quality 100 engages the lossless branch.
    pub fn compress(
        &self,
        max_width: u32,
        max_height: u32,
        quality: Option<u32>,
    ) -> Result<Vec<u8>, Error> {
        let quality = Quality::for_compress(quality);
        let mut image = self.image.try_clone()?;
        Self::shrink(&mut image, max_width, max_height)?;
        let params = ExportParams::for_format(self.format, quality);
        Ok(image.export(&params)?)
    }

    /// Smallest possible output: compress within the box and export as WEBP
    /// at fixed quality 35, whatever the source format. Non-mutating; an
    /// animated source contributes only its first frame.
    pub fn tiny(&self, max_width: u32, max_height: u32) -> Result<Vec<u8>, Error> {
        let mut image = self.first_page_copy()?;
        Self::shrink(&mut image, max_width, max_height)?;
        let params = ExportParams::for_format(Format::Webp, Quality::new(35));
        Ok(image.export(&params)?)
    }

    /// Resize to the literal target (forced fit) and return the bytes,
    /// encoded in the source format at the default quality. Non-mutating.
    ///
    /// An axis of 0 is derived from the source aspect ratio; both axes 0 is
    /// an [`Error::InvalidDimensions`].
    pub fn resize(&self, width: u32, height: u32) -> Result<Vec<u8>, Error> {
        let mut image = self.image.try_clone()?;
        Self::force_resize(&mut image, width, height)?;
        let params = ExportParams::for_format(self.format, Quality::default());
        Ok(image.export(&params)?)
    }

    /// Resize this encoder's own image and replace its stored byte buffer.
    ///
    /// The resize runs on a private copy and is committed together with the
    /// new bytes only on success, so a failed call leaves the encoder
    /// exactly as it was. Further geometry reads reflect whatever the engine
    /// left the image as; re-decode the buffer for exact guarantees.
    pub fn resize_in_place(&mut self, width: u32, height: u32) -> Result<(), Error> {
        let mut image = self.image.try_clone()?;
        Self::force_resize(&mut image, width, height)?;
        let params = ExportParams::for_format(self.format, Quality::default());
        let data = image.export(&params)?;
        self.image = image;
        self.data = data;
        Ok(())
    }

    /// Intrinsic width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Per-page height: for an animated source, the height of one frame.
    pub fn height(&self) -> u32 {
        self.image.page_height()
    }

    /// Frame count; 1 for static images.
    pub fn pages(&self) -> u32 {
        self.image.pages()
    }

    /// The detected source format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Lowercase file extension for the detected format, without the dot.
    pub fn suffix(&self) -> &'static str {
        self.format.suffix()
    }

    /// The retained byte buffer: the original source bytes, or the latest
    /// [`resize_in_place`](Self::resize_in_place) output.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Export in a single-frame format. An animated source is re-decoded
    /// from the retained bytes with a first-page limit so the output carries
    /// exactly one frame.
    fn export_single_frame(&self, format: Format) -> Result<Vec<u8>, Error> {
        let params = ExportParams::for_format(format, Quality::default());
        if self.image.pages() > 1 {
            let opts = DecodeOptions {
                fail_on_error: false,
                page_limit: PageLimit::First,
            };
            let (first, _) = self.engine.decode(&self.data, &opts)?;
            return Ok(first.export(&params)?);
        }
        Ok(self.image.export(&params)?)
    }

    /// Export the held image as-is, frames included.
    fn export_current(&self, format: Format) -> Result<Vec<u8>, Error> {
        let params = ExportParams::for_format(format, Quality::default());
        Ok(self.image.export(&params)?)
    }

    /// A copy of the held image reduced to its first page. Static sources
    /// are plain deep copies; animated sources re-decode from the retained
    /// bytes with a first-page limit.
    fn first_page_copy(&self) -> Result<E::Image, Error> {
        if self.image.pages() > 1 {
            let opts = DecodeOptions {
                fail_on_error: false,
                page_limit: PageLimit::First,
            };
            let (first, _) = self.engine.decode(&self.data, &opts)?;
            return Ok(first);
        }
        Ok(self.image.try_clone()?)
    }

    /// Shrink `image` in place per the bounding-box policy. A source already
    /// inside the box is left untouched.
    fn shrink(image: &mut E::Image, max_width: u32, max_height: u32) -> Result<(), Error> {
        let request = SizeRequest::new(max_width, max_height);
        match sizing::plan_shrink(image.width(), image.page_height(), request)? {
            ShrinkPlan::Keep => {}
            ShrinkPlan::Resize { width, height } => {
                // The plan is per-frame; the engine takes page-summed height.
                let pages = image.pages().max(1);
                let total = height
                    .checked_mul(pages)
                    .ok_or(Error::InvalidDimensions)?;
                image.thumbnail(width, total, FitMode::ShrinkOnly)?;
            }
        }
        Ok(())
    }

    fn force_resize(image: &mut E::Image, width: u32, height: u32) -> Result<(), Error> {
        let request = SizeRequest::new(width, height);
        let (target_w, target_h) = sizing::plan_exact(
            image.width(),
            image.page_height(),
            image.pages(),
            request,
        )?;
        image.thumbnail(target_w, target_h, FitMode::Force)?;
        Ok(())
    }
}
