//! Sizing policy: pure target-dimension math.
//!
//! All functions here are pure and testable without any images. Two policies
//! exist and are selected by call site:
//!
//! - [`plan_shrink`] — bounding box, never upscale. Used by the
//!   size-constrained compression paths. An image already inside the box is
//!   left alone.
//! - [`plan_exact`] — forced exact target. Used by the explicit resize
//!   operations, which must hit the literal requested box even at the cost
//!   of the aspect ratio.
//!
//! Both take the source *per-page* height. [`plan_exact`] returns the
//! engine-facing height, which for multi-frame sources is the per-frame
//! height multiplied by the page count — the engine addresses animated image
//! height as the sum of all frame heights.
//!
//! Ratio math is f64 division of the source dimensions; outputs round to the
//! nearest integer and clamp to 1 so no axis collapses to zero.

use crate::error::Error;

/// A desired bounding box or target. An axis of 0 means "unset"; at least
/// one axis must be set or the request is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRequest {
    pub width: u32,
    pub height: u32,
}

impl SizeRequest {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn is_empty(self) -> bool {
        self.width == 0 && self.height == 0
    }
}

/// Outcome of the shrink-only policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkPlan {
    /// The source already fits the box; export as-is.
    Keep,
    /// Shrink to these per-frame dimensions (aspect ratio preserved).
    Resize { width: u32, height: u32 },
}

/// Compute the shrink-only target for a source inside a bounding box.
///
/// Never enlarges: if the source already fits the requested box (or the set
/// axes all exceed the source) the plan is [`ShrinkPlan::Keep`]. With both
/// axes set, the limiting dimension wins so both outputs stay inside the
/// box. Output dimensions never exceed the source dimensions.
pub fn plan_shrink(src_w: u32, src_h: u32, request: SizeRequest) -> Result<ShrinkPlan, Error> {
    if request.is_empty() {
        return Err(Error::InvalidDimensions);
    }

    let (des_w, des_h) = (request.width, request.height);
    let ratio = src_h as f64 / src_w as f64;

    let plan = match (des_w > 0, des_h > 0) {
        (true, false) => {
            if des_w >= src_w {
                ShrinkPlan::Keep
            } else {
                ShrinkPlan::Resize {
                    width: des_w,
                    height: round_dim(des_w as f64 * ratio),
                }
            }
        }
        (false, true) => {
            if des_h >= src_h {
                ShrinkPlan::Keep
            } else {
                ShrinkPlan::Resize {
                    width: round_dim(des_h as f64 / ratio),
                    height: des_h,
                }
            }
        }
        (true, true) => {
            if src_w <= des_w && src_h <= des_h {
                ShrinkPlan::Keep
            } else {
                // Limiting dimension: the axis needing the most shrink wins.
                let scale = f64::min(des_w as f64 / src_w as f64, des_h as f64 / src_h as f64);
                ShrinkPlan::Resize {
                    width: round_dim(src_w as f64 * scale).min(src_w),
                    height: round_dim(src_h as f64 * scale).min(src_h),
                }
            }
        }
        (false, false) => unreachable!("empty request rejected above"),
    };

    Ok(plan)
}

/// Compute the forced-exact engine target for an explicit resize.
///
/// A missing axis is derived from the source aspect ratio; with both axes
/// set the literal request is used, aspect ratio notwithstanding. The
/// returned height is the per-frame target multiplied by `pages`, ready to
/// hand to the engine; a product that does not fit in `u32` is rejected as
/// [`Error::InvalidDimensions`].
pub fn plan_exact(
    src_w: u32,
    src_h: u32,
    pages: u32,
    request: SizeRequest,
) -> Result<(u32, u32), Error> {
    if request.is_empty() {
        return Err(Error::InvalidDimensions);
    }

    let ratio = src_h as f64 / src_w as f64;
    let pages = pages.max(1);

    let (width, height) = match (request.width, request.height) {
        (0, h) => (round_dim(h as f64 / ratio), h),
        (w, 0) => (w, round_dim(w as f64 * ratio)),
        (w, h) => (w, h),
    };

    let total_height = height
        .max(1)
        .checked_mul(pages)
        .ok_or(Error::InvalidDimensions)?;

    Ok((width.max(1), total_height))
}

/// Round to nearest (ties away from zero), clamping to at least 1.
fn round_dim(value: f64) -> u32 {
    (value.round() as u32).max(1)
}
