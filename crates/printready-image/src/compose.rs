// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canvas compositing — place an image onto a print canvas of exact size,
// either covering it (center crop) or fitting inside it (white letterbox).

use image::imageops;
use image::{Rgb, RgbImage};
use printready_core::types::{CanvasSpec, FitMode};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Paper white used for letterbox borders.
pub const CANVAS_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Geometry of a crop-to-fill placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPlan {
    /// Size the image is resampled to before cropping.
    pub scaled: (u32, u32),
    /// Top-left corner of the crop window within the scaled image.
    pub crop_origin: (u32, u32),
}

/// Geometry of a letterbox placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterboxPlan {
    /// Size the image is resampled to; fits inside the canvas.
    pub scaled: (u32, u32),
    /// Where the scaled image is pasted on the canvas.
    pub offset: (u32, u32),
}

/// Plan a crop-to-fill placement of `image` onto `canvas`.
///
/// An image relatively wider than the canvas is matched to the canvas
/// height and cropped left/right; otherwise it is matched to the canvas
/// width and cropped top/bottom.
pub fn plan_fill(image: (u32, u32), canvas: (u32, u32)) -> FillPlan {
    let (w, h) = (image.0.max(1) as u64, image.1.max(1) as u64);
    let (cw, ch) = (canvas.0 as u64, canvas.1 as u64);

    // w/h > cw/ch, compared without floating point.
    if w * ch > cw * h {
        let scaled_w = (w * ch / h).max(1) as u32;
        FillPlan {
            scaled: (scaled_w, canvas.1),
            crop_origin: (scaled_w.saturating_sub(canvas.0) / 2, 0),
        }
    } else {
        let scaled_h = (h * cw / w).max(1) as u32;
        FillPlan {
            scaled: (canvas.0, scaled_h),
            crop_origin: (0, scaled_h.saturating_sub(canvas.1) / 2),
        }
    }
}

/// Plan a letterbox placement of `image` inside `canvas`.
pub fn plan_letterbox(image: (u32, u32), canvas: (u32, u32)) -> LetterboxPlan {
    let (w, h) = (image.0.max(1) as u64, image.1.max(1) as u64);
    let (cw, ch) = (canvas.0 as u64, canvas.1 as u64);

    let scaled = if w * ch > cw * h {
        (canvas.0, ((h * cw / w).max(1) as u32).min(canvas.1))
    } else {
        (((w * ch / h).max(1) as u32).min(canvas.0), canvas.1)
    };
    LetterboxPlan {
        scaled,
        offset: (
            (canvas.0 - scaled.0) / 2,
            (canvas.1 - scaled.1) / 2,
        ),
    }
}

/// Composite `image` onto a new canvas of exactly `canvas` dimensions.
/// The input image is not modified.
#[instrument(skip(image, canvas), fields(size = %canvas.size_name))]
pub fn fit_to_canvas(image: &RgbImage, canvas: &CanvasSpec, mode: FitMode) -> RgbImage {
    let target = canvas.dimensions();
    match mode {
        FitMode::Fill => fill_canvas(image, target),
        FitMode::Letterbox => letterbox(image, target),
    }
}

fn fill_canvas(image: &RgbImage, target: (u32, u32)) -> RgbImage {
    let plan = plan_fill(image.dimensions(), target);
    debug!(?plan, "Filling canvas");

    let cropped = ImageProcessor::from_rgb(image.clone())
        .resize_exact(plan.scaled.0, plan.scaled.1)
        .crop(plan.crop_origin.0, plan.crop_origin.1, target.0, target.1);

    // Rounding can leave the crop a pixel short; never leave a border.
    if cropped.dimensions() != target {
        debug!(got = ?cropped.dimensions(), "Correcting crop to exact canvas size");
    }
    cropped.resize_exact(target.0, target.1).into_rgb()
}

fn letterbox(image: &RgbImage, target: (u32, u32)) -> RgbImage {
    let plan = plan_letterbox(image.dimensions(), target);
    debug!(?plan, "Letterboxing onto canvas");

    let fitted = ImageProcessor::from_rgb(image.clone())
        .resize_exact(plan.scaled.0, plan.scaled.1)
        .into_rgb();

    let mut canvas = RgbImage::from_pixel(target.0, target.1, CANVAS_BACKGROUND);
    imageops::replace(&mut canvas, &fitted, plan.offset.0 as i64, plan.offset.1 as i64);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 200 / w) as u8, (y * 200 / h) as u8, 60])
        })
    }

    #[test]
    fn fill_plan_for_tall_image_crops_height() {
        // 2400x3200 onto 2400x3000: aspect 0.75 < 0.8, match width.
        let plan = plan_fill((2400, 3200), (2400, 3000));
        assert_eq!(plan.scaled, (2400, 3200));
        assert_eq!(plan.crop_origin, (0, 100));
    }

    #[test]
    fn fill_plan_for_wide_image_crops_width() {
        let plan = plan_fill((4000, 2000), (1200, 1800));
        assert_eq!(plan.scaled, (3600, 1800));
        assert_eq!(plan.crop_origin, (1200, 0));
    }

    #[test]
    fn fill_plan_equal_aspect_needs_no_crop() {
        let plan = plan_fill((600, 900), (1200, 1800));
        assert_eq!(plan.scaled, (1200, 1800));
        assert_eq!(plan.crop_origin, (0, 0));
    }

    #[test]
    fn letterbox_plan_centers_wide_image() {
        let plan = plan_letterbox((2000, 1000), (1200, 1800));
        assert_eq!(plan.scaled, (1200, 600));
        assert_eq!(plan.offset, (0, 600));
    }

    #[test]
    fn letterbox_plan_centers_tall_image() {
        let plan = plan_letterbox((1000, 4000), (1800, 1200));
        assert_eq!(plan.scaled, (300, 1200));
        assert_eq!(plan.offset, (750, 0));
    }

    #[test]
    fn fill_output_matches_canvas_for_awkward_ratios() {
        let canvas = CanvasSpec::new("odd", 37, 53);
        for (w, h) in [(100, 33), (33, 100), (41, 41), (7, 400)] {
            let out = fit_to_canvas(&gradient(w, h), &canvas, FitMode::Fill);
            assert_eq!(out.dimensions(), (37, 53), "source {w}x{h}");
        }
    }

    #[test]
    fn letterbox_output_matches_canvas_for_awkward_ratios() {
        let canvas = CanvasSpec::new("odd", 53, 37);
        for (w, h) in [(100, 33), (33, 100), (41, 41), (400, 7)] {
            let out = fit_to_canvas(&gradient(w, h), &canvas, FitMode::Letterbox);
            assert_eq!(out.dimensions(), (53, 37), "source {w}x{h}");
        }
    }

    #[test]
    fn fill_leaves_no_white_corners() {
        let canvas = CanvasSpec::new("4x6-mini", 40, 60);
        let out = fit_to_canvas(&gradient(90, 60), &canvas, FitMode::Fill);
        for (x, y) in [(0, 0), (39, 0), (0, 59), (39, 59)] {
            assert_ne!(*out.get_pixel(x, y), CANVAS_BACKGROUND, "corner ({x},{y})");
        }
    }

    #[test]
    fn letterbox_borders_are_white_and_symmetric() {
        let canvas = CanvasSpec::new("4x6-mini", 40, 60);
        let source = RgbImage::from_pixel(80, 80, Rgb([10, 20, 30]));
        let out = fit_to_canvas(&source, &canvas, FitMode::Letterbox);

        // 80x80 fits as 40x40, leaving 10 rows above and below.
        let white_rows = |rows: &mut dyn Iterator<Item = u32>| {
            rows.take_while(|&y| (0..40).all(|x| *out.get_pixel(x, y) == CANVAS_BACKGROUND))
                .count()
        };
        let top = white_rows(&mut (0..60));
        let bottom = white_rows(&mut (0..60).rev());
        assert_eq!(top, 10);
        assert_eq!(bottom, 10);
    }

    #[test]
    fn input_image_is_untouched() {
        let source = gradient(30, 20);
        let before = source.clone();
        let _ = fit_to_canvas(&source, &CanvasSpec::new("x", 10, 10), FitMode::Fill);
        assert_eq!(source, before);
    }
}
