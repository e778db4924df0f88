// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placeholder artwork printed in place of an unreadable source image.

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use printready_core::config::PlaceholderConfig;
use tracing::warn;

/// Text drawn on every placeholder, one entry per line.
pub const PLACEHOLDER_LINES: [&str; 2] = ["FALLBACK IMAGE", "SOURCE UNREADABLE"];

/// DejaVu Sans Bold (Bitstream Vera license, see assets/fonts).
static BANNER_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

const BANNER_COLOR: Rgb<u8> = Rgb([40, 40, 64]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Scale text is measured at before fitting it to the canvas.
const REFERENCE_PX: f32 = 100.0;
/// Line pitch as a multiple of the rendered text height.
const LINE_SPACING: f32 = 1.4;

/// Render the placeholder: a solid background with a dark banner carrying
/// [`PLACEHOLDER_LINES`].
pub fn render_placeholder(config: &PlaceholderConfig) -> RgbImage {
    let (width, height) = (config.width.max(1), config.height.max(1));
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(config.background));

    let font = match FontRef::try_from_slice(BANNER_FONT) {
        Ok(font) => font,
        Err(err) => {
            warn!(error = %err, "placeholder font unusable, rendering without text");
            return canvas;
        }
    };

    // Measure at a reference size, then scale so the text spans at most 80%
    // of the width and 60% of the height.
    let reference = PxScale::from(REFERENCE_PX);
    let (widest, line_h) = PLACEHOLDER_LINES
        .iter()
        .map(|line| text_size(reference, &font, line))
        .fold((1, 1), |(w, h), (lw, lh)| (w.max(lw), h.max(lh)));
    let rows = PLACEHOLDER_LINES.len() as f32;
    let fit = (width as f32 * 0.8 / widest as f32)
        .min(height as f32 * 0.6 / (rows * line_h as f32 * LINE_SPACING));
    let px = (REFERENCE_PX * fit).max(1.0);
    let scale = PxScale::from(px);

    let pitch = (line_h as f32 * fit * LINE_SPACING).ceil() as u32;
    let pad = (pitch / 4).max(1);
    let banner_h = (pitch * PLACEHOLDER_LINES.len() as u32 + 2 * pad).min(height);
    let banner_y = (height - banner_h) / 2;
    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(0, banner_y as i32).of_size(width, banner_h),
        BANNER_COLOR,
    );

    for (row, line) in PLACEHOLDER_LINES.iter().enumerate() {
        let (line_w, _) = text_size(scale, &font, line);
        let x = width.saturating_sub(line_w) / 2;
        let y = banner_y + pad + row as u32 * pitch;
        draw_text_mut(&mut canvas, TEXT_COLOR, x as i32, y as i32, scale, &font, line);
    }

    canvas
}
