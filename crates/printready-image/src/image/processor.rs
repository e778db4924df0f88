// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — resize, crop, sharpen, contrast/saturation/brightness
// adjustment. Operates on in-memory RGB images using the `image` crate.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use printready_core::error::{PrintReadyError, Result};
use tracing::{debug, info, instrument};

/// 3x3 sharpening kernel; center-heavy, normalised by [`SHARPEN_DIVISOR`].
const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-2, -2, -2], [-2, 32, -2], [-2, -2, -2]];
const SHARPEN_DIVISOR: i32 = 16;

/// Image processing pipeline operating on a single in-memory RGB image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
///
/// ```ignore
/// let sharpened = ImageProcessor::open("art.png")?
///     .resize_exact(2400, 3200)
///     .sharpen()
///     .adjust_contrast(1.1)
///     .into_rgb();
/// ```
pub struct ImageProcessor {
    /// The current working image. Alpha is flattened onto white on load.
    image: RgbImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| PrintReadyError::SourceUnreadable {
            path: path.as_ref().to_path_buf(),
            reason: err.to_string(),
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self::from_dynamic(img))
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, WebP).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| PrintReadyError::Image(format!("failed to decode image: {err}")))?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self::from_dynamic(img))
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: flatten_onto_white(&image),
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    // -- Geometry (consume self, return new Self) -----------------------------

    /// Resize to exactly `width` x `height` with Lanczos3, ignoring aspect
    /// ratio. Returns `self` unchanged when the size already matches.
    #[instrument(skip(self))]
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if self.image.dimensions() == (width, height) {
            return self;
        }
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            "Resizing image"
        );
        Self {
            image: imageops::resize(&self.image, width, height, FilterType::Lanczos3),
        }
    }

    /// Crop a rectangular region from the image.
    ///
    /// `x` and `y` are the top-left corner; `width` and `height` define the
    /// size of the crop rectangle. Values are clamped to image bounds.
    #[instrument(skip(self))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let (img_w, img_h) = self.image.dimensions();

        let safe_x = x.min(img_w.saturating_sub(1));
        let safe_y = y.min(img_h.saturating_sub(1));
        let safe_w = width.min(img_w - safe_x);
        let safe_h = height.min(img_h - safe_y);

        debug!(safe_x, safe_y, safe_w, safe_h, "Cropping image");

        Self {
            image: imageops::crop_imm(&self.image, safe_x, safe_y, safe_w, safe_h).to_image(),
        }
    }

    // -- Tone and detail ------------------------------------------------------

    /// One pass of a 3x3 sharpening convolution. Edge pixels reuse their
    /// nearest neighbour so uniform borders stay uniform.
    #[instrument(skip(self))]
    pub fn sharpen(self) -> Self {
        let src = &self.image;
        let (width, height) = src.dimensions();
        if width == 0 || height == 0 {
            return self;
        }
        let (max_x, max_y) = (width as i64 - 1, height as i64 - 1);

        let sharpened = RgbImage::from_fn(width, height, |x, y| {
            let mut acc = [0i32; 3];
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                let sy = (y as i64 + ky as i64 - 1).clamp(0, max_y) as u32;
                for (kx, weight) in row.iter().enumerate() {
                    let sx = (x as i64 + kx as i64 - 1).clamp(0, max_x) as u32;
                    let px = src.get_pixel(sx, sy);
                    for (sum, channel) in acc.iter_mut().zip(px.0) {
                        *sum += weight * channel as i32;
                    }
                }
            }
            Rgb(acc.map(|sum| {
                (sum + SHARPEN_DIVISOR / 2)
                    .div_euclid(SHARPEN_DIVISOR)
                    .clamp(0, 255) as u8
            }))
        });

        Self { image: sharpened }
    }

    /// Adjust contrast by a factor around the image's mean luma.
    ///
    /// Values > 1.0 increase contrast; values < 1.0 decrease it. A value of
    /// 1.0 is a no-op.
    #[instrument(skip(self))]
    pub fn adjust_contrast(self, factor: f32) -> Self {
        let mean = mean_luma(&self.image) as f32;
        debug!(mean, "Adjusting contrast");
        self.map_channels(|channel, _| blend_channel(mean, channel, factor))
    }

    /// Adjust color saturation by blending with the pixel's own luma.
    /// 0.0 yields grayscale, 1.0 is a no-op.
    #[instrument(skip(self))]
    pub fn adjust_saturation(self, factor: f32) -> Self {
        self.map_channels(|channel, gray| blend_channel(gray, channel, factor))
    }

    /// Scale brightness by a factor. 1.0 is a no-op, 0.0 yields black.
    #[instrument(skip(self))]
    pub fn adjust_brightness(self, factor: f32) -> Self {
        self.map_channels(|channel, _| blend_channel(0.0, channel, factor))
    }

    /// Apply `f(channel, pixel_luma)` to every color channel.
    fn map_channels(mut self, f: impl Fn(f32, f32) -> u8) -> Self {
        for px in self.image.pixels_mut() {
            let gray = luma(px) as f32;
            px.0 = px.0.map(|channel| f(channel as f32, gray));
        }
        self
    }
}

/// ITU-R 601-2 luma in fixed point, matching the usual 8-bit "L" conversion.
pub(crate) fn luma(px: &Rgb<u8>) -> u8 {
    let [r, g, b] = px.0;
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Mean luma of the whole image, rounded.
fn mean_luma(image: &RgbImage) -> u8 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0;
    }
    let total: u64 = image.pixels().map(|px| luma(px) as u64).sum();
    ((total + count / 2) / count) as u8
}

/// Interpolate (or extrapolate, for factors > 1) from `base` towards `value`.
fn blend_channel(base: f32, value: f32, factor: f32) -> u8 {
    (base + factor * (value - base)).round().clamp(0.0, 255.0) as u8
}

/// Drop alpha by compositing onto white, so transparent regions print as paper.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let over_white = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([over_white(r), over_white(g), over_white(b)])
    })
}
