// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upscaling — integer-factor enlargement of generated artwork before it is
// composited onto a print canvas.
//
// Two strategies, tried in order:
//   1. An external super-resolution executable (Real-ESRGAN compatible), if
//      one is configured and present on disk.
//   2. Lanczos3 resampling followed by a light sharpen/contrast/saturation
//      pass that compensates for resampling softness.
//
// Unreadable sources never abort the pipeline: a placeholder is substituted
// and `LoadedImage::used_fallback` is set so callers can tell.

use std::path::Path;
use std::process::Command;

use image::RgbImage;
use printready_core::config::{
    ExternalUpscalerConfig, PlaceholderConfig, PrepConfig, UpscaleProfile,
};
use printready_core::error::{PrintReadyError, Result};
use tracing::{debug, info, instrument, warn};

use crate::image::placeholder::render_placeholder;
use crate::image::processor::ImageProcessor;

/// A decoded source image, or the placeholder standing in for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub image: RgbImage,
    /// The source could not be read and `image` is the placeholder.
    pub used_fallback: bool,
}

impl LoadedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Upper bound on the pixel count of an upscaled image. Sources far off the
/// canvas aspect ratio (a 1px strip against a 6000px edge) would otherwise
/// ask for multi-gigabyte buffers.
pub const MAX_UPSCALED_PIXELS: u64 = 150_000_000;

/// Integer upscale factor needed for `source` to reach `target`.
///
/// The larger of the two axis ratios governs and is rounded up rather than
/// truncated, so each side of the upscaled image is at least the canvas side
/// before fitting. Returns 1 when the source is already large enough (or
/// degenerate).
pub fn required_scale(source: (u32, u32), target: (u32, u32)) -> u32 {
    let (sw, sh) = source;
    let (tw, th) = target;
    if sw == 0 || sh == 0 || (sw >= tw && sh >= th) {
        return 1;
    }
    tw.div_ceil(sw).max(th.div_ceil(sh)).max(1)
}

/// Dimensions of `size` scaled by `scale`, or an error if they overflow or
/// exceed [`MAX_UPSCALED_PIXELS`].
pub fn upscaled_dimensions(size: (u32, u32), scale: u32) -> Result<(u32, u32)> {
    let (width, height) = size;
    let too_large = || {
        PrintReadyError::Image(format!(
            "upscaling {width}x{height} by {scale} exceeds the {MAX_UPSCALED_PIXELS} pixel limit"
        ))
    };
    let new_w = width.checked_mul(scale).ok_or_else(too_large)?;
    let new_h = height.checked_mul(scale).ok_or_else(too_large)?;
    if new_w as u64 * new_h as u64 > MAX_UPSCALED_PIXELS {
        return Err(too_large());
    }
    Ok((new_w, new_h))
}

/// Enlarges images by an integer factor.
#[derive(Debug, Clone, Default)]
pub struct Upscaler {
    profile: UpscaleProfile,
    placeholder: PlaceholderConfig,
    external: Option<ExternalUpscalerConfig>,
}

impl Upscaler {
    pub fn new(profile: UpscaleProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn from_config(config: &PrepConfig) -> Self {
        Self {
            profile: config.upscale,
            placeholder: config.placeholder,
            external: config.external_upscaler.clone(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderConfig) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_external(mut self, external: ExternalUpscalerConfig) -> Self {
        self.external = Some(external);
        self
    }

    /// Decode `path`, substituting the placeholder if it cannot be read.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_source(&self, path: &Path) -> LoadedImage {
        match ImageProcessor::open(path) {
            Ok(processor) => LoadedImage {
                image: processor.into_rgb(),
                used_fallback: false,
            },
            Err(err) => {
                warn!(error = %err, "source unreadable, substituting placeholder image");
                LoadedImage {
                    image: render_placeholder(&self.placeholder),
                    used_fallback: true,
                }
            }
        }
    }

    /// Load and upscale a file by `scale`.
    ///
    /// An unreadable source is not an error: it yields the placeholder at
    /// its configured size (not upscaled) with `used_fallback` set. Fails
    /// only when the upscaled size is out of bounds.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn upscale_file(&self, path: &Path, scale: u32) -> Result<LoadedImage> {
        let loaded = self.load_source(path);
        if loaded.used_fallback {
            return Ok(loaded);
        }
        Ok(LoadedImage {
            image: self.upscale_from(path, &loaded.image, scale)?,
            used_fallback: false,
        })
    }

    /// Upscale an already decoded `image` whose encoded form lives at
    /// `source_path`. The external executable, when configured, reads the
    /// file; on any failure the in-memory Lanczos path is used.
    pub fn upscale_from(&self, source_path: &Path, image: &RgbImage, scale: u32) -> Result<RgbImage> {
        if scale <= 1 {
            return Ok(image.clone());
        }
        let expected = upscaled_dimensions(image.dimensions(), scale)?;
        if let Some(external) = &self.external {
            match run_external(external, source_path, scale, expected) {
                Ok(upscaled) => return Ok(upscaled),
                Err(err) => warn!(error = %err, "external upscaler failed, falling back to Lanczos"),
            }
        }
        self.upscale(image, scale)
    }

    /// Lanczos3 upscale by `scale`, then sharpen and lift contrast and
    /// saturation per the profile.
    #[instrument(skip(self, image))]
    pub fn upscale(&self, image: &RgbImage, scale: u32) -> Result<RgbImage> {
        let (width, height) = image.dimensions();
        let (new_w, new_h) = upscaled_dimensions((width, height), scale.max(1))?;
        info!(width, height, new_w, new_h, "Upscaling image");

        let mut processor = ImageProcessor::from_rgb(image.clone()).resize_exact(new_w, new_h);
        if self.profile.sharpen {
            processor = processor.sharpen();
        }
        if self.profile.contrast != 1.0 {
            processor = processor.adjust_contrast(self.profile.contrast);
        }
        if self.profile.saturation != 1.0 {
            processor = processor.adjust_saturation(self.profile.saturation);
        }
        debug!("Upscale complete");
        Ok(processor.into_rgb())
    }
}

/// Run the external super-resolution executable and load its output,
/// resized to `expected` if the tool's native factor differs.
fn run_external(
    external: &ExternalUpscalerConfig,
    source_path: &Path,
    scale: u32,
    expected: (u32, u32),
) -> Result<RgbImage> {
    if !external.executable.exists() {
        return Err(PrintReadyError::ExternalUpscaler(format!(
            "executable {} not found",
            external.executable.display()
        )));
    }

    let work_dir = tempfile::tempdir()?;
    let output_path = work_dir.path().join("upscaled.png");

    info!(
        executable = %external.executable.display(),
        model = %external.model,
        scale,
        "Running external upscaler"
    );
    let output = Command::new(&external.executable)
        .arg("-i")
        .arg(source_path)
        .arg("-o")
        .arg(&output_path)
        .arg("-s")
        .arg(scale.to_string())
        .arg("-n")
        .arg(&external.model)
        .output()?;

    if !output.status.success() {
        return Err(PrintReadyError::ExternalUpscaler(format!(
            "exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    if !output_path.exists() {
        return Err(PrintReadyError::ExternalUpscaler(
            "no output image was written".into(),
        ));
    }

    let processor = ImageProcessor::open(&output_path)
        .map_err(|err| PrintReadyError::ExternalUpscaler(err.to_string()))?;
    debug!(
        width = processor.width(),
        height = processor.height(),
        "External upscaler output loaded"
    );
    Ok(processor.resize_exact(expected.0, expected.1).into_rgb())
}
