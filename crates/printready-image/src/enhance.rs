// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print enhancement — final sharpen and tone adjustments applied once, after
// compositing and before the file is written.

use image::RgbImage;
use printready_core::config::{EnhancementProfile, PrepConfig};
use tracing::{info, instrument};

use crate::image::processor::ImageProcessor;

/// Applies an [`EnhancementProfile`] to a composited canvas.
#[derive(Debug, Clone, Copy)]
pub struct PrintEnhancer {
    profile: EnhancementProfile,
}

impl PrintEnhancer {
    pub fn new(profile: EnhancementProfile) -> Self {
        Self { profile }
    }

    /// The configured preserve-colors or vivid profile.
    pub fn for_colors(config: &PrepConfig, preserve_colors: bool) -> Self {
        Self::new(config.enhancement_for(preserve_colors))
    }

    pub fn profile(&self) -> &EnhancementProfile {
        &self.profile
    }

    /// Sharpen, then contrast, saturation and brightness, skipping any
    /// step whose factor is 1.0.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn apply(&self, image: RgbImage) -> RgbImage {
        let profile = &self.profile;
        info!(
            sharpen = profile.sharpen,
            contrast = profile.contrast,
            saturation = profile.saturation,
            brightness = profile.brightness,
            "Enhancing for print"
        );

        let mut processor = ImageProcessor::from_rgb(image);
        if profile.sharpen {
            processor = processor.sharpen();
        }
        if profile.contrast != 1.0 {
            processor = processor.adjust_contrast(profile.contrast);
        }
        if profile.saturation != 1.0 {
            processor = processor.adjust_saturation(profile.saturation);
        }
        if profile.brightness != 1.0 {
            processor = processor.adjust_brightness(profile.brightness);
        }
        processor.into_rgb()
    }
}
