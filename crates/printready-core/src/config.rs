// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preparation configuration and enhancement policy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::OutputFormat;

/// Final print-readiness adjustments applied after compositing.
///
/// Factors are multiplicative; `1.0` leaves the property untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementProfile {
    /// Apply one 3x3 sharpening pass.
    pub sharpen: bool,
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl EnhancementProfile {
    /// Sharpen plus a minimal contrast bump; colors stay as generated.
    pub fn preserve_colors() -> Self {
        Self {
            sharpen: true,
            contrast: 1.05,
            saturation: 1.0,
            brightness: 1.0,
        }
    }

    /// The more aggressive "print pop" profile.
    pub fn vivid() -> Self {
        Self {
            sharpen: true,
            contrast: 1.2,
            saturation: 1.1,
            brightness: 1.05,
        }
    }

    /// No adjustment at all.
    pub fn identity() -> Self {
        Self {
            sharpen: false,
            contrast: 1.0,
            saturation: 1.0,
            brightness: 1.0,
        }
    }
}

/// Compensation applied right after Lanczos upscaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpscaleProfile {
    pub sharpen: bool,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for UpscaleProfile {
    fn default() -> Self {
        Self {
            sharpen: true,
            contrast: 1.1,
            saturation: 1.05,
        }
    }
}

/// Image substituted when a source cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            background: [200, 200, 255],
        }
    }
}

/// A Real-ESRGAN compatible super-resolution executable, invoked as
/// `<executable> -i <in> -o <out> -s <scale> -n <model>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUpscalerConfig {
    pub executable: PathBuf,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "realesrgan-x4plus".into()
}

/// Settings for a print preparation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Directory prepared files are written into.
    pub output_dir: PathBuf,
    /// Format used when the output filename does not name one.
    pub output_format: OutputFormat,
    /// JPEG quality (1-100), ignored for PNG.
    pub jpeg_quality: u8,
    /// Profile used when `preserve_colors` is requested.
    pub preserve_profile: EnhancementProfile,
    /// Profile used when `preserve_colors` is off.
    pub vivid_profile: EnhancementProfile,
    pub upscale: UpscaleProfile,
    pub placeholder: PlaceholderConfig,
    /// Tried before the built-in Lanczos upscaler when set.
    pub external_upscaler: Option<ExternalUpscalerConfig>,
    /// Prepare the sizes of a batch on all cores.
    pub parallel: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output/processed_images"),
            output_format: OutputFormat::Png,
            jpeg_quality: 95,
            preserve_profile: EnhancementProfile::preserve_colors(),
            vivid_profile: EnhancementProfile::vivid(),
            upscale: UpscaleProfile::default(),
            placeholder: PlaceholderConfig::default(),
            external_upscaler: None,
            parallel: true,
        }
    }
}

impl PrepConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write this config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn enhancement_for(&self, preserve_colors: bool) -> EnhancementProfile {
        if preserve_colors {
            self.preserve_profile
        } else {
            self.vivid_profile
        }
    }
}
