// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for print preparation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PrintReadyError;

/// Print resolution every catalog is computed at and every output declares.
pub const PRINT_DPI: u32 = 300;

/// Orientation family of a print size catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Height > width ("4x6", "8x10", ...).
    #[default]
    Portrait,
    /// Width > height ("6x4", "10x8", ...).
    Landscape,
}

impl Orientation {
    /// Resolve a free-form orientation label.
    ///
    /// Only `"landscape"` selects the landscape family; anything else,
    /// including no label at all, falls back to portrait.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some(l) if l.eq_ignore_ascii_case("landscape") => Self::Landscape,
            _ => Self::Portrait,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named print canvas in pixels at [`PRINT_DPI`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub size_name: String,
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    pub fn new(size_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            size_name: size_name.into(),
            width,
            height,
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Physical size in inches at [`PRINT_DPI`].
    pub fn inches(&self) -> (f32, f32) {
        (
            self.width as f32 / PRINT_DPI as f32,
            self.height as f32 / PRINT_DPI as f32,
        )
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// How a source image is placed onto its canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to cover the whole canvas and center-crop the overflow.
    #[default]
    Fill,
    /// Scale to fit inside the canvas and pad with white borders.
    Letterbox,
}

impl FitMode {
    pub fn from_fill_canvas(fill_canvas: bool) -> Self {
        if fill_canvas { Self::Fill } else { Self::Letterbox }
    }

    /// Suffix used in generated output filenames.
    pub fn file_label(&self) -> &'static str {
        match self {
            Self::Fill => "filled",
            Self::Letterbox => "centered",
        }
    }
}

/// Encoded format of a prepared print file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; DPI is written as a `pHYs` chunk.
    #[default]
    Png,
    /// DPI is written into the JFIF header.
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infer the format from a path's extension, if it has a known one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Input to a single print preparation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRequest {
    pub source_image_path: PathBuf,
    pub size_name: String,
    /// `None` selects the portrait catalog.
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default = "default_true")]
    pub fill_canvas: bool,
    #[serde(default = "default_true")]
    pub preserve_colors: bool,
    /// File name inside the output directory; generated when absent.
    #[serde(default)]
    pub output_filename: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ProcessingRequest {
    pub fn new(source_image_path: impl Into<PathBuf>, size_name: impl Into<String>) -> Self {
        Self {
            source_image_path: source_image_path.into(),
            size_name: size_name.into(),
            orientation: None,
            fill_canvas: true,
            preserve_colors: true,
            output_filename: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_fill_canvas(mut self, fill_canvas: bool) -> Self {
        self.fill_canvas = fill_canvas;
        self
    }

    pub fn with_preserve_colors(mut self, preserve_colors: bool) -> Self {
        self.preserve_colors = preserve_colors;
        self
    }

    pub fn with_output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = Some(name.into());
        self
    }

    pub fn fit_mode(&self) -> FitMode {
        FitMode::from_fill_canvas(self.fill_canvas)
    }

    /// The orientation actually used for catalog lookup.
    pub fn resolved_orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }
}

/// Outcome of a successful print preparation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub output_path: PathBuf,
    pub canvas: CanvasSpec,
    pub format: OutputFormat,
    /// The source was unreadable and a placeholder was printed instead.
    pub used_fallback: bool,
    /// Integer factor the source was upscaled by (1 = no upscale).
    pub upscale_factor: u32,
    /// SHA-256 of the written file, lowercase hex.
    pub sha256: String,
}

/// A size that was skipped during batch preparation.
#[derive(Debug)]
pub struct SkippedSize {
    pub size_name: String,
    pub error: PrintReadyError,
}

/// Result of preparing every size of a catalog. Partial success is success.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful outputs in catalog order.
    pub produced: Vec<ProcessingResult>,
    /// Sizes that failed, in catalog order.
    pub skipped: Vec<SkippedSize>,
}

impl BatchOutcome {
    pub fn paths(&self) -> Vec<&Path> {
        self.produced
            .iter()
            .map(|result| result.output_path.as_path())
            .collect()
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// One warning line per skipped size.
    pub fn warnings(&self) -> Vec<String> {
        self.skipped
            .iter()
            .map(|skip| format!("{}: {}", skip.size_name, skip.error))
            .collect()
    }
}
