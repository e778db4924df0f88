// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print preparation pipeline.
//
// One size:   resolve canvas → upscale if needed → fit to canvas → enhance →
//             encode with 300 DPI → write.
// All sizes:  the above for every entry of a catalog; failures are collected
//             per size and only an all-failed batch is an error.

use std::path::{Path, PathBuf};

use image::RgbImage;
use printready_core::catalog::SizeCatalog;
use printready_core::config::PrepConfig;
use printready_core::error::{PrintReadyError, Result};
use printready_core::types::{
    BatchOutcome, CanvasSpec, FitMode, Orientation, OutputFormat, PRINT_DPI, ProcessingRequest,
    ProcessingResult, SkippedSize,
};
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::compose::fit_to_canvas;
use crate::enhance::PrintEnhancer;
use crate::output::{encode_with_dpi, sha256_hex, write_output};
use crate::upscale::{LoadedImage, Upscaler, required_scale};

/// Per-call options shared by every size of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub fill_canvas: bool,
    pub preserve_colors: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            fill_canvas: true,
            preserve_colors: true,
        }
    }
}

/// Deterministic output name for a source/size/mode combination, e.g.
/// `print_ready_sunset_8_10_filled.png`.
///
/// Portrait and landscape size names differ ("4x6" vs "6x4"), so the name is
/// unique per orientation as well.
pub fn default_output_filename(
    source: &Path,
    size_name: &str,
    mode: FitMode,
    format: OutputFormat,
) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!(
        "print_ready_{}_{}_{}.{}",
        stem,
        size_name.replace('x', "_"),
        mode.file_label(),
        format.extension()
    )
}

/// Prepares generated artwork for print at standard sizes.
#[derive(Debug, Clone)]
pub struct PrintPreparer {
    config: PrepConfig,
    upscaler: Upscaler,
}

impl PrintPreparer {
    pub fn new(config: PrepConfig) -> Self {
        let upscaler = Upscaler::from_config(&config);
        Self { config, upscaler }
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    // -- Single size ----------------------------------------------------------

    /// Prepare `image_path` at `size_name` and return the written path.
    ///
    /// `orientation` selects the catalog (`None` is portrait). The file is
    /// written into the configured output directory, named
    /// `output_filename` or a deterministic default.
    pub fn prepare_image_for_print(
        &self,
        image_path: &Path,
        size_name: &str,
        output_filename: Option<&str>,
        fill_canvas: bool,
        orientation: Option<Orientation>,
        preserve_colors: bool,
    ) -> Result<PathBuf> {
        let mut request = ProcessingRequest::new(image_path, size_name)
            .with_fill_canvas(fill_canvas)
            .with_preserve_colors(preserve_colors);
        if let Some(orientation) = orientation {
            request = request.with_orientation(orientation);
        }
        if let Some(name) = output_filename {
            request = request.with_output_filename(name);
        }
        Ok(self.process(&request)?.output_path)
    }

    /// Run one request against the catalog of its orientation.
    pub fn process(&self, request: &ProcessingRequest) -> Result<ProcessingResult> {
        let catalog = SizeCatalog::for_orientation(request.resolved_orientation());
        self.process_with_catalog(request, &catalog)
    }

    /// Run one request against an explicit catalog; the request's
    /// orientation is ignored.
    #[instrument(skip(self, request, catalog), fields(
        source = %request.source_image_path.display(),
        size = %request.size_name,
    ))]
    pub fn process_with_catalog(
        &self,
        request: &ProcessingRequest,
        catalog: &SizeCatalog,
    ) -> Result<ProcessingResult> {
        let canvas = catalog.resolve(&request.size_name)?;
        let loaded = self.upscaler.load_source(&request.source_image_path);
        self.render_and_save(
            &request.source_image_path,
            &loaded,
            canvas,
            request.fit_mode(),
            request.preserve_colors,
            request.output_filename.as_deref(),
        )
    }

    // -- All sizes ------------------------------------------------------------

    /// Prepare `image_path` at every size of the orientation's catalog.
    pub fn prepare_all_print_sizes(
        &self,
        image_path: &Path,
        fill_canvas: bool,
        orientation: Option<Orientation>,
        preserve_colors: bool,
    ) -> Result<BatchOutcome> {
        let catalog = SizeCatalog::for_orientation(orientation.unwrap_or_default());
        let options = BatchOptions {
            fill_canvas,
            preserve_colors,
        };
        self.prepare_all_with_catalog(image_path, &catalog, options)
    }

    /// Prepare `image_path` at every size of `catalog`.
    ///
    /// A failing size is logged and skipped. Fails with `NoSizesProcessed`
    /// only when nothing was produced.
    #[instrument(skip(self, catalog), fields(source = %image_path.display(), sizes = catalog.len()))]
    pub fn prepare_all_with_catalog(
        &self,
        image_path: &Path,
        catalog: &SizeCatalog,
        options: BatchOptions,
    ) -> Result<BatchOutcome> {
        let loaded = self.upscaler.load_source(image_path);
        let mode = FitMode::from_fill_canvas(options.fill_canvas);
        let names = catalog.names();

        let attempt = |size_name: &&str| -> (String, Result<ProcessingResult>) {
            let result = catalog.resolve(size_name).and_then(|canvas| {
                self.render_and_save(
                    image_path,
                    &loaded,
                    canvas,
                    mode,
                    options.preserve_colors,
                    None,
                )
            });
            (size_name.to_string(), result)
        };

        // Both paths keep catalog order.
        let attempts: Vec<(String, Result<ProcessingResult>)> = if self.config.parallel {
            names.par_iter().map(attempt).collect()
        } else {
            names.iter().map(attempt).collect()
        };

        let mut outcome = BatchOutcome::default();
        for (size_name, result) in attempts {
            match result {
                Ok(produced) => outcome.produced.push(produced),
                Err(error) => {
                    warn!(size = %size_name, error = %error, "skipping print size");
                    outcome.skipped.push(SkippedSize { size_name, error });
                }
            }
        }

        if outcome.produced.is_empty() {
            return Err(PrintReadyError::NoSizesProcessed {
                failures: outcome.warnings(),
            });
        }
        info!(
            produced = outcome.produced.len(),
            skipped = outcome.skipped.len(),
            "Batch complete"
        );
        Ok(outcome)
    }

    // -- Shared core ----------------------------------------------------------

    /// Upscale, composite, enhance and write one canvas.
    fn render_and_save(
        &self,
        source_path: &Path,
        loaded: &LoadedImage,
        canvas: CanvasSpec,
        mode: FitMode,
        preserve_colors: bool,
        output_filename: Option<&str>,
    ) -> Result<ProcessingResult> {
        let (image, upscale_factor) =
            self.render(source_path, loaded, &canvas, mode, preserve_colors)?;

        let (output_path, format) = self.output_target(source_path, &canvas, mode, output_filename);
        let bytes = encode_with_dpi(&image, format, PRINT_DPI, self.config.jpeg_quality)?;
        write_output(&output_path, &bytes)?;

        info!(
            path = %output_path.display(),
            width = canvas.width,
            height = canvas.height,
            used_fallback = loaded.used_fallback,
            "Prepared image for print"
        );
        Ok(ProcessingResult {
            output_path,
            canvas,
            format,
            used_fallback: loaded.used_fallback,
            upscale_factor,
            sha256: sha256_hex(&bytes),
        })
    }

    /// The canvas-sized, enhanced image and the upscale factor used.
    fn render(
        &self,
        source_path: &Path,
        loaded: &LoadedImage,
        canvas: &CanvasSpec,
        mode: FitMode,
        preserve_colors: bool,
    ) -> Result<(RgbImage, u32)> {
        let scale = required_scale(loaded.dimensions(), canvas.dimensions());
        let composited = if scale > 1 {
            // A placeholder has no file behind it for an external tool to read.
            let upscaled = if loaded.used_fallback {
                self.upscaler.upscale(&loaded.image, scale)?
            } else {
                self.upscaler.upscale_from(source_path, &loaded.image, scale)?
            };
            fit_to_canvas(&upscaled, canvas, mode)
        } else {
            fit_to_canvas(&loaded.image, canvas, mode)
        };

        let enhanced = PrintEnhancer::for_colors(&self.config, preserve_colors).apply(composited);
        Ok((enhanced, scale))
    }

    /// Output path and format. An explicit filename's extension picks the
    /// format; otherwise the configured format is used.
    fn output_target(
        &self,
        source_path: &Path,
        canvas: &CanvasSpec,
        mode: FitMode,
        output_filename: Option<&str>,
    ) -> (PathBuf, OutputFormat) {
        match output_filename {
            Some(name) => {
                let path = self.config.output_dir.join(name);
                let format = OutputFormat::from_path(&path).unwrap_or(self.config.output_format);
                (path, format)
            }
            None => {
                let format = self.config.output_format;
                let name = default_output_filename(source_path, &canvas.size_name, mode, format);
                (self.config.output_dir.join(name), format)
            }
        }
    }
}
