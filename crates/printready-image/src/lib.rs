// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printready-image — Turns generated artwork into print-ready files.
//
// Upscales small sources, composites them onto standard photo-print canvases
// (crop-to-fill or white letterbox), applies a final enhancement pass and
// writes PNG/JPEG files declaring 300 DPI.

pub mod compose;
pub mod enhance;
pub mod image;
pub mod output;
pub mod pipeline;
pub mod upscale;

pub use compose::{FillPlan, LetterboxPlan, fit_to_canvas};
pub use enhance::PrintEnhancer;
pub use self::image::processor::ImageProcessor;
pub use pipeline::{BatchOptions, PrintPreparer, default_output_filename};
pub use upscale::{LoadedImage, Upscaler, required_scale};
