// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for printready.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all printready operations.
#[derive(Debug, Error)]
pub enum PrintReadyError {
    // -- Source errors --
    /// The source image is missing or cannot be decoded. The upscaler recovers
    /// from this by substituting a placeholder; strict loaders surface it.
    #[error("source image {} is unreadable: {reason}", path.display())]
    SourceUnreadable { path: PathBuf, reason: String },

    // -- Catalog errors --
    #[error("unknown print size {size:?}; valid sizes: {}", valid.join(", "))]
    InvalidSize { size: String, valid: Vec<String> },

    #[error("print size {size:?} has a zero-sized canvas ({width}x{height})")]
    InvalidCanvas { size: String, width: u32, height: u32 },

    #[error("no print sizes could be produced ({} failed): {}", failures.len(), failures.join("; "))]
    NoSizesProcessed { failures: Vec<String> },

    // -- Processing errors --
    #[error("image processing failed: {0}")]
    Image(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("external upscaler failed: {0}")]
    ExternalUpscaler(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PrintReadyError>;
