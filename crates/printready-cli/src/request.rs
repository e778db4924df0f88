// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch input — either a bare image path or a JSON object naming the image
// and its options.

use std::path::PathBuf;

use anyhow::{Result, bail};
use printready_core::types::Orientation;
use serde::Deserialize;

/// Options for an all-sizes run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchInput {
    #[serde(default)]
    pub image_path: PathBuf,
    /// "portrait" or "landscape"; anything else means portrait.
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default = "default_true")]
    pub fill_canvas: bool,
    #[serde(default = "default_true")]
    pub preserve_colors: bool,
}

fn default_true() -> bool {
    true
}

impl BatchInput {
    fn for_path(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            aspect_ratio: None,
            fill_canvas: true,
            preserve_colors: true,
        }
    }

    /// Parse `input` as a JSON object if it is one, otherwise treat it as a
    /// path.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            bail!("empty input: expected an image path or a JSON object");
        }
        let parsed = match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value::<Self>(value)?,
            _ => Self::for_path(trimmed),
        };
        if parsed.image_path.as_os_str().is_empty() {
            bail!("missing required field 'image_path' in JSON input");
        }
        Ok(parsed)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_label(self.aspect_ratio.as_deref())
    }
}
