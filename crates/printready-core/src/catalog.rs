// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print size catalogs — named print sizes mapped to pixel canvases at 300 DPI.

use crate::error::{PrintReadyError, Result};
use crate::types::{CanvasSpec, Orientation};

/// Portrait sizes (height > width), in inches × 300.
pub const PORTRAIT_SIZES: &[(&str, u32, u32)] = &[
    ("4x6", 1200, 1800),
    ("5x7", 1500, 2100),
    ("8x10", 2400, 3000),
    ("11x14", 3300, 4200),
    ("16x20", 4800, 6000),
];

/// Landscape sizes (width > height), in inches × 300.
pub const LANDSCAPE_SIZES: &[(&str, u32, u32)] = &[
    ("6x4", 1800, 1200),
    ("7x5", 2100, 1500),
    ("10x8", 3000, 2400),
    ("14x11", 4200, 3300),
    ("20x16", 6000, 4800),
];

/// The single table used before orientation families existed.
pub const LEGACY_SIZES: &[(&str, u32, u32)] = PORTRAIT_SIZES;

/// An ordered, read-only table of print canvases.
///
/// Catalogs are plain values: callers pick one at the boundary and pass it
/// down, so custom tables can be injected without touching global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeCatalog {
    entries: Vec<CanvasSpec>,
}

impl SizeCatalog {
    pub fn portrait() -> Self {
        Self::from_table(PORTRAIT_SIZES)
    }

    pub fn landscape() -> Self {
        Self::from_table(LANDSCAPE_SIZES)
    }

    pub fn legacy() -> Self {
        Self::from_table(LEGACY_SIZES)
    }

    /// Landscape selects the landscape table; portrait the portrait table.
    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Self::portrait(),
            Orientation::Landscape => Self::landscape(),
        }
    }

    pub fn from_table(table: &[(&str, u32, u32)]) -> Self {
        Self::from_entries(table.iter().map(|&(name, w, h)| CanvasSpec::new(name, w, h)))
    }

    /// Build a catalog from arbitrary entries. Later duplicates replace
    /// earlier ones in place.
    pub fn from_entries(entries: impl IntoIterator<Item = CanvasSpec>) -> Self {
        entries
            .into_iter()
            .fold(Self { entries: Vec::new() }, |catalog, entry| catalog.with_entry(entry))
    }

    /// Add or replace an entry, keeping the original position on replace.
    pub fn with_entry(mut self, entry: CanvasSpec) -> Self {
        match self.entries.iter_mut().find(|e| e.size_name == entry.size_name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Look up a size by name.
    ///
    /// Fails with `InvalidSize` when the name is unknown and with
    /// `InvalidCanvas` when the entry has a zero dimension.
    pub fn resolve(&self, size_name: &str) -> Result<CanvasSpec> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.size_name == size_name)
            .ok_or_else(|| PrintReadyError::InvalidSize {
                size: size_name.to_owned(),
                valid: self.names().into_iter().map(str::to_owned).collect(),
            })?;

        if entry.width == 0 || entry.height == 0 {
            return Err(PrintReadyError::InvalidCanvas {
                size: entry.size_name.clone(),
                width: entry.width,
                height: entry.height,
            });
        }
        Ok(entry.clone())
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.size_name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanvasSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
