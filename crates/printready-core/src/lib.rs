// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printready — Core types, print size catalogs and error definitions shared
// across all crates.

pub mod catalog;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use catalog::SizeCatalog;
pub use config::PrepConfig;
pub use error::{PrintReadyError, Result};
pub use types::*;
