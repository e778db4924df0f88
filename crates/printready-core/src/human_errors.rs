// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for sellers preparing listing artwork.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the CLI reports skipped sizes.

use crate::error::PrintReadyError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or busy external tool — trying again may work.
    Transient,
    /// The user must change something (size name, file, permissions).
    ActionRequired,
    /// The input cannot be printed as given.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether re-running the same command may succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PrintReadyError` into a `HumanError`.
pub fn humanize_error(err: &PrintReadyError) -> HumanError {
    match err {
        PrintReadyError::SourceUnreadable { path, .. } => HumanError {
            message: "The artwork file couldn't be opened.".into(),
            suggestion: format!(
                "Check that {} exists and is a PNG, JPEG or WebP image.",
                path.display()
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PrintReadyError::InvalidSize { size, valid } => HumanError {
            message: format!("\"{size}\" isn't a print size we know."),
            suggestion: format!("Pick one of: {}.", valid.join(", ")),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PrintReadyError::InvalidCanvas { size, .. } => HumanError {
            message: format!("The print size \"{size}\" is set up wrong."),
            suggestion: "Every print size needs a width and height above zero.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PrintReadyError::NoSizesProcessed { failures } => HumanError {
            message: "None of the print sizes could be made.".into(),
            suggestion: match failures.first() {
                Some(first) => format!("Fix the first problem and try again: {first}"),
                None => "The size list was empty. Choose at least one print size.".into(),
            },
            retriable: false,
            severity: Severity::Permanent,
        },

        PrintReadyError::Image(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or unusually large. Try re-exporting it as a PNG.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PrintReadyError::Encode(_) => HumanError {
            message: "The print file couldn't be written out.".into(),
            suggestion: "Try saving as PNG instead of JPEG.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PrintReadyError::ExternalUpscaler(_) => HumanError {
            message: "The upscaling tool didn't work.".into(),
            suggestion: "Check the upscaler path in your config, or remove it to use the built-in upscaler.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PrintReadyError::Io(io_err) => humanize_io_error(io_err),

        PrintReadyError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check the config file is valid JSON, or regenerate it with `printready init-config`.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::PermissionDenied => HumanError {
            message: "We're not allowed to write there.".into(),
            suggestion: "Choose an output folder you own, or fix its permissions.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        ErrorKind::NotFound => HumanError {
            message: "A file or folder is missing.".into(),
            suggestion: format!("Check the path and try again. ({err})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "Saving the print file failed.".into(),
            suggestion: format!("Make sure the disk isn't full, then try again. ({err})"),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
