// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// printready — Prepare generated artwork for photo printing.
//
// Entry point. Initialises logging, loads configuration and dispatches the
// subcommand. Logs go to stderr so stdout stays machine-readable.

mod request;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use printready_core::catalog::SizeCatalog;
use printready_core::config::PrepConfig;
use printready_core::error::PrintReadyError;
use printready_core::human_errors::{Severity, humanize_error};
use printready_core::types::{Orientation, SkippedSize};
use printready_image::PrintPreparer;

use request::BatchInput;

#[derive(Parser)]
#[command(name = "printready")]
#[command(about = "Upscale, fit and enhance artwork for standard photo print sizes at 300 DPI")]
struct Cli {
    /// JSON configuration file (defaults are used when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "printready_image=trace" (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare one image at one print size
    Prepare {
        /// Source image (PNG, JPEG or WebP)
        image: PathBuf,

        /// Print size name, e.g. "8x10" or "10x8"
        #[arg(short, long)]
        size: String,

        /// "portrait" (default) or "landscape"
        #[arg(long)]
        orientation: Option<String>,

        /// Letterbox onto white instead of cropping to fill
        #[arg(long)]
        no_fill: bool,

        /// Apply the vivid enhancement profile
        #[arg(long)]
        vivid: bool,

        /// Output file name inside the output directory
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Prepare one image at every size of a catalog
    Batch {
        /// Image path, or a JSON object with image_path, aspect_ratio,
        /// fill_canvas and preserve_colors
        input: String,

        /// "portrait" or "landscape"; overrides aspect_ratio from JSON
        #[arg(long)]
        orientation: Option<String>,

        /// Letterbox onto white instead of cropping to fill
        #[arg(long)]
        no_fill: bool,

        /// Apply the vivid enhancement profile
        #[arg(long)]
        vivid: bool,
    },
    /// List print sizes
    Sizes {
        /// "portrait" (default) or "landscape"
        #[arg(long)]
        orientation: Option<String>,

        /// Show the legacy single-orientation table
        #[arg(long)]
        legacy: bool,
    },
    /// Write the default configuration to a file
    InitConfig {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Commands::Prepare {
            image,
            size,
            orientation,
            no_fill,
            vivid,
            output,
        } => {
            let preparer = PrintPreparer::new(load_config(cli.config.as_deref())?);
            let path = preparer
                .prepare_image_for_print(
                    &image,
                    &size,
                    output.as_deref(),
                    !no_fill,
                    Some(Orientation::from_label(orientation.as_deref())),
                    !vivid,
                )
                .map_err(explain)?;
            println!("{}", path.display());
        }
        Commands::Batch {
            input,
            orientation,
            no_fill,
            vivid,
        } => {
            let preparer = PrintPreparer::new(load_config(cli.config.as_deref())?);
            run_batch(&preparer, &input, orientation.as_deref(), no_fill, vivid)?;
        }
        Commands::Sizes {
            orientation,
            legacy,
        } => {
            let catalog = if legacy {
                SizeCatalog::legacy()
            } else {
                SizeCatalog::for_orientation(Orientation::from_label(orientation.as_deref()))
            };
            print_sizes(&catalog);
        }
        Commands::InitConfig { path, force } => {
            init_config(&path, force)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    PrepConfig::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<PrepConfig> {
    match path {
        Some(path) => {
            let config = PrepConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            tracing::info!(path = %path.display(), "Configuration loaded");
            Ok(config)
        }
        None => Ok(PrepConfig::default()),
    }
}

fn run_batch(
    preparer: &PrintPreparer,
    input: &str,
    orientation: Option<&str>,
    no_fill: bool,
    vivid: bool,
) -> Result<()> {
    let batch = BatchInput::parse(input)?;
    let orientation = match orientation {
        Some(label) => Orientation::from_label(Some(label)),
        None => batch.orientation(),
    };
    tracing::info!(
        image = %batch.image_path.display(),
        output_dir = %preparer.config().output_dir.display(),
        %orientation,
        fill_canvas = batch.fill_canvas && !no_fill,
        preserve_colors = batch.preserve_colors && !vivid,
        "Preparing all print sizes"
    );

    let outcome = preparer
        .prepare_all_print_sizes(
            &batch.image_path,
            batch.fill_canvas && !no_fill,
            Some(orientation),
            batch.preserve_colors && !vivid,
        )
        .map_err(explain)?;

    for skipped in &outcome.skipped {
        report_skipped(skipped);
    }
    println!("{}", serde_json::to_string_pretty(&outcome.paths())?);
    Ok(())
}

fn report_skipped(skipped: &SkippedSize) {
    eprintln!("{}", skip_report(skipped));
}

/// One stderr line per skipped size. Transient failures are flagged as worth
/// re-running; broken size definitions are reported as errors.
fn skip_report(skipped: &SkippedSize) -> String {
    let human = humanize_error(&skipped.error);
    let level = match human.severity {
        Severity::Transient => "notice",
        Severity::ActionRequired => "warning",
        Severity::Permanent => "error",
    };
    let retry = if human.retriable {
        " Re-running may succeed."
    } else {
        ""
    };
    format!(
        "{level}: skipped {}: {} {}{retry}",
        skipped.size_name, human.message, human.suggestion
    )
}

fn print_sizes(catalog: &SizeCatalog) {
    for canvas in catalog.iter() {
        let (w_in, h_in) = canvas.inches();
        println!(
            "{:<6} {:>5} x {:<5} px  ({} x {} in)",
            canvas.size_name, canvas.width, canvas.height, w_in, h_in
        );
    }
}

/// Attach the plain-language explanation to a library error.
fn explain(err: PrintReadyError) -> anyhow::Error {
    let human = humanize_error(&err);
    anyhow::Error::new(err).context(format!("{} {}", human.message, human.suggestion))
}
