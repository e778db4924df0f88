// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end checks of the print preparation pipeline: written files are read
// back from disk and inspected.
//
// Most cases run against catalogs scaled down by 10 so they stay fast in
// debug builds; the 4x6/6x4 and 8x10 cases use the real catalogs.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use printready_core::catalog::{LANDSCAPE_SIZES, PORTRAIT_SIZES, SizeCatalog};
use printready_core::config::PrepConfig;
use printready_core::error::PrintReadyError;
use printready_core::types::{CanvasSpec, Orientation, OutputFormat, ProcessingRequest};
use printready_image::output::{read_jpeg_dpi, read_png_dpi};
use printready_image::{BatchOptions, PrintPreparer, Upscaler};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn mini_catalog(table: &[(&str, u32, u32)]) -> SizeCatalog {
    SizeCatalog::from_entries(
        table
            .iter()
            .map(|&(name, w, h)| CanvasSpec::new(name, w / 10, h / 10)),
    )
}

fn preparer(output_dir: &Path, parallel: bool) -> PrintPreparer {
    let mut config = PrepConfig::default().with_output_dir(output_dir);
    config.parallel = parallel;
    PrintPreparer::new(config)
}

/// A source with no pure-white pixels.
fn write_gradient(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([
            (20 + x * 180 / w) as u8,
            (20 + y * 180 / h) as u8,
            (60 + (x + y) % 100) as u8,
        ])
    })
    .save(&path)
    .unwrap();
    path
}

fn read_rgb(path: &Path) -> RgbImage {
    image::open(path).unwrap().to_rgb8()
}

fn dpi_of(path: &Path) -> Option<(u32, u32)> {
    read_png_dpi(&std::fs::read(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Dimensions and DPI
// ---------------------------------------------------------------------------

#[test]
fn every_size_and_orientation_has_exact_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 70, 50);
    let preparer = preparer(&dir.path().join("out"), true);

    for (table, fill) in [
        (PORTRAIT_SIZES, true),
        (PORTRAIT_SIZES, false),
        (LANDSCAPE_SIZES, true),
        (LANDSCAPE_SIZES, false),
    ] {
        let catalog = mini_catalog(table);
        let options = BatchOptions {
            fill_canvas: fill,
            preserve_colors: true,
        };
        let outcome = preparer
            .prepare_all_with_catalog(&source, &catalog, options)
            .unwrap();
        assert!(!outcome.is_partial());
        assert_eq!(outcome.produced.len(), catalog.len());

        for (result, &(name, w, h)) in outcome.produced.iter().zip(table) {
            assert_eq!(result.canvas.size_name, name);
            let written = read_rgb(&result.output_path);
            assert_eq!(written.dimensions(), (w / 10, h / 10), "{name} fill={fill}");
            assert_eq!(dpi_of(&result.output_path), Some((300, 300)), "{name}");
        }
    }
}

#[test]
fn jpeg_output_declares_300_dpi() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 60, 80);
    let mut config = PrepConfig::default().with_output_dir(dir.path());
    config.output_format = OutputFormat::Jpeg;
    let preparer = PrintPreparer::new(config);

    let request = ProcessingRequest::new(&source, "8x10");
    let result = preparer
        .process_with_catalog(&request, &mini_catalog(PORTRAIT_SIZES))
        .unwrap();
    assert_eq!(result.format, OutputFormat::Jpeg);
    assert!(result.output_path.to_string_lossy().ends_with("_8_10_filled.jpg"));

    let bytes = std::fs::read(&result.output_path).unwrap();
    assert_eq!(read_jpeg_dpi(&bytes), Some((300, 300)));
    assert_eq!(read_rgb(&result.output_path).dimensions(), (240, 300));
}

// ---------------------------------------------------------------------------
// Fill and letterbox
// ---------------------------------------------------------------------------

#[test]
fn fill_corners_carry_source_content() {
    let dir = tempfile::tempdir().unwrap();
    // Much wider than 4x6, so fill crops left and right.
    let source = write_gradient(dir.path(), "wide.png", 300, 100);
    let request = ProcessingRequest::new(&source, "4x6");
    let result = preparer(dir.path(), false)
        .process_with_catalog(&request, &mini_catalog(PORTRAIT_SIZES))
        .unwrap();

    let out = read_rgb(&result.output_path);
    let (w, h) = out.dimensions();
    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        assert_ne!(*out.get_pixel(x, y), WHITE, "corner ({x},{y})");
    }
}

#[test]
fn letterbox_borders_are_white_and_symmetric() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("square.png");
    RgbImage::from_pixel(600, 600, Rgb([40, 70, 110]))
        .save(&source)
        .unwrap();

    let request = ProcessingRequest::new(&source, "4x6").with_fill_canvas(false);
    let result = preparer(dir.path(), false)
        .process_with_catalog(&request, &mini_catalog(PORTRAIT_SIZES))
        .unwrap();
    assert!(result.output_path.to_string_lossy().ends_with("_4_6_centered.png"));

    // 600x600 fits 120x180 as 120x120, leaving 30 rows above and below.
    let out = read_rgb(&result.output_path);
    let (w, h) = out.dimensions();
    let white_row = |y: u32| (0..w).all(|x| *out.get_pixel(x, y) == WHITE);
    let top = (0..h).take_while(|&y| white_row(y)).count() as i64;
    let bottom = (0..h).rev().take_while(|&y| white_row(y)).count() as i64;

    assert!((top - bottom).abs() <= 1, "top {top}, bottom {bottom}");
    assert!((29..=31).contains(&top), "top {top}");
    // The image itself is not white.
    assert_ne!(*out.get_pixel(w / 2, h / 2), WHITE);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_inputs_produce_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 45, 65);
    let catalog = mini_catalog(LANDSCAPE_SIZES);
    let request = ProcessingRequest::new(&source, "7x5").with_preserve_colors(false);

    let first = preparer(&dir.path().join("a"), false)
        .process_with_catalog(&request, &catalog)
        .unwrap();
    let second = preparer(&dir.path().join("b"), false)
        .process_with_catalog(&request, &catalog)
        .unwrap();

    assert_eq!(first.sha256, second.sha256);
    assert_eq!(
        std::fs::read(&first.output_path).unwrap(),
        std::fs::read(&second.output_path).unwrap()
    );
}

#[test]
fn parallel_and_sequential_batches_agree() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 80, 60);
    let catalog = mini_catalog(PORTRAIT_SIZES);

    let sequential = preparer(&dir.path().join("seq"), false)
        .prepare_all_with_catalog(&source, &catalog, BatchOptions::default())
        .unwrap();
    let parallel = preparer(&dir.path().join("par"), true)
        .prepare_all_with_catalog(&source, &catalog, BatchOptions::default())
        .unwrap();

    let names = |outcome: &printready_core::types::BatchOutcome| {
        outcome
            .produced
            .iter()
            .map(|r| r.canvas.size_name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&sequential), catalog.names());
    assert_eq!(names(&parallel), catalog.names());
    for (s, p) in sequential.produced.iter().zip(&parallel.produced) {
        assert_eq!(s.sha256, p.sha256, "{}", s.canvas.size_name);
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

#[test]
fn landscape_orientation_produces_wide_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 300, 200);
    let path = preparer(dir.path(), false)
        .prepare_image_for_print(&source, "6x4", None, true, Some(Orientation::Landscape), true)
        .unwrap();

    let (w, h) = read_rgb(&path).dimensions();
    assert_eq!((w, h), (1800, 1200));
    assert!(w > h);
    assert!(path.to_string_lossy().ends_with("print_ready_art_6_4_filled.png"));
}

#[test]
fn unset_orientation_produces_tall_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 200, 300);
    let path = preparer(dir.path(), false)
        .prepare_image_for_print(&source, "4x6", None, true, None, true)
        .unwrap();

    let (w, h) = read_rgb(&path).dimensions();
    assert_eq!((w, h), (1200, 1800));
    assert!(h > w);
}

#[test]
fn explicit_output_filename_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 200, 300);
    let path = preparer(dir.path(), false)
        .prepare_image_for_print(&source, "4x6", Some("for_the_lab.png"), true, None, true)
        .unwrap();
    assert_eq!(path, dir.path().join("for_the_lab.png"));
    assert!(path.exists());
}

// ---------------------------------------------------------------------------
// Batch failures and fallback
// ---------------------------------------------------------------------------

#[test]
fn invalid_entry_is_skipped_and_others_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "art.png", 50, 70);
    let catalog = SizeCatalog::from_entries([
        CanvasSpec::new("4x6", 120, 180),
        CanvasSpec::new("broken", 0, 0),
        CanvasSpec::new("8x10", 240, 300),
    ]);

    let outcome = preparer(dir.path(), true)
        .prepare_all_with_catalog(&source, &catalog, BatchOptions::default())
        .unwrap();

    assert!(outcome.is_partial());
    assert_eq!(outcome.paths().len(), 2);
    assert!(outcome.paths().iter().all(|p| p.exists()));
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].size_name, "broken");
    assert!(matches!(
        outcome.skipped[0].error,
        PrintReadyError::InvalidCanvas { .. }
    ));
    assert!(outcome.warnings()[0].starts_with("broken: "));
}

#[test]
fn missing_source_upscale_returns_placeholder() {
    let loaded = Upscaler::default()
        .upscale_file(Path::new("/definitely/not/here.png"), 4)
        .unwrap();
    assert!(loaded.used_fallback);
    assert_eq!(loaded.dimensions(), (1024, 1024));
}

#[test]
fn missing_source_still_produces_prints() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("vanished.png");
    let catalog = mini_catalog(PORTRAIT_SIZES);

    let outcome = preparer(dir.path(), false)
        .prepare_all_with_catalog(&missing, &catalog, BatchOptions::default())
        .unwrap();

    assert_eq!(outcome.produced.len(), catalog.len());
    assert!(outcome.produced.iter().all(|r| r.used_fallback));
    assert!(outcome.produced.iter().all(|r| r.upscale_factor == 1));
    let first = read_rgb(&outcome.produced[0].output_path);
    assert_eq!(first.dimensions(), (120, 180));
}

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn eight_by_ten_portrait_from_600x800() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_gradient(dir.path(), "portrait.png", 600, 800);
    let request = ProcessingRequest::new(&source, "8x10");

    let result = preparer(dir.path(), false).process(&request).unwrap();

    // max(2400/600, 3000/800) rounds up to 4: 2400x3200, cropped 100px top
    // and bottom to 2400x3000.
    assert_eq!(result.upscale_factor, 4);
    assert!(!result.used_fallback);
    assert_eq!(result.canvas.dimensions(), (2400, 3000));
    assert_eq!(read_rgb(&result.output_path).dimensions(), (2400, 3000));
    assert_eq!(dpi_of(&result.output_path), Some((300, 300)));
}
