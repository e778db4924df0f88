// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print file output — encode with embedded resolution metadata and write to
// disk. PNG resolution lives in the `pHYs` chunk (pixels per metre); JPEG
// resolution lives in the JFIF APP0 header (dots per inch).

use std::io::Cursor;
use std::path::Path;

use image::RgbImage;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use printready_core::error::{PrintReadyError, Result};
use printready_core::types::OutputFormat;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

const METERS_PER_INCH: f64 = 0.0254;

/// Convert dots per inch to the pixels-per-metre unit `pHYs` uses.
pub fn dpi_to_ppm(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Convert pixels per metre back to dots per inch.
pub fn ppm_to_dpi(ppm: u32) -> u32 {
    (ppm as f64 * METERS_PER_INCH).round() as u32
}

/// Encode `image` in `format`, declaring `dpi` on both axes.
pub fn encode_with_dpi(
    image: &RgbImage,
    format: OutputFormat,
    dpi: u32,
    jpeg_quality: u8,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => encode_png(image, dpi),
        OutputFormat::Jpeg => encode_jpeg(image, dpi, jpeg_quality),
    }
}

fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let ppm = dpi_to_ppm(dpi);

    let mut encoder = png::Encoder::new(&mut buffer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder
        .write_header()
        .map_err(|err| PrintReadyError::Encode(format!("PNG header: {err}")))?;
    writer
        .write_image_data(image.as_raw())
        .map_err(|err| PrintReadyError::Encode(format!("PNG data: {err}")))?;
    writer
        .finish()
        .map_err(|err| PrintReadyError::Encode(format!("PNG finish: {err}")))?;

    Ok(buffer)
}

fn encode_jpeg(image: &RgbImage, dpi: u32, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let density = u16::try_from(dpi)
        .map_err(|_| PrintReadyError::Encode(format!("JPEG density {dpi} out of range")))?;

    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder.set_pixel_density(PixelDensity::dpi(density));
    image
        .write_with_encoder(encoder)
        .map_err(|err| PrintReadyError::Encode(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

/// Write encoded bytes to `path`, creating parent directories.
#[instrument(skip(bytes), fields(path = %path.display(), len = bytes.len()))]
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    debug!("Print file written");
    Ok(())
}

/// SHA-256 of `data` as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Declared resolution of a PNG, in DPI, if it carries a metric `pHYs` chunk.
pub fn read_png_dpi(bytes: &[u8]) -> Result<Option<(u32, u32)>> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder
        .read_info()
        .map_err(|err| PrintReadyError::Image(format!("PNG decode failed: {err}")))?;
    Ok(reader.info().pixel_dims.and_then(|dims| match dims.unit {
        png::Unit::Meter => Some((ppm_to_dpi(dims.xppu), ppm_to_dpi(dims.yppu))),
        png::Unit::Unspecified => None,
    }))
}

/// Declared resolution of a JPEG, in DPI, from its JFIF header.
///
/// Returns `None` if the file has no JFIF segment or declares an aspect
/// ratio only.
pub fn read_jpeg_dpi(bytes: &[u8]) -> Option<(u32, u32)> {
    // SOI, then APP0: FF E0, length (2), "JFIF\0", version (2), units (1),
    // x density (2), y density (2).
    let app0 = bytes.get(2..18)?;
    if app0[..2] != [0xFF, 0xE0] || &app0[4..9] != b"JFIF\0" {
        return None;
    }
    let units = app0[11];
    let x = u16::from_be_bytes([app0[12], app0[13]]) as u32;
    let y = u16::from_be_bytes([app0[14], app0[15]]) as u32;
    match units {
        1 => Some((x, y)),
        // Dots per centimetre.
        2 => Some((
            (x as f64 * 2.54).round() as u32,
            (y as f64 * 2.54).round() as u32,
        )),
        _ => None,
    }
}
