// SPDX-License-Identifier: GPL-3.0-only

//! Normalization and image I/O
//!
//! Encoded buffers are mapped to 8-bit samples with a min-max pass and
//! written through the `image` crate. Unknown output extensions fall back
//! to bitmap by appending `.bmp` to the requested name.

use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::errors::{ExportError, HoloResult};
use crate::field::{Cplx, Real};
use image::{GrayImage, RgbImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Min-max map `samples` to 0..=255; a constant buffer maps to zeros
pub fn normalize_to_u8(samples: &[Real]) -> Vec<u8> {
    let (min, max) = samples
        .par_iter()
        .fold(
            || (Real::INFINITY, Real::NEG_INFINITY),
            |(lo, hi), &v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (Real::INFINITY, Real::NEG_INFINITY),
            |(a, b), (c, d)| (a.min(c), b.max(d)),
        );

    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return vec![0; samples.len()];
    }

    samples
        .par_iter()
        .map(|&v| ((v - min) / range * 255.0 + 0.5).clamp(0.0, 255.0) as u8)
        .collect()
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Output path actually written for `path`
pub fn resolve_output_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if has_supported_extension(path) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".bmp");
        PathBuf::from(name)
    }
}

/// Write `samples` as an image; returns the path written
///
/// 8 bits per pixel stores one gray sample per pixel, 24 bits per pixel
/// stores interleaved RGB triplets.
pub fn save_image(
    path: impl AsRef<Path>,
    bits_per_pixel: u16,
    samples: &[u8],
    width: usize,
    height: usize,
) -> HoloResult<PathBuf> {
    if samples.is_empty() || width == 0 || height == 0 {
        return Err(ExportError::EmptyBuffer.into());
    }

    let channels = match bits_per_pixel {
        8 => 1,
        24 => 3,
        other => {
            return Err(ExportError::UnsupportedFormat(format!("{} bits per pixel", other)).into());
        }
    };
    let expected = width * height * channels;
    if samples.len() != expected {
        return Err(ExportError::SizeMismatch {
            expected,
            actual: samples.len(),
        }
        .into());
    }

    let target = resolve_output_path(path);
    debug!(path = %target.display(), width, height, bits_per_pixel, "Saving image");

    let size_error = || ExportError::SizeMismatch {
        expected,
        actual: samples.len(),
    };
    match channels {
        1 => GrayImage::from_raw(width as u32, height as u32, samples.to_vec())
            .ok_or_else(size_error)?
            .save(&target)
            .map_err(ExportError::from)?,
        _ => RgbImage::from_raw(width as u32, height as u32, samples.to_vec())
            .ok_or_else(size_error)?
            .save(&target)
            .map_err(ExportError::from)?,
    }

    info!(path = %target.display(), "Image saved");
    Ok(target)
}

/// One image of a batch save
#[derive(Debug, Clone, Copy)]
pub struct ExportImage<'a> {
    pub samples: &'a [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> ExportImage<'a> {
    pub fn new(samples: &'a [u8], width: usize, height: usize) -> Self {
        Self {
            samples,
            width,
            height,
        }
    }
}

/// Save each image as `<stem><index><ext>` next to `path`
pub fn save_images(
    path: impl AsRef<Path>,
    bits_per_pixel: u16,
    images: &[ExportImage<'_>],
) -> HoloResult<Vec<PathBuf>> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let numbered = parent.join(format!("{}{}{}", stem, i, ext));
            save_image(
                numbered,
                bits_per_pixel,
                image.samples,
                image.width,
                image.height,
            )
        })
        .collect()
}

/// Load an 8-bit grayscale bitmap; only `.bmp` files are accepted
pub fn load_bitmap(path: impl AsRef<Path>) -> HoloResult<GrayImage> {
    let path = path.as_ref();
    let is_bmp = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
    if !is_bmp {
        return Err(ExportError::UnsupportedFormat(path.display().to_string()).into());
    }
    let image = image::open(path).map_err(ExportError::from)?.into_luma8();
    debug!(path = %path.display(), width = image.width(), height = image.height(), "Bitmap loaded");
    Ok(image)
}

fn read_samples(path: &Path, count: usize) -> HoloResult<Vec<Real>> {
    let text = std::fs::read_to_string(path).map_err(ExportError::from)?;
    let mut samples = text
        .split_whitespace()
        .take(count)
        .map(|token| {
            token.parse::<Real>().map_err(|_| {
                ExportError::UnsupportedFormat(format!(
                    "invalid sample '{}' in {}",
                    token,
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    // Short files leave the tail zeroed
    samples.resize(count, 0.0);
    Ok(samples)
}

/// Read `count` complex samples from whitespace-separated real and imaginary text files
pub fn load_complex(
    real_path: impl AsRef<Path>,
    imag_path: impl AsRef<Path>,
    count: usize,
) -> HoloResult<Vec<Cplx>> {
    let re = read_samples(real_path.as_ref(), count)?;
    let im = read_samples(imag_path.as_ref(), count)?;
    Ok(re
        .into_iter()
        .zip(im)
        .map(|(re, im)| Cplx::new(re, im))
        .collect())
}
