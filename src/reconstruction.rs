// SPDX-License-Identifier: GPL-3.0-only

//! Numerical reconstruction of an encoded hologram as seen through an SLM

use crate::constants::SlmType;
use crate::errors::{ConfigError, HoloResult};
use crate::field::{Cplx, FieldContext, PI, Real, TWO_PI, ZERO, cis};
use crate::fourier::{Direction, FourierService, fft_shift};
use crate::propagation::fresnel;
use image::GrayImage;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

/// Reconstructed intensity plane and the context it was computed in
#[derive(Debug, Clone)]
pub struct SlmReconstruction {
    pub context: FieldContext,
    pub amplitude: Vec<Real>,
}

/// Complex transmittance of an SLM showing `image`
pub fn slm_field(image: &GrayImage, slm_type: SlmType) -> Vec<Cplx> {
    image
        .as_raw()
        .par_iter()
        .map(|&v| {
            let v = v as Real / 255.0;
            match slm_type {
                SlmType::Amplitude => Cplx::new(v, 0.0),
                SlmType::Phase => cis(-PI + TWO_PI * v),
            }
        })
        .collect()
}

/// Keep only the top-left quadrant of a corner-origin spectrum
pub fn keep_first_quadrant(spectrum: &[Cplx], width: usize, height: usize) -> Vec<Cplx> {
    let rows = (height / 2).saturating_sub(1);
    let cols = (width / 2).saturating_sub(1);
    spectrum
        .par_iter()
        .enumerate()
        .map(|(i, z)| {
            if i / width < rows && i % width < cols {
                *z
            } else {
                ZERO
            }
        })
        .collect()
}

/// Filter the encoded image spectrum and Fresnel-propagate it by `distance`
pub fn simulate_slm(
    fourier: &FourierService,
    image: &GrayImage,
    slm_type: SlmType,
    pixel_pitch: Real,
    wavelength: Real,
    distance: Real,
) -> HoloResult<SlmReconstruction> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let context = FieldContext::new((width, height), (pixel_pitch, pixel_pitch), vec![wavelength]);
    context.validate()?;
    if !distance.is_finite() {
        return Err(ConfigError::Invalid(format!("distance {} is not finite", distance)).into());
    }

    let start = Instant::now();
    let mut field = slm_field(image, slm_type);

    fourier.transform(width, height, &mut field, Direction::Forward);
    let mut spectrum = vec![ZERO; field.len()];
    fft_shift(&field, &mut spectrum, width, height, Direction::Forward);

    let mut filtered = keep_first_quadrant(&spectrum, width, height);
    fourier.transform(width, height, &mut filtered, Direction::Backward);
    fft_shift(&filtered, &mut field, width, height, Direction::Backward);

    let propagated = fresnel::propagate(fourier, &context, 0, &field, distance);
    let amplitude = propagated.par_iter().map(|z| z.norm()).collect();

    info!(
        width,
        height,
        ?slm_type,
        distance,
        elapsed_ms = start.elapsed().as_millis(),
        "SLM reconstruction complete"
    );

    Ok(SlmReconstruction { context, amplitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_slm_maps_gray_to_unit_phasor() {
        let image = GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        let field = slm_field(&image, SlmType::Phase);
        assert!((field[0] - Cplx::new(-1.0, 0.0)).norm() < 1e-6);
        assert!((field[1] - Cplx::new(-1.0, 0.0)).norm() < 1e-6);
        for z in &field {
            assert!((z.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_amplitude_slm_scales_to_unit() {
        let image = GrayImage::from_raw(2, 1, vec![51, 255]).unwrap();
        let field = slm_field(&image, SlmType::Amplitude);
        assert!((field[0].re - 0.2).abs() < 1e-6);
        assert_eq!(field[1], Cplx::new(1.0, 0.0));
    }

    #[test]
    fn test_quadrant_filter_bounds() {
        let spectrum = vec![Cplx::new(1.0, 0.0); 64];
        let kept = keep_first_quadrant(&spectrum, 8, 8);
        assert_eq!(kept.iter().filter(|z| **z != ZERO).count(), 9);
        assert_eq!(kept[2 * 8 + 2], Cplx::new(1.0, 0.0));
        assert_eq!(kept[3 * 8], ZERO);
    }

    #[test]
    fn test_reconstruction_has_image_size() {
        let image = GrayImage::from_fn(8, 8, |x, y| image::Luma([((x + y) * 16) as u8]));
        let result = simulate_slm(
            &FourierService::new(),
            &image,
            SlmType::Amplitude,
            8e-6,
            532e-9,
            0.1,
        )
        .unwrap();
        assert_eq!(result.context.resolution(), (8, 8));
        assert_eq!(result.amplitude.len(), 64);
        assert!(result.amplitude.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_rejects_invalid_pitch() {
        let image = GrayImage::new(4, 4);
        assert!(
            simulate_slm(&FourierService::new(), &image, SlmType::Phase, 0.0, 532e-9, 0.1).is_err()
        );
    }
}
