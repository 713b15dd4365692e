// SPDX-License-Identifier: GPL-3.0-only

//! Rayon side-band backend

use super::DeviceAccelerator;
use crate::constants::SignalLocation;
use crate::encoding::{CropWindow, shift_phase};
use crate::errors::{HoloResult, ResourceError};
use crate::field::{Cplx, FieldContext, Real, ZERO};
use crate::fourier::{Direction, FourierService};
use rayon::prelude::*;

/// Copy of `field` with every sample outside `window` set to zero
pub fn crop(field: &[Cplx], width: usize, window: CropWindow) -> Vec<Cplx> {
    field
        .par_iter()
        .enumerate()
        .map(|(i, z)| {
            if window.contains(i % width, i / width) {
                *z
            } else {
                ZERO
            }
        })
        .collect()
}

/// Real part of `plane` after the demodulation phase is applied
pub fn demodulate(plane: &[Cplx], ctx: &FieldContext, location: SignalLocation) -> Vec<Real> {
    plane
        .par_iter()
        .enumerate()
        .map(|(i, z)| (z * shift_phase(ctx, location, i)).re)
        .collect()
}

/// Side-band path with a borrowed transform service
pub fn side_band(
    fourier: &FourierService,
    ctx: &FieldContext,
    field: &[Cplx],
    location: SignalLocation,
) -> Vec<Real> {
    let (nx, ny) = ctx.resolution();
    let window = CropWindow::for_location(nx, ny, location);
    let cropped = crop(field, nx, window);
    let plane = fourier.centered_owned(&cropped, nx, ny, Direction::Backward);
    demodulate(&plane, ctx, location)
}

/// CPU implementation of [`DeviceAccelerator`]
#[derive(Debug, Default)]
pub struct CpuAccelerator {
    fourier: FourierService,
    plane: Vec<Cplx>,
    width: usize,
    height: usize,
}

impl CpuAccelerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceAccelerator for CpuAccelerator {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn crop(
        &mut self,
        field: &[Cplx],
        width: usize,
        height: usize,
        window: CropWindow,
    ) -> HoloResult<()> {
        if field.len() != width * height {
            return Err(ResourceError::SizeMismatch {
                expected: width * height,
                actual: field.len(),
            }
            .into());
        }
        self.plane = crop(field, width, window);
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn transform(&mut self, direction: Direction) -> HoloResult<()> {
        self.plane = self
            .fourier
            .centered_owned(&self.plane, self.width, self.height, direction);
        Ok(())
    }

    fn demodulate(
        &mut self,
        ctx: &FieldContext,
        location: SignalLocation,
    ) -> HoloResult<Vec<Real>> {
        if ctx.pixel_count() != self.plane.len() {
            return Err(ResourceError::SizeMismatch {
                expected: ctx.pixel_count(),
                actual: self.plane.len(),
            }
            .into());
        }
        Ok(demodulate(&self.plane, ctx, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::encode_side_band;
    use crate::constants::SYMMETRIZATION_SIGNAL_LOCATION;

    fn test_field() -> Vec<Cplx> {
        (0..64)
            .map(|i| crate::field::cis(i as Real * 0.7) * (1.0 + (i % 3) as Real))
            .collect()
    }

    #[test]
    fn test_crop_zeroes_outside_window() {
        let field = vec![Cplx::new(1.0, 1.0); 64];
        let window = CropWindow::for_location(8, 8, SignalLocation::new(1, 1));
        let cropped = crop(&field, 8, window);
        let kept = cropped.iter().filter(|z| **z != ZERO).count();
        assert_eq!(kept, 16);
        assert_eq!(cropped[0], ZERO);
        assert_eq!(cropped[8 + 1], Cplx::new(1.0, 1.0));
    }

    #[test]
    fn test_accelerator_matches_borrowed_path() {
        let ctx = FieldContext::monochrome(8, 8e-6, 532e-9);
        let field = test_field();
        let location = SYMMETRIZATION_SIGNAL_LOCATION;

        let mut accelerator = CpuAccelerator::new();
        let via_trait = encode_side_band(&mut accelerator, &ctx, &field, location).unwrap();
        let direct = side_band(&FourierService::new(), &ctx, &field, location);

        assert_eq!(via_trait.len(), 64);
        for (a, b) in via_trait.iter().zip(&direct) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_crop_rejects_wrong_length() {
        let mut accelerator = CpuAccelerator::new();
        let window = CropWindow::for_location(4, 4, SignalLocation::default());
        assert!(
            accelerator
                .crop(&[ZERO; 3], 4, 4, window)
                .is_err()
        );
    }
}
