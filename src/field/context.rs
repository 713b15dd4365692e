// SPDX-License-Identifier: GPL-3.0-only

//! Hologram plane geometry and wavelengths

use super::precision::{Real, TWO_PI};
use crate::errors::{ConfigError, HoloResult};
use serde::{Deserialize, Serialize};

/// Largest number of simultaneously encoded wavelengths
pub const MAX_CHANNELS: usize = 3;

/// Pixel grid, pitch and wavelengths of a hologram
///
/// Sensor size and wavenumbers are always derived from the stored values, so
/// they cannot drift out of sync with the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContext {
    nx: usize,
    ny: usize,
    ppx: Real,
    ppy: Real,
    wavelengths: Vec<Real>,
}

impl FieldContext {
    pub fn new(resolution: (usize, usize), pitch: (Real, Real), wavelengths: Vec<Real>) -> Self {
        Self {
            nx: resolution.0,
            ny: resolution.1,
            ppx: pitch.0,
            ppy: pitch.1,
            wavelengths,
        }
    }

    /// Square grid with a single wavelength
    pub fn monochrome(n: usize, pitch: Real, wavelength: Real) -> Self {
        Self::new((n, n), (pitch, pitch), vec![wavelength])
    }

    /// Reject geometry that would make the propagation kernels divide by zero
    pub fn validate(&self) -> HoloResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::Invalid(format!(
                "pixel number must be positive, got {}x{}",
                self.nx, self.ny
            ))
            .into());
        }
        if !(self.ppx.is_finite() && self.ppx > 0.0 && self.ppy.is_finite() && self.ppy > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pixel pitch must be positive, got ({}, {})",
                self.ppx, self.ppy
            ))
            .into());
        }
        if self.wavelengths.is_empty() || self.wavelengths.len() > MAX_CHANNELS {
            return Err(ConfigError::Invalid(format!(
                "expected 1 to {} wavelengths, got {}",
                MAX_CHANNELS,
                self.wavelengths.len()
            ))
            .into());
        }
        if let Some(bad) = self
            .wavelengths
            .iter()
            .find(|lambda| !(lambda.is_finite() && **lambda > 0.0))
        {
            return Err(ConfigError::Invalid(format!("wavelength must be positive, got {}", bad)).into());
        }
        Ok(())
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn width(&self) -> usize {
        self.nx
    }

    pub fn height(&self) -> usize {
        self.ny
    }

    pub fn pixel_count(&self) -> usize {
        self.nx * self.ny
    }

    pub fn pitch(&self) -> (Real, Real) {
        (self.ppx, self.ppy)
    }

    /// Physical extent of the grid (nx·ppx, ny·ppy)
    pub fn sensor_size(&self) -> (Real, Real) {
        (self.nx as Real * self.ppx, self.ny as Real * self.ppy)
    }

    pub fn channel_count(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn wavelengths(&self) -> &[Real] {
        &self.wavelengths
    }

    /// Wavelength of `channel`, falling back to the last configured one
    pub fn wavelength(&self, channel: usize) -> Real {
        match self.wavelengths.get(channel) {
            Some(lambda) => *lambda,
            None => self.wavelengths.last().copied().unwrap_or(0.0),
        }
    }

    /// k = 2π/λ
    pub fn wave_number(&self, channel: usize) -> Real {
        TWO_PI / self.wavelength(channel)
    }

    pub fn set_resolution(&mut self, nx: usize, ny: usize) {
        self.nx = nx;
        self.ny = ny;
    }

    pub fn set_pixel_pitch(&mut self, ppx: Real, ppy: Real) {
        self.ppx = ppx;
        self.ppy = ppy;
    }

    pub fn set_wavelengths(&mut self, wavelengths: Vec<Real>) {
        self.wavelengths = wavelengths;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values_follow_updates() {
        let mut ctx = FieldContext::monochrome(4, 8e-6, 532e-9);
        let (ssx, ssy) = ctx.sensor_size();
        assert!((ssx - 32e-6).abs() < 1e-12);
        assert!((ssy - 32e-6).abs() < 1e-12);

        ctx.set_resolution(8, 2);
        let (ssx, ssy) = ctx.sensor_size();
        assert!((ssx - 64e-6).abs() < 1e-12);
        assert!((ssy - 16e-6).abs() < 1e-12);

        let k = ctx.wave_number(0);
        assert!((k - TWO_PI / 532e-9).abs() / k < 1e-6);
    }

    #[test]
    fn test_validate_rejects_degenerate_geometry() {
        assert!(FieldContext::monochrome(4, 8e-6, 532e-9).validate().is_ok());
        assert!(FieldContext::monochrome(4, 0.0, 532e-9).validate().is_err());
        assert!(FieldContext::monochrome(4, 8e-6, 0.0).validate().is_err());
        assert!(FieldContext::monochrome(0, 8e-6, 532e-9).validate().is_err());
        assert!(
            FieldContext::new((4, 4), (8e-6, 8e-6), vec![1e-6; 4])
                .validate()
                .is_err()
        );
    }
}
