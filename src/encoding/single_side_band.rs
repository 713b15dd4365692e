// SPDX-License-Identifier: GPL-3.0-only

//! Single-side-band filtering
//!
//! The centered spectrum is cut in half along one axis, transformed back
//! and the real part is rescaled to [0, 1]. The off-axis variant first
//! translates the spectrum so the kept half carries the signal.

use super::schemes::normalize_unit_range;
use crate::constants::{DEFAULT_OFF_AXIS_SHIFT, Passband};
use crate::field::{Cplx, Real, ZERO};
use crate::fourier::{Direction, FourierService};
use rayon::prelude::*;

/// Passband plus the spectral translation used by the off-axis variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideBand {
    pub passband: Passband,
    pub shift: (isize, isize),
}

impl SideBand {
    pub fn new(passband: Passband) -> Self {
        Self {
            passband,
            shift: DEFAULT_OFF_AXIS_SHIFT,
        }
    }

    pub fn with_shift(mut self, shift_x: isize, shift_y: isize) -> Self {
        self.shift = (shift_x, shift_y);
        self
    }
}

impl From<Passband> for SideBand {
    fn from(passband: Passband) -> Self {
        Self::new(passband)
    }
}

/// Zero the half of a centered spectrum that `passband` rejects
///
/// Left keeps columns below `width/2`, Right the rest; Top keeps the first
/// half of the samples in memory order, Bottom the second half.
pub fn apply_passband(spectrum: &mut [Cplx], width: usize, passband: Passband) {
    let half_width = width / 2;
    let half_len = spectrum.len() / 2;
    spectrum.par_iter_mut().enumerate().for_each(|(i, z)| {
        let reject = match passband {
            Passband::Left => i % width >= half_width,
            Passband::Right => i % width < half_width,
            Passband::Top => i >= half_len,
            Passband::Bottom => i < half_len,
        };
        if reject {
            *z = ZERO;
        }
    });
}

/// Centered spectrum of `field` with one half removed
pub fn filtered_spectrum(
    fourier: &FourierService,
    field: &[Cplx],
    width: usize,
    height: usize,
    passband: Passband,
) -> Vec<Cplx> {
    let mut spectrum = fourier.centered_owned(field, width, height, Direction::Forward);
    apply_passband(&mut spectrum, width, passband);
    spectrum
}

/// Single-side-band encoding normalized to [0, 1]
pub fn single_side_band(
    fourier: &FourierService,
    field: &[Cplx],
    width: usize,
    height: usize,
    passband: Passband,
) -> Vec<Real> {
    let spectrum = filtered_spectrum(fourier, field, width, height, passband);
    let filtered = fourier.centered_owned(&spectrum, width, height, Direction::Backward);
    let mut encoded: Vec<Real> = filtered.par_iter().map(|z| z.re).collect();
    normalize_unit_range(&mut encoded);
    encoded
}

/// Frequency-shift a copy of `field`, then apply single-side-band encoding
pub fn off_axis_single_side_band(
    fourier: &FourierService,
    field: &[Cplx],
    width: usize,
    height: usize,
    side_band: SideBand,
) -> Vec<Real> {
    let (shift_x, shift_y) = side_band.shift;
    let shifted = fourier.frequency_shift(field, width, height, shift_x, shift_y);
    single_side_band(fourier, &shifted, width, height, side_band.passband)
}
