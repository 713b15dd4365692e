// SPDX-License-Identifier: GPL-3.0-only

//! 2D Fourier transforms and spectrum reordering
//!
//! Conventions:
//! - Forward transform: unnormalized
//! - Inverse transform: normalized by 1/(width·height)
//! - A centered transform moves the zero frequency to the array center on
//!   output and expects the spatial origin at the center on input.
//!
//! Row transforms run in parallel; columns are handled by transposing,
//! transforming rows and transposing back.

use crate::field::{Cplx, Real, ZERO};
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Transform or shift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Cached FFT plans shared across a generation session
///
/// Plans are reused between calls of the same size. The service is `Sync`,
/// so parallel depth layers can transform through one instance.
pub struct FourierService {
    planner: Mutex<FftPlanner<Real>>,
}

impl Default for FourierService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FourierService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FourierService").finish_non_exhaustive()
    }
}

impl FourierService {
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    fn plan(&self, len: usize, direction: Direction) -> Arc<dyn Fft<Real>> {
        let mut planner = self
            .planner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match direction {
            Direction::Forward => planner.plan_fft_forward(len),
            Direction::Backward => planner.plan_fft_inverse(len),
        }
    }

    /// In-place 2D transform of a row-major `width`×`height` plane
    pub fn transform(&self, width: usize, height: usize, data: &mut [Cplx], direction: Direction) {
        if width == 0 || height == 0 {
            return;
        }
        debug_assert_eq!(data.len(), width * height);
        trace!(width, height, ?direction, "2D FFT");

        let row_fft = self.plan(width, direction);
        data.par_chunks_mut(width).for_each(|row| row_fft.process(row));

        let col_fft = self.plan(height, direction);
        let mut transposed = vec![ZERO; width * height];
        transpose(data, &mut transposed, width, height);
        transposed
            .par_chunks_mut(height)
            .for_each(|col| col_fft.process(col));
        transpose(&transposed, data, height, width);

        if direction == Direction::Backward {
            let norm = 1.0 / (width * height) as Real;
            data.par_iter_mut().for_each(|z| *z *= norm);
        }
    }

    /// Transform `src` into `dst` with the zero frequency at the center
    pub fn centered(
        &self,
        src: &[Cplx],
        dst: &mut [Cplx],
        width: usize,
        height: usize,
        direction: Direction,
    ) {
        let mut work = vec![ZERO; width * height];
        fft_shift(src, &mut work, width, height, Direction::Backward);
        self.transform(width, height, &mut work, direction);
        fft_shift(&work, dst, width, height, Direction::Forward);
    }

    /// Centered transform returning a new plane
    pub fn centered_owned(
        &self,
        src: &[Cplx],
        width: usize,
        height: usize,
        direction: Direction,
    ) -> Vec<Cplx> {
        let mut dst = vec![ZERO; width * height];
        self.centered(src, &mut dst, width, height, direction);
        dst
    }

    /// Translate the spectrum of `src` by (`shift_x`, `shift_y`) frequency bins
    pub fn frequency_shift(
        &self,
        src: &[Cplx],
        width: usize,
        height: usize,
        shift_x: isize,
        shift_y: isize,
    ) -> Vec<Cplx> {
        let spectrum = self.centered_owned(src, width, height, Direction::Forward);
        let mut shifted = vec![ZERO; width * height];
        circ_shift(&spectrum, &mut shifted, shift_x, shift_y, width, height);
        self.centered_owned(&shifted, width, height, Direction::Backward)
    }
}

/// Swap quadrants so the zero frequency moves between corner and center
///
/// `Forward` rolls by ⌊n/2⌋ per axis, `Backward` by ⌈n/2⌉, so the pair is an
/// exact inverse for odd sizes too.
pub fn fft_shift<T: Copy + Send + Sync>(
    src: &[T],
    dst: &mut [T],
    width: usize,
    height: usize,
    direction: Direction,
) {
    let (sx, sy) = match direction {
        Direction::Forward => (width / 2, height / 2),
        Direction::Backward => (width - width / 2, height - height / 2),
    };
    roll(src, dst, sx, sy, width, height);
}

/// Circular shift: `dst[(x + sx) mod w, (y + sy) mod h] = src[x, y]`
pub fn circ_shift<T: Copy + Send + Sync>(
    src: &[T],
    dst: &mut [T],
    shift_x: isize,
    shift_y: isize,
    width: usize,
    height: usize,
) {
    if width == 0 || height == 0 {
        return;
    }
    let sx = shift_x.rem_euclid(width as isize) as usize;
    let sy = shift_y.rem_euclid(height as isize) as usize;
    roll(src, dst, sx, sy, width, height);
}

fn roll<T: Copy + Send + Sync>(
    src: &[T],
    dst: &mut [T],
    sx: usize,
    sy: usize,
    width: usize,
    height: usize,
) {
    if width == 0 || height == 0 {
        return;
    }
    // Each destination row reads from exactly one source row
    dst.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src_y = (y + height - sy % height) % height;
        let src_row = &src[src_y * width..(src_y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            *out = src_row[(x + width - sx % width) % width];
        }
    });
}

fn transpose(src: &[Cplx], dst: &mut [Cplx], width: usize, height: usize) {
    dst.par_chunks_mut(height).enumerate().for_each(|(x, col)| {
        for (y, out) in col.iter_mut().enumerate() {
            *out = src[y * width + x];
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Vec<Cplx> {
        (0..width * height)
            .map(|i| Cplx::new(i as Real, (i % 3) as Real))
            .collect()
    }

    #[test]
    fn test_shift_round_trip_odd_sizes() {
        let (w, h) = (5, 3);
        let src = ramp(w, h);
        let mut shifted = vec![ZERO; w * h];
        let mut back = vec![ZERO; w * h];
        fft_shift(&src, &mut shifted, w, h, Direction::Forward);
        fft_shift(&shifted, &mut back, w, h, Direction::Backward);
        assert_eq!(src, back);
    }

    #[test]
    fn test_forward_shift_moves_origin_to_center() {
        let (w, h) = (4, 4);
        let mut src = vec![ZERO; w * h];
        src[0] = Cplx::new(1.0, 0.0);
        let mut dst = vec![ZERO; w * h];
        fft_shift(&src, &mut dst, w, h, Direction::Forward);
        assert_eq!(dst[2 * w + 2], Cplx::new(1.0, 0.0));
    }

    #[test]
    fn test_transform_round_trip() {
        let service = FourierService::new();
        let (w, h) = (6, 4);
        let src = ramp(w, h);
        let mut data = src.clone();
        service.transform(w, h, &mut data, Direction::Forward);
        service.transform(w, h, &mut data, Direction::Backward);
        for (a, b) in src.iter().zip(&data) {
            assert!((a - b).norm() < 1e-6);
        }
    }

    #[test]
    fn test_forward_dc_is_sum() {
        let service = FourierService::new();
        let mut data = vec![Cplx::new(2.0, 0.0); 8 * 8];
        service.transform(8, 8, &mut data, Direction::Forward);
        assert!((data[0].re - 128.0).abs() < 1e-6);
        assert!(data[1].norm() < 1e-6);
    }

    #[test]
    fn test_centered_constant_peaks_at_center() {
        let service = FourierService::new();
        let src = vec![Cplx::new(1.0, 0.0); 16];
        let spectrum = service.centered_owned(&src, 4, 4, Direction::Forward);
        assert!((spectrum[2 * 4 + 2].re - 16.0).abs() < 1e-6);
        let energy_elsewhere: Real = spectrum
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 10)
            .map(|(_, z)| z.norm())
            .sum();
        assert!(energy_elsewhere < 1e-6);
    }

    #[test]
    fn test_circ_shift_wraps_negative() {
        let src: Vec<u8> = (0..6).collect();
        let mut dst = vec![0u8; 6];
        circ_shift(&src, &mut dst, -1, 0, 3, 2);
        assert_eq!(dst, vec![1, 2, 0, 4, 5, 3]);
    }
}
