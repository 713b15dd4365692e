// SPDX-License-Identifier: GPL-3.0-only

//! Two-step Fresnel propagation on a 2× zero-padded grid
//!
//! Padding keeps the circular convolution implied by the frequency-domain
//! product from wrapping the field around the borders.

use crate::field::{Cplx, FieldContext, Real, TWO_PI, ZERO, cis};
use crate::fourier::{Direction, FourierService};
use rayon::prelude::*;
use tracing::debug;

/// Propagate `input` (context resolution) by `distance` and return the result
pub fn propagate(
    fourier: &FourierService,
    ctx: &FieldContext,
    channel: usize,
    input: &[Cplx],
    distance: Real,
) -> Vec<Cplx> {
    let (nx, ny) = ctx.resolution();
    let (ppx, ppy) = ctx.pitch();
    let lambda = ctx.wavelength(channel);
    let (pw, ph) = (2 * nx, 2 * ny);

    debug!(nx, ny, distance, "Fresnel propagation");

    let mut padded = vec![ZERO; pw * ph];
    for (row, src) in input.chunks(nx).enumerate() {
        let start = (row + ny / 2) * pw + nx / 2;
        padded[start..start + nx].copy_from_slice(src);
    }

    let mut spectrum = fourier.centered_owned(&padded, pw, ph, Direction::Forward);

    let inv_lambda_sq = 1.0 / (lambda * lambda);
    spectrum
        .par_chunks_mut(pw)
        .enumerate()
        .for_each(|(row, samples)| {
            let fy = (row as Real - ny as Real) / (2.0 * ny as Real * ppy);
            for (col, z) in samples.iter_mut().enumerate() {
                let fx = (col as Real - nx as Real) / (2.0 * nx as Real * ppx);
                let radicand = inv_lambda_sq - fx * fx - fy * fy;
                *z = if radicand < 0.0 {
                    ZERO
                } else {
                    *z * cis(TWO_PI * distance * radicand.sqrt())
                };
            }
        });

    let field = fourier.centered_owned(&spectrum, pw, ph, Direction::Backward);

    let mut output = vec![ZERO; nx * ny];
    for (row, dst) in output.chunks_mut(nx).enumerate() {
        let start = (row + ny / 2) * pw + nx / 2;
        dst.copy_from_slice(&field[start..start + nx]);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance_returns_input() {
        let fourier = FourierService::new();
        let ctx = FieldContext::monochrome(4, 8e-6, 532e-9);
        let input: Vec<Cplx> = (0..16)
            .map(|i| Cplx::new(i as Real * 0.25, 1.0 - i as Real * 0.1))
            .collect();
        let out = propagate(&fourier, &ctx, 0, &input, 0.0);
        for (a, b) in input.iter().zip(&out) {
            assert!((a - b).norm() < 1e-5, "{a} vs {b}");
        }
    }

    #[test]
    fn test_propagation_conserves_energy_for_centered_spot() {
        let fourier = FourierService::new();
        let ctx = FieldContext::monochrome(16, 8e-6, 532e-9);
        let mut input = vec![ZERO; 256];
        input[8 * 16 + 8] = Cplx::new(1.0, 0.0);
        let out = propagate(&fourier, &ctx, 0, &input, 1e-5);
        let energy: Real = out.iter().map(|z| z.norm_sqr()).sum();
        assert!(energy > 0.0 && energy <= 1.0 + 1e-6);
    }
}
