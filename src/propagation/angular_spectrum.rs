// SPDX-License-Identifier: GPL-3.0-only

//! Angular-spectrum transfer function

use crate::field::{AtomicField, Cplx, FieldContext, Real, ZERO, cis};
use rayon::prelude::*;

/// Spatial frequency sampled at pixel (x, y) of a frequency-domain plane
///
/// The extra `-1/ssy` on the vertical axis matches the established layout of
/// accumulated spectra and is kept for compatibility.
#[inline]
pub fn frequency_at(ctx: &FieldContext, x: usize, y: usize) -> (Real, Real) {
    let (ppx, ppy) = ctx.pitch();
    let (ssx, ssy) = ctx.sensor_size();
    let fx = -1.0 / (2.0 * ppx) + x as Real / ssx;
    let fy = 1.0 / (2.0 * ppy) - 1.0 / ssy - y as Real / ssy;
    (fx, fy)
}

/// Transfer kernel exp(i·k·d·√(1 − (λfx)² − (λfy)²)) for one frequency
///
/// Returns `None` outside the propagation mask and for evanescent components
/// whose radicand is negative.
#[inline]
pub fn transfer_kernel(fx: Real, fy: Real, wavelength: Real, k: Real, distance: Real) -> Option<Cplx> {
    if fx * fx + fy * fy >= k * k {
        return None;
    }
    let radicand = 1.0 - (wavelength * fx).powi(2) - (wavelength * fy).powi(2);
    if radicand < 0.0 {
        return None;
    }
    Some(cis(k * distance * radicand.sqrt()))
}

/// Accumulate `input` propagated by `distance` into `output`
///
/// `input` is a frequency-domain plane of the context resolution. Pixels are
/// processed in parallel; several calls may target the same `output`
/// concurrently.
pub fn accumulate(
    ctx: &FieldContext,
    channel: usize,
    input: &[Cplx],
    distance: Real,
    output: &AtomicField,
) {
    let nx = ctx.width();
    let lambda = ctx.wavelength(channel);
    let k = ctx.wave_number(channel);

    input.par_iter().enumerate().for_each(|(i, value)| {
        let (fx, fy) = frequency_at(ctx, i % nx, i / nx);
        if let Some(kernel) = transfer_kernel(fx, fy, lambda, k, distance) {
            output.add(i, kernel * value);
        }
    });
}

/// Propagate a single plane and return the result
pub fn propagate(ctx: &FieldContext, channel: usize, input: &[Cplx], distance: Real) -> Vec<Cplx> {
    let output = AtomicField::zeroed(input.len());
    accumulate(ctx, channel, input, distance, &output);
    output.into_samples()
}

/// Same as [`accumulate`] for a plane no other worker touches
pub fn accumulate_into(
    ctx: &FieldContext,
    channel: usize,
    input: &[Cplx],
    distance: Real,
    output: &mut [Cplx],
) {
    let nx = ctx.width();
    let lambda = ctx.wavelength(channel);
    let k = ctx.wave_number(channel);

    output
        .par_iter_mut()
        .zip(input.par_iter())
        .enumerate()
        .for_each(|(i, (out, value))| {
            let (fx, fy) = frequency_at(ctx, i % nx, i / nx);
            let kernel = transfer_kernel(fx, fy, lambda, k, distance).unwrap_or(ZERO);
            *out += kernel * value;
        });
}
