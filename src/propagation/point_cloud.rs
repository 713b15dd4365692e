// SPDX-License-Identifier: GPL-3.0-only

//! Point-source diffraction onto the hologram plane
//!
//! Every point contributes a spherical (Rayleigh-Sommerfeld) or paraxial
//! (Fresnel) wave, restricted to the rectangle where the sampled fringe
//! frequency stays below the Nyquist limit of the pixel grid. Points are
//! processed in parallel and summed through atomic adds.

use crate::config::PointCloudConfig;
use crate::constants::DiffractionMethod;
use crate::field::{AtomicField, Cplx, FieldContext, Real, cis};
use crate::scene::PointCloudData;
use rayon::prelude::*;
use std::ops::Range;
use tracing::debug;

/// Hologram-plane coordinate of pixel center `(col, row)`
#[inline]
pub fn pixel_position(ctx: &FieldContext, col: usize, row: usize) -> (Real, Real) {
    let (ppx, ppy) = ctx.pitch();
    let (ssx, ssy) = ctx.sensor_size();
    let xi = -ssx / 2.0 + (col as Real + 0.5) * ppx;
    let eta = ssy / 2.0 - (row as Real + 0.5) * ppy;
    (xi, eta)
}

/// Half-width of the alias-free region at depth `z` for a given pitch
///
/// The local fringe frequency (x − xo)/(λ·r) must stay under 1/(2p), which
/// bounds |x − xo| by |tan θmax · z| with sin θmax = λ/(2p).
#[inline]
pub fn alias_free_half_width(wavelength: Real, pitch: Real, z: Real) -> Real {
    let t = wavelength / (2.0 * pitch);
    if t >= 1.0 {
        return Real::INFINITY;
    }
    (t / (1.0 - t * t).sqrt() * z).abs()
}

/// Pixel indices whose centers lie strictly inside (center − half, center + half)
///
/// `first` is the coordinate of pixel 0 and `step` the signed pitch.
fn index_window(center: Real, half: Real, first: Real, step: Real, n: usize) -> Range<usize> {
    if n == 0 {
        return 0..0;
    }
    if !half.is_finite() {
        return 0..n;
    }
    let a = (center - half - first) / step;
    let b = (center + half - first) / step;
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let start = lo.floor().max(0.0);
    let end = (hi.ceil() + 1.0).min(n as Real);
    if end <= start {
        return 0..0;
    }
    start as usize..end as usize
}

/// Accumulate every point of `cloud` into `output` for one channel
pub fn accumulate(
    ctx: &FieldContext,
    config: &PointCloudConfig,
    cloud: &PointCloudData,
    channel: usize,
    output: &AtomicField,
) {
    let (nx, ny) = ctx.resolution();
    let (ppx, ppy) = ctx.pitch();
    let lambda = ctx.wavelength(channel);
    let k = ctx.wave_number(channel);
    let (first_x, first_y) = pixel_position(ctx, 0, 0);
    let (sin_tx, sin_ty) = (config.tilt_angle[0].sin(), config.tilt_angle[1].sin());

    debug!(
        points = cloud.point_count(),
        channel,
        method = config.method.display_name(),
        "Point cloud diffraction"
    );

    (0..cloud.point_count()).into_par_iter().for_each(|p| {
        let v = cloud.vertices[p];
        let x = v[0] * config.scale[0];
        let y = v[1] * config.scale[1];
        let z = v[2] * config.scale[2] + config.offset_depth;
        if z == 0.0 {
            return;
        }
        let amplitude = cloud.amplitude(p, channel);
        let phase = cloud.phase(p);

        let half_x = alias_free_half_width(lambda, ppx, z);
        let half_y = alias_free_half_width(lambda, ppy, z);
        let cols = index_window(x, half_x, first_x, ppx, nx);
        let rows = index_window(y, half_y, first_y, -ppy, ny);

        // Fresnel prefactor a·exp(i(kz + φ))/(iλz)
        let fresnel_scale = cis(k * z + phase) * amplitude / Cplx::new(0.0, lambda * z);

        for row in rows {
            for col in cols.clone() {
                let (xi, eta) = pixel_position(ctx, col, row);
                let (dx, dy) = (xi - x, eta - y);
                if dx.abs() >= half_x || dy.abs() >= half_y {
                    continue;
                }
                let value = match config.method {
                    DiffractionMethod::RayleighSommerfeld => {
                        let r = (dx * dx + dy * dy + z * z).sqrt();
                        let theta = k * r + phase + k * xi * sin_tx + k * eta * sin_ty;
                        cis(theta) * (amplitude / r)
                    }
                    DiffractionMethod::Fresnel => {
                        fresnel_scale * cis(k / (2.0 * z) * (dx * dx + dy * dy))
                    }
                };
                output.add(row * nx + col, value);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_point(z: Real) -> PointCloudData {
        PointCloudData {
            vertices: vec![[0.0, 0.0, z]],
            colors: vec![1.0],
            n_colors: 1,
            phases: vec![],
        }
    }

    fn config(method: DiffractionMethod) -> PointCloudConfig {
        PointCloudConfig {
            scale: [1.0; 3],
            offset_depth: 0.0,
            method,
            tilt_angle: [0.0, 0.0],
        }
    }

    #[test]
    fn test_pixel_positions_are_symmetric() {
        let ctx = FieldContext::monochrome(4, 1.0, 0.5);
        assert_eq!(pixel_position(&ctx, 0, 0), (-1.5, 1.5));
        assert_eq!(pixel_position(&ctx, 3, 3), (1.5, -1.5));
    }

    #[test]
    fn test_index_window_clamps_to_grid() {
        assert_eq!(index_window(0.0, 100.0, -1.5, 1.0, 4), 0..4);
        assert_eq!(index_window(50.0, 1.0, -1.5, 1.0, 4), 0..0);
    }

    #[test]
    fn test_rs_point_on_axis_is_radially_symmetric() {
        let ctx = FieldContext::monochrome(8, 8e-6, 532e-9);
        let out = AtomicField::zeroed(64);
        accumulate(
            &ctx,
            &config(DiffractionMethod::RayleighSommerfeld),
            &single_point(0.05),
            0,
            &out,
        );
        let field = out.into_samples();
        // Mirror pixels around the center see the same distance
        let a = field[3 * 8 + 3];
        let b = field[4 * 8 + 4];
        assert!((a - b).norm() < 1e-6 * a.norm().max(1.0));
        assert!(a.norm() > 0.0);
        // Magnitude is 1/r
        let (xi, eta) = pixel_position(&ctx, 3, 3);
        let r = (xi * xi + eta * eta + 0.05 * 0.05).sqrt();
        assert!((a.norm() - 1.0 / r).abs() < 1e-3 / r);
    }

    #[test]
    fn test_fresnel_magnitude_is_constant_inside_window() {
        let ctx = FieldContext::monochrome(8, 8e-6, 532e-9);
        let out = AtomicField::zeroed(64);
        let z = 0.05;
        accumulate(&ctx, &config(DiffractionMethod::Fresnel), &single_point(z), 0, &out);
        let field = out.into_samples();
        let expected = 1.0 / (532e-9 * z);
        for value in field.iter().filter(|v| v.norm() > 0.0) {
            assert!((value.norm() - expected).abs() < 1e-3 * expected);
        }
    }
}
