// SPDX-License-Identifier: GPL-3.0-only

//! Pointwise encodings of a complex field

use crate::field::{Cplx, PI, Real, TWO_PI};
use rayon::prelude::*;

const SECTOR: Real = TWO_PI / 3.0;

/// |F + max|F||²
pub fn numerical_interference(field: &[Cplx]) -> Vec<Real> {
    let reference = max_magnitude(field);
    field
        .par_iter()
        .map(|z| (z + reference).norm_sqr())
        .collect()
}

/// Re(F)
pub fn real_part(field: &[Cplx]) -> Vec<Real> {
    field.par_iter().map(|z| z.re).collect()
}

/// |F|
pub fn amplitude(field: &[Cplx]) -> Vec<Real> {
    field.par_iter().map(|z| z.norm()).collect()
}

/// arg(F) in (-π, π]
pub fn phase(field: &[Cplx]) -> Vec<Real> {
    field.par_iter().map(|z| z.arg()).collect()
}

/// Two phase-only samples per pixel whose average reproduces the field
///
/// With the field scaled to unit peak amplitude, pixel i becomes the pair
/// (φ + acos a, φ − acos a) where φ = arg + π.
pub fn two_phase(field: &[Cplx]) -> Vec<Real> {
    let normalized = normalize_peak(field);
    let mut encoded = vec![0.0; field.len() * 2];
    encoded
        .par_chunks_mut(2)
        .zip(normalized.par_iter())
        .for_each(|(pair, z)| {
            let delta = z.norm().clamp(0.0, 1.0).acos();
            let phase = z.arg() + PI;
            pair[0] = phase + delta;
            pair[1] = phase - delta;
        });
    encoded
}

/// Burckhardt three-component decomposition
///
/// The phase circle is split into three 120° sectors. Inside sector s the
/// component s carries amp·(cos φ' + sin φ'/√3), component s+1 carries
/// 2·sin φ'/√3 and the remaining one is zero, with φ' measured from the
/// start of the sector. Output is interleaved (A1, A2, A3) per pixel.
pub fn burckhardt(field: &[Cplx]) -> Vec<Real> {
    let normalized = normalize_peak(field);
    let sqrt3 = (3.0 as Real).sqrt();
    let mut encoded = vec![0.0; field.len() * 3];
    encoded
        .par_chunks_mut(3)
        .zip(normalized.par_iter())
        .for_each(|(triplet, z)| {
            let amp = z.norm();
            let phase = wrap_phase(z.arg());
            let sector = burckhardt_sector(phase);
            let local = phase - sector as Real * SECTOR;
            triplet[sector] = amp * (local.cos() + local.sin() / sqrt3);
            triplet[(sector + 1) % 3] = 2.0 * local.sin() / sqrt3;
        });
    encoded
}

/// Sector (0, 1 or 2) of a phase in [0, 2π)
#[inline]
pub fn burckhardt_sector(phase: Real) -> usize {
    ((phase / SECTOR) as usize).min(2)
}

/// Map a phase into [0, 2π)
#[inline]
pub fn wrap_phase(phase: Real) -> Real {
    let wrapped = phase.rem_euclid(TWO_PI);
    if wrapped >= TWO_PI { 0.0 } else { wrapped }
}

/// Largest magnitude in the field
pub fn max_magnitude(field: &[Cplx]) -> Real {
    field
        .par_iter()
        .map(|z| z.norm())
        .reduce(|| 0.0, Real::max)
}

/// Scale the field so its peak magnitude is one; an all-zero field is returned as is
pub fn normalize_peak(field: &[Cplx]) -> Vec<Cplx> {
    let peak = max_magnitude(field);
    if peak == 0.0 {
        return field.to_vec();
    }
    field.par_iter().map(|z| z / peak).collect()
}

/// Min-max normalize in place to [0, 1]; a constant signal becomes all zeros
pub fn normalize_unit_range(values: &mut [Real]) {
    let (min, max) = values
        .par_iter()
        .fold(
            || (Real::INFINITY, Real::NEG_INFINITY),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        )
        .reduce(
            || (Real::INFINITY, Real::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        values.fill(0.0);
        return;
    }
    values.par_iter_mut().for_each(|v| *v = (*v - min) / range);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Cplx> {
        vec![
            Cplx::new(1.0, 0.0),
            Cplx::new(0.0, 1.0),
            Cplx::new(-1.0, 0.0),
            Cplx::new(0.0, -1.0),
        ]
    }

    #[test]
    fn test_amplitude_of_unit_samples() {
        let encoded = amplitude(&samples());
        for value in encoded {
            assert!((value - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_phase_of_unit_samples() {
        let encoded = phase(&samples());
        let expected = [0.0, PI / 2.0, PI, -PI / 2.0];
        for (value, want) in encoded.iter().zip(expected) {
            assert!((value - want).abs() < 1e-6, "{value} vs {want}");
        }
    }

    #[test]
    fn test_numerical_interference_uses_peak_reference() {
        let field = vec![Cplx::new(2.0, 0.0), Cplx::new(0.0, 1.0)];
        let encoded = numerical_interference(&field);
        assert!((encoded[0] - 16.0).abs() < 1e-6);
        assert!((encoded[1] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_phase_pairs_recover_phase_and_amplitude() {
        let field = vec![
            Cplx::new(0.5, 0.5),
            Cplx::new(-2.0, 0.1),
            Cplx::new(0.0, 0.0),
            Cplx::new(0.3, -1.2),
        ];
        let normalized = normalize_peak(&field);
        let encoded = two_phase(&field);
        assert_eq!(encoded.len(), 8);
        for (i, z) in normalized.iter().enumerate() {
            let phase = z.arg() + PI;
            let delta = z.norm().acos();
            assert!((encoded[2 * i] + encoded[2 * i + 1] - 2.0 * phase).abs() < 1e-6);
            assert!((encoded[2 * i] - encoded[2 * i + 1] - 2.0 * delta).abs() < 1e-6);
        }
    }

    #[test]
    fn test_burckhardt_one_zero_per_triplet() {
        let field: Vec<Cplx> = (0..12)
            .map(|i| crate::field::cis(i as Real * 0.55) * (0.2 + i as Real * 0.05))
            .collect();
        let encoded = burckhardt(&field);
        assert_eq!(encoded.len(), 36);
        for (i, triplet) in encoded.chunks(3).enumerate() {
            let sector = burckhardt_sector(wrap_phase(field[i].arg()));
            assert_eq!(triplet[(sector + 2) % 3], 0.0, "pixel {i}");
        }
    }

    #[test]
    fn test_wrap_phase_range() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert!((wrap_phase(-PI / 2.0) - 1.5 * PI).abs() < 1e-6);
        assert!(wrap_phase(-1e-30) < TWO_PI);
    }

    #[test]
    fn test_unit_range_of_constant_signal() {
        let mut values = vec![3.0; 4];
        normalize_unit_range(&mut values);
        assert!(values.iter().all(|v| *v == 0.0));

        let mut values = vec![-1.0, 0.0, 3.0];
        normalize_unit_range(&mut values);
        assert_eq!(values, vec![0.0, 0.25, 1.0]);
    }
}
