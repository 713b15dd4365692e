// SPDX-License-Identifier: GPL-3.0-only

//! Layered depth-map generation
//!
//! The depth image is quantized into `L` layers. Each selected layer is
//! masked out of the amplitude image, given an optional random phase,
//! moved to the frequency domain and back-propagated with the angular
//! spectrum kernel. Layers accumulate concurrently into one spectrum, which
//! a final centered inverse transform brings to the hologram plane.

use super::angular_spectrum;
use crate::config::DepthMapConfig;
use crate::errors::{HoloResult, ResourceError};
use crate::field::{AtomicField, Cplx, FieldContext, Real, TWO_PI, ZERO, cis};
use crate::fourier::{Direction, FourierService};
use crate::scene::DepthMapScene;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Layer index of an 8-bit depth value; 0 means "no surface"
pub fn quantize_depth(value: u8, levels: usize) -> usize {
    if value == 0 {
        return 0;
    }
    ((value as Real * levels as Real / 255.0).ceil() as usize).min(levels)
}

/// Depth of `level` (1-based): far for level 1, near for level `levels`
pub fn layer_depth(config: &DepthMapConfig, level: usize, levels: usize) -> Real {
    if levels <= 1 {
        return config.near_depth;
    }
    let step = (config.far_depth - config.near_depth) / (levels - 1) as Real;
    config.far_depth - (level as Real - 1.0) * step
}

/// Random phase factor exp(i·2π·u), u ∈ [0, 1), or 1 when disabled
pub fn random_phase(rng: &mut StdRng, enabled: bool) -> Cplx {
    if enabled {
        cis(TWO_PI * rng.gen_range(0.0..1.0))
    } else {
        Cplx::new(1.0, 0.0)
    }
}

/// Generate the hologram-plane field of `scene` for one channel
pub fn generate(
    fourier: &FourierService,
    ctx: &FieldContext,
    config: &DepthMapConfig,
    scene: &DepthMapScene,
    channel: usize,
) -> HoloResult<Vec<Cplx>> {
    let (nx, ny) = ctx.resolution();
    let (sw, sh) = scene.dimensions();
    if (sw, sh) != (nx, ny) {
        return Err(ResourceError::SizeMismatch {
            expected: nx * ny,
            actual: sw * sh,
        }
        .into());
    }
    config.validate()?;

    let levels = config.depth_levels();
    let layers = config.render_layers()?;
    let start = Instant::now();

    let quantized: Vec<usize> = scene
        .depth
        .as_raw()
        .par_iter()
        .map(|v| quantize_depth(*v, levels))
        .collect();
    let amplitude: Vec<Real> = scene
        .amplitude
        .as_raw()
        .iter()
        .map(|v| *v as Real / 255.0)
        .collect();

    let spectrum = AtomicField::zeroed(nx * ny);

    layers.par_iter().for_each(|&level| {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(level as u64));
        let mut any = false;
        let layer: Vec<Cplx> = quantized
            .iter()
            .zip(&amplitude)
            .map(|(q, a)| {
                let phase = random_phase(&mut rng, config.random_phase);
                if *q == level {
                    any = true;
                    phase * *a
                } else {
                    ZERO
                }
            })
            .collect();
        if !any {
            return;
        }

        let depth = layer_depth(config, level, levels);
        let distance = -(depth - config.field_lens);
        debug!(level, depth, distance, "Propagating depth layer");

        let layer_spectrum = fourier.centered_owned(&layer, nx, ny, Direction::Forward);
        angular_spectrum::accumulate(ctx, channel, &layer_spectrum, distance, &spectrum);
    });

    let field = fourier.centered_owned(&spectrum.into_samples(), nx, ny, Direction::Backward);

    info!(
        layers = layers.len(),
        channel,
        elapsed_ms = start.elapsed().as_millis(),
        "Depth map hologram generated"
    );
    Ok(field)
}
