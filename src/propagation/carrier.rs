// SPDX-License-Identifier: GPL-3.0-only

//! Linear phase carrier for off-axis reconstruction

use crate::field::{Cplx, FieldContext, Real, cis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Tilt of the reference wave
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CarrierWave {
    /// Horizontal tilt in radians
    pub angle_x: Real,
    /// Vertical tilt in radians
    pub angle_y: Real,
    /// Propagation distance scaling the ramp
    pub distance: Real,
}

impl CarrierWave {
    pub fn new(angle_x: Real, angle_y: Real, distance: Real) -> Self {
        Self {
            angle_x,
            angle_y,
            distance,
        }
    }

    /// Multiply `field` by exp(i·d·(tanθx·fx + tanθy·fy)) on a zero-centered grid
    pub fn apply(&self, ctx: &FieldContext, field: &mut [Cplx]) {
        let (nx, ny) = ctx.resolution();
        let (ppx, ppy) = ctx.pitch();
        let dfx = 1.0 / (ppx * nx as Real);
        let dfy = 1.0 / (ppy * ny as Real);
        let (tx, ty) = (self.angle_x.tan(), self.angle_y.tan());
        let half_x = (nx / 2) as Real;
        let half_y = (ny / 2) as Real;

        field
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(row, samples)| {
                let fy = (half_y - row as Real) * dfy;
                for (col, z) in samples.iter_mut().enumerate() {
                    let fx = (col as Real - half_x) * dfx;
                    *z *= cis(self.distance * (tx * fx + ty * fy));
                }
            });
    }
}
