// SPDX-License-Identifier: GPL-3.0-only

//! Side-band crop window and demodulation phase

use crate::constants::SignalLocation;
use crate::field::{Cplx, FieldContext, Real, TWO_PI, cis};

/// Inclusive pixel rectangle kept when cropping a spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x_start: usize,
    pub x_end: usize,
    pub y_start: usize,
    pub y_end: usize,
}

impl CropWindow {
    /// Window selected by `location` on an `nx`×`ny` grid
    ///
    /// An axis with flag 0 is kept whole. Otherwise the window spans half the
    /// axis, centered inside that half: for n = 8 the kept range is 1..=4.
    pub fn for_location(nx: usize, ny: usize, location: SignalLocation) -> Self {
        let location = location.normalized();
        let (x_start, x_end) = axis_range(nx, location.x);
        let (y_start, y_end) = axis_range(ny, location.y);
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x_start && x <= self.x_end && y >= self.y_start && y <= self.y_end
    }

    pub fn width(&self) -> usize {
        self.x_end + 1 - self.x_start
    }

    pub fn height(&self) -> usize {
        self.y_end + 1 - self.y_start
    }
}

fn axis_range(n: usize, flag: i8) -> (usize, usize) {
    if flag == 0 || n < 2 {
        return (0, n.saturating_sub(1));
    }
    // Bounds are derived 1-based, then moved to 0-based
    let half = n / 2;
    let start = half - half / 2;
    let end = start + half - 1;
    (start - 1, end - 1)
}

/// Demodulation factor for flat pixel `index` of the cropped plane
///
/// Each active axis contributes exp(iθ) with θ = ±2π·offset/(4·pitch), where
/// offset is the pixel's physical position measured from the grid edge used
/// by the side-band layout. The sign follows the flag of that axis.
pub fn shift_phase(ctx: &FieldContext, location: SignalLocation, index: usize) -> Cplx {
    let nx = ctx.width();
    let (ppx, ppy) = ctx.pitch();
    let (ssx, ssy) = ctx.sensor_size();
    let mut factor = Cplx::new(1.0, 0.0);
    let location = location.normalized();

    if location.y != 0 {
        let row = (index / nx) as Real;
        let yy = ssy / 2.0 - ppy * row - ppy;
        let theta = if location.y == 1 {
            TWO_PI * yy / (4.0 * ppy)
        } else {
            TWO_PI * -yy / (4.0 * ppy)
        };
        factor *= cis(theta);
    }

    if location.x != 0 {
        let col = (index % nx) as Real;
        let xx = -ssx / 2.0 - ppx * col - ppx;
        let theta = if location.x == -1 {
            TWO_PI * -xx / (4.0 * ppx)
        } else {
            TWO_PI * xx / (4.0 * ppx)
        };
        factor *= cis(theta);
    }

    factor
}
