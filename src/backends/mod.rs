// SPDX-License-Identifier: GPL-3.0-only

//! Side-band execution backends
//!
//! The side-band path (crop → centered inverse transform → demodulate) is
//! expressed through the [`DeviceAccelerator`] capability so the encoding
//! code does not care where it runs:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         encode_side_band / session          │
//! └────────────────────┬────────────────────────┘
//!                      │  DeviceAccelerator
//! ┌────────────────────┴────────────────────────┐
//! │  ┌─────────────┐    ┌──────────────────┐    │
//! │  │     CPU     │    │       GPU        │    │
//! │  │   (rayon)   │    │  (wgpu / WGSL)   │    │
//! │  └─────────────┘    └──────────────────┘    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cpu`]: rayon implementation, also used by symmetrization encoding
//! - [`gpu`]: compute-shader implementation (requires the `gpu` feature)

pub mod cpu;
pub mod gpu;

pub use cpu::CpuAccelerator;
pub use gpu::GpuAccelerator;

use crate::constants::{Backend, SignalLocation};
use crate::encoding::CropWindow;
use crate::errors::HoloResult;
use crate::field::{Cplx, FieldContext, Real};
use crate::fourier::Direction;
use std::time::Instant;
use tracing::{debug, info};

/// Operations a side-band backend must provide
///
/// Calls are made in order `crop`, `transform`, `demodulate` on the same
/// instance; the plane lives inside the accelerator between calls.
pub trait DeviceAccelerator: Send {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Load `field` and zero every sample outside `window`
    fn crop(
        &mut self,
        field: &[Cplx],
        width: usize,
        height: usize,
        window: CropWindow,
    ) -> HoloResult<()>;

    /// Centered 2D transform of the loaded plane; the inverse is normalized by 1/N
    fn transform(&mut self, direction: Direction) -> HoloResult<()>;

    /// Multiply by the demodulation phase and return the real part
    fn demodulate(&mut self, ctx: &FieldContext, location: SignalLocation)
    -> HoloResult<Vec<Real>>;
}

/// Create the accelerator for `backend`
pub fn create_accelerator(backend: Backend) -> HoloResult<Box<dyn DeviceAccelerator>> {
    match backend {
        Backend::Cpu => Ok(Box::new(CpuAccelerator::new())),
        Backend::Gpu => Ok(Box::new(GpuAccelerator::new()?)),
    }
}

/// Run the full side-band path on `accelerator`
pub fn encode_side_band(
    accelerator: &mut dyn DeviceAccelerator,
    ctx: &FieldContext,
    field: &[Cplx],
    location: SignalLocation,
) -> HoloResult<Vec<Real>> {
    let (nx, ny) = ctx.resolution();
    let window = CropWindow::for_location(nx, ny, location);
    let start = Instant::now();

    debug!(
        backend = accelerator.name(),
        ?window,
        "Side-band encoding"
    );

    accelerator.crop(field, nx, ny, window)?;
    accelerator.transform(Direction::Backward)?;
    let fringe = accelerator.demodulate(ctx, location)?;

    info!(
        backend = accelerator.name(),
        width = nx,
        height = ny,
        elapsed_ms = start.elapsed().as_millis(),
        "Side-band encoding complete"
    );
    Ok(fringe)
}
