// SPDX-License-Identifier: GPL-3.0-only

//! wgpu side-band backend
//!
//! Runs the side-band kernels in single precision. Without the `gpu`
//! feature the accelerator still exists but refuses to start.

use super::DeviceAccelerator;
use crate::constants::SignalLocation;
use crate::encoding::CropWindow;
use crate::errors::{HoloResult, ResourceError};
use crate::field::{Cplx, FieldContext, Real};
use crate::fourier::Direction;

#[cfg(feature = "gpu")]
use crate::shaders::SideBandProcessor;
#[cfg(feature = "gpu")]
use tracing::info;

/// GPU implementation of [`DeviceAccelerator`]
#[cfg(feature = "gpu")]
pub struct GpuAccelerator {
    processor: SideBandProcessor,
}

#[cfg(feature = "gpu")]
impl GpuAccelerator {
    /// Acquire a compute device and build the side-band pipelines
    pub fn new() -> HoloResult<Self> {
        let processor = pollster::block_on(SideBandProcessor::new())
            .map_err(ResourceError::GpuUnavailable)?;
        info!("GPU side-band accelerator ready");
        Ok(Self { processor })
    }
}

#[cfg(feature = "gpu")]
impl std::fmt::Debug for GpuAccelerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuAccelerator")
            .field("dimensions", &self.processor.dimensions())
            .finish()
    }
}

#[cfg(feature = "gpu")]
impl DeviceAccelerator for GpuAccelerator {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn crop(
        &mut self,
        field: &[Cplx],
        width: usize,
        height: usize,
        window: CropWindow,
    ) -> HoloResult<()> {
        if field.len() != width * height {
            return Err(ResourceError::SizeMismatch {
                expected: width * height,
                actual: field.len(),
            }
            .into());
        }
        let samples: Vec<[f32; 2]> = field.iter().map(|z| [z.re as f32, z.im as f32]).collect();
        self.processor
            .crop(&samples, width as u32, height as u32, window)
            .map_err(ResourceError::Gpu)?;
        Ok(())
    }

    fn transform(&mut self, direction: Direction) -> HoloResult<()> {
        self.processor
            .transform(direction == Direction::Backward)
            .map_err(ResourceError::Gpu)?;
        Ok(())
    }

    fn demodulate(
        &mut self,
        ctx: &FieldContext,
        location: SignalLocation,
    ) -> HoloResult<Vec<Real>> {
        let (width, height) = self.processor.dimensions();
        let loaded = width as usize * height as usize;
        if ctx.pixel_count() != loaded {
            return Err(ResourceError::SizeMismatch {
                expected: ctx.pixel_count(),
                actual: loaded,
            }
            .into());
        }
        let fringe = pollster::block_on(self.processor.demodulate(location))
            .map_err(ResourceError::Gpu)?;
        Ok(fringe.into_iter().map(|v| v as Real).collect())
    }
}

/// Placeholder used when the crate is built without the `gpu` feature
#[cfg(not(feature = "gpu"))]
#[derive(Debug)]
pub struct GpuAccelerator;

#[cfg(not(feature = "gpu"))]
fn not_enabled() -> crate::errors::HoloError {
    ResourceError::GpuUnavailable("gpu feature not enabled".to_string()).into()
}

#[cfg(not(feature = "gpu"))]
impl GpuAccelerator {
    pub fn new() -> HoloResult<Self> {
        Err(not_enabled())
    }
}

#[cfg(not(feature = "gpu"))]
impl DeviceAccelerator for GpuAccelerator {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn crop(&mut self, _: &[Cplx], _: usize, _: usize, _: CropWindow) -> HoloResult<()> {
        Err(not_enabled())
    }

    fn transform(&mut self, _: Direction) -> HoloResult<()> {
        Err(not_enabled())
    }

    fn demodulate(&mut self, _: &FieldContext, _: SignalLocation) -> HoloResult<Vec<Real>> {
        Err(not_enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{cpu, encode_side_band};
    use crate::field::cis;
    use crate::fourier::FourierService;

    fn test_field(n: usize) -> Vec<Cplx> {
        (0..n * n)
            .map(|i| cis(i as Real * 0.37) * (1.0 + (i % 5) as Real * 0.25))
            .collect()
    }

    #[cfg(feature = "gpu")]
    #[test]
    fn test_gpu_matches_cpu_side_band() {
        let mut accelerator = match GpuAccelerator::new() {
            Ok(accelerator) => accelerator,
            Err(e) => {
                println!("Skipping test (no GPU): {}", e);
                return;
            }
        };

        let ctx = FieldContext::monochrome(16, 8e-6, 532e-9);
        let field = test_field(16);
        for location in [
            SignalLocation::new(0, 1),
            SignalLocation::new(1, 1),
            SignalLocation::new(-1, -1),
        ] {
            let gpu = encode_side_band(&mut accelerator, &ctx, &field, location).unwrap();
            let cpu = cpu::side_band(&FourierService::new(), &ctx, &field, location);
            let peak = cpu.iter().fold(0.0 as Real, |m, v| m.max(v.abs())).max(1e-6);
            for (a, b) in gpu.iter().zip(&cpu) {
                assert!(
                    ((a - b) / peak).abs() < 1e-3,
                    "location {:?}: gpu {} cpu {}",
                    location,
                    a,
                    b
                );
            }
        }
    }

    #[cfg(feature = "gpu")]
    #[test]
    fn test_gpu_rejects_wrong_length() {
        let Ok(mut accelerator) = GpuAccelerator::new() else {
            return;
        };
        let window = CropWindow::for_location(4, 4, SignalLocation::default());
        assert!(accelerator.crop(&test_field(3), 4, 4, window).is_err());
    }

    #[cfg(not(feature = "gpu"))]
    #[test]
    fn test_gpu_unavailable_without_feature() {
        assert!(GpuAccelerator::new().is_err());
    }
}
