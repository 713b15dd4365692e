// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for side-band backends

use holofringe::backends::{self, cpu, create_accelerator};
use holofringe::errors::{HoloError, ResourceError};
use holofringe::field::{Cplx, FieldContext, Real, cis};
use holofringe::fourier::{Direction, FourierService};
use holofringe::{Backend, CpuAccelerator, DeviceAccelerator, SignalLocation};

fn test_field(n: usize) -> Vec<Cplx> {
    (0..n * n)
        .map(|i| cis(0.37 * i as Real) * (1.0 + (i % 5) as Real * 0.2))
        .collect()
}

#[test]
fn test_cpu_accelerator_matches_direct_path() {
    let ctx = FieldContext::monochrome(8, 8e-6, 532e-9);
    let field = test_field(8);
    let location = SignalLocation::new(-1, 1);

    let mut accelerator = CpuAccelerator::new();
    let via_trait = backends::encode_side_band(&mut accelerator, &ctx, &field, location).unwrap();
    let direct = cpu::side_band(&FourierService::new(), &ctx, &field, location);
    assert_eq!(via_trait, direct);
}

#[test]
fn test_cpu_accelerator_is_reusable() {
    let ctx = FieldContext::monochrome(4, 8e-6, 532e-9);
    let field = test_field(4);
    let mut accelerator = CpuAccelerator::new();
    let first =
        backends::encode_side_band(&mut accelerator, &ctx, &field, SignalLocation::new(0, 1))
            .unwrap();
    let second =
        backends::encode_side_band(&mut accelerator, &ctx, &field, SignalLocation::new(0, 1))
            .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cpu_crop_rejects_wrong_length() {
    let mut accelerator = CpuAccelerator::new();
    let window = holofringe::encoding::CropWindow::for_location(4, 4, SignalLocation::new(0, 0));
    let err = accelerator.crop(&test_field(3), 4, 4, window).unwrap_err();
    assert!(matches!(
        err,
        HoloError::Resource(ResourceError::SizeMismatch { .. })
    ));
}

#[test]
fn test_full_window_transform_keeps_energy() {
    let field = test_field(4);
    let mut accelerator = CpuAccelerator::new();
    let window = holofringe::encoding::CropWindow::for_location(4, 4, SignalLocation::new(0, 0));
    accelerator.crop(&field, 4, 4, window).unwrap();
    accelerator.transform(Direction::Forward).unwrap();
    accelerator.transform(Direction::Backward).unwrap();

    let ctx = FieldContext::monochrome(4, 8e-6, 532e-9);
    let restored = accelerator.demodulate(&ctx, SignalLocation::new(0, 0)).unwrap();
    for (r, z) in restored.iter().zip(&field) {
        assert!((r - z.re).abs() < 1e-4);
    }
}

#[test]
fn test_create_cpu_accelerator() {
    let accelerator = create_accelerator(Backend::Cpu).unwrap();
    assert_eq!(accelerator.name(), "cpu");
}

#[test]
fn test_gpu_matches_cpu_or_is_unavailable() {
    let ctx = FieldContext::monochrome(16, 8e-6, 532e-9);
    let field = test_field(16);
    let location = SignalLocation::new(1, -1);

    let mut accelerator = match create_accelerator(Backend::Gpu) {
        Ok(accelerator) => accelerator,
        Err(HoloError::Resource(ResourceError::GpuUnavailable(reason))) => {
            eprintln!("Skipping GPU comparison: {}", reason);
            return;
        }
        Err(other) => panic!("unexpected error: {}", other),
    };
    let gpu = backends::encode_side_band(accelerator.as_mut(), &ctx, &field, location).unwrap();
    let cpu = cpu::side_band(&FourierService::new(), &ctx, &field, location);

    let peak = cpu.iter().fold(0.0 as Real, |m, v| m.max(v.abs())).max(1.0);
    for (g, c) in gpu.iter().zip(&cpu) {
        assert!((g - c).abs() < 1e-3 * peak, "gpu {} vs cpu {}", g, c);
    }
}
