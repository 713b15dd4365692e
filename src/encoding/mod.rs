// SPDX-License-Identifier: GPL-3.0-only

//! Complex-to-real encodings
//!
//! [`encode`] and [`encode_with_passband`] dispatch on [`EncodingScheme`] and
//! return an [`EncodedBuffer`] sized for the scheme: three samples per pixel
//! for Burckhardt, two for two-phase, one otherwise.
//!
//! Side-band schemes are only reachable through [`encode_with_passband`];
//! the plain entry point rejects them instead of guessing a passband.

pub mod schemes;
pub mod single_side_band;
pub mod window;

pub use single_side_band::SideBand;
pub use window::{CropWindow, shift_phase};

use crate::backends::cpu;
use crate::constants::{EncodingScheme, SYMMETRIZATION_SIGNAL_LOCATION};
use crate::errors::{ConfigError, HoloResult};
use crate::field::{Cplx, FieldContext, Real};
use crate::fourier::FourierService;
use tracing::debug;

/// Real-valued encoder output with its dimensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedBuffer {
    pub samples: Vec<Real>,
    pub width: usize,
    pub height: usize,
}

impl EncodedBuffer {
    /// Zeroed buffer of `width`×`height`
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            samples: vec![0.0; width * height],
            width,
            height,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Output dimensions of `scheme` for an `nx`×`ny` field
pub fn encode_size(scheme: EncodingScheme, nx: usize, ny: usize) -> (usize, usize) {
    (nx * scheme.width_factor(), ny)
}

/// Encode with any scheme that does not need a passband
pub fn encode(
    fourier: &FourierService,
    ctx: &FieldContext,
    field: &[Cplx],
    scheme: EncodingScheme,
) -> HoloResult<EncodedBuffer> {
    if scheme.needs_passband() {
        return Err(ConfigError::MissingPassband(scheme).into());
    }
    let (nx, ny) = ctx.resolution();
    let (width, height) = encode_size(scheme, nx, ny);
    debug!(scheme = scheme.name(), width, height, "Encoding field");

    let samples = match scheme {
        EncodingScheme::Phase => schemes::phase(field),
        EncodingScheme::Amplitude => schemes::amplitude(field),
        EncodingScheme::RealPart => schemes::real_part(field),
        EncodingScheme::SimpleNumericalInterference => schemes::numerical_interference(field),
        EncodingScheme::Burckhardt => schemes::burckhardt(field),
        EncodingScheme::TwoPhase => schemes::two_phase(field),
        EncodingScheme::Symmetrization => {
            cpu::side_band(fourier, ctx, field, SYMMETRIZATION_SIGNAL_LOCATION)
        }
        EncodingScheme::SingleSideBand | EncodingScheme::OffAxisSingleSideBand => {
            return Err(ConfigError::MissingPassband(scheme).into());
        }
    };

    Ok(EncodedBuffer {
        samples,
        width,
        height,
    })
}

/// Encode with a single-side-band scheme
pub fn encode_with_passband(
    fourier: &FourierService,
    ctx: &FieldContext,
    field: &[Cplx],
    scheme: EncodingScheme,
    side_band: SideBand,
) -> HoloResult<EncodedBuffer> {
    let (width, height) = ctx.resolution();
    debug!(
        scheme = scheme.name(),
        passband = side_band.passband.display_name(),
        "Encoding field with passband"
    );

    let samples = match scheme {
        EncodingScheme::SingleSideBand => {
            single_side_band::single_side_band(fourier, field, width, height, side_band.passband)
        }
        EncodingScheme::OffAxisSingleSideBand => {
            single_side_band::off_axis_single_side_band(fourier, field, width, height, side_band)
        }
        other => return Err(ConfigError::UnsupportedScheme(other).into()),
    };

    Ok(EncodedBuffer {
        samples,
        width,
        height,
    })
}
