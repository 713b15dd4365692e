// SPDX-License-Identifier: GPL-3.0-only

//! Sample precision and atomic accumulation
//!
//! The whole crate shares one floating type, chosen at build time with the
//! `single-precision` feature. Parallel accumulation goes through
//! [`AtomicReal`], a compare-exchange add on the bit pattern of a float.

use num_complex::Complex;
use std::sync::atomic::Ordering;

#[cfg(not(feature = "single-precision"))]
pub type Real = f64;
#[cfg(feature = "single-precision")]
pub type Real = f32;

#[cfg(not(feature = "single-precision"))]
type AtomicBits = std::sync::atomic::AtomicU64;
#[cfg(feature = "single-precision")]
type AtomicBits = std::sync::atomic::AtomicU32;

/// Complex sample
pub type Cplx = Complex<Real>;

pub const PI: Real = std::f64::consts::PI as Real;
pub const TWO_PI: Real = 2.0 * PI;

/// Zero complex sample
pub const ZERO: Cplx = Cplx::new(0.0, 0.0);

/// exp(iθ)
#[inline]
pub fn cis(theta: Real) -> Cplx {
    Cplx::new(theta.cos(), theta.sin())
}

/// Float cell supporting lock-free `+=` from many threads
#[derive(Debug, Default)]
pub struct AtomicReal(AtomicBits);

impl AtomicReal {
    pub fn new(value: Real) -> Self {
        Self(AtomicBits::new(value.to_bits()))
    }

    pub fn load(&self) -> Real {
        Real::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Add `value` and return the previous content
    pub fn fetch_add(&self, value: Real) -> Real {
        let result = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((Real::from_bits(bits) + value).to_bits())
            });
        let (Ok(previous) | Err(previous)) = result;
        Real::from_bits(previous)
    }

    pub fn into_inner(self) -> Real {
        Real::from_bits(self.0.into_inner())
    }
}
