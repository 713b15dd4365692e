// SPDX-License-Identifier: GPL-3.0-only

//! Complex wavefield data model
//!
//! - [`precision`]: the crate-wide float type and atomic accumulation
//! - [`context`]: grid geometry and wavelengths
//! - [`buffer`]: per-channel complex planes

pub mod buffer;
pub mod context;
pub mod precision;

pub use buffer::{AtomicField, FieldBuffer};
pub use context::{FieldContext, MAX_CHANNELS};
pub use precision::{AtomicReal, Cplx, PI, Real, TWO_PI, ZERO, cis};
