// SPDX-License-Identifier: GPL-3.0-only
//! Compute shaders for hologram encoding
//!
//! WGSL sources live next to the processor that drives them; helpers used
//! by more than one kernel are under `common/` and concatenated at load time.

pub mod side_band;

pub use side_band::{SideBandParams, SideBandProcessor, side_band_shader};
