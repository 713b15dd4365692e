// SPDX-License-Identifier: GPL-3.0-only

//! Wavefield propagation
//!
//! - [`angular_spectrum`]: frequency-domain transfer function with atomic accumulation
//! - [`fresnel`]: padded two-step Fresnel propagation
//! - [`carrier`]: off-axis reference tilt
//! - [`point_cloud`]: per-point diffraction integrals
//! - [`depth_map`]: layered depth-map synthesis

pub mod angular_spectrum;
pub mod carrier;
pub mod depth_map;
pub mod fresnel;
pub mod point_cloud;

pub use carrier::CarrierWave;
