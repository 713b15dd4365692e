// SPDX-License-Identifier: GPL-3.0-only

//! holofringe - computer-generated holograms from point clouds and depth maps
//!
//! This library propagates a wavefield from scene geometry to the hologram
//! plane, encodes the complex field into a real fringe pattern for a spatial
//! light modulator and exports the result as an 8-bit image.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`field`]: precision, field geometry and complex buffers
//! - [`fourier`]: 2D FFT service and quadrant/circular shifts
//! - [`propagation`]: angular spectrum, Fresnel, carrier wave, point-cloud
//!   and depth-map synthesis
//! - [`encoding`]: complex-to-real encoding schemes
//! - [`backends`]: CPU and GPU side-band accelerators
//! - [`session`]: buffer lifecycle and the generate → encode → export flow
//! - [`config`], [`scene`]: JSON configuration and scene loading
//! - [`export`], [`reconstruction`]: image I/O and SLM simulation
//!
//! # Example
//!
//! ```no_run
//! use holofringe::{EncodingScheme, FieldContext, HologramSession};
//! use holofringe::config::PointCloudConfig;
//! use holofringe::scene::load_point_cloud;
//!
//! # fn main() -> holofringe::HoloResult<()> {
//! let cloud = load_point_cloud("cloud.json")?;
//! let mut session = HologramSession::new(FieldContext::monochrome(512, 8e-6, 532e-9))?;
//! session.generate_point_cloud(&PointCloudConfig::default(), &cloud)?;
//! session.encode(EncodingScheme::Phase)?;
//! session.normalize();
//! session.save("hologram.png", 8)?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod errors;
pub mod export;
pub mod field;
pub mod fourier;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod propagation;
pub mod reconstruction;
pub mod scene;
pub mod session;
#[cfg(feature = "gpu")]
pub mod shaders;

// Re-export commonly used types
pub use backends::{CpuAccelerator, DeviceAccelerator, GpuAccelerator};
pub use config::HologramConfig;
pub use constants::{Backend, EncodingScheme, Passband, SignalLocation, SlmType};
pub use errors::{HoloError, HoloResult};
pub use field::{Cplx, FieldContext, Real};
pub use session::HologramSession;
