// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for hologram generation
//!
//! Every generating command loads an optional JSON config, fills the
//! session field, encodes it and writes the normalized fringe pattern.

use clap::Args;
use holofringe::config::HologramConfig;
use holofringe::constants::{DEFAULT_BITS_PER_PIXEL, SYMMETRIZATION_SIGNAL_LOCATION};
use holofringe::encoding::SideBand;
use holofringe::errors::ConfigError;
use holofringe::export::load_bitmap;
use holofringe::scene::{load_depth_map, load_point_cloud};
use holofringe::{Backend, EncodingScheme, FieldContext, HologramSession, Passband, Real, SlmType};
use std::path::PathBuf;
use std::time::Instant;

/// Options shared by every generating command
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON config file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Encoding scheme name or id, overrides the config
    #[arg(short, long)]
    pub encoding: Option<EncodingScheme>,

    /// Passband for single-side-band schemes: left, right, top, bottom
    #[arg(short, long)]
    pub passband: Option<Passband>,

    /// Side-band backend: cpu or gpu
    #[arg(short, long)]
    pub backend: Option<Backend>,

    /// Bits per pixel of the written image (8 or 24)
    #[arg(long, default_value_t = DEFAULT_BITS_PER_PIXEL)]
    pub bits: u16,

    /// Output image path; unknown extensions get .bmp appended
    #[arg(short, long)]
    pub output: PathBuf,
}

impl EncodeArgs {
    fn load_config(&self) -> Result<HologramConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => HologramConfig::load(path)?,
            None => HologramConfig::default(),
        };
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
        if let Some(passband) = self.passband {
            config.passband = Some(passband);
        }
        Ok(config)
    }
}

/// Generate from a point cloud file
pub fn point_cloud(input: PathBuf, args: EncodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.load_config()?;
    let cloud = load_point_cloud(&input)?;
    println!(
        "Point cloud: {} points, {} color channel(s)",
        cloud.point_count(),
        cloud.n_colors
    );

    let start = Instant::now();
    let mut session = HologramSession::from_config(&config)?;
    session.generate_point_cloud(&config.point_cloud, &cloud)?;
    println!("Propagation: {:.2}s", start.elapsed().as_secs_f64());

    finish(&mut session, &config, &args)
}

/// Generate from a depth map and amplitude image
pub fn depth_map(
    depth: PathBuf,
    amplitude: PathBuf,
    args: EncodeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = args.load_config()?;
    let scene = load_depth_map(&depth, &amplitude)?;

    // The hologram takes the size of the depth map
    let (width, height) = scene.dimensions();
    config.pixel_number = [width, height];
    println!("Depth map: {}x{}", width, height);

    let start = Instant::now();
    let mut session = HologramSession::from_config(&config)?;
    session.generate_depth_map(&config.depth_map, &scene)?;
    println!("Propagation: {:.2}s", start.elapsed().as_secs_f64());

    finish(&mut session, &config, &args)
}

/// Encode an imported complex field
pub fn complex(
    real: PathBuf,
    imag: PathBuf,
    width: usize,
    height: usize,
    args: EncodeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.load_config()?;
    let mut session = HologramSession::from_config(&config)?;
    session.load_complex(&real, &imag, width, height)?;
    finish(&mut session, &config, &args)
}

/// Simulate an SLM and save the reconstructed amplitude
pub fn reconstruct(
    input: PathBuf,
    slm: SlmType,
    pitch: f64,
    wavelength: f64,
    distance: f64,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = load_bitmap(&input)?;
    let (pitch, wavelength, distance) = (pitch as Real, wavelength as Real, distance as Real);

    let mut session = HologramSession::new(FieldContext::monochrome(1, pitch, wavelength))?;
    session.reconstruct_slm(&image, slm, pitch, wavelength, distance)?;
    session.normalize();
    let path = session.save(&output, DEFAULT_BITS_PER_PIXEL)?;
    println!("Reconstruction saved to {}", path.display());
    Ok(())
}

fn finish(
    session: &mut HologramSession,
    config: &HologramConfig,
    args: &EncodeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(carrier) = &config.carrier {
        session.apply_carrier(carrier);
    }

    let scheme = config.encoding;
    match scheme {
        EncodingScheme::SingleSideBand | EncodingScheme::OffAxisSingleSideBand => {
            let passband = config
                .passband
                .ok_or(ConfigError::MissingPassband(scheme))?;
            let (shift_x, shift_y) = config.off_axis_shift();
            session.encode_with_passband(scheme, SideBand::new(passband).with_shift(shift_x, shift_y))?;
        }
        EncodingScheme::Symmetrization => {
            session.encode_side_band(SYMMETRIZATION_SIGNAL_LOCATION)?;
        }
        other => session.encode(other)?,
    }

    let (width, height) = session.encode_size();
    println!("Encoded ({}): {}x{}", scheme.display_name(), width, height);

    session.normalize();
    let path = session.save(&args.output, args.bits)?;
    println!("Saved to {}", path.display());
    Ok(())
}
