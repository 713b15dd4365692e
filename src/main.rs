// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use holofringe::SlmType;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "holofringe")]
#[command(about = "Computer-generated hologram synthesis")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a hologram from a JSON point cloud
    PointCloud {
        /// Point cloud file (vertices, colors, n_colors, phases)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        encode: cli::EncodeArgs,
    },

    /// Generate a hologram from a depth map and amplitude image
    DepthMap {
        /// 8-bit depth image (0 = background)
        #[arg(short, long)]
        depth: PathBuf,

        /// 8-bit amplitude image of the same size
        #[arg(short, long)]
        amplitude: PathBuf,

        #[command(flatten)]
        encode: cli::EncodeArgs,
    },

    /// Encode a complex field read from real and imaginary text files
    Complex {
        /// Whitespace-separated real parts
        #[arg(long)]
        real: PathBuf,

        /// Whitespace-separated imaginary parts
        #[arg(long)]
        imag: PathBuf,

        /// Field width in pixels
        #[arg(long)]
        width: usize,

        /// Field height in pixels
        #[arg(long)]
        height: usize,

        #[command(flatten)]
        encode: cli::EncodeArgs,
    },

    /// Simulate an SLM showing an encoded bitmap and save the reconstruction
    Reconstruct {
        /// Encoded hologram (.bmp)
        #[arg(short, long)]
        input: PathBuf,

        /// SLM modulation: amplitude or phase
        #[arg(long, default_value = "amplitude")]
        slm: SlmType,

        /// SLM pixel pitch in meters
        #[arg(long, default_value = "8e-6")]
        pitch: f64,

        /// Illumination wavelength in meters
        #[arg(long, default_value = "532e-9")]
        wavelength: f64,

        /// Reconstruction distance in meters
        #[arg(long)]
        distance: f64,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=holofringe=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::PointCloud { input, encode } => cli::point_cloud(input, encode),
        Commands::DepthMap {
            depth,
            amplitude,
            encode,
        } => cli::depth_map(depth, amplitude, encode),
        Commands::Complex {
            real,
            imag,
            width,
            height,
            encode,
        } => cli::complex(real, imag, width, height, encode),
        Commands::Reconstruct {
            input,
            slm,
            pitch,
            wavelength,
            distance,
            output,
        } => cli::reconstruct(input, slm, pitch, wavelength, distance, output),
    }
}
