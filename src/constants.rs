// SPDX-License-Identifier: GPL-3.0-only

//! Encoding, filtering and backend selectors shared across the crate

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default spectral shift (x, y) applied before off-axis single-side-band filtering
pub const DEFAULT_OFF_AXIS_SHIFT: (isize, isize) = (0, 100);

/// Default bit depth of exported holograms
pub const DEFAULT_BITS_PER_PIXEL: u16 = 8;

/// Image extensions written as-is; anything else gets `.bmp` appended
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 4] = ["bmp", "jpg", "gif", "png"];

/// Signal location used by symmetrization: full x axis, upper half of y
pub const SYMMETRIZATION_SIGNAL_LOCATION: SignalLocation = SignalLocation::new(0, 1);

/// How a complex field is turned into a displayable real signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingScheme {
    /// arg(F)
    Phase,
    /// |F|
    #[default]
    Amplitude,
    /// Re(F)
    RealPart,
    /// |F + max|F||²
    SimpleNumericalInterference,
    /// Three-channel amplitude decomposition
    Burckhardt,
    /// Two interleaved phase-only samples per pixel
    TwoPhase,
    /// Half-plane spectral filtering
    SingleSideBand,
    /// Frequency shift followed by half-plane filtering
    OffAxisSingleSideBand,
    /// Cropped side band demodulated back to a real fringe
    Symmetrization,
}

impl EncodingScheme {
    /// All schemes in identifier order
    pub const ALL: [EncodingScheme; 9] = [
        EncodingScheme::Phase,
        EncodingScheme::Amplitude,
        EncodingScheme::RealPart,
        EncodingScheme::SimpleNumericalInterference,
        EncodingScheme::Burckhardt,
        EncodingScheme::TwoPhase,
        EncodingScheme::SingleSideBand,
        EncodingScheme::OffAxisSingleSideBand,
        EncodingScheme::Symmetrization,
    ];

    /// Get display name for the scheme
    pub fn display_name(&self) -> &'static str {
        match self {
            EncodingScheme::Phase => "Phase",
            EncodingScheme::Amplitude => "Amplitude",
            EncodingScheme::RealPart => "Real part",
            EncodingScheme::SimpleNumericalInterference => "Simple numerical interference",
            EncodingScheme::Burckhardt => "Burckhardt",
            EncodingScheme::TwoPhase => "Two-phase",
            EncodingScheme::SingleSideBand => "Single-side-band",
            EncodingScheme::OffAxisSingleSideBand => "Off-axis single-side-band",
            EncodingScheme::Symmetrization => "Symmetrization",
        }
    }

    /// Short name accepted on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            EncodingScheme::Phase => "phase",
            EncodingScheme::Amplitude => "amplitude",
            EncodingScheme::RealPart => "real-part",
            EncodingScheme::SimpleNumericalInterference => "simple-numerical-interference",
            EncodingScheme::Burckhardt => "burckhardt",
            EncodingScheme::TwoPhase => "two-phase",
            EncodingScheme::SingleSideBand => "single-side-band",
            EncodingScheme::OffAxisSingleSideBand => "off-axis-single-side-band",
            EncodingScheme::Symmetrization => "symmetrization",
        }
    }

    /// Look up a scheme by its numeric identifier (position in [`Self::ALL`])
    pub fn from_id(id: u32) -> Result<Self, ConfigError> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| ConfigError::UnknownScheme(id.to_string()))
    }

    /// Whether the scheme filters the spectrum and therefore needs a passband
    pub fn needs_passband(&self) -> bool {
        matches!(
            self,
            EncodingScheme::SingleSideBand | EncodingScheme::OffAxisSingleSideBand
        )
    }

    /// Encoded buffer width multiplier relative to the field width
    pub fn width_factor(&self) -> usize {
        match self {
            EncodingScheme::Burckhardt => 3,
            EncodingScheme::TwoPhase => 2,
            _ => 1,
        }
    }
}

impl FromStr for EncodingScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        if let Ok(id) = wanted.parse::<u32>() {
            return Self::from_id(id);
        }
        match wanted.as_str() {
            "ssb" => return Ok(EncodingScheme::SingleSideBand),
            "off-ssb" | "offssb" => return Ok(EncodingScheme::OffAxisSingleSideBand),
            "ni" => return Ok(EncodingScheme::SimpleNumericalInterference),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownScheme(s.to_string()))
    }
}

/// Half-plane of the spectrum kept by single-side-band filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Passband {
    /// Keep columns left of center
    Left,
    /// Keep columns right of center
    Right,
    /// Keep the upper half rows
    Top,
    /// Keep the lower half rows
    Bottom,
}

impl Passband {
    pub const ALL: [Passband; 4] = [
        Passband::Left,
        Passband::Right,
        Passband::Top,
        Passband::Bottom,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Passband::Left => "Left",
            Passband::Right => "Right",
            Passband::Top => "Top",
            Passband::Bottom => "Bottom",
        }
    }
}

impl FromStr for Passband {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|band| band.display_name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown passband '{}'", s)))
    }
}

/// Spectral quadrant flags for side-band cropping
///
/// Each component is -1, 0 or 1. Zero keeps the full axis, any other value
/// selects the quarter-width window centered in one half of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalLocation {
    pub x: i8,
    pub y: i8,
}

impl SignalLocation {
    /// Components are reduced to their sign
    pub const fn new(x: i8, y: i8) -> Self {
        Self {
            x: x.signum(),
            y: y.signum(),
        }
    }

    /// Copy with both components reduced to -1, 0 or 1
    pub const fn normalized(self) -> Self {
        Self::new(self.x, self.y)
    }
}

/// Modulation type of the display used in reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlmType {
    /// Pixel value drives transmitted amplitude
    #[default]
    Amplitude,
    /// Pixel value drives phase delay over [-π, π)
    Phase,
}

impl SlmType {
    pub const ALL: [SlmType; 2] = [SlmType::Amplitude, SlmType::Phase];

    pub fn display_name(&self) -> &'static str {
        match self {
            SlmType::Amplitude => "Amplitude",
            SlmType::Phase => "Phase",
        }
    }
}

impl FromStr for SlmType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amplitude" | "amp" => Ok(SlmType::Amplitude),
            "phase" => Ok(SlmType::Phase),
            other => Err(ConfigError::Invalid(format!("unknown SLM type '{}'", other))),
        }
    }
}

/// Diffraction integral used for point clouds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffractionMethod {
    /// Rayleigh-Sommerfeld spherical wave
    #[default]
    RayleighSommerfeld,
    /// Paraxial Fresnel approximation
    Fresnel,
}

impl DiffractionMethod {
    pub const ALL: [DiffractionMethod; 2] =
        [DiffractionMethod::RayleighSommerfeld, DiffractionMethod::Fresnel];

    pub fn display_name(&self) -> &'static str {
        match self {
            DiffractionMethod::RayleighSommerfeld => "Rayleigh-Sommerfeld",
            DiffractionMethod::Fresnel => "Fresnel",
        }
    }
}

/// Where the side-band path runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Rayon thread pool
    #[default]
    Cpu,
    /// wgpu compute shaders
    Gpu,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Cpu, Backend::Gpu];

    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::Cpu => "CPU",
            Backend::Gpu => "GPU",
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Backend::Cpu),
            "gpu" => Ok(Backend::Gpu),
            other => Err(ConfigError::Invalid(format!("unknown backend '{}'", other))),
        }
    }
}
