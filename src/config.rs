// SPDX-License-Identifier: GPL-3.0-only

//! Generation parameters loaded from JSON
//!
//! A config file describes the hologram plane, the encoding and the
//! parameters of both scene types. Loading fails without side effects, so a
//! session keeps its previous state when a file is rejected.

use crate::constants::{Backend, DEFAULT_OFF_AXIS_SHIFT, DiffractionMethod, EncodingScheme, Passband};
use crate::errors::{ConfigError, HoloResult};
use crate::field::{FieldContext, Real};
use crate::propagation::CarrierWave;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Extension every config file must carry
pub const CONFIG_EXTENSION: &str = "json";

/// Top-level generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HologramConfig {
    /// Hologram resolution (nx, ny)
    pub pixel_number: [usize; 2],
    /// Pixel pitch in meters (ppx, ppy)
    pub pixel_pitch: [Real; 2],
    /// One to three wavelengths in meters
    pub wavelengths: Vec<Real>,
    /// Encoding applied after propagation
    pub encoding: EncodingScheme,
    /// Half-plane kept by single-side-band schemes
    pub passband: Option<Passband>,
    /// Spectral shift in bins for off-axis single-side-band
    pub off_axis_shift: [isize; 2],
    /// Side-band execution backend
    pub backend: Backend,
    /// Optional reference tilt applied before encoding
    pub carrier: Option<CarrierWave>,
    pub point_cloud: PointCloudConfig,
    pub depth_map: DepthMapConfig,
}

impl Default for HologramConfig {
    fn default() -> Self {
        Self {
            pixel_number: [1920, 1080],
            pixel_pitch: [8e-6, 8e-6],
            wavelengths: vec![532e-9],
            encoding: EncodingScheme::default(),
            passband: None,
            off_axis_shift: [DEFAULT_OFF_AXIS_SHIFT.0, DEFAULT_OFF_AXIS_SHIFT.1],
            backend: Backend::default(),
            carrier: None,
            point_cloud: PointCloudConfig::default(),
            depth_map: DepthMapConfig::default(),
        }
    }
}

impl HologramConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> HoloResult<Self> {
        let path = path.as_ref();
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CONFIG_EXTENSION));
        if !has_extension {
            return Err(ConfigError::WrongExtension {
                path: path.display().to_string(),
                expected: CONFIG_EXTENSION,
            }
            .into());
        }

        let text = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        let config = Self::from_json(&text)?;

        info!(
            path = %path.display(),
            width = config.pixel_number[0],
            height = config.pixel_number[1],
            waves = config.wavelengths.len(),
            "Loaded hologram config"
        );
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_json(text: &str) -> HoloResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HoloResult<()> {
        self.context().validate()?;
        self.depth_map.validate()?;
        if self.encoding.needs_passband() && self.passband.is_none() {
            return Err(ConfigError::MissingPassband(self.encoding).into());
        }
        debug!(encoding = self.encoding.name(), "Config validated");
        Ok(())
    }

    /// Field geometry described by this config
    pub fn context(&self) -> FieldContext {
        FieldContext::new(
            (self.pixel_number[0], self.pixel_number[1]),
            (self.pixel_pitch[0], self.pixel_pitch[1]),
            self.wavelengths.clone(),
        )
    }

    pub fn off_axis_shift(&self) -> (isize, isize) {
        (self.off_axis_shift[0], self.off_axis_shift[1])
    }
}

/// Point-cloud specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointCloudConfig {
    /// Per-axis scale applied to vertex positions
    pub scale: [Real; 3],
    /// Distance added to every z coordinate
    pub offset_depth: Real,
    /// Diffraction integral
    pub method: DiffractionMethod,
    /// Reference wave tilt in radians (x, y), used by Rayleigh-Sommerfeld
    pub tilt_angle: [Real; 2],
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            offset_depth: 0.5,
            method: DiffractionMethod::default(),
            tilt_angle: [0.0, 0.0],
        }
    }
}

/// Depth-map specific parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthMapConfig {
    /// Use `number_of_depth_quantization` instead of the default level count
    pub change_depth_quantization: bool,
    pub default_depth_quantization: usize,
    pub number_of_depth_quantization: usize,
    /// Layers to render: "a:b" for an inclusive range or a space separated list
    pub render_depth: String,
    /// Multiply each layer by a random phase
    pub random_phase: bool,
    /// Seed for the random phase generator
    pub seed: u64,
    /// Distance between the field lens and the hologram plane
    pub field_lens: Real,
    /// Depth of the nearest layer
    pub near_depth: Real,
    /// Depth of the farthest layer
    pub far_depth: Real,
}

impl Default for DepthMapConfig {
    fn default() -> Self {
        Self {
            change_depth_quantization: false,
            default_depth_quantization: 256,
            number_of_depth_quantization: 256,
            render_depth: "1:256".to_string(),
            random_phase: true,
            seed: 0,
            field_lens: 0.0,
            near_depth: 0.4,
            far_depth: 0.5,
        }
    }
}

impl DepthMapConfig {
    /// Number of depth layers in use
    pub fn depth_levels(&self) -> usize {
        if self.change_depth_quantization {
            self.number_of_depth_quantization
        } else {
            self.default_depth_quantization
        }
    }

    /// Layer indices (1-based) selected by `render_depth`
    pub fn render_layers(&self) -> Result<Vec<usize>, ConfigError> {
        parse_render_depth(&self.render_depth)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let levels = self.depth_levels();
        if levels == 0 {
            return Err(ConfigError::Invalid(
                "depth quantization must be at least 1".to_string(),
            ));
        }
        let layers = self.render_layers()?;
        if let Some(bad) = layers.iter().find(|l| **l == 0 || **l > levels) {
            return Err(ConfigError::RenderDepth(format!(
                "layer {} outside 1..={}",
                bad, levels
            )));
        }
        Ok(())
    }
}

/// Parse "a:b" (inclusive) or "a b c" into layer indices
pub fn parse_render_depth(text: &str) -> Result<Vec<usize>, ConfigError> {
    let text = text.trim();
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::RenderDepth(format!("'{}' is not a layer index", part)))
    };

    let layers: Vec<usize> = if let Some((start, end)) = text.split_once(':') {
        let (start, end) = (parse(start)?, parse(end)?);
        if start > end {
            return Err(ConfigError::RenderDepth(format!(
                "range {}:{} is reversed",
                start, end
            )));
        }
        (start..=end).collect()
    } else {
        text.split_whitespace().map(parse).collect::<Result<_, _>>()?
    };

    if layers.is_empty() {
        return Err(ConfigError::RenderDepth("no layers selected".to_string()));
    }
    Ok(layers)
}
