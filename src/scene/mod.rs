// SPDX-License-Identifier: GPL-3.0-only

//! Scene inputs: point clouds and depth/amplitude image pairs
//!
//! Point clouds are stored as JSON:
//!
//! ```json
//! { "vertices": [[x, y, z], ...], "colors": [r, g, b, ...], "n_colors": 3, "phases": [...] }
//! ```
//!
//! `colors` holds `n_colors` amplitudes per point. `phases` may be omitted.

use crate::errors::{HoloResult, SceneError};
use crate::field::Real;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Points with per-channel amplitudes and optional phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloudData {
    pub vertices: Vec<[Real; 3]>,
    #[serde(default)]
    pub colors: Vec<Real>,
    #[serde(default = "default_color_count")]
    pub n_colors: usize,
    #[serde(default)]
    pub phases: Vec<Real>,
}

fn default_color_count() -> usize {
    1
}

impl PointCloudData {
    pub fn point_count(&self) -> usize {
        self.vertices.len()
    }

    /// Amplitude of `point` for `channel`; channels past `n_colors` reuse the last one
    pub fn amplitude(&self, point: usize, channel: usize) -> Real {
        if self.n_colors == 0 {
            return 1.0;
        }
        let channel = channel.min(self.n_colors - 1);
        self.colors
            .get(point * self.n_colors + channel)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn phase(&self, point: usize) -> Real {
        self.phases.get(point).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.vertices.is_empty() {
            return Err(SceneError::Invalid("point cloud has no vertices".to_string()));
        }
        if !self.colors.is_empty() && self.colors.len() != self.point_count() * self.n_colors {
            return Err(SceneError::Invalid(format!(
                "expected {} color values, found {}",
                self.point_count() * self.n_colors,
                self.colors.len()
            )));
        }
        if !self.phases.is_empty() && self.phases.len() != self.point_count() {
            return Err(SceneError::Invalid(format!(
                "expected {} phase values, found {}",
                self.point_count(),
                self.phases.len()
            )));
        }
        Ok(())
    }
}

/// Load a point cloud from a JSON file
pub fn load_point_cloud(path: impl AsRef<Path>) -> HoloResult<PointCloudData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(SceneError::from)?;
    let cloud: PointCloudData = serde_json::from_str(&text).map_err(SceneError::from)?;
    cloud.validate()?;
    info!(path = %path.display(), points = cloud.point_count(), "Loaded point cloud");
    Ok(cloud)
}

/// 8-bit depth map with its matching amplitude image
#[derive(Debug, Clone)]
pub struct DepthMapScene {
    pub depth: GrayImage,
    pub amplitude: GrayImage,
}

impl DepthMapScene {
    pub fn new(depth: GrayImage, amplitude: GrayImage) -> Result<Self, SceneError> {
        if depth.dimensions() != amplitude.dimensions() {
            return Err(SceneError::Invalid(format!(
                "depth map is {:?} but amplitude image is {:?}",
                depth.dimensions(),
                amplitude.dimensions()
            )));
        }
        Ok(Self { depth, amplitude })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let (w, h) = self.depth.dimensions();
        (w as usize, h as usize)
    }
}

/// Load a depth map and amplitude image, converting both to 8-bit grayscale
pub fn load_depth_map(
    depth_path: impl AsRef<Path>,
    amplitude_path: impl AsRef<Path>,
) -> HoloResult<DepthMapScene> {
    let depth = image::open(depth_path.as_ref())
        .map_err(SceneError::from)?
        .into_luma8();
    let amplitude = image::open(amplitude_path.as_ref())
        .map_err(SceneError::from)?
        .into_luma8();
    let scene = DepthMapScene::new(depth, amplitude)?;
    let (width, height) = scene.dimensions();
    info!(width, height, "Loaded depth map scene");
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point_cloud_without_phases() {
        let json = r#"{"vertices": [[0.0, 0.0, 0.1], [1e-4, 0.0, 0.2]], "colors": [1.0, 0.5], "n_colors": 1}"#;
        let cloud: PointCloudData = serde_json::from_str(json).unwrap();
        assert!(cloud.validate().is_ok());
        assert_eq!(cloud.point_count(), 2);
        assert_eq!(cloud.amplitude(1, 2), 0.5);
        assert_eq!(cloud.phase(1), 0.0);
    }

    #[test]
    fn test_color_count_mismatch_is_rejected() {
        let cloud = PointCloudData {
            vertices: vec![[0.0; 3]; 2],
            colors: vec![1.0; 3],
            n_colors: 3,
            phases: vec![],
        };
        assert!(cloud.validate().is_err());
    }

    #[test]
    fn test_depth_scene_requires_matching_sizes() {
        let depth = GrayImage::new(4, 4);
        let amplitude = GrayImage::new(4, 2);
        assert!(DepthMapScene::new(depth, amplitude).is_err());
    }
}
