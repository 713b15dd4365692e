// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use holofringe::HoloError;
use holofringe::config::HologramConfig;
use holofringe::constants::{EncodingScheme, Passband};
use holofringe::errors::ConfigError;
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("holofringe-config-{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_config_default_is_valid() {
    let config = HologramConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.off_axis_shift(), (0, 100));
}

#[test]
fn test_load_rejects_wrong_extension() {
    let dir = temp_dir("extension");
    let path = dir.join("config.xml");
    std::fs::write(&path, "{}").unwrap();
    let err = HologramConfig::load(&path).unwrap_err();
    assert!(matches!(
        err,
        HoloError::Config(ConfigError::WrongExtension { .. })
    ));
}

#[test]
fn test_load_partial_file_uses_defaults() {
    let dir = temp_dir("partial");
    let path = dir.join("config.json");
    std::fs::write(
        &path,
        r#"{"pixel_number": [64, 32], "encoding": "single-side-band", "passband": "left"}"#,
    )
    .unwrap();

    let config = HologramConfig::load(&path).unwrap();
    assert_eq!(config.pixel_number, [64, 32]);
    assert_eq!(config.encoding, EncodingScheme::SingleSideBand);
    assert_eq!(config.passband, Some(Passband::Left));
    assert_eq!(config.context().resolution(), (64, 32));
}

#[test]
fn test_bad_wave_count_is_rejected() {
    let err = HologramConfig::from_json(r#"{"wavelengths": [6e-7, 5e-7, 4e-7, 3e-7]}"#)
        .unwrap_err();
    assert!(matches!(err, HoloError::Config(ConfigError::Invalid(_))));
    assert!(HologramConfig::from_json(r#"{"wavelengths": []}"#).is_err());
}

#[test]
fn test_side_band_scheme_without_passband_is_rejected() {
    let err = HologramConfig::from_json(r#"{"encoding": "off-axis-single-side-band"}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        HoloError::Config(ConfigError::MissingPassband(_))
    ));
}

#[test]
fn test_parse_error_maps_to_config_parse() {
    let err = HologramConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(err, HoloError::Config(ConfigError::Parse(_))));
}

#[test]
fn test_render_depth_out_of_range_is_rejected() {
    let err = HologramConfig::from_json(
        r#"{"depth_map": {"default_depth_quantization": 4, "render_depth": "1:5"}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, HoloError::Config(ConfigError::RenderDepth(_))));
}
