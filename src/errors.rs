// SPDX-License-Identifier: GPL-3.0-only

//! Error types for hologram generation
//!
//! Failures are grouped the way the generation pipeline sees them:
//! configuration problems are caught before any buffer is touched, resource
//! problems abort a pass early without further mutation, and scene/export
//! errors come from the file collaborators at either end of the pipeline.

use crate::constants::EncodingScheme;
use thiserror::Error;

/// Result type alias using HoloError
pub type HoloResult<T> = Result<T, HoloError>;

/// Main error type
#[derive(Debug, Error)]
pub enum HoloError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Buffer and device errors
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
    /// Scene loading errors
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
    /// Image export/import errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file does not carry the expected extension
    #[error("Wrong file extension for {path}: expected .{expected}")]
    WrongExtension { path: String, expected: &'static str },
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config file could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Parameter out of its valid range
    #[error("Invalid parameter: {0}")]
    Invalid(String),
    /// Side-band schemes need a passband
    #[error("{} needs a passband", .0.display_name())]
    MissingPassband(EncodingScheme),
    /// Passband given to a scheme that does not filter
    #[error("{} does not take a passband", .0.display_name())]
    UnsupportedScheme(EncodingScheme),
    /// Unrecognized scheme name or identifier
    #[error("Unknown encoding scheme: {0}")]
    UnknownScheme(String),
    /// Render depth list could not be parsed or is empty
    #[error("Invalid render depth: {0}")]
    RenderDepth(String),
}

/// Buffer and device errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Encoding requested before any field was produced
    #[error("Diffracted field has not been computed")]
    FieldNotComputed,
    /// Channel index beyond the configured wavelengths
    #[error("Channel {channel} out of range (have {available})")]
    ChannelOutOfRange { channel: usize, available: usize },
    /// Input buffer length does not match the field resolution
    #[error("Buffer size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    /// No usable GPU adapter or the gpu feature is disabled
    #[error("GPU unavailable: {0}")]
    GpuUnavailable(String),
    /// GPU processing failure
    #[error("GPU error: {0}")]
    Gpu(String),
}

/// Scene loading errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// Scene file could not be read
    #[error("Failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    /// Point cloud file could not be parsed
    #[error("Failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),
    /// Depth or amplitude image could not be decoded
    #[error("Failed to decode scene image: {0}")]
    Image(#[from] image::ImageError),
    /// Scene content is inconsistent
    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Image export/import errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Encoding or writing the image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Reading a text or image file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Bit depth or file type not handled
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Nothing to export
    #[error("Buffer is empty")]
    EmptyBuffer,
    /// Encoded buffer changed after the last normalization
    #[error("Encoded buffer has not been normalized")]
    NotNormalized,
    /// Sample count does not match the image dimensions
    #[error("Expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
