// SPDX-License-Identifier: GPL-3.0-only

//! Hologram generation session
//!
//! [`HologramSession`] owns the field context and the three buffers of a
//! generation run (complex field, encoded, normalized) and drives them
//! through propagate, encode, normalize and export. Stages are sequential:
//! every method takes `&mut self`, so a pass cannot start while another is
//! still writing.

use crate::backends::{self, DeviceAccelerator};
use crate::config::{DepthMapConfig, HologramConfig, PointCloudConfig};
use crate::constants::{Backend, EncodingScheme, SignalLocation, SlmType};
use crate::encoding::{self, EncodedBuffer, SideBand, encode_size};
use crate::errors::{ExportError, HoloResult, ResourceError};
use crate::export;
use crate::field::{AtomicField, Cplx, FieldBuffer, FieldContext, Real, ZERO};
use crate::fourier::{Direction, FourierService};
use crate::propagation::{CarrierWave, angular_spectrum, depth_map, fresnel, point_cloud};
use crate::reconstruction;
use crate::scene::{DepthMapScene, PointCloudData};
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// State of one hologram computation
#[derive(Debug)]
pub struct HologramSession {
    context: FieldContext,
    field: FieldBuffer,
    encoded: EncodedBuffer,
    normalized: Vec<u8>,
    fourier: FourierService,
    backend: Backend,
    /// Set once a propagation pass or import wrote the field
    field_ready: bool,
    /// Set once the carrier wave has been applied to the current allocation
    carried: bool,
    /// Set by `normalize`, cleared whenever the encoded buffer changes
    normalized_current: bool,
}

impl HologramSession {
    /// Validate `context` and allocate zeroed buffers for it
    pub fn new(context: FieldContext) -> HoloResult<Self> {
        context.validate()?;
        let mut session = Self {
            context,
            field: FieldBuffer::default(),
            encoded: EncodedBuffer::default(),
            normalized: Vec::new(),
            fourier: FourierService::new(),
            backend: Backend::default(),
            field_ready: false,
            carried: false,
            normalized_current: false,
        };
        session.initialize();
        Ok(session)
    }

    /// Session for the geometry and backend of `config`
    pub fn from_config(config: &HologramConfig) -> HoloResult<Self> {
        let mut session = Self::new(config.context())?;
        session.backend = config.backend;
        Ok(session)
    }

    /// Reallocate all three buffers for the current context
    pub fn initialize(&mut self) {
        let (nx, ny) = self.context.resolution();
        let channels = self.context.channel_count();
        debug!(nx, ny, channels, "Allocating hologram buffers");

        self.field = FieldBuffer::new(nx, ny, channels);
        self.encoded = EncodedBuffer::zeroed(nx, ny);
        self.normalized = vec![0; nx * ny];
        self.field_ready = false;
        self.carried = false;
        self.normalized_current = false;
    }

    /// Change the hologram resolution; buffers are rebuilt only when it differs
    pub fn set_resolution(&mut self, nx: usize, ny: usize) -> HoloResult<()> {
        if self.context.resolution() == (nx, ny) {
            return Ok(());
        }
        let mut context = self.context.clone();
        context.set_resolution(nx, ny);
        context.validate()?;

        info!(
            from = ?self.context.resolution(),
            to = ?(nx, ny),
            "Resolution changed, reallocating buffers"
        );
        self.context = context;
        self.initialize();
        Ok(())
    }

    pub fn set_pixel_pitch(&mut self, ppx: Real, ppy: Real) -> HoloResult<()> {
        let mut context = self.context.clone();
        context.set_pixel_pitch(ppx, ppy);
        context.validate()?;
        self.context = context;
        Ok(())
    }

    /// Replace the wavelengths; a different channel count rebuilds the buffers
    pub fn set_wavelengths(&mut self, wavelengths: Vec<Real>) -> HoloResult<()> {
        let mut context = self.context.clone();
        context.set_wavelengths(wavelengths);
        context.validate()?;

        let reallocate = context.channel_count() != self.context.channel_count();
        self.context = context;
        if reallocate {
            self.initialize();
        }
        Ok(())
    }

    /// Zero every buffer in place
    pub fn reset_buffers(&mut self) {
        self.field.clear();
        self.encoded.samples.fill(0.0);
        self.normalized.fill(0);
        self.field_ready = false;
        self.carried = false;
        self.normalized_current = false;
    }

    pub fn set_backend(&mut self, backend: Backend) {
        self.backend = backend;
    }

    /// Add the diffraction pattern of `cloud` to every channel
    pub fn generate_point_cloud(
        &mut self,
        config: &PointCloudConfig,
        cloud: &PointCloudData,
    ) -> HoloResult<()> {
        self.context.validate()?;
        cloud.validate()?;
        let start = Instant::now();

        for channel in 0..self.field.channel_count() {
            let accumulator = AtomicField::from_samples(self.field.channel(channel)?);
            point_cloud::accumulate(&self.context, config, cloud, channel, &accumulator);
            self.field.store(channel, accumulator.into_samples())?;
        }
        self.field_changed();

        info!(
            points = cloud.point_count(),
            channels = self.field.channel_count(),
            elapsed_ms = start.elapsed().as_millis(),
            "Point cloud hologram generated"
        );
        Ok(())
    }

    /// Add the layered field of a depth-map scene to every channel
    pub fn generate_depth_map(
        &mut self,
        config: &DepthMapConfig,
        scene: &DepthMapScene,
    ) -> HoloResult<()> {
        self.context.validate()?;
        for channel in 0..self.field.channel_count() {
            let layer_field =
                depth_map::generate(&self.fourier, &self.context, config, scene, channel)?;
            let plane = self.field.channel_mut(channel)?;
            for (out, value) in plane.iter_mut().zip(layer_field) {
                *out += value;
            }
        }
        self.field_changed();
        Ok(())
    }

    /// Replace the field with samples read from real and imaginary text files
    ///
    /// The session resolution becomes `nx`×`ny`; every channel gets the same data.
    pub fn load_complex(
        &mut self,
        real_path: impl AsRef<Path>,
        imag_path: impl AsRef<Path>,
        nx: usize,
        ny: usize,
    ) -> HoloResult<()> {
        let samples = export::load_complex(real_path, imag_path, nx * ny)?;
        self.set_resolution(nx, ny)?;
        for channel in 0..self.field.channel_count() {
            self.field.store(channel, samples.clone())?;
        }
        self.field_changed();
        info!(nx, ny, "Complex field loaded");
        Ok(())
    }

    /// Angular-spectrum propagate every channel by `distance`
    pub fn propagate_angular_spectrum(&mut self, distance: Real) -> HoloResult<()> {
        self.require_field()?;
        let (nx, ny) = self.context.resolution();
        for channel in 0..self.field.channel_count() {
            let spectrum = self.fourier.centered_owned(
                self.field.channel(channel)?,
                nx,
                ny,
                Direction::Forward,
            );
            let mut propagated = vec![ZERO; nx * ny];
            angular_spectrum::accumulate_into(
                &self.context,
                channel,
                &spectrum,
                distance,
                &mut propagated,
            );
            let plane = self
                .fourier
                .centered_owned(&propagated, nx, ny, Direction::Backward);
            self.field.store(channel, plane)?;
        }
        self.field_changed();
        debug!(distance, "Angular spectrum propagation applied");
        Ok(())
    }

    /// Fresnel propagate every channel by `distance`
    pub fn propagate_fresnel(&mut self, distance: Real) -> HoloResult<()> {
        self.require_field()?;
        for channel in 0..self.field.channel_count() {
            let plane = fresnel::propagate(
                &self.fourier,
                &self.context,
                channel,
                self.field.channel(channel)?,
                distance,
            );
            self.field.store(channel, plane)?;
        }
        self.field_changed();
        Ok(())
    }

    /// Tilt the field with `carrier`; returns false when already applied
    /// or when no field has been computed yet
    pub fn apply_carrier(&mut self, carrier: &CarrierWave) -> bool {
        if !self.field_ready {
            warn!("Carrier wave requested before any field was computed");
            return false;
        }
        if self.carried {
            debug!("Carrier wave already applied, skipping");
            return false;
        }
        for plane in self.field.channels_mut() {
            carrier.apply(&self.context, plane);
        }
        self.carried = true;
        self.clear_output();
        debug!(?carrier, "Carrier wave applied");
        true
    }

    /// Encode channel 0 with a scheme that needs no passband
    pub fn encode(&mut self, scheme: EncodingScheme) -> HoloResult<()> {
        self.encode_channel(scheme, 0)
    }

    pub fn encode_channel(&mut self, scheme: EncodingScheme, channel: usize) -> HoloResult<()> {
        self.require_field()?;
        let start = Instant::now();
        let (nx, ny) = self.context.resolution();
        let (width, height) = encode_size(scheme, nx, ny);
        self.replace_encoded(EncodedBuffer::zeroed(width, height));

        let field = self.ready_channel(channel)?;
        let encoded = encoding::encode(&self.fourier, &self.context, field, scheme)?;
        self.replace_encoded(encoded);

        info!(
            scheme = scheme.display_name(),
            channel,
            width,
            height,
            elapsed_ms = start.elapsed().as_millis(),
            "Encoding complete"
        );
        Ok(())
    }

    /// Encode channel 0 with a single-side-band scheme
    pub fn encode_with_passband(
        &mut self,
        scheme: EncodingScheme,
        side_band: impl Into<SideBand>,
    ) -> HoloResult<()> {
        self.encode_channel_with_passband(scheme, side_band, 0)
    }

    pub fn encode_channel_with_passband(
        &mut self,
        scheme: EncodingScheme,
        side_band: impl Into<SideBand>,
        channel: usize,
    ) -> HoloResult<()> {
        self.require_field()?;
        let side_band = side_band.into();
        let start = Instant::now();
        self.replace_encoded(EncodedBuffer::zeroed(
            self.context.width(),
            self.context.height(),
        ));

        let field = self.ready_channel(channel)?;
        let encoded = encoding::encode_with_passband(
            &self.fourier,
            &self.context,
            field,
            scheme,
            side_band,
        )?;
        self.replace_encoded(encoded);

        info!(
            scheme = scheme.display_name(),
            passband = side_band.passband.display_name(),
            channel,
            elapsed_ms = start.elapsed().as_millis(),
            "Encoding complete"
        );
        Ok(())
    }

    /// Side-band encode channel 0 on the session backend
    pub fn encode_side_band(&mut self, location: SignalLocation) -> HoloResult<()> {
        let mut accelerator = backends::create_accelerator(self.backend).inspect_err(|e| {
            error!(backend = ?self.backend, error = %e, "Side-band backend unavailable");
        })?;
        self.encode_side_band_on(accelerator.as_mut(), location)
    }

    /// Side-band encode channel 0 on an explicit accelerator
    pub fn encode_side_band_on(
        &mut self,
        accelerator: &mut dyn DeviceAccelerator,
        location: SignalLocation,
    ) -> HoloResult<()> {
        self.require_field()?;
        let (nx, ny) = self.context.resolution();
        self.replace_encoded(EncodedBuffer::zeroed(nx, ny));

        let field = self.ready_channel(0)?;
        let samples = backends::encode_side_band(accelerator, &self.context, field, location)
            .inspect_err(|e| error!(backend = accelerator.name(), error = %e, "Side-band encoding failed"))?;
        self.replace_encoded(EncodedBuffer {
            samples,
            width: nx,
            height: ny,
        });
        Ok(())
    }

    /// Replace the session with the numerical reconstruction of an encoded image
    ///
    /// The context takes the image size, `pixel_pitch` and `wavelength`; the
    /// encoded buffer receives the reconstructed amplitude.
    pub fn reconstruct_slm(
        &mut self,
        image: &GrayImage,
        slm_type: SlmType,
        pixel_pitch: Real,
        wavelength: Real,
        distance: Real,
    ) -> HoloResult<()> {
        let result = reconstruction::simulate_slm(
            &self.fourier,
            image,
            slm_type,
            pixel_pitch,
            wavelength,
            distance,
        )?;
        self.context = result.context;
        self.initialize();
        let (nx, ny) = self.context.resolution();
        self.replace_encoded(EncodedBuffer {
            samples: result.amplitude,
            width: nx,
            height: ny,
        });
        Ok(())
    }

    /// Min-max map the encoded buffer to 8-bit samples
    pub fn normalize(&mut self) {
        self.normalized = export::normalize_to_u8(&self.encoded.samples);
        self.normalized_current = true;
        debug!(samples = self.normalized.len(), "Encoded buffer normalized");
    }

    /// Save the normalized buffer; 24 bits per pixel packs sample triplets as RGB
    pub fn save(&self, path: impl AsRef<Path>, bits_per_pixel: u16) -> HoloResult<PathBuf> {
        if self.normalized.is_empty() {
            return Err(ExportError::EmptyBuffer.into());
        }
        if !self.normalized_current {
            warn!("Encoded buffer changed since the last normalize");
            return Err(ExportError::NotNormalized.into());
        }
        if self.normalized.len() != self.encoded.len() {
            return Err(ExportError::SizeMismatch {
                expected: self.encoded.len(),
                actual: self.normalized.len(),
            }
            .into());
        }
        let (mut width, height) = self.encoded.size();
        if bits_per_pixel == 24 {
            if width % 3 != 0 {
                warn!(width, "Encoded width is not a multiple of 3 for RGB export");
                return Err(ExportError::UnsupportedFormat(format!(
                    "24-bit export of a {} sample wide buffer",
                    width
                ))
                .into());
            }
            width /= 3;
        }
        export::save_image(path, bits_per_pixel, &self.normalized, width, height)
    }

    pub fn context(&self) -> &FieldContext {
        &self.context
    }

    pub fn field(&self) -> &FieldBuffer {
        &self.field
    }

    pub fn encoded(&self) -> &EncodedBuffer {
        &self.encoded
    }

    pub fn normalized(&self) -> &[u8] {
        &self.normalized
    }

    pub fn encode_size(&self) -> (usize, usize) {
        self.encoded.size()
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Whether a propagation pass or import has written the field
    pub fn has_field(&self) -> bool {
        self.field_ready
    }

    pub fn is_carried(&self) -> bool {
        self.carried
    }

    /// Whether the normalized buffer reflects the current encoded buffer
    pub fn is_normalized(&self) -> bool {
        self.normalized_current
    }

    /// Install a new encoded buffer and a zeroed normalized buffer of the same size
    fn replace_encoded(&mut self, encoded: EncodedBuffer) {
        self.normalized = vec![0; encoded.len()];
        self.encoded = encoded;
        self.normalized_current = false;
    }

    /// Zero the encoded and normalized buffers at the field resolution
    fn clear_output(&mut self) {
        let (nx, ny) = self.context.resolution();
        self.replace_encoded(EncodedBuffer::zeroed(nx, ny));
    }

    fn field_changed(&mut self) {
        self.field_ready = true;
        self.clear_output();
    }

    fn require_field(&self) -> HoloResult<()> {
        if self.field_ready {
            Ok(())
        } else {
            error!("Complex field has not been computed");
            Err(ResourceError::FieldNotComputed.into())
        }
    }

    fn ready_channel(&self, channel: usize) -> HoloResult<&[Cplx]> {
        self.field
            .channel(channel)
            .inspect_err(|e| error!(channel, error = %e, "Cannot encode channel"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HoloError;

    fn session(n: usize) -> HologramSession {
        HologramSession::new(FieldContext::monochrome(n, 8e-6, 532e-9)).unwrap()
    }

    #[test]
    fn test_encode_before_generation_is_rejected() {
        let mut session = session(4);
        let err = session.encode(EncodingScheme::Amplitude).unwrap_err();
        assert!(matches!(
            err,
            HoloError::Resource(ResourceError::FieldNotComputed)
        ));
        assert!(session.encoded().samples.iter().all(|v| *v == 0.0));
    }

    fn with_field(mut session: HologramSession) -> HologramSession {
        let (nx, ny) = session.context().resolution();
        let samples = (0..nx * ny).map(|i| Cplx::new(1.0, i as Real * 0.1)).collect();
        session.field.store(0, samples).unwrap();
        session.field_changed();
        session
    }

    #[test]
    fn test_carrier_applied_once_per_allocation() {
        let mut session = with_field(session(4));
        let carrier = CarrierWave::new(0.01, 0.0, 0.1);
        assert!(session.apply_carrier(&carrier));
        assert!(!session.apply_carrier(&carrier));

        session.set_resolution(8, 8).unwrap();
        assert!(!session.is_carried());
        let mut session = with_field(session);
        assert!(session.apply_carrier(&carrier));
    }

    #[test]
    fn test_carrier_waits_for_field() {
        let mut session = session(4);
        let carrier = CarrierWave::new(0.01, 0.0, 0.1);
        assert!(!session.apply_carrier(&carrier));
        assert!(!session.is_carried());

        let mut session = with_field(session);
        assert!(session.apply_carrier(&carrier));
    }

    #[test]
    fn test_new_field_clears_encoded_output() {
        let mut session = with_field(session(4));
        session.encode(EncodingScheme::Amplitude).unwrap();
        session.normalize();
        assert!(session.normalized().iter().any(|v| *v != 0));

        session.propagate_fresnel(0.001).unwrap();
        assert!(session.encoded().samples.iter().all(|v| *v == 0.0));
        assert!(session.normalized().iter().all(|v| *v == 0));
        assert!(!session.is_normalized());
    }

    #[test]
    fn test_same_resolution_keeps_buffers() {
        let mut session = session(4);
        session.field.channel_mut(0).unwrap()[0] = Cplx::new(1.0, 0.0);
        session.set_resolution(4, 4).unwrap();
        assert_eq!(session.field().channel(0).unwrap()[0], Cplx::new(1.0, 0.0));
    }

    #[test]
    fn test_wave_count_change_reallocates() {
        let mut session = session(4);
        session
            .set_wavelengths(vec![633e-9, 532e-9, 473e-9])
            .unwrap();
        assert_eq!(session.field().channel_count(), 3);
        assert!(session.set_wavelengths(vec![]).is_err());
        assert_eq!(session.context().channel_count(), 3);
    }

    #[test]
    fn test_save_without_normalize_fails() {
        let mut session = session(2);
        session.normalized.clear();
        assert!(session.save("unused.bmp", 8).is_err());

        let mut session = with_field(session);
        session.encode(EncodingScheme::Phase).unwrap();
        let err = session.save("unused.bmp", 8).unwrap_err();
        assert!(matches!(err, HoloError::Export(ExportError::NotNormalized)));
    }
}
