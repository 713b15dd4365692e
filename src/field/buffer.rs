// SPDX-License-Identifier: GPL-3.0-only

//! Complex field storage
//!
//! [`FieldBuffer`] owns one zeroed complex plane per wavelength. It is only
//! ever rebuilt, never resized in place. [`AtomicField`] is the view parallel
//! workers accumulate into; it is merged back once a pass completes.

use super::precision::{AtomicReal, Cplx, ZERO};
use crate::errors::{HoloResult, ResourceError};
use rayon::prelude::*;

/// One complex plane per wavelength channel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBuffer {
    width: usize,
    height: usize,
    channels: Vec<Vec<Cplx>>,
}

impl FieldBuffer {
    /// Allocate `channel_count` zeroed planes of `width`×`height`
    pub fn new(width: usize, height: usize, channel_count: usize) -> Self {
        Self {
            width,
            height,
            channels: vec![vec![ZERO; width * height]; channel_count],
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, channel: usize) -> HoloResult<&[Cplx]> {
        let available = self.channels.len();
        self.channels
            .get(channel)
            .map(Vec::as_slice)
            .ok_or_else(|| ResourceError::ChannelOutOfRange { channel, available }.into())
    }

    pub fn channel_mut(&mut self, channel: usize) -> HoloResult<&mut [Cplx]> {
        let available = self.channels.len();
        self.channels
            .get_mut(channel)
            .map(Vec::as_mut_slice)
            .ok_or_else(|| ResourceError::ChannelOutOfRange { channel, available }.into())
    }

    pub fn channels(&self) -> impl Iterator<Item = &[Cplx]> {
        self.channels.iter().map(Vec::as_slice)
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut Vec<Cplx>> {
        self.channels.iter_mut()
    }

    /// Replace a channel wholesale; the length must match the plane size
    pub fn store(&mut self, channel: usize, samples: Vec<Cplx>) -> HoloResult<()> {
        let expected = self.len();
        if samples.len() != expected {
            return Err(ResourceError::SizeMismatch {
                expected,
                actual: samples.len(),
            }
            .into());
        }
        let slot = self.channel_mut(channel)?;
        slot.copy_from_slice(&samples);
        Ok(())
    }

    /// Zero every sample without reallocating
    pub fn clear(&mut self) {
        for plane in &mut self.channels {
            plane.fill(ZERO);
        }
    }
}

/// Shared accumulation target with per-component atomic adds
#[derive(Debug)]
pub struct AtomicField {
    re: Vec<AtomicReal>,
    im: Vec<AtomicReal>,
}

impl AtomicField {
    pub fn zeroed(len: usize) -> Self {
        Self {
            re: (0..len).map(|_| AtomicReal::new(0.0)).collect(),
            im: (0..len).map(|_| AtomicReal::new(0.0)).collect(),
        }
    }

    /// Start accumulating on top of existing samples
    pub fn from_samples(samples: &[Cplx]) -> Self {
        Self {
            re: samples.iter().map(|z| AtomicReal::new(z.re)).collect(),
            im: samples.iter().map(|z| AtomicReal::new(z.im)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    /// `field[index] += value`, safe against concurrent writers
    #[inline]
    pub fn add(&self, index: usize, value: Cplx) {
        self.re[index].fetch_add(value.re);
        self.im[index].fetch_add(value.im);
    }

    pub fn get(&self, index: usize) -> Cplx {
        Cplx::new(self.re[index].load(), self.im[index].load())
    }

    pub fn into_samples(self) -> Vec<Cplx> {
        self.re
            .into_par_iter()
            .zip(self.im.into_par_iter())
            .map(|(re, im)| Cplx::new(re.into_inner(), im.into_inner()))
            .collect()
    }
}
