// SPDX-License-Identifier: GPL-3.0-only

//! Compute device plumbing for the side-band kernels
//!
//! Device acquisition, staging readback and the layout/pipeline builders
//! used by [`crate::shaders::SideBandProcessor`]. Only Vulkan adapters are
//! requested; no surface is ever created.

use std::sync::Arc;
use tracing::{debug, info};

pub use wgpu;

/// Device and queue of a compute-only adapter
#[derive(Debug, Clone)]
pub struct ComputeDevice {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter_name: String,
    pub backend: wgpu::Backend,
}

/// Acquire a high-performance adapter and open a device labelled `label`
pub async fn request_compute_device(label: &str) -> Result<ComputeDevice, String> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::VULKAN,
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| format!("No compute adapter: {}", e))?;

    let adapter_info = adapter.get_info();
    info!(
        adapter = %adapter_info.name,
        backend = ?adapter_info.backend,
        label,
        "Compute adapter selected"
    );

    // Storage buffers of a large plane can exceed the default binding limit
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some(label),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        })
        .await
        .map_err(|e| format!("Failed to open compute device: {}", e))?;

    debug!(label, "Compute device opened");

    Ok(ComputeDevice {
        device: Arc::new(device),
        queue: Arc::new(queue),
        adapter_name: adapter_info.name,
        backend: adapter_info.backend,
    })
}

/// Plane size the device buffers were last allocated for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaneSize {
    pub width: u32,
    pub height: u32,
}

impl PlaneSize {
    pub fn differs(&self, width: u32, height: u32) -> bool {
        self.width != width || self.height != height
    }

    pub fn set(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// True until the first allocation
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Map a MAP_READ buffer, copy its bytes out and unmap it
pub async fn read_staging(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Result<Vec<u8>, String> {
    let slice = buffer.slice(..);
    let (sender, receiver) = futures::channel::oneshot::channel();

    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    let _ = device.poll(wgpu::PollType::wait_indefinitely());

    receiver
        .await
        .map_err(|_| "Staging map callback dropped".to_string())?
        .map_err(|e| format!("Failed to map staging buffer: {:?}", e))?;

    let bytes = slice.get_mapped_range().to_vec();
    buffer.unmap();
    Ok(bytes)
}

/// Workgroups along an axis of `extent` samples
#[inline]
pub fn workgroups(extent: u32, workgroup_size: u32) -> u32 {
    extent.div_ceil(workgroup_size)
}

/// Access mode of a buffer binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Uniform,
    ReadOnly,
    ReadWrite,
}

/// Compute-stage layout where binding `i` has access `bindings[i]`
pub fn buffer_layout(
    device: &wgpu::Device,
    label: &str,
    bindings: &[Access],
) -> wgpu::BindGroupLayout {
    let entries: Vec<_> = bindings
        .iter()
        .enumerate()
        .map(|(i, access)| wgpu::BindGroupLayoutEntry {
            binding: i as u32,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: match access {
                    Access::Uniform => wgpu::BufferBindingType::Uniform,
                    Access::ReadOnly => wgpu::BufferBindingType::Storage { read_only: true },
                    Access::ReadWrite => wgpu::BufferBindingType::Storage { read_only: false },
                },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
        .collect();
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

pub fn compute_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    let label = format!("side_band_{}_pipeline", entry_point);
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        module,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}
