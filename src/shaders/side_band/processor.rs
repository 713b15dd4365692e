// SPDX-License-Identifier: GPL-3.0-only

//! GPU side-band processor
//!
//! Holds the field, two ping-pong planes and the fringe output on the
//! device. Between calls the working plane always lives in plane A;
//! the two planes are owned by the bind groups that reference them.

use super::{SideBandParams, WORKGROUP_SIZE, side_band_shader};
use crate::constants::SignalLocation;
use crate::encoding::CropWindow;
use crate::gpu::{
    self, Access, PlaneSize, buffer_layout, compute_pipeline, read_staging, wgpu, workgroups,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-dimension device resources
struct PlaneResources {
    field_buffer: wgpu::Buffer,
    fringe_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,
    /// src = plane_b, dst = plane_a
    into_a: wgpu::BindGroup,
    /// src = plane_a, dst = plane_b
    into_b: wgpu::BindGroup,
}

/// GPU side-band processor
pub struct SideBandProcessor {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    bind_group_layout: wgpu::BindGroupLayout,
    crop_pipeline: wgpu::ComputePipeline,
    shift_forward_pipeline: wgpu::ComputePipeline,
    shift_backward_pipeline: wgpu::ComputePipeline,
    dft_rows_pipeline: wgpu::ComputePipeline,
    dft_cols_pipeline: wgpu::ComputePipeline,
    fringe_pipeline: wgpu::ComputePipeline,
    uniform_buffer: wgpu::Buffer,
    dims: PlaneSize,
    resources: Option<PlaneResources>,
    params: SideBandParams,
}

impl SideBandProcessor {
    /// Create a new GPU side-band processor
    pub async fn new() -> Result<Self, String> {
        info!("Initializing GPU side-band processor");

        let gpu::ComputeDevice {
            device,
            queue,
            adapter_name,
            backend,
        } = gpu::request_compute_device("side_band_gpu").await?;

        info!(
            adapter_name = %adapter_name,
            adapter_backend = ?backend,
            "GPU device created for side-band encoding"
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("side_band_shader"),
            source: wgpu::ShaderSource::Wgsl(side_band_shader().into()),
        });

        // params, src plane, dst plane, field, fringe
        let bind_group_layout = buffer_layout(
            &device,
            "side_band_bind_group_layout",
            &[
                Access::Uniform,
                Access::ReadOnly,
                Access::ReadWrite,
                Access::ReadOnly,
                Access::ReadWrite,
            ],
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("side_band_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline =
            |entry_point: &str| compute_pipeline(&device, &pipeline_layout, &shader, entry_point);
        let crop_pipeline = pipeline("crop_fringe");
        let shift_forward_pipeline = pipeline("shift_forward");
        let shift_backward_pipeline = pipeline("shift_backward");
        let dft_rows_pipeline = pipeline("dft_rows");
        let dft_cols_pipeline = pipeline("dft_cols");
        let fringe_pipeline = pipeline("get_fringe");

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("side_band_uniform_buffer"),
            size: std::mem::size_of::<SideBandParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            bind_group_layout,
            crop_pipeline,
            shift_forward_pipeline,
            shift_backward_pipeline,
            dft_rows_pipeline,
            dft_cols_pipeline,
            fringe_pipeline,
            uniform_buffer,
            dims: PlaneSize::default(),
            resources: None,
            params: SideBandParams::default(),
        })
    }

    /// Ensure buffers and bind groups exist for `width` x `height`
    fn ensure_resources(&mut self, width: u32, height: u32) {
        if !self.dims.differs(width, height) && self.resources.is_some() {
            return;
        }

        debug!(width, height, "Allocating side-band buffers");

        let pixels = width as u64 * height as u64;
        let complex_bytes = pixels * 8;

        let storage = |label: &str, size: u64, extra: wgpu::BufferUsages| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::STORAGE | extra,
                mapped_at_creation: false,
            })
        };

        let field_buffer = storage(
            "side_band_field_buffer",
            complex_bytes,
            wgpu::BufferUsages::COPY_DST,
        );
        let plane_a = storage(
            "side_band_plane_a",
            complex_bytes,
            wgpu::BufferUsages::empty(),
        );
        let plane_b = storage(
            "side_band_plane_b",
            complex_bytes,
            wgpu::BufferUsages::empty(),
        );
        let fringe_buffer = storage(
            "side_band_fringe_buffer",
            pixels * 4,
            wgpu::BufferUsages::COPY_SRC,
        );

        let staging_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("side_band_staging_buffer"),
            size: pixels * 4,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group = |label: &str, src: &wgpu::Buffer, dst: &wgpu::Buffer| {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: self.uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: src.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: dst.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: field_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: fringe_buffer.as_entire_binding(),
                    },
                ],
            })
        };

        let into_a = bind_group("side_band_into_a", &plane_b, &plane_a);
        let into_b = bind_group("side_band_into_b", &plane_a, &plane_b);

        self.resources = Some(PlaneResources {
            field_buffer,
            fringe_buffer,
            staging_buffer,
            into_a,
            into_b,
        });
        self.dims.set(width, height);
    }

    fn write_params(&self) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.params));
    }

    fn dispatch(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::ComputePipeline,
        bind_group: &wgpu::BindGroup,
    ) {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(label),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, Some(bind_group), &[]);
        pass.dispatch_workgroups(
            workgroups(self.dims.width, WORKGROUP_SIZE),
            workgroups(self.dims.height, WORKGROUP_SIZE),
            1,
        );
    }

    /// Upload `field` and zero every sample outside `window` into plane A
    pub fn crop(
        &mut self,
        field: &[[f32; 2]],
        width: u32,
        height: u32,
        window: CropWindow,
    ) -> Result<(), String> {
        let expected = width as usize * height as usize;
        if field.len() != expected {
            return Err(format!(
                "Field size mismatch: expected {}, got {}",
                expected,
                field.len()
            ));
        }

        self.ensure_resources(width, height);
        self.params.set_window(width, height, window);
        self.write_params();

        let resources = self
            .resources
            .as_ref()
            .ok_or("Side-band buffers not allocated")?;
        self.queue
            .write_buffer(&resources.field_buffer, 0, bytemuck::cast_slice(field));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("side_band_crop_encoder"),
            });
        self.dispatch(
            &mut encoder,
            "side_band_crop_pass",
            &self.crop_pipeline,
            &resources.into_a,
        );
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Centered 2D DFT of plane A; the inverse is scaled by 1/N
    pub fn transform(&mut self, inverse: bool) -> Result<(), String> {
        if self.dims.is_empty() {
            return Err("Side-band plane not loaded".to_string());
        }

        let pixels = self.dims.pixels() as f32;
        if inverse {
            self.params.sign = 1.0;
            self.params.scale = 1.0 / pixels;
        } else {
            self.params.sign = -1.0;
            self.params.scale = 1.0;
        }
        self.write_params();

        let resources = self
            .resources
            .as_ref()
            .ok_or("Side-band buffers not allocated")?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("side_band_transform_encoder"),
            });
        // A -> B -> A -> B -> A
        self.dispatch(
            &mut encoder,
            "side_band_shift_backward_pass",
            &self.shift_backward_pipeline,
            &resources.into_b,
        );
        self.dispatch(
            &mut encoder,
            "side_band_dft_rows_pass",
            &self.dft_rows_pipeline,
            &resources.into_a,
        );
        self.dispatch(
            &mut encoder,
            "side_band_dft_cols_pass",
            &self.dft_cols_pipeline,
            &resources.into_b,
        );
        self.dispatch(
            &mut encoder,
            "side_band_shift_forward_pass",
            &self.shift_forward_pipeline,
            &resources.into_a,
        );
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Apply the demodulation phase to plane A and read back the real part
    pub async fn demodulate(&mut self, location: SignalLocation) -> Result<Vec<f32>, String> {
        if self.dims.is_empty() {
            return Err("Side-band plane not loaded".to_string());
        }

        self.params.set_location(location);
        self.write_params();

        let resources = self
            .resources
            .as_ref()
            .ok_or("Side-band buffers not allocated")?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("side_band_fringe_encoder"),
            });
        self.dispatch(
            &mut encoder,
            "side_band_fringe_pass",
            &self.fringe_pipeline,
            &resources.into_b,
        );
        encoder.copy_buffer_to_buffer(
            &resources.fringe_buffer,
            0,
            &resources.staging_buffer,
            0,
            resources.fringe_buffer.size(),
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let bytes = read_staging(&self.device, &resources.staging_buffer).await?;
        Ok(bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect())
    }

    /// Current plane dimensions (0x0 before the first crop)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.dims.width, self.dims.height)
    }
}
