// SPDX-License-Identifier: GPL-3.0-only
//
// Uniform block shared by every side-band kernel. Layout must match
// `struct Params` in side_band.wgsl (48 bytes, 16-byte multiple).

use crate::constants::SignalLocation;
use crate::encoding::CropWindow;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SideBandParams {
    pub width: u32,
    pub height: u32,
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
    pub loc_x: i32,
    pub loc_y: i32,
    /// +1 for the inverse transform, -1 for forward
    pub sign: f32,
    /// Output scale of the column pass
    pub scale: f32,
    pub _padding0: u32,
    pub _padding1: u32,
}

impl SideBandParams {
    pub fn set_window(&mut self, width: u32, height: u32, window: CropWindow) {
        self.width = width;
        self.height = height;
        self.x_start = window.x_start as u32;
        self.x_end = window.x_end as u32;
        self.y_start = window.y_start as u32;
        self.y_end = window.y_end as u32;
    }

    pub fn set_location(&mut self, location: SignalLocation) {
        let location = location.normalized();
        self.loc_x = location.x as i32;
        self.loc_y = location.y as i32;
    }
}
