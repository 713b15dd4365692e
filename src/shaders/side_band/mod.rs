// SPDX-License-Identifier: GPL-3.0-only

//! GPU side-band encoding
//!
//! Crops the field to the signal quadrant, runs a centered inverse DFT
//! and applies the demodulation phase, all as compute passes on one queue.

mod params;
mod processor;

pub use params::SideBandParams;
pub use processor::SideBandProcessor;

use std::sync::OnceLock;

/// Complex arithmetic helpers (cmul, cis, quarter_turns)
const COMPLEX_WGSL: &str = include_str!("../common/complex.wgsl");

/// Side-band kernels
const SIDE_BAND_WGSL: &str = include_str!("side_band.wgsl");

/// Workgroup edge used by every side-band kernel
pub const WORKGROUP_SIZE: u32 = 16;

static SIDE_BAND_SHADER_COMBINED: OnceLock<String> = OnceLock::new();

/// Get the combined side-band shader source
pub fn side_band_shader() -> &'static str {
    SIDE_BAND_SHADER_COMBINED.get_or_init(|| format!("{}\n\n{}", SIDE_BAND_WGSL, COMPLEX_WGSL))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validate that a WGSL shader compiles successfully using naga
    fn validate_shader(name: &str, source: &str) {
        let result = naga::front::wgsl::parse_str(source);
        match result {
            Ok(module) => {
                let info = naga::valid::Validator::new(
                    naga::valid::ValidationFlags::all(),
                    naga::valid::Capabilities::all(),
                )
                .validate(&module);

                if let Err(e) = info {
                    panic!("Shader '{}' validation failed: {:?}", name, e);
                }
            }
            Err(e) => {
                panic!("Shader '{}' parse failed: {:?}", name, e);
            }
        }
    }

    #[test]
    fn test_side_band_shader_validates() {
        validate_shader("side_band", side_band_shader());
    }

    #[test]
    fn test_dft_twiddle_index_never_multiplies() {
        let source = side_band_shader();
        assert!(!source.contains("k * n"));
        assert_eq!(source.matches("m = twiddle_step(m, k,").count(), 2);
    }

    #[test]
    fn test_side_band_shader_has_all_entry_points() {
        let source = side_band_shader();
        for entry in [
            "crop_fringe",
            "shift_forward",
            "shift_backward",
            "dft_rows",
            "dft_cols",
            "get_fringe",
        ] {
            assert!(source.contains(&format!("fn {}(", entry)), "missing {}", entry);
        }
    }
}
