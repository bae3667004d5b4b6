//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// sRGB hex color to linear RGBA (the surface format is sRGB)
pub fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((rgb >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), alpha]
}

/// Same color with alpha scaled
pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Palette for scene elements
pub mod colors {
    /// neutral-950
    pub const BACKGROUND_TOP: u32 = 0x0a0a0a;
    /// neutral-800
    pub const BACKGROUND_BOTTOM: u32 = 0x262626;
    /// neutral-100
    pub const BOUNDARY: u32 = 0xf5f5f5;
    /// indigo-500
    pub const INDIGO: u32 = 0x6366f1;
    /// purple-500
    pub const PURPLE: u32 = 0xa855f7;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_linear() {
        assert_eq!(hex(0x000000, 1.0), [0.0, 0.0, 0.0, 1.0]);
        let white = hex(0xffffff, 0.5);
        assert!((white[0] - 1.0).abs() < 1e-6);
        assert_eq!(white[3], 0.5);
        // Mid grey is darker in linear space
        assert!(hex(0x808080, 1.0)[0] < 0.5);
    }

    #[test]
    fn test_fade() {
        assert_eq!(fade([1.0, 1.0, 1.0, 0.5], 0.5)[3], 0.25);
    }
}
