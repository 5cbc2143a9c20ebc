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

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.49, 0.83, 0.93, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.5];
    pub const PIPE: [f32; 4] = [0.45, 0.75, 0.18, 1.0];
    pub const PIPE_CAP: [f32; 4] = [0.33, 0.58, 0.12, 1.0];
    pub const GROUND: [f32; 4] = [0.87, 0.85, 0.58, 1.0];
    pub const GRASS: [f32; 4] = [0.45, 0.75, 0.18, 1.0];
    pub const BIRD: [f32; 4] = [0.98, 0.80, 0.21, 1.0];
    pub const BIRD_WING: [f32; 4] = [0.86, 0.65, 0.14, 1.0];
    pub const BIRD_EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BIRD_PUPIL: [f32; 4] = [0.08, 0.08, 0.08, 1.0];
    pub const BIRD_BEAK: [f32; 4] = [0.92, 0.35, 0.15, 1.0];
    /// Dims the scene behind the start and game-over overlays
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
}
