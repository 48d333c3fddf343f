use bytemuck::{Pod, Zeroable};

/// GPU uniform buffer for the chart scene.
/// Camera transform, lighting and per-draw-call parameters.
/// 128 bytes = 8 * 16, properly 16-byte aligned.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ChartUniforms {
    /// View-projection matrix (column-major).
    pub view_proj: [[f32; 4]; 4],
    /// Camera world position (w unused).
    pub camera_pos: [f32; 4],
    /// Direction toward the directional light (w unused).
    pub light_dir: [f32; 4],
    /// RGBA color for line draw calls.
    pub color: [f32; 4],
    /// Viewport resolution in pixels.
    pub resolution: [f32; 2],
    /// Line width in pixels.
    pub line_width: f32,
    /// Ambient light share in [0, 1].
    pub ambient: f32,
}

/// One cube drawn by the instanced cube pipeline.
/// Layout matches the WGSL `CubeInstance` struct (48 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeInstance {
    /// World-space centre (w unused).
    pub center: [f32; 4],
    /// Half size along each axis (w unused).
    pub half_extents: [f32; 4],
    /// RGBA color (0.0..1.0 per channel).
    pub color: [f32; 4],
}

/// GPU-ready 3D line data for one color/width group.
#[derive(Debug, Clone)]
pub struct Line3DData {
    /// Segment endpoint pairs: [start, end, start, end, ...].
    /// Each position is [x, y, z, _pad].
    pub segments: Vec<[f32; 4]>,
    /// RGBA color.
    pub color: [f32; 4],
    /// Line width in pixels.
    pub line_width: f32,
}

/// Convert an sRGBA byte color into the float layout the shaders take.
pub fn rgba_to_f32(color: [u8; 4]) -> [f32; 4] {
    color.map(|c| c as f32 / 255.0)
}
