//! Static quad geometry and its vertex stream layout.

use thiserror::Error;

/// Vertices in the quad: two triangles, no index buffer.
pub const QUAD_VERTEX_COUNT: usize = 6;

/// Rejected vertex data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum GeometryError {
    #[error("position and uv arrays are not parallel ({positions} positions, {uvs} uvs)")]
    CountMismatch { positions: usize, uvs: usize },

    #[error("expected {expected} vertices, got {actual}")]
    VertexCount { expected: usize, actual: usize },
}

/// Parallel-indexed position and UV arrays for the quad.
///
/// Positions are homogeneous clip-space coordinates. Both arrays always hold
/// exactly [`QUAD_VERTEX_COUNT`] entries.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    positions: Vec<[f32; 4]>,
    uvs: Vec<[f32; 2]>,
}

impl QuadGeometry {
    pub fn new(positions: Vec<[f32; 4]>, uvs: Vec<[f32; 2]>) -> Result<Self, GeometryError> {
        if positions.len() != uvs.len() {
            return Err(GeometryError::CountMismatch {
                positions: positions.len(),
                uvs: uvs.len(),
            });
        }
        if positions.len() != QUAD_VERTEX_COUNT {
            return Err(GeometryError::VertexCount {
                expected: QUAD_VERTEX_COUNT,
                actual: positions.len(),
            });
        }
        Ok(Self { positions, uvs })
    }

    /// Quad covering the whole viewport, UV (0,0) at the bottom-left corner.
    pub fn full_viewport() -> Self {
        Self {
            positions: vec![
                [-1.0, -1.0, 0.0, 1.0],
                [1.0, -1.0, 0.0, 1.0],
                [-1.0, 1.0, 0.0, 1.0],
                [1.0, -1.0, 0.0, 1.0],
                [1.0, 1.0, 0.0, 1.0],
                [-1.0, 1.0, 0.0, 1.0],
            ],
            uvs: vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [0.0, 1.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 1.0],
            ],
        }
    }

    pub fn positions(&self) -> &[[f32; 4]] {
        &self.positions
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Position data as raw bytes (stride × count).
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// UV data as raw bytes (stride × count).
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::full_viewport()
    }
}

/// One non-interleaved vertex buffer: one attribute per slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexStream {
    /// Vertex buffer slot the stream is bound to.
    pub slot: u32,
    /// Shader `@location` the attribute feeds.
    pub location: u32,
    pub format: wgpu::VertexFormat,
    pub stride: u64,
}

pub const POSITION_STREAM: VertexStream = VertexStream {
    slot: 0,
    location: 0,
    format: wgpu::VertexFormat::Float32x4,
    stride: std::mem::size_of::<[f32; 4]>() as u64,
};

pub const UV_STREAM: VertexStream = VertexStream {
    slot: 1,
    location: 1,
    format: wgpu::VertexFormat::Float32x2,
    stride: std::mem::size_of::<[f32; 2]>() as u64,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_is_six_parallel_vertices() {
        let g = QuadGeometry::full_viewport();
        assert_eq!(g.positions().len(), QUAD_VERTEX_COUNT);
        assert_eq!(g.uvs().len(), QUAD_VERTEX_COUNT);
        assert_eq!(g.vertex_count(), 6);
    }

    #[test]
    fn byte_lengths_follow_stride() {
        let g = QuadGeometry::full_viewport();
        assert_eq!(g.position_bytes().len() as u64, POSITION_STREAM.stride * 6);
        assert_eq!(g.uv_bytes().len() as u64, UV_STREAM.stride * 6);
        assert_eq!(POSITION_STREAM.stride, 16);
        assert_eq!(UV_STREAM.stride, 8);
    }

    #[test]
    fn mismatched_counts_rejected() {
        let g = QuadGeometry::full_viewport();
        let err = QuadGeometry::new(g.positions().to_vec(), g.uvs()[..5].to_vec()).unwrap_err();
        assert_eq!(err, GeometryError::CountMismatch { positions: 6, uvs: 5 });
    }

    #[test]
    fn parallel_but_wrong_length_rejected() {
        let err = QuadGeometry::new(vec![[0.0; 4]; 3], vec![[0.0; 2]; 3]).unwrap_err();
        assert_eq!(err, GeometryError::VertexCount { expected: 6, actual: 3 });
    }

    #[test]
    fn valid_arrays_accepted() {
        let g = QuadGeometry::new(vec![[0.5; 4]; 6], vec![[0.25; 2]; 6]).unwrap();
        assert_eq!(g.positions()[5], [0.5; 4]);
        assert_eq!(g.uvs()[0], [0.25; 2]);
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let g = QuadGeometry::full_viewport();
        let p = g.positions();
        // Second triangle reuses vertices 1 and 2 of the first by value.
        assert_eq!(p[3], p[1]);
        assert_eq!(p[5], p[2]);
    }
}
