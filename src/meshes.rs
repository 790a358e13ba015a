//! Static meshes uploaded once at setup.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const PLANE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

impl PlaneVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &PLANE_ATTRIBUTES,
    };
}

/// Flat grid in the XY plane facing +Z, with its origin at the lower-left corner.
#[derive(Debug, Clone)]
pub struct PlaneMesh {
    pub width: f32,
    pub height: f32,
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u32>,
}

impl PlaneMesh {
    /// Builds `rows × columns` cells, each split into two counter-clockwise triangles.
    pub fn new(width: f32, height: f32, rows: u32, columns: u32) -> Self {
        let row_step = height / rows as f32;
        let column_step = width / columns as f32;

        let mut vertices = Vec::with_capacity(((rows + 1) * (columns + 1)) as usize);
        for row in 0..=rows {
            for column in 0..=columns {
                vertices.push(PlaneVertex {
                    position: [column as f32 * column_step, row as f32 * row_step, 0.0],
                    normal: [0.0, 0.0, 1.0],
                    uv: [column as f32 / columns as f32, 1.0 - row as f32 / rows as f32],
                });
            }
        }

        let stride = columns + 1;
        let mut indices = Vec::with_capacity((rows * columns * 6) as usize);
        for row in 0..rows {
            for column in 0..columns {
                let bottom_left = row * stride + column;
                let bottom_right = bottom_left + 1;
                let top_left = bottom_left + stride;
                let top_right = top_left + 1;
                indices.extend_from_slice(&[
                    bottom_left,
                    bottom_right,
                    top_right,
                    bottom_left,
                    top_right,
                    top_left,
                ]);
            }
        }

        Self {
            width,
            height,
            vertices,
            indices,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

impl QuadVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRIBUTES,
    };
}

/// Unit quad spanning [-1, 1] with the texture upright
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        position: [1.0, -1.0, 0.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, -1.0, 0.0],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0, 0.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0, 0.0],
        uv: [1.0, 0.0],
    },
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(mesh: &PlaneMesh, triangle: &[u32]) -> f32 {
        let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[triangle[i] as usize].position);
        (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
    }

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<PlaneVertex>(), 32);
        assert_eq!(PlaneVertex::LAYOUT.array_stride, 32);
        assert_eq!(QuadVertex::LAYOUT.array_stride, 20);
    }

    #[test]
    fn counts_match_the_grid() {
        let mesh = PlaneMesh::new(12.0, 12.0, 100, 100);
        assert_eq!(mesh.vertices.len(), 101 * 101);
        assert_eq!(mesh.index_count(), 100 * 100 * 6);
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&index| index < max));
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let mesh = PlaneMesh::new(4.0, 2.0, 3, 5);
        for triangle in mesh.indices.chunks(3) {
            assert!(signed_area(&mesh, triangle) > 0.0);
        }
    }

    #[test]
    fn plane_spans_width_and_height() {
        let mesh = PlaneMesh::new(12.0, 6.0, 4, 4);
        let last = mesh.vertices.last().unwrap();
        assert_eq!(last.position, [12.0, 6.0, 0.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(last.uv, [1.0, 0.0]);
    }

    #[test]
    fn quad_indices_cover_both_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&index| (index as usize) < QUAD_VERTICES.len()));
    }
}
