//! Mesh primitives: subdivided plane and UV sphere.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Vertex data shared by every drawable (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side geometry ready for upload
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Flat XY plane centered on the origin, facing +Z
///
/// Rows run from `+height / 2` down to `-height / 2`, columns from left to
/// right, giving `(segments_x + 1) * (segments_y + 1)` vertices.
pub fn plane(width: f32, height: f32, segments_x: usize, segments_y: usize) -> MeshData {
    let half_width = width / 2.0;
    let half_height = height / 2.0;
    let segment_width = width / segments_x as f32;
    let segment_height = height / segments_y as f32;
    let row_len = segments_x + 1;

    let mut vertices = Vec::with_capacity(row_len * (segments_y + 1));
    let mut indices = Vec::with_capacity(segments_x * segments_y * 6);

    for iy in 0..=segments_y {
        let y = iy as f32 * segment_height - half_height;
        for ix in 0..=segments_x {
            let x = ix as f32 * segment_width - half_width;
            vertices.push(Vertex {
                position: [x, -y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [ix as f32 / segments_x as f32, iy as f32 / segments_y as f32],
            });
        }
    }

    // Counter-clockwise winding seen from +Z
    for iy in 0..segments_y {
        for ix in 0..segments_x {
            let a = (iy * row_len + ix) as u32;
            let b = ((iy + 1) * row_len + ix) as u32;
            let c = ((iy + 1) * row_len + ix + 1) as u32;
            let d = (iy * row_len + ix + 1) as u32;

            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

/// UV sphere centered on the origin with outward normals
///
/// Triangles wind counter-clockwise when seen from outside; the pole rows
/// emit a single triangle per segment.
pub fn sphere(radius: f32, width_segments: usize, height_segments: usize) -> MeshData {
    let row_len = width_segments + 1;
    let mut vertices = Vec::with_capacity(row_len * (height_segments + 1));
    let mut indices = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;

            let normal = [
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];

            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, v],
            });
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = (iy * row_len + ix + 1) as u32;
            let b = (iy * row_len + ix) as u32;
            let c = ((iy + 1) * row_len + ix) as u32;
            let d = ((iy + 1) * row_len + ix + 1) as u32;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}
