//! Terrain plane displaced by gradient noise.

use glam::{Mat4, Vec3};

use crate::mesh::{self, MeshData, Vertex};
use crate::params::{NoiseParameters, TerrainLayout};
use crate::perlin::{GradientSource, NoiseField};

/// Subdivided plane whose heights come from a noise field
pub struct TerrainGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    layout: TerrainLayout,
    /// Set when vertex data changed and the GPU copy is stale
    dirty: bool,
}

impl TerrainGrid {
    /// Create a flat grid with the given layout (heights all zero)
    pub fn new(layout: &TerrainLayout) -> Self {
        let mesh = mesh::plane(
            layout.width_m,
            layout.depth_m,
            layout.segments_x,
            layout.segments_y,
        );

        Self {
            vertices: mesh.vertices,
            indices: mesh.indices,
            layout: layout.clone(),
            dirty: true,
        }
    }

    /// Recompute every vertex height from the noise field
    ///
    /// Full pass over the grid; there is no incremental path. Leaves the grid
    /// marked dirty so the renderer re-uploads it before the next draw.
    pub fn regenerate<G: GradientSource>(
        &mut self,
        field: &mut NoiseField<G>,
        params: &NoiseParameters,
    ) {
        for vertex in &mut self.vertices {
            let [x, y, _] = vertex.position;
            let height = field.noise(x / params.x_scale, y / params.y_scale);
            vertex.position[2] = height * params.amplitude;
        }

        self.recompute_normals();
        self.dirty = true;
    }

    /// Local-space height of the vertex at column `ix`, row `iy`
    pub fn height_at(&self, ix: usize, iy: usize) -> f32 {
        self.vertices[iy * (self.layout.segments_x + 1) + ix].position[2]
    }

    /// Returns whether the vertex data changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    /// Copy of the current geometry, for the initial GPU upload
    pub fn mesh_data(&self) -> MeshData {
        MeshData {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Placement of the grid in the world: laid flat, then lowered
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.layout.elevation_m, 0.0))
            * Mat4::from_rotation_x(self.layout.tilt_rad)
    }

    /// Central-difference normals over the height grid
    fn recompute_normals(&mut self) {
        let cols = self.layout.segments_x + 1;
        let rows = self.layout.segments_y + 1;
        let heights: Vec<f32> = self.vertices.iter().map(|v| v.position[2]).collect();
        let spacing_x = self.layout.width_m / self.layout.segments_x as f32;
        let spacing_y = self.layout.depth_m / self.layout.segments_y as f32;

        for iy in 0..rows {
            for ix in 0..cols {
                let left = heights[iy * cols + ix.saturating_sub(1)];
                let right = heights[iy * cols + (ix + 1).min(cols - 1)];
                // Row index grows toward -Y
                let up = heights[iy.saturating_sub(1) * cols + ix];
                let down = heights[(iy + 1).min(rows - 1) * cols + ix];

                let span_x = ((ix + 1).min(cols - 1) - ix.saturating_sub(1)) as f32 * spacing_x;
                let span_y = ((iy + 1).min(rows - 1) - iy.saturating_sub(1)) as f32 * spacing_y;

                let dz_dx = (right - left) / span_x;
                let dz_dy = (up - down) / span_y;

                let normal = Vec3::new(-dz_dx, -dz_dy, 1.0).normalize();
                self.vertices[iy * cols + ix].normal = normal.to_array();
            }
        }
    }
}
