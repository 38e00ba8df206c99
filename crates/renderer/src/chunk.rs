//! Voxel chunk drawable.
//!
//! A chunk owns its GPU-side state: a 3D voxel image staged once at
//! construction, a unit-cube vertex buffer the ray-march shader rasterizes
//! as the chunk's bounding volume, per-slot object uniforms, and a binding
//! group. Drawing uploads this tick's uniforms and records one 36-vertex
//! draw through the orchestrator.

use ash::vk;
use glam::{IVec3, Mat4, Vec2, Vec3};

use voxel_resources::ChunkGrid;
use voxel_rhi::buffer::{Buffer, BufferUsage};
use voxel_rhi::frame_resource::FrameResource;
use voxel_rhi::image::GpuImage;
use voxel_rhi::sampler::Sampler;
use voxel_rhi::swapchain::FRAMES_IN_FLIGHT;
use voxel_rhi::vertex::MeshVertex;
use voxel_rhi::RhiResult;

use crate::renderer::{BindingGroup, Renderer};
use crate::ubo::ObjectUniforms;

/// Vertices of one cube face hold 6 entries; 6 faces make 36.
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// A voxel-grid drawable at integer grid coordinates.
pub struct Chunk {
    binding: BindingGroup,
    uniforms: FrameResource<ObjectUniforms>,
    cube_vertices: Buffer,
    voxel_image: GpuImage,
    sampler: Sampler,
    position: IVec3,
    grid_size: u32,
    voxel_count: u32,
}

impl Chunk {
    /// Uploads `grid` and builds the chunk's GPU state.
    ///
    /// # Errors
    ///
    /// Returns an error if any allocation or upload fails.
    pub fn new(renderer: &Renderer, grid: &ChunkGrid, position: IVec3) -> RhiResult<Self> {
        let device = renderer.device();
        let size = grid.size();

        // Voxel payload is u32 per cell
        let voxel_image = GpuImage::new_sampled_3d(
            device.clone(),
            size,
            size,
            size,
            vk::Format::R32_UINT,
        )?;
        renderer
            .transfer()
            .stage_to_image(&voxel_image, ChunkGrid::ELEMENT_SIZE, grid.as_bytes())?;

        let sampler = Sampler::nearest_clamp(device.clone())?;

        let vertices = unit_cube_vertices();
        let cube_vertices = renderer
            .transfer()
            .create_buffer_with_data(BufferUsage::Vertex, bytemuck::cast_slice(&vertices))?;

        let uniforms = FrameResource::new(device, FRAMES_IN_FLIGHT)?;

        let binding = renderer.create_binding_group()?;
        renderer.write_drawable_bindings(&binding, &uniforms, voxel_image.view(), sampler.handle());

        Ok(Self {
            binding,
            uniforms,
            cube_vertices,
            voxel_image,
            sampler,
            position,
            grid_size: size,
            voxel_count: grid.solid_count(),
        })
    }

    /// Grid coordinates of this chunk.
    #[inline]
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// The chunk's model matrix: scaled to the grid edge length, then
    /// translated by grid coordinates in scaled space.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.grid_size as f32))
            * Mat4::from_translation(self.position.as_vec3())
    }

    /// Records this chunk's draw into the open frame.
    ///
    /// Must be called between `begin_frame` and `end_frame`.
    pub fn draw(&self, renderer: &Renderer) {
        let slot = renderer.frame_slot();
        self.uniforms.write(
            slot,
            &ObjectUniforms::voxel(self.model_matrix(), self.voxel_count),
        );
        renderer.bind(&self.binding);

        let cmd = renderer.command_buffer();
        cmd.bind_vertex_buffers(&[self.cube_vertices.handle()], &[0]);
        cmd.draw(CUBE_VERTEX_COUNT, 1);
    }

    /// Number of solid voxels in the uploaded grid.
    #[inline]
    pub fn voxel_count(&self) -> u32 {
        self.voxel_count
    }

    /// The 3D voxel image.
    #[inline]
    pub fn voxel_image(&self) -> &GpuImage {
        &self.voxel_image
    }
}

/// The unit cube as 36 vertices, counter-clockwise from outside so
/// back-face culling keeps the near faces. Color carries the corner
/// position for ray entry-point reconstruction.
pub fn unit_cube_vertices() -> Vec<MeshVertex> {
    const FACES: [[[f32; 3]; 6]; 6] = [
        // +Z
        [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ],
        // -Z
        [
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ],
        // +X
        [
            [1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
        ],
        // -X
        [
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 1.0],
            [0.0, 1.0, 0.0],
        ],
        // +Y
        [
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
        // -Y
        [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
    ];

    FACES
        .iter()
        .flatten()
        .map(|&[x, y, z]| {
            let position = Vec3::new(x, y, z);
            MeshVertex::new(position, position, Vec2::new(x, y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_36_vertices_in_unit_range() {
        let vertices = unit_cube_vertices();
        assert_eq!(vertices.len(), CUBE_VERTEX_COUNT as usize);
        for v in &vertices {
            assert!(v.position.min_element() >= 0.0);
            assert!(v.position.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_cube_triangles_wind_outward() {
        let vertices = unit_cube_vertices();
        let cube_center = Vec3::splat(0.5);

        for triangle in vertices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
            let normal = (b.position - a.position).cross(c.position - b.position);
            let outward = a.position - cube_center;
            assert!(
                normal.dot(outward) > 0.0,
                "triangle at {:?} winds inward",
                a.position
            );
        }
    }

    #[test]
    fn test_cube_covers_all_faces() {
        let vertices = unit_cube_vertices();
        // Each axis must pin 6 vertices to each of its two planes per face
        for axis in 0..3 {
            let at_zero = vertices
                .iter()
                .filter(|v| v.position[axis] == 0.0)
                .count();
            let at_one = vertices.iter().filter(|v| v.position[axis] == 1.0).count();
            // One full face (6) plus the touching edges of four others
            assert!(at_zero >= 6);
            assert!(at_one >= 6);
        }
    }
}
