//! Textured mesh drawable.

use glam::Mat4;

use voxel_resources::MeshData;
use voxel_rhi::buffer::{Buffer, BufferUsage};
use voxel_rhi::frame_resource::FrameResource;
use voxel_rhi::swapchain::FRAMES_IN_FLIGHT;
use voxel_rhi::transfer::TransferContext;
use voxel_rhi::vertex::MeshVertex;
use voxel_rhi::RhiResult;

use crate::renderer::{BindingGroup, Renderer};
use crate::texture::Texture;
use crate::ubo::ObjectUniforms;

/// Mesh geometry in device-local buffers.
pub struct Model {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl Model {
    /// Interleaves mesh data into the shared vertex format and stages it
    /// into device-local vertex and index buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if allocation or upload fails.
    pub fn from_mesh_data(transfer: &TransferContext, mesh: &MeshData) -> RhiResult<Self> {
        let vertices = interleave(mesh);

        let vertex_buffer =
            transfer.create_buffer_with_data(BufferUsage::Vertex, bytemuck::cast_slice(&vertices))?;
        let index_buffer = transfer
            .create_buffer_with_data(BufferUsage::Index, bytemuck::cast_slice(&mesh.indices))?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        })
    }

    /// Number of indices to draw.
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// A textured mesh placed in the world.
pub struct GameObject {
    binding: BindingGroup,
    uniforms: FrameResource<ObjectUniforms>,
    model: Model,
    texture: Texture,
    /// World transform, mutated freely between frames.
    pub transform: Mat4,
}

impl GameObject {
    /// Builds the object's GPU state from mesh and texture data.
    ///
    /// # Errors
    ///
    /// Returns an error if any allocation or upload fails.
    pub fn new(renderer: &Renderer, model: Model, texture: Texture) -> RhiResult<Self> {
        let uniforms = FrameResource::new(renderer.device(), FRAMES_IN_FLIGHT)?;

        let binding = renderer.create_binding_group()?;
        renderer.write_drawable_bindings(&binding, &uniforms, texture.view(), texture.sampler());

        Ok(Self {
            binding,
            uniforms,
            model,
            texture,
            transform: Mat4::IDENTITY,
        })
    }

    /// Records this object's draw into the open frame.
    ///
    /// Must be called between `begin_frame` and `end_frame`.
    pub fn draw(&self, renderer: &Renderer) {
        let slot = renderer.frame_slot();
        self.uniforms.write(slot, &ObjectUniforms::mesh(self.transform));
        renderer.bind(&self.binding);

        let cmd = renderer.command_buffer();
        cmd.bind_vertex_buffers(&[self.model.vertex_buffer.handle()], &[0]);
        cmd.bind_index_buffer(self.model.index_buffer.handle(), 0);
        cmd.draw_indexed(self.model.index_count, 1);
    }

    /// The object's texture.
    #[inline]
    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

/// Interleaves mesh arrays into the shared vertex format.
pub fn interleave(mesh: &MeshData) -> Vec<MeshVertex> {
    (0..mesh.vertex_count())
        .map(|i| MeshVertex::new(mesh.positions[i], mesh.colors[i], mesh.tex_coords[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_interleave_preserves_order() {
        let mesh = MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            colors: vec![Vec3::ONE; 3],
            tex_coords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            indices: vec![0, 1, 2],
        };

        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, Vec3::X);
        assert_eq!(vertices[2].tex_coord, Vec2::Y);
        assert_eq!(
            bytemuck::cast_slice::<MeshVertex, u8>(&vertices).len(),
            3 * std::mem::size_of::<MeshVertex>()
        );
    }
}
