//! Per-object uniform block.
//!
//! `#[repr(C)]` + `Pod` so the block can be byte-copied into a mapped
//! frame-resource slot; the layout must match the shader's object cbuffer
//! exactly.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Object uniform data, one block per drawable per frame slot.
///
/// # Memory layout
///
/// - Offset 0: model matrix (64 bytes)
/// - Offset 64: inverse model matrix (64 bytes)
/// - Offset 128: voxel count (4 bytes) + padding (12 bytes)
/// - Total size: 144 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Model matrix (object to world space).
    pub model: Mat4,
    /// Inverse model matrix, used to carry rays into object space.
    pub model_inv: Mat4,
    /// Number of solid voxels; zero for mesh objects.
    pub voxel_count: u32,
    /// Padding to a 16-byte multiple.
    pub _padding: [u32; 3],
}

impl ObjectUniforms {
    /// Size of the block in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Block for a voxel chunk at `model` with `voxel_count` solid cells.
    pub fn voxel(model: Mat4, voxel_count: u32) -> Self {
        Self {
            model,
            model_inv: model.inverse(),
            voxel_count,
            _padding: [0; 3],
        }
    }

    /// Block for a mesh object at `model`.
    pub fn mesh(model: Mat4) -> Self {
        Self {
            model,
            model_inv: model.inverse(),
            voxel_count: 0,
            _padding: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_size_and_alignment() {
        // 2 Mat4 (128) + u32 (4) + padding (12) = 144
        assert_eq!(ObjectUniforms::SIZE, 144);
        assert_eq!(ObjectUniforms::SIZE % 16, 0);
        assert_eq!(std::mem::align_of::<ObjectUniforms>(), 16);
    }

    #[test]
    fn test_voxel_block_inverts_model() {
        let model = Mat4::from_scale(Vec3::splat(4.0));
        let block = ObjectUniforms::voxel(model, 123);

        assert_eq!(block.model, model);
        assert_eq!(block.model_inv, model.inverse());
        assert_eq!(block.voxel_count, 123);
    }

    #[test]
    fn test_mesh_block_has_no_voxels() {
        let block = ObjectUniforms::mesh(Mat4::IDENTITY);
        assert_eq!(block.voxel_count, 0);
        assert_eq!(block.model_inv, Mat4::IDENTITY);
    }

    #[test]
    fn test_pod_byte_copy() {
        let block = ObjectUniforms::mesh(Mat4::IDENTITY);
        let bytes: &[u8] = bytemuck::bytes_of(&block);
        assert_eq!(bytes.len(), ObjectUniforms::SIZE);
    }
}
