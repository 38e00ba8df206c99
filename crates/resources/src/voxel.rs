//! Procedural voxel grid generation.
//!
//! A [`ChunkGrid`] is a cubic grid of [`Voxel`] values stored as a flat
//! `u32` array in x-major, then y, then z order — the layout the 3D image
//! upload expects.

use bytemuck::{Pod, Zeroable};

/// One voxel cell.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Voxel(pub u32);

impl Voxel {
    pub const EMPTY: Voxel = Voxel(0);
    pub const LIGHT: Voxel = Voxel(1);
    pub const DARK: Voxel = Voxel(2);

    /// True for any non-empty voxel.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != Voxel::EMPTY
    }
}

/// Cubic voxel grid.
pub struct ChunkGrid {
    voxels: Vec<Voxel>,
    size: u32,
}

impl ChunkGrid {
    /// Bytes per voxel in the uploaded image.
    pub const ELEMENT_SIZE: usize = std::mem::size_of::<Voxel>();

    /// Generates a `size`-cubed grid containing a solid sphere with a
    /// checkerboard of light and dark voxels.
    pub fn sphere(size: u32) -> Self {
        let center = size as f32 / 2.0;
        let radius_sq = center * center;

        let mut voxels = Vec::with_capacity((size as usize).pow(3));
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let dx = x as f32 - center;
                    let dy = y as f32 - center;
                    let dz = z as f32 - center;
                    let dist_sq = dx * dx + dy * dy + dz * dz;

                    let voxel = if dist_sq < radius_sq {
                        if (x + y + z) & 1 == 1 {
                            Voxel::LIGHT
                        } else {
                            Voxel::DARK
                        }
                    } else {
                        Voxel::EMPTY
                    };
                    voxels.push(voxel);
                }
            }
        }

        Self { voxels, size }
    }

    /// Grid edge length in voxels.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The voxel at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of bounds.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Voxel {
        assert!(x < self.size && y < self.size && z < self.size);
        let index = (z * self.size * self.size + y * self.size + x) as usize;
        self.voxels[index]
    }

    /// Number of non-empty voxels.
    pub fn solid_count(&self) -> u32 {
        self.voxels.iter().filter(|v| v.is_solid()).count() as u32
    }

    /// The grid as raw bytes for a staged image upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_length_matches_extent() {
        let grid = ChunkGrid::sphere(8);
        assert_eq!(
            grid.as_bytes().len(),
            8 * 8 * 8 * ChunkGrid::ELEMENT_SIZE
        );
    }

    #[test]
    fn test_sphere_fills_center_not_corners() {
        let grid = ChunkGrid::sphere(8);
        assert!(grid.get(4, 4, 4).is_solid());
        assert_eq!(grid.get(0, 0, 0), Voxel::EMPTY);
        assert_eq!(grid.get(7, 7, 7), Voxel::EMPTY);
    }

    #[test]
    fn test_sphere_checkerboard() {
        let grid = ChunkGrid::sphere(8);
        // Adjacent solid voxels alternate between light and dark
        let a = grid.get(4, 4, 4);
        let b = grid.get(4, 4, 5);
        assert!(a.is_solid() && b.is_solid());
        assert_ne!(a, b);
    }

    #[test]
    fn test_solid_count_between_zero_and_total() {
        let grid = ChunkGrid::sphere(8);
        let total = 8 * 8 * 8;
        let solid = grid.solid_count();
        assert!(solid > 0);
        assert!(solid < total);
    }

    #[test]
    fn test_solid_count_matches_bytes() {
        let grid = ChunkGrid::sphere(4);
        let words: &[u32] = bytemuck::cast_slice(grid.as_bytes());
        let nonzero = words.iter().filter(|&&w| w != 0).count() as u32;
        assert_eq!(nonzero, grid.solid_count());
    }
}
