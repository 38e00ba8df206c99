//! OBJ mesh loading.
//!
//! Loads OBJ files via `tobj` into flat position/color/tex-coord arrays
//! plus a `u32` index buffer. Identical vertices (same position, color,
//! and texture coordinate) are deduplicated so the index buffer does the
//! sharing.

use std::collections::HashMap;
use std::path::Path;

use glam::{Vec2, Vec3};
use tracing::info;

use crate::error::{ResourceError, ResourceResult};

/// CPU-side mesh data ready for GPU upload.
#[derive(Debug, Default)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Vertex colors (white when the OBJ carries none).
    pub colors: Vec<Vec3>,
    /// Texture coordinates (zero when the OBJ carries none).
    pub tex_coords: Vec<Vec2>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Loads and deduplicates the meshes of an OBJ file, merged into one
    /// vertex/index pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or contains no
    /// geometry.
    pub fn load_obj(path: &Path) -> ResourceResult<Self> {
        let (models, _materials) =
            tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS).map_err(|e| ResourceError::ObjLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if models.is_empty() {
            return Err(ResourceError::NoMeshes(path.to_path_buf()));
        }

        let data = Self::from_models(&models);

        info!(
            "Loaded OBJ {}: {} vertices, {} triangles",
            path.display(),
            data.positions.len(),
            data.indices.len() / 3
        );

        Ok(data)
    }

    /// Parses OBJ text from memory. Used by tests and embedded assets.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be parsed.
    pub fn from_obj_bytes(bytes: &[u8]) -> ResourceResult<Self> {
        let mut reader = std::io::BufReader::new(bytes);
        // Materials are unused; resolve any mtllib reference to nothing
        let (models, _materials) =
            tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
                Ok((Vec::new(), Default::default()))
            })
            .map_err(|e| ResourceError::ObjLoad {
                path: "<memory>".into(),
                message: e.to_string(),
            })?;

        Ok(Self::from_models(&models))
    }

    /// Merges tobj models into a single deduplicated vertex/index pair.
    fn from_models(models: &[tobj::Model]) -> Self {
        let mut data = MeshData::default();
        // Key on the exact float bits of (position, color, tex_coord)
        let mut unique: HashMap<[u32; 8], u32> = HashMap::new();

        for model in models {
            let mesh = &model.mesh;
            let has_tex_coords = !mesh.texcoords.is_empty();
            let has_colors = !mesh.vertex_color.is_empty();

            for &index in &mesh.indices {
                let i = index as usize;

                let position = Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                );
                let color = if has_colors {
                    Vec3::new(
                        mesh.vertex_color[3 * i],
                        mesh.vertex_color[3 * i + 1],
                        mesh.vertex_color[3 * i + 2],
                    )
                } else {
                    Vec3::ONE
                };
                let tex_coord = if has_tex_coords {
                    // OBJ texture origin is bottom-left; flip to top-left
                    Vec2::new(mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1])
                } else {
                    Vec2::ZERO
                };

                let key = [
                    position.x.to_bits(),
                    position.y.to_bits(),
                    position.z.to_bits(),
                    color.x.to_bits(),
                    color.y.to_bits(),
                    color.z.to_bits(),
                    tex_coord.x.to_bits(),
                    tex_coord.y.to_bits(),
                ];

                let next = data.positions.len() as u32;
                let vertex_index = *unique.entry(key).or_insert_with(|| {
                    data.positions.push(position);
                    data.colors.push(color);
                    data.tex_coords.push(tex_coord);
                    next
                });

                data.indices.push(vertex_index);
            }
        }

        data
    }

    /// Number of unique vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A unit quad as two triangles sharing an edge
    const QUAD_OBJ: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
f 1/1 2/2 3/3
f 1/1 3/3 4/4
";

    #[test]
    fn test_quad_parses_and_deduplicates() {
        let data = MeshData::from_obj_bytes(QUAD_OBJ.as_bytes()).unwrap();

        // Two triangles over four unique vertices
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.indices.len(), 6);

        // Shared corners index the same vertex
        assert_eq!(data.indices[0], data.indices[3]);
        assert_eq!(data.indices[2], data.indices[4]);
    }

    #[test]
    fn test_parallel_arrays_agree() {
        let data = MeshData::from_obj_bytes(QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(data.positions.len(), data.colors.len());
        assert_eq!(data.positions.len(), data.tex_coords.len());
    }

    #[test]
    fn test_missing_colors_default_to_white() {
        let data = MeshData::from_obj_bytes(QUAD_OBJ.as_bytes()).unwrap();
        assert!(data.colors.iter().all(|&c| c == Vec3::ONE));
    }

    #[test]
    fn test_tex_coords_flipped_to_top_left() {
        let data = MeshData::from_obj_bytes(QUAD_OBJ.as_bytes()).unwrap();
        // OBJ's vt 0,0 (bottom-left) becomes 0,1 in image space
        let first = data.tex_coords[data.indices[0] as usize];
        assert_eq!(first, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_indices_in_bounds() {
        let data = MeshData::from_obj_bytes(QUAD_OBJ.as_bytes()).unwrap();
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_garbage_input_errors() {
        let result = MeshData::from_obj_bytes(b"f 1//2//3 nonsense");
        assert!(result.is_err());
    }
}
