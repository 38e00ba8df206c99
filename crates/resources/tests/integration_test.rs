//! Integration tests for content generation and asset loading.

use std::path::Path;

use voxel_resources::{ChunkGrid, ImageData, MeshData};

#[test]
fn test_chunk_grid_matches_upload_contract() {
    // The renderer uploads the grid as a size^3 image of 4-byte elements;
    // the byte blob and the declared extent must agree exactly
    let grid = ChunkGrid::sphere(16);

    let extent = grid.size() as usize;
    assert_eq!(
        grid.as_bytes().len(),
        extent * extent * extent * ChunkGrid::ELEMENT_SIZE
    );
    assert!(grid.solid_count() > 0);
}

#[test]
fn test_obj_pipeline_produces_drawable_mesh() {
    let obj = "\
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.5 1.0
f 1/1 2/2 3/3
";

    let mesh = MeshData::from_obj_bytes(obj.as_bytes()).expect("OBJ should parse");

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    assert_eq!(mesh.positions.len(), mesh.tex_coords.len());
}

#[test]
fn test_load_obj_from_disk() {
    // Optional asset; skip when the file is absent
    let model_path = Path::new("../../assets/model.obj");
    if !model_path.exists() {
        println!("Skipping test: model file not found at {:?}", model_path);
        return;
    }

    let mesh = MeshData::load_obj(model_path).expect("Failed to load OBJ model");
    assert!(mesh.vertex_count() > 0, "Model should have vertices");
    assert!(mesh.triangle_count() > 0, "Model should have triangles");

    println!(
        "Loaded model: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
}

#[test]
fn test_image_round_trip_preserves_bytes() {
    // Encode a small image in-process, decode it through the loader, and
    // compare the pixel bytes
    let mut img = image::RgbaImage::new(4, 2);
    for (i, pixel) in img.pixels_mut().enumerate() {
        *pixel = image::Rgba([i as u8, 2 * i as u8, 3 * i as u8, 255]);
    }
    let original: Vec<u8> = img.as_raw().clone();

    let mut encoded = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut encoded),
        image::ImageFormat::Png,
    )
    .unwrap();

    let decoded = ImageData::from_bytes(&encoded).expect("PNG should decode");
    assert_eq!(decoded.width, 4);
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.pixels, original);
}
