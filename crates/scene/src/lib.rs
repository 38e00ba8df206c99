//! Scene-side state for the voxel renderer.
//!
//! This crate owns the first-person camera: intent flags, orientation
//! integration, and production of the per-frame uniform block consumed by
//! the renderer.

pub mod camera;

pub use camera::{Camera, CameraIntent, CameraUniforms};
