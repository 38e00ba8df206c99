//! Frame orchestration and drawables.
//!
//! This crate owns the render loop's hard parts: the begin/bind/end frame
//! protocol, CPU/GPU synchronization across rotating frame slots, surface
//! rebuild on staleness or resize, and the drawable entities (voxel
//! chunks, textured mesh objects) that record draws through it.

pub mod chunk;
pub mod depth_buffer;
pub mod game_object;
pub mod renderer;
pub mod texture;
pub mod ubo;

pub use chunk::Chunk;
pub use game_object::{GameObject, Model};
pub use renderer::{BindingGroup, Renderer};
pub use texture::Texture;
pub use ubo::ObjectUniforms;
