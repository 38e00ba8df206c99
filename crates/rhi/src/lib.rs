//! Vulkan abstraction layer for the voxel renderer.
//!
//! This crate provides a safe abstraction over Vulkan using the `ash` crate.
//! It handles:
//! - Instance and device creation
//! - Swapchain management and frame-slot rotation
//! - Buffer, image, and per-frame uniform resources
//! - Synchronous staged uploads to device-local memory
//! - Synchronization primitives
//! - Pipeline and descriptor management

mod error;

pub mod buffer;
pub mod command;
pub mod descriptor;
pub mod device;
pub mod frame_resource;
pub mod image;
pub mod image_state;
pub mod instance;
pub mod physical_device;
pub mod pipeline;
pub mod sampler;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod transfer;
pub mod vertex;

pub use error::{RhiError, RhiResult};

// Re-export ash types that users might need
pub use ash::vk;
