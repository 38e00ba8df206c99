//! Per-frame-slot uniform resources.
//!
//! [`FrameResource`] owns one identical host-visible buffer per frame
//! slot, each persistently mapped for the resource's lifetime. A drawable
//! writes slot `i` only while slot `i`'s in-flight fence guarantees the
//! GPU has finished reading it; that guarantee comes from the frame
//! orchestrator's fence wait, not from this type.
//!
//! Move-only by construction: cloning would duplicate mapped memory
//! regions, so no `Clone` exists. All slots unmap and free together on
//! drop.

use std::marker::PhantomData;
use std::sync::Arc;

use bytemuck::Pod;

use crate::buffer::{Buffer, BufferUsage};
use crate::device::Device;
use crate::error::RhiResult;
use crate::vk;

/// One uniform buffer per frame slot, persistently mapped.
pub struct FrameResource<T: Pod> {
    slots: Vec<Buffer>,
    _marker: PhantomData<T>,
}

impl<T: Pod> FrameResource<T> {
    /// Allocates `frames` host-visible, host-coherent buffers of
    /// `size_of::<T>()` bytes each.
    ///
    /// # Errors
    ///
    /// Returns an error if any allocation fails; allocation failure is a
    /// fatal condition for the caller.
    pub fn new(device: &Arc<Device>, frames: usize) -> RhiResult<Self> {
        let size = std::mem::size_of::<T>() as vk::DeviceSize;

        let mut slots = Vec::with_capacity(frames);
        for _ in 0..frames {
            slots.push(Buffer::new(device.clone(), BufferUsage::Uniform, size)?);
        }

        Ok(Self {
            slots,
            _marker: PhantomData,
        })
    }

    /// Returns the buffer handle for slot `i`, for descriptor binding.
    #[inline]
    pub fn slot(&self, i: usize) -> vk::Buffer {
        self.slots[i].handle()
    }

    /// Raw byte copy of `value` into slot `i`'s mapping.
    ///
    /// The caller must hold the orchestrator's fence guarantee for slot `i`.
    pub fn write(&self, i: usize, value: &T) {
        self.slots[i]
            .write_data(0, bytemuck::bytes_of(value))
            .expect("frame resource slot is mapped and sized for T");
    }

    /// The per-slot buffer size in bytes.
    #[inline]
    pub fn slot_size(&self) -> vk::DeviceSize {
        std::mem::size_of::<T>() as vk::DeviceSize
    }

    /// Number of slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable)]
    struct TestBlock {
        values: [f32; 4],
    }

    #[test]
    fn test_slot_size_matches_type() {
        // slot_size is derived from T alone; no device needed
        assert_eq!(
            std::mem::size_of::<TestBlock>() as vk::DeviceSize,
            16
        );
    }
}
