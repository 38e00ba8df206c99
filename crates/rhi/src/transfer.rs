//! Synchronous staged uploads to device-local memory.
//!
//! [`TransferContext`] copies CPU-side bytes into device-local images and
//! buffers through a transient host-visible staging buffer. Every call is
//! a complete, synchronously-submitted and synchronously-waited command
//! sequence; the staging allocation is scoped to the single call and never
//! reused.
//!
//! This path exists for one-time setup uploads (voxel grids, textures,
//! vertex/index data). It must not be called from the steady-state frame
//! path, which never blocks on the transfer queue.

use std::sync::Arc;

use tracing::debug;

use crate::buffer::{Buffer, BufferUsage};
use crate::command::{CommandBuffer, CommandPool};
use crate::device::Device;
use crate::error::RhiResult;
use crate::image::GpuImage;
use crate::image_state::{record_transition, ImageState};
use crate::vk;

/// Owns the transient command pool used for one-time uploads.
pub struct TransferContext {
    device: Arc<Device>,
    pool: CommandPool,
}

impl TransferContext {
    /// Creates a transfer context on the graphics queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the transient command pool cannot be created.
    pub fn new(device: Arc<Device>) -> RhiResult<Self> {
        let graphics_family = device
            .queue_families()
            .graphics_family
            .expect("device was created with a graphics queue");
        let pool = CommandPool::new_transient(device.clone(), graphics_family)?;

        Ok(Self { device, pool })
    }

    /// Stages `bytes` into a device-local image.
    ///
    /// Records, submits, and waits for one command sequence: transition
    /// *Uninitialized → TransferDst*, copy the staging buffer over the full
    /// image extent, transition *TransferDst → ShaderRead*. The image is
    /// left shader-readable.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` does not equal `extent × element_size` for
    /// the destination image — mismatched upload sizes are a contract
    /// violation, not a runtime condition.
    ///
    /// # Errors
    ///
    /// Returns an error if staging allocation, submission, or the wait
    /// fails. Allocation failure is fatal for the caller.
    pub fn stage_to_image(
        &self,
        image: &GpuImage,
        element_size: usize,
        bytes: &[u8],
    ) -> RhiResult<()> {
        let extent = image.extent();
        let expected =
            extent.width as usize * extent.height as usize * extent.depth as usize * element_size;
        assert_eq!(
            bytes.len(),
            expected,
            "staged image upload size mismatch: {} bytes for a {}x{}x{} image of {}-byte elements",
            bytes.len(),
            extent.width,
            extent.height,
            extent.depth,
            element_size,
        );

        let staging = Buffer::new(
            self.device.clone(),
            BufferUsage::Staging,
            bytes.len() as vk::DeviceSize,
        )?;
        staging.write_data(0, bytes)?;

        self.submit_and_wait(|cmd| {
            record_transition(
                self.device.handle(),
                cmd.handle(),
                image.handle(),
                vk::ImageAspectFlags::COLOR,
                ImageState::Uninitialized,
                ImageState::TransferDst,
            );
            cmd.copy_buffer_to_image(staging.handle(), image.handle(), extent);
            record_transition(
                self.device.handle(),
                cmd.handle(),
                image.handle(),
                vk::ImageAspectFlags::COLOR,
                ImageState::TransferDst,
                ImageState::ShaderRead,
            );
        })?;

        debug!(
            "Staged {} bytes into {}x{}x{} image",
            bytes.len(),
            extent.width,
            extent.height,
            extent.depth
        );

        Ok(())
    }

    /// Stages `bytes` into a device-local buffer.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` does not equal the destination size.
    ///
    /// # Errors
    ///
    /// Returns an error if staging allocation, submission, or the wait
    /// fails.
    pub fn stage_to_buffer(&self, dst: &Buffer, bytes: &[u8]) -> RhiResult<()> {
        assert_eq!(
            bytes.len() as vk::DeviceSize,
            dst.size(),
            "staged buffer upload size mismatch: {} bytes for a {}-byte buffer",
            bytes.len(),
            dst.size(),
        );

        let staging = Buffer::new(
            self.device.clone(),
            BufferUsage::Staging,
            bytes.len() as vk::DeviceSize,
        )?;
        staging.write_data(0, bytes)?;

        self.submit_and_wait(|cmd| {
            cmd.copy_buffer(staging.handle(), dst.handle(), dst.size());
        })?;

        debug!("Staged {} bytes into {} buffer", bytes.len(), dst.usage().name());

        Ok(())
    }

    /// Creates a device-local buffer and fills it with `bytes` in one call.
    ///
    /// # Errors
    ///
    /// Returns an error if buffer creation or the staged copy fails.
    pub fn create_buffer_with_data(
        &self,
        usage: BufferUsage,
        bytes: &[u8],
    ) -> RhiResult<Buffer> {
        let buffer = Buffer::new(self.device.clone(), usage, bytes.len() as vk::DeviceSize)?;
        self.stage_to_buffer(&buffer, bytes)?;
        Ok(buffer)
    }

    /// Records one one-time command buffer, submits it to the graphics
    /// queue, and blocks until the queue drains.
    fn submit_and_wait(&self, record: impl FnOnce(&CommandBuffer)) -> RhiResult<()> {
        let cmd = CommandBuffer::new(self.device.clone(), &self.pool)?;
        cmd.begin_one_time()?;
        record(&cmd);
        cmd.end()?;

        let command_buffers = [cmd.handle()];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);

        unsafe {
            self.device.handle().queue_submit(
                self.device.graphics_queue(),
                &[submit_info],
                vk::Fence::null(),
            )?;
            self.device
                .handle()
                .queue_wait_idle(self.device.graphics_queue())?;
        }

        Ok(())
    }
}
