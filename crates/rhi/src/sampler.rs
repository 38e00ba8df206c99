//! Sampler creation.

use std::sync::Arc;

use ash::vk;

use crate::device::Device;
use crate::error::RhiResult;

/// Sampler wrapper.
pub struct Sampler {
    device: Arc<Device>,
    sampler: vk::Sampler,
}

impl Sampler {
    /// Linear filtering with repeat addressing and anisotropy at the
    /// device's maximum. Used for mesh textures.
    ///
    /// # Errors
    ///
    /// Returns an error if sampler creation fails.
    pub fn linear_repeat(device: Arc<Device>) -> RhiResult<Self> {
        let max_anisotropy = device.max_sampler_anisotropy();
        let create_info = vk::SamplerCreateInfo::default()
            .mag_filter(vk::Filter::LINEAR)
            .min_filter(vk::Filter::LINEAR)
            .mipmap_mode(vk::SamplerMipmapMode::LINEAR)
            .address_mode_u(vk::SamplerAddressMode::REPEAT)
            .address_mode_v(vk::SamplerAddressMode::REPEAT)
            .address_mode_w(vk::SamplerAddressMode::REPEAT)
            .anisotropy_enable(true)
            .max_anisotropy(max_anisotropy)
            .border_color(vk::BorderColor::INT_OPAQUE_BLACK);

        Self::create(device, &create_info)
    }

    /// Nearest filtering with clamp-to-edge addressing. Used for voxel-grid
    /// images, where filtering between voxel values would invent voxels.
    ///
    /// # Errors
    ///
    /// Returns an error if sampler creation fails.
    pub fn nearest_clamp(device: Arc<Device>) -> RhiResult<Self> {
        let create_info = vk::SamplerCreateInfo::default()
            .mag_filter(vk::Filter::NEAREST)
            .min_filter(vk::Filter::NEAREST)
            .mipmap_mode(vk::SamplerMipmapMode::NEAREST)
            .address_mode_u(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .address_mode_v(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .address_mode_w(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .border_color(vk::BorderColor::INT_OPAQUE_BLACK);

        Self::create(device, &create_info)
    }

    fn create(device: Arc<Device>, create_info: &vk::SamplerCreateInfo) -> RhiResult<Self> {
        let sampler = unsafe { device.handle().create_sampler(create_info, None)? };
        Ok(Self { device, sampler })
    }

    /// Returns the Vulkan sampler handle.
    #[inline]
    pub fn handle(&self) -> vk::Sampler {
        self.sampler
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        unsafe {
            self.device.handle().destroy_sampler(self.sampler, None);
        }
    }
}
