//! Sampled 2D textures.

use std::path::Path;
use std::sync::Arc;

use ash::vk;

use voxel_resources::ImageData;
use voxel_rhi::device::Device;
use voxel_rhi::image::GpuImage;
use voxel_rhi::sampler::Sampler;
use voxel_rhi::transfer::TransferContext;
use voxel_rhi::{RhiError, RhiResult};

/// A device-local sRGB texture with its sampler, staged once at creation.
pub struct Texture {
    image: GpuImage,
    sampler: Sampler,
}

impl Texture {
    /// Uploads decoded RGBA8 pixels into a sampled image.
    ///
    /// # Errors
    ///
    /// Returns an error if allocation or the staged copy fails.
    pub fn from_image_data(
        device: Arc<Device>,
        transfer: &TransferContext,
        data: &ImageData,
    ) -> RhiResult<Self> {
        let image = GpuImage::new_sampled_2d(
            device.clone(),
            data.width,
            data.height,
            vk::Format::R8G8B8A8_SRGB,
        )?;
        transfer.stage_to_image(&image, ImageData::ELEMENT_SIZE, &data.pixels)?;

        let sampler = Sampler::linear_repeat(device)?;

        Ok(Self { image, sampler })
    }

    /// Loads and uploads an image file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded or the upload fails.
    pub fn from_file(
        device: Arc<Device>,
        transfer: &TransferContext,
        path: &Path,
    ) -> RhiResult<Self> {
        let data = ImageData::load(path)
            .map_err(|e| RhiError::InvalidHandle(format!("{}: {}", path.display(), e)))?;
        Self::from_image_data(device, transfer, &data)
    }

    /// The image view for descriptor binding.
    #[inline]
    pub fn view(&self) -> vk::ImageView {
        self.image.view()
    }

    /// The sampler for descriptor binding.
    #[inline]
    pub fn sampler(&self) -> vk::Sampler {
        self.sampler.handle()
    }
}
