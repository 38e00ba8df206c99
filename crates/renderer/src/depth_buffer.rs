//! Depth buffer management.
//!
//! The depth target lives and dies with the swapchain: it is rebuilt on
//! every surface recreation at the new extent, while its format is chosen
//! once at startup from a fixed preference list.

use std::sync::Arc;

use ash::vk;
use tracing::info;

use voxel_rhi::device::Device;
use voxel_rhi::image::GpuImage;
use voxel_rhi::{RhiError, RhiResult};

/// Depth formats in preference order: pure 32-bit float depth first, then
/// the depth+stencil variants.
pub const DEPTH_FORMAT_PREFERENCE: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

/// Picks the first format of the preference list accepted by `supported`.
pub fn choose_depth_format(supported: impl Fn(vk::Format) -> bool) -> Option<vk::Format> {
    DEPTH_FORMAT_PREFERENCE.iter().copied().find(|&f| supported(f))
}

/// Queries the physical device for the first preferred depth format that
/// supports depth-stencil attachment with optimal tiling.
///
/// # Errors
///
/// Returns an error when none of the preferred formats is supported; the
/// environment cannot run the renderer.
pub fn query_depth_format(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> RhiResult<vk::Format> {
    choose_depth_format(|format| {
        let props =
            unsafe { instance.get_physical_device_format_properties(physical_device, format) };
        props
            .optimal_tiling_features
            .contains(vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT)
    })
    .ok_or_else(|| RhiError::SwapchainError("No supported depth format".to_string()))
}

/// True when `format` carries a stencil aspect.
pub fn has_stencil(format: vk::Format) -> bool {
    matches!(
        format,
        vk::Format::D32_SFLOAT_S8_UINT | vk::Format::D24_UNORM_S8_UINT
    )
}

/// Depth attachment image matched to the swapchain extent.
pub struct DepthBuffer {
    image: GpuImage,
}

impl DepthBuffer {
    /// Creates a depth image and view for the given extent.
    ///
    /// # Errors
    ///
    /// Returns an error if image or view creation fails.
    pub fn new(
        device: Arc<Device>,
        format: vk::Format,
        width: u32,
        height: u32,
    ) -> RhiResult<Self> {
        let image = GpuImage::new(
            device,
            vk::Extent3D {
                width,
                height,
                depth: 1,
            },
            format,
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT,
            vk::ImageAspectFlags::DEPTH,
        )?;

        info!("Created depth buffer: {}x{} ({:?})", width, height, format);

        Ok(Self { image })
    }

    /// Returns the Vulkan image handle.
    #[inline]
    pub fn image(&self) -> vk::Image {
        self.image.handle()
    }

    /// Returns the Vulkan image view handle.
    #[inline]
    pub fn view(&self) -> vk::ImageView {
        self.image.view()
    }

    /// Returns the depth format.
    #[inline]
    pub fn format(&self) -> vk::Format {
        self.image.format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order() {
        // Everything supported: pure 32-bit float depth wins
        assert_eq!(
            choose_depth_format(|_| true),
            Some(vk::Format::D32_SFLOAT)
        );

        // First preference missing: fall through in order
        assert_eq!(
            choose_depth_format(|f| f != vk::Format::D32_SFLOAT),
            Some(vk::Format::D32_SFLOAT_S8_UINT)
        );

        // Only the last one available
        assert_eq!(
            choose_depth_format(|f| f == vk::Format::D24_UNORM_S8_UINT),
            Some(vk::Format::D24_UNORM_S8_UINT)
        );

        // Nothing supported
        assert_eq!(choose_depth_format(|_| false), None);
    }

    #[test]
    fn test_stencil_detection() {
        assert!(!has_stencil(vk::Format::D32_SFLOAT));
        assert!(has_stencil(vk::Format::D32_SFLOAT_S8_UINT));
        assert!(has_stencil(vk::Format::D24_UNORM_S8_UINT));
    }
}
