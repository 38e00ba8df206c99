//! Image usage states and the layout-transition protocol.
//!
//! Every image the renderer touches is tracked by a usage-intent tag and
//! moved between states with explicit barriers. A transition must name the
//! exact `(old, new)` pair; a pair outside the supported table is a
//! programming error and panics rather than recording an incorrect barrier.

use ash::vk;

/// Usage-intent tag for an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageState {
    /// Contents undefined; the image has not been written yet this frame
    /// (or ever).
    Uninitialized,
    /// Destination of a transfer (staged upload) operation.
    TransferDst,
    /// Readable from shaders (sampled).
    ShaderRead,
    /// Color attachment output.
    ColorTarget,
    /// Depth attachment output.
    DepthTarget,
    /// Ready for presentation.
    Present,
}

impl ImageState {
    /// The Vulkan image layout backing this state.
    pub fn to_vk_layout(self) -> vk::ImageLayout {
        match self {
            ImageState::Uninitialized => vk::ImageLayout::UNDEFINED,
            ImageState::TransferDst => vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            ImageState::ShaderRead => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            ImageState::ColorTarget => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            ImageState::DepthTarget => vk::ImageLayout::DEPTH_ATTACHMENT_OPTIMAL,
            ImageState::Present => vk::ImageLayout::PRESENT_SRC_KHR,
        }
    }
}

/// Stage and access masks for one supported transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierMasks {
    pub src_stage: vk::PipelineStageFlags,
    pub src_access: vk::AccessFlags,
    pub dst_stage: vk::PipelineStageFlags,
    pub dst_access: vk::AccessFlags,
}

/// Returns the stage/access masks for a supported `(old, new)` pair.
///
/// Depth transitions scope both sides to the early and late fragment-test
/// stages so depth writes of consecutive frames cannot overlap.
///
/// # Panics
///
/// Panics on any pair outside the supported table. An unsupported
/// transition is a contract violation, not a recoverable condition.
pub fn barrier_masks(old: ImageState, new: ImageState) -> BarrierMasks {
    let fragment_tests =
        vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;

    match (old, new) {
        (ImageState::Uninitialized, ImageState::TransferDst) => BarrierMasks {
            src_stage: vk::PipelineStageFlags::TOP_OF_PIPE,
            src_access: vk::AccessFlags::empty(),
            dst_stage: vk::PipelineStageFlags::TRANSFER,
            dst_access: vk::AccessFlags::TRANSFER_WRITE,
        },
        (ImageState::TransferDst, ImageState::ShaderRead) => BarrierMasks {
            src_stage: vk::PipelineStageFlags::TRANSFER,
            src_access: vk::AccessFlags::TRANSFER_WRITE,
            dst_stage: vk::PipelineStageFlags::FRAGMENT_SHADER,
            dst_access: vk::AccessFlags::SHADER_READ,
        },
        (ImageState::Uninitialized, ImageState::ColorTarget) => BarrierMasks {
            src_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            src_access: vk::AccessFlags::empty(),
            dst_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            dst_access: vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
        },
        (ImageState::Uninitialized, ImageState::DepthTarget) => BarrierMasks {
            src_stage: fragment_tests,
            src_access: vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            dst_stage: fragment_tests,
            dst_access: vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
        },
        (ImageState::ColorTarget, ImageState::Present) => BarrierMasks {
            src_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            src_access: vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            dst_stage: vk::PipelineStageFlags::BOTTOM_OF_PIPE,
            dst_access: vk::AccessFlags::empty(),
        },
        _ => panic!("unsupported image state transition: {:?} -> {:?}", old, new),
    }
}

/// Records a layout transition barrier for `image` on `cmd`.
pub fn record_transition(
    device: &ash::Device,
    cmd: vk::CommandBuffer,
    image: vk::Image,
    aspect_mask: vk::ImageAspectFlags,
    old: ImageState,
    new: ImageState,
) {
    let masks = barrier_masks(old, new);

    let barrier = vk::ImageMemoryBarrier::default()
        .old_layout(old.to_vk_layout())
        .new_layout(new.to_vk_layout())
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(
            vk::ImageSubresourceRange::default()
                .aspect_mask(aspect_mask)
                .base_mip_level(0)
                .level_count(1)
                .base_array_layer(0)
                .layer_count(1),
        )
        .src_access_mask(masks.src_access)
        .dst_access_mask(masks.dst_access);

    unsafe {
        device.cmd_pipeline_barrier(
            cmd,
            masks.src_stage,
            masks.dst_stage,
            vk::DependencyFlags::empty(),
            &[],
            &[],
            &[barrier],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_map_to_vulkan() {
        assert_eq!(
            ImageState::Uninitialized.to_vk_layout(),
            vk::ImageLayout::UNDEFINED
        );
        assert_eq!(
            ImageState::TransferDst.to_vk_layout(),
            vk::ImageLayout::TRANSFER_DST_OPTIMAL
        );
        assert_eq!(
            ImageState::ShaderRead.to_vk_layout(),
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL
        );
        assert_eq!(
            ImageState::Present.to_vk_layout(),
            vk::ImageLayout::PRESENT_SRC_KHR
        );
    }

    #[test]
    fn test_upload_transitions() {
        let to_transfer = barrier_masks(ImageState::Uninitialized, ImageState::TransferDst);
        assert_eq!(to_transfer.src_access, vk::AccessFlags::empty());
        assert_eq!(to_transfer.dst_access, vk::AccessFlags::TRANSFER_WRITE);
        assert_eq!(to_transfer.dst_stage, vk::PipelineStageFlags::TRANSFER);

        let to_shader = barrier_masks(ImageState::TransferDst, ImageState::ShaderRead);
        assert_eq!(to_shader.src_access, vk::AccessFlags::TRANSFER_WRITE);
        assert_eq!(to_shader.dst_access, vk::AccessFlags::SHADER_READ);
        assert_eq!(to_shader.dst_stage, vk::PipelineStageFlags::FRAGMENT_SHADER);
    }

    #[test]
    fn test_present_transition_orders_after_color_writes() {
        let masks = barrier_masks(ImageState::ColorTarget, ImageState::Present);
        assert_eq!(masks.src_stage, vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT);
        assert_eq!(masks.src_access, vk::AccessFlags::COLOR_ATTACHMENT_WRITE);
        assert_eq!(masks.dst_access, vk::AccessFlags::empty());
    }

    #[test]
    fn test_depth_transition_scopes_fragment_tests_both_sides() {
        let masks = barrier_masks(ImageState::Uninitialized, ImageState::DepthTarget);
        let fragment_tests = vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS
            | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
        assert_eq!(masks.src_stage, fragment_tests);
        assert_eq!(masks.dst_stage, fragment_tests);
        assert_eq!(
            masks.dst_access,
            vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE
        );
    }

    #[test]
    #[should_panic(expected = "unsupported image state transition")]
    fn test_unsupported_transition_is_fatal() {
        barrier_masks(ImageState::ShaderRead, ImageState::TransferDst);
    }

    #[test]
    #[should_panic(expected = "unsupported image state transition")]
    fn test_present_back_to_color_is_fatal() {
        barrier_masks(ImageState::Present, ImageState::ColorTarget);
    }
}
