//! Frame orchestration.
//!
//! [`Renderer`] sequences exactly one render per tick across rotating
//! frame slots. Synchronization layout:
//!
//! - Per frame slot: one image-available semaphore (signaled by acquire,
//!   waited by submission) and one in-flight fence (signaled by
//!   submission, waited by the CPU before the slot is reused).
//! - Per presentable image: one render-finished semaphore (signaled by
//!   submission, waited by presentation). Indexed by the acquired image,
//!   never by the slot — the slot-to-image mapping is not fixed across
//!   frames and the driver may own more images than there are slots.
//!
//! Surface staleness (out-of-date or suboptimal acquire/present, window
//! resize) is absorbed here by a full swapchain+depth rebuild and a
//! skipped tick; it never reaches the caller as an error. Allocation
//! failures and unsupported formats do, and the process exits on them.

use std::path::Path;
use std::sync::Arc;

use ash::vk;
use tracing::{debug, info};

use voxel_platform::{Surface, Window};
use voxel_rhi::command::{CommandBuffer, CommandPool};
use voxel_rhi::descriptor::{
    update_descriptor_sets, DescriptorBinding, DescriptorPool, DescriptorSetLayout,
};
use voxel_rhi::device::Device;
use voxel_rhi::frame_resource::FrameResource;
use voxel_rhi::image_state::{record_transition, ImageState};
use voxel_rhi::instance::Instance;
use voxel_rhi::physical_device::select_physical_device;
use voxel_rhi::pipeline::{CullMode, FrontFace, GraphicsPipelineBuilder, Pipeline, PipelineLayout};
use voxel_rhi::shader::{Shader, ShaderStage};
use voxel_rhi::swapchain::{Swapchain, FRAMES_IN_FLIGHT};
use voxel_rhi::sync::{Fence, Semaphore};
use voxel_rhi::transfer::TransferContext;
use voxel_rhi::vertex::MeshVertex;
use voxel_rhi::{RhiError, RhiResult};

use bytemuck::Pod;
use voxel_scene::CameraUniforms;

use crate::depth_buffer::{query_depth_format, DepthBuffer};

/// Per-frame-slot synchronization primitives.
struct SlotSync {
    /// Signaled when the acquired image is ready to be rendered to.
    image_available: Semaphore,
    /// Signaled when this slot's submission finishes on the GPU.
    in_flight: Fence,
}

impl SlotSync {
    fn new(device: &Arc<Device>) -> RhiResult<Self> {
        Ok(Self {
            image_available: Semaphore::new(device.clone())?,
            // Signaled so the first wait on this slot does not block
            in_flight: Fence::new(device.clone(), true)?,
        })
    }
}

/// A drawable's descriptor sets, one per frame slot.
///
/// Binding 0 (the camera block) is pre-written at creation; the drawable
/// fills bindings 1 and 2 with its own uniform slots and sampled image.
pub struct BindingGroup {
    sets: Vec<vk::DescriptorSet>,
}

impl BindingGroup {
    /// The descriptor set for `slot`.
    #[inline]
    pub fn set(&self, slot: usize) -> vk::DescriptorSet {
        self.sets[slot]
    }
}

/// Outcome of an image acquisition attempt.
#[derive(Debug, PartialEq, Eq)]
enum AcquireOutcome {
    /// Render into `image_index` this tick.
    Proceed { image_index: u32, suboptimal: bool },
    /// Surface is stale; rebuild it and skip this tick.
    RebuildAndSkip,
}

/// Classifies an acquisition result.
///
/// Out-of-date is expected steady-state behavior; everything outside
/// {success, suboptimal, out-of-date} is fatal.
fn acquire_disposition(
    result: Result<(u32, bool), vk::Result>,
) -> RhiResult<AcquireOutcome> {
    match result {
        Ok((image_index, suboptimal)) => Ok(AcquireOutcome::Proceed {
            image_index,
            suboptimal,
        }),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(AcquireOutcome::RebuildAndSkip),
        Err(e) => Err(RhiError::VulkanError(e)),
    }
}

/// Classifies a presentation result; returns whether the surface needs a
/// rebuild. A pending resize flag forces one even on success.
fn present_disposition(result: Result<bool, vk::Result>, resize_pending: bool) -> RhiResult<bool> {
    match result {
        Ok(suboptimal) => Ok(suboptimal || resize_pending),
        Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(true),
        Err(e) => Err(RhiError::VulkanError(e)),
    }
}

/// The frame orchestrator.
///
/// Field order is drop order: slot- and image-indexed resources first,
/// then the pipeline and descriptor objects, then swapchain and depth
/// target, then the device, surface, and instance. Teardown is
/// structurally guaranteed by composition; the only explicit work in
/// `Drop` is the idle wait.
///
/// Drawables hold `Arc<Device>` clones, so they must be dropped before
/// the renderer (declare them first in the owning struct).
pub struct Renderer {
    /// Camera uniform block, one slot per frame in flight (binding 0 of
    /// every binding group).
    camera_uniforms: FrameResource<CameraUniforms>,
    /// Per-slot command buffers (freed with the pool).
    command_buffers: Vec<CommandBuffer>,
    /// Pool for the per-slot command buffers.
    command_pool: CommandPool,
    /// Per-slot synchronization.
    slot_sync: Vec<SlotSync>,
    /// Per-presentable-image render-finished semaphores.
    render_finished: Vec<Semaphore>,
    /// One-time upload path, construction-time only.
    transfer: TransferContext,
    /// The single graphics pipeline.
    pipeline: Pipeline,
    pipeline_layout: PipelineLayout,
    descriptor_pool: DescriptorPool,
    descriptor_set_layout: DescriptorSetLayout,
    depth_buffer: DepthBuffer,
    depth_format: vk::Format,
    swapchain: Swapchain,
    device: Arc<Device>,
    surface: Surface,
    instance: Instance,

    /// Image index returned by the last successful acquire.
    image_index: u32,
    /// True between a successful `begin_frame` and its `end_frame`.
    frame_open: bool,
    /// A resize or staleness signal is waiting for a rebuild.
    framebuffer_resized: bool,
    /// Current framebuffer size as reported by the window layer.
    width: u32,
    height: u32,
}

impl Renderer {
    /// Creates the renderer for `window`, sized for at most
    /// `max_drawables` binding groups.
    ///
    /// # Errors
    ///
    /// Returns an error if any Vulkan resource creation fails; callers
    /// treat every error from here as fatal.
    pub fn new(window: &Window, max_drawables: u32) -> RhiResult<Self> {
        let width = window.width();
        let height = window.height();

        info!("Initializing renderer ({}x{})", width, height);

        let enable_validation = cfg!(debug_assertions);
        let instance = Instance::new(enable_validation)?;

        let surface = window
            .create_surface(instance.entry(), instance.handle())
            .map_err(|e| RhiError::SurfaceError(e.to_string()))?;

        let physical_device_info =
            select_physical_device(instance.handle(), surface.handle(), surface.loader())?;

        let device = Device::new(&instance, &physical_device_info)?;

        let swapchain = Swapchain::new(&instance, device.clone(), surface.handle(), width, height)?;

        let depth_format = query_depth_format(instance.handle(), device.physical_device())?;
        let surface_extent = swapchain.extent();
        let depth_buffer = DepthBuffer::new(
            device.clone(),
            depth_format,
            surface_extent.width,
            surface_extent.height,
        )?;

        // Layout: 0 = camera block, 1 = object block, 2 = sampled image
        let bindings = [
            DescriptorBinding::uniform_buffer(
                0,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            ),
            DescriptorBinding::uniform_buffer(
                1,
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
            ),
            DescriptorBinding::combined_image_sampler(2, vk::ShaderStageFlags::FRAGMENT),
        ];
        let descriptor_set_layout = DescriptorSetLayout::new(device.clone(), &bindings)?;

        let max_sets = max_drawables * FRAMES_IN_FLIGHT as u32;
        let pool_sizes = [
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::UNIFORM_BUFFER)
                .descriptor_count(max_sets * 2),
            vk::DescriptorPoolSize::default()
                .ty(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                .descriptor_count(max_sets),
        ];
        let descriptor_pool = DescriptorPool::new(device.clone(), max_sets, &pool_sizes)?;

        let (pipeline, pipeline_layout) = Self::create_pipeline(
            device.clone(),
            &descriptor_set_layout,
            swapchain.format(),
            depth_format,
        )?;

        let graphics_family = device.queue_families().graphics_family.unwrap();
        let command_pool = CommandPool::new(device.clone(), graphics_family)?;
        let mut command_buffers = Vec::with_capacity(FRAMES_IN_FLIGHT);
        for _ in 0..FRAMES_IN_FLIGHT {
            command_buffers.push(CommandBuffer::new(device.clone(), &command_pool)?);
        }

        let mut slot_sync = Vec::with_capacity(FRAMES_IN_FLIGHT);
        for _ in 0..FRAMES_IN_FLIGHT {
            slot_sync.push(SlotSync::new(&device)?);
        }

        let render_finished = Self::create_render_finished(&device, swapchain.image_count())?;

        let transfer = TransferContext::new(device.clone())?;

        let camera_uniforms = FrameResource::new(&device, FRAMES_IN_FLIGHT)?;

        info!(
            "Renderer initialized: {} presentable images, {} frames in flight",
            swapchain.image_count(),
            FRAMES_IN_FLIGHT
        );

        Ok(Self {
            camera_uniforms,
            command_buffers,
            command_pool,
            slot_sync,
            render_finished,
            transfer,
            pipeline,
            pipeline_layout,
            descriptor_pool,
            descriptor_set_layout,
            depth_buffer,
            depth_format,
            swapchain,
            device,
            surface,
            instance,
            image_index: 0,
            frame_open: false,
            framebuffer_resized: false,
            width,
            height,
        })
    }

    /// One render-finished semaphore per presentable image.
    fn create_render_finished(
        device: &Arc<Device>,
        image_count: usize,
    ) -> RhiResult<Vec<Semaphore>> {
        let mut semaphores = Vec::with_capacity(image_count);
        for _ in 0..image_count {
            semaphores.push(Semaphore::new(device.clone())?);
        }
        Ok(semaphores)
    }

    /// Builds the single graphics pipeline from the on-disk SPIR-V.
    fn create_pipeline(
        device: Arc<Device>,
        descriptor_set_layout: &DescriptorSetLayout,
        color_format: vk::Format,
        depth_format: vk::Format,
    ) -> RhiResult<(Pipeline, PipelineLayout)> {
        let vertex_shader = Shader::from_spirv_file(
            device.clone(),
            Path::new("shaders/spirv/voxel.vert.spv"),
            ShaderStage::Vertex,
        )?;
        let fragment_shader = Shader::from_spirv_file(
            device.clone(),
            Path::new("shaders/spirv/voxel.frag.spv"),
            ShaderStage::Fragment,
        )?;

        let pipeline_layout =
            PipelineLayout::new(device.clone(), &[descriptor_set_layout.handle()])?;

        let pipeline = GraphicsPipelineBuilder::new()
            .vertex_shader(&vertex_shader)
            .fragment_shader(&fragment_shader)
            .vertex_binding(MeshVertex::binding_description())
            .vertex_attributes(&MeshVertex::attribute_descriptions())
            .cull_mode(CullMode::Back)
            .front_face(FrontFace::CounterClockwise)
            .depth_test(true, true)
            .color_attachment_format(color_format)
            .depth_attachment_format(depth_format)
            .build(device, &pipeline_layout)?;

        Ok((pipeline, pipeline_layout))
    }

    /// Notes a framebuffer resize. The surface rebuilds on the next tick.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        debug!(
            "Resize: {}x{} -> {}x{}",
            self.width, self.height, width, height
        );
        self.width = width;
        self.height = height;
        self.framebuffer_resized = true;
    }

    /// Rebuilds the swapchain, depth buffer, and image-indexed semaphores
    /// for the current framebuffer size.
    ///
    /// A zero framebuffer size (minimized window) defers the rebuild: the
    /// resized flag stays set and every tick skips until a non-zero size
    /// arrives from the window layer.
    fn recreate_surface(&mut self) -> RhiResult<()> {
        if self.width == 0 || self.height == 0 {
            debug!("Deferring surface rebuild while framebuffer is zero-sized");
            self.framebuffer_resized = true;
            return Ok(());
        }

        self.swapchain
            .recreate(self.surface.handle(), self.width, self.height)?;

        let extent = self.swapchain.extent();
        self.depth_buffer = DepthBuffer::new(
            self.device.clone(),
            self.depth_format,
            extent.width,
            extent.height,
        )?;

        // Render-finished semaphores are image-indexed; only a changed
        // image count forces new ones
        if self.render_finished.len() != self.swapchain.image_count() {
            self.render_finished =
                Self::create_render_finished(&self.device, self.swapchain.image_count())?;
        }

        self.framebuffer_resized = false;
        Ok(())
    }

    /// Opens a frame: blocks until the current slot's previous GPU work is
    /// done, acquires a presentable image, and begins command recording
    /// with the pass set up (attachments cleared, viewport/scissor set,
    /// pipeline bound).
    ///
    /// Returns `false` when no frame can be produced this tick (stale
    /// surface or minimized window); the caller must skip drawing and
    /// `end_frame` and retry next tick. The frame slot does not advance
    /// on that path.
    ///
    /// # Errors
    ///
    /// Returns an error on any failure other than surface staleness.
    pub fn begin_frame(&mut self, camera: &CameraUniforms) -> RhiResult<bool> {
        if self.framebuffer_resized {
            self.recreate_surface()?;
            if self.framebuffer_resized {
                // Still zero-sized; nothing to render to
                return Ok(false);
            }
        }

        let slot = self.swapchain.frame_slot();

        // Block until this slot's previous submission has fully completed;
        // after this the slot's command buffer and uniform slots are safe
        // to overwrite
        self.slot_sync[slot].in_flight.wait(u64::MAX)?;

        let acquire_semaphore = self.slot_sync[slot].image_available.handle();
        match acquire_disposition(self.swapchain.acquire_next_image(acquire_semaphore))? {
            AcquireOutcome::Proceed {
                image_index,
                suboptimal,
            } => {
                self.image_index = image_index;
                if suboptimal {
                    // Usable this tick; rebuild after presentation
                    self.framebuffer_resized = true;
                }
            }
            AcquireOutcome::RebuildAndSkip => {
                debug!("Surface out of date at acquire; rebuilding and skipping tick");
                self.framebuffer_resized = true;
                self.recreate_surface()?;
                return Ok(false);
            }
        }

        self.slot_sync[slot].in_flight.reset()?;

        let cmd = &self.command_buffers[slot];
        cmd.reset()?;

        self.camera_uniforms.write(slot, camera);

        cmd.begin()?;

        let color_image = self.swapchain.image(self.image_index as usize);
        record_transition(
            self.device.handle(),
            cmd.handle(),
            color_image,
            vk::ImageAspectFlags::COLOR,
            ImageState::Uninitialized,
            ImageState::ColorTarget,
        );
        record_transition(
            self.device.handle(),
            cmd.handle(),
            self.depth_buffer.image(),
            vk::ImageAspectFlags::DEPTH,
            ImageState::Uninitialized,
            ImageState::DepthTarget,
        );

        let extent = self.swapchain.extent();

        let color_attachment = vk::RenderingAttachmentInfo::default()
            .image_view(self.swapchain.image_view(self.image_index as usize))
            .image_layout(ImageState::ColorTarget.to_vk_layout())
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .clear_value(vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: [0.0, 0.0, 0.0, 1.0],
                },
            });

        let depth_attachment = vk::RenderingAttachmentInfo::default()
            .image_view(self.depth_buffer.view())
            .image_layout(ImageState::DepthTarget.to_vk_layout())
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::DONT_CARE)
            .clear_value(vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            });

        let rendering_info = vk::RenderingInfo::default()
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .layer_count(1)
            .color_attachments(std::slice::from_ref(&color_attachment))
            .depth_attachment(&depth_attachment);

        cmd.begin_rendering(&rendering_info);

        cmd.set_viewport(&vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        });
        cmd.set_scissor(&vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        });

        cmd.bind_pipeline(self.pipeline.handle());

        self.frame_open = true;
        Ok(true)
    }

    /// Closes the frame: ends the pass, submits with the slot's acquire
    /// semaphore as wait and the acquired image's render-finished
    /// semaphore as signal, presents, and advances the frame slot.
    ///
    /// The slot advances unconditionally, even when presentation reported
    /// staleness, so CPU/GPU resource rotation stays consistent across a
    /// rebuild.
    ///
    /// # Errors
    ///
    /// Returns an error on any failure other than surface staleness.
    pub fn end_frame(&mut self) -> RhiResult<()> {
        assert!(self.frame_open, "end_frame without a successful begin_frame");

        let slot = self.swapchain.frame_slot();
        let cmd = &self.command_buffers[slot];

        cmd.end_rendering();

        record_transition(
            self.device.handle(),
            cmd.handle(),
            self.swapchain.image(self.image_index as usize),
            vk::ImageAspectFlags::COLOR,
            ImageState::ColorTarget,
            ImageState::Present,
        );

        cmd.end()?;

        // Wait: this slot's acquire. Signal: this image's render-finished.
        // The signal must be image-indexed because presentation of image N
        // can still be pending when a later frame renders into image M.
        let wait_semaphores = [self.slot_sync[slot].image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let signal_semaphores = [self.render_finished[self.image_index as usize].handle()];
        let command_buffers = [cmd.handle()];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device.handle().queue_submit(
                self.device.graphics_queue(),
                &[submit_info],
                self.slot_sync[slot].in_flight.handle(),
            )?;
        }

        let present_result = self.swapchain.present(
            self.device.present_queue(),
            self.image_index,
            signal_semaphores[0],
        );

        self.frame_open = false;
        self.swapchain.advance_slot();

        if present_disposition(present_result, self.framebuffer_resized)? {
            debug!("Surface stale at present; rebuilding");
            self.framebuffer_resized = true;
            self.recreate_surface()?;
        }

        Ok(())
    }

    /// Allocates a drawable's per-slot descriptor sets with the camera
    /// block pre-written at binding 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor pool is exhausted.
    pub fn create_binding_group(&self) -> RhiResult<BindingGroup> {
        let layouts = vec![self.descriptor_set_layout.handle(); FRAMES_IN_FLIGHT];
        let sets = self.descriptor_pool.allocate(&layouts)?;

        for (slot, &set) in sets.iter().enumerate() {
            let camera_info = vk::DescriptorBufferInfo::default()
                .buffer(self.camera_uniforms.slot(slot))
                .offset(0)
                .range(CameraUniforms::SIZE as u64);
            let camera_infos = [camera_info];

            let write = vk::WriteDescriptorSet::default()
                .dst_set(set)
                .dst_binding(0)
                .dst_array_element(0)
                .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                .buffer_info(&camera_infos);

            update_descriptor_sets(&self.device, &[write]);
        }

        Ok(BindingGroup { sets })
    }

    /// Points a binding group's object block (binding 1) at the drawable's
    /// per-slot uniform buffers and its sampled image (binding 2) at
    /// `view`/`sampler`.
    pub fn write_drawable_bindings<T: Pod>(
        &self,
        group: &BindingGroup,
        uniforms: &FrameResource<T>,
        view: vk::ImageView,
        sampler: vk::Sampler,
    ) {
        for slot in 0..FRAMES_IN_FLIGHT {
            let object_info = vk::DescriptorBufferInfo::default()
                .buffer(uniforms.slot(slot))
                .offset(0)
                .range(uniforms.slot_size());
            let object_infos = [object_info];

            let image_info = vk::DescriptorImageInfo::default()
                .sampler(sampler)
                .image_view(view)
                .image_layout(ImageState::ShaderRead.to_vk_layout());
            let image_infos = [image_info];

            let writes = [
                vk::WriteDescriptorSet::default()
                    .dst_set(group.set(slot))
                    .dst_binding(1)
                    .dst_array_element(0)
                    .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
                    .buffer_info(&object_infos),
                vk::WriteDescriptorSet::default()
                    .dst_set(group.set(slot))
                    .dst_binding(2)
                    .dst_array_element(0)
                    .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
                    .image_info(&image_infos),
            ];

            update_descriptor_sets(&self.device, &writes);
        }
    }

    /// Binds a drawable's descriptor set for the current frame slot.
    ///
    /// Binding and the drawable's uniform upload are independent; both
    /// must happen before its draw call, in either order.
    pub fn bind(&self, group: &BindingGroup) {
        let slot = self.swapchain.frame_slot();
        self.command_buffers[slot]
            .bind_descriptor_sets(self.pipeline_layout.handle(), 0, &[group.set(slot)]);
    }

    /// The current frame slot.
    #[inline]
    pub fn frame_slot(&self) -> usize {
        self.swapchain.frame_slot()
    }

    /// The command buffer open for the current frame slot.
    #[inline]
    pub fn command_buffer(&self) -> &CommandBuffer {
        &self.command_buffers[self.swapchain.frame_slot()]
    }

    /// The device, for drawables creating their own GPU resources.
    #[inline]
    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// The one-time upload path, for drawable construction.
    #[inline]
    pub fn transfer(&self) -> &TransferContext {
        &self.transfer
    }

    /// Current surface extent.
    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.swapchain.extent()
    }

    /// Current surface aspect ratio.
    pub fn aspect_ratio(&self) -> f32 {
        let extent = self.swapchain.extent();
        extent.width as f32 / extent.height as f32
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        // No freed handle may still be referenced by in-flight work; the
        // fields then tear down in declaration order
        if let Err(e) = self.device.wait_idle() {
            tracing::error!("Failed to wait for device idle during drop: {:?}", e);
        }
        info!("Renderer shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_success_proceeds() {
        let outcome = acquire_disposition(Ok((2, false))).unwrap();
        assert_eq!(
            outcome,
            AcquireOutcome::Proceed {
                image_index: 2,
                suboptimal: false
            }
        );
    }

    #[test]
    fn test_acquire_suboptimal_still_proceeds() {
        let outcome = acquire_disposition(Ok((0, true))).unwrap();
        assert_eq!(
            outcome,
            AcquireOutcome::Proceed {
                image_index: 0,
                suboptimal: true
            }
        );
    }

    #[test]
    fn test_acquire_out_of_date_skips_tick() {
        let outcome = acquire_disposition(Err(vk::Result::ERROR_OUT_OF_DATE_KHR)).unwrap();
        assert_eq!(outcome, AcquireOutcome::RebuildAndSkip);
    }

    #[test]
    fn test_acquire_device_lost_is_fatal() {
        let result = acquire_disposition(Err(vk::Result::ERROR_DEVICE_LOST));
        assert!(result.is_err());
    }

    #[test]
    fn test_present_clean_success() {
        assert!(!present_disposition(Ok(false), false).unwrap());
    }

    #[test]
    fn test_present_suboptimal_rebuilds() {
        assert!(present_disposition(Ok(true), false).unwrap());
    }

    #[test]
    fn test_present_out_of_date_rebuilds() {
        assert!(present_disposition(Err(vk::Result::ERROR_OUT_OF_DATE_KHR), false).unwrap());
    }

    #[test]
    fn test_present_pending_resize_rebuilds() {
        assert!(present_disposition(Ok(false), true).unwrap());
    }

    #[test]
    fn test_present_device_lost_is_fatal() {
        assert!(present_disposition(Err(vk::Result::ERROR_DEVICE_LOST), false).is_err());
    }
}
