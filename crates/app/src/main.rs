//! Voxel renderer entry point.
//!
//! Drives the per-tick loop: input and camera update, then one
//! begin/draw/end frame sequence. Ticks where the surface cannot produce
//! a frame (resize in progress, minimized window) are skipped and retried.

use std::path::Path;

use anyhow::Result;
use glam::{IVec3, Mat4, Vec3};
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use voxel_core::{FpsCounter, FrameTimer};
use voxel_platform::{InputState, KeyCode, MouseButton, Window};
use voxel_renderer::{Chunk, GameObject, Model, Renderer, Texture};
use voxel_resources::{ChunkGrid, MeshData};
use voxel_scene::{Camera, CameraIntent};

const WINDOW_TITLE: &str = "voxels";
const CHUNK_GRID_SIZE: u32 = 8;
const MAX_DRAWABLES: u32 = 8;

/// Maps the held keys to this tick's camera intents.
fn camera_intent(input: &InputState) -> CameraIntent {
    let mut intent = CameraIntent::empty();
    if input.is_key_pressed(KeyCode::KeyW) {
        intent |= CameraIntent::MOVE_FORWARD;
    }
    if input.is_key_pressed(KeyCode::KeyS) {
        intent |= CameraIntent::MOVE_BACK;
    }
    if input.is_key_pressed(KeyCode::KeyA) {
        intent |= CameraIntent::MOVE_LEFT;
    }
    if input.is_key_pressed(KeyCode::KeyD) {
        intent |= CameraIntent::MOVE_RIGHT;
    }
    if input.is_key_pressed(KeyCode::Space) {
        intent |= CameraIntent::MOVE_UP;
    }
    if input.is_key_pressed(KeyCode::ShiftLeft) {
        intent |= CameraIntent::MOVE_DOWN;
    }
    intent
}

struct App {
    // Drawables hold device references; they are declared before the
    // renderer so they drop first
    chunks: Vec<Chunk>,
    scenery: Option<GameObject>,
    renderer: Option<Renderer>,
    window: Option<Window>,

    camera: Camera,
    input: InputState,
    timer: FrameTimer,
    fps: FpsCounter,
}

impl App {
    fn new() -> Self {
        Self {
            chunks: Vec::new(),
            scenery: None,
            renderer: None,
            window: None,
            camera: Camera::new(),
            input: InputState::new(),
            timer: FrameTimer::new(),
            fps: FpsCounter::new(),
        }
    }

    /// Creates the renderer and world content once the window exists.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Window::new(event_loop, 1280, 720, WINDOW_TITLE)?;
        let renderer = Renderer::new(&window, MAX_DRAWABLES)?;

        let grid = ChunkGrid::sphere(CHUNK_GRID_SIZE);
        info!(
            "Generated {}^3 chunk with {} solid voxels",
            grid.size(),
            grid.solid_count()
        );
        self.chunks.push(Chunk::new(&renderer, &grid, IVec3::ZERO)?);

        // Optional mesh scenery when the assets are present
        let obj_path = Path::new("assets/model.obj");
        let tex_path = Path::new("assets/model.png");
        if obj_path.exists() && tex_path.exists() {
            let mesh = MeshData::load_obj(obj_path)?;
            let model = Model::from_mesh_data(renderer.transfer(), &mesh)?;
            let texture =
                Texture::from_file(renderer.device().clone(), renderer.transfer(), tex_path)?;
            let mut object = GameObject::new(&renderer, model, texture)?;
            object.transform = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
            self.scenery = Some(object);
        }

        self.renderer = Some(renderer);
        self.window = Some(window);

        info!("Initialization complete, entering main loop");
        Ok(())
    }

    /// Runs one tick: camera update, then the frame protocol.
    fn tick(&mut self) {
        let (window, renderer) = match (&mut self.window, &mut self.renderer) {
            (Some(window), Some(renderer)) => (window, renderer),
            _ => return,
        };

        let dt = self.timer.delta_secs();

        if window.is_cursor_captured() {
            let (dx, dy) = self.input.mouse_delta();
            self.camera.rotate(dx, dy);
            self.camera.update(camera_intent(&self.input), dt);
        }
        self.input.begin_tick();

        let extent = renderer.extent();
        let uniforms = self
            .camera
            .uniforms(extent.width as f32, extent.height as f32);

        match renderer.begin_frame(&uniforms) {
            Ok(true) => {}
            Ok(false) => return, // no frame this tick; retry next
            Err(e) => {
                error!("begin_frame failed: {}", e);
                std::process::exit(1);
            }
        }

        for chunk in &self.chunks {
            chunk.draw(renderer);
        }
        if let Some(object) = &self.scenery {
            object.draw(renderer);
        }

        if let Err(e) = renderer.end_frame() {
            error!("end_frame failed: {}", e);
            std::process::exit(1);
        }

        if let Some(fps) = self.fps.frame() {
            window.set_title(&format!("{} - {} fps", WINDOW_TITLE, fps));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            error!("Initialization failed: {:?}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(ref mut window) = self.window {
                    window.resize(size.width, size.height);
                }
                if let Some(ref mut renderer) = self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.tick();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                use winit::keyboard::PhysicalKey;
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state.is_pressed() {
                        if key == KeyCode::Escape {
                            if let Some(ref mut window) = self.window {
                                window.toggle_cursor_capture();
                            }
                        } else {
                            self.input.on_key_pressed(key);
                        }
                    } else {
                        self.input.on_key_released(key);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(button);
                if state.is_pressed() {
                    self.input.on_mouse_pressed(button);
                } else {
                    self.input.on_mouse_released(button);
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        // Raw motion feeds the first-person look directly
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.on_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    voxel_core::init_logging();
    info!("Starting voxel renderer");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
