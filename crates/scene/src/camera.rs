//! First-person camera.
//!
//! Movement is driven by an explicit [`CameraIntent`] value passed into
//! [`Camera::update`] each tick; the camera holds no input state of its
//! own. The uniform block it produces feeds the ray-march shader: combined
//! projection-view matrix plus the inverses the ray generation needs.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

bitflags! {
    /// Movement intents for one tick.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CameraIntent: u32 {
        const MOVE_FORWARD = 1 << 0;
        const MOVE_BACK    = 1 << 1;
        const MOVE_LEFT    = 1 << 2;
        const MOVE_RIGHT   = 1 << 3;
        const MOVE_UP      = 1 << 4;
        const MOVE_DOWN    = 1 << 5;
    }
}

/// Per-frame camera uniform block.
///
/// # Memory layout
///
/// Three column-major matrices, then the viewport and ray-march scalars,
/// padded to a 16-byte multiple. 224 bytes total.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CameraUniforms {
    /// Combined projection * view matrix.
    pub proj_view: Mat4,
    /// Inverse of the view matrix.
    pub view_inv: Mat4,
    /// Inverse of the combined projection-view matrix.
    pub proj_view_inv: Mat4,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Tangent of the vertical field of view.
    pub tan_fov: f32,
    /// Near plane distance.
    pub z_near: f32,
    /// Far plane distance.
    pub z_far: f32,
    /// Ray-march step limit.
    pub max_marches: u32,
    /// Padding to a 16-byte multiple.
    pub _padding: [f32; 2],
}

impl CameraUniforms {
    /// Size of the block in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// First-person camera with yaw/pitch orientation.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Position in world space.
    pub position: Vec3,
    /// Pitch (up-down) in radians, clamped to +/- 90 degrees.
    pitch: f32,
    /// Yaw (left-right) in radians, wrapped at +/- 360 degrees.
    yaw: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Look sensitivity per cursor pixel.
    pub sensitivity: Vec2,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near plane distance.
    pub z_near: f32,
    /// Far plane distance.
    pub z_far: f32,
    /// Ray-march step limit handed to the shader.
    pub max_marches: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            pitch: 0.0,
            yaw: 0.0,
            speed: 2.0,
            sensitivity: Vec2::new(0.005, 0.005),
            fov: 45.0_f32.to_radians(),
            z_near: 0.1,
            z_far: 10.0,
            max_marches: 64,
        }
    }
}

const DEGREES_90: f32 = std::f32::consts::FRAC_PI_2;
const DEGREES_360: f32 = std::f32::consts::TAU;

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a cursor delta to the orientation. Pitch saturates at
    /// straight up/down; yaw wraps.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity.x;
        if self.yaw >= DEGREES_360 {
            self.yaw -= DEGREES_360;
        } else if self.yaw <= -DEGREES_360 {
            self.yaw += DEGREES_360;
        }

        self.pitch += dy * self.sensitivity.y;
        self.pitch = self.pitch.clamp(-DEGREES_90, DEGREES_90);
    }

    /// Integrates one tick of movement from `intent`.
    ///
    /// Forward/back and strafe move in the yaw plane; up/down move along
    /// the world Y axis.
    pub fn update(&mut self, intent: CameraIntent, dt: f32) {
        let step = self.speed * dt;
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();

        if intent.contains(CameraIntent::MOVE_FORWARD) {
            self.position.x -= step * sin_yaw;
            self.position.z -= step * cos_yaw;
        }
        if intent.contains(CameraIntent::MOVE_BACK) {
            self.position.x += step * sin_yaw;
            self.position.z += step * cos_yaw;
        }
        if intent.contains(CameraIntent::MOVE_LEFT) {
            self.position.x -= step * cos_yaw;
            self.position.z += step * sin_yaw;
        }
        if intent.contains(CameraIntent::MOVE_RIGHT) {
            self.position.x += step * cos_yaw;
            self.position.z -= step * sin_yaw;
        }
        if intent.contains(CameraIntent::MOVE_UP) {
            self.position.y += step;
        }
        if intent.contains(CameraIntent::MOVE_DOWN) {
            self.position.y -= step;
        }
    }

    /// The current yaw in radians.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// The current pitch in radians.
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// The view matrix for the current orientation.
    pub fn view_matrix(&self) -> Mat4 {
        let direction = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        let yaw_orth = self.yaw - DEGREES_90;
        let right = Vec3::new(yaw_orth.sin(), 0.0, yaw_orth.cos());
        let up = right.cross(direction);

        Mat4::look_at_rh(self.position, self.position - direction, up)
    }

    /// The projection matrix with the Vulkan Y-flip applied.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let mut proj = Mat4::perspective_rh(self.fov, aspect, self.z_near, self.z_far);
        proj.y_axis.y *= -1.0;
        proj
    }

    /// Produces this tick's uniform block for a viewport of `width` x
    /// `height` pixels.
    pub fn uniforms(&self, width: f32, height: f32) -> CameraUniforms {
        let view = self.view_matrix();
        let proj = self.projection_matrix(width / height);
        let proj_view = proj * view;

        CameraUniforms {
            proj_view,
            view_inv: view.inverse(),
            proj_view_inv: proj_view.inverse(),
            viewport: Vec2::new(width, height),
            tan_fov: self.fov.tan(),
            z_near: self.z_near,
            z_far: self.z_far,
            max_marches: self.max_marches,
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_union_and_clear() {
        let mut intent = CameraIntent::empty();
        intent |= CameraIntent::MOVE_FORWARD;
        intent |= CameraIntent::MOVE_LEFT;
        assert!(intent.contains(CameraIntent::MOVE_FORWARD));
        assert!(intent.contains(CameraIntent::MOVE_LEFT));
        assert!(!intent.contains(CameraIntent::MOVE_BACK));

        intent &= !CameraIntent::MOVE_FORWARD;
        assert!(!intent.contains(CameraIntent::MOVE_FORWARD));
        assert!(intent.contains(CameraIntent::MOVE_LEFT));
    }

    #[test]
    fn test_pitch_clamps_at_vertical() {
        let mut camera = Camera::new();
        camera.rotate(0.0, 10_000.0);
        assert_eq!(camera.pitch(), DEGREES_90);

        camera.rotate(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -DEGREES_90);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.rotate(50.0, 0.0);
        }
        assert!(camera.yaw().abs() < DEGREES_360);
    }

    #[test]
    fn test_forward_movement_follows_yaw() {
        let mut camera = Camera::new();
        let start = camera.position;

        // Yaw zero faces -Z in this parameterization
        camera.update(CameraIntent::MOVE_FORWARD, 1.0);
        assert!(camera.position.z < start.z);
        assert_eq!(camera.position.y, start.y);
    }

    #[test]
    fn test_vertical_movement_ignores_yaw() {
        let mut camera = Camera::new();
        camera.rotate(123.0, 0.0);
        let start = camera.position;

        camera.update(CameraIntent::MOVE_UP, 0.5);
        assert_eq!(camera.position.x, start.x);
        assert_eq!(camera.position.z, start.z);
        assert!(camera.position.y > start.y);
    }

    #[test]
    fn test_opposing_intents_cancel() {
        let mut camera = Camera::new();
        let start = camera.position;

        camera.update(
            CameraIntent::MOVE_FORWARD | CameraIntent::MOVE_BACK,
            1.0,
        );
        let moved = (camera.position - start).length();
        assert!(moved < 1e-6);
    }

    #[test]
    fn test_uniforms_layout() {
        // 3 Mat4 (192) + Vec2 (8) + 4 scalars (16) + padding (8) = 224
        assert_eq!(CameraUniforms::SIZE, 224);
        assert_eq!(CameraUniforms::SIZE % 16, 0);
    }

    #[test]
    fn test_uniforms_consistency() {
        let camera = Camera::new();
        let uniforms = camera.uniforms(1280.0, 720.0);

        let view = camera.view_matrix();
        let proj = camera.projection_matrix(1280.0 / 720.0);
        assert_eq!(uniforms.proj_view, proj * view);
        assert_eq!(uniforms.viewport, Vec2::new(1280.0, 720.0));
        assert_eq!(uniforms.z_near, camera.z_near);
        assert_eq!(uniforms.max_marches, camera.max_marches);

        // proj_view_inv must actually invert proj_view
        let round_trip = uniforms.proj_view * uniforms.proj_view_inv;
        let identity = Mat4::IDENTITY;
        for col in 0..4 {
            for row in 0..4 {
                let diff = (round_trip.col(col)[row] - identity.col(col)[row]).abs();
                assert!(diff < 1e-4, "inverse mismatch at ({}, {})", col, row);
            }
        }
    }
}
