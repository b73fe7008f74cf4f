//! Pinhole camera state.
//!
//! The camera only describes where the eye is and where it looks. Movement
//! and input handling belong to whatever drives the frame loop; the renderer
//! asks for [`Camera::calculate_camera_to_world`] once per frame.

use prism_core::CameraDesc;
use prism_math::{Mat4, Vec3, Vec4};

/// Pitch is kept just short of straight up/down so the basis never degenerates.
const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: Vec3,
    /// Vertical field of view in degrees
    pub fov_angle: f32,
    /// Unit viewing direction
    pub forward: Vec3,
    /// Accumulated rotation around the camera's right axis, in radians
    pub total_pitch: f32,
    /// Accumulated rotation around world Y, in radians
    pub total_yaw: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 90.0)
    }
}

impl Camera {
    /// Create a camera looking down +Z.
    pub fn new(origin: Vec3, fov_angle: f32) -> Self {
        Self {
            origin,
            fov_angle,
            forward: Vec3::Z,
            total_pitch: 0.0,
            total_yaw: 0.0,
        }
    }

    /// Look along `forward` instead of +Z.
    ///
    /// The direction goes through [`Camera::set_rotation`], so a vertical
    /// `forward` is clamped to the pitch limit. A zero or non-finite vector
    /// leaves the camera unchanged.
    pub fn with_forward(mut self, forward: Vec3) -> Self {
        if let Some(forward) = forward.try_normalize() {
            self.set_rotation(forward.y.clamp(-1.0, 1.0).asin(), forward.x.atan2(forward.z));
        }
        self
    }

    /// Set pitch and yaw (radians) and derive `forward` from them.
    ///
    /// Positive pitch looks up, positive yaw turns toward +X.
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) {
        self.total_pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.total_yaw = yaw;

        let (sin_pitch, cos_pitch) = self.total_pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.total_yaw.sin_cos();
        self.forward = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
    }

    /// `tan(fov / 2)`, the half-height of the image plane at distance one.
    pub fn fov_scale(&self) -> f32 {
        (self.fov_angle.to_radians() * 0.5).tan()
    }

    /// Camera-to-world matrix with columns `(right, up, forward, origin)`.
    ///
    /// `right = normalize(Y x forward)` and `up = normalize(forward x right)`,
    /// so the camera never rolls.
    pub fn calculate_camera_to_world(&self) -> Mat4 {
        let right = Vec3::Y.cross(self.forward).normalize();
        let up = self.forward.cross(right).normalize();

        Mat4::from_cols(
            right.extend(0.0),
            up.extend(0.0),
            self.forward.extend(0.0),
            Vec4::from((self.origin, 1.0)),
        )
    }
}

impl From<&CameraDesc> for Camera {
    fn from(desc: &CameraDesc) -> Self {
        let mut camera = Camera::new(desc.origin, desc.fov);
        if desc.pitch != 0.0 || desc.yaw != 0.0 {
            camera.set_rotation(desc.pitch.to_radians(), desc.yaw.to_radians());
        } else {
            camera = camera.with_forward(desc.forward);
        }
        camera
    }
}
