//! Free-look / orbit camera.
//!
//! The camera owns its view and projection matrices and recomputes them when
//! its state changes. Angles (yaw, pitch, fov) are in degrees.

use bytemuck::{Pod, Zeroable};
use cgj_math::{deg_to_rad, Matrix4, MatrixFactory, Quaternion, Vector3};
use serde::{Deserialize, Serialize};

const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;
const MAX_PITCH: f32 = 89.0;

/// Camera parameters as found in scene descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,

    /// Orbit distance from the center of interest
    pub distance: f32,

    /// Vertical field of view in degrees
    pub fov: f32,

    pub width: u32,
    pub height: u32,

    /// Units per second for `move_eye`
    pub speed: f32,

    /// Degrees per pixel of cursor motion
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            left: -10.0,
            right: 10.0,
            top: 10.0,
            bottom: -10.0,
            near: 0.5,
            far: 100.0,
            distance: 30.0,
            fov: 45.0,
            width: 640,
            height: 480,
            speed: 20.0,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    /// look-at from `eye` along `front`
    Free,
    /// rotate about the origin at `distance`
    Orbit,
}

/// View and projection matrices laid out for a uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view: Matrix4,
    pub projection: Matrix4,
}

#[derive(Debug, Clone)]
pub struct Camera {
    settings: CameraSettings,
    eye: Vector3,
    front: Vector3,
    up: Vector3,
    right: Vector3,
    world_up: Vector3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    aspect: f32,
    last_cursor: Option<(f32, f32)>,
    projection: Projection,
    gimbal_lock: bool,
    mode: ViewMode,
    view: Matrix4,
    perspective: Matrix4,
    orthographic: Matrix4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

impl Camera {
    /// Free-look camera at the default eye, looking down -Z with a perspective projection.
    pub fn new(settings: CameraSettings) -> Self {
        let mut camera = Self {
            settings,
            eye: Vector3::new(1.0, 0.0, 20.0),
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::Y,
            right: Vector3::X,
            world_up: Vector3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: settings.fov.clamp(MIN_FOV, MAX_FOV),
            aspect: aspect_of(settings.width, settings.height),
            last_cursor: None,
            projection: Projection::Perspective,
            gimbal_lock: false,
            mode: ViewMode::Free,
            view: Matrix4::IDENTITY,
            perspective: Matrix4::IDENTITY,
            orthographic: MatrixFactory::orthographic(
                settings.left,
                settings.right,
                settings.top,
                settings.bottom,
                settings.near,
                settings.far,
            ),
        };
        camera.recalculate();
        camera
    }

    /// Settings the camera was created with.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vector3 {
        self.eye
    }

    /// Unit view direction.
    pub fn front(&self) -> Vector3 {
        self.front
    }

    /// Unit up vector, orthogonal to [`Self::front`].
    pub fn up(&self) -> Vector3 {
        self.up
    }

    /// Heading in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Elevation in degrees, kept within ±89.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Viewport width over height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Projection currently in use.
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Whether orbiting uses Euler angles instead of quaternions.
    pub fn gimbal_lock(&self) -> bool {
        self.gimbal_lock
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Matrix4 {
        self.view
    }

    /// Perspective or orthographic matrix, whichever is active.
    pub fn projection_matrix(&self) -> Matrix4 {
        match self.projection {
            Projection::Perspective => self.perspective,
            Projection::Orthographic => self.orthographic,
        }
    }

    /// `projection * view`, ready to multiply model matrices.
    pub fn view_projection_matrix(&self) -> Matrix4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Matrices laid out for upload to a uniform buffer.
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix(),
            projection: self.projection_matrix(),
        }
    }

    /// Switch between perspective and orthographic.
    pub fn toggle_projection(&mut self) {
        self.projection = match self.projection {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        };
    }

    /// Flip the orbit rotation mode. Takes effect immediately when orbiting.
    pub fn toggle_gimbal_lock(&mut self) {
        self.gimbal_lock = !self.gimbal_lock;
        if self.mode == ViewMode::Orbit {
            self.recalculate();
        }
    }

    /// Orbit radius around the origin.
    pub fn set_distance(&mut self, distance: f32) {
        self.settings.distance = distance;
        self.recalculate();
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring degenerate viewport size {}x{}", width, height);
            return;
        }
        self.settings.width = width;
        self.settings.height = height;
        self.aspect = aspect_of(width, height);
        self.recalculate();
    }

    /// Move the eye along the camera axes, `delta` seconds worth.
    pub fn move_eye(&mut self, movement: Movement, delta: f32) {
        let step = self.settings.speed * delta;
        match movement {
            Movement::Forward => self.eye += self.front * step,
            Movement::Backward => self.eye -= self.front * step,
            Movement::Left => self.eye -= self.right * step,
            Movement::Right => self.eye += self.right * step,
            Movement::Up => self.eye += self.world_up * step,
            Movement::Down => self.eye -= self.world_up * step,
        }
        self.mode = ViewMode::Free;
        self.recalculate();
    }

    /// Turn towards a new cursor position. The first sample only latches the
    /// cursor.
    pub fn look(&mut self, xpos: f32, ypos: f32) {
        let (last_x, last_y) = self.last_cursor.unwrap_or((xpos, ypos));
        self.last_cursor = Some((xpos, ypos));

        let xoffset = xpos - last_x;
        // Screen y grows downwards.
        let yoffset = last_y - ypos;

        self.yaw += xoffset * self.settings.sensitivity;
        self.pitch = (self.pitch + yoffset * self.settings.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);

        let (yaw, pitch) = (deg_to_rad(self.yaw), deg_to_rad(self.pitch));
        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front);

        self.mode = ViewMode::Free;
        self.recalculate();
    }

    /// Narrow or widen the field of view, clamped to [1, 45] degrees.
    pub fn zoom(&mut self, yoffset: f32) {
        self.fov = (self.fov - yoffset).clamp(MIN_FOV, MAX_FOV);
        self.recalculate();
    }

    /// Orbit around the origin at the configured distance.
    pub fn orbit(&mut self, xoffset: f32, yoffset: f32) {
        self.yaw += xoffset * self.settings.sensitivity;
        self.pitch += yoffset * self.settings.sensitivity;
        self.mode = ViewMode::Orbit;
        self.recalculate();
    }

    /// Back to the default eye and heading.
    pub fn reset(&mut self) {
        self.eye = Vector3::new(5.0, 5.0, 5.0);
        self.front = Vector3::new(0.0, 0.0, -1.0);
        self.right = Vector3::X;
        self.up = Vector3::Y;
        self.yaw = -90.0;
        self.pitch = 0.0;
        self.last_cursor = None;
        self.mode = ViewMode::Free;
        self.recalculate();
    }

    fn orbit_rotation(&self) -> Matrix4 {
        if self.gimbal_lock {
            MatrixFactory::rodrigues4(Vector3::X, self.pitch) * MatrixFactory::rodrigues4(Vector3::Y, self.yaw)
        } else {
            let qx = Quaternion::from_angle_axis(self.pitch, Vector3::X);
            let qy = Quaternion::from_angle_axis(self.yaw, Vector3::Y);
            (qx * qy).to_matrix()
        }
    }

    fn recalculate(&mut self) {
        self.view = match self.mode {
            ViewMode::Free => MatrixFactory::look_at(self.eye, self.eye + self.front, self.up),
            ViewMode::Orbit => MatrixFactory::translate(0.0, 0.0, -self.settings.distance) * self.orbit_rotation(),
        };
        self.perspective = MatrixFactory::perspective(self.fov, self.aspect, self.settings.near, self.settings.far);
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
