use eframe::egui;
use glam::{Mat4, Vec3};
use std::f32::consts::PI;

use crate::render::gpu_types::ChartUniforms;

/// Where the chart opens: straight above the floor.
const OVERVIEW_HEIGHT: f32 = 6.0;
/// Angled view used once the user starts narrowing down a category.
const PERSPECTIVE_POSITION: Vec3 = Vec3::new(1.4, 4.3, 4.0);
/// Vertical field of view of both presets.
const FOV_Y_DEGREES: f32 = 75.0;

/// Minimum elevation (just above looking straight down from below).
const ELEVATION_MIN: f32 = -PI / 2.0 + 0.01;
/// Maximum elevation (just below looking straight down from above).
const ELEVATION_MAX: f32 = PI / 2.0 - 0.01;

/// Minimum orbit distance.
const DISTANCE_MIN: f32 = 1.0;
/// Maximum orbit distance.
const DISTANCE_MAX: f32 = 20.0;

/// Directional light direction and ambient share for the cube shading.
const LIGHT_DIR: [f32; 4] = [1.0, 1.0, 1.0, 0.0];
const AMBIENT: f32 = 0.5;

/// Orbital camera that revolves around a target point.
///
/// The camera position is derived from spherical coordinates (azimuth,
/// elevation, distance) relative to `target`. It produces right-handed
/// view and perspective projection matrices suitable for wgpu/NDC.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalCamera {
    /// The world-space point the camera orbits around.
    pub target: Vec3,
    /// Distance from the target along the viewing ray.
    pub distance: f32,
    /// Horizontal angle in radians (rotation around the world Y axis).
    pub azimuth: f32,
    /// Vertical angle in radians, clamped to (-PI/2 + 0.01, PI/2 - 0.01).
    pub elevation: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Scroll-wheel zoom is off unless configured.
    pub allow_zoom: bool,
    /// Set once the camera has left the opening overview for the
    /// perspective preset. Survives `reset`.
    left_overview: bool,
}

impl Default for OrbitalCamera {
    fn default() -> Self {
        Self::overview()
    }
}

impl OrbitalCamera {
    /// Top-down view of the whole floor. Screen-up points toward -Z, so the
    /// high-conductivity edge is at the top.
    pub fn overview() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: OVERVIEW_HEIGHT,
            azimuth: 0.0,
            elevation: ELEVATION_MAX,
            fov_y: FOV_Y_DEGREES.to_radians(),
            allow_zoom: false,
            left_overview: false,
        }
    }

    /// Camera at `eye` looking at `target`.
    pub fn from_position(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(DISTANCE_MIN);
        Self {
            target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(ELEVATION_MIN, ELEVATION_MAX),
            fov_y: FOV_Y_DEGREES.to_radians(),
            allow_zoom: false,
            left_overview: false,
        }
    }

    /// Compute the camera's world-space position from the spherical
    /// coordinates (azimuth, elevation, distance) relative to `target`.
    pub fn position(&self) -> Vec3 {
        let cos_elev = self.elevation.cos();
        let offset = Vec3::new(
            cos_elev * self.azimuth.sin(),
            self.elevation.sin(),
            cos_elev * self.azimuth.cos(),
        ) * self.distance;

        self.target + offset
    }

    /// Build a right-handed view matrix looking from `position()` toward
    /// `target` with world-up = +Y.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Right-handed perspective projection, near = 0.1, far = 1000.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, 0.1, 1000.0)
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Whether the camera still sits in the opening top-down view.
    pub fn is_overview(&self) -> bool {
        !self.left_overview
            && self.target == Vec3::ZERO
            && self.azimuth == 0.0
            && self.elevation == ELEVATION_MAX
    }

    /// Move to the angled preset the first time a category is picked while
    /// still looking straight down. Later calls do nothing.
    pub fn leave_overview_once(&mut self) {
        if self.left_overview || !self.is_overview() {
            return;
        }
        let allow_zoom = self.allow_zoom;
        *self = Self::from_position(PERSPECTIVE_POSITION, Vec3::ZERO);
        self.allow_zoom = allow_zoom;
        self.left_overview = true;
    }

    /// Rotate the camera by the given angle deltas (radians).
    ///
    /// Elevation is clamped to avoid gimbal-lock singularities at the poles.
    pub fn rotate(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation).clamp(ELEVATION_MIN, ELEVATION_MAX);
    }

    /// Zoom by multiplying the current distance by `factor`.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(DISTANCE_MIN, DISTANCE_MAX);
    }

    /// Pan the target position in the camera-local right/up plane.
    ///
    /// Scaled by the current distance so panning feels the same at any zoom.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let view = self.view_matrix();

        // Rows of the view matrix are the camera basis in world space.
        let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);

        let scale = self.distance * 0.002;
        self.target += right * (-dx * scale) + up * (dy * scale);
    }

    /// Back to the top-down overview. Zoom permission and the one-shot
    /// preset flag are kept.
    pub fn reset(&mut self) {
        let allow_zoom = self.allow_zoom;
        let left_overview = self.left_overview;
        *self = Self::overview();
        self.allow_zoom = allow_zoom;
        self.left_overview = left_overview;
    }

    /// Process egui mouse / scroll input on the given `Response` area.
    ///
    /// * **Left-drag** rotates the camera.
    /// * **Right-drag** pans the target.
    /// * **Scroll wheel** zooms, when allowed.
    pub fn handle_input(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.rotate(delta.x * -0.005, delta.y * -0.005);
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            self.pan(delta.x, delta.y);
        }

        if self.allow_zoom && response.hovered() {
            let scroll = response.ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.0 {
                let factor = (1.0_f32 - scroll * 0.001).clamp(0.5, 2.0);
                self.zoom(factor);
            }
        }
    }

    /// Build a `ChartUniforms` value from the current camera state.
    ///
    /// `color`, `resolution` and `line_width` are left at zero and are
    /// overwritten per draw call.
    pub fn uniforms(&self, aspect: f32) -> ChartUniforms {
        let pos = self.position();
        ChartUniforms {
            view_proj: self.view_projection(aspect).to_cols_array_2d(),
            camera_pos: [pos.x, pos.y, pos.z, 1.0],
            light_dir: LIGHT_DIR,
            color: [0.0; 4],
            resolution: [0.0; 2],
            line_width: 0.0,
            ambient: AMBIENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    fn project(camera: &OrbitalCamera, p: Vec3) -> Vec3 {
        let clip = camera.view_projection(1.0) * Vec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn overview_looks_down_from_height_six() {
        let camera = OrbitalCamera::overview();
        let pos = camera.position();
        assert_relative_eq!(pos.y, 6.0, epsilon = 1e-3);
        assert!(pos.x.abs() < 1e-3);
        assert!(pos.z.abs() < 0.1);
        assert_relative_eq!(camera.fov_y, 75f32.to_radians(), epsilon = 1e-6);
        assert!(camera.is_overview());
    }

    #[test]
    fn overview_puts_far_edge_at_top_and_tensile_to_the_right() {
        let camera = OrbitalCamera::overview();
        let far = project(&camera, Vec3::new(0.0, 0.0, -1.0));
        let near = project(&camera, Vec3::new(0.0, 0.0, 1.0));
        assert!(far.y > near.y);
        let right = project(&camera, Vec3::new(1.0, 0.0, 0.0));
        let left = project(&camera, Vec3::new(-1.0, 0.0, 0.0));
        assert!(right.x > left.x);
    }

    #[test]
    fn from_position_reproduces_eye() {
        let eye = Vec3::new(1.4, 4.3, 4.0);
        let camera = OrbitalCamera::from_position(eye, Vec3::ZERO);
        let pos = camera.position();
        assert_relative_eq!(pos.x, eye.x, epsilon = 1e-4);
        assert_relative_eq!(pos.y, eye.y, epsilon = 1e-4);
        assert_relative_eq!(pos.z, eye.z, epsilon = 1e-4);
    }

    #[test]
    fn perspective_preset_applies_only_once() {
        let mut camera = OrbitalCamera::overview();
        camera.allow_zoom = true;
        camera.leave_overview_once();
        assert_relative_eq!(camera.position().x, 1.4, epsilon = 1e-4);
        assert!(camera.allow_zoom);

        camera.reset();
        assert_relative_eq!(camera.position().y, 6.0, epsilon = 1e-3);
        camera.leave_overview_once();
        assert_relative_eq!(camera.position().y, 6.0, epsilon = 1e-3);
    }

    #[test]
    fn preset_is_skipped_after_user_rotation() {
        let mut camera = OrbitalCamera::overview();
        camera.rotate(0.3, 0.0);
        camera.leave_overview_once();
        assert_relative_eq!(camera.azimuth, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn elevation_and_distance_are_clamped() {
        let mut camera = OrbitalCamera::overview();
        camera.rotate(0.0, 10.0);
        assert!(camera.elevation <= PI / 2.0 - 0.01 + 1e-6);
        camera.zoom(100.0);
        assert_relative_eq!(camera.distance, DISTANCE_MAX);
    }
}
