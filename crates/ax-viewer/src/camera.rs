use glam::{Mat4, Vec3};

/// Fraction of the remaining distance covered per frame when easing
/// toward the drag target.
const SMOOTHING: f32 = 0.1;
/// Radians of rotation per pixel of drag.
const DRAG_SCALE: f32 = 0.01;
/// Multiplicative zoom factor per unit of wheel delta.
const WHEEL_SCALE: f32 = 0.001;
/// Reference distance at which the zoom readout shows 100%.
const ZOOM_REF: f32 = 5.0;

const ZOOM_IN_STEP: f32 = 0.8;
const ZOOM_OUT_STEP: f32 = 1.25;

/// Initial eye position; only its direction is kept, zoom scales the
/// distance along it.
const INITIAL_EYE: Vec3 = Vec3::new(3.0, 3.0, 3.0);

/// Orbit camera for the model viewer.
///
/// The eye sits on a fixed direction from the origin; dragging rotates
/// the model (yaw/pitch), the wheel rescales the eye distance. All
/// update functions are pure state transitions so the control scheme
/// is testable without a render surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: INITIAL_EYE.length(),
            yaw: 0.0,
            pitch: 0.0,
            target_yaw: 0.0,
            target_pitch: 0.0,
            aspect_ratio: 800.0 / 600.0,
        }
    }
}

impl Camera {
    /// Drag deltas in pixels map linearly to target rotation.
    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        self.target_yaw += dx * DRAG_SCALE;
        self.target_pitch += dy * DRAG_SCALE;
    }

    /// Wheel delta rescales the eye distance multiplicatively. The
    /// factor is kept positive so a single large delta cannot flip or
    /// collapse the camera.
    pub fn apply_wheel(&mut self, delta: f32) {
        let factor = (1.0 + delta * WHEEL_SCALE).max(0.1);
        self.distance *= factor;
    }

    /// One frame of exponential smoothing toward the drag target.
    pub fn tick(&mut self) {
        self.yaw += (self.target_yaw - self.yaw) * SMOOTHING;
        self.pitch += (self.target_pitch - self.pitch) * SMOOTHING;
    }

    pub fn zoom_in(&mut self) {
        self.distance *= ZOOM_IN_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.distance *= ZOOM_OUT_STEP;
    }

    /// Zoom readout as a percentage, a bounded inverse of the eye
    /// distance. Always within [10, 1000].
    pub fn zoom_percent(&self) -> f32 {
        (ZOOM_REF / self.distance).clamp(0.1, 10.0) * 100.0
    }

    /// Restore the initial pose and zero rotation, instantaneously
    /// (targets too, so no smoothing happens afterwards).
    pub fn reset(&mut self) {
        *self = Self {
            aspect_ratio: self.aspect_ratio,
            ..Self::default()
        };
    }

    /// True once the smoothed rotation has effectively reached its
    /// target and redraws would be visually idempotent.
    pub fn is_settled(&self) -> bool {
        (self.target_yaw - self.yaw).abs() < 1e-4 && (self.target_pitch - self.pitch).abs() < 1e-4
    }

    pub fn eye(&self) -> Vec3 {
        INITIAL_EYE.normalize() * self.distance
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(75f32.to_radians(), self.aspect_ratio, 0.1, 1000.0);
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    /// Model transform from the smoothed rotation; the mesh spins, the
    /// eye stays put.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch) * Mat4::from_rotation_y(self.yaw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_moves_target_not_current() {
        let mut cam = Camera::default();
        cam.apply_drag(100.0, -50.0);
        assert_eq!(cam.target_yaw, 1.0);
        assert_eq!(cam.target_pitch, -0.5);
        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.pitch, 0.0);
    }

    #[test]
    fn tick_converges_to_target() {
        let mut cam = Camera::default();
        cam.apply_drag(100.0, 0.0);

        cam.tick();
        assert!((cam.yaw - 0.1).abs() < 1e-6);

        for _ in 0..200 {
            cam.tick();
        }
        assert!(cam.is_settled());
        assert!((cam.yaw - 1.0).abs() < 1e-3);
    }

    #[test]
    fn wheel_zoom_is_multiplicative() {
        let mut cam = Camera::default();
        let before = cam.distance;
        cam.apply_wheel(100.0);
        assert!((cam.distance - before * 1.1).abs() < 1e-5);
    }

    #[test]
    fn wheel_factor_never_goes_nonpositive() {
        let mut cam = Camera::default();
        cam.apply_wheel(-5000.0);
        assert!(cam.distance > 0.0);
    }

    #[test]
    fn zoom_percent_is_clamped() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.zoom_in();
        }
        assert_eq!(cam.zoom_percent(), 1000.0);

        for _ in 0..200 {
            cam.zoom_out();
        }
        assert_eq!(cam.zoom_percent(), 10.0);
    }

    #[test]
    fn zoom_percent_monotone_in_distance() {
        let mut cam = Camera::default();
        let mut last = cam.zoom_percent();
        for _ in 0..20 {
            cam.zoom_out();
            let now = cam.zoom_percent();
            assert!(now <= last);
            last = now;
        }
    }

    #[test]
    fn fixed_zoom_steps() {
        let mut cam = Camera::default();
        let d = cam.distance;
        cam.zoom_in();
        assert!((cam.distance - d * 0.8).abs() < 1e-6);
        cam.zoom_out();
        assert!((cam.distance - d).abs() < 1e-5);
    }

    #[test]
    fn reset_is_instant_and_keeps_aspect() {
        let mut cam = Camera::default();
        cam.aspect_ratio = 2.0;
        cam.apply_drag(300.0, 300.0);
        for _ in 0..5 {
            cam.tick();
        }
        cam.zoom_in();

        cam.reset();
        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.target_yaw, 0.0);
        assert_eq!(cam.pitch, 0.0);
        assert_eq!(cam.target_pitch, 0.0);
        assert_eq!(cam.distance, Camera::default().distance);
        assert_eq!(cam.aspect_ratio, 2.0);
        assert!(cam.is_settled());
    }
}
