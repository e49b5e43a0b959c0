/// Perspective camera with a free-look orientation
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// A projected vertex in pixel coordinates, origin at the top-left,
/// +y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// Camera state for perspective projection.
///
/// Orientation is stored as a unit forward vector plus a world-up
/// reference; the right and view-up axes are derived on demand, so the
/// three direction queries stay mutually consistent and right-handed.
/// The forward vector is kept private to preserve the unit-length
/// invariant.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
    forward: Vector3<f32>,
    pub width: u32,
    pub height: u32,
    pub h_fov: f32,
    pub v_fov: f32,
}

impl Camera {
    /// Create a camera at `position` with the given world-up reference,
    /// viewport size in pixels and horizontal/vertical field-of-view
    /// angles in radians (both must be in (0, pi)).
    ///
    /// A zero-length `up` falls back to +Y rather than leaving the
    /// basis permanently degenerate.
    pub fn new(
        position: Point3<f32>,
        up: Vector3<f32>,
        width: u32,
        height: u32,
        h_fov: f32,
        v_fov: f32,
    ) -> Self {
        let up = Unit::try_new(up, 1e-12)
            .map(|u| u.into_inner())
            .unwrap_or_else(Vector3::y);
        Self {
            position,
            up,
            forward: -Vector3::z(),
            width,
            height,
            h_fov,
            v_fov,
        }
    }

    /// Unit vector the camera is looking along.
    pub fn direction_forward(&self) -> Vector3<f32> {
        self.forward
    }

    /// Forward vector with its up-component removed and renormalized,
    /// used for ground-plane movement. Returns the zero vector when the
    /// camera looks straight along the up axis.
    pub fn direction_forward_horizontal(&self) -> Vector3<f32> {
        let horizontal = self.forward - self.up * self.forward.dot(&self.up);
        Unit::try_new(horizontal, 1e-12)
            .map(|u| u.into_inner())
            .unwrap_or_else(Vector3::zeros)
    }

    /// Unit vector pointing to the camera's right (forward x up).
    /// Returns the zero vector when forward is parallel to up, the one
    /// degenerate-basis case; [`Camera::project`] treats that frame as
    /// invalid rather than dividing by zero.
    pub fn direction_right(&self) -> Vector3<f32> {
        Unit::try_new(self.forward.cross(&self.up), 1e-12)
            .map(|u| u.into_inner())
            .unwrap_or_else(Vector3::zeros)
    }

    /// Point the camera along `direction`. The input need not be
    /// normalized; a zero-length direction is ignored. The world-up
    /// reference is unchanged and the projection basis re-orthogonalizes
    /// against the new forward on the next query.
    pub fn set_look_direction(&mut self, direction: Vector3<f32>) {
        if let Some(dir) = Unit::try_new(direction, 1e-12) {
            self.forward = dir.into_inner();
        }
    }

    /// Rotate the view about the up axis by `d_yaw` radians, positive
    /// turning rightward.
    pub fn turn_right(&mut self, d_yaw: f32) {
        let axis = Unit::new_normalize(self.up);
        let rotation = UnitQuaternion::from_axis_angle(&axis, -d_yaw);
        self.forward = (rotation * self.forward).normalize();
    }

    /// Rotate the view about the right axis by `d_pitch` radians,
    /// positive tilting downward. Pitch is not clamped; tilting past the
    /// poles flips the view, matching the free-look behavior this viewer
    /// reproduces.
    pub fn tilt_down(&mut self, d_pitch: f32) {
        let right = self.direction_right();
        if right.norm_squared() == 0.0 {
            return;
        }
        let rotation = UnitQuaternion::from_axis_angle(&Unit::new_normalize(right), -d_pitch);
        self.forward = (rotation * self.forward).normalize();
    }

    /// Project a world-space point to pixel coordinates.
    ///
    /// The point is expressed in the camera's orthonormal frame, then
    /// divided by its depth scaled by the per-axis half-FOV tangents.
    /// Returns `None` for points at or behind the camera plane and for a
    /// degenerate basis, so no NaN or infinite coordinate can reach the
    /// draw stage.
    pub fn project(&self, point: &Point3<f32>) -> Option<ScreenPoint> {
        let rel = point - self.position;
        let depth = rel.dot(&self.forward);
        if depth <= 0.0 {
            return None;
        }

        let right = self.direction_right();
        if right.norm_squared() == 0.0 {
            return None;
        }
        // Orthogonal to both forward and right, unit by construction.
        let view_up = right.cross(&self.forward);

        let half_w = (self.h_fov * 0.5).tan();
        let half_h = (self.v_fov * 0.5).tan();

        let x = self.width as f32 * 0.5 * (1.0 + rel.dot(&right) / (depth * half_w));
        let y = self.height as f32 * 0.5 * (1.0 - rel.dot(&view_up) / (depth * half_h));
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        Some(ScreenPoint { x, y })
    }
}

impl Default for Camera {
    /// Camera at the world origin looking down -Z, up +Y, 512x512
    /// viewport, both FOV angles pi/3.
    fn default() -> Self {
        Self::new(
            Point3::origin(),
            Vector3::y(),
            512,
            512,
            std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_3,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert_eq!(camera.position, Point3::origin());
        assert_eq!(camera.up, Vector3::y());
        assert_eq!((camera.width, camera.height), (512, 512));
        assert_relative_eq!(camera.h_fov, FRAC_PI_3);
        assert_relative_eq!(camera.v_fov, FRAC_PI_3);
    }

    #[test]
    fn test_basis_is_right_handed_and_orthonormal() {
        let mut camera = Camera::default();
        camera.set_look_direction(Vector3::new(1.0, 0.2, -0.5));

        let forward = camera.direction_forward();
        let right = camera.direction_right();
        assert_relative_eq!(forward.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(forward.dot(&right), 0.0, epsilon = 1e-6);
        // forward x up points right for the default frame
        let mut level = Camera::default();
        level.set_look_direction(-Vector3::z());
        assert_relative_eq!(level.direction_right(), Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_set_look_direction_normalizes_and_ignores_zero() {
        let mut camera = Camera::default();
        camera.set_look_direction(Vector3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(camera.direction_forward(), -Vector3::z(), epsilon = 1e-6);

        camera.set_look_direction(Vector3::zeros());
        assert_relative_eq!(camera.direction_forward(), -Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_project_point_on_optical_axis_hits_viewport_center() {
        let configs = [(512u32, 512u32, FRAC_PI_3, FRAC_PI_3), (800, 600, FRAC_PI_2, FRAC_PI_4)];
        for (w, h, h_fov, v_fov) in configs {
            let camera = Camera::new(Point3::origin(), Vector3::y(), w, h, h_fov, v_fov);
            let p = camera.project(&Point3::new(0.0, 0.0, -5.0)).unwrap();
            assert_relative_eq!(p.x, w as f32 / 2.0, epsilon = 1e-3);
            assert_relative_eq!(p.y, h as f32 / 2.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_project_zero_depth_is_invalid() {
        let camera = Camera::default();
        // Exactly at the camera position: zero depth, must not divide
        assert!(camera.project(&Point3::origin()).is_none());
        // In the camera plane
        assert!(camera.project(&Point3::new(3.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_project_behind_camera_is_invalid() {
        let camera = Camera::default();
        assert!(camera.project(&Point3::new(0.0, 0.0, 4.0)).is_none());
    }

    #[test]
    fn test_project_degenerate_basis_is_invalid() {
        let mut camera = Camera::default();
        // Look straight up: forward parallel to up, no valid frame
        camera.set_look_direction(Vector3::y());
        assert!(camera.project(&Point3::new(0.0, 5.0, 0.0)).is_none());
        assert_eq!(camera.direction_right(), Vector3::zeros());
        assert_eq!(camera.direction_forward_horizontal(), Vector3::zeros());
    }

    #[test]
    fn test_project_right_of_axis_lands_right_of_center() {
        let camera = Camera::default();
        let p = camera.project(&Point3::new(1.0, 0.0, -5.0)).unwrap();
        assert!(p.x > 256.0);
        assert_relative_eq!(p.y, 256.0, epsilon = 1e-3);
        // And above the axis lands above center (smaller y, origin top-left)
        let q = camera.project(&Point3::new(0.0, 1.0, -5.0)).unwrap();
        assert!(q.y < 256.0);
    }

    #[test]
    fn test_turn_right_moves_view_toward_right_axis() {
        let mut camera = Camera::default();
        camera.set_look_direction(-Vector3::z());
        camera.turn_right(FRAC_PI_2);
        assert_relative_eq!(camera.direction_forward(), Vector3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_tilt_down_moves_view_downward() {
        let mut camera = Camera::default();
        camera.set_look_direction(-Vector3::z());
        camera.tilt_down(FRAC_PI_2);
        assert_relative_eq!(camera.direction_forward(), -Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_forward_horizontal_flattens_pitch() {
        let mut camera = Camera::default();
        camera.set_look_direction(Vector3::new(0.0, -1.0, -1.0));
        let flat = camera.direction_forward_horizontal();
        assert_relative_eq!(flat, -Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_up_falls_back_to_y() {
        let camera = Camera::new(
            Point3::origin(),
            Vector3::zeros(),
            512,
            512,
            FRAC_PI_3,
            FRAC_PI_3,
        );
        assert_eq!(camera.up, Vector3::y());
    }
}
