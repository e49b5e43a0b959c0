/// Free-fly viewer state and the per-frame motion model
use nalgebra::{Point3, Vector3};
use std::path::Path;

use crate::input::{InputEvent, MovementFlags};
use crate::math;
use crate::obj::MeshError;
use crate::scene::Scene;

/// Force applied per millisecond of held movement key, relative to the
/// scene radius.
const MOVE_FORCE_SCALE: f32 = 0.01;
/// Fraction of velocity remaining after one second of drag.
const VELOCITY_DECAY_PER_SECOND: f32 = 0.00001;
/// Orbit height is the scene radius divided by this.
const ORBIT_HEIGHT_DIVISOR: f32 = 1.2;
/// One radian of orbit angle per this many milliseconds of wall clock.
const ORBIT_ANGLE_PERIOD_MS: f64 = 2000.0;
/// Idle time after which the camera re-targets the automatic orbit.
const IDLE_TIMEOUT_MS: u64 = 10_000;

/// Everything the host loop owns between frames: the scene, the
/// momentum state of the camera and the input/idle bookkeeping. The
/// host drives it with [`Viewer::handle_input`] for each polled event
/// and one [`Viewer::update`] per frame.
#[derive(Debug)]
pub struct Viewer {
    pub scene: Scene,
    pub move_force: f32,
    velocity: Vector3<f32>,
    flags: MovementFlags,
    scene_radius: f32,
    last_input_ms: u64,
    current_ms: u64,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            move_force: 1.0,
            velocity: Vector3::zeros(),
            flags: MovementFlags::default(),
            scene_radius: 0.0,
            last_input_ms: 0,
            current_ms: 0,
        }
    }

    /// Cached scene radius used to scale movement and the orbit path.
    pub fn scene_radius(&self) -> f32 {
        self.scene_radius
    }

    /// Replace the scene geometry from a mesh file. On success the
    /// movement scale is recomputed and the camera is re-seated on the
    /// orbit path; on failure the previous scene stays in place.
    pub fn load(&mut self, path: &Path) -> Result<(), MeshError> {
        self.scene.load_obj(path)?;
        self.rescale_to_scene();
        Ok(())
    }

    /// Same as [`Viewer::load`] for in-memory OBJ text (used for the
    /// built-in default scene).
    pub fn load_str(&mut self, source: &str) -> Result<(), MeshError> {
        self.scene.load_obj_str(source)?;
        self.rescale_to_scene();
        Ok(())
    }

    fn rescale_to_scene(&mut self) {
        self.scene_radius = self.scene.radius();
        self.orbit_camera();
    }

    /// Apply one host event. Movement and look events stamp the idle
    /// timer; a file drop does not, so the freshly loaded scene starts
    /// orbiting on the usual schedule.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move { direction, pressed } => {
                self.flags.set(direction, pressed);
                self.last_input_ms = self.current_ms;
            }
            InputEvent::Look { dx, dy } => {
                self.scene.camera.turn_right(dx / 1000.0);
                self.scene.camera.tilt_down(dy / 1000.0);
                self.last_input_ms = self.current_ms;
            }
            InputEvent::PointerPressed => {
                self.last_input_ms = self.current_ms;
            }
            InputEvent::FileDrop(path) => {
                if let Err(err) = self.load(&path) {
                    log::error!("failed to load {}: {err}", path.display());
                }
            }
        }
    }

    /// Advance the simulation by `dt_ms` milliseconds at wall-clock
    /// time `now_ms`, then refresh the projected points.
    ///
    /// Held movement keys produce a force along the camera's horizontal
    /// basis; the horizontal component is normalized to unit length
    /// before the raw up vector is added, so diagonal ground movement
    /// is not faster while vertical movement stacks uncapped. The force
    /// scales with the scene radius, velocity decays exponentially
    /// (frame-rate independent drag), and position integrates from the
    /// decayed velocity.
    pub fn update(&mut self, dt_ms: f32, now_ms: u64) {
        self.current_ms = now_ms;

        let camera = &self.scene.camera;
        let mut force = Vector3::zeros();
        let horizontal = camera.direction_forward_horizontal();
        if self.flags.forward {
            force += horizontal;
        }
        if self.flags.backward {
            force -= horizontal;
        }
        let right = camera.direction_right();
        if self.flags.right {
            force += right;
        }
        if self.flags.left {
            force -= right;
        }
        if force.norm_squared() != 0.0 {
            math::set_length(&mut force, 1.0);
        }
        if self.flags.up {
            force += camera.up;
        }
        if self.flags.down {
            force -= camera.up;
        }

        force *= self.scene_radius * dt_ms * self.move_force * MOVE_FORCE_SCALE;
        self.velocity += force;
        self.velocity *= VELOCITY_DECAY_PER_SECOND.powf(dt_ms / 1000.0);
        self.scene.camera.position += self.velocity * (dt_ms / 1000.0);

        if now_ms.saturating_sub(self.last_input_ms) > IDLE_TIMEOUT_MS {
            self.orbit_camera();
        }

        self.scene.project_points();
    }

    /// Place the camera on the automatic orbit: a cylindrical path
    /// around the scene at the scene radius, looking at the origin. The
    /// angle advances with wall-clock time, so consecutive idle frames
    /// sweep a smooth circle.
    fn orbit_camera(&mut self) {
        let r = self.scene_radius;
        let angle = (self.current_ms as f64 / ORBIT_ANGLE_PERIOD_MS) as f32;
        let new_pos = math::cylindrical(r, angle, r / ORBIT_HEIGHT_DIVISOR);
        let camera = &mut self.scene.camera;
        camera.set_look_direction(math::scaled_to(&new_pos, -1.0));
        camera.position = Point3::origin() + new_pos;
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}
