use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tidescape_algebra::{Matrix4, Quaternion, Vector3};
use tracing::{debug, trace};

use crate::{Action, TrackedKey};

/// Tunables for the fly camera. Rates are per millisecond of frame time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vector3,
    /// Degrees; `-90` looks down negative Z.
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    /// Degrees of turn per pixel of pointer motion.
    pub sensitivity: f32,
    pub pitch_limit: f32,
    /// Degrees per ms while a look key is held.
    pub look_rate: f32,
    /// Focus progress gained per ms.
    pub focus_rate: f32,
    /// A focus turn snaps once the start and goal directions are this close.
    pub focus_snap: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 3.0, 5.0),
            yaw: -90.0,
            pitch: 0.0,
            speed: 0.1,
            sensitivity: 0.2,
            pitch_limit: 89.0,
            look_rate: 0.09,
            focus_rate: 0.0015,
            focus_snap: 0.9995,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FocusState {
    Idle,
    /// Waiting for the next tick to pick the target and capture directions.
    Requested,
    Turning {
        start: Vector3,
        goal: Vector3,
        progress: f32,
    },
}

/// Free-fly camera driven by key transitions, pointer deltas and ticks.
///
/// The view basis is rebuilt from yaw and pitch every tick unless the look is
/// locked. A focus turn overrides that: it rotates the facing toward a target
/// point along the shortest arc, then re-derives yaw and pitch from the result
/// so free look resumes seamlessly.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    position: Vector3,
    yaw: f32,
    pitch: f32,
    front: Vector3,
    right: Vector3,
    up: Vector3,
    held: BTreeSet<TrackedKey>,
    locked: bool,
    focus: FocusState,
    focus_cursor: usize,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            config,
            position: config.position,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-config.pitch_limit, config.pitch_limit),
            front: Vector3::new(0.0, 0.0, -1.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            up: Vector3::UP,
            held: BTreeSet::new(),
            locked: false,
            focus: FocusState::Idle,
            focus_cursor: 0,
        };
        camera.rebuild_from_angles();
        camera
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn front(&self) -> Vector3 {
        self.front
    }

    pub fn right(&self) -> Vector3 {
        self.right
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_focusing(&self) -> bool {
        self.focus != FocusState::Idle
    }

    pub fn is_held(&self, key: TrackedKey) -> bool {
        self.held.contains(&key)
    }

    /// Feed a raw key transition.
    pub fn handle_key(&mut self, name: &str, pressed: bool) {
        self.apply(Action::from_key(name, pressed));
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Press(key) => {
                self.held.insert(key);
            }
            Action::Release(key) => {
                self.held.remove(&key);
            }
            Action::ToggleLock => {
                self.locked = !self.locked;
                debug!(locked = self.locked, "camera look lock toggled");
            }
            Action::CancelFocus => {
                if self.is_focusing() {
                    debug!("focus cancelled");
                }
                self.focus = FocusState::Idle;
            }
            Action::CycleFocus => {
                self.focus_cursor = self.focus_cursor.wrapping_add(1);
                self.focus = FocusState::Requested;
                debug!(cursor = self.focus_cursor, "focus requested");
            }
            Action::Noop => {}
        }
    }

    /// Pointer motion in pixels since the previous sample. Ignored while locked.
    pub fn handle_pointer_delta(&mut self, dx: f32, dy: f32) {
        if self.locked {
            return;
        }
        self.yaw += dx * self.config.sensitivity;
        self.pitch = self.clamp_pitch(self.pitch - dy * self.config.sensitivity);
    }

    /// Advance by `delta_ms`: move, apply held look keys, rebuild the basis,
    /// then step any focus turn toward one of `focus_targets`.
    pub fn tick(&mut self, delta_ms: f32, focus_targets: &[Vector3]) {
        self.translate(delta_ms);
        if !self.locked {
            self.look(delta_ms);
            self.rebuild_from_angles();
        }
        self.step_focus(delta_ms, focus_targets);
        trace!(
            x = self.position.x,
            y = self.position.y,
            z = self.position.z,
            yaw = self.yaw,
            pitch = self.pitch,
            "camera tick"
        );
    }

    /// Right-handed view matrix looking from the position along the front vector.
    pub fn view_matrix(&self) -> Matrix4 {
        let mut view = Matrix4::new();
        view.set_look_at(&self.position, &(self.position + self.front), &self.up);
        view
    }

    fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit)
    }

    fn translate(&mut self, delta_ms: f32) {
        let velocity = self.config.speed * delta_ms;
        let mut step = Vector3::ZERO;
        for key in &self.held {
            step = step
                + match key {
                    TrackedKey::Forward => self.front,
                    TrackedKey::Back => -self.front,
                    TrackedKey::Right => self.right,
                    TrackedKey::Left => -self.right,
                    TrackedKey::Rise => Vector3::UP,
                    TrackedKey::Fall => -Vector3::UP,
                    _ => Vector3::ZERO,
                };
        }
        self.position = self.position + step * velocity;
    }

    fn look(&mut self, delta_ms: f32) {
        let turn = self.config.look_rate * delta_ms;
        if self.is_held(TrackedKey::LookRight) {
            self.yaw += turn;
        }
        if self.is_held(TrackedKey::LookLeft) {
            self.yaw -= turn;
        }
        let mut pitch = self.pitch;
        if self.is_held(TrackedKey::LookUp) {
            pitch += turn;
        }
        if self.is_held(TrackedKey::LookDown) {
            pitch -= turn;
        }
        self.pitch = self.clamp_pitch(pitch);
    }

    fn rebuild_from_angles(&mut self) {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        self.front = Vector3::new(cy * cp, sp, sy * cp).normalized();
        self.rebuild_from_front();
    }

    fn rebuild_from_front(&mut self) {
        self.right = self.front.cross(&Vector3::UP).normalized();
        self.up = self.right.cross(&self.front).normalized();
    }

    fn step_focus(&mut self, delta_ms: f32, targets: &[Vector3]) {
        let (start, goal, progress) = match self.focus {
            FocusState::Idle => return,
            FocusState::Requested => {
                if targets.is_empty() {
                    debug!("focus requested with no targets");
                    self.focus = FocusState::Idle;
                    return;
                }
                let target = targets[self.focus_cursor % targets.len()];
                let goal = (target - self.position).normalized();
                if goal == Vector3::ZERO {
                    debug!("focus target coincides with camera");
                    self.focus = FocusState::Idle;
                    return;
                }
                debug!(%target, "focus turn started");
                (self.front, goal, 0.0)
            }
            FocusState::Turning {
                start,
                goal,
                progress,
            } => (start, goal, progress),
        };

        let progress = (progress + self.config.focus_rate * delta_ms).min(1.0);
        let cos = start.dot(&goal).clamp(-1.0, 1.0);

        if cos > self.config.focus_snap || progress >= 1.0 {
            self.front = goal;
            self.focus = FocusState::Idle;
            debug!("focus turn finished");
        } else {
            let axis = turn_axis(&start, &goal);
            let full = Quaternion::from_axis_angle(&axis, cos.acos().to_degrees());
            let partial = Quaternion::slerp(&Quaternion::IDENTITY, &full, progress).unwrap_or(full);
            self.front = partial.multiply_vector3(&start).normalized();
            self.focus = FocusState::Turning {
                start,
                goal,
                progress,
            };
        }

        self.rebuild_from_front();
        self.yaw = self.front.z.atan2(self.front.x).to_degrees();
        self.pitch = self.front.y.clamp(-1.0, 1.0).asin().to_degrees();
    }
}

/// Axis carrying `start` onto `goal`. Opposed directions have no unique axis;
/// the world up component perpendicular to `start` is used so the turn stays
/// level, falling back to X when `start` is vertical.
fn turn_axis(start: &Vector3, goal: &Vector3) -> Vector3 {
    let axis = start.cross(goal);
    if axis.magnitude() > 1e-6 {
        return axis;
    }
    let level = Vector3::UP - *start * start.dot(&Vector3::UP);
    if level.magnitude() > 1e-6 {
        level
    } else {
        start.cross(&Vector3::new(1.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vector3, b: Vector3) -> bool {
        (a - b).magnitude() < EPS
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = CameraController::default();
        assert!(close(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(camera.right(), Vector3::new(1.0, 0.0, 0.0)));
        assert!(close(camera.up(), Vector3::UP));
    }

    #[test]
    fn forward_key_moves_along_front() {
        let mut camera = CameraController::default();
        camera.handle_key("w", true);
        camera.tick(10.0, &[]);
        assert!(close(camera.position(), Vector3::new(0.0, 3.0, 4.0)));

        camera.handle_key("w", false);
        camera.handle_key("r", true);
        camera.handle_key("d", true);
        camera.tick(10.0, &[]);
        assert!(close(camera.position(), Vector3::new(1.0, 4.0, 4.0)));
    }

    #[test]
    fn pointer_turns_and_pitch_is_clamped() {
        let mut camera = CameraController::default();
        camera.handle_pointer_delta(10.0, 0.0);
        assert!((camera.yaw() + 88.0).abs() < EPS);
        camera.handle_pointer_delta(0.0, -1000.0);
        assert_eq!(camera.pitch(), 89.0);
        camera.tick(0.0, &[]);
        assert!(camera.front().y > 0.99);
        assert!((camera.right().magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn look_keys_turn_at_configured_rate() {
        let mut camera = CameraController::default();
        camera.handle_key("l", true);
        camera.tick(100.0, &[]);
        assert!((camera.yaw() + 81.0).abs() < 1e-3);
        camera.handle_key("l", false);
        camera.handle_key("i", true);
        camera.tick(100.0, &[]);
        assert!((camera.pitch() - 9.0).abs() < 1e-3);
    }

    #[test]
    fn lock_freezes_facing_but_not_motion() {
        let mut camera = CameraController::default();
        camera.handle_key("c", true);
        assert!(camera.is_locked());
        camera.handle_pointer_delta(50.0, 50.0);
        camera.handle_key("s", true);
        camera.tick(10.0, &[]);
        assert_eq!(camera.yaw(), -90.0);
        assert!(close(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(close(camera.position(), Vector3::new(0.0, 3.0, 6.0)));
    }

    #[test]
    fn first_cycle_targets_second_entry_and_snaps_at_end() {
        let mut camera = CameraController::default();
        let targets = [Vector3::new(0.0, 3.0, -50.0), Vector3::new(10.0, 3.0, 5.0)];
        camera.handle_key("v", true);
        assert!(camera.is_focusing());

        camera.tick(100.0, &targets);
        assert!(camera.is_focusing());
        let expected = (0.15f32 * 90.0).to_radians().cos();
        let start = Vector3::new(0.0, 0.0, -1.0);
        assert!((camera.front().dot(&start) - expected).abs() < 1e-3);
        assert!(camera.front().x > 0.0);

        camera.tick(1000.0, &targets);
        assert!(!camera.is_focusing());
        assert!(close(camera.front(), Vector3::new(1.0, 0.0, 0.0)));
        assert!(camera.yaw().abs() < 1e-3);
        assert!(camera.pitch().abs() < 1e-3);

        // free look resumes from the derived angles
        camera.tick(16.0, &targets);
        assert!(close(camera.front(), Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn cancel_stops_the_turn() {
        let mut camera = CameraController::default();
        let targets = [Vector3::new(10.0, 3.0, 5.0)];
        camera.handle_key("v", true);
        camera.handle_key("x", true);
        camera.tick(100.0, &targets);
        assert!(!camera.is_focusing());
        assert!(close(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn turn_keeps_its_goal_while_the_target_moves() {
        let mut camera = CameraController::default();
        camera.apply(Action::CycleFocus);
        camera.tick(100.0, &[Vector3::new(10.0, 3.0, 5.0)]);
        assert!(camera.front().x > 0.0);

        // the target swings behind the camera mid-turn; the turn ignores it
        let moved = [Vector3::new(-10.0, 3.0, 5.0)];
        camera.tick(100.0, &moved);
        assert!(camera.is_focusing());
        assert!(camera.front().x > 0.0);
        camera.tick(1000.0, &moved);
        assert!(!camera.is_focusing());
        assert!(close(camera.front(), Vector3::new(1.0, 0.0, 0.0)));

        // a fresh request aims at where the target is now
        let ahead = [Vector3::new(0.0, 3.0, -50.0)];
        camera.apply(Action::CycleFocus);
        camera.tick(1000.0, &ahead);
        assert!(!camera.is_focusing());
        assert!(close(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn second_request_mid_turn_restarts_from_current_facing() {
        let mut camera = CameraController::default();
        camera.apply(Action::CycleFocus);
        camera.tick(100.0, &[Vector3::new(10.0, 3.0, 5.0)]);
        let partial = camera.front();
        assert!(partial.x > 0.0);

        let ahead = [Vector3::new(0.0, 3.0, -50.0)];
        camera.apply(Action::CycleFocus);
        camera.tick(100.0, &ahead);
        assert!(camera.is_focusing());
        assert!(camera.front().x < partial.x);
        assert!(camera.front().z < partial.z);

        camera.tick(1000.0, &ahead);
        assert!(close(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn focus_without_targets_is_dropped() {
        let mut camera = CameraController::default();
        camera.apply(Action::CycleFocus);
        camera.tick(16.0, &[]);
        assert!(!camera.is_focusing());
    }

    #[test]
    fn opposed_target_turns_level() {
        let mut camera = CameraController::default();
        let behind = [Vector3::new(0.0, 3.0, 50.0)];
        camera.apply(Action::CycleFocus);
        camera.tick(200.0, &behind);
        let front = camera.front();
        assert!(front.x.is_finite() && front.y.is_finite() && front.z.is_finite());
        assert!(front.y.abs() < EPS);
        assert!((front.magnitude() - 1.0).abs() < EPS);
        assert!((camera.right().magnitude() - 1.0).abs() < EPS);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut camera = CameraController::default();
        camera.handle_pointer_delta(37.0, -12.0);
        camera.tick(0.0, &[]);
        let view = camera.view_matrix();
        assert!(close(view.multiply_vector3(&camera.position()), Vector3::ZERO));
        let ahead = view.multiply_vector3(&(camera.position() + camera.front()));
        assert!(close(ahead, Vector3::new(0.0, 0.0, -1.0)));
    }
}
