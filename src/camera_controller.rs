use std::time::Duration;

use glam::{Quat, Vec2};
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::camera::Camera;

// NOTE: Vertical rotation is skipped when it would bring the camera nearly
// parallel with the world up vector. Without this the view flips when passing
// over the poles.

pub trait CameraController {
    /// Updates the camera controller state with the given input event. This
    /// method returns `true` if `event` was used by this update method, other
    /// -wise false is returned.
    fn process_input(&mut self, event: &WindowEvent) -> bool;

    /// Accumulates mouse motion deltas until camera updates are applied in
    /// `update_camera`.
    fn process_mouse_motion(&mut self, delta: Vec2);

    /// Accumulates mouse scroll wheel deltas until camera updates are applied in
    /// `update_camera`.
    fn process_mouse_wheel(&mut self, delta: Vec2);

    /// Applies updates to the camera that reflect the current state of this
    /// controller.
    fn update_camera(&mut self, camera: &mut Camera, delta: Duration);

    /// Discards any pending input and returns the camera to its home pose.
    fn reset(&mut self, camera: &mut Camera);
}

/// Orbits the camera around its target. Rotation is done by holding the left
/// mouse button down and dragging, zooming is done with the mouse wheel.
pub struct OrbitCameraController {
    /// Horizontal panning speed modifier.
    horizontal_speed: f32,
    /// Vertical panning speed modifier.
    vertical_speed: f32,
    /// Allows mouse motion to rotate the camera when set to true, otherwise
    /// mouse motion is ignored.
    rotating: bool,
    /// Amount of mouse motion since the last call to update.
    mouse_motion: Option<Vec2>,
    /// The amount of scroll units that the mouse has moved since the last call
    /// to update.
    mouse_scroll: Option<Vec2>,
    /// A direction modifier to apply to mouse scroll actions. This value should
    /// be 1.0 or -1.0.
    scroll_direction_modifier: f32,
    /// Adjusts the mouse wheel scroll speed by the given amount.
    scroll_speed_modifier: f32,
    /// Minimum view distance from target.
    min_distance: f32,
    /// Maximum view distance from target.
    max_distance: f32,
}

impl OrbitCameraController {
    /// Create a new camera controller that lets users orbit and zoom around the
    /// camera's target.
    pub fn new() -> Self {
        Self {
            horizontal_speed: 25.0,
            vertical_speed: 25.0,
            rotating: false,
            mouse_motion: None,
            mouse_scroll: None,
            scroll_direction_modifier: 1.0,
            scroll_speed_modifier: 25.0,
            min_distance: 1.0,
            max_distance: 20.0,
        }
    }

    /// Start or stop applying mouse motion as rotation.
    pub fn set_rotating(&mut self, rotating: bool) {
        self.rotating = rotating;

        if !rotating {
            self.mouse_motion = None;
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }
}

impl Default for OrbitCameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController for OrbitCameraController {
    fn process_input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.set_rotating(*state == ElementState::Pressed);
                true
            }
            _ => false,
        }
    }

    fn process_mouse_motion(&mut self, delta: Vec2) {
        if self.rotating {
            self.mouse_motion = Some(self.mouse_motion.unwrap_or_default() + delta);
        }
    }

    fn process_mouse_wheel(&mut self, delta: Vec2) {
        self.mouse_scroll = Some(self.mouse_scroll.unwrap_or_default() + delta);
    }

    fn update_camera(&mut self, camera: &mut Camera, delta: Duration) {
        let pivot = camera.target();
        let delta_secs = delta.as_secs_f32();
        let motion = self.mouse_motion.take().unwrap_or_default();
        let scroll = self.mouse_scroll.take().unwrap_or_default();

        // Convert the mouse motion to an amount of rotation. The height of the
        // viewport is 180 degrees, and the width of the viewport is 360 degrees.
        let x_view_angles = 2.0 * std::f32::consts::PI / camera.viewport_width().max(1.0);
        let y_view_angles = std::f32::consts::PI / camera.viewport_height().max(1.0);

        let x_angle = -motion.x * x_view_angles * self.horizontal_speed * delta_secs;
        let y_angle = -motion.y * y_view_angles * self.vertical_speed * delta_secs;

        // Rotate camera around the world up axis (horizontal mouse movement).
        let x_rotation = Quat::from_axis_angle(camera.world_up(), x_angle);
        let camera_pos_1 = x_rotation * (camera.eye() - pivot) + pivot;

        // Rotate camera around its right axis (vertical mouse movement).
        let forward = (pivot - camera_pos_1).normalize();
        let right = forward.cross(camera.world_up()).normalize_or_zero();
        let y_rotation = Quat::from_axis_angle(right, y_angle);
        let camera_pos_2 = y_rotation * (camera_pos_1 - pivot) + pivot;

        // Do not use the vertical rotation contribution if it causes the
        // camera to become nearly parallel with the world up vector.
        let new_forward = (pivot - camera_pos_2).normalize();
        let camera_pos = if right != glam::Vec3::ZERO
            && new_forward.dot(camera.world_up()).abs() < 0.99
        {
            camera_pos_2
        } else {
            camera_pos_1
        };

        // Move closer or further away from the target, staying between the
        // minimum and maximum distance.
        let forward = (pivot - camera_pos).normalize();
        let distance = (camera_pos - pivot).length()
            - scroll.y * self.scroll_direction_modifier * self.scroll_speed_modifier * delta_secs;
        let distance = distance.clamp(self.min_distance, self.max_distance);

        camera.reorient(pivot - forward * distance, pivot);
    }

    fn reset(&mut self, camera: &mut Camera) {
        self.mouse_motion = None;
        self.mouse_scroll = None;
        camera.reset();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    const EPSILON: f32 = 1e-4;

    fn new_camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
            f32::to_radians(75.0),
            0.1,
            100.0,
            800,
            600,
        )
    }

    #[test]
    fn motion_is_ignored_unless_rotating() {
        let mut camera = new_camera();
        let mut controller = OrbitCameraController::new();

        controller.process_mouse_motion(Vec2::new(100.0, 0.0));
        controller.update_camera(&mut camera, Duration::from_millis(16));

        assert!((camera.eye() - Vec3::new(0.0, 0.0, 5.0)).length() < EPSILON);
    }

    #[test]
    fn rotation_keeps_distance_to_target() {
        let mut camera = new_camera();
        let mut controller = OrbitCameraController::new();

        controller.set_rotating(true);
        controller.process_mouse_motion(Vec2::new(40.0, 15.0));
        controller.update_camera(&mut camera, Duration::from_millis(16));

        assert!((camera.eye() - Vec3::new(0.0, 0.0, 5.0)).length() > EPSILON);
        assert!((camera.eye().length() - 5.0).abs() < EPSILON);
        assert_eq!(Vec3::ZERO, camera.target());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = new_camera();
        let mut controller = OrbitCameraController::new();

        controller.process_mouse_wheel(Vec2::new(0.0, 1000.0));
        controller.update_camera(&mut camera, Duration::from_secs(1));
        assert!((camera.eye().length() - 1.0).abs() < EPSILON);

        controller.process_mouse_wheel(Vec2::new(0.0, -1000.0));
        controller.update_camera(&mut camera, Duration::from_secs(1));
        assert!((camera.eye().length() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn reset_discards_pending_input() {
        let mut camera = new_camera();
        let mut controller = OrbitCameraController::new();

        controller.set_rotating(true);
        controller.process_mouse_motion(Vec2::new(40.0, 15.0));
        controller.update_camera(&mut camera, Duration::from_millis(16));

        controller.process_mouse_wheel(Vec2::new(0.0, 3.0));
        controller.reset(&mut camera);
        controller.update_camera(&mut camera, Duration::from_millis(16));

        assert!((camera.eye() - Vec3::new(0.0, 0.0, 5.0)).length() < EPSILON);
    }
}
