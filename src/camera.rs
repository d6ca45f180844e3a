use glam::{Mat4, Vec3};
use thiserror::Error;

/// Position and focus point of a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

/// A perspective camera looking at a target point.
///
/// Camera assumes a right-handed system with the +Z axis going _out_ of the
/// screen rather than in. Positive rotations are counterclockwise around the
/// axis of rotation.
///
/// The following transforms points from local space to clip space:
///  `V_clip = M_projection * M_view * M_model * M_local`
///
/// The camera remembers the pose it was created with as its home pose, and
/// `reset` returns it there.
#[derive(Clone, Debug)]
pub struct Camera {
    /// The position of the camera in world space.
    eye: Vec3,
    /// The target position the camera should look at.
    target: Vec3,
    /// The camera's up direction.
    up: Vec3,
    /// A world space direction vector indicating which direction is considered
    /// straight up.
    world_up: Vec3,
    /// Pose restored by `reset`.
    home: CameraPose,
    /// The ratio of the viewport width to its height.
    aspect: f32,
    /// The vertical field of view for the camera, in radians.
    fov_y: f32,
    /// Fragments closer than `z_near` will not be rendered.
    z_near: f32,
    /// Fragments further than `z_far` will not be rendered.
    z_far: f32,
    viewport_width: f32,
    viewport_height: f32,
}

impl Camera {
    /// Create a new camera centered at `eye` with the center of the view
    /// aiming at `target` with `up` as the world's upward direction.
    ///
    /// The aspect ratio is set to zero if either the viewport width or height
    /// is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        z_near: f32,
        z_far: f32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        assert!(fov_y > 0.0);
        assert!(z_near >= 0.0);
        assert!(z_far > z_near);
        assert!(eye != target);

        let up = up.normalize();

        let mut camera = Self {
            eye,
            target,
            up,
            world_up: up,
            home: CameraPose { eye, target },
            aspect: if viewport_width > 0 && viewport_height > 0 {
                viewport_width as f32 / viewport_height as f32
            } else {
                0.0
            },
            fov_y,
            z_near,
            z_far,
            viewport_width: viewport_width as f32,
            viewport_height: viewport_height as f32,
        };

        camera.reorient(eye, target);
        camera
    }

    /// Reorient the camera to be located at `eye` and look at `target`. Both
    /// points should be in world space.
    ///
    /// Calling `reorient` will rebuild the camera's local coordinate system
    /// using the Gram-Schimdt process.
    pub fn reorient(&mut self, new_eye: Vec3, new_target: Vec3) {
        self.eye = new_eye;
        self.target = new_target;

        // NOTE: This direction goes from target to eye, the opposite of the
        // direction the camera faces, because the camera looks down -Z.
        let new_direction = (self.eye - self.target).normalize();
        let new_right = Vec3::cross(self.world_up, new_direction).normalize_or_zero();

        // Looking straight along the world up axis leaves the right vector
        // undefined; keep the previous up vector in that case.
        if new_right != Vec3::ZERO {
            self.up = Vec3::cross(new_direction, new_right);
        }
    }

    /// Move the camera back to the pose it was created with.
    pub fn reset(&mut self) {
        self.reorient(self.home.eye, self.home.target);
    }

    /// Get the camera's view matrix.
    ///
    /// A view matrix transforms coordinates from world space to view space,
    /// where the eye is at (0, 0, 0) and looks down the -Z axis.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Get the camera's perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    /// Get the camera's view projection matrix. The view projection matrix will
    /// transform points from world space to clip space.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Resize the camera's viewport.
    pub fn set_viewport_size(
        &mut self,
        new_width: u32,
        new_height: u32,
    ) -> Result<(), InvalidCameraSize> {
        if new_width > 0 && new_height > 0 {
            self.aspect = new_width as f32 / new_height as f32;
            self.viewport_width = new_width as f32;
            self.viewport_height = new_height as f32;
            Ok(())
        } else {
            Err(InvalidCameraSize(new_width, new_height))
        }
    }

    /// Get the position of the camera in world space.
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Get the point at which the camera is focused on.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Get the camera's up axis.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Get the pose restored by `reset`.
    pub fn home(&self) -> CameraPose {
        self.home
    }

    /// Get the camera viewport width in pixels.
    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Get the camera viewport height in pixels.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Get the world up axis (not the camera's up axis).
    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }
}

#[derive(Debug, Error)]
#[error("camera viewport width and height must be larger than zero but width was {} and height was {}", .0, .1)]
pub struct InvalidCameraSize(u32, u32);

#[cfg(test)]
mod tests {
    use super::*;

    fn new_camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            f32::to_radians(75.0),
            0.1,
            100.0,
            100,
            200,
        )
    }

    #[test]
    fn set_valid_viewport_size() {
        let mut camera = new_camera();

        assert_eq!(0.5, camera.aspect);

        assert!(camera.set_viewport_size(600, 300).is_ok());
        assert_eq!(2.0, camera.aspect);
    }

    #[test]
    fn set_invalid_viewport_size() {
        let mut camera = new_camera();

        let err = camera.set_viewport_size(0, 100).unwrap_err();
        assert_eq!(0, err.0);
        assert_eq!(100, err.1);

        let err = camera.set_viewport_size(600, 0).unwrap_err();
        assert_eq!(600, err.0);
        assert_eq!(0, err.1);

        // A failed resize keeps the previous aspect ratio.
        assert_eq!(0.5, camera.aspect);
    }

    #[test]
    fn reset_restores_home_pose() {
        let mut camera = new_camera();

        camera.reorient(Vec3::new(3.0, 4.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(Vec3::new(3.0, 4.0, 0.0), camera.eye());

        camera.reset();
        assert_eq!(Vec3::new(0.0, 0.0, 5.0), camera.eye());
        assert_eq!(Vec3::ZERO, camera.target());
        assert!((camera.up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn target_projects_to_center_of_view() {
        let camera = new_camera();
        let clip = camera.view_projection_matrix().project_point3(camera.target());

        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
    }
}
