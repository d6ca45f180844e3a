use glam::Vec3;

use crate::{appearance::Appearance, pipeline};

/// Startup configuration for the viewer window, camera and initial
/// appearance.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Models are scaled so their largest dimension matches this size.
    pub target_size: f32,
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub fov_y_degrees: f32,
    pub appearance: Appearance,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "meshview".to_string(),
            window_width: 1280,
            window_height: 720,
            target_size: pipeline::TARGET_SIZE,
            camera_eye: Vec3::new(0.0, 0.0, 5.0),
            camera_target: Vec3::ZERO,
            fov_y_degrees: 75.0,
            appearance: Appearance::default(),
        }
    }
}
