use crate::{color::Color, lighting::LightRig};

/// User controlled settings that change how a loaded model is displayed.
///
/// The viewer owns one instance and clones it into the scene pipeline every
/// time the displayed scene is rebuilt.
#[derive(Clone, Debug, PartialEq)]
pub struct Appearance {
    pub background: Color,
    pub lights: LightRig,
    /// Color used for every mesh when no material library is loaded.
    pub flat_color: Color,
    pub wireframe: bool,
}

impl Appearance {
    pub const MIN_AMBIENT_INTENSITY: f32 = 0.0;
    pub const MAX_AMBIENT_INTENSITY: f32 = 2.0;

    pub fn ambient_intensity(&self) -> f32 {
        self.lights.ambient.intensity
    }

    /// Set the ambient light intensity, clamped to the range allowed by the
    /// viewer controls.
    pub fn set_ambient_intensity(&mut self, intensity: f32) {
        self.lights.ambient.intensity =
            intensity.clamp(Self::MIN_AMBIENT_INTENSITY, Self::MAX_AMBIENT_INTENSITY);
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(0x12, 0x12, 0x12),
            lights: LightRig::default(),
            flat_color: Color::WHITE,
            wireframe: false,
        }
    }
}
