use glam::Vec3;
use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    color::Color,
    lighting::{LightBuilder, LightId},
};

/// Background colors cycled through by `ViewerCommand::CycleBackground`.
pub const BACKGROUND_PALETTE: &[&str] = &["#121212", "#3c3c3c", "#1e3a5f", "#ffffff"];

/// Flat colors cycled through by `ViewerCommand::CycleFlatColor`.
pub const FLAT_COLOR_PALETTE: &[&str] = &["#ffffff", "#ff0000", "#00ff00", "#4080ff", "#ffaa00"];

/// Amount the ambient and light intensity keys change intensity by.
pub const INTENSITY_STEP: f32 = 0.1;

/// A change requested by the user through the viewer controls.
#[derive(Clone, Debug)]
pub enum ViewerCommand {
    SetBackground(Color),
    CycleBackground,
    SetAmbientIntensity(f32),
    AdjustAmbientIntensity(f32),
    SetFlatColor(Color),
    CycleFlatColor,
    SetWireframe(bool),
    ToggleWireframe,
    AddLight(LightBuilder),
    /// Add a point light where the camera currently is.
    AddLightAtCamera,
    RemoveLight(LightId),
    /// Remove the most recently added light.
    RemoveLastLight,
    SetLightPosition(LightId, Vec3),
    SetLightIntensity(LightId, f32),
    SetLightColor(LightId, Color),
    /// Change the intensity of the most recently added light.
    AdjustLastLightIntensity(f32),
    ResetCamera,
}

impl ViewerCommand {
    /// Map a key press to a viewer command. Key releases and unbound keys
    /// produce no command.
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        if event.state != ElementState::Pressed {
            return None;
        }

        match event.physical_key {
            PhysicalKey::Code(code) => Self::from_key_code(code),
            _ => None,
        }
    }

    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Self::ToggleWireframe),
            KeyCode::KeyR => Some(Self::ResetCamera),
            KeyCode::KeyB => Some(Self::CycleBackground),
            KeyCode::KeyC => Some(Self::CycleFlatColor),
            KeyCode::BracketLeft => Some(Self::AdjustAmbientIntensity(-INTENSITY_STEP)),
            KeyCode::BracketRight => Some(Self::AdjustAmbientIntensity(INTENSITY_STEP)),
            KeyCode::KeyL => Some(Self::AddLightAtCamera),
            KeyCode::Backspace => Some(Self::RemoveLastLight),
            KeyCode::Minus => Some(Self::AdjustLastLightIntensity(-INTENSITY_STEP)),
            KeyCode::Equal => Some(Self::AdjustLastLightIntensity(INTENSITY_STEP)),
            _ => None,
        }
    }
}

/// Returns the palette entry after `current`, or the first entry when
/// `current` is not in the palette.
pub fn next_in_palette(palette: &[&str], current: Color) -> Color {
    let colors: Vec<Color> = palette
        .iter()
        .filter_map(|hex| Color::from_hex(hex).ok())
        .collect();

    let next = colors
        .iter()
        .position(|c| c.to_hex() == current.to_hex())
        .map_or(0, |i| (i + 1) % colors.len());

    colors.get(next).copied().unwrap_or(current)
}
