use std::fmt;

use glam::Vec3;
use thiserror::Error;

use crate::color::Color;

/// Identifies a light in a `LightRig`. Identifiers are handed out in
/// increasing order and are never reused by the rig that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(u32);

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light #{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    /// Emits light in all directions from `position`.
    Point,
    /// Emits parallel rays from `position` towards the origin.
    Directional,
}

/// Uniform light applied equally to every surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
    pub color: Color,
}

/// A user editable light.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLight {
    id: LightId,
    pub kind: LightKind,
    /// The world position of the light.
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
}

impl SceneLight {
    pub fn id(&self) -> LightId {
        self.id
    }
}

/// Properties for a light that has not been added to a rig yet.
#[derive(Clone, Debug)]
pub struct LightBuilder {
    kind: LightKind,
    position: Vec3,
    intensity: f32,
    color: Color,
}

impl LightBuilder {
    pub fn new(kind: LightKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            intensity: 1.0,
            color: Color::WHITE,
        }
    }

    pub fn point(position: Vec3) -> Self {
        Self::new(LightKind::Point, position)
    }

    pub fn directional(position: Vec3) -> Self {
        Self::new(LightKind::Directional, position)
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// One ambient light plus an editable list of point and directional lights.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    lights: Vec<SceneLight>,
    next_id: u32,
}

impl LightRig {
    /// Create a rig with an ambient light and no other lights.
    pub fn new(ambient: AmbientLight) -> Self {
        Self {
            ambient,
            lights: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a light and return its newly assigned identifier.
    pub fn add(&mut self, light: LightBuilder) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;

        self.lights.push(SceneLight {
            id,
            kind: light.kind,
            position: light.position,
            intensity: light.intensity,
            color: light.color,
        });

        id
    }

    /// Remove the light with identifier `id`, returning it.
    pub fn remove(&mut self, id: LightId) -> Result<SceneLight, LightError> {
        let index = self.index_of(id)?;
        Ok(self.lights.remove(index))
    }

    pub fn get(&self, id: LightId) -> Option<&SceneLight> {
        self.lights.iter().find(|l| l.id == id)
    }

    pub fn set_position(&mut self, id: LightId, position: Vec3) -> Result<(), LightError> {
        self.light_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_intensity(&mut self, id: LightId, intensity: f32) -> Result<(), LightError> {
        self.light_mut(id)?.intensity = intensity;
        Ok(())
    }

    pub fn set_color(&mut self, id: LightId, color: Color) -> Result<(), LightError> {
        self.light_mut(id)?.color = color;
        Ok(())
    }

    /// The most recently added light that is still in the rig.
    pub fn last(&self) -> Option<&SceneLight> {
        self.lights.last()
    }

    /// Lights in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &SceneLight> {
        self.lights.iter()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    fn index_of(&self, id: LightId) -> Result<usize, LightError> {
        self.lights
            .iter()
            .position(|l| l.id == id)
            .ok_or(LightError::UnknownLight(id))
    }

    fn light_mut(&mut self, id: LightId) -> Result<&mut SceneLight, LightError> {
        let index = self.index_of(id)?;
        Ok(&mut self.lights[index])
    }
}

impl Default for LightRig {
    /// An ambient light with intensity 0.5 and a white directional light above
    /// and in front of the model.
    fn default() -> Self {
        let mut rig = Self::new(AmbientLight {
            intensity: 0.5,
            color: Color::WHITE,
        });

        rig.add(LightBuilder::directional(Vec3::new(5.0, 5.0, 5.0)).intensity(0.8));
        rig
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LightError {
    #[error("{0} does not exist")]
    UnknownLight(LightId),
}
