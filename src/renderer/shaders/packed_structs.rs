//! Rust structs with memory layouts that match their same named counterparts
//! in `shader.wgsl`.
//!
//! Spare vector components carry extra values, eg a light is encoded as:
//!
//!   light.position.xyz = world position
//!   light.position.w   = 1 for point lights, 0 for directional lights
//!   light.color.rgb    = linear color multiplied by intensity
//!
//! These structs must exactly match the memory layout whenever their
//! representation is changed in shader code or vice versa. All fields are
//! aligned to 16 bytes as WebGPU requires for uniform buffers.
use glam::{Vec3, Vec4};

use crate::{
    appearance::Appearance,
    lighting::{LightKind, SceneLight},
    scene::Material,
};

/// Maximum number of lights the shader will read. Must match `MAX_LIGHTS` in
/// `shader.wgsl`.
pub const MAX_LIGHTS: usize = 8;

/// Rust struct with the same memory layout as `PackedLight` in the shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedLight {
    pub position: Vec4, // .w is 1 for point lights, 0 for directional.
    pub color: Vec4,    // .w is unused.
}

impl From<&SceneLight> for PackedLight {
    fn from(light: &SceneLight) -> Self {
        let kind = match light.kind {
            LightKind::Point => 1.0,
            LightKind::Directional => 0.0,
        };

        Self {
            position: vec3_w(light.position, kind),
            color: vec3_w(light.color.to_linear() * light.intensity, 0.0),
        }
    }
}

/// Rust struct with the same memory layout as `PackedMaterial` in the shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedMaterial {
    pub color: Vec4, // .w is opacity.
    pub flags: Vec4, // .x is 1 when drawn as unlit wireframe.
}

impl From<&Material> for PackedMaterial {
    fn from(material: &Material) -> Self {
        let opacity = if material.transparent {
            material.opacity
        } else {
            1.0
        };

        Self {
            color: vec3_w(material.color.to_linear(), opacity),
            flags: Vec4::new(if material.wireframe { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0),
        }
    }
}

/// Pack the ambient light and the first `MAX_LIGHTS` lights of `appearance`.
/// Returns the packed ambient term, the number of lights packed and the
/// packed lights.
pub fn pack_lights(appearance: &Appearance) -> (Vec4, u32, [PackedLight; MAX_LIGHTS]) {
    let ambient = &appearance.lights.ambient;
    let mut lights = [PackedLight::default(); MAX_LIGHTS];
    let mut count = 0;

    for (slot, light) in lights.iter_mut().zip(appearance.lights.iter()) {
        *slot = light.into();
        count += 1;
    }

    (
        vec3_w(ambient.color.to_linear() * ambient.intensity, 0.0),
        count,
        lights,
    )
}

/// Returns a new `Vec4` value that is the combination of a `Vec3` x, y and z
/// and an additional `w` value.
pub fn vec3_w(xyz: Vec3, w: f32) -> Vec4 {
    Vec4::new(xyz.x, xyz.y, xyz.z, w)
}
