use std::collections::HashMap;

use crate::color::Color;

/// Which faces of a mesh are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// Only counter-clockwise (front facing) triangles are drawn.
    #[default]
    Front,
    /// Both front and back facing triangles are drawn.
    Double,
}

/// Where a material came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialSource {
    /// Placeholder material assigned by the obj parser.
    Parser,
    /// Material defined by a .mtl material library.
    Mtl,
    /// Single color material synthesized from the viewer's flat color setting.
    Flat,
}

/// Surface appearance of a mesh.
///
/// Every mesh in a prepared scene carries exactly one material.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub color: Color,
    pub specular_color: Color,
    pub shininess: f32,
    /// 1.0 is fully opaque.
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    pub wireframe: bool,
    pub source: MaterialSource,
}

impl Material {
    /// The material the obj parser assigns to a mesh before any material
    /// library or viewer setting is applied. `name` is the `usemtl` name when
    /// the mesh references a known material.
    pub fn parser_default(name: Option<String>) -> Self {
        let builder = MaterialBuilder::new(MaterialSource::Parser);
        match name {
            Some(name) => builder.name(name).build(),
            None => builder.build(),
        }
    }

    /// A single color material.
    pub fn flat(color: Color) -> Self {
        MaterialBuilder::new(MaterialSource::Flat)
            .color(color)
            .build()
    }

    /// True if the material should be alpha blended.
    pub fn is_translucent(&self) -> bool {
        self.transparent && self.opacity < 1.0
    }
}

/// A fluent builder for creating materials without having to specify every
/// property.
#[derive(Debug)]
pub struct MaterialBuilder {
    source: MaterialSource,
    name: Option<String>,
    color: Option<Color>,
    specular_color: Option<Color>,
    shininess: Option<f32>,
    opacity: Option<f32>,
    side: Option<Side>,
}

impl MaterialBuilder {
    pub const DEFAULT_COLOR: Color = Color::WHITE;
    pub const DEFAULT_SPECULAR_COLOR: Color = Color::BLACK;
    pub const DEFAULT_SHININESS: f32 = 30.0;
    pub const DEFAULT_OPACITY: f32 = 1.0;

    /// Create a new material builder.
    pub fn new(source: MaterialSource) -> Self {
        Self {
            source,
            name: None,
            color: None,
            specular_color: None,
            shininess: None,
            opacity: None,
            side: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the material's diffuse color.
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn specular_color(mut self, color: Color) -> Self {
        self.specular_color = Some(color);
        self
    }

    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = Some(shininess);
        self
    }

    /// Set the opacity, clamped to [0, 1].
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Use the properties of this builder to construct a new material.
    pub fn build(self) -> Material {
        let opacity = self.opacity.unwrap_or(Self::DEFAULT_OPACITY);

        Material {
            name: self.name,
            color: self.color.unwrap_or(Self::DEFAULT_COLOR),
            specular_color: self.specular_color.unwrap_or(Self::DEFAULT_SPECULAR_COLOR),
            shininess: self.shininess.unwrap_or(Self::DEFAULT_SHININESS),
            opacity,
            transparent: false,
            side: self.side.unwrap_or_default(),
            wireframe: false,
            source: self.source,
        }
    }
}

/// Named materials read from a .mtl material library.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MtlLibrary {
    materials: HashMap<String, Material>,
}

impl MtlLibrary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add `material` to the library under its name. Unnamed materials are
    /// ignored. A material with the same name as an existing entry replaces it.
    pub fn insert(&mut self, material: Material) {
        if let Some(name) = material.name.clone() {
            self.materials.insert(name, material);
        }
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}

impl FromIterator<Material> for MtlLibrary {
    fn from_iter<T: IntoIterator<Item = Material>>(iter: T) -> Self {
        let mut library = Self::new();
        iter.into_iter().for_each(|m| library.insert(m));
        library
    }
}
