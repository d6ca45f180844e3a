use crate::{
    appearance::Appearance,
    scene::{Material, MtlLibrary, SceneGraph, Side},
};

/// Choose the material a single mesh should be drawn with.
///
/// With a material library, a mesh whose current material is named after one
/// of the library's materials adopts that material. The adopted material is
/// drawn double sided and marked transparent when it is not fully opaque.
/// Names missing from the library keep the existing material. Without a
/// library every mesh gets a new flat material using the appearance's flat
/// color.
///
/// Finally the appearance's wireframe flag is applied, and when there is no
/// library the flat color is applied again as an override.
pub fn resolve_material(
    existing: Option<&Material>,
    mtl: Option<&MtlLibrary>,
    appearance: &Appearance,
) -> Material {
    let mut material = match mtl {
        Some(library) => {
            let named = existing
                .and_then(|m| m.name.as_deref())
                .and_then(|name| library.get(name));

            match named {
                Some(found) => {
                    let mut adopted = found.clone();
                    adopted.side = Side::Double;
                    adopted.transparent = adopted.opacity < 1.0;
                    adopted
                }
                None => existing
                    .cloned()
                    .unwrap_or_else(|| Material::parser_default(None)),
            }
        }
        None => Material::flat(appearance.flat_color),
    };

    material.wireframe = appearance.wireframe;

    if mtl.is_none() {
        material.color = appearance.flat_color;
    }

    material
}

/// Resolve and assign a material for every mesh in `graph`.
pub fn apply_materials(graph: &mut SceneGraph, mtl: Option<&MtlLibrary>, appearance: &Appearance) {
    for key in graph.mesh_keys() {
        if let Some(node) = graph.get_mut(key) {
            node.material = Some(resolve_material(node.material.as_ref(), mtl, appearance));
        }
    }
}
