use std::io::{BufReader, Cursor};

use glam::Vec3;
use tracing::{debug, warn};

use super::{ContentError, ParsedModel};
use crate::{
    color::Color,
    scene::{Geometry, Material, MaterialBuilder, MaterialSource, MtlLibrary, SceneGraph, SceneNode},
};

/// Name of the material library injected into obj text when the caller
/// supplies .mtl text alongside it.
const SUPPLIED_MTL_NAME: &str = "supplied.mtl";

/// Parse obj text (and optionally the text of its .mtl material library) into
/// a scene graph with one mesh node per obj object.
///
/// Any `mtllib` statements in the obj text resolve to `mtl_text`. When
/// `mtl_text` is `None` the model has no material library and meshes only get
/// unnamed placeholder materials.
#[tracing::instrument(level = "info", skip(obj_text, mtl_text))]
pub async fn parse_model(
    name: &str,
    obj_text: &str,
    mtl_text: Option<&str>,
) -> Result<ParsedModel, ContentError> {
    // `usemtl` names only resolve when the parser has seen a `mtllib`
    // statement, so make sure there is one when a library was supplied.
    let obj_source = match mtl_text {
        Some(_) => format!("mtllib {SUPPLIED_MTL_NAME}\n{obj_text}"),
        None => obj_text.to_string(),
    };

    let mut obj_buf_reader = BufReader::new(Cursor::new(obj_source));

    // Parse the .obj text to get a list of models (actually meshes) and
    // material definitions.
    let (obj_models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_buf_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |mtl_file_path| async move {
            debug!("resolving material library `{mtl_file_path}` to supplied mtl text");
            let mtl_text = mtl_text.unwrap_or_default();
            tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl_text)))
        },
    )
    .await?;

    let obj_materials = match (mtl_text, obj_materials) {
        (Some(_), materials) => materials?,
        (None, Ok(materials)) => materials,
        (None, Err(e)) => {
            warn!("ignoring material library error without supplied mtl text: {e}");
            Vec::new()
        }
    };

    let materials: Vec<Material> = obj_materials.iter().map(create_material).collect();

    let mut graph = SceneGraph::new(name);
    let root = graph.root();

    for obj_model in &obj_models {
        let material = obj_model
            .mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map(|m| Material::parser_default(m.name.clone()))
            .unwrap_or_else(|| Material::parser_default(None));

        graph
            .add_child(
                root,
                SceneNode::mesh(
                    obj_model.name.clone(),
                    create_geometry(&obj_model.mesh),
                    Some(material),
                ),
            )
            .ok_or(ContentError::Internal("root node missing from new graph"))?;
    }

    debug!(
        "parsed {} meshes and {} materials from `{name}`",
        obj_models.len(),
        materials.len()
    );

    Ok(ParsedModel {
        name: name.to_string(),
        graph,
        materials: mtl_text.map(|_| materials.into_iter().collect::<MtlLibrary>()),
    })
}

/// Parse .mtl text on its own into a material library.
pub fn parse_material_library(mtl_text: &str) -> Result<MtlLibrary, ContentError> {
    let (obj_materials, _) = tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl_text)))?;
    Ok(obj_materials.iter().map(create_material).collect())
}

/// Creates a `Material` from a .mtl material definition.
pub fn create_material(mat: &tobj::Material) -> Material {
    let mut builder = MaterialBuilder::new(MaterialSource::Mtl).name(mat.name.clone());

    if let Some(diffuse) = mat.diffuse {
        builder = builder.color(Color::from(diffuse));
    }

    if let Some(specular) = mat.specular {
        builder = builder.specular_color(Color::from(specular));
    }

    if let Some(shininess) = mat.shininess {
        builder = builder.shininess(shininess);
    }

    if let Some(dissolve) = mat.dissolve {
        builder = builder.opacity(dissolve);
    }

    builder.build()
}

/// Copy the buffers of an obj mesh into a `Geometry`.
///
/// This method assumes the mesh was loaded with `triangulate = true` and
/// `single_index = true`, so positions and normals share the index buffer.
fn create_geometry(mesh: &tobj::Mesh) -> Geometry {
    let indices = if mesh.indices.is_empty() {
        None
    } else {
        Some(mesh.indices.clone())
    };

    // It's possible for the obj file to have an empty normal buffer which
    // means the obj data didn't specify any normals.
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals.clone()
    } else {
        let triangles = match &indices {
            Some(indices) => indices.clone(),
            None => (0..(mesh.positions.len() / 3) as u32).collect(),
        };
        generate_normals(&mesh.positions, &triangles)
    };

    Geometry {
        positions: mesh.positions.clone(),
        normals,
        indices,
    }
}

/// Generate smooth vertex normals by averaging the normals of every triangle
/// that references a vertex. Vertices not used by any triangle (or only by
/// degenerate triangles) get a zero normal.
pub fn generate_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let position = |i: u32| {
        let i = i as usize * 3;
        Vec3::new(positions[i], positions[i + 1], positions[i + 2])
    };

    let mut sums = vec![Vec3::ZERO; vertex_count];

    for triangle in indices.chunks_exact(3) {
        if triangle.iter().any(|&i| i as usize >= vertex_count) {
            continue;
        }

        let (a, b, c) = (
            position(triangle[0]),
            position(triangle[1]),
            position(triangle[2]),
        );

        // Unnormalized so larger triangles contribute more.
        let face_normal = (b - a).cross(c - a);

        triangle
            .iter()
            .for_each(|&i| sums[i as usize] += face_normal);
    }

    sums.into_iter()
        .flat_map(|n| n.normalize_or_zero().to_array())
        .collect()
}
