use std::fmt;

use crate::scene::SceneGraph;

/// Vertex and triangle totals for a loaded model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModelSummary {
    pub vertex_count: usize,
    pub face_count: usize,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} faces",
            self.vertex_count, self.face_count
        )
    }
}

/// Sum the vertex and face counts of every mesh in `graph`.
///
/// Faces are counted from the index buffer when a mesh has one, otherwise
/// from the vertex buffer. Buffers that are not a multiple of three are
/// truncated to whole triangles rather than rejected.
pub fn summarize(graph: &SceneGraph) -> ModelSummary {
    graph
        .meshes()
        .iter()
        .fold(ModelSummary::default(), |summary, mesh| ModelSummary {
            vertex_count: summary.vertex_count + mesh.geometry.vertex_count(),
            face_count: summary.face_count + mesh.geometry.face_count(),
        })
}
