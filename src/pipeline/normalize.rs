use glam::Vec3;
use tracing::warn;

use super::PipelineError;
use crate::scene::SceneGraph;

/// How a model was moved and scaled to fit the viewing volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    /// Center of the model's bounding box before normalization.
    pub center: Vec3,
    /// Size of the model's bounding box before normalization.
    pub size: Vec3,
    /// Uniform scale applied to the model.
    pub scale: f32,
}

/// Move and scale `graph` so its bounding box is centered on the origin and
/// its largest dimension equals `target_size`.
///
/// The adjustment is applied to the root node's transform, vertex buffers are
/// left untouched. A model with no vertices or with non-finite coordinates is
/// rejected. A model whose bounding box has no extent (eg a single point) is
/// centered but not scaled.
pub fn normalize(
    graph: &mut SceneGraph,
    target_size: f32,
) -> Result<Normalization, PipelineError> {
    let aabb = graph.bounding_box();

    if aabb.is_empty() {
        return Err(PipelineError::InvalidGeometry(
            "model has no vertices".to_string(),
        ));
    }

    let center = aabb.center();
    let size = aabb.size();
    let max_extent = aabb.max_extent();

    if !center.is_finite() || !max_extent.is_finite() {
        return Err(PipelineError::InvalidGeometry(format!(
            "model bounds are not finite ({:?} to {:?})",
            aabb.min, aabb.max
        )));
    }

    // Any positive extent is scaled, however small, unless the scale itself
    // would overflow.
    let fit_scale = target_size / max_extent;
    let scale = if max_extent > 0.0 && fit_scale.is_finite() {
        fit_scale
    } else {
        warn!("model has zero extent, it will be centered but not scaled");
        1.0
    };

    // The root maps v to (s * v + t). Normalizing maps world points p to
    // k * (p - center), so the new root maps v to (k * s) * v + k * (t - center).
    let root = graph.root_node_mut();
    root.transform.translation = scale * (root.transform.translation - center);
    root.transform.scale *= scale;

    Ok(Normalization {
        center,
        size,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, SceneNode};

    const EPSILON: f32 = 1e-5;

    fn graph_with_points(points: &[[f32; 3]]) -> SceneGraph {
        let mut graph = SceneGraph::new("model");
        let root = graph.root();
        let geometry = Geometry {
            positions: points.iter().flatten().copied().collect(),
            normals: vec![],
            indices: None,
        };
        graph
            .add_child(root, SceneNode::mesh("mesh", geometry, None))
            .unwrap();
        graph
    }

    #[test]
    fn model_is_centered_and_scaled() {
        let mut graph =
            graph_with_points(&[[10.0, 20.0, 30.0], [14.0, 21.0, 31.0], [12.0, 22.0, 30.5]]);

        let n = normalize(&mut graph, 2.0).unwrap();
        assert_eq!(Vec3::new(12.0, 21.0, 30.5), n.center);
        assert_eq!(0.5, n.scale);

        let aabb = graph.bounding_box();
        assert!(aabb.center().abs().max_element() < EPSILON);
        assert!((aabb.max_extent() - 2.0).abs() < EPSILON);
    }

    #[test]
    fn meshes_in_several_nodes_share_one_bounding_box() {
        let mut graph = graph_with_points(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 0.0]]);
        let root = graph.root();
        let second = Geometry {
            positions: vec![-7.0, 0.0, 0.0, -6.0, 0.0, 0.0, -6.0, 1.0, 0.0],
            normals: vec![],
            indices: None,
        };
        graph
            .add_child(root, SceneNode::mesh("second", second, None))
            .unwrap();

        normalize(&mut graph, 2.0).unwrap();

        let aabb = graph.bounding_box();
        assert!(aabb.center().abs().max_element() < EPSILON);
        assert!((aabb.size().x - 2.0).abs() < EPSILON);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let mut graph = graph_with_points(&[[1.0, 1.0, 1.0], [5.0, 3.0, 2.0], [3.0, 1.0, 1.0]]);

        normalize(&mut graph, 2.0).unwrap();
        let second = normalize(&mut graph, 2.0).unwrap();

        assert!((second.scale - 1.0).abs() < EPSILON);
        assert!(second.center.abs().max_element() < EPSILON);
    }

    #[test]
    fn empty_model_is_invalid_geometry() {
        let mut graph = SceneGraph::new("empty");
        assert!(matches!(
            normalize(&mut graph, 2.0),
            Err(PipelineError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn zero_extent_model_is_centered_without_scaling() {
        let mut graph = graph_with_points(&[[3.0, -2.0, 1.0]]);

        let n = normalize(&mut graph, 2.0).unwrap();
        assert_eq!(1.0, n.scale);

        let aabb = graph.bounding_box();
        assert!(aabb.center().abs().max_element() < EPSILON);
        assert_eq!(0.0, aabb.max_extent());
    }

    #[test]
    fn tiny_model_is_still_scaled_to_target_size() {
        let mut graph = graph_with_points(&[[0.0, 0.0, 0.0], [1e-8, 0.0, 0.0], [0.0, 5e-9, 0.0]]);

        let n = normalize(&mut graph, 2.0).unwrap();
        assert!((n.scale - 2e8).abs() / 2e8 < EPSILON);

        let aabb = graph.bounding_box();
        assert!((aabb.max_extent() - 2.0).abs() < 1e-4);
        assert!(aabb.center().abs().max_element() < 1e-4);
    }

    #[test]
    fn non_finite_model_is_invalid_geometry() {
        let mut graph = graph_with_points(&[[0.0, 0.0, 0.0], [f32::INFINITY, 1.0, 0.0]]);
        assert!(matches!(
            normalize(&mut graph, 2.0),
            Err(PipelineError::InvalidGeometry(_))
        ));
    }
}
