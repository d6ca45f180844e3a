//! A small node tree holding the meshes of a loaded model.
//!
//! Nodes are stored in an arena owned by `SceneGraph` and refer to their
//! children by key. The graph always has a single root group node; loaded
//! meshes are attached below it.
mod bounds;
mod material;

pub use bounds::*;
pub use material::*;

use glam::{Mat4, Quat, Vec3};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a node stored in a `SceneGraph`.
    pub struct NodeKey;
}

/// Vertex and index buffers for a triangle mesh.
///
/// `positions` and `normals` are flat xyz triples. When `indices` is present
/// every three indices form a triangle, otherwise every three vertices do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    /// Number of vertices stored in the position buffer.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles described by this geometry. Partial triangles are
    /// not counted.
    pub fn face_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.vertex_count() / 3,
        }
    }

    /// Iterate over the vertex positions.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
    }

    /// Local space bounding box of the vertex positions.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_points(self.points())
    }

    /// Triangle indices, generating a sequential list for non-indexed
    /// geometry.
    pub fn triangle_indices(&self) -> Vec<u32> {
        match &self.indices {
            Some(indices) => indices[..indices.len() - indices.len() % 3].to_vec(),
            None => (0..(self.face_count() * 3) as u32).collect(),
        }
    }
}

/// Position and uniform scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        scale: 1.0,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::IDENTITY,
            self.translation,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node in the scene graph. Nodes with geometry are meshes, nodes without
/// are groups.
#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub name: String,
    pub geometry: Option<Geometry>,
    pub material: Option<Material>,
    pub transform: Transform,
    children: Vec<NodeKey>,
}

impl SceneNode {
    /// Create a group node with no geometry.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a mesh node.
    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Option<Material>) -> Self {
        Self {
            name: name.into(),
            geometry: Some(geometry),
            material,
            ..Default::default()
        }
    }

    pub fn is_mesh(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// A mesh node visited during traversal along with its world transform.
pub struct MeshInstance<'a> {
    pub key: NodeKey,
    pub node: &'a SceneNode,
    pub geometry: &'a Geometry,
    pub local_to_world: Mat4,
}

/// An arena backed tree of scene nodes.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
}

impl SceneGraph {
    /// Create a graph containing only a root group named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::group(name));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Insert `node` as the last child of `parent`. Returns `None` if `parent`
    /// is not in this graph.
    pub fn add_child(&mut self, parent: NodeKey, node: SceneNode) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }

        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        Some(key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Root node of the graph.
    pub fn root_node(&self) -> &SceneNode {
        &self.nodes[self.root]
    }

    pub fn root_node_mut(&mut self) -> &mut SceneNode {
        &mut self.nodes[self.root]
    }

    /// Total number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes besides the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Collect every mesh reachable from the root in depth first order, along
    /// with the transform taking the mesh from local to world space.
    pub fn meshes(&self) -> Vec<MeshInstance<'_>> {
        let mut found = Vec::new();
        let mut stack = vec![(self.root, Mat4::IDENTITY)];

        while let Some((key, parent_to_world)) = stack.pop() {
            let node = &self.nodes[key];
            let local_to_world = parent_to_world * node.transform.matrix();

            if let Some(geometry) = &node.geometry {
                found.push(MeshInstance {
                    key,
                    node,
                    geometry,
                    local_to_world,
                });
            }

            // Push in reverse so children are visited in insertion order.
            node.children
                .iter()
                .rev()
                .for_each(|child| stack.push((*child, local_to_world)));
        }

        found
    }

    /// Keys of every mesh node reachable from the root.
    pub fn mesh_keys(&self) -> Vec<NodeKey> {
        self.meshes().into_iter().map(|m| m.key).collect()
    }

    /// World space bounding box of all geometry in the graph.
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();

        for mesh in self.meshes() {
            aabb.union(&mesh.geometry.bounding_box().transformed(&mesh.local_to_world));
        }

        aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> Geometry {
        Geometry {
            positions: vec![
                offset, 0.0, 0.0, //
                offset + 1.0, 0.0, 0.0, //
                offset, 1.0, 0.0,
            ],
            normals: vec![],
            indices: None,
        }
    }

    #[test]
    fn geometry_counts() {
        let mut g = triangle(0.0);
        assert_eq!(3, g.vertex_count());
        assert_eq!(1, g.face_count());

        g.indices = Some(vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(2, g.face_count());
    }

    #[test]
    fn geometry_counts_truncate_partial_triangles() {
        let g = Geometry {
            positions: vec![0.0; 12],
            normals: vec![],
            indices: Some(vec![0, 1, 2, 3]),
        };

        assert_eq!(4, g.vertex_count());
        assert_eq!(1, g.face_count());
        assert_eq!(vec![0, 1, 2], g.triangle_indices());
    }

    #[test]
    fn meshes_are_visited_in_insertion_order() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        let group = graph.add_child(root, SceneNode::group("group")).unwrap();
        graph
            .add_child(group, SceneNode::mesh("a", triangle(0.0), None))
            .unwrap();
        graph
            .add_child(root, SceneNode::mesh("b", triangle(1.0), None))
            .unwrap();

        let names: Vec<_> = graph.meshes().iter().map(|m| m.node.name.clone()).collect();
        assert_eq!(vec!["a", "b"], names);
        assert_eq!(4, graph.len());
    }

    #[test]
    fn bounding_box_applies_parent_transforms() {
        let mut graph = SceneGraph::new("root");
        let root = graph.root();
        graph
            .add_child(root, SceneNode::mesh("a", triangle(0.0), None))
            .unwrap();
        graph.root_node_mut().transform = Transform {
            translation: Vec3::new(0.0, 0.0, 5.0),
            scale: 2.0,
        };

        let aabb = graph.bounding_box();
        assert_eq!(Vec3::new(0.0, 0.0, 5.0), aabb.min);
        assert_eq!(Vec3::new(2.0, 2.0, 5.0), aabb.max);
    }

    #[test]
    fn add_child_to_unknown_parent_fails() {
        let mut other = SceneGraph::new("other");
        let stray = other
            .add_child(other.root(), SceneNode::group("stray"))
            .unwrap();

        let mut graph = SceneGraph::new("root");
        assert!(graph.add_child(stray, SceneNode::group("child")).is_none());
    }
}
