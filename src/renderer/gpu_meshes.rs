use wgpu::util::DeviceExt;

use super::shaders::{BindGroupLayouts, PerMeshUniforms, Vertex};
use crate::scene::{Geometry, Material, MeshInstance, Side};

/// How a mesh is rasterized, which selects the render pipeline used to draw
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawStyle {
    /// Filled triangles with back faces culled.
    Front,
    /// Filled triangles with both faces visible.
    Double,
    /// Triangle edges only.
    Wireframe,
}

/// A scene mesh uploaded to the GPU along with its transform and material.
pub struct GpuMesh {
    name: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    style: DrawStyle,
    translucent: bool,
    uniforms: PerMeshUniforms,
}

impl GpuMesh {
    /// Upload `mesh` to the GPU. Returns `None` when the mesh has no complete
    /// triangles to draw.
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        mesh: &MeshInstance,
    ) -> Option<Self> {
        let material = mesh
            .node
            .material
            .clone()
            .unwrap_or_else(|| Material::parser_default(None));
        let style = if material.wireframe {
            DrawStyle::Wireframe
        } else if material.side == Side::Double {
            DrawStyle::Double
        } else {
            DrawStyle::Front
        };

        let triangles = mesh.geometry.triangle_indices();
        let indices = match style {
            DrawStyle::Wireframe => wireframe_indices(&triangles),
            _ => triangles,
        };

        if indices.is_empty() {
            return None;
        }

        let vertices = build_vertices(mesh.geometry);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vertex buffer", mesh.node.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} index buffer", mesh.node.name)),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(Self {
            name: mesh.node.name.clone(),
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            style,
            translucent: material.is_translucent(),
            uniforms: PerMeshUniforms::new(device, layouts, mesh.local_to_world, &material),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    /// Bind this mesh's buffers and uniforms and draw it. The caller must have
    /// set a pipeline matching `style()`.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_bind_group(1, self.uniforms.buffer.bind_group(), &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Interleave positions and normals into vertices. Vertices without a normal
/// get a zero normal, which the shader draws unlit.
pub fn build_vertices(geometry: &Geometry) -> Vec<Vertex> {
    geometry
        .positions
        .chunks_exact(3)
        .enumerate()
        .map(|(i, p)| Vertex {
            position: [p[0], p[1], p[2]],
            normal: geometry
                .normals
                .get(i * 3..i * 3 + 3)
                .map_or([0.0; 3], |n| [n[0], n[1], n[2]]),
        })
        .collect()
}

/// Convert a triangle list into a line list with the three edges of every
/// triangle.
pub fn wireframe_indices(triangles: &[u32]) -> Vec<u32> {
    triangles
        .chunks_exact(3)
        .flat_map(|t| [t[0], t[1], t[1], t[2], t[2], t[0]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_interleave_positions_and_normals() {
        let geometry = Geometry {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            normals: vec![0.0, 0.0, 1.0],
            indices: None,
        };

        let vertices = build_vertices(&geometry);
        assert_eq!(2, vertices.len());
        assert_eq!([1.0, 0.0, 0.0], vertices[1].position);
        assert_eq!([0.0, 0.0, 1.0], vertices[0].normal);
        assert_eq!([0.0, 0.0, 0.0], vertices[1].normal);
    }

    #[test]
    fn wireframe_has_three_edges_per_triangle() {
        let lines = wireframe_indices(&[0, 1, 2, 2, 1, 3]);
        assert_eq!(vec![0, 1, 1, 2, 2, 0, 2, 1, 1, 3, 3, 2], lines);
    }

    #[test]
    fn wireframe_ignores_partial_triangles() {
        assert!(wireframe_indices(&[0, 1]).is_empty());
    }
}
