mod packed_structs;

pub use packed_structs::*;

use glam::{Mat4, Vec4};

use super::uniforms_buffers::GenericUniformBuffer;
use crate::{appearance::Appearance, scene::Material};

/// Vertex layout shared by every mesh drawn by the renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Bind group layouts used by the standard shader.
pub struct BindGroupLayouts {
    pub per_frame_layout: wgpu::BindGroupLayout,
    pub per_mesh_layout: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            per_frame_layout: uniform_layout(
                device,
                "per-frame bind group layout",
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ),
            per_mesh_layout: uniform_layout(
                device,
                "per-mesh bind group layout",
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ),
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Per-frame uniform values used by the standard shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerFrameBufferData {
    pub view_projection: Mat4,
    pub ambient: Vec4, // .w is unused.
    pub light_count: [u32; 4],
    pub lights: [PackedLight; MAX_LIGHTS],
}

/// Stores per-frame shader uniform values, one instance per renderer.
pub struct PerFrameUniforms {
    pub buffer: GenericUniformBuffer<PerFrameBufferData>,
}

impl PerFrameUniforms {
    pub fn new(device: &wgpu::Device, layouts: &BindGroupLayouts) -> Self {
        Self {
            buffer: GenericUniformBuffer::new(
                device,
                Some("per-frame uniforms"),
                Default::default(),
                &layouts.per_frame_layout,
            ),
        }
    }

    /// Set view projection matrix.
    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        self.buffer.values_mut().view_projection = view_projection;
    }

    /// Copy the ambient light and lights from `appearance`.
    pub fn set_lights(&mut self, appearance: &Appearance) {
        let (ambient, count, lights) = pack_lights(appearance);
        let values = self.buffer.values_mut();

        values.ambient = ambient;
        values.light_count = [count, 0, 0, 0];
        values.lights = lights;
    }
}

/// Per-mesh uniform values used by the standard shader.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerMeshBufferData {
    pub local_to_world: Mat4,
    pub material: PackedMaterial,
}

/// Stores the uniform values for a single mesh.
#[derive(Debug)]
pub struct PerMeshUniforms {
    pub buffer: GenericUniformBuffer<PerMeshBufferData>,
}

impl PerMeshUniforms {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        local_to_world: Mat4,
        material: &Material,
    ) -> Self {
        Self {
            buffer: GenericUniformBuffer::new(
                device,
                Some("per-mesh uniforms"),
                PerMeshBufferData {
                    local_to_world,
                    material: material.into(),
                },
                &layouts.per_mesh_layout,
            ),
        }
    }
}
