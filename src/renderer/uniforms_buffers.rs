/// A Rust struct of uniform values mirrored into a GPU uniform buffer that
/// shaders can read.
///
/// Values are changed through `values_mut()`; changed values are only visible
/// to shaders after `update_gpu()` copies them over.
#[derive(Debug)]
pub struct GenericUniformBuffer<T>
where
    T: Clone + Copy + std::fmt::Debug + bytemuck::Pod + bytemuck::Zeroable,
{
    /// The values stored in this uniform buffer.
    values: T,
    /// The GPU buffer storing a copy of this uniform buffer's values.
    gpu_buffer: wgpu::Buffer,
    /// The WGPU bind group representing this uniform buffer instance.
    bind_group: wgpu::BindGroup,
    /// True if `values` has changed since it was last copied to the GPU.
    is_dirty: bool,
}

impl<T> GenericUniformBuffer<T>
where
    T: Clone + Copy + std::fmt::Debug + bytemuck::Pod + bytemuck::Zeroable,
{
    /// Create a new uniform buffer bound at binding 0 of `bind_group_layout`,
    /// initialized with `values`.
    pub fn new(
        device: &wgpu::Device,
        label: Option<&str>,
        values: T,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let gpu_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::bytes_of(&values),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout: bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: gpu_buffer.as_entire_binding(),
            }],
        });

        Self {
            values,
            gpu_buffer,
            bind_group,
            is_dirty: false,
        }
    }

    /// Access the values stored in this uniform buffer. The buffer is marked
    /// dirty even if nothing is changed.
    pub fn values_mut(&mut self) -> &mut T {
        self.is_dirty = true;
        &mut self.values
    }

    /// Copy the values to the GPU if they changed since the last copy.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        if self.is_dirty {
            queue.write_buffer(&self.gpu_buffer, 0, bytemuck::bytes_of(&self.values));
            self.is_dirty = false;
        }
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
