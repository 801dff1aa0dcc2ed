use crate::camera::FirstPersonCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use gallery_common::PlayerPose;
use gallery_render::{SKY_COLOR, SceneItem, Shading};
use glam::Mat4;
use std::ops::Range;
use wgpu::util::DeviceExt;

const MAX_INSTANCES: u32 = 4096;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    /// x: normal sign, y: emissive flag.
    params: [f32; 4],
}

impl InstanceData {
    fn from_item(item: &SceneItem) -> Self {
        let cols = item.model.to_cols_array_2d();
        let (normal_sign, emissive) = match item.shading {
            Shading::Interior => (-1.0, 0.0),
            Shading::Lit => (1.0, 0.0),
            Shading::Emissive => (1.0, 1.0),
        };
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: item.color,
            params: [normal_sign, emissive, 0.0, 0.0],
        }
    }
}

/// Scene instances grouped by pipeline, in draw order.
#[derive(Debug, Clone, Default)]
pub struct DrawBatches {
    instances: Vec<InstanceData>,
    pub interior: Range<u32>,
    pub opaque: Range<u32>,
    pub translucent: Range<u32>,
}

impl DrawBatches {
    /// Partition items into room shells, opaque solids and translucent sparks.
    ///
    /// Items beyond `limit` are dropped, shells first to keep the gun and effects.
    pub fn build(items: &[SceneItem], limit: u32) -> Self {
        let mut interior = Vec::new();
        let mut opaque = Vec::new();
        let mut translucent = Vec::new();
        for item in items {
            let inst = InstanceData::from_item(item);
            match item.shading {
                Shading::Interior => interior.push(inst),
                _ if item.color[3] < 1.0 => translucent.push(inst),
                _ => opaque.push(inst),
            }
        }

        let total = interior.len() + opaque.len() + translucent.len();
        let overflow = total.saturating_sub(limit as usize);
        if overflow > 0 {
            tracing::warn!(total, limit, "scene exceeds instance buffer, dropping items");
            let cut = overflow.min(interior.len());
            interior.drain(..cut);
            let rest = overflow - cut;
            let cut = rest.min(opaque.len());
            opaque.drain(..cut);
            let rest = rest - cut;
            translucent.truncate(translucent.len() - rest.min(translucent.len()));
        }

        let a = interior.len() as u32;
        let b = a + opaque.len() as u32;
        let c = b + translucent.len() as u32;
        let mut instances = interior;
        instances.extend(opaque);
        instances.extend(translucent);
        Self {
            instances,
            interior: 0..a,
            opaque: a..b,
            translucent: b..c,
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Unit cube centered on the origin, counter-clockwise outward faces.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    // (normal, u axis, v axis) per face; u x v == normal.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let base = vertices.len() as u16;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let position = std::array::from_fn(|i| n[i] * 0.5 + u[i] * su + v[i] * sv);
            vertices.push(Vertex { position, normal: n });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// wgpu renderer for the gallery scene.
pub struct WgpuRenderer {
    interior_pipeline: wgpu::RenderPipeline,
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
}

struct PipelineParams {
    label: &'static str,
    cull_mode: wgpu::Face,
    blend: wgpu::BlendState,
    depth_write: bool,
}

impl WgpuRenderer {
    /// Build the cube mesh, instance buffer and all three pipelines.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let build = |p: PipelineParams| {
            Self::create_pipeline(device, &pipeline_layout, &shader, surface_format, p)
        };
        // Room shells are seen from inside, so their outward faces are culled.
        let interior_pipeline = build(PipelineParams {
            label: "interior_pipeline",
            cull_mode: wgpu::Face::Front,
            blend: wgpu::BlendState::REPLACE,
            depth_write: true,
        });
        let opaque_pipeline = build(PipelineParams {
            label: "opaque_pipeline",
            cull_mode: wgpu::Face::Back,
            blend: wgpu::BlendState::REPLACE,
            depth_write: true,
        });
        let translucent_pipeline = build(PipelineParams {
            label: "translucent_pipeline",
            cull_mode: wgpu::Face::Back,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write: false,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: u64::from(MAX_INSTANCES) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::debug!(?surface_format, width, height, "wgpu renderer ready");

        Self {
            interior_pipeline,
            opaque_pipeline,
            translucent_pipeline,
            uniform_buffer,
            uniform_bind_group,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            instance_buffer,
            depth_texture: Self::create_depth_texture(device, width, height),
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        params: PipelineParams,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(params.label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(params.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(params.cull_mode),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: params.depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame of scene items seen from `pose`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FirstPersonCamera,
        pose: &PlayerPose,
        items: &[SceneItem],
    ) {
        let vp = camera.view_projection(pose);
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: vp.to_cols_array_2d(),
            }),
        );

        let batches = DrawBatches::build(items, MAX_INSTANCES);
        if !batches.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&batches.instances),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = SKY_COLOR.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (pipeline, range) in [
                (&self.interior_pipeline, batches.interior.clone()),
                (&self.opaque_pipeline, batches.opaque.clone()),
                (&self.translucent_pipeline, batches.translucent.clone()),
            ] {
                if range.is_empty() {
                    continue;
                }
                pass.set_pipeline(pipeline);
                pass.draw_indexed(0..self.cube_index_count, 0, range);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
