use crate::shaders;
use bytemuck::{Pod, Zeroable};
use cubestudy_common::{Color, NodeId};
use cubestudy_render::{PerspectiveCamera, RenderError, Renderer};
use cubestudy_scene::{
    Geometry, LineBasicMaterial, NodeKind, PhongMaterial, SceneGraph, WireframeGeometry,
};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MSAA_SAMPLES: u32 = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    /// rgb = specular color, w = shininess
    specular: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Errors while creating the GPU renderer.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Construction options for [`WgpuRenderer`].
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions {
    /// Multisample when the surface format allows it.
    pub antialias: bool,
    pub clear_color: Color,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            clear_color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawKind {
    Mesh,
    Lines,
}

/// GPU resources for one drawable node.
struct DrawResources {
    kind: DrawKind,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_buffer: Option<(wgpu::Buffer, u32)>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct Targets {
    depth: wgpu::TextureView,
    msaa: Option<wgpu::TextureView>,
}

/// wgpu-based scene renderer bound to one window surface.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draws: BTreeMap<NodeId, DrawResources>,
    targets: Targets,
    sample_count: u32,
    pixel_ratio: f32,
    logical_size: (u32, u32),
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    /// Create a renderer drawing into `target`, initially `width` x `height`
    /// physical pixels.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        options: RendererOptions,
    ) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubestudy_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if options.antialias
            && adapter
                .get_texture_format_features(surface_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            1
        };

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals_buffer"),
            contents: bytemuck::bytes_of(&Globals {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                camera_pos: [0.0; 4],
                light_dir: [0.0; 4],
                light_color: [0.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = uniform_layout(&device, "globals_bind_group_layout");
        let draw_layout = uniform_layout(&device, "draw_bind_group_layout");

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });

        let mesh_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            PipelineDesc {
                label: "mesh_pipeline",
                shader: &mesh_shader,
                vs_entry: "vs_main",
                fs_entry: "fs_main",
                vertex_layout: wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                },
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                format: surface_format,
                sample_count,
            },
        );

        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            PipelineDesc {
                label: "line_pipeline",
                shader: &line_shader,
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                vertex_layout: wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                },
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                format: surface_format,
                sample_count,
            },
        );

        let targets = create_targets(&device, &config, sample_count);
        let [r, g, b] = options.clear_color.to_linear();

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            sample_count,
            "GPU renderer initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            mesh_pipeline,
            line_pipeline,
            globals_buffer,
            globals_bind_group,
            draw_layout,
            draws: BTreeMap::new(),
            targets,
            sample_count,
            pixel_ratio: 1.0,
            logical_size: (width, height),
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawing-buffer size in physical pixels.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn reconfigure(&mut self) {
        let (w, h) = self.logical_size;
        self.config.width = ((w as f32 * self.pixel_ratio).round() as u32).max(1);
        self.config.height = ((h as f32 * self.pixel_ratio).round() as u32).max(1);
        self.surface.configure(&self.device, &self.config);
        self.targets = create_targets(&self.device, &self.config, self.sample_count);
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            "surface reconfigured"
        );
    }

    fn write_globals(&self, scene: &SceneGraph, camera: &PerspectiveCamera) {
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals(scene, camera)));
    }
}

/// Per-frame uniforms: camera and the first directional light. `light_dir`
/// points from the target toward the light.
fn globals(scene: &SceneGraph, camera: &PerspectiveCamera) -> Globals {
    let (light_dir, light_color) = match scene.directional_lights().first() {
        Some((position, light)) => {
            let dir = (*position - light.target).normalize_or_zero();
            let [r, g, b] = light.color.to_linear();
            (dir, Vec3::new(r, g, b) * light.intensity)
        }
        None => (Vec3::ZERO, Vec3::ZERO),
    };
    Globals {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_pos: camera.position.extend(1.0).to_array(),
        light_dir: light_dir.extend(0.0).to_array(),
        light_color: light_color.extend(1.0).to_array(),
    }
}

impl DrawUniforms {
    fn mesh(world: Mat4, material: &PhongMaterial) -> Self {
        let [r, g, b] = material.color.to_linear();
        let [sr, sg, sb] = material.specular.to_linear();
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
            color: [r, g, b, 1.0],
            specular: [sr, sg, sb, material.shininess],
        }
    }

    fn lines(world: Mat4, material: &LineBasicMaterial) -> Self {
        let [r, g, b] = material.color.to_linear();
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            color: [r, g, b, 1.0],
            specular: [0.0; 4],
        }
    }
}

impl Renderer for WgpuRenderer {
    type Output = ();

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = if ratio > 0.0 { ratio } else { 1.0 };
        self.reconfigure();
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.logical_size = (width, height);
        self.reconfigure();
    }

    /// Render one frame: every visible mesh and line set, in scene order.
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => {
                tracing::error!("surface error: {e}");
                return Err(RenderError::Surface(e.to_string()));
            }
        };

        self.write_globals(scene, camera);

        let mut order = Vec::new();
        for visited in scene.traverse() {
            if !visited.visible {
                continue;
            }
            let uniforms = match &visited.node.kind {
                NodeKind::Mesh(mesh) => {
                    self.draws.entry(visited.id).or_insert_with(|| {
                        mesh_resources(&self.device, &self.draw_layout, &mesh.geometry)
                    });
                    DrawUniforms::mesh(visited.world, &mesh.material)
                }
                NodeKind::LineSegments(lines) => {
                    self.draws.entry(visited.id).or_insert_with(|| {
                        line_resources(&self.device, &self.draw_layout, &lines.geometry)
                    });
                    DrawUniforms::lines(visited.world, &lines.material)
                }
                NodeKind::Group | NodeKind::DirectionalLight(_) => continue,
            };
            if let Some(res) = self.draws.get(&visited.id) {
                self.queue
                    .write_buffer(&res.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
                order.push(visited.id);
            }
        }

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (color_view, resolve_target) = match &self.targets.msaa {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for id in &order {
                let Some(res) = self.draws.get(id) else {
                    continue;
                };
                match res.kind {
                    DrawKind::Mesh => pass.set_pipeline(&self.mesh_pipeline),
                    DrawKind::Lines => pass.set_pipeline(&self.line_pipeline),
                }
                pass.set_bind_group(1, &res.bind_group, &[]);
                pass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
                match &res.index_buffer {
                    Some((indices, count)) => {
                        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    None => pass.draw(0..res.vertex_count, 0..1),
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

struct PipelineDesc<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    vs_entry: &'a str,
    fs_entry: &'a str,
    vertex_layout: wgpu::VertexBufferLayout<'a>,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some(desc.vs_entry),
            compilation_options: Default::default(),
            buffers: &[desc.vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: desc.sample_count,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}

fn create_targets(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
) -> Targets {
    let size = wgpu::Extent3d {
        width: config.width.max(1),
        height: config.height.max(1),
        depth_or_array_layers: 1,
    };
    let depth = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&Default::default());

    let msaa = (sample_count > 1).then(|| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("msaa_color_texture"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: config.format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&Default::default())
    });

    Targets { depth, msaa }
}

fn draw_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw_uniform_buffer"),
        size: std::mem::size_of::<DrawUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bind_group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    (uniform_buffer, bind_group)
}

fn mesh_resources(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    geometry: &Geometry,
) -> DrawResources {
    let vertices: Vec<Vertex> = geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .map(|(position, normal)| Vertex {
            position: *position,
            normal: *normal,
        })
        .collect();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_vertex_buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = (!geometry.indices.is_empty()).then(|| {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        (buffer, geometry.indices.len() as u32)
    });
    let (uniform_buffer, bind_group) = draw_uniforms(device, layout);

    DrawResources {
        kind: DrawKind::Mesh,
        vertex_buffer,
        vertex_count: vertices.len() as u32,
        index_buffer,
        uniform_buffer,
        bind_group,
    }
}

fn line_resources(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    geometry: &WireframeGeometry,
) -> DrawResources {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("line_vertex_buffer"),
        contents: bytemuck::cast_slice(&geometry.positions),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let (uniform_buffer, bind_group) = draw_uniforms(device, layout);

    DrawResources {
        kind: DrawKind::Lines,
        vertex_buffer,
        vertex_count: geometry.positions.len() as u32,
        index_buffer: None,
        uniform_buffer,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubestudy_scene::{DirectionalLight, Node};

    #[test]
    fn uniform_blocks_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Globals>(), 112);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 160);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn globals_point_toward_the_light() {
        let mut scene = SceneGraph::new();
        scene
            .add(
                Node::directional_light(DirectionalLight::new(Color::WHITE, 0.5))
                    .with_position(Vec3::new(-1.0, 1.0, 4.0)),
            )
            .unwrap();
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 0.0, 2.0);
        camera.look_at(Vec3::ZERO);

        let g = globals(&scene, &camera);
        let dir = Vec3::new(g.light_dir[0], g.light_dir[1], g.light_dir[2]);
        assert!((dir - Vec3::new(-1.0, 1.0, 4.0).normalize()).length() < 1e-6);
        assert_eq!(g.light_dir[3], 0.0);
        for c in &g.light_color[..3] {
            assert!((c - 0.5).abs() < 1e-5);
        }
        assert_eq!(g.camera_pos, [0.0, 0.0, 2.0, 1.0]);
    }

    #[test]
    fn unlit_scene_has_no_light() {
        let g = globals(&SceneGraph::new(), &PerspectiveCamera::default());
        assert_eq!(g.light_dir, [0.0; 4]);
        assert_eq!(&g.light_color[..3], &[0.0; 3]);
    }

    #[test]
    fn mesh_uniforms_carry_linear_color() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let u = DrawUniforms::mesh(world, &PhongMaterial::new(Color(0xff0000)));
        assert!((u.color[0] - 1.0).abs() < 1e-5);
        assert_eq!(&u.color[1..], &[0.0, 0.0, 1.0]);
        assert_eq!(u.specular[3], 30.0);
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        // Pure translation leaves the normal basis untouched.
        let normal = Mat4::from_cols_array_2d(&u.normal_matrix);
        let n = normal.transform_vector3(Vec3::Y);
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn line_uniforms_are_unlit() {
        let u = DrawUniforms::lines(
            Mat4::IDENTITY,
            &LineBasicMaterial {
                color: Color(0xffff00),
            },
        );
        assert!((u.color[0] - 1.0).abs() < 1e-5);
        assert!((u.color[1] - 1.0).abs() < 1e-5);
        assert_eq!(u.color[2], 0.0);
        assert_eq!(u.specular, [0.0; 4]);
    }
}
