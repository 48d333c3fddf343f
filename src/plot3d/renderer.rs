use std::sync::Mutex;

use eframe::egui;
use eframe::egui_wgpu;
use eframe::wgpu;
use eframe::wgpu::util::DeviceExt;

use crate::render::gpu_types::{ChartUniforms, CubeInstance, Line3DData};

// ---------------------------------------------------------------------------
// WGSL shader sources (embedded)
// ---------------------------------------------------------------------------

const UNIFORMS_WGSL: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    color: vec4<f32>,
    resolution: vec2<f32>,
    line_width: f32,
    ambient: f32,
};

@group(0) @binding(0) var<uniform> u: Uniforms;
"#;

const CUBE_SHADER_SRC: &str = r#"
struct CubeInstance {
    center: vec4<f32>,
    half_extents: vec4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(1) var<storage, read> cubes: array<CubeInstance>;

struct CubeOutput {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) normal: vec3<f32>,
};

// 36 vertices per instance: six faces (+X, -X, +Y, -Y, +Z, -Z) of two
// triangles each.
@vertex
fn vs_cube(
    @builtin(instance_index) inst: u32,
    @builtin(vertex_index) vert: u32,
) -> CubeOutput {
    var normals = array<vec3<f32>, 6>(
        vec3<f32>( 1.0,  0.0,  0.0),
        vec3<f32>(-1.0,  0.0,  0.0),
        vec3<f32>( 0.0,  1.0,  0.0),
        vec3<f32>( 0.0, -1.0,  0.0),
        vec3<f32>( 0.0,  0.0,  1.0),
        vec3<f32>( 0.0,  0.0, -1.0),
    );
    var tangents = array<vec3<f32>, 6>(
        vec3<f32>(0.0, 1.0, 0.0),
        vec3<f32>(0.0, 1.0, 0.0),
        vec3<f32>(0.0, 0.0, 1.0),
        vec3<f32>(0.0, 0.0, 1.0),
        vec3<f32>(1.0, 0.0, 0.0),
        vec3<f32>(1.0, 0.0, 0.0),
    );
    var quad = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
    );

    let face = vert / 6u;
    let n = normals[face];
    let t = tangents[face];
    let b = cross(n, t);
    let q = quad[vert % 6u];
    let corner = n + t * q.x + b * q.y;

    let cube = cubes[inst];
    let world = cube.center.xyz + corner * cube.half_extents.xyz;

    var out: CubeOutput;
    out.pos = u.view_proj * vec4<f32>(world, 1.0);
    out.color = cube.color;
    out.normal = n;
    return out;
}

@fragment
fn fs_cube(
    @location(0) color: vec4<f32>,
    @location(1) normal: vec3<f32>,
) -> @location(0) vec4<f32> {
    let diffuse = max(dot(normalize(normal), normalize(u.light_dir.xyz)), 0.0);
    let shade = min(u.ambient + diffuse, 1.0);
    return vec4<f32>(color.rgb * shade, color.a);
}
"#;

const LINE_SHADER_SRC: &str = r#"
@group(0) @binding(1) var<storage, read> positions: array<vec4<f32>>;

struct LineOutput {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

// Instanced camera-facing ribbon, one instance per segment.
@vertex
fn vs_line(
    @builtin(instance_index) inst: u32,
    @builtin(vertex_index) vert: u32,
) -> LineOutput {
    // Storage holds pairs: [start, end, start, end, ...]
    let clip0 = u.view_proj * vec4<f32>(positions[inst * 2u].xyz, 1.0);
    let clip1 = u.view_proj * vec4<f32>(positions[inst * 2u + 1u].xyz, 1.0);

    let screen0 = (clip0.xy / clip0.w * 0.5 + 0.5) * u.resolution;
    let screen1 = (clip1.xy / clip1.w * 0.5 + 0.5) * u.resolution;

    let dir = screen1 - screen0;
    let len = length(dir);

    var perp: vec2<f32>;
    if len > 0.001 {
        perp = vec2<f32>(-dir.y, dir.x) / len * u.line_width * 0.5;
    } else {
        perp = vec2<f32>(0.0, u.line_width * 0.5);
    }

    // t selects the endpoint, side the ribbon edge.
    var t: f32;
    var side: f32;
    switch vert {
        case 0u: { t = 0.0; side =  1.0; }
        case 1u: { t = 0.0; side = -1.0; }
        case 2u: { t = 1.0; side =  1.0; }
        case 3u: { t = 0.0; side = -1.0; }
        case 4u: { t = 1.0; side = -1.0; }
        case 5u: { t = 1.0; side =  1.0; }
        default: { t = 0.0; side = 1.0; }
    }

    let final_screen = mix(screen0, screen1, t) + perp * side;
    let final_ndc = (final_screen / u.resolution) * 2.0 - vec2<f32>(1.0, 1.0);

    // 1/w and z/w interpolate linearly in screen space.
    let w = 1.0 / mix(1.0 / clip0.w, 1.0 / clip1.w, t);
    let z = mix(clip0.z / clip0.w, clip1.z / clip1.w, t) * w;

    var out: LineOutput;
    out.pos = vec4<f32>(final_ndc * w, z, w);
    out.color = u.color;
    return out;
}

@fragment
fn fs_line(
    @location(0) color: vec4<f32>,
) -> @location(0) vec4<f32> {
    return color;
}
"#;

const BLIT_SHADER_SRC: &str = r#"
struct BlitOutput {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(
    @builtin(vertex_index) vert: u32,
) -> BlitOutput {
    // Fullscreen quad: 6 vertices, two triangles.
    var positions = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
    );
    var uvs = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 0.0),
    );

    var out: BlitOutput;
    out.pos = vec4<f32>(positions[vert], 0.0, 1.0);
    out.uv = uvs[vert];
    return out;
}

@group(0) @binding(0) var t_color: texture_2d<f32>;
@group(0) @binding(1) var s_color: sampler;

@fragment
fn fs_blit(
    @location(0) uv: vec2<f32>,
) -> @location(0) vec4<f32> {
    return textureSample(t_color, s_color, uv);
}
"#;

/// Vertices drawn per cube instance.
const CUBE_VERTICES: u32 = 36;

// ---------------------------------------------------------------------------
// Persistent GPU resources (stored once in CallbackResources)
// ---------------------------------------------------------------------------

pub struct ChartResources {
    pub cube_pipeline: wgpu::RenderPipeline,
    pub line_pipeline: wgpu::RenderPipeline,
    pub blit_pipeline: wgpu::RenderPipeline,
    pub scene_bind_group_layout: wgpu::BindGroupLayout,
    pub blit_bind_group_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
    /// Format of the render target. The offscreen color texture matches it
    /// so the scene pipelines can draw into both.
    pub target_format: wgpu::TextureFormat,
}

/// Blit bind group created in `prepare()` and consumed in `paint()`.
struct BlitState {
    blit_bind_group: wgpu::BindGroup,
}

/// Offscreen targets, recreated only when the viewport size changes.
pub struct CachedOffscreenTextures {
    pub color_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

fn scene_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs, fs): (&str, &str),
    target_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}

pub fn init_chart_resources(render_state: &egui_wgpu::RenderState) {
    let device = &render_state.device;
    let target_format = render_state.target_format;

    let cube_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("chart_cube_shader"),
        source: wgpu::ShaderSource::Wgsl(format!("{UNIFORMS_WGSL}{CUBE_SHADER_SRC}").into()),
    });
    let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("chart_line_shader"),
        source: wgpu::ShaderSource::Wgsl(format!("{UNIFORMS_WGSL}{LINE_SHADER_SRC}").into()),
    });
    let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("chart_blit_shader"),
        source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SRC.into()),
    });

    // Uniform + storage. The storage element type differs between the cube
    // and line shaders, so its minimum size is left to draw-time validation.
    let scene_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("chart_scene_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<ChartUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

    let blit_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("chart_blit_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

    let scene_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("chart_scene_pipeline_layout"),
        bind_group_layouts: &[&scene_bind_group_layout],
        push_constant_ranges: &[],
    });
    let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("chart_blit_pipeline_layout"),
        bind_group_layouts: &[&blit_bind_group_layout],
        push_constant_ranges: &[],
    });

    let cube_pipeline = scene_pipeline(
        device,
        "chart_cube_pipeline",
        &scene_pipeline_layout,
        &cube_shader,
        ("vs_cube", "fs_cube"),
        target_format,
    );
    let line_pipeline = scene_pipeline(
        device,
        "chart_line_pipeline",
        &scene_pipeline_layout,
        &line_shader,
        ("vs_line", "fs_line"),
        target_format,
    );

    let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("chart_blit_pipeline"),
        layout: Some(&blit_pipeline_layout),
        vertex: wgpu::VertexState {
            module: &blit_shader,
            entry_point: Some("vs_blit"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &blit_shader,
            entry_point: Some("fs_blit"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("chart_blit_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    render_state
        .renderer
        .write()
        .callback_resources
        .insert(ChartResources {
            cube_pipeline,
            line_pipeline,
            blit_pipeline,
            scene_bind_group_layout,
            blit_bind_group_layout,
            sampler,
            target_format,
        });
}

/// Storage buffer padded up to `min_len` bytes so an empty or short slice
/// still binds.
fn create_storage_buffer(device: &wgpu::Device, label: &str, data: &[u8], min_len: usize) -> wgpu::Buffer {
    if data.len() < min_len {
        let mut padded = vec![0u8; min_len];
        padded[..data.len()].copy_from_slice(data);
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: &padded,
            usage: wgpu::BufferUsages::STORAGE,
        })
    } else {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: data,
            usage: wgpu::BufferUsages::STORAGE,
        })
    }
}

fn scene_bind_group(
    device: &wgpu::Device,
    resources: &ChartResources,
    label: &str,
    uniforms: &ChartUniforms,
    storage: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(uniforms),
        usage: wgpu::BufferUsages::UNIFORM,
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &resources.scene_bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: storage.as_entire_binding(),
            },
        ],
    })
}

// ---------------------------------------------------------------------------
// Paint callback
// ---------------------------------------------------------------------------

pub struct ChartCallback {
    pub cubes: Vec<CubeInstance>,
    pub line_data: Vec<Line3DData>,
    pub uniforms_base: ChartUniforms,
    pub bg_color: [f32; 4],
    pub viewport_size: [u32; 2],
    blit_state: Mutex<Option<BlitState>>,
}

impl egui_wgpu::CallbackTrait for ChartCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        // Copy the format out first; `insert` below needs the resources mutably.
        let Some(target_format) = callback_resources
            .get::<ChartResources>()
            .map(|r| r.target_format)
        else {
            return Vec::new();
        };

        let width = self.viewport_size[0].max(1);
        let height = self.viewport_size[1].max(1);

        let needs_recreate = match callback_resources.get::<CachedOffscreenTextures>() {
            Some(cached) => {
                cached.width != width || cached.height != height || cached.format != target_format
            }
            None => true,
        };

        if needs_recreate {
            let size = wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            };
            let color_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("chart_offscreen_color"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: target_format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("chart_offscreen_depth"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Depth32Float,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            callback_resources.insert(CachedOffscreenTextures {
                color_view: color_texture.create_view(&wgpu::TextureViewDescriptor::default()),
                depth_view: depth_texture.create_view(&wgpu::TextureViewDescriptor::default()),
                width,
                height,
                format: target_format,
            });
        }

        let (Some(resources), Some(cached)) = (
            callback_resources.get::<ChartResources>(),
            callback_resources.get::<CachedOffscreenTextures>(),
        ) else {
            return Vec::new();
        };

        let mut uniforms = self.uniforms_base;
        uniforms.resolution = [width as f32, height as f32];

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("chart_offscreen_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &cached.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.bg_color[0] as f64,
                            g: self.bg_color[1] as f64,
                            b: self.bg_color[2] as f64,
                            a: self.bg_color[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &cached.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);

            // Floor grid first, then the cubes on top of it.
            for line in &self.line_data {
                if line.segments.len() < 2 {
                    continue;
                }
                let storage = create_storage_buffer(
                    device,
                    "chart_line_storage",
                    bytemuck::cast_slice(&line.segments),
                    16,
                );
                let mut line_uniforms = uniforms;
                line_uniforms.color = line.color;
                line_uniforms.line_width = line.line_width;
                let bind_group =
                    scene_bind_group(device, resources, "chart_line_bind_group", &line_uniforms, &storage);

                render_pass.set_pipeline(&resources.line_pipeline);
                render_pass.set_bind_group(0, &bind_group, &[]);
                render_pass.draw(0..6, 0..(line.segments.len() / 2) as u32);
            }

            if !self.cubes.is_empty() {
                let storage = create_storage_buffer(
                    device,
                    "chart_cube_storage",
                    bytemuck::cast_slice(&self.cubes),
                    std::mem::size_of::<CubeInstance>(),
                );
                let bind_group =
                    scene_bind_group(device, resources, "chart_cube_bind_group", &uniforms, &storage);

                render_pass.set_pipeline(&resources.cube_pipeline);
                render_pass.set_bind_group(0, &bind_group, &[]);
                render_pass.draw(0..CUBE_VERTICES, 0..self.cubes.len() as u32);
            }
        }

        let blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("chart_blit_bind_group"),
            layout: &resources.blit_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cached.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&resources.sampler),
                },
            ],
        });

        match self.blit_state.lock() {
            Ok(mut guard) => *guard = Some(BlitState { blit_bind_group }),
            Err(_) => tracing::warn!("Chart blit state lock poisoned, skipping frame"),
        }

        Vec::new()
    }

    fn paint(
        &self,
        info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        let Some(resources) = callback_resources.get::<ChartResources>() else {
            return;
        };
        let Ok(state_guard) = self.blit_state.lock() else {
            return;
        };
        let Some(state) = state_guard.as_ref() else {
            return;
        };

        let viewport = info.viewport_in_pixels();
        if viewport.width_px <= 0 || viewport.height_px <= 0 {
            return;
        }

        render_pass.set_viewport(
            viewport.left_px as f32,
            viewport.top_px as f32,
            viewport.width_px as f32,
            viewport.height_px as f32,
            0.0,
            1.0,
        );
        render_pass.set_pipeline(&resources.blit_pipeline);
        render_pass.set_bind_group(0, &state.blit_bind_group, &[]);
        render_pass.draw(0..6, 0..1);
    }
}

pub fn create_chart_paint_callback(
    rect: egui::Rect,
    cubes: Vec<CubeInstance>,
    line_data: Vec<Line3DData>,
    uniforms_base: ChartUniforms,
    bg_color: [f32; 4],
    viewport_size: [u32; 2],
) -> egui::PaintCallback {
    egui_wgpu::Callback::new_paint_callback(
        rect,
        ChartCallback {
            cubes,
            line_data,
            uniforms_base,
            bg_color,
            viewport_size,
            blit_state: Mutex::new(None),
        },
    )
}
