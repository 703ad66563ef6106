use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::texture::{self, ImageHint, Texture, TextureError};
use crate::render::{RenderCtx, RenderTarget};

/// Blend state applied to subsequent draws in a [`QuadPass`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum BlendMode {
    /// Color replaces the target; zero-alpha texels are discarded.
    #[default]
    Opaque,
    /// `SrcAlpha, OneMinusSrcAlpha`.
    Alpha,
}

// ── geometry ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// Image row 0 is the top edge, so v runs opposite to +Y.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [1.0, -1.0], uv: [1.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [-1.0, 1.0], uv: [0.0, 0.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct QuadInstance {
    mvp: [[f32; 4]; 4], // column-major
    tint: [f32; 4],
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4, // mvp col 0
        3 => Float32x4, // mvp col 1
        4 => Float32x4, // mvp col 2
        5 => Float32x4, // mvp col 3
        6 => Float32x4  // tint
    ];

    fn new(mvp: Mat4, tint: Color) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            tint: tint.to_array(),
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

// ── pass ──────────────────────────────────────────────────────────────────

/// A recorded quad draw.
#[derive(Debug)]
struct QuadDraw<'t> {
    texture: &'t Texture,
    blend: BlendMode,
    instance: QuadInstance,
}

/// Scope opened by [`QuadRenderer::pre_render`].
///
/// Mirrors a fixed-function bind/draw sequence without ambient state: the
/// caller binds a texture and picks a blend mode, then every `render` call
/// records one quad with its own model-view-projection matrix. Nothing reaches
/// the GPU until [`QuadRenderer::post_render`].
#[derive(Debug, Default)]
pub struct QuadPass<'t> {
    texture: Option<&'t Texture>,
    blend: BlendMode,
    tint: Color,
    draws: Vec<QuadDraw<'t>>,
    skipped: usize,
}

impl<'t> QuadPass<'t> {
    pub fn bind_texture(&mut self, texture: &'t Texture) {
        self.texture = Some(texture);
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    /// Color multiplied with each texel. Defaults to white.
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    /// Records one quad under `mvp` with the currently bound state.
    ///
    /// Without a bound texture the draw is dropped.
    pub fn render(&mut self, mvp: Mat4) {
        let Some(texture) = self.texture else {
            self.skipped += 1;
            return;
        };

        self.draws.push(QuadDraw {
            texture,
            blend: self.blend,
            instance: QuadInstance::new(mvp, self.tint),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Textured-quad renderer.
///
/// Owns exactly one unit-quad vertex/index buffer pair, created once in
/// [`setup`](Self::setup) and shared by every draw. Per-draw transforms and
/// tints travel as instance data; a frame-scoped cursor keeps several passes
/// in one frame from overwriting each other's instances.
pub struct QuadRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline_opaque: Option<wgpu::RenderPipeline>,
    pipeline_alpha: Option<wgpu::RenderPipeline>,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instance_cursor: usize,

    warned_unbound: bool,
}

impl QuadRenderer {
    /// Creates the shared quad geometry, texture layout and sampler.
    pub fn setup(ctx: &RenderCtx<'_>) -> Self {
        let texture_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("stardrift quad texture bgl"),
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

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("stardrift quad sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("stardrift quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("stardrift quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("quad renderer ready");

        let mut renderer = Self {
            pipeline_format: None,
            pipeline_opaque: None,
            pipeline_alpha: None,
            texture_layout,
            sampler,
            quad_vbo,
            quad_ibo,
            instance_vbo: None,
            instance_capacity: 0,
            instance_cursor: 0,
            warned_unbound: false,
        };
        renderer.ensure_pipelines(ctx);
        renderer
    }

    /// Decodes `path` and uploads it as a texture for this renderer.
    ///
    /// Oversized images are shrunk to the device's 2D texture limit.
    pub fn load_texture(
        &self,
        ctx: &RenderCtx<'_>,
        path: &Path,
        hint: ImageHint,
    ) -> Result<Texture, TextureError> {
        let img = texture::decode(path, hint)?;
        let img = texture::fit_to_limit(img, ctx.device.limits().max_texture_dimension_2d);
        let texture = self.texture_from_image(ctx, &img, &path.display().to_string())?;
        log::info!("loaded texture {} ({}x{})", path.display(), img.width(), img.height());
        Ok(texture)
    }

    /// Uploads an in-memory image as a texture for this renderer.
    pub fn texture_from_image(
        &self,
        ctx: &RenderCtx<'_>,
        img: &image::RgbaImage,
        label: &str,
    ) -> Result<Texture, TextureError> {
        texture::upload(ctx.device, ctx.queue, &self.texture_layout, &self.sampler, img, label)
    }

    /// Resets the per-frame instance cursor. Call once before the frame's first pass.
    pub fn begin_frame(&mut self) {
        self.instance_cursor = 0;
    }

    /// Opens a pass that binds the shared quad geometry.
    pub fn pre_render<'t>(&self) -> QuadPass<'t> {
        QuadPass::default()
    }

    /// Uploads the pass's instances and records its draws into `target`.
    pub fn post_render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        pass: QuadPass<'_>,
    ) {
        if pass.skipped > 0 && !self.warned_unbound {
            log::debug!("QuadRenderer: {} draw(s) issued with no texture bound", pass.skipped);
            self.warned_unbound = true;
        }

        if pass.is_empty() {
            return;
        }

        // Mutating methods must happen before borrowing pipelines/buffers immutably.
        self.ensure_pipelines(ctx);
        self.ensure_instance_capacity(ctx, pass.draws.len());

        let base = self.instance_cursor;
        self.instance_cursor += pass.draws.len();

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };

        let raw: Vec<QuadInstance> = pass.draws.iter().map(|d| d.instance).collect();
        let stride = std::mem::size_of::<QuadInstance>() as u64;
        ctx.queue
            .write_buffer(instance_vbo, base as u64 * stride, bytemuck::cast_slice(&raw));

        let Some(opaque) = self.pipeline_opaque.as_ref() else { return };
        let Some(alpha) = self.pipeline_alpha.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("stardrift quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        let mut bound_blend = None;
        for (i, draw) in pass.draws.iter().enumerate() {
            if bound_blend != Some(draw.blend) {
                rpass.set_pipeline(match draw.blend {
                    BlendMode::Opaque => opaque,
                    BlendMode::Alpha => alpha,
                });
                bound_blend = Some(draw.blend);
            }
            rpass.set_bind_group(0, &draw.texture.bind_group, &[]);

            let instance = (base + i) as u32;
            rpass.draw_indexed(0..6, 0, instance..instance + 1);
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format)
            && self.pipeline_opaque.is_some()
            && self.pipeline_alpha.is_some()
        {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stardrift quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("stardrift quad pipeline layout"),
                    bind_group_layouts: &[&self.texture_layout],
                    immediate_size: 0,
                });

        let build = |label: &str, blend: Option<wgpu::BlendState>| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[QuadVertex::layout(), QuadInstance::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    // Negative scales mirror sprites; keep both windings.
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        let opaque = build("stardrift quad pipeline (opaque)", None);
        let alpha = build(
            "stardrift quad pipeline (alpha)",
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline_opaque = Some(opaque);
        self.pipeline_alpha = Some(alpha);
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, additional: usize) {
        let required = self.instance_cursor + additional;
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        // Passes already recorded this frame keep the old buffer alive; the
        // new one starts empty.
        let new_cap = additional.max(required).next_power_of_two().max(64);
        let new_size = (new_cap * std::mem::size_of::<QuadInstance>()) as u64;

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("stardrift quad instance vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
        self.instance_cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn instance_stores_columns_in_order() {
        let mvp = Mat4::from_translation(Vec3::new(2.0, 3.0, 0.0));
        let inst = QuadInstance::new(mvp, Color::WHITE);
        assert_eq!(inst.mvp[3], [2.0, 3.0, 0.0, 1.0]);
        assert_eq!(inst.tint, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn instance_layout_matches_struct_size() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 80);
        assert_eq!(QuadInstance::layout().array_stride, 80);
    }

    #[test]
    fn quad_covers_unit_square_with_flipped_v() {
        let top_left = QUAD_VERTICES[3];
        assert_eq!(top_left.pos, [-1.0, 1.0]);
        assert_eq!(top_left.uv, [0.0, 0.0]);
        assert_eq!(QUAD_INDICES.len(), 6);
    }

    #[test]
    fn render_without_texture_is_dropped() {
        let mut pass = QuadPass::default();
        pass.set_blend(BlendMode::Alpha);
        pass.render(Mat4::IDENTITY);
        assert!(pass.is_empty());
        assert_eq!(pass.skipped, 1);
    }

    #[test]
    fn blend_defaults_to_opaque() {
        assert_eq!(BlendMode::default(), BlendMode::Opaque);
        assert_eq!(QuadPass::default().tint, Color::WHITE);
    }
}
