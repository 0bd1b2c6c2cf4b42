//! Drawing the scene.
//!
//! [`SceneRenderer`] mirrors the [`Scene`] on the GPU. Every frame it uploads
//! geometries it has not seen yet, frees the ones the scene dropped and, when the
//! scene changed, rewrites the instance buffer. Drawing then walks a list of
//! [`Instanced`] draws, one per non-empty mesh.
//!
//! # Key types
//!
//! - [`SceneRenderer`] owns the pipeline, the matcap bind groups and the GPU meshes
//! - [`Instanced<'a>`] is a single draw: mesh, matcap and instance index

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        model::{DrawModel, GpuMesh},
        scene_graph::{GeometryId, Scene},
        texture::{PLACEHOLDER_RGBA, Texture},
    },
    pipelines::matcap::mk_matcap_pipeline,
    resources::texture::{matcap_bind_group, matcap_layout},
    theme::Theme,
};

/// One draw call: `mesh` with the transform at `instance` in the instance buffer.
pub struct Instanced<'a> {
    pub mesh: &'a GpuMesh,
    pub matcap: &'a wgpu::BindGroup,
    pub instance: u32,
}

pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    matcaps: HashMap<Theme, wgpu::BindGroup>,
    meshes: HashMap<GeometryId, GpuMesh>,
    instance_buffer: wgpu::Buffer,
    instance_count: usize,
    buffer_size_needs_change: bool,
}

impl SceneRenderer {
    /// `matcaps` should hold a texture for every theme; missing ones render grey.
    pub fn new(ctx: &Context, matcaps: &HashMap<Theme, Texture>) -> Self {
        let matcap_layout = matcap_layout(&ctx.device);
        let pipeline = mk_matcap_pipeline(
            &ctx.device,
            &ctx.config,
            &matcap_layout,
            &ctx.camera.bind_group_layout,
        );

        let matcaps = Theme::ALL
            .iter()
            .map(|theme| {
                let label = format!("{} matcap bind group", theme);
                let group = match matcaps.get(theme) {
                    Some(texture) => matcap_bind_group(&ctx.device, &matcap_layout, texture, &label),
                    None => {
                        log::warn!("no texture for theme {}, using a placeholder", theme);
                        let placeholder =
                            Texture::solid(&ctx.device, &ctx.queue, PLACEHOLDER_RGBA, theme.id());
                        matcap_bind_group(&ctx.device, &matcap_layout, &placeholder, &label)
                    }
                };
                (*theme, group)
            })
            .collect();

        let instance_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: &[],
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            pipeline,
            matcaps,
            meshes: HashMap::new(),
            instance_buffer,
            instance_count: 0,
            buffer_size_needs_change: true,
        }
    }

    /// Bring GPU buffers in line with `scene`.
    pub fn sync(&mut self, ctx: &Context, scene: &mut Scene) {
        if !scene.take_dirty() {
            return;
        }

        self.meshes.retain(|id, _| scene.geometry(*id).is_some());
        for id in scene.geometry_ids() {
            if self.meshes.contains_key(&id) {
                continue;
            }
            if let Some(geometry) = scene.geometry(id) {
                let mesh = GpuMesh::new(&ctx.device, &format!("{:?}", id), geometry);
                self.meshes.insert(id, mesh);
            }
        }

        let raw_instances: Vec<InstanceRaw> = scene
            .meshes()
            .iter()
            .map(|mesh| mesh.transform.to_raw())
            .collect();
        if raw_instances.len() != self.instance_count {
            self.buffer_size_needs_change = true;
            self.instance_count = raw_instances.len();
        }
        if self.buffer_size_needs_change {
            self.instance_buffer = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Instance Buffer"),
                    contents: bytemuck::cast_slice(&raw_instances),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
            self.buffer_size_needs_change = false;
        } else if !raw_instances.is_empty() {
            ctx.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw_instances));
        }
        log::debug!(
            "synced {} meshes over {} geometries",
            self.instance_count,
            self.meshes.len()
        );
    }

    /// Draws for every mesh that has something to draw.
    pub fn draws<'a>(&'a self, scene: &Scene) -> Vec<Instanced<'a>> {
        scene
            .meshes()
            .iter()
            .enumerate()
            .filter_map(|(idx, mesh)| {
                let gpu_mesh = self.meshes.get(&mesh.geometry)?;
                if gpu_mesh.num_elements == 0 || idx >= self.instance_count {
                    return None;
                }
                Some(Instanced {
                    mesh: gpu_mesh,
                    matcap: self.matcaps.get(&mesh.material.matcap)?,
                    instance: idx as u32,
                })
            })
            .collect()
    }

    pub fn render(&self, ctx: &Context, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let draws = self.draws(scene);
            if !draws.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                for draw in draws {
                    render_pass.draw_mesh_instanced(
                        draw.mesh,
                        draw.instance..draw.instance + 1,
                        draw.matcap,
                        &ctx.camera.bind_group,
                    );
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
