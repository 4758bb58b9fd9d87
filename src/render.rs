use crate::constants::{HEMI_GROUND, HEMI_INTENSITY, HEMI_SKY, RETICLE_COLOR};
use crate::core::geometry;
use crate::core::model::{Material, ModelAsset};
use crate::core::scene::{NodeKind, SceneGraph};
use crate::core::{
    MESH_FRAG, MESH_VERT, RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS, RETICLE_SEGMENTS,
};
use glam::Mat4;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;
use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlUniformLocation};

mod helpers;
mod mesh;
use mesh::{GpuModel, GpuPrimitive};

/// One eye (XR) or the whole canvas (inline).
#[derive(Clone, Copy, Debug)]
pub struct ViewTarget {
    pub viewport: [i32; 4],
    pub view_proj: Mat4,
}

struct Uniforms {
    view_proj: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    base_color: Option<WebGlUniformLocation>,
    has_texture: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
    unlit: Option<WebGlUniformLocation>,
    has_env: Option<WebGlUniformLocation>,
    sh: Option<WebGlUniformLocation>,
    sky: Option<WebGlUniformLocation>,
    ground: Option<WebGlUniformLocation>,
    hemi_intensity: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, p: &WebGlProgram) -> Self {
        Self {
            view_proj: gl.get_uniform_location(p, "u_view_proj"),
            model: gl.get_uniform_location(p, "u_model"),
            base_color: gl.get_uniform_location(p, "u_base_color"),
            has_texture: gl.get_uniform_location(p, "u_has_texture"),
            texture: gl.get_uniform_location(p, "u_texture"),
            unlit: gl.get_uniform_location(p, "u_unlit"),
            has_env: gl.get_uniform_location(p, "u_has_env"),
            sh: gl.get_uniform_location(p, "u_sh"),
            sky: gl.get_uniform_location(p, "u_sky"),
            ground: gl.get_uniform_location(p, "u_ground"),
            hemi_intensity: gl.get_uniform_location(p, "u_hemi_intensity"),
        }
    }
}

pub struct Renderer {
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    reticle: GpuPrimitive,
    cached: Option<(Rc<ModelAsset>, GpuModel)>,
}

impl Renderer {
    /// WebGL2 context flagged XR-compatible so a session can render into it.
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let opts = js_sys::Object::new();
        for (k, v) in [("xrCompatible", true), ("alpha", true), ("antialias", true)] {
            _ = js_sys::Reflect::set(&opts, &k.into(), &JsValue::from_bool(v));
        }
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &opts)
            .map_err(|e| anyhow::anyhow!("webgl2 context: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("webgl2 unavailable"))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let program = helpers::link_program(&gl, MESH_VERT, MESH_FRAG)?;
        let uniforms = Uniforms::locate(&gl, &program);
        let ring = geometry::ring(RETICLE_INNER_RADIUS, RETICLE_OUTER_RADIUS, RETICLE_SEGMENTS);
        let reticle = GpuPrimitive::upload(&gl, &ring)?;
        Ok(Self {
            gl,
            program,
            uniforms,
            reticle,
            cached: None,
        })
    }

    #[inline]
    pub fn gl(&self) -> &GL {
        &self.gl
    }

    // Keep exactly one model resident on the GPU.
    fn ensure_model(&mut self, asset: &Rc<ModelAsset>) -> bool {
        if let Some((cached, _)) = &self.cached {
            if Rc::ptr_eq(cached, asset) {
                return true;
            }
        }
        if let Some((_, old)) = self.cached.take() {
            old.delete(&self.gl);
        }
        match GpuModel::upload(&self.gl, asset) {
            Ok(gpu) => {
                self.cached = Some((asset.clone(), gpu));
                true
            }
            Err(e) => {
                log::error!("[render] model upload failed: {:?}", e);
                false
            }
        }
    }

    fn set_material(&self, m: &Material, textures: &[Option<web::WebGlTexture>], unlit: bool) {
        let gl = &self.gl;
        let u = &self.uniforms;
        gl.uniform4fv_with_f32_array(u.base_color.as_ref(), &m.base_color);
        gl.uniform1i(u.unlit.as_ref(), unlit as i32);
        let tex = m
            .base_color_texture
            .and_then(|i| textures.get(i))
            .and_then(|t| t.as_ref());
        gl.uniform1i(u.has_texture.as_ref(), tex.is_some() as i32);
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, tex);
        gl.uniform1i(u.texture.as_ref(), 0);
        if m.double_sided {
            gl.disable(GL::CULL_FACE);
        } else {
            gl.enable(GL::CULL_FACE);
        }
    }

    /// Draw `scene` once per view into `framebuffer` (`None` = canvas).
    pub fn render(
        &mut self,
        scene: &SceneGraph,
        framebuffer: Option<&web::WebGlFramebuffer>,
        views: &[ViewTarget],
        clear: [f32; 4],
    ) {
        let model_asset = scene
            .iter()
            .filter(|(_, n)| n.visible)
            .find_map(|(_, n)| n.instance().map(|i| i.asset.clone()));
        let model_ready = match &model_asset {
            Some(a) => self.ensure_model(a),
            None => false,
        };

        let gl = &self.gl;
        gl.bind_framebuffer(GL::FRAMEBUFFER, framebuffer);
        gl.clear_color(clear[0], clear[1], clear[2], clear[3]);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.enable(GL::DEPTH_TEST);
        gl.use_program(Some(&self.program));

        let u = &self.uniforms;
        gl.uniform3fv_with_f32_array(u.sky.as_ref(), &HEMI_SKY);
        gl.uniform3fv_with_f32_array(u.ground.as_ref(), &HEMI_GROUND);
        gl.uniform1f(u.hemi_intensity.as_ref(), HEMI_INTENSITY);
        match &scene.environment {
            Some(env) => {
                gl.uniform1i(u.has_env.as_ref(), 1);
                gl.uniform3fv_with_f32_array(u.sh.as_ref(), &env.uniform_array());
            }
            None => gl.uniform1i(u.has_env.as_ref(), 0),
        }

        for view in views {
            let [x, y, w, h] = view.viewport;
            gl.viewport(x, y, w, h);
            gl.uniform_matrix4fv_with_f32_array(
                u.view_proj.as_ref(),
                false,
                &view.view_proj.to_cols_array(),
            );
            for (_, node) in scene.iter().filter(|(_, n)| n.visible) {
                match &node.kind {
                    NodeKind::Reticle => {
                        gl.uniform_matrix4fv_with_f32_array(
                            u.model.as_ref(),
                            false,
                            &node.world_matrix().to_cols_array(),
                        );
                        let mat = Material {
                            base_color: RETICLE_COLOR,
                            ..self.reticle.material.clone()
                        };
                        self.set_material(&mat, &[], true);
                        self.reticle.draw(gl);
                    }
                    NodeKind::Model(inst) if model_ready => {
                        let Some((_, gpu)) = &self.cached else { continue };
                        let root = node.world_matrix();
                        let mut stack: Vec<(usize, Mat4)> =
                            inst.asset.roots.iter().map(|&r| (r, root)).collect();
                        // A well-formed hierarchy visits each node once; bail on cycles.
                        let mut budget = inst.asset.nodes.len();
                        while let Some((idx, parent)) = stack.pop() {
                            if budget == 0 {
                                break;
                            }
                            budget -= 1;
                            let (Some(n), Some(local)) = (inst.asset.nodes.get(idx), inst.pose.get(idx))
                            else {
                                continue;
                            };
                            let world = parent * local.matrix();
                            if let Some(prims) = n.mesh.and_then(|m| gpu.meshes.get(m)) {
                                gl.uniform_matrix4fv_with_f32_array(
                                    u.model.as_ref(),
                                    false,
                                    &world.to_cols_array(),
                                );
                                for p in prims {
                                    self.set_material(&p.material, &gpu.textures, false);
                                    p.draw(gl);
                                }
                            }
                            stack.extend(n.children.iter().map(|&c| (c, world)));
                        }
                    }
                    NodeKind::Model(_) => {}
                }
            }
        }
        gl.bind_texture(GL::TEXTURE_2D, None);
    }
}
