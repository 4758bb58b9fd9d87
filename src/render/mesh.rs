use crate::core::model::{Material, ModelAsset, Primitive, Texture, Vertex};
use web_sys::{WebGl2RenderingContext as GL, WebGlBuffer, WebGlTexture, WebGlVertexArrayObject};

pub struct GpuPrimitive {
    vao: WebGlVertexArrayObject,
    vbo: WebGlBuffer,
    ibo: WebGlBuffer,
    pub index_count: i32,
    pub material: Material,
}

impl GpuPrimitive {
    pub fn upload(gl: &GL, prim: &Primitive) -> anyhow::Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| anyhow::anyhow!("create_vertex_array failed"))?;
        let vbo = gl
            .create_buffer()
            .ok_or_else(|| anyhow::anyhow!("create_buffer failed"))?;
        let ibo = gl
            .create_buffer()
            .ok_or_else(|| anyhow::anyhow!("create_buffer failed"))?;
        gl.bind_vertex_array(Some(&vao));

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
        gl.buffer_data_with_u8_array(
            GL::ARRAY_BUFFER,
            bytemuck::cast_slice(&prim.vertices),
            GL::STATIC_DRAW,
        );
        let stride = std::mem::size_of::<Vertex>() as i32;
        for (loc, size, offset) in [(0u32, 3, 0), (1, 3, 12), (2, 2, 24)] {
            gl.enable_vertex_attrib_array(loc);
            gl.vertex_attrib_pointer_with_i32(loc, size, GL::FLOAT, false, stride, offset);
        }

        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&ibo));
        gl.buffer_data_with_u8_array(
            GL::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&prim.indices),
            GL::STATIC_DRAW,
        );
        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            vbo,
            ibo,
            index_count: prim.indices.len() as i32,
            material: prim.material.clone(),
        })
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_with_i32(GL::TRIANGLES, self.index_count, GL::UNSIGNED_INT, 0);
        gl.bind_vertex_array(None);
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vbo));
        gl.delete_buffer(Some(&self.ibo));
    }
}

fn upload_texture(gl: &GL, tex: &Texture) -> Option<WebGlTexture> {
    let handle = gl.create_texture()?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&handle));
    let res = gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        tex.width as i32,
        tex.height as i32,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(&tex.rgba),
    );
    if let Err(e) = res {
        log::warn!("[render] texture upload failed: {:?}", e);
        gl.delete_texture(Some(&handle));
        return None;
    }
    gl.generate_mipmap(GL::TEXTURE_2D);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR_MIPMAP_LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.bind_texture(GL::TEXTURE_2D, None);
    Some(handle)
}

/// GPU copies of one model's meshes and textures, indexed like the asset.
pub struct GpuModel {
    pub meshes: Vec<Vec<GpuPrimitive>>,
    pub textures: Vec<Option<WebGlTexture>>,
}

impl GpuModel {
    pub fn upload(gl: &GL, asset: &ModelAsset) -> anyhow::Result<Self> {
        let meshes = asset
            .meshes
            .iter()
            .map(|m| {
                m.primitives
                    .iter()
                    .map(|p| GpuPrimitive::upload(gl, p))
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let textures = asset
            .textures
            .iter()
            .map(|t| t.as_ref().and_then(|t| upload_texture(gl, t)))
            .collect();
        Ok(Self { meshes, textures })
    }

    pub fn delete(&self, gl: &GL) {
        for p in self.meshes.iter().flatten() {
            p.delete(gl);
        }
        for t in self.textures.iter().flatten() {
            gl.delete_texture(Some(t));
        }
    }
}
