use super::animation::{AnimationClip, Channel, Interpolation, Keyframes};
use super::transform::Transform;
use glam::{Quat, Vec3};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    /// Index into `ModelAsset::textures`.
    pub base_color_texture: Option<usize>,
    pub metallic: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic: 1.0,
            roughness: 1.0,
            double_sided: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Primitive {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

/// Decoded RGBA8 image.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: String,
    pub local: Transform,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
}

/// Everything the viewer needs from one `.glb` file.
#[derive(Clone, Debug, Default)]
pub struct ModelAsset {
    pub nodes: Vec<ModelNode>,
    pub roots: Vec<usize>,
    pub meshes: Vec<Mesh>,
    /// Indexed like the file's images; `None` when an image failed to decode.
    pub textures: Vec<Option<Texture>>,
    pub clips: Vec<AnimationClip>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("gltf: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glb has no binary chunk")]
    MissingBlob,
    #[error("external resource {0:?} is not supported")]
    ExternalUri(String),
    #[error("mesh {mesh} primitive {primitive} has no positions")]
    MissingPositions { mesh: usize, primitive: usize },
    #[error("buffer view out of range")]
    ViewOutOfRange,
    #[error("model has no nodes")]
    Empty,
    #[error("animation {animation} channel {channel}: keyframe times must be finite and ascending")]
    BadKeyframes { animation: usize, channel: usize },
}

impl ModelAsset {
    /// Decode a binary glTF container.
    pub fn from_glb(bytes: &[u8]) -> Result<Self, ModelError> {
        let gltf = gltf::Gltf::from_slice(bytes)?;
        let buffers = load_buffers(&gltf)?;
        let get = |b: gltf::Buffer<'_>| buffers.get(b.index()).map(Vec::as_slice);

        let mut meshes = Vec::new();
        for mesh in gltf.meshes() {
            let mut out = Mesh::default();
            for prim in mesh.primitives() {
                if prim.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "[model] mesh {} primitive {}: skipping non-triangle mode {:?}",
                        mesh.index(),
                        prim.index(),
                        prim.mode()
                    );
                    continue;
                }
                let reader = prim.reader(get);
                let positions: Vec<[f32; 3]> = reader
                    .read_positions()
                    .ok_or(ModelError::MissingPositions {
                        mesh: mesh.index(),
                        primitive: prim.index(),
                    })?
                    .collect();
                let normals: Vec<[f32; 3]> = reader
                    .read_normals()
                    .map(|n| n.collect())
                    .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);
                let uvs: Vec<[f32; 2]> = reader
                    .read_tex_coords(0)
                    .map(|t| t.into_f32().collect())
                    .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);
                let vertices = positions
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Vertex {
                        position: *p,
                        normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                        uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                    })
                    .collect::<Vec<_>>();
                let indices = match reader.read_indices() {
                    Some(ix) => ix.into_u32().collect(),
                    None => (0..vertices.len() as u32).collect(),
                };
                out.primitives.push(Primitive {
                    vertices,
                    indices,
                    material: convert_material(&prim.material()),
                });
            }
            meshes.push(out);
        }

        let textures = gltf
            .images()
            .map(|img| decode_image(&img, &buffers))
            .collect::<Result<Vec<_>, _>>()?;

        let nodes: Vec<ModelNode> = gltf
            .nodes()
            .map(|n| {
                let (t, r, s) = n.transform().decomposed();
                ModelNode {
                    name: n.name().unwrap_or_default().to_string(),
                    local: Transform {
                        translation: Vec3::from(t),
                        rotation: Quat::from_array(r),
                        scale: Vec3::from(s),
                    },
                    mesh: n.mesh().map(|m| m.index()),
                    children: n.children().map(|c| c.index()).collect(),
                }
            })
            .collect();
        if nodes.is_empty() {
            return Err(ModelError::Empty);
        }

        let roots = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => scene.nodes().map(|n| n.index()).collect(),
            None => orphan_nodes(&nodes),
        };

        let mut clips = Vec::new();
        for (i, anim) in gltf.animations().enumerate() {
            let mut channels = Vec::new();
            for ch in anim.channels() {
                if let Some(channel) = convert_channel(&ch, &get) {
                    if !times_ascending(&channel.times) {
                        return Err(ModelError::BadKeyframes {
                            animation: i,
                            channel: ch.index(),
                        });
                    }
                    channels.push(channel);
                }
            }
            let name = anim
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("clip{}", i));
            clips.push(AnimationClip::new(name, channels));
        }

        Ok(Self {
            nodes,
            roots,
            meshes,
            textures,
            clips,
        })
    }

    /// Initial per-node pose for a fresh instance.
    pub fn rest_pose(&self) -> Vec<Transform> {
        self.nodes.iter().map(|n| n.local).collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes
            .iter()
            .flat_map(|m| &m.primitives)
            .map(|p| p.indices.len() / 3)
            .sum()
    }
}

fn load_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>, ModelError> {
    let mut out = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().ok_or(ModelError::MissingBlob)?;
                out.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                return Err(ModelError::ExternalUri(uri.to_string()));
            }
        }
    }
    Ok(out)
}

fn decode_image(img: &gltf::Image<'_>, buffers: &[Vec<u8>]) -> Result<Option<Texture>, ModelError> {
    let bytes = match img.source() {
        gltf::image::Source::View { view, .. } => {
            let buf = buffers
                .get(view.buffer().index())
                .ok_or(ModelError::ViewOutOfRange)?;
            let end = view.offset() + view.length();
            buf.get(view.offset()..end)
                .ok_or(ModelError::ViewOutOfRange)?
        }
        gltf::image::Source::Uri { uri, .. } => {
            return Err(ModelError::ExternalUri(uri.to_string()));
        }
    };
    match image::load_from_memory(bytes) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            Ok(Some(Texture {
                width: rgba.width(),
                height: rgba.height(),
                rgba: rgba.into_raw(),
            }))
        }
        Err(e) => {
            log::warn!("[model] image {} not decoded: {}", img.index(), e);
            Ok(None)
        }
    }
}

fn convert_material(m: &gltf::Material<'_>) -> Material {
    let pbr = m.pbr_metallic_roughness();
    Material {
        base_color: pbr.base_color_factor(),
        base_color_texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index()),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        double_sided: m.double_sided(),
    }
}

fn convert_channel<'a, 's, F>(ch: &gltf::animation::Channel<'a>, get: &F) -> Option<Channel>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    use gltf::animation::util::ReadOutputs;

    let reader = ch.reader(get.clone());
    let times: Vec<f32> = reader.read_inputs()?.collect();
    let cubic = ch.sampler().interpolation() == gltf::animation::Interpolation::CubicSpline;
    let interpolation = match ch.sampler().interpolation() {
        gltf::animation::Interpolation::Step => Interpolation::Step,
        _ => Interpolation::Linear,
    };
    let values = match reader.read_outputs()? {
        ReadOutputs::Translations(it) => {
            Keyframes::Translation(keyframe_values(it.map(Vec3::from), cubic))
        }
        ReadOutputs::Rotations(it) => {
            Keyframes::Rotation(keyframe_values(it.into_f32().map(Quat::from_array), cubic))
        }
        ReadOutputs::Scales(it) => Keyframes::Scale(keyframe_values(it.map(Vec3::from), cubic)),
        ReadOutputs::MorphTargetWeights(_) => return None,
    };
    Some(Channel {
        node: ch.target().node().index(),
        times,
        values,
        interpolation,
    })
}

fn times_ascending(times: &[f32]) -> bool {
    times.iter().all(|t| t.is_finite()) && times.windows(2).all(|w| w[0] <= w[1])
}

// Cubic-spline outputs are (in-tangent, value, out-tangent) triples; keep the values.
fn keyframe_values<T>(it: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        it.skip(1).step_by(3).collect()
    } else {
        it.collect()
    }
}

fn orphan_nodes(nodes: &[ModelNode]) -> Vec<usize> {
    let mut is_child = vec![false; nodes.len()];
    for n in nodes {
        for &c in &n.children {
            if let Some(flag) = is_child.get_mut(c) {
                *flag = true;
            }
        }
    }
    (0..nodes.len()).filter(|&i| !is_child[i]).collect()
}
