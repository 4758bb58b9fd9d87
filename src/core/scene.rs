use super::catalog::ModelId;
use super::environment::EnvironmentMap;
use super::model::ModelAsset;
use super::transform::Transform;
use fnv::FnvHashMap;
use glam::Mat4;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A loaded model attached to the scene, with its own animated pose.
#[derive(Clone, Debug)]
pub struct ModelInstance {
    pub model: ModelId,
    pub asset: Rc<ModelAsset>,
    pub pose: Vec<Transform>,
}

impl ModelInstance {
    pub fn new(model: ModelId, asset: Rc<ModelAsset>) -> Self {
        let pose = asset.rest_pose();
        Self { model, asset, pose }
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Reticle,
    Model(ModelInstance),
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub transform: Transform,
    /// When set, used verbatim instead of `transform` (the reticle follows raw hit poses).
    pub matrix: Option<Mat4>,
    pub visible: bool,
}

impl SceneNode {
    pub fn reticle() -> Self {
        Self {
            kind: NodeKind::Reticle,
            transform: Transform::IDENTITY,
            matrix: Some(Mat4::IDENTITY),
            visible: false,
        }
    }

    pub fn model(instance: ModelInstance) -> Self {
        Self {
            kind: NodeKind::Model(instance),
            transform: Transform::IDENTITY,
            matrix: None,
            visible: false,
        }
    }

    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        self.matrix.unwrap_or_else(|| self.transform.matrix())
    }

    pub fn instance(&self) -> Option<&ModelInstance> {
        match &self.kind {
            NodeKind::Model(m) => Some(m),
            NodeKind::Reticle => None,
        }
    }

    pub fn instance_mut(&mut self) -> Option<&mut ModelInstance> {
        match &mut self.kind {
            NodeKind::Model(m) => Some(m),
            NodeKind::Reticle => None,
        }
    }
}

/// Flat scene: a handful of top-level nodes drawn in insertion order.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: FnvHashMap<NodeId, SceneNode>,
    order: Vec<NodeId>,
    next_id: u32,
    pub environment: Option<EnvironmentMap>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id)?;
        self.order.retain(|&o| o != id);
        Some(node)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.nodes.get(id).map(|n| (*id, n)))
    }

    pub fn model_count(&self) -> usize {
        self.iter().filter(|(_, n)| n.instance().is_some()).count()
    }
}
