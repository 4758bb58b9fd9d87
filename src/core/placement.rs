use super::scene::{NodeId, SceneGraph};
use glam::{Mat4, Vec3};

/// Lifecycle of the per-session hit-test source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HitTestSourceState {
    #[default]
    Unrequested,
    Requested,
    Ready,
}

/// What a select input did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectOutcome {
    /// Nothing loaded yet; nothing to place.
    NoModel,
    /// Reticle hidden; the model stays where it was.
    NoSurface,
    Placed { position: Vec3 },
}

/// Drives the reticle from hit-test results and commits the model on select.
#[derive(Debug)]
pub struct PlacementController {
    reticle: NodeId,
    object: Option<NodeId>,
    source: HitTestSourceState,
}

impl PlacementController {
    pub fn new(reticle: NodeId) -> Self {
        Self {
            reticle,
            object: None,
            source: HitTestSourceState::Unrequested,
        }
    }

    #[inline]
    pub fn reticle(&self) -> NodeId {
        self.reticle
    }

    #[inline]
    pub fn object(&self) -> Option<NodeId> {
        self.object
    }

    /// Point placement at a freshly loaded object; returns the one it replaces.
    pub fn set_object(&mut self, object: Option<NodeId>) -> Option<NodeId> {
        std::mem::replace(&mut self.object, object)
    }

    #[inline]
    pub fn source_state(&self) -> HitTestSourceState {
        self.source
    }

    /// Called at the top of every frame. Returns true exactly once per XR
    /// session, when the caller should request a hit-test source.
    pub fn begin_frame(&mut self, in_xr_frame: bool) -> bool {
        if in_xr_frame && self.source == HitTestSourceState::Unrequested {
            self.source = HitTestSourceState::Requested;
            return true;
        }
        false
    }

    pub fn source_ready(&mut self) {
        if self.source == HitTestSourceState::Requested {
            self.source = HitTestSourceState::Ready;
        }
    }

    /// The source request failed; stay requested so it is not retried every frame.
    pub fn source_failed(&mut self) {
        log::warn!("[placement] hit-test source unavailable; surface detection disabled");
    }

    /// XR session ended: forget the source and hide the reticle.
    pub fn session_ended(&mut self, scene: &mut SceneGraph) {
        self.source = HitTestSourceState::Unrequested;
        if let Some(r) = scene.get_mut(self.reticle) {
            r.visible = false;
        }
    }

    #[inline]
    pub fn wants_results(&self) -> bool {
        self.source == HitTestSourceState::Ready
    }

    /// Apply this frame's hit-test result (first hit pose, if any).
    pub fn update_reticle(&mut self, scene: &mut SceneGraph, hit: Option<Mat4>) {
        if let Some(r) = scene.get_mut(self.reticle) {
            match hit {
                Some(pose) => {
                    r.matrix = Some(pose);
                    r.visible = true;
                }
                None => r.visible = false,
            }
        }
    }

    pub fn reticle_visible(&self, scene: &SceneGraph) -> bool {
        scene.get(self.reticle).map(|r| r.visible).unwrap_or(false)
    }

    /// Handle a select input.
    pub fn select(&mut self, scene: &mut SceneGraph) -> SelectOutcome {
        let Some(object) = self.object else {
            return SelectOutcome::NoModel;
        };
        let pose = match scene.get(self.reticle) {
            Some(r) if r.visible => r.world_matrix(),
            _ => return SelectOutcome::NoSurface,
        };
        let position = pose.w_axis.truncate();
        match scene.get_mut(object) {
            Some(node) => {
                node.transform.translation = position;
                node.visible = true;
                SelectOutcome::Placed { position }
            }
            None => SelectOutcome::NoModel,
        }
    }

    /// Inline viewer: show the object at `position` without a surface.
    pub fn place_at(&mut self, scene: &mut SceneGraph, position: Vec3) -> SelectOutcome {
        let Some(node) = self.object.and_then(|o| scene.get_mut(o)) else {
            return SelectOutcome::NoModel;
        };
        node.transform.translation = position;
        node.visible = true;
        SelectOutcome::Placed { position }
    }
}
