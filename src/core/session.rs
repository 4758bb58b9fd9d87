use super::animation::AnimationMixer;
use super::catalog::{Catalog, CatalogError, ModelId};
use super::environment::EnvironmentMap;
use super::loader::{progress_ratio, LoadError, LoadRequest, LoadTicket, LoadTracker, ProgressIndicator};
use super::model::ModelAsset;
use super::placement::{PlacementController, SelectOutcome};
use super::platform::ViewerMode;
use super::scene::{ModelInstance, NodeId, SceneGraph, SceneNode};
use super::sound::{SoundAction, SoundBackend, SoundController, SoundRequest};
use glam::{Mat4, Vec3};
use std::rc::Rc;

/// What the host must do for `show(id)`.
#[derive(Clone, Debug, PartialEq)]
pub enum ShowAction {
    /// Activate a native viewer link to this URL.
    QuickLook { url: String },
    /// Fetch the model and report back with the ticket.
    Load(LoadRequest),
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// A newer request replaced this one; nothing changed.
    Stale,
    /// Logged; scene untouched.
    Failed,
    Attached {
        node: NodeId,
        /// Set when attaching also placed the model and its sound must be fetched.
        sound: Option<SoundRequest>,
    },
}

/// All per-session viewer state. Every mutation goes through these methods.
pub struct Session<S: SoundBackend, P: ProgressIndicator> {
    catalog: Catalog,
    mode: ViewerMode,
    scene: SceneGraph,
    placement: PlacementController,
    loads: LoadTracker,
    sound: SoundController<S>,
    progress: P,
    mixer: AnimationMixer,
    current_model: Option<ModelId>,
}

impl<S: SoundBackend, P: ProgressIndicator> Session<S, P> {
    pub fn new(catalog: Catalog, mode: ViewerMode, sound: S, mut progress: P) -> Result<Self, CatalogError> {
        catalog.validate()?;
        let mut scene = SceneGraph::new();
        let reticle = scene.add(SceneNode::reticle());
        progress.set_visible(false);
        Ok(Self {
            catalog,
            mode,
            scene,
            placement: PlacementController::new(reticle),
            loads: LoadTracker::default(),
            sound: SoundController::new(sound),
            progress,
            mixer: AnimationMixer::default(),
            current_model: None,
        })
    }

    #[inline]
    pub fn mode(&self) -> ViewerMode {
        self.mode
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    #[inline]
    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    #[inline]
    pub fn sound(&self) -> &SoundController<S> {
        &self.sound
    }

    #[inline]
    pub fn progress(&self) -> &P {
        &self.progress
    }

    #[inline]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[inline]
    pub fn current_model(&self) -> Option<ModelId> {
        self.current_model
    }

    pub fn set_environment(&mut self, env: EnvironmentMap) {
        self.scene.environment = Some(env);
    }

    // ---------------- Asset loading ----------------

    pub fn show(&mut self, id: ModelId) -> ShowAction {
        if self.mode == ViewerMode::QuickLook {
            let url = self.catalog.config.quick_look_url(id);
            log::info!("[session] quick look hand-off for model {}: {}", id, url);
            return ShowAction::QuickLook { url };
        }
        let (ticket, superseded) = self.loads.begin(id);
        self.progress.set_progress(0.0);
        self.progress.set_visible(true);
        let url = self.catalog.config.model_url(id);
        log::info!("[session] loading model {} from {} (#{})", id, url, ticket.get());
        ShowAction::Load(LoadRequest {
            ticket,
            model: id,
            url,
            superseded,
        })
    }

    pub fn load_progress(&mut self, ticket: LoadTicket, loaded: u64, total: Option<u64>) {
        if !self.loads.is_current(ticket) {
            return;
        }
        if let Some(ratio) = progress_ratio(loaded, total) {
            self.progress.set_progress(ratio);
        }
    }

    pub fn load_finished(&mut self, ticket: LoadTicket, result: Result<ModelAsset, LoadError>) -> LoadOutcome {
        let Some(id) = self.loads.finish(ticket) else {
            log::debug!("[session] ignoring superseded load #{}", ticket.get());
            return LoadOutcome::Stale;
        };
        self.progress.set_visible(false);
        let asset = match result {
            Ok(a) => a,
            Err(e) => {
                log::error!("[session] model {} failed to load: {}", id, e);
                return LoadOutcome::Failed;
            }
        };

        let clip_count = asset.clips.len();
        let mut node = SceneNode::model(ModelInstance::new(id, Rc::new(asset)));
        node.transform.scale = self.catalog.scale_for(id);
        let node_id = self.scene.add(node);
        if let Some(old) = self.placement.set_object(Some(node_id)) {
            self.scene.remove(old);
        }
        self.mixer = AnimationMixer::play_all(clip_count);
        self.current_model = Some(id);
        log::info!(
            "[session] model {} attached (scale {:?}, {} clips)",
            id,
            self.catalog.scale_for(id).to_array(),
            clip_count
        );

        let sound = if self.mode == ViewerMode::Inline {
            let outcome = self.placement.place_at(&mut self.scene, Vec3::ZERO);
            self.after_placement(outcome)
        } else {
            None
        };
        LoadOutcome::Attached {
            node: node_id,
            sound,
        }
    }

    // ---------------- Frame + placement ----------------

    /// Start of a frame; true when a hit-test source should be requested now.
    pub fn begin_frame(&mut self, in_xr_frame: bool) -> bool {
        self.placement.begin_frame(in_xr_frame)
    }

    pub fn hit_test_source_ready(&mut self) {
        self.placement.source_ready();
    }

    pub fn hit_test_source_failed(&mut self) {
        self.placement.source_failed();
    }

    #[inline]
    pub fn wants_hit_test_results(&self) -> bool {
        self.placement.wants_results()
    }

    pub fn update_reticle(&mut self, hit: Option<Mat4>) {
        self.placement.update_reticle(&mut self.scene, hit);
    }

    pub fn xr_session_ended(&mut self) {
        self.placement.session_ended(&mut self.scene);
    }

    /// Advance animation by wall-clock delta.
    pub fn advance(&mut self, dt_sec: f32) {
        let Some(node) = self.placement.object().and_then(|o| self.scene.get_mut(o)) else {
            return;
        };
        if let Some(ModelInstance { asset, pose, .. }) = node.instance_mut() {
            self.mixer.advance(dt_sec, &asset.clips, pose);
        }
    }

    /// A select input. Returns the outcome and, if needed, a sound to fetch.
    pub fn select(&mut self) -> (SelectOutcome, Option<SoundRequest>) {
        let outcome = self.placement.select(&mut self.scene);
        (outcome, self.after_placement(outcome))
    }

    fn after_placement(&mut self, outcome: SelectOutcome) -> Option<SoundRequest> {
        let SelectOutcome::Placed { position } = outcome else {
            return None;
        };
        let model = self.current_model?;
        log::info!(
            "[session] model {} placed at ({:.2},{:.2},{:.2})",
            model,
            position.x,
            position.y,
            position.z
        );
        match self.sound.on_placed(model, &self.catalog) {
            SoundAction::Load(req) => Some(req),
            _ => None,
        }
    }

    pub fn sound_ready(&mut self, ticket: LoadTicket, result: Result<S::Buffer, String>) -> bool {
        self.sound.on_buffer_ready(ticket, result)
    }

    pub fn shutdown(&mut self) {
        self.sound.shutdown();
    }
}
