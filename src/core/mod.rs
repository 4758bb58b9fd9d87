pub mod animation;
pub mod catalog;
pub mod constants;
pub mod environment;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod orbit;
pub mod placement;
pub mod platform;
pub mod scene;
pub mod session;
pub mod sound;
pub mod transform;

pub use catalog::{Catalog, ModelId, ViewerConfig};
pub use constants::*;
pub use loader::{LoadError, LoadTicket, ProgressIndicator};
pub use platform::ViewerMode;
pub use session::{LoadOutcome, Session, ShowAction};
pub use sound::{SoundBackend, SoundRequest};

// Shaders bundled as string constants
pub static MESH_VERT: &str = include_str!("../../shaders/mesh.vert");
pub static MESH_FRAG: &str = include_str!("../../shaders/mesh.frag");
