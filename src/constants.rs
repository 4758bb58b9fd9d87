// Camera, lighting and page-wiring constants for the web frontend.
//
// Catalog tables and asset paths live in `core::constants`; these only
// concern how the page is drawn and which elements it touches.
// Camera
pub const CAMERA_FOV_DEG: f32 = 70.0;
pub const CAMERA_NEAR: f32 = 0.01;
pub const CAMERA_FAR: f32 = 20.0;
pub const CAMERA_HEIGHT: f32 = 1.6; // standing eye height (m) for the inline view

// Hemisphere ambient light
pub const HEMI_SKY: [f32; 3] = [1.0, 1.0, 1.0]; // #ffffff
pub const HEMI_GROUND: [f32; 3] = [0xbb as f32 / 255.0, 0xbb as f32 / 255.0, 1.0]; // #bbbbff
pub const HEMI_INTENSITY: f32 = 1.0;

// Reticle colour (unlit)
pub const RETICLE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Inline clear colour; XR clears to transparent so the camera feed shows through
pub const INLINE_CLEAR: [f32; 4] = [0.08, 0.09, 0.11, 1.0];

// Page elements
pub const CANVAS_ID: &str = "app-canvas";
pub const LOADING_BAR_ID: &str = "loading-bar";
pub const AR_BUTTON_ID: &str = "ar-button";
pub const AR_ONLY_CLASS: &str = "ar-only";
pub const QUICK_LOOK_CLASS: &str = "ar-quicklook-button";

// Fetch progress is reported at most this often (bytes)
pub const PROGRESS_STEP_BYTES: u64 = 64 * 1024;
