use crate::core::transform::mat4_from_slice;
use crate::render::ViewTarget;
use glam::Mat4;
use smallvec::SmallVec;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;
use web_sys::WebGl2RenderingContext as GL;

fn js_err(context: &str, e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{}: {:?}", context, e)
}

// Call `obj[name](arg)` for hit-test entry points that web-sys does not bind.
fn call1(obj: &JsValue, name: &str, arg: &JsValue) -> Result<JsValue, JsValue> {
    let f: js_sys::Function = js_sys::Reflect::get(obj, &name.into())?.dyn_into()?;
    f.call1(obj, arg)
}

fn dictionary(entries: &[(&str, JsValue)]) -> js_sys::Object {
    let obj = js_sys::Object::new();
    for (k, v) in entries {
        _ = js_sys::Reflect::set(&obj, &(*k).into(), v);
    }
    obj
}

/// Resolves to false when WebXR is missing or immersive-ar is unsupported.
pub async fn is_ar_supported() -> bool {
    let Some(window) = web::window() else {
        return false;
    };
    let navigator = window.navigator();
    if !js_sys::Reflect::has(&navigator, &"xr".into()).unwrap_or(false) {
        log::info!("[xr] navigator.xr not present");
        return false;
    }
    match JsFuture::from(navigator.xr().is_session_supported(web::XrSessionMode::ImmersiveAr)).await {
        Ok(v) => v.as_bool().unwrap_or(false),
        Err(e) => {
            log::warn!("[xr] isSessionSupported failed: {:?}", e);
            false
        }
    }
}

/// Everything tied to one running immersive-ar session.
pub struct XrState {
    pub session: web::XrSession,
    pub local_space: web::XrReferenceSpace,
    pub viewer_space: web::XrReferenceSpace,
    pub layer: web::XrWebGlLayer,
    pub hit_test_source: Option<JsValue>,
}

impl XrState {
    /// Release the hit-test source; the session itself is ended by the caller.
    pub fn cancel_hit_test(&mut self) {
        if let Some(src) = self.hit_test_source.take() {
            cancel_hit_test_source(&src);
        }
    }
}

pub fn cancel_hit_test_source(src: &JsValue) {
    if let Ok(f) = js_sys::Reflect::get(src, &"cancel".into()) {
        if let Ok(f) = f.dyn_into::<js_sys::Function>() {
            _ = f.call0(src);
        }
    }
}

pub async fn start_session(gl: &GL) -> anyhow::Result<XrState> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let xr = window.navigator().xr();
    let mut entries: Vec<(&str, JsValue)> = vec![
        ("requiredFeatures", js_sys::Array::of1(&JsValue::from_str("hit-test")).into()),
        ("optionalFeatures", js_sys::Array::of1(&JsValue::from_str("dom-overlay")).into()),
    ];
    if let Some(body) = window.document().and_then(|d| d.body()) {
        let overlay = dictionary(&[("root", JsValue::from(body))]);
        entries.push(("domOverlay", overlay.into()));
    }
    let init: web::XrSessionInit = dictionary(&entries).unchecked_into();
    let session: web::XrSession =
        JsFuture::from(xr.request_session_with_options(web::XrSessionMode::ImmersiveAr, &init))
            .await
            .map_err(|e| js_err("requestSession", e))?
            .dyn_into()
            .map_err(|e| js_err("XRSession", e))?;

    let layer = web::XrWebGlLayer::new_with_web_gl2_rendering_context(&session, gl)
        .map_err(|e| js_err("XRWebGLLayer", e))?;
    let state: web::XrRenderStateInit = dictionary(&[("baseLayer", JsValue::from(layer.clone()))]).unchecked_into();
    session.update_render_state_with_state(&state);

    let local_space = request_space(&session, web::XrReferenceSpaceType::Local).await?;
    let viewer_space = request_space(&session, web::XrReferenceSpaceType::Viewer).await?;
    log::info!("[xr] immersive-ar session started");
    Ok(XrState {
        session,
        local_space,
        viewer_space,
        layer,
        hit_test_source: None,
    })
}

async fn request_space(
    session: &web::XrSession,
    kind: web::XrReferenceSpaceType,
) -> anyhow::Result<web::XrReferenceSpace> {
    JsFuture::from(session.request_reference_space(kind))
        .await
        .map_err(|e| js_err("requestReferenceSpace", e))?
        .dyn_into()
        .map_err(|e| js_err("XRReferenceSpace", e))
}

/// Ask for a hit-test source casting from the viewer's gaze.
pub async fn request_hit_test_source(
    session: web::XrSession,
    viewer_space: web::XrReferenceSpace,
) -> Result<JsValue, JsValue> {
    let opts = dictionary(&[("space", JsValue::from(viewer_space))]);
    let promise: js_sys::Promise = call1(&session, "requestHitTestSource", &opts)?.dyn_into()?;
    JsFuture::from(promise).await
}

/// Pose of the first hit this frame, in `space`.
pub fn first_hit_pose(frame: &web::XrFrame, source: &JsValue, space: &web::XrReferenceSpace) -> Option<Mat4> {
    let results: js_sys::Array = call1(frame, "getHitTestResults", source).ok()?.dyn_into().ok()?;
    let first = results.get(0);
    if first.is_undefined() {
        return None;
    }
    let pose: web::XrPose = call1(&first, "getPose", space).ok()?.dyn_into().ok()?;
    mat4_from_slice(&pose.transform().matrix())
}

/// One target per XR view, with viewports from the session's layer.
pub fn frame_views(frame: &web::XrFrame, xr: &XrState) -> SmallVec<[ViewTarget; 2]> {
    let mut out = SmallVec::new();
    let Some(pose) = frame.get_viewer_pose(&xr.local_space) else {
        return out;
    };
    for v in pose.views().iter() {
        let view: web::XrView = v.unchecked_into();
        let Some(vp) = xr.layer.get_viewport(&view) else {
            continue;
        };
        let (Some(proj), Some(view_m)) = (
            mat4_from_slice(&view.projection_matrix()),
            mat4_from_slice(&view.transform().inverse().matrix()),
        ) else {
            continue;
        };
        out.push(ViewTarget {
            viewport: [vp.x(), vp.y(), vp.width(), vp.height()],
            view_proj: proj * view_m,
        });
    }
    out
}

/// The "Start AR" button shown when immersive-ar is available.
pub fn ar_button(document: &web::Document) -> anyhow::Result<web::Element> {
    let button = crate::dom::ensure_element(document, crate::constants::AR_BUTTON_ID, "button")?;
    set_button_label(&button, false);
    Ok(button)
}

pub fn set_button_label(button: &web::Element, in_session: bool) {
    button.set_text_content(Some(if in_session { "STOP AR" } else { "START AR" }));
}
