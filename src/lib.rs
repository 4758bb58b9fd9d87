#![cfg(target_arch = "wasm32")]
use crate::core::environment::{EnvironmentGenerator, Panorama};
use crate::core::loader::LoadRequest;
use crate::core::model::ModelAsset;
use crate::core::{
    Catalog, LoadError, LoadOutcome, ModelId, Session, ShowAction, ViewerConfig, ViewerMode,
};
use crate::frame::{App, SharedApp};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod camera;
mod constants;
mod core;
mod dom;
mod events;
mod fetch;
mod frame;
mod overlay;
mod quicklook;
mod render;
mod xr;

thread_local! {
    static APP: RefCell<Option<SharedApp>> = const { RefCell::new(None) };
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn find_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    let created = document.get_element_by_id(constants::CANVAS_ID).is_none();
    let el = dom::ensure_element(document, constants::CANVAS_ID, "canvas")?;
    let canvas: web::HtmlCanvasElement = el
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("#{} is not a canvas: {:?}", constants::CANVAS_ID, e))?;
    if created {
        let style = canvas.style();
        _ = style.set_property("width", "100%");
        _ = style.set_property("height", "100%");
        _ = style.set_property("display", "block");
    }
    Ok(canvas)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("chair-ar starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas = find_canvas(&document)?;
    wire_canvas_resize(&canvas);

    let config = ViewerConfig::default().with_overrides(|key| dom::body_data(&document, key));
    let catalog = Catalog::default().with_config(config);

    let ar_supported = xr::is_ar_supported().await;
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let mode = crate::core::platform::choose_mode(ar_supported, &user_agent);
    log::info!("[init] ar_supported={} mode={:?}", ar_supported, mode);

    let progress = overlay::LoadingBar::attach(&document);
    let session = Session::new(catalog, mode, audio::WebAudio::new(), progress)?;

    let renderer = if mode == ViewerMode::QuickLook {
        None
    } else {
        match render::Renderer::new(&canvas) {
            Ok(r) => Some(r),
            Err(e) => {
                log::error!("[init] renderer unavailable: {:?}", e);
                None
            }
        }
    };

    let mut ar_button = None;
    let mut quick_look = None;
    match mode {
        ViewerMode::ImmersiveAr => {
            ar_button = Some(xr::ar_button(&document)?);
            dom::set_class_visible(&document, constants::AR_ONLY_CLASS, true);
        }
        ViewerMode::QuickLook => match quicklook::QuickLookLink::attach(&document) {
            Ok(link) => quick_look = Some(link),
            Err(e) => log::error!("[init] quick look link unavailable: {:?}", e),
        },
        ViewerMode::Inline => {}
    }

    let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
    let app: SharedApp = Rc::new(RefCell::new(App {
        session,
        canvas: canvas.clone(),
        renderer,
        camera: camera::InlineCamera::new(aspect),
        xr: None,
        ar_button: ar_button.clone(),
        quick_look,
        in_flight: None,
        xr_starting: false,
        last_instant: Instant::now(),
    }));
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    if let Some(button) = &ar_button {
        let app_btn = app.clone();
        dom::add_click_listener(button, move || toggle_ar(&app_btn));
    }
    if mode == ViewerMode::Inline {
        events::wire_orbit_drag(&app, &canvas);
    }
    wire_page_hide(&app);
    if mode != ViewerMode::QuickLook {
        spawn_local(load_environment(app.clone()));
        frame::start_loop(app);
    }
    Ok(())
}

// Release the audio graph when the page goes away.
fn wire_page_hide(app: &SharedApp) {
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Ok(mut a) = app.try_borrow_mut() {
            a.session.shutdown();
        }
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

async fn load_environment(app: SharedApp) {
    let url = app.borrow().session.catalog().config.light_probe_url();
    let bytes = match fetch::fetch_bytes(&url, None, |_, _| {}).await {
        Ok(b) => b,
        Err(e) => {
            log::error!("[env] light probe {} failed: {}", url, e);
            return;
        }
    };
    let panorama = match Panorama::from_hdr(&bytes) {
        Ok(p) => p,
        Err(e) => {
            log::error!("[env] light probe decode failed: {}", e);
            return;
        }
    };
    let env = {
        let mut generator = EnvironmentGenerator::new();
        generator.from_equirectangular(&panorama)
    };
    match env {
        Ok(env) => {
            log::info!("[env] environment map ready ({}x{})", panorama.width, panorama.height);
            app.borrow_mut().session.set_environment(env);
        }
        Err(e) => log::error!("[env] environment generation failed: {}", e),
    }
}

fn show_model(app: &SharedApp, id: ModelId) {
    let action = app.borrow_mut().session.show(id);
    match action {
        ShowAction::QuickLook { url } => match &app.borrow().quick_look {
            Some(link) => link.open(&url),
            None => log::warn!("[quicklook] no link to open {}", url),
        },
        ShowAction::Load(req) => {
            let (signal, mode) = {
                let mut a = app.borrow_mut();
                if let Some((old, abort)) = a.in_flight.take() {
                    log::info!("[load] aborting superseded request #{}", old.get());
                    abort.abort();
                }
                let abort = fetch::Abort::new();
                let signal = abort.signal();
                a.in_flight = Some((req.ticket, abort));
                a.session.sound().backend().resume();
                (signal, a.session.mode())
            };
            spawn_local(load_model(app.clone(), req, signal));
            if mode == ViewerMode::ImmersiveAr {
                enter_ar(app);
            }
        }
    }
}

async fn load_model(app: SharedApp, req: LoadRequest, signal: Option<web::AbortSignal>) {
    let ticket = req.ticket;
    let progress_app = app.clone();
    let result = fetch::fetch_bytes(&req.url, signal.as_ref(), move |loaded, total| {
        if let Ok(mut a) = progress_app.try_borrow_mut() {
            a.session.load_progress(ticket, loaded, total);
        }
    })
    .await
    .and_then(|bytes| ModelAsset::from_glb(&bytes).map_err(LoadError::from));

    let outcome = {
        let mut a = app.borrow_mut();
        if a.in_flight.as_ref().is_some_and(|(t, _)| *t == ticket) {
            a.in_flight = None;
        }
        a.session.load_finished(ticket, result)
    };
    if let LoadOutcome::Attached {
        sound: Some(sound), ..
    } = outcome
    {
        frame::spawn_sound_load(&app, sound);
    }
}

fn toggle_ar(app: &SharedApp) {
    let running = app.borrow().xr.as_ref().map(|x| x.session.clone());
    match running {
        Some(session) => {
            // Cleanup happens in the session's `end` listener.
            _ = session.end();
        }
        None => enter_ar(app),
    }
}

fn enter_ar(app: &SharedApp) {
    let gl = {
        let mut a = app.borrow_mut();
        if a.xr.is_some() || a.xr_starting {
            return;
        }
        let Some(gl) = a.renderer.as_ref().map(|r| r.gl().clone()) else {
            log::warn!("[xr] no renderer; cannot start a session");
            return;
        };
        a.xr_starting = true;
        gl
    };
    let app = app.clone();
    spawn_local(async move {
        let res = xr::start_session(&gl).await;
        let session = {
            let mut a = app.borrow_mut();
            a.xr_starting = false;
            match res {
                Ok(state) => {
                    if let Some(b) = &a.ar_button {
                        xr::set_button_label(b, true);
                    }
                    let session = state.session.clone();
                    a.xr = Some(state);
                    session
                }
                Err(e) => {
                    log::error!("[xr] session request failed: {:?}", e);
                    return;
                }
            }
        };
        wire_session_events(&app, &session);
        frame::start_xr_loop(app, session);
    });
}

fn wire_session_events(app: &SharedApp, session: &web::XrSession) {
    let app_select = app.clone();
    let on_select = Closure::wrap(Box::new(move |_ev: web::Event| {
        let (outcome, sound) = app_select.borrow_mut().session.select();
        log::debug!("[xr] select -> {:?}", outcome);
        if let Some(req) = sound {
            frame::spawn_sound_load(&app_select, req);
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = session.add_event_listener_with_callback("select", on_select.as_ref().unchecked_ref());
    on_select.forget();

    let app_end = app.clone();
    let ended = session.clone();
    let on_end = Closure::wrap(Box::new(move |_ev: web::Event| {
        let mut a = app_end.borrow_mut();
        match a.xr.take() {
            Some(mut x) if x.session == ended => x.cancel_hit_test(),
            other => {
                a.xr = other;
                return;
            }
        }
        a.session.xr_session_ended();
        if let Some(b) = &a.ar_button {
            xr::set_button_label(b, false);
        }
        log::info!("[xr] session ended");
    }) as Box<dyn FnMut(web::Event)>);
    _ = session.add_event_listener_with_callback("end", on_end.as_ref().unchecked_ref());
    on_end.forget();
}

/// Page entry point: load (or hand off) the item with this catalog ID.
#[wasm_bindgen]
pub fn show_chair(id: u32) {
    let app = APP.with(|slot| slot.borrow().clone());
    match app {
        Some(app) => show_model(&app, ModelId(id)),
        None => log::warn!("show_chair({}) before init finished", id),
    }
}
