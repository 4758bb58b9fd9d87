use crate::audio::{self, WebAudio};
use crate::camera::InlineCamera;
use crate::constants::INLINE_CLEAR;
use crate::core::{LoadTicket, Session, SoundRequest};
use crate::fetch::Abort;
use crate::overlay::LoadingBar;
use crate::quicklook::QuickLookLink;
use crate::render::{Renderer, ViewTarget};
use crate::xr::{self, XrState};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type ViewerSession = Session<WebAudio, LoadingBar>;

/// Everything the page keeps alive between frames.
pub struct App {
    pub session: ViewerSession,
    pub canvas: web::HtmlCanvasElement,
    pub renderer: Option<Renderer>,
    pub camera: InlineCamera,
    pub xr: Option<XrState>,
    pub ar_button: Option<web::Element>,
    pub quick_look: Option<QuickLookLink>,
    /// Fetch for the newest model request, aborted when superseded.
    pub in_flight: Option<(LoadTicket, Abort)>,
    /// An XR session request is pending.
    pub xr_starting: bool,
    pub last_instant: Instant,
}

pub type SharedApp = Rc<RefCell<App>>;

impl App {
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        dt.as_secs_f32()
    }

    /// Inline frame: orbit camera onto the canvas.
    fn inline_frame(&mut self) {
        let dt = self.tick();
        self.session.begin_frame(false);
        self.session.advance(dt);
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.camera.resize(w, h);
        let view = ViewTarget {
            viewport: [0, 0, w as i32, h as i32],
            view_proj: self.camera.view_proj(),
        };
        renderer.render(self.session.scene(), None, &[view], INLINE_CLEAR);
    }

    /// XR frame. Returns true when a hit-test source should be requested.
    fn xr_frame(&mut self, frame: &web::XrFrame) -> bool {
        let dt = self.tick();
        let Some(xr) = &self.xr else {
            return false;
        };
        let request_source = self.session.begin_frame(true);
        if self.session.wants_hit_test_results() {
            let hit = xr
                .hit_test_source
                .as_ref()
                .and_then(|src| xr::first_hit_pose(frame, src, &xr.local_space));
            self.session.update_reticle(hit);
        }
        self.session.advance(dt);
        if let Some(renderer) = &mut self.renderer {
            let views = xr::frame_views(frame, xr);
            let fb = xr.layer.framebuffer();
            renderer.render(self.session.scene(), fb.as_ref(), &views, [0.0, 0.0, 0.0, 0.0]);
        }
        request_source
    }
}

/// Drive the inline view off window rAF; paused while XR owns the display.
pub fn start_loop(app: SharedApp) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut a = app.borrow_mut();
            if a.xr.is_none() {
                a.inline_frame();
            }
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Drive frames from the XR session until it ends.
pub fn start_xr_loop(app: SharedApp, session: web::XrSession) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut(f64, web::XrFrame)>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let app_tick = app.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |_time: f64, frame: web::XrFrame| {
        let request_source = {
            let mut a = app_tick.borrow_mut();
            // Ended or replaced sessions stop re-arming the callback.
            match &a.xr {
                Some(x) if x.session == frame.session() => {}
                _ => return,
            }
            a.xr_frame(&frame)
        };
        if request_source {
            request_hit_test_source(&app_tick);
        }
        if let Some(cb) = tick_clone.borrow().as_ref() {
            frame.session().request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64, web::XrFrame)>));
    if let Some(cb) = tick.borrow().as_ref() {
        session.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn request_hit_test_source(app: &SharedApp) {
    let Some((session, viewer)) = app
        .borrow()
        .xr
        .as_ref()
        .map(|x| (x.session.clone(), x.viewer_space.clone()))
    else {
        return;
    };
    let app = app.clone();
    spawn_local(async move {
        let res = xr::request_hit_test_source(session.clone(), viewer).await;
        let mut a = app.borrow_mut();
        let a = &mut *a;
        let Some(x) = a.xr.as_mut().filter(|x| x.session == session) else {
            // The session ended while the request was pending.
            if let Ok(src) = &res {
                xr::cancel_hit_test_source(src);
            }
            return;
        };
        match res {
            Ok(src) => {
                x.hit_test_source = Some(src);
                a.session.hit_test_source_ready();
            }
            Err(e) => {
                log::warn!("[xr] requestHitTestSource failed: {:?}", e);
                a.session.hit_test_source_failed();
            }
        }
    });
}

/// Fetch and decode a sound, then hand it to the session under its ticket.
pub fn spawn_sound_load(app: &SharedApp, req: SoundRequest) {
    let ctx = {
        let a = app.borrow();
        let backend = a.session.sound().backend();
        backend.resume();
        backend.context()
    };
    let Some(ctx) = ctx else {
        app.borrow_mut()
            .session
            .sound_ready(req.ticket, Err("no audio context".to_string()));
        return;
    };
    let app = app.clone();
    spawn_local(async move {
        log::info!("[audio] loading {}", req.url);
        let res = audio::load_buffer(ctx, req.url.clone()).await;
        app.borrow_mut().session.sound_ready(req.ticket, res);
    });
}
