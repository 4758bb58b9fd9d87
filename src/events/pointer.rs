use crate::frame::SharedApp;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Last pointer position while a drag is active.
#[derive(Clone, Copy, Debug, Default)]
struct DragState {
    last: Option<(f32, f32)>,
}

fn listen(
    target: &web::EventTarget,
    name: &str,
    handler: impl FnMut(web::PointerEvent) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::PointerEvent)>);
    _ = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Orbit the inline camera by dragging on the canvas.
pub fn wire_orbit_drag(app: &SharedApp, canvas: &web::HtmlCanvasElement) {
    let drag = Rc::new(RefCell::new(DragState::default()));

    {
        let drag = drag.clone();
        let canvas_cap = canvas.clone();
        listen(canvas, "pointerdown", move |ev| {
            drag.borrow_mut().last = Some((ev.client_x() as f32, ev.client_y() as f32));
            _ = canvas_cap.set_pointer_capture(ev.pointer_id());
        });
    }
    {
        let drag = drag.clone();
        let app = app.clone();
        let canvas_move = canvas.clone();
        listen(canvas, "pointermove", move |ev| {
            let mut d = drag.borrow_mut();
            let Some((lx, ly)) = d.last else { return };
            let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
            d.last = Some((x, y));
            let Ok(mut a) = app.try_borrow_mut() else {
                return;
            };
            if a.xr.is_some() {
                return;
            }
            let height = canvas_move.client_height() as f32;
            a.camera.orbit.rotate_by_pixels(x - lx, y - ly, height);
        });
    }
    for name in ["pointerup", "pointercancel"] {
        let drag = drag.clone();
        listen(canvas, name, move |_ev| {
            drag.borrow_mut().last = None;
        });
    }
}
