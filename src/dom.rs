use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(element: &web::Element, mut handler: impl FnMut() + 'static) {
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    _ = element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Find `#id`, or create it as a `<tag>` under `<body>`.
pub fn ensure_element(document: &web::Document, id: &str, tag: &str) -> anyhow::Result<web::Element> {
    if let Some(el) = document.get_element_by_id(id) {
        return Ok(el);
    }
    let el = document
        .create_element(tag)
        .map_err(|e| anyhow::anyhow!("create <{}>: {:?}", tag, e))?;
    el.set_id(id);
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&el)
        .map_err(|e| anyhow::anyhow!("append #{}: {:?}", id, e))?;
    Ok(el)
}

/// `data-*` value on `<body>`, keyed in camelCase.
pub fn body_data(document: &web::Document, key: &str) -> Option<String> {
    document
        .body()
        .and_then(|b| b.dataset().get(key))
        .filter(|v| !v.trim().is_empty())
}

pub fn set_display(el: &web::Element, visible: bool) {
    if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
        _ = html
            .style()
            .set_property("display", if visible { "" } else { "none" });
    }
}

/// Show or hide every element carrying `class`.
pub fn set_class_visible(document: &web::Document, class: &str, visible: bool) {
    let elements = document.get_elements_by_class_name(class);
    for i in 0..elements.length() {
        if let Some(el) = elements.item(i) {
            set_display(&el, visible);
        }
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}
