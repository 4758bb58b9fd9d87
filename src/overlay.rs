use crate::constants::LOADING_BAR_ID;
use crate::core::ProgressIndicator;
use crate::dom;
use web_sys as web;

/// `#loading-bar` with a `.progress` child whose width tracks the ratio.
pub struct LoadingBar {
    root: Option<web::Element>,
    fill: Option<web::HtmlElement>,
}

impl LoadingBar {
    pub fn attach(document: &web::Document) -> Self {
        let root = match dom::ensure_element(document, LOADING_BAR_ID, "div") {
            Ok(el) => Some(el),
            Err(e) => {
                log::error!("[overlay] loading bar unavailable: {:?}", e);
                None
            }
        };
        let fill = root.as_ref().and_then(|r| find_or_create_fill(document, r));
        Self { root, fill }
    }
}

fn find_or_create_fill(document: &web::Document, root: &web::Element) -> Option<web::HtmlElement> {
    use wasm_bindgen::JsCast;
    let existing = root.query_selector(".progress").ok().flatten();
    let el = match existing {
        Some(el) => el,
        None => {
            let el = document.create_element("div").ok()?;
            el.set_class_name("progress");
            root.append_child(&el).ok()?;
            el
        }
    };
    el.dyn_into::<web::HtmlElement>().ok()
}

impl ProgressIndicator for LoadingBar {
    fn set_visible(&mut self, visible: bool) {
        if let Some(root) = &self.root {
            dom::set_display(root, visible);
        }
    }

    fn set_progress(&mut self, ratio: f32) {
        if let Some(fill) = &self.fill {
            let pct = (ratio.clamp(0.0, 1.0) * 100.0).round();
            _ = fill.style().set_property("width", &format!("{}%", pct));
        }
    }
}
