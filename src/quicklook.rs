use crate::constants::QUICK_LOOK_CLASS;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Hidden `<a rel="ar">` that hands USDZ files to the native viewer.
///
/// The native viewer only honours the link when it wraps an `<img>`.
pub struct QuickLookLink {
    anchor: web::HtmlAnchorElement,
}

impl QuickLookLink {
    pub fn attach(document: &web::Document) -> anyhow::Result<Self> {
        let anchor: web::HtmlAnchorElement = document
            .create_element("a")
            .map_err(|e| anyhow::anyhow!("create <a>: {:?}", e))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        anchor.set_rel("ar");
        anchor.set_class_name(QUICK_LOOK_CLASS);
        _ = anchor.style().set_property("display", "none");
        let img = document
            .create_element("img")
            .map_err(|e| anyhow::anyhow!("create <img>: {:?}", e))?;
        anchor
            .append_child(&img)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
        body.append_child(&anchor)
            .map_err(|e| anyhow::anyhow!("append quick look link: {:?}", e))?;
        Ok(Self { anchor })
    }

    pub fn open(&self, url: &str) {
        self.anchor.set_href(url);
        self.anchor.click();
    }
}
