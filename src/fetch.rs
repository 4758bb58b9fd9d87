use crate::constants::PROGRESS_STEP_BYTES;
use crate::core::loader::prealloc_len;
use crate::core::LoadError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_failure(e: JsValue) -> LoadError {
    let name = js_sys::Reflect::get(&e, &"name".into())
        .ok()
        .and_then(|n| n.as_string());
    if name.as_deref() == Some("AbortError") {
        LoadError::Aborted
    } else {
        LoadError::Network(format!("{:?}", e))
    }
}

/// Abortable handle for one in-flight request.
pub struct Abort {
    controller: Option<web::AbortController>,
}

impl Abort {
    pub fn new() -> Self {
        Self {
            controller: web::AbortController::new().ok(),
        }
    }

    pub fn signal(&self) -> Option<web::AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }

    pub fn abort(&self) {
        if let Some(c) = &self.controller {
            c.abort();
        }
    }
}

/// GET `url` into memory, calling `on_progress(loaded, total)` as chunks arrive.
pub async fn fetch_bytes(
    url: &str,
    signal: Option<&web::AbortSignal>,
    mut on_progress: impl FnMut(u64, Option<u64>),
) -> Result<Vec<u8>, LoadError> {
    let init = web::RequestInit::new();
    init.set_method("GET");
    if let Some(s) = signal {
        init.set_signal(Some(s));
    }
    let request = web::Request::new_with_str_and_init(url, &init).map_err(js_failure)?;
    let window = web::window().ok_or_else(|| LoadError::Network("no window".to_string()))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_failure)?
        .dyn_into()
        .map_err(js_failure)?;
    if !resp.ok() {
        return Err(LoadError::Http {
            status: resp.status(),
            url: url.to_string(),
        });
    }
    let total = resp
        .headers()
        .get("content-length")
        .ok()
        .flatten()
        .and_then(|s| s.trim().parse::<u64>().ok());

    let Some(body) = resp.body() else {
        let buf = JsFuture::from(resp.array_buffer().map_err(js_failure)?)
            .await
            .map_err(js_failure)?;
        let bytes = js_sys::Uint8Array::new(&buf).to_vec();
        on_progress(bytes.len() as u64, total.or(Some(bytes.len() as u64)));
        return Ok(bytes);
    };

    let reader: web::ReadableStreamDefaultReader = body.get_reader().unchecked_into();
    let mut bytes: Vec<u8> = Vec::with_capacity(prealloc_len(total));
    let mut reported = 0u64;
    on_progress(0, total);
    loop {
        let chunk = JsFuture::from(reader.read()).await.map_err(js_failure)?;
        let done = js_sys::Reflect::get(&chunk, &"done".into())
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            break;
        }
        let value = js_sys::Reflect::get(&chunk, &"value".into()).map_err(js_failure)?;
        let arr: js_sys::Uint8Array = value.dyn_into().map_err(js_failure)?;
        let start = bytes.len();
        bytes.resize(start + arr.length() as usize, 0);
        arr.copy_to(&mut bytes[start..]);
        let loaded = bytes.len() as u64;
        if loaded - reported >= PROGRESS_STEP_BYTES {
            on_progress(loaded, total);
            reported = loaded;
        }
    }
    let loaded = bytes.len() as u64;
    on_progress(loaded, total.or(Some(loaded)));
    Ok(bytes)
}
