use crate::core::{SoundBackend, SOUND_VOLUME};
use crate::fetch;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode, ()> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(())
        }
    }
}

/// One looping buffer source behind a master gain.
pub struct WebAudio {
    ctx: Option<web::AudioContext>,
    gain: Option<web::GainNode>,
    buffer: Option<web::AudioBuffer>,
    source: Option<web::AudioBufferSourceNode>,
}

impl WebAudio {
    pub fn new() -> Self {
        let ctx = match web::AudioContext::new() {
            Ok(c) => Some(c),
            Err(e) => {
                log::error!("[audio] AudioContext unavailable: {:?}", e);
                None
            }
        };
        Self {
            ctx,
            gain: None,
            buffer: None,
            source: None,
        }
    }

    #[inline]
    pub fn context(&self) -> Option<web::AudioContext> {
        self.ctx.clone()
    }

    /// Browsers start contexts suspended until a user gesture.
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                _ = ctx.resume();
            }
        }
    }
}

/// Fetch and decode a sound file.
pub async fn load_buffer(ctx: web::AudioContext, url: String) -> Result<web::AudioBuffer, String> {
    let bytes = fetch::fetch_bytes(&url, None, |_, _| {})
        .await
        .map_err(|e| e.to_string())?;
    let array = js_sys::Uint8Array::from(bytes.as_slice()).buffer();
    let promise = ctx
        .decode_audio_data(&array)
        .map_err(|e| format!("decodeAudioData: {:?}", e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| format!("decode {}: {:?}", url, e))?
        .dyn_into::<web::AudioBuffer>()
        .map_err(|e| format!("not an AudioBuffer: {:?}", e))
}

impl SoundBackend for WebAudio {
    type Buffer = web::AudioBuffer;

    fn install(&mut self, buffer: web::AudioBuffer) {
        self.release();
        let Some(ctx) = &self.ctx else { return };
        let Ok(gain) = create_gain(ctx, SOUND_VOLUME, "Sound") else {
            return;
        };
        _ = gain.connect_with_audio_node(&ctx.destination());
        self.gain = Some(gain);
        self.buffer = Some(buffer);
    }

    fn play(&mut self) {
        let (Some(ctx), Some(gain), Some(buffer)) = (&self.ctx, &self.gain, &self.buffer) else {
            return;
        };
        // Buffer sources are single-shot, so every play gets a fresh node.
        let src = match ctx.create_buffer_source() {
            Ok(s) => s,
            Err(e) => {
                log::error!("[audio] buffer source error: {:?}", e);
                return;
            }
        };
        src.set_buffer(Some(buffer));
        src.set_loop(true);
        _ = src.connect_with_audio_node(gain);
        let sched: &web::AudioScheduledSourceNode = src.as_ref();
        if let Err(e) = sched.start() {
            log::error!("[audio] start failed: {:?}", e);
            return;
        }
        self.source = Some(src);
    }

    fn stop(&mut self) {
        if let Some(src) = self.source.take() {
            let sched: &web::AudioScheduledSourceNode = src.as_ref();
            _ = sched.stop();
            _ = src.disconnect();
        }
    }

    #[inline]
    fn is_playing(&self) -> bool {
        self.source.is_some()
    }

    fn release(&mut self) {
        self.stop();
        if let Some(g) = self.gain.take() {
            _ = g.disconnect();
        }
        self.buffer = None;
    }
}
