use super::catalog::{Catalog, ModelId};
use super::loader::{LoadTicket, TicketCounter};

/// Host audio output holding at most one looping source.
pub trait SoundBackend {
    type Buffer;

    /// Create a source for `buffer` at full volume, looped, replacing nothing.
    fn install(&mut self, buffer: Self::Buffer);
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    /// Stop playback and detach the source from the output.
    fn release(&mut self);
}

/// A sound file the host should fetch and decode.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundRequest {
    pub ticket: LoadTicket,
    pub file: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SoundAction {
    /// The model has no sound.
    Silent,
    /// Same file as before; playback restarted without reloading.
    Restarted,
    /// Same file as before and its buffer is still on the way.
    Pending,
    /// A different file; the old source is gone and this must be loaded.
    Load(SoundRequest),
}

pub struct SoundController<B: SoundBackend> {
    backend: B,
    current: Option<String>,
    pending: Option<LoadTicket>,
    tickets: TicketCounter,
}

impl<B: SoundBackend> SoundController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            pending: None,
            tickets: TicketCounter::default(),
        }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn current_file(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn clear(&mut self) {
        if self.current.take().is_some() {
            self.backend.release();
        }
        self.pending = None;
    }

    /// React to a successful placement of `model`.
    pub fn on_placed(&mut self, model: ModelId, catalog: &Catalog) -> SoundAction {
        let Some(file) = catalog.sound_for(model) else {
            log::info!("[audio] model {} has no sound", model);
            self.clear();
            return SoundAction::Silent;
        };
        if self.current.as_deref() == Some(file) {
            if self.pending.is_some() {
                return SoundAction::Pending;
            }
            if self.backend.is_playing() {
                self.backend.stop();
            }
            self.backend.play();
            return SoundAction::Restarted;
        }
        self.clear();
        let ticket = self.tickets.issue();
        self.current = Some(file.to_string());
        self.pending = Some(ticket);
        SoundAction::Load(SoundRequest {
            ticket,
            file: file.to_string(),
            url: catalog.config.sound_url(file),
        })
    }

    /// Deliver a decoded buffer (or the reason there is none). Returns true
    /// when playback started.
    pub fn on_buffer_ready(&mut self, ticket: LoadTicket, result: Result<B::Buffer, String>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("[audio] dropping stale sound load #{}", ticket.get());
            return false;
        }
        self.pending = None;
        match result {
            Ok(buffer) => {
                self.backend.install(buffer);
                self.backend.play();
                true
            }
            Err(e) => {
                log::error!(
                    "[audio] could not load {}: {}",
                    self.current.as_deref().unwrap_or("?"),
                    e
                );
                self.current = None;
                false
            }
        }
    }

    /// Stop and forget everything (page unload, model removed).
    pub fn shutdown(&mut self) {
        self.clear();
    }
}
