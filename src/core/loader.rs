use super::catalog::ModelId;
use super::constants::MAX_PREALLOC_BYTES;
use super::model::ModelError;

/// Identifies one asynchronous load. Later requests carry larger tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct TicketCounter {
    last: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> LoadTicket {
        self.last += 1;
        LoadTicket(self.last)
    }
}

/// A model fetch the host should start.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub model: ModelId,
    pub url: String,
    /// Request this one replaced; its fetch should be aborted.
    pub superseded: Option<LoadTicket>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("http status {status} for {url}")]
    Http { status: u16, url: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request aborted")]
    Aborted,
    #[error("decode failed: {0}")]
    Model(#[from] ModelError),
}

/// Page element showing fetch progress.
pub trait ProgressIndicator {
    fn set_visible(&mut self, visible: bool);
    fn set_progress(&mut self, ratio: f32);
}

/// Tracks the single in-flight model request; anything older is stale.
#[derive(Debug, Default)]
pub struct LoadTracker {
    tickets: TicketCounter,
    pending: Option<(LoadTicket, ModelId)>,
}

impl LoadTracker {
    pub fn begin(&mut self, model: ModelId) -> (LoadTicket, Option<LoadTicket>) {
        let ticket = self.tickets.issue();
        let superseded = self.pending.replace((ticket, model)).map(|(t, _)| t);
        (ticket, superseded)
    }

    #[inline]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        matches!(self.pending, Some((t, _)) if t == ticket)
    }

    #[inline]
    pub fn pending_model(&self) -> Option<ModelId> {
        self.pending.map(|(_, m)| m)
    }

    /// Close the request if `ticket` is still current.
    pub fn finish(&mut self, ticket: LoadTicket) -> Option<ModelId> {
        if self.is_current(ticket) {
            self.pending.take().map(|(_, m)| m)
        } else {
            None
        }
    }
}

/// Bytes to reserve for a body of advertised length `total`.
#[inline]
pub fn prealloc_len(total: Option<u64>) -> usize {
    total.unwrap_or(0).min(MAX_PREALLOC_BYTES) as usize
}

/// Fraction of the body received; `None` while the total size is unknown.
#[inline]
pub fn progress_ratio(loaded: u64, total: Option<u64>) -> Option<f32> {
    match total {
        Some(t) if t > 0 => Some((loaded as f64 / t as f64).clamp(0.0, 1.0) as f32),
        _ => None,
    }
}
