//! Action slots: per-action request tokens and the three-phase
//! presentation contract.
//!
//! A *slot* is a logical UI region/action whose pending/success/error
//! presentation is independent of every other slot. Each slot owns a
//! monotonic counter; an operation takes a token when it starts and is
//! allowed to commit only while its token is still the newest. A
//! late-arriving completion from a superseded request is discarded —
//! the legacy dashboard had no such guard and last-response-received
//! won instead.
//!
//! The counter lives behind the slot lock, and both the pending
//! emission ([`Slot::begin`]) and the stale check plus terminal
//! emission ([`Slot::finish_if_current`]) run under it. A superseded
//! completion therefore cannot emit after the newer request's pending
//! phase: it observes the incremented counter and emits nothing.

use std::sync::Mutex;

/// Monotonic request-token source for one action slot.
#[derive(Debug, Default)]
pub struct Slot {
    seq: Mutex<u64>,
}

/// Token identifying one request within its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotToken(u64);

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request, superseding any outstanding one. The
    /// sink enters its pending phase under the slot lock, so it is
    /// ordered against every completion in the same slot.
    pub fn begin(&self, sink: &dyn StatusSink) -> SlotToken {
        let mut seq = self.seq.lock().expect("slot lock poisoned");
        *seq += 1;
        let token = SlotToken(*seq);
        sink.on_pending();
        token
    }

    /// Whether `token` still identifies the newest request in this slot.
    pub fn is_current(&self, token: SlotToken) -> bool {
        *self.seq.lock().expect("slot lock poisoned") == token.0
    }

    /// Run `f` only while `token` is still the newest request, holding
    /// the slot lock across the check and the call. Returns `None` for
    /// a superseded token; `f` is then never invoked.
    pub fn finish_if_current<R>(&self, token: SlotToken, f: impl FnOnce() -> R) -> Option<R> {
        let seq = self.seq.lock().expect("slot lock poisoned");
        (*seq == token.0).then(f)
    }
}

/// Three-phase presentation contract: `on_pending → request →
/// on_success | on_error`.
///
/// Injected per call site so different UI regions (an inline alert, a
/// page-level banner, a CLI) reuse the same sync logic. Completions
/// arrive on the runtime; implementations must be cheap and must not
/// block.
pub trait StatusSink: Send + Sync {
    fn on_pending(&self);
    fn on_success(&self, message: &str);
    fn on_error(&self, message: &str);
}

/// Sink that ignores every phase. Useful for headless callers that
/// only care about the returned `Result`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn on_pending(&self) {}
    fn on_success(&self, _message: &str) {}
    fn on_error(&self, _message: &str) {}
}

/// Transient presentation state of one slot. Every transition fully
/// replaces the prior value; alerts never stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AlertState {
    #[default]
    None,
    Pending,
    Success(String),
    Error(String),
}

/// A [`StatusSink`] that stores the latest [`AlertState`], for
/// embedders that poll instead of reacting to callbacks.
#[derive(Debug, Default)]
pub struct AlertSink {
    state: Mutex<AlertState>,
}

impl AlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AlertState {
        self.state.lock().expect("alert state lock poisoned").clone()
    }

    fn replace(&self, next: AlertState) {
        *self.state.lock().expect("alert state lock poisoned") = next;
    }
}

impl StatusSink for AlertSink {
    fn on_pending(&self) {
        self.replace(AlertState::Pending);
    }

    fn on_success(&self, message: &str) {
        self.replace(AlertState::Success(message.to_string()));
    }

    fn on_error(&self, message: &str) {
        self.replace(AlertState::Error(message.to_string()));
    }
}
