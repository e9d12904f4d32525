//! Channel control client: start/stop commands for a channel's backend
//! processing job, plus the profile follow toggle.
//!
//! The legacy dashboard fired the control POST and forgot it — the
//! modal closed immediately and failures died inside a silent
//! callback. Two deliberate behavior changes here: failures are
//! returned (and pushed through the injected sink), and a channel can
//! have at most one control command in flight; a second concurrent
//! send fails fast with [`SyncError::CommandInFlight`] instead of
//! racing the first.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::channel::{ChannelId, ControlAck, ControlRequest};
use crate::errors::SyncError;
use crate::slot::StatusSink;
use crate::transport::ApiTransport;

/// Invoked after every control completion, success or failure, so the
/// caller can re-read server state. Mirrors the legacy UI-refresh
/// callback, which also ran unconditionally.
pub type RefreshHook = Box<dyn Fn(&ChannelId) + Send + Sync>;

pub struct ControlClient {
    api: Arc<ApiTransport>,
    in_flight: Mutex<HashSet<ChannelId>>,
    refresh: Option<RefreshHook>,
}

/// Marks a channel's control slot busy for the lifetime of one send.
/// Releasing on `Drop` keeps the slot from wedging when the send
/// future is cancelled mid-flight.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<ChannelId>>,
    channel: ChannelId,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(
        in_flight: &'a Mutex<HashSet<ChannelId>>,
        channel: &ChannelId,
    ) -> Result<Self, SyncError> {
        let mut busy = in_flight.lock().expect("control in-flight lock poisoned");
        if !busy.insert(channel.clone()) {
            return Err(SyncError::CommandInFlight(channel.to_string()));
        }
        Ok(Self {
            in_flight,
            channel: channel.clone(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut busy) = self.in_flight.lock() {
            busy.remove(&self.channel);
        }
    }
}

impl ControlClient {
    pub fn new(api: Arc<ApiTransport>) -> Self {
        Self {
            api,
            in_flight: Mutex::new(HashSet::new()),
            refresh: None,
        }
    }

    pub fn with_refresh(mut self, hook: RefreshHook) -> Self {
        self.refresh = Some(hook);
        self
    }

    /// Issue one control command. Exactly one POST per call; the
    /// request body is built fresh from `request` (never cached form
    /// state).
    pub async fn send(
        &self,
        channel: &ChannelId,
        request: &ControlRequest,
        sink: &dyn StatusSink,
    ) -> Result<ControlAck, SyncError> {
        let guard = InFlightGuard::acquire(&self.in_flight, channel)?;

        sink.on_pending();
        let form = match request.form_fields() {
            Ok(fields) => fields,
            Err(err) => {
                sink.on_error(&err.to_string());
                return Err(err);
            }
        };

        tracing::info!(channel = %channel, command = request.command.as_str(), "control");
        let result = self
            .api
            .post_form(&format!("/api/channels/{channel}/control/"), &form)
            .await;

        // Free the slot before the refresh hook runs: the hook may
        // itself want to issue a follow-up command.
        drop(guard);
        if let Some(refresh) = &self.refresh {
            refresh(channel);
        }

        match result {
            Ok(body) => {
                sink.on_success(&format!("Channel {} accepted", request.command.as_str()));
                Ok(ControlAck { body })
            }
            Err(err) => {
                sink.on_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Follow or unfollow the channel on the user's profile — the
    /// dashboard's star toggle.
    pub async fn save_to_profile(
        &self,
        channel: &ChannelId,
        follow: bool,
        sink: &dyn StatusSink,
    ) -> Result<(), SyncError> {
        sink.on_pending();
        let form = [("save_channel_to_profile", follow.to_string())];
        let result = self
            .api
            .post_form(&format!("/api/channels/{channel}/save_to_profile/"), &form)
            .await;

        match result {
            Ok(_) => {
                sink.on_success(if follow {
                    "Channel saved to profile"
                } else {
                    "Channel removed from profile"
                });
                Ok(())
            }
            Err(err) => {
                sink.on_error(&err.to_string());
                Err(err)
            }
        }
    }
}
