//! External link sync client: the single linked ticket (Trello card)
//! per channel and every operation against it.
//!
//! Committed state per channel is the two-value machine
//! `NoLink ⇄ Linked { url }`. "Pending" is never committed — it is a
//! slot indicator only, and a failed or superseded request leaves the
//! committed value exactly where it was. Last write wins by request
//! token; two browser tabs editing concurrently is a documented
//! limitation, not a conflict to detect.

pub mod url;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::channel::{ChannelId, QaSheet, WorkflowList};
use crate::errors::SyncError;
use crate::slot::{Slot, SlotToken, StatusSink};
use crate::transport::ApiTransport;

/// Committed link state for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkState {
    #[default]
    NoLink,
    Linked { url: String },
}

impl LinkState {
    pub fn is_linked(&self) -> bool {
        matches!(self, LinkState::Linked { .. })
    }
}

/// Outcome of a removal attempt. Declining the confirmation prompt is
/// an ordinary result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Cancelled,
    Removed,
}

/// Per-channel slots: each action's pending/success/error presentation
/// and staleness tracking is independent of the others.
#[derive(Debug, Default)]
struct ChannelSlots {
    state: Mutex<LinkState>,
    link: Slot,
    checklist: Slot,
    workflow: Slot,
    comment: Slot,
}

impl ChannelSlots {
    /// Commit a new link state and emit the success phase, but only if
    /// `token` still owns the link slot. The token check, the write,
    /// and the emission all happen under the same locks so a newer
    /// completion can be neither overwritten nor talked over by an
    /// older one.
    fn commit_link(
        &self,
        token: SlotToken,
        next: LinkState,
        sink: &dyn StatusSink,
        message: &str,
    ) -> bool {
        let mut state = self.state.lock().expect("link state lock poisoned");
        self.link
            .finish_if_current(token, || {
                *state = next;
                sink.on_success(message);
            })
            .is_some()
    }
}

pub struct TicketClient {
    api: Arc<ApiTransport>,
    channels: Mutex<HashMap<ChannelId, Arc<ChannelSlots>>>,
}

impl TicketClient {
    pub fn new(api: Arc<ApiTransport>) -> Self {
        Self {
            api,
            channels: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self, channel: &ChannelId) -> Arc<ChannelSlots> {
        let mut channels = self.channels.lock().expect("channel map lock poisoned");
        channels
            .entry(channel.clone())
            .or_insert_with(|| Arc::new(ChannelSlots::default()))
            .clone()
    }

    /// Current committed link state for the channel.
    pub fn link_state(&self, channel: &ChannelId) -> LinkState {
        self.slots(channel)
            .state
            .lock()
            .expect("link state lock poisoned")
            .clone()
    }

    /// Seed the committed state from a server-rendered page, where the
    /// channel may already carry a link. The URL goes through the same
    /// gate as [`TicketClient::submit_link`]: server-rendered data is
    /// usually trustworthy, but a corrupt stored value must not become
    /// committed state that the pattern would never have admitted.
    pub fn seed_link(
        &self,
        channel: &ChannelId,
        url: impl Into<String>,
    ) -> Result<(), SyncError> {
        let url = url.into();
        let url = url.trim();
        if !url::is_valid_ticket_url(url) {
            return Err(SyncError::validation(format!(
                "not a valid ticket URL: {url:?}"
            )));
        }
        let slots = self.slots(channel);
        let mut state = slots.state.lock().expect("link state lock poisoned");
        *state = LinkState::Linked {
            url: url.to_string(),
        };
        Ok(())
    }

    /// Attach (or re-attach) the ticket link.
    ///
    /// The URL must pass the ticket pattern before any network I/O;
    /// a failing URL returns [`SyncError::Validation`] without touching
    /// the sink. On success the committed state becomes `Linked`; on a
    /// rejected request the server body is surfaced verbatim and the
    /// committed state is unchanged.
    pub async fn submit_link(
        &self,
        channel: &ChannelId,
        url: &str,
        sink: &dyn StatusSink,
    ) -> Result<(), SyncError> {
        let url = url.trim();
        if !url::is_valid_ticket_url(url) {
            return Err(SyncError::validation(format!(
                "not a valid ticket URL: {url:?}"
            )));
        }

        let slots = self.slots(channel);
        let token = slots.link.begin(sink);

        let form = [("trello_url", url.to_string())];
        let result = self
            .api
            .post_form(&format!("/services/trello/{channel}/save_trello_url/"), &form)
            .await;

        match result {
            Ok(_) => {
                let next = LinkState::Linked {
                    url: url.to_string(),
                };
                if !slots.commit_link(token, next, sink, "Saved ticket link") {
                    return Err(SyncError::Stale);
                }
                Ok(())
            }
            Err(err) => {
                let emitted = slots
                    .link
                    .finish_if_current(token, || sink.on_error(&err.to_string()));
                if emitted.is_none() {
                    return Err(SyncError::Stale);
                }
                Err(err)
            }
        }
    }

    /// Detach the ticket link. `confirm` is the interactive gate; when
    /// it declines, no request is issued at all.
    pub async fn remove_link(
        &self,
        channel: &ChannelId,
        sink: &dyn StatusSink,
        confirm: impl FnOnce() -> bool,
    ) -> Result<RemoveOutcome, SyncError> {
        if !confirm() {
            return Ok(RemoveOutcome::Cancelled);
        }

        let slots = self.slots(channel);
        let token = slots.link.begin(sink);

        // Clearing uses the same save endpoint with an empty value.
        let form = [("trello_url", String::new())];
        let result = self
            .api
            .post_form(&format!("/services/trello/{channel}/save_trello_url/"), &form)
            .await;

        match result {
            Ok(_) => {
                if !slots.commit_link(token, LinkState::NoLink, sink, "Removed ticket link") {
                    return Err(SyncError::Stale);
                }
                Ok(RemoveOutcome::Removed)
            }
            Err(err) => {
                let emitted = slots
                    .link
                    .finish_if_current(token, || sink.on_error(&err.to_string()));
                if emitted.is_none() {
                    return Err(SyncError::Stale);
                }
                Err(err)
            }
        }
    }

    /// Append (or refresh) a checklist item on the linked ticket.
    ///
    /// The item text is sent literally; the backend stamps the request
    /// time and enforces idempotency by name prefix. The client never
    /// de-duplicates.
    pub async fn add_checklist_item(
        &self,
        channel: &ChannelId,
        item: &str,
        success_message: &str,
        sink: &dyn StatusSink,
    ) -> Result<(), SyncError> {
        let slots = self.slots(channel);
        let slot = &slots.checklist;
        let token = slot.begin(sink);

        let form = [("item", item.to_string())];
        let result = self
            .api
            .post_form(&format!("/services/trello/{channel}/add_item/"), &form)
            .await;

        Self::finish(slot, token, sink, result.map(|_| ()), success_message)
    }

    /// Move the linked ticket to a workflow list. PUT semantics:
    /// idempotent-intended and safe to retry by hand, never retried
    /// automatically.
    pub async fn move_to_list(
        &self,
        channel: &ChannelId,
        list: WorkflowList,
        success_message: &str,
        sink: &dyn StatusSink,
    ) -> Result<(), SyncError> {
        let slots = self.slots(channel);
        let slot = &slots.workflow;
        let token = slot.begin(sink);

        let result = self
            .api
            .put(&format!("/services/trello/{channel}/{}/", list.endpoint()))
            .await;

        Self::finish(slot, token, sink, result.map(|_| ()), success_message)
    }

    /// Post a comment on the linked ticket. Whitespace-only text is a
    /// client-side validation failure and issues no request.
    pub async fn send_comment(
        &self,
        channel: &ChannelId,
        text: &str,
        sink: &dyn StatusSink,
    ) -> Result<(), SyncError> {
        if text.trim().is_empty() {
            return Err(SyncError::validation("comment must not be empty"));
        }

        let slots = self.slots(channel);
        let slot = &slots.comment;
        let token = slot.begin(sink);

        let form = [("comment", text.to_string())];
        let result = self
            .api
            .post_form(&format!("/services/trello/{channel}/send_comment/"), &form)
            .await;

        Self::finish(slot, token, sink, result.map(|_| ()), "Comment sent")
    }

    /// Legacy QA path: moves the card and provisions a QA sheet.
    pub async fn flag_for_qa(
        &self,
        channel: &ChannelId,
        sink: &dyn StatusSink,
    ) -> Result<QaSheet, SyncError> {
        let slots = self.slots(channel);
        let slot = &slots.workflow;
        let token = slot.begin(sink);

        let form: [(&str, String); 0] = [];
        let result: Result<QaSheet, SyncError> = self
            .api
            .post_form_json(&format!("/api/channels/{channel}/flag_for_qa/"), &form)
            .await;

        let outcome = slot.finish_if_current(token, || match result {
            Ok(sheet) => {
                sink.on_success("Flagged channel for QA");
                Ok(sheet)
            }
            Err(err) => {
                sink.on_error(&err.to_string());
                Err(err)
            }
        });
        outcome.unwrap_or(Err(SyncError::Stale))
    }

    /// Uniform completion: discard stale responses silently (the newer
    /// request owns the slot's presentation), otherwise drive the sink
    /// under the slot lock.
    fn finish(
        slot: &Slot,
        token: SlotToken,
        sink: &dyn StatusSink,
        result: Result<(), SyncError>,
        success_message: &str,
    ) -> Result<(), SyncError> {
        let outcome = slot.finish_if_current(token, || match result {
            Ok(()) => {
                sink.on_success(success_message);
                Ok(())
            }
            Err(err) => {
                sink.on_error(&err.to_string());
                Err(err)
            }
        });
        outcome.unwrap_or(Err(SyncError::Stale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::NullSink;

    #[test]
    fn link_state_defaults_to_no_link() {
        assert_eq!(LinkState::default(), LinkState::NoLink);
        assert!(!LinkState::NoLink.is_linked());
        assert!(
            LinkState::Linked {
                url: "https://trello.com/c/aBcD1234/card".into()
            }
            .is_linked()
        );
    }

    #[test]
    fn commit_link_refuses_superseded_tokens() {
        let slots = ChannelSlots::default();
        let old = slots.link.begin(&NullSink);
        let newer = slots.link.begin(&NullSink);

        let next = LinkState::Linked {
            url: "https://trello.com/c/aBcD1234/new".into(),
        };
        let applied = slots.commit_link(newer, next, &NullSink, "saved");
        assert!(applied);

        // The older request's completion arrives afterwards and must
        // not overwrite the newer commit.
        let applied = slots.commit_link(old, LinkState::NoLink, &NullSink, "removed");
        assert!(!applied);
        assert!(slots.state.lock().unwrap().is_linked());
    }

    #[test]
    fn superseded_commit_emits_no_sink_phase() {
        let slots = ChannelSlots::default();
        let sink = crate::slot::AlertSink::new();
        let old = slots.link.begin(&sink);
        let _newer = slots.link.begin(&sink);

        let next = LinkState::Linked {
            url: "https://trello.com/c/aBcD1234/old".into(),
        };
        assert!(!slots.commit_link(old, next, &sink, "saved"));
        // The newer request still owns the slot's presentation.
        assert_eq!(sink.state(), crate::slot::AlertState::Pending);
    }
}
