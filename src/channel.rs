//! Channel-level domain types shared by the control and ticket clients.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SyncError;

/// Opaque channel identifier, supplied by the dashboard backend.
/// The client never mints or interprets these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChannelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Start or stop the channel's backend processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCommand {
    Start,
    Stop,
}

impl ControlCommand {
    pub const fn as_str(self) -> &'static str {
        match self {
            ControlCommand::Start => "start",
            ControlCommand::Stop => "stop",
        }
    }
}

/// Flags captured from the control form at call time, never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlArgs {
    pub update: bool,
    pub stage: bool,
    pub publish: bool,
}

/// Immutable control request, constructed fresh per invocation.
///
/// The wire form matches what the legacy dashboard posted: flat form
/// fields with `args` and `options` JSON-encoded inside the form body.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRequest {
    pub command: ControlCommand,
    pub args: ControlArgs,
    pub options: BTreeMap<String, serde_json::Value>,
}

impl ControlRequest {
    pub fn new(command: ControlCommand, args: ControlArgs) -> Self {
        Self {
            command,
            args,
            options: BTreeMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Flatten into the `command`/`args`/`options` form fields the
    /// control endpoint expects.
    pub fn form_fields(&self) -> Result<Vec<(&'static str, String)>, SyncError> {
        Ok(vec![
            ("command", self.command.as_str().to_string()),
            ("args", serde_json::to_string(&self.args)?),
            ("options", serde_json::to_string(&self.options)?),
        ])
    }
}

/// Acknowledgement from the control endpoint. The backend replies with
/// an opaque body; callers only need to know the command was accepted.
#[derive(Debug, Clone, Default)]
pub struct ControlAck {
    pub body: String,
}

/// Workflow lists a channel's ticket can be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowList {
    Qa,
    Publish,
    Done,
}

impl WorkflowList {
    /// Path segment under `/services/trello/{id}/`.
    pub const fn endpoint(self) -> &'static str {
        match self {
            WorkflowList::Qa => "flag_for_qa",
            WorkflowList::Publish => "flag_for_publish",
            WorkflowList::Done => "mark_as_done",
        }
    }
}

/// Response from the legacy flag-for-QA path, which also provisions a
/// QA sheet for the channel.
#[derive(Debug, Clone, Deserialize)]
pub struct QaSheet {
    pub qa_sheet_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_request_form_fields_encode_args_as_json_string() {
        let request = ControlRequest::new(
            ControlCommand::Start,
            ControlArgs {
                update: true,
                stage: false,
                publish: true,
            },
        );
        let fields = request.form_fields().unwrap();
        assert_eq!(fields[0], ("command", "start".to_string()));
        assert_eq!(
            fields[1],
            (
                "args",
                r#"{"update":true,"stage":false,"publish":true}"#.to_string()
            )
        );
        assert_eq!(fields[2], ("options", "{}".to_string()));
    }

    #[test]
    fn control_request_options_survive_encoding() {
        let request = ControlRequest::new(ControlCommand::Stop, ControlArgs::default())
            .with_option("--publish", serde_json::json!(false));
        let fields = request.form_fields().unwrap();
        assert_eq!(fields[0].1, "stop");
        assert_eq!(fields[2].1, r#"{"--publish":false}"#);
    }

    #[test]
    fn workflow_list_endpoints_match_legacy_paths() {
        assert_eq!(WorkflowList::Qa.endpoint(), "flag_for_qa");
        assert_eq!(WorkflowList::Publish.endpoint(), "flag_for_publish");
        assert_eq!(WorkflowList::Done.endpoint(), "mark_as_done");
    }

    #[test]
    fn channel_id_is_opaque_and_displayable() {
        let id = ChannelId::from("3ec84bcce06f4a13938d1718aa4b56d5");
        assert_eq!(id.to_string(), "3ec84bcce06f4a13938d1718aa4b56d5");
        assert_eq!(id.as_str(), "3ec84bcce06f4a13938d1718aa4b56d5");
    }

    #[test]
    fn qa_sheet_deserializes() {
        let sheet: QaSheet =
            serde_json::from_str(r#"{"qa_sheet_id": "1aBcD"}"#).unwrap();
        assert_eq!(sheet.qa_sheet_id, "1aBcD");
    }
}
