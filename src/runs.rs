//! Run history for a channel, and the chart-worthy subset of it.
//! Rendering is someone else's job; this module only fetches and
//! shapes the data.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::channel::ChannelId;
use crate::errors::SyncError;
use crate::transport::ApiTransport;

/// Pseudo-resources the resource chart never plots.
const EXCLUDED_RESOURCES: [&str; 2] = ["total", "json"];

/// One processing run, as returned by the run-history endpoint.
/// Older runs predate resource counting and carry no counts.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRun {
    #[serde(default)]
    pub run_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resource_counts: Option<BTreeMap<String, u64>>,
}

pub struct RunsClient {
    api: Arc<ApiTransport>,
}

impl RunsClient {
    pub fn new(api: Arc<ApiTransport>) -> Self {
        Self { api }
    }

    /// Newest-first run history for the channel.
    pub async fn fetch(&self, channel: &ChannelId) -> Result<Vec<ChannelRun>, SyncError> {
        self.api
            .get_json(&format!("/api/channels/{channel}/runs/"))
            .await
    }
}

/// Select the runs the resource chart would plot: drop runs without
/// counts, keep the first `limit` (the feed is newest-first), and
/// strip the aggregate pseudo-resources from each count map.
pub fn chartable(runs: Vec<ChannelRun>, limit: usize) -> Vec<ChannelRun> {
    runs.into_iter()
        .filter(|run| run.resource_counts.is_some())
        .take(limit)
        .map(|mut run| {
            if let Some(counts) = run.resource_counts.as_mut() {
                for key in EXCLUDED_RESOURCES {
                    counts.remove(key);
                }
            }
            run
        })
        .collect()
}
