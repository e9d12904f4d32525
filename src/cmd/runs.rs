//! Run history command — `chansync runs`.

use anyhow::Result;

use chansync::channel::ChannelId;
use chansync::runs::{RunsClient, chartable};

use super::super::Cli;
use super::transport;

pub async fn cmd_runs(cli: &Cli, channel: &str, limit: usize) -> Result<()> {
    let api = transport(cli)?;
    let client = RunsClient::new(api);
    let channel = ChannelId::from(channel);

    let runs = client.fetch(&channel).await?;
    let total = runs.len();
    let selected = chartable(runs, limit);

    if selected.is_empty() {
        println!("No runs with resource counts for channel {channel}.");
        return Ok(());
    }

    println!(
        "{} ({} of {} runs)",
        console::style(format!("Resource counts for {channel}")).bold(),
        selected.len(),
        total
    );
    for run in &selected {
        let counts = run
            .resource_counts
            .as_ref()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(name, count)| format!("{name}: {count}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "  {}  {}",
            console::style(run.created_at.format("%b %d").to_string()).dim(),
            counts
        );
    }

    Ok(())
}
