//! Channel control commands — `chansync control`, `chansync follow`.

use anyhow::Result;

use chansync::channel::{ChannelId, ControlArgs, ControlCommand, ControlRequest};
use chansync::control::ControlClient;

use super::super::{Cli, ControlCommands};
use super::{ConsoleSink, report, transport};

pub async fn cmd_control(cli: &Cli, command: &ControlCommands) -> Result<()> {
    let api = transport(cli)?;
    let client = ControlClient::new(api);
    let sink = ConsoleSink;

    let (channel, request) = match command {
        ControlCommands::Start {
            channel,
            update,
            stage,
            publish,
        } => (
            ChannelId::from(channel.as_str()),
            ControlRequest::new(ControlCommand::Start, ControlArgs {
                update: *update,
                stage: *stage,
                publish: *publish,
            }),
        ),
        ControlCommands::Stop { channel } => (
            ChannelId::from(channel.as_str()),
            ControlRequest::new(ControlCommand::Stop, ControlArgs::default()),
        ),
    };

    report(client.send(&channel, &request, &sink).await.map(|_| ()))
}

pub async fn cmd_follow(cli: &Cli, channel: &str, remove: bool) -> Result<()> {
    let api = transport(cli)?;
    let client = ControlClient::new(api);
    let channel = ChannelId::from(channel);

    report(
        client
            .save_to_profile(&channel, !remove, &ConsoleSink)
            .await,
    )
}
