//! Ticket link commands — `chansync ticket`.

use anyhow::Result;
use dialoguer::Confirm;

use chansync::channel::{ChannelId, WorkflowList};
use chansync::ticket::{RemoveOutcome, TicketClient};

use super::super::{Cli, ListArg, TicketCommands};
use super::{ConsoleSink, report, transport};

impl From<ListArg> for WorkflowList {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Qa => WorkflowList::Qa,
            ListArg::Publish => WorkflowList::Publish,
            ListArg::Done => WorkflowList::Done,
        }
    }
}

pub async fn cmd_ticket(cli: &Cli, command: &TicketCommands) -> Result<()> {
    let api = transport(cli)?;
    let client = TicketClient::new(api);
    let sink = ConsoleSink;

    match command {
        TicketCommands::Link { channel, url } => {
            let channel = ChannelId::from(channel.as_str());
            report(client.submit_link(&channel, url, &sink).await)
        }
        TicketCommands::Unlink { channel } => {
            let channel = ChannelId::from(channel.as_str());
            let assume_yes = cli.yes;
            let outcome = client
                .remove_link(&channel, &sink, || {
                    assume_yes
                        || Confirm::new()
                            .with_prompt(format!("Remove the ticket link from {channel}?"))
                            .default(false)
                            .interact()
                            .unwrap_or(false)
                })
                .await?;
            if outcome == RemoveOutcome::Cancelled {
                println!("{}", console::style("Cancelled.").dim());
            }
            Ok(())
        }
        TicketCommands::Checklist {
            channel,
            item,
            message,
        } => {
            let channel = ChannelId::from(channel.as_str());
            report(
                client
                    .add_checklist_item(&channel, item, message, &sink)
                    .await,
            )
        }
        TicketCommands::Move { channel, list } => {
            let channel = ChannelId::from(channel.as_str());
            let list = WorkflowList::from(*list);
            let message = match list {
                WorkflowList::Qa => "Flagged channel for QA",
                WorkflowList::Publish => "Flagged channel for publish",
                WorkflowList::Done => "Marked channel as done",
            };
            report(client.move_to_list(&channel, list, message, &sink).await)
        }
        TicketCommands::Comment { channel, text } => {
            let channel = ChannelId::from(channel.as_str());
            report(client.send_comment(&channel, text, &sink).await)
        }
        TicketCommands::FlagQa { channel } => {
            let channel = ChannelId::from(channel.as_str());
            let sheet = client.flag_for_qa(&channel, &sink).await?;
            println!("QA sheet: {}", sheet.qa_sheet_id);
            Ok(())
        }
    }
}
