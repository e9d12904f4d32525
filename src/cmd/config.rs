//! Configuration view and validation commands — `chansync config`.

use anyhow::Result;

use super::super::{Cli, ConfigCommands};
use super::load_config;

pub fn cmd_config(cli: &Cli, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            let config = load_config(cli)?;
            println!();
            println!("chansync configuration");
            println!("======================");
            println!();
            println!("base_url     = {:?}", config.base_url);
            println!(
                "api_token    = {}",
                if config.api_token.is_some() {
                    "(set)"
                } else {
                    "(not set)"
                }
            );
            println!("timeout_secs = {}", config.timeout.as_secs());
            println!();
        }
        Some(ConfigCommands::Validate) => match load_config(cli) {
            Ok(_) => println!("{}", console::style("Configuration is valid.").green()),
            Err(err) => {
                eprintln!("{} {err:#}", console::style("✗").red().bold());
                return Err(err);
            }
        },
    }
    Ok(())
}
