//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant family:
//!
//! | Module     | Commands handled        |
//! |------------|-------------------------|
//! | `control`  | `Control`, `Follow`     |
//! | `ticket`   | `Ticket`                |
//! | `runs`     | `Runs`                  |
//! | `config`   | `Config`                |

pub mod config;
pub mod control;
pub mod runs;
pub mod ticket;

pub use config::cmd_config;
pub use control::{cmd_control, cmd_follow};
pub use runs::cmd_runs;
pub use ticket::cmd_ticket;

use std::sync::Arc;

use anyhow::Result;

use chansync::config::{Config, ConfigOverrides};
use chansync::errors::SyncError;
use chansync::slot::StatusSink;
use chansync::transport::ApiTransport;

use super::Cli;

/// Build the shared transport from resolved configuration.
pub(crate) fn transport(cli: &Cli) -> Result<Arc<ApiTransport>> {
    let config = load_config(cli)?;
    Ok(Arc::new(ApiTransport::new(&config)?))
}

pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(ConfigOverrides {
        base_url: cli.base_url.clone(),
        api_token: cli.token.clone(),
    })
}

/// Sink that renders the three phases as terminal lines.
pub(crate) struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn on_pending(&self) {
        eprintln!("{}", console::style("sending...").dim());
    }

    fn on_success(&self, message: &str) {
        println!("{} {}", console::style("✓").green().bold(), message);
    }

    fn on_error(&self, message: &str) {
        eprintln!("{} {}", console::style("✗").red().bold(), message);
    }
}

/// Validation failures are local input problems; render them
/// distinctly from request errors and exit nonzero either way.
pub(crate) fn report(result: Result<(), SyncError>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err @ SyncError::Validation(_)) => {
            eprintln!("{} {}", console::style("!").yellow().bold(), err);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
