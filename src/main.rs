use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "chansync")]
#[command(version, about = "Dashboard sync client for channel control and ticket workflow")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    /// Dashboard backend base URL (overrides config file and env)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token (overrides config file and env)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start or stop a channel's processing job
    Control {
        #[command(subcommand)]
        command: ControlCommands,
    },
    /// Manage the channel's linked ticket
    Ticket {
        #[command(subcommand)]
        command: TicketCommands,
    },
    /// Show a channel's run history
    Runs {
        channel: String,
        /// How many chart-worthy runs to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Save or remove the channel on your profile
    Follow {
        channel: String,
        /// Remove instead of save
        #[arg(long)]
        remove: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ControlCommands {
    /// Start processing
    Start {
        channel: String,
        /// Re-fetch source content before processing
        #[arg(long)]
        update: bool,
        /// Stage the result instead of deploying it
        #[arg(long)]
        stage: bool,
        /// Publish when the run completes
        #[arg(long)]
        publish: bool,
    },
    /// Stop processing
    Stop { channel: String },
}

#[derive(Subcommand)]
pub enum TicketCommands {
    /// Attach or replace the ticket link
    Link { channel: String, url: String },
    /// Detach the ticket link
    Unlink { channel: String },
    /// Add an item to the ticket's checklist
    Checklist {
        channel: String,
        item: String,
        /// Message to show on success
        #[arg(long, default_value = "Added checklist item")]
        message: String,
    },
    /// Move the ticket to a workflow list
    Move {
        channel: String,
        list: ListArg,
    },
    /// Post a comment on the ticket
    Comment { channel: String, text: String },
    /// Flag the channel for QA (also provisions a QA sheet)
    FlagQa { channel: String },
}

#[derive(ValueEnum, Clone, Copy)]
pub enum ListArg {
    Qa,
    Publish,
    Done,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any problems
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "chansync=debug"
    } else {
        "chansync=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Control { command } => cmd::cmd_control(&cli, command).await?,
        Commands::Ticket { command } => cmd::cmd_ticket(&cli, command).await?,
        Commands::Runs { channel, limit } => cmd::cmd_runs(&cli, channel, *limit).await?,
        Commands::Follow { channel, remove } => cmd::cmd_follow(&cli, channel, *remove).await?,
        Commands::Config { command } => cmd::cmd_config(&cli, command.clone())?,
    }

    Ok(())
}
