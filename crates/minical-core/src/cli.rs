use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::grid::CalendarMode;
use crate::model::EventId;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "minical",
    version,
    about = "Minimal calendar: tagged events in Year, Month, Week and Day views"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file (defaults to $MINICAL_CONFIG or ~/.config/minical/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Event store file, overriding storage.path
    #[arg(long = "store", global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the calendar
    Show(ShowArgs),

    /// Add an event
    Add(AddArgs),

    /// List tags
    Tags,

    /// Add a tag or change its colour
    Tag {
        name: String,

        #[arg(long = "color")]
        color: Option<String>,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// year, month, week or day (defaults to startup.mode)
    #[arg(long = "mode")]
    pub mode: Option<CalendarMode>,

    /// Reference date: YYYY-MM-DD, today, tomorrow or yesterday
    #[arg(long = "date")]
    pub date: Option<String>,

    /// Navigation applied in order: prev, next, up, down:<date>, mode:<mode>
    #[arg(long = "nav", action = ArgAction::Append)]
    pub nav: Vec<String>,

    /// Show the popup for this event id
    #[arg(long = "hover")]
    pub hover: Option<EventId>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long = "title")]
    pub title: String,

    #[arg(long = "tag")]
    pub tag: String,

    #[arg(long = "description")]
    pub description: String,

    #[arg(long = "start")]
    pub start: String,

    /// Defaults to the start date
    #[arg(long = "end")]
    pub end: Option<String>,

    /// Start time, HH:MM
    #[arg(long = "from")]
    pub from: String,

    /// End time, HH:MM
    #[arg(long = "to")]
    pub to: String,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
