use std::path::{Path, PathBuf};

mod bookmark;
mod browse;
mod categories;
mod config;
mod list;
mod recent;
mod search;
mod show;
mod status;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use hazards::{FileStore, HazardId, HazardRecord, Session};
use terminal::{is_narrow, Colorize};

/// Parse a hazard id from a command-line argument.
fn parse_hazard_id(s: &str) -> Result<HazardId, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Open the session for a workspace root, attaching the root to any error.
fn open_session(root: &Path) -> anyhow::Result<Session<FileStore>> {
    Session::open(root)
        .with_context(|| format!("Failed to open hazard database at {}", root.display()))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The workspace root holding `.hazdb/`
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(status::Status::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show database and saved-state counts (default)
    Status(status::Status),

    /// List categories with hazard counts
    Categories(categories::Categories),

    /// List hazards, optionally filtered by category
    List(list::List),

    /// Search hazards by label, consequence or category
    ///
    /// Matching is case-insensitive and results are capped.
    Search(search::Search),

    /// Show the full detail of a hazard
    Show(show::Show),

    /// Toggle the bookmark on a hazard
    Bookmark(bookmark::Bookmark),

    /// List bookmarked hazards
    Bookmarks(bookmark::Bookmarks),

    /// Show or clear recent searches
    Recent(recent::Recent),

    /// Show or modify configuration settings
    Config(config::Command),

    /// Browse interactively
    Browse(browse::Browse),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Categories(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Search(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Bookmark(command) => command.run(root)?,
            Self::Bookmarks(command) => command.run(root)?,
            Self::Recent(command) => command.run(root)?,
            Self::Config(command) => command.run(root)?,
            Self::Browse(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Output formats shared by the listing commands.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Colour a risk rating according to its band.
fn rating_label(record: &HazardRecord) -> String {
    format!("{:>2} {:<7}", record.risk_rating, record.band()).band(record.band())
}

/// Print records as a table, marking bookmarked ones.
fn print_table<'a>(
    records: impl IntoIterator<Item = &'a HazardRecord>,
    is_bookmarked: impl Fn(&HazardId) -> bool,
) {
    let narrow = is_narrow();
    for record in records {
        let marker = if is_bookmarked(&record.id) { "★" } else { " " };
        if narrow {
            println!("{marker} {} {}", record.id, rating_label(record));
            println!("    {}", record.hazard);
        } else {
            println!(
                "{marker} {:<26} {} {:<18} {}",
                record.id,
                rating_label(record),
                record.category.display_name().dim(),
                record.hazard
            );
        }
    }
}

/// Print records as a JSON array.
fn print_json<'a>(records: impl IntoIterator<Item = &'a HazardRecord>) -> anyhow::Result<()> {
    let records: Vec<_> = records.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
