use std::path::Path;

use clap::Parser;
use hazards::HazardId;
use tracing::instrument;

use super::{open_session, parse_hazard_id, print_json, print_table, terminal::Colorize, OutputFormat};

#[derive(Debug, Parser)]
#[command(about = "Toggle the bookmark on a hazard")]
pub struct Bookmark {
    /// The id of the hazard to bookmark or unbookmark
    #[clap(value_parser = parse_hazard_id)]
    id: HazardId,
}

impl Bookmark {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;
        let Some(record) = session.get(&self.id) else {
            anyhow::bail!("Hazard {} not found", self.id);
        };
        let label = record.hazard.clone();

        if session.toggle_bookmark(&self.id) {
            println!("{} {label}", "★ Bookmarked".success());
        } else {
            println!("{} {label}", "Removed bookmark:".dim());
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "List bookmarked hazards")]
pub struct Bookmarks {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Bookmarks {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;
        session.open_bookmarks();

        let records: Vec<_> = session.bookmarked_records().collect();
        match self.output {
            OutputFormat::Json => print_json(records)?,
            OutputFormat::Table => {
                if records.is_empty() {
                    println!("No bookmarks yet. Add one with 'hazdb bookmark <ID>'.");
                } else {
                    print_table(records, |_| true);
                }
            }
        }
        Ok(())
    }
}
