use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::instrument;

use super::{open_session, terminal::Colorize, OutputFormat};

#[derive(Debug, Parser, Default)]
#[command(about = "Show hazard, bookmark and recent-search counts")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    hazards: usize,
    categories: usize,
    bookmarks: usize,
    recent_searches: &'a [String],
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let session = open_session(root)?;

        let summary = Summary {
            hazards: session.records().len(),
            categories: session.categories().len().saturating_sub(1),
            bookmarks: session.bookmarked_records().count(),
            recent_searches: session.recent_searches(),
        };

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Table => Self::output_table(&summary),
        }
        Ok(())
    }

    fn output_table(summary: &Summary) {
        if summary.hazards == 0 {
            println!("The hazard database is empty.");
            return;
        }

        println!(
            "{} hazards in {} categories",
            summary.hazards, summary.categories
        );
        if summary.bookmarks == 0 {
            println!("{}", "No bookmarks yet. Add one with 'hazdb bookmark <ID>'.".dim());
        } else {
            println!("{} bookmarked", summary.bookmarks.to_string().success());
        }
        if !summary.recent_searches.is_empty() {
            println!(
                "Recent searches: {}",
                summary.recent_searches.join(", ").info()
            );
        }
    }
}
