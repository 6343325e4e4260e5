use std::path::Path;

use clap::Parser;
use hazards::{CategoryFilter, HazardRecord, RiskBand};
use tracing::instrument;

use super::{open_session, print_json, print_table, OutputFormat};

/// Command arguments for `hazdb list`.
#[derive(Debug, Parser)]
#[command(about = "List hazards, optionally filtered by category")]
pub struct List {
    /// Category to show ("all" for every category).
    #[arg(long, short, default_value = "all", value_name = "ID")]
    category: CategoryFilter,

    /// Show only bookmarked hazards.
    #[arg(long)]
    bookmarked: bool,

    /// Show only hazards in this band or above (low, medium, high, extreme).
    #[arg(long, value_name = "BAND")]
    min_band: Option<RiskBand>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;

        if let CategoryFilter::Category(id) = &self.category {
            if !session.categories().iter().any(|c| c.id == self.category) {
                anyhow::bail!(
                    "Unknown category '{id}'. Run 'hazdb categories' to see the available ones."
                );
            }
        }
        session.set_active_category(self.category.clone());

        let rows: Vec<&HazardRecord> = session
            .visible_records()
            .filter(|record| !self.bookmarked || session.is_bookmarked(&record.id))
            .filter(|record| self.min_band.is_none_or(|band| record.band() >= band))
            .collect();

        match self.output {
            OutputFormat::Json => print_json(rows)?,
            OutputFormat::Table => {
                if rows.is_empty() {
                    println!("No hazards match.");
                } else {
                    print_table(rows, |id| session.is_bookmarked(id));
                }
            }
        }
        Ok(())
    }
}
