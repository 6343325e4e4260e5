use std::path::Path;

use clap::Parser;
use hazards::HazardId;
use tracing::instrument;

use super::{open_session, parse_hazard_id, print_json, print_table, show, OutputFormat};

#[derive(Debug, Parser)]
#[command(about = "Search hazards by label, consequence or category")]
pub struct Search {
    /// Text to search for (case-insensitive)
    query: String,

    /// Open one of the results and remember the search
    #[arg(long, value_parser = parse_hazard_id, value_name = "ID")]
    select: Option<HazardId>,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Search {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;
        session.open_search();
        session.set_search_query(self.query.as_str());

        if let Some(id) = &self.select {
            let bookmarked = session.is_bookmarked(id);
            let record = session.select_search_result(id)?;
            show::print_detail(record, bookmarked);
            return Ok(());
        }

        let results = session.search_results();
        match self.output {
            OutputFormat::Json => print_json(results)?,
            OutputFormat::Table => {
                if results.is_empty() {
                    println!("No hazards match '{}'.", self.query.trim());
                } else {
                    print_table(results, |id| session.is_bookmarked(id));
                }
            }
        }
        Ok(())
    }
}
