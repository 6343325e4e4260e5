use std::path::Path;

use clap::Parser;
use hazards::{HazardId, HazardRecord};
use serde::Serialize;
use tracing::instrument;

use super::{open_session, parse_hazard_id, rating_label, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Display the full detail of a hazard")]
pub struct Show {
    /// The id of the hazard to display
    #[clap(value_parser = parse_hazard_id)]
    id: HazardId,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Detail<'a> {
    #[serde(flatten)]
    record: &'a HazardRecord,
    risk_band: hazards::RiskBand,
    bookmarked: bool,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;
        let bookmarked = session.is_bookmarked(&self.id);
        let record = session.select_hazard(&self.id)?;

        match self.output {
            OutputFormat::Pretty => print_detail(record, bookmarked),
            OutputFormat::Json => {
                let detail = Detail {
                    record,
                    risk_band: record.band(),
                    bookmarked,
                };
                println!("{}", serde_json::to_string_pretty(&detail)?);
            }
        }
        Ok(())
    }
}

/// Print the detail sheet for a hazard.
pub fn print_detail(record: &HazardRecord, bookmarked: bool) {
    let star = if bookmarked { " ★" } else { "" };
    println!("# {}{star}", record.hazard);
    println!("{}\n", record.consequence);

    println!("{}", "Summary".dim());
    println!("  Id:        {}", record.id);
    println!("  Category:  {}", record.category.display_name());
    println!("  Risk:      {}", rating_label(record));

    if !record.control_measures.is_empty() {
        println!("\n{}", "Control measures".dim());
        for (tier, measures) in record.control_measures.tiers() {
            println!("  {tier}");
            for measure in measures {
                println!("    • {measure}");
            }
        }
    }

    print_section("BS 7671 references", &record.bs7671_references);
    print_section("Guidance", &record.guidance_notes);
    print_section("Emergency procedures", &record.emergency_procedures);
    print_section("Training required", &record.training_required);
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", title.dim());
    for item in items {
        println!("  • {item}");
    }
}
