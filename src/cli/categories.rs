use std::path::Path;

use clap::Parser;
use tracing::instrument;

use super::{open_session, terminal::Colorize, OutputFormat};

#[derive(Debug, Parser)]
#[command(about = "List categories with hazard counts")]
pub struct Categories {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Categories {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let session = open_session(root)?;
        let categories = session.categories();

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(categories)?),
            OutputFormat::Table => {
                for entry in categories {
                    println!(
                        "{:<16} {:<22} {:>4}",
                        entry.id.as_str(),
                        entry.name,
                        entry.count.to_string().info()
                    );
                }
            }
        }
        Ok(())
    }
}
