use std::path::Path;

use clap::Parser;
use tracing::instrument;

use super::{open_session, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Show or clear recent searches")]
pub struct Recent {
    /// Forget all recent searches
    #[arg(long)]
    clear: bool,
}

impl Recent {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut session = open_session(root)?;

        if self.clear {
            session.clear_recent_searches();
            println!("Cleared recent searches");
            return Ok(());
        }

        let terms = session.recent_searches();
        if terms.is_empty() {
            println!("{}", "No recent searches".dim());
        }
        for (i, term) in terms.iter().enumerate() {
            println!("{:>2}. {term}", i + 1);
        }
        Ok(())
    }
}
