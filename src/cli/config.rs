use std::path::{Path, PathBuf};

use hazards::{session::config_path, Config};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
/// Show or modify workspace configuration
///
/// Configuration is stored in .hazdb/config.toml.
///
/// Available configuration keys:
///   `search_limit`         Maximum number of search results (1-20, default: 20)
///   `recent_limit`         Number of recent searches kept (1-5, default: 5)
///   dataset              Path to an alternate JSON dataset (default: bundled)
///   `bookmarks_key`        Storage key for bookmarks (read-only)
///   `recent_searches_key`  Storage key for recent searches (read-only)
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show all configuration values
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key to retrieve
        key: String,
    },

    /// Set a configuration value
    ///
    /// Examples:
    ///   hazdb config set `search_limit` 10
    ///   hazdb config set dataset data/site-hazards.json
    ///   hazdb config set dataset none
    Set {
        /// Configuration key to set
        ///
        /// Settable keys: `search_limit`, `recent_limit`, dataset
        key: String,

        /// Value to set
        value: String,
    },
}

const KEYS: &str =
    "search_limit\n  recent_limit\n  dataset\n  bookmarks_key\n  recent_searches_key";

impl Command {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config_path = config_path(root);

        match self.command {
            ConfigCommand::Show => Self::show_config(&config_path),
            ConfigCommand::Get { key } => Self::get_config(&config_path, &key),
            ConfigCommand::Set { key, value } => Self::set_config(&config_path, &key, &value),
        }
    }

    fn load(config_path: &Path) -> anyhow::Result<Config> {
        if config_path.exists() {
            Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))
        } else {
            Ok(Config::default())
        }
    }

    fn show_config(config_path: &Path) -> anyhow::Result<()> {
        let config = Self::load(config_path)?;

        println!("Configuration:");
        println!("  search_limit: {}", config.search_limit());
        println!("  recent_limit: {}", config.recent_limit());
        match &config.dataset {
            Some(path) => println!("  dataset: {}", path.display()),
            None => println!("  dataset: {}", "bundled".dim()),
        }
        println!("  bookmarks_key: {}", config.bookmarks_key());
        println!("  recent_searches_key: {}", config.recent_searches_key());
        Ok(())
    }

    fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
        let config = Self::load(config_path)?;

        match key {
            "search_limit" => println!("{}", config.search_limit()),
            "recent_limit" => println!("{}", config.recent_limit()),
            "dataset" => match &config.dataset {
                Some(path) => println!("{}", path.display()),
                None => println!("bundled"),
            },
            "bookmarks_key" => println!("{}", config.bookmarks_key()),
            "recent_searches_key" => println!("{}", config.recent_searches_key()),
            _ => {
                anyhow::bail!("Unknown configuration key: '{key}'\n\nAvailable keys:\n  {KEYS}");
            }
        }
        Ok(())
    }

    fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
        let mut config = Self::load(config_path)?;

        match key {
            "search_limit" | "recent_limit" => {
                let limit = value
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("Value must be a whole number"))?;
                let result = if key == "search_limit" {
                    config.set_search_limit(limit)
                } else {
                    config.set_recent_limit(limit)
                };
                result.map_err(|e| anyhow::anyhow!("{e}"))?;
            }
            "dataset" => {
                config.dataset = match value {
                    "" | "none" | "bundled" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "bookmarks_key" | "recent_searches_key" => {
                anyhow::bail!("'{key}' is read-only: changing it would orphan saved state");
            }
            _ => {
                anyhow::bail!("Unknown configuration key: '{key}'\n\nAvailable keys:\n  {KEYS}");
            }
        }

        config
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("{} {key} = {value}", "✓ Set".success());
        Ok(())
    }
}
