use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for a hazard database workspace.
///
/// Controls search and history limits, the storage keys the persisted stores
/// use, and which dataset is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Maximum number of search results returned.
    search_limit: usize,

    /// Maximum number of recent search terms kept.
    recent_limit: usize,

    /// Storage key holding the bookmarked hazard ids.
    bookmarks_key: String,

    /// Storage key holding the recent search terms.
    recent_searches_key: String,

    /// Optional path to an alternate JSON dataset.
    ///
    /// Relative paths are resolved against the workspace root. When unset,
    /// the dataset bundled with the binary is used.
    pub dataset: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            recent_limit: default_recent_limit(),
            bookmarks_key: default_bookmarks_key(),
            recent_searches_key: default_recent_searches_key(),
            dataset: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration, falling back to defaults if the file is
    /// missing or invalid.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// Parent directories are created if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {e}"))?;
        }
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the maximum number of search results.
    #[must_use]
    pub const fn search_limit(&self) -> usize {
        self.search_limit
    }

    /// Returns the maximum number of recent search terms.
    #[must_use]
    pub const fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Returns the storage key for bookmarks.
    #[must_use]
    pub fn bookmarks_key(&self) -> &str {
        &self.bookmarks_key
    }

    /// Returns the storage key for recent searches.
    #[must_use]
    pub fn recent_searches_key(&self) -> &str {
        &self.recent_searches_key
    }

    /// Sets the maximum number of search results.
    ///
    /// The limit can only be lowered from the default of 20.
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is zero or above the default.
    pub fn set_search_limit(&mut self, limit: usize) -> Result<(), String> {
        self.search_limit = check_limit("search_limit", limit, default_search_limit())?;
        Ok(())
    }

    /// Sets the maximum number of recent search terms.
    ///
    /// The limit can only be lowered from the default of 5.
    ///
    /// # Errors
    ///
    /// Returns an error if the limit is zero or above the default.
    pub fn set_recent_limit(&mut self, limit: usize) -> Result<(), String> {
        self.recent_limit = check_limit("recent_limit", limit, default_recent_limit())?;
        Ok(())
    }

    /// Resolves the dataset path against the workspace root.
    #[must_use]
    pub fn dataset_path(&self, root: &Path) -> Option<PathBuf> {
        self.dataset.as_ref().map(|path| root.join(path))
    }
}

fn check_limit(key: &str, limit: usize, max: usize) -> Result<usize, String> {
    if (1..=max).contains(&limit) {
        Ok(limit)
    } else {
        Err(format!("{key} must be between 1 and {max}"))
    }
}

const fn default_search_limit() -> usize {
    crate::domain::search::DEFAULT_LIMIT
}

const fn default_recent_limit() -> usize {
    crate::storage::recent::DEFAULT_LIMIT
}

fn default_bookmarks_key() -> String {
    "hazard-bookmarks".to_string()
}

fn default_recent_searches_key() -> String {
    "hazard-recent-searches".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_search_limit")]
        search_limit: usize,

        #[serde(default = "default_recent_limit")]
        recent_limit: usize,

        #[serde(default = "default_bookmarks_key")]
        bookmarks_key: String,

        #[serde(default = "default_recent_searches_key")]
        recent_searches_key: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        dataset: Option<PathBuf>,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                search_limit,
                recent_limit,
                bookmarks_key,
                recent_searches_key,
                dataset,
            } => Self {
                search_limit: search_limit.clamp(1, default_search_limit()),
                recent_limit: recent_limit.clamp(1, default_recent_limit()),
                bookmarks_key,
                recent_searches_key,
                dataset,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            search_limit: config.search_limit,
            recent_limit: config.recent_limit,
            bookmarks_key: config.bookmarks_key,
            recent_searches_key: config.recent_searches_key,
            dataset: config.dataset,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nsearch_limit = 10\nrecent_limit = 3\nbookmarks_key = \"bm\"\ndataset = \"data/site.json\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.search_limit(), 10);
        assert_eq!(config.recent_limit(), 3);
        assert_eq!(config.bookmarks_key(), "bm");
        assert_eq!(config.recent_searches_key(), "hazard-recent-searches");
        assert_eq!(
            config.dataset_path(Path::new("/site")),
            Some(PathBuf::from("/site/data/site.json"))
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
        assert_eq!(Config::load_or_default(&missing), Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nsearch_limit = \"twenty\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.search_limit(), 20);
        assert_eq!(actual.recent_limit(), 5);
    }

    #[test_case("search_limit = 0\nrecent_limit = 0", 1, 1; "zero")]
    #[test_case("search_limit = 50\nrecent_limit = 9", 20, 5; "above default")]
    #[test_case("search_limit = 12\nrecent_limit = 2", 12, 2; "in range")]
    fn limits_are_clamped_on_load(body: &str, search: usize, recent: usize) {
        let actual: Config = toml::from_str(&format!("_version = \"1\"\n{body}\n")).unwrap();
        assert_eq!(actual.search_limit(), search);
        assert_eq!(actual.recent_limit(), recent);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".hazdb").join("config.toml");

        let mut config = Config::default();
        config.set_search_limit(7).unwrap();
        config.dataset = Some(PathBuf::from("hazards.json"));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test_case(0, 0; "zero")]
    #[test_case(50, 9; "above default")]
    fn setters_reject_out_of_range(search: usize, recent: usize) {
        let mut config = Config::default();
        assert!(config.set_search_limit(search).is_err());
        assert!(config.set_recent_limit(recent).is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn setters_accept_defaults_and_below() {
        let mut config = Config::default();
        config.set_search_limit(20).unwrap();
        config.set_recent_limit(1).unwrap();
        assert_eq!(config.search_limit(), 20);
        assert_eq!(config.recent_limit(), 1);
    }
}
