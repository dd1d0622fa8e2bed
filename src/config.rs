//! Runtime configuration resolved from CLI flags, environment and defaults.

use std::path::PathBuf;

use crate::catalog::CatalogSource;
use crate::cli::Cli;
use crate::logging::DEFAULT_LOG_LEVEL;

/// Name of the data directory created under `$HOME`.
pub const DEFAULT_DIR_NAME: &str = ".tracker";
/// Catalog file looked up inside the data directory when none is given. If it
/// does not exist the bundled sample catalog is shown instead.
pub const DEFAULT_CATALOG_FILE: &str = "resources.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub catalog: CatalogSource,
    pub log_level: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let home = std::env::var("HOME").ok();
        Self::resolve(
            cli.data_dir.clone(),
            cli.catalog.as_deref(),
            cli.log_level.as_deref(),
            home.as_deref(),
        )
    }

    /// Precedence: explicit value, then `$HOME/.tracker`, then `./.tracker`.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        catalog: Option<&str>,
        log_level: Option<&str>,
        home: Option<&str>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| {
            PathBuf::from(home.unwrap_or(".")).join(DEFAULT_DIR_NAME)
        });
        let catalog = match catalog {
            Some(loc) if !loc.trim().is_empty() => CatalogSource::parse(loc.trim()),
            _ => CatalogSource::FileOrBundled(data_dir.join(DEFAULT_CATALOG_FILE)),
        };
        Config {
            catalog,
            log_level: log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_string(),
            data_dir,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
