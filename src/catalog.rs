//! The read-only resource catalog and its one-shot loader.
//!
//! The catalog is a JSON array of resources kept outside the tracker's own
//! storage: a local file or an HTTP(S) URL. It is fetched once per request
//! with no retry; a failure is kept as its own state so it is never confused
//! with a search that matched nothing.
//!
//! When no location is configured, the catalog file in the data directory is
//! used if present, and the sample catalog built into the binary otherwise.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub link: String,
}

/// Sample catalog shipped with the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../data/resources.json");

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
    /// The default location: this file if it exists, else `BUNDLED_CATALOG`.
    FileOrBundled(PathBuf),
}

impl CatalogSource {
    /// `http://` and `https://` locations are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            CatalogSource::Url(location.to_string())
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }

    /// Read and parse the catalog. One attempt.
    pub fn fetch(&self) -> Result<Vec<Resource>> {
        let body = match self {
            CatalogSource::File(path) => fs::read_to_string(path)
                .map_err(|e| TrackerError::CatalogFetch(format!("{}: {e}", path.display())))?,
            CatalogSource::Url(url) => fetch_url(url)?,
            CatalogSource::FileOrBundled(path) => match fs::read_to_string(path) {
                Ok(body) => body,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("event=catalog_bundled path={}", path.display());
                    BUNDLED_CATALOG.to_string()
                }
                Err(e) => {
                    return Err(TrackerError::CatalogFetch(format!("{}: {e}", path.display())))
                }
            },
        };
        let resources: Vec<Resource> = serde_json::from_str(&body)
            .map_err(|e| TrackerError::CatalogFetch(format!("invalid catalog data: {e}")))?;
        Ok(resources)
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(p) | CatalogSource::FileOrBundled(p) => write!(f, "{}", p.display()),
            CatalogSource::Url(u) => f.write_str(u),
        }
    }
}

fn fetch_url(url: &str) -> Result<String> {
    let response =
        reqwest::blocking::get(url).map_err(|e| TrackerError::CatalogFetch(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(TrackerError::CatalogFetch(format!("server responded with {status}")));
    }
    response
        .text()
        .map_err(|e| TrackerError::CatalogFetch(e.to_string()))
}

/// Load state of the catalog as seen by the resources view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    NotLoaded,
    Loaded(Vec<Resource>),
    Failed(String),
}

impl CatalogState {
    /// Fetch from `source`, capturing failure as `Failed` with its cause.
    pub fn load(source: &CatalogSource) -> Self {
        match source.fetch() {
            Ok(resources) => {
                info!("event=catalog_loaded count={}", resources.len());
                CatalogState::Loaded(resources)
            }
            Err(err) => {
                warn!("event=catalog_failed error={err}");
                CatalogState::Failed(err.to_string())
            }
        }
    }

    pub fn resources(&self) -> Option<&[Resource]> {
        match self {
            CatalogState::Loaded(r) => Some(r),
            _ => None,
        }
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for r in self.resources().unwrap_or_default() {
            if !out.contains(&r.category) {
                out.push(r.category.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"id": 1, "title": "Rust Book", "description": "Learn Rust", "category": "Programming", "link": "https://doc.rust-lang.org/book/"},
        {"id": 2, "title": "Khan Academy", "description": "Free courses", "category": "Learning", "link": "https://khanacademy.org"},
        {"id": 3, "title": "Clippy", "description": "Lints", "category": "Programming", "link": "https://github.com/rust-lang/rust-clippy"}
    ]"#;

    #[test]
    fn parses_locations() {
        assert_eq!(
            CatalogSource::parse("https://example.com/r.json"),
            CatalogSource::Url("https://example.com/r.json".into())
        );
        assert_eq!(
            CatalogSource::parse("./resources.json"),
            CatalogSource::File(PathBuf::from("./resources.json"))
        );
    }

    #[test]
    fn loads_a_catalog_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        let state = CatalogState::load(&CatalogSource::File(f.path().to_path_buf()));
        let resources = state.resources().expect("loaded");
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[1].title, "Khan Academy");
        assert_eq!(state.categories(), vec!["Programming", "Learning"]);
    }

    #[test]
    fn missing_file_is_a_failure_not_an_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = CatalogState::load(&CatalogSource::File(dir.path().join("nope.json")));
        match state {
            CatalogState::Failed(msg) => assert!(msg.contains("nope.json")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn default_location_falls_back_to_the_bundled_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let state = CatalogState::load(&CatalogSource::FileOrBundled(dir.path().join("resources.json")));
        let resources = state.resources().expect("bundled catalog");
        assert!(!resources.is_empty());
        assert_eq!(resources.len(), serde_json::from_str::<Vec<Resource>>(BUNDLED_CATALOG).unwrap().len());
    }

    #[test]
    fn default_location_prefers_the_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.json");
        fs::write(&path, SAMPLE).unwrap();
        let state = CatalogState::load(&CatalogSource::FileOrBundled(path));
        assert_eq!(state.resources().map(|r| r.len()), Some(3));
    }

    #[test]
    fn malformed_catalog_is_a_failure() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"{\"oops\": true}").unwrap();
        let state = CatalogState::load(&CatalogSource::File(f.path().to_path_buf()));
        assert!(matches!(state, CatalogState::Failed(_)));
        assert!(state.categories().is_empty());
    }

    #[test]
    fn empty_array_loads_as_empty_catalog() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"[]").unwrap();
        let state = CatalogState::load(&CatalogSource::File(f.path().to_path_buf()));
        assert_eq!(state, CatalogState::Loaded(Vec::new()));
    }
}
