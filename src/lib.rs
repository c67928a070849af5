//! Core of the campus-perks catalog.
//!
//! The crate loads the perk, AI tool, course, resource, and event catalogs
//! from CSV, projects them into a single searchable item list, and runs the
//! fuzzy search, category/secondary filters, and sort orders the views need.
//! Public functions here are the shared contract for the helper binaries:
//! data-root discovery, manifest lookup, and logging setup.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod search;

pub use catalog::{
    Catalog, CatalogIndex, CatalogKind, CatalogRecord, CatalogSession, ItemType, LoadError,
    RecordId, RowError, load_catalog_from_path, parse_catalog,
};
pub use config::{CatalogManifest, CatalogSource};
pub use search::{
    FilterState, SearchOptions, SearchResults, SearchableItem, SortKey, apply_filters,
    perform_search,
};

/// Manifest location relative to the data root.
pub const MANIFEST_RELATIVE_PATH: &str = "data/catalogs.json";
pub const ROOT_ENV: &str = "CAMPUS_PERKS_ROOT";

/// `dir` if it holds a catalog manifest, canonicalized.
fn data_root_at(dir: &str) -> Option<PathBuf> {
    let dir = dir.trim();
    if dir.is_empty() || !Path::new(dir).join(MANIFEST_RELATIVE_PATH).is_file() {
        return None;
    }
    fs::canonicalize(dir).ok()
}

/// Locate the directory that holds `data/catalogs.json`.
///
/// `CAMPUS_PERKS_ROOT` wins when it names a directory with a manifest;
/// otherwise the source checkout recorded at build time is used.
pub fn find_data_root() -> Result<PathBuf> {
    let from_env = env::var(ROOT_ENV).ok().and_then(|dir| data_root_at(&dir));
    let from_build = || option_env!("CAMPUS_PERKS_ROOT_HINT").and_then(data_root_at);
    match from_env.or_else(from_build) {
        Some(root) => Ok(root),
        None => bail!(
            "unable to locate catalog data; set {ROOT_ENV} to a directory containing \
             {MANIFEST_RELATIVE_PATH}"
        ),
    }
}

pub fn default_manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_RELATIVE_PATH)
}

/// Split a comma-delimited list of view labels, keeping inner spaces.
pub fn split_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Install the stderr `tracing` subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
