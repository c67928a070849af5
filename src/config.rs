//! Catalog manifest: which sources to load and how to tune search.
//!
//! The manifest is JSON validated against `schema/catalog_manifest.schema.json`
//! before it is deserialized, so a malformed file is reported with every schema
//! violation at once rather than the first serde error. Source paths resolve
//! relative to the manifest's directory.

use crate::catalog::CatalogKind;
use crate::search::SearchOptions;
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const MANIFEST_SCHEMA_VERSION: &str = "campus_perks_manifest_v1";
pub const THRESHOLD_ENV: &str = "CAMPUS_PERKS_SEARCH_THRESHOLD";

const MANIFEST_SCHEMA: &str = include_str!("../schema/catalog_manifest.schema.json");
const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogManifest {
    pub schema_version: String,
    pub sources: Vec<CatalogSource>,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogSource {
    pub kind: CatalogKind,
    pub path: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub min_query_len: Option<usize>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl CatalogManifest {
    /// Read, schema-check, and deserialize a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening manifest {}", path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::from_value(value, base_dir)
            .with_context(|| format!("loading manifest {}", path.display()))
    }

    /// Build a manifest from an already-parsed document.
    pub fn from_value(value: Value, base_dir: PathBuf) -> Result<Self> {
        validate_against_schema(&value)?;
        let mut manifest: CatalogManifest =
            serde_json::from_value(value).context("manifest does not match expected shape")?;
        if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
            bail!(
                "schema_version '{}' not supported (expected {})",
                manifest.schema_version,
                MANIFEST_SCHEMA_VERSION
            );
        }
        let mut seen = BTreeSet::new();
        for source in &manifest.sources {
            if !seen.insert(source.kind) {
                bail!("manifest lists the {} catalog more than once", source.kind);
            }
        }
        manifest.base_dir = base_dir;
        Ok(manifest)
    }

    pub fn source_path(&self, source: &CatalogSource) -> PathBuf {
        if source.path.is_absolute() {
            source.path.clone()
        } else {
            self.base_dir.join(&source.path)
        }
    }

    /// Search tuning from the manifest, with the threshold env override applied.
    pub fn search_options(&self) -> SearchOptions {
        let mut options = SearchOptions::default();
        if let Some(threshold) = self.search.threshold {
            options.threshold = threshold;
        }
        if let Some(min_len) = self.search.min_query_len {
            options.min_query_len = min_len;
        }
        if let Some(threshold) = threshold_from_env() {
            options.threshold = threshold;
        }
        options
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn threshold_from_env() -> Option<f64> {
    let raw = env::var(THRESHOLD_ENV).ok()?;
    parse_threshold(&raw).or_else(|| {
        warn!("{THRESHOLD_ENV}={raw} is not a number in (0, 1]; ignoring");
        None
    })
}

fn parse_threshold(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| *value > 0.0 && *value <= 1.0)
}

fn validate_against_schema(manifest: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(MANIFEST_SCHEMA).context("parsing bundled manifest schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling bundled manifest schema: {err}"))?;

    if let Err(errors) = compiled.validate(manifest) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("catalog manifest failed schema validation:\n{details}");
    }
    Ok(())
}
