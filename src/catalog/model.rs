//! Typed records for each catalog kind.
//!
//! Every record keeps the normalized shared fields (id, title, description,
//! category list, scheme-qualified link) plus whatever kind-specific columns
//! its source carried. Records are immutable once loaded.

use crate::catalog::error::SkippedRow;
use crate::catalog::identity::{CatalogKind, RecordId};
use serde::Serialize;

/// Shown in place of a blank description.
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Perk {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub discount: Option<String>,
    pub link: String,
    pub logo: Option<String>,
    pub provider: Option<String>,
    pub valid_until: Option<String>,
    pub verification_required: bool,
    pub popular: bool,
    pub is_new: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AiTool {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub category: Vec<String>,
    pub pricing: Option<String>,
    pub features: Vec<String>,
    pub link: String,
    pub open_source: bool,
    pub popular: bool,
    pub is_new: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Course {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub provider: Option<String>,
    pub category: Vec<String>,
    pub link: String,
    pub logo: Option<String>,
    pub level: Option<String>,
    pub duration: Option<String>,
    pub pricing: Option<String>,
    pub certificate: bool,
    pub popular: bool,
    pub is_new: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resource {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub link: String,
    pub logo: Option<String>,
    pub provider: Option<String>,
    pub pricing: Option<String>,
    pub features: Vec<String>,
    pub popular: bool,
    pub is_new: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub date: Option<String>,
    pub location: Option<String>,
    pub link: String,
    pub category: Vec<String>,
    pub organizer: Option<String>,
    pub logo: Option<String>,
    pub online: bool,
}

/// One record from any catalog, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogRecord {
    Perk(Perk),
    AiTool(AiTool),
    Course(Course),
    Resource(Resource),
    Event(Event),
}

impl CatalogRecord {
    pub fn kind(&self) -> CatalogKind {
        match self {
            CatalogRecord::Perk(_) => CatalogKind::Perks,
            CatalogRecord::AiTool(_) => CatalogKind::AiTools,
            CatalogRecord::Course(_) => CatalogKind::Courses,
            CatalogRecord::Resource(_) => CatalogKind::Resources,
            CatalogRecord::Event(_) => CatalogKind::Events,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            CatalogRecord::Perk(r) => &r.id,
            CatalogRecord::AiTool(r) => &r.id,
            CatalogRecord::Course(r) => &r.id,
            CatalogRecord::Resource(r) => &r.id,
            CatalogRecord::Event(r) => &r.id,
        }
    }

    /// Display title; AI tools call it `name` in their source.
    pub fn title(&self) -> &str {
        match self {
            CatalogRecord::Perk(r) => &r.title,
            CatalogRecord::AiTool(r) => &r.name,
            CatalogRecord::Course(r) => &r.title,
            CatalogRecord::Resource(r) => &r.title,
            CatalogRecord::Event(r) => &r.title,
        }
    }

    pub fn link(&self) -> &str {
        match self {
            CatalogRecord::Perk(r) => &r.link,
            CatalogRecord::AiTool(r) => &r.link,
            CatalogRecord::Course(r) => &r.link,
            CatalogRecord::Resource(r) => &r.link,
            CatalogRecord::Event(r) => &r.link,
        }
    }
}

/// All valid records parsed from one source, in source row order.
#[derive(Clone, Debug, Serialize)]
pub struct Catalog {
    pub kind: CatalogKind,
    pub records: Vec<CatalogRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &RecordId) -> Option<&CatalogRecord> {
        self.records.iter().find(|record| record.id() == id)
    }
}
