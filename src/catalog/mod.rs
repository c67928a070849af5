//! Catalog loading and caching.
//!
//! CSV sources are parsed into typed records per catalog kind (`loader`),
//! cached per view with single-flight fetches (`session`), and merged into
//! the searchable item list (`index`).

pub mod csv;
pub mod error;
pub mod identity;
pub mod index;
pub mod loader;
pub mod model;
pub mod session;

pub use error::{LoadError, RowError, SkippedRow};
pub use identity::{CatalogKind, ItemType, RecordId};
pub use index::CatalogIndex;
pub use loader::{essential_fields, load_catalog_from_path, parse_catalog, required_columns};
pub use model::{
    AiTool, Catalog, CatalogRecord, Course, DESCRIPTION_PLACEHOLDER, Event, Perk, Resource,
};
pub use session::{CatalogSession, Completion, FetchStart, FetchTicket};
