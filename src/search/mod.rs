//! Unified search and filter engine.
//!
//! Everything here is a pure function of the loaded items and the caller's
//! filter state; no module-level state is kept between calls.

pub mod debounce;
pub mod filter;
pub mod fuzzy;
pub mod item;
pub mod results;
pub mod sort;

pub use debounce::Debouncer;
pub use filter::{
    ALL_CATEGORIES, ALL_TOOLS, CategorySelection, FilterState, SecondaryFilter, apply_filters,
    category_facets,
};
pub use fuzzy::{FieldWeights, Query, SearchOptions, perform_search, rank_matches};
pub use item::{PricingTier, SearchableItem};
pub use results::SearchResults;
pub use sort::{SortKey, sort_by_label, sort_items};
