//! Filter state and the pure pipeline that turns it into a result view.
//!
//! The pipeline is: text search (when a query is present), category filter,
//! secondary filters, then the chosen sort. Every stage must pass for an item
//! to stay visible, and secondary filters combine with AND: selecting "Free"
//! and "Open Source" keeps only items that are both.

use crate::catalog::CatalogRecord;
use crate::search::fuzzy::{SearchOptions, rank_matches};
use crate::search::item::{PricingTier, SearchableItem};
use crate::search::results::SearchResults;
use crate::search::sort::{SortKey, sort_items};
use serde::Serialize;

pub const ALL_CATEGORIES: &str = "All";
pub const ALL_TOOLS: &str = "All Tools";

/// Single-choice category/stream selection.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "mode", content = "category", rename_all = "snake_case")]
pub enum CategorySelection {
    #[default]
    All,
    Only(String),
}

impl CategorySelection {
    /// Blank input and the "All"/"All Tools" sentinels disable the filter.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES || trimmed == ALL_TOOLS {
            CategorySelection::All
        } else {
            CategorySelection::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, item: &SearchableItem) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(category) => item.category.iter().any(|c| c == category),
        }
    }
}

/// Independently toggleable narrowing criteria.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "filter", content = "value", rename_all = "snake_case")]
pub enum SecondaryFilter {
    Free,
    Freemium,
    Paid,
    OpenSource,
    MostPopular,
    RecentlyAdded,
    HasDiscount,
    NoVerification,
    /// Case-insensitive match against categories and features.
    Tag(String),
}

impl SecondaryFilter {
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "free" => SecondaryFilter::Free,
            "freemium" => SecondaryFilter::Freemium,
            "paid" => SecondaryFilter::Paid,
            "open source" => SecondaryFilter::OpenSource,
            "most popular" | "popular" => SecondaryFilter::MostPopular,
            "new" | "recently added" => SecondaryFilter::RecentlyAdded,
            "discount" | "has discount" | "student discount" => SecondaryFilter::HasDiscount,
            "no verification" => SecondaryFilter::NoVerification,
            _ => SecondaryFilter::Tag(label.trim().to_string()),
        }
    }

    pub fn matches(&self, item: &SearchableItem) -> bool {
        match self {
            SecondaryFilter::Free => item.pricing_tier() == PricingTier::Free,
            SecondaryFilter::Freemium => item.pricing_tier() == PricingTier::Freemium,
            SecondaryFilter::Paid => item.pricing_tier() == PricingTier::Paid,
            SecondaryFilter::OpenSource => item.open_source,
            SecondaryFilter::MostPopular => item.popular,
            SecondaryFilter::RecentlyAdded => item.recent,
            SecondaryFilter::HasDiscount => item.discount.is_some(),
            SecondaryFilter::NoVerification => !requires_verification(item),
            SecondaryFilter::Tag(tag) => {
                let tag = tag.to_lowercase();
                item.category
                    .iter()
                    .chain(&item.features)
                    .any(|value| value.to_lowercase() == tag)
            }
        }
    }
}

fn requires_verification(item: &SearchableItem) -> bool {
    match &item.original {
        CatalogRecord::Perk(perk) => perk.verification_required,
        _ => false,
    }
}

/// Everything the view owns that shapes the visible result set.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub query: String,
    pub category: CategorySelection,
    pub secondary: Vec<SecondaryFilter>,
    /// `None` keeps relevance order (with a query) or catalog order.
    pub sort: Option<SortKey>,
}

impl FilterState {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, label: &str) -> Self {
        self.category = CategorySelection::parse(label);
        self
    }

    pub fn with_filter(mut self, label: &str) -> Self {
        let filter = SecondaryFilter::parse(label);
        if !self.secondary.contains(&filter) {
            self.secondary.push(filter);
        }
        self
    }

    /// Unknown sort labels leave the sort unset.
    pub fn with_sort_label(mut self, label: &str) -> Self {
        self.sort = SortKey::parse(label);
        self
    }

    fn keeps(&self, item: &SearchableItem) -> bool {
        self.category.matches(item) && self.secondary.iter().all(|filter| filter.matches(item))
    }
}

/// Derive the visible, grouped view without touching the source items.
///
/// A blank query skips text search; any other query goes through
/// `perform_search` rules, so a one-character query shows nothing.
pub fn apply_filters<'a>(
    items: &'a [SearchableItem],
    state: &FilterState,
    options: &SearchOptions,
) -> SearchResults<'a> {
    let mut visible: Vec<&'a SearchableItem> = if state.query.trim().is_empty() {
        items.iter().collect()
    } else {
        rank_matches(items, &state.query, options)
            .into_iter()
            .map(|(item, _)| item)
            .collect()
    };
    visible.retain(|item| state.keeps(item));
    if let Some(key) = state.sort {
        sort_items(&mut visible, key);
    }
    SearchResults::from_items(visible)
}

/// Distinct categories in first-seen order, for building category pickers.
pub fn category_facets(items: &[SearchableItem]) -> Vec<String> {
    let mut facets: Vec<String> = Vec::new();
    for category in items.iter().flat_map(|item| &item.category) {
        if !facets.contains(category) {
            facets.push(category.clone());
        }
    }
    facets
}
