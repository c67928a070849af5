//! Sort orders offered by the catalog views.
//!
//! All orders are applied with stable sorts, so items that compare equal keep
//! whatever order they arrived in (catalog order or search relevance).

use crate::search::item::SearchableItem;
use serde::Serialize;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    MostPopular,
    RecentlyAdded,
    Alphabetical,
    BestDiscount,
    FreeFirst,
    ByCategory,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::MostPopular,
        SortKey::RecentlyAdded,
        SortKey::Alphabetical,
        SortKey::BestDiscount,
        SortKey::FreeFirst,
        SortKey::ByCategory,
    ];

    /// Accepts the labels the views send; unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "popular" | "most-popular" | "most popular" => Some(SortKey::MostPopular),
            "recent" | "newest" | "recently-added" | "recently added" => {
                Some(SortKey::RecentlyAdded)
            }
            "a-z" | "alphabetical" | "name" => Some(SortKey::Alphabetical),
            "discount" | "best-discount" | "best discount" => Some(SortKey::BestDiscount),
            "free" | "free-first" | "free first" => Some(SortKey::FreeFirst),
            "category" | "by-category" => Some(SortKey::ByCategory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MostPopular => "most-popular",
            SortKey::RecentlyAdded => "recently-added",
            SortKey::Alphabetical => "a-z",
            SortKey::BestDiscount => "best-discount",
            SortKey::FreeFirst => "free-first",
            SortKey::ByCategory => "by-category",
        }
    }
}

pub fn sort_items(items: &mut [&SearchableItem], key: SortKey) {
    match key {
        SortKey::MostPopular => items.sort_by_key(|item| !item.popular),
        SortKey::RecentlyAdded => items.sort_by_key(|item| !item.recent),
        SortKey::Alphabetical => items.sort_by_cached_key(|item| collation_key(&item.title)),
        SortKey::BestDiscount => items.sort_by_cached_key(|item| {
            std::cmp::Reverse(item.discount.as_deref().and_then(discount_percent))
        }),
        // PricingTier orders Free, Freemium, Paid, Unknown.
        SortKey::FreeFirst => items.sort_by_key(|item| item.pricing_tier()),
        SortKey::ByCategory => items.sort_by(|a, b| compare_primary_category(a, b)),
    }
}

/// Case- and accent-insensitive ordering key for display text.
///
/// The primary key folds compatibility forms and drops combining marks, so
/// "Émile" sorts among the e's. The lowercased original breaks ties, keeping
/// "Resume" ahead of "Résumé" and the order total.
pub fn collation_key(text: &str) -> (String, String) {
    let folded: String = text
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase();
    (folded, text.to_lowercase())
}

/// Sort by a view label; an unknown label leaves the order untouched.
pub fn sort_by_label(items: &mut [&SearchableItem], label: &str) {
    if let Some(key) = SortKey::parse(label) {
        sort_items(items, key);
    }
}

/// First `N%` figure in a discount blurb, capped at 100.
pub fn discount_percent(text: &str) -> Option<u32> {
    let mut digits = String::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if !digits.is_empty() {
            let mut next = Some(ch);
            while next == Some(' ') {
                next = chars.next();
            }
            if next == Some('%') {
                return digits.parse::<u32>().ok().map(|pct| pct.min(100));
            }
            digits.clear();
        }
    }
    None
}

fn compare_primary_category(a: &SearchableItem, b: &SearchableItem) -> Ordering {
    match (a.category.first(), b.category.first()) {
        (Some(x), Some(y)) => collation_key(x).cmp(&collation_key(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
