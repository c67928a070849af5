//! Weighted fuzzy text search across searchable items.
//!
//! Every field is scored on a 0..=1 similarity scale: exact and substring hits
//! score near 1, otherwise each query term is compared against the field's
//! words with Jaro-Winkler so small typos still match. A field only counts
//! when its similarity clears the threshold; the item's relevance is the best
//! weighted field score, so title hits outrank equally strong hits elsewhere.

use crate::catalog::DESCRIPTION_PLACEHOLDER;
use crate::search::item::SearchableItem;
use crate::search::results::SearchResults;
use serde::Serialize;
use strsim::jaro_winkler;

pub const DEFAULT_THRESHOLD: f64 = 0.8;
pub const MIN_QUERY_LEN: usize = 2;

const EXACT: f64 = 1.0;
const PREFIX: f64 = 0.97;
const SUBSTRING: f64 = 0.93;
const TOKEN_PREFIX: f64 = 0.95;
const TOKEN_SUBSTRING: f64 = 0.9;

/// Relative weight of each searchable field. Only the ordering matters for
/// correctness: title > description > category > features/provider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FieldWeights {
    pub title: f64,
    pub description: f64,
    pub category: f64,
    pub extra: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 1.0,
            description: 0.6,
            category: 0.45,
            extra: 0.35,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SearchOptions {
    /// Minimum field similarity (0..=1) for a field to count as a match.
    pub threshold: f64,
    /// Queries shorter than this (in characters, after trimming) match nothing.
    pub min_query_len: usize,
    pub weights: FieldWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_query_len: MIN_QUERY_LEN,
            weights: FieldWeights::default(),
        }
    }
}

/// Run a fuzzy search and bucket the hits by item type.
///
/// Queries below the minimum length return an empty result, not every item.
pub fn perform_search<'a>(
    items: &'a [SearchableItem],
    query: &str,
    options: &SearchOptions,
) -> SearchResults<'a> {
    let ranked = rank_matches(items, query, options);
    SearchResults::from_items(ranked.into_iter().map(|(item, _)| item))
}

/// Matching items with their relevance, most relevant first.
///
/// Equal scores keep catalog order.
pub fn rank_matches<'a>(
    items: &'a [SearchableItem],
    query: &str,
    options: &SearchOptions,
) -> Vec<(&'a SearchableItem, f64)> {
    let Some(query) = Query::new(query, options.min_query_len) else {
        return Vec::new();
    };
    let mut ranked: Vec<(&'a SearchableItem, f64)> = items
        .iter()
        .filter_map(|item| score_item(item, &query, options).map(|score| (item, score)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Relevance of one item, or `None` when no field clears the threshold.
pub fn score_item(item: &SearchableItem, query: &Query, options: &SearchOptions) -> Option<f64> {
    let weights = &options.weights;
    let title = [(item.title.as_str(), weights.title)];
    // The loader's stand-in text is not searchable content.
    let description = (item.description != DESCRIPTION_PLACEHOLDER)
        .then_some((item.description.as_str(), weights.description));
    let categories = item.category.iter().map(|c| (c.as_str(), weights.category));
    let extras = item
        .features
        .iter()
        .map(String::as_str)
        .chain(item.provider.as_deref())
        .map(|text| (text, weights.extra));

    title
        .into_iter()
        .chain(description)
        .chain(categories)
        .chain(extras)
        .filter_map(|(text, weight)| {
            let similarity = query.similarity(text);
            (similarity >= options.threshold).then_some(similarity * weight)
        })
        .max_by(f64::total_cmp)
}

/// A normalized query: lowercase phrase plus its individual terms.
#[derive(Clone, Debug)]
pub struct Query {
    phrase: String,
    terms: Vec<String>,
}

impl Query {
    /// `None` when the trimmed query is shorter than `min_len` characters.
    pub fn new(raw: &str, min_len: usize) -> Option<Self> {
        let phrase = raw.trim().to_lowercase();
        if phrase.chars().count() < min_len {
            return None;
        }
        let terms: Vec<String> = words(&phrase).map(str::to_string).collect();
        if terms.is_empty() {
            return None;
        }
        Some(Self { phrase, terms })
    }

    /// Similarity of this query to a field's text, in 0..=1.
    pub fn similarity(&self, text: &str) -> f64 {
        let field = text.trim().to_lowercase();
        if field.is_empty() {
            return 0.0;
        }
        if field == self.phrase {
            return EXACT;
        }
        if field.starts_with(&self.phrase) {
            return PREFIX;
        }
        if field.contains(&self.phrase) {
            return SUBSTRING;
        }

        let field_words: Vec<&str> = words(&field).collect();
        if field_words.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .terms
            .iter()
            .map(|term| best_word_similarity(term, &field_words))
            .sum();
        total / self.terms.len() as f64
    }
}

fn best_word_similarity(term: &str, field_words: &[&str]) -> f64 {
    field_words
        .iter()
        .map(|word| word_similarity(term, word))
        .fold(0.0, f64::max)
}

fn word_similarity(term: &str, word: &str) -> f64 {
    if word == term {
        EXACT
    } else if word.starts_with(term) {
        TOKEN_PREFIX
    } else if word.contains(term) {
        TOKEN_SUBSTRING
    } else {
        jaro_winkler(term, word)
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}
