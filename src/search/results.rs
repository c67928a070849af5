use crate::catalog::ItemType;
use crate::search::item::SearchableItem;
use serde::Serialize;

/// Visible items split by result bucket, each bucket in ranked order.
///
/// Callers render tabs or sections per bucket, so results are never merged
/// into a single list.
#[derive(Debug, Default, Serialize)]
pub struct SearchResults<'a> {
    pub perks: Vec<&'a SearchableItem>,
    pub tools: Vec<&'a SearchableItem>,
    pub resources: Vec<&'a SearchableItem>,
    pub total: usize,
}

impl<'a> SearchResults<'a> {
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a SearchableItem>,
    {
        let mut results = SearchResults::default();
        for item in items {
            results.push(item);
        }
        results
    }

    pub fn push(&mut self, item: &'a SearchableItem) {
        match item.item_type {
            ItemType::Perk => self.perks.push(item),
            ItemType::Tool => self.tools.push(item),
            ItemType::Resource => self.resources.push(item),
        }
        self.total += 1;
    }

    pub fn bucket(&self, item_type: ItemType) -> &[&'a SearchableItem] {
        match item_type {
            ItemType::Perk => &self.perks,
            ItemType::Tool => &self.tools,
            ItemType::Resource => &self.resources,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Perks, then tools, then resources.
    pub fn iter(&self) -> impl Iterator<Item = &'a SearchableItem> + '_ {
        self.perks
            .iter()
            .chain(&self.tools)
            .chain(&self.resources)
            .copied()
    }
}
