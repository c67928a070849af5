//! Merged, searchable view over every loaded catalog.
//!
//! Catalogs are merged in `CatalogKind` order regardless of the order they
//! finished loading, so result ordering does not depend on fetch timing.

use crate::catalog::identity::{CatalogKind, RecordId};
use crate::catalog::model::Catalog;
use crate::search::SearchableItem;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct CatalogIndex {
    items: Vec<SearchableItem>,
    by_key: BTreeMap<(CatalogKind, RecordId), usize>,
}

impl CatalogIndex {
    pub fn from_catalogs<'a, I>(catalogs: I) -> Self
    where
        I: IntoIterator<Item = &'a Catalog>,
    {
        let mut ordered: Vec<&Catalog> = catalogs.into_iter().collect();
        ordered.sort_by_key(|catalog| catalog.kind);

        let mut index = CatalogIndex::default();
        for catalog in ordered {
            for record in &catalog.records {
                let item = SearchableItem::from(record);
                let (kind, id) = item.key();
                let key = (kind, id.clone());
                if index.by_key.contains_key(&key) {
                    continue;
                }
                index.by_key.insert(key, index.items.len());
                index.items.push(item);
            }
        }
        index
    }

    /// All items in stable merge order; this is what the engine consumes.
    pub fn items(&self) -> &[SearchableItem] {
        &self.items
    }

    pub fn get(&self, kind: CatalogKind, id: &RecordId) -> Option<&SearchableItem> {
        self.by_key
            .get(&(kind, id.clone()))
            .map(|idx| &self.items[*idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemType, parse_catalog};

    #[test]
    fn merges_in_kind_order_and_looks_up_by_kind() {
        let resources = parse_catalog(
            CatalogKind::Resources,
            "id,title,description,category,link\n1,Zotero,,Research,zotero.org\n",
        )
        .unwrap();
        let perks = parse_catalog(
            CatalogKind::Perks,
            "id,title,description,category,discount,link\n1,Spotify,,Music,50% off,spotify.com\n",
        )
        .unwrap();

        let index = CatalogIndex::from_catalogs([&resources, &perks]);
        let titles: Vec<&str> = index.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Spotify", "Zotero"]);

        let id = RecordId("1".to_string());
        assert_eq!(
            index.get(CatalogKind::Resources, &id).map(|i| i.title.as_str()),
            Some("Zotero")
        );
        assert_eq!(
            index.get(CatalogKind::Perks, &id).map(|i| i.title.as_str()),
            Some("Spotify")
        );
        assert!(index.get(CatalogKind::Events, &id).is_none());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn shared_bucket_keeps_same_ids_apart() {
        let courses = parse_catalog(
            CatalogKind::Courses,
            "id,title,description,provider,category,link
1,CS50,,Harvard,CS,cs50.harvard.edu
",
        )
        .unwrap();
        let resources = parse_catalog(
            CatalogKind::Resources,
            "id,title,description,category,link
1,Zotero,,Research,zotero.org
",
        )
        .unwrap();

        let index = CatalogIndex::from_catalogs([&courses, &resources]);
        assert_eq!(index.len(), 2);
        let id = RecordId("1".to_string());
        let keys: Vec<(CatalogKind, &RecordId)> = index.items().iter().map(|i| i.key()).collect();
        assert_eq!(
            keys,
            vec![(CatalogKind::Courses, &id), (CatalogKind::Resources, &id)]
        );
        assert!(
            index
                .items()
                .iter()
                .all(|item| item.item_type == ItemType::Resource)
        );
        assert_eq!(
            index.get(CatalogKind::Courses, &id).map(|i| i.title.as_str()),
            Some("CS50")
        );
    }
}
