//! Uniform, type-tagged projection of catalog records for the search engine.
//!
//! Each catalog kind has its own adapter below. The typed record is kept on
//! `original` so kind-specific fields stay reachable after projection.

use crate::catalog::{CatalogKind, CatalogRecord, ItemType, RecordId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchableItem {
    /// Unique within the source catalog only. Courses, resources, and events
    /// share the resource bucket, so use [`SearchableItem::key`] to tell
    /// items apart.
    pub id: RecordId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub title: String,
    pub description: String,
    pub category: Vec<String>,
    pub logo: Option<String>,
    pub link: String,
    pub discount: Option<String>,
    pub pricing: Option<String>,
    pub features: Vec<String>,
    pub provider: Option<String>,
    pub popular: bool,
    pub recent: bool,
    pub open_source: bool,
    pub original: CatalogRecord,
}

/// Coarse pricing bucket used by the free-first sort and pricing filters.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum PricingTier {
    Free,
    Freemium,
    Paid,
    Unknown,
}

impl PricingTier {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "free" | "open source" => PricingTier::Free,
            "freemium" | "free tier" => PricingTier::Freemium,
            "paid" | "subscription" | "premium" => PricingTier::Paid,
            _ => PricingTier::Unknown,
        }
    }
}

impl SearchableItem {
    pub fn kind(&self) -> CatalogKind {
        self.original.kind()
    }

    /// Identity across every catalog: source kind plus record id.
    pub fn key(&self) -> (CatalogKind, &RecordId) {
        (self.kind(), &self.id)
    }

    /// Pricing column when present; perks fall back to reading their discount.
    pub fn pricing_tier(&self) -> PricingTier {
        if let Some(pricing) = &self.pricing {
            return PricingTier::from_label(pricing);
        }
        match &self.discount {
            Some(discount) => {
                let lower = discount.to_lowercase();
                if lower.contains("100%") || lower.contains("free") {
                    PricingTier::Free
                } else {
                    PricingTier::Unknown
                }
            }
            None => PricingTier::Unknown,
        }
    }
}

impl From<&CatalogRecord> for SearchableItem {
    fn from(record: &CatalogRecord) -> Self {
        let original = record.clone();
        match record {
            CatalogRecord::Perk(perk) => SearchableItem {
                id: perk.id.clone(),
                item_type: ItemType::Perk,
                title: perk.title.clone(),
                description: perk.description.clone(),
                category: perk.category.clone(),
                logo: perk.logo.clone(),
                link: perk.link.clone(),
                discount: perk.discount.clone(),
                pricing: None,
                features: Vec::new(),
                provider: perk.provider.clone(),
                popular: perk.popular,
                recent: perk.is_new,
                open_source: false,
                original,
            },
            CatalogRecord::AiTool(tool) => SearchableItem {
                id: tool.id.clone(),
                item_type: ItemType::Tool,
                title: tool.name.clone(),
                description: tool.description.clone(),
                category: tool.category.clone(),
                logo: tool.logo.clone(),
                link: tool.link.clone(),
                discount: None,
                pricing: tool.pricing.clone(),
                features: tool.features.clone(),
                provider: None,
                popular: tool.popular,
                recent: tool.is_new,
                open_source: tool.open_source,
                original,
            },
            CatalogRecord::Course(course) => SearchableItem {
                id: course.id.clone(),
                item_type: ItemType::Resource,
                title: course.title.clone(),
                description: course.description.clone(),
                category: course.category.clone(),
                logo: course.logo.clone(),
                link: course.link.clone(),
                discount: None,
                pricing: course.pricing.clone(),
                features: course.level.iter().chain(&course.duration).cloned().collect(),
                provider: course.provider.clone(),
                popular: course.popular,
                recent: course.is_new,
                open_source: false,
                original,
            },
            CatalogRecord::Resource(resource) => SearchableItem {
                id: resource.id.clone(),
                item_type: ItemType::Resource,
                title: resource.title.clone(),
                description: resource.description.clone(),
                category: resource.category.clone(),
                logo: resource.logo.clone(),
                link: resource.link.clone(),
                discount: None,
                pricing: resource.pricing.clone(),
                features: resource.features.clone(),
                provider: resource.provider.clone(),
                popular: resource.popular,
                recent: resource.is_new,
                open_source: false,
                original,
            },
            CatalogRecord::Event(event) => SearchableItem {
                id: event.id.clone(),
                item_type: ItemType::Resource,
                title: event.title.clone(),
                description: event.description.clone(),
                category: event.category.clone(),
                logo: event.logo.clone(),
                link: event.link.clone(),
                discount: None,
                pricing: None,
                features: event.location.iter().cloned().collect(),
                provider: event.organizer.clone(),
                popular: false,
                recent: false,
                open_source: false,
                original,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AiTool, Event, Perk};

    fn perk(discount: Option<&str>) -> CatalogRecord {
        CatalogRecord::Perk(Perk {
            id: RecordId("p1".into()),
            title: "Spotify".into(),
            description: "Music".into(),
            category: vec!["Entertainment".into()],
            discount: discount.map(str::to_string),
            link: "https://spotify.com".into(),
            logo: None,
            provider: Some("Spotify".into()),
            valid_until: Some("2026-12-31".into()),
            verification_required: true,
            popular: true,
            is_new: false,
        })
    }

    #[test]
    fn tool_projects_into_tool_bucket_and_keeps_original() {
        let record = CatalogRecord::AiTool(AiTool {
            id: RecordId("t1".into()),
            name: "Ollama".into(),
            description: "Local models".into(),
            logo: Some("🦙".into()),
            category: vec!["Development".into()],
            pricing: Some("Free".into()),
            features: vec!["CLI".into()],
            link: "https://ollama.com".into(),
            open_source: true,
            popular: false,
            is_new: true,
        });
        let item = SearchableItem::from(&record);
        assert_eq!(item.item_type, ItemType::Tool);
        assert_eq!(item.title, "Ollama");
        assert!(item.open_source);
        assert!(item.recent);
        assert_eq!(item.pricing_tier(), PricingTier::Free);
        assert_eq!(item.original, record);
        assert_eq!(item.kind(), CatalogKind::AiTools);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "tool");
        assert_eq!(json["original"]["kind"], "ai_tool");
    }

    #[test]
    fn perk_pricing_tier_reads_discount_text() {
        assert_eq!(
            SearchableItem::from(&perk(Some("100% free"))).pricing_tier(),
            PricingTier::Free
        );
        assert_eq!(
            SearchableItem::from(&perk(Some("50% off"))).pricing_tier(),
            PricingTier::Unknown
        );
        assert_eq!(
            SearchableItem::from(&perk(None)).pricing_tier(),
            PricingTier::Unknown
        );
    }

    #[test]
    fn events_land_in_resource_bucket() {
        let record = CatalogRecord::Event(Event {
            id: RecordId("e1".into()),
            title: "Hacktoberfest".into(),
            description: "Open source month".into(),
            date: Some("2026-10-01".into()),
            location: Some("Online".into()),
            link: "https://hacktoberfest.com".into(),
            category: vec!["Open Source".into()],
            organizer: Some("DigitalOcean".into()),
            logo: None,
            online: true,
        });
        let item = SearchableItem::from(&record);
        assert_eq!(item.item_type, ItemType::Resource);
        assert_eq!(item.provider.as_deref(), Some("DigitalOcean"));
        assert_eq!(item.features, vec!["Online"]);
    }
}
