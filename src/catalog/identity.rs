use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// Stable identifier for a catalog record, unique within its catalog kind.
///
/// Taken verbatim from the source `id` column, or synthesized from the source
/// line number when the kind allows a blank id.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn from_line(line: usize) -> Self {
        RecordId(format!("row-{line}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which catalog a source file feeds.
///
/// Declaration order is the merge order used by `CatalogIndex`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CatalogKind {
    Perks,
    AiTools,
    Courses,
    Resources,
    Events,
}

/// Result bucket an item lands in once projected for search.
///
/// Courses and events share the `resource` bucket with plain resources.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ItemType {
    Perk,
    Tool,
    Resource,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Perks,
        CatalogKind::AiTools,
        CatalogKind::Courses,
        CatalogKind::Resources,
        CatalogKind::Events,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Perks => "perks",
            CatalogKind::AiTools => "ai_tools",
            CatalogKind::Courses => "courses",
            CatalogKind::Resources => "resources",
            CatalogKind::Events => "events",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "perks" => Some(CatalogKind::Perks),
            "ai_tools" | "tools" => Some(CatalogKind::AiTools),
            "courses" => Some(CatalogKind::Courses),
            "resources" => Some(CatalogKind::Resources),
            "events" => Some(CatalogKind::Events),
            _ => None,
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            CatalogKind::Perks => ItemType::Perk,
            CatalogKind::AiTools => ItemType::Tool,
            CatalogKind::Courses | CatalogKind::Resources | CatalogKind::Events => {
                ItemType::Resource
            }
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CatalogKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CatalogKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| de::Error::custom(format!("unknown catalog kind '{value}'")))
    }
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Perk => "perk",
            ItemType::Tool => "tool",
            ItemType::Resource => "resource",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_serde() {
        let json = serde_json::to_string(&CatalogKind::AiTools).unwrap();
        assert_eq!(json, "\"ai_tools\"");
        let back: CatalogKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CatalogKind::AiTools);

        let err = serde_json::from_str::<CatalogKind>("\"podcasts\"").unwrap_err();
        assert!(err.to_string().contains("podcasts"));
    }

    #[test]
    fn kinds_project_into_three_buckets() {
        assert_eq!(CatalogKind::Perks.item_type(), ItemType::Perk);
        assert_eq!(CatalogKind::AiTools.item_type(), ItemType::Tool);
        for kind in [
            CatalogKind::Courses,
            CatalogKind::Resources,
            CatalogKind::Events,
        ] {
            assert_eq!(kind.item_type(), ItemType::Resource);
        }
    }

    #[test]
    fn record_id_from_line_is_stable() {
        assert_eq!(RecordId::from_line(7), RecordId("row-7".to_string()));
        assert_eq!(
            serde_json::to_string(&RecordId::from_line(2)).unwrap(),
            "\"row-2\""
        );
    }
}
