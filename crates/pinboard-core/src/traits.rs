use crate::PinboardResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A stored row. Stores treat rows as opaque JSON objects keyed by
/// [`Collection::key_field`].
pub type Row = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Boards,
    Cards,
    Tabs,
    Placements,
    Groups,
    Connections,
    Images,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Boards,
        Collection::Cards,
        Collection::Tabs,
        Collection::Placements,
        Collection::Groups,
        Collection::Connections,
        Collection::Images,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::Cards => "cards",
            Self::Tabs => "tabs",
            Self::Placements => "placements",
            Self::Groups => "groups",
            Self::Connections => "connections",
            Self::Images => "images",
        }
    }

    /// Field holding the primary key of each row.
    pub fn key_field(self) -> &'static str {
        match self {
            Self::Images => "hash",
            _ => "id",
        }
    }

    /// Secondary lookups a store must answer through `get_all_by_index`.
    pub fn indexes(self) -> &'static [&'static str] {
        match self {
            Self::Boards | Self::Images => &[],
            Self::Cards | Self::Tabs => &["board_id"],
            Self::Placements => &["tab_id", "card_id", "group_id"],
            Self::Groups => &["tab_id"],
            Self::Connections => &["tab_id", "from_id", "to_id"],
        }
    }

    /// Extract the primary key of `row`, if it carries one.
    pub fn key_of(self, row: &Row) -> Option<String> {
        row.get(self.key_field())
            .and_then(|value| value.as_str())
            .map(str::to_string)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Abstract key-value storage with secondary lookups.
///
/// Every call is atomic on its own. There is no cross-call transaction and no
/// optimistic concurrency: the last `put` for a key wins. `put` fails with
/// [`crate::PinboardError::StorageFull`] when the backend is out of space.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, collection: Collection, key: &str) -> PinboardResult<Option<Row>>;

    async fn get_all(&self, collection: Collection) -> PinboardResult<Vec<Row>>;

    /// All rows whose `field` equals `value` (string comparison).
    async fn get_all_by_index(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> PinboardResult<Vec<Row>>;

    async fn put(&self, collection: Collection, row: Row) -> PinboardResult<()>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, collection: Collection, key: &str) -> PinboardResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_of() {
        let row = json!({"id": "abc", "name": "Board"});
        assert_eq!(Collection::Boards.key_of(&row), Some("abc".to_string()));

        let image = json!({"hash": "ff00", "content_type": "image/png"});
        assert_eq!(Collection::Images.key_of(&image), Some("ff00".to_string()));
        assert_eq!(Collection::Cards.key_of(&image), None);
    }

    #[test]
    fn test_collection_names_unique() {
        let mut names: Vec<_> = Collection::ALL.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
    }
}
