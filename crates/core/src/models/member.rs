#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use super::item::ClothingItem;

/// One entry in a member's borrowed list.
///
/// Older stores recorded only the bare item ID. That shape is kept as a
/// first-class variant so a return can ask for the missing details
/// instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorrowedRecord {
    Item(ClothingItem),
    Legacy(String),
}

impl BorrowedRecord {
    /// Unique key of the borrowed item.
    pub fn item_id(&self) -> &str {
        match self {
            Self::Item(item) => item.item_id(),
            Self::Legacy(id) => id,
        }
    }

    /// Item used for rendering. Legacy records surface as the
    /// "Unknown" placeholder.
    pub fn display_item(&self) -> ClothingItem {
        match self {
            Self::Item(item) => item.clone(),
            Self::Legacy(id) => ClothingItem::unknown(id.clone()),
        }
    }

    /// Whether a return of this record needs its details re-entered.
    pub fn needs_details(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

/// A registered club member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapMember {
    pub member_id: String,
    pub name: String,
    /// Stored in the clear; the table format offers no secrecy.
    pub password: String,
    #[serde(default)]
    pub borrowed_items: Vec<BorrowedRecord>,
}

impl SwapMember {
    /// New member with an empty borrowed list.
    pub fn new(
        member_id: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            password: password.into(),
            borrowed_items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn borrowed_list_defaults_to_empty() {
        let member: SwapMember = serde_json::from_value(json!({
            "member_id": "A",
            "name": "Ada",
            "password": "pw"
        }))
        .expect("deserialize");
        assert!(member.borrowed_items.is_empty());
    }

    #[test]
    fn legacy_record_round_trips_as_bare_id() {
        let record = BorrowedRecord::Legacy("T9".to_string());
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value, json!("T9"));
        let back: BorrowedRecord = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, record);
        assert!(back.needs_details());
        assert_eq!(back.item_id(), "T9");
    }

    #[test]
    fn tagged_record_parses_as_item() {
        let record: BorrowedRecord = serde_json::from_value(json!({
            "type": "Topwear",
            "title": "Shirt",
            "item_id": "T1",
            "brand": "X",
            "size": "M",
            "color": "Blue"
        }))
        .expect("deserialize");
        assert!(!record.needs_details());
        assert_eq!(record.item_id(), "T1");
        assert_eq!(record.display_item().title(), "Shirt");
    }

    #[test]
    fn legacy_record_renders_as_placeholder() {
        let record = BorrowedRecord::Legacy("B2".to_string());
        let rendered = record.display_item().to_string();
        assert!(rendered.starts_with("[Topwear] ID: B2, Title: Unknown"));
    }
}
