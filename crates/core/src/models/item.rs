#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SwapError;

/// The two clothing kinds the exchange accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Topwear,
    Bottomwear,
}

impl FromStr for ItemKind {
    type Err = SwapError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "topwear" => Ok(Self::Topwear),
            "bottomwear" => Ok(Self::Bottomwear),
            other => Err(SwapError::InvalidVariant(other.to_string())),
        }
    }
}

/// A single piece of clothing. The variant name doubles as the `type`
/// tag in the persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClothingItem {
    Topwear {
        title: String,
        item_id: String,
        brand: String,
        size: String,
        color: String,
    },
    Bottomwear {
        title: String,
        item_id: String,
        waist_size: u32,
        length: u32,
        material: String,
    },
}

impl ClothingItem {
    /// Unique key of the item across the catalog and borrowed lists.
    pub fn item_id(&self) -> &str {
        match self {
            Self::Topwear { item_id, .. } | Self::Bottomwear { item_id, .. } => item_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Topwear { title, .. } | Self::Bottomwear { title, .. } => title,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Topwear { .. } => ItemKind::Topwear,
            Self::Bottomwear { .. } => ItemKind::Bottomwear,
        }
    }

    /// Placeholder shown when only a bare ID survived in a borrowed list.
    pub fn unknown(item_id: impl Into<String>) -> Self {
        Self::Topwear {
            title: "Unknown".to_string(),
            item_id: item_id.into(),
            brand: "Unknown".to_string(),
            size: "Unknown".to_string(),
            color: "Unknown".to_string(),
        }
    }

    /// Decode a persisted record.
    ///
    /// Returns `None` when the record is not an object or carries an
    /// unrecognized `type` tag; callers treat that as "skip".
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

impl fmt::Display for ClothingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topwear {
                title,
                item_id,
                brand,
                size,
                color,
            } => write!(
                f,
                "[Topwear] ID: {item_id}, Title: {title}, Brand: {brand}, Size: {size}, Color: {color}"
            ),
            Self::Bottomwear {
                title,
                item_id,
                waist_size,
                length,
                material,
            } => write!(
                f,
                "[Bottomwear] ID: {item_id}, Title: {title}, Waist: {waist_size}, Length: {length}, Material: {material}"
            ),
        }
    }
}
