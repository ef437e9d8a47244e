//! Clothing item and member models.

mod item;
mod member;

pub use item::{ClothingItem, ItemKind};
pub use member::{BorrowedRecord, SwapMember};
