#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Swap Threads clothing exchange.
//!
//! This crate hosts the clothing and member models, configuration
//! handling, the JSON table persistence, and the borrow/return
//! workflow used by the command-line front end.

pub mod config;
pub mod error;
pub mod exchange;
pub mod manifest;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use error::{SwapError, SwapResult};
pub use exchange::SwapExchange;
pub use manifest::StoreManifest;
pub use models::{BorrowedRecord, ClothingItem, ItemKind, SwapMember};
pub use store::{ExchangeStore, JsonStore, MemoryStore, Snapshot};
