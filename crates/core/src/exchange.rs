//! Registration, login, and the borrow/return workflow.

use tracing::{info, warn};

use crate::{
    error::{SwapError, SwapResult},
    models::{BorrowedRecord, ClothingItem, SwapMember},
    store::{ExchangeStore, Snapshot},
};

/// Orchestrates every operation against the catalog and membership
/// tables.
///
/// Holds the only in-memory copy of both collections, built once from
/// the store; every mutation is pushed back to the store before the
/// call returns.
pub struct SwapExchange<S: ExchangeStore> {
    store: S,
    catalog: Vec<ClothingItem>,
    members: Vec<SwapMember>,
}

impl<S: ExchangeStore> SwapExchange<S> {
    /// Build the exchange from whatever the store currently holds.
    pub fn open(store: S) -> SwapResult<Self> {
        let Snapshot { catalog, members } = store.load()?;
        Ok(Self {
            store,
            catalog,
            members,
        })
    }

    /// Items currently available to borrow, in insertion order.
    pub fn available_items(&self) -> &[ClothingItem] {
        &self.catalog
    }

    /// Look up a member by ID.
    pub fn member(&self, member_id: &str) -> Option<&SwapMember> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    /// Create a new member and return them as the session subject.
    pub fn register(
        &mut self,
        member_id: &str,
        name: &str,
        password: &str,
    ) -> SwapResult<SwapMember> {
        if self.member(member_id).is_some() {
            return Err(SwapError::DuplicateMember(member_id.to_string()));
        }
        let member = SwapMember::new(member_id, name, password);
        self.members.push(member.clone());
        self.persist()?;
        info!(member_id, "member registered");
        Ok(member)
    }

    /// Authenticate an existing member. Exact string match, no lockout.
    pub fn login(&self, member_id: &str, password: &str) -> SwapResult<SwapMember> {
        match self.member(member_id) {
            Some(member) if member.password == password => Ok(member.clone()),
            _ => Err(SwapError::InvalidCredentials),
        }
    }

    /// Insert an item into the catalog.
    ///
    /// A colliding ID replaces the existing entry in place, keeping its
    /// position in the listing.
    pub fn add_item(&mut self, item: ClothingItem) -> SwapResult<()> {
        match self.catalog_position(item.item_id()) {
            Some(index) => {
                warn!(item_id = item.item_id(), "replacing existing catalog entry");
                self.catalog[index] = item;
            }
            None => self.catalog.push(item),
        }
        self.persist()
    }

    /// Move an item from the catalog into the member's borrowed list.
    pub fn borrow_item(&mut self, member_id: &str, item_id: &str) -> SwapResult<ClothingItem> {
        let member_index = self.member_index(member_id)?;
        let item_index = self
            .catalog_position(item_id)
            .ok_or_else(|| SwapError::ItemNotFound(item_id.to_string()))?;

        let item = self.catalog.remove(item_index);
        self.members[member_index]
            .borrowed_items
            .push(BorrowedRecord::Item(item.clone()));
        self.persist()?;
        info!(member_id, item_id, "item borrowed");
        Ok(item)
    }

    /// The member's borrowed records, in borrow order, for the numbered
    /// return menu.
    pub fn borrowed_items(&self, member_id: &str) -> SwapResult<Vec<BorrowedRecord>> {
        let member = self.member(member_id).ok_or(SwapError::InvalidCredentials)?;
        if member.borrowed_items.is_empty() {
            return Err(SwapError::NoBorrowedItems);
        }
        Ok(member.borrowed_items.clone())
    }

    /// Remove the record chosen from the numbered return menu and put the
    /// item back into the catalog.
    ///
    /// `selection` is the 1-based index shown to the user. A legacy
    /// record carries only the item ID, so the caller must supply the
    /// re-entered details as `replacement`.
    pub fn return_item(
        &mut self,
        member_id: &str,
        selection: usize,
        replacement: Option<ClothingItem>,
    ) -> SwapResult<ClothingItem> {
        let member_index = self.member_index(member_id)?;
        let list = &self.members[member_index].borrowed_items;
        if list.is_empty() {
            return Err(SwapError::NoBorrowedItems);
        }
        if selection == 0 || selection > list.len() {
            return Err(SwapError::InvalidSelection);
        }

        let item = match (&list[selection - 1], replacement) {
            (BorrowedRecord::Item(item), _) => item.clone(),
            (BorrowedRecord::Legacy(id), Some(item)) if item.item_id() == id.as_str() => item,
            (BorrowedRecord::Legacy(id), Some(_)) => {
                return Err(SwapError::MalformedRecord(format!(
                    "re-entered details do not match item '{id}'"
                )))
            }
            (BorrowedRecord::Legacy(id), None) => {
                return Err(SwapError::MalformedRecord(format!(
                    "item '{id}' needs its details re-entered"
                )))
            }
        };

        self.members[member_index].borrowed_items.remove(selection - 1);
        match self.catalog_position(item.item_id()) {
            Some(index) => self.catalog[index] = item.clone(),
            None => self.catalog.push(item.clone()),
        }
        self.persist()?;
        info!(member_id, item_id = item.item_id(), "item returned");
        Ok(item)
    }

    /// Push the current snapshot to the store (used at logout).
    pub fn flush(&self) -> SwapResult<()> {
        self.persist()
    }

    /// Read access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) -> SwapResult<()> {
        self.store.save(&self.catalog, &self.members)?;
        Ok(())
    }

    fn catalog_position(&self, item_id: &str) -> Option<usize> {
        self.catalog.iter().position(|item| item.item_id() == item_id)
    }

    fn member_index(&self, member_id: &str) -> SwapResult<usize> {
        self.members
            .iter()
            .position(|m| m.member_id == member_id)
            .ok_or(SwapError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn topwear(id: &str, title: &str) -> ClothingItem {
        ClothingItem::Topwear {
            title: title.to_string(),
            item_id: id.to_string(),
            brand: "X".to_string(),
            size: "M".to_string(),
            color: "Blue".to_string(),
        }
    }

    fn bottomwear(id: &str) -> ClothingItem {
        ClothingItem::Bottomwear {
            title: "Jeans".to_string(),
            item_id: id.to_string(),
            waist_size: 32,
            length: 30,
            material: "Denim".to_string(),
        }
    }

    fn open_empty() -> SwapExchange<MemoryStore> {
        SwapExchange::open(MemoryStore::new()).expect("open empty store")
    }

    /// Every item ID must live in exactly one place: the catalog or one
    /// member's borrowed list.
    fn assert_exclusive(exchange: &SwapExchange<MemoryStore>) {
        let mut seen = HashSet::new();
        for item in exchange.available_items() {
            assert!(seen.insert(item.item_id().to_string()), "duplicate in catalog");
        }
        for member in &exchange.members {
            for record in &member.borrowed_items {
                assert!(
                    seen.insert(record.item_id().to_string()),
                    "item held in two places"
                );
            }
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "right").expect("first register");
        let err = exchange.register("A", "Alan", "other").unwrap_err();
        assert!(matches!(err, SwapError::DuplicateMember(id) if id == "A"));
        assert_eq!(exchange.members.len(), 1);
    }

    #[test]
    fn login_rejects_wrong_password_and_unknown_member() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "right").expect("register");
        assert!(matches!(
            exchange.login("A", "wrong"),
            Err(SwapError::InvalidCredentials)
        ));
        assert!(matches!(
            exchange.login("B", "right"),
            Err(SwapError::InvalidCredentials)
        ));
        assert_eq!(exchange.login("A", "right").expect("login").name, "Ada");
    }

    #[test]
    fn borrowing_unknown_id_changes_nothing() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "pw").expect("register");
        exchange.add_item(topwear("T1", "Shirt")).expect("add");

        let err = exchange.borrow_item("A", "T9").unwrap_err();
        assert!(matches!(err, SwapError::ItemNotFound(id) if id == "T9"));
        assert_eq!(exchange.available_items().len(), 1);
        assert!(exchange.member("A").expect("member").borrowed_items.is_empty());
    }

    #[test]
    fn borrow_then_return_restores_the_catalog() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "pw").expect("register");
        exchange.add_item(topwear("T1", "Shirt")).expect("add");
        assert_eq!(exchange.available_items()[0].item_id(), "T1");

        let borrowed = exchange.borrow_item("A", "T1").expect("borrow");
        assert_eq!(borrowed.item_id(), "T1");
        assert!(exchange.available_items().is_empty());
        let records = exchange.borrowed_items("A").expect("borrowed list");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_id(), "T1");
        assert_exclusive(&exchange);

        let returned = exchange.return_item("A", 1, None).expect("return");
        assert_eq!(returned, topwear("T1", "Shirt"));
        assert_eq!(exchange.available_items(), &[topwear("T1", "Shirt")]);
        assert!(exchange.member("A").expect("member").borrowed_items.is_empty());
        assert_exclusive(&exchange);
    }

    #[test]
    fn return_without_borrows_and_bad_selection_are_rejected() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "pw").expect("register");
        assert!(matches!(
            exchange.borrowed_items("A"),
            Err(SwapError::NoBorrowedItems)
        ));
        assert!(matches!(
            exchange.return_item("A", 1, None),
            Err(SwapError::NoBorrowedItems)
        ));

        exchange.add_item(bottomwear("B1")).expect("add");
        exchange.borrow_item("A", "B1").expect("borrow");
        assert!(matches!(
            exchange.return_item("A", 0, None),
            Err(SwapError::InvalidSelection)
        ));
        assert!(matches!(
            exchange.return_item("A", 2, None),
            Err(SwapError::InvalidSelection)
        ));
        assert_eq!(exchange.borrowed_items("A").expect("list").len(), 1);
    }

    #[test]
    fn legacy_record_needs_reentered_details() {
        let store = MemoryStore::new();
        let mut member = SwapMember::new("A", "Ada", "pw");
        member
            .borrowed_items
            .push(BorrowedRecord::Legacy("T7".to_string()));
        store
            .save(&[], &[member])
            .expect("seed store");

        let mut exchange = SwapExchange::open(store).expect("open");
        let err = exchange.return_item("A", 1, None).unwrap_err();
        assert!(matches!(err, SwapError::MalformedRecord(_)));
        assert_eq!(exchange.borrowed_items("A").expect("list").len(), 1);
        assert!(exchange.available_items().is_empty());

        let err = exchange
            .return_item("A", 1, Some(topwear("T8", "Shirt")))
            .unwrap_err();
        assert!(matches!(err, SwapError::MalformedRecord(_)));

        let returned = exchange
            .return_item("A", 1, Some(topwear("T7", "Shirt")))
            .expect("return with details");
        assert_eq!(returned.item_id(), "T7");
        assert_eq!(exchange.available_items().len(), 1);
        assert!(exchange.member("A").expect("member").borrowed_items.is_empty());
        assert_exclusive(&exchange);
    }

    #[test]
    fn colliding_add_replaces_in_place() {
        let mut exchange = open_empty();
        exchange.add_item(topwear("T1", "Shirt")).expect("add");
        exchange.add_item(topwear("T2", "Coat")).expect("add");
        exchange.add_item(topwear("T1", "Blouse")).expect("re-add");

        let listing = exchange.available_items();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].item_id(), "T1");
        assert_eq!(listing[0].title(), "Blouse");
        assert_eq!(listing[1].item_id(), "T2");
    }

    #[test]
    fn every_mutation_reaches_the_store() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "pw").expect("register");
        assert_eq!(exchange.store().snapshot().members.len(), 1);

        exchange.add_item(topwear("T1", "Shirt")).expect("add");
        assert_eq!(exchange.store().snapshot().catalog.len(), 1);

        exchange.borrow_item("A", "T1").expect("borrow");
        let saved = exchange.store().snapshot();
        assert!(saved.catalog.is_empty());
        assert_eq!(saved.members[0].borrowed_items.len(), 1);

        exchange.return_item("A", 1, None).expect("return");
        let saved = exchange.store().snapshot();
        assert_eq!(saved.catalog.len(), 1);
        assert!(saved.members[0].borrowed_items.is_empty());
    }

    #[test]
    fn exclusivity_holds_across_a_mixed_sequence() {
        let mut exchange = open_empty();
        exchange.register("A", "Ada", "pw").expect("register");
        exchange.register("B", "Bob", "pw").expect("register");
        for id in ["T1", "T2", "T3"] {
            exchange.add_item(topwear(id, "Shirt")).expect("add");
        }
        exchange.add_item(bottomwear("B1")).expect("add");

        exchange.borrow_item("A", "T2").expect("borrow");
        exchange.borrow_item("B", "B1").expect("borrow");
        exchange.borrow_item("A", "T1").expect("borrow");
        assert_exclusive(&exchange);

        exchange.return_item("A", 1, None).expect("return T2");
        assert_exclusive(&exchange);

        exchange.borrow_item("B", "T2").expect("borrow again");
        assert_exclusive(&exchange);

        let ids: Vec<_> = exchange
            .available_items()
            .iter()
            .map(ClothingItem::item_id)
            .collect();
        assert_eq!(ids, vec!["T3"]);
    }
}
