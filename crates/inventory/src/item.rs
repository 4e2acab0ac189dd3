use std::collections::HashSet;

use khata_core::{Amount, DomainError, DomainResult, IdGen, ItemId};
use serde::{Deserialize, Serialize};

/// Sale status of a listed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    Available,
    Sold,
}

/// One item in the shop's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub status: ItemStatus,
}

/// The shop's item list, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
    ids: IdGen,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Blank names are rejected; the price goes through the
    /// same parse-and-validate step as ledger amounts.
    pub fn add_item(&mut self, name: &str, price: Amount, status: ItemStatus) -> DomainResult<&Item> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }

        self.items.push(Item {
            id: self.ids.next_item_id(),
            name: name.to_string(),
            price: price.get(),
            status,
        });
        Ok(self.items.last().expect("just pushed"))
    }

    /// Replace an item's name, price and status.
    pub fn update_item(
        &mut self,
        item_id: ItemId,
        name: &str,
        price: Amount,
        status: ItemStatus,
    ) -> DomainResult<&Item> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(DomainError::NotFound)?;
        item.name = name.to_string();
        item.price = price.get();
        item.status = status;
        Ok(item)
    }

    /// Flip an item between available and sold.
    pub fn set_status(&mut self, item_id: ItemId, status: ItemStatus) -> DomainResult<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(DomainError::NotFound)?;
        item.status = status;
        Ok(())
    }

    /// Remove the given items. Empty or unmatched sets are a no-op.
    pub fn delete_items(&mut self, ids: &HashSet<ItemId>) {
        if ids.is_empty() {
            return;
        }
        self.items.retain(|i| !ids.contains(&i.id));
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Case-insensitive substring filter over item names.
    pub fn search<'a>(&'a self, query: &str) -> Vec<&'a Item> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect()
    }
}
