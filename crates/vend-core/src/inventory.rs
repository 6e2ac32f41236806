//! # Inventory Store
//!
//! The machine's stock: a mapping of [`ItemCode`] to [`ItemRecord`], and the
//! owner-side helpers that mutate it.
//!
//! ## Owner Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation          Semantics         Fails with                       │
//! │  ─────────────────  ────────────────  ───────────────────────────────  │
//! │  add_item           insert new code   duplicate code/name, bad fields  │
//! │  restock            quantity += n     unknown code, n <= 0             │
//! │  adjust_quantity    quantity  = n     unknown code, n < 0              │
//! │  adjust_price       price     = p     unknown code, p <= 0             │
//! │  remove_item        delete code       unknown code                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note the deliberate asymmetry: `restock` adds to the current stock while
//! `adjust_quantity` overwrites it.
//!
//! Every helper checks all of its preconditions before touching the map, so
//! an `Err` return leaves the inventory unchanged.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{ItemCode, ItemRecord};
use crate::validation::{validate_price, validate_quantity, validate_stock_level};

/// The inventory store.
///
/// Ordered by item code so every table renders in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<ItemCode, ItemRecord>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Inventory {
            items: BTreeMap::new(),
        }
    }

    /// Rebuilds an inventory from stored records.
    ///
    /// Rejects duplicate codes and case-insensitive duplicate names, the same
    /// rules `add_item` enforces. Zero-stock records are kept as they are.
    pub fn from_records<I>(records: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (ItemCode, ItemRecord)>,
    {
        let mut inventory = Inventory::new();
        for (code, record) in records {
            inventory.check_unique(code, &record.name)?;
            inventory.items.insert(code, record);
        }
        Ok(inventory)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, code: ItemCode) -> Option<&ItemRecord> {
        self.items.get(&code)
    }

    pub fn contains(&self, code: ItemCode) -> bool {
        self.items.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ItemCode, ItemRecord> {
        self.items.iter()
    }

    /// Units on hand for `code`; an absent item has zero available.
    pub fn available(&self, code: ItemCode) -> i64 {
        self.items.get(&code).map_or(0, ItemRecord::quantity)
    }

    /// Finds the code stocked under `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<ItemCode> {
        let needle = name.to_lowercase();
        self.items
            .iter()
            .find(|(_, record)| record.name.to_lowercase() == needle)
            .map(|(code, _)| *code)
    }

    /// Total stock value: Σ price × quantity.
    pub fn total_value(&self) -> Money {
        self.items.values().map(ItemRecord::stock_value).sum()
    }

    // =========================================================================
    // Owner Mutations
    // =========================================================================

    /// Stocks a brand-new item.
    ///
    /// ## Errors
    /// - `Validation(Duplicate)` if `code` is already stocked or `name` matches
    ///   an existing name case-insensitively
    /// - `Validation(..)` if the name, price or quantity is invalid
    ///   (a new item must arrive with at least one unit)
    pub fn add_item(
        &mut self,
        code: ItemCode,
        name: &str,
        price: Money,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;
        let record = ItemRecord::new(name, price, quantity)?;
        self.check_unique(code, &record.name)?;

        self.items.insert(code, record);
        Ok(())
    }

    /// Adds `quantity` units to an existing item (delta, not absolute).
    ///
    /// Returns the new stock level.
    pub fn restock(&mut self, code: ItemCode, quantity: i64) -> CoreResult<i64> {
        validate_quantity(quantity)?;
        let record = self.record_mut(code)?;
        record.quantity = record
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| ValidationError::invalid_format("quantity", "too large"))?;
        Ok(record.quantity)
    }

    /// Sets the stock level of an existing item (absolute, not delta).
    pub fn adjust_quantity(&mut self, code: ItemCode, new_quantity: i64) -> CoreResult<()> {
        let record = self.record_mut(code)?;
        validate_stock_level(new_quantity)?;
        record.quantity = new_quantity;
        Ok(())
    }

    /// Sets the unit price of an existing item.
    pub fn adjust_price(&mut self, code: ItemCode, new_price: Money) -> CoreResult<()> {
        let record = self.record_mut(code)?;
        validate_price(new_price)?;
        record.price = new_price;
        Ok(())
    }

    /// Removes an item and returns its record.
    pub fn remove_item(&mut self, code: ItemCode) -> CoreResult<ItemRecord> {
        self.items
            .remove(&code)
            .ok_or(CoreError::ItemNotFound { code })
    }

    // =========================================================================
    // Crate-internal helpers for purchase finalization
    // =========================================================================

    pub(crate) fn record_mut(&mut self, code: ItemCode) -> CoreResult<&mut ItemRecord> {
        self.items
            .get_mut(&code)
            .ok_or(CoreError::ItemNotFound { code })
    }

    /// Removes every record whose stock reached zero, returning them in code order.
    pub(crate) fn evict_sold_out(&mut self) -> Vec<(ItemCode, ItemRecord)> {
        let sold_out: Vec<ItemCode> = self
            .items
            .iter()
            .filter(|(_, record)| record.quantity == 0)
            .map(|(code, _)| *code)
            .collect();

        sold_out
            .into_iter()
            .filter_map(|code| self.items.remove(&code).map(|record| (code, record)))
            .collect()
    }

    fn check_unique(&self, code: ItemCode, name: &str) -> CoreResult<()> {
        if self.items.contains_key(&code) {
            return Err(ValidationError::Duplicate {
                field: "item code".to_string(),
                value: code.to_string(),
            }
            .into());
        }
        if self.find_by_name(name).is_some() {
            return Err(ValidationError::Duplicate {
                field: "name".to_string(),
                value: name.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = (&'a ItemCode, &'a ItemRecord);
    type IntoIter = btree_map::Iter<'a, ItemCode, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Free-function forms
// =============================================================================

/// Sets the stock level of `code` to `new_quantity` (absolute set).
///
/// ## Errors
/// - `ItemNotFound` if `code` is not stocked
/// - `Validation(MustNotBeNegative)` if `new_quantity < 0`
pub fn adjust_quantity(inventory: &mut Inventory, code: ItemCode, new_quantity: i64) -> CoreResult<()> {
    inventory.adjust_quantity(code, new_quantity)
}

/// Sets the unit price of `code` to `new_price`.
///
/// ## Errors
/// - `ItemNotFound` if `code` is not stocked
/// - `Validation(MustBePositive)` if `new_price <= 0`
pub fn adjust_price(inventory: &mut Inventory, code: ItemCode, new_price: Money) -> CoreResult<()> {
    inventory.adjust_price(code, new_price)
}

// =============================================================================
// Unit Tests
// =============================================================================
