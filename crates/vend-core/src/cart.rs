//! # Cart
//!
//! The customer's staging area for a single purchase session, and the
//! operations that keep it consistent with the inventory.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Menu Action              Core Function            Cart Change          │
//! │  ───────────              ─────────────            ───────────          │
//! │                                                                         │
//! │  Add item ──────────────► add_to_cart() ─────────► qty += n / insert   │
//! │                                                                         │
//! │  Adjust quantity ───────► manage_cart(Adjust) ───► qty = n             │
//! │                                                                         │
//! │  Remove item ───────────► manage_cart(Remove) ───► delete entry        │
//! │                                                                         │
//! │  Confirm purchase ──────► confirm_purchase() ────► clear               │
//! │                                                                         │
//! │  NOTE: The inventory is only read here. It changes at confirmation.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::types::{CartEntry, ItemCode};
use crate::validation::validate_quantity;

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Entries are unique by item code (adding the same code increases quantity)
/// - Every quantity is > 0
/// - Every quantity was within available stock when last written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    entries: BTreeMap<ItemCode, CartEntry>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, code: ItemCode) -> Option<&CartEntry> {
        self.entries.get(&code)
    }

    pub fn contains(&self, code: ItemCode) -> bool {
        self.entries.contains_key(&code)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ItemCode, CartEntry> {
        self.entries.iter()
    }

    /// Returns the number of distinct items in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Units of `code` already in the cart (zero if absent).
    pub fn quantity_of(&self, code: ItemCode) -> i64 {
        self.entries.get(&code).map_or(0, CartEntry::quantity)
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.entries.values().map(CartEntry::quantity).sum()
    }

    /// Sum of line totals at the frozen prices.
    pub fn total(&self) -> Money {
        self.entries.values().map(CartEntry::line_total).sum()
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = (&'a ItemCode, &'a CartEntry);
    type IntoIter = btree_map::Iter<'a, ItemCode, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// Cart Action
// =============================================================================

/// What to do with an existing cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    /// Drop the line entirely.
    Remove,
    /// Replace the line's quantity.
    Adjust,
}

impl FromStr for CartAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remove" => Ok(CartAction::Remove),
            "adjust" => Ok(CartAction::Adjust),
            other => Err(CoreError::UnknownCartAction(other.to_string())),
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartAction::Remove => f.write_str("remove"),
            CartAction::Adjust => f.write_str("adjust"),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Adds `quantity` units of `code` to the cart.
///
/// The cart total for `code` (already carted + `quantity`) may not exceed the
/// stock on hand. A new line freezes the item's current name and price.
///
/// ## Errors
/// - `ItemNotFound` if `code` is not stocked
/// - `Validation(MustBePositive)` if `quantity <= 0`
/// - `InsufficientStock` if the combined quantity exceeds stock
///
/// ## Example
/// ```rust
/// use vend_core::{add_to_cart, Cart, Inventory, ItemCode, Money};
///
/// let water = ItemCode::new(1).unwrap();
/// let mut inventory = Inventory::new();
/// inventory.add_item(water, "Water", Money::from_cents(100), 10).unwrap();
///
/// let mut cart = Cart::new();
/// add_to_cart(&mut cart, &inventory, water, 3).unwrap();
/// add_to_cart(&mut cart, &inventory, water, 4).unwrap();
/// assert_eq!(cart.quantity_of(water), 7);
/// assert!(add_to_cart(&mut cart, &inventory, water, 4).is_err());
/// ```
pub fn add_to_cart(
    cart: &mut Cart,
    inventory: &Inventory,
    code: ItemCode,
    quantity: i64,
) -> CoreResult<()> {
    let record = inventory
        .get(code)
        .ok_or(CoreError::ItemNotFound { code })?;
    validate_quantity(quantity)?;

    let already = cart.quantity_of(code);
    let requested = already.saturating_add(quantity);
    if requested > record.quantity() {
        return Err(CoreError::InsufficientStock {
            code,
            name: record.name().to_string(),
            available: record.quantity(),
            requested,
        });
    }

    cart.entries
        .entry(code)
        .and_modify(|entry| entry.quantity = requested)
        .or_insert_with(|| CartEntry::snapshot(record, quantity));

    Ok(())
}

/// Removes a cart line or replaces its quantity.
///
/// `Adjust` re-checks against the *current* inventory, which may have changed
/// since the line was added. An item no longer stocked has zero available.
///
/// ## Errors
/// - `NotInCart` if `code` has no line in the cart
/// - `MissingQuantity` if `Adjust` is given no quantity
/// - `Validation(MustBePositive)` if the new quantity is `<= 0`
/// - `InsufficientStock` if the new quantity exceeds stock
pub fn manage_cart(
    cart: &mut Cart,
    inventory: &Inventory,
    code: ItemCode,
    action: CartAction,
    new_quantity: Option<i64>,
) -> CoreResult<()> {
    if !cart.contains(code) {
        return Err(CoreError::NotInCart { code });
    }

    match action {
        CartAction::Remove => {
            cart.entries.remove(&code);
        }
        CartAction::Adjust => {
            let new_quantity = new_quantity.ok_or(CoreError::MissingQuantity)?;
            validate_quantity(new_quantity)?;

            let available = inventory.available(code);
            if new_quantity > available {
                let name = cart
                    .get(code)
                    .map(|entry| entry.name().to_string())
                    .unwrap_or_default();
                return Err(CoreError::InsufficientStock {
                    code,
                    name,
                    available,
                    requested: new_quantity,
                });
            }

            if let Some(entry) = cart.entries.get_mut(&code) {
                entry.quantity = new_quantity;
            }
        }
    }

    Ok(())
}

/// Tag-based form of [`manage_cart`] for callers holding the action as text.
///
/// ## Errors
/// Same as [`manage_cart`], plus `UnknownCartAction` for any tag other than
/// `remove` / `adjust`. Cart existence is checked first.
pub fn manage_cart_by_tag(
    cart: &mut Cart,
    inventory: &Inventory,
    code: ItemCode,
    action: &str,
    new_quantity: Option<i64>,
) -> CoreResult<()> {
    if !cart.contains(code) {
        return Err(CoreError::NotInCart { code });
    }
    let action: CartAction = action.parse()?;
    manage_cart(cart, inventory, code, action, new_quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn code(raw: i64) -> ItemCode {
        ItemCode::new(raw).unwrap()
    }

    fn stocked() -> Inventory {
        let mut inventory = Inventory::new();
        inventory
            .add_item(code(1), "Water", Money::from_cents(100), 10)
            .unwrap();
        inventory
            .add_item(code(2), "Soda", Money::from_cents(150), 5)
            .unwrap();
        inventory
    }

    #[test]
    fn test_add_accumulates_quantity() {
        let inventory = stocked();
        let mut cart = Cart::new();

        add_to_cart(&mut cart, &inventory, code(1), 3).unwrap();
        assert_eq!(cart.get(code(1)).unwrap().quantity(), 3);

        add_to_cart(&mut cart, &inventory, code(1), 4).unwrap();
        assert_eq!(cart.get(code(1)).unwrap().quantity(), 7);
        assert_eq!(cart.len(), 1);

        add_to_cart(&mut cart, &inventory, code(2), 2).unwrap();
        assert_eq!(cart.get(code(2)).unwrap().quantity(), 2);
        assert_eq!(cart.total_quantity(), 9);
        assert_eq!(cart.total(), Money::from_cents(1000));
    }

    #[test]
    fn test_add_over_capacity_changes_nothing() {
        let inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(2), 2).unwrap();

        let cart_before = cart.clone();
        let inventory_before = inventory.clone();

        let err = add_to_cart(&mut cart, &inventory, code(2), 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 12,
                ..
            }
        ));

        assert_eq!(cart, cart_before);
        assert_eq!(inventory, inventory_before);
    }

    #[test]
    fn test_add_rejects_unknown_code_and_bad_quantity() {
        let inventory = stocked();
        let mut cart = Cart::new();

        assert_eq!(
            add_to_cart(&mut cart, &inventory, code(3), 1).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            add_to_cart(&mut cart, &inventory, code(1), 0).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            add_to_cart(&mut cart, &inventory, code(1), -1).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_snapshots_price() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(1), 1).unwrap();

        inventory.adjust_price(code(1), Money::from_cents(999)).unwrap();
        add_to_cart(&mut cart, &inventory, code(1), 1).unwrap();

        assert_eq!(cart.get(code(1)).unwrap().price(), Money::from_cents(100));
    }

    #[test]
    fn test_manage_remove_and_adjust() {
        let inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(1), 3).unwrap();
        add_to_cart(&mut cart, &inventory, code(2), 2).unwrap();

        manage_cart(&mut cart, &inventory, code(1), CartAction::Remove, None).unwrap();
        assert!(!cart.contains(code(1)));

        manage_cart(&mut cart, &inventory, code(2), CartAction::Adjust, Some(4)).unwrap();
        assert_eq!(cart.quantity_of(code(2)), 4);
    }

    #[test]
    fn test_manage_adjust_errors_leave_cart_intact() {
        let inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(2), 2).unwrap();
        let before = cart.clone();

        let err = manage_cart(&mut cart, &inventory, code(2), CartAction::Adjust, Some(10))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);

        for bad in [Some(0), Some(-1), None] {
            let err =
                manage_cart(&mut cart, &inventory, code(2), CartAction::Adjust, bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        let err =
            manage_cart(&mut cart, &inventory, code(999), CartAction::Remove, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_manage_adjust_after_item_removed_from_inventory() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(2), 2).unwrap();
        inventory.remove_item(code(2)).unwrap();

        let err = manage_cart(&mut cart, &inventory, code(2), CartAction::Adjust, Some(1))
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 0, .. }
        ));
    }

    #[test]
    fn test_manage_by_tag() {
        let inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(2), 2).unwrap();

        manage_cart_by_tag(&mut cart, &inventory, code(2), "ADJUST", Some(3)).unwrap();
        assert_eq!(cart.quantity_of(code(2)), 3);

        let err = manage_cart_by_tag(&mut cart, &inventory, code(2), "invalid_action", None)
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownCartAction(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = manage_cart_by_tag(&mut cart, &inventory, code(999), "remove", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        manage_cart_by_tag(&mut cart, &inventory, code(2), "remove", None).unwrap();
        assert!(cart.is_empty());
    }
}
