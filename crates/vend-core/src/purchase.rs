//! # Purchase Finalization
//!
//! Turns a cart into committed inventory changes, all or nothing.
//!
//! ## Two-Phase Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     confirm_purchase(cart, inventory)                   │
//! │                                                                         │
//! │  cart empty? ──yes──► Err(EmptyCart)                                   │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  PHASE 1: validate every line (read-only)                              │
//! │  ├── code missing from inventory  ──► Err(ItemNotFound)                │
//! │  └── line quantity > stock        ──► Err(InsufficientStock)           │
//! │       │ all lines OK                                                    │
//! │       ▼                                                                 │
//! │  PHASE 2: decrement every matching record (cannot fail)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SWEEP: evict records left at zero                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  new TransactionId, clear cart, return                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Phase 1 runs to completion before Phase 2 writes anything, so an error
//! leaves both the cart and the inventory exactly as they were.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::types::{ItemCode, ItemRecord, TransactionId};

// =============================================================================
// Receipt
// =============================================================================

/// One purchased line as printed on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub code: ItemCode,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// An item whose stock reached zero during the purchase and was evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldOutItem {
    pub code: ItemCode,
    pub name: String,
}

/// The outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
    pub sold_out: Vec<SoldOutItem>,
}

impl Receipt {
    /// Total number of units bought.
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Commits the cart against the inventory and returns a transaction id.
///
/// ## Errors
/// - `EmptyCart` if there is nothing to buy
/// - `ItemNotFound` if a carted code is no longer stocked
/// - `InsufficientStock` if a carted quantity exceeds current stock
///
/// On any error, nothing is mutated.
pub fn confirm_purchase(cart: &mut Cart, inventory: &mut Inventory) -> CoreResult<TransactionId> {
    commit(cart, inventory).map(|(id, _)| id)
}

/// Like [`confirm_purchase`], but also builds the printable [`Receipt`].
///
/// Lines use the prices frozen in the cart, not current inventory prices.
pub fn checkout(cart: &mut Cart, inventory: &mut Inventory) -> CoreResult<Receipt> {
    let lines: Vec<ReceiptLine> = cart
        .iter()
        .map(|(code, entry)| ReceiptLine {
            code: *code,
            name: entry.name().to_string(),
            unit_price: entry.price(),
            quantity: entry.quantity(),
            line_total: entry.line_total(),
        })
        .collect();
    let total = cart.total();

    let (transaction_id, evicted) = commit(cart, inventory)?;

    let sold_out = evicted
        .into_iter()
        .map(|(code, record)| SoldOutItem {
            code,
            name: record.name,
        })
        .collect();

    Ok(Receipt {
        transaction_id,
        lines,
        total,
        sold_out,
    })
}

fn commit(
    cart: &mut Cart,
    inventory: &mut Inventory,
) -> CoreResult<(TransactionId, Vec<(ItemCode, ItemRecord)>)> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    // Phase 1
    for (code, entry) in cart.iter() {
        let record = inventory
            .get(*code)
            .ok_or(CoreError::ItemNotFound { code: *code })?;
        if entry.quantity() > record.quantity() {
            return Err(CoreError::InsufficientStock {
                code: *code,
                name: record.name().to_string(),
                available: record.quantity(),
                requested: entry.quantity(),
            });
        }
    }

    // Phase 2
    for (code, entry) in cart.iter() {
        let record = inventory.record_mut(*code)?;
        record.quantity -= entry.quantity();
    }

    let evicted = inventory.evict_sold_out();
    let transaction_id = TransactionId::generate();
    cart.clear();

    Ok((transaction_id, evicted))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{add_to_cart, manage_cart, CartAction};
    use crate::error::ErrorKind;
    use crate::TRANSACTION_ID_LEN;

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
    fn test_confirm_decrements_and_evicts() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(1), 3).unwrap();
        add_to_cart(&mut cart, &inventory, code(2), 5).unwrap();

        let id = confirm_purchase(&mut cart, &mut inventory).unwrap();

        assert_eq!(id.as_str().len(), TRANSACTION_ID_LEN);
        assert!(cart.is_empty());
        assert_eq!(inventory.available(code(1)), 7);
        assert!(!inventory.contains(code(2)));
    }

    #[test]
    fn test_confirm_empty_cart() {
        let mut inventory = stocked();
        let before = inventory.clone();
        let mut cart = Cart::new();

        let err = confirm_purchase(&mut cart, &mut inventory).unwrap_err();
        assert_eq!(err, CoreError::EmptyCart);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(inventory, before);
    }

    #[test]
    fn test_confirm_is_all_or_nothing() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(1), 3).unwrap();
        add_to_cart(&mut cart, &inventory, code(2), 4).unwrap();

        // Owner lowers stock of the second line after it was carted.
        inventory.adjust_quantity(code(2), 2).unwrap();

        let inventory_before = inventory.clone();
        let cart_before = cart.clone();

        let err = confirm_purchase(&mut cart, &mut inventory).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(inventory, inventory_before, "first line must not be committed");
        assert_eq!(cart, cart_before);
    }

    #[test]
    fn test_confirm_fails_when_item_was_removed() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(1), 1).unwrap();
        add_to_cart(&mut cart, &inventory, code(2), 1).unwrap();
        inventory.remove_item(code(2)).unwrap();

        let before = inventory.clone();
        let err = confirm_purchase(&mut cart, &mut inventory).unwrap_err();
        assert_eq!(err, CoreError::ItemNotFound { code: code(2) });
        assert_eq!(inventory, before);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_checkout_receipt() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(1), 2).unwrap();
        add_to_cart(&mut cart, &inventory, code(2), 5).unwrap();

        // A later price change does not reach the receipt.
        inventory.adjust_price(code(1), Money::from_cents(500)).unwrap();

        let receipt = checkout(&mut cart, &mut inventory).unwrap();

        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(receipt.lines[0].unit_price, Money::from_cents(100));
        assert_eq!(receipt.lines[0].line_total, Money::from_cents(200));
        assert_eq!(receipt.lines[1].line_total, Money::from_cents(750));
        assert_eq!(receipt.total, Money::from_cents(950));
        assert_eq!(receipt.unit_count(), 7);
        assert_eq!(
            receipt.sold_out,
            vec![SoldOutItem {
                code: code(2),
                name: "Soda".to_string()
            }]
        );
    }

    #[test]
    fn test_receipt_and_cart_serialize() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, code(2), 5).unwrap();
        add_to_cart(&mut cart, &inventory, code(1), 2).unwrap();

        let cart_json = serde_json::to_value(&cart).unwrap();
        assert_eq!(cart_json["1"]["quantity"], 2);
        assert_eq!(cart_json["2"]["price"], 150);
        assert_eq!(cart_json["2"]["name"], "Soda");

        let receipt = checkout(&mut cart, &mut inventory).unwrap();
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains(&format!("\"transaction_id\":\"{}\"", receipt.transaction_id)));
        assert!(json.contains("\"total\":950"));

        let back: Receipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
        assert_eq!(back.sold_out[0].code, code(2));
    }

    #[test]
    fn test_checkout_failure_returns_same_error() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        assert_eq!(
            checkout(&mut cart, &mut inventory).unwrap_err(),
            CoreError::EmptyCart
        );
    }

    // =========================================================================
    // Property tests
    // =========================================================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(i64, i64),
            Adjust(i64, i64),
            Remove(i64),
            SetStock(i64, i64),
            Confirm,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1i64..=4, -2i64..=8).prop_map(|(c, q)| Op::Add(c, q)),
                (1i64..=4, -2i64..=8).prop_map(|(c, q)| Op::Adjust(c, q)),
                (1i64..=4).prop_map(Op::Remove),
                (1i64..=4, -2i64..=8).prop_map(|(c, q)| Op::SetStock(c, q)),
                Just(Op::Confirm),
            ]
        }

        fn fresh_inventory() -> Inventory {
            let mut inventory = Inventory::new();
            for (raw, name) in [(1, "Water"), (2, "Soda"), (3, "Chips")] {
                inventory
                    .add_item(code(raw), name, Money::from_cents(100 * raw), 6)
                    .unwrap();
            }
            inventory
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

            #[test]
            fn operations_preserve_invariants(ops in prop::collection::vec(op_strategy(), 1..40)) {
                let mut inventory = fresh_inventory();
                let mut cart = Cart::new();

                for op in ops {
                    let inventory_before = inventory.clone();
                    let cart_before = cart.clone();

                    let result = match op {
                        Op::Add(c, q) => add_to_cart(&mut cart, &inventory, code(c), q),
                        Op::Adjust(c, q) => {
                            manage_cart(&mut cart, &inventory, code(c), CartAction::Adjust, Some(q))
                        }
                        Op::Remove(c) => {
                            manage_cart(&mut cart, &inventory, code(c), CartAction::Remove, None)
                        }
                        Op::SetStock(c, q) => inventory.adjust_quantity(code(c), q),
                        Op::Confirm => confirm_purchase(&mut cart, &mut inventory).map(|_| ()),
                    };

                    if result.is_err() {
                        prop_assert_eq!(&inventory, &inventory_before);
                        prop_assert_eq!(&cart, &cart_before);
                    }

                    for (_, record) in &inventory {
                        prop_assert!(record.quantity() >= 0);
                    }
                    for (_, entry) in &cart {
                        prop_assert!(entry.quantity() > 0);
                    }
                    // Owner edits can lower stock below a carted line; every
                    // other operation keeps the line within stock.
                    if !matches!(op, Op::SetStock(..)) && result.is_ok() {
                        if let Op::Add(c, _) | Op::Adjust(c, _) = op {
                            prop_assert!(cart.quantity_of(code(c)) <= inventory.available(code(c)));
                        }
                    }
                }
            }

            #[test]
            fn confirm_commits_every_line_or_none(
                wants in prop::collection::vec((1i64..=3, 1i64..=6), 1..6),
                lowered in 0i64..=6,
            ) {
                let mut inventory = fresh_inventory();
                let mut cart = Cart::new();
                for (c, q) in wants {
                    let _ = add_to_cart(&mut cart, &inventory, code(c), q);
                }
                prop_assume!(!cart.is_empty());

                inventory.adjust_quantity(code(1), lowered).unwrap();
                let inventory_before = inventory.clone();
                let cart_before = cart.clone();

                match confirm_purchase(&mut cart, &mut inventory) {
                    Ok(_) => {
                        prop_assert!(cart.is_empty());
                        for (code, entry) in &cart_before {
                            let left = inventory_before.available(*code) - entry.quantity();
                            if left == 0 {
                                prop_assert!(!inventory.contains(*code));
                            } else {
                                prop_assert_eq!(inventory.available(*code), left);
                            }
                        }
                    }
                    Err(err) => {
                        prop_assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
                        prop_assert_eq!(&inventory, &inventory_before);
                        prop_assert_eq!(&cart, &cart_before);
                    }
                }
            }
        }
    }
}
