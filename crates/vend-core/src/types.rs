//! # Domain Types
//!
//! Core domain types used throughout the vending machine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ItemRecord    │   │   CartEntry     │   │ TransactionId   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  name (frozen)  │   │  8 characters   │       │
//! │  │  price  (> 0)   │   │  price (frozen) │   │  receipt only   │       │
//! │  │  quantity (>=0) │   │  quantity (> 0) │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │           ▲                     ▲                                       │
//! │           └──── keyed by ItemCode (positive integer) ────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartEntry` freezes the name and price of the item at the moment it was
//! added. An owner price change afterwards does not reprice the cart.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_item_name, validate_price, validate_stock_level};
use crate::TRANSACTION_ID_LEN;

// =============================================================================
// Item Code
// =============================================================================

/// Positive integer identifying a distinct vendable product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ItemCode(u32);

impl ItemCode {
    /// Creates an item code, rejecting zero, negatives, and values past `u32`.
    ///
    /// ## Example
    /// ```rust
    /// use vend_core::ItemCode;
    ///
    /// assert_eq!(ItemCode::new(7).unwrap().get(), 7);
    /// assert!(ItemCode::new(0).is_err());
    /// assert!(ItemCode::new(-3).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw <= 0 {
            return Err(ValidationError::must_be_positive("item code"));
        }
        u32::try_from(raw)
            .map(ItemCode)
            .map_err(|_| ValidationError::invalid_format("item code", "too large"))
    }

    /// Returns the raw code.
    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for ItemCode {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        ItemCode::new(raw)
    }
}

impl From<ItemCode> for u32 {
    fn from(code: ItemCode) -> Self {
        code.0
    }
}

impl fmt::Display for ItemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Item Record
// =============================================================================

/// A product stocked in the machine.
///
/// Fields are only reachable through validated constructors and the
/// inventory helpers, so a record in an `Inventory` always satisfies:
/// - `name` passes [`validate_item_name`]
/// - `price > 0`
/// - `quantity >= 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawItemRecord")]
pub struct ItemRecord {
    pub(crate) name: String,
    pub(crate) price: Money,
    pub(crate) quantity: i64,
}

impl ItemRecord {
    /// Creates a validated record.
    ///
    /// Zero quantity is accepted: owners may hold a record at zero while
    /// editing. Only a finalized purchase evicts zero-stock records.
    pub fn new(name: impl Into<String>, price: Money, quantity: i64) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_item_name(&name)?;
        validate_price(price)?;
        validate_stock_level(quantity)?;

        Ok(ItemRecord {
            name,
            price,
            quantity,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Units in stock.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Stock value of this record (price × quantity).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// Unvalidated wire shape; deserialization funnels through `ItemRecord::new`.
#[derive(Deserialize)]
struct RawItemRecord {
    name: String,
    price: Money,
    quantity: i64,
}

impl TryFrom<RawItemRecord> for ItemRecord {
    type Error = ValidationError;

    fn try_from(raw: RawItemRecord) -> Result<Self, Self::Error> {
        ItemRecord::new(raw.name, raw.price, raw.quantity)
    }
}

// =============================================================================
// Cart Entry
// =============================================================================

/// A line in the customer's cart.
///
/// Created only by the cart operations, which guarantee `quantity > 0` and
/// `quantity <=` the stock available when the entry was last touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub(crate) name: String,
    pub(crate) price: Money,
    pub(crate) quantity: i64,
}

impl CartEntry {
    /// Freezes name and price from an inventory record.
    pub(crate) fn snapshot(record: &ItemRecord, quantity: i64) -> Self {
        CartEntry {
            name: record.name.clone(),
            price: record.price,
            quantity,
        }
    }

    /// Name at time of adding (frozen).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price at time of adding (frozen).
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Units requested.
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Transaction Id
// =============================================================================

/// Short receipt identifier for a finalized purchase.
///
/// Taken from a random v4 UUID. No registry is kept, so uniqueness is
/// best-effort only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        TransactionId(uuid[..TRANSACTION_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_code_rejects_non_positive() {
        assert!(ItemCode::new(1).is_ok());
        assert!(matches!(
            ItemCode::new(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(ItemCode::new(-1).is_err());
        assert!(ItemCode::new(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_item_record_validation() {
        assert!(ItemRecord::new("Water", Money::from_cents(100), 10).is_ok());
        assert!(ItemRecord::new("Water", Money::from_cents(100), 0).is_ok());

        assert!(ItemRecord::new("Water", Money::zero(), 10).is_err());
        assert!(ItemRecord::new("Water", Money::from_cents(-1), 10).is_err());
        assert!(ItemRecord::new("Water", Money::from_cents(100), -1).is_err());
        assert!(ItemRecord::new("", Money::from_cents(100), 1).is_err());
        assert!(ItemRecord::new("123", Money::from_cents(100), 1).is_err());
    }

    #[test]
    fn test_deserialize_goes_through_validation() {
        let ok: ItemRecord =
            serde_json::from_str(r#"{"name":"Soda","price":150,"quantity":5}"#).unwrap();
        assert_eq!(ok.price(), Money::from_cents(150));

        let negative = serde_json::from_str::<ItemRecord>(
            r#"{"name":"Soda","price":150,"quantity":-5}"#,
        );
        assert!(negative.is_err());

        let bad_code = serde_json::from_str::<ItemCode>("0");
        assert!(bad_code.is_err());
    }

    #[test]
    fn test_cart_entry_snapshot_and_total() {
        let record = ItemRecord::new("Soda", Money::from_cents(150), 5).unwrap();
        let entry = CartEntry::snapshot(&record, 3);
        assert_eq!(entry.name(), "Soda");
        assert_eq!(entry.line_total(), Money::from_cents(450));
    }

    #[test]
    fn test_transaction_id_shape() {
        let id = TransactionId::generate();
        assert_eq!(id.as_str().len(), TRANSACTION_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
