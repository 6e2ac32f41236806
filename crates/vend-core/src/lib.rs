//! # vend-core: Pure Business Logic for the Vending Machine
//!
//! This crate is the **heart** of the vending machine. It contains the
//! cart/inventory consistency engine as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vending Machine Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vend-cli (text menus)                        │   │
//! │  │    Owner menu ──► Load/Manage    Customer ──► Cart ──► Receipt  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ already-parsed arguments              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vend-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   cart    │  │ purchase  │  │ validation│  │   │
//! │  │   │ Inventory │  │   Cart    │  │ confirm   │  │   rules   │  │   │
//! │  │   │ ItemRecord│  │ CartEntry │  │ checkout  │  │  parsing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vend-db (Database Layer)                     │   │
//! │  │           inventory snapshot, owner credentials                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identifiers and records (ItemCode, ItemRecord, CartEntry)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types and the closed [`ErrorKind`] taxonomy
//! - [`validation`] - Input rules and parsers for shell-supplied text
//! - [`inventory`] - The inventory store and owner mutation helpers
//! - [`cart`] - Cart operations validated against the inventory
//! - [`purchase`] - Two-phase purchase finalization and receipts
//! - [`session`] - The purchase session state machine
//!
//! ## Invariants Held By Every Operation
//!
//! 1. **Never negative**: every inventory quantity stays `>= 0`
//! 2. **Never oversell**: a cart line never exceeds the stock it came from
//! 3. **Failure is a no-op**: an operation that returns `Err` has mutated nothing
//! 4. **Atomic purchase**: either every cart line is committed or none is
//!
//! ## Example Usage
//!
//! ```rust
//! use vend_core::{add_to_cart, confirm_purchase, Cart, Inventory, ItemCode, Money};
//!
//! let mut inventory = Inventory::new();
//! let water = ItemCode::new(1).unwrap();
//! inventory.add_item(water, "Water", Money::from_cents(100), 10).unwrap();
//!
//! let mut cart = Cart::new();
//! add_to_cart(&mut cart, &inventory, water, 3).unwrap();
//!
//! let transaction_id = confirm_purchase(&mut cart, &mut inventory).unwrap();
//! assert_eq!(transaction_id.as_str().len(), 8);
//! assert_eq!(inventory.get(water).unwrap().quantity(), 7);
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod inventory;
pub mod money;
pub mod purchase;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vend_core::Cart` instead of
// `use vend_core::cart::Cart`

pub use cart::{add_to_cart, manage_cart, manage_cart_by_tag, Cart, CartAction};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use inventory::{adjust_price, adjust_quantity, Inventory};
pub use money::Money;
pub use purchase::{checkout, confirm_purchase, Receipt, ReceiptLine, SoldOutItem};
pub use session::{PurchaseSession, SessionState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Length of the transaction identifier printed on receipts.
pub const TRANSACTION_ID_LEN: usize = 8;
