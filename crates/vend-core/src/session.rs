//! # Purchase Session
//!
//! A customer's visit, from first item to receipt or walk-away.
//!
//! ## Lifecycle
//! ```text
//!            add ok                confirm ok
//!   Empty ─────────► Building ────────────────► Finalized
//!     ▲                │  │
//!     └── last line ───┘  │ abandon
//!         removed         ▼
//!   (Empty also) ─────► Abandoned
//! ```
//!
//! `Finalized` and `Abandoned` are terminal: any further operation fails
//! with `SessionClosed`. A failed operation never changes the state.

use std::fmt;

use crate::cart::{add_to_cart, manage_cart, Cart, CartAction};
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::purchase::{checkout, Receipt};
use crate::types::ItemCode;

/// Where a [`PurchaseSession`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Building,
    Finalized,
    Abandoned,
}

impl SessionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Finalized | SessionState::Abandoned)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Empty => "empty",
            SessionState::Building => "building",
            SessionState::Finalized => "finalized",
            SessionState::Abandoned => "abandoned",
        };
        f.write_str(label)
    }
}

/// A purchase session owning the customer's cart.
#[derive(Debug, Clone)]
pub struct PurchaseSession {
    cart: Cart,
    state: SessionState,
}

impl Default for PurchaseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseSession {
    pub fn new() -> Self {
        PurchaseSession {
            cart: Cart::new(),
            state: SessionState::Empty,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds items to the cart. See [`add_to_cart`].
    pub fn add(&mut self, inventory: &Inventory, code: ItemCode, quantity: i64) -> CoreResult<()> {
        self.ensure_open()?;
        add_to_cart(&mut self.cart, inventory, code, quantity)?;
        self.state = SessionState::Building;
        Ok(())
    }

    /// Removes or adjusts a cart line. See [`manage_cart`].
    pub fn manage(
        &mut self,
        inventory: &Inventory,
        code: ItemCode,
        action: CartAction,
        new_quantity: Option<i64>,
    ) -> CoreResult<()> {
        self.ensure_open()?;
        manage_cart(&mut self.cart, inventory, code, action, new_quantity)?;
        if self.cart.is_empty() {
            self.state = SessionState::Empty;
        }
        Ok(())
    }

    /// Checks the cart out against `inventory`, closing the session on success.
    pub fn confirm(&mut self, inventory: &mut Inventory) -> CoreResult<Receipt> {
        self.ensure_open()?;
        let receipt = checkout(&mut self.cart, inventory)?;
        self.state = SessionState::Finalized;
        Ok(receipt)
    }

    /// Walks away: discards the cart without touching the inventory.
    pub fn abandon(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.cart.clear();
        self.state = SessionState::Abandoned;
        Ok(())
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.state.is_closed() {
            return Err(CoreError::SessionClosed {
                state: self.state.to_string(),
            });
        }
        Ok(())
    }
}
