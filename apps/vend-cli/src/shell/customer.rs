//! Customer purchase session: build a cart, review it, confirm or walk away.

use chrono::Local;
use std::io::{BufRead, Write};
use tracing::info;
use vend_core::{CartAction, CoreError, ItemCode, PurchaseSession};

use super::Shell;
use crate::backend::MachineStore;
use crate::error::AppResult;
use crate::render;

const RECEIPT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a customer visit ended.
pub(super) enum Visit {
    Purchased,
    WalkedAway,
}

impl<R, W, S> Shell<R, W, S>
where
    R: BufRead,
    W: Write,
    S: MachineStore,
{
    pub(super) fn customer_visit(&mut self) -> AppResult<Visit> {
        let mut session = PurchaseSession::new();

        loop {
            self.say(
                "\n~~~ Customer Menu ~~~\n\
                 1. Add items to cart\n\
                 2. View cart\n\
                 3. Manage cart\n\
                 4. Confirm purchase\n\
                 5. Done",
            )?;
            match self.ask_menu("Enter your choice (1/2/3/4/5): ", 5)? {
                1 => self.add_items_menu(&mut session)?,
                2..=4 if session.cart().is_empty() => {
                    self.say("\nYour cart is empty.")?;
                    self.add_items_menu(&mut session)?;
                }
                2 => self.view_cart(&session)?,
                3 => self.manage_cart(&mut session)?,
                4 => {
                    if self.confirm_purchase(&mut session)? {
                        return Ok(Visit::Purchased);
                    }
                }
                _ => {
                    if self.ask_yes_no("Do you want to exit? (y/n): ")? {
                        let units = session.cart().total_quantity();
                        session.abandon()?;
                        info!(discarded_units = units, "Customer walked away");
                        return Ok(Visit::WalkedAway);
                    }
                }
            }
        }
    }

    fn add_items_menu(&mut self, session: &mut PurchaseSession) -> AppResult<()> {
        loop {
            self.say("\n1. Add new item into your cart\n2. Done")?;
            match self.ask_menu("Enter your choice (1/2): ", 2)? {
                1 => self.add_one_item(session)?,
                _ => return Ok(()),
            }
        }
    }

    fn add_one_item(&mut self, session: &mut PurchaseSession) -> AppResult<()> {
        loop {
            let code = self.ask_item_code("Enter Item Code: ")?;
            let Some(name) = self.inventory.get(code).map(|r| r.name().to_string()) else {
                self.say(&format!("\nItem with code {} not found in inventory.\n", code))?;
                continue;
            };
            let quantity = self.ask_positive("Enter Quantity of Item: ")?;

            match session.add(&self.inventory, code, quantity) {
                Ok(()) => {
                    return self.say(&format!("{} {}(s) added to your cart.", quantity, name));
                }
                Err(CoreError::InsufficientStock { available, .. }) => {
                    let in_cart = session.cart().quantity_of(code);
                    if in_cart == 0 && available <= 0 {
                        return self.say(&format!(
                            "\n{} is out of stock. Please choose another item.",
                            name
                        ));
                    }
                    let room = available - in_cart;
                    if room <= 0 {
                        return self.say(&format!(
                            "\nAll available {}(s) are already in your cart. No more can be added to cart.",
                            name
                        ));
                    }
                    self.say(&format!(
                        "\nOnly {} {}(s) available for adding. Please adjust your quantity.\n",
                        room, name
                    ))?;
                }
                Err(e) => return self.report(&e),
            }
        }
    }

    fn view_cart(&mut self, session: &PurchaseSession) -> AppResult<()> {
        let table = render::cart_table(session.cart(), &self.settings.currency_symbol, false);
        self.say("\n           ~~~~~~~~~~~~~ Your Cart ~~~~~~~~~~~~~")?;
        self.say(table.trim_end())
    }

    fn manage_cart(&mut self, session: &mut PurchaseSession) -> AppResult<()> {
        self.view_cart(session)?;

        let code = loop {
            let code = self.ask_item_code("Enter Item Code to manage: ")?;
            if session.cart().contains(code) {
                break code;
            }
            self.say(&format!("\nItem with code {} not found in cart.\n", code))?;
        };

        self.say("\nDo you want to\n(1) Remove item or\n(2) Adjust quantity?")?;
        match self.ask_menu("Enter your choice (1/2): ", 2)? {
            1 => match session.manage(&self.inventory, code, CartAction::Remove, None) {
                Ok(()) => self.say(&format!("Item with code {} removed from cart.", code)),
                Err(e) => self.report(&e),
            },
            _ => self.adjust_cart_line(session, code),
        }
    }

    fn adjust_cart_line(&mut self, session: &mut PurchaseSession, code: ItemCode) -> AppResult<()> {
        loop {
            let quantity = self.ask_positive("Enter new quantity: ")?;
            match session.manage(&self.inventory, code, CartAction::Adjust, Some(quantity)) {
                Ok(()) => {
                    return self.say(&format!(
                        "Quantity of item {} updated to {}.",
                        code, quantity
                    ));
                }
                Err(CoreError::InsufficientStock { name, available, .. }) if available > 0 => {
                    self.say(&format!(
                        "\nOnly {} {}(s) available. Please enter a smaller quantity.\n",
                        available, name
                    ))?;
                }
                Err(CoreError::InsufficientStock { name, .. }) => {
                    return self.say(&format!(
                        "\n{} is no longer available. Please remove it from your cart.",
                        name
                    ));
                }
                Err(e) => return self.report(&e),
            }
        }
    }

    /// Shows the bill preview and checks out on a yes. Returns whether the
    /// purchase went through.
    fn confirm_purchase(&mut self, session: &mut PurchaseSession) -> AppResult<bool> {
        let symbol = self.settings.currency_symbol.clone();
        let preview = render::cart_table(session.cart(), &symbol, true);
        let total = render::total_line("Total Price", session.cart().total(), &symbol);
        self.say("\n           ~~~~~~~~~~~~~ Confirm Purchase ~~~~~~~~~~~~~")?;
        self.say(preview.trim_end())?;
        self.say(&format!("\n{}", total))?;

        if !self.ask_yes_no("Do you want to confirm the purchase? (y/n): ")? {
            self.say("Purchase not confirmed. You can keep shopping.")?;
            return Ok(false);
        }

        let receipt = match session.confirm(&mut self.inventory) {
            Ok(receipt) => receipt,
            Err(e) => {
                self.report(&e)?;
                return Ok(false);
            }
        };

        info!(
            transaction_id = %receipt.transaction_id,
            total = %receipt.total,
            units = receipt.unit_count(),
            "Purchase completed"
        );

        for item in &receipt.sold_out {
            self.say(&format!(
                "{} (code {}) is now sold out and has been removed from the machine.",
                item.name, item.code
            ))?;
        }
        self.say("\nPurchase successful!")?;

        let timestamp = Local::now().format(RECEIPT_TIME_FORMAT).to_string();
        let bill = render::receipt(&receipt, &timestamp, &symbol);
        self.say(bill.trim_end())?;

        self.save_inventory()?;
        Ok(true)
    }
}
