//! Owner login and stock management menus.

use std::io::{BufRead, Write};
use tracing::{info, warn};
use vend_core::validation::{title_case, validate_item_name};
use vend_core::{adjust_price, adjust_quantity, ItemCode};

use super::{Shell, EMPTY_MACHINE};
use crate::backend::MachineStore;
use crate::error::AppResult;
use crate::render;

impl<R, W, S> Shell<R, W, S>
where
    R: BufRead,
    W: Write,
    S: MachineStore,
{
    pub(super) fn owner_entry(&mut self) -> AppResult<()> {
        self.say("\n--- Owner Login ---")?;
        let owner_id = self.ask("Enter Owner ID: ")?;
        let password = self.ask("Enter your password: ")?;

        if !self.store.verify_owner(&owner_id, &password)? {
            warn!("Owner login rejected");
            return self.say("\nIncorrect ID or password. Access denied!");
        }

        info!("Owner logged in");
        self.say("\nAccess granted to the owner menu.")?;
        self.owner_menu()
    }

    fn owner_menu(&mut self) -> AppResult<()> {
        loop {
            self.say(
                "\n~~~ Owner Menu ~~~\n\
                 1. Load items into the vending machine\n\
                 2. Manage the vending machine\n\
                 3. Display items in the vending machine\n\
                 4. Done",
            )?;
            match self.ask_menu("Enter your choice (1/2/3/4): ", 4)? {
                1 => self.load_items()?,
                2 => self.manage_machine()?,
                3 => self.display_stock_value()?,
                _ => {
                    if self.inventory.is_empty() {
                        return self.say("\nNo items added. Returning to main menu.");
                    }
                    self.save_inventory()?;
                    return self.say("Vending machine is ready for customers.");
                }
            }
        }
    }

    fn display_stock_value(&mut self) -> AppResult<()> {
        self.display_items()?;
        if !self.inventory.is_empty() {
            let total = self.inventory.total_value();
            let line = render::total_line(
                "Total Inventory Value",
                total,
                &self.settings.currency_symbol,
            );
            self.say(&format!("\n{}", line))?;
        }
        Ok(())
    }

    // =========================================================================
    // Loading stock
    // =========================================================================

    fn load_items(&mut self) -> AppResult<()> {
        loop {
            self.say("\nChoose one\n1. Add new item\n2. Done")?;
            match self.ask_menu("Enter your choice (1/2): ", 2)? {
                1 => self.load_one_item()?,
                _ => return self.say("Done adding items."),
            }
        }
    }

    fn load_one_item(&mut self) -> AppResult<()> {
        let code = self.ask_item_code("Enter Item Code: ")?;

        if let Some(name) = self.inventory.get(code).map(|r| r.name().to_string()) {
            let prompt = format!("Item code {} ({}) already exists. Add more quantity? (y/n): ", code, name);
            if !self.ask_yes_no(&prompt)? {
                return self.say("No quantity added.");
            }
            let quantity = self.ask_positive("Enter quantity to add: ")?;
            return match self.inventory.restock(code, quantity) {
                Ok(level) => {
                    info!(%code, quantity, level, "Item restocked");
                    self.say(&format!("Quantity of {} updated. New quantity: {}", name, level))
                }
                Err(e) => self.report(&e),
            };
        }

        let name = self.ask_new_item_name()?;
        let price = self.ask_price("Enter Price of the Item: ")?;
        let quantity = self.ask_positive("Enter Quantity of Item: ")?;

        match self.inventory.add_item(code, &name, price, quantity) {
            Ok(()) => {
                info!(%code, name = %name, %price, quantity, "Item added");
                self.say(&format!(
                    "\n{} {}(s) added successfully into your Vending Machine.",
                    quantity, name
                ))
            }
            Err(e) => self.report(&e),
        }
    }

    /// Reads a name until it is well formed and not already stocked.
    fn ask_new_item_name(&mut self) -> AppResult<String> {
        loop {
            let name = title_case(&self.ask("Enter Item Name: ")?);

            if let Err(e) = validate_item_name(&name) {
                self.say(&format!("\nInvalid item name: {}. Please try again.\n", e))?;
                continue;
            }
            if let Some(existing) = self.inventory.find_by_name(&name) {
                self.say(&format!(
                    "\nAn item named {} already exists with code {}. Please use a different name.\n",
                    name, existing
                ))?;
                continue;
            }
            return Ok(name);
        }
    }

    // =========================================================================
    // Managing stock
    // =========================================================================

    fn manage_machine(&mut self) -> AppResult<()> {
        loop {
            if self.inventory.is_empty() {
                self.say(EMPTY_MACHINE)?;
                self.load_items()?;
                if self.inventory.is_empty() {
                    return self.say("No items added. Returning to owner menu.");
                }
                continue;
            }

            self.display_items()?;
            self.say(
                "\n~~~ Manage Vending Machine ~~~\n\
                 1. Adjust quantity\n\
                 2. Remove item\n\
                 3. Adjust price\n\
                 4. Done",
            )?;
            match self.ask_menu("Enter your choice (1/2/3/4): ", 4)? {
                1 => self.adjust_stock_level()?,
                2 => self.remove_stocked_item()?,
                3 => self.change_price()?,
                _ => return Ok(()),
            }
        }
    }

    /// Reads a code that is currently stocked.
    fn ask_stocked_code(&mut self, prompt: &str) -> AppResult<ItemCode> {
        loop {
            let code = self.ask_item_code(prompt)?;
            if self.inventory.contains(code) {
                return Ok(code);
            }
            self.say(&format!("\nItem with code {} not found in inventory.\n", code))?;
        }
    }

    fn adjust_stock_level(&mut self) -> AppResult<()> {
        let code = self.ask_stocked_code("Enter Item Code to adjust quantity: ")?;
        loop {
            let raw = self.ask("Enter new quantity: ")?;
            let Ok(quantity) = raw.parse::<i64>() else {
                self.say("\nQuantity must be a whole number. Please try again.\n")?;
                continue;
            };

            match adjust_quantity(&mut self.inventory, code, quantity) {
                Ok(()) => {
                    info!(%code, quantity, "Stock level set");
                    let name = self.item_name(code);
                    return self.say(&format!("Quantity of {} adjusted to {}.", name, quantity));
                }
                Err(e) => self.report(&e)?,
            }
        }
    }

    fn remove_stocked_item(&mut self) -> AppResult<()> {
        let code = self.ask_stocked_code("Enter Item Code to remove: ")?;
        match self.inventory.remove_item(code) {
            Ok(record) => {
                info!(%code, name = %record.name(), "Item removed");
                self.say(&format!(
                    "Item {} with code {} removed from inventory.",
                    record.name(),
                    code
                ))
            }
            Err(e) => self.report(&e),
        }
    }

    fn change_price(&mut self) -> AppResult<()> {
        let code = self.ask_stocked_code("Enter Item Code to adjust price: ")?;
        let price = self.ask_price("Enter new price: ")?;
        match adjust_price(&mut self.inventory, code, price) {
            Ok(()) => {
                info!(%code, %price, "Price changed");
                let name = self.item_name(code);
                let shown = self.money(price);
                self.say(&format!("Price of {} adjusted to {}.", name, shown))
            }
            Err(e) => self.report(&e),
        }
    }

    fn item_name(&self, code: ItemCode) -> String {
        self.inventory
            .get(code)
            .map(|r| r.name().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{drive, stocked_store};
    use crate::backend::MemoryStore;
    use vend_core::{ItemCode, Money};

    fn code(raw: i64) -> ItemCode {
        ItemCode::new(raw).unwrap()
    }

    const LOGIN: &str = "1\nboss\nsecret\n";

    #[test]
    fn test_wrong_password_is_denied() {
        let (_, transcript) = drive(stocked_store(), "1\nboss\nwrong\n3\n");
        assert!(transcript.contains("Incorrect ID or password. Access denied!"));
        assert!(!transcript.contains("Owner Menu"));
    }

    #[test]
    fn test_owner_loads_new_item() {
        let store = MemoryStore::with_owner("boss", "secret");
        // login, load, add, code 7, name, price, qty, done loading, done
        let script = format!("{LOGIN}1\n1\n7\nben's cookies\n2.50\n12\n2\n4\n3\n");
        let (store, transcript) = drive(store, &script);

        let record = store.inventory.get(code(7)).unwrap();
        assert_eq!(record.name(), "Ben's Cookies");
        assert_eq!(record.price(), Money::from_cents(250));
        assert_eq!(record.quantity(), 12);
        assert!(transcript.contains("12 Ben's Cookies(s) added successfully"));
        // owner Done and main-menu Exit both save
        assert_eq!(store.saves, 2);
    }

    #[test]
    fn test_bad_name_and_duplicate_name_reprompt() {
        let script = format!("{LOGIN}1\n1\n9\n42\nSODA\nTea\n1\n3\n2\n4\n3\n");
        let (store, transcript) = drive(stocked_store(), &script);

        assert!(transcript.contains("Invalid item name"));
        assert!(transcript.contains("An item named Soda already exists with code 2"));
        assert_eq!(store.inventory.get(code(9)).unwrap().name(), "Tea");
    }

    #[test]
    fn test_existing_code_restocks() {
        let script = format!("{LOGIN}1\n1\n2\ny\n4\n2\n4\n3\n");
        let (store, transcript) = drive(stocked_store(), &script);

        assert_eq!(store.inventory.get(code(2)).unwrap().quantity(), 9);
        assert!(transcript.contains("New quantity: 9"));
    }

    #[test]
    fn test_manage_adjust_remove_and_price() {
        // adjust water to 0, remove soda, then price of water to 1.25
        let script = format!("{LOGIN}2\n1\n1\n-3\n0\n2\n2\n3\n1\n1.25\n4\n4\n3\n");
        let (store, transcript) = drive(stocked_store(), &script);

        assert!(transcript.contains("cannot be negative"));
        assert!(transcript.contains("Item Soda with code 2 removed from inventory."));
        assert!(transcript.contains("Price of Water adjusted to $1.25."));

        let water = store.inventory.get(code(1)).unwrap();
        assert_eq!(water.quantity(), 0);
        assert_eq!(water.price(), Money::from_cents(125));
        assert!(!store.inventory.contains(code(2)));
    }

    #[test]
    fn test_manage_unknown_code_reprompts() {
        let script = format!("{LOGIN}2\n2\n99\n1\n4\n4\n3\n");
        let (store, transcript) = drive(stocked_store(), &script);

        assert!(transcript.contains("Item with code 99 not found in inventory."));
        assert!(!store.inventory.contains(code(1)));
    }

    #[test]
    fn test_done_with_empty_machine_does_not_save() {
        let store = MemoryStore::with_owner("boss", "secret");
        let script = format!("{LOGIN}4\n3\n");
        let (store, transcript) = drive(store, &script);

        assert!(transcript.contains("No items added. Returning to main menu."));
        // only the exit save
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn test_display_shows_total_value() {
        let script = format!("{LOGIN}3\n4\n3\n");
        let (_, transcript) = drive(stocked_store(), &script);
        // 10 x 1.00 + 5 x 1.50
        assert!(transcript.contains("Total Inventory Value: $17.50"));
    }
}
