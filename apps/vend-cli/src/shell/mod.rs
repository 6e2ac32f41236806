//! # Menu Shell
//!
//! The interactive front end. It parses text into codes, quantities and
//! prices, hands them to vend-core, and renders the outcome. It never
//! touches stock or cart state directly.
//!
//! ## Menu Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start ──► load snapshot ──► welcome / first-time owner setup          │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │            ┌──────────── Main menu ─────────────┐                       │
//! │            │ 1.Owner      2.User       3.Exit   │                       │
//! │            └──┬─────────────┬────────────┬──────┘                       │
//! │               ▼             ▼            ▼                              │
//! │         login ──► owner   customer     save + quit                      │
//! │         menu (owner.rs)   session                                       │
//! │                           (customer.rs)                                 │
//! │                              │ walked away ──► save + quit              │
//! │                              │ purchased   ──► back to main menu        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Closing stdin at any prompt behaves like choosing Exit.
//!
//! The shell is generic over its input, output and store so tests can drive
//! it with scripted text and an in-memory store.

mod customer;
mod owner;

use std::io::{BufRead, Write};
use tracing::{debug, info, warn};
use vend_core::validation::{parse_item_code, parse_positive_integer, parse_price, parse_yes_no};
use vend_core::{CoreError, Inventory, ItemCode, Money};

use crate::backend::MachineStore;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render;

use customer::Visit;

const EMPTY_MACHINE: &str = "\n   ~~~~ Your vending machine is empty. Please add items first. ~~~~";

/// Display settings the shell needs from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub machine_name: String,
    pub currency_symbol: String,
}

impl From<&AppConfig> for ShellSettings {
    fn from(config: &AppConfig) -> Self {
        ShellSettings {
            machine_name: config.machine.name.clone(),
            currency_symbol: config.display.currency_symbol.clone(),
        }
    }
}

pub struct Shell<R, W, S> {
    input: R,
    out: W,
    store: S,
    inventory: Inventory,
    settings: ShellSettings,
}

impl<R, W, S> Shell<R, W, S>
where
    R: BufRead,
    W: Write,
    S: MachineStore,
{
    pub fn new(input: R, out: W, store: S, settings: ShellSettings) -> Self {
        Shell {
            input,
            out,
            store,
            inventory: Inventory::new(),
            settings,
        }
    }

    /// Runs until the user exits, walks away after browsing, or input ends.
    pub fn run(&mut self) -> AppResult<()> {
        self.inventory = self.store.load_inventory()?;
        info!(items = self.inventory.len(), "Inventory loaded");

        match self.main_loop() {
            Err(AppError::EndOfInput) => {
                info!("Input closed, saving and exiting");
                self.save_inventory()
            }
            other => other,
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn main_loop(&mut self) -> AppResult<()> {
        self.greet_or_register()?;

        loop {
            self.say("\nChoose one among the following\n1.Owner (To manage)\n2.User (To purchase)\n3.Exit")?;
            match self.ask_menu("Enter your choice (1/2/3): ", 3)? {
                1 => {
                    let outcome = self.owner_entry();
                    self.recover(outcome)?;
                }
                2 => {
                    if self.inventory.is_empty() {
                        self.say(
                            "\nWe're sorry for the inconvenience, but the vending machine is currently empty. \
                             Please check back later or contact the owner to add items.",
                        )?;
                        continue;
                    }
                    self.display_items()?;
                    let outcome = self.customer_visit();
                    if let Some(Visit::WalkedAway) = self.recover(outcome)? {
                        self.save_inventory()?;
                        self.say("\nThank you for visiting. Goodbye!")?;
                        return Ok(());
                    }
                }
                _ => {
                    self.save_inventory()?;
                    self.say("Goodbye!")?;
                    return Ok(());
                }
            }
        }
    }

    fn greet_or_register(&mut self) -> AppResult<()> {
        let banner = format!("\n~~~~~ {} ~~~~~", self.settings.machine_name);
        self.say(&banner)?;

        if self.store.has_owner()? {
            return self.say("Welcome back!");
        }

        self.say("Welcome")?;
        self.say("\nIt looks like you're setting up for the first time.")?;
        let owner_id = self.ask_non_empty("Enter your new Owner ID: ")?;
        let password = self.ask_non_empty("Enter your new password: ")?;
        self.store.register_owner(&owner_id, &password)?;
        self.say("\nCredentials set up successfully!")
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    fn save_inventory(&mut self) -> AppResult<()> {
        self.store.save_inventory(&self.inventory)?;
        self.say("\nInventory saved successfully.")
    }

    fn display_items(&mut self) -> AppResult<()> {
        if self.inventory.is_empty() {
            return self.say(EMPTY_MACHINE);
        }
        let table = render::inventory_table(&self.inventory, &self.settings.currency_symbol);
        self.say("\n           ~~~~~~~~~~~~~ Available Items ~~~~~~~~~~~~~")?;
        self.say(table.trim_end())
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with(&self.settings.currency_symbol)
    }

    /// Shows a recoverable error that escaped a sub-menu; the caller goes
    /// back to the main menu. Anything else ends the run.
    fn recover<T>(&mut self, outcome: AppResult<T>) -> AppResult<Option<T>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Sub-menu aborted");
                self.say(&format!("\n{}\n", e))?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn report(&mut self, err: &CoreError) -> AppResult<()> {
        debug!(kind = ?err.kind(), error = %err, "Request rejected");
        self.say(&format!("\n{}\n", err))
    }

    // =========================================================================
    // Terminal I/O
    // =========================================================================

    fn say(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    /// Prompts and reads one trimmed line.
    fn ask(&mut self, prompt: &str) -> AppResult<String> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Err(AppError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    fn ask_non_empty(&mut self, prompt: &str) -> AppResult<String> {
        loop {
            let answer = self.ask(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say("\nThis value cannot be empty. Please try again.\n")?;
        }
    }

    /// Reads a choice in `1..=options`.
    fn ask_menu(&mut self, prompt: &str, options: u32) -> AppResult<u32> {
        loop {
            let answer = self.ask(prompt)?;
            if let Ok(choice) = answer.parse::<u32>() {
                if (1..=options).contains(&choice) {
                    return Ok(choice);
                }
            }
            let valid: Vec<String> = (1..=options).map(|n| n.to_string()).collect();
            self.say(&format!("\nInvalid choice. Please enter ({}).", valid.join("/")))?;
        }
    }

    fn ask_positive(&mut self, prompt: &str) -> AppResult<i64> {
        loop {
            let answer = self.ask(prompt)?;
            match parse_positive_integer(&answer) {
                Ok(value) => return Ok(value),
                Err(_) => self.say("\nInput must be a positive integer. Please try again.\n")?,
            }
        }
    }

    fn ask_item_code(&mut self, prompt: &str) -> AppResult<ItemCode> {
        loop {
            let answer = self.ask(prompt)?;
            match parse_item_code(&answer) {
                Ok(code) => return Ok(code),
                Err(_) => self.say("\nItem code must be a positive integer. Please try again.\n")?,
            }
        }
    }

    fn ask_price(&mut self, prompt: &str) -> AppResult<Money> {
        loop {
            let answer = self.ask(prompt)?;
            match parse_price(&answer) {
                Ok(price) => return Ok(price),
                Err(e) => self.say(&format!(
                    "\nPrice must be a positive number with at most two decimals ({}). Please try again.\n",
                    e
                ))?,
            }
        }
    }

    fn ask_yes_no(&mut self, prompt: &str) -> AppResult<bool> {
        loop {
            let answer = self.ask(prompt)?;
            match parse_yes_no(&answer) {
                Some(yes) => return Ok(yes),
                None => self.say("\nInvalid input. Please enter 'y' or 'n'.\n")?,
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use vend_core::ItemCode;

    fn settings() -> ShellSettings {
        ShellSettings {
            machine_name: "Test Machine".to_string(),
            currency_symbol: "$".to_string(),
        }
    }

    fn code(raw: i64) -> ItemCode {
        ItemCode::new(raw).unwrap()
    }

    /// A store with an owner and the usual two items.
    pub(super) fn stocked_store() -> MemoryStore {
        let mut store = MemoryStore::with_owner("boss", "secret");
        store
            .inventory
            .add_item(code(1), "Water", Money::from_cents(100), 10)
            .unwrap();
        store
            .inventory
            .add_item(code(2), "Soda", Money::from_cents(150), 5)
            .unwrap();
        store
    }

    /// Runs a scripted session and returns (store, transcript).
    pub(super) fn drive(store: MemoryStore, script: &str) -> (MemoryStore, String) {
        let mut out = Vec::new();
        let mut shell = Shell::new(script.as_bytes(), &mut out, store, settings());
        shell.run().unwrap();
        let store = shell.into_store();
        (store, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_recover_reports_core_errors_only() {
        let mut out = Vec::new();
        let mut shell = Shell::new("".as_bytes(), &mut out, stocked_store(), settings());

        let shown = shell.recover::<()>(Err(CoreError::EmptyCart.into())).unwrap();
        assert!(shown.is_none());
        assert_eq!(shell.recover(Ok(7)).unwrap(), Some(7));
        assert!(matches!(
            shell.recover::<()>(Err(AppError::EndOfInput)),
            Err(AppError::EndOfInput)
        ));

        drop(shell);
        assert!(String::from_utf8(out).unwrap().contains("Cart is empty"));
    }

    #[test]
    fn test_first_run_registers_owner() {
        let (store, transcript) = drive(MemoryStore::default(), "\nboss\nsecret\n3\n");

        assert!(transcript.contains("setting up for the first time"));
        assert!(transcript.contains("This value cannot be empty"));
        assert_eq!(store.owner, Some(("boss".to_string(), "secret".to_string())));
        assert_eq!(store.saves, 1);
    }

    #[test]
    fn test_returning_owner_is_welcomed() {
        let (_, transcript) = drive(stocked_store(), "3\n");
        assert!(transcript.contains("Welcome back!"));
        assert!(transcript.contains("Test Machine"));
    }

    #[test]
    fn test_invalid_main_menu_choice_reprompts() {
        let (_, transcript) = drive(stocked_store(), "9\nabc\n3\n");
        assert_eq!(transcript.matches("Invalid choice. Please enter (1/2/3).").count(), 2);
    }

    #[test]
    fn test_end_of_input_saves() {
        let (store, transcript) = drive(stocked_store(), "1\n");
        assert_eq!(store.saves, 1);
        assert!(transcript.contains("Inventory saved successfully."));
    }

    #[test]
    fn test_customer_on_empty_machine_gets_apology() {
        let store = MemoryStore::with_owner("boss", "secret");
        let (_, transcript) = drive(store, "2\n3\n");
        assert!(transcript.contains("currently empty"));
    }
}
