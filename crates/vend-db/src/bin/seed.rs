//! # Seed Data Loader
//!
//! Stocks a database with a demo inventory for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./vend_dev.db (default)
//! cargo run -p vend-db --bin seed
//!
//! # Specify database path, overwrite an existing inventory
//! cargo run -p vend-db --bin seed -- --db ./data/vend.db --force
//! ```

use clap::Parser;
use vend_core::{Inventory, ItemCode, Money};
use vend_db::{Database, DbConfig};

/// Demo stock: (code, name, price in cents, quantity)
const DEMO_ITEMS: &[(i64, &str, i64, i64)] = &[
    (1, "Water", 100, 10),
    (2, "Soda", 150, 5),
    (3, "Orange Juice", 225, 8),
    (4, "Iced Tea", 175, 6),
    (5, "Potato Chips", 125, 12),
    (6, "M&M's Peanut", 130, 9),
    (7, "Granola Bar", 95, 15),
    (8, "Coca-Cola Zero", 160, 7),
];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Load a demo inventory into a vending machine database")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./vend_dev.db", env = "VEND_DB_PATH")]
    db: String,

    /// Replace an inventory that is already stocked
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Vending Machine Seed Loader");
    println!("===========================");
    println!("Database: {}", args.db);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.inventory().count().await?;
    if existing > 0 && !args.force {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed. Pass --force to replace them.");
        return Ok(());
    }

    let inventory = demo_inventory()?;
    db.inventory().save(&inventory).await?;

    println!();
    for (code, record) in &inventory {
        println!(
            "  {:>3}  {:<16} {:>7}  x{}",
            code,
            record.name(),
            record.price().to_string(),
            record.quantity()
        );
    }
    println!();
    println!(
        "✓ Seeded {} items, total value {}",
        inventory.len(),
        inventory.total_value()
    );

    db.close().await;
    Ok(())
}

fn demo_inventory() -> Result<Inventory, vend_core::CoreError> {
    let mut inventory = Inventory::new();
    for &(code, name, cents, quantity) in DEMO_ITEMS {
        inventory.add_item(ItemCode::new(code)?, name, Money::from_cents(cents), quantity)?;
    }
    Ok(inventory)
}
