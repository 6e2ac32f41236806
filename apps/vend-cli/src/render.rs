//! # Rendering
//!
//! Box-drawn grid tables for the inventory, the cart, the bill preview and
//! the receipt. Everything returns a `String`; the shell decides where it goes.
//!
//! ```text
//! ╒═════════════╤═════════════╤═════════╤════════════╕
//! │ Item Code   │ Item Name   │ Price   │ Quantity   │
//! ╞═════════════╪═════════════╪═════════╪════════════╡
//! │ 1           │ Water       │ $1.00   │ 10         │
//! ├─────────────┼─────────────┼─────────┼────────────┤
//! │ 2           │ Soda        │ $1.50   │ 5          │
//! ╘═════════════╧═════════════╧═════════╧════════════╛
//! ```

use vend_core::{Cart, Inventory, Money, Receipt};

const ITEM_HEADERS: [&str; 4] = ["Item Code", "Item Name", "Price", "Quantity"];
const TOTAL_HEADER: &str = "Total";

/// A simple grid table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().take(columns).enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        out.push_str(&border(&widths, '╒', '═', '╤', '╕'));
        out.push_str(&line(&self.headers, &widths));
        out.push_str(&border(&widths, '╞', '═', '╪', '╡'));
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push_str(&border(&widths, '├', '─', '┼', '┤'));
            }
            out.push_str(&line(row, &widths));
        }
        out.push_str(&border(&widths, '╘', '═', '╧', '╛'));
        out
    }
}

fn border(widths: &[usize], left: char, fill: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .collect();
    format!("{}{}{}\n", left, segments.join(&join.to_string()), right)
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!(" {}{} ", cell, " ".repeat(w - cell.chars().count()))
        })
        .collect();
    format!("│{}│\n", padded.join("│"))
}

// =============================================================================
// Domain tables
// =============================================================================

pub fn inventory_table(inventory: &Inventory, symbol: &str) -> String {
    let mut table = Table::new(ITEM_HEADERS);
    for (code, record) in inventory {
        table.push_row(vec![
            code.to_string(),
            record.name().to_string(),
            record.price().format_with(symbol),
            record.quantity().to_string(),
        ]);
    }
    table.render()
}

/// Cart lines; `with_totals` adds a per-line total column (bill preview).
pub fn cart_table(cart: &Cart, symbol: &str, with_totals: bool) -> String {
    let mut headers: Vec<&str> = ITEM_HEADERS.to_vec();
    if with_totals {
        headers.push(TOTAL_HEADER);
    }
    let mut table = Table::new(headers);
    for (code, entry) in cart {
        let mut row = vec![
            code.to_string(),
            entry.name().to_string(),
            entry.price().format_with(symbol),
            entry.quantity().to_string(),
        ];
        if with_totals {
            row.push(entry.line_total().format_with(symbol));
        }
        table.push_row(row);
    }
    table.render()
}

pub fn total_line(label: &str, total: Money, symbol: &str) -> String {
    format!("{}: {}", label, total.format_with(symbol))
}

/// The printed bill for a finished purchase.
pub fn receipt(receipt: &Receipt, timestamp: &str, symbol: &str) -> String {
    let mut table = Table::new(ITEM_HEADERS.iter().copied().chain([TOTAL_HEADER]));
    for line in &receipt.lines {
        table.push_row(vec![
            line.code.to_string(),
            line.name.clone(),
            line.unit_price.format_with(symbol),
            line.quantity.to_string(),
            line.line_total.format_with(symbol),
        ]);
    }

    let mut out = String::new();
    out.push_str("\n   ~~~~~ Generating Bill ~~~~~\n");
    out.push_str(&format!("Transaction ID: {}\n", receipt.transaction_id));
    out.push_str(&format!("Date & Time: {}\n\n", timestamp));
    out.push_str(&table.render());
    out.push_str(&format!(
        "\n{}\n\n",
        total_line("Total Price", receipt.total, symbol)
    ));
    out.push_str("   ~~~~~ Thank You, Visit Us Again ~~~~~\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vend_core::{add_to_cart, checkout, ItemCode};

    fn stocked() -> Inventory {
        let mut inventory = Inventory::new();
        inventory
            .add_item(ItemCode::new(1).unwrap(), "Water", Money::from_cents(100), 10)
            .unwrap();
        inventory
            .add_item(ItemCode::new(2).unwrap(), "Soda", Money::from_cents(150), 5)
            .unwrap();
        inventory
    }

    #[test]
    fn test_table_layout() {
        let mut table = Table::new(["A", "Bee"]);
        table.push_row(vec!["long".to_string(), "x".to_string()]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "╒══════╤═════╕");
        assert_eq!(lines[1], "│ A    │ Bee │");
        assert_eq!(lines[2], "╞══════╪═════╡");
        assert_eq!(lines[3], "│ long │ x   │");
        assert_eq!(lines[4], "╘══════╧═════╛");
    }

    #[test]
    fn test_inventory_table_uses_symbol() {
        let rendered = inventory_table(&stocked(), "€");
        assert!(rendered.contains("Item Name"));
        assert!(rendered.contains("€1.50"));
        assert!(rendered.contains("Soda"));
    }

    #[test]
    fn test_receipt() {
        let mut inventory = stocked();
        let mut cart = Cart::new();
        add_to_cart(&mut cart, &inventory, ItemCode::new(2).unwrap(), 2).unwrap();
        let preview = cart_table(&cart, "$", true);
        assert!(preview.contains("$3.00"));

        let receipt_data = checkout(&mut cart, &mut inventory).unwrap();
        let printed = receipt(&receipt_data, "2024-01-01 10:00:00", "$");

        assert!(printed.contains(&format!("Transaction ID: {}", receipt_data.transaction_id)));
        assert!(printed.contains("Date & Time: 2024-01-01 10:00:00"));
        assert!(printed.contains("Total Price: $3.00"));
    }
}
