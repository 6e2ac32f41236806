//! # Validation Module
//!
//! Input validation utilities for the vending machine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (vend-cli)                                             │
//! │  ├── Parse text into numbers / money (parse_* functions below)         │
//! │  └── Re-prompt the user on failure                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Core operations                                              │
//! │  ├── Re-check sign and range (validate_* functions below)              │
//! │  └── Check existence and stock against Inventory / Cart                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite CHECK / UNIQUE constraints)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vend_core::validation::{parse_positive_integer, parse_price, title_case};
//!
//! assert_eq!(parse_positive_integer("42").unwrap(), 42);
//! assert_eq!(parse_price("1.5").unwrap().cents(), 150);
//! assert_eq!(title_case("coca-cola zero"), "Coca-Cola Zero");
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ItemCode;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty or blank
/// - Only letters, digits, spaces, hyphens (-), apostrophes (') and ampersands (&)
/// - Must contain at least one letter
///
/// ## Example
/// ```rust
/// use vend_core::validation::validate_item_name;
///
/// assert!(validate_item_name("M&M's Peanut").is_ok());
/// assert!(validate_item_name("7-Up").is_ok());
/// assert!(validate_item_name("42").is_err());
/// assert!(validate_item_name("Soda!").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '\'' | '&'))
    {
        return Err(ValidationError::invalid_format(
            "name",
            "may only contain letters, numbers, spaces, hyphens (-), apostrophes (') and ampersands (&)",
        ));
    }

    if !name.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid_format(
            "name",
            "must contain at least one letter",
        ));
    }

    Ok(())
}

/// Normalizes a raw name the way it is stored: trimmed, each word capitalized.
///
/// Words are split on spaces, hyphens and ampersands; the letter after an
/// apostrophe stays lowercase ("ben's" → "Ben's").
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = matches!(c, ' ' | '-' | '&') || c.is_whitespace();
        }
    }

    out
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity (cart lines, restocking).
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

/// Validates a stock level set by the owner.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (held at zero while editing)
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::must_not_be_negative("quantity"));
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be positive (> 0). Free items are not vendable.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }

    Ok(())
}

// =============================================================================
// Text Parsers
// =============================================================================

/// Parses a strictly positive integer from user input.
///
/// ## Example
/// ```rust
/// use vend_core::validation::parse_positive_integer;
///
/// assert_eq!(parse_positive_integer(" 7 ").unwrap(), 7);
/// assert!(parse_positive_integer("0").is_err());
/// assert!(parse_positive_integer("3.14").is_err());
/// ```
pub fn parse_positive_integer(input: &str) -> ValidationResult<i64> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_format("value", "must be a whole number"))?;

    if value <= 0 {
        return Err(ValidationError::must_be_positive("value"));
    }

    Ok(value)
}

/// Parses an item code from user input.
pub fn parse_item_code(input: &str) -> ValidationResult<ItemCode> {
    let raw = parse_positive_integer(input).map_err(|e| match e {
        ValidationError::MustBePositive { .. } => ValidationError::must_be_positive("item code"),
        _ => ValidationError::invalid_format("item code", "must be a positive whole number"),
    })?;
    ItemCode::new(raw)
}

/// Parses a positive decimal price (at most two fractional digits) into cents.
///
/// ## Example
/// ```rust
/// use vend_core::validation::parse_price;
///
/// assert_eq!(parse_price("2").unwrap().cents(), 200);
/// assert_eq!(parse_price("2.5").unwrap().cents(), 250);
/// assert_eq!(parse_price(".75").unwrap().cents(), 75);
/// assert!(parse_price("0").is_err());
/// assert!(parse_price("1.999").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    let trimmed = input.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, frac) = body.split_once('.').unwrap_or((body, ""));

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(ValidationError::invalid_format("price", "must be a number"));
    }
    if frac.len() > 2 {
        return Err(ValidationError::invalid_format(
            "price",
            "at most two decimal places",
        ));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ValidationError::invalid_format("price", "too large"))?
    };
    let minor: i64 = format!("{:0<2}", frac).parse().unwrap_or(0);

    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(minor))
        .ok_or_else(|| ValidationError::invalid_format("price", "too large"))?;

    if negative || cents == 0 {
        return Err(ValidationError::must_be_positive("price"));
    }

    Ok(Money::from_cents(cents))
}

/// Interprets a yes/no answer. Returns `None` for anything else.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
