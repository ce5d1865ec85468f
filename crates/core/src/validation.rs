//! Input validation shared by every ledger mutation.
//!
//! Both `add` and `remove` go through the same checks:
//!
//! - the item name is text and not empty
//! - the quantity is an integer and strictly positive
//!
//! Typed callers use [`validate_item_name`] and [`validate_quantity`].
//! Untyped callers (JSON payloads, scripted input) use
//! [`validate_stock_input`], which additionally checks the value kinds.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::item::ItemName;

/// A validated (item, quantity) pair, ready to apply to a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockInput {
    pub item: ItemName,
    pub qty: i64,
}

/// Validates an item name.
///
/// ```rust
/// use stockledger_core::validate_item_name;
///
/// assert!(validate_item_name("apple").is_ok());
/// assert!(validate_item_name("").is_err());
/// ```
pub fn validate_item_name(item: &str) -> DomainResult<ItemName> {
    ItemName::parse(item)
}

/// Validates a quantity moved in or out of stock. Zero and negatives are rejected.
pub fn validate_quantity(qty: i64) -> DomainResult<i64> {
    if qty <= 0 {
        return Err(DomainError::validation(format!(
            "quantity must be positive, got {qty}"
        )));
    }
    Ok(qty)
}

/// Validates loosely-typed input: `item` must be a JSON string and `qty` a
/// JSON integer that fits in `i64`.
pub fn validate_stock_input(item: &Value, qty: &Value) -> DomainResult<StockInput> {
    let (Some(name), Some(amount)) = (item.as_str(), qty.as_i64()) else {
        return Err(DomainError::validation(format!(
            "invalid input types: item={item}, qty={qty}"
        )));
    };

    Ok(StockInput {
        item: validate_item_name(name)?,
        qty: validate_quantity(amount)?,
    })
}
