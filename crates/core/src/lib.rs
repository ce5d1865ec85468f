//! `stockledger-core` — domain building blocks for the stock ledger.
//!
//! This crate contains **pure domain** primitives (no file access, no logging
//! setup): the error model, the item name value object and the input
//! validation shared by every ledger mutation.

pub mod error;
pub mod item;
pub mod validation;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use item::ItemName;
pub use validation::{StockInput, validate_item_name, validate_quantity, validate_stock_input};
pub use value_object::ValueObject;
