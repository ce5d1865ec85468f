use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::{error, info, warn};

use stockledger_core::{
    DomainError, DomainResult, ItemName, StockInput, validate_item_name, validate_quantity,
    validate_stock_input,
};

/// Threshold used by [`Ledger::low_stock_default`].
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Caller-owned audit trail of additions, one human-readable line per `add`.
///
/// Separate from the operational log; the ledger only ever appends to it.
pub type AuditLog = Vec<String>;

/// What a successful `remove` left behind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Removal {
    /// The item is still stocked with this many units.
    Remaining(i64),
    /// The quantity reached zero or below and the entry was dropped.
    Depleted,
}

/// In-memory stock ledger: item name to quantity.
///
/// Invariant: every stored quantity is strictly positive. An entry that would
/// drop to zero or below is removed instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    stock: BTreeMap<ItemName, i64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` units of `item`, creating the entry if needed.
    ///
    /// On success returns the new quantity and, if `audit` is given, appends a
    /// timestamped line to it. Invalid input is logged as a warning and leaves
    /// the ledger untouched.
    pub fn add(&mut self, item: &str, qty: i64, audit: Option<&mut AuditLog>) -> DomainResult<i64> {
        let input = checked("add", validate_typed(item, qty))?;
        self.apply_add(input, audit)
    }

    /// Like [`Ledger::add`], for loosely-typed input whose kinds are not yet known.
    pub fn add_value(
        &mut self,
        item: &Value,
        qty: &Value,
        audit: Option<&mut AuditLog>,
    ) -> DomainResult<i64> {
        let input = checked("add", validate_stock_input(item, qty))?;
        self.apply_add(input, audit)
    }

    /// Take `qty` units of `item` out of stock.
    ///
    /// Removing at least the stored quantity drops the entry entirely. An item
    /// that is not stocked yields [`DomainError::NotFound`] and no mutation.
    pub fn remove(&mut self, item: &str, qty: i64) -> DomainResult<Removal> {
        let input = checked("remove", validate_typed(item, qty))?;
        self.apply_remove(input)
    }

    /// Like [`Ledger::remove`], for loosely-typed input.
    pub fn remove_value(&mut self, item: &Value, qty: &Value) -> DomainResult<Removal> {
        let input = checked("remove", validate_stock_input(item, qty))?;
        self.apply_remove(input)
    }

    /// Stored quantity of `item`, or 0 when absent.
    pub fn quantity(&self, item: &str) -> i64 {
        self.stock.get(item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.stock.contains_key(item)
    }

    /// Items whose quantity is strictly below `threshold`, ordered by name.
    pub fn low_stock(&self, threshold: i64) -> Vec<String> {
        self.stock
            .iter()
            .filter(|(_, qty)| **qty < threshold)
            .map(|(item, _)| item.to_string())
            .collect()
    }

    pub fn low_stock_default(&self) -> Vec<String> {
        self.low_stock(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemName, i64)> {
        self.stock.iter().map(|(item, qty)| (item, *qty))
    }

    pub fn entries(&self) -> &BTreeMap<ItemName, i64> {
        &self.stock
    }

    /// Sum of all stored quantities (saturating).
    pub fn total_units(&self) -> i64 {
        self.stock.values().fold(0i64, |acc, qty| acc.saturating_add(*qty))
    }

    pub fn clear(&mut self) {
        self.stock.clear();
    }

    /// Replace the whole ledger. Non-positive quantities are not stored.
    pub(crate) fn replace_all(&mut self, entries: BTreeMap<ItemName, i64>) {
        self.stock = entries;
        self.stock.retain(|_, qty| *qty > 0);
    }

    fn apply_add(&mut self, input: StockInput, audit: Option<&mut AuditLog>) -> DomainResult<i64> {
        let StockInput { item, qty } = input;
        let current = self.quantity(item.as_str());
        let Some(updated) = current.checked_add(qty) else {
            error!("Unexpected error while adding item: {} + {} overflows for {}", current, qty, item);
            return Err(DomainError::invariant(format!("quantity overflow for {item}")));
        };

        if let Some(audit) = audit {
            audit.push(audit_line(Local::now(), qty, &item));
        }
        info!("Added {} of {}", qty, item);
        self.stock.insert(item, updated);
        Ok(updated)
    }

    fn apply_remove(&mut self, input: StockInput) -> DomainResult<Removal> {
        let StockInput { item, qty } = input;
        let Some(current) = self.stock.get_mut(item.as_str()) else {
            error!("Attempted to remove non-existent item: {}", item);
            return Err(DomainError::not_found(item.into_inner()));
        };

        // Both sides are positive, so this cannot overflow.
        let remaining = *current - qty;
        let outcome = if remaining <= 0 {
            self.stock.remove(item.as_str());
            Removal::Depleted
        } else {
            *current = remaining;
            Removal::Remaining(remaining)
        };
        info!("Removed {} of {}", qty, item);
        Ok(outcome)
    }
}

fn validate_typed(item: &str, qty: i64) -> DomainResult<StockInput> {
    Ok(StockInput {
        item: validate_item_name(item)?,
        qty: validate_quantity(qty)?,
    })
}

/// Log rejected input at WARNING and hand the result back unchanged.
fn checked(op: &str, input: DomainResult<StockInput>) -> DomainResult<StockInput> {
    if let Err(e) = &input {
        warn!("Invalid input for {}: {}", op, e);
    }
    input
}

fn audit_line(at: DateTime<Local>, qty: i64, item: &ItemName) -> String {
    format!("{}: Added {} of {}", at.format("%Y-%m-%d %H:%M:%S%.6f"), qty, item)
}
