//! Value object trait: equality by value, not identity.
//!
//! Ledger keys and inputs are value objects: an item called `"apple"` is the
//! same item wherever that name appears, so there is no separate identifier.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "change" one,
/// build a new one.
///
/// ```ignore
/// let a = ItemName::parse("apple")?;
/// let b = ItemName::parse("apple")?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
