//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined
//! entirely by their attribute values. Two value objects with the same values are
//! considered equal. A `DeliveryAddress` is the canonical example in this domain:
//! two orders shipped to the same address hold equal, independent copies.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// create a new one with the new values.
///
/// The trait requires:
/// - **Clone**: value objects are values, not references
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: debuggable (helpful for logging, testing)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
