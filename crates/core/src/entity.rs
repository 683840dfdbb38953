//! Entity trait: identity + continuity across state changes.
//!
//! Products, variations and orders are entities: a variation whose quantity
//! just changed is still the same variation.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
