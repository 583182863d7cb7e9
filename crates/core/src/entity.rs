//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Key the entity is addressed by.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity key.
    fn id(&self) -> &Self::Id;
}
