use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record that can be kept in a [`Repository`](crate::Repository).
///
/// Identity assignment belongs to the store: an entity that has never been
/// saved reports `None` from [`Entity::id`] and receives the next value of
/// the store's sequence on its first save. Entities keyed by another
/// entity's id (inventory records keyed by product) always report `Some`.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The identifier type for this entity.
    type Id: Copy + Ord + Hash + Debug + Display + Send + Sync + From<u64> + Into<u64>;

    /// Returns the entity type name (e.g., "Order", "Product").
    fn entity_type() -> &'static str;

    /// Returns the identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;

    /// Assigns the identifier. Called by the store on first save.
    fn set_id(&mut self, id: Self::Id);
}
