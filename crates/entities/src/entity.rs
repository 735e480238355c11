//! Entity trait: identity + continuity across state changes.

use crate::id::EntityId;
use crate::identity::Identity;

/// Entity marker + minimal interface.
///
/// Implementors embed an [`Identity`], delegate `PartialEq`/`Hash` to it,
/// and let the store call [`Identity::mark_persisted`] through
/// `identity_mut` when the durable identifier is assigned.
pub trait Entity {
    fn identity(&self) -> &Identity;
    fn identity_mut(&mut self) -> &mut Identity;

    /// The durable identifier (nil while transient).
    fn id(&self) -> EntityId {
        self.identity().id()
    }

    /// True until the entity has been saved.
    fn is_transient(&self) -> bool {
        self.identity().is_transient()
    }
}
