//! The equality/hash kernel entities embed.

use core::cell::Cell;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU64, Ordering};
use std::hash::DefaultHasher;

use crate::id::EntityId;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Identity kernel embedded by every domain entity.
///
/// Two transient identities are equal only when they are the same instance;
/// once at least one side is persisted, equality is identifier equality
/// (and nil never equals a real identifier).
///
/// Hashing is asymmetric on purpose. The first hash computed while
/// transient is cached and returned for the rest of the value's lifetime,
/// surviving persistence, so hash-based containers that saw the entity
/// before its save keep finding it afterwards. A hash first computed after
/// persistence is derived from the identifier and never cached.
///
/// The caveat that follows: a persisted entity hashed while it was
/// transient does not hash like a freshly loaded entity with the same
/// identifier — look-ups must go through the same value that entered the
/// container.
///
/// Carries a `Cell`, so `Identity` is not `Sync`; entities are
/// request-bound (one request, one thread of control).
#[derive(Debug)]
pub struct Identity {
    id: EntityId,
    instance: u64,
    cached_hash: Cell<Option<u64>>,
}

impl Identity {
    /// A fresh transient identity: nil identifier, unique instance token.
    pub fn transient() -> Self {
        Self {
            id: EntityId::nil(),
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            cached_hash: Cell::new(None),
        }
    }

    /// Identity of an entity loaded from the store.
    pub fn persisted(id: EntityId) -> Self {
        debug_assert!(!id.is_nil(), "persisted identity requires a real id");
        Self {
            id,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            cached_hash: Cell::new(None),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_transient(&self) -> bool {
        self.id.is_nil()
    }

    /// Record the identifier assigned on save.
    ///
    /// A hash cached while transient stays in force; see the type docs.
    pub fn mark_persisted(&mut self, id: EntityId) {
        debug_assert!(!id.is_nil(), "persisting requires a real id");
        self.id = id;
    }

    fn hash_value(&self) -> u64 {
        if let Some(cached) = self.cached_hash.get() {
            return cached;
        }

        if self.is_transient() {
            self.cached_hash.set(Some(self.instance));
            self.instance
        } else {
            // Derived from the identifier and deliberately not cached.
            id_hash(&self.id)
        }
    }
}

fn id_hash(id: &EntityId) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        if self.is_transient() && other.is_transient() {
            self.instance == other.instance
        } else {
            self.id == other.id
        }
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl Clone for Identity {
    /// A clone is a distinct instance: a transient clone gets a fresh
    /// token (and is therefore not equal to its source), a persisted clone
    /// keeps the identifier and starts with an empty hash cache.
    fn clone(&self) -> Self {
        if self.is_transient() {
            Self::transient()
        } else {
            Self::persisted(self.id)
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::transient()
    }
}
