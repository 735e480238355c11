//! `mediate-entities` — entity identity across the persistence boundary.
//!
//! Domain entities embed an [`Identity`]: transient until the store assigns
//! a durable [`EntityId`], with equality and hashing rules that keep
//! hash-based container membership valid across the save boundary.

pub mod entity;
pub mod id;
pub mod identity;

pub use entity::Entity;
pub use id::EntityId;
pub use identity::Identity;
