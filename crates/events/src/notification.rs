//! Notifications: immutable wrappers announcing a domain change.

use std::any::{Any, TypeId, type_name};

/// Wraps exactly one changed entity value for broadcast.
///
/// The wrapper is consumed once per dispatch call; fan-out duplicates
/// delivery to processors, never the wrapper itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<T> {
    payload: T,
}

impl<T> Notification<T> {
    pub fn new(payload: T) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Type-erased view processors filter on.
///
/// The payload's `TypeId` is the variant tag: subscription look-up is an
/// exact match on it, never a supertype or trait match.
pub trait AnyNotification {
    fn payload_type(&self) -> TypeId;
    fn payload_any(&self) -> &dyn Any;
    fn payload_type_name(&self) -> &'static str;
}

impl<T: 'static> AnyNotification for Notification<T> {
    fn payload_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn payload_any(&self) -> &dyn Any {
        &self.payload
    }

    fn payload_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}
