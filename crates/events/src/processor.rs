//! Processors: per-dispatch handlers reacting to typed notifications.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use mediate_core::UowHandle;

use crate::error::DeliveryError;
use crate::notification::AnyNotification;

/// A reactive handler instantiated fresh for every dispatch.
///
/// The dispatcher creates an instance through the registry's factory, binds
/// the dispatching request's unit of work, then delivers the notification.
/// Instances are never reused or cached across dispatches.
pub trait Processor<U> {
    /// Attach the dispatching request's unit of work.
    fn bind(&mut self, uow: UowHandle<U>);

    /// Deliver one notification, invoking every matching reaction
    /// synchronously before returning.
    fn deliver(&mut self, notification: &dyn AnyNotification) -> Result<(), DeliveryError>;
}

type Reaction<U> = Box<dyn Fn(&UowHandle<U>, &dyn Any) -> Result<(), DeliveryError>>;

/// Reaction table a processor embeds and populates at construction.
///
/// Keyed by payload type tag for O(1) exact-match look-up. Reactions for
/// one payload type run in registration order on the delivering thread;
/// reactions never observe or affect each other.
pub struct Subscriptions<U> {
    uow: Option<UowHandle<U>>,
    reactions: HashMap<TypeId, Vec<Reaction<U>>>,
}

impl<U> Default for Subscriptions<U> {
    fn default() -> Self {
        Self {
            uow: None,
            reactions: HashMap::new(),
        }
    }
}

impl<U> Subscriptions<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reaction for payload type `T`.
    pub fn on<T, F>(&mut self, reaction: F)
    where
        T: 'static,
        F: Fn(&UowHandle<U>, &T) -> Result<(), DeliveryError> + 'static,
    {
        self.reactions.entry(TypeId::of::<T>()).or_default().push(Box::new(
            move |uow, payload| match payload.downcast_ref::<T>() {
                Some(payload) => reaction(uow, payload),
                // The table is keyed by TypeId, so this arm is unreachable.
                None => Ok(()),
            },
        ));
    }

    /// Attach the unit of work reactions will run against.
    pub fn bind(&mut self, uow: UowHandle<U>) {
        self.uow = Some(uow);
    }

    pub fn is_bound(&self) -> bool {
        self.uow.is_some()
    }

    /// Invoke every reaction registered for the notification's exact
    /// payload type. A notification with no matching reactions is a no-op.
    ///
    /// Within one delivery, a failing reaction aborts the reactions
    /// remaining after it. Isolation exists between processors, not
    /// between one processor's reactions; see
    /// [`EventDispatcher`](crate::dispatcher::EventDispatcher) for the
    /// cross-processor policy.
    pub fn deliver(&self, notification: &dyn AnyNotification) -> Result<(), DeliveryError> {
        let uow = self.uow.as_ref().ok_or(DeliveryError::Unbound)?;

        if let Some(reactions) = self.reactions.get(&notification.payload_type()) {
            for reaction in reactions {
                reaction(uow, notification.payload_any())?;
            }
        }

        Ok(())
    }
}
