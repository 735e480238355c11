//! Fan-out of notifications to every registered processor.

use std::cell::RefCell;
use std::sync::Arc;

use mediate_core::UowHandle;

use crate::error::DispatchError;
use crate::notification::AnyNotification;
use crate::registry::HandlerRegistry;

/// Dispatch capability the mediator depends on.
///
/// Production is [`EventDispatcher`]; test harnesses substitute a
/// [`RecordingDispatcher`] to capture raises without touching a registry.
pub trait Dispatch<U> {
    fn dispatch(
        &self,
        notification: &dyn AnyNotification,
        uow: &UowHandle<U>,
    ) -> Result<(), DispatchError>;
}

/// Production dispatcher over a shared [`HandlerRegistry`].
///
/// For every resolved entry, in registry order: instantiate a fresh
/// processor, bind the dispatch's unit of work, deliver. An empty registry
/// makes the dispatch a no-op.
///
/// Failure policy: dispatch never short-circuits. Every processor receives
/// the notification even when an earlier one failed, and the failures come
/// back aggregated in one [`DispatchError`], in dispatch order.
pub struct EventDispatcher<U> {
    registry: Arc<HandlerRegistry<U>>,
}

impl<U> EventDispatcher<U> {
    pub fn new(registry: Arc<HandlerRegistry<U>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry<U>> {
        &self.registry
    }
}

impl<U> Dispatch<U> for EventDispatcher<U> {
    fn dispatch(
        &self,
        notification: &dyn AnyNotification,
        uow: &UowHandle<U>,
    ) -> Result<(), DispatchError> {
        let mut failures = Vec::new();

        for entry in self.registry.resolve() {
            tracing::debug!(
                processor = entry.name(),
                payload = notification.payload_type_name(),
                "delivering notification"
            );

            let mut processor = entry.instantiate();
            processor.bind(uow.clone());

            if let Err(err) = processor.deliver(notification) {
                tracing::debug!(processor = entry.name(), %err, "processor delivery failed");
                failures.push((entry.name(), err));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }
}

/// Test double that records raised payload type names instead of
/// dispatching.
#[derive(Default)]
pub struct RecordingDispatcher {
    raised: RefCell<Vec<&'static str>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload type names of every raise, in order.
    pub fn raised(&self) -> Vec<&'static str> {
        self.raised.borrow().clone()
    }
}

impl<U> Dispatch<U> for RecordingDispatcher {
    fn dispatch(
        &self,
        notification: &dyn AnyNotification,
        _uow: &UowHandle<U>,
    ) -> Result<(), DispatchError> {
        self.raised.borrow_mut().push(notification.payload_type_name());
        Ok(())
    }
}
