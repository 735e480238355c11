//! `mediate` — request-scoped mediator for commands, queries and
//! notifications.
//!
//! The [`Mediator`] is the surface a request-handling layer talks to: it
//! binds every operation to the request's unit of work and fans
//! notifications out to registered processors. Strategy seams
//! ([`OperationExecutor`], [`Dispatch`]) let test harnesses replace the
//! default paths wholesale.

pub mod mediator;

pub use mediator::Mediator;

pub use mediate_core::{
    Binder, Binding, Command, CommandWithResult, DefaultExecutor, Operation, OperationError,
    OperationExecutor, Query, StubExecutor, UnitOfWork, UowHandle,
};
pub use mediate_events::{
    AnyNotification, DeliveryError, Dispatch, DispatchError, EventDispatcher, HandlerRegistry,
    Notification, Processor, ProcessorEntry, ProcessorModule, RecordingDispatcher, Subscriptions,
};
