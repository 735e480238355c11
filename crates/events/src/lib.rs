//! `mediate-events` — typed notification fan-out over a shared unit of work.
//!
//! A [`Notification`] wraps one changed entity value. The
//! [`EventDispatcher`] resolves the [`HandlerRegistry`], instantiates one
//! fresh [`Processor`] per registered type, binds the dispatching request's
//! unit of work, and delivers. Processors filter by exact payload type
//! through their [`Subscriptions`] table.

pub mod dispatcher;
pub mod error;
pub mod notification;
pub mod processor;
pub mod registry;

pub use dispatcher::{Dispatch, EventDispatcher, RecordingDispatcher};
pub use error::{DeliveryError, DispatchError};
pub use notification::{AnyNotification, Notification};
pub use processor::{Processor, Subscriptions};
pub use registry::{HandlerRegistry, ProcessorEntry, ProcessorModule};
