//! `mediate-core` — command/query execution bound to a request's unit of work.
//!
//! One [`UowHandle`] is created per request and shared by every operation the
//! request runs. A [`Binder`] attaches that handle to each command or query
//! and invokes it through a pluggable [`OperationExecutor`]: the production
//! strategy binds then executes, and test harnesses swap in a
//! [`StubExecutor`] to substitute synthetic results without a real unit of
//! work.

pub mod binder;
pub mod command;
pub mod error;
pub mod executor;
pub mod operation;
pub mod query;
pub mod stub;
pub mod uow;

pub use binder::Binder;
pub use command::{Command, CommandWithResult};
pub use error::OperationError;
pub use executor::{DefaultExecutor, OperationExecutor};
pub use operation::{Binding, Operation};
pub use query::Query;
pub use stub::StubExecutor;
pub use uow::{UnitOfWork, UowHandle};
