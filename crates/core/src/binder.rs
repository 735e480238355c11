//! The operation binder: attaches the request's unit of work to commands
//! and queries and runs them through the configured execution strategy.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use crate::command::{Command, CommandWithResult};
use crate::error::OperationError;
use crate::executor::{DefaultExecutor, OperationExecutor};
use crate::query::Query;
use crate::uow::UowHandle;

/// Binds operations to one request's unit of work and executes them.
///
/// Cloning is cheap; clones share the handle and the strategy. Operations
/// keep the binder they ran under in their [`Binding`](crate::Binding)
/// slot, which is what lets them issue nested queries against the same unit
/// of work.
pub struct Binder<U> {
    uow: UowHandle<U>,
    executor: Rc<dyn OperationExecutor<U>>,
}

impl<U> Clone for Binder<U> {
    fn clone(&self) -> Self {
        Self {
            uow: self.uow.clone(),
            executor: Rc::clone(&self.executor),
        }
    }
}

impl<U> fmt::Debug for Binder<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder").finish_non_exhaustive()
    }
}

impl<U: 'static> Binder<U> {
    /// Binder over the default execution path.
    pub fn new(uow: UowHandle<U>) -> Self {
        Self {
            uow,
            executor: Rc::new(DefaultExecutor),
        }
    }

    /// Binder with a replacement execution strategy.
    ///
    /// The default path is skipped entirely; no partial binding occurs.
    pub fn with_executor(uow: UowHandle<U>, executor: Rc<dyn OperationExecutor<U>>) -> Self {
        Self { uow, executor }
    }

    /// The unit of work this binder attaches to operations.
    pub fn uow(&self) -> &UowHandle<U> {
        &self.uow
    }

    /// Bind and run a command.
    pub fn command<C>(&self, cmd: &mut C) -> Result<(), OperationError>
    where
        C: Command<U> + 'static,
    {
        self.executor.execute_command(self, cmd)
    }

    /// Bind and run a result-bearing command, returning its stored result.
    pub fn command_with_result<C>(&self, cmd: &mut C) -> Result<C::Output, OperationError>
    where
        C: CommandWithResult<U> + 'static,
    {
        let boxed = self.executor.execute_command_with_result(self, cmd)?;
        downcast::<C::Output>(boxed, type_name::<C>())
    }

    /// Bind and run a query, returning its result.
    pub fn query<Q>(&self, query: &mut Q) -> Result<Q::Output, OperationError>
    where
        Q: Query<U> + 'static,
    {
        let boxed = self.executor.execute_query(self, query)?;
        downcast::<Q::Output>(boxed, type_name::<Q>())
    }
}

fn downcast<R: 'static>(boxed: Box<dyn Any>, operation: &'static str) -> Result<R, OperationError> {
    boxed
        .downcast::<R>()
        .map(|result| *result)
        .map_err(|_| OperationError::ResultTypeMismatch {
            operation,
            expected: type_name::<R>(),
        })
}
