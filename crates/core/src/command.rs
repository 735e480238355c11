//! Commands: side-effecting operations executed through the binder.

use std::any::{Any, TypeId, type_name};

use crate::binder::Binder;
use crate::error::OperationError;
use crate::operation::Operation;

/// A side-effecting operation without output.
///
/// Stateless between invocations; constructed per call and discarded once
/// control returns.
pub trait Command<U>: Operation<U> {
    /// Execute against the bound unit of work.
    fn execute(&mut self) -> Result<(), OperationError>;
}

/// A side-effecting operation that also produces output.
///
/// `execute` stores the output in a write-once slot; the binder drains it
/// afterwards and returns it to the caller.
pub trait CommandWithResult<U>: Command<U> {
    type Output: 'static;

    /// Drain the stored result. `None` if `execute` has not stored one, or
    /// if it was already drained.
    fn take_result(&mut self) -> Option<Self::Output>;
}

/// Object-safe view of a [`Command`] used by the executor strategy.
pub trait ErasedCommand<U> {
    fn bind(&mut self, binder: Binder<U>);
    fn execute(&mut self) -> Result<(), OperationError>;
    fn operation_type(&self) -> TypeId;
    fn operation_name(&self) -> &'static str;
}

impl<U, C> ErasedCommand<U> for C
where
    U: 'static,
    C: Command<U> + 'static,
{
    fn bind(&mut self, binder: Binder<U>) {
        self.binding_mut().attach(binder);
    }

    fn execute(&mut self) -> Result<(), OperationError> {
        Command::execute(self)
    }

    fn operation_type(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn operation_name(&self) -> &'static str {
        type_name::<C>()
    }
}

/// Object-safe view of a [`CommandWithResult`]; the result leaves boxed.
pub trait ErasedCommandWithResult<U> {
    fn bind(&mut self, binder: Binder<U>);
    fn execute(&mut self) -> Result<(), OperationError>;
    fn take_result_boxed(&mut self) -> Option<Box<dyn Any>>;
    fn operation_type(&self) -> TypeId;
    fn operation_name(&self) -> &'static str;
}

impl<U, C> ErasedCommandWithResult<U> for C
where
    U: 'static,
    C: CommandWithResult<U> + 'static,
{
    fn bind(&mut self, binder: Binder<U>) {
        self.binding_mut().attach(binder);
    }

    fn execute(&mut self) -> Result<(), OperationError> {
        Command::execute(self)
    }

    fn take_result_boxed(&mut self) -> Option<Box<dyn Any>> {
        self.take_result().map(|result| Box::new(result) as Box<dyn Any>)
    }

    fn operation_type(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn operation_name(&self) -> &'static str {
        type_name::<C>()
    }
}
