//! Canned-result executor for test harnesses.
//!
//! Lives in the main tree so downstream crates can use it from their own
//! tests without a separate dev-only crate.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::binder::Binder;
use crate::command::{ErasedCommand, ErasedCommandWithResult};
use crate::error::OperationError;
use crate::executor::OperationExecutor;
use crate::query::ErasedQuery;

type ResultFactory = Box<dyn Fn() -> Box<dyn Any>>;

/// Replacement strategy that never touches the unit of work.
///
/// Commands are recorded and succeed without executing. Result-bearing
/// commands and queries hand back a canned result registered for their
/// concrete type; running one without a canned result is
/// [`OperationError::MissingOverrideResult`].
#[derive(Default)]
pub struct StubExecutor {
    results: HashMap<TypeId, ResultFactory>,
    executed: RefCell<Vec<&'static str>>,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result handed out whenever an operation of type `O`
    /// runs.
    pub fn returns<O, R>(mut self, result: R) -> Self
    where
        O: 'static,
        R: Clone + 'static,
    {
        self.results
            .insert(TypeId::of::<O>(), Box::new(move || Box::new(result.clone())));
        self
    }

    /// Names of the operations that ran, in order.
    pub fn executed(&self) -> Vec<&'static str> {
        self.executed.borrow().clone()
    }

    fn record(&self, operation: &'static str) {
        self.executed.borrow_mut().push(operation);
    }

    fn canned(
        &self,
        ty: TypeId,
        operation: &'static str,
    ) -> Result<Box<dyn Any>, OperationError> {
        let factory = self
            .results
            .get(&ty)
            .ok_or(OperationError::MissingOverrideResult { operation })?;
        Ok(factory())
    }
}

impl<U> OperationExecutor<U> for StubExecutor {
    fn execute_command(
        &self,
        _binder: &Binder<U>,
        cmd: &mut dyn ErasedCommand<U>,
    ) -> Result<(), OperationError> {
        self.record(cmd.operation_name());
        Ok(())
    }

    fn execute_command_with_result(
        &self,
        _binder: &Binder<U>,
        cmd: &mut dyn ErasedCommandWithResult<U>,
    ) -> Result<Box<dyn Any>, OperationError> {
        self.record(cmd.operation_name());
        self.canned(cmd.operation_type(), cmd.operation_name())
    }

    fn execute_query(
        &self,
        _binder: &Binder<U>,
        query: &mut dyn ErasedQuery<U>,
    ) -> Result<Box<dyn Any>, OperationError> {
        self.record(query.operation_name());
        self.canned(query.operation_type(), query.operation_name())
    }
}
