//! Execution strategy behind the binder.
//!
//! The production strategy binds the unit of work and runs the operation.
//! Test harnesses install a different strategy (see
//! [`StubExecutor`](crate::stub::StubExecutor)) to substitute synthetic
//! results without a real unit of work; in that mode the default path,
//! binding included, never runs.

use std::any::Any;

use crate::binder::Binder;
use crate::command::{ErasedCommand, ErasedCommandWithResult};
use crate::error::OperationError;
use crate::query::ErasedQuery;

/// Pluggable execution capability the binder depends on.
pub trait OperationExecutor<U> {
    /// Run a command without output.
    fn execute_command(
        &self,
        binder: &Binder<U>,
        cmd: &mut dyn ErasedCommand<U>,
    ) -> Result<(), OperationError>;

    /// Run a result-bearing command and hand back its boxed result.
    fn execute_command_with_result(
        &self,
        binder: &Binder<U>,
        cmd: &mut dyn ErasedCommandWithResult<U>,
    ) -> Result<Box<dyn Any>, OperationError>;

    /// Run a query and hand back its boxed output.
    fn execute_query(
        &self,
        binder: &Binder<U>,
        query: &mut dyn ErasedQuery<U>,
    ) -> Result<Box<dyn Any>, OperationError>;
}

/// Production strategy: attach the binder, run the operation, surface its
/// outcome unchanged. No retry, no logging, no rollback.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultExecutor;

impl<U: 'static> OperationExecutor<U> for DefaultExecutor {
    fn execute_command(
        &self,
        binder: &Binder<U>,
        cmd: &mut dyn ErasedCommand<U>,
    ) -> Result<(), OperationError> {
        cmd.bind(binder.clone());
        cmd.execute()
    }

    fn execute_command_with_result(
        &self,
        binder: &Binder<U>,
        cmd: &mut dyn ErasedCommandWithResult<U>,
    ) -> Result<Box<dyn Any>, OperationError> {
        cmd.bind(binder.clone());
        cmd.execute()?;
        cmd.take_result_boxed().ok_or(OperationError::MissingResult {
            operation: cmd.operation_name(),
        })
    }

    fn execute_query(
        &self,
        binder: &Binder<U>,
        query: &mut dyn ErasedQuery<U>,
    ) -> Result<Box<dyn Any>, OperationError> {
        query.bind(binder.clone());
        query.execute_boxed()
    }
}
