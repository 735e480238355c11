//! Queries: side-effect-free operations producing a typed result.

use std::any::{Any, TypeId, type_name};

use crate::binder::Binder;
use crate::error::OperationError;
use crate::operation::Operation;

/// A side-effect-free operation producing a value.
///
/// A query may itself run nested queries through its binding
/// (`self.binding().query(..)`); nesting reuses the same unit of work and
/// opens no new transactional scope.
pub trait Query<U>: Operation<U> {
    type Output: 'static;

    /// Execute against the bound unit of work.
    fn execute(&mut self) -> Result<Self::Output, OperationError>;
}

/// Object-safe view of a [`Query`]; the output leaves boxed.
pub trait ErasedQuery<U> {
    fn bind(&mut self, binder: Binder<U>);
    fn execute_boxed(&mut self) -> Result<Box<dyn Any>, OperationError>;
    fn operation_type(&self) -> TypeId;
    fn operation_name(&self) -> &'static str;
}

impl<U, Q> ErasedQuery<U> for Q
where
    U: 'static,
    Q: Query<U> + 'static,
{
    fn bind(&mut self, binder: Binder<U>) {
        self.binding_mut().attach(binder);
    }

    fn execute_boxed(&mut self) -> Result<Box<dyn Any>, OperationError> {
        let output = self.execute()?;
        Ok(Box::new(output))
    }

    fn operation_type(&self) -> TypeId {
        TypeId::of::<Q>()
    }

    fn operation_name(&self) -> &'static str {
        type_name::<Q>()
    }
}
